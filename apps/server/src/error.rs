use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bondsite_core::dataset::DatasetError;
use bondsite_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) if e.is_lookup() => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::Dataset(DatasetError::NotReady)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bondsite_bonds::BondError;

    #[test]
    fn test_status_mapping() {
        let unknown = ApiError::from(CoreError::from(BondError::SeriesNotFound("XYZ".into())));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let not_ready = ApiError::from(CoreError::from(DatasetError::NotReady));
        assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);

        let discovery = ApiError::from(CoreError::from(DatasetError::Discovery("down".into())));
        assert_eq!(discovery.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad_date = ApiError::NotFound("Invalid purchase date 'x'".into());
        assert_eq!(bad_date.status(), StatusCode::NOT_FOUND);
    }
}
