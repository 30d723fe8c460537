use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::{error::ApiResult, main_lib::AppState, models::DatasetStatus};

#[utoipa::path(get, path = "/dataset", responses((status = 200, body = DatasetStatus)))]
pub async fn get_dataset(State(state): State<Arc<AppState>>) -> Json<DatasetStatus> {
    Json(state.dataset_cache.status().into())
}

#[utoipa::path(
    post,
    path = "/dataset/refresh",
    responses(
        (status = 200, body = DatasetStatus),
        (status = 500, description = "Refresh failed, the previous dataset keeps serving")
    )
)]
pub async fn refresh_dataset(State(state): State<Arc<AppState>>) -> ApiResult<Json<DatasetStatus>> {
    tracing::info!("Dataset refresh requested");
    state.dataset_cache.refresh().await?;
    Ok(Json(state.dataset_cache.status().into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dataset", get(get_dataset))
        .route("/dataset/refresh", post(refresh_dataset))
}
