use std::sync::Arc;

use axum::{extract::State, http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use bondsite_core::dataset::DatasetError;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{BondSummary, CashFlow, DailyValue, DatasetStatus, Message, SeriesList},
};

pub mod bonds;
pub mod dataset;

#[utoipa::path(get, path = "/", responses((status = 200, body = Message)))]
pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Hello World".to_string(),
    })
}

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(
    get,
    path = "/api/v1/readyz",
    responses((status = 200, description = "Ready"), (status = 503, description = "No dataset loaded yet"))
)]
pub async fn readyz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    if state.dataset_cache.status().info.is_none() {
        return Err(ApiError::Core(DatasetError::NotReady.into()));
    }
    Ok("ok")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        healthz,
        readyz,
        bonds::get_bond,
        bonds::get_daily_values,
        bonds::get_cash_flow,
        bonds::list_series,
        dataset::get_dataset,
        dataset::refresh_dataset
    ),
    components(schemas(Message, BondSummary, DailyValue, CashFlow, SeriesList, DatasetStatus)),
    tags((name = "bondsite"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz));

    Router::new()
        .route("/", get(root))
        .merge(bonds::router())
        .merge(dataset::router())
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
