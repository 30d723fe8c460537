use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bondsite_bonds::Bond;
use chrono::NaiveDate;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{BondSummary, CashFlow, DailyValue, SeriesList},
};

fn parse_purchase_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::NotFound(format!("Invalid purchase date '{}'", raw)))
}

fn make_bond(state: &AppState, name: &str, purchase_date: &str) -> ApiResult<Bond> {
    let purchase_date = parse_purchase_date(purchase_date)?;
    Ok(state.dataset_cache.make_bond(name, purchase_date)?)
}

#[utoipa::path(
    get,
    path = "/by_name/{name}/{purchase_date}",
    params(
        ("name" = String, Path, description = "Series name, e.g. EDO0134"),
        ("purchase_date" = String, Path, description = "Purchase date, YYYY-MM-DD")
    ),
    responses((status = 200, body = BondSummary), (status = 404, description = "Unknown bond"))
)]
pub async fn get_bond(
    Path((name, purchase_date)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BondSummary>> {
    let bond = make_bond(&state, &name, &purchase_date)?;
    Ok(Json(BondSummary::from(&bond)))
}

#[utoipa::path(
    get,
    path = "/by_name/{name}/{purchase_date}/daily_values",
    params(
        ("name" = String, Path, description = "Series name, e.g. EDO0134"),
        ("purchase_date" = String, Path, description = "Purchase date, YYYY-MM-DD")
    ),
    responses((status = 200, body = [DailyValue]), (status = 404, description = "Unknown bond"))
)]
pub async fn get_daily_values(
    Path((name, purchase_date)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DailyValue>>> {
    let bond = make_bond(&state, &name, &purchase_date)?;
    Ok(Json(
        bond.daily_values.into_iter().map(DailyValue::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/by_name/{name}/{purchase_date}/cash_flow",
    params(
        ("name" = String, Path, description = "Series name, e.g. EDO0134"),
        ("purchase_date" = String, Path, description = "Purchase date, YYYY-MM-DD")
    ),
    responses((status = 200, body = [CashFlow]), (status = 404, description = "Unknown bond"))
)]
pub async fn get_cash_flow(
    Path((name, purchase_date)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CashFlow>>> {
    let bond = make_bond(&state, &name, &purchase_date)?;
    Ok(Json(bond.cash_flow.into_iter().map(CashFlow::from).collect()))
}

#[utoipa::path(get, path = "/series", responses((status = 200, body = SeriesList)))]
pub async fn list_series(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeriesList>> {
    let series = state.dataset_cache.get()?.series_names();
    Ok(Json(SeriesList { series }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/by_name/{name}/{purchase_date}", get(get_bond))
        .route(
            "/by_name/{name}/{purchase_date}/daily_values",
            get(get_daily_values),
        )
        .route("/by_name/{name}/{purchase_date}/cash_flow", get(get_cash_flow))
        .route("/series", get(list_series))
}
