use crate::errors::ApiError;
use crate::openapi::MATH_TAG;
use crate::services::math;
use crate::state::AppState;
use axum::{extract::Json, routing::get, Router};

#[utoipa::path(
    get,
    path = "/math/sum-slow",
    tag = MATH_TAG,
    responses((status = 200, description = "Sum of 1 to 1,000,000 counted element by element", body = u64))
)]
pub(crate) async fn sum_slow() -> Json<u64> {
    Json(math::sum_slow())
}

#[utoipa::path(
    get,
    path = "/math/sum-formula",
    tag = MATH_TAG,
    responses((status = 200, description = "Sum of 1 to 1,000,000 by closed formula", body = u64))
)]
pub(crate) async fn sum_formula() -> Json<u64> {
    Json(math::sum_formula())
}

#[utoipa::path(
    get,
    path = "/math/sum-parallel",
    tag = MATH_TAG,
    responses((status = 200, description = "Sum of 1 to 1,000,000 over parallel chunks", body = u64))
)]
pub(crate) async fn sum_parallel() -> Result<Json<u64>, ApiError> {
    math::sum_parallel().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/math/sum-range",
    tag = MATH_TAG,
    responses((status = 200, description = "Sum of 1 to 1,000,000 over an inclusive range", body = u64))
)]
pub(crate) async fn sum_range() -> Json<u64> {
    Json(math::sum_range())
}

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/math/sum-slow", get(sum_slow))
        .route("/math/sum-formula", get(sum_formula))
        .route("/math/sum-parallel", get(sum_parallel))
        .route("/math/sum-range", get(sum_range))
}
