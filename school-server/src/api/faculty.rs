use crate::errors::ApiError;
use crate::models::{Faculty, FacultyPayload, Student};
use crate::openapi::FACULTY_TAG;
use crate::services::FacultyService;
use crate::state::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ColorQuery {
    /// Color to match exactly
    color: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub(crate) struct SearchQuery {
    /// Case-insensitive name or color
    name_or_color: String,
}

#[utoipa::path(
    post,
    path = "/faculty",
    tag = FACULTY_TAG,
    request_body = FacultyPayload,
    responses(
        (status = 200, description = "Faculty created", body = Faculty),
        (status = 422, description = "Invalid request payload")
    )
)]
pub(crate) async fn create_faculty(
    State(state): State<AppState>,
    Json(payload): Json<FacultyPayload>,
) -> Result<Json<Faculty>, ApiError> {
    FacultyService::new(&state.store)
        .create(payload)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/faculty/{id}",
    tag = FACULTY_TAG,
    params(("id" = u64, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Faculty found", body = Faculty),
        (status = 404, description = "Faculty not found")
    )
)]
pub(crate) async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Faculty>, ApiError> {
    FacultyService::new(&state.store).get(id).await.map(Json)
}

#[utoipa::path(
    put,
    path = "/faculty/{id}",
    tag = FACULTY_TAG,
    params(("id" = u64, Path, description = "Faculty id")),
    request_body = FacultyPayload,
    responses(
        (status = 200, description = "Faculty updated", body = Faculty),
        (status = 404, description = "Faculty not found")
    )
)]
pub(crate) async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<FacultyPayload>,
) -> Result<Json<Faculty>, ApiError> {
    FacultyService::new(&state.store)
        .update(id, payload)
        .await
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/faculty/{id}",
    tag = FACULTY_TAG,
    params(("id" = u64, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Deleted faculty", body = Faculty),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Faculty still has students")
    )
)]
pub(crate) async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Faculty>, ApiError> {
    FacultyService::new(&state.store).delete(id).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/faculty",
    tag = FACULTY_TAG,
    responses((status = 200, description = "All faculties", body = Vec<Faculty>))
)]
pub(crate) async fn all_faculties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Faculty>>, ApiError> {
    FacultyService::new(&state.store).all().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/faculty/color",
    tag = FACULTY_TAG,
    params(ColorQuery),
    responses((status = 200, description = "Faculties with the given color", body = Vec<Faculty>))
)]
pub(crate) async fn faculties_by_color(
    State(state): State<AppState>,
    Query(query): Query<ColorQuery>,
) -> Result<Json<Vec<Faculty>>, ApiError> {
    FacultyService::new(&state.store)
        .by_color(&query.color)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/faculty/search",
    tag = FACULTY_TAG,
    params(SearchQuery),
    responses((status = 200, description = "Faculties matching by name or color", body = Vec<Faculty>))
)]
pub(crate) async fn search_faculties(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Faculty>>, ApiError> {
    FacultyService::new(&state.store)
        .search(&query.name_or_color)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/faculty/{id}/students",
    tag = FACULTY_TAG,
    params(("id" = u64, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Students of the faculty", body = Vec<Student>),
        (status = 404, description = "Faculty not found")
    )
)]
pub(crate) async fn faculty_students(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    FacultyService::new(&state.store)
        .students_of(id)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/faculty/longest-name",
    tag = FACULTY_TAG,
    responses(
        (status = 200, description = "Longest faculty name", body = String),
        (status = 404, description = "No faculties exist")
    )
)]
pub(crate) async fn longest_name(State(state): State<AppState>) -> Result<String, ApiError> {
    FacultyService::new(&state.store).longest_name().await
}

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/faculty", get(all_faculties).post(create_faculty))
        .route(
            "/faculty/{id}",
            get(get_faculty).put(update_faculty).delete(delete_faculty),
        )
        .route("/faculty/color", get(faculties_by_color))
        .route("/faculty/search", get(search_faculties))
        .route("/faculty/{id}/students", get(faculty_students))
        .route("/faculty/longest-name", get(longest_name))
}
