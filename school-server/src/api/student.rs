use crate::errors::ApiError;
use crate::models::{Avatar, Faculty, Student, StudentPayload};
use crate::openapi::STUDENT_TAG;
use crate::printer::PrintOutcome;
use crate::services::{AvatarService, StudentService};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde::Deserialize;
use utoipa::IntoParams;

/// Media type assumed when an upload carries no Content-Type
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct AgeQuery {
    /// Exact age to match
    age: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct AgeBetweenQuery {
    /// Lower bound, inclusive
    min: i32,
    /// Upper bound, inclusive
    max: i32,
}

#[utoipa::path(
    post,
    path = "/student",
    tag = STUDENT_TAG,
    request_body = StudentPayload,
    responses(
        (status = 200, description = "Student created", body = Student),
        (status = 404, description = "Referenced faculty does not exist"),
        (status = 422, description = "Invalid request payload")
    )
)]
pub(crate) async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<Student>, ApiError> {
    StudentService::new(&state.store)
        .create(payload)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/{id}",
    tag = STUDENT_TAG,
    params(("id" = u64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub(crate) async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Student>, ApiError> {
    StudentService::new(&state.store).get(id).await.map(Json)
}

#[utoipa::path(
    put,
    path = "/student/{id}",
    tag = STUDENT_TAG,
    params(("id" = u64, Path, description = "Student id")),
    request_body = StudentPayload,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student or faculty not found")
    )
)]
pub(crate) async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<Student>, ApiError> {
    StudentService::new(&state.store)
        .update(id, payload)
        .await
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/student/{id}",
    tag = STUDENT_TAG,
    params(("id" = u64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Deleted student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub(crate) async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Student>, ApiError> {
    StudentService::new(&state.store).delete(id).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/student",
    tag = STUDENT_TAG,
    responses((status = 200, description = "All students", body = Vec<Student>))
)]
pub(crate) async fn all_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, ApiError> {
    StudentService::new(&state.store).all().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/student/age",
    tag = STUDENT_TAG,
    params(AgeQuery),
    responses((status = 200, description = "Students of the given age", body = Vec<Student>))
)]
pub(crate) async fn students_by_age(
    State(state): State<AppState>,
    Query(query): Query<AgeQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    StudentService::new(&state.store)
        .by_age(query.age)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/age-between",
    tag = STUDENT_TAG,
    params(AgeBetweenQuery),
    responses((status = 200, description = "Students within the age range", body = Vec<Student>))
)]
pub(crate) async fn students_by_age_between(
    State(state): State<AppState>,
    Query(query): Query<AgeBetweenQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    StudentService::new(&state.store)
        .by_age_between(query.min, query.max)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/{id}/faculty",
    tag = STUDENT_TAG,
    params(("id" = u64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Faculty of the student", body = Faculty),
        (status = 404, description = "Student not found or without faculty")
    )
)]
pub(crate) async fn student_faculty(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Faculty>, ApiError> {
    StudentService::new(&state.store)
        .faculty_of(id)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/count",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Number of students", body = u64))
)]
pub(crate) async fn student_count(State(state): State<AppState>) -> Result<Json<u64>, ApiError> {
    StudentService::new(&state.store).count().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/student/average-age",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Average age, null without students", body = Option<f64>))
)]
pub(crate) async fn average_age(
    State(state): State<AppState>,
) -> Result<Json<Option<f64>>, ApiError> {
    StudentService::new(&state.store)
        .average_age()
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/average-age-stream",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Average age over the full list, 0 without students", body = f64))
)]
pub(crate) async fn average_age_streamed(
    State(state): State<AppState>,
) -> Result<Json<f64>, ApiError> {
    StudentService::new(&state.store)
        .average_age_streamed()
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/last-five",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Five newest students", body = Vec<Student>))
)]
pub(crate) async fn last_five(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, ApiError> {
    StudentService::new(&state.store)
        .last_five()
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/student/names-starting-with-a",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Sorted, uppercased names starting with A", body = Vec<String>))
)]
pub(crate) async fn names_starting_with_a(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    StudentService::new(&state.store)
        .names_starting_with_a()
        .await
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/student/{id}/avatar",
    tag = STUDENT_TAG,
    params(("id" = u64, Path, description = "Student id")),
    request_body(content = Vec<u8>, content_type = "image/*", description = "Raw image bytes"),
    responses(
        (status = 200, description = "Avatar stored", body = Avatar),
        (status = 400, description = "Empty image"),
        (status = 404, description = "Student not found")
    )
)]
pub(crate) async fn upload_avatar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Avatar>, ApiError> {
    let media_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_MEDIA_TYPE);

    AvatarService::new(&state.store)
        .upload(id, media_type, body.to_vec())
        .await
        .map(Json)
}

/// Text answered by the print endpoints
fn print_message(outcome: PrintOutcome, mode: &str, capitalized: &str) -> String {
    match outcome {
        PrintOutcome::Completed { .. } => {
            format!("{capitalized} printing completed. Check console for output.")
        }
        PrintOutcome::Skipped { required, .. } => format!(
            "Not enough students in database. Need at least {required} for {mode} printing."
        ),
        PrintOutcome::Interrupted { .. } => format!("{capitalized} printing was interrupted."),
    }
}

#[utoipa::path(
    get,
    path = "/student/print-parallel",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Names printed to the console", body = String))
)]
pub(crate) async fn print_parallel(State(state): State<AppState>) -> Result<String, ApiError> {
    let outcome = StudentService::new(&state.store)
        .print_parallel(&state.printer, &state.shutdown)
        .await?;
    Ok(print_message(outcome, "parallel", "Parallel"))
}

#[utoipa::path(
    get,
    path = "/student/print-synchronized",
    tag = STUDENT_TAG,
    responses((status = 200, description = "Names printed to the console", body = String))
)]
pub(crate) async fn print_synchronized(
    State(state): State<AppState>,
) -> Result<String, ApiError> {
    let outcome = StudentService::new(&state.store)
        .print_synchronized(&state.printer, &state.shutdown)
        .await?;
    Ok(print_message(outcome, "synchronized", "Synchronized"))
}

/// Student routes; static segments take priority over `{id}`
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/student", post(create_student).get(all_students))
        .route(
            "/student/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/student/age", get(students_by_age))
        .route("/student/age-between", get(students_by_age_between))
        .route("/student/{id}/faculty", get(student_faculty))
        .route("/student/{id}/avatar", post(upload_avatar))
        .route("/student/count", get(student_count))
        .route("/student/average-age", get(average_age))
        .route("/student/average-age-stream", get(average_age_streamed))
        .route("/student/last-five", get(last_five))
        .route("/student/names-starting-with-a", get(names_starting_with_a))
        .route("/student/print-parallel", get(print_parallel))
        .route("/student/print-synchronized", get(print_synchronized))
}
