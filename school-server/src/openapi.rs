use crate::api::{avatar, faculty, health, info, math, student};
use crate::models::{Avatar, Faculty, FacultyPayload, Student, StudentPayload};
use crate::pagination::Page;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const STUDENT_TAG: &str = "Student API";
pub(crate) const FACULTY_TAG: &str = "Faculty API";
pub(crate) const AVATAR_TAG: &str = "Avatar API";
pub(crate) const MATH_TAG: &str = "Math API";
pub(crate) const INFO_TAG: &str = "Info API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = STUDENT_TAG, description = "Student records, statistics and printing"),
        (name = FACULTY_TAG, description = "Faculty records and lookups"),
        (name = AVATAR_TAG, description = "Student avatar images"),
        (name = MATH_TAG, description = "Summation strategies"),
        (name = INFO_TAG, description = "Server information"),
    ),
    paths(
        health::health_check,
        health::ready_check,
        student::create_student,
        student::all_students,
        student::get_student,
        student::update_student,
        student::delete_student,
        student::students_by_age,
        student::students_by_age_between,
        student::student_faculty,
        student::student_count,
        student::average_age,
        student::average_age_streamed,
        student::last_five,
        student::names_starting_with_a,
        student::upload_avatar,
        student::print_parallel,
        student::print_synchronized,
        faculty::create_faculty,
        faculty::all_faculties,
        faculty::get_faculty,
        faculty::update_faculty,
        faculty::delete_faculty,
        faculty::faculties_by_color,
        faculty::search_faculties,
        faculty::faculty_students,
        faculty::longest_name,
        avatar::list_avatars,
        avatar::avatar_data,
        math::sum_slow,
        math::sum_formula,
        math::sum_parallel,
        math::sum_range,
        info::port,
    ),
    components(schemas(
        Student,
        StudentPayload,
        Faculty,
        FacultyPayload,
        Avatar,
        Page<Avatar>,
        health::Health
    )),
    info(
        title = "School API",
        description = "Students, faculties and avatars of a school",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Serves the generated OpenAPI document as JSON
pub(crate) fn router(api_doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    Router::new().route(
        "/openapi.json",
        get(move || {
            let doc = api_doc.clone();
            async move { Json(doc) }
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let fixture = TestFixture::new().await;

        let response = fixture.get("/openapi.json").await;
        response.assert_ok();
        assert_eq!(response.json["info"]["title"], "School API");

        let paths = response.json["paths"].as_object().unwrap();
        for path in [
            "/student",
            "/student/{id}",
            "/student/print-parallel",
            "/faculty/longest-name",
            "/avatar",
            "/math/sum-range",
            "/info/port",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn test_scalar_ui_is_served() {
        let fixture = TestFixture::new().await;
        fixture.get("/scalar").await.assert_ok();
    }
}
