pub(crate) mod avatar;
pub(crate) mod faculty;
pub(crate) mod health;
pub(crate) mod info;
pub(crate) mod math;
pub(crate) mod student;

use crate::state::AppState;
use axum::Router;

/// Combines all API routes into a single router
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(student::router())
        .merge(faculty::router())
        .merge(avatar::router())
        .merge(math::router())
        .merge(info::router())
}
