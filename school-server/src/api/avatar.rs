use crate::errors::ApiError;
use crate::models::Avatar;
use crate::openapi::AVATAR_TAG;
use crate::pagination::{Page, PageQuery};
use crate::services::AvatarService;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Json, Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};

#[utoipa::path(
    get,
    path = "/avatar",
    tag = AVATAR_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "One page of avatars; missing or out-of-range paging values fall back to defaults", body = Page<Avatar>),
        (status = 400, description = "Paging value is not an integer")
    )
)]
pub(crate) async fn list_avatars(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Avatar>>, ApiError> {
    AvatarService::new(&state.store)
        .list(query.page, query.size)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/avatar/{id}/data",
    tag = AVATAR_TAG,
    params(("id" = u64, Path, description = "Avatar id")),
    responses(
        (status = 200, description = "Raw image bytes with the stored media type"),
        (status = 404, description = "Avatar not found")
    )
)]
pub(crate) async fn avatar_data(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let (media_type, data) = AvatarService::new(&state.store).data(id).await?;

    Response::builder()
        .header(CONTENT_TYPE, media_type)
        .header(CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| ApiError::internal(format!("Failed to build avatar response: {e}")))
}

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/avatar", get(list_avatars))
        .route("/avatar/{id}/data", get(avatar_data))
}
