use crate::openapi::INFO_TAG;
use crate::state::AppState;
use axum::{extract::State, routing::get, Router};
use log::info;

#[utoipa::path(
    get,
    path = "/info/port",
    tag = INFO_TAG,
    responses((status = 200, description = "Port the server was configured with", body = String))
)]
pub(crate) async fn port(State(state): State<AppState>) -> String {
    info!("Was invoked method for get current port");
    format!("Current port: {}", state.config.port)
}

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/info/port", get(port))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;

    #[tokio::test]
    async fn test_port_endpoint() {
        let fixture = TestFixture::new().await;

        let response = fixture.get("/info/port").await;
        response.assert_ok();
        assert_eq!(
            response.text,
            format!("Current port: {}", fixture.config.port)
        );
    }
}
