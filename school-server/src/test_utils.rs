use crate::config::SchoolConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;

/// Test fixture for exercising the full router against an in-memory store.
///
/// Every fixture gets its own store, so tests never observe each other's
/// records.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post("/faculty", &json!({ "name": "Ravenclaw", "color": "Blue" }))
///         .await;
///
///     response.assert_ok();
///     let faculty = response.json_as::<Faculty>();
///     assert_eq!(faculty.id, 1);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration the application was built with
    pub config: SchoolConfig,
    /// Shared state behind the router
    pub state: AppState,
}

impl TestFixture {
    /// Creates a fixture with a fresh in-memory store and default printer
    /// settings.
    pub async fn new() -> Self {
        Self::with_config(SchoolConfig::for_test()).await
    }

    /// Creates a fixture with custom configuration. The store is always
    /// in-memory regardless of the configured backend.
    pub async fn with_config(config: SchoolConfig) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let state = AppState::for_testing(&config);
        let app = create_app(state.clone()).await;

        Self { app, config, state }
    }

    /// Initializes the test logger. Safe to call more than once.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder for the given method and URI.
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder().method(method).uri(uri.as_ref())
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a DELETE request to the specified URI.
    pub async fn delete(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body to the specified URI.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let response = fixture
    ///     .post("/student", &json!({ "name": "Luna", "age": 15 }))
    ///     .await;
    /// response.assert_ok();
    /// ```
    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        self.send_json(Method::POST, uri, body).await
    }

    /// Sends a PUT request with a JSON body to the specified URI.
    pub async fn put<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        self.send_json(Method::PUT, uri, body).await
    }

    /// Sends a POST request with a raw body and the given Content-Type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let response = fixture
    ///     .post_bytes("/student/1/avatar", "image/png", vec![137, 80, 78, 71])
    ///     .await;
    /// assert_eq!(response.json["filePath"], "avatars/1.png");
    /// ```
    pub async fn post_bytes(
        &self,
        uri: impl AsRef<str>,
        content_type: &str,
        body: Vec<u8>,
    ) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(request).await
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// Lower-level than `get()` and `post()`; use it when the request needs
    /// custom headers or a malformed body.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };
        let text = String::from_utf8_lossy(&body).into_owned();

        TestResponse {
            status,
            content_type,
            json,
            text,
            bytes: body.to_vec(),
        }
    }
}

/// Response from a test request with the body in the forms tests need.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, if any
    pub content_type: Option<String>,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
    /// Response body as text
    pub text: String,
    /// Raw response body
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {} with body: {}",
            expected, self.status, self.text
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Faculty;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let fixture = TestFixture::new().await;
        fixture
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let fixture = TestFixture::new().await;
        let request = fixture
            .request_builder(Method::POST, "/student")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": 5}"))
            .unwrap();

        let response = fixture.send(request).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_json_as() {
        let fixture = TestFixture::new().await;
        let response = fixture
            .post("/faculty", &json!({ "name": "Hufflepuff", "color": "Yellow" }))
            .await;

        let faculty = response.assert_ok().json_as::<Faculty>();
        assert_eq!(
            faculty,
            Faculty {
                id: 1,
                name: "Hufflepuff".to_string(),
                color: "Yellow".to_string(),
            }
        );
    }
}
