use crate::config::Settings;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::response::Response;
use axum::Router;
use coffee_auth::testutil::TokenBuilder;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;

/// Test fixture for driving the whole application in-process.
///
/// The fixture builds the real router on top of an empty memory store and a static key
/// set, so tokens minted with [`TestFixture::token`] are accepted by every gated route.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     let token = fixture.token(&["post:drinks"]);
///
///     let response = fixture
///         .post("/drinks", &json!({"title": "mocha", "recipe": []}), Some(&token))
///         .await;
///
///     response.assert_ok();
///     assert_eq!(response.json["drinks"][0]["title"], "mocha");
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// State shared with the router, for seeding and inspecting the store
    pub state: AppState,
}

impl TestFixture {
    /// Creates a new test fixture with the default test settings
    pub async fn new() -> Self {
        Self::with_settings(Settings::for_test()).await
    }

    /// Creates a new test fixture from custom settings.
    ///
    /// The store and key set are always the in-process test ones.
    pub async fn with_settings(settings: Settings) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let state = AppState::for_testing(&settings);
        let app = create_app(state.clone()).await;

        Self { app, state }
    }

    /// Initializes the test logger with customized settings.
    ///
    /// Called by [`TestFixture::new`]; only the first call in a test binary takes effect.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Signs a valid token carrying the given permissions
    pub fn token(&self, permissions: &[&str]) -> String {
        TokenBuilder::new().permissions(permissions).sign()
    }

    /// Creates a request builder with a JSON content type and, optionally, a bearer token
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        builder
    }

    /// Sends an unauthenticated GET request
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        self.send_empty(Method::GET, uri, None).await
    }

    /// Sends a GET request with a bearer token
    pub async fn get_with_token(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        self.send_empty(Method::GET, uri, Some(token)).await
    }

    pub async fn post<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        body: &T,
        token: Option<&str>,
    ) -> TestResponse {
        self.send_json(Method::POST, uri, body, token).await
    }

    pub async fn patch<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        body: &T,
        token: Option<&str>,
    ) -> TestResponse {
        self.send_json(Method::PATCH, uri, body, token).await
    }

    pub async fn delete(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        self.send_empty(Method::DELETE, uri, token).await
    }

    async fn send_empty(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> TestResponse {
        let request = self
            .request_builder(method, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends any method with a JSON body
    pub async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        body: &T,
        token: Option<&str>,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, token)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns the raw response, for header assertions
    pub async fn send_raw(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Sends a request and returns a TestResponse
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.send_raw(request).await;

        let status = response.status();
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

        TestResponse { status, json }
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Deserializes the JSON body into a specific type
    ///
    /// # Panics
    ///
    /// Panics if the body does not match `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize response body: {}\nBody: {}",
                e, self.json
            )
        })
    }

    /// Asserts that the response has a specific status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Expected status code {}, got {} with body: {}",
            expected, self.status, self.json
        );
    }

    /// Asserts that the response status is 200 OK
    pub fn assert_ok(&self) {
        self.assert_status(StatusCode::OK);
    }
}
