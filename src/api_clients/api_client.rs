//! # Organizer API Client
//!
//! The single chokepoint for outbound HTTP. Every call goes through
//! [`ApiClient::request`], which attaches the JSON content type and the current
//! bearer token, interprets the status code, and converts every failure into a
//! [`ParsedError`] that is logged exactly once before being returned.
//!
//! The client never mutates session or cache state; it only reads the token
//! from the shared [`TokenHandle`].

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::classifier::{classify, ApiErrorBody, ErrorCode, Failure, ParsedError};
use crate::config::ApiEndpointConfig;
use crate::error::{ClientError, ClientResult};
use crate::logging::log_failure;

/// Result of a gateway call
pub type ApiResult<T> = Result<T, ParsedError>;

/// Shared, process-wide bearer token slot.
///
/// Written by the session manager, read by the API client on every request.
#[derive(Clone, Default)]
pub struct TokenHandle {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_present(&self) -> bool {
        self.inner.read().is_some()
    }
}

impl std::fmt::Debug for TokenHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHandle")
            .field("present", &self.is_present())
            .finish()
    }
}

/// Query string pairs; a key may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Append one pair per value, repeating the key
    #[must_use]
    pub fn with_all<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self = self.with(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Anything that serializes into query parameters
pub trait ToQuery {
    fn to_query(&self) -> QueryParams;
}

impl ToQuery for () {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
    }
}

const SEGMENT_BASE: &str = "http://localhost/";

/// Encode an opaque id as exactly one path segment.
///
/// `/`, `?`, `#` and `%` are percent-encoded so the id can never leave its
/// route. Empty ids and the dot segments `.` and `..` cannot be addressed and
/// fail with MALFORMED_REQUEST before any request is made.
pub fn path_segment(id: &str) -> ApiResult<String> {
    if id.is_empty() || id == "." || id == ".." {
        let error = ParsedError::new(
            ErrorCode::MalformedRequest,
            format!("Invalid resource id: {id:?}"),
        );
        log_failure(&error, "path segment");
        return Err(error);
    }

    let mut scratch = Url::parse(SEGMENT_BASE)
        .map_err(|e| classify(Failure::Runtime(format!("Invalid segment base: {}", e))))?;
    {
        let mut segments = scratch.path_segments_mut().map_err(|()| {
            classify(Failure::Runtime("Segment base cannot hold a path".to_string()))
        })?;
        segments.push(id);
    }

    Ok(scratch.path().trim_start_matches('/').to_string())
}

/// HTTP client for the organizer API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiEndpointConfig,
    base_url: Url,
    token: TokenHandle,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.config.timeout_ms)
            .field("token_present", &self.token.is_present())
            .finish()
    }
}

impl ApiClient {
    /// Create a client with its own, initially empty, token slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use organizer_client::api_clients::ApiClient;
    /// use organizer_client::config::ApiEndpointConfig;
    ///
    /// let client = ApiClient::new(ApiEndpointConfig::default()).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    /// assert!(!client.token_handle().is_present());
    /// ```
    pub fn new(config: ApiEndpointConfig) -> ClientResult<Self> {
        Self::with_token_handle(config, TokenHandle::new())
    }

    /// Create a client that reads its bearer token from `token`
    pub fn with_token_handle(config: ApiEndpointConfig, token: TokenHandle) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::config_error(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "Created organizer API client"
        );

        Ok(Self {
            client,
            config,
            base_url,
            token,
        })
    }

    pub fn token_handle(&self) -> &TokenHandle {
        &self.token
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    /// Issue one request and decode the payload.
    ///
    /// Success is any 2xx status. A 204 or an empty body decodes as the empty
    /// value of `T` (`{}`, `null`, or `[]`, whichever `T` accepts). Failures are
    /// classified, logged once with a `METHOD path` context tag, and returned.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let context = format!("{} {}", method, path);
        let result = self.execute(method, path, query, body).await;
        if let Err(ref error) = result {
            log_failure(error, &context);
        }
        result
    }

    async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path, query)?;
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| classify(e))?;

        debug!(
            method = %method,
            url = %url,
            token_present = self.token.is_present(),
            "Sending organizer API request"
        );

        let mut builder = self.client.request(method, url);
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| classify(e))?;
        Self::handle_response(response).await
    }

    fn endpoint_url(&self, path: &str, query: &QueryParams) -> ApiResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };

        let mut url = Url::parse(&joined).map_err(|e| {
            classify(Failure::Runtime(format!(
                "Failed to construct URL for {}: {}",
                path, e
            )))
        })?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }

        Ok(url)
    }

    async fn handle_response<T>(response: reqwest::Response) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(Failure::Network(e.to_string())))?;

        if status.is_success() {
            if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
                return decode_empty();
            }
            return serde_json::from_slice::<T>(&bytes).map_err(|e| classify(e));
        }

        Err(Self::error_from_body(status, &bytes))
    }

    fn error_from_body(status: StatusCode, bytes: &[u8]) -> ParsedError {
        match serde_json::from_slice::<ApiErrorBody>(bytes) {
            Ok(body) => classify(body),
            Err(_) => ParsedError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ),
        }
    }

    // ===================================================================================
    // VERB WRAPPERS
    // ===================================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, &QueryParams::new(), None::<&()>)
            .await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> ApiResult<T> {
        self.request(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, &QueryParams::new(), body)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, &QueryParams::new(), Some(body))
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, &QueryParams::new(), body)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::DELETE, path, &QueryParams::new(), None::<&()>)
            .await
    }

    /// Check if the organizer API is healthy
    ///
    /// GET /health
    pub async fn health_check(&self) -> ApiResult<()> {
        let _: Value = self.get("/health").await?;
        debug!("Organizer API health check passed");
        Ok(())
    }
}

fn decode_empty<T: DeserializeOwned>() -> ApiResult<T> {
    [Value::Object(Map::new()), Value::Null, Value::Array(Vec::new())]
        .into_iter()
        .find_map(|candidate| serde_json::from_value::<T>(candidate).ok())
        .ok_or_else(|| {
            ParsedError::new(
                ErrorCode::RuntimeError,
                "Empty response body does not match the expected payload",
            )
        })
}
