//! HTTP client for the Affise API.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure the endpoint and API key, then reach resources through
//! [`Client::offers`] and [`Client::presets`].

use crate::{
    context::Context,
    offers::OffersClient,
    presets::PresetsClient,
    query::{encode_query, to_query_string},
    Error, Response, Result,
};
use http::{header, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Library part of the `User-Agent` header sent with each request.
pub const USER_AGENT: &str = concat!("affise-rs/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "API-Key";

/// A client for the Affise API.
///
/// The configuration is fixed once built. Cloning is cheap and clones share
/// the same connection pool, so one client can serve many concurrent tasks.
///
/// # Examples
///
/// ```no_run
/// use affise::{Client, Context};
///
/// # async fn example() -> Result<(), affise::Error> {
/// let client = Client::builder()
///     .endpoint("https://api-example.affise.com/")
///     .api_key("secret")
///     .build()?;
///
/// let ctx = Context::background();
/// let offer = client.offers().get_by_id(&ctx, 1).await?;
/// println!("Offer: {:?}", offer.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.inner.endpoint)
            .field("user_agent", &self.inner.user_agent)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with the default configuration: empty endpoint,
    /// empty API key, library user agent.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// The configured endpoint, without trailing slashes.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.inner.api_key
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }

    /// Offer endpoints.
    pub fn offers(&self) -> OffersClient<'_> {
        OffersClient::new(self)
    }

    /// Preset endpoints.
    pub fn presets(&self) -> PresetsClient<'_> {
        PresetsClient::new(self)
    }

    /// Builds an authenticated request against the API.
    ///
    /// The URL is the endpoint followed by `path`, joined verbatim. The
    /// request carries the `User-Agent` and `API-Key` headers, a JSON body
    /// with `Content-Type: application/json` when `body` is given, and the
    /// time left on `ctx` (or the client timeout) as its timeout. The
    /// executors recompute that time from the context at dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestConstruction`] if the URL or a header value
    /// is malformed, and [`Error::SerializationFailed`] if the body cannot
    /// be encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use affise::{Client, Context};
    /// use http::Method;
    ///
    /// let client = Client::builder()
    ///     .endpoint("https://api.example.com")
    ///     .api_key("secret")
    ///     .build()
    ///     .unwrap();
    ///
    /// let request = client
    ///     .build_request::<()>(&Context::background(), Method::GET, "/offer/1", None)
    ///     .unwrap();
    /// assert_eq!(request.url().as_str(), "https://api.example.com/offer/1");
    /// assert_eq!(request.headers()["API-Key"], "secret");
    /// ```
    pub fn build_request<B>(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Request>
    where
        B: Serialize + ?Sized,
    {
        let raw_url = format!("{}{}", self.inner.endpoint, path);
        let url = Url::parse(&raw_url)
            .map_err(|e| Error::RequestConstruction(format!("invalid URL `{}`: {}", raw_url, e)))?;

        let mut request = reqwest::Request::new(method, url);

        let headers = request.headers_mut();
        headers.insert(header::USER_AGENT, header_value(&self.inner.user_agent)?);
        headers.insert(API_KEY_HEADER, header_value(&self.inner.api_key)?);

        if let Some(body) = body {
            let json =
                serde_json::to_vec(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
            request.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            *request.body_mut() = Some(json.into());
        }

        *request.timeout_mut() = ctx.remaining().or(self.inner.timeout);

        Ok(request)
    }

    /// Builds a request whose query string is encoded from `query`.
    ///
    /// See [`crate::query`] for how a filter struct maps to query pairs. When
    /// every field is empty the path is used unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryEncoding`] if `query` has a field that cannot be
    /// a query value, plus everything [`Client::build_request`] returns.
    pub fn build_request_with_query<Q, B>(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<reqwest::Request>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let Some(query) = query else {
            return self.build_request(ctx, method, path, body);
        };

        let pairs = encode_query(query)?;
        if pairs.is_empty() {
            return self.build_request(ctx, method, path, body);
        }

        let separator = if path.contains('?') { '&' } else { '?' };
        let path = format!("{}{}{}", path, separator, to_query_string(&pairs));
        self.build_request(ctx, method, &path, body)
    }

    /// Sends `request` and discards the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpError`] for any status other than `200 OK`,
    /// [`Error::Timeout`] when the deadline of `ctx` elapses (the request
    /// is not sent at all if it already has), and
    /// [`Error::Transport`] for network failures.
    pub async fn execute(&self, ctx: &Context, request: reqwest::Request) -> Result<Response<()>> {
        let (response, _body) = self.round_trip(ctx, request).await?;
        Ok(response)
    }

    /// Sends `request` and decodes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// As [`Client::execute`], plus [`Error::DeserializationFailed`] when the
    /// body does not match `T`.
    pub async fn execute_json<T>(
        &self,
        ctx: &Context,
        request: reqwest::Request,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let (response, body) = self.round_trip(ctx, request).await?;

        match serde_json::from_slice::<T>(&body) {
            Ok(data) => Ok(response.map(|()| data)),
            Err(e) => Err(Error::DeserializationFailed {
                raw_response: String::from_utf8_lossy(&body).into_owned(),
                serde_error: e.to_string(),
                status: response.status,
            }),
        }
    }

    /// Sends `request` and copies the body verbatim into `sink`.
    ///
    /// The returned data is the number of bytes written.
    ///
    /// # Errors
    ///
    /// As [`Client::execute`], plus [`Error::Io`] if writing to `sink` fails.
    pub async fn execute_into<W>(
        &self,
        ctx: &Context,
        request: reqwest::Request,
        sink: &mut W,
    ) -> Result<Response<u64>>
    where
        W: Write + ?Sized,
    {
        let (response, body) = self.round_trip(ctx, request).await?;
        sink.write_all(&body)?;
        sink.flush()?;
        Ok(response.map(|()| body.len() as u64))
    }

    /// Performs one request/response exchange and enforces the `200 OK`
    /// contract. The body is read exactly once.
    ///
    /// The time left on `ctx` is taken at dispatch, so a request built
    /// earlier cannot outlive the context's deadline.
    async fn round_trip(
        &self,
        ctx: &Context,
        mut request: reqwest::Request,
    ) -> Result<(Response<()>, Vec<u8>)> {
        if ctx.is_expired() {
            return Err(Error::Timeout);
        }
        let timeout = ctx.remaining().or(request.timeout().copied());
        *request.timeout_mut() = timeout;

        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(method = %method, url = %url, "Executing HTTP request");

        let start_time = Instant::now();
        let exchange = async {
            let response = self.inner.http_client.execute(request).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| Error::Timeout)?,
            None => exchange.await,
        };
        let (status, headers, body) = outcome.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::Transport(e)
            }
        })?;
        let latency = start_time.elapsed();

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        if status != StatusCode::OK {
            let raw_response = String::from_utf8_lossy(&body).into_owned();
            return Err(Error::HttpError {
                response: Box::new(Response::new(
                    raw_response,
                    method,
                    url,
                    status,
                    headers,
                    latency,
                )),
            });
        }

        Ok((
            Response::new((), method, url, status, headers, latency),
            body.to_vec(),
        ))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::RequestConstruction(format!("invalid header value: {}", e)))
}

/// Builder for configuring and creating a [`Client`].
///
/// Settings are applied in call order; a later call overrides an earlier one.
/// Nothing is validated until a request is built.
///
/// # Examples
///
/// ```no_run
/// use affise::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), affise::Error> {
/// let client = ClientBuilder::new()
///     .endpoint("https://api-example.affise.com")
///     .api_key("secret")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    endpoint: String,
    api_key: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        }
    }

    /// Sets the API endpoint. Trailing slashes are removed.
    pub fn endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.endpoint = endpoint.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Sets the API key sent in the `API-Key` header.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the timeout used when a call's [`Context`] has no deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                endpoint: self.endpoint,
                api_key: self.api_key,
                user_agent: self.user_agent,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn client() -> Client {
        Client::builder()
            .endpoint("https://api.example.com")
            .api_key("key-123")
            .build()
            .unwrap()
    }

    #[derive(Serialize)]
    struct Filter {
        q: Option<String>,
        os: Vec<String>,
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let client = Client::builder()
            .endpoint("https://x.com/")
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "https://x.com");

        let client = Client::builder()
            .endpoint("https://x.com///")
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "https://x.com");
    }

    #[test]
    fn test_defaults() {
        let client = Client::new().unwrap();
        assert_eq!(client.endpoint(), "");
        assert_eq!(client.api_key(), "");
        assert_eq!(client.user_agent(), USER_AGENT);
        assert!(USER_AGENT.starts_with("affise-rs/"));
    }

    #[test]
    fn test_later_settings_override_earlier_ones() {
        let client = Client::builder()
            .api_key("first")
            .endpoint("https://one.example.com")
            .api_key("second")
            .endpoint("https://two.example.com/")
            .build()
            .unwrap();
        assert_eq!(client.api_key(), "second");
        assert_eq!(client.endpoint(), "https://two.example.com");
    }

    #[test]
    fn test_request_headers_without_body() {
        let request = client()
            .build_request::<()>(&Context::background(), Method::GET, "/offer/5", None)
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://api.example.com/offer/5");
        assert_eq!(request.headers()[header::USER_AGENT], USER_AGENT);
        assert_eq!(request.headers()[API_KEY_HEADER], "key-123");
        assert!(request.headers().get(header::CONTENT_TYPE).is_none());
        assert!(request.body().is_none());
        assert!(request.timeout().is_none());
    }

    #[test]
    fn test_request_with_body_sets_content_type() {
        let body = serde_json::json!({ "title": "new offer" });
        let request = client()
            .build_request(&Context::background(), Method::POST, "/offer", Some(&body))
            .unwrap();

        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(bytes, br#"{"title":"new offer"}"#);
    }

    #[test]
    fn test_path_is_joined_verbatim() {
        let request = client()
            .build_request::<()>(&Context::background(), Method::GET, "//offers", None)
            .unwrap();
        assert_eq!(request.url().path(), "//offers");
    }

    #[test]
    fn test_malformed_endpoint_fails_at_request_time() {
        let client = Client::builder().endpoint("not a url").build().unwrap();
        let err = client
            .build_request::<()>(&Context::background(), Method::GET, "/offers", None)
            .unwrap_err();
        assert!(matches!(err, Error::RequestConstruction(_)));
    }

    #[test]
    fn test_invalid_api_key_header() {
        let client = Client::builder()
            .endpoint("https://api.example.com")
            .api_key("bad\nkey")
            .build()
            .unwrap();
        let err = client
            .build_request::<()>(&Context::background(), Method::GET, "/offers", None)
            .unwrap_err();
        assert!(matches!(err, Error::RequestConstruction(_)));
    }

    #[test]
    fn test_context_deadline_becomes_request_timeout() {
        let ctx = Context::with_timeout(Duration::from_secs(10));
        let request = client()
            .build_request::<()>(&ctx, Method::GET, "/offers", None)
            .unwrap();
        let timeout = request.timeout().copied().unwrap();
        assert!(timeout <= Duration::from_secs(10));

        let client = Client::builder()
            .endpoint("https://api.example.com")
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        let request = client
            .build_request::<()>(&Context::background(), Method::GET, "/offers", None)
            .unwrap();
        assert_eq!(request.timeout(), Some(&Duration::from_secs(3)));
    }

    #[test]
    fn test_query_is_appended() {
        let filter = Filter {
            q: Some("shoes".into()),
            os: vec!["iOS".into(), "Android".into()],
        };
        let request = client()
            .build_request_with_query::<_, ()>(
                &Context::background(),
                Method::GET,
                "/offers",
                Some(&filter),
                None,
            )
            .unwrap();
        assert_eq!(request.url().query(), Some("os=iOS&os=Android&q=shoes"));
    }

    #[test]
    fn test_empty_or_missing_query_leaves_path_alone() {
        let filter = Filter { q: None, os: vec![] };
        let request = client()
            .build_request_with_query::<_, ()>(
                &Context::background(),
                Method::GET,
                "/offers",
                Some(&filter),
                None,
            )
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.example.com/offers");

        let request = client()
            .build_request_with_query::<Filter, ()>(
                &Context::background(),
                Method::GET,
                "/offers",
                None,
                None,
            )
            .unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_query_joins_existing_query() {
        let filter = Filter {
            q: Some("x".into()),
            os: vec![],
        };
        let request = client()
            .build_request_with_query::<_, ()>(
                &Context::background(),
                Method::GET,
                "/offers?page=2",
                Some(&filter),
                None,
            )
            .unwrap();
        assert_eq!(request.url().query(), Some("page=2&q=x"));
    }

    #[test]
    fn test_unencodable_query_is_rejected() {
        let nested = serde_json::json!({ "filter": { "os": "iOS" } });
        let err = client()
            .build_request_with_query::<_, ()>(
                &Context::background(),
                Method::GET,
                "/offers",
                Some(&nested),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, Error::QueryEncoding(_)));
    }
}
