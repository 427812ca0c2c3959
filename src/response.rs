//! Response envelope pairing decoded data with transport details.
//!
//! A [`Response`] is produced once per round trip. It owns the decoded payload
//! together with the request method and URL, the status, the headers and the
//! observed latency.

use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// A response from the Affise API.
///
/// # Type Parameters
///
/// * `T` - The decoded payload. `()` when the body was discarded, `u64` when
///   it was copied into a sink, `String` for a rejected response.
///
/// # Examples
///
/// ```no_run
/// use affise::{Client, Context};
///
/// # async fn example() -> Result<(), affise::Error> {
/// let client = Client::builder()
///     .endpoint("https://api-example.affise.com")
///     .api_key("secret")
///     .build()?;
///
/// let response = client.offers().get_by_id(&Context::background(), 1).await?;
///
/// println!("Offer: {:?}", response.data);
/// println!("Request took {:?}", response.latency);
/// println!("Content-Type: {:?}", response.header("content-type"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The method of the request that produced this response.
    pub method: Method,

    /// The URL the request was sent to.
    pub url: Url,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from dispatch until the body was fully read.
    pub latency: Duration,
}

impl<T> Response<T> {
    pub fn new(
        data: T,
        method: Method,
        url: Url,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            method,
            url,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// Resource clients use this to unwrap the API's `{status, ...}` wrappers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use affise::Response;
    /// # use http::{HeaderMap, Method, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     Method::GET,
    ///     url::Url::parse("https://api.example.com/offers").unwrap(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            method: self.method,
            url: self.url,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Splits off the data, leaving an envelope without a payload.
    pub fn into_parts(self) -> (T, Response<()>) {
        let Response {
            data,
            method,
            url,
            status,
            headers,
            latency,
        } = self;
        (
            data,
            Response::new((), method, url, status, headers, latency),
        )
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
