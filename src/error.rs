//! Error types for Affise API calls.
//!
//! Every failure is handed back to the caller untouched: nothing here is
//! retried, swallowed, or logged. Non-200 responses keep their full
//! [`Response`] envelope so headers and status stay inspectable.

use crate::Response;
use http::StatusCode;

/// The main error type for Affise API calls.
///
/// # Examples
///
/// ```no_run
/// use affise::{Client, Context, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .endpoint("https://api-example.affise.com")
///     .api_key("secret")
///     .build()?;
///
/// match client.offers().get_by_id(&Context::background(), 42).await {
///     Ok(response) => println!("Offer: {:?}", response.data),
///     Err(Error::HttpError { response }) => {
///         eprintln!("{} {} answered {}", response.method, response.url, response.status);
///         eprintln!("Body: {}", response.data);
///     }
///     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
///         eprintln!("Failed to decode {}: {}", raw_response, serde_error);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be assembled (bad URL, bad header value).
    ///
    /// Nothing was sent.
    #[error("Failed to construct request: {0}")]
    RequestConstruction(String),

    /// A filter struct could not be mapped onto query parameters.
    ///
    /// Nothing was sent.
    #[error("Failed to encode query parameters: {0}")]
    QueryEncoding(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// A network-level error occurred (connection refused, DNS lookup failed, etc.).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call's deadline or the client timeout elapsed before the response
    /// was fully read.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with anything other than `200 OK`.
    ///
    /// The envelope carries the method, URL, status, headers and the raw
    /// body text of the rejected response.
    #[error("{} {}: {}", .response.method, .response.url, .response.status)]
    HttpError {
        /// The response, with the raw body as its data
        response: Box<Response<String>>,
    },

    /// Failed to deserialize the response body into the expected type.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Copying the body into a caller-supplied sink failed.
    #[error("Failed to write response body: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying HTTP client could not be created.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { response } => Some(response.status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { response } => Some(&response.data),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the envelope of a non-200 response.
    pub fn response(&self) -> Option<&Response<String>> {
        match self {
            Error::HttpError { response } => Some(response),
            _ => None,
        }
    }

    /// Returns `true` if the request never left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::RequestConstruction(_)
                | Error::QueryEncoding(_)
                | Error::SerializationFailed(_)
                | Error::Configuration(_)
        )
    }
}

/// A specialized `Result` type for Affise API calls.
pub type Result<T> = std::result::Result<T, Error>;
