//! Error types for BshEngine API calls.
//!
//! Every failure a caller can observe from the SDK is an [`Error`]. Status
//! failures keep the decoded envelope the backend sent so callers can inspect
//! `status`, `error` and field-level validations.

use crate::response::Envelope;
use http::StatusCode;
use serde_json::Value;

/// The main error type for BshEngine API calls.
///
/// # Examples
///
/// ```
/// use bshengine::{Envelope, Error};
/// use http::StatusCode;
///
/// let envelope: Envelope = serde_json::from_str(
///     r#"{"data":[],"code":404,"status":"Not Found","error":"missing"}"#,
/// ).unwrap();
///
/// let err = Error::http(StatusCode::NOT_FOUND, "/api/tenants/1", Some(envelope));
/// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
/// assert_eq!(err.endpoint(), Some("/api/tenants/1"));
/// assert_eq!(err.response().unwrap().endpoint.as_deref(), Some("/api/tenants/1"));
/// assert!(err.to_string().contains("missing"));
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The backend answered with a non-2xx status.
    ///
    /// `endpoint` is the caller path (before the host was prepended) and
    /// `response` is the decoded error envelope, when the body was one.
    #[error("{}", http_message(.status, .endpoint, .response.as_deref()))]
    Http {
        /// The HTTP status code
        status: StatusCode,
        /// The request path that produced the error
        endpoint: String,
        /// The decoded error envelope, with `endpoint` back-filled
        response: Option<Box<Envelope<Value>>>,
    },

    /// The default transport failed before a status was available.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A custom transport failed before a status was available.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The auth provider could not produce credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// An interceptor rejected the call.
    #[error("Interceptor error: {0}")]
    Interceptor(String),

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

    /// Failed to serialize a request payload.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Missing or invalid SDK configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A header name or value could not be sent.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// An invalid URL was produced from host and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Builds a status error, attaching `endpoint` to the envelope as well.
    pub fn http(
        status: StatusCode,
        endpoint: impl Into<String>,
        response: Option<Envelope<Value>>,
    ) -> Self {
        let endpoint = endpoint.into();
        let response = response.map(|mut envelope| {
            envelope.endpoint = Some(endpoint.clone());
            Box::new(envelope)
        });
        Error::Http {
            status,
            endpoint,
            response,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the request path of a status error.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Error::Http { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Returns the decoded error envelope of a status error.
    pub fn response(&self) -> Option<&Envelope<Value>> {
        match self {
            Error::Http { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if the transport failed before any status was produced.
    ///
    /// These errors skip the error interceptor chain and the `on_error`
    /// callback.
    pub fn is_transport_exception(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Transport(_))
    }
}

fn http_message(status: &StatusCode, endpoint: &str, response: Option<&Envelope<Value>>) -> String {
    match response {
        Some(envelope) if !envelope.error.is_empty() => format!(
            "HTTP error {} on {}: {} - {}",
            status.as_u16(),
            endpoint,
            envelope.status,
            envelope.error
        ),
        Some(envelope) => format!(
            "HTTP error {} on {}: {}",
            status.as_u16(),
            endpoint,
            envelope.status
        ),
        None => format!("HTTP error {} on {}", status, endpoint),
    }
}

/// A specialized `Result` type for BshEngine API calls.
pub type Result<T> = std::result::Result<T, Error>;
