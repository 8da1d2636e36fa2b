//! The response envelope returned by every non-binary BshEngine endpoint.
//!
//! The [`Envelope`] type mirrors the backend wire format exactly. Whether a
//! call succeeded is decided by [`Envelope::is_ok`], which looks only at
//! `code`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// A decoded BshEngine response body.
///
/// # Examples
///
/// ```
/// use bshengine::Envelope;
///
/// let envelope: Envelope = serde_json::from_str(
///     r#"{"data":[{"id":1}],"code":200,"status":"OK","error":""}"#,
/// ).unwrap();
///
/// assert!(envelope.is_ok());
/// assert_eq!(envelope.data.len(), 1);
/// assert!(envelope.pagination.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// The result items. May be empty.
    pub data: Vec<T>,

    /// Numeric status code mirroring the transport status.
    pub code: u16,

    /// Human-readable status text.
    pub status: String,

    /// Error text, empty when there is no error.
    #[serde(default)]
    pub error: String,

    /// When the envelope was produced, in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,

    /// Free-form diagnostics such as the executed query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Field-level validation failures. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<Vec<Validation>>,

    /// The request path that produced this envelope.
    ///
    /// Set when the envelope is wrapped in an [`Error`](crate::Error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Page position of a paginated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub current: u64,
    pub total: u64,
    pub pages: u64,
    pub first: bool,
    pub last: bool,
}

/// Diagnostic information attached by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub field: String,
    pub error: String,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            code: 200,
            status: String::new(),
            error: String::new(),
            timestamp: None,
            pagination: None,
            meta: None,
            validations: None,
            endpoint: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Returns `true` if `code` lies in `[200, 300)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bshengine::Envelope;
    ///
    /// let mut envelope = Envelope::<()>::default();
    /// envelope.code = 299;
    /// assert!(envelope.is_ok());
    /// envelope.code = 300;
    /// assert!(!envelope.is_ok());
    /// ```
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Returns the first data item, if any.
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    /// Maps every data item while keeping the rest of the envelope.
    pub fn map_data<U, F>(self, f: F) -> Envelope<U>
    where
        F: FnMut(T) -> U,
    {
        Envelope {
            data: self.data.into_iter().map(f).collect(),
            code: self.code,
            status: self.status,
            error: self.error,
            timestamp: self.timestamp,
            pagination: self.pagination,
            meta: self.meta,
            validations: self.validations,
            endpoint: self.endpoint,
        }
    }
}

impl Envelope<Value> {
    /// Converts loosely typed items into `T`.
    pub(crate) fn into_typed<T>(self) -> Result<Envelope<T>, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        let data = self
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Envelope {
            data,
            code: self.code,
            status: self.status,
            error: self.error,
            timestamp: self.timestamp,
            pagination: self.pagination,
            meta: self.meta,
            validations: self.validations,
            endpoint: self.endpoint,
        })
    }
}

/// Free-function form of [`Envelope::is_ok`].
pub fn is_ok<T>(envelope: &Envelope<T>) -> bool {
    envelope.is_ok()
}
