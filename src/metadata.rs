//! Request descriptor types passed through the pipeline.

use bytes::Bytes;
use http::Method;
use serde::Serialize;
use std::collections::HashMap;

/// Expected shape of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Json,
    Blob,
}

/// Encoding of the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Form,
}

/// A request payload. Its shape follows [`RequestFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Form(Vec<FormPart>),
    Bytes(Bytes),
}

impl Body {
    /// Serializes `payload` into a JSON body.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> crate::Result<Self> {
        serde_json::to_value(payload)
            .map(Body::Json)
            .map_err(|e| crate::Error::SerializationFailed(e.to_string()))
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: Option<String>,
        content: Bytes,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Transport-level options for a request.
///
/// Header keys are kept exactly as given; inserting the same key twice keeps
/// the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// The HTTP method. Set by the pipeline from the verb being called.
    pub method: Option<Method>,

    pub headers: HashMap<String, String>,

    pub body: Option<Body>,

    pub query_params: HashMap<String, String>,

    pub response_type: Option<ResponseType>,

    pub request_format: Option<RequestFormat>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a JSON request carrying `payload`.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> crate::Result<Self> {
        Ok(Self::new()
            .with_header("Content-Type", "application/json")
            .with_body(Body::json(payload)?)
            .with_request_format(RequestFormat::Json)
            .with_response_type(ResponseType::Json))
    }

    /// Adds a header to the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query_params.extend(params);
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    pub fn with_request_format(mut self, request_format: RequestFormat) -> Self {
        self.request_format = Some(request_format);
        self
    }
}

/// Per-call switches that skip whole interceptor chains.
///
/// Skipping a chain affects only the call it is passed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bypass {
    pub pre: bool,
    pub post: bool,
    pub error: bool,
}

impl Bypass {
    /// Bypasses nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Bypasses all three chains.
    pub fn all() -> Self {
        Self {
            pre: true,
            post: true,
            error: true,
        }
    }
}

/// The unit passed through the pipeline and handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Caller path before the pipeline runs; `host + path` once the
    /// descriptor is built.
    pub path: String,

    pub options: RequestOptions,

    pub bypass: Bypass,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            path: path.into(),
            options,
            bypass: Bypass::default(),
        }
    }

    /// The method sent to the transport, `GET` when unset.
    pub fn method(&self) -> Method {
        self.options.method.clone().unwrap_or(Method::GET)
    }

    /// Returns a header value by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.options.headers.get(name).map(String::as_str)
    }
}
