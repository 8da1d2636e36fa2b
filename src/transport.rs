//! The transport seam: the pipeline's only I/O dependency.
//!
//! A [`Transport`] receives the final [`RequestDescriptor`] (with `path`
//! already an absolute URL) and returns a fully buffered
//! [`TransportResponse`]. [`ReqwestTransport`] is the default implementation;
//! tests and embedders can supply their own, including plain async closures.

use crate::{
    metadata::{Body, FormPart, RequestDescriptor},
    Error, Result,
};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Performs the network call for one request.
///
/// Exactly one `send` happens per public pipeline call. Returning `Err`
/// means the transport failed before a status was available.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse>;
}

#[async_trait]
impl<F, Fut> Transport for F
where
    F: Fn(RequestDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse>> + Send + 'static,
{
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        (self)(request).await
    }
}

/// A buffered transport response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// A response whose body is `value` encoded as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use bshengine::transport::TransportResponse;
    /// use http::StatusCode;
    ///
    /// let response = TransportResponse::json_body(
    ///     StatusCode::OK,
    ///     &serde_json::json!({"data": [], "code": 200, "status": "OK", "error": ""}),
    /// )
    /// .unwrap();
    /// assert!(response.is_success());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `value` cannot be encoded.
    pub fn json_body<T: serde::Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(|e| {
            tracing::warn!(error = %e, "Failed to serialize response body");
            Error::SerializationFailed(e.to_string())
        })?;
        Ok(Self::new(status, body))
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let raw_response = self.text();
            tracing::error!(
                error = %e,
                raw_response = %raw_response,
                "Failed to deserialize response"
            );
            Error::DeserializationFailed {
                raw_response,
                serde_error: e.to_string(),
                status: self.status,
            }
        })
    }

    /// Returns the body as raw bytes.
    pub fn blob(self) -> Bytes {
        self.body
    }

    /// Returns the body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A [`Transport`] backed by `reqwest`.
///
/// # Examples
///
/// ```no_run
/// use bshengine::transport::ReqwestTransport;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), bshengine::Error> {
/// let transport = ReqwestTransport::builder()
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// A transport with no default headers and no timeout.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        let method = request.method();
        let mut url = Url::parse(&request.path)?;

        if !request.options.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.options.query_params {
                pairs.append_pair(key, value);
            }
        }

        tracing::debug!(method = %method, url = %url, "Executing HTTP request");

        let mut builder = self.http_client.request(method, url);

        // Request headers replace defaults of the same name.
        let mut headers = self.default_headers.clone();
        let multipart = matches!(request.options.body, Some(Body::Form(_)));
        for (name, value) in &request.options.headers {
            // reqwest writes the multipart content type with its boundary.
            if multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::InvalidHeader(format!("Invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::InvalidHeader(format!("Invalid value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }
        builder = builder.headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.options.body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Bytes(bytes)) => builder.body(bytes),
            Some(Body::Form(parts)) => builder.multipart(multipart_form(parts)?),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn multipart_form(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                content_type,
                content,
            } => {
                let mut file = reqwest::multipart::Part::bytes(content.to_vec()).file_name(file_name);
                if let Some(content_type) = content_type {
                    file = file.mime_str(&content_type)?;
                }
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

/// Builder for [`ReqwestTransport`].
pub struct ReqwestTransportBuilder {
    http_client: Option<reqwest::Client>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ReqwestTransportBuilder {
    pub fn new() -> Self {
        Self {
            http_client: None,
            default_headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Uses an existing `reqwest::Client` instead of building one.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Adds a default header sent before any request-specific header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::InvalidHeader(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::InvalidHeader(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ReqwestTransport> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        Ok(ReqwestTransport {
            http_client,
            default_headers: self.default_headers,
            timeout: self.timeout,
        })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
