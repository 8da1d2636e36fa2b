//! The request pipeline.
//!
//! [`Client`] composes auth resolution, the interceptor chains, the transport
//! call and envelope decoding into one contract shared by every verb. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::{
    auth::{self, AuthProvider},
    dispatch::{CallOptions, Outcome},
    interceptor::Interceptors,
    metadata::{Bypass, RequestDescriptor, RequestOptions},
    transport::{Transport, TransportResponse},
    Envelope, Error, Result,
};
use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A BshEngine API client.
///
/// Cloning is cheap; clones share the transport, auth provider and
/// interceptor registry. Concurrent calls on one client share no per-call
/// state.
///
/// # Examples
///
/// ```no_run
/// use bshengine::{auth::StaticAuth, transport::ReqwestTransport, CallOptions, Client, RequestOptions};
///
/// # async fn example() -> Result<(), bshengine::Error> {
/// let client = Client::builder()
///     .host("https://api.example.com")
///     .transport(ReqwestTransport::new()?)
///     .auth(StaticAuth::jwt("token"))
///     .build()?;
///
/// let envelope = client
///     .get::<serde_json::Value>("/api/tenants/1", RequestOptions::new(), CallOptions::new())
///     .await?;
/// println!("{:?}", envelope);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    host: String,
    transport: Arc<dyn Transport>,
    auth: Option<Arc<dyn AuthProvider>>,
    interceptors: Arc<Interceptors>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The host every path is appended to.
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// The interceptor registry this client runs.
    pub fn interceptors(&self) -> &Arc<Interceptors> {
        &self.inner.interceptors
    }

    /// Returns `true` if both handles refer to the same client instance.
    pub fn ptr_eq(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Makes a GET request.
    pub async fn get<T>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::GET, path, options, call)
            .await?
            .into_result()
    }

    /// Makes a POST request.
    pub async fn post<T>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, options, call)
            .await?
            .into_result()
    }

    /// Makes a PUT request.
    pub async fn put<T>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, path, options, call)
            .await?
            .into_result()
    }

    /// Makes a PATCH request.
    pub async fn patch<T>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::PATCH, path, options, call)
            .await?
            .into_result()
    }

    /// Makes a DELETE request.
    pub async fn delete<T>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::DELETE, path, options, call)
            .await?
            .into_result()
    }

    /// Downloads a binary body.
    ///
    /// The method is left as given in `options` (`GET` when unset). Success
    /// bodies are returned raw; failures go through the same status error
    /// path as the other verbs.
    pub async fn download(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Bytes>,
    ) -> Result<Option<Bytes>> {
        let path = path.into();
        let bypass = call.bypass;
        let response = self.send(None, &path, options, bypass).await?;

        let result = if response.is_success() {
            Ok(response.blob())
        } else {
            Err(self.status_error(&path, response, bypass).await?)
        };

        call.dispatch(result).into_result()
    }

    /// Runs one request through the pipeline and dispatches the result.
    ///
    /// Status failures (non-2xx) are dispatched to `on_error` or returned as
    /// [`Outcome::Failed`]. Everything that aborts the pipeline itself is
    /// returned as `Err`: transport exceptions, auth provider failures,
    /// interceptor rejections and undecodable success bodies.
    pub async fn execute<T>(
        &self,
        method: Method,
        path: impl Into<String>,
        options: RequestOptions,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Outcome<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        let path = path.into();
        let bypass = call.bypass;
        let response = self.send(Some(method), &path, options, bypass).await?;

        let result = if response.is_success() {
            let envelope = response.json::<Envelope<Value>>()?;
            let envelope = if bypass.post {
                tracing::debug!(path = %path, "Bypassing post interceptors");
                envelope
            } else {
                self.inner.interceptors.run_post(envelope).await?
            };
            Ok(typed(envelope, &response)?)
        } else {
            Err(self.status_error(&path, response, bypass).await?)
        };

        Ok(call.dispatch(result))
    }

    /// Builds the final descriptor and makes the single transport call.
    async fn send(
        &self,
        method: Option<Method>,
        path: &str,
        mut options: RequestOptions,
        bypass: Bypass,
    ) -> Result<TransportResponse> {
        // Caller headers win over the auth header of the same key.
        if let Some((name, value)) = auth::resolve(self.inner.auth.as_deref()).await? {
            options.headers.entry(name.to_string()).or_insert(value);
        }
        if method.is_some() {
            options.method = method;
        }

        let mut request = RequestDescriptor {
            path: format!("{}{}", self.inner.host, path),
            options,
            bypass,
        };

        if bypass.pre {
            tracing::debug!(path = %path, "Bypassing pre interceptors");
        } else {
            request = self.inner.interceptors.run_pre(request).await?;
        }

        let method = request.method();
        tracing::debug!(method = %method, url = %request.path, "Sending request");

        let start_time = Instant::now();
        let response = self.inner.transport.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, method = %method, path = %path, "Transport failed");
            e
        })?;

        tracing::info!(
            status = response.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Received HTTP response"
        );

        Ok(response)
    }

    /// Turns a non-2xx response into an [`Error`] and runs the error chain.
    async fn status_error(
        &self,
        path: &str,
        response: TransportResponse,
        bypass: Bypass,
    ) -> Result<Error> {
        let status = response.status;

        if status.is_client_error() {
            tracing::error!(status = status.as_u16(), path = %path, "Client error (4xx)");
        } else if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), path = %path, "Server error (5xx)");
        }

        let envelope = match serde_json::from_slice::<Envelope<Value>>(&response.body) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                tracing::debug!(error = %e, "Error body is not an envelope");
                None
            }
        };

        let error = Error::http(status, path, envelope);
        if bypass.error {
            tracing::debug!(path = %path, "Bypassing error interceptors");
            Ok(error)
        } else {
            self.inner.interceptors.run_error(error).await
        }
    }
}

fn typed<T: DeserializeOwned>(
    envelope: Envelope<Value>,
    response: &TransportResponse,
) -> Result<Envelope<T>> {
    envelope
        .into_typed()
        .map_err(|e| Error::DeserializationFailed {
            raw_response: response.text(),
            serde_error: e.to_string(),
            status: response.status,
        })
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.inner.host)
            .field("auth", &self.inner.auth.is_some())
            .field("interceptors", &self.inner.interceptors)
            .finish()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```
/// use bshengine::{transport::TransportResponse, Client};
/// use http::StatusCode;
///
/// let client = Client::builder()
///     .host("http://localhost:3000")
///     .transport(|_request| async {
///         Ok(TransportResponse::new(StatusCode::NO_CONTENT, ""))
///     })
///     .build()
///     .unwrap();
/// assert_eq!(client.host(), "http://localhost:3000");
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    host: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    interceptors: Option<Arc<Interceptors>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host prepended to every path, verbatim.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the transport that performs the network call.
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Sets a transport shared with other clients.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the auth provider. Without one no auth header is sent.
    pub fn auth(self, auth: impl AuthProvider + 'static) -> Self {
        self.shared_auth(Arc::new(auth))
    }

    /// Sets an auth provider shared with other clients.
    pub fn shared_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Shares an existing interceptor registry with the client.
    pub fn interceptors(mut self, interceptors: Arc<Interceptors>) -> Self {
        self.interceptors = Some(interceptors);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no host or no transport was provided.
    pub fn build(self) -> Result<Client> {
        let host = self
            .host
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::Configuration("Host is required".to_string()))?;
        let transport = self
            .transport
            .ok_or_else(|| Error::Configuration("Transport is required".to_string()))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                host,
                transport,
                auth: self.auth,
                interceptors: self.interceptors.unwrap_or_default(),
            }),
        })
    }
}
