//! Interceptor hooks run by the request pipeline.
//!
//! There are three independent chains:
//!
//! - **pre** interceptors transform the outgoing [`RequestDescriptor`],
//! - **post** interceptors transform the decoded success [`Envelope`],
//! - **error** interceptors transform the [`Error`] built from a non-2xx status.
//!
//! Each chain runs in registration order, every interceptor receiving the
//! previous one's output. Returning `Err` from any interceptor aborts the call
//! with that error.
//!
//! # Examples
//!
//! ```
//! use bshengine::interceptor::Interceptors;
//! use bshengine::metadata::RequestDescriptor;
//!
//! let interceptors = Interceptors::new();
//! interceptors.pre(|mut request: RequestDescriptor| async move {
//!     request.options.headers.insert("X-Trace-Id".into(), "abc".into());
//!     Ok(request)
//! });
//! assert_eq!(interceptors.pre_len(), 1);
//! ```

use crate::{metadata::RequestDescriptor, Envelope, Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

/// Transforms a request before it is handed to the transport.
#[async_trait]
pub trait PreInterceptor: Send + Sync {
    async fn intercept(&self, request: RequestDescriptor) -> Result<RequestDescriptor>;
}

/// Transforms a decoded success envelope.
#[async_trait]
pub trait PostInterceptor: Send + Sync {
    async fn intercept(&self, response: Envelope<Value>) -> Result<Envelope<Value>>;
}

/// Transforms a status error before it is dispatched.
#[async_trait]
pub trait ErrorInterceptor: Send + Sync {
    async fn intercept(&self, error: Error) -> Result<Error>;
}

#[async_trait]
impl<F, Fut> PreInterceptor for F
where
    F: Fn(RequestDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestDescriptor>> + Send + 'static,
{
    async fn intercept(&self, request: RequestDescriptor) -> Result<RequestDescriptor> {
        (self)(request).await
    }
}

#[async_trait]
impl<F, Fut> PostInterceptor for F
where
    F: Fn(Envelope<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Envelope<Value>>> + Send + 'static,
{
    async fn intercept(&self, response: Envelope<Value>) -> Result<Envelope<Value>> {
        (self)(response).await
    }
}

#[async_trait]
impl<F, Fut> ErrorInterceptor for F
where
    F: Fn(Error) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Error>> + Send + 'static,
{
    async fn intercept(&self, error: Error) -> Result<Error> {
        (self)(error).await
    }
}

/// The registry of interceptor chains.
///
/// Registration takes `&self` and may happen at any time; a call in flight
/// keeps the chain it started with. Registering the same interceptor twice
/// runs it twice.
#[derive(Default)]
pub struct Interceptors {
    pre: RwLock<Vec<Arc<dyn PreInterceptor>>>,
    post: RwLock<Vec<Arc<dyn PostInterceptor>>>,
    error: RwLock<Vec<Arc<dyn ErrorInterceptor>>>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pre-request interceptor.
    pub fn pre(&self, interceptor: impl PreInterceptor + 'static) {
        self.add_pre(Arc::new(interceptor));
    }

    /// Appends a post-response interceptor.
    pub fn post(&self, interceptor: impl PostInterceptor + 'static) {
        self.add_post(Arc::new(interceptor));
    }

    /// Appends an error interceptor.
    pub fn error(&self, interceptor: impl ErrorInterceptor + 'static) {
        self.add_error(Arc::new(interceptor));
    }

    pub fn add_pre(&self, interceptor: Arc<dyn PreInterceptor>) {
        self.pre
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(interceptor);
    }

    pub fn add_post(&self, interceptor: Arc<dyn PostInterceptor>) {
        self.post
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(interceptor);
    }

    pub fn add_error(&self, interceptor: Arc<dyn ErrorInterceptor>) {
        self.error
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(interceptor);
    }

    pub fn pre_len(&self) -> usize {
        snapshot(&self.pre).len()
    }

    pub fn post_len(&self) -> usize {
        snapshot(&self.post).len()
    }

    pub fn error_len(&self) -> usize {
        snapshot(&self.error).len()
    }

    /// Removes every registered interceptor from all three chains.
    pub fn clear(&self) {
        self.pre.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.post.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.error.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub(crate) async fn run_pre(&self, mut request: RequestDescriptor) -> Result<RequestDescriptor> {
        for (index, interceptor) in snapshot(&self.pre).iter().enumerate() {
            tracing::trace!(index, chain = "pre", "Running interceptor");
            request = interceptor.intercept(request).await?;
        }
        Ok(request)
    }

    pub(crate) async fn run_post(&self, mut response: Envelope<Value>) -> Result<Envelope<Value>> {
        for (index, interceptor) in snapshot(&self.post).iter().enumerate() {
            tracing::trace!(index, chain = "post", "Running interceptor");
            response = interceptor.intercept(response).await?;
        }
        Ok(response)
    }

    pub(crate) async fn run_error(&self, mut error: Error) -> Result<Error> {
        for (index, interceptor) in snapshot(&self.error).iter().enumerate() {
            tracing::trace!(index, chain = "error", "Running interceptor");
            error = interceptor.intercept(error).await?;
        }
        Ok(error)
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("pre", &self.pre_len())
            .field("post", &self.post_len())
            .field("error", &self.error_len())
            .finish()
    }
}

// Clones the chain so no lock is held across an await.
fn snapshot<T: ?Sized>(chain: &RwLock<Vec<Arc<T>>>) -> Vec<Arc<T>> {
    chain.read().unwrap_or_else(PoisonError::into_inner).clone()
}
