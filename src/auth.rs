//! Authentication strategies and the per-request header resolver.
//!
//! An [`AuthProvider`] is asked for an [`AuthStrategy`] once per request; the
//! strategy maps to exactly one header. Providers may cache internally and
//! refresh tokens when necessary.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Header carrying a JWT bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "X-BSH-APIKEY";

/// How a single outgoing request is authenticated.
///
/// Serialized with the backend's tagging, e.g. `{"type":"JWT","token":"..."}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "token")]
pub enum AuthStrategy {
    /// Sent as `Authorization: Bearer <token>`.
    #[serde(rename = "JWT")]
    Jwt(String),
    /// Sent as `X-BSH-APIKEY: <token>`.
    #[serde(rename = "APIKEY")]
    ApiKey(String),
}

impl AuthStrategy {
    /// Returns the header name and value this strategy produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use bshengine::auth::AuthStrategy;
    ///
    /// let (name, value) = AuthStrategy::Jwt("abc".into()).header();
    /// assert_eq!(name, "Authorization");
    /// assert_eq!(value, "Bearer abc");
    ///
    /// let (name, value) = AuthStrategy::ApiKey("k".into()).header();
    /// assert_eq!(name, "X-BSH-APIKEY");
    /// assert_eq!(value, "k");
    /// ```
    pub fn header(&self) -> (&'static str, String) {
        match self {
            AuthStrategy::Jwt(token) => (AUTHORIZATION_HEADER, format!("Bearer {}", token)),
            AuthStrategy::ApiKey(token) => (API_KEY_HEADER, token.clone()),
        }
    }
}

// Tokens never reach logs.
impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStrategy::Jwt(_) => f.write_str("Jwt(<redacted>)"),
            AuthStrategy::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// Supplies credentials for outgoing requests.
///
/// Implemented for async closures returning `Result<AuthStrategy>`:
///
/// ```
/// use bshengine::auth::{AuthProvider, AuthStrategy};
/// use std::sync::Arc;
///
/// let provider: Arc<dyn AuthProvider> =
///     Arc::new(|| async { Ok(AuthStrategy::ApiKey("key".to_string())) });
/// ```
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Produces the strategy for the next request.
    async fn authenticate(&self) -> Result<AuthStrategy>;
}

#[async_trait]
impl<F, Fut> AuthProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<AuthStrategy>> + Send + 'static,
{
    async fn authenticate(&self) -> Result<AuthStrategy> {
        (self)().await
    }
}

/// An auth provider that always returns the same strategy.
#[derive(Clone)]
pub struct StaticAuth {
    strategy: AuthStrategy,
}

impl StaticAuth {
    pub fn new(strategy: AuthStrategy) -> Self {
        Self { strategy }
    }

    /// Bearer token auth.
    pub fn jwt(token: impl Into<String>) -> Self {
        Self::new(AuthStrategy::Jwt(token.into()))
    }

    /// API key auth.
    pub fn api_key(token: impl Into<String>) -> Self {
        Self::new(AuthStrategy::ApiKey(token.into()))
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn authenticate(&self) -> Result<AuthStrategy> {
        Ok(self.strategy.clone())
    }
}

/// Resolves the auth header for one request.
///
/// Returns `None` when no provider is configured. Provider failures are
/// returned as-is.
pub async fn resolve(provider: Option<&dyn AuthProvider>) -> Result<Option<(&'static str, String)>> {
    let Some(provider) = provider else {
        return Ok(None);
    };
    let strategy = provider.authenticate().await?;
    tracing::trace!(strategy = ?strategy, "Resolved auth strategy");
    Ok(Some(strategy.header()))
}
