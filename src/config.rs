//! Service configuration and memoised client construction.
//!
//! A [`Configuration`] is created once at start-up and passed by reference
//! to whatever needs a [`Client`]. Every [`Configuration::configure`] and
//! [`Configuration::reset`] bumps a version counter;
//! [`Configuration::create_client`] rebuilds the cached client only when the
//! version moved since it was built.
//!
//! The version check and the build happen under one lock. Concurrent
//! `configure` calls are last-write-wins.

use crate::{
    auth::AuthProvider, interceptor::Interceptors, transport::Transport, Client, Error, Result,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const NOT_CONFIGURED: &str = "service configuration is not set; call configure() first";

/// The values [`Configuration::configure`] accepts.
///
/// Transport and host are required; auth is optional.
#[derive(Clone, Default)]
pub struct ServiceConfig {
    transport: Option<Arc<dyn Transport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    host: Option<String>,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transport. Required.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the auth provider. Optional; without one no auth header is sent.
    pub fn auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn shared_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the host every request path is appended to. Required.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("transport", &self.transport.is_some())
            .field("auth", &self.auth.is_some())
            .field("host", &self.host)
            .finish()
    }
}

struct Stored {
    transport: Arc<dyn Transport>,
    auth: Option<Arc<dyn AuthProvider>>,
    host: String,
}

#[derive(Default)]
struct State {
    config: Option<Stored>,
    version: u64,
    cached: Option<(u64, Client)>,
}

/// Holds the transport, auth provider and host used to build clients.
///
/// # Examples
///
/// ```
/// use bshengine::{config::{Configuration, ServiceConfig}, transport::TransportResponse};
/// use bshengine::metadata::RequestDescriptor;
/// use http::StatusCode;
///
/// let config = Configuration::new();
/// assert!(!config.is_configured());
///
/// config
///     .configure(
///         ServiceConfig::new()
///             .host("http://localhost:3000")
///             .transport(|_request: RequestDescriptor| async {
///                 Ok(TransportResponse::new(StatusCode::OK, "{}"))
///             }),
///     )
///     .unwrap();
///
/// let first = config.create_client().unwrap();
/// let second = config.create_client().unwrap();
/// assert!(first.ptr_eq(&second));
/// ```
#[derive(Default)]
pub struct Configuration {
    state: Mutex<State>,
    interceptors: Arc<Interceptors>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration whose clients share `interceptors`.
    pub fn with_interceptors(interceptors: Arc<Interceptors>) -> Self {
        Self {
            state: Mutex::default(),
            interceptors,
        }
    }

    /// Validates and stores `config`, invalidating any cached client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the transport or the host is
    /// missing. Nothing is stored in that case.
    pub fn configure(&self, config: ServiceConfig) -> Result<()> {
        let transport = config.transport.ok_or_else(|| {
            Error::Configuration("transport is required for service configuration".to_string())
        })?;
        let host = config.host.filter(|host| !host.is_empty()).ok_or_else(|| {
            Error::Configuration("host is required for service configuration".to_string())
        })?;

        let mut state = self.lock();
        state.config = Some(Stored {
            transport,
            auth: config.auth,
            host,
        });
        state.version += 1;
        tracing::debug!(version = state.version, "Service configuration updated");
        Ok(())
    }

    /// Clears the stored configuration.
    ///
    /// Intended for test harnesses. Clients already handed out keep working;
    /// only later `create_client` calls are affected.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.config = None;
        state.version += 1;
        tracing::debug!(version = state.version, "Service configuration reset");
    }

    /// Returns `true` once `configure` has succeeded and `reset` has not
    /// been called since.
    pub fn is_configured(&self) -> bool {
        self.lock().config.is_some()
    }

    /// Number of `configure`/`reset` calls so far.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    pub fn transport(&self) -> Result<Arc<dyn Transport>> {
        self.with_stored(|stored| stored.transport.clone())
    }

    /// The configured host.
    pub fn host(&self) -> Result<String> {
        self.with_stored(|stored| stored.host.clone())
    }

    /// The configured auth provider, `None` when auth was not set.
    pub fn auth(&self) -> Result<Option<Arc<dyn AuthProvider>>> {
        self.with_stored(|stored| stored.auth.clone())
    }

    /// The registry shared by every client this configuration builds.
    pub fn interceptors(&self) -> &Arc<Interceptors> {
        &self.interceptors
    }

    /// Returns the cached client, rebuilding it if the configuration
    /// changed since it was built.
    pub fn create_client(&self) -> Result<Client> {
        let mut state = self.lock();
        let version = state.version;

        if let Some((built_at, client)) = &state.cached {
            if *built_at == version {
                return Ok(client.clone());
            }
        }

        let stored = state
            .config
            .as_ref()
            .ok_or_else(|| Error::Configuration(NOT_CONFIGURED.to_string()))?;

        let mut builder = Client::builder()
            .host(stored.host.clone())
            .shared_transport(stored.transport.clone())
            .interceptors(self.interceptors.clone());
        if let Some(auth) = &stored.auth {
            builder = builder.shared_auth(auth.clone());
        }
        let client = builder.build()?;

        tracing::debug!(version, host = %client.host(), "Built client");
        state.cached = Some((version, client.clone()));
        Ok(client)
    }

    fn with_stored<T>(&self, f: impl FnOnce(&Stored) -> T) -> Result<T> {
        self.lock()
            .config
            .as_ref()
            .map(f)
            .ok_or_else(|| Error::Configuration(NOT_CONFIGURED.to_string()))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Configuration")
            .field("configured", &state.config.is_some())
            .field("version", &state.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::StaticAuth, metadata::RequestDescriptor, transport::TransportResponse};
    use http::StatusCode;

    fn transport() -> impl Transport {
        |_request: RequestDescriptor| async { Ok(TransportResponse::new(StatusCode::OK, "{}")) }
    }

    fn configured() -> Configuration {
        let config = Configuration::new();
        config
            .configure(
                ServiceConfig::new()
                    .transport(transport())
                    .auth(StaticAuth::jwt("test-token"))
                    .host("http://localhost:3000"),
            )
            .unwrap();
        config
    }

    #[test]
    fn test_configure_requires_transport() {
        let config = Configuration::new();
        let err = config
            .configure(ServiceConfig::new().host("http://localhost:3000"))
            .unwrap_err();
        assert!(err.to_string().contains("transport is required"));
        assert!(!config.is_configured());
        assert_eq!(config.version(), 0);
    }

    #[test]
    fn test_configure_requires_host() {
        let config = Configuration::new();
        let err = config
            .configure(ServiceConfig::new().transport(transport()))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(msg) if msg.contains("host is required")));

        let err = config
            .configure(ServiceConfig::new().transport(transport()).host(""))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_accessors_fail_when_unconfigured() {
        let config = Configuration::new();
        assert!(config.transport().is_err());
        assert!(config.host().is_err());
        assert!(config.auth().is_err());
        assert!(matches!(config.create_client(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_accessors_when_configured() {
        let config = configured();
        assert!(config.is_configured());
        assert_eq!(config.host().unwrap(), "http://localhost:3000");
        assert!(config.auth().unwrap().is_some());
        assert_eq!(config.version(), 1);
    }

    #[test]
    fn test_client_is_memoised_per_version() {
        let config = configured();
        let first = config.create_client().unwrap();
        let second = config.create_client().unwrap();
        assert!(first.ptr_eq(&second));

        config
            .configure(
                ServiceConfig::new()
                    .transport(transport())
                    .host("http://other:4000"),
            )
            .unwrap();
        let third = config.create_client().unwrap();
        assert!(!first.ptr_eq(&third));
        assert_eq!(third.host(), "http://other:4000");
        assert_eq!(first.host(), "http://localhost:3000");
    }

    #[test]
    fn test_reset_invalidates_cache() {
        let config = configured();
        let client = config.create_client().unwrap();

        config.reset();
        assert!(!config.is_configured());
        assert_eq!(config.version(), 2);
        assert!(config.create_client().is_err());
        // Handed-out clients stay usable objects.
        assert_eq!(client.host(), "http://localhost:3000");
    }

    #[test]
    fn test_clients_share_interceptors() {
        let config = configured();
        let client = config.create_client().unwrap();
        assert!(Arc::ptr_eq(client.interceptors(), config.interceptors()));
    }
}
