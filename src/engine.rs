//! The [`BshEngine`] facade.

use crate::{
    config::{Configuration, ServiceConfig},
    interceptor::{ErrorInterceptor, Interceptors, PostInterceptor, PreInterceptor},
    services::{
        AuthService, EntityService, ImageService, SettingsService, TenantService, UserService,
        UtilsService,
    },
    Client, Result,
};
use std::sync::Arc;

/// Configuration, interceptor registry and services in one place.
///
/// Services are built from the memoised client, so they pick up a new
/// configuration after [`BshEngine::configure`].
///
/// # Examples
///
/// ```no_run
/// use bshengine::{auth::StaticAuth, config::ServiceConfig, transport::ReqwestTransport};
/// use bshengine::{BshEngine, CallOptions};
///
/// # async fn example() -> Result<(), bshengine::Error> {
/// let engine = BshEngine::new(
///     ServiceConfig::new()
///         .host("https://api.example.com")
///         .transport(ReqwestTransport::new()?)
///         .auth(StaticAuth::api_key("key")),
/// )?;
///
/// let tenant = engine
///     .tenants()?
///     .get_by_id::<bshengine::services::Tenant>("t-1", CallOptions::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BshEngine {
    config: Configuration,
}

impl BshEngine {
    /// Creates an engine and applies `config`.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let engine = Self::unconfigured();
        engine.configure(config)?;
        Ok(engine)
    }

    /// Creates an engine with no configuration yet.
    pub fn unconfigured() -> Self {
        Self {
            config: Configuration::with_interceptors(Arc::new(Interceptors::new())),
        }
    }

    pub fn configure(&self, config: ServiceConfig) -> Result<()> {
        self.config.configure(config)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn interceptors(&self) -> &Arc<Interceptors> {
        self.config.interceptors()
    }

    pub fn pre_interceptor(&self, interceptor: impl PreInterceptor + 'static) -> &Self {
        self.interceptors().pre(interceptor);
        self
    }

    pub fn post_interceptor(&self, interceptor: impl PostInterceptor + 'static) -> &Self {
        self.interceptors().post(interceptor);
        self
    }

    pub fn error_interceptor(&self, interceptor: impl ErrorInterceptor + 'static) -> &Self {
        self.interceptors().error(interceptor);
        self
    }

    /// The memoised client for the current configuration.
    pub fn client(&self) -> Result<Client> {
        self.config.create_client()
    }

    pub fn tenants(&self) -> Result<TenantService> {
        Ok(TenantService::new(self.client()?))
    }

    pub fn users(&self) -> Result<UserService> {
        Ok(UserService::new(self.client()?))
    }

    pub fn settings(&self) -> Result<SettingsService> {
        Ok(SettingsService::new(self.client()?))
    }

    pub fn entities(&self) -> Result<EntityService> {
        Ok(EntityService::new(self.client()?))
    }

    pub fn images(&self) -> Result<ImageService> {
        Ok(ImageService::new(self.client()?))
    }

    pub fn auth(&self) -> Result<AuthService> {
        Ok(AuthService::new(self.client()?))
    }

    pub fn utils(&self) -> Result<UtilsService> {
        Ok(UtilsService::new(self.client()?))
    }
}

impl Default for BshEngine {
    fn default() -> Self {
        Self::unconfigured()
    }
}
