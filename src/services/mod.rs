//! Per-entity services mapping domain operations onto pipeline calls.
//!
//! Services are thin: each method picks a verb, a path under its base
//! endpoint and, for JSON payloads, a body with
//! `Content-Type: application/json`. The response type `T` is chosen by the
//! caller through the [`CallOptions`](crate::CallOptions) it passes.

mod auth;
mod entities;
mod image;
mod settings;
mod tenant;
mod user;
mod utils;

pub use auth::{AuthService, LoginRequest, LoginResponse, RefreshRequest};
pub use entities::{EntityService, ExportFormat};
pub use image::{ImageService, ImageUpload, UploadOptions, UploadResponse};
pub use settings::{Settings, SettingsService};
pub use tenant::{Tenant, TenantService};
pub use user::{User, UserService};
pub use utils::{TriggerAction, TriggerFunction, UtilsService};

use crate::{metadata::RequestOptions, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend date wrapper, `{"$date": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BshDate {
    #[serde(rename = "$date")]
    pub date: String,
}

/// Bookkeeping fields every persisted object carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BshObject {
    #[serde(rename = "persistenceId", default)]
    pub persistence_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BshDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<BshDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
}

/// Result of a count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub count: u64,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affected {
    pub effected: u64,
}

/// Paging, sorting and filtering for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub filter: Option<String>,
}

impl ListParams {
    pub(crate) fn into_options(self) -> RequestOptions {
        let mut options = RequestOptions::new();
        if let Some(page) = self.page {
            options = options.with_query_param("page", page.to_string());
        }
        if let Some(size) = self.size {
            options = options.with_query_param("size", size.to_string());
        }
        if let Some(sort) = self.sort {
            options = options.with_query_param("sort", sort);
        }
        if let Some(filter) = self.filter {
            options = options.with_query_param("filter", filter);
        }
        options
    }
}

/// Loosely typed fields not modelled explicitly.
pub type Extra = Map<String, Value>;

pub(crate) fn json<P: Serialize + ?Sized>(payload: &P) -> Result<RequestOptions> {
    RequestOptions::json(payload)
}
