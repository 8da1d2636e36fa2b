use super::{json, Extra};
use crate::{metadata::ResponseType, CallOptions, Client, Envelope, RequestOptions, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const BASE: &str = "/api/settings";

/// Engine-wide settings. Nested sections are kept loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Reads and writes `/api/settings`.
#[derive(Debug, Clone)]
pub struct SettingsService {
    client: Client,
}

impl SettingsService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET /api/settings`
    pub async fn load<T: DeserializeOwned>(
        &self,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let options = RequestOptions::new().with_response_type(ResponseType::Json);
        self.client.get(BASE, options, call).await
    }

    /// `PUT /api/settings`
    pub async fn update<P, T>(
        &self,
        payload: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.put(BASE, json(payload)?, call).await
    }
}
