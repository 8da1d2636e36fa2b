use super::Extra;
use crate::{metadata::RequestFormat, CallOptions, Client, Envelope, RequestOptions, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const BASE: &str = "/api/utils";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerFunction {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerAction {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Miscellaneous engine endpoints under `/api/utils`.
#[derive(Debug, Clone)]
pub struct UtilsService {
    client: Client,
}

impl UtilsService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET /api/utils/triggers/functions`
    pub async fn trigger_functions(
        &self,
        call: CallOptions<Envelope<TriggerFunction>>,
    ) -> Result<Option<Envelope<TriggerFunction>>> {
        self.client
            .get(format!("{}/triggers/functions", BASE), options(), call)
            .await
    }

    /// `GET /api/utils/triggers/actions`
    pub async fn trigger_actions(
        &self,
        call: CallOptions<Envelope<TriggerAction>>,
    ) -> Result<Option<Envelope<TriggerAction>>> {
        self.client
            .get(format!("{}/triggers/actions", BASE), options(), call)
            .await
    }

    /// Secrets available from `source`, `env` when `None`.
    pub async fn secrets<T: DeserializeOwned>(
        &self,
        source: Option<&str>,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let path = format!("{}/secrets/{}", BASE, source.unwrap_or("env"));
        self.client.get(path, options(), call).await
    }

    /// `GET /api/utils/version`
    pub async fn version<T: DeserializeOwned>(
        &self,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/version", BASE), options(), call)
            .await
    }
}

fn options() -> RequestOptions {
    RequestOptions::new().with_request_format(RequestFormat::Json)
}
