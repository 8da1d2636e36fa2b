use super::{json, Affected};
use crate::{
    metadata::ResponseType, CallOptions, Client, Envelope, RequestOptions, Result,
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const BASE: &str = "/api/entities";

/// File format for [`EntityService::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    /// The value sent as the `format` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "excel",
        }
    }

    /// File extension of the exported file.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// Generic CRUD over any entity, under `/api/entities/{entity}`.
#[derive(Debug, Clone)]
pub struct EntityService {
    client: Client,
}

impl EntityService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET /api/entities/{entity}/{id}`
    pub async fn find_by_id<T: DeserializeOwned>(
        &self,
        entity: &str,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/{}/{}", BASE, entity, id), json_headers(), call)
            .await
    }

    /// `POST /api/entities/{entity}`
    pub async fn create<P, T>(
        &self,
        entity: &str,
        data: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .post(format!("{}/{}", BASE, entity), json(data)?, call)
            .await
    }

    /// `POST /api/entities/{entity}/batch`, one request for all of `data`.
    pub async fn create_many<P, T>(
        &self,
        entity: &str,
        data: &[P],
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.client
            .post(format!("{}/{}/batch", BASE, entity), json(data)?, call)
            .await
    }

    /// `PUT /api/entities/{entity}`
    pub async fn update<P, T>(
        &self,
        entity: &str,
        data: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .put(format!("{}/{}", BASE, entity), json(data)?, call)
            .await
    }

    /// `PUT /api/entities/{entity}/batch`
    pub async fn update_many<P, T>(
        &self,
        entity: &str,
        data: &[P],
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.client
            .put(format!("{}/{}/batch", BASE, entity), json(data)?, call)
            .await
    }

    /// `POST /api/entities/{entity}/search`
    pub async fn search<P, T>(
        &self,
        entity: &str,
        search: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .post(format!("{}/{}/search", BASE, entity), json(search)?, call)
            .await
    }

    /// Deletes every entity matching `search`.
    pub async fn delete<P>(
        &self,
        entity: &str,
        search: &P,
        call: CallOptions<Envelope<Affected>>,
    ) -> Result<Option<Envelope<Affected>>>
    where
        P: Serialize + ?Sized,
    {
        self.client
            .post(format!("{}/{}/delete", BASE, entity), json(search)?, call)
            .await
    }

    /// `DELETE /api/entities/{entity}/{id}`
    pub async fn delete_by_id(
        &self,
        entity: &str,
        id: &str,
        call: CallOptions<Envelope<Affected>>,
    ) -> Result<Option<Envelope<Affected>>> {
        self.client
            .delete(format!("{}/{}/{}", BASE, entity, id), json_headers(), call)
            .await
    }

    /// Column names and types of `entity`.
    pub async fn columns<T: DeserializeOwned>(
        &self,
        entity: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/{}/columns", BASE, entity), json_headers(), call)
            .await
    }

    /// Downloads the entities matching `search` as a file.
    ///
    /// Without a `filename` the file is named
    /// `<entity>_export_<YYYY-MM-DD>.<ext>`.
    pub async fn export<P>(
        &self,
        entity: &str,
        search: &P,
        format: ExportFormat,
        filename: Option<&str>,
        call: CallOptions<Bytes>,
    ) -> Result<Option<Bytes>>
    where
        P: Serialize + ?Sized,
    {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => default_export_name(entity, format),
        };
        let options = json(search)?
            .with_query_param("format", format.as_str())
            .with_query_param("filename", filename)
            .with_response_type(ResponseType::Blob);
        self.client
            .download(format!("{}/{}/export", BASE, entity), options, call)
            .await
    }
}

fn json_headers() -> RequestOptions {
    RequestOptions::new()
        .with_header("Content-Type", "application/json")
        .with_response_type(ResponseType::Json)
}

fn default_export_name(entity: &str, format: ExportFormat) -> String {
    format!(
        "{}_export_{}.{}",
        entity,
        chrono::Utc::now().format("%Y-%m-%d"),
        format.extension()
    )
}
