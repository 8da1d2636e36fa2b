use super::Extra;
use crate::{
    metadata::{Body, FormPart, RequestFormat, ResponseType},
    CallOptions, Client, Envelope, Error, RequestOptions, Result,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

const BASE: &str = "/api/images";

/// Processing options forwarded to the backend as a JSON form field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOptions {
    #[serde(flatten)]
    pub values: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A file to upload plus its optional form fields.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Bytes,
    pub namespace: Option<String>,
    pub asset_id: Option<String>,
    pub options: Option<UploadOptions>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            content: content.into(),
            namespace: None,
            asset_id: None,
            options: None,
        }
    }

    fn into_form(self) -> Result<Vec<FormPart>> {
        let mut parts = vec![FormPart::File {
            name: "file".to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            content: self.content,
        }];
        if let Some(namespace) = self.namespace {
            parts.push(FormPart::text("namespace", namespace));
        }
        if let Some(asset_id) = self.asset_id {
            parts.push(FormPart::text("assetId", asset_id));
        }
        if let Some(options) = self.options {
            let encoded = serde_json::to_string(&options)
                .map_err(|e| Error::SerializationFailed(e.to_string()))?;
            parts.push(FormPart::text("options", encoded));
        }
        Ok(parts)
    }
}

/// Image uploads under `/api/images`.
#[derive(Debug, Clone)]
pub struct ImageService {
    client: Client,
}

impl ImageService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `POST /api/images/upload` as `multipart/form-data`.
    ///
    /// The file goes in the `file` part; `namespace`, `assetId` and the
    /// JSON-encoded `options` are sent as text parts when set.
    pub async fn upload(
        &self,
        upload: ImageUpload,
        call: CallOptions<Envelope<UploadResponse>>,
    ) -> Result<Option<Envelope<UploadResponse>>> {
        let options = RequestOptions::new()
            .with_header("Content-Type", "multipart/form-data")
            .with_body(Body::Form(upload.into_form()?))
            .with_request_format(RequestFormat::Form)
            .with_response_type(ResponseType::Json);
        self.client
            .post(format!("{}/upload", BASE), options, call)
            .await
    }
}
