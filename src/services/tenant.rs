use super::{json, BshObject, Extra, ListParams};
use crate::{CallOptions, Client, Envelope, RequestOptions, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const BASE: &str = "/api/tenants";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(flatten)]
    pub object: BshObject,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Tenant management under `/api/tenants`.
#[derive(Debug, Clone)]
pub struct TenantService {
    client: Client,
}

impl TenantService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `POST /api/tenants`
    pub async fn create<P, T>(
        &self,
        payload: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.post(BASE, json(payload)?, call).await
    }

    /// `PUT /api/tenants/{id}/admin/{admin_id}`: makes `admin_id` the tenant admin.
    pub async fn assign_admin<T: DeserializeOwned>(
        &self,
        id: &str,
        admin_id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let path = format!("{}/{}/admin/{}", BASE, id, admin_id);
        self.client.put(path, RequestOptions::new(), call).await
    }

    /// `POST /api/tenants/{id}/activate`
    pub async fn activate<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.transition(id, "activate", call).await
    }

    /// `POST /api/tenants/{id}/deactivate`
    pub async fn deactivate<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.transition(id, "deactivate", call).await
    }

    /// `POST /api/tenants/{id}/block`
    pub async fn block<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.transition(id, "block", call).await
    }

    /// `GET /api/tenants/{id}`
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/{}", BASE, id), RequestOptions::new(), call)
            .await
    }

    /// `POST /api/tenants/search` with `search` as the body.
    pub async fn search<P, T>(
        &self,
        search: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .post(format!("{}/search", BASE), json(search)?, call)
            .await
    }

    /// `GET /api/tenants`, paged by `params`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bshengine::services::{ListParams, TenantService};
    /// use bshengine::transport::TransportResponse;
    /// use bshengine::{CallOptions, Client, RequestDescriptor};
    /// use http::StatusCode;
    /// use serde_json::{json, Value};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), bshengine::Error> {
    /// let client = Client::builder()
    ///     .host("http://localhost:3000")
    ///     .transport(|request: RequestDescriptor| async move {
    ///         assert_eq!(request.path, "http://localhost:3000/api/tenants");
    ///         assert_eq!(request.options.query_params["page"], "2");
    ///         TransportResponse::json_body(
    ///             StatusCode::OK,
    ///             &json!({"data": [], "code": 200, "status": "OK", "error": ""}),
    ///         )
    ///     })
    ///     .build()?;
    ///
    /// let page = TenantService::new(client)
    ///     .list::<Value>(
    ///         ListParams { page: Some(2), ..ListParams::default() },
    ///         CallOptions::new(),
    ///     )
    ///     .await?;
    /// assert!(page.unwrap().data.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list<T: DeserializeOwned>(
        &self,
        params: ListParams,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client.get(BASE, params.into_options(), call).await
    }

    /// `PUT /api/tenants`. The payload carries the tenant id.
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

    /// `DELETE /api/tenants/{id}`
    pub async fn delete<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .delete(format!("{}/{}", BASE, id), RequestOptions::new(), call)
            .await
    }

    /// `GET /api/tenants/count`
    pub async fn count<T: DeserializeOwned>(
        &self,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/count", BASE), RequestOptions::new(), call)
            .await
    }

    /// `POST /api/tenants/count`, counting only tenants matching `search`.
    pub async fn count_filtered<P, T>(
        &self,
        search: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .post(format!("{}/count", BASE), json(search)?, call)
            .await
    }

    async fn transition<T: DeserializeOwned>(
        &self,
        id: &str,
        action: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let path = format!("{}/{}/{}", BASE, id, action);
        self.client.post(path, RequestOptions::new(), call).await
    }
}
