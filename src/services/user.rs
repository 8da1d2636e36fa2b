use super::{json, BshObject, Extra, ListParams};
use crate::{CallOptions, Client, Envelope, RequestOptions, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const BASE: &str = "/api/users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub object: BshObject,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// User management under `/api/users`.
#[derive(Debug, Clone)]
pub struct UserService {
    client: Client,
}

impl UserService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The user the current credentials belong to.
    pub async fn me<T: DeserializeOwned>(
        &self,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/me", BASE), RequestOptions::new(), call)
            .await
    }

    /// `POST /api/users`
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

    /// `GET /api/users/{id}`
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/{}", BASE, id), RequestOptions::new(), call)
            .await
    }

    /// `PUT /api/users`
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

    /// `DELETE /api/users/{id}`
    pub async fn delete<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .delete(format!("{}/{}", BASE, id), RequestOptions::new(), call)
            .await
    }

    /// `GET /api/users`, paged by `params`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        params: ListParams,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client.get(BASE, params.into_options(), call).await
    }

    /// `POST /api/users/search`
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

    /// `GET /api/users/count`
    pub async fn count<T: DeserializeOwned>(
        &self,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.client
            .get(format!("{}/count", BASE), RequestOptions::new(), call)
            .await
    }

    /// `POST /api/users/count`
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

    /// `POST /api/users/{id}/activate`
    pub async fn activate<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.transition(id, "activate", call).await
    }

    /// `POST /api/users/{id}/deactivate`
    pub async fn deactivate<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.transition(id, "deactivate", call).await
    }

    /// `POST /api/users/{id}/block`
    pub async fn block<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        self.transition(id, "block", call).await
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
