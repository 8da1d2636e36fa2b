use super::json;
use crate::{CallOptions, Client, Envelope, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json as payload;

const BASE: &str = "/api/auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Tokens issued by login and refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LoginResponse { .. }")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Account endpoints under `/api/auth`.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Client,
}

impl AuthService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `POST /api/auth/login`. Returns access and refresh tokens.
    pub async fn login(
        &self,
        request: &LoginRequest,
        call: CallOptions<Envelope<LoginResponse>>,
    ) -> Result<Option<Envelope<LoginResponse>>> {
        self.client
            .post(format!("{}/login", BASE), json(request)?, call)
            .await
    }

    /// `POST /api/auth/register`
    pub async fn register<P, T>(
        &self,
        user: &P,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .post(format!("{}/register", BASE), json(user)?, call)
            .await
    }

    /// `POST /api/auth/refresh`: exchanges a refresh token for a new token pair.
    pub async fn refresh_token(
        &self,
        refresh: &str,
        call: CallOptions<Envelope<LoginResponse>>,
    ) -> Result<Option<Envelope<LoginResponse>>> {
        let request = RefreshRequest {
            refresh: refresh.to_string(),
        };
        self.client
            .post(format!("{}/refresh", BASE), json(&request)?, call)
            .await
    }

    /// `POST /api/auth/forget-password`: sends a reset code to `email`.
    pub async fn forget_password<T: DeserializeOwned>(
        &self,
        email: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let body = payload!({ "email": email });
        self.client
            .post(format!("{}/forget-password", BASE), json(&body)?, call)
            .await
    }

    /// `POST /api/auth/reset-password` with the code sent by
    /// [`AuthService::forget_password`].
    pub async fn reset_password<T: DeserializeOwned>(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let body = payload!({ "email": email, "code": code, "newPassword": new_password });
        self.client
            .post(format!("{}/reset-password", BASE), json(&body)?, call)
            .await
    }

    /// `POST /api/auth/activate-account`
    pub async fn activate_account<T: DeserializeOwned>(
        &self,
        email: &str,
        code: &str,
        call: CallOptions<Envelope<T>>,
    ) -> Result<Option<Envelope<T>>> {
        let body = payload!({ "email": email, "code": code });
        self.client
            .post(format!("{}/activate-account", BASE), json(&body)?, call)
            .await
    }
}
