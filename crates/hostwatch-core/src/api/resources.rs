//! Resource facades: one method per backend endpoint.
//!
//! Each method builds a descriptor and hands it to `ApiClient::execute`.
//! Decoding is left to the caller (`ApiResponse::json`).

use super::client::ApiClient;
use super::request::{Outcome, RequestDescriptor};
use crate::models::{LoginRequest, ServerId, ServerInput, ServerUpdate};

// ============================================================================
// Endpoint paths
// ============================================================================

const AUTH_LOGIN_PATH: &str = "/auth/login";
const AUTH_LOGOUT_PATH: &str = "/auth/logout";
const AUTH_ME_PATH: &str = "/auth/me";
const AUTH_REFRESH_PATH: &str = "/auth/refresh";

const SERVERS_PATH: &str = "/servers";
const SERVERS_CHECK_ALL_PATH: &str = "/servers/check-all";

fn server_path(id: ServerId) -> String {
    format!("{}/{}", SERVERS_PATH, id)
}

fn server_action_path(id: ServerId, action: &str) -> String {
    format!("{}/{}/{}", SERVERS_PATH, id, action)
}

/// `/auth` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, username: &str, password: &str) -> Outcome {
        let request = RequestDescriptor::post(AUTH_LOGIN_PATH)
            .with_json(&LoginRequest { username, password })?;
        self.client.execute(request).await
    }

    pub async fn logout(&self) -> Outcome {
        self.client.execute(RequestDescriptor::post(AUTH_LOGOUT_PATH)).await
    }

    pub async fn me(&self) -> Outcome {
        self.client.execute(RequestDescriptor::get(AUTH_ME_PATH)).await
    }

    pub async fn refresh(&self) -> Outcome {
        self.client.execute(RequestDescriptor::post(AUTH_REFRESH_PATH)).await
    }
}

/// `/servers` endpoints.
pub struct ServersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ServersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Outcome {
        self.client.execute(RequestDescriptor::get(SERVERS_PATH)).await
    }

    pub async fn get(&self, id: ServerId) -> Outcome {
        self.client.execute(RequestDescriptor::get(server_path(id))).await
    }

    pub async fn create(&self, server: &ServerInput) -> Outcome {
        let request = RequestDescriptor::post(SERVERS_PATH).with_json(server)?;
        self.client.execute(request).await
    }

    pub async fn update(&self, id: ServerId, update: &ServerUpdate) -> Outcome {
        let request = RequestDescriptor::put(server_path(id)).with_json(update)?;
        self.client.execute(request).await
    }

    pub async fn delete(&self, id: ServerId) -> Outcome {
        self.client.execute(RequestDescriptor::delete(server_path(id))).await
    }

    /// Ping, port and SSH-auth probe of one server.
    pub async fn check(&self, id: ServerId) -> Outcome {
        self.client
            .execute(RequestDescriptor::post(server_action_path(id, "check")))
            .await
    }

    pub async fn check_all(&self) -> Outcome {
        self.client
            .execute(RequestDescriptor::post(SERVERS_CHECK_ALL_PATH))
            .await
    }

    pub async fn verify_password(&self, id: ServerId) -> Outcome {
        self.client
            .execute(RequestDescriptor::post(server_action_path(id, "verify-password")))
            .await
    }

    pub async fn check_port(&self, id: ServerId) -> Outcome {
        self.client
            .execute(RequestDescriptor::post(server_action_path(id, "check-port")))
            .await
    }

    pub async fn system_info(&self, id: ServerId) -> Outcome {
        self.client
            .execute(RequestDescriptor::get(server_action_path(id, "system-info")))
            .await
    }
}
