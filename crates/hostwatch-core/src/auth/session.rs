use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, Outcome};
use crate::models::{LoginResponse, RefreshResponse, User};

use super::store::{StoreError, TOKEN_KEY, USER_KEY};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cached identity is unreadable: {0}")]
    Identity(#[from] serde_json::Error),
}

/// Login/logout workflow on top of the auth facade and the credential store.
///
/// The token is written before the identity and cleared after it, so the
/// store never holds a user without a token.
#[derive(Clone, Debug)]
pub struct Session {
    client: ApiClient,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Authenticate and persist the returned token and user.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let response = self.client.auth().login(username, password).await?;
        let login: LoginResponse = response.json()?;

        self.store_token(&login.token)?;
        self.client
            .store()
            .set(USER_KEY, &serde_json::to_string(&login.user)?)?;

        info!(username = %login.user.username, "Logged in");
        Ok(login.user)
    }

    /// Tell the backend, then drop local state whatever it answered.
    ///
    /// The backend is stateless, so a failed logout call still ends the
    /// session locally. The call's outcome is returned for the caller to
    /// inspect.
    pub async fn logout(&self) -> Result<Outcome, SessionError> {
        let outcome = self.client.auth().logout().await;
        if let Err(ref e) = outcome {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.client.store().clear_session()?;
        info!("Logged out");
        Ok(outcome)
    }

    /// Fetch the current user and refresh the cached identity.
    pub async fn current_user(&self) -> Result<User, SessionError> {
        let response = self.client.auth().me().await?;
        let user: User = response.json()?;

        let store = self.client.store();
        if store.token()?.is_some() {
            store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        }
        Ok(user)
    }

    /// Exchange the current token for a fresh one.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let response = self.client.auth().refresh().await?;
        let refreshed: RefreshResponse = response.json()?;
        self.store_token(&refreshed.token)?;
        info!("Token refreshed");
        Ok(())
    }

    /// Save a token obtained elsewhere and re-arm session expiry handling,
    /// so the next 401 notifies and redirects again.
    pub fn store_token(&self, token: &str) -> Result<(), SessionError> {
        self.client.store().set(TOKEN_KEY, token)?;
        self.client.invalidator().rearm();
        Ok(())
    }

    /// Identity from the store, without a network call.
    pub fn cached_user(&self) -> Result<Option<User>, SessionError> {
        let store = self.client.store();
        if store.token()?.is_none() {
            return Ok(None);
        }
        match store.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.client.store().token(), Ok(Some(ref t)) if !t.is_empty())
    }
}
