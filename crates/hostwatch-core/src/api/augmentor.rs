use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::warn;

use crate::auth::CredentialStore;

use super::pipeline::RequestStage;
use super::request::RequestDescriptor;

/// Attaches `Authorization: Bearer <token>` when the store holds a token.
///
/// Never fails the request: an unreadable store, an empty store or a token
/// that is not a valid header value all fall back to sending the request
/// unauthenticated.
pub struct RequestAugmentor {
    store: Arc<dyn CredentialStore>,
}

impl RequestAugmentor {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    fn bearer(&self) -> Option<HeaderValue> {
        let token = match self.store.token() {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Credential store read failed, sending unauthenticated");
                return None;
            }
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(_) => {
                warn!("Stored token is not a valid header value, sending unauthenticated");
                None
            }
        }
    }
}

impl RequestStage for RequestAugmentor {
    fn name(&self) -> &'static str {
        "request-augmentor"
    }

    fn prepare(&self, request: &mut RequestDescriptor) {
        if let Some(value) = self.bearer() {
            request.headers_mut().insert(AUTHORIZATION, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::{MemoryCredentialStore, StoreError};

    struct Broken;

    impl CredentialStore for Broken {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn prepared(store: Arc<dyn CredentialStore>) -> RequestDescriptor {
        let mut request = RequestDescriptor::get("/servers");
        RequestAugmentor::new(store).prepare(&mut request);
        request
    }

    #[test]
    fn test_token_becomes_bearer_header() {
        let request = prepared(Arc::new(MemoryCredentialStore::with_token("abc")));
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn test_empty_store_adds_nothing() {
        let request = prepared(Arc::new(MemoryCredentialStore::new()));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_empty_token_adds_nothing() {
        let request = prepared(Arc::new(MemoryCredentialStore::with_token("")));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_store_failure_degrades_to_unauthenticated() {
        let request = prepared(Arc::new(Broken));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_unencodable_token_is_skipped() {
        let request = prepared(Arc::new(MemoryCredentialStore::with_token("bad\ntoken")));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_overrides_caller_authorization() {
        let mut request = RequestDescriptor::get("/auth/me")
            .with_header(AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        RequestAugmentor::new(Arc::new(MemoryCredentialStore::with_token("t1")))
            .prepare(&mut request);
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer t1");
    }
}
