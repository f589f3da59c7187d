//! Transport client for the hostwatch REST API.
//!
//! `ApiClient` owns the HTTP connection pool and the request/response
//! pipeline. Every call goes through [`ApiClient::execute`], so the
//! credential augmentor and the response classifier see all traffic.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, warn};

use crate::auth::{CredentialStore, MemoryCredentialStore, SessionInvalidator};
use crate::config::{ClientConfig, ConfigError};
use crate::navigation::{Navigator, RouteState};
use crate::notify::{Notifier, TracingNotifier};

use super::augmentor::RequestAugmentor;
use super::classifier::ResponseClassifier;
use super::pipeline::{Pipeline, RequestStage, ResponseStage};
use super::request::{ApiResponse, Outcome, RequestDescriptor};
use super::resources::{AuthApi, ServersApi};
use super::ApiError;

/// API client for the hostwatch backend.
/// Clone is cheap - reqwest::Client and the pipeline are both shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    pipeline: Arc<Pipeline>,
    store: Arc<dyn CredentialStore>,
    invalidator: Arc<SessionInvalidator>,
}

impl ApiClient {
    /// Client with an in-memory store, tracing notifier and route state.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn invalidator(&self) -> &Arc<SessionInvalidator> {
        &self.invalidator
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn servers(&self) -> ServersApi<'_> {
        ServersApi::new(self)
    }

    /// Run one request through the pipeline and return its outcome.
    ///
    /// HTTP statuses of 400 and above come back as `Err(ApiError::Http)`,
    /// transport failures (including timeouts) as `Err(ApiError::Network)`.
    /// Response stages react to the outcome but never change it.
    pub async fn execute(&self, mut request: RequestDescriptor) -> Outcome {
        request.apply_defaults(&self.default_headers, self.timeout);
        self.pipeline.prepare(&mut request);

        debug!(method = %request.method(), path = request.path(), "Sending request");
        let outcome = self.send(&request).await;
        match outcome {
            Ok(ref response) => {
                debug!(path = request.path(), status = response.status().as_u16(), "Request succeeded")
            }
            Err(ref e) => debug!(path = request.path(), error = %e, "Request failed"),
        }

        self.pipeline.observe(&request, &outcome);
        outcome
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, request: &RequestDescriptor) -> Outcome {
        let url = self.url(request.path());

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());
        if let Some(timeout) = request.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let failed = status.is_client_error() || status.is_server_error();

        let body = match response.bytes().await {
            Ok(body) => body,
            // A status line arrived, so this is not a network failure
            Err(e) if failed => {
                warn!(status = status.as_u16(), error = %e, "Error body could not be read");
                return Err(ApiError::from_status(status, ""));
            }
            Err(e) => return Err(ApiError::from_transport(e)),
        };

        if failed {
            return Err(ApiError::from_status(status, &String::from_utf8_lossy(&body)));
        }

        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

/// Wires the collaborators into an `ApiClient`.
///
/// The augmentor always runs first among request stages and the classifier
/// first among response stages; extra stages run after them.
pub struct ApiClientBuilder {
    config: ClientConfig,
    store: Option<Arc<dyn CredentialStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl ApiClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            store: None,
            notifier: None,
            navigator: None,
            request_stages: Vec::new(),
            response_stages: Vec::new(),
        }
    }

    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn request_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.request_stages.push(stage);
        self
    }

    pub fn response_stage(mut self, stage: Arc<dyn ResponseStage>) -> Self {
        self.response_stages.push(stage);
        self
    }

    pub fn build(self) -> Result<ApiClient, ConfigError> {
        let base_url = self.config.resolved_base_url()?;
        let client = Client::builder().build()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(RouteState::default()));
        let notifications_enabled = self.config.notifications_enabled;

        let invalidator = Arc::new(SessionInvalidator::new(
            store.clone(),
            notifier.clone(),
            navigator,
            notifications_enabled,
        ));

        let mut pipeline = Pipeline::new()
            .with_request_stage(Arc::new(RequestAugmentor::new(store.clone())))
            .with_response_stage(Arc::new(ResponseClassifier::new(
                notifier,
                invalidator.clone(),
                notifications_enabled,
            )));
        for stage in self.request_stages {
            pipeline = pipeline.with_request_stage(stage);
        }
        for stage in self.response_stages {
            pipeline = pipeline.with_response_stage(stage);
        }

        debug!(base_url = %base_url, timeout = ?self.config.timeout, "API client ready");

        Ok(ApiClient {
            client,
            base_url,
            default_headers: self.config.default_headers,
            timeout: self.config.timeout,
            pipeline: Arc::new(pipeline),
            store,
            invalidator,
        })
    }
}
