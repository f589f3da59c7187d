//! Ordered request/response stages run by `ApiClient` around every call.
//!
//! Request stages may mutate the outgoing descriptor. Response stages only
//! observe the outcome; they cannot swallow or rewrite it, so what the
//! caller receives is exactly what the transport produced.

use std::sync::Arc;

use super::request::{Outcome, RequestDescriptor};

pub trait RequestStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn prepare(&self, request: &mut RequestDescriptor);
}

pub trait ResponseStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn observe(&self, request: &RequestDescriptor, outcome: &Outcome);
}

#[derive(Clone, Default)]
pub struct Pipeline {
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.request_stages.push(stage);
        self
    }

    pub fn with_response_stage(mut self, stage: Arc<dyn ResponseStage>) -> Self {
        self.response_stages.push(stage);
        self
    }

    /// Run every request stage in registration order.
    pub fn prepare(&self, request: &mut RequestDescriptor) {
        for stage in &self.request_stages {
            stage.prepare(request);
        }
    }

    /// Run every response stage in registration order.
    pub fn observe(&self, request: &RequestDescriptor, outcome: &Outcome) {
        for stage in &self.response_stages {
            stage.observe(request, outcome);
        }
    }

    pub fn stage_names(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        (
            self.request_stages.iter().map(|s| s.name()).collect(),
            self.response_stages.iter().map(|s| s.name()).collect(),
        )
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (request, response) = self.stage_names();
        f.debug_struct("Pipeline")
            .field("request_stages", &request)
            .field("response_stages", &response)
            .finish()
    }
}
