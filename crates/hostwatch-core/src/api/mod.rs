//! REST API client module for the hostwatch backend.
//!
//! This module provides the `ApiClient` transport and the pipeline it runs
//! around every request:
//!
//! - `RequestAugmentor`: attaches the bearer token from the credential store
//! - `ResponseClassifier`: maps failures to a `Classification`, notifies the
//!   user and ends the session on 401
//!
//! Resource facades (`AuthApi`, `ServersApi`) map named operations onto
//! endpoints and return the raw `Outcome`.

pub mod augmentor;
pub mod classifier;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod resources;

pub use augmentor::RequestAugmentor;
pub use classifier::{Classification, ResponseClassifier};
pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
pub use pipeline::{Pipeline, RequestStage, ResponseStage};
pub use request::{ApiResponse, Outcome, RequestDescriptor};
pub use resources::{AuthApi, ServersApi};
