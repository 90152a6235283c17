//! Job description extraction: relay to the Messages API, then normalize the reply
//! into a prefill record for the creation form.

pub mod client;
pub mod handlers;
pub mod normalizer;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::{ExtractionClient, ExtractionError};

/// Structured fields pulled out of one job description. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub company: String,
    pub position: String,
    pub application_url: String,
    pub application_id: String,
}

/// Anything that can turn a pasted job description into an `ExtractionResult`.
///
/// The view-model holds an `Arc<dyn JobExtractor>` so tests can swap the HTTP client out.
#[async_trait]
pub trait JobExtractor: Send + Sync {
    async fn extract(&self, job_description: &str) -> Result<ExtractionResult, ExtractionError>;
}
