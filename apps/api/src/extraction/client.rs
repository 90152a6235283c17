//! HTTP client for the relay. Posts the pasted description and normalizes the reply.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::trim_base_url;
use crate::extraction::normalizer::{normalize, ParseError};
use crate::extraction::{ExtractionResult, JobExtractor};

const RELAY_PATH: &str = "/api/claude";
const RETRY_PROMPT: &str = "Error parsing job description. Please try again.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned status {status}")]
    Relay { status: u16 },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ExtractionError {
    /// Text shown to the user. Identical for every failure; detail goes to the log.
    pub fn user_message(&self) -> &'static str {
        RETRY_PROMPT
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    job_description: &'a str,
}

/// Calls `POST {relay_base_url}/api/claude`.
#[derive(Clone)]
pub struct ExtractionClient {
    client: Client,
    relay_url: String,
}

impl ExtractionClient {
    pub fn new(relay_base_url: &str) -> Result<Self, ExtractionError> {
        Ok(Self {
            client: Client::builder().build()?,
            relay_url: format!("{}{RELAY_PATH}", trim_base_url(relay_base_url)),
        })
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }
}

#[async_trait]
impl JobExtractor for ExtractionClient {
    async fn extract(&self, job_description: &str) -> Result<ExtractionResult, ExtractionError> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&RelayRequest { job_description })
            .send()
            .await
            .map_err(|e| {
                error!("Error calling relay: {e}");
                ExtractionError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Relay returned {status}");
            return Err(ExtractionError::Relay {
                status: status.as_u16(),
            });
        }

        let envelope: Value = response.json().await?;
        debug!("Relay envelope received, normalizing");

        normalize(&envelope).map_err(|e| {
            error!("Error parsing model response: {e}");
            ExtractionError::Parse(e)
        })
    }
}
