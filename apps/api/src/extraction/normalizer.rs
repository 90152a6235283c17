//! Normalizer — turns the relay's raw Messages API envelope into an `ExtractionResult`.
//!
//! The model is asked for a fixed JSON schema but its reply is untrusted text. The reply
//! must be a JSON object; each field then falls back to `""` on its own, so one odd
//! value never sinks the other three.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::extraction::ExtractionResult;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    content: Vec<ContentSegment>,
}

#[derive(Debug, Deserialize)]
struct ContentSegment {
    #[serde(default)]
    text: Option<String>,
}

/// The schema the prompt asks for. Absent fields default to `""`.
#[derive(Debug, Default, Deserialize)]
struct ExtractedFields {
    #[serde(default, deserialize_with = "lenient_string")]
    company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    position: String,
    #[serde(default, deserialize_with = "lenient_string")]
    url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    application_id: String,
}

/// Strings pass through; numbers and booleans keep their JSON text; anything else is `""`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

impl From<ExtractedFields> for ExtractionResult {
    fn from(fields: ExtractedFields) -> Self {
        Self {
            company: fields.company,
            position: fields.position,
            application_url: fields.url,
            application_id: fields.application_id,
        }
    }
}

/// Normalizes a raw relay response into an `ExtractionResult`.
pub fn normalize(envelope: &Value) -> Result<ExtractionResult, ParseError> {
    let text = first_text_segment(envelope)?;
    parse_model_text(&text)
}

/// Finds the first content segment that carries generated text.
fn first_text_segment(envelope: &Value) -> Result<String, ParseError> {
    let parsed = MessageEnvelope::deserialize(envelope)
        .map_err(|e| ParseError::UnexpectedShape(e.to_string()))?;

    if parsed.content.is_empty() {
        return Err(ParseError::UnexpectedShape(
            "content array is empty".to_string(),
        ));
    }

    parsed
        .content
        .into_iter()
        .find_map(|segment| segment.text)
        .ok_or_else(|| ParseError::UnexpectedShape("no content segment carries text".to_string()))
}

/// Decodes the model's text as the extraction schema.
///
/// Literal `None` tokens are rewritten to `null` first. The substitution is textual and
/// applies everywhere in the reply, including inside string values.
pub fn parse_model_text(text: &str) -> Result<ExtractionResult, ParseError> {
    let cleaned = text.replace("None", "null");

    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| ParseError::MalformedOutput(e.to_string()))?;

    if !value.is_object() {
        return Err(ParseError::MalformedOutput(
            "model output is not a JSON object".to_string(),
        ));
    }

    let fields = ExtractedFields::deserialize(value)
        .map_err(|e| ParseError::MalformedOutput(e.to_string()))?;

    Ok(fields.into())
}
