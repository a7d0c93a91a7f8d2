//! Decoding of uploaded documents
//!
//! Browser upload widgets hand over `data:<mime>;base64,<payload>` strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::PipelineError;

/// Parse plain JSON text
pub fn parse_json(text: &str) -> Result<Value, PipelineError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a base64 data URL into a JSON value
pub fn decode_data_url(contents: &str) -> Result<Value, PipelineError> {
    let Some((header, payload)) = contents.split_once(',') else {
        return Err(PipelineError::MalformedUpload {
            reason: "missing `,` between header and payload".into(),
        });
    };

    if !header.ends_with(";base64") {
        return Err(PipelineError::MalformedUpload {
            reason: format!("header `{header}` is not base64-encoded"),
        });
    }

    let bytes = STANDARD.decode(payload.trim()).map_err(|e| {
        warn!(error = %e, "Failed to decode upload payload");
        PipelineError::MalformedUpload {
            reason: format!("invalid base64: {e}"),
        }
    })?;

    debug!(header, bytes = bytes.len(), "Decoded upload");
    Ok(serde_json::from_slice(&bytes)?)
}
