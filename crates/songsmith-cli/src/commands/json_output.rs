//! JSON output types for the `--json` flag.
//!
//! Every command prints a single [`CommandOutput`] envelope so scripts can
//! check `success` and then read either `result` or `error`.

use anyhow::{Context, Result};
use serde::Serialize;
use songsmith_spec::BackendError;

/// Envelope printed by every command in JSON mode.
#[derive(Debug, Serialize)]
pub struct CommandOutput<T: Serialize> {
    /// Whether the command succeeded.
    pub success: bool,
    /// Command-specific payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// Failure details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl<T: Serialize> CommandOutput<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: JsonError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

/// A backend error in machine-readable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonError {
    /// Stable code such as `AUDIO_001`.
    pub code: String,
    /// Error category (`spec`, `music`, `audio`).
    pub category: String,
    pub message: String,
}

impl JsonError {
    pub fn from_backend<E: BackendError + ?Sized>(err: &E) -> Self {
        Self {
            code: err.code().to_string(),
            category: err.category().to_string(),
            message: err.message(),
        }
    }
}

/// Result payload of `compose`.
#[derive(Debug, Serialize)]
pub struct ComposeResult {
    pub notes_path: String,
    pub midi_path: String,
    pub genre: String,
    pub emotion: String,
    pub scale: String,
    pub tempo: u32,
    pub note_count: usize,
    pub duration_seconds: f64,
    pub sequence_hash: String,
    pub midi_hash: String,
}

/// Result payload of `sing`.
#[derive(Debug, Serialize)]
pub struct SingResult {
    pub output_path: String,
    /// `resynthesized` or `fallback_polished`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub pcm_hash: String,
}

/// Result payload of `mix`.
#[derive(Debug, Serialize)]
pub struct MixResult {
    pub output_path: String,
    pub pcm_hash: String,
}

/// Prints `output` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(output: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(output).context("failed to serialize JSON output")?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsmith_spec::SpecError;

    #[test]
    fn test_error_envelope_omits_result() {
        let err = SpecError::invalid_config("alpha", "must be within [0, 1]");
        let out: CommandOutput<MixResult> = CommandOutput::err(JsonError::from_backend(&err));
        let value = serde_json::to_value(&out).unwrap();

        assert_eq!(value["success"], false);
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], "SPEC_005");
        assert_eq!(value["error"]["category"], "spec");
    }

    #[test]
    fn test_fallback_reason_skipped_when_absent() {
        let out = CommandOutput::ok(SingResult {
            output_path: "vocal.wav".into(),
            outcome: "resynthesized".into(),
            fallback_reason: None,
            sample_rate: 16000,
            duration_seconds: 1.0,
            pcm_hash: "00".into(),
        });
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["result"]["outcome"], "resynthesized");
        assert!(value["result"].get("fallback_reason").is_none());
    }
}
