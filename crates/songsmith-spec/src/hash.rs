//! Canonical hashing and prompt seed derivation.
//!
//! This module implements the determinism policy for songsmith:
//! - Prompt normalization (trim + lowercase) before seeding
//! - BLAKE3 seed derivation from the normalized prompt
//! - Canonical JSON (sorted keys, no whitespace) + BLAKE3 for note sequences

use crate::error::SpecResult;
use crate::note::NoteSequence;

/// Normalizes a prompt for seeding: surrounding whitespace is trimmed and
/// the text is lowercased.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

/// Derives the composition seed for a prompt.
///
/// ```text
/// seed = truncate_u32(BLAKE3(normalize(prompt)))
/// ```
///
/// Empty and whitespace-only prompts are valid and all map to the same seed.
///
/// # Example
/// ```
/// use songsmith_spec::hash::prompt_seed;
///
/// assert_eq!(prompt_seed("Rainy Night"), prompt_seed("  rainy night\n"));
/// assert_ne!(prompt_seed("rainy night"), prompt_seed("sunny day"));
/// ```
pub fn prompt_seed(prompt: &str) -> u32 {
    let normalized = normalize_prompt(prompt);
    let hash = blake3::hash(normalized.as_bytes());
    truncate_u32(hash.as_bytes())
}

/// Derives a seed for a named component from a base seed.
///
/// ```text
/// component_seed = truncate_u32(BLAKE3(base_seed || key))
/// ```
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    truncate_u32(hash.as_bytes())
}

/// First four bytes of a digest, little-endian.
fn truncate_u32(digest: &[u8; 32]) -> u32 {
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Computes the canonical BLAKE3 hash of a note sequence.
///
/// Two sequences hash equal exactly when every note, the tempo, the instrument,
/// and the drum flag are equal.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn canonical_sequence_hash(sequence: &NoteSequence) -> SpecResult<String> {
    let value = serde_json::to_value(sequence)?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    let canonical = canonicalize_json(value);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Canonicalizes a JSON value.
///
/// Object keys are sorted, there is no insignificant whitespace, and floats use
/// Rust's shortest round-trip formatting, so the output is stable and lossless.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n),
        serde_json::Value::String(s) => format_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                "0".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                format!("{}", f)
            }
        }
        _ => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
