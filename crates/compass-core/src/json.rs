//! Extraction of JSON payloads embedded in free-form model output.
//!
//! Models asked for "JSON only" still wrap answers in prose or code fences.
//! The extractor takes the first balanced `{...}` span and nothing else.

use crate::error::{CompassError, Result};
use serde::de::DeserializeOwned;

/// Returns the first balanced `{...}` span of `text`.
///
/// Scanning starts at the first `{`. Braces inside JSON string literals are
/// ignored, honouring backslash escapes. Returns `None` when there is no `{`
/// or the span never closes.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extracts the first balanced object from `text` and deserializes it.
///
/// Fails closed with [`CompassError::Parse`] when no object is found or the
/// object does not match `T`.
pub fn parse_embedded_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let span = first_json_object(text)
        .ok_or_else(|| CompassError::parse("no JSON object found in model output"))?;
    serde_json::from_str(span).map_err(|err| CompassError::parse(format!("invalid JSON payload: {err}")))
}
