//! Recovering one JSON object from free-form model output
//!
//! Models asked for "only JSON" still wrap it in prose or code fences. This
//! module first tries the whole (fence-stripped) text, then falls back to a
//! balanced-brace scan that treats string literals as opaque.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?is)```(?:json)?\s*(.*?)```").unwrap();
    static ref LEADING_FENCE: Regex = Regex::new(r"(?i)^```(?:json)?").unwrap();
    static ref TRAILING_FENCE: Regex = Regex::new(r"```$").unwrap();
}

/// Remove a ```json / ``` fence around the content, if any.
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();

    if let Some(caps) = FENCED_BLOCK.captures(trimmed) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().trim().to_string();
        }
    }

    let without_leading = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE
        .replace(without_leading.trim(), "")
        .trim()
        .to_string()
}

/// Return the first balanced top-level `{...}` object in `content`.
///
/// Braces inside double-quoted strings are ignored and `\"` does not end a
/// string. Returns `None` when the first object never closes.
pub fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, ch) in content[start..].char_indices() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&content[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse model output that should contain a JSON value.
///
/// Tries the fence-stripped text as a whole first, then the first balanced
/// object inside it.
pub fn parse_json_content(content: &str) -> Option<Value> {
    if content.trim().is_empty() {
        return None;
    }

    let cleaned = strip_code_fence(content);
    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Some(value);
    }

    let candidate = extract_json_object(&cleaned)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Balanced candidate is not valid JSON: {}", e);
            None
        }
    }
}
