//! Text extraction over untyped provider response trees.
//!
//! Response shapes vary widely across OpenAI-compatible deployments, so the
//! body is kept as an untyped `serde_json::Value` and probed with an ordered
//! list of known field paths; the first path that normalizes to non-blank
//! text wins. The list is a priority order, not an exhaustive catalogue —
//! shapes it does not know fail closed into empty text, which the classifier
//! reports as `EMPTY_CONTENT` rather than guessing.

use serde_json::Value;

/// Extract the generated text from a parsed response body.
///
/// Returns an empty string when no known path yields usable text.
pub fn extract_text(data: &Value) -> String {
    let candidates = [
        data.pointer("/choices/0/message/content"),
        data.pointer("/choices/0/text"),
        data.pointer("/choices/0/delta/content"),
        data.get("output_text"),
        data.pointer("/output/0/content/0/text"),
        data.pointer("/content/0/text"),
        data.pointer("/message/content/0/text"),
        data.pointer("/message/content"),
        data.get("response"),
        data.get("result"),
        data.get("answer"),
        data.pointer("/data/choices/0/message/content"),
        data.pointer("/data/choices/0/text"),
        data.pointer("/candidates/0/content/parts/0/text"),
        data.pointer("/candidates/0/output"),
        data.pointer("/generations/0/text"),
        data.get("completion"),
        data.get("text"),
    ];

    for candidate in candidates.into_iter().flatten() {
        let normalized = normalize_text(candidate);
        if !normalized.trim().is_empty() {
            return normalized;
        }
    }

    String::new()
}

/// Normalize one candidate value to plain text.
///
/// Strings pass through; arrays of parts concatenate each part's text in
/// order, skipping blanks; objects expose `.text` or `.content` (recursing
/// into array content); scalars stringify; null is blank.
pub(crate) fn normalize_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(items) => {
            let mut out = String::new();
            for item in items {
                out.push_str(&normalize_text(part_payload(item)));
            }
            out
        }
        Value::Object(obj) => {
            if let Some(Value::String(text)) = obj.get("text") {
                return text.clone();
            }
            if let Some(content) = obj.get("content") {
                if let Value::String(text) = content {
                    return text.clone();
                }
                if content.is_array() {
                    return normalize_text(content);
                }
            }
            String::new()
        }
        Value::String(text) => text.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// Pick the payload of one array part: its `text` field when non-blank,
/// else its `content` field when non-blank, else the part itself.
fn part_payload(item: &Value) -> &Value {
    if let Some(text) = item.get("text") {
        if is_usable(text) {
            return text;
        }
    }
    if let Some(content) = item.get("content") {
        if is_usable(content) {
            return content;
        }
    }
    item
}

/// Whether a part field carries anything worth normalizing.
fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Extract the output-token count from the usage block, across the naming
/// variants providers use. Absent or non-numeric counts yield `None`.
pub(crate) fn extract_text_tokens(data: &Value) -> Option<u64> {
    let usage = data.get("usage").or_else(|| data.get("usageMetadata"))?;
    for key in [
        "completion_tokens",
        "output_tokens",
        "text_tokens",
        "candidatesTokenCount",
        "outputTokenCount",
    ] {
        if let Some(count) = usage.get(key).and_then(Value::as_u64) {
            return Some(count);
        }
    }
    None
}

/// The finish reason of the first choice, when the body carries one.
pub(crate) fn finish_reason(data: &Value) -> Option<String> {
    data.pointer("/choices/0/finish_reason")
        .and_then(Value::as_str)
        .map(str::to_string)
}
