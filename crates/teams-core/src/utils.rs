//! Secret masking and error-body sanitization helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 500;
const REDACTED: &str = "[REDACTED]";

static KEY_VALUE_SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(access_token|refresh_token|id_token|code|client_info|ESTSAUTHPERSISTENT)\b\s*[:=]\s*["']?[^"'&,\s}]+"#,
    )
    .expect("valid key/value secret regex")
});

/// Short preview of a secret for logs: first and last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Redact token-bearing fields from an identity-provider error body and truncate it.
pub fn sanitize_error_body(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty response body>".to_string();
    }

    if let Ok(mut json) = serde_json::from_str::<Value>(trimmed) {
        redact_json_value(&mut json);
        let serialized =
            serde_json::to_string(&json).unwrap_or_else(|_| "<unserializable body>".to_string());
        return truncate(serialized);
    }

    truncate(
        KEY_VALUE_SECRET_RE
            .replace_all(trimmed, "$1=[REDACTED]")
            .into_owned(),
    )
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace('-', "_");
    normalized.contains("token")
        || normalized == "code"
        || normalized == "client_info"
        || normalized.contains("cookie")
        || normalized.contains("estsauth")
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_ERROR_TEXT_CHARS {
        return text;
    }
    let clipped: String = text.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!("{}...", clipped)
}
