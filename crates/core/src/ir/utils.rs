//! Common helpers shared across compilation and emission.

/// Check whether a property name needs quoting to be a legal object key.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a double-quoted TypeScript string literal.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property name if it is not a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        let escaped = escape_string(name);
        format!("\"{escaped}\"")
    } else {
        name.to_string()
    }
}

/// Render a JSON value as doc-tag text: bare scalars, compact JSON for
/// compound values.
pub fn doc_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
