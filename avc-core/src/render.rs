use crate::error::{Result, VerifyError};
use serde_json::Value;

/// Renders a status query response as `name = value` lines.
///
/// Fields come out in the order they appear in the response. A field whose
/// value is an object is rendered as `name = [k1, k2, ...]` followed by one
/// line per nested pair.
///
/// # Errors
///
/// Returns `VerifyError::MalformedResponse` if the top level is not an object.
pub fn render_query(data: &Value) -> Result<Vec<String>> {
    let fields = data
        .as_object()
        .ok_or_else(|| VerifyError::MalformedResponse("expected a JSON object".into()))?;

    let mut lines = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if let Value::Object(group) = value {
            let names: Vec<&str> = group.keys().map(String::as_str).collect();
            lines.push(format!("{key} = [{}]", names.join(", ")));
            for (sub_key, sub_value) in group {
                lines.push(format!("{sub_key} = {}", scalar(sub_value)));
            }
        } else {
            lines.push(format!("{key} = {}", scalar(value)));
        }
    }
    Ok(lines)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
