//! Parse advisor replies into classification results

use crate::error::StageError;
use serde_json::{Map, Value};
use tabviz_domain::{ChartType, ClassificationResult, Method};

/// Parse a `{chartType, xColumn, yColumn}` reply.
///
/// All three keys must be present; axis values may be strings or `null`.
/// Anything else is a [`StageError::GenerativeMalformedResponse`].
pub fn parse_reply(reply: &str) -> Result<ClassificationResult, StageError> {
    let json_str = extract_json(reply)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| malformed(format!("JSON parse error: {}", e)))?;
    let obj = json
        .as_object()
        .ok_or_else(|| malformed("Expected JSON object".to_string()))?;

    let raw_type = obj
        .get("chartType")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("Missing or invalid 'chartType'".to_string()))?;
    let chart_type = ChartType::parse(raw_type)
        .filter(|t| *t != ChartType::Unknown)
        .ok_or_else(|| malformed(format!("Unsupported chart type '{}'", raw_type)))?;

    let x_column = axis(obj, "xColumn")?;
    let y_column = axis(obj, "yColumn")?;

    Ok(ClassificationResult::new(chart_type, Method::Generative).with_axes(x_column, y_column))
}

fn malformed(message: String) -> StageError {
    StageError::GenerativeMalformedResponse(message)
}

fn axis(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, StageError> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.trim().to_string())),
        Some(Value::String(_)) | Some(Value::Null) => Ok(None),
        Some(_) => Err(malformed(format!("Invalid '{}'", key))),
        None => Err(malformed(format!("Missing '{}'", key))),
    }
}

/// Extract JSON from a reply, handling markdown code blocks
fn extract_json(reply: &str) -> Result<String, StageError> {
    let trimmed = reply.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            // Single-line fence: ```{...}```
            let inner = trimmed.trim_matches('`').trim();
            let inner = inner.strip_prefix("json").unwrap_or(inner).trim();
            if inner.is_empty() {
                return Err(malformed("Empty code block".to_string()));
            }
            return Ok(inner.to_string());
        }

        // Skip the opening fence line and a closing fence line
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reply() {
        let result = parse_reply(r#"{"chartType": "pie", "xColumn": "label", "yColumn": "value"}"#).unwrap();
        assert_eq!(result.chart_type, ChartType::Pie);
        assert_eq!(result.method, Method::Generative);
        assert_eq!(result.x_column.as_deref(), Some("label"));
        assert_eq!(result.y_column.as_deref(), Some("value"));
    }

    #[test]
    fn test_fenced_reply() {
        let reply = "```json\n{\"chartType\": \"line\", \"xColumn\": \"month\", \"yColumn\": null}\n```";
        let result = parse_reply(reply).unwrap();
        assert_eq!(result.chart_type, ChartType::Line);
        assert_eq!(result.y_column, None);
    }

    #[test]
    fn test_single_line_fence() {
        let reply = r#"```{"chartType": "3D Bar", "xColumn": "a", "yColumn": "b"}```"#;
        assert_eq!(parse_reply(reply).unwrap().chart_type, ChartType::Bar3d);
    }

    #[test]
    fn test_not_json() {
        let result = parse_reply("I would use a bar chart.");
        assert!(matches!(result, Err(StageError::GenerativeMalformedResponse(_))));
    }

    #[test]
    fn test_missing_keys() {
        assert!(parse_reply(r#"{"chartType": "bar", "xColumn": "a"}"#).is_err());
        assert!(parse_reply(r#"{"xColumn": "a", "yColumn": "b"}"#).is_err());
        assert!(parse_reply(r#"["bar"]"#).is_err());
    }

    #[test]
    fn test_unsupported_chart_type() {
        let result = parse_reply(r#"{"chartType": "histogram", "xColumn": "a", "yColumn": "b"}"#);
        assert!(matches!(result, Err(StageError::GenerativeMalformedResponse(msg)) if msg.contains("histogram")));
        assert!(parse_reply(r#"{"chartType": "unknown", "xColumn": "a", "yColumn": "b"}"#).is_err());
    }
}
