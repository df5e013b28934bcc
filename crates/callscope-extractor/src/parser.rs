//! Parse LLM output into an analysis record

use crate::error::ExtractionError;
use callscope_domain::StructuredAnalysis;
use serde_json::{Map, Value};

/// Parse a model response into a [`StructuredAnalysis`]
///
/// Accepts a bare JSON object, an object wrapped in markdown code fences, or
/// an object surrounded by prose. Sub-fields with the wrong shape fall back to
/// their defaults; only a response with no readable JSON object fails.
pub fn parse_llm_response(response: &str) -> Result<StructuredAnalysis, ExtractionError> {
    let object = extract_object(response)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ExtractionError::new(response, e.to_string()))
}

/// Find the JSON object in a response
fn extract_object(response: &str) -> Result<Map<String, Value>, ExtractionError> {
    let cleaned = strip_fences(response);
    let cleaned = cleaned.trim();

    let direct_error = match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => format!("expected a JSON object, found {}", kind_of(&other)),
        Err(e) => e.to_string(),
    };

    // Greedy span from the first '{' to the last '}'
    let span = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => return Err(ExtractionError::new(response, direct_error)),
    };

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExtractionError::new(
            response,
            format!("expected a JSON object, found {}", kind_of(&other)),
        )),
        Err(e) => Err(ExtractionError::new(response, e.to_string())),
    }
}

/// Remove every ```` ```json ```` and ```` ``` ```` fence, with trailing whitespace
fn strip_fences(response: &str) -> String {
    let mut out = String::with_capacity(response.len());
    let mut rest = response;

    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        if let Some(after) = rest.strip_prefix("json") {
            rest = after;
        }
        rest = rest.trim_start();
    }
    out.push_str(rest);
    out
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_domain::{BuyingStage, Level, ObjectionCategory};

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{
            "summary": "Ops lead at a mid-size MCA lender.",
            "objections": [
                {"category": "Pricing", "detail": "Too expensive", "severity": "high"}
            ],
            "deal_signals": {"buying_stage": "Consideration", "confidence_score": 0.6}
        }"#;

        let analysis = parse_llm_response(response).unwrap();
        assert_eq!(analysis.summary, "Ops lead at a mid-size MCA lender.");
        assert_eq!(analysis.objections.len(), 1);
        assert_eq!(analysis.objections[0].category, ObjectionCategory::Pricing);
        assert_eq!(analysis.objections[0].severity, Some(Level::High));
        let signals = analysis.deal_signals.unwrap();
        assert_eq!(signals.buying_stage, Some(BuyingStage::Consideration));
        assert_eq!(signals.confidence_score, Some(0.6));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"summary\": \"fenced\"}\n```";
        let analysis = parse_llm_response(response).unwrap();
        assert_eq!(analysis.summary, "fenced");
    }

    #[test]
    fn test_parse_json_with_bare_fence() {
        let response = "```\n{\"summary\": \"bare\"}\n```\n";
        assert_eq!(parse_llm_response(response).unwrap().summary, "bare");
    }

    #[test]
    fn test_parse_json_after_prose() {
        let response = "Here is the analysis you asked for:\n{\"summary\": \"found\", \"next_steps\": [\"Send deck\"]}\nLet me know!";
        let analysis = parse_llm_response(response).unwrap();
        assert_eq!(analysis.summary, "found");
        assert_eq!(analysis.next_steps, vec!["Send deck".to_string()]);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_llm_response("This is not JSON").unwrap_err();
        assert_eq!(err.raw_excerpt, "This is not JSON");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_parse_truncated_object() {
        let response = "{\"summary\": \"cut off mid";
        assert!(parse_llm_response(response).is_err());
    }

    #[test]
    fn test_parse_json_array_rejected() {
        // The brace scan finds the inner object
        let analysis = parse_llm_response(r#"[{"summary": "x"}]"#).unwrap();
        assert_eq!(analysis.summary, "x");

        let err = parse_llm_response("[1, 2, 3]").unwrap_err();
        assert!(err.reason.contains("an array"));
    }

    #[test]
    fn test_parse_malformed_fields_default() {
        let response = r#"{
            "summary": 42,
            "key_phrases": "none",
            "objections": [{"category": "Bananas", "detail": "odd"}, 7],
            "deal_signals": "unknown"
        }"#;

        let analysis = parse_llm_response(response).unwrap();
        assert!(analysis.key_phrases.is_empty());
        assert_eq!(analysis.objections.len(), 1);
        assert_eq!(analysis.objections[0].category, ObjectionCategory::Other);
        assert!(analysis.deal_signals.is_none());
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{}\n```"), "{}\n");
        assert_eq!(strip_fences("no fences"), "no fences");
        assert_eq!(strip_fences("a ```  b"), "a b");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let response = format!("oops {}", "z".repeat(2000));
        let err = parse_llm_response(&response).unwrap_err();
        assert_eq!(err.raw_excerpt.chars().count(), crate::error::RAW_EXCERPT_CHARS);
    }
}
