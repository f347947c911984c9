/// Schema-constrained output: the request side and the validation side.
///
/// Both the JSON Schema sent to the provider and the parser applied to its reply are
/// derived from the same Rust type, so the two cannot drift apart.
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::openai::ResponseFormat;

/// Name under which every output schema is registered with the provider.
pub const SCHEMA_NAME: &str = "Learning_Code";

/// Completion text that is not valid JSON or does not match the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("JSON parsing failed: {reason}")]
pub struct OutputInvalid {
    pub reason: String,
}

/// Build the `response_format` asking for output shaped like `T`.
pub fn response_format_for<T: JsonSchema>() -> ResponseFormat {
    let schema = schemars::schema_for!(T);
    ResponseFormat::json_schema(SCHEMA_NAME, serde_json::Value::from(schema))
}

/// Parse raw completion text as `T`.
///
/// Only structure is checked (required fields, JSON types). Unknown fields are ignored.
pub fn validate<T: DeserializeOwned>(raw: &str) -> Result<T, OutputInvalid> {
    serde_json::from_str::<T>(raw).map_err(|e| OutputInvalid {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize, JsonSchema)]
    struct Answer {
        answer: String,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    struct Wrapper {
        items: Vec<Answer>,
    }

    #[test]
    fn schema_lists_required_fields() {
        let format = response_format_for::<Answer>();
        assert_eq!(format.kind, "json_schema");
        assert_eq!(format.json_schema.name, "Learning_Code");

        let schema = &format.json_schema.schema;
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["answer"]["type"], "string");
        assert_eq!(schema["required"], serde_json::json!(["answer"]));
    }

    #[test]
    fn nested_types_are_described() {
        let format = response_format_for::<Wrapper>();
        let rendered = format.json_schema.schema.to_string();
        assert!(rendered.contains("\"items\""));
        assert!(rendered.contains("Answer"));
    }

    #[test]
    fn accepts_conforming_output() {
        let parsed: Answer = validate(r#"{"answer": "Do not click the link."}"#).unwrap();
        assert_eq!(
            parsed,
            Answer {
                answer: "Do not click the link.".to_string()
            }
        );
    }

    #[test]
    fn ignores_unknown_fields() {
        let parsed: Answer = validate(r#"{"answer": "ok", "confidence": 0.9}"#).unwrap();
        assert_eq!(parsed.answer, "ok");
    }

    #[test]
    fn rejects_non_json() {
        let err = validate::<Answer>("Sure! Here is your answer: be careful").unwrap_err();
        assert!(err.to_string().starts_with("JSON parsing failed:"));
    }

    #[test]
    fn rejects_missing_field() {
        let err = validate::<Answer>(r#"{"reply": "hi"}"#).unwrap_err();
        assert!(err.reason.contains("missing field `answer`"), "{}", err.reason);
    }

    #[test]
    fn rejects_wrong_type() {
        assert!(validate::<Answer>(r#"{"answer": 42}"#).is_err());
    }
}
