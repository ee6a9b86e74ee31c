//! The structured output contract with the inference service.
//!
//! [`response_schema`] is sent along with every request, and
//! [`parse_analysis`] checks that the answer actually follows it. Nothing is
//! filled in with defaults: a field that is missing or out of range fails the
//! whole result.

use agrisync_bridge::analysis::{AnalysisResult, ParseError};
use serde_json::{Map, Value, json};

/// Instruction sent with every image.
pub const ANALYSIS_INSTRUCTION: &str = "Analyze this image of a plant leaf. Identify any \
    diseases, provide a confidence score between 0.0 and 1.0, a brief description, and an \
    ordered list of actionable recommendations for treatment. Respond strictly in JSON \
    matching the provided schema.";

/// JSON schema of the expected answer, in the dialect of the Gemini
/// `responseSchema` field.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "disease": {
                "type": "STRING",
                "description": "The common name of the identified plant disease."
            },
            "confidence": {
                "type": "NUMBER",
                "description": "A confidence score from 0.0 to 1.0 indicating the model's certainty."
            },
            "description": {
                "type": "STRING",
                "description": "A brief summary of the disease, its cause, and symptoms."
            },
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "STRING",
                    "description": "An actionable recommendation for treating the disease."
                },
                "description": "A list of actionable steps to treat the identified disease."
            }
        },
        "required": ["disease", "confidence", "description", "recommendations"]
    })
}

/// Parses the text answer of the inference service into an
/// [`AnalysisResult`].
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, ParseError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ParseError::MalformedJson(e.to_string()))?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    Ok(AnalysisResult {
        disease_name: non_empty_string(object, "disease")?,
        confidence: confidence(object)?,
        description: non_empty_string(object, "description")?,
        recommendations: recommendations(object)?,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ParseError> {
    match object.get(name) {
        None => Err(ParseError::MissingField(name)),
        Some(Value::Null) => Err(invalid(name, "must not be null")),
        Some(value) => Ok(value),
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ParseError {
    ParseError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn non_empty_string(object: &Map<String, Value>, name: &'static str) -> Result<String, ParseError> {
    match field(object, name)? {
        Value::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        Value::String(_) => Err(invalid(name, "must not be empty")),
        other => Err(invalid(name, format!("expected a string, got {other}"))),
    }
}

fn confidence(object: &Map<String, Value>) -> Result<f64, ParseError> {
    const NAME: &str = "confidence";

    let score = match field(object, NAME)? {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid(NAME, format!("{number} is not representable")))?,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(NAME, format!("`{text}` is not a number")))?,
        other => return Err(invalid(NAME, format!("expected a number, got {other}"))),
    };

    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(invalid(NAME, format!("{score} is outside 0.0..=1.0")));
    }
    Ok(score)
}

fn recommendations(object: &Map<String, Value>) -> Result<Vec<String>, ParseError> {
    const NAME: &str = "recommendations";

    let Value::Array(items) = field(object, NAME)? else {
        return Err(invalid(NAME, "expected an array of strings"));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(step) => Ok(step.clone()),
            other => Err(invalid(
                NAME,
                format!("item {index} is not a string: {other}"),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn leaf_blight() -> Value {
        json!({
            "disease": "Leaf Blight",
            "confidence": 0.87,
            "description": "Fungal infection causing brown lesions on leaves.",
            "recommendations": ["Remove affected leaves", "Apply copper fungicide"]
        })
    }

    fn without(field: &str) -> String {
        let mut value = leaf_blight();
        value.as_object_mut().unwrap().remove(field);
        value.to_string()
    }

    fn with(field: &str, replacement: Value) -> String {
        let mut value = leaf_blight();
        value[field] = replacement;
        value.to_string()
    }

    #[test]
    fn parses_well_formed_result() {
        let result = parse_analysis(&leaf_blight().to_string()).expect("valid result");
        assert_eq!(
            result,
            AnalysisResult {
                disease_name: "Leaf Blight".into(),
                confidence: 0.87,
                description: "Fungal infection causing brown lesions on leaves.".into(),
                recommendations: vec![
                    "Remove affected leaves".into(),
                    "Apply copper fungicide".into()
                ],
            }
        );
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        for score in [json!(1.4), json!(-0.1), json!("2")] {
            let error = parse_analysis(&with("confidence", score.clone())).unwrap_err();
            assert!(
                matches!(error, ParseError::InvalidField { field: "confidence", .. }),
                "{score} gave {error:?}"
            );
        }
    }

    #[test]
    fn numeric_string_confidence_is_coerced() {
        let result = parse_analysis(&with("confidence", json!(" 0.5 "))).expect("coerced");
        assert_eq!(result.confidence, 0.5);

        let error = parse_analysis(&with("confidence", json!("high"))).unwrap_err();
        assert!(matches!(error, ParseError::InvalidField { .. }));
    }

    #[test]
    fn every_field_is_required() {
        for name in ["disease", "confidence", "description", "recommendations"] {
            assert_eq!(
                parse_analysis(&without(name)).unwrap_err(),
                ParseError::MissingField(name)
            );
        }
    }

    #[test]
    fn null_or_mistyped_recommendations_are_rejected() {
        for value in [json!(null), json!("Remove leaves"), json!(["ok", 3])] {
            let error = parse_analysis(&with("recommendations", value)).unwrap_err();
            assert!(matches!(
                error,
                ParseError::InvalidField { field: "recommendations", .. }
            ));
        }
    }

    #[test]
    fn empty_recommendations_are_allowed() {
        let result = parse_analysis(&with("recommendations", json!([]))).expect("valid");
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn blank_names_are_rejected() {
        let error = parse_analysis(&with("disease", json!("   "))).unwrap_err();
        assert!(matches!(error, ParseError::InvalidField { field: "disease", .. }));
    }

    #[test]
    fn malformed_bodies() {
        assert_eq!(parse_analysis("  ").unwrap_err(), ParseError::EmptyResponse);
        assert_eq!(parse_analysis("[1, 2]").unwrap_err(), ParseError::NotAnObject);
        assert!(matches!(
            parse_analysis("{\"disease\": ").unwrap_err(),
            ParseError::MalformedJson(_)
        ));
    }

    #[test]
    fn fenced_json_is_accepted() {
        let fenced = format!("```json\n{}\n```", leaf_blight());
        assert_eq!(parse_analysis(&fenced).expect("valid").disease_name, "Leaf Blight");
    }

    #[test]
    fn schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().map(Vec::len), Some(4));
    }
}
