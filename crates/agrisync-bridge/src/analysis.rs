//! Shapes exchanged around a plant health analysis attempt.

use serde::{Deserialize, Serialize};

/// Structured diagnosis returned for a plant image.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisResult {
    /// Common name of the identified disease.
    pub disease_name: String,
    /// Model certainty, always within `0.0..=1.0`.
    pub confidence: f64,
    pub description: String,
    /// Remediation steps, in the order they should be applied.
    pub recommendations: Vec<String>,
}

/// The selected image cannot be sent for analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please select an image first")]
    NoImageSelected,
    #[error("failed to read the image: {0}")]
    Unreadable(String),
    #[error("the selected file is empty")]
    Empty,
    #[error("the image is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("`{0}` is not a supported image type")]
    UnsupportedMediaType(String),
}

/// The inference service answered, but not with what was asked for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("the service returned no result")]
    EmptyResponse,
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),
    #[error("result is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("result is not a JSON object")]
    NotAnObject,
    #[error("result is missing `{0}`")]
    MissingField(&'static str),
    #[error("result field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Why an analysis attempt failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request to the inference service failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AnalysisError {
    /// Text shown next to the analysis panel. Validation problems are
    /// reported as-is; everything else gets a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Validation(error) => capitalize(&error.to_string()),
            AnalysisError::Transport(_) => "Failed to analyze image. Please try again.".to_owned(),
            AnalysisError::Parse(_) => "AI analysis did not return a valid result.".to_owned(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Observable state of the analyzer of one crop-detail session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Encoding,
    Requesting,
    Succeeded(AnalysisResult),
    Failed(AnalysisError),
}

impl AnalysisState {
    /// An attempt is underway and a new one would be rejected or supersede it.
    pub fn is_busy(&self) -> bool {
        matches!(self, AnalysisState::Encoding | AnalysisState::Requesting)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            AnalysisState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_transport_errors_hide_details() {
        let parse = AnalysisError::Parse(ParseError::MissingField("recommendations"));
        assert_eq!(
            parse.user_message(),
            "AI analysis did not return a valid result."
        );

        let transport = AnalysisError::Transport("connection reset".into());
        assert!(!transport.user_message().contains("connection reset"));
    }

    #[test]
    fn validation_errors_are_shown_inline() {
        let error = AnalysisError::from(ValidationError::NoImageSelected);
        assert_eq!(error.user_message(), "Please select an image first");
    }

    #[test]
    fn busy_states() {
        assert!(AnalysisState::Encoding.is_busy());
        assert!(AnalysisState::Requesting.is_busy());
        assert!(!AnalysisState::Idle.is_busy());
        assert!(!AnalysisState::Failed(ValidationError::Empty.into()).is_busy());
    }
}
