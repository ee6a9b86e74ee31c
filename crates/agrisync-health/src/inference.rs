//! The seam between the analyzer and the generative AI service.

use std::future::Future;

use serde_json::Value;

use crate::{
    ingest::EncodedImage,
    schema::{ANALYSIS_INSTRUCTION, response_schema},
};

/// Everything the inference service receives for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub image: EncodedImage,
    pub instruction: &'static str,
    /// JSON schema the answer must follow.
    pub schema: Value,
}

impl InferenceRequest {
    /// Builds the plant disease request for an encoded image.
    pub fn plant_health(image: EncodedImage) -> Self {
        Self {
            image,
            instruction: ANALYSIS_INSTRUCTION,
            schema: response_schema(),
        }
    }
}

/// Failure of an inference call before any structured result was produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// The service could not be reached or answered with an error status.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered, but the response envelope could not be decoded.
    #[error("malformed response envelope: {0}")]
    Envelope(String),
}

/// An external service that classifies plant disease from an image.
///
/// Implementations return the raw structured text of the answer, or `None`
/// when the service answered without any text. Validating that text is the
/// caller's job (see [`crate::schema::parse_analysis`]).
pub trait InferenceClient: Send + Sync {
    fn generate(
        &self,
        request: &InferenceRequest,
    ) -> impl Future<Output = Result<Option<String>, InferenceError>> + Send;
}
