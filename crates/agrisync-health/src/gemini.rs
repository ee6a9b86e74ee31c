//! [`InferenceClient`] backed by the Gemini `generateContent` REST API.

use std::time::Duration;

use agrisync_bridge::config::InferenceConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::inference::{InferenceClient, InferenceError, InferenceRequest};

/// Longest slice of an error body kept in a transport error message.
const MAX_ERROR_DETAIL: usize = 300;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: &'a str,
    },
    Text(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn request_body(request: &InferenceRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: [Content {
            parts: [
                Part::InlineData {
                    mime_type: &request.image.mime_type,
                    data: &request.image.base64_payload,
                },
                Part::Text(request.instruction),
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.schema,
        },
    }
}

/// Concatenated text of the first candidate, if there is any.
fn extract_text(body: &[u8]) -> Result<Option<String>, InferenceError> {
    let response: GenerateContentResponse =
        serde_json::from_slice(body).map_err(|e| InferenceError::Envelope(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    Ok((!text.trim().is_empty()).then_some(text))
}

fn truncate(detail: &str) -> &str {
    match detail.char_indices().nth(MAX_ERROR_DETAIL) {
        Some((index, _)) => &detail[..index],
        None => detail,
    }
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GeminiClient {
    /// Creates a client from the inference settings. The API key is taken
    /// from the environment variable named in the settings. Clones share the
    /// connection pool and the key.
    pub fn new(http: reqwest::Client, config: &InferenceConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

impl InferenceClient for GeminiClient {
    async fn generate(
        &self,
        request: &InferenceRequest,
    ) -> Result<Option<String>, InferenceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(InferenceError::Transport(
                "no API key configured for the inference service".to_owned(),
            ));
        };

        log::info!(
            "Requesting plant health analysis from {} ({})",
            self.model,
            request.image.mime_type
        );

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .timeout(self.timeout)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body);
            return Err(InferenceError::Transport(format!(
                "{status}: {}",
                truncate(detail.trim())
            )));
        }

        log::info!("Plant health analysis response received ({} bytes)", body.len());
        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ingest::EncodedImage;

    fn request() -> InferenceRequest {
        InferenceRequest::plant_health(EncodedImage {
            base64_payload: "iVBORw0KGgo=".to_owned(),
            mime_type: "image/png".to_owned(),
        })
    }

    #[test]
    fn body_follows_generate_content_shape() {
        let request = request();
        let body = serde_json::to_value(request_body(&request)).expect("serializable");

        assert_eq!(
            body["contents"][0]["parts"][0],
            json!({ "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } })
        );
        assert_eq!(
            body["contents"][0]["parts"][1]["text"],
            json!(request.instruction)
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            json!("application/json")
        );
        assert_eq!(body["generationConfig"]["responseSchema"], request.schema);
    }

    #[test]
    fn extracts_candidate_text() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"disease\":" }, { "text": "\"Rust\"}" }] },
                "finishReason": "STOP"
            }]
        });
        let text = extract_text(body.to_string().as_bytes()).expect("valid envelope");
        assert_eq!(text.as_deref(), Some("{\"disease\":\"Rust\"}"));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(extract_text(body.to_string().as_bytes()), Ok(None));
    }

    #[test]
    fn garbage_envelope_is_rejected() {
        assert!(matches!(
            extract_text(b"<html>502</html>"),
            Err(InferenceError::Envelope(_))
        ));
    }

    #[test]
    fn url_includes_model() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            &InferenceConfig {
                endpoint: "https://example.test/".to_owned(),
                ..InferenceConfig::default()
            },
        );
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_every_clone_without_a_request() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            &InferenceConfig {
                endpoint: "http://127.0.0.1:9".to_owned(),
                api_key_env: "AGRISYNC_TEST_KEY_THAT_IS_NEVER_SET".to_owned(),
                ..InferenceConfig::default()
            },
        );
        let shared = client.clone();

        assert!(!client.has_api_key());
        assert!(!shared.has_api_key());
        assert_eq!(shared.url(), client.url());
        assert!(matches!(
            shared.generate(&request()).await,
            Err(InferenceError::Transport(reason)) if reason.contains("no API key")
        ));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let detail = "x".repeat(1000);
        assert_eq!(truncate(&detail).len(), MAX_ERROR_DETAIL);
        assert_eq!(truncate("short"), "short");
    }
}
