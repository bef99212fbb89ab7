//! The remote multimodal model as an injectable capability.
//!
//! `VisionModel` is the seam: production code talks to Gemini's
//! `generateContent` endpoint, tests substitute [`MockVisionModel`] and
//! never touch the network. One request per image, no retry, no timeout —
//! a call runs to completion or failure.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ExtractionError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// An image-plus-instruction to text capability.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send one instruction + inline image and return the model's raw text.
    async fn generate(
        &self,
        prompt: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<String, ExtractionError>;
}

// ──────────────────────────────────────────────
// GeminiClient
// ──────────────────────────────────────────────

/// Production client for the Gemini `generateContent` REST API.
///
/// The credential is optional at construction so the service can start
/// without one; every call then fails fast with the configuration error
/// before any network I/O.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
enum Part<'a> {
    #[serde(rename = "inlineData")]
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: &'a str,
    },
    #[serde(rename = "text")]
    Text(&'a str),
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<String, ExtractionError> {
        let api_key = self.api_key.as_deref().ok_or(ExtractionError::MissingApiKey)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        mime_type,
                        data: image_base64,
                    },
                    Part::Text(prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_invalid_key_response(&body) {
                return Err(ExtractionError::InvalidApiKey);
            }
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }
        Ok(text)
    }
}

/// The service reports a bad credential as a 400 whose body names the key.
fn is_invalid_key_response(body: &str) -> bool {
    body.contains("API key not valid") || body.contains("API_KEY_INVALID")
}

// ──────────────────────────────────────────────
// MockVisionModel (testing)
// ──────────────────────────────────────────────

/// Mock capability for tests: a default response, plus per-image overrides
/// keyed by the base64 payload so batch tests can make one file fail while
/// its siblings succeed.
pub struct MockVisionModel {
    default_response: Result<String, String>,
    overrides: HashMap<String, Result<String, String>>,
}

impl MockVisionModel {
    pub fn new(response: &str) -> Self {
        Self {
            default_response: Ok(response.to_string()),
            overrides: HashMap::new(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            default_response: Err(message.to_string()),
            overrides: HashMap::new(),
        }
    }

    pub fn with_response_for(mut self, image_base64: &str, response: &str) -> Self {
        self.overrides
            .insert(image_base64.to_string(), Ok(response.to_string()));
        self
    }

    pub fn failing_for(mut self, image_base64: &str, message: &str) -> Self {
        self.overrides
            .insert(image_base64.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    async fn generate(
        &self,
        _prompt: &str,
        image_base64: &str,
        _mime_type: &str,
    ) -> Result<String, ExtractionError> {
        let outcome = self
            .overrides
            .get(image_base64)
            .unwrap_or(&self.default_response);
        match outcome {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ExtractionError::Http(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_fails_before_any_network_call() {
        // An unroutable base URL proves no request is attempted.
        let client =
            GeminiClient::new(None, "gemini-test").with_base_url("http://127.0.0.1:1/v1beta");
        let err = client.generate("prompt", "aW1n", "image/png").await.unwrap_err();
        assert!(matches!(err, ExtractionError::MissingApiKey));
    }

    #[tokio::test]
    async fn mock_returns_default_response() {
        let mock = MockVisionModel::new(r#"{"soHoaDon":"1"}"#);
        let text = mock.generate("p", "aW1n", "image/png").await.unwrap();
        assert_eq!(text, r#"{"soHoaDon":"1"}"#);
    }

    #[tokio::test]
    async fn mock_overrides_by_image_payload() {
        let mock = MockVisionModel::new("default")
            .with_response_for("Zmlyc3Q=", "first")
            .failing_for("c2Vjb25k", "mạng lỗi");
        assert_eq!(mock.generate("p", "Zmlyc3Q=", "image/png").await.unwrap(), "first");
        assert!(mock.generate("p", "c2Vjb25k", "image/png").await.is_err());
        assert_eq!(mock.generate("p", "b3RoZXI=", "image/png").await.unwrap(), "default");
    }

    #[test]
    fn invalid_key_detection_matches_service_phrasing() {
        assert!(is_invalid_key_response(
            r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#
        ));
        assert!(is_invalid_key_response(r#"{"error":{"status":"API_KEY_INVALID"}}"#));
        assert!(!is_invalid_key_response(r#"{"error":{"message":"quota exceeded"}}"#));
    }

    #[test]
    fn request_body_uses_camel_case_wire_names() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        mime_type: "image/png",
                        data: "aW1n",
                    },
                    Part::Text("prompt"),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "prompt");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }
}
