//! Gemini client for enhanced narration.
//!
//! Sends the frame (as base64 JPEG) and the detection summary to the
//! `generateContent` endpoint and returns the model's raw text. Models are
//! tried in order until one answers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wayside_spatial::{Frame, DEFAULT_JPEG_QUALITY};

use crate::enhancer::{EnhancementRequest, RemoteEnhancer};
use crate::error::{EnhancerError, EnhancerResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Placeholder some setups leave in place of a real key.
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; the client is unavailable without one
    pub api_key: Option<String>,
    /// Scheme and host of the API
    pub base_url: String,
    /// Models tried in order
    pub models: Vec<String>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    pub jpeg_quality: u8,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: vec![
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-flash-lite".to_string(),
            ],
            request_timeout: Duration::from_secs(10),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            models: std::env::var("GEMINI_MODELS")
                .map(|s| {
                    s.split(',')
                        .map(|m| m.trim().to_string())
                        .filter(|m| !m.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.models),
            request_timeout: Duration::from_secs(
                std::env::var("GEMINI_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            jpeg_quality: defaults.jpeg_quality,
        }
    }

    /// Check if a usable API key and at least one model are configured.
    pub fn is_configured(&self) -> bool {
        let has_key = self
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY);
        has_key && !self.models.is_empty()
    }
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Remote enhancer backed by the Gemini API.
pub struct GeminiEnhancer {
    config: GeminiConfig,
    client: Client,
}

impl GeminiEnhancer {
    /// Create a new Gemini enhancer.
    pub fn new(config: GeminiConfig) -> EnhancerResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EnhancerError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> EnhancerResult<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn encode_frame(&self, frame: Arc<Frame>) -> EnhancerResult<String> {
        let quality = self.config.jpeg_quality;
        let jpeg = tokio::task::spawn_blocking(move || frame.encode_jpeg(quality))
            .await
            .map_err(|e| EnhancerError::Encoding(e.to_string()))?
            .map_err(|e| EnhancerError::Encoding(e.to_string()))?;
        Ok(BASE64.encode(jpeg))
    }

    /// Call Gemini API.
    async fn call_gemini_api(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        image_base64: &str,
    ) -> EnhancerResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: image_base64.to_string(),
                        }),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnhancerError::transport(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            EnhancerError::malformed(format!("Failed to parse Gemini response: {}", e))
        })?;

        response_text(gemini_response)
    }

    fn request_error(&self, err: reqwest::Error) -> EnhancerError {
        if err.is_timeout() {
            EnhancerError::Timeout(self.config.request_timeout)
        } else {
            EnhancerError::transport(format!("Gemini API request failed: {}", err))
        }
    }
}

fn response_text(response: GeminiResponse) -> EnhancerResult<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(EnhancerError::blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(EnhancerError::EmptyPayload)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "RECITATION")) => {
            Err(EnhancerError::blocked(reason))
        }
        _ => Err(EnhancerError::EmptyPayload),
    }
}

/// Build the narration prompt for one frame.
pub fn build_prompt(detection_summary: &str, text_summary: &str) -> String {
    format!(
        r#"You are an assistive technology narrator for low-vision users. Given this image and detected objects, provide a concise narration (max 12 words) that describes spatial relationships and potential hazards. Be action-oriented and sidewalk-focused.

Detected objects: {detection_summary}
Detected text: {text_summary}

Provide a short, clear narration in JSON format: {{"narration": "your narration here"}}"#
    )
}

#[async_trait]
impl RemoteEnhancer for GeminiEnhancer {
    fn is_available(&self) -> bool {
        self.config.is_configured()
    }

    async fn enhance(&self, request: EnhancementRequest) -> EnhancerResult<String> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if self.is_available() => key,
            _ => return Err(EnhancerError::not_configured("GEMINI_API_KEY not set")),
        };

        let image_base64 = self.encode_frame(request.frame).await?;
        let prompt = build_prompt(&request.detection_summary, &request.text_summary);
        debug!(
            prompt_len = prompt.len(),
            image_len = image_base64.len(),
            "Prepared Gemini request"
        );

        let mut last_error = None;

        for model in &self.config.models {
            info!("Attempting Gemini API with model: {}", model);
            match self
                .call_gemini_api(api_key, model, &prompt, &image_base64)
                .await
            {
                Ok(text) => {
                    info!("Received narration from {}", model);
                    return Ok(text);
                }
                Err(e) if !e.is_retryable() => {
                    warn!("Model {} refused request: {}", model, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Failed with model {}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| EnhancerError::not_configured("no Gemini models configured")))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer, models: &[&str]) -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            models: models.iter().map(|m| m.to_string()).collect(),
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    fn request() -> EnhancementRequest {
        EnhancementRequest {
            frame: Arc::new(Frame::new(DynamicImage::new_rgb8(32, 24))),
            detection_summary: "car (left, near, 91%), ".to_string(),
            text_summary: "STOP".to_string(),
        }
    }

    fn text_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_availability() {
        assert!(!GeminiConfig::default().is_configured());

        let placeholder = GeminiConfig {
            api_key: Some(PLACEHOLDER_API_KEY.to_string()),
            ..Default::default()
        };
        assert!(!placeholder.is_configured());

        let configured = GeminiConfig {
            api_key: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(configured.is_configured());

        let no_models = GeminiConfig {
            models: Vec::new(),
            ..configured
        };
        assert!(!no_models.is_configured());
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_prompt("car (left, near, 91%), ", "STOP");
        assert!(prompt.contains("Detected objects: car (left, near, 91%), "));
        assert!(prompt.contains("Detected text: STOP"));
        assert!(prompt.contains(r#"{"narration": "your narration here"}"#));
    }

    #[tokio::test]
    async fn test_unconfigured_enhance_fails() {
        let enhancer = GeminiEnhancer::new(GeminiConfig::default()).unwrap();
        assert!(!enhancer.is_available());
        assert!(matches!(
            enhancer.enhance(request()).await,
            Err(EnhancerError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_successful_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_response(r#"{"narration": "Car close on the left."}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let enhancer = GeminiEnhancer::new(config(&server, &["gemini-test"])).unwrap();
        let text = tokio_test::assert_ok!(enhancer.enhance(request()).await);
        assert_eq!(text, r#"{"narration": "Car close on the left."}"#);
    }

    #[tokio::test]
    async fn test_request_carries_image_and_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .mount(&server)
            .await;

        let enhancer = GeminiEnhancer::new(config(&server, &["gemini-test"])).unwrap();
        enhancer.enhance(request()).await.unwrap();

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        let parts = &body["contents"][0]["parts"];

        assert!(parts[0]["text"].as_str().unwrap().contains("Detected text: STOP"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        let jpeg = BASE64
            .decode(parts[1]["inline_data"]["data"].as_str().unwrap())
            .unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn test_falls_through_to_next_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/primary:generateContent"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/secondary:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Bench ahead.")))
            .expect(1)
            .mount(&server)
            .await;

        let enhancer = GeminiEnhancer::new(config(&server, &["primary", "secondary"])).unwrap();
        assert_eq!(enhancer.enhance(request()).await.unwrap(), "Bench ahead.");
    }

    #[tokio::test]
    async fn test_all_models_fail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let enhancer = GeminiEnhancer::new(config(&server, &["a", "b"])).unwrap();
        assert!(matches!(
            enhancer.enhance(request()).await,
            Err(EnhancerError::Transport(_))
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_safety_block_stops_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let enhancer = GeminiEnhancer::new(config(&server, &["a", "b"])).unwrap();
        assert_eq!(
            enhancer.enhance(request()).await,
            Err(EnhancerError::Blocked("SAFETY".to_string()))
        );
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[test]
    fn test_prompt_block_and_empty_candidates() {
        let blocked = GeminiResponse {
            candidates: Vec::new(),
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("OTHER".to_string()),
            }),
        };
        assert_eq!(
            response_text(blocked),
            Err(EnhancerError::Blocked("OTHER".to_string()))
        );

        let empty = GeminiResponse {
            candidates: Vec::new(),
            prompt_feedback: None,
        };
        assert_eq!(response_text(empty), Err(EnhancerError::EmptyPayload));
    }
}
