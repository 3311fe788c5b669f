use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::inference::{AnalysisError, InferenceService};

/// Upper bound on a single inference round-trip. Expiry surfaces as a
/// generic inference failure, never an indefinite hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData,
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the chat-completions AI gateway.
///
/// The credential is optional at construction so a missing key becomes a
/// request-time Configuration error instead of a startup crash.
pub struct AiGatewayClient {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl AiGatewayClient {
    pub fn new(api_key: Option<String>, model: String, endpoint: String) -> Self {
        Self {
            api_key,
            model,
            endpoint,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Map a non-success gateway status to its typed outcome.
    /// 429 and 402 carry distinct caller guidance, everything else is a
    /// generic upstream failure.
    fn error_for_status(status: reqwest::StatusCode) -> AnalysisError {
        match status.as_u16() {
            429 => AnalysisError::RateLimited,
            402 => AnalysisError::QuotaExceeded,
            _ => AnalysisError::Inference(format!("AI gateway error ({})", status)),
        }
    }

    /// Pull the first choice's message content out of a gateway reply.
    fn content_from_response(response: ChatResponse) -> Result<String, AnalysisError> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        Ok(content)
    }
}

#[async_trait::async_trait]
impl InferenceService for AiGatewayClient {
    async fn describe_image(
        &self,
        system_prompt: &str,
        instruction: &str,
        image_url: &str,
    ) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            log::error!("❌ AI gateway API key is not configured");
            AnalysisError::Configuration
        })?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(system_prompt.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            content_type: "text".to_string(),
                            text: instruction.to_string(),
                        },
                        ContentPart::ImageUrl {
                            content_type: "image_url".to_string(),
                            image_url: ImageData {
                                url: image_url.to_string(),
                            },
                        },
                    ]),
                },
            ],
        };

        log::info!("🤖 Sending analysis request to AI gateway with model: {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ AI gateway request failed: {}", e);
                AnalysisError::Inference(format!("request failed: {}", e))
            })?;

        let status = response.status();
        log::debug!("📥 AI gateway response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ AI gateway error response ({}): {}", status, error_text);
            return Err(Self::error_for_status(status));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            log::error!("❌ Failed to decode AI gateway response: {}", e);
            AnalysisError::Inference(format!("malformed gateway response: {}", e))
        })?;

        Self::content_from_response(chat_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_is_disjoint() {
        assert!(matches!(
            AiGatewayClient::error_for_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            AnalysisError::RateLimited
        ));
        assert!(matches!(
            AiGatewayClient::error_for_status(reqwest::StatusCode::PAYMENT_REQUIRED),
            AnalysisError::QuotaExceeded
        ));
        assert!(matches!(
            AiGatewayClient::error_for_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            AnalysisError::Inference(_)
        ));
        assert!(matches!(
            AiGatewayClient::error_for_status(reqwest::StatusCode::BAD_GATEWAY),
            AnalysisError::Inference(_)
        ));
    }

    #[test]
    fn test_content_extraction_reads_first_choice() {
        let json = r#"{
            "choices": [
                { "message": { "content": "first reply" } },
                { "message": { "content": "second reply" } }
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let content = AiGatewayClient::content_from_response(response).unwrap();
        assert_eq!(content, "first reply");
    }

    #[test]
    fn test_missing_content_is_empty_response() {
        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            AiGatewayClient::content_from_response(no_choices),
            Err(AnalysisError::EmptyResponse)
        ));

        let null_content: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(
            AiGatewayClient::content_from_response(null_content),
            Err(AnalysisError::EmptyResponse)
        ));

        let blank_content: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  "}}]}"#).unwrap();
        assert!(matches!(
            AiGatewayClient::content_from_response(blank_content),
            Err(AnalysisError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_request() {
        let client = AiGatewayClient::new(
            None,
            "test-model".to_string(),
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
        );

        let result = client
            .describe_image("system", "instruction", "data:image/jpeg;base64,AAAA")
            .await;

        assert!(matches!(result, Err(AnalysisError::Configuration)));
    }

    #[test]
    fn test_request_serializes_with_mixed_content_shapes() {
        let request = ChatRequest {
            model: "test-model".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text("be helpful".to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![ContentPart::ImageUrl {
                        content_type: "image_url".to_string(),
                        image_url: ImageData {
                            url: "data:image/png;base64,AAAA".to_string(),
                        },
                    }]),
                },
            ],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["content"], "be helpful");
        assert_eq!(value["messages"][1]["content"][0]["type"], "image_url");
        assert_eq!(
            value["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }
}
