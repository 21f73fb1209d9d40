use serde_json::Value;

use super::{CoachBackend, CoachError, CoachRequest};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, request: &CoachRequest) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "messages": [
                { "role": "user", "content": request.prompt }
            ]
        });
        if let Some(system) = &request.system {
            body["system"] = Value::String(system.clone());
        }
        body
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response, CoachError> {
        let resp = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CoachError::Api { status, body });
        }
        Ok(resp)
    }

    /// Verify the API key with a minimal request.
    pub async fn test_api_key(&self) -> Result<(), CoachError> {
        let probe = CoachRequest {
            system: None,
            prompt: "Reply with OK".to_string(),
            max_tokens: 4,
        };
        self.post(&self.request_body(&probe)).await.map(|_| ())
    }
}

/// Text of the first content block of a Messages API response.
fn first_text_block(api_resp: &Value) -> Option<&str> {
    api_resp["content"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|block| block["text"].as_str())
}

impl CoachBackend for AnthropicClient {
    async fn complete(&self, request: &CoachRequest) -> Result<String, CoachError> {
        let resp = self.post(&self.request_body(request)).await?;
        let api_resp: Value = resp
            .json()
            .await
            .map_err(|e| CoachError::Parse(format!("API response: {}", e)))?;

        first_text_block(&api_resp)
            .map(str::to_string)
            .ok_or(CoachError::Empty)
    }
}
