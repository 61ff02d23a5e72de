//! Gemini (generateContent) プロバイダの実装

use crate::domain::ApiKey;
use crate::error::Error;
use crate::llm::config::ModelConfig;
use crate::llm::provider::{error_message_from_body, http_client, GenerationParams, LlmProvider};
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 安全性ブロックとして扱う finishReason
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII", "RECITATION"];

/// Gemini プロバイダ
pub struct GeminiProvider {
    model: String,
    base_url: String,
    api_key: ApiKey,
    client: reqwest::blocking::Client,
}

impl GeminiProvider {
    /// 新しいGeminiプロバイダを作成
    ///
    /// API キーは必須（未設定は Error::Config）。
    pub fn new(config: &ModelConfig) -> Result<Self, Error> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("GEMINI_API_KEY is not set"))?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            model: config.model.to_string(),
            base_url,
            api_key,
            client: http_client(config.timeout)?,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn make_request_payload(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        params: &GenerationParams,
    ) -> Result<Value, Error> {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        if let Some(system) = system_instruction {
            payload["systemInstruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(t) = params.temperature {
            generation_config.insert("temperature".to_string(), json!(t));
        }
        if let Some(n) = params.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(n));
        }
        if !generation_config.is_empty() {
            payload["generationConfig"] = Value::Object(generation_config);
        }

        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let response = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.api_key.expose())
            .body(request_json.to_string())
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Gemini API error: {}",
                error_message_from_body(status, &response_text)
            )));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(error) = v.get("error") {
            let error_msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("Gemini API error: {}", error_msg)));
        }

        // プロンプト自体がブロックされた
        if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
            return Err(Error::gateway(format!("prompt was blocked by the provider: {}", reason)));
        }

        let candidate = &v["candidates"][0];
        if let Some(reason) = candidate["finishReason"].as_str() {
            if BLOCKED_FINISH_REASONS.contains(&reason) {
                return Err(Error::gateway(format!("response was blocked by the provider: {}", reason)));
            }
        }

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        Ok(if text.is_empty() { None } else { Some(text) })
    }
}
