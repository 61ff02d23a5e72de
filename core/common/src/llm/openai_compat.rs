//! OpenAI Chat Completions 互換 (/chat/completions) プロバイダ
//!
//! base_url で任意のエンドポイントを指定可能。OpenAI 本家（"openai"）もこの実装を使う。

use crate::domain::ApiKey;
use crate::error::Error;
use crate::llm::config::ModelConfig;
use crate::llm::provider::{error_message_from_body, http_client, GenerationParams, LlmProvider};
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    name: &'static str,
    model: String,
    base_url: String,
    api_key: Option<ApiKey>,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `name` - 表示・ログ用のプロバイダ名（"openai" / "openai_compat"）
    /// * `config` - base_url 未指定時は DEFAULT_BASE_URL。api_key 未指定時は Authorization を付けない
    pub fn new(name: &'static str, config: &ModelConfig) -> Result<Self, Error> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            name,
            model: config.model.to_string(),
            base_url,
            api_key: config.api_key.clone(),
            client: http_client(config.timeout)?,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        self.name
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
        let mut messages: Vec<Value> = Vec::new();
        if let Some(s) = system_instruction {
            messages.push(json!({ "role": "system", "content": s }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
            "stream": false
        });
        if let Some(t) = params.temperature {
            payload["temperature"] = json!(t);
        }
        if let Some(n) = params.max_tokens {
            payload["max_tokens"] = json!(n);
        }
        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut builder = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(request_json.to_string());

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose());
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Chat completions error: {}",
                error_message_from_body(status, &response_text)
            )));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("API error: {}", msg)));
        }

        let choice = &v["choices"][0];
        if choice["finish_reason"].as_str() == Some("content_filter") {
            return Err(Error::gateway("response was blocked by the provider's content filter"));
        }
        if let Some(refusal) = choice["message"]["refusal"].as_str() {
            return Err(Error::gateway(format!("model refused: {}", refusal)));
        }

        Ok(choice["message"]["content"].as_str().map(|s| s.to_string()))
    }
}
