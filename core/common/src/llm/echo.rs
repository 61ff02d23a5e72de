//! Echoプロバイダの実装
//!
//! 実際にLLM APIを呼び出さず、プロンプトを元に固定の 3 行テキストを返す。
//! オフラインでの動作確認やテスト用。

use crate::error::Error;
use crate::llm::provider::{GenerationParams, LlmProvider};
use serde_json::{json, Value};

/// Echoプロバイダ
pub struct EchoProvider {
    model: String,
}

impl EchoProvider {
    /// 新しいEchoプロバイダを作成
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn make_request_payload(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        _params: &GenerationParams,
    ) -> Result<Value, Error> {
        let mut payload = json!({ "prompt": prompt });
        if let Some(system) = system_instruction {
            payload["system_instruction"] = json!(system);
        }
        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        // ネットワークには出ない。リクエストをそのまま応答として返す
        Ok(request_json.to_string())
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse echo payload: {}", e)))?;
        let prompt = v["prompt"].as_str().unwrap_or_default();
        let first_line = prompt.lines().next().unwrap_or_default().trim();
        Ok(Some(format!(
            "[echo] {}\n{}\n(no model was called)",
            self.model, first_line
        )))
    }
}
