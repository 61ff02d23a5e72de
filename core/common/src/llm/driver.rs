//! LLMドライバーの実装
//!
//! プロバイダに依存しない「ペイロード生成 → HTTP → テキスト抽出」を束ねる。

use crate::error::Error;
use crate::llm::provider::{GenerationParams, LlmProvider};

/// LLMドライバー
pub struct LlmDriver<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmDriver<P> {
    /// 新しいドライバーを作成
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// LLMにプロンプトを送信して応答テキストを取得
    ///
    /// 1 回の呼び出しで HTTP リクエストは 1 回だけ行う（リトライしない）。
    /// 応答にテキストが無い場合は Error::Gateway。
    pub fn query(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, Error> {
        let payload = self
            .provider
            .make_request_payload(prompt, system_instruction, params)?;

        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let response_json = self.provider.make_http_request(&request_json)?;

        self.provider
            .parse_response_text(&response_json)?
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::gateway(format!("{}: no text in response", self.provider.name())))
    }

    /// プロバイダを取得
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
