//! LLMプロバイダのトレイト定義

use crate::error::Error;
use serde_json::Value;

/// サンプリングパラメータ（未指定はプロバイダのデフォルト）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// LLMプロバイダのトレイト
///
/// 各プロバイダ（OpenAI 互換、Gemini など）はこのトレイトを実装する。
/// 1 回の生成は「ペイロード生成 → HTTP → テキスト抽出」の 3 段で行う（LlmDriver が束ねる）。
pub trait LlmProvider: Send + Sync {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// 使用するモデル名を返す
    fn model(&self) -> &str;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `prompt` - ユーザープロンプト
    /// * `system_instruction` - システム指示（オプション）
    /// * `params` - 温度・最大トークン
    fn make_request_payload(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        params: &GenerationParams,
    ) -> Result<Value, Error>;

    /// HTTPリクエストを実行してレスポンス JSON 文字列を取得
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスからテキストを抽出
    ///
    /// # Returns
    /// * `Ok(Some(text))` - 抽出したテキスト
    /// * `Ok(None)` - テキストが含まれていない
    /// * `Err(Error)` - API エラー、またはプロバイダによる安全性ブロック
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;
}

/// タイムアウト付きの blocking クライアントを作る
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::blocking::Client, Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::system(format!("Failed to build HTTP client: {}", e)))
}

/// HTTP エラー応答から表示用メッセージを取り出す（`error.message` があればそれを優先）
pub(crate) fn error_message_from_body(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_body_prefers_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let msg = error_message_from_body(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(msg, "Incorrect API key provided");
    }

    #[test]
    fn test_error_message_from_body_falls_back_to_status() {
        let msg = error_message_from_body(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(msg, "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_generation_params_default_is_unset() {
        let p = GenerationParams::default();
        assert!(p.temperature.is_none());
        assert!(p.max_tokens.is_none());
    }
}
