//! モデル設定
//!
//! 起動時に一度だけ組み立て、ゲートウェイへ明示的に渡す。

use crate::domain::{ApiKey, ModelName};
use crate::llm::factory::ProviderType;
use crate::llm::provider::GenerationParams;
use std::time::Duration;

/// HTTP クライアントのデフォルトタイムアウト
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// 言語モデル呼び出しの設定
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// 呼び出すバックエンド
    pub provider: ProviderType,
    /// モデル識別子
    pub model: ModelName,
    /// サンプリング温度
    pub temperature: Option<f32>,
    /// 出力トークン上限
    pub max_tokens: Option<u32>,
    /// OpenAI 互換エンドポイントのベース URL
    pub base_url: Option<String>,
    pub api_key: Option<ApiKey>,
    pub timeout: Duration,
}

impl ModelConfig {
    /// プロバイダのデフォルトモデルで設定を作る
    pub fn new(provider: ProviderType) -> Self {
        Self {
            provider,
            model: ModelName::new(provider.default_model()),
            temperature: None,
            max_tokens: None,
            base_url: None,
            api_key: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_provider_default_model() {
        let cfg = ModelConfig::new(ProviderType::OpenAi);
        assert_eq!(&*cfg.model, "gpt-3.5-turbo");
        assert_eq!(cfg.timeout, DEFAULT_HTTP_TIMEOUT);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_generation_params() {
        let mut cfg = ModelConfig::new(ProviderType::Echo);
        cfg.temperature = Some(0.9);
        cfg.max_tokens = Some(128);
        let p = cfg.generation_params();
        assert_eq!(p.temperature, Some(0.9));
        assert_eq!(p.max_tokens, Some(128));
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let mut cfg = ModelConfig::new(ProviderType::OpenAi);
        cfg.api_key = Some(ApiKey::new("sk-very-secret"));
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("sk-very-secret"));
    }
}
