//! プロバイダファクトリー
//!
//! ModelConfig のプロバイダ種別に基づいて適切なプロバイダを作成する。

use crate::error::Error;
use crate::llm::config::ModelConfig;
use crate::llm::driver::LlmDriver;
use crate::llm::echo::EchoProvider;
use crate::llm::gemini::GeminiProvider;
use crate::llm::openai_compat::OpenAiCompatProvider;
use crate::llm::provider::{GenerationParams, LlmProvider};
use serde_json::Value;

/// プロバイダタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// OpenAI Chat Completions
    OpenAi,
    /// OpenAI Chat Completions 互換 (/chat/completions)
    OpenAiCompat,
    /// Gemini generateContent
    Gemini,
    /// Echo（ネットワークに出ない）
    Echo,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt" => Some(Self::OpenAi),
            "openai_compat" | "ollama" => Some(Self::OpenAiCompat),
            "gemini" => Some(Self::Gemini),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::OpenAiCompat => "openai_compat",
            Self::Gemini => "gemini",
            Self::Echo => "echo",
        }
    }

    /// モデル未指定時のデフォルト
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::OpenAiCompat => "gpt-4o-mini",
            Self::Gemini => "gemini-2.0-flash",
            Self::Echo => "echo",
        }
    }

    /// API キーを読む環境変数名
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenAi | Self::OpenAiCompat => Some("OPENAI_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Echo => None,
        }
    }

    /// API キーが必須か
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAi | Self::Gemini)
    }

    /// 利用可能なプロバイダ名
    pub fn names() -> &'static [&'static str] {
        &["openai", "openai_compat", "gemini", "echo"]
    }
}

/// プロバイダのenumラッパー
///
/// 異なるプロバイダタイプを型安全に扱うために使用する。
pub enum AnyProvider {
    OpenAi(OpenAiCompatProvider),
    Gemini(GeminiProvider),
    Echo(EchoProvider),
}

impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::OpenAi(p) => p.name(),
            Self::Gemini(p) => p.name(),
            Self::Echo(p) => p.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::OpenAi(p) => p.model(),
            Self::Gemini(p) => p.model(),
            Self::Echo(p) => p.model(),
        }
    }

    fn make_request_payload(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        params: &GenerationParams,
    ) -> Result<Value, Error> {
        match self {
            Self::OpenAi(p) => p.make_request_payload(prompt, system_instruction, params),
            Self::Gemini(p) => p.make_request_payload(prompt, system_instruction, params),
            Self::Echo(p) => p.make_request_payload(prompt, system_instruction, params),
        }
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        match self {
            Self::OpenAi(p) => p.make_http_request(request_json),
            Self::Gemini(p) => p.make_http_request(request_json),
            Self::Echo(p) => p.make_http_request(request_json),
        }
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        match self {
            Self::OpenAi(p) => p.parse_response_text(response_json),
            Self::Gemini(p) => p.parse_response_text(response_json),
            Self::Echo(p) => p.parse_response_text(response_json),
        }
    }
}

/// プロバイダを作成する
///
/// API キーが必須のプロバイダでキーが無い場合は Error::Config。
pub fn create_provider(config: &ModelConfig) -> Result<AnyProvider, Error> {
    if config.provider.requires_api_key() && config.api_key.is_none() {
        return Err(Error::config(format!(
            "{} is not set (required by provider '{}')",
            config.provider.api_key_env().unwrap_or("API key"),
            config.provider.as_str()
        )));
    }
    match config.provider {
        ProviderType::OpenAi => Ok(AnyProvider::OpenAi(OpenAiCompatProvider::new("openai", config)?)),
        ProviderType::OpenAiCompat => Ok(AnyProvider::OpenAi(OpenAiCompatProvider::new(
            "openai_compat",
            config,
        )?)),
        ProviderType::Gemini => Ok(AnyProvider::Gemini(GeminiProvider::new(config)?)),
        ProviderType::Echo => Ok(AnyProvider::Echo(EchoProvider::new(config.model.to_string()))),
    }
}

/// ドライバーを作成する
pub fn create_driver(config: &ModelConfig) -> Result<LlmDriver<AnyProvider>, Error> {
    Ok(LlmDriver::new(create_provider(config)?))
}
