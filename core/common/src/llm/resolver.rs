//! 環境変数と CLI 上書きから ModelConfig を解決する

use crate::domain::{ApiKey, ModelName, ProviderName};
use crate::error::Error;
use crate::llm::config::{ModelConfig, DEFAULT_HTTP_TIMEOUT};
use crate::llm::factory::ProviderType;
use crate::ports::outbound::EnvResolver;
use std::time::Duration;

pub const ENV_PROVIDER: &str = "AGENT_PROVIDER";
pub const ENV_MODEL: &str = "AGENT_MODEL";
pub const ENV_TEMPERATURE: &str = "AGENT_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "AGENT_MAX_TOKENS";
pub const ENV_HTTP_TIMEOUT: &str = "AGENT_HTTP_TIMEOUT_SECS";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";

/// コマンドラインからの上書き（環境変数より優先）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOverrides {
    pub provider: Option<ProviderName>,
    pub model: Option<ModelName>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

fn unknown_provider(name: &str) -> String {
    format!(
        "Unknown provider: '{}'. Available: {}",
        name,
        ProviderType::names().join(", ")
    )
}

fn check_temperature(t: f32) -> Result<f32, String> {
    if (0.0..=2.0).contains(&t) {
        Ok(t)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0 (got {})", t))
    }
}

fn check_max_tokens(n: u32) -> Result<u32, String> {
    if n > 0 {
        Ok(n)
    } else {
        Err("max tokens must be greater than 0".to_string())
    }
}

/// HTTP タイムアウトを環境変数から読む（未設定はデフォルト）
pub fn resolve_http_timeout(env: &dyn EnvResolver) -> Result<Duration, Error> {
    match env.var(ENV_HTTP_TIMEOUT) {
        None => Ok(DEFAULT_HTTP_TIMEOUT),
        Some(s) => match s.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(Error::config(format!(
                "{} must be a positive integer (got '{}')",
                ENV_HTTP_TIMEOUT, s
            ))),
        },
    }
}

/// ModelConfig を解決する
///
/// 優先順位: CLI 上書き > AGENT_* > プロバイダ固有の環境変数（OPENAI_MODEL 等） > デフォルト。
/// 環境変数の値が不正なら Error::Config、CLI の値が不正なら Error::InvalidArgument。
/// API キーが必須のプロバイダでキーが無い場合も起動時に Error::Config とする。
pub fn resolve_model_config(
    env: &dyn EnvResolver,
    overrides: &ModelOverrides,
) -> Result<ModelConfig, Error> {
    let provider = match overrides.provider.as_ref() {
        Some(name) => ProviderType::from_str(name)
            .ok_or_else(|| Error::invalid_argument(unknown_provider(name)))?,
        None => match env.var(ENV_PROVIDER) {
            Some(name) => ProviderType::from_str(&name)
                .ok_or_else(|| Error::config(unknown_provider(&name)))?,
            None => ProviderType::OpenAi,
        },
    };

    let mut config = ModelConfig::new(provider);

    let provider_model_env = match provider {
        ProviderType::OpenAi | ProviderType::OpenAiCompat => Some(ENV_OPENAI_MODEL),
        ProviderType::Gemini => Some(ENV_GEMINI_MODEL),
        ProviderType::Echo => None,
    };
    if let Some(model) = overrides
        .model
        .clone()
        .or_else(|| env.var(ENV_MODEL).map(ModelName::new))
        .or_else(|| provider_model_env.and_then(|k| env.var(k)).map(ModelName::new))
    {
        config.model = model;
    }

    config.temperature = match overrides.temperature {
        Some(t) => Some(check_temperature(t).map_err(Error::invalid_argument)?),
        None => match env.var(ENV_TEMPERATURE) {
            Some(s) => {
                let t = s.trim().parse::<f32>().map_err(|_| {
                    Error::config(format!("{} is not a number: '{}'", ENV_TEMPERATURE, s))
                })?;
                Some(check_temperature(t).map_err(Error::config)?)
            }
            None => None,
        },
    };

    config.max_tokens = match overrides.max_tokens {
        Some(n) => Some(check_max_tokens(n).map_err(Error::invalid_argument)?),
        None => match env.var(ENV_MAX_TOKENS) {
            Some(s) => {
                let n = s.trim().parse::<u32>().map_err(|_| {
                    Error::config(format!("{} is not a positive integer: '{}'", ENV_MAX_TOKENS, s))
                })?;
                Some(check_max_tokens(n).map_err(Error::config)?)
            }
            None => None,
        },
    };

    if matches!(provider, ProviderType::OpenAi | ProviderType::OpenAiCompat) {
        config.base_url = env.var(ENV_OPENAI_BASE_URL);
    }

    config.api_key = provider.api_key_env().and_then(|k| env.var(k)).map(ApiKey::new);
    if provider.requires_api_key() && config.api_key.is_none() {
        return Err(Error::config(format!(
            "{} is not set (required by provider '{}')",
            provider.api_key_env().unwrap_or("API key"),
            provider.as_str()
        )));
    }

    config.timeout = resolve_http_timeout(env)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MapEnvResolver;

    #[test]
    fn test_defaults_to_openai_with_original_default_model() {
        let env = MapEnvResolver::from([("OPENAI_API_KEY", "sk-test")]);
        let cfg = resolve_model_config(&env, &ModelOverrides::default()).unwrap();
        assert_eq!(cfg.provider, ProviderType::OpenAi);
        assert_eq!(&*cfg.model, "gpt-3.5-turbo");
        assert_eq!(cfg.api_key.as_ref().map(|k| k.expose()), Some("sk-test"));
        assert_eq!(cfg.timeout, DEFAULT_HTTP_TIMEOUT);
    }

    #[test]
    fn test_openai_without_key_is_config_error() {
        let env = MapEnvResolver::new();
        let err = resolve_model_config(&env, &ModelOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_openai_model_env() {
        let env = MapEnvResolver::from([("OPENAI_API_KEY", "k"), ("OPENAI_MODEL", "gpt-4o")]);
        let cfg = resolve_model_config(&env, &ModelOverrides::default()).unwrap();
        assert_eq!(&*cfg.model, "gpt-4o");
    }

    #[test]
    fn test_overrides_win() {
        let env = MapEnvResolver::from([
            ("AGENT_PROVIDER", "gemini"),
            ("AGENT_MODEL", "env-model"),
            ("AGENT_TEMPERATURE", "0.3"),
        ]);
        let overrides = ModelOverrides {
            provider: Some(ProviderName::new("echo")),
            model: Some(ModelName::new("cli-model")),
            temperature: Some(1.2),
            max_tokens: Some(50),
        };
        let cfg = resolve_model_config(&env, &overrides).unwrap();
        assert_eq!(cfg.provider, ProviderType::Echo);
        assert_eq!(&*cfg.model, "cli-model");
        assert_eq!(cfg.temperature, Some(1.2));
        assert_eq!(cfg.max_tokens, Some(50));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_env_sampling_values() {
        let env = MapEnvResolver::from([
            ("AGENT_PROVIDER", "echo"),
            ("AGENT_TEMPERATURE", "0.7"),
            ("AGENT_MAX_TOKENS", "256"),
            ("AGENT_HTTP_TIMEOUT_SECS", "5"),
        ]);
        let cfg = resolve_model_config(&env, &ModelOverrides::default()).unwrap();
        assert_eq!(cfg.temperature, Some(0.7));
        assert_eq!(cfg.max_tokens, Some(256));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_env_values_are_config_errors() {
        for (k, v) in [
            ("AGENT_TEMPERATURE", "hot"),
            ("AGENT_TEMPERATURE", "3.5"),
            ("AGENT_MAX_TOKENS", "0"),
            ("AGENT_MAX_TOKENS", "-1"),
            ("AGENT_HTTP_TIMEOUT_SECS", "never"),
            ("AGENT_PROVIDER", "mystery"),
        ] {
            let env = MapEnvResolver::from([("AGENT_PROVIDER", "echo")]).set(k, v);
            let err = resolve_model_config(&env, &ModelOverrides::default()).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{}={} gave {:?}", k, v, err);
        }
    }

    #[test]
    fn test_bad_cli_values_are_usage_errors() {
        let env = MapEnvResolver::new();
        let overrides = ModelOverrides {
            provider: Some(ProviderName::new("nope")),
            ..Default::default()
        };
        let err = resolve_model_config(&env, &overrides).unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().contains("Available: openai, openai_compat, gemini, echo"));

        let overrides = ModelOverrides {
            provider: Some(ProviderName::new("echo")),
            temperature: Some(-0.1),
            ..Default::default()
        };
        assert!(resolve_model_config(&env, &overrides).unwrap_err().is_usage());
    }

    #[test]
    fn test_openai_compat_key_optional_and_base_url() {
        let env = MapEnvResolver::from([
            ("AGENT_PROVIDER", "openai_compat"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
        ]);
        let cfg = resolve_model_config(&env, &ModelOverrides::default()).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert!(cfg.api_key.is_none());
    }
}
