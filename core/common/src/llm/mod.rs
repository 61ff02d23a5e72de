//! LLMドライバーとプロバイダの実装
//!
//! 異なるLLMプロバイダ（OpenAI 互換、Gemini など）で共通する処理を提供する。

pub mod config;
pub mod driver;
pub mod echo;
pub mod factory;
pub mod gemini;
pub mod openai_compat;
pub mod provider;
pub mod resolver;

pub use config::ModelConfig;
pub use driver::LlmDriver;
pub use factory::{create_driver, create_provider, AnyProvider, ProviderType};
pub use provider::{GenerationParams, LlmProvider};
pub use resolver::{resolve_model_config, ModelOverrides};
