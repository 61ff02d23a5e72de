//! Outbound ポート: アプリが外界（環境変数・時刻・ログ・LLM）を使うための trait

pub mod clock;
pub mod env_resolver;
pub mod llm_provider;
pub mod log;

pub use clock::Clock;
pub use env_resolver::EnvResolver;
pub use llm_provider::{GenerationParams, LlmProvider};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
