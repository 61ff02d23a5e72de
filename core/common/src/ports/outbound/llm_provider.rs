//! LLM プロバイダ Outbound ポート
//!
//! トレイト本体は llm/provider に置き、ポートとしてはここから参照する。

pub use crate::llm::provider::{GenerationParams, LlmProvider};
