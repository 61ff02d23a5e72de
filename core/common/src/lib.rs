//! エージェント共通ライブラリ
//!
//! エラー型・設定・構造化ログ・LLM プロバイダ層を提供する。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// LLMドライバーとプロバイダ
pub mod llm;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;
