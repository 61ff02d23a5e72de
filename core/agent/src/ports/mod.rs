//! Ports & Adapters のポート定義
//!
//! - inbound: CLI がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（言語モデル・ドキュメント API・コンソール）に依頼するための trait

pub mod inbound;
pub mod outbound;
