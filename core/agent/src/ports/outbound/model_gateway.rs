//! 言語モデルゲートウェイの Outbound ポート

use crate::domain::{GeneratedContent, Prompt};
use common::error::Error;
use common::llm::ModelConfig;

/// プロンプトから生成コンテンツを得る
///
/// 1 回の呼び出しでネットワーク呼び出しは 1 回。結果はキャッシュしない。
/// 失敗（通信・認証・安全性ブロック）はすべて Error::Gateway として返す。
pub trait ModelGateway: Send + Sync {
    fn generate(&self, prompt: &Prompt, config: &ModelConfig) -> Result<GeneratedContent, Error>;
}
