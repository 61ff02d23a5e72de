//! 自然言語指示 → アクションヒントの Outbound ポート

use crate::domain::{ActionHint, Instruction};
use common::error::Error;

/// 指示文からアクション名と生パラメータを取り出す（検証はしない）
pub trait IntentResolver: Send + Sync {
    fn name(&self) -> &'static str;
    /// 1 件以上のヒントを指示文に現れた順で返す。見つからなければエラー
    fn resolve(&self, instruction: &Instruction) -> Result<Vec<ActionHint>, Error>;
}
