//! agent コマンドの enum（Command Pattern）
//!
//! 一発実行 / 対話ループ / 一覧表示の分岐を enum で明示する。

use crate::domain::{ActionHint, Instruction};

/// agent の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCommand {
    /// ヘルプ表示
    Help,
    /// 登録済みアクションの一覧
    ListActions,
    /// 自然言語の指示を 1 件実行
    Run { instruction: Instruction },
    /// --action / --param で明示されたアクションを 1 件実行
    RunHint { hint: ActionHint },
    /// 対話ループ（q で終了）
    Interactive,
}
