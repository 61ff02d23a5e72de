//! ディスパッチの状態機械
//!
//! Received → Validated → Completed。どの非終端状態からも Failed へ遷移できる。

use super::action::ActionKind;
use super::document::BlockRef;
use common::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Received,
    Validated,
    Completed,
    Failed,
}

impl DispatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// 遷移できるか
    pub fn can_advance_to(&self, next: DispatchState) -> bool {
        match (self, next) {
            (Self::Received, Self::Validated) => true,
            (Self::Validated, Self::Completed) => true,
            (s, Self::Failed) => !s.is_terminal(),
            _ => false,
        }
    }
}

/// 1 回のディスパッチで通った状態の列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTrail {
    states: Vec<DispatchState>,
}

impl DispatchTrail {
    pub fn new() -> Self {
        Self {
            states: vec![DispatchState::Received],
        }
    }

    pub fn current(&self) -> DispatchState {
        *self.states.last().unwrap_or(&DispatchState::Received)
    }

    /// 次の状態へ進む（不正な遷移は内部エラー）
    pub fn advance(&mut self, next: DispatchState) -> Result<(), Error> {
        let current = self.current();
        if !current.can_advance_to(next) {
            return Err(Error::system(format!(
                "illegal dispatch transition {} -> {}",
                current.as_str(),
                next.as_str()
            )));
        }
        self.states.push(next);
        Ok(())
    }

    pub fn states(&self) -> &[DispatchState] {
        &self.states
    }
}

impl Default for DispatchTrail {
    fn default() -> Self {
        Self::new()
    }
}

/// 完了したディスパッチの要約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub action: ActionKind,
    /// ドキュメントに作ったもの（ドキュメントに触れないアクションは None）
    pub created: Option<BlockRef>,
    /// 生成に使ったモデル（生成しないアクションは None）
    pub source_model: Option<String>,
    /// ユーザーに表示するメッセージ
    pub message: String,
}

/// ディスパッチ結果（通った状態と、成功 / 失敗）
#[derive(Debug)]
pub struct DispatchReport {
    pub trail: DispatchTrail,
    pub result: Result<Completion, Error>,
}

impl DispatchReport {
    pub fn into_result(self) -> Result<Completion, Error> {
        self.result
    }
}
