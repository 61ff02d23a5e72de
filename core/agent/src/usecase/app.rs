//! agent のユースケース（指示 → インテント解決 → ディスパッチ）

use crate::domain::{ActionHint, DispatchReport, Instruction};
use crate::ports::outbound::{Console, IntentResolver};
use crate::usecase::dispatcher::ActionDispatcher;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 対話ループのプロンプト
pub const INTERACTIVE_PROMPT: &str = "Chat with AI (q to quit): ";

pub struct AgentUseCase {
    dispatcher: ActionDispatcher,
    resolver: Arc<dyn IntentResolver>,
    console: Arc<dyn Console>,
    log: Arc<dyn Log>,
}

impl AgentUseCase {
    pub fn new(
        dispatcher: ActionDispatcher,
        resolver: Arc<dyn IntentResolver>,
        console: Arc<dyn Console>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            dispatcher,
            resolver,
            console,
            log,
        }
    }

    /// 自然言語の指示を 1 件処理する
    ///
    /// 指示に複数のアクションが含まれていれば順に 1 回ずつディスパッチし、
    /// 途中で失敗しても残りを実行する。解決自体の失敗だけが Err になる。
    pub fn handle_instruction(&self, instruction: &Instruction) -> Result<Vec<DispatchReport>, Error> {
        let hints = self.resolver.resolve(instruction)?;
        let total = hints.len();
        let mut reports = Vec::with_capacity(total);
        for (index, hint) in hints.iter().enumerate() {
            self.log.emit(
                LogRecord::new(LogLevel::Debug, "intent resolved")
                    .layer("usecase")
                    .kind("intent")
                    .field("resolver", self.resolver.name())
                    .field("index", index)
                    .field("total", total)
                    .field("action", hint.action.as_str())
                    .field("parameters", hint.parameters.clone()),
            );
            reports.push(self.dispatcher.dispatch(hint));
        }
        Ok(reports)
    }

    /// 一発実行: 成功したアクションごとにメッセージを表示する
    ///
    /// 失敗があれば最初の失敗を返す（exit code はその種別）。2 件目以降の失敗はその場で表示する。
    pub fn run_instruction(&self, instruction: &Instruction) -> Result<i32, Error> {
        if instruction.trim().is_empty() {
            return Err(Error::invalid_argument("No instruction provided."));
        }
        let mut first_failure = None;
        for report in self.handle_instruction(instruction)? {
            match report.into_result() {
                Ok(completion) => self.console.print(&completion.message),
                Err(e) if first_failure.is_none() => first_failure = Some(e),
                Err(e) => self.console.eprint(&format!("agent: {}", e)),
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(0),
        }
    }

    /// --action / --param で指定されたヒントを実行する（インテント解決を通さない）
    pub fn run_hint(&self, hint: &ActionHint) -> Result<i32, Error> {
        let completion = self.dispatcher.dispatch(hint).into_result()?;
        self.console.print(&completion.message);
        Ok(0)
    }

    /// 対話ループ。q か EOF で終わる。1 件ごとのエラーは表示して続行する
    pub fn run_interactive(&self) -> Result<i32, Error> {
        while let Some(line) = self.console.read_line(INTERACTIVE_PROMPT)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("q") {
                break;
            }
            let reports = match self.handle_instruction(&Instruction::new(line)) {
                Ok(reports) => reports,
                Err(e) => {
                    self.console.eprint(&format!("agent: {}", e));
                    continue;
                }
            };
            for report in reports {
                match report.into_result() {
                    Ok(completion) => self.console.print(&completion.message),
                    Err(e) => self.console.eprint(&format!("agent: {}", e)),
                }
            }
        }
        Ok(0)
    }
}
