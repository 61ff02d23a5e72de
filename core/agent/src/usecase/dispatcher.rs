//! アクションディスパッチャ
//!
//! ヒントを検証し、アクションごとの処理（insert_haiku は生成 → 挿入）を 1 回だけ行う。
//! 状態遷移（Received → Validated → Completed / Failed）は DispatchReport に残し、Log にも出す。
//! リトライ・ロールバック・重複排除はしない。

use crate::domain::schema::{haiku_fields, weather_fields};
use crate::domain::{
    prompt::haiku_prompt, validate_hint, ActionHint, ActionKind, ActionRequest, Completion,
    DispatchReport, DispatchState, DispatchTrail, DocumentTarget, SchemaRegistry,
};
use crate::ports::outbound::{DocumentApi, ModelGateway};
use common::error::Error;
use common::llm::ModelConfig;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::sync::Arc;

/// as_page で title が無いときのページタイトル
pub const DEFAULT_PAGE_TITLE: &str = "Haiku";

pub const SUCCESS_MESSAGE: &str = "Haiku successfully inserted in Notion!";

/// get_weather の応答（天気データ源は未接続）
pub fn weather_message(location: &str) -> String {
    format!("Retrieved weather data for {}.", location)
}

pub struct DispatchDeps {
    pub registry: Arc<SchemaRegistry>,
    pub gateway: Arc<dyn ModelGateway>,
    pub document: Arc<dyn DocumentApi>,
    pub model: ModelConfig,
    pub target: DocumentTarget,
    pub clock: Arc<dyn Clock>,
    pub log: Arc<dyn Log>,
}

pub struct ActionDispatcher {
    deps: DispatchDeps,
}

impl ActionDispatcher {
    pub fn new(deps: DispatchDeps) -> Self {
        Self { deps }
    }

    /// 1 件のヒントを処理する。失敗しても DispatchReport に Failed として残す
    pub fn dispatch(&self, hint: &ActionHint) -> DispatchReport {
        let mut trail = DispatchTrail::new();
        self.log_state(&hint.action, DispatchState::Received, LogLevel::Info, None);

        let result = self.run(&mut trail, hint);
        if let Err(ref e) = result {
            if trail.advance(DispatchState::Failed).is_ok() {
                self.log_state(&hint.action, DispatchState::Failed, LogLevel::Error, Some(e));
            }
        }
        DispatchReport { trail, result }
    }

    fn run(&self, trail: &mut DispatchTrail, hint: &ActionHint) -> Result<Completion, Error> {
        let request = validate_hint(&self.deps.registry, hint)?;
        trail.advance(DispatchState::Validated)?;
        self.log_state(&hint.action, DispatchState::Validated, LogLevel::Info, None);

        let completion = match request.kind() {
            ActionKind::InsertHaiku => self.insert_haiku(&request)?,
            ActionKind::GetWeather => self.get_weather(&request)?,
        };

        trail.advance(DispatchState::Completed)?;
        self.log_state(&hint.action, DispatchState::Completed, LogLevel::Info, None);
        Ok(completion)
    }

    fn insert_haiku(&self, request: &ActionRequest) -> Result<Completion, Error> {
        let topic = request
            .str_param(haiku_fields::TOPIC)
            .ok_or_else(|| Error::system("validated insert_haiku request has no topic"))?;
        let prompt = haiku_prompt(topic, self.deps.clock.today());

        let content = self
            .deps
            .gateway
            .generate(&prompt, &self.deps.model)
            .map_err(Error::into_gateway)?;

        let page_id = &self.deps.target.page_id;
        // title の指定は子ページ作成を意味する
        let as_page = request
            .bool_param(haiku_fields::AS_PAGE)
            .unwrap_or_else(|| request.str_param(haiku_fields::TITLE).is_some());
        let created = if as_page {
            let title = request
                .str_param(haiku_fields::TITLE)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_PAGE_TITLE);
            self.deps.document.create_child_page(page_id, title, content.text())?
        } else {
            self.deps.document.append_block(page_id, content.text())?
        };

        Ok(Completion {
            action: request.kind(),
            message: format!("{} ({})", SUCCESS_MESSAGE, created),
            created: Some(created),
            source_model: Some(content.source_model().to_string()),
        })
    }

    /// ゲートウェイにもドキュメントにも触れない
    fn get_weather(&self, request: &ActionRequest) -> Result<Completion, Error> {
        let location = request
            .str_param(weather_fields::LOCATION)
            .ok_or_else(|| Error::system("validated get_weather request has no location"))?;
        Ok(Completion {
            action: request.kind(),
            created: None,
            source_model: None,
            message: weather_message(location.trim()),
        })
    }

    fn log_state(&self, action: &str, state: DispatchState, level: LogLevel, error: Option<&Error>) {
        let mut record = LogRecord::new(level, format!("dispatch {}", state.as_str()))
            .layer("usecase")
            .kind("dispatch")
            .field("action", action)
            .field("state", state.as_str());
        if let Some(e) = error {
            record = record.field("error", e.to_string());
        }
        self.deps.log.emit(record);
    }
}
