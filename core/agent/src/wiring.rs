//! 配線: 設定と標準アダプタで App を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdClock, StderrLog, TeeLog};
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver, Log, LogLevel};

use crate::adapter::{
    AgentSettings, DryRunDocument, LlmIntentResolver, NotionClient, RuleIntentResolver,
    StdConsole, StdModelGateway,
};
use crate::cli::{Config, ResolverKind};
use crate::domain::SchemaRegistry;
use crate::ports::outbound::{Console, DocumentApi, IntentResolver, ModelGateway};
use crate::usecase::app::AgentUseCase;
use crate::usecase::dispatcher::{ActionDispatcher, DispatchDeps};

/// 組み立て済みのアプリケーション
pub struct App {
    pub registry: Arc<SchemaRegistry>,
    pub agent_use_case: AgentUseCase,
    pub logger: Arc<dyn Log>,
}

/// ログ出力先: AGENT_LOG_FILE があればファイル、-v なら stderr、両方なら両方
pub fn build_logger(settings: &AgentSettings, verbose: bool) -> Arc<dyn Log> {
    let mut sinks: Vec<Arc<dyn Log>> = Vec::new();
    if let Some(path) = &settings.log_file {
        sinks.push(Arc::new(FileJsonLog::new(path)));
    }
    if verbose {
        sinks.push(Arc::new(StderrLog::new(LogLevel::Debug)));
    }
    match sinks.len() {
        0 => Arc::new(NoopLog),
        1 => sinks.remove(0),
        _ => Arc::new(TeeLog::new(sinks)),
    }
}

/// 環境変数から設定を読み、標準の Console で App を組み立てる
pub fn wire_agent(env: &dyn EnvResolver, config: &Config) -> Result<App, Error> {
    let settings = AgentSettings::load(env, &config.overrides(), config.dry_run)?;
    wire_agent_with(settings, config, Arc::new(StdConsole))
}

/// 読み込み済みの設定と Console で App を組み立てる
pub fn wire_agent_with(
    settings: AgentSettings,
    config: &Config,
    console: Arc<dyn Console>,
) -> Result<App, Error> {
    let logger = build_logger(&settings, config.verbose);
    let registry = Arc::new(SchemaRegistry::builtin());
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let gateway: Arc<dyn ModelGateway> = Arc::new(StdModelGateway::new(Arc::clone(&logger)));

    let document: Arc<dyn DocumentApi> = if config.dry_run {
        Arc::new(DryRunDocument::new(Arc::clone(&console)))
    } else {
        Arc::new(NotionClient::new(&settings.notion, Arc::clone(&logger))?)
    };

    let resolver: Arc<dyn IntentResolver> = match config.resolver {
        ResolverKind::Rule => Arc::new(RuleIntentResolver::new()?),
        ResolverKind::Llm => Arc::new(LlmIntentResolver::new(
            Arc::clone(&gateway),
            settings.model.clone(),
            Arc::clone(&registry),
            Arc::clone(&clock),
        )),
    };

    let dispatcher = ActionDispatcher::new(DispatchDeps {
        registry: Arc::clone(&registry),
        gateway,
        document,
        model: settings.model,
        target: settings.notion.target,
        clock,
        log: Arc::clone(&logger),
    });

    Ok(App {
        registry,
        agent_use_case: AgentUseCase::new(dispatcher, resolver, console, Arc::clone(&logger)),
        logger,
    })
}
