//! 起動時設定の読み込み
//!
//! 環境変数（.env で補完）から一度だけ組み立て、以後は不変。必須値の欠落は起動時の Error::Config。

use crate::domain::DocumentTarget;
use common::domain::{ApiKey, PageId};
use common::error::Error;
use common::llm::resolver::resolve_http_timeout;
use common::llm::{resolve_model_config, ModelConfig, ModelOverrides};
use common::ports::outbound::EnvResolver;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_NOTION_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_NOTION_PAGE_ID: &str = "NOTION_PAGE_ID";
pub const ENV_NOTION_BASE_URL: &str = "NOTION_BASE_URL";
pub const ENV_LOG_FILE: &str = "AGENT_LOG_FILE";

pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion への接続設定
#[derive(Debug, Clone, PartialEq)]
pub struct NotionSettings {
    /// --dry-run 時は None のことがある
    pub api_key: Option<ApiKey>,
    pub target: DocumentTarget,
    pub base_url: String,
    pub timeout: Duration,
}

/// プロセス全体の設定
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub model: ModelConfig,
    pub notion: NotionSettings,
    pub log_file: Option<PathBuf>,
}

impl AgentSettings {
    /// 環境変数と CLI 上書きから設定を組み立てる
    ///
    /// `dry_run` のときは NOTION_API_KEY を必須にしない（ドキュメントには書き込まないため）。
    pub fn load(env: &dyn EnvResolver, overrides: &ModelOverrides, dry_run: bool) -> Result<Self, Error> {
        let model = resolve_model_config(env, overrides)?;

        let page_id = env
            .var(ENV_NOTION_PAGE_ID)
            .ok_or_else(|| Error::config(format!("{} is not set", ENV_NOTION_PAGE_ID)))
            .and_then(|s| {
                PageId::parse(&s).map_err(|e| match e {
                    Error::Config(msg) => Error::config(format!("{}: {}", ENV_NOTION_PAGE_ID, msg)),
                    other => other,
                })
            })?;

        let api_key = env.var(ENV_NOTION_API_KEY).map(ApiKey::new);
        if api_key.is_none() && !dry_run {
            return Err(Error::config(format!("{} is not set", ENV_NOTION_API_KEY)));
        }

        let base_url = env
            .var(ENV_NOTION_BASE_URL)
            .unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            model,
            notion: NotionSettings {
                api_key,
                target: DocumentTarget::new(page_id),
                base_url,
                timeout: resolve_http_timeout(env)?,
            },
            log_file: env.var(ENV_LOG_FILE).map(PathBuf::from),
        })
    }
}
