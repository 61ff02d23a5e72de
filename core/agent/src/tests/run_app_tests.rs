use std::sync::Arc;

use common::adapter::MapEnvResolver;
use common::domain::ProviderName;
use common::error::Error;

use crate::adapter::test_doubles::ScriptedConsole;
use crate::adapter::AgentSettings;
use crate::cli::{Config, ResolverKind};
use crate::ports::inbound::UseCaseRunner;
use crate::wiring;

fn offline_env() -> MapEnvResolver {
    MapEnvResolver::from([
        ("AGENT_PROVIDER", "echo"),
        ("NOTION_PAGE_ID", "0123456789abcdef0123456789abcdef"),
    ])
}

/// 設定を読み、記録用 Console で App を組み立てて Runner で run する（テスト用の入口）
fn run_app(config: Config, env: &MapEnvResolver, console: Arc<ScriptedConsole>) -> Result<i32, Error> {
    let settings = AgentSettings::load(env, &config.overrides(), config.dry_run)?;
    let app = wiring::wire_agent_with(settings, &config, console)?;
    let runner = crate::Runner { app };
    runner.run(config)
}

#[test]
fn test_run_app_with_help() {
    let config = Config {
        help: true,
        dry_run: true,
        ..Default::default()
    };
    let result = run_app(config, &offline_env(), Arc::new(ScriptedConsole::default()));
    assert_eq!(result.unwrap(), 0);
}

#[test]
fn test_run_app_dry_run_echo() {
    // echo プロバイダ + --dry-run でネットワーク不要
    let console = Arc::new(ScriptedConsole::default());
    let config = Config {
        dry_run: true,
        instruction_args: vec!["insert a haiku about cats".to_string()],
        ..Default::default()
    };
    let code = run_app(config, &offline_env(), console.clone()).unwrap();
    assert_eq!(code, 0);
    let out = console.out_lines();
    assert_eq!(out.len(), 3);
    assert!(out[0].starts_with("[dry-run] would append a block to page 01234567-89ab-cdef-0123-456789abcdef"));
    assert!(out[1].starts_with("[echo] echo\nWrite a haiku about cats."));
    assert_eq!(out[2], "Haiku successfully inserted in Notion! (block dry-run)");
}

#[test]
fn test_run_app_action_hint_as_page() {
    let console = Arc::new(ScriptedConsole::default());
    let config = Config {
        dry_run: true,
        action: Some("insert_haiku".to_string()),
        params: vec!["topic=rain".to_string(), "as_page=true".to_string()],
        ..Default::default()
    };
    run_app(config, &offline_env(), console.clone()).unwrap();
    assert!(console.out_lines()[0].starts_with("[dry-run] would create page \"Haiku\""));
}

#[test]
fn test_run_app_validation_error_exit_code() {
    let config = Config {
        dry_run: true,
        action: Some("insert_haiku".to_string()),
        params: vec!["topic=".to_string()],
        ..Default::default()
    };
    let err = run_app(config, &offline_env(), Arc::new(ScriptedConsole::default())).unwrap_err();
    assert_eq!(err, Error::validation("topic", "must not be empty"));
    assert_eq!(err.exit_code(), 65);
}

#[test]
fn test_run_app_missing_notion_key_without_dry_run() {
    let config = Config {
        instruction_args: vec!["haiku about cats".to_string()],
        ..Default::default()
    };
    let err = run_app(config, &offline_env(), Arc::new(ScriptedConsole::default())).unwrap_err();
    assert_eq!(err, Error::config("NOTION_API_KEY is not set"));
    assert_eq!(err.exit_code(), 78);
}

#[test]
fn test_run_app_missing_page_id() {
    let env = MapEnvResolver::from([("AGENT_PROVIDER", "echo"), ("NOTION_API_KEY", "n")]);
    let config = Config {
        instruction_args: vec!["haiku about cats".to_string()],
        ..Default::default()
    };
    let err = run_app(config, &env, Arc::new(ScriptedConsole::default())).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_run_app_with_unknown_provider() {
    let config = Config {
        dry_run: true,
        provider: Some(ProviderName::new("unknown")),
        instruction_args: vec!["haiku about cats".to_string()],
        ..Default::default()
    };
    let err = run_app(config, &offline_env(), Arc::new(ScriptedConsole::default())).unwrap_err();
    assert!(err.to_string().contains("Unknown provider"));
    assert_eq!(err.exit_code(), 64);
}

#[test]
fn test_run_app_llm_resolver_with_echo_is_gateway_error() {
    // echo の応答は JSON ではないので、インテント解決は生成失敗になる
    let config = Config {
        dry_run: true,
        resolver: ResolverKind::Llm,
        instruction_args: vec!["haiku about cats".to_string()],
        ..Default::default()
    };
    let err = run_app(config, &offline_env(), Arc::new(ScriptedConsole::default())).unwrap_err();
    assert!(matches!(err, Error::Gateway(_)));
    assert_eq!(err.exit_code(), 69);
}

#[test]
fn test_run_app_interactive_quits() {
    let console = Arc::new(ScriptedConsole::with_inputs(&["haiku about moss", "q"]));
    let config = Config {
        dry_run: true,
        ..Default::default()
    };
    assert_eq!(run_app(config, &offline_env(), console.clone()).unwrap(), 0);
    assert_eq!(
        console.out_lines().last().map(String::as_str),
        Some("Haiku successfully inserted in Notion! (block dry-run)")
    );
}

#[test]
fn test_run_app_writes_jsonl_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs").join("agent.jsonl");
    let env = offline_env().set("AGENT_LOG_FILE", log_path.to_str().unwrap());
    let config = Config {
        dry_run: true,
        instruction_args: vec!["haiku about cats".to_string()],
        ..Default::default()
    };
    run_app(config, &env, Arc::new(ScriptedConsole::default())).unwrap();

    let content = std::fs::read_to_string(&log_path).unwrap();
    let messages: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(messages.first().map(String::as_str), Some("command started"));
    assert!(messages.contains(&"dispatch completed".to_string()));
    assert_eq!(messages.last().map(String::as_str), Some("command finished"));
}

#[test]
fn test_run_app_get_weather_action() {
    let console = Arc::new(ScriptedConsole::default());
    let config = Config {
        dry_run: true,
        action: Some("get_weather".to_string()),
        params: vec!["location=Oslo".to_string()],
        ..Default::default()
    };
    assert_eq!(run_app(config, &offline_env(), console.clone()).unwrap(), 0);
    assert_eq!(console.out_lines(), vec!["Retrieved weather data for Oslo.".to_string()]);
}

#[test]
fn test_run_app_action_name_is_exact() {
    let config = Config {
        dry_run: true,
        action: Some("Get-Weather".to_string()),
        ..Default::default()
    };
    let err = run_app(config, &offline_env(), Arc::new(ScriptedConsole::default())).unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "action"));
}
