use crate::domain::{ActionHint, AgentCommand, FieldType, Instruction, SchemaRegistry};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use common::llm::ModelOverrides;
use serde_json::{Map, Value};

/// 指示文からアクションを取り出す方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverKind {
    /// 正規表現（ネットワーク不要）
    #[default]
    Rule,
    /// 言語モデルに JSON で答えさせる
    Llm,
}

impl ResolverKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rule" => Some(Self::Rule),
            "llm" => Some(Self::Llm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -l / --list-actions: 登録済みアクションの一覧を表示
    pub list_actions: bool,
    /// -v / --verbose: 構造化ログを stderr にも出す
    pub verbose: bool,
    /// --dry-run: 生成だけ行い、ドキュメントには書き込まず表示する
    pub dry_run: bool,
    pub provider: Option<ProviderName>,
    pub model: Option<ModelName>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// -a / --action: インテント解決を通さずにアクションを指定
    pub action: Option<String>,
    /// -P / --param key=value（未解析のまま保持する）
    pub params: Vec<String>,
    pub resolver: ResolverKind,
    pub instruction_args: Vec<String>,
}

impl Config {
    /// CLI から来たモデル設定の上書き
    pub fn overrides(&self) -> ModelOverrides {
        ModelOverrides {
            provider: self.provider.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("agent")
        .about("Turn a natural-language instruction into actions: write a haiku into a Notion page or look up the weather")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-actions")
                .short('l')
                .long("list-actions")
                .help("List registered actions and their parameters")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Generate and print the text without writing to Notion")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("provider")
                .help("Model provider (openai, openai_compat, gemini, echo)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model name (e.g. gpt-3.5-turbo)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("temperature")
                .short('t')
                .long("temperature")
                .value_name("temperature")
                .help("Sampling temperature (0.0 - 2.0)")
                .value_parser(value_parser!(f32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-tokens")
                .long("max-tokens")
                .value_name("n")
                .help("Maximum number of output tokens")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("action")
                .short('a')
                .long("action")
                .value_name("name")
                .help("Run this action directly instead of resolving an instruction")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("param")
                .short('P')
                .long("param")
                .value_name("key=value")
                .help("Parameter for --action (repeatable)")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("resolver")
                .short('r')
                .long("resolver")
                .value_name("kind")
                .help("How to read instructions: rule (default) or llm")
                .value_parser(["rule", "llm"])
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("instruction")
                .index(1)
                .help("Instruction words (interactive mode when omitted)")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        list_actions: matches.get_flag("list-actions"),
        verbose: matches.get_flag("verbose"),
        dry_run: matches.get_flag("dry-run"),
        provider: matches
            .get_one::<String>("provider")
            .map(|s| ProviderName::new(s.clone())),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        temperature: matches.get_one::<f32>("temperature").copied(),
        max_tokens: matches.get_one::<u32>("max-tokens").copied(),
        action: matches.get_one::<String>("action").cloned(),
        params: matches
            .get_many::<String>("param")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
        resolver: matches
            .get_one::<String>("resolver")
            .and_then(|s| ResolverKind::from_str(s))
            .unwrap_or_default(),
        instruction_args: matches
            .get_many::<String>("instruction")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "agent", &mut std::io::stdout());
}

/// `key=value` を、登録済みフィールドの型に合わせて JSON 値にする
///
/// 型に合わない値・未知のフィールドは文字列のまま残す（検証で弾かれる）。
fn parse_param(registry: &SchemaRegistry, action: &str, raw: &str) -> Result<(String, Value), Error> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        Error::invalid_argument(format!("--param expects key=value (got '{}')", raw))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_argument(format!(
            "--param has an empty key (got '{}')",
            raw
        )));
    }
    let field_type = registry
        .lookup(action)
        .and_then(|s| s.field(key))
        .map(|f| f.field_type);
    let typed = match field_type {
        Some(FieldType::Boolean) => match value.trim().to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(value.to_string()),
        },
        Some(FieldType::Number) => value
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string())),
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), typed))
}

/// Config を AgentCommand に変換する
pub fn config_to_command(config: Config, registry: &SchemaRegistry) -> Result<AgentCommand, Error> {
    if config.help {
        return Ok(AgentCommand::Help);
    }

    if config.list_actions {
        return Ok(AgentCommand::ListActions);
    }

    if let Some(action) = config.action {
        if !config.instruction_args.is_empty() {
            return Err(Error::invalid_argument(
                "--action cannot be combined with an instruction",
            ));
        }
        let mut parameters = Map::new();
        for raw in &config.params {
            let (key, value) = parse_param(registry, &action, raw)?;
            parameters.insert(key, value);
        }
        return Ok(AgentCommand::RunHint {
            hint: ActionHint::new(action, Value::Object(parameters)),
        });
    }

    if !config.params.is_empty() {
        return Err(Error::invalid_argument("--param requires --action"));
    }

    if config.instruction_args.is_empty() {
        return Ok(AgentCommand::Interactive);
    }

    Ok(AgentCommand::Run {
        instruction: Instruction::new(config.instruction_args.join(" ")),
    })
}
