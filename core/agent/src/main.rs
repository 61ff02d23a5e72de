mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use common::adapter::StdEnvResolver;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use domain::{AgentCommand, SchemaRegistry};
use ports::inbound::UseCaseRunner;
use wiring::{wire_agent, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config, &self.app.registry)?;
        let command_name = cmd_name_for_log(&cmd);
        self.app.logger.emit(
            LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let use_case = &self.app.agent_use_case;
        let result = match cmd {
            AgentCommand::Help => {
                print_help();
                Ok(0)
            }
            AgentCommand::ListActions => {
                print_actions(&self.app.registry);
                Ok(0)
            }
            AgentCommand::Run { instruction } => use_case.run_instruction(&instruction),
            AgentCommand::RunHint { hint } => use_case.run_hint(&hint),
            AgentCommand::Interactive => use_case.run_interactive(),
        };

        let code = match &result {
            Ok(code) => *code,
            Err(e) => e.exit_code(),
        };
        self.app.logger.emit(
            LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            self.app.logger.emit(
                LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

fn cmd_name_for_log(cmd: &AgentCommand) -> &'static str {
    match cmd {
        AgentCommand::Help => "help",
        AgentCommand::ListActions => "list-actions",
        AgentCommand::Run { .. } => "run",
        AgentCommand::RunHint { .. } => "run-action",
        AgentCommand::Interactive => "interactive",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("agent: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    // ヘルプと一覧は設定（API キー等）なしで表示できるようにする
    if config.help {
        print_help();
        return Ok(0);
    }
    if config.list_actions {
        print_actions(&SchemaRegistry::builtin());
        return Ok(0);
    }
    let env = StdEnvResolver::with_dotenv()?;
    let app = wire_agent(&env, &config)?;
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: agent [options] [instruction...]");
}

fn print_actions(registry: &SchemaRegistry) {
    for schema in registry.iter() {
        println!("{}", schema.signature());
        println!("    {}", schema.description);
        for f in &schema.fields {
            println!("    {:<10} {}", f.name, f.description);
        }
    }
}

fn print_help() {
    println!("Usage: agent [options] [instruction...]");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -l, --list-actions            List registered actions and their parameters");
    println!("  -p, --provider <provider>     Model provider: openai (default), openai_compat, gemini, echo");
    println!("  -m, --model <model>           Model name. Default: AGENT_MODEL / OPENAI_MODEL / provider default");
    println!("  -t, --temperature <t>         Sampling temperature (0.0 - 2.0)");
    println!("  --max-tokens <n>              Maximum number of output tokens");
    println!("  -a, --action <name>           Run an action directly instead of resolving an instruction");
    println!("  -P, --param <key=value>       Parameter for --action (repeatable)");
    println!("  -r, --resolver <rule|llm>     How instructions are read. Default: rule");
    println!("  --dry-run                     Generate and print the text; do not write to Notion");
    println!("  -v, --verbose                 Emit structured logs to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Environment (a .env file in the working directory is read too):");
    println!("  OPENAI_API_KEY    Required for the openai provider");
    println!("  GEMINI_API_KEY    Required for the gemini provider");
    println!("  NOTION_API_KEY    Notion integration token (not needed with --dry-run)");
    println!("  NOTION_PAGE_ID    Page that receives the haiku");
    println!("  AGENT_PROVIDER, AGENT_MODEL, OPENAI_MODEL, OPENAI_BASE_URL, AGENT_TEMPERATURE,");
    println!("  AGENT_MAX_TOKENS, NOTION_BASE_URL, AGENT_HTTP_TIMEOUT_SECS, AGENT_LOG_FILE");
    println!();
    println!("Without an instruction, agent reads instructions interactively (q to quit).");
    println!("Separate several actions with ';' or 'and then'.");
    println!();
    println!("Examples:");
    println!("  agent Please insert a haiku about cats");
    println!("  agent --dry-run -p echo haiku about autumn leaves");
    println!("  agent -a insert_haiku -P topic=rain -P title=Rain");
    println!("  agent \"weather in Oslo; haiku about fjords\"");
}
