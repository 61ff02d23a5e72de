//! CLI 層（引数解析と Config → AgentCommand の変換）

mod args;

pub use args::{
    config_to_command, parse_args, print_completion, Config, ParseOutcome, ResolverKind,
};

#[cfg(test)]
pub use args::parse_args_from;
