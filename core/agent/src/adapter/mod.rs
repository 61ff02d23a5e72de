//! agent のアダプタ（Outbound ポートの実装と設定読み込み）

pub mod console;
pub mod dry_run_document;
pub mod llm_gateway;
pub mod llm_intent_resolver;
pub mod notion;
pub mod rule_intent_resolver;
pub mod settings;
pub(crate) mod test_doubles;

pub use console::StdConsole;
pub use dry_run_document::DryRunDocument;
pub use llm_gateway::StdModelGateway;
pub use llm_intent_resolver::LlmIntentResolver;
pub use notion::NotionClient;
pub use rule_intent_resolver::RuleIntentResolver;
pub use settings::AgentSettings;
