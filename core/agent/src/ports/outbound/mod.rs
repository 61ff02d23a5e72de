//! Outbound ポート

pub mod console;
pub mod document_api;
pub mod intent_resolver;
pub mod model_gateway;

pub use console::Console;
pub use document_api::DocumentApi;
pub use intent_resolver::IntentResolver;
pub use model_gateway::ModelGateway;
