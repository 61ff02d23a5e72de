//! agent 固有のドメイン型（型と不変条件）

pub mod action;
pub mod command;
pub mod content;
pub mod dispatch_state;
pub mod document;
pub mod instruction;
pub mod prompt;
pub mod schema;
pub mod validate;

pub use action::{ActionHint, ActionKind, ActionRequest, ParamValue};
pub use command::AgentCommand;
pub use content::GeneratedContent;
pub use dispatch_state::{Completion, DispatchReport, DispatchState, DispatchTrail};
pub use document::{BlockRef, DocumentTarget};
pub use instruction::Instruction;
pub use prompt::Prompt;
pub use schema::{ActionSchema, FieldSpec, FieldType, SchemaRegistry};
pub use validate::{validate, validate_hint};
