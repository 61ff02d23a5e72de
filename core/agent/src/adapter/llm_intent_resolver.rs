//! 言語モデルによる IntentResolver
//!
//! レジストリの一覧を system prompt に載せ、`{"actions": [{"action": ..., "parameters": {...}}, ...]}`
//! の JSON を返させる。単独の `{"action": ...}` も受け付ける。
//! 返ってきたヒントはここでは検証しない（ディスパッチャが検証する）。

use crate::domain::{ActionHint, Instruction, Prompt, SchemaRegistry};
use crate::ports::outbound::{IntentResolver, ModelGateway};
use chrono::NaiveDate;
use common::error::Error;
use common::llm::ModelConfig;
use common::ports::outbound::Clock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// レジストリの内容を説明する system prompt
pub fn resolver_system_prompt(registry: &SchemaRegistry, today: NaiveDate) -> String {
    let mut s = String::from(
        "You turn a user's instruction into one or more action calls, in the order requested.\n\
         Available actions:\n",
    );
    for schema in registry.iter() {
        s.push_str(&format!("- {}: {}\n", schema.kind, schema.description));
        for f in &schema.fields {
            s.push_str(&format!(
                "    {} ({}, {}): {}\n",
                f.name,
                f.field_type.as_str(),
                if f.required { "required" } else { "optional" },
                f.description
            ));
        }
    }
    s.push_str(&format!("The current date is: {}\n", today.format("%Y-%m-%d")));
    s.push_str(
        "Reply with a single JSON object of the form \
         {\"actions\": [{\"action\": \"<action name>\", \"parameters\": {<field>: <value>}}]} \
         and nothing else. Omit optional fields you do not need.",
    );
    s
}

/// ```json ... ``` で囲まれていれば中身を取り出す
fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// モデルが返す 1 アクション分の JSON
#[derive(Debug, Deserialize)]
struct HintWire {
    action: String,
    #[serde(default)]
    parameters: Option<Value>,
}

impl From<HintWire> for ActionHint {
    fn from(wire: HintWire) -> Self {
        let parameters = wire
            .parameters
            .filter(|p| !p.is_null())
            .unwrap_or_else(|| Value::Object(Default::default()));
        ActionHint::new(wire.action, parameters)
    }
}

/// モデル出力の全体（一覧か単独）
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyWire {
    Many { actions: Vec<HintWire> },
    One(HintWire),
}

/// モデル出力をヒント列にする（JSON でない・アクションが 0 件なら Error::Gateway）
pub fn parse_hints(text: &str) -> Result<Vec<ActionHint>, Error> {
    let wire: ReplyWire = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        Error::gateway(format!("intent model returned unusable output: {}", e))
    })?;
    let hints: Vec<ActionHint> = match wire {
        ReplyWire::Many { actions } => actions.into_iter().map(ActionHint::from).collect(),
        ReplyWire::One(hint) => vec![hint.into()],
    };
    if hints.is_empty() {
        return Err(Error::gateway("intent model returned no actions"));
    }
    Ok(hints)
}

pub struct LlmIntentResolver {
    gateway: Arc<dyn ModelGateway>,
    model: ModelConfig,
    registry: Arc<SchemaRegistry>,
    clock: Arc<dyn Clock>,
}

impl LlmIntentResolver {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        model: ModelConfig,
        registry: Arc<SchemaRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            model,
            registry,
            clock,
        }
    }
}

impl IntentResolver for LlmIntentResolver {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn resolve(&self, instruction: &Instruction) -> Result<Vec<ActionHint>, Error> {
        let prompt = Prompt::new(
            Some(resolver_system_prompt(&self.registry, self.clock.today())),
            instruction.trim(),
        );
        let content = self.gateway.generate(&prompt, &self.model)?;
        parse_hints(content.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::test_doubles::{CallLog, ScriptedGateway};
    use common::adapter::FixedClock;
    use common::llm::ProviderType;
    use serde_json::json;

    fn resolver(gateway: Arc<ScriptedGateway>) -> LlmIntentResolver {
        LlmIntentResolver::new(
            gateway,
            ModelConfig::new(ProviderType::Echo),
            Arc::new(SchemaRegistry::builtin()),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())),
        )
    }

    #[test]
    fn test_system_prompt_lists_registry() {
        let s = resolver_system_prompt(
            &SchemaRegistry::builtin(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        );
        assert!(s.contains("- insert_haiku:"));
        assert!(s.contains("- get_weather:"));
        assert!(s.contains("location (string, required)"));
        assert!(s.contains("\"actions\""));
        assert!(s.contains("topic (string, required)"));
        assert!(s.contains("as_page (boolean, optional)"));
        assert!(s.contains("2026-10-16"));
    }

    #[test]
    fn test_resolve_plain_json() {
        let gw = Arc::new(ScriptedGateway::new(CallLog::default()).respond(Ok(
            r#"{"actions":[{"action":"insert_haiku","parameters":{"topic":"cats"}}]}"#,
        )));
        let hints = resolver(gw.clone())
            .resolve(&Instruction::new("Please insert a haiku about cats"))
            .unwrap();
        assert_eq!(hints, vec![ActionHint::new("insert_haiku", json!({ "topic": "cats" }))]);
        assert_eq!(gw.call_count(), 1);
        let prompts = gw.prompts.lock().unwrap();
        assert_eq!(prompts[0].user, "Please insert a haiku about cats");
    }

    #[test]
    fn test_resolve_fenced_json() {
        let text = "```json\n{\"action\": \"insert_haiku\", \"parameters\": {\"topic\": \"rain\", \"as_page\": true}}\n```";
        let hints = parse_hints(text).unwrap();
        assert_eq!(hints[0].parameters, json!({ "topic": "rain", "as_page": true }));
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_non_json_is_gateway_error() {
        assert!(matches!(parse_hints("Sure! Here is a haiku"), Err(Error::Gateway(_))));
        assert!(matches!(parse_hints(r#"{"parameters":{}}"#), Err(Error::Gateway(_))));
        assert!(matches!(parse_hints(r#"{"actions":[{"parameters":{}}]}"#), Err(Error::Gateway(_))));
    }

    #[test]
    fn test_empty_action_list_is_gateway_error() {
        let err = parse_hints(r#"{"actions":[]}"#).unwrap_err();
        assert_eq!(err, Error::gateway("intent model returned no actions"));
    }

    #[test]
    fn test_several_actions_keep_order() {
        let text = r#"{"actions":[
            {"action":"get_weather","parameters":{"location":"Oslo"}},
            {"action":"insert_haiku","parameters":{"topic":"fjords","title":"Fjords"}}
        ]}"#;
        assert_eq!(
            parse_hints(text).unwrap(),
            vec![
                ActionHint::new("get_weather", json!({ "location": "Oslo" })),
                ActionHint::new("insert_haiku", json!({ "topic": "fjords", "title": "Fjords" })),
            ]
        );
    }

    #[test]
    fn test_unknown_action_is_passed_through() {
        // 検証はディスパッチャの仕事
        let hints = parse_hints(r#"{"action":"send_email"}"#).unwrap();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].action, "send_email");
        assert_eq!(hints[0].parameters, json!({}));
    }

    #[test]
    fn test_gateway_failure_propagates() {
        let gw = Arc::new(
            ScriptedGateway::new(CallLog::default()).respond(Err(Error::gateway("HTTP 401"))),
        );
        let err = resolver(gw)
            .resolve(&Instruction::new("haiku about cats"))
            .unwrap_err();
        assert_eq!(err, Error::gateway("HTTP 401"));
    }
}
