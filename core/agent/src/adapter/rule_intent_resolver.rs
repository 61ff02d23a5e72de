//! 正規表現による IntentResolver（ネットワーク不要）
//!
//! 受け付ける形:
//! - `... haiku about|on|for <topic>`（末尾の句読点と "please" は除く）
//! - `as a page` / `as a new page` → as_page = true
//! - `titled "<title>"` → title
//! - `... weather in|for|at <location>` → get_weather
//!
//! `;` か `and then` で区切ると複数のアクションを順に指定できる。

use crate::domain::schema::{haiku_fields, weather_fields};
use crate::domain::{ActionHint, ActionKind, Instruction};
use crate::ports::outbound::IntentResolver;
use common::error::Error;
use regex::Regex;
use serde_json::{Map, Value};

pub struct RuleIntentResolver {
    topic: Regex,
    title: Regex,
    as_page: Regex,
    please: Regex,
    weather: Regex,
    separator: Regex,
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::system(format!("invalid pattern '{}': {}", pattern, e)))
}

impl RuleIntentResolver {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            topic: compile(r"(?is)\bhaiku\s+(?:about|on|for)\s+(.+)$")?,
            title: compile(r#"(?i)\b(?:titled|entitled)\s+["“]([^"”]*)["”]"#)?,
            as_page: compile(r"(?i)\bas\s+an?\s+(?:new\s+)?(?:child\s+)?page\b")?,
            please: compile(r"(?i)[\s,]*\bplease$")?,
            weather: compile(r"(?is)\bweather\s+(?:in|for|at)\s+(.+)$")?,
            separator: compile(r"(?i)\s*;\s*|,?\s+and\s+then\s+")?,
        })
    }

    /// 末尾の句読点と "please" を取り除く（両方が交互に付いていても落とす）
    fn clean_topic(&self, raw: &str) -> String {
        let mut s = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        loop {
            let trimmed = s
                .trim_end_matches(|c: char| ".!?,;:".contains(c) || c.is_whitespace())
                .to_string();
            let trimmed = self.please.replace(&trimmed, "").to_string();
            if trimmed == s {
                break;
            }
            s = trimmed;
        }
        s.trim_matches(|c: char| c == '"' || c == '\'').trim().to_string()
    }

    /// 1 節を 1 つのヒントにする。俳句の形を先に見る（"haiku about the weather in Oslo" は俳句）
    fn resolve_clause(&self, clause: &str) -> Option<ActionHint> {
        self.haiku_hint(clause).or_else(|| self.weather_hint(clause))
    }

    fn haiku_hint(&self, clause: &str) -> Option<ActionHint> {
        let mut text = clause.to_string();
        let mut parameters = Map::new();

        if let Some(title) = self
            .title
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
        {
            parameters.insert(haiku_fields::TITLE.to_string(), Value::String(title));
            text = self.title.replace(&text, " ").to_string();
        }
        if self.as_page.is_match(&text) {
            parameters.insert(haiku_fields::AS_PAGE.to_string(), Value::Bool(true));
            text = self.as_page.replace_all(&text, " ").to_string();
        }

        let topic = self
            .topic
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| self.clean_topic(m.as_str()))
            .filter(|t| !t.is_empty())?;
        parameters.insert(haiku_fields::TOPIC.to_string(), Value::String(topic));

        Some(ActionHint::new(
            ActionKind::InsertHaiku.as_str(),
            Value::Object(parameters),
        ))
    }

    fn weather_hint(&self, clause: &str) -> Option<ActionHint> {
        let location = self
            .weather
            .captures(clause)
            .and_then(|c| c.get(1))
            .map(|m| self.clean_topic(m.as_str()))
            .filter(|l| !l.is_empty())?;
        let mut parameters = Map::new();
        parameters.insert(weather_fields::LOCATION.to_string(), Value::String(location));
        Some(ActionHint::new(
            ActionKind::GetWeather.as_str(),
            Value::Object(parameters),
        ))
    }
}

impl IntentResolver for RuleIntentResolver {
    fn name(&self) -> &'static str {
        "rule"
    }

    fn resolve(&self, instruction: &Instruction) -> Result<Vec<ActionHint>, Error> {
        let clauses: Vec<&str> = self
            .separator
            .split(instruction.trim())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        let hints = clauses
            .iter()
            .map(|clause| self.resolve_clause(clause))
            .collect::<Option<Vec<_>>>()
            .filter(|hints| !hints.is_empty());
        hints.ok_or_else(|| {
            Error::validation(
                "instruction",
                format!(
                    "could not find an action in '{}' (try: insert a haiku about <topic>)",
                    instruction.trim()
                ),
            )
        })
    }
}
