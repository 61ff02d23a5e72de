//! アクションのスキーマ定義（スキーマレジストリ）
//!
//! 新しいアクションを増やすときは ActionKind に variant を足し、ここにエントリを登録する。

use super::action::ActionKind;
use serde_json::Value;

/// フィールドのプリミティブ型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// JSON 値がこの型か
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// JSON 値の型名（エラーメッセージ用）
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 1 フィールドの宣言
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: false,
            description,
        }
    }
}

/// 1 アクション分のスキーマ
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSchema {
    pub kind: ActionKind,
    pub description: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl ActionSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 一行表示（--list-actions・LLM へのスキーマ説明で使う）
    pub fn signature(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                format!(
                    "{}{}: {}",
                    f.name,
                    if f.required { "" } else { "?" },
                    f.field_type.as_str()
                )
            })
            .collect();
        format!("{}{{{}}}", self.kind.as_str(), fields.join(", "))
    }
}

/// insert_haiku のフィールド名
pub mod haiku_fields {
    pub const TOPIC: &str = "topic";
    pub const TITLE: &str = "title";
    pub const AS_PAGE: &str = "as_page";
}

/// get_weather のフィールド名
pub mod weather_fields {
    pub const LOCATION: &str = "location";
}

/// アクション名 → スキーマの表
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<ActionSchema>,
}

impl SchemaRegistry {
    /// 空のレジストリ
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みアクションを登録済みのレジストリ
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.register(ActionSchema {
            kind: ActionKind::InsertHaiku,
            description: "Write a haiku about a topic and insert it into the Notion page",
            fields: vec![
                FieldSpec::required(haiku_fields::TOPIC, FieldType::String, "What the haiku is about"),
                FieldSpec::optional(
                    haiku_fields::TITLE,
                    FieldType::String,
                    "Title of a new child page; implies as_page (default \"Haiku\")",
                ),
                FieldSpec::optional(
                    haiku_fields::AS_PAGE,
                    FieldType::Boolean,
                    "Insert as a new child page instead of a block on the page",
                ),
            ],
        });
        reg.register(ActionSchema {
            kind: ActionKind::GetWeather,
            description: "Retrieve weather data for a location",
            fields: vec![FieldSpec::required(
                weather_fields::LOCATION,
                FieldType::String,
                "City or place name",
            )],
        });
        reg
    }

    /// スキーマを登録する（同じ kind があれば置き換える）
    pub fn register(&mut self, schema: ActionSchema) {
        if let Some(existing) = self.schemas.iter_mut().find(|s| s.kind == schema.kind) {
            *existing = schema;
        } else {
            self.schemas.push(schema);
        }
    }

    /// kind からスキーマを得る
    pub fn get_schema(&self, kind: ActionKind) -> Option<&ActionSchema> {
        self.schemas.iter().find(|s| s.kind == kind)
    }

    /// ワイヤ名からスキーマを得る（登録されていない名前は None）
    pub fn lookup(&self, name: &str) -> Option<&ActionSchema> {
        ActionKind::from_name(name).and_then(|k| self.get_schema(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSchema> {
        self.schemas.iter()
    }

    /// 登録済みアクション名（登録順）
    pub fn names(&self) -> Vec<&'static str> {
        self.schemas.iter().map(|s| s.kind.as_str()).collect()
    }
}
