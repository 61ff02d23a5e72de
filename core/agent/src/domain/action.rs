//! アクション要求のドメイン型
//!
//! ActionHint は検証前の入力、ActionRequest は検証済み（スキーマを満たす）値。
//! ActionRequest は validate() 以外では作れない。

use serde_json::Value;
use std::collections::BTreeMap;

/// 実行できるアクションの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    /// 俳句を生成してページに挿入する
    InsertHaiku,
    /// 天気を取得する（データ源は未接続。固定メッセージを返す）
    GetWeather,
}

impl ActionKind {
    /// ワイヤ上の名前（CLI・LLM 出力で使う）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertHaiku => "insert_haiku",
            Self::GetWeather => "get_weather",
        }
    }

    /// ワイヤ名から引く。大文字小文字・区切り文字の揺れは受け付けない（完全一致）
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "insert_haiku" => Some(Self::InsertHaiku),
            "get_weather" => Some(Self::GetWeather),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// パラメータの値（プリミティブ型のみ）
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// 検証前のアクション指定（インテント解決や CLI から来る）
#[derive(Debug, Clone, PartialEq)]
pub struct ActionHint {
    pub action: String,
    /// JSON オブジェクトであることが期待されるが、検証は validate() で行う
    pub parameters: Value,
}

impl ActionHint {
    pub fn new(action: impl Into<String>, parameters: Value) -> Self {
        Self {
            action: action.into(),
            parameters,
        }
    }
}

/// 検証済みのアクション要求
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    kind: ActionKind,
    parameters: BTreeMap<String, ParamValue>,
}

impl ActionRequest {
    /// validate() からのみ呼ぶ
    pub(crate) fn new(kind: ActionKind, parameters: BTreeMap<String, ParamValue>) -> Self {
        Self { kind, parameters }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn parameters(&self) -> &BTreeMap<String, ParamValue> {
        &self.parameters
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn bool_param(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_names() {
        assert_eq!(ActionKind::InsertHaiku.as_str(), "insert_haiku");
        assert_eq!(ActionKind::from_name("insert_haiku"), Some(ActionKind::InsertHaiku));
        assert_eq!(ActionKind::GetWeather.as_str(), "get_weather");
        assert_eq!(ActionKind::from_name("get_weather"), Some(ActionKind::GetWeather));
        assert_eq!(ActionKind::from_name("send_email"), None);
    }

    #[test]
    fn test_action_kind_name_is_exact() {
        assert_eq!(ActionKind::from_name("Insert-Haiku"), None);
        assert_eq!(ActionKind::from_name("INSERT_HAIKU"), None);
        assert_eq!(ActionKind::from_name(" insert_haiku"), None);
        assert_eq!(ActionKind::from_name("get-weather"), None);
    }

    #[test]
    fn test_param_value_accessors() {
        assert_eq!(ParamValue::String("cats".into()).as_str(), Some("cats"));
        assert_eq!(ParamValue::Number(3.0).as_f64(), Some(3.0));
        assert_eq!(ParamValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(ParamValue::Boolean(true).as_str(), None);
    }

    #[test]
    fn test_action_request_typed_getters() {
        let mut params = BTreeMap::new();
        params.insert("topic".to_string(), ParamValue::String("cats".into()));
        params.insert("as_page".to_string(), ParamValue::Boolean(false));
        let req = ActionRequest::new(ActionKind::InsertHaiku, params);
        assert_eq!(req.str_param("topic"), Some("cats"));
        assert_eq!(req.bool_param("as_page"), Some(false));
        assert_eq!(req.str_param("as_page"), None);
        assert_eq!(req.str_param("title"), None);
    }
}
