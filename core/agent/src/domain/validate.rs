//! アクション要求の検証（副作用なし）
//!
//! ヒント（アクション名 + 生パラメータ）をスキーマレジストリに照らして ActionRequest にする。
//! 未知のフィールドは黙って捨てずに拒否する。null は「指定なし」として扱う。

use super::action::{ActionHint, ActionKind, ActionRequest, ParamValue};
use super::schema::{haiku_fields, json_type_name, FieldType, SchemaRegistry};
use common::error::Error;
use serde_json::Value;
use std::collections::BTreeMap;

fn to_param(field_type: FieldType, value: &Value) -> Option<ParamValue> {
    match (field_type, value) {
        (FieldType::String, Value::String(s)) => Some(ParamValue::String(s.clone())),
        (FieldType::Number, Value::Number(n)) => n.as_f64().map(ParamValue::Number),
        (FieldType::Boolean, Value::Bool(b)) => Some(ParamValue::Boolean(*b)),
        _ => None,
    }
}

/// アクション名と生パラメータを検証する
///
/// エラーは Error::Validation { field, reason }:
/// - 未登録のアクション（field = "action"）
/// - パラメータがオブジェクトでない（field = "parameters"）
/// - 未知のフィールド / 必須フィールドの欠落 / 型違い / 必須文字列が空
pub fn validate(registry: &SchemaRegistry, action: &str, raw: &Value) -> Result<ActionRequest, Error> {
    let schema = registry.lookup(action).ok_or_else(|| {
        let known = registry.names();
        Error::validation(
            "action",
            if known.is_empty() {
                format!("unknown action '{}'", action)
            } else {
                format!("unknown action '{}' (known: {})", action, known.join(", "))
            },
        )
    })?;

    let empty = serde_json::Map::new();
    let object = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(Error::validation(
                "parameters",
                format!("expected an object, got {}", json_type_name(other)),
            ))
        }
    };

    // 未知フィールド（キー順で最初のもの）
    let mut unknown: Vec<&String> = object.keys().filter(|k| schema.field(k).is_none()).collect();
    unknown.sort();
    if let Some(name) = unknown.first() {
        return Err(Error::validation(
            name.as_str(),
            format!("unknown field for action '{}'", schema.kind),
        ));
    }

    let mut parameters = BTreeMap::new();
    for spec in &schema.fields {
        let value = object.get(spec.name).filter(|v| !v.is_null());
        let Some(value) = value else {
            if spec.required {
                return Err(Error::validation(spec.name, "required field is missing"));
            }
            continue;
        };
        let param = to_param(spec.field_type, value).ok_or_else(|| {
            Error::validation(
                spec.name,
                format!(
                    "expected {}, got {}",
                    spec.field_type.as_str(),
                    json_type_name(value)
                ),
            )
        })?;
        if spec.required {
            if let ParamValue::String(ref s) = param {
                if s.trim().is_empty() {
                    return Err(Error::validation(spec.name, "must not be empty"));
                }
            }
        }
        parameters.insert(spec.name.to_string(), param);
    }

    check_combination(schema.kind, &parameters)?;
    Ok(ActionRequest::new(schema.kind, parameters))
}

/// フィールド間の組み合わせ検査
///
/// insert_haiku: title は子ページのタイトルなので as_page=false とは両立しない。
/// as_page を省略した title は子ページ作成として扱う（ディスパッチャ側）。
fn check_combination(kind: ActionKind, parameters: &BTreeMap<String, ParamValue>) -> Result<(), Error> {
    if kind == ActionKind::InsertHaiku
        && parameters.contains_key(haiku_fields::TITLE)
        && parameters.get(haiku_fields::AS_PAGE) == Some(&ParamValue::Boolean(false))
    {
        return Err(Error::validation(
            haiku_fields::TITLE,
            "title only applies to a new child page; drop it or set as_page to true",
        ));
    }
    Ok(())
}

/// ActionHint をそのまま検証する
pub fn validate_hint(registry: &SchemaRegistry, hint: &ActionHint) -> Result<ActionRequest, Error> {
    validate(registry, &hint.action, &hint.parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::ActionKind;
    use crate::domain::schema::{ActionSchema, FieldSpec};
    use serde_json::json;

    fn field_of(err: Error) -> (String, String) {
        match err {
            Error::Validation { field, reason } => (field, reason),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_insert_haiku() {
        let reg = SchemaRegistry::builtin();
        let req = validate(&reg, "insert_haiku", &json!({"topic": "cats"})).unwrap();
        assert_eq!(req.kind(), ActionKind::InsertHaiku);
        assert_eq!(req.str_param("topic"), Some("cats"));
        assert_eq!(req.parameters().len(), 1);
    }

    #[test]
    fn test_optional_fields_are_typed() {
        let reg = SchemaRegistry::builtin();
        let req = validate(
            &reg,
            "insert_haiku",
            &json!({"topic": "rain", "title": "Rain", "as_page": true}),
        )
        .unwrap();
        assert_eq!(req.str_param("title"), Some("Rain"));
        assert_eq!(req.bool_param("as_page"), Some(true));
    }

    #[test]
    fn test_unknown_action() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(validate(&reg, "send_email", &json!({"to": "a@b.c"})).unwrap_err());
        assert_eq!(field, "action");
        assert!(reason.contains("send_email"));
        assert!(reason.contains("insert_haiku, get_weather"));
    }

    #[test]
    fn test_action_name_must_match_exactly() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(validate(&reg, "Insert-Haiku", &json!({"topic": "cats"})).unwrap_err());
        assert_eq!(field, "action");
        assert!(reason.contains("'Insert-Haiku'"));
    }

    #[test]
    fn test_valid_get_weather() {
        let reg = SchemaRegistry::builtin();
        let req = validate(&reg, "get_weather", &json!({"location": "Oslo"})).unwrap();
        assert_eq!(req.kind(), ActionKind::GetWeather);
        assert_eq!(req.str_param("location"), Some("Oslo"));

        let (field, reason) = field_of(validate(&reg, "get_weather", &json!({})).unwrap_err());
        assert_eq!(field, "location");
        assert_eq!(reason, "required field is missing");

        let (field, _) = field_of(
            validate(&reg, "get_weather", &json!({"location": "Oslo", "topic": "rain"})).unwrap_err(),
        );
        assert_eq!(field, "topic");
    }

    #[test]
    fn test_title_with_as_page_false_is_rejected() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(
            validate(&reg, "insert_haiku", &json!({"topic": "rain", "title": "Rain", "as_page": false}))
                .unwrap_err(),
        );
        assert_eq!(field, "title");
        assert!(reason.contains("as_page"));

        // as_page 省略の title は受け付ける（子ページ扱いはディスパッチャ）
        let req = validate(&reg, "insert_haiku", &json!({"topic": "rain", "title": "Rain"})).unwrap();
        assert_eq!(req.str_param("title"), Some("Rain"));
        assert_eq!(req.bool_param("as_page"), None);
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(validate(&reg, "insert_haiku", &json!({})).unwrap_err());
        assert_eq!(field, "topic");
        assert_eq!(reason, "required field is missing");

        let (field, _) = field_of(validate(&reg, "insert_haiku", &json!({"topic": null})).unwrap_err());
        assert_eq!(field, "topic");

        let (field, _) = field_of(validate(&reg, "insert_haiku", &Value::Null).unwrap_err());
        assert_eq!(field, "topic");
    }

    #[test]
    fn test_wrong_type() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(validate(&reg, "insert_haiku", &json!({"topic": 42})).unwrap_err());
        assert_eq!(field, "topic");
        assert_eq!(reason, "expected string, got number");

        let (field, reason) = field_of(
            validate(&reg, "insert_haiku", &json!({"topic": "x", "as_page": "yes"})).unwrap_err(),
        );
        assert_eq!(field, "as_page");
        assert_eq!(reason, "expected boolean, got string");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(
            validate(&reg, "insert_haiku", &json!({"topic": "cats", "page_id": "x", "color": "red"})).unwrap_err(),
        );
        assert_eq!(field, "color");
        assert!(reason.contains("unknown field"));
    }

    #[test]
    fn test_blank_required_string() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(validate(&reg, "insert_haiku", &json!({"topic": "  "})).unwrap_err());
        assert_eq!(field, "topic");
        assert_eq!(reason, "must not be empty");
    }

    #[test]
    fn test_parameters_must_be_object() {
        let reg = SchemaRegistry::builtin();
        let (field, reason) = field_of(validate(&reg, "insert_haiku", &json!(["cats"])).unwrap_err());
        assert_eq!(field, "parameters");
        assert_eq!(reason, "expected an object, got array");
    }

    #[test]
    fn test_number_fields_with_custom_schema() {
        let mut reg = SchemaRegistry::new();
        reg.register(ActionSchema {
            kind: ActionKind::InsertHaiku,
            description: "haiku with a syllable budget",
            fields: vec![
                FieldSpec::required("topic", FieldType::String, "topic"),
                FieldSpec::required("syllables", FieldType::Number, "total syllables"),
            ],
        });
        let req = validate(&reg, "insert_haiku", &json!({"topic": "sea", "syllables": 17})).unwrap();
        assert_eq!(req.get("syllables").and_then(ParamValue::as_f64), Some(17.0));

        let (field, reason) = field_of(
            validate(&reg, "insert_haiku", &json!({"topic": "sea", "syllables": "17"})).unwrap_err(),
        );
        assert_eq!(field, "syllables");
        assert_eq!(reason, "expected number, got string");
    }

    #[test]
    fn test_validate_hint() {
        let reg = SchemaRegistry::builtin();
        let hint = ActionHint::new("insert_haiku", json!({"topic": "cats"}));
        assert!(validate_hint(&reg, &hint).is_ok());
    }
}
