//! # JSON ⇔ DynamoDB 属性値の変換
//!
//! 設問の `coordinates` は任意の JSON 値のため、DynamoDB のネイティブ型に
//! 再帰的に変換して保存する。
//!
//! | JSON | AttributeValue |
//! |------|----------------|
//! | `null` | `NULL` |
//! | bool | `BOOL` |
//! | number | `N` |
//! | string | `S` |
//! | array | `L` |
//! | object | `M` |
//!
//! 読み出し時は `SS` / `NS` も配列として受け入れる。バイナリ型は扱わない。

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use crate::InfraError;

/// JSON 値を DynamoDB 属性値に変換する
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// DynamoDB 属性値を JSON 値に変換する
pub fn attribute_to_json(attribute: &AttributeValue) -> Result<Value, InfraError> {
    let value = match attribute {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(attribute_to_json)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(fields) => Value::Object(map_to_json(fields)?),
        AttributeValue::Ss(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(InfraError::invalid_item(format!(
                "JSON に変換できない属性型: {other:?}"
            )));
        }
    };
    Ok(value)
}

fn map_to_json(fields: &HashMap<String, AttributeValue>) -> Result<Map<String, Value>, InfraError> {
    fields
        .iter()
        .map(|(k, v)| attribute_to_json(v).map(|json| (k.clone(), json)))
        .collect()
}

/// DynamoDB の数値文字列を JSON の数値に変換する
///
/// 整数として表現できる値は整数のまま保持する。
fn parse_number(raw: &str) -> Result<Number, InfraError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| InfraError::invalid_item(format!("数値属性をパースできません: {raw}")))
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::primitives::Blob;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_座標オブジェクトはmに変換される() {
        let coordinates = json!({ "lat": 35.5, "lng": 139 });

        let attribute = json_to_attribute(&coordinates);

        let AttributeValue::M(fields) = attribute else {
            panic!("M 型になること");
        };
        assert_eq!(fields.get("lat"), Some(&AttributeValue::N("35.5".to_string())));
        assert_eq!(fields.get("lng"), Some(&AttributeValue::N("139".to_string())));
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(true))]
    #[case(json!(-42))]
    #[case(json!(18446744073709551615u64))]
    #[case(json!(0.25))]
    #[case(json!("north"))]
    #[case(json!([1, "two", [3.5], {"four": null}]))]
    #[case(json!({"lat": 35.6812, "lng": 139.7671, "meta": {"tags": ["station"], "exact": false}}))]
    fn test_json値は属性値を経由しても同じ値に戻る(#[case] value: Value) {
        let restored = attribute_to_json(&json_to_attribute(&value)).unwrap();

        assert_eq!(restored, value);
    }

    #[test]
    fn test_文字列セットと数値セットは配列として読み出す() {
        let ss = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        let ns = AttributeValue::Ns(vec!["1".to_string(), "2.5".to_string()]);

        assert_eq!(attribute_to_json(&ss).unwrap(), json!(["a", "b"]));
        assert_eq!(attribute_to_json(&ns).unwrap(), json!([1, 2.5]));
    }

    #[test]
    fn test_バイナリ属性は不正アイテムエラーになる() {
        let binary = AttributeValue::B(Blob::new(vec![0u8, 1, 2]));

        let result = attribute_to_json(&binary);

        assert_eq!(result.unwrap_err().kind_name(), "InvalidItem");
    }

    #[test]
    fn test_数値として解釈できない文字列は不正アイテムエラーになる() {
        let result = attribute_to_json(&AttributeValue::N("abc".to_string()));

        assert_eq!(result.unwrap_err().kind_name(), "InvalidItem");
    }
}
