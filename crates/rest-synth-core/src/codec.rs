//! Body encoding for synthesized methods.
//!
//! Arguments and results travel through the interpreter as
//! [`serde_json::Value`]s; a [`Codec`] turns them into wire bytes and back,
//! checking them against the declared [`TypeExpr`] on the way.

use anyhow::{anyhow, Context, Result};
use rest_synth_types::TypeExpr;
use serde_json::Value;

pub trait Codec: Send + Sync {
    /// Encode a request body declared as `ty`.
    fn serialize(&self, value: &Value, ty: &TypeExpr) -> Result<Vec<u8>>;

    /// Decode a response body declared as `ty`.
    fn deserialize(&self, bytes: &[u8], ty: &TypeExpr) -> Result<Value>;
}

/// JSON via serde_json, with structural checks for well-known types.
///
/// | declared                          | accepted JSON           |
/// |-----------------------------------|-------------------------|
/// | `()`                              | `null` (or empty body)  |
/// | `String`, `str`                   | string                  |
/// | `i8`..`i128`, `isize`             | integer                 |
/// | `u8`..`u128`, `usize`             | non-negative integer    |
/// | `f32`, `f64`                      | number                  |
/// | `bool`                            | boolean                 |
/// | `Vec<T>`, `VecDeque<T>`, sets     | array of `T`            |
/// | `Option<T>`                       | `null` or `T`           |
/// | `HashMap<K, V>`, `BTreeMap<K, V>` | object of `V`           |
/// | `Value`                           | anything                |
/// | any other name                    | object                  |
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn serialize(&self, value: &Value, ty: &TypeExpr) -> Result<Vec<u8>> {
        check_shape(value, ty)?;
        serde_json::to_vec(value).context("failed to encode JSON")
    }

    fn deserialize(&self, bytes: &[u8], ty: &TypeExpr) -> Result<Value> {
        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(bytes).context("response is not valid JSON")?
        };
        check_shape(&value, ty)?;
        Ok(value)
    }
}

/// Check that `value` has the JSON shape `ty` serializes to.
pub fn check_shape(value: &Value, ty: &TypeExpr) -> Result<()> {
    let ok = match (ty.base_name(), ty.args.as_slice()) {
        (_, []) if ty.is_unit() => value.is_null(),
        ("Value", []) => true,
        ("String" | "str", []) => value.is_string(),
        ("bool", []) => value.is_boolean(),
        ("f32" | "f64", []) => value.is_number(),
        ("i8" | "i16" | "i32" | "i64" | "i128" | "isize", []) => value.is_i64() || value.is_u64(),
        ("u8" | "u16" | "u32" | "u64" | "u128" | "usize", []) => value.is_u64(),
        ("Option", [inner]) => {
            return if value.is_null() {
                Ok(())
            } else {
                check_shape(value, inner)
            };
        }
        ("Vec" | "VecDeque" | "HashSet" | "BTreeSet", [inner]) => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch(value, ty))?;
            for (idx, item) in items.iter().enumerate() {
                check_shape(item, inner).with_context(|| format!("element {} of {}", idx, ty))?;
            }
            return Ok(());
        }
        ("HashMap" | "BTreeMap", [_, inner]) => {
            let entries = value
                .as_object()
                .ok_or_else(|| mismatch(value, ty))?;
            for (key, item) in entries {
                check_shape(item, inner).with_context(|| format!("entry `{}` of {}", key, ty))?;
            }
            return Ok(());
        }
        _ => value.is_object(),
    };

    if !ok {
        return Err(mismatch(value, ty));
    }
    Ok(())
}

fn mismatch(value: &Value, ty: &TypeExpr) -> anyhow::Error {
    anyhow!("expected {}, found {}", ty, json_kind(value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_synth_types::parse_type_expr;
    use serde_json::json;

    fn ty(raw: &str) -> TypeExpr {
        parse_type_expr(raw).unwrap()
    }

    #[test]
    fn test_shape_checks() {
        assert!(check_shape(&json!("x"), &ty("String")).is_ok());
        assert!(check_shape(&json!(7), &ty("i64")).is_ok());
        assert!(check_shape(&json!(-7), &ty("u32")).is_err());
        assert!(check_shape(&json!(1.5), &ty("f64")).is_ok());
        assert!(check_shape(&json!(1.5), &ty("i32")).is_err());
        assert!(check_shape(&json!(null), &ty("Option<Widget>")).is_ok());
        assert!(check_shape(&json!({"id": 1}), &ty("Option<Widget>")).is_ok());
        assert!(check_shape(&json!({"id": 1}), &ty("widgets::Widget")).is_ok());
        assert!(check_shape(&json!("w"), &ty("Widget")).is_err());
        assert!(check_shape(&json!([1, "x"]), &ty("serde_json::Value")).is_ok());
        assert!(check_shape(&json!({"a": [1, 2]}), &ty("HashMap<String, Vec<u8>>")).is_ok());
    }

    #[test]
    fn test_nested_mismatch_reports_element() {
        let err = check_shape(&json!([{"id": 1}, 2]), &ty("Vec<Widget>")).unwrap_err();
        let text = format!("{:#}", err);
        assert!(text.contains("element 1 of Vec<Widget>"), "{}", text);
        assert!(text.contains("expected Widget, found integer"), "{}", text);
    }

    #[test]
    fn test_deserialize_empty_body() {
        let codec = JsonCodec;
        assert_eq!(codec.deserialize(b"", &TypeExpr::unit()).unwrap(), Value::Null);
        assert_eq!(codec.deserialize(b" \n", &ty("Option<Widget>")).unwrap(), Value::Null);
        assert!(codec.deserialize(b"", &ty("Widget")).is_err());
        assert!(codec.deserialize(b"{not json", &ty("Widget")).is_err());
    }

    #[test]
    fn test_serialize_checks_before_encoding() {
        let codec = JsonCodec;
        let bytes = codec
            .serialize(&json!({"name": "gear"}), &ty("NewWidget"))
            .unwrap();
        assert_eq!(bytes, br#"{"name":"gear"}"#.to_vec());
        assert!(codec.serialize(&json!([1]), &ty("NewWidget")).is_err());
    }
}
