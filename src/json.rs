//! Conversion of JSON input (as read by the command line tool and
//! `Setup`) into the typed inputs of the renderers.
//!
//! Object keys that are canonical integers become positional keys,
//! so `{"0": "required", "id": "x"}` and `["required"]` mean the same
//! positional entry. Object key order is preserved.

use anyhow::{Result, anyhow, bail};
use kstring::KString;
use serde_json::Value as JValue;

use crate::{attributes::{AttrValue, AttributeMap, Key},
            component::{ComponentSignature, ParamDescriptor},
            listing::{Descriptions, ListInput, ListItem}};

fn scalar_string(v: &JValue) -> Option<KString> {
    match v {
        JValue::String(s) => Some(KString::from_ref(s)),
        JValue::Number(n) => Some(KString::from_string(n.to_string())),
        JValue::Bool(b) => Some(KString::from_static(if *b { "1" } else { "" })),
        _ => None,
    }
}

fn type_name(v: &JValue) -> &'static str {
    match v {
        JValue::Null => "null",
        JValue::Bool(_) => "boolean",
        JValue::Number(_) => "number",
        JValue::String(_) => "string",
        JValue::Array(_) => "array",
        JValue::Object(_) => "object",
    }
}

fn list_item(v: &JValue) -> Result<ListItem> {
    match v {
        JValue::Array(_) | JValue::Object(_) => Ok(ListItem::Nested(list_input(v)?)),
        _ => scalar_string(v)
            .map(ListItem::Leaf)
            .ok_or_else(|| anyhow!("list item: expecting string, number or list, got {}",
                                   type_name(v))),
    }
}

/// An array (a plain sequence) or an object (labeled items).
pub fn list_input(v: &JValue) -> Result<ListInput> {
    match v {
        JValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| Ok((Key::Positional(i), list_item(item)?)))
            .collect(),
        JValue::Object(entries) => entries
            .iter()
            .map(|(k, item)| Ok((Key::parse(k),
                                 list_item(item).map_err(|e| e.context(format!("key {k:?}")))?)))
            .collect(),
        _ => bail!("list: expecting array or object, got {}", type_name(v)),
    }
}

fn attr_value(v: &JValue) -> Result<AttrValue> {
    match v {
        JValue::Null => Ok(AttrValue::Null),
        JValue::Bool(b) => Ok(AttrValue::Bool(*b)),
        JValue::Array(items) => items
            .iter()
            .map(|item| scalar_string(item).ok_or_else(
                || anyhow!("attribute token list: expecting scalars, got {}",
                           type_name(item))))
            .collect::<Result<Vec<_>>>()
            .map(AttrValue::List),
        JValue::Object(_) => bail!("attribute value: objects are not allowed"),
        _ => Ok(AttrValue::Str(scalar_string(v).ok_or_else(
            || anyhow!("bug: scalar expected"))?)),
    }
}

/// An object of attributes, or an array of positional tokens. `null`
/// gives the empty map.
pub fn attribute_map(v: &JValue) -> Result<AttributeMap> {
    match v {
        JValue::Null => Ok(AttributeMap::new()),
        JValue::Object(entries) => {
            let mut attrs = AttributeMap::new();
            for (k, val) in entries {
                let val = attr_value(val).map_err(|e| e.context(format!("attribute {k:?}")))?;
                attrs.set(Key::parse(k), val);
            }
            Ok(attrs)
        }
        JValue::Array(items) => {
            let mut attrs = AttributeMap::new();
            for item in items {
                attrs.push_token(attr_value(item)?);
            }
            Ok(attrs)
        }
        _ => bail!("attributes: expecting object or array, got {}", type_name(v)),
    }
}

/// `{"term": "description" | ["description", ...], ...}`
pub fn description_list(v: &JValue) -> Result<Vec<(KString, Descriptions)>> {
    let entries = v.as_object().ok_or_else(
        || anyhow!("description list: expecting object, got {}", type_name(v)))?;
    entries
        .iter()
        .map(|(term, d)| {
            let descriptions = match d {
                JValue::Array(items) => Descriptions::Many(
                    items.iter()
                        .map(|item| scalar_string(item).ok_or_else(
                            || anyhow!("term {term:?}: expecting scalar descriptions")))
                        .collect::<Result<_>>()?),
                _ => Descriptions::One(scalar_string(d).ok_or_else(
                    || anyhow!("term {term:?}: expecting string or array, got {}",
                               type_name(d)))?),
            };
            Ok((KString::from_ref(term), descriptions))
        })
        .collect()
}

pub fn value(v: &JValue) -> crate::value::Value {
    use crate::value::Value;
    match v {
        JValue::Null => Value::Null,
        JValue::Bool(b) => Value::Bool(*b),
        JValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JValue::String(s) => Value::Str(KString::from_ref(s)),
        JValue::Array(items) => Value::List(items.iter().map(value).collect()),
        JValue::Object(entries) => Value::Map(
            entries.iter().map(|(k, v)| (KString::from_ref(k), value(v))).collect()),
    }
}

/// Positional component arguments: an array, or a single value.
pub fn arguments(v: &JValue) -> Vec<crate::value::Value> {
    match v {
        JValue::Array(items) => items.iter().map(value).collect(),
        JValue::Null => Vec::new(),
        _ => vec![value(v)],
    }
}

/// `"name"` (no default) or `{"name": default}`.
pub fn param_descriptor(v: &JValue) -> Result<ParamDescriptor> {
    match v {
        JValue::String(name) => Ok(ParamDescriptor::bare(name.as_str())),
        JValue::Object(entries) if entries.len() == 1 => {
            let (name, default) = entries.iter().next().ok_or_else(
                || anyhow!("bug: object of length 1 is empty"))?;
            Ok(ParamDescriptor::with_default(name.as_str(), value(default)))
        }
        _ => bail!("parameter: expecting a name or an object with a single key, got {}",
                   if v.is_object() { "object with several keys" } else { type_name(v) }),
    }
}

pub fn component_signature(v: &JValue) -> Result<ComponentSignature> {
    match v {
        JValue::Null => Ok(ComponentSignature::default()),
        JValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| param_descriptor(item).map_err(
                |e| e.context(format!("signature item {i}"))))
            .collect(),
        _ => bail!("signature: expecting array, got {}", type_name(v)),
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{entities::HtmlEntities,
                listing::{render_list, ListTag},
                value::Value};

    #[test]
    fn t_list_input() {
        let l = list_input(&json!(["a", 1, ["x", "y"]])).unwrap();
        assert_eq!(render_list(ListTag::Ul, &l, &AttributeMap::new(), &HtmlEntities),
                   "<ul><li>a</li><li>1</li><ul><li>x</li><li>y</li></ul></ul>");
        let l = list_input(&json!({"Fruits": ["apple", "pear"], "Veg": "leek"})).unwrap();
        assert_eq!(render_list(ListTag::Ol, &l, &AttributeMap::new(), &HtmlEntities),
                   "<ol><li>Fruits<ol><li>apple</li><li>pear</li></ol></li><li>leek</li></ol>");
        assert!(list_input(&json!("a")).is_err());
        assert!(list_input(&json!([null])).is_err());
    }

    #[test]
    fn t_attribute_map() {
        let a = attribute_map(&json!({"id": "x", "0": "required", "hidden": null,
                                      "class": ["a", "b"], "disabled": true,
                                      "tabindex": 3})).unwrap();
        assert_eq!(a.serialize(&HtmlEntities),
                   " id=\"x\" required class=\"a b\" disabled tabindex=\"3\"");
        let a = attribute_map(&json!(["required", "novalidate"])).unwrap();
        assert_eq!(a.serialize(&HtmlEntities), " required novalidate");
        assert!(attribute_map(&json!(null)).unwrap().is_empty());
        assert!(attribute_map(&json!({"x": {"y": 1}})).is_err());
        assert!(attribute_map(&json!("id")).is_err());
    }

    #[test]
    fn t_description_list() {
        let d = description_list(&json!({"a": "1", "b": ["2", "3"]})).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d[1].1.as_slice().len(), 2);
        assert!(description_list(&json!(["a"])).is_err());
        assert!(description_list(&json!({"a": {"b": "c"}})).is_err());
    }

    #[test]
    fn t_values() {
        assert_eq!(value(&json!(null)), Value::Null);
        assert_eq!(value(&json!(3)), Value::Int(3));
        assert_eq!(value(&json!(1.5)), Value::Float(1.5));
        assert_eq!(value(&json!([true, "x"])),
                   Value::List(vec![Value::Bool(true), Value::from("x")]));
        assert_eq!(arguments(&json!("l")), vec![Value::from("l")]);
        assert!(arguments(&json!(null)).is_empty());
    }

    #[test]
    fn t_signature() {
        let sig = component_signature(&json!([{"size": "m"}, "color"])).unwrap();
        assert_eq!(sig, ComponentSignature::from([
            ParamDescriptor::with_default("size", "m"),
            ParamDescriptor::bare("color"),
        ]));
        assert!(component_signature(&json!([{"a": 1, "b": 2}])).is_err());
        assert!(component_signature(&json!([3])).is_err());
        assert_eq!(component_signature(&json!(null)).unwrap(), ComponentSignature::default());
    }
}
