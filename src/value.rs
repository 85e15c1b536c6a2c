//! Dynamic values passed to components and macros.

use std::fmt::{self, Display};

use itertools::Itertools;
use kstring::KString;

use crate::{html_string::HtmlString, myfrom::MyFrom};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(KString),
    /// Markup; views insert it raw with `{{{name}}}`.
    Html(HtmlString),
    List(Vec<Value>),
    Map(Vec<(KString, Value)>),
}

impl Value {
    /// Whether the value counts as "not given" when binding component
    /// arguments with `FallbackPolicy::OnEmpty`.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Str(s) => s.is_empty() || s.as_str() == "0",
            Value::Html(h) => h.is_empty(),
            Value::List(vs) => vs.is_empty(),
            Value::Map(kvs) => kvs.is_empty(),
        }
    }
}

/// Plain text form (e.g. for macros formatting their arguments):
/// null is empty, booleans are "1" / "", lists are joined with ", ".
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => f.write_str(if *b { "1" } else { "" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Html(h) => f.write_str(h.as_str()),
            Value::List(vs) => write!(f, "{}", vs.iter().join(", ")),
            Value::Map(kvs) => write!(f, "{}", kvs.iter().map(|(_, v)| v).join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(KString::myfrom(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(KString::myfrom(s))
    }
}

impl From<KString> for Value {
    fn from(s: KString) -> Self {
        Value::Str(s)
    }
}

impl From<HtmlString> for Value {
    fn from(h: HtmlString) -> Self {
        Value::Html(h)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vs: Vec<T>) -> Self {
        Value::List(vs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_is_empty() {
        for v in [Value::Null, Value::Bool(false), Value::Int(0), Value::Float(0.0),
                  Value::from(""), Value::from("0"), Value::List(vec![]), Value::Map(vec![]),
                  Value::Html(HtmlString::empty())] {
            assert!(v.is_empty(), "{v:?}");
        }
        for v in [Value::Bool(true), Value::Int(-1), Value::Float(0.5),
                  Value::from(" "), Value::from("00"), Value::from("false"),
                  Value::from(vec![Value::Null])] {
            assert!(!v.is_empty(), "{v:?}");
        }
    }

    #[test]
    fn t_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a, b");
    }
}
