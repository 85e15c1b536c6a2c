//! Attribute maps and their serialization into the attribute part of
//! a start tag.

use std::fmt::{self, Display};

use itertools::Itertools;
use kstring::KString;

use crate::{entities::EntityCodec, myfrom::MyFrom};

/// Key of an attribute map or list entry: either a position in
/// sequence order or an explicit name/label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Positional(usize),
    Named(KString),
}

impl Key {
    /// Canonical decimal integers ("0", "17", but not "017" or "+1")
    /// are taken as positions, everything else as a name.
    pub fn parse(s: &str) -> Key {
        let is_canonical_int = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s == "0" || !s.starts_with('0'));
        if is_canonical_int {
            if let Ok(i) = s.parse() {
                return Key::Positional(i);
            }
        }
        Key::Named(KString::from_ref(s))
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Key::Positional(_))
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Positional(i) => write!(f, "{i}"),
            Key::Named(s) => f.write_str(s),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Positional(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Named(KString::from_ref(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Named(KString::from_string(s))
    }
}

impl From<KString> for Key {
    fn from(s: KString) -> Self {
        Key::Named(s)
    }
}

impl From<&KString> for Key {
    fn from(s: &KString) -> Self {
        Key::Named(s.clone())
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Suppresses the attribute.
    Null,
    /// HTML boolean attribute (`disabled`), present iff true.
    Bool(bool),
    Str(KString),
    /// Space separated tokens, e.g. for `class`.
    List(Vec<KString>),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(KString::myfrom(s))
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(KString::myfrom(s))
    }
}

impl From<KString> for AttrValue {
    fn from(s: KString) -> Self {
        AttrValue::Str(s)
    }
}

impl From<&KString> for AttrValue {
    fn from(s: &KString) -> Self {
        AttrValue::Str(s.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Str(KString::myfrom(i))
    }
}

impl From<usize> for AttrValue {
    fn from(i: usize) -> Self {
        AttrValue::Str(KString::myfrom(i))
    }
}

impl From<Vec<KString>> for AttrValue {
    fn from(v: Vec<KString>) -> Self {
        AttrValue::List(v)
    }
}

impl<const N: usize> From<[&str; N]> for AttrValue {
    fn from(v: [&str; N]) -> Self {
        AttrValue::List(v.into_iter().map(KString::myfrom).collect())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(AttrValue::Null, Into::into)
    }
}


/// Ordered attribute map. Never holds a key twice: setting an
/// existing key replaces its value at the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap(Vec<(Key, AttrValue)>);

impl AttributeMap {
    pub fn new() -> Self {
        AttributeMap(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, AttrValue)> {
        self.0.iter()
    }

    pub fn get(&self, key: &Key) -> Option<&AttrValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn with(mut self, key: impl Into<Key>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    fn next_position(&self) -> usize {
        self.0
            .iter()
            .filter_map(|(k, _)| match k {
                Key::Positional(i) => Some(i + 1),
                Key::Named(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Append a positional entry, e.g. a boolean attribute token.
    pub fn push_token(&mut self, value: impl Into<AttrValue>) {
        let i = self.next_position();
        self.0.push((Key::Positional(i), value.into()));
    }

    pub fn with_token(mut self, value: impl Into<AttrValue>) -> Self {
        self.push_token(value);
        self
    }

    /// Array-merge: named entries of `self` override those in
    /// `defaults` (keeping the position in `defaults`), positional
    /// entries of both are renumbered and appended in order.
    pub fn merged_over(self, defaults: AttributeMap) -> AttributeMap {
        let mut out = AttributeMap::new();
        for (key, value) in defaults.0.into_iter().chain(self.0) {
            if key.is_positional() {
                out.push_token(value)
            } else {
                out.set(key, value)
            }
        }
        out
    }

    /// Serialize to `' k1="v1" token k2="v2"'`, or the empty string if
    /// nothing is to be printed.
    pub fn serialize(&self, codec: &dyn EntityCodec) -> String {
        let html = self
            .0
            .iter()
            .filter_map(|(key, value)| attribute_element(key, value, codec))
            .join(" ");
        if html.is_empty() {
            html
        } else {
            format!(" {html}")
        }
    }
}

fn attribute_element(key: &Key, value: &AttrValue, codec: &dyn EntityCodec) -> Option<String> {
    match key {
        Key::Positional(_) => match value {
            AttrValue::Str(s) => Some(s.to_string()),
            AttrValue::List(items) => Some(items.iter().join(" ")),
            AttrValue::Null | AttrValue::Bool(_) => None,
        },
        Key::Named(name) => match value {
            AttrValue::Null => None,
            AttrValue::Bool(b) if name.as_str() == "value" => {
                Some(format!("{name}=\"{}\"", if *b { "1" } else { "" }))
            }
            AttrValue::Bool(true) => Some(name.to_string()),
            AttrValue::Bool(false) => None,
            AttrValue::Str(s) => Some(format!("{name}=\"{}\"", codec.encode(s))),
            AttrValue::List(items) => Some(format!(
                "{name}=\"{}\"",
                items.iter().map(|item| codec.encode(item)).join(" ")
            )),
        },
    }
}

/// Free-standing variant of `AttributeMap::serialize`.
pub fn serialize(attrs: &AttributeMap, codec: &dyn EntityCodec) -> String {
    attrs.serialize(codec)
}

impl FromIterator<(Key, AttrValue)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (Key, AttrValue)>>(iter: I) -> Self {
        let mut m = AttributeMap::new();
        for (k, v) in iter {
            m.set(k, v);
        }
        m
    }
}

// Same for values returned by `att`, `opt_att` and `flag`:
impl<const N: usize> From<[Option<(Key, AttrValue)>; N]> for AttributeMap {
    fn from(entries: [Option<(Key, AttrValue)>; N]) -> Self {
        let mut m = AttributeMap::new();
        for (k, v) in entries.into_iter().flatten() {
            match k {
                Key::Positional(_) => m.push_token(v),
                Key::Named(_) => m.set(k, v),
            }
        }
        m
    }
}


fn ks<T>(s: T) -> KString
where KString: MyFrom<T>
{
    KString::myfrom(s)
}

pub fn att<T, U>(key: T, val: U) -> Option<(Key, AttrValue)>
    where KString: MyFrom<T> + MyFrom<U>
{
    Some((Key::Named(ks(key)), AttrValue::Str(ks(val))))
}

pub fn opt_att<T, U>(key: T, val: Option<U>) -> Option<(Key, AttrValue)>
    where KString: MyFrom<T> + MyFrom<U>
{
    val.map(|val| (Key::Named(ks(key)), AttrValue::Str(ks(val))))
}

/// A boolean attribute given in token form (`required`).
pub fn flag<T>(token: T) -> Option<(Key, AttrValue)>
    where KString: MyFrom<T>
{
    // the position is reassigned when collected
    Some((Key::Positional(0), AttrValue::Str(ks(token))))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::HtmlEntities;

    fn t(attrs: &AttributeMap) -> String {
        attrs.serialize(&HtmlEntities)
    }

    #[test]
    fn t_key_parse() {
        assert_eq!(Key::parse("0"), Key::Positional(0));
        assert_eq!(Key::parse("12"), Key::Positional(12));
        assert_eq!(Key::parse("012"), Key::from("012"));
        assert_eq!(Key::parse("+1"), Key::from("+1"));
        assert_eq!(Key::parse(""), Key::from(""));
        assert_eq!(Key::parse("id"), Key::from("id"));
    }

    #[test]
    fn t_empty_and_null() {
        assert_eq!(t(&AttributeMap::new()), "");
        assert_eq!(t(&AttributeMap::new().with("id", AttrValue::Null)), "");
        assert_eq!(t(&AttributeMap::new().with("id", None::<&str>)), "");
    }

    #[test]
    fn t_named() {
        assert_eq!(t(&AttributeMap::new().with("id", "x")), " id=\"x\"");
        assert_eq!(
            t(&AttributeMap::new().with("id", "x").with("class", "a b")),
            " id=\"x\" class=\"a b\"");
        assert_eq!(t(&AttributeMap::new().with("tabindex", 3i64)), " tabindex=\"3\"");
    }

    #[test]
    fn t_positional() {
        assert_eq!(t(&AttributeMap::new().with(0usize, "required")), " required");
        assert_eq!(
            t(&AttributeMap::new().with("type", "text").with_token("required").with_token("disabled")),
            " type=\"text\" required disabled");
        assert_eq!(t(&AttributeMap::new().with(0usize, AttrValue::Null)), "");
    }

    #[test]
    fn t_booleans() {
        assert_eq!(t(&AttributeMap::new().with("checked", true)), " checked");
        assert_eq!(t(&AttributeMap::new().with("checked", false)), "");
        assert_eq!(t(&AttributeMap::new().with("checked", false).with("id", "a")), " id=\"a\"");
        assert_eq!(t(&AttributeMap::new().with("value", true)), " value=\"1\"");
        assert_eq!(t(&AttributeMap::new().with("value", false)), " value=\"\"");
    }

    #[test]
    fn t_list_values() {
        assert_eq!(t(&AttributeMap::new().with("class", ["btn", "btn-<x>"])),
                   " class=\"btn btn-&lt;x&gt;\"");
    }

    #[test]
    fn t_escaping() {
        let s = t(&AttributeMap::new().with("title", "<a>&\""));
        assert_eq!(s, " title=\"&lt;a&gt;&amp;&quot;\"");
        let inner = &s[" title=\"".len()..s.len() - 1];
        assert!(!inner.contains(['<', '>', '"']));
        assert!(!inner.replace("&amp;", "").replace("&lt;", "")
                .replace("&gt;", "").replace("&quot;", "").contains('&'));
        assert_eq!(t(&AttributeMap::new().with("alt", "it's")), " alt=\"it&#39;s\"");
        assert_eq!(t(&AttributeMap::new().with("title", "AT&T; R&D;")),
                   " title=\"AT&amp;T; R&amp;D;\"");
    }

    #[test]
    fn t_duplicate_keys_replace_in_place() {
        let m = AttributeMap::new().with("id", "a").with("class", "c").with("id", "b");
        assert_eq!(m.len(), 2);
        assert_eq!(t(&m), " id=\"b\" class=\"c\"");
    }

    #[test]
    fn t_idempotent() {
        let m = AttributeMap::new().with("id", "x").with_token("hidden").with("title", "a&b");
        assert_eq!(t(&m), t(&m));
    }

    #[test]
    fn t_att_arrays() {
        let maybe: Option<&str> = None;
        let m = AttributeMap::from([att("href", "/x"), opt_att("title", maybe), flag("download")]);
        assert_eq!(t(&m), " href=\"/x\" download");
        assert_eq!(m.get(&Key::Positional(0)), Some(&AttrValue::from("download")));
    }

    #[test]
    fn t_merged_over() {
        let defaults = AttributeMap::new()
            .with("media", "all")
            .with("type", "text/css")
            .with("rel", "stylesheet");
        let m = AttributeMap::new().with("media", "print").with_token("async").with("id", "s");
        assert_eq!(t(&m.merged_over(defaults)),
                   " media=\"print\" type=\"text/css\" rel=\"stylesheet\" async id=\"s\"");

        let d = AttributeMap::new().with_token("a").with_token("b");
        let m = AttributeMap::new().with(0usize, "c");
        let merged = m.merged_over(d);
        assert_eq!(merged.get(&Key::Positional(2)), Some(&AttrValue::from("c")));
        assert_eq!(t(&merged), " a b c");
    }
}
