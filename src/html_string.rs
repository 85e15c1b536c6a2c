//! Serialized HTML fragments.

use std::fmt::{self, Display};

use kstring::KString;

/// A piece of already serialized HTML. Never escaped again when used as
/// element content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HtmlString(KString);

impl HtmlString {
    /// Wrap `s` as-is. The caller promises that `s` is valid markup.
    pub fn from_markup(s: impl Into<KString>) -> Self {
        HtmlString(s.into())
    }

    pub fn from_string(s: String) -> Self {
        HtmlString(KString::from_string(s))
    }

    pub fn empty() -> Self {
        HtmlString(KString::from_static(""))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline(always)]
    pub fn as_kstring(&self) -> &KString {
        &self.0
    }

    pub fn into_kstring(self) -> KString {
        self.0
    }

    pub fn into_string(self) -> String {
        self.0.as_str().to_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for HtmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HtmlString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for HtmlString {
    fn from(s: String) -> Self {
        HtmlString::from_string(s)
    }
}

impl PartialEq<str> for HtmlString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for HtmlString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
