//! Query strings: construction from key/value pairs and
//! serialization.

use kstring::KString;

use crate::url_encoding::url_encode;

/// Ordered key/value pairs of a query string (or of route
/// parameters, before they are split into path and query parts).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryString(Vec<(KString, KString)>);

impl From<&QueryString> for String {
    fn from(q: &QueryString) -> Self {
        let mut s = String::new();
        let mut is_first = true;
        for (k, v) in &q.0 {
            if is_first {
                is_first = false;
            } else {
                s.push('&');
            }
            s.push_str(&url_encode(k));
            s.push('=');
            s.push_str(&url_encode(v));
        }
        s
    }
}

pub trait ToVecKeyVal {
    fn to_vec_key_val(self) -> Vec<(KString, KString)>;
}

impl<const N: usize> ToVecKeyVal for [(&str, &str); N] {
    fn to_vec_key_val(self) -> Vec<(KString, KString)> {
        self.into_iter().map(
            |(k, v)| (KString::from_ref(k), KString::from_ref(v))).collect()
    }
}

impl QueryString {
    pub fn new(keyvals: impl ToVecKeyVal) -> Self {
        Self(keyvals.to_vec_key_val())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KString, KString)> {
        self.0.iter()
    }

    /// Split off the entries whose key satisfies `pred`, keeping the
    /// rest in `self` (order is preserved in both).
    pub fn take_where(&mut self, pred: impl Fn(&str) -> bool) -> QueryString {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.0)
            .into_iter()
            .partition(|(k, _)| pred(k));
        self.0 = kept;
        QueryString(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_serialize() {
        let q = QueryString::new([("fun", "1"),
                                  ("Motörhead", "C'est bien ça & méchanique = plus!")]);
        assert_eq!(
            String::from(&q).as_str(),
            "fun=1&Mot%C3%B6rhead=C%27est%20bien%20%C3%A7a%20%26%20m%C3%A9chanique%20%3D%20plus%21");
    }

    #[test]
    fn t_take_where() {
        let mut q = QueryString::new([("id", "3"), ("page", "2"), ("slug", "x")]);
        let taken = q.take_where(|k| k == "id" || k == "slug");
        assert_eq!(taken, QueryString::new([("id", "3"), ("slug", "x")]));
        assert_eq!(q, QueryString::new([("page", "2")]));
    }
}
