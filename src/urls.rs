//! Building URLs for `href`/`src` attributes.

use std::collections::HashMap;

use kstring::KString;

use crate::{auri::QueryString,
            error::UrlError,
            url_encoding::url_encode};

/// Resolves paths, assets, named routes and controller actions to
/// URLs. `secure` of `None` means the resolver's default scheme.
pub trait UrlResolver {
    fn asset(&self, path: &str, secure: Option<bool>) -> Result<KString, UrlError>;
    fn to(&self, path: &str, extra: &[KString], secure: Option<bool>)
          -> Result<KString, UrlError>;
    fn route(&self, name: &str, params: &QueryString) -> Result<KString, UrlError>;
    fn action(&self, name: &str, params: &QueryString) -> Result<KString, UrlError>;
}

/// Strings that are used as they are instead of being resolved
/// relative to the site root.
pub fn is_valid_url(path: &str) -> bool {
    ["#", "//", "mailto:", "tel:", "sms:", "http://", "https://"]
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// URL resolution for a single site: a root URL, an optional separate
/// root for assets, and tables of route and action patterns like
/// `/users/{id}/posts/{post?}`.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    /// Without scheme and trailing slash, e.g. "example.com/app".
    host_and_base: KString,
    default_secure: bool,
    asset_root: Option<KString>,
    routes: HashMap<KString, KString>,
    actions: HashMap<KString, KString>,
}

fn strip_scheme(url: &str) -> (&str, Option<bool>) {
    if let Some(rest) = url.strip_prefix("https://") {
        (rest, Some(true))
    } else if let Some(rest) = url.strip_prefix("http://") {
        (rest, Some(false))
    } else {
        (url, None)
    }
}

impl SiteUrls {
    /// `root` may carry a scheme ("https://example.com"), which then
    /// sets the default for `secure`; without one, http is assumed.
    pub fn new(root: &str) -> Self {
        let (rest, secure) = strip_scheme(root.trim_end_matches('/'));
        SiteUrls {
            host_and_base: KString::from_ref(rest),
            default_secure: secure.unwrap_or(false),
            asset_root: None,
            routes: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    pub fn with_default_secure(mut self, secure: bool) -> Self {
        self.default_secure = secure;
        self
    }

    /// Assets are served from `root` (e.g. a CDN) regardless of the
    /// `secure` argument.
    pub fn with_asset_root(mut self, root: &str) -> Self {
        self.asset_root = Some(KString::from_ref(root.trim_end_matches('/')));
        self
    }

    pub fn add_route(&mut self, name: &str, pattern: &str) {
        self.routes.insert(KString::from_ref(name), KString::from_ref(pattern));
    }

    pub fn add_action(&mut self, name: &str, pattern: &str) {
        self.actions.insert(KString::from_ref(name), KString::from_ref(pattern));
    }

    pub fn with_route(mut self, name: &str, pattern: &str) -> Self {
        self.add_route(name, pattern);
        self
    }

    pub fn with_action(mut self, name: &str, pattern: &str) -> Self {
        self.add_action(name, pattern);
        self
    }

    fn root(&self, secure: Option<bool>) -> String {
        let scheme = if secure.unwrap_or(self.default_secure) {
            "https://"
        } else {
            "http://"
        };
        format!("{scheme}{}", self.host_and_base)
    }

    fn join(root: &str, path: &str) -> KString {
        let path = path.trim_matches('/');
        if path.is_empty() {
            KString::from_ref(root)
        } else {
            KString::from_string(format!("{root}/{path}"))
        }
    }

    /// Fill `{name}` and `{name?}` placeholders of `pattern` from
    /// `params`; leftover params become the query string.
    fn fill(&self, label: &str, pattern: &str, params: &QueryString)
            -> Result<KString, UrlError>
    {
        let mut rest_params = params.clone();
        let mut path = String::new();
        let mut rest = pattern;
        while let Some(open) = rest.find('{') {
            let Some(close_rel) = rest[open..].find('}') else {
                break;
            };
            let close = open + close_rel;
            path.push_str(&rest[..open]);
            let inner = &rest[open + 1..close];
            let (name, optional) = match inner.strip_suffix('?') {
                Some(name) => (name, true),
                None => (inner, false),
            };
            let taken = rest_params.take_where(|k| k == name);
            match taken.iter().next() {
                Some((_, v)) if !v.is_empty() => path.push_str(&url_encode(v)),
                // an empty value would drop the segment
                _ if !optional => {
                    return Err(UrlError::MissingParameter {
                        route: KString::from_ref(label),
                        param: KString::from_ref(name),
                    });
                }
                _ => (),
            }
            rest = &rest[close + 1..];
        }
        path.push_str(rest);
        // drop the slashes left over by missing optional parameters
        let path = path.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("/");

        let url = Self::join(&self.root(None), &path);
        if rest_params.is_empty() {
            Ok(url)
        } else {
            Ok(KString::from_string(format!("{url}?{}", String::from(&rest_params))))
        }
    }
}

impl UrlResolver for SiteUrls {
    fn asset(&self, path: &str, secure: Option<bool>) -> Result<KString, UrlError> {
        if is_valid_url(path) {
            return Ok(KString::from_ref(path));
        }
        let root = match &self.asset_root {
            Some(root) => root.to_string(),
            None => self.root(secure),
        };
        Ok(Self::join(&root, path))
    }

    fn to(&self, path: &str, extra: &[KString], secure: Option<bool>)
          -> Result<KString, UrlError>
    {
        if is_valid_url(path) {
            return Ok(KString::from_ref(path));
        }
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let mut full = path.trim_matches('/').to_string();
        for segment in extra {
            full.push('/');
            full.push_str(&url_encode(segment));
        }
        let url = Self::join(&self.root(secure), &full);
        Ok(match query {
            Some(q) => KString::from_string(format!("{url}?{q}")),
            None => url,
        })
    }

    fn route(&self, name: &str, params: &QueryString) -> Result<KString, UrlError> {
        let pattern = self.routes.get(name).ok_or_else(
            || UrlError::RouteNotDefined(KString::from_ref(name)))?;
        self.fill(name, pattern, params)
    }

    fn action(&self, name: &str, params: &QueryString) -> Result<KString, UrlError> {
        let pattern = self.actions.get(name).ok_or_else(
            || UrlError::ActionNotDefined(KString::from_ref(name)))?;
        self.fill(name, pattern, params)
    }
}
