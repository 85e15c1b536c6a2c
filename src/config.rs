//! Runtime configuration from the environment, and the JSON setup
//! file declaring components, routes, actions and views.

use std::{collections::HashMap, path::{Path, PathBuf}};

use anyhow::{Result, Context, anyhow};
use serde::Deserialize;

use crate::{builder::HtmlBuilder,
            component::FallbackPolicy,
            json::component_signature,
            urls::SiteUrls,
            util::{getenv, parse_bool},
            view::TemplateViews,
            warn::set_warnings};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `HTMLFRAG_ROOT_URL`, default `http://localhost`
    pub root_url: String,
    /// `HTMLFRAG_ASSET_URL`, assets are served from the root if unset
    pub asset_url: Option<String>,
    /// `HTMLFRAG_SECURE`, overrides the scheme of the root URL
    pub secure: Option<bool>,
    /// `HTMLFRAG_FALLBACK`, `empty` (default) or `absent`
    pub fallback: FallbackPolicy,
    /// `HTMLFRAG_WARN`, default on
    pub warnings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root_url: "http://localhost".into(),
            asset_url: None,
            secure: None,
            fallback: FallbackPolicy::default(),
            warnings: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(getenv)
    }

    /// Build from a variable lookup function (`getenv` or a table).
    pub fn from_vars(get: impl Fn(&str) -> Result<Option<String>>) -> Result<Self> {
        let default = Config::default();
        let bool_var = |name: &str| -> Result<Option<bool>> {
            get(name)?.map(|s| parse_bool(name, &s)).transpose()
        };
        Ok(Config {
            root_url: get("HTMLFRAG_ROOT_URL")?.unwrap_or(default.root_url),
            asset_url: get("HTMLFRAG_ASSET_URL")?.filter(|s| !s.is_empty()),
            secure: bool_var("HTMLFRAG_SECURE")?,
            fallback: match get("HTMLFRAG_FALLBACK")? {
                Some(s) => s.parse::<FallbackPolicy>().context("HTMLFRAG_FALLBACK")?,
                None => default.fallback,
            },
            warnings: bool_var("HTMLFRAG_WARN")?.unwrap_or(default.warnings),
        })
    }

    /// Switch warnings on or off process-wide.
    pub fn apply(&self) {
        set_warnings(self.warnings);
    }

    pub fn site_urls(&self) -> SiteUrls {
        let mut urls = SiteUrls::new(&self.root_url);
        if let Some(secure) = self.secure {
            urls = urls.with_default_secure(secure);
        }
        if let Some(asset_url) = &self.asset_url {
            urls = urls.with_asset_root(asset_url);
        }
        urls
    }
}


#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSetup {
    pub name: String,
    pub view: String,
    /// JSON signature: `[{"size": "m"}, "color"]`
    #[serde(default)]
    pub signature: serde_json::Value,
}

/// Contents of a setup file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Setup {
    #[serde(default)]
    pub components: Vec<ComponentSetup>,
    /// Route name -> pattern like `/users/{id}`
    #[serde(default)]
    pub routes: HashMap<String, String>,
    #[serde(default)]
    pub actions: HashMap<String, String>,
    /// View name -> template
    #[serde(default)]
    pub views: HashMap<String, String>,
    /// Directory with more `*.html` templates, relative to the setup
    /// file.
    #[serde(default)]
    pub views_dir: Option<PathBuf>,
}

impl Setup {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).with_context(
            || anyhow!("opening setup file for reading: {:?}", path))?;
        let mut setup: Setup = serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| anyhow!("parsing setup file {:?}", path))?;
        if let (Some(dir), Some(base)) = (&setup.views_dir, path.parent()) {
            setup.views_dir = Some(base.join(dir));
        }
        Ok(setup)
    }

    /// A builder with the URL tables, views and components of this
    /// setup on top of `config`.
    pub fn builder(&self, config: &Config) -> Result<HtmlBuilder> {
        let mut urls = config.site_urls();
        for (name, pattern) in &self.routes {
            urls.add_route(name, pattern);
        }
        for (name, pattern) in &self.actions {
            urls.add_action(name, pattern);
        }

        let mut views = TemplateViews::new();
        if let Some(dir) = &self.views_dir {
            views.load_dir(dir)?;
        }
        for (name, template) in &self.views {
            views.add(name, template)?;
        }

        let mut builder = HtmlBuilder::new(urls, views)
            .with_fallback_policy(config.fallback);
        for c in &self.components {
            let signature = component_signature(&c.signature).with_context(
                || anyhow!("component {:?}", c.name))?;
            builder.component(c.name.as_str(), c.view.as_str(), signature);
        }
        Ok(builder)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auri::QueryString, urls::UrlResolver, value::Value};

    fn vars(kvs: &[(&str, &str)]) -> impl Fn(&str) -> Result<Option<String>> {
        let table: HashMap<String, String> =
            kvs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| Ok(table.get(name).cloned())
    }

    #[test]
    fn t_config_defaults() {
        let c = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn t_config_vars() {
        let c = Config::from_vars(vars(&[
            ("HTMLFRAG_ROOT_URL", "https://example.com"),
            ("HTMLFRAG_ASSET_URL", "https://cdn.example.com"),
            ("HTMLFRAG_FALLBACK", "absent"),
            ("HTMLFRAG_WARN", "off"),
        ])).unwrap();
        assert_eq!(c.fallback, FallbackPolicy::OnAbsent);
        assert!(!c.warnings);
        assert_eq!(c.secure, None);
        let urls = c.site_urls();
        assert_eq!(urls.to("a", &[], None).unwrap().as_str(), "https://example.com/a");
        assert_eq!(urls.asset("a.css", None).unwrap().as_str(), "https://cdn.example.com/a.css");
    }

    #[test]
    fn t_config_invalid() {
        assert!(Config::from_vars(vars(&[("HTMLFRAG_FALLBACK", "falsy")])).is_err());
        assert!(Config::from_vars(vars(&[("HTMLFRAG_SECURE", "maybe")])).is_err());
    }

    #[test]
    fn t_setup_builder() {
        let setup: Setup = serde_json::from_str(r#"{
            "components": [
                {"name": "badge", "view": "badge", "signature": [{"size": "m"}, "color"]}
            ],
            "routes": {"profile": "/users/{id}"},
            "views": {"badge": "<span class=\"badge-{{ size }}\">{{ color }}</span>"}
        }"#).unwrap();
        let b = setup.builder(&Config::default()).unwrap();
        assert!(b.has_component("badge"));
        assert_eq!(b.render_component("badge", &[Value::from("l"), Value::from("red")]).unwrap(),
                   "<span class=\"badge-l\">red</span>");
        assert_eq!(b.urls().route("profile", &QueryString::new([("id", "1")]))
                   .unwrap().as_str(),
                   "http://localhost/users/1");
    }

    #[test]
    fn t_setup_errors() {
        assert!(serde_json::from_str::<Setup>(r#"{"compnents": []}"#).is_err());
        let setup: Setup = serde_json::from_str(
            r#"{"components": [{"name": "x", "view": "x", "signature": [1]}]}"#).unwrap();
        assert!(setup.builder(&Config::default()).is_err());
        assert!(Setup::load(Path::new("/nonexistent/htmlfrag/setup.json")).is_err());
    }
}
