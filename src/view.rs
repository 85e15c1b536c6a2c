//! Rendering of named views with bound component data.

use std::path::Path;

use anyhow::{Result, anyhow};
use handlebars::Handlebars;
use serde_json::{Map, Number, Value as JValue};

use crate::{component::ComponentData,
            entities::{EntityCodec, HtmlEntities},
            html_string::HtmlString,
            util::read_file,
            value::Value};

pub trait ViewRenderer {
    fn render(&self, view: &str, data: &ComponentData) -> Result<HtmlString>;
}

/// Handlebars templates by view name. `{{x}}` is entity encoded,
/// `{{{x}}}` is inserted raw. Absent parameters are left out of the
/// context, so `{{#if x}}` tells them apart from given values.
pub struct TemplateViews {
    registry: Handlebars<'static>,
}

impl Default for TemplateViews {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateViews {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(|s| HtmlEntities.encode(s));
        TemplateViews { registry }
    }

    pub fn add(&mut self, name: &str, template: &str) -> Result<()> {
        self.registry.register_template_string(name, template)
            .map_err(|e| anyhow!("view {:?}: {}", name, e))
    }

    pub fn with_view(mut self, name: &str, template: &str) -> Result<Self> {
        self.add(name, template)?;
        Ok(self)
    }

    pub fn has(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Load all `*.html` files in `dir`; the view name is the file
    /// name without the extension.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut n = 0;
        let entries = std::fs::read_dir(dir).map_err(
            |e| anyhow!("can't open directory for reading: {:?}: {}", dir, e))?;
        for entry in entries {
            let path = entry.map_err(
                |e| anyhow!("reading directory: {:?}: {}", dir, e))?.path();
            if path.extension().map_or(true, |ext| ext != "html") {
                continue;
            }
            let name = path.file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| anyhow!("cannot decode file name {:?}", path))?
                .to_string();
            let template = read_file(&path)?;
            self.add(&name, &template)?;
            n += 1;
        }
        Ok(n)
    }
}

fn json_value(v: &Value) -> JValue {
    match v {
        Value::Null => JValue::Null,
        Value::Bool(b) => JValue::Bool(*b),
        Value::Int(i) => JValue::from(*i),
        Value::Float(x) => Number::from_f64(*x).map_or(JValue::Null, JValue::Number),
        Value::Str(s) => JValue::String(s.to_string()),
        Value::Html(h) => JValue::String(h.as_str().to_string()),
        Value::List(vs) => JValue::Array(vs.iter().map(json_value).collect()),
        Value::Map(kvs) => JValue::Object(
            kvs.iter().map(|(k, v)| (k.to_string(), json_value(v))).collect()),
    }
}

/// The template context for `data`: an object of the bound
/// parameters, without the absent ones.
pub fn template_context(data: &ComponentData) -> JValue {
    let mut m = Map::new();
    for (name, value) in data.iter() {
        if let Some(value) = value {
            m.insert(name.to_string(), json_value(value));
        }
    }
    JValue::Object(m)
}

impl ViewRenderer for TemplateViews {
    fn render(&self, view: &str, data: &ComponentData) -> Result<HtmlString> {
        if !self.has(view) {
            return Err(anyhow!("view {:?} not found", view));
        }
        let html = self.registry.render(view, &template_context(data))?;
        Ok(HtmlString::from_string(html))
    }
}


#[cfg(test)]
mod tests {
    use kstring::KString;
    use serde_json::json;

    use super::*;

    fn data() -> ComponentData {
        let mut d = ComponentData::new();
        d.insert(KString::from_static("title"), Some(Value::from("<Hi>")));
        d.insert(KString::from_static("count"), Some(Value::Int(3)));
        d.insert(KString::from_static("body"),
                 Some(Value::Html(HtmlString::from_markup("<b>x</b>"))));
        d.insert(KString::from_static("missing"), None);
        d
    }

    fn t(template: &str) -> String {
        let views = TemplateViews::new().with_view("v", template).unwrap();
        views.render("v", &data()).unwrap().into_string()
    }

    #[test]
    fn t_template_context() {
        assert_eq!(template_context(&data()),
                   json!({"title": "<Hi>", "count": 3, "body": "<b>x</b>"}));
    }

    #[test]
    fn t_render() {
        assert_eq!(t("plain"), "plain");
        assert_eq!(t("<h1>{{ title }}</h1>"), "<h1>&lt;Hi&gt;</h1>");
        assert_eq!(t("{{{ title }}}"), "<Hi>");
        assert_eq!(t("{{count}} items"), "3 items");
        assert_eq!(t("{{{ body }}}"), "<b>x</b>");
        assert_eq!(t("[{{ missing }}]"), "[]");
    }

    #[test]
    fn t_render_absent_parameters() {
        let tpl = "<span{{#if missing}} class=\"{{ missing }}\"{{/if}}>\
                   {{#if title}}{{ title }}{{/if}}</span>";
        assert_eq!(t(tpl), "<span>&lt;Hi&gt;</span>");
        assert_eq!(t("{{#unless missing}}none{{/unless}}"), "none");
    }

    #[test]
    fn t_template_views() {
        let views = TemplateViews::new()
            .with_view("alert", "<div class=\"alert\">{{ title }}</div>").unwrap();
        assert!(views.has("alert"));
        assert_eq!(views.render("alert", &data()).unwrap(),
                   "<div class=\"alert\">&lt;Hi&gt;</div>");
        assert!(views.render("nope", &data()).is_err());
    }

    #[test]
    fn t_template_errors() {
        assert!(TemplateViews::new().with_view("v", "{{#if x}}open").is_err());
        let views = TemplateViews::new().with_view("v", "{{frobnicate title}}").unwrap();
        assert!(views.render("v", &data()).is_err());
    }
}
