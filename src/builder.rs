//! `HtmlBuilder`: the tag building operations on top of the
//! attribute serializer, the list renderer and components, with the
//! URL resolver, view renderer and entity codec plugged in.

use std::collections::{HashMap, HashSet};

use kstring::KString;
use lazy_static::lazy_static;

use crate::{attributes::AttributeMap,
            auri::QueryString,
            component::{ComponentRegistry, ComponentSignature, FallbackPolicy},
            entities::{EntityCodec, HtmlEntities},
            error::HtmlError,
            html_string::HtmlString,
            listing::{render_description_list, render_list, Descriptions, ListInput, ListTag},
            myfrom::MyFrom,
            obfuscate::{obfuscate, obfuscate_email},
            urls::{is_valid_url, UrlResolver},
            value::Value,
            view::ViewRenderer,
            nowarn, warn};

lazy_static! {
    static ref VOID_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input",
        "link", "meta", "param", "source", "track", "wbr",
    ].into_iter().collect();
}

/// Whether `tag` is written without an end tag.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

pub type MacroFn =
    Box<dyn Fn(&HtmlBuilder, &[Value]) -> anyhow::Result<HtmlString> + Send + Sync>;

/// Named closures callable via `HtmlBuilder::call`.
#[derive(Default)]
pub struct MacroRegistry(HashMap<KString, MacroFn>);

impl MacroRegistry {
    pub fn register(&mut self, name: KString, f: MacroFn) {
        if self.0.insert(name.clone(), f).is_some() {
            warn!("macro {:?} registered again, replacing it", name);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&MacroFn> {
        self.0.get(name)
    }
}

/// Element content for `HtmlBuilder::tag`: markup, used unescaped.
#[derive(Debug, Clone, PartialEq)]
pub enum TagContent {
    One(HtmlString),
    Many(Vec<HtmlString>),
}

impl TagContent {
    fn is_empty(&self) -> bool {
        match self {
            TagContent::One(h) => h.is_empty(),
            TagContent::Many(hs) => hs.iter().all(HtmlString::is_empty),
        }
    }

    fn push_to(&self, out: &mut String) {
        match self {
            TagContent::One(h) => out.push_str(h.as_str()),
            TagContent::Many(hs) => {
                for h in hs {
                    out.push_str(h.as_str());
                }
            }
        }
    }
}

impl From<HtmlString> for TagContent {
    fn from(h: HtmlString) -> Self {
        TagContent::One(h)
    }
}

impl From<Vec<HtmlString>> for TagContent {
    fn from(hs: Vec<HtmlString>) -> Self {
        TagContent::Many(hs)
    }
}

impl From<&'static str> for TagContent {
    fn from(s: &'static str) -> Self {
        TagContent::One(HtmlString::from_markup(s))
    }
}


pub struct HtmlBuilder {
    urls: Box<dyn UrlResolver + Send + Sync>,
    views: Box<dyn ViewRenderer + Send + Sync>,
    codec: Box<dyn EntityCodec + Send + Sync>,
    components: ComponentRegistry,
    macros: MacroRegistry,
}

impl HtmlBuilder {
    pub fn new(
        urls: impl UrlResolver + Send + Sync + 'static,
        views: impl ViewRenderer + Send + Sync + 'static,
    ) -> Self {
        HtmlBuilder {
            urls: Box::new(urls),
            views: Box::new(views),
            codec: Box::new(HtmlEntities),
            components: ComponentRegistry::default(),
            macros: MacroRegistry::default(),
        }
    }

    pub fn with_codec(mut self, codec: impl EntityCodec + Send + Sync + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.components.set_policy(policy);
        self
    }

    pub fn codec(&self) -> &dyn EntityCodec {
        &*self.codec
    }

    pub fn urls(&self) -> &dyn UrlResolver {
        &*self.urls
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    // ------------------------------------------------------------------
    // Text

    /// Encode `value` for use in markup (existing entities are kept).
    pub fn entities(&self, value: &str) -> String {
        self.codec.encode(value)
    }

    pub fn decode(&self, value: &str) -> String {
        self.codec.decode(value)
    }

    pub fn attributes(&self, attrs: &AttributeMap) -> String {
        attrs.serialize(self.codec())
    }

    pub fn nbsp(&self, num: usize) -> HtmlString {
        HtmlString::from_string("&nbsp;".repeat(num))
    }

    pub fn obfuscate(&self, value: &str) -> String {
        obfuscate(value)
    }

    /// Obfuscated address with `@` written as a character reference.
    pub fn email(&self, email: &str) -> String {
        obfuscate_email(email)
    }

    // ------------------------------------------------------------------
    // Assets

    pub fn script(&self, url: &str, attrs: AttributeMap, secure: Option<bool>)
                  -> Result<HtmlString, HtmlError>
    {
        let attrs = attrs.with("src", self.urls.asset(url, secure)?);
        Ok(HtmlString::from_string(format!("<script{}></script>", self.attributes(&attrs))))
    }

    pub fn style(&self, url: &str, attrs: AttributeMap, secure: Option<bool>)
                 -> Result<HtmlString, HtmlError>
    {
        let defaults = AttributeMap::new()
            .with("media", "all")
            .with("type", "text/css")
            .with("rel", "stylesheet");
        let attrs = attrs.merged_over(defaults)
            .with("href", self.urls.asset(url, secure)?);
        Ok(HtmlString::from_string(format!("<link{}>", self.attributes(&attrs))))
    }

    pub fn image(&self, url: &str, alt: Option<&str>, attrs: AttributeMap, secure: Option<bool>)
                 -> Result<HtmlString, HtmlError>
    {
        let src = self.urls.asset(url, secure)?;
        let attrs = attrs.with("alt", alt);
        Ok(HtmlString::from_string(format!("<img src=\"{}\"{}>",
                                           self.entities(&src),
                                           self.attributes(&attrs))))
    }

    pub fn favicon(&self, url: &str, attrs: AttributeMap, secure: Option<bool>)
                   -> Result<HtmlString, HtmlError>
    {
        let defaults = AttributeMap::new()
            .with("rel", "shortcut icon")
            .with("type", "image/x-icon");
        let attrs = attrs.merged_over(defaults)
            .with("href", self.urls.asset(url, secure)?);
        Ok(HtmlString::from_string(format!("<link{}>", self.attributes(&attrs))))
    }

    // ------------------------------------------------------------------
    // Links

    /// `<a>` to `url` (resolved via `UrlResolver::to`). Without a
    /// title, the URL is shown.
    pub fn link(&self, url: &str, title: Option<&str>, attrs: AttributeMap,
                secure: Option<bool>, escape: bool)
                -> Result<HtmlString, HtmlError>
    {
        let url = self.urls.to(url, &[], secure)?;
        let title = title.unwrap_or(url.as_str());
        let title = if escape {
            self.entities(title)
        } else {
            title.to_string()
        };
        Ok(HtmlString::from_string(format!("<a href=\"{}\"{}>{}</a>",
                                           self.entities(&url),
                                           self.attributes(&attrs),
                                           title)))
    }

    pub fn secure_link(&self, url: &str, title: Option<&str>, attrs: AttributeMap, escape: bool)
                       -> Result<HtmlString, HtmlError>
    {
        self.link(url, title, attrs, Some(true), escape)
    }

    pub fn link_asset(&self, url: &str, title: Option<&str>, attrs: AttributeMap,
                      secure: Option<bool>, escape: bool)
                      -> Result<HtmlString, HtmlError>
    {
        let url = self.urls.asset(url, secure)?;
        let title = title.filter(|t| !t.is_empty()).unwrap_or(url.as_str());
        self.link(&url, Some(title), attrs, secure, escape)
    }

    pub fn link_secure_asset(&self, url: &str, title: Option<&str>, attrs: AttributeMap,
                             escape: bool)
                             -> Result<HtmlString, HtmlError>
    {
        self.link_asset(url, title, attrs, Some(true), escape)
    }

    pub fn link_route(&self, name: &str, title: Option<&str>, params: &QueryString,
                      attrs: AttributeMap, secure: Option<bool>, escape: bool)
                      -> Result<HtmlString, HtmlError>
    {
        let url = self.urls.route(name, params)?;
        self.link(&url, title, attrs, secure, escape)
    }

    pub fn link_action(&self, action: &str, title: Option<&str>, params: &QueryString,
                       attrs: AttributeMap, secure: Option<bool>, escape: bool)
                       -> Result<HtmlString, HtmlError>
    {
        let url = self.urls.action(action, params)?;
        self.link(&url, title, attrs, secure, escape)
    }

    /// Obfuscated `mailto:` link. Without a title, the (obfuscated)
    /// address is shown.
    pub fn mailto(&self, email: &str, title: Option<&str>, attrs: AttributeMap, escape: bool)
                  -> HtmlString
    {
        let email = email.strip_prefix("mailto:").unwrap_or(email);
        if is_valid_url(email) {
            warn!("using a non-email URL where an email address was expected: {:?}", email);
        }
        let email = self.email(email);
        let title = title.filter(|t| !t.is_empty()).unwrap_or(email.as_str());
        let title = if escape {
            self.entities(title)
        } else {
            title.to_string()
        };
        HtmlString::from_string(format!("<a href=\"{}{}\"{}>{}</a>",
                                        self.obfuscate("mailto:"),
                                        email,
                                        self.attributes(&attrs),
                                        title))
    }

    // ------------------------------------------------------------------
    // Lists

    pub fn ol(&self, list: &ListInput, attrs: &AttributeMap) -> HtmlString {
        HtmlString::from_string(render_list(ListTag::Ol, list, attrs, self.codec()))
    }

    pub fn ul(&self, list: &ListInput, attrs: &AttributeMap) -> HtmlString {
        HtmlString::from_string(render_list(ListTag::Ul, list, attrs, self.codec()))
    }

    pub fn dl(&self, list: &[(KString, Descriptions)], attrs: &AttributeMap) -> HtmlString {
        HtmlString::from_string(render_description_list(list, attrs, self.codec()))
    }

    // ------------------------------------------------------------------
    // Generic elements

    pub fn meta<N, C>(&self, name: N, content: C, attrs: AttributeMap) -> HtmlString
    where KString: MyFrom<N> + MyFrom<C>
    {
        let defaults = AttributeMap::new()
            .with("name", KString::myfrom(name))
            .with("content", KString::myfrom(content));
        let attrs = attrs.merged_over(defaults);
        HtmlString::from_string(format!("<meta{}>", self.attributes(&attrs)))
    }

    /// `<tag attrs>content</tag>`; content is used as is. Void
    /// elements without content get no end tag.
    pub fn tag(&self, tag: &str, content: impl Into<TagContent>, attrs: &AttributeMap)
               -> HtmlString
    {
        let content = content.into();
        let mut html = format!("<{tag}{}>", self.attributes(attrs));
        if is_void_element(tag) && content.is_empty() {
            return HtmlString::from_string(html);
        }
        content.push_to(&mut html);
        html.push_str("</");
        html.push_str(tag);
        html.push('>');
        HtmlString::from_string(html)
    }

    // ------------------------------------------------------------------
    // Components and macros

    /// Register component `name`, rendered by `view` with arguments
    /// bound according to `signature`. Replaces an earlier
    /// registration of the same name.
    pub fn component<N, V>(&mut self, name: N, view: V, signature: ComponentSignature)
    where KString: MyFrom<N> + MyFrom<V>
    {
        self.components.register(name, view, signature)
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.components.has(name)
    }

    pub fn render_component(&self, name: &str, args: &[Value])
                            -> Result<HtmlString, HtmlError>
    {
        let (view, data) = self.components.resolve(name, args)?;
        nowarn!("component {:?}: view {:?} with {:?}", name, view, data);
        self.views.render(view, &data).map_err(
            |error| HtmlError::View { view: view.clone(), error })
    }

    pub fn register_macro<F>(&mut self, name: &str, f: F)
    where F: Fn(&HtmlBuilder, &[Value]) -> anyhow::Result<HtmlString> + Send + Sync + 'static
    {
        self.macros.register(KString::from_ref(name), Box::new(f))
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.macros.has(name)
    }

    /// Call `name` as a component if one is registered under that
    /// name, otherwise as a macro.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<HtmlString, HtmlError> {
        if self.has_component(name) {
            return self.render_component(name, args);
        }
        match self.macros.get(name) {
            Some(f) => f(self, args).map_err(
                |error| HtmlError::Macro { name: KString::from_ref(name), error }),
            None => Err(HtmlError::MethodNotFound(KString::from_ref(name))),
        }
    }
}
