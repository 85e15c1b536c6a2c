//! Ordered, unordered and description lists from (nested) data.

use kstring::KString;

use crate::{attributes::{AttributeMap, Key},
            entities::EntityCodec,
            myfrom::MyFrom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTag {
    Ol,
    Ul,
}

impl ListTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ListTag::Ol => "ol",
            ListTag::Ul => "ul",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Leaf(KString),
    Nested(ListInput),
}

macro_rules! leaf_from {
    ($($t:ty)*) => {
        $(
            impl From<$t> for ListItem {
                fn from(s: $t) -> Self {
                    ListItem::Leaf(KString::myfrom(s))
                }
            }
            impl From<$t> for Descriptions {
                fn from(s: $t) -> Self {
                    Descriptions::One(KString::myfrom(s))
                }
            }
        )*
    }
}

leaf_from!(&str String &String KString &KString);

impl From<ListInput> for ListItem {
    fn from(l: ListInput) -> Self {
        ListItem::Nested(l)
    }
}

/// A sequence (positional keys) or mapping (labels) of items, where
/// items can be lists again. Mixed keys are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListInput(Vec<(Key, ListItem)>);

impl ListInput {
    pub fn new() -> Self {
        ListInput(Vec::new())
    }

    /// A plain sequence; keys are 0..n.
    pub fn seq<I>(items: I) -> Self
    where I: IntoIterator,
          I::Item: Into<ListItem>
    {
        ListInput(items
                  .into_iter()
                  .enumerate()
                  .map(|(i, item)| (Key::Positional(i), item.into()))
                  .collect())
    }

    /// A mapping from label to item, in the given order.
    pub fn labeled<I, L, T>(entries: I) -> Self
    where I: IntoIterator<Item = (L, T)>,
          KString: MyFrom<L>,
          T: Into<ListItem>
    {
        ListInput(entries
                  .into_iter()
                  .map(|(label, item)| (Key::Named(KString::myfrom(label)), item.into()))
                  .collect())
    }

    pub fn push(&mut self, key: Key, item: impl Into<ListItem>) {
        self.0.push((key, item.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, ListItem)> {
        self.0.iter()
    }
}

impl FromIterator<(Key, ListItem)> for ListInput {
    fn from_iter<I: IntoIterator<Item = (Key, ListItem)>>(iter: I) -> Self {
        ListInput(iter.into_iter().collect())
    }
}


/// Render `list` as `<ol>`/`<ul>`. An empty list gives the empty
/// string, not an empty element.
pub fn render_list(
    tag: ListTag,
    list: &ListInput,
    attrs: &AttributeMap,
    codec: &dyn EntityCodec,
) -> String {
    if list.is_empty() {
        return String::new();
    }
    let mut html = String::new();
    for (key, item) in list.iter() {
        match item {
            ListItem::Nested(nested) => match key {
                // spliced in as a sibling list, without an <li> around it
                Key::Positional(_) => html.push_str(
                    &render_list(tag, nested, &AttributeMap::new(), codec)),
                Key::Named(label) => {
                    html.push_str("<li>");
                    html.push_str(label);
                    html.push_str(&render_list(tag, nested, &AttributeMap::new(), codec));
                    html.push_str("</li>");
                }
            },
            ListItem::Leaf(value) => {
                html.push_str("<li>");
                html.push_str(&codec.encode(value));
                html.push_str("</li>");
            }
        }
    }
    let tag = tag.as_str();
    format!("<{tag}{}>{html}</{tag}>", attrs.serialize(codec))
}


/// Values of one description list term.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptions {
    One(KString),
    Many(Vec<KString>),
}

impl Descriptions {
    pub fn as_slice(&self) -> &[KString] {
        match self {
            Descriptions::One(v) => std::slice::from_ref(v),
            Descriptions::Many(vs) => vs,
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Descriptions
where KString: MyFrom<T>
{
    fn from(vs: [T; N]) -> Self {
        Descriptions::Many(vs.into_iter().map(KString::myfrom).collect())
    }
}

impl From<Vec<KString>> for Descriptions {
    fn from(vs: Vec<KString>) -> Self {
        Descriptions::Many(vs)
    }
}

/// Render `<dl><dt>term</dt><dd>description</dd>...</dl>`. Flat, no
/// nesting; empty input still gives the `<dl>` pair.
pub fn render_description_list(
    list: &[(KString, Descriptions)],
    attrs: &AttributeMap,
    codec: &dyn EntityCodec,
) -> String {
    let mut html = format!("<dl{}>", attrs.serialize(codec));
    for (term, descriptions) in list {
        html.push_str("<dt>");
        html.push_str(&codec.encode(term));
        html.push_str("</dt>");
        for d in descriptions.as_slice() {
            html.push_str("<dd>");
            html.push_str(&codec.encode(d));
            html.push_str("</dd>");
        }
    }
    html.push_str("</dl>");
    html
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::HtmlEntities;

    fn ul(list: &ListInput) -> String {
        render_list(ListTag::Ul, list, &AttributeMap::new(), &HtmlEntities)
    }

    #[test]
    fn t_empty() {
        assert_eq!(ul(&ListInput::new()), "");
        assert_eq!(render_list(ListTag::Ol, &ListInput::new(),
                               &AttributeMap::new().with("id", "x"), &HtmlEntities),
                   "");
    }

    #[test]
    fn t_flat() {
        assert_eq!(ul(&ListInput::seq(["a", "b"])), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(
            render_list(ListTag::Ol, &ListInput::seq(["a"]),
                        &AttributeMap::new().with("class", "steps"), &HtmlEntities),
            "<ol class=\"steps\"><li>a</li></ol>");
    }

    #[test]
    fn t_leaf_escaping() {
        assert_eq!(ul(&ListInput::seq(["<b>", "a &amp; b"])),
                   "<ul><li>&lt;b&gt;</li><li>a &amp; b</li></ul>");
    }

    #[test]
    fn t_nested_unlabeled() {
        let l = ListInput::seq([ListInput::seq(["x", "y"])]);
        assert_eq!(ul(&l), "<ul><ul><li>x</li><li>y</li></ul></ul>");

        let mut l = ListInput::seq(["a"]);
        l.push(Key::Positional(1), ListInput::seq(["b"]));
        l.push(Key::Positional(2), "c");
        assert_eq!(ul(&l), "<ul><li>a</li><ul><li>b</li></ul><li>c</li></ul>");
    }

    #[test]
    fn t_nested_empty_splices_nothing() {
        let l = ListInput::seq([ListInput::new(), ListInput::seq(["z"])]);
        assert_eq!(ul(&l), "<ul><ul><li>z</li></ul></ul>");
    }

    #[test]
    fn t_nested_labeled() {
        let l = ListInput::labeled([("Fruits", ListInput::seq(["apple", "pear"]))]);
        assert_eq!(ul(&l), "<ul><li>Fruits<ul><li>apple</li><li>pear</li></ul></li></ul>");
    }

    #[test]
    fn t_labeled_leaf_ignores_label() {
        let l = ListInput::labeled([("first", "one"), ("second", "two")]);
        assert_eq!(ul(&l), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn t_deep_nesting_keeps_tag() {
        let l = ListInput::labeled([
            ("Menu", ListInput::labeled([
                ("Sub", ListInput::seq(["leaf"]))
            ]))
        ]);
        assert_eq!(
            render_list(ListTag::Ol, &l, &AttributeMap::new(), &HtmlEntities),
            "<ol><li>Menu<ol><li>Sub<ol><li>leaf</li></ol></li></ol></li></ol>");
    }

    #[test]
    fn t_description_list() {
        let dl = |list: &[(KString, Descriptions)]| {
            render_description_list(list, &AttributeMap::new(), &HtmlEntities)
        };
        assert_eq!(dl(&[]), "<dl></dl>");
        assert_eq!(
            dl(&[(KString::from_static("Tea"), Descriptions::from("hot")),
                 (KString::from_static("Juice"), Descriptions::from(["cold", "<sweet>"]))]),
            "<dl><dt>Tea</dt><dd>hot</dd><dt>Juice</dt><dd>cold</dd><dd>&lt;sweet&gt;</dd></dl>");
        assert_eq!(
            render_description_list(&[], &AttributeMap::new().with("class", "terms"),
                                    &HtmlEntities),
            "<dl class=\"terms\"></dl>");
    }
}
