pub mod warn;
pub mod myfrom;
pub mod html_string;
pub mod entities;
pub mod attributes;
pub mod listing;
pub mod value;
pub mod component;
pub mod error;
pub mod url_encoding;
pub mod auri;
pub mod urls;
pub mod util;
pub mod view;
pub mod obfuscate;
pub mod builder;
pub mod json;
pub mod config;

pub use attributes::{att, flag, opt_att, AttrValue, AttributeMap, Key};
pub use builder::{HtmlBuilder, TagContent};
pub use component::{ComponentRegistry, ComponentSignature, FallbackPolicy, ParamDescriptor};
pub use error::{HtmlError, UrlError};
pub use html_string::HtmlString;
pub use listing::{Descriptions, ListInput, ListItem, ListTag};
pub use value::Value;
