use std::borrow::Cow;

use kstring::KString;

use crate::html_string::HtmlString;

// `From` can't be used here: KString already has From impls that
// would conflict with the numeric and markup ones below.
pub trait MyFrom<T> {
    fn myfrom(s: T) -> Self;
}

// Can't do KString::from_static: no way to have a separate trait impl
// for &'static.
impl MyFrom<&str> for KString {
    fn myfrom(s: &str) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<&&str> for KString {
    fn myfrom(s: &&str) -> Self {
        KString::from_ref(*s)
    }
}

impl MyFrom<&String> for KString {
    fn myfrom(s: &String) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<String> for KString {
    fn myfrom(s: String) -> Self {
        KString::from_string(s)
    }
}

impl MyFrom<&KString> for KString {
    fn myfrom(s: &KString) -> Self {
        s.clone()
    }
}

impl MyFrom<KString> for KString {
    fn myfrom(s: KString) -> Self {
        s
    }
}

impl<'t> MyFrom<Cow<'t, str>> for KString {
    fn myfrom(s: Cow<'t, str>) -> Self {
        match s {
            Cow::Borrowed(s) => KString::from_ref(s),
            Cow::Owned(s) => KString::from_string(s),
        }
    }
}

// Markup given as an attribute value is treated as text again (and
// will be escaped, minus already present entity references).
impl MyFrom<HtmlString> for KString {
    fn myfrom(s: HtmlString) -> Self {
        s.into_kstring()
    }
}

impl MyFrom<&HtmlString> for KString {
    fn myfrom(s: &HtmlString) -> Self {
        s.as_kstring().clone()
    }
}

macro_rules! myfrom_display {
    ($($t:ty)*) => {
        $(
            impl MyFrom<$t> for KString {
                fn myfrom(val: $t) -> Self {
                    KString::from_string(val.to_string())
                }
            }
        )*
    }
}

myfrom_display!(usize u32 u64 i32 i64 f64);
