//! Entity encoding and decoding of text embedded into markup.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Encoding of user supplied text for embedding into attribute
/// values and element bodies, and the reverse.
pub trait EntityCodec {
    fn encode(&self, text: &str) -> String;
    fn decode(&self, text: &str) -> String;
}

/// Quote-safe encoding of `& < > " '`. Entity references that are
/// already present in the input are left alone (no double encoding).
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEntities;

lazy_static! {
    static ref NAMED_ENTITIES: HashMap<&'static str, char> = {
        let mut m = HashMap::new();
        for (name, c) in [
            ("amp", '&'),
            ("lt", '<'),
            ("gt", '>'),
            ("quot", '"'),
            ("apos", '\''),
            ("nbsp", '\u{00A0}'),
            ("copy", '©'),
            ("reg", '®'),
            ("trade", '™'),
            ("hellip", '…'),
            ("mdash", '—'),
            ("ndash", '–'),
            ("laquo", '«'),
            ("raquo", '»'),
            ("lsquo", '‘'),
            ("rsquo", '’'),
            ("ldquo", '“'),
            ("rdquo", '”'),
            ("euro", '€'),
            ("pound", '£'),
            ("yen", '¥'),
            ("cent", '¢'),
            ("sect", '§'),
            ("para", '¶'),
            ("deg", '°'),
            ("middot", '·'),
            ("times", '×'),
            ("divide", '÷'),
        ] {
            m.insert(name, c);
        }
        m
    };
}

/// If `s` (starting right after a `&`) begins with an entity
/// reference body including the terminating `;`, returns its length
/// (incl. the `;`).
fn entity_reference_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let (start, is_digit): (usize, fn(&u8) -> bool) = match *bytes.first()? {
        b'#' => match *bytes.get(1)? {
            b'x' | b'X' => (2, u8::is_ascii_hexdigit),
            _ => (1, u8::is_ascii_digit),
        },
        c if c.is_ascii_alphabetic() => (0, u8::is_ascii_alphanumeric),
        _ => return None,
    };
    let body = bytes[start..].iter().take_while(|c| is_digit(*c)).count();
    if body == 0 {
        return None;
    }
    let end = start + body;
    if bytes.get(end) == Some(&b';') {
        Some(end + 1)
    } else {
        None
    }
}

fn decode_reference(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        char::from_u32(code).filter(|c| *c != '\0')
    } else {
        NAMED_ENTITIES.get(body).copied()
    }
}

impl EntityCodec for HtmlEntities {
    fn encode(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for (i, c) in text.char_indices() {
            match c {
                '&' => {
                    // keep only references that decode to a character
                    let after = &text[i + 1..];
                    match entity_reference_len(after) {
                        Some(len) if decode_reference(&after[..len - 1]).is_some() =>
                            out.push('&'),
                        _ => out.push_str("&amp;"),
                    }
                }
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        out
    }

    fn decode(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(pos) = rest.find('&') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            match entity_reference_len(after)
                .and_then(|len| decode_reference(&after[..len - 1]).map(|c| (len, c)))
            {
                Some((len, c)) => {
                    out.push(c);
                    rest = &after[len..];
                }
                None => {
                    // unknown or malformed: keep verbatim
                    out.push('&');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
