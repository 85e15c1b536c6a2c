//! Hiding e-mail addresses from naive scrapers by randomly writing
//! characters as numeric character references.

use rand::{prelude::thread_rng, Rng};

pub fn obfuscate_with<R: Rng>(rng: &mut R, text: &str) -> String {
    let mut safe = String::with_capacity(text.len() * 4);
    for c in text.chars() {
        if !c.is_ascii() {
            safe.push(c);
            continue;
        }
        match rng.gen_range(0..3) {
            0 => safe.push_str(&format!("&#{};", c as u32)),
            1 => safe.push_str(&format!("&#x{:x};", c as u32)),
            _ => safe.push(c),
        }
    }
    safe
}

pub fn obfuscate(text: &str) -> String {
    obfuscate_with(&mut thread_rng(), text)
}

/// Obfuscated address with the `@` always written as `&#64;`.
pub fn obfuscate_email_with<R: Rng>(rng: &mut R, email: &str) -> String {
    obfuscate_with(rng, email).replace('@', "&#64;")
}

pub fn obfuscate_email(email: &str) -> String {
    obfuscate_email_with(&mut thread_rng(), email)
}


#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::entities::{EntityCodec, HtmlEntities};

    #[test]
    fn t_obfuscate_decodes_back() {
        let mut rng = StdRng::seed_from_u64(7);
        for s in ["", "a", "hello@example.com", "mailto:", "Zoë <z@x.io>"] {
            for _ in 0..20 {
                let o = obfuscate_with(&mut rng, s);
                assert_eq!(HtmlEntities.decode(&o), s);
            }
        }
    }

    #[test]
    fn t_obfuscate_forms() {
        let mut rng = StdRng::seed_from_u64(1);
        let o = obfuscate_with(&mut rng, &"a".repeat(200));
        // all three forms get used
        assert!(o.contains("&#97;"));
        assert!(o.contains("&#x61;"));
        assert!(o.replace("&#97;", "").replace("&#x61;", "").contains('a'));
    }

    #[test]
    fn t_obfuscate_non_ascii_unchanged() {
        let mut rng = StdRng::seed_from_u64(3);
        let o = obfuscate_with(&mut rng, "ü");
        assert_eq!(o, "ü");
    }

    #[test]
    fn t_obfuscate_email() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let o = obfuscate_email_with(&mut rng, "me@x.org");
            assert!(!o.contains('@'));
            assert!(o.contains("&#64;") || o.contains("&#x40;"));
            assert_eq!(HtmlEntities.decode(&o), "me@x.org");
        }
    }
}
