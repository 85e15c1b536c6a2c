use std::{env::VarError, fs::read_to_string, path::Path};

use anyhow::{Result, anyhow, bail, Context};

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{:?} env var is not unicode", name),
        }
    }
}

/// Like `getenv`, but gives `fallbackvalue` if the var is not set.
pub fn getenv_or(name: &str, fallbackvalue: &str) -> Result<String> {
    Ok(getenv(name)?.unwrap_or_else(|| fallbackvalue.to_string()))
}

/// Accepts 1/0, true/false, yes/no, on/off (any case).
pub fn parse_bool(name: &str, s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("{:?}: invalid boolean value {:?}", name, s),
    }
}

pub fn getenv_bool(name: &str) -> Result<Option<bool>> {
    match getenv(name)? {
        Some(s) => Ok(Some(parse_bool(name, &s)?)),
        None => Ok(None),
    }
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    read_to_string(&path).with_context(
        || anyhow!("opening path for reading: {:?}", path.as_ref()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_parse_bool() {
        assert!(parse_bool("X", "1").unwrap());
        assert!(parse_bool("X", " Yes").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(!parse_bool("X", "").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn t_getenv_missing() {
        let name = "HTMLFRAG_TEST_SURELY_UNSET_VARIABLE";
        assert_eq!(getenv(name).unwrap(), None);
        assert_eq!(getenv_or(name, "x").unwrap(), "x");
        assert_eq!(getenv_bool(name).unwrap(), None);
    }

    #[test]
    fn t_read_file_missing() {
        let e = read_file("/nonexistent/htmlfrag/file").unwrap_err();
        assert!(format!("{e}").contains("opening path for reading"));
    }
}
