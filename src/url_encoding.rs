use pct_str::{PctString, URIReserved};

/// Percent-encode all reserved characters, for use in path segments
/// and query keys/values.
pub fn url_encode(s: &str) -> String {
    let p = PctString::encode(s.chars(), URIReserved);
    p.to_string()
}
