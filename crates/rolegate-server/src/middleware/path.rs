//! Request path canonicalization.
//!
//! The guard must judge the same path the front end will serve. Paths are
//! reduced to one spelling before evaluation: escaped unreserved characters
//! are decoded, repeated `/` collapse, and dot segments are resolved with
//! the same `url` rules the proxy uses when it builds the forwarded URL.

use url::Url;

const BASE: &str = "http://rolegate.invalid/";

/// Decoding can expose new escapes (`%%34%31`); give up past this depth.
const MAX_PASSES: usize = 4;

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// Decode `%XX` escapes of unreserved characters; other escapes are kept.
fn decode_unreserved(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                let decoded = hi << 4 | lo;
                if is_unreserved(decoded) {
                    out.push(decoded);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

fn has_encoded_separator(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains("%2f") || lower.contains("%5c")
}

fn normalize_once(path: &str) -> String {
    let path = collapse_slashes(&decode_unreserved(path));
    match Url::parse(BASE) {
        Ok(mut url) => {
            url.set_path(&path);
            url.path().to_string()
        }
        Err(_) => path,
    }
}

/// The single spelling of `raw` that the guard evaluates and the proxy
/// forwards, or `None` when the path cannot be given one.
///
/// Encoded separators (`%2F`, `%5C`) are refused outright since origins
/// disagree on whether they split segments.
pub fn canonical_path(raw: &str) -> Option<String> {
    let mut current = raw.to_string();
    for _ in 0..MAX_PASSES {
        if has_encoded_separator(&current) {
            return None;
        }
        let next = normalize_once(&current);
        if next == current {
            return Some(current);
        }
        current = next;
    }
    None
}
