//! Cookie accessor used to source the CSRF token for authenticated submissions.

use crate::services::errors::CookieError;

/// Host abstraction over `document.cookie`.
pub trait CookieSource {
    fn cookie_string(&self) -> String;
}

/// Fixed cookie string, for non-browser targets and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCookies(pub String);

impl CookieSource for StaticCookies {
    fn cookie_string(&self) -> String {
        self.0.clone()
    }
}

/// Look up `name` in a `document.cookie` style string and URL-decode its value.
///
/// The first `name=` entry wins. Returns `Ok(None)` if there is no such cookie.
pub fn get_cookie(cookies: &str, name: &str) -> Result<Option<String>, CookieError> {
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return decode_uri_component(value).map(Some);
        }
    }
    Ok(None)
}

/// Percent-decode like `decodeURIComponent`: `%XX` escapes only, `+` stays as is,
/// and the decoded bytes must be valid UTF-8.
pub fn decode_uri_component(input: &str) -> Result<String, CookieError> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes
                .get(i + 1..i + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or(CookieError::MalformedEscape(i))?;
            decoded.push(escape);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).map_err(|_| CookieError::InvalidUtf8)
}
