//! The `spiracle-auth` cookie.

use axum::http::{header, HeaderMap};

use crate::auth::token::Token;

/// Cookie carrying the serialized token.
pub const AUTH_COOKIE_NAME: &str = "spiracle-auth";

/// Cookie lifetime in seconds (matches the token TTL).
pub const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Attributes applied to the auth cookie.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// Add the `Secure` attribute (production only).
    pub secure: bool,
}

impl CookieSettings {
    /// `Set-Cookie` value storing `token`.
    pub fn issue(&self, token: &Token) -> String {
        self.render(&token.to_string(), COOKIE_MAX_AGE_SECS)
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    pub fn clear(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            AUTH_COOKIE_NAME, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Extract the auth cookie value from the request's `Cookie` headers.
pub fn auth_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_issue_attributes() {
        let token = "1700000000000:0123456789abcdef".parse::<Token>().unwrap();

        let dev = CookieSettings { secure: false }.issue(&token);
        assert_eq!(
            dev,
            "spiracle-auth=1700000000000:0123456789abcdef; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400"
        );

        let prod = CookieSettings { secure: true }.issue(&token);
        assert!(prod.ends_with("; Secure"));
    }

    #[test]
    fn test_clear() {
        let cleared = CookieSettings { secure: false }.clear();
        assert!(cleared.starts_with("spiracle-auth=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("a=1; spiracle-auth=123:abc; b=2"),
        );
        assert_eq!(auth_cookie(&headers), Some("123:abc"));
    }

    #[test]
    fn test_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(auth_cookie(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("spiracle-auth="));
        assert_eq!(auth_cookie(&headers), None);
    }
}
