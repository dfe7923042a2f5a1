//! Signed, time-boxed authentication tokens.
//!
//! Wire format: `"<issued_at_ms>:<signature>"` where the signature is the
//! first 16 hex characters of `HMAC-SHA256(secret, "authenticated:" + issued_at_ms)`.
//!
//! [`parse_structure`] and [`Token::is_fresh_at`] need no secret and are shared
//! by the edge gate and the full verifier, so the two tiers cannot drift apart.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::crypto::{constant_time_eq, hmac_sha256_hex};
use crate::config::SharedSecret;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Length of the truncated hex signature.
pub const SIGNATURE_LEN: usize = 16;

const SIGNING_PREFIX: &str = "authenticated:";

/// Why a token string was rejected structurally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token must have exactly two `:`-separated parts")]
    PartCount,

    #[error("token timestamp is not a base-10 integer")]
    Timestamp,

    #[error("token signature is not 16 hex characters")]
    Signature,
}

/// An authentication token. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    issued_at_ms: u64,
    signature: String,
}

impl Token {
    pub fn issued_at_ms(&self) -> u64 {
        self.issued_at_ms
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// True if the token was issued no later than `now_ms` and no more than
    /// [`TOKEN_TTL_MS`] before it.
    pub fn is_fresh_at(&self, now_ms: u64) -> bool {
        match now_ms.checked_sub(self.issued_at_ms) {
            Some(age) => age <= TOKEN_TTL_MS,
            None => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.issued_at_ms, self.signature)
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_structure(raw)
    }
}

/// Structural parse only. Performs no cryptographic check.
pub fn parse_structure(raw: &str) -> Result<Token, TokenError> {
    let mut parts = raw.split(':');
    let (timestamp, signature) = match (parts.next(), parts.next(), parts.next()) {
        (Some(timestamp), Some(signature), None) => (timestamp, signature),
        _ => return Err(TokenError::PartCount),
    };

    if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenError::Timestamp);
    }
    let issued_at_ms = timestamp.parse::<u64>().map_err(|_| TokenError::Timestamp)?;

    if signature.len() != SIGNATURE_LEN || !signature.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TokenError::Signature);
    }

    Ok(Token {
        issued_at_ms,
        signature: signature.to_string(),
    })
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Mints and verifies tokens with the shared secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: SharedSecret,
}

impl TokenCodec {
    pub fn new(secret: SharedSecret) -> Self {
        Self { secret }
    }

    /// Mint a token stamped with the current time.
    pub fn mint(&self) -> Token {
        self.mint_at(now_ms())
    }

    /// Mint a token stamped with `issued_at_ms`.
    pub fn mint_at(&self, issued_at_ms: u64) -> Token {
        Token {
            issued_at_ms,
            signature: self.expected_signature(issued_at_ms),
        }
    }

    /// Full verification against the current time.
    pub fn verify(&self, raw: &str) -> bool {
        self.verify_at(raw, now_ms())
    }

    /// Full verification: structure, freshness, then signature.
    pub fn verify_at(&self, raw: &str, now_ms: u64) -> bool {
        let token = match parse_structure(raw) {
            Ok(token) => token,
            Err(_) => return false,
        };

        if !token.is_fresh_at(now_ms) {
            return false;
        }

        let expected = self.expected_signature(token.issued_at_ms);
        constant_time_eq(token.signature.as_bytes(), expected.as_bytes())
    }

    fn expected_signature(&self, issued_at_ms: u64) -> String {
        let message = format!("{SIGNING_PREFIX}{issued_at_ms}");
        let mut digest = hmac_sha256_hex(self.secret.expose(), message.as_bytes());
        digest.truncate(SIGNATURE_LEN);
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000_000;

    fn codec() -> TokenCodec {
        TokenCodec::new(SharedSecret::new("correct horse battery staple").unwrap())
    }

    #[test]
    fn test_mint_format() {
        let token = codec().mint_at(T);
        let serialized = token.to_string();

        let (ts, sig) = serialized.split_once(':').unwrap();
        assert_eq!(ts, T.to_string());
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(sig.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert_eq!(serialized.parse::<Token>().unwrap(), token);
    }

    #[test]
    fn test_signature_matches_hmac_prefix() {
        let secret = "correct horse battery staple";
        let expected = hmac_sha256_hex(secret.as_bytes(), format!("authenticated:{}", T).as_bytes());
        assert_eq!(codec().mint_at(T).signature(), &expected[..16]);
    }

    #[test]
    fn test_parse_structure_rejections() {
        assert_eq!(parse_structure("authenticated"), Err(TokenError::PartCount));
        assert_eq!(parse_structure("1:2:0123456789abcdef"), Err(TokenError::PartCount));
        assert_eq!(parse_structure("abc:0123456789abcdef"), Err(TokenError::Timestamp));
        assert_eq!(parse_structure(":0123456789abcdef"), Err(TokenError::Timestamp));
        assert_eq!(parse_structure("-5:0123456789abcdef"), Err(TokenError::Timestamp));
        assert_eq!(parse_structure("123:0123456789abcde"), Err(TokenError::Signature));
        assert_eq!(parse_structure("123:0123456789abcdeg"), Err(TokenError::Signature));
        assert_eq!(parse_structure("123:0123456789abcdef0"), Err(TokenError::Signature));
    }

    #[test]
    fn test_parse_structure_is_case_insensitive() {
        assert!(parse_structure("123:0123456789ABCDEF").is_ok());
    }

    #[test]
    fn test_ttl_boundaries() {
        let codec = codec();
        let raw = codec.mint_at(T).to_string();

        assert!(codec.verify_at(&raw, T));
        assert!(codec.verify_at(&raw, T + TOKEN_TTL_MS - 1));
        assert!(codec.verify_at(&raw, T + TOKEN_TTL_MS));
        assert!(!codec.verify_at(&raw, T + TOKEN_TTL_MS + 1));
    }

    #[test]
    fn test_future_tokens_rejected() {
        let codec = codec();
        let raw = codec.mint_at(T + 1).to_string();
        assert!(!codec.verify_at(&raw, T));
    }

    #[test]
    fn test_any_signature_flip_fails() {
        let codec = codec();
        let token = codec.mint_at(T);
        let sig = token.signature().to_string();

        for i in 0..sig.len() {
            let mut chars: Vec<char> = sig.chars().collect();
            chars[i] = if chars[i] == '0' { '1' } else { '0' };
            let forged: String = chars.into_iter().collect();
            let raw = format!("{}:{}", T, forged);
            assert!(!codec.verify_at(&raw, T), "flip at {} accepted", i);
        }
    }

    #[test]
    fn test_other_secret_rejected() {
        let raw = codec().mint_at(T).to_string();
        let other = TokenCodec::new(SharedSecret::new("another secret").unwrap());
        assert!(!other.verify_at(&raw, T));
    }

    #[test]
    fn test_malformed_rejected() {
        let codec = codec();
        assert!(!codec.verify_at("", T));
        assert!(!codec.verify_at("authenticated", T));
        assert!(!codec.verify_at(&format!("{}:zz", T), T));
    }

    #[test]
    fn test_freshness_without_secret() {
        let token = parse_structure(&format!("{}:0123456789abcdef", T)).unwrap();
        assert!(token.is_fresh_at(T + TOKEN_TTL_MS));
        assert!(!token.is_fresh_at(T + TOKEN_TTL_MS + 1));
        assert!(!token.is_fresh_at(T - 1));
    }
}
