//! Cryptographic primitives for the access-control layer.
//!
//! Everything secret-derived is compared through [`constant_time_eq`]; never
//! use `==` on passwords or signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Constant-time byte slice comparison.
///
/// Returns `false` immediately if lengths differ (length is not secret).
/// Otherwise every index is visited and differences are OR-accumulated, so
/// the running time does not depend on where the inputs first differ.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    accumulate_difference(a, b, |_| {}) == 0
}

/// Constant-time string comparison.
#[inline]
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// OR of `a[i] ^ b[i]` over the common length. `visit` observes each index.
#[inline]
fn accumulate_difference(a: &[u8], b: &[u8], mut visit: impl FnMut(usize)) -> u8 {
    a.iter().zip(b.iter()).enumerate().fold(0u8, |acc, (i, (x, y))| {
        visit(i);
        acc | (x ^ y)
    })
}

/// HMAC-SHA256 of `message` under `key`, hex encoded (lowercase, 64 chars).
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}
