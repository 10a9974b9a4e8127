//! Blind hashing protocol primitives.
//!
//! # Responsibilities
//! - Derive `hash2 = HMAC-SHA512(salt2, hash1)`
//! - Decode hex inputs at the API boundary, before any network activity
//! - Compare a derived hash against an expected value in constant time
//!
//! # Design Decisions
//! - Pure functions, no state, no I/O
//! - Constant-time comparison rides on the MAC verification primitive rather
//!   than a hand-rolled byte loop

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::{BlindHashError, BlindHashResult};

type HmacSha512 = Hmac<Sha512>;

/// Decode a caller-supplied hex string, failing fast with `InputFormat`
/// before the request layer is ever reached.
pub fn decode_hex(field: &'static str, value: &str) -> BlindHashResult<Vec<u8>> {
    hex::decode(value).map_err(|_| BlindHashError::InputFormat { field })
}

/// Compute `hash2`: HMAC-SHA512 keyed by `salt2` over `hash1`.
pub fn derive_hash2(hash1: &[u8], salt2: &[u8]) -> [u8; 64] {
    let mut mac = hmac(hash1, salt2);
    mac.finalize().into_bytes().into()
}

/// Compute `hash2` as a lowercase hex string.
pub fn derive_hash2_hex(hash1: &[u8], salt2: &[u8]) -> String {
    hex::encode(derive_hash2(hash1, salt2))
}

/// Constant-time check that HMAC-SHA512(salt2, hash1) equals `expected`.
pub fn hash2_matches(hash1: &[u8], salt2: &[u8], expected: &[u8]) -> bool {
    hmac(hash1, salt2).verify_slice(expected).is_ok()
}

fn hmac(hash1: &[u8], salt2: &[u8]) -> HmacSha512 {
    // new_from_slice only fails for unsupported key lengths; HMAC has none.
    let mut mac = HmacSha512::new_from_slice(salt2).expect("HMAC accepts any key length");
    mac.update(hash1);
    mac
}
