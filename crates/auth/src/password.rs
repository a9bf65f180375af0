//! Password hashing using PBKDF2-HMAC-SHA256.
//!
//! Stored format: `base64(salt) "." base64(derived_key)` with the standard
//! (padded) alphabet. Existing hashes written by earlier deployments use the
//! same parameters, so these constants must not change.

use std::num::NonZeroU32;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use ring::pbkdf2;
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => panic!("PBKDF2 iteration count must be non-zero"),
};

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let key = derive(password, &salt);
    format!("{}.{}", BASE64.encode(salt), BASE64.encode(key))
}

/// Verify a plaintext password against a stored hash.
///
/// Malformed hashes (wrong number of segments, invalid base64) never match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let mut parts = stored_hash.split('.');
    let (Some(salt_b64), Some(key_b64), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    let (Ok(salt), Ok(stored_key)) = (BASE64.decode(salt_b64), BASE64.decode(key_b64)) else {
        return false;
    };

    let candidate = derive(password, &salt);
    candidate.as_slice().ct_eq(stored_key.as_slice()).into()
}

fn derive(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        salt,
        password.as_bytes(),
        &mut key,
    );
    key
}
