//! Account helpers: e-mail validation, password generation and hashing.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, rand_core::RngCore, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("invalid email regex")
});

const PASSWORD_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Check whether a string looks like an e-mail address.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Generate a random password of the given length.
pub fn generate_random_password(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| {
            let idx = (rng.next_u32() as usize) % PASSWORD_CHARS.len();
            PASSWORD_CHARS[idx] as char
        })
        .collect()
}

/// Hash a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Compare a given password with a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
