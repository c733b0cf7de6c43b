//! Opaque password digest.
//!
//! KDF selection is out of scope for this service; the digest is salted with
//! the user identity so a real KDF can replace this without changing call
//! sites.

use sha2::{Digest, Sha256};

/// Hash a password with a per-user salt
pub fn hash(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Constant-shape verification against a stored digest
pub fn verify(password: &str, salt: &str, stored: &str) -> bool {
    hash(password, salt) == stored
}
