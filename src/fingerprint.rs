use sha2::{Digest, Sha256};

/// SHA-256 of the plain text, lowercase hex. Identifies content, not a security token.
pub fn fingerprint(plain_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain_text.as_bytes());
    hex::encode(hasher.finalize())
}
