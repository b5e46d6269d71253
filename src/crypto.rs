//! Digest helpers: the block fingerprint hash and the content-derived book id.

use md5::Md5;
use sha2::{Digest, Sha256};

/// Hash inputs (concatenate as bytes, SHA-256) and return lowercase hex.
pub fn hash_concat(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p);
    }
    hex::encode(hasher.finalize())
}

/// 128-bit id for a book, derived from `isbn || publish_date` (MD5, lowercase hex).
///
/// Not a security boundary: it only has to be stable for identical inputs.
pub fn book_id(isbn: &str, publish_date: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(isbn.as_bytes());
    hasher.update(publish_date.as_bytes());
    hex::encode(hasher.finalize())
}
