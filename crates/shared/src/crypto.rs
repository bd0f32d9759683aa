//! Identifier generation and content digests.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Alphabet for public identifiers. Look-alike characters (0/O, 1/l/I) are
/// left out so links survive being read aloud or retyped.
const PUBLIC_ID_ALPHABET: &[u8] = b"23456789abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Length of a generated public invitation identifier.
pub const PUBLIC_ID_LEN: usize = 10;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Weak HTTP entity tag for a rendered body.
pub fn etag_for(body: &[u8]) -> String {
    format!("W/\"{}\"", &sha256_hex(body)[..16])
}

/// Generates a random public identifier of `len` characters.
pub fn generate_public_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| PUBLIC_ID_ALPHABET[rng.gen_range(0..PUBLIC_ID_ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `id` could have been produced by [`generate_public_id`]
/// or is otherwise safe to use as a path segment.
pub fn is_valid_public_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex(b"test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_etag_is_weak_and_stable() {
        let a = etag_for(b"<html></html>");
        let b = etag_for(b"<html></html>");
        assert_eq!(a, b);
        assert!(a.starts_with("W/\""));
        assert_ne!(a, etag_for(b"<html>changed</html>"));
    }

    #[test]
    fn test_generate_public_id_length_and_alphabet() {
        let id = generate_public_id(PUBLIC_ID_LEN);
        assert_eq!(id.len(), PUBLIC_ID_LEN);
        assert!(id.bytes().all(|b| PUBLIC_ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_public_id_unique() {
        let a = generate_public_id(PUBLIC_ID_LEN);
        let b = generate_public_id(PUBLIC_ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_valid_public_id() {
        assert!(is_valid_public_id("aB3dE5gH7k"));
        assert!(is_valid_public_id("legacy_firestore-id"));
        assert!(!is_valid_public_id(""));
        assert!(!is_valid_public_id("../etc/passwd"));
        assert!(!is_valid_public_id(&"a".repeat(65)));
    }
}
