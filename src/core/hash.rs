use std::fmt;

use serde::{Deserialize, Serialize};

/// Content fingerprint of an embedded image: the lowercase hex MD5 of its
/// raw encoded bytes.
///
/// Two fingerprints compare equal if and only if the underlying byte
/// sequences are bit-identical. This is deliberately a strict binary
/// check: a re-encoded or resized copy of the same photograph hashes
/// differently and will not be matched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a raw encoded image payload.
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", md5::compute(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let bytes = b"inspection photo payload";
        assert_eq!(Fingerprint::of(bytes), Fingerprint::of(bytes));
    }

    #[test]
    fn fingerprint_is_32_hex_chars() {
        let fp = Fingerprint::of(b"anything");
        assert_eq!(fp.as_str().len(), 32);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn known_digest_of_empty_input() {
        assert_eq!(
            Fingerprint::of(b"").as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn different_bytes_hash_differently() {
        assert_ne!(Fingerprint::of(b"photo A"), Fingerprint::of(b"photo B"));
    }

    #[test]
    fn single_bit_flip_changes_fingerprint() {
        let original = vec![0u8; 1024];
        let mut flipped = original.clone();
        flipped[512] ^= 1;
        assert_ne!(Fingerprint::of(&original), Fingerprint::of(&flipped));
    }
}
