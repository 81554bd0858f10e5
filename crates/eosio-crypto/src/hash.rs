//! Digest helpers: SHA-256, RIPEMD-160 and the short key checksums

use eosio_primitives::{Checksum160, Checksum256};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 of the input data
pub fn sha256(data: &[u8]) -> Checksum256 {
    Checksum256::from_bytes(Sha256::digest(data).into())
}

/// SHA-256 applied twice
pub fn sha256d(data: &[u8]) -> Checksum256 {
    sha256(sha256(data).as_bytes())
}

/// Compute RIPEMD-160 of the input data
pub fn ripemd160(data: &[u8]) -> Checksum160 {
    Checksum160::from_bytes(Ripemd160::digest(data).into())
}

/// First four bytes of `ripemd160(data || suffix)`
pub(crate) fn ripemd_checksum(data: &[u8], suffix: &[u8]) -> [u8; 4] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.update(suffix);
    let digest = hasher.finalize();
    [digest[0], digest[1], digest[2], digest[3]]
}

/// First four bytes of `sha256d(data)`
pub(crate) fn sha256d_checksum(data: &[u8]) -> [u8; 4] {
    let digest = sha256d(data);
    let b = digest.as_bytes();
    [b[0], b[1], b[2], b[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            sha256(&[]).to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_ripemd160_empty() {
        assert_eq!(
            ripemd160(&[]).to_hex(),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn test_ripemd160_abc() {
        assert_eq!(
            ripemd160(b"abc").to_hex(),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_ripemd_checksum_matches_concatenation() {
        let joined = ripemd160(b"dataK1");
        assert_eq!(&ripemd_checksum(b"data", b"K1"), &joined.as_bytes()[..4]);
    }
}
