//! Public keys, private keys and signatures with their string forms
//!
//! String forms:
//! - `PUB_K1_`, `PUB_R1_`, `SIG_K1_`, `SIG_R1_`, `PVT_K1_`, `PVT_R1_` followed by
//!   base58 of the payload and `ripemd160(payload || "K1"/"R1")[..4]`
//! - legacy public keys `EOS` + base58 of the payload and `ripemd160(payload)[..4]`
//! - legacy private keys in WIF: base58 of `0x80 || key || sha256d(..)[..4]`

use crate::hash::{ripemd_checksum, sha256d_checksum};
use crate::CryptoError;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

/// Compressed public key size
pub const PUBLIC_KEY_LEN: usize = 33;
/// Private key size
pub const PRIVATE_KEY_LEN: usize = 32;
/// Compact recoverable signature size
pub const SIGNATURE_LEN: usize = 65;

const LEGACY_PUBLIC_PREFIX: &str = "EOS";
const WIF_VERSION: u8 = 0x80;

/// Curve family of a key or signature, also its wire tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum KeyType {
    /// secp256k1
    K1 = 0,
    /// secp256r1
    R1 = 1,
}

impl KeyType {
    /// Wire tag byte
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Map a wire tag; `2` (WebAuthn) and above are not supported
    pub fn from_tag(tag: u8) -> Result<Self, CryptoError> {
        match tag {
            0 => Ok(KeyType::K1),
            1 => Ok(KeyType::R1),
            2 => Err(CryptoError::UnsupportedKeyType("WA".to_string())),
            other => Err(CryptoError::UnsupportedKeyType(other.to_string())),
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            KeyType::K1 => "K1",
            KeyType::R1 => "R1",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

fn encode_with_suffix(prefix: &str, key_type: KeyType, payload: &[u8]) -> String {
    let mut buf = payload.to_vec();
    buf.extend_from_slice(&ripemd_checksum(payload, key_type.suffix().as_bytes()));
    format!("{}{}_{}", prefix, key_type.suffix(), bs58::encode(buf).into_string())
}

/// Split `PREFIX_K1_...` into its key type and verified payload
fn decode_with_suffix<const N: usize>(
    s: &str,
    prefix: &str,
) -> Result<Option<(KeyType, [u8; N])>, CryptoError> {
    let Some(rest) = s.strip_prefix(prefix) else {
        return Ok(None);
    };
    let (key_type, body) = if let Some(body) = rest.strip_prefix("K1_") {
        (KeyType::K1, body)
    } else if let Some(body) = rest.strip_prefix("R1_") {
        (KeyType::R1, body)
    } else if rest.starts_with("WA_") {
        return Err(CryptoError::UnsupportedKeyType("WA".to_string()));
    } else {
        return Err(CryptoError::UnknownFormat(s.to_string()));
    };
    let raw = decode_base58(body)?;
    let payload = split_checksum::<N>(&raw)?;
    if ripemd_checksum(&payload, key_type.suffix().as_bytes()) != raw[N..] {
        return Err(CryptoError::ChecksumMismatch(s.to_string()));
    }
    Ok(Some((key_type, payload)))
}

fn decode_base58(s: &str) -> Result<Vec<u8>, CryptoError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| CryptoError::InvalidBase58(e.to_string()))
}

fn split_checksum<const N: usize>(raw: &[u8]) -> Result<[u8; N], CryptoError> {
    if raw.len() != N + 4 {
        return Err(CryptoError::InvalidLength {
            expected: N + 4,
            got: raw.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&raw[..N]);
    Ok(out)
}

fn array_from_slice<const N: usize>(data: &[u8]) -> Result<[u8; N], CryptoError> {
    data.try_into().map_err(|_| CryptoError::InvalidLength {
        expected: N,
        got: data.len(),
    })
}

// ==================== PublicKey ====================

/// Compressed public key tagged with its curve
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    key_type: KeyType,
    data: [u8; PUBLIC_KEY_LEN],
}

impl PublicKey {
    /// Create from a key type and compressed point bytes
    pub fn new(key_type: KeyType, data: [u8; PUBLIC_KEY_LEN]) -> Self {
        PublicKey { key_type, data }
    }

    /// Create from a wire tag and payload
    pub fn from_parts(tag: u8, data: &[u8]) -> Result<Self, CryptoError> {
        Ok(PublicKey::new(KeyType::from_tag(tag)?, array_from_slice(data)?))
    }

    /// Curve
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Compressed point bytes
    pub fn data(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.data
    }

    /// `EOS...` form, only defined for K1 keys
    pub fn to_legacy_string(&self) -> Result<String, CryptoError> {
        if self.key_type != KeyType::K1 {
            return Err(CryptoError::UnsupportedKeyType(self.key_type.to_string()));
        }
        let mut buf = self.data.to_vec();
        buf.extend_from_slice(&ripemd_checksum(&self.data, &[]));
        Ok(format!("{}{}", LEGACY_PUBLIC_PREFIX, bs58::encode(buf).into_string()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_with_suffix("PUB_", self.key_type, &self.data))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((key_type, data)) = decode_with_suffix::<PUBLIC_KEY_LEN>(s, "PUB_")? {
            return Ok(PublicKey::new(key_type, data));
        }
        let body = s
            .strip_prefix(LEGACY_PUBLIC_PREFIX)
            .ok_or_else(|| CryptoError::UnknownFormat(s.to_string()))?;
        let raw = decode_base58(body)?;
        let data = split_checksum::<PUBLIC_KEY_LEN>(&raw)?;
        if ripemd_checksum(&data, &[]) != raw[PUBLIC_KEY_LEN..] {
            return Err(CryptoError::ChecksumMismatch(s.to_string()));
        }
        Ok(PublicKey::new(KeyType::K1, data))
    }
}

// ==================== PrivateKey ====================

/// Private scalar tagged with its curve; wiped on drop
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    key_type: KeyType,
    data: [u8; PRIVATE_KEY_LEN],
}

impl PrivateKey {
    /// Create from a key type and scalar bytes
    pub fn new(key_type: KeyType, data: [u8; PRIVATE_KEY_LEN]) -> Self {
        PrivateKey { key_type, data }
    }

    /// Create from a wire tag and payload
    pub fn from_parts(tag: u8, data: &[u8]) -> Result<Self, CryptoError> {
        Ok(PrivateKey::new(KeyType::from_tag(tag)?, array_from_slice(data)?))
    }

    /// Curve
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Scalar bytes
    pub fn data(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.data
    }

    /// WIF form, only defined for K1 keys
    pub fn to_wif(&self) -> Result<String, CryptoError> {
        if self.key_type != KeyType::K1 {
            return Err(CryptoError::UnsupportedKeyType(self.key_type.to_string()));
        }
        let mut buf = Vec::with_capacity(1 + PRIVATE_KEY_LEN + 4);
        buf.push(WIF_VERSION);
        buf.extend_from_slice(&self.data);
        let check = sha256d_checksum(&buf);
        buf.extend_from_slice(&check);
        let out = bs58::encode(&buf).into_string();
        buf.zeroize();
        Ok(out)
    }

    fn from_wif(s: &str) -> Result<Self, CryptoError> {
        let mut raw = decode_base58(s)?;
        let result = (|| {
            let versioned = split_checksum::<{ 1 + PRIVATE_KEY_LEN }>(&raw)?;
            if versioned[0] != WIF_VERSION {
                return Err(CryptoError::UnknownFormat("WIF version byte".to_string()));
            }
            if sha256d_checksum(&versioned) != raw[1 + PRIVATE_KEY_LEN..] {
                return Err(CryptoError::ChecksumMismatch("WIF private key".to_string()));
            }
            array_from_slice(&versioned[1..]).map(|data| PrivateKey::new(KeyType::K1, data))
        })();
        raw.zeroize();
        result
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_with_suffix("PVT_", self.key_type, &self.data))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}, <redacted>)", self.key_type)
    }
}

impl FromStr for PrivateKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((key_type, data)) = decode_with_suffix::<PRIVATE_KEY_LEN>(s, "PVT_")? {
            return Ok(PrivateKey::new(key_type, data));
        }
        PrivateKey::from_wif(s)
    }
}

// ==================== Signature ====================

/// Compact recoverable signature `[recovery byte, r, s]` tagged with its curve
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    key_type: KeyType,
    data: [u8; SIGNATURE_LEN],
}

impl Signature {
    /// Create from a key type and compact bytes
    pub fn new(key_type: KeyType, data: [u8; SIGNATURE_LEN]) -> Self {
        Signature { key_type, data }
    }

    /// Create from a wire tag and payload
    pub fn from_parts(tag: u8, data: &[u8]) -> Result<Self, CryptoError> {
        Ok(Signature::new(KeyType::from_tag(tag)?, array_from_slice(data)?))
    }

    /// Curve
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Compact bytes
    pub fn data(&self) -> &[u8; SIGNATURE_LEN] {
        &self.data
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_with_suffix("SIG_", self.key_type, &self.data))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl FromStr for Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_with_suffix::<SIGNATURE_LEN>(s, "SIG_")?
            .map(|(key_type, data)| Signature::new(key_type, data))
            .ok_or_else(|| CryptoError::UnknownFormat(s.to_string()))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    macro_rules! string_serde {
        ($ty:ty) => {
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(de::Error::custom)
                }
            }
        };
    }

    string_serde!(PublicKey);
    string_serde!(Signature);
}
