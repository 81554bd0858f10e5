//! Account, action and table names packed into 64 bits

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// More than 13 characters
    #[error("name \"{0}\" is longer than 13 characters")]
    TooLong(String),
    /// Character outside `a-z`, `1-5` and `.`
    #[error("name \"{name}\" contains invalid character '{ch}'")]
    InvalidChar {
        /// Offending name
        name: String,
        /// Offending character
        ch: char,
    },
    /// The 13th character only has 4 bits available
    #[error("13th character of name \"{0}\" must be one of '.', '1'-'5', 'a'-'j'")]
    InvalidLastChar(String),
    /// A trailing '.' would not survive a decode
    #[error("name \"{0}\" ends with '.'")]
    TrailingDot(String),
}

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// A chain name: up to 13 characters of `[.1-5a-z]` packed 5 bits each
/// (4 bits for the 13th) into a `u64`, first character in the high bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name(u64);

impl Name {
    /// Maximum number of characters
    pub const MAX_LEN: usize = 13;

    /// The empty name (value 0)
    pub const EMPTY: Name = Name(0);

    /// Wrap a raw 64-bit value. Every value decodes to some name.
    pub const fn from_u64(value: u64) -> Self {
        Name(value)
    }

    /// Raw 64-bit value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parse and pack a name string
    pub fn new(s: &str) -> Result<Self, NameError> {
        if s.len() > Self::MAX_LEN {
            return Err(NameError::TooLong(s.to_string()));
        }
        if s.ends_with('.') {
            return Err(NameError::TrailingDot(s.to_string()));
        }

        let mut value: u64 = 0;
        for (i, ch) in s.chars().enumerate() {
            let symbol = char_to_symbol(ch).ok_or_else(|| NameError::InvalidChar {
                name: s.to_string(),
                ch,
            })?;
            if i < 12 {
                value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
            } else {
                if symbol > 0x0f {
                    return Err(NameError::InvalidLastChar(s.to_string()));
                }
                value |= symbol;
            }
        }
        Ok(Name(value))
    }

    /// Check if this is the empty name
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Little-endian wire bytes
    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Read from little-endian wire bytes
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Name(u64::from_le_bytes(bytes))
    }
}

fn char_to_symbol(ch: char) -> Option<u64> {
    match ch {
        'a'..='z' => Some(ch as u64 - 'a' as u64 + 6),
        '1'..='5' => Some(ch as u64 - '1' as u64 + 1),
        '.' => Some(0),
        _ => None,
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = [b'.'; 13];
        let mut tmp = self.0;
        for i in 0..13 {
            let mask = if i == 0 { 0x0f } else { 0x1f };
            out[12 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= if i == 0 { 4 } else { 5 };
        }
        let len = out.iter().rposition(|&c| c != b'.').map_or(0, |p| p + 1);
        // CHARMAP is ASCII
        f.write_str(std::str::from_utf8(&out[..len]).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = NameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Name::new(s)
    }
}

impl From<Name> for u64 {
    fn from(name: Name) -> u64 {
        name.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Name {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Name {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Name::new(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Known encodings ====================

    #[test]
    fn test_name_known_values() {
        assert_eq!(Name::new("eosio").unwrap().as_u64(), 0x5530ea0000000000);
        assert_eq!(Name::new("eosio.token").unwrap().as_u64(), 0x5530ea033482a600);
        assert_eq!(Name::new("alice").unwrap().as_u64(), 0x345c850000000000);
        assert_eq!(Name::new("active").unwrap().as_u64(), 0x3232eda800000000);
        assert_eq!(Name::new("a").unwrap().as_u64(), 0x3000000000000000);
        assert_eq!(Name::new("1").unwrap().as_u64(), 0x0800000000000000);
    }

    #[test]
    fn test_name_wire_bytes() {
        let name = Name::new("transfer").unwrap();
        assert_eq!(hex::encode(name.to_le_bytes()), "000000572d3ccdcd");
        assert_eq!(Name::from_le_bytes(name.to_le_bytes()), name);
    }

    #[test]
    fn test_name_max_value() {
        let name = Name::new("zzzzzzzzzzzzj").unwrap();
        assert_eq!(name.as_u64(), u64::MAX);
        assert_eq!(name.to_string(), "zzzzzzzzzzzzj");
    }

    #[test]
    fn test_name_empty() {
        let name = Name::new("").unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "");
        assert_eq!(Name::EMPTY, name);
    }

    // ==================== Display ====================

    #[test]
    fn test_name_display_roundtrip() {
        for s in ["eosio", "eosio.token", "cryptkeeper", "brandon", "a.b.c", "12345abcdefgh"] {
            assert_eq!(Name::new(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_name_display_any_value() {
        // Every u64 decodes; re-encoding the decoded string gives the value back
        for v in [1u64, 0x0f, 0x10, 0xdead_beef, 0x8000_0000_0000_0000] {
            let s = Name::from_u64(v).to_string();
            assert_eq!(Name::new(&s).unwrap().as_u64(), v, "value {v:#x} via {s}");
        }
    }

    // ==================== Rejections ====================

    #[test]
    fn test_name_too_long() {
        assert!(matches!(
            Name::new("aaaaaaaaaaaaaa"),
            Err(NameError::TooLong(_))
        ));
    }

    #[test]
    fn test_name_invalid_chars() {
        assert!(matches!(Name::new("Alice"), Err(NameError::InvalidChar { ch: 'A', .. })));
        assert!(matches!(Name::new("bob6"), Err(NameError::InvalidChar { ch: '6', .. })));
        assert!(matches!(Name::new("bo b"), Err(NameError::InvalidChar { ch: ' ', .. })));
        assert!(Name::new("ali-ce").is_err());
    }

    #[test]
    fn test_name_invalid_13th_char() {
        assert!(Name::new("aaaaaaaaaaaaj").is_ok());
        assert!(matches!(
            Name::new("aaaaaaaaaaaak"),
            Err(NameError::InvalidLastChar(_))
        ));
    }

    #[test]
    fn test_name_trailing_dot() {
        assert!(matches!(Name::new("eosio."), Err(NameError::TrailingDot(_))));
        assert!(Name::new(".eosio").is_ok());
    }
}
