//! Token symbols and amounts

use crate::name::{Name, NameError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Symbol or asset parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Symbol code is empty, longer than 7 characters, or not `A-Z`
    #[error("invalid symbol code \"{0}\"")]
    InvalidSymbolCode(String),
    /// Precision above 18 or not a number
    #[error("invalid symbol precision \"{0}\"")]
    InvalidPrecision(String),
    /// Symbol string is not `precision,CODE`
    #[error("invalid symbol \"{0}\"")]
    InvalidSymbol(String),
    /// Amount is not a decimal number
    #[error("invalid asset amount \"{0}\"")]
    InvalidAmount(String),
    /// Amount does not fit in 63 bits plus sign
    #[error("asset amount \"{0}\" overflows")]
    AmountOverflow(String),
    /// Asset string is not `AMOUNT CODE`
    #[error("invalid asset \"{0}\"")]
    InvalidAsset(String),
    /// Extended asset contract name
    #[error("invalid contract name: {0}")]
    Contract(#[from] NameError),
}

/// Maximum number of decimal places a symbol may carry
pub const MAX_PRECISION: u8 = 18;

/// Up to 7 uppercase letters, first character in the low byte
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SymbolCode(u64);

impl SymbolCode {
    /// Wrap a raw value
    pub const fn from_u64(value: u64) -> Self {
        SymbolCode(value)
    }

    /// Raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parse `A-Z{1,7}`
    pub fn new(s: &str) -> Result<Self, AssetError> {
        if s.is_empty() || s.len() > 7 || !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(AssetError::InvalidSymbolCode(s.to_string()));
        }
        let value = s
            .bytes()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | (u64::from(b) << (8 * i)));
        Ok(SymbolCode(value))
    }

    /// Whether every byte up to the first zero is `A-Z` and nothing follows it
    pub fn is_valid(&self) -> bool {
        let mut v = self.0;
        while v & 0xff != 0 {
            if !(v as u8).is_ascii_uppercase() {
                return false;
            }
            v >>= 8;
        }
        v == 0 && self.0 != 0
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut v = self.0;
        while v & 0xff != 0 {
            write!(f, "{}", (v & 0xff) as u8 as char)?;
            v >>= 8;
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolCode({})", self)
    }
}

impl FromStr for SymbolCode {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymbolCode::new(s)
    }
}

/// Precision in the low byte, symbol code in the upper seven
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Symbol(u64);

impl Symbol {
    /// Combine precision and code
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self, AssetError> {
        if precision > MAX_PRECISION {
            return Err(AssetError::InvalidPrecision(precision.to_string()));
        }
        Ok(Symbol(u64::from(precision) | (code.as_u64() << 8)))
    }

    /// Wrap a raw value
    pub const fn from_u64(value: u64) -> Self {
        Symbol(value)
    }

    /// Raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Number of decimal places
    pub const fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Symbol code
    pub const fn code(&self) -> SymbolCode {
        SymbolCode(self.0 >> 8)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl FromStr for Symbol {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .trim()
            .split_once(',')
            .ok_or_else(|| AssetError::InvalidSymbol(s.to_string()))?;
        let precision: u8 = precision
            .parse()
            .map_err(|_| AssetError::InvalidPrecision(precision.to_string()))?;
        Symbol::new(precision, SymbolCode::new(code)?)
    }
}

/// Signed amount in the symbol's smallest unit
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Asset {
    /// Amount scaled by `10^precision`
    pub amount: i64,
    /// Symbol
    pub symbol: Symbol,
}

impl Asset {
    /// Create an asset
    pub const fn new(amount: i64, symbol: Symbol) -> Self {
        Asset { amount, symbol }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = u32::from(self.symbol.precision());
        let abs = self.amount.unsigned_abs();
        let sign = if self.amount < 0 { "-" } else { "" };
        if precision == 0 {
            return write!(f, "{}{} {}", sign, abs, self.symbol.code());
        }
        let scale = 10u128.checked_pow(precision).ok_or(fmt::Error)?;
        let int = u128::from(abs) / scale;
        let frac = u128::from(abs) % scale;
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            int,
            frac,
            self.symbol.code(),
            width = precision as usize
        )
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({})", self)
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount_str, code) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| AssetError::InvalidAsset(s.to_string()))?;
        let code = SymbolCode::new(code.trim())?;

        let (negative, digits) = match amount_str.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, amount_str),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty()
            || (digits.contains('.') && frac_part.is_empty())
            || !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(AssetError::InvalidAmount(amount_str.to_string()));
        }
        let precision = u8::try_from(frac_part.len())
            .ok()
            .filter(|p| *p <= MAX_PRECISION)
            .ok_or_else(|| AssetError::InvalidPrecision(frac_part.len().to_string()))?;

        let mut magnitude: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            magnitude = magnitude * 10 + i128::from(b - b'0');
            if magnitude > i128::from(i64::MAX) + 1 {
                return Err(AssetError::AmountOverflow(amount_str.to_string()));
            }
        }
        let signed = if negative { -magnitude } else { magnitude };
        let amount =
            i64::try_from(signed).map_err(|_| AssetError::AmountOverflow(amount_str.to_string()))?;

        Ok(Asset::new(amount, Symbol::new(precision, code)?))
    }
}

/// An asset together with the token contract that issued it
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct ExtendedAsset {
    /// Quantity
    pub quantity: Asset,
    /// Issuing contract
    pub contract: Name,
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

    string_serde!(SymbolCode);
    string_serde!(Symbol);
    string_serde!(Asset);
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Symbol ====================

    #[test]
    fn test_symbol_code() {
        let code = SymbolCode::new("SYS").unwrap();
        assert_eq!(code.as_u64(), 0x535953);
        assert_eq!(code.to_string(), "SYS");
        assert!(code.is_valid());
    }

    #[test]
    fn test_symbol_code_rejects() {
        assert!(SymbolCode::new("").is_err());
        assert!(SymbolCode::new("sys").is_err());
        assert!(SymbolCode::new("ABCDEFGH").is_err());
        assert!(SymbolCode::new("A1").is_err());
    }

    #[test]
    fn test_symbol_parse_display() {
        let sym: Symbol = "4,SYS".parse().unwrap();
        assert_eq!(sym.precision(), 4);
        assert_eq!(sym.code().to_string(), "SYS");
        assert_eq!(hex::encode(sym.as_u64().to_le_bytes()), "0453595300000000");
        assert_eq!(sym.to_string(), "4,SYS");
    }

    #[test]
    fn test_symbol_precision_limit() {
        assert!("18,MAX".parse::<Symbol>().is_ok());
        assert!(matches!(
            "19,MAX".parse::<Symbol>(),
            Err(AssetError::InvalidPrecision(_))
        ));
        assert!("SYS".parse::<Symbol>().is_err());
    }

    // ==================== Asset ====================

    #[test]
    fn test_asset_parse() {
        let a: Asset = "1.0000 SYS".parse().unwrap();
        assert_eq!(a.amount, 10_000);
        assert_eq!(a.symbol.precision(), 4);
        assert_eq!(a.to_string(), "1.0000 SYS");
    }

    #[test]
    fn test_asset_roundtrip_strings() {
        for s in ["0.0001 EOS", "-12.50 ABC", "100 ZERO", "0.000000000000000001 TINY", "-0.0100 X"] {
            assert_eq!(s.parse::<Asset>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_asset_extremes() {
        let max = Asset::new(i64::MAX, Symbol::new(4, SymbolCode::new("SYS").unwrap()).unwrap());
        assert_eq!(max.to_string(), "922337203685477.5807 SYS");
        assert_eq!(max.to_string().parse::<Asset>().unwrap(), max);

        let min = Asset::new(i64::MIN, Symbol::new(0, SymbolCode::new("SYS").unwrap()).unwrap());
        assert_eq!(min.to_string().parse::<Asset>().unwrap(), min);
    }

    #[test]
    fn test_asset_rejects() {
        assert!(matches!("1.0000".parse::<Asset>(), Err(AssetError::InvalidAsset(_))));
        assert!(matches!("1.x SYS".parse::<Asset>(), Err(AssetError::InvalidAmount(_))));
        assert!(matches!(".5 SYS".parse::<Asset>(), Err(AssetError::InvalidAmount(_))));
        assert!(matches!("1. SYS".parse::<Asset>(), Err(AssetError::InvalidAmount(_))));
        assert!(matches!(
            "99999999999999999999 SYS".parse::<Asset>(),
            Err(AssetError::AmountOverflow(_))
        ));
        assert!("1.0 sys".parse::<Asset>().is_err());
    }
}
