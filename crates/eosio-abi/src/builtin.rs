//! Built-in wire types and their JSON forms

use crate::stream::{Reader, StreamError, Writer};
use eosio_crypto::{KeyType, PrivateKey, PublicKey, Signature};
use eosio_primitives::{
    Asset, BlockTimestamp, Checksum160, Checksum256, Checksum512, Name, Symbol, SymbolCode,
    TimePoint, TimePointSec, MAX_PRECISION,
};
use serde_json::{Map, Number, Value};
use std::fmt::Display;
use std::str::FromStr;

macro_rules! builtins {
    ($($variant:ident => $name:literal,)*) => {
        /// A type the codec knows without any ABI
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Builtin {
            /// Every built-in, in declaration order
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant,)*];

            /// ABI type name
            pub fn name(&self) -> &'static str {
                match self {
                    $(Builtin::$variant => $name,)*
                }
            }

            /// Look up by ABI type name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Builtin::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

builtins! {
    Bool => "bool",
    Int8 => "int8",
    Uint8 => "uint8",
    Int16 => "int16",
    Uint16 => "uint16",
    Int32 => "int32",
    Uint32 => "uint32",
    Int64 => "int64",
    Uint64 => "uint64",
    Int128 => "int128",
    Uint128 => "uint128",
    VarInt32 => "varint32",
    VarUint32 => "varuint32",
    Float32 => "float32",
    Float64 => "float64",
    Float128 => "float128",
    TimePoint => "time_point",
    TimePointSec => "time_point_sec",
    BlockTimestamp => "block_timestamp_type",
    Name => "name",
    Bytes => "bytes",
    String => "string",
    Checksum160 => "checksum160",
    Checksum256 => "checksum256",
    Checksum512 => "checksum512",
    PublicKey => "public_key",
    PrivateKey => "private_key",
    Signature => "signature",
    Symbol => "symbol",
    SymbolCode => "symbol_code",
    Asset => "asset",
    ExtendedAsset => "extended_asset",
}

// ==================== JSON input helpers ====================

pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

fn expected(what: &str, value: &Value) -> String {
    format!("expected {}, got {}", what, describe(value))
}

fn as_str<'v>(value: &'v Value, what: &str) -> Result<&'v str, String> {
    value.as_str().ok_or_else(|| expected(what, value))
}

fn parse_str<T>(value: &Value, what: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    as_str(value, what)?.parse().map_err(|e: T::Err| e.to_string())
}

fn signed(value: &Value) -> Result<i128, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .ok_or_else(|| expected("an integer", value)),
        Value::String(s) => s.trim().parse().map_err(|_| expected("an integer", value)),
        _ => Err(expected("an integer", value)),
    }
}

fn unsigned(value: &Value) -> Result<u128, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| expected("an unsigned integer", value)),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| expected("an unsigned integer", value)),
        _ => Err(expected("an unsigned integer", value)),
    }
}

fn int<T: TryFrom<i128>>(value: &Value, type_name: &str) -> Result<T, String> {
    let v = signed(value)?;
    T::try_from(v).map_err(|_| format!("{} is out of range for {}", v, type_name))
}

fn uint<T: TryFrom<u128>>(value: &Value, type_name: &str) -> Result<T, String> {
    let v = unsigned(value)?;
    T::try_from(v).map_err(|_| format!("{} is out of range for {}", v, type_name))
}

fn float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| expected("a number", value)),
        Value::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other.trim().parse().map_err(|_| expected("a number", value)),
        },
        _ => Err(expected("a number", value)),
    }
}

fn float32(value: &Value) -> Result<f32, String> {
    let wide = float(value)?;
    let narrow = wide as f32;
    if wide.is_finite() && !narrow.is_finite() {
        return Err(format!("{} is out of range for float32", wide));
    }
    Ok(narrow)
}

fn hex_bytes(value: &Value) -> Result<Vec<u8>, String> {
    let s = as_str(value, "a hex string")?;
    hex::decode(s).map_err(|e| format!("invalid hex: {}", e))
}

fn fixed_hex<const N: usize>(value: &Value) -> Result<[u8; N], String> {
    let bytes = hex_bytes(value)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| format!("expected {} bytes of hex, got {}", N, bytes.len()))
}

fn length_prefix(w: &mut Writer, len: usize) -> Result<(), String> {
    let len = u32::try_from(len).map_err(|_| format!("length {} exceeds varuint32", len))?;
    w.put_varuint32(len);
    Ok(())
}

fn parse_asset(value: &Value) -> Result<Asset, String> {
    let asset: Asset = parse_str(value, "an asset string")?;
    Ok(asset)
}

// ==================== JSON output helpers ====================

fn float_value(v: f64) -> Value {
    if v.is_nan() {
        Value::from("NaN")
    } else if v.is_infinite() {
        Value::from(if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

fn checked_asset(r: &mut Reader<'_>, offset: usize) -> Result<Asset, StreamError> {
    let amount = i64::from_le_bytes(r.read_array()?);
    let symbol = Symbol::from_u64(u64::from_le_bytes(r.read_array()?));
    if symbol.precision() > MAX_PRECISION {
        return Err(StreamError::Invalid {
            offset,
            reason: format!("asset precision {} exceeds {}", symbol.precision(), MAX_PRECISION),
        });
    }
    Ok(Asset::new(amount, symbol))
}

fn key_type(r: &mut Reader<'_>) -> Result<KeyType, StreamError> {
    let offset = r.position();
    let tag = r.read_u8()?;
    KeyType::from_tag(tag).map_err(|e| StreamError::Invalid {
        offset,
        reason: e.to_string(),
    })
}

impl Builtin {
    /// Write the wire form of a JSON value. The error is a reason string;
    /// the caller adds the field path.
    pub fn encode(&self, value: &Value, w: &mut Writer) -> Result<(), String> {
        match self {
            Builtin::Bool => match value {
                Value::Bool(b) => w.put_u8(u8::from(*b)),
                _ => return Err(expected("a boolean", value)),
            },
            Builtin::Int8 => w.put_slice(&int::<i8>(value, "int8")?.to_le_bytes()),
            Builtin::Uint8 => w.put_slice(&uint::<u8>(value, "uint8")?.to_le_bytes()),
            Builtin::Int16 => w.put_slice(&int::<i16>(value, "int16")?.to_le_bytes()),
            Builtin::Uint16 => w.put_slice(&uint::<u16>(value, "uint16")?.to_le_bytes()),
            Builtin::Int32 => w.put_slice(&int::<i32>(value, "int32")?.to_le_bytes()),
            Builtin::Uint32 => w.put_slice(&uint::<u32>(value, "uint32")?.to_le_bytes()),
            Builtin::Int64 => w.put_slice(&int::<i64>(value, "int64")?.to_le_bytes()),
            Builtin::Uint64 => w.put_slice(&uint::<u64>(value, "uint64")?.to_le_bytes()),
            Builtin::Int128 => w.put_slice(&signed(value)?.to_le_bytes()),
            Builtin::Uint128 => w.put_slice(&unsigned(value)?.to_le_bytes()),
            Builtin::VarInt32 => w.put_varint32(int::<i32>(value, "varint32")?),
            Builtin::VarUint32 => w.put_varuint32(uint::<u32>(value, "varuint32")?),
            Builtin::Float32 => w.put_slice(&float32(value)?.to_le_bytes()),
            Builtin::Float64 => w.put_slice(&float(value)?.to_le_bytes()),
            Builtin::Float128 => w.put_slice(&fixed_hex::<16>(value)?),
            Builtin::TimePoint => {
                let t: TimePoint = parse_str(value, "a time string")?;
                w.put_slice(&t.as_micros().to_le_bytes());
            }
            Builtin::TimePointSec => {
                let t: TimePointSec = parse_str(value, "a time string")?;
                w.put_slice(&t.as_secs().to_le_bytes());
            }
            Builtin::BlockTimestamp => {
                let t: BlockTimestamp = parse_str(value, "a time string")?;
                w.put_slice(&t.slot().to_le_bytes());
            }
            Builtin::Name => {
                let name: Name = parse_str(value, "a name string")?;
                w.put_slice(&name.to_le_bytes());
            }
            Builtin::Bytes => {
                let bytes = hex_bytes(value)?;
                length_prefix(w, bytes.len())?;
                w.put_slice(&bytes);
            }
            Builtin::String => {
                let s = as_str(value, "a string")?;
                length_prefix(w, s.len())?;
                w.put_slice(s.as_bytes());
            }
            Builtin::Checksum160 => {
                let c: Checksum160 = parse_str(value, "a hex string")?;
                w.put_slice(c.as_bytes());
            }
            Builtin::Checksum256 => {
                let c: Checksum256 = parse_str(value, "a hex string")?;
                w.put_slice(c.as_bytes());
            }
            Builtin::Checksum512 => {
                let c: Checksum512 = parse_str(value, "a hex string")?;
                w.put_slice(c.as_bytes());
            }
            Builtin::PublicKey => {
                let key: PublicKey = parse_str(value, "a public key string")?;
                w.put_u8(key.key_type().tag());
                w.put_slice(key.data());
            }
            Builtin::PrivateKey => {
                let key: PrivateKey = parse_str(value, "a private key string")?;
                w.put_u8(key.key_type().tag());
                w.put_slice(key.data());
            }
            Builtin::Signature => {
                let sig: Signature = parse_str(value, "a signature string")?;
                w.put_u8(sig.key_type().tag());
                w.put_slice(sig.data());
            }
            Builtin::Symbol => {
                let sym: Symbol = parse_str(value, "a symbol string")?;
                w.put_slice(&sym.as_u64().to_le_bytes());
            }
            Builtin::SymbolCode => {
                let code: SymbolCode = parse_str(value, "a symbol code string")?;
                w.put_slice(&code.as_u64().to_le_bytes());
            }
            Builtin::Asset => {
                let asset = parse_asset(value)?;
                w.put_slice(&asset.amount.to_le_bytes());
                w.put_slice(&asset.symbol.as_u64().to_le_bytes());
            }
            Builtin::ExtendedAsset => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| expected("an extended asset object", value))?;
                let quantity = obj
                    .get("quantity")
                    .ok_or_else(|| "missing field \"quantity\"".to_string())?;
                let contract = obj
                    .get("contract")
                    .ok_or_else(|| "missing field \"contract\"".to_string())?;
                let asset = parse_asset(quantity)?;
                let contract: Name = parse_str(contract, "a name string")?;
                w.put_slice(&asset.amount.to_le_bytes());
                w.put_slice(&asset.symbol.as_u64().to_le_bytes());
                w.put_slice(&contract.to_le_bytes());
            }
        }
        Ok(())
    }

    /// Read one value and render its JSON form
    pub fn decode(&self, r: &mut Reader<'_>, strict_bool: bool) -> Result<Value, StreamError> {
        let offset = r.position();
        let value = match self {
            Builtin::Bool => match r.read_u8()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                _ if !strict_bool => Value::Bool(true),
                other => {
                    return Err(StreamError::Invalid {
                        offset,
                        reason: format!("invalid bool byte {:#04x}", other),
                    })
                }
            },
            Builtin::Int8 => Value::from(i8::from_le_bytes(r.read_array()?)),
            Builtin::Uint8 => Value::from(r.read_u8()?),
            Builtin::Int16 => Value::from(i16::from_le_bytes(r.read_array()?)),
            Builtin::Uint16 => Value::from(u16::from_le_bytes(r.read_array()?)),
            Builtin::Int32 => Value::from(i32::from_le_bytes(r.read_array()?)),
            Builtin::Uint32 => Value::from(u32::from_le_bytes(r.read_array()?)),
            Builtin::Int64 => Value::from(i64::from_le_bytes(r.read_array()?).to_string()),
            Builtin::Uint64 => Value::from(u64::from_le_bytes(r.read_array()?).to_string()),
            Builtin::Int128 => Value::from(i128::from_le_bytes(r.read_array()?).to_string()),
            Builtin::Uint128 => Value::from(u128::from_le_bytes(r.read_array()?).to_string()),
            Builtin::VarInt32 => Value::from(r.read_varint32()?),
            Builtin::VarUint32 => Value::from(r.read_varuint32()?),
            Builtin::Float32 => {
                let v = f32::from_le_bytes(r.read_array()?);
                // shortest f32 text, widened without picking up f64 noise
                float_value(v.to_string().parse::<f64>().unwrap_or(f64::from(v)))
            }
            Builtin::Float64 => float_value(f64::from_le_bytes(r.read_array()?)),
            Builtin::Float128 => Value::from(hex::encode(r.read_array::<16>()?)),
            Builtin::TimePoint => {
                let t = TimePoint::from_micros(i64::from_le_bytes(r.read_array()?));
                if !t.is_representable() {
                    return Err(StreamError::Invalid {
                        offset,
                        reason: format!("time_point {} is out of range", t.as_micros()),
                    });
                }
                Value::from(t.to_string())
            }
            Builtin::TimePointSec => {
                let t = TimePointSec::from_secs(u32::from_le_bytes(r.read_array()?));
                Value::from(t.to_string())
            }
            Builtin::BlockTimestamp => {
                let t = BlockTimestamp::from_slot(u32::from_le_bytes(r.read_array()?));
                Value::from(t.to_string())
            }
            Builtin::Name => Value::from(Name::from_le_bytes(r.read_array()?).to_string()),
            Builtin::Bytes => {
                let len = r.read_varuint32()? as usize;
                Value::from(hex::encode(r.read_slice(len)?))
            }
            Builtin::String => {
                let len = r.read_varuint32()? as usize;
                let bytes = r.read_slice(len)?;
                let s = std::str::from_utf8(bytes).map_err(|e| StreamError::Invalid {
                    offset,
                    reason: format!("invalid UTF-8 in string: {}", e),
                })?;
                Value::from(s)
            }
            Builtin::Checksum160 => {
                Value::from(Checksum160::from_bytes(r.read_array()?).to_hex())
            }
            Builtin::Checksum256 => {
                Value::from(Checksum256::from_bytes(r.read_array()?).to_hex())
            }
            Builtin::Checksum512 => {
                Value::from(Checksum512::from_bytes(r.read_array()?).to_hex())
            }
            Builtin::PublicKey => {
                let key_type = key_type(r)?;
                Value::from(PublicKey::new(key_type, r.read_array()?).to_string())
            }
            Builtin::PrivateKey => {
                let key_type = key_type(r)?;
                Value::from(PrivateKey::new(key_type, r.read_array()?).to_string())
            }
            Builtin::Signature => {
                let key_type = key_type(r)?;
                Value::from(Signature::new(key_type, r.read_array()?).to_string())
            }
            Builtin::Symbol => {
                Value::from(Symbol::from_u64(u64::from_le_bytes(r.read_array()?)).to_string())
            }
            Builtin::SymbolCode => {
                Value::from(SymbolCode::from_u64(u64::from_le_bytes(r.read_array()?)).to_string())
            }
            Builtin::Asset => Value::from(checked_asset(r, offset)?.to_string()),
            Builtin::ExtendedAsset => {
                let asset = checked_asset(r, offset)?;
                let contract = Name::from_le_bytes(r.read_array()?);
                let mut obj = Map::new();
                obj.insert("quantity".to_string(), Value::from(asset.to_string()));
                obj.insert("contract".to_string(), Value::from(contract.to_string()));
                Value::Object(obj)
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enc(ty: Builtin, value: Value) -> String {
        let mut w = Writer::new();
        ty.encode(&value, &mut w).unwrap();
        hex::encode(w.into_bytes())
    }

    fn dec(ty: Builtin, hex_str: &str) -> Value {
        let bytes = hex::decode(hex_str).unwrap();
        let mut r = Reader::new(&bytes);
        let v = ty.decode(&mut r, true).unwrap();
        assert!(r.is_empty(), "{} left bytes", ty.name());
        v
    }

    // ==================== Names ====================

    #[test]
    fn test_builtin_names_roundtrip() {
        for b in Builtin::ALL {
            assert_eq!(Builtin::from_name(b.name()), Some(*b));
        }
        assert_eq!(Builtin::ALL.len(), 32);
        assert_eq!(Builtin::from_name("uint256"), None);
    }

    // ==================== Integers ====================

    #[test]
    fn test_fixed_integers() {
        assert_eq!(enc(Builtin::Int8, json!(-1)), "ff");
        assert_eq!(enc(Builtin::Uint16, json!(0x1234)), "3412");
        assert_eq!(enc(Builtin::Int32, json!("-2")), "feffffff");
        assert_eq!(enc(Builtin::Uint64, json!("18446744073709551615")), "ffffffffffffffff");
        assert_eq!(dec(Builtin::Uint32, "78563412"), json!(0x12345678));
        assert_eq!(dec(Builtin::Int64, "feffffffffffffff"), json!("-2"));
    }

    #[test]
    fn test_integer_out_of_range() {
        let mut w = Writer::new();
        assert!(Builtin::Uint8.encode(&json!(256), &mut w).is_err());
        assert!(Builtin::Uint32.encode(&json!(-1), &mut w).is_err());
        assert!(Builtin::Int16.encode(&json!("abc"), &mut w).is_err());
        assert!(Builtin::Int32.encode(&json!(1.5), &mut w).is_err());
        assert!(w.is_empty());
    }

    #[test]
    fn test_128_bit_integers() {
        let max = u128::MAX.to_string();
        assert_eq!(enc(Builtin::Uint128, json!(max)), "ff".repeat(16));
        assert_eq!(dec(Builtin::Uint128, &"ff".repeat(16)), json!(max));
        let min = i128::MIN.to_string();
        let hex_str = enc(Builtin::Int128, json!(min));
        assert_eq!(dec(Builtin::Int128, &hex_str), json!(min));
    }

    #[test]
    fn test_varints() {
        assert_eq!(enc(Builtin::VarUint32, json!(300)), "ac02");
        assert_eq!(enc(Builtin::VarInt32, json!(-3)), "05");
        assert_eq!(dec(Builtin::VarUint32, "ac02"), json!(300));
    }

    // ==================== Bool ====================

    #[test]
    fn test_bool_strict_and_permissive() {
        assert_eq!(enc(Builtin::Bool, json!(true)), "01");
        assert_eq!(dec(Builtin::Bool, "00"), json!(false));

        let mut r = Reader::new(&[0x02]);
        assert!(matches!(
            Builtin::Bool.decode(&mut r, true),
            Err(StreamError::Invalid { offset: 0, .. })
        ));
        let mut r = Reader::new(&[0x02]);
        assert_eq!(Builtin::Bool.decode(&mut r, false).unwrap(), json!(true));
    }

    // ==================== Floats ====================

    #[test]
    fn test_floats() {
        assert_eq!(enc(Builtin::Float64, json!(1.5)), "000000000000f83f");
        assert_eq!(dec(Builtin::Float64, "000000000000f83f"), json!(1.5));
        let f32_hex = enc(Builtin::Float32, json!(1.1));
        assert_eq!(dec(Builtin::Float32, &f32_hex), json!(1.1));
    }

    #[test]
    fn test_non_finite_floats() {
        let nan = enc(Builtin::Float64, json!("NaN"));
        assert_eq!(dec(Builtin::Float64, &nan), json!("NaN"));
        let inf = enc(Builtin::Float32, json!("-Infinity"));
        assert_eq!(dec(Builtin::Float32, &inf), json!("-Infinity"));
    }

    #[test]
    fn test_float32_rejects_finite_overflow() {
        for value in [json!(1e39), json!(-1e39), json!("1e39")] {
            let mut w = Writer::new();
            let err = Builtin::Float32.encode(&value, &mut w).unwrap_err();
            assert!(err.contains("out of range for float32"), "{err}");
        }
        assert_eq!(enc(Builtin::Float32, json!(3.4e38)), hex::encode(3.4e38f32.to_le_bytes()));
    }

    // ==================== Strings and bytes ====================

    #[test]
    fn test_string_and_bytes() {
        assert_eq!(enc(Builtin::String, json!("hi")), "026869");
        assert_eq!(enc(Builtin::String, json!("")), "00");
        assert_eq!(enc(Builtin::Bytes, json!("A0FF")), "02a0ff");
        assert_eq!(dec(Builtin::Bytes, "02a0ff"), json!("a0ff"));
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut r = Reader::new(&[0x02, 0xff, 0xfe]);
        assert!(matches!(
            Builtin::String.decode(&mut r, true),
            Err(StreamError::Invalid { .. })
        ));
    }

    #[test]
    fn test_bytes_truncated() {
        let mut r = Reader::new(&[0x05, 0x01]);
        assert!(matches!(
            Builtin::Bytes.decode(&mut r, true),
            Err(StreamError::UnexpectedEof { offset: 1, needed: 5, .. })
        ));
    }

    // ==================== Chain types ====================

    #[test]
    fn test_name_and_asset() {
        assert_eq!(enc(Builtin::Name, json!("alice")), "0000000000855c34");
        assert_eq!(
            enc(Builtin::Asset, json!("1.0000 SYS")),
            "10270000000000000453595300000000"
        );
        assert_eq!(
            dec(Builtin::Asset, "10270000000000000453595300000000"),
            json!("1.0000 SYS")
        );
        assert_eq!(enc(Builtin::Symbol, json!("4,SYS")), "0453595300000000");
        assert_eq!(enc(Builtin::SymbolCode, json!("SYS")), "5359530000000000");
    }

    #[test]
    fn test_extended_asset() {
        let value = json!({"quantity": "1.0000 SYS", "contract": "eosio.token"});
        let hex_str = enc(Builtin::ExtendedAsset, value.clone());
        assert_eq!(&hex_str[32..], "00a6823403ea3055");
        assert_eq!(dec(Builtin::ExtendedAsset, &hex_str), value);
    }

    #[test]
    fn test_asset_bad_precision_on_wire() {
        let mut bytes = vec![0u8; 8];
        bytes.extend_from_slice(&[40, b'S', b'Y', b'S', 0, 0, 0, 0]);
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            Builtin::Asset.decode(&mut r, true),
            Err(StreamError::Invalid { .. })
        ));
    }

    #[test]
    fn test_time_types() {
        assert_eq!(enc(Builtin::TimePointSec, json!("2019-02-26T18:31:50")), "1686755c");
        assert_eq!(dec(Builtin::TimePointSec, "1686755c"), json!("2019-02-26T18:31:50.000"));
        let tp = enc(Builtin::TimePoint, json!("2019-02-26T18:31:50.123"));
        assert_eq!(dec(Builtin::TimePoint, &tp), json!("2019-02-26T18:31:50.123"));
        let bt = enc(Builtin::BlockTimestamp, json!("2019-02-26T18:31:50.500"));
        assert_eq!(bt, hex::encode(1_209_042_221u32.to_le_bytes()));
    }

    #[test]
    fn test_public_key_wire() {
        let hex_str = enc(
            Builtin::PublicKey,
            json!("EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV"),
        );
        assert_eq!(
            hex_str,
            "0002c0ded2bc1f1305fb0faac5e6c03ee3a1924234985427b6167ca569d13df435cf"
        );
        assert_eq!(
            dec(Builtin::PublicKey, &hex_str),
            json!("PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63")
        );
    }

    #[test]
    fn test_key_with_unsupported_tag() {
        let mut bytes = vec![2u8];
        bytes.extend_from_slice(&[0u8; 33]);
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            Builtin::PublicKey.decode(&mut r, true),
            Err(StreamError::Invalid { offset: 0, .. })
        ));
    }

    #[test]
    fn test_checksums() {
        let digest = "aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906";
        assert_eq!(enc(Builtin::Checksum256, json!(digest.to_uppercase())), digest);
        assert_eq!(dec(Builtin::Checksum256, digest), json!(digest));
        let mut w = Writer::new();
        assert!(Builtin::Checksum160.encode(&json!(digest), &mut w).is_err());
    }
}
