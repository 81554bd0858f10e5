//! ABI document model, as found in `abi.json` files and `abi_def` binaries

use crate::AbiError;
use eosio_primitives::Name;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Prefix every supported ABI version string starts with
pub const ABI_VERSION_PREFIX: &str = "eosio::abi/1.";

/// `new_type_name` is another name for `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Alias
    pub new_type_name: String,
    /// Target type
    #[serde(rename = "type")]
    pub ty: String,
}

/// One struct field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub ty: String,
}

/// Struct with an optional single base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    /// Struct name
    pub name: String,
    /// Base struct, empty for none
    #[serde(default)]
    pub base: String,
    /// Own fields, in wire order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Action name to payload type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    /// Action name
    pub name: Name,
    /// Payload type
    #[serde(rename = "type")]
    pub ty: String,
    /// Ricardian contract text
    #[serde(default)]
    pub ricardian_contract: String,
}

/// Table name to row type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name
    pub name: Name,
    /// Primary index type, e.g. `i64`
    #[serde(default)]
    pub index_type: String,
    /// Key names
    #[serde(default)]
    pub key_names: Vec<String>,
    /// Key types
    #[serde(default)]
    pub key_types: Vec<String>,
    /// Row type
    #[serde(rename = "type")]
    pub ty: String,
}

/// Ricardian clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePair {
    /// Clause id
    pub id: String,
    /// Clause text
    pub body: String,
}

/// Contract error code and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Error code
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub error_code: u64,
    /// Message
    pub error_msg: String,
}

/// Opaque ABI extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiExtension {
    /// Extension tag
    #[serde(rename = "type")]
    pub ty: u16,
    /// Payload as hex
    pub data: String,
}

/// Tagged union over a closed list of types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    /// Variant name
    pub name: String,
    /// Member type names; the wire tag is the index into this list
    #[serde(default)]
    pub types: Vec<String>,
}

/// Action name to return value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResultDef {
    /// Action name
    pub name: Name,
    /// Return value type
    pub result_type: String,
}

/// A parsed ABI.
///
/// `variants` and `action_results` are trailing binary extensions in the
/// `abi_def` layout, so `None` and an empty list are different wire images.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiDocument {
    /// `eosio::abi/1.x`
    #[serde(default)]
    pub version: String,
    /// Type aliases
    #[serde(default)]
    pub types: Vec<TypeDef>,
    /// Structs
    #[serde(default)]
    pub structs: Vec<StructDef>,
    /// Actions
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    /// Tables
    #[serde(default)]
    pub tables: Vec<TableDef>,
    /// Ricardian clauses
    #[serde(default)]
    pub ricardian_clauses: Vec<ClausePair>,
    /// Error messages
    #[serde(default)]
    pub error_messages: Vec<ErrorMessage>,
    /// Extensions
    #[serde(default)]
    pub abi_extensions: Vec<AbiExtension>,
    /// Variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantDef>>,
    /// Action return types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_results: Option<Vec<ActionResultDef>>,
}

impl AbiDocument {
    /// Parse the JSON form
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        serde_json::from_str(json).map_err(|e| AbiError::schema(format!("malformed ABI JSON: {}", e)))
    }

    /// Render the JSON form
    pub fn to_json(&self) -> Result<String, AbiError> {
        serde_json::to_string(self).map_err(|e| AbiError::schema(e.to_string()))
    }

    /// Variants, or an empty slice when absent
    pub fn variants(&self) -> &[VariantDef] {
        self.variants.as_deref().unwrap_or(&[])
    }

    /// Action results, or an empty slice when absent
    pub fn action_results(&self) -> &[ActionResultDef] {
        self.action_results.as_deref().unwrap_or(&[])
    }

    /// Check the version string, if one is given
    pub fn check_version(&self) -> Result<(), AbiError> {
        if self.version.is_empty() || self.version.starts_with(ABI_VERSION_PREFIX) {
            Ok(())
        } else {
            Err(AbiError::schema(format!(
                "unsupported ABI version \"{}\"",
                self.version
            )))
        }
    }
}

fn u64_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(de::Error::custom),
    }
}
