//! Actions and their authorizations

use eosio_abi::{AbiContext, AbiDocument};
use eosio_primitives::Name;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::SdkError;

/// Account and permission authorizing an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    /// Authorizing account
    pub actor: Name,
    /// Permission of that account, usually `active`
    pub permission: Name,
}

impl PermissionLevel {
    /// Create a permission level
    pub fn new(actor: Name, permission: Name) -> Self {
        Self { actor, permission }
    }

    /// Parse both names
    pub fn parse(actor: &str, permission: &str) -> Result<Self, SdkError> {
        Ok(Self::new(Name::new(actor)?, Name::new(permission)?))
    }
}

/// Payload of an action, before or after packing against the contract ABI
#[derive(Debug, Clone, PartialEq)]
pub enum ActionData {
    /// JSON matching the action's ABI type
    Unserialized(Value),
    /// Packed bytes
    Serialized(Vec<u8>),
}

/// One contract call in a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Contract account
    pub account: Name,
    /// Action name
    pub name: Name,
    /// Authorizations
    pub authorization: Vec<PermissionLevel>,
    data: ActionData,
}

impl Action {
    /// Create an action with JSON data
    pub fn new(account: Name, name: Name, authorization: Vec<PermissionLevel>, data: Value) -> Self {
        Self {
            account,
            name,
            authorization,
            data: ActionData::Unserialized(data),
        }
    }

    /// Create an action with already packed data
    pub fn with_serialized_data(
        account: Name,
        name: Name,
        authorization: Vec<PermissionLevel>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            account,
            name,
            authorization,
            data: ActionData::Serialized(data),
        }
    }

    /// Current payload
    pub fn data(&self) -> &ActionData {
        &self.data
    }

    /// Check if the payload is packed
    pub fn is_data_serialized(&self) -> bool {
        matches!(self.data, ActionData::Serialized(_))
    }

    /// Packed payload, if packed
    pub fn serialized_data(&self) -> Option<&[u8]> {
        match &self.data {
            ActionData::Serialized(bytes) => Some(bytes),
            ActionData::Unserialized(_) => None,
        }
    }

    /// JSON payload, if not packed
    pub fn unserialized_data(&self) -> Option<&Value> {
        match &self.data {
            ActionData::Unserialized(value) => Some(value),
            ActionData::Serialized(_) => None,
        }
    }

    /// Pack the JSON payload against the contract's ABI. Does nothing if
    /// the payload is already packed.
    pub fn serialize_data(&mut self, ctx: &AbiContext, abi: &AbiDocument) -> Result<(), SdkError> {
        let value = match &self.data {
            ActionData::Serialized(_) => return Ok(()),
            ActionData::Unserialized(value) => value,
        };
        let hex_data = ctx.serialize(
            Some(self.account),
            &self.name.to_string(),
            &value.to_string(),
            abi,
        )?;
        debug!(account = %self.account, name = %self.name, len = hex_data.len() / 2, "action data serialized");
        self.data = ActionData::Serialized(hex::decode(hex_data)?);
        Ok(())
    }

    /// Unpack the payload against the contract's ABI. Does nothing if the
    /// payload is already JSON.
    pub fn deserialize_data(&mut self, ctx: &AbiContext, abi: &AbiDocument) -> Result<(), SdkError> {
        let bytes = match &self.data {
            ActionData::Unserialized(_) => return Ok(()),
            ActionData::Serialized(bytes) => bytes,
        };
        let json = ctx.deserialize(
            Some(self.account),
            &self.name.to_string(),
            &hex::encode(bytes),
            abi,
        )?;
        self.data = ActionData::Unserialized(serde_json::from_str(&json)?);
        Ok(())
    }

    /// The `action` struct of the transaction ABI; data must be packed
    pub(crate) fn to_packed_json(&self) -> Result<Value, SdkError> {
        let data = self.serialized_data().ok_or(SdkError::UnserializedAction {
            account: self.account,
            name: self.name,
        })?;
        Ok(json!({
            "account": self.account,
            "name": self.name,
            "authorization": self.authorization,
            "data": hex::encode(data),
        }))
    }

    /// Inverse of [`Action::to_packed_json`]
    pub(crate) fn from_packed_json(value: Value) -> Result<Self, SdkError> {
        #[derive(Deserialize)]
        struct Packed {
            account: Name,
            name: Name,
            authorization: Vec<PermissionLevel>,
            data: String,
        }

        let packed: Packed = serde_json::from_value(value)?;
        Ok(Self::with_serialized_data(
            packed.account,
            packed.name,
            packed.authorization,
            hex::decode(packed.data)?,
        ))
    }
}
