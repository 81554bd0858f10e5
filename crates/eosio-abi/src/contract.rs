//! One contract's loaded ABI

use crate::convert;
use crate::{AbiDocument, AbiError, ContextConfig, TypeTable};
use eosio_primitives::Name;
use serde_json::Value;
use std::collections::HashMap;

/// A validated ABI with its resolved types and action/table lookups
#[derive(Debug, Clone)]
pub struct Contract {
    document: AbiDocument,
    types: TypeTable,
    actions: HashMap<Name, String>,
    tables: HashMap<Name, String>,
    action_results: HashMap<Name, String>,
}

impl Contract {
    /// Validate and resolve a document
    pub fn new(document: AbiDocument) -> Result<Self, AbiError> {
        document.check_version()?;
        let types = TypeTable::build(&document)?;
        let actions = document
            .actions
            .iter()
            .map(|a| (a.name, a.ty.clone()))
            .collect();
        let tables = document
            .tables
            .iter()
            .map(|t| (t.name, t.ty.clone()))
            .collect();
        let action_results = document
            .action_results()
            .iter()
            .map(|r| (r.name, r.result_type.clone()))
            .collect();
        Ok(Contract {
            document,
            types,
            actions,
            tables,
            action_results,
        })
    }

    /// Parse, validate and resolve ABI JSON
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        Self::new(AbiDocument::from_json(json)?)
    }

    /// The document this contract was built from
    pub fn document(&self) -> &AbiDocument {
        &self.document
    }

    /// Resolved types
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Payload type of an action
    pub fn action_type(&self, action: Name) -> Option<&str> {
        self.actions.get(&action).map(String::as_str)
    }

    /// Row type of a table
    pub fn table_type(&self, table: Name) -> Option<&str> {
        self.tables.get(&table).map(String::as_str)
    }

    /// Return value type of an action
    pub fn action_result_type(&self, action: Name) -> Option<&str> {
        self.action_results.get(&action).map(String::as_str)
    }

    /// The payload type when `name` is an action, otherwise `name` itself
    pub fn action_or_type<'s>(&'s self, name: &'s str) -> &'s str {
        Name::new(name)
            .ok()
            .and_then(|action| self.action_type(action))
            .unwrap_or(name)
    }

    /// Encode a JSON value as `type_name`
    pub fn json_to_bin(
        &self,
        type_name: &str,
        value: &Value,
        config: &ContextConfig,
    ) -> Result<Vec<u8>, AbiError> {
        let view = self.types.view(type_name)?;
        convert::json_to_bin(&view, config, type_name, value)
    }

    /// Decode `data` as `type_name`
    pub fn bin_to_json(
        &self,
        type_name: &str,
        data: &[u8],
        config: &ContextConfig,
    ) -> Result<Value, AbiError> {
        let view = self.types.view(type_name)?;
        convert::bin_to_json(&view, config, type_name, data)
    }
}
