//! `eosio.token` helpers

use eosio_abi::{AbiDocument, ActionDef, FieldDef, StructDef, TableDef, TypeDef};
use eosio_primitives::{Asset, Name, Symbol};
use serde_json::json;

use crate::action::{Action, PermissionLevel};
use crate::SdkError;

/// Account of the standard token contract
pub const TOKEN_CONTRACT: &str = "eosio.token";

fn def(name: &str, fields: &[(&str, &str)]) -> StructDef {
    StructDef {
        name: name.to_string(),
        base: String::new(),
        fields: fields
            .iter()
            .map(|(name, ty)| FieldDef {
                name: name.to_string(),
                ty: ty.to_string(),
            })
            .collect(),
    }
}

fn action(name: &str) -> Result<ActionDef, SdkError> {
    Ok(ActionDef {
        name: Name::new(name)?,
        ty: name.to_string(),
        ricardian_contract: String::new(),
    })
}

/// ABI of the standard token contract
pub fn token_abi() -> Result<AbiDocument, SdkError> {
    Ok(AbiDocument {
        version: "eosio::abi/1.1".to_string(),
        types: vec![TypeDef {
            new_type_name: "account_name".to_string(),
            ty: "name".to_string(),
        }],
        structs: vec![
            def(
                "transfer",
                &[
                    ("from", "account_name"),
                    ("to", "account_name"),
                    ("quantity", "asset"),
                    ("memo", "string"),
                ],
            ),
            def("create", &[("issuer", "account_name"), ("maximum_supply", "asset")]),
            def(
                "issue",
                &[("to", "account_name"), ("quantity", "asset"), ("memo", "string")],
            ),
            def("retire", &[("quantity", "asset"), ("memo", "string")]),
            def(
                "open",
                &[("owner", "account_name"), ("symbol", "symbol"), ("ram_payer", "account_name")],
            ),
            def("close", &[("owner", "account_name"), ("symbol", "symbol")]),
            def("account", &[("balance", "asset")]),
            def(
                "currency_stats",
                &[("supply", "asset"), ("max_supply", "asset"), ("issuer", "account_name")],
            ),
        ],
        actions: vec![
            action("transfer")?,
            action("create")?,
            action("issue")?,
            action("retire")?,
            action("open")?,
            action("close")?,
        ],
        tables: vec![
            TableDef {
                name: Name::new("accounts")?,
                index_type: "i64".to_string(),
                key_names: vec!["currency".to_string()],
                key_types: vec!["uint64".to_string()],
                ty: "account".to_string(),
            },
            TableDef {
                name: Name::new("stat")?,
                index_type: "i64".to_string(),
                key_names: vec!["currency".to_string()],
                key_types: vec!["uint64".to_string()],
                ty: "currency_stats".to_string(),
            },
        ],
        ..AbiDocument::default()
    })
}

fn token_action(
    name: &str,
    authorizer: Name,
    data: serde_json::Value,
) -> Result<Action, SdkError> {
    Ok(Action::new(
        Name::new(TOKEN_CONTRACT)?,
        Name::new(name)?,
        vec![PermissionLevel::new(authorizer, Name::new("active")?)],
        data,
    ))
}

/// `transfer` authorized by `from@active`
pub fn transfer(from: Name, to: Name, quantity: Asset, memo: &str) -> Result<Action, SdkError> {
    token_action(
        "transfer",
        from,
        json!({"from": from, "to": to, "quantity": quantity, "memo": memo}),
    )
}

/// `issue` authorized by `issuer@active`
pub fn issue(issuer: Name, to: Name, quantity: Asset, memo: &str) -> Result<Action, SdkError> {
    token_action(
        "issue",
        issuer,
        json!({"to": to, "quantity": quantity, "memo": memo}),
    )
}

/// `open` authorized by `ram_payer@active`
pub fn open(owner: Name, symbol: Symbol, ram_payer: Name) -> Result<Action, SdkError> {
    token_action(
        "open",
        ram_payer,
        json!({"owner": owner, "symbol": symbol, "ram_payer": ram_payer}),
    )
}
