//! ABIs every context carries: the transaction layout and the `abi_def`
//! layout ABIs themselves are stored in on chain

use crate::document::{AbiDocument, FieldDef, StructDef, TypeDef};

/// Version string of the built-in ABIs
pub const BUILTIN_ABI_VERSION: &str = "eosio::abi/1.1";

fn alias(new_type_name: &str, ty: &str) -> TypeDef {
    TypeDef {
        new_type_name: new_type_name.to_string(),
        ty: ty.to_string(),
    }
}

fn def(name: &str, base: &str, fields: &[(&str, &str)]) -> StructDef {
    StructDef {
        name: name.to_string(),
        base: base.to_string(),
        fields: fields
            .iter()
            .map(|(name, ty)| FieldDef {
                name: name.to_string(),
                ty: ty.to_string(),
            })
            .collect(),
    }
}

/// `transaction`, `transaction_header`, `action` and friends
pub fn transaction_abi() -> AbiDocument {
    AbiDocument {
        version: BUILTIN_ABI_VERSION.to_string(),
        types: vec![
            alias("account_name", "name"),
            alias("action_name", "name"),
            alias("permission_name", "name"),
        ],
        structs: vec![
            def(
                "permission_level",
                "",
                &[("actor", "account_name"), ("permission", "permission_name")],
            ),
            def(
                "action",
                "",
                &[
                    ("account", "account_name"),
                    ("name", "action_name"),
                    ("authorization", "permission_level[]"),
                    ("data", "bytes"),
                ],
            ),
            def("extension", "", &[("type", "uint16"), ("data", "bytes")]),
            def(
                "transaction_header",
                "",
                &[
                    ("expiration", "time_point_sec"),
                    ("ref_block_num", "uint16"),
                    ("ref_block_prefix", "uint32"),
                    ("max_net_usage_words", "varuint32"),
                    ("max_cpu_usage_ms", "uint8"),
                    ("delay_sec", "varuint32"),
                ],
            ),
            def(
                "transaction",
                "transaction_header",
                &[
                    ("context_free_actions", "action[]"),
                    ("actions", "action[]"),
                    ("transaction_extensions", "extension[]"),
                ],
            ),
        ],
        ..AbiDocument::default()
    }
}

/// The binary layout of an ABI document
pub fn abi_def_abi() -> AbiDocument {
    AbiDocument {
        version: BUILTIN_ABI_VERSION.to_string(),
        structs: vec![
            def("type_def", "", &[("new_type_name", "string"), ("type", "string")]),
            def("field_def", "", &[("name", "string"), ("type", "string")]),
            def(
                "struct_def",
                "",
                &[("name", "string"), ("base", "string"), ("fields", "field_def[]")],
            ),
            def(
                "action_def",
                "",
                &[("name", "name"), ("type", "string"), ("ricardian_contract", "string")],
            ),
            def(
                "table_def",
                "",
                &[
                    ("name", "name"),
                    ("index_type", "string"),
                    ("key_names", "string[]"),
                    ("key_types", "string[]"),
                    ("type", "string"),
                ],
            ),
            def("clause_pair", "", &[("id", "string"), ("body", "string")]),
            def(
                "error_message",
                "",
                &[("error_code", "uint64"), ("error_msg", "string")],
            ),
            def("variant_def", "", &[("name", "string"), ("types", "string[]")]),
            def(
                "action_result_def",
                "",
                &[("name", "name"), ("result_type", "string")],
            ),
            def("abi_extension", "", &[("type", "uint16"), ("data", "bytes")]),
            def(
                "abi_def",
                "",
                &[
                    ("version", "string"),
                    ("types", "type_def[]"),
                    ("structs", "struct_def[]"),
                    ("actions", "action_def[]"),
                    ("tables", "table_def[]"),
                    ("ricardian_clauses", "clause_pair[]"),
                    ("error_messages", "error_message[]"),
                    ("abi_extensions", "abi_extension[]"),
                    ("variants", "variant_def[]$"),
                    ("action_results", "action_result_def[]$"),
                ],
            ),
        ],
        ..AbiDocument::default()
    }
}
