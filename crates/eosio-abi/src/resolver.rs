//! Type resolution: aliases, suffixes, struct inheritance and variants
//!
//! Every name an ABI declares or references is resolved once, when the ABI
//! is loaded, into a [`TypeTable`]. Types live in an arena and refer to each
//! other by [`TypeId`], so recursive structs need no special handling.
//! Names that only show up at request time (`transfer[]`, `uint64?`) are
//! resolved into a short-lived overlay, see [`TypeView`].

use crate::builtin::Builtin;
use crate::document::{AbiDocument, FieldDef, StructDef};
use crate::AbiError;
use std::collections::{HashMap, HashSet};

/// Index of a type in a [`TypeTable`] (or its overlay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(usize);

/// Struct with its inheritance chain flattened, base fields first
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    /// Struct name
    pub name: String,
    /// Fields in wire order
    pub fields: Vec<Field>,
}

/// One flattened struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeId,
}

/// Variant and its members in tag order
#[derive(Debug, Clone, PartialEq)]
pub struct VariantType {
    /// Variant name
    pub name: String,
    /// Members; the wire tag is the index
    pub members: Vec<Member>,
}

/// One variant member
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Type name as declared, used as the JSON tag
    pub name: String,
    /// Member type
    pub ty: TypeId,
}

/// A fully resolved type
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    /// Built-in wire type
    Builtin(Builtin),
    /// Struct
    Struct(StructType),
    /// Tagged union
    Variant(VariantType),
    /// `T[]`
    Array(TypeId),
    /// `T?`
    Optional(TypeId),
    /// `T$`
    Extension(TypeId),
}

#[derive(Debug, Clone, Copy)]
enum Suffix {
    Array,
    Optional,
    Extension,
}

impl Suffix {
    /// Peel the outermost suffix off a type name
    fn split(name: &str) -> Option<(Suffix, &str)> {
        if let Some(inner) = name.strip_suffix('$') {
            Some((Suffix::Extension, inner))
        } else if let Some(inner) = name.strip_suffix('?') {
            Some((Suffix::Optional, inner))
        } else {
            name.strip_suffix("[]").map(|inner| (Suffix::Array, inner))
        }
    }

    /// Array and optional may not wrap another wrapper; extension may not wrap an extension
    fn wrap(self, inner_id: TypeId, inner: &ResolvedType, name: &str) -> Result<ResolvedType, AbiError> {
        let nested = match self {
            Suffix::Array | Suffix::Optional => matches!(
                inner,
                ResolvedType::Array(_) | ResolvedType::Optional(_) | ResolvedType::Extension(_)
            ),
            Suffix::Extension => matches!(inner, ResolvedType::Extension(_)),
        };
        if nested {
            return Err(AbiError::schema(format!("invalid nesting in type \"{}\"", name)));
        }
        Ok(match self {
            Suffix::Array => ResolvedType::Array(inner_id),
            Suffix::Optional => ResolvedType::Optional(inner_id),
            Suffix::Extension => ResolvedType::Extension(inner_id),
        })
    }
}

/// Every type of one ABI, resolved
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: Vec<ResolvedType>,
    names: HashMap<String, TypeId>,
}

impl TypeTable {
    /// Resolve every alias, struct, variant and referenced type of a document
    pub fn build(doc: &AbiDocument) -> Result<Self, AbiError> {
        Builder::new(doc)?.run()
    }

    /// Look up a type by id
    pub fn get(&self, id: TypeId) -> &ResolvedType {
        &self.types[id.0]
    }

    /// Look up a resolved name
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Number of distinct types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve a request-time type name, which may add suffixes to any
    /// known name
    pub fn view(&self, name: &str) -> Result<TypeView<'_>, AbiError> {
        let mut view = TypeView {
            table: self,
            extra: Vec::new(),
            root: TypeId(0),
        };
        view.root = view.resolve(name)?;
        Ok(view)
    }
}

/// A [`TypeTable`] plus whatever wrapper types one request needed
#[derive(Debug)]
pub struct TypeView<'t> {
    table: &'t TypeTable,
    extra: Vec<ResolvedType>,
    root: TypeId,
}

impl<'t> TypeView<'t> {
    /// The requested type
    pub fn root(&self) -> TypeId {
        self.root
    }

    /// Look up a type by id
    pub fn get(&self, id: TypeId) -> &ResolvedType {
        let base = self.table.types.len();
        if id.0 < base {
            &self.table.types[id.0]
        } else {
            &self.extra[id.0 - base]
        }
    }

    fn push(&mut self, ty: ResolvedType) -> TypeId {
        self.extra.push(ty);
        TypeId(self.table.types.len() + self.extra.len() - 1)
    }

    fn resolve(&mut self, name: &str) -> Result<TypeId, AbiError> {
        if let Some(id) = self.table.lookup(name) {
            return Ok(id);
        }
        if let Some((suffix, inner)) = Suffix::split(name) {
            let inner_id = self.resolve(inner)?;
            let wrapped = suffix.wrap(inner_id, self.get(inner_id), name)?;
            return Ok(self.push(wrapped));
        }
        match Builtin::from_name(name) {
            Some(builtin) => Ok(self.push(ResolvedType::Builtin(builtin))),
            None => Err(AbiError::UnknownType(name.to_string())),
        }
    }
}

// ==================== Builder ====================

struct Builder<'a> {
    doc: &'a AbiDocument,
    aliases: HashMap<&'a str, &'a str>,
    structs: HashMap<&'a str, &'a StructDef>,
    types: Vec<ResolvedType>,
    names: HashMap<String, TypeId>,
    resolving: HashSet<String>,
}

impl<'a> Builder<'a> {
    fn new(doc: &'a AbiDocument) -> Result<Self, AbiError> {
        let mut declared: HashSet<&str> = HashSet::new();
        let mut declare = |name: &'a str| -> Result<(), AbiError> {
            if name.is_empty() {
                return Err(AbiError::schema("type definition with an empty name"));
            }
            if Builtin::from_name(name).is_some() {
                return Err(AbiError::schema(format!("type \"{}\" redefines a built-in", name)));
            }
            if Suffix::split(name).is_some() {
                return Err(AbiError::schema(format!("type name \"{}\" has a suffix", name)));
            }
            if !declared.insert(name) {
                return Err(AbiError::schema(format!("type \"{}\" is defined twice", name)));
            }
            Ok(())
        };

        let mut aliases = HashMap::new();
        for def in &doc.types {
            declare(def.new_type_name.as_str())?;
            aliases.insert(def.new_type_name.as_str(), def.ty.as_str());
        }
        let mut structs = HashMap::new();
        for def in &doc.structs {
            declare(def.name.as_str())?;
            structs.insert(def.name.as_str(), def);
        }
        for def in doc.variants() {
            declare(def.name.as_str())?;
        }

        Ok(Builder {
            doc,
            aliases,
            structs,
            types: Vec::new(),
            names: HashMap::new(),
            resolving: HashSet::new(),
        })
    }

    fn run(mut self) -> Result<TypeTable, AbiError> {
        let doc = self.doc;

        // Placeholders first so that fields and members can refer to any struct or variant
        let mut struct_ids = Vec::with_capacity(doc.structs.len());
        for def in &doc.structs {
            struct_ids.push(self.insert(
                &def.name,
                ResolvedType::Struct(StructType {
                    name: def.name.clone(),
                    fields: Vec::new(),
                }),
            ));
        }
        let mut variant_ids = Vec::with_capacity(doc.variants().len());
        for def in doc.variants() {
            variant_ids.push(self.insert(
                &def.name,
                ResolvedType::Variant(VariantType {
                    name: def.name.clone(),
                    members: Vec::new(),
                }),
            ));
        }

        for (def, id) in doc.structs.iter().zip(struct_ids) {
            let mut fields = Vec::new();
            for field in self.flatten(def)? {
                let owner = format!("field \"{}.{}\"", def.name, field.name);
                let ty = self.resolve_ref(&owner, &field.ty)?;
                fields.push(Field {
                    name: field.name.clone(),
                    ty,
                });
            }
            self.types[id.0] = ResolvedType::Struct(StructType {
                name: def.name.clone(),
                fields,
            });
        }

        for (def, id) in doc.variants().iter().zip(variant_ids) {
            let mut members = Vec::with_capacity(def.types.len());
            for member in &def.types {
                let owner = format!("variant \"{}\"", def.name);
                let ty = self.resolve_ref(&owner, member)?;
                members.push(Member {
                    name: member.clone(),
                    ty,
                });
            }
            self.types[id.0] = ResolvedType::Variant(VariantType {
                name: def.name.clone(),
                members,
            });
        }

        for def in &doc.types {
            let owner = format!("alias \"{}\"", def.new_type_name);
            self.resolve_ref(&owner, &def.new_type_name)?;
        }

        let mut actions = HashSet::new();
        for action in &doc.actions {
            if !actions.insert(action.name) {
                return Err(AbiError::schema(format!("action \"{}\" is defined twice", action.name)));
            }
            self.resolve_ref(&format!("action \"{}\"", action.name), &action.ty)?;
        }
        let mut tables = HashSet::new();
        for table in &doc.tables {
            if !tables.insert(table.name) {
                return Err(AbiError::schema(format!("table \"{}\" is defined twice", table.name)));
            }
            self.resolve_ref(&format!("table \"{}\"", table.name), &table.ty)?;
        }
        for result in doc.action_results() {
            self.resolve_ref(&format!("action result \"{}\"", result.name), &result.result_type)?;
        }

        Ok(TypeTable {
            types: self.types,
            names: self.names,
        })
    }

    fn insert(&mut self, name: &str, ty: ResolvedType) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(ty);
        self.names.insert(name.to_string(), id);
        id
    }

    /// Resolve a name referenced by `owner`, turning "unknown type" into a schema error
    fn resolve_ref(&mut self, owner: &str, name: &str) -> Result<TypeId, AbiError> {
        self.resolve(name).map_err(|e| match e {
            AbiError::UnknownType(t) => {
                AbiError::schema(format!("{} references unknown type \"{}\"", owner, t))
            }
            other => other,
        })
    }

    fn resolve(&mut self, name: &str) -> Result<TypeId, AbiError> {
        if let Some(id) = self.names.get(name) {
            return Ok(*id);
        }

        if let Some((suffix, inner)) = Suffix::split(name) {
            let inner_id = self.resolve(inner)?;
            let wrapped = suffix.wrap(inner_id, &self.types[inner_id.0], name)?;
            return Ok(self.insert(name, wrapped));
        }

        if let Some(builtin) = Builtin::from_name(name) {
            return Ok(self.insert(name, ResolvedType::Builtin(builtin)));
        }

        let target = *self
            .aliases
            .get(name)
            .ok_or_else(|| AbiError::UnknownType(name.to_string()))?;
        if !self.resolving.insert(name.to_string()) {
            return Err(AbiError::schema(format!("alias cycle through \"{}\"", name)));
        }
        let resolved = self.resolve(target);
        self.resolving.remove(name);
        let id = resolved?;
        if matches!(self.types[id.0], ResolvedType::Extension(_)) {
            return Err(AbiError::schema(format!(
                "alias \"{}\" targets binary extension \"{}\"",
                name, target
            )));
        }
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Follow aliases by name only, for struct bases
    fn chase_alias(&self, name: &'a str) -> Result<&'a str, AbiError> {
        let mut current = name;
        let mut seen = HashSet::new();
        while let Some(target) = self.aliases.get(current) {
            if !seen.insert(current) {
                return Err(AbiError::schema(format!("alias cycle through \"{}\"", current)));
            }
            current = *target;
        }
        Ok(current)
    }

    /// Own fields of `def` preceded by those of its base chain, root base first
    fn flatten(&self, def: &'a StructDef) -> Result<Vec<&'a FieldDef>, AbiError> {
        let mut chain = vec![def];
        let mut seen: HashSet<&str> = HashSet::from([def.name.as_str()]);
        let mut base = def.base.as_str();
        while !base.is_empty() {
            let base_name = self.chase_alias(base)?;
            let base_def = self.structs.get(base_name).copied().ok_or_else(|| {
                AbiError::schema(format!(
                    "base \"{}\" of struct \"{}\" is not a struct",
                    base,
                    chain[chain.len() - 1].name
                ))
            })?;
            if !seen.insert(base_def.name.as_str()) {
                return Err(AbiError::schema(format!(
                    "struct \"{}\" inherits from itself",
                    def.name
                )));
            }
            chain.push(base_def);
            base = base_def.base.as_str();
        }
        Ok(chain.iter().rev().flat_map(|d| d.fields.iter()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> AbiDocument {
        AbiDocument::from_json(json).unwrap()
    }

    fn field_names(table: &TypeTable, name: &str) -> Vec<String> {
        match table.get(table.lookup(name).unwrap()) {
            ResolvedType::Struct(s) => s.fields.iter().map(|f| f.name.clone()).collect(),
            other => panic!("not a struct: {:?}", other),
        }
    }

    // ==================== Structs ====================

    #[test]
    fn test_inheritance_flattened_base_first() {
        let table = TypeTable::build(&doc(
            r#"{"structs":[
                {"name":"derived","base":"middle","fields":[{"name":"c","type":"uint8"}]},
                {"name":"middle","base":"root","fields":[{"name":"b","type":"uint8"}]},
                {"name":"root","base":"","fields":[{"name":"a0","type":"uint8"},{"name":"a1","type":"uint8"}]}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(field_names(&table, "derived"), ["a0", "a1", "b", "c"]);
        assert_eq!(field_names(&table, "middle"), ["a0", "a1", "b"]);
    }

    #[test]
    fn test_base_through_alias() {
        let table = TypeTable::build(&doc(
            r#"{"types":[{"new_type_name":"parent","type":"root"}],
                "structs":[
                {"name":"child","base":"parent","fields":[{"name":"b","type":"uint8"}]},
                {"name":"root","fields":[{"name":"a","type":"uint8"}]}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(field_names(&table, "child"), ["a", "b"]);
    }

    #[test]
    fn test_base_not_a_struct() {
        let err = TypeTable::build(&doc(
            r#"{"structs":[{"name":"s","base":"uint8","fields":[]}]}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("not a struct"), "{err}");
    }

    #[test]
    fn test_base_cycle() {
        let err = TypeTable::build(&doc(
            r#"{"structs":[{"name":"a","base":"b","fields":[]},{"name":"b","base":"a","fields":[]}]}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("inherits from itself"), "{err}");
    }

    #[test]
    fn test_recursive_struct() {
        let table = TypeTable::build(&doc(
            r#"{"structs":[{"name":"node","fields":[
                {"name":"value","type":"uint32"},
                {"name":"children","type":"node[]"}
            ]}]}"#,
        ))
        .unwrap();
        let node = table.lookup("node").unwrap();
        let ResolvedType::Struct(s) = table.get(node) else {
            panic!("not a struct")
        };
        assert_eq!(table.get(s.fields[1].ty), &ResolvedType::Array(node));
    }

    // ==================== Aliases ====================

    #[test]
    fn test_alias_chain() {
        let table = TypeTable::build(&doc(
            r#"{"types":[
                {"new_type_name":"account_name","type":"name"},
                {"new_type_name":"owner","type":"account_name"}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(
            table.get(table.lookup("owner").unwrap()),
            &ResolvedType::Builtin(Builtin::Name)
        );
    }

    #[test]
    fn test_alias_cycle() {
        let err = TypeTable::build(&doc(
            r#"{"types":[{"new_type_name":"a","type":"b"},{"new_type_name":"b","type":"a"}]}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("alias cycle"), "{err}");
    }

    #[test]
    fn test_alias_to_extension() {
        let err = TypeTable::build(&doc(
            r#"{"types":[{"new_type_name":"x","type":"uint8$"}]}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("binary extension"), "{err}");
    }

    #[test]
    fn test_alias_back_to_struct_in_field() {
        let table = TypeTable::build(&doc(
            r#"{"types":[{"new_type_name":"tree","type":"node"}],
                "structs":[{"name":"node","fields":[{"name":"kids","type":"tree[]"}]}]}"#,
        ))
        .unwrap();
        assert_eq!(table.lookup("tree"), table.lookup("node"));
    }

    // ==================== Definitions ====================

    #[test]
    fn test_duplicate_and_shadowing() {
        assert!(TypeTable::build(&doc(
            r#"{"structs":[{"name":"s","fields":[]},{"name":"s","fields":[]}]}"#
        ))
        .is_err());
        assert!(TypeTable::build(&doc(
            r#"{"types":[{"new_type_name":"s","type":"name"}],"variants":[{"name":"s","types":["name"]}]}"#
        ))
        .is_err());
        assert!(TypeTable::build(&doc(r#"{"types":[{"new_type_name":"asset","type":"name"}]}"#)).is_err());
    }

    #[test]
    fn test_unknown_references() {
        let err = TypeTable::build(&doc(
            r#"{"structs":[{"name":"s","fields":[{"name":"f","type":"nope"}]}]}"#,
        ))
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Schema);
        assert!(err.to_string().contains("\"nope\""), "{err}");

        let err = TypeTable::build(&doc(r#"{"actions":[{"name":"go","type":"missing"}]}"#)).unwrap_err();
        assert!(err.to_string().contains("action \"go\""), "{err}");
    }

    #[test]
    fn test_variant_members_in_order() {
        let table = TypeTable::build(&doc(
            r#"{"variants":[{"name":"v","types":["uint8","string","v2"]}],
                "structs":[{"name":"v2","fields":[]}]}"#,
        ))
        .unwrap();
        let ResolvedType::Variant(v) = table.get(table.lookup("v").unwrap()) else {
            panic!("not a variant")
        };
        let names: Vec<_> = v.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["uint8", "string", "v2"]);
    }

    // ==================== Suffixes ====================

    #[test]
    fn test_invalid_nesting() {
        for bad in ["uint8[][]", "uint8??", "uint8[]?", "uint8?[]", "uint8$$", "uint8$[]"] {
            let json = format!(r#"{{"structs":[{{"name":"s","fields":[{{"name":"f","type":"{}"}}]}}]}}"#, bad);
            assert!(TypeTable::build(&doc(&json)).is_err(), "{bad} should be rejected");
        }
        for good in ["uint8[]", "uint8?", "uint8[]$", "uint8?$"] {
            let json = format!(r#"{{"structs":[{{"name":"s","fields":[{{"name":"f","type":"{}"}}]}}]}}"#, good);
            assert!(TypeTable::build(&doc(&json)).is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn test_view_adds_suffixes() {
        let table = TypeTable::build(&doc(r#"{"structs":[{"name":"s","fields":[]}]}"#)).unwrap();
        let before = table.len();
        let view = table.view("s[]").unwrap();
        assert!(matches!(view.get(view.root()), ResolvedType::Array(_)));
        assert_eq!(table.len(), before);

        let view = table.view("uint64?").unwrap();
        let ResolvedType::Optional(inner) = view.get(view.root()) else {
            panic!("not optional")
        };
        assert_eq!(view.get(*inner), &ResolvedType::Builtin(Builtin::Uint64));

        assert!(matches!(table.view("nope"), Err(AbiError::UnknownType(_))));
        assert!(table.view("s[][]").is_err());
    }
}
