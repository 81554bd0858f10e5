//! Binary <-> JSON conversion driven by resolved types

use crate::builtin::describe;
use crate::resolver::{ResolvedType, StructType, TypeId, TypeView, VariantType};
use crate::stream::{Reader, StreamError, Writer};
use crate::{AbiError, ContextConfig};
use serde_json::{Map, Value};

enum Segment<'v> {
    Root(&'v str),
    Field(&'v str),
    Index(usize),
    Member(&'v str),
}

/// One conversion call: the types it runs against and the path walked so far
struct Converter<'v, 't> {
    view: &'v TypeView<'t>,
    config: &'v ContextConfig,
    path: Vec<Segment<'v>>,
}

/// Encode a JSON value as `view`'s root type
pub fn json_to_bin(
    view: &TypeView<'_>,
    config: &ContextConfig,
    root_name: &str,
    value: &Value,
) -> Result<Vec<u8>, AbiError> {
    let mut converter = Converter::new(view, config, root_name);
    let mut w = Writer::new();
    converter.encode(view.root(), value, &mut w, 0)?;
    Ok(w.into_bytes())
}

/// Decode `data` as `view`'s root type; every byte must be consumed
pub fn bin_to_json(
    view: &TypeView<'_>,
    config: &ContextConfig,
    root_name: &str,
    data: &[u8],
) -> Result<Value, AbiError> {
    let mut converter = Converter::new(view, config, root_name);
    let mut r = Reader::new(data);
    let value = converter.decode(view.root(), &mut r, 0)?;
    if !r.is_empty() {
        return Err(AbiError::decode(
            root_name,
            r.position(),
            format!("{} bytes of extra data", r.remaining()),
        ));
    }
    Ok(value)
}

impl<'v, 't> Converter<'v, 't> {
    fn new(view: &'v TypeView<'t>, config: &'v ContextConfig, root_name: &'v str) -> Self {
        Converter {
            view,
            config,
            path: vec![Segment::Root(root_name)],
        }
    }

    fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Root(name) => out.push_str(name),
                Segment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Segment::Index(i) => out.push_str(&format!("[{}]", i)),
                Segment::Member(name) => out.push_str(&format!("<{}>", name)),
            }
        }
        out
    }

    fn encode_error(&self, reason: impl Into<String>) -> AbiError {
        AbiError::encode(self.path(), reason)
    }

    fn decode_error(&self, offset: usize, reason: impl Into<String>) -> AbiError {
        AbiError::decode(self.path(), offset, reason)
    }

    fn stream_error(&self, e: StreamError) -> AbiError {
        self.decode_error(e.offset(), e.to_string())
    }

    // ==================== JSON -> binary ====================

    fn encode(
        &mut self,
        id: TypeId,
        value: &Value,
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), AbiError> {
        if depth > self.config.max_depth {
            return Err(self.encode_error("recursion limit reached"));
        }
        let view = self.view;
        match view.get(id) {
            ResolvedType::Builtin(builtin) => builtin
                .encode(value, w)
                .map_err(|reason| self.encode_error(reason)),
            ResolvedType::Struct(s) => self.encode_struct(s, value, w, depth),
            ResolvedType::Variant(v) => self.encode_variant(v, value, w, depth),
            ResolvedType::Array(inner) => {
                let items = value.as_array().ok_or_else(|| {
                    self.encode_error(format!("expected an array, got {}", describe(value)))
                })?;
                let count = u32::try_from(items.len())
                    .map_err(|_| self.encode_error("array too long"))?;
                w.put_varuint32(count);
                for (i, item) in items.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    self.encode(*inner, item, w, depth + 1)?;
                    self.path.pop();
                }
                Ok(())
            }
            ResolvedType::Optional(inner) => {
                if value.is_null() {
                    w.put_u8(0);
                    Ok(())
                } else {
                    w.put_u8(1);
                    self.encode(*inner, value, w, depth + 1)
                }
            }
            ResolvedType::Extension(inner) => self.encode(*inner, value, w, depth + 1),
        }
    }

    fn encode_struct(
        &mut self,
        s: &'v StructType,
        value: &Value,
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), AbiError> {
        let obj = value.as_object().ok_or_else(|| {
            self.encode_error(format!(
                "expected an object for struct \"{}\", got {}",
                s.name,
                describe(value)
            ))
        })?;

        let view = self.view;
        let mut absent_extension: Option<&str> = None;
        for field in &s.fields {
            match obj.get(&field.name) {
                Some(field_value) => {
                    if let Some(previous) = absent_extension {
                        self.path.push(Segment::Field(&field.name));
                        return Err(self.encode_error(format!(
                            "present after absent binary extension \"{}\"",
                            previous
                        )));
                    }
                    self.path.push(Segment::Field(&field.name));
                    self.encode(field.ty, field_value, w, depth + 1)?;
                    self.path.pop();
                }
                None => match view.get(field.ty) {
                    ResolvedType::Extension(_) => {
                        absent_extension.get_or_insert(&field.name);
                    }
                    ResolvedType::Optional(_) if absent_extension.is_none() => w.put_u8(0),
                    _ => {
                        self.path.push(Segment::Field(&field.name));
                        return Err(match absent_extension {
                            Some(previous) => self.encode_error(format!(
                                "missing after absent binary extension \"{}\"",
                                previous
                            )),
                            None => self.encode_error("missing field"),
                        });
                    }
                },
            }
        }
        Ok(())
    }

    fn encode_variant(
        &mut self,
        v: &'v VariantType,
        value: &Value,
        w: &mut Writer,
        depth: usize,
    ) -> Result<(), AbiError> {
        let (tag, inner) = match value.as_array().map(Vec::as_slice) {
            Some([Value::String(tag), inner]) => (tag, inner),
            _ => {
                return Err(self.encode_error(format!(
                    "expected [\"type\", value] for variant \"{}\", got {}",
                    v.name,
                    describe(value)
                )))
            }
        };
        let (index, member) = v
            .members
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == *tag)
            .ok_or_else(|| {
                self.encode_error(format!(
                    "\"{}\" is not a member of variant \"{}\"",
                    tag, v.name
                ))
            })?;
        let index =
            u32::try_from(index).map_err(|_| self.encode_error("variant index too large"))?;
        w.put_varuint32(index);
        self.path.push(Segment::Member(&member.name));
        self.encode(member.ty, inner, w, depth + 1)?;
        self.path.pop();
        Ok(())
    }

    // ==================== binary -> JSON ====================

    fn decode(&mut self, id: TypeId, r: &mut Reader<'_>, depth: usize) -> Result<Value, AbiError> {
        if depth > self.config.max_depth {
            return Err(self.decode_error(r.position(), "recursion limit reached"));
        }
        let view = self.view;
        match view.get(id) {
            ResolvedType::Builtin(builtin) => builtin
                .decode(r, self.config.strict_bool)
                .map_err(|e| self.stream_error(e)),
            ResolvedType::Struct(s) => {
                let mut obj = Map::new();
                for field in &s.fields {
                    if matches!(view.get(field.ty), ResolvedType::Extension(_)) && r.is_empty() {
                        continue;
                    }
                    self.path.push(Segment::Field(&field.name));
                    let value = self.decode(field.ty, r, depth + 1)?;
                    self.path.pop();
                    obj.insert(field.name.clone(), value);
                }
                Ok(Value::Object(obj))
            }
            ResolvedType::Variant(v) => {
                let offset = r.position();
                let tag = r.read_varuint32().map_err(|e| self.stream_error(e))?;
                let member = v.members.get(tag as usize).ok_or_else(|| {
                    self.decode_error(
                        offset,
                        format!(
                            "tag {} out of range for variant \"{}\" with {} members",
                            tag,
                            v.name,
                            v.members.len()
                        ),
                    )
                })?;
                self.path.push(Segment::Member(&member.name));
                let value = self.decode(member.ty, r, depth + 1)?;
                self.path.pop();
                Ok(Value::Array(vec![Value::from(member.name.as_str()), value]))
            }
            ResolvedType::Array(inner) => {
                let offset = r.position();
                let count = r.read_varuint32().map_err(|e| self.stream_error(e))? as usize;
                if count > r.remaining() && count > self.config.max_array_len {
                    return Err(self.decode_error(
                        offset,
                        format!(
                            "array length {} exceeds the {} bytes left and the limit of {}",
                            count,
                            r.remaining(),
                            self.config.max_array_len
                        ),
                    ));
                }
                let mut items = Vec::with_capacity(count.min(r.remaining()));
                for i in 0..count {
                    self.path.push(Segment::Index(i));
                    items.push(self.decode(*inner, r, depth + 1)?);
                    self.path.pop();
                }
                Ok(Value::Array(items))
            }
            ResolvedType::Optional(inner) => {
                let offset = r.position();
                match r.read_u8().map_err(|e| self.stream_error(e))? {
                    0 => Ok(Value::Null),
                    1 => self.decode(*inner, r, depth + 1),
                    flag => Err(self.decode_error(
                        offset,
                        format!("invalid optional flag {:#04x}", flag),
                    )),
                }
            }
            ResolvedType::Extension(inner) => {
                if r.is_empty() {
                    Ok(Value::Null)
                } else {
                    self.decode(*inner, r, depth + 1)
                }
            }
        }
    }
}
