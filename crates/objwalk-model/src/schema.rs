//! Schema: named type definitions and their runtime descriptors.
//!
//! A [`SchemaBuilder`] collects definitions into an immutable, shared
//! table; [`Ty`] is a cheap handle into that table implementing the
//! engine's [`TypeDesc`] contract. Cyclic schemas are built with
//! [`SchemaBuilder::declare`] plus [`SchemaBuilder::fill_record`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use objwalk::{TypeDesc, TypeRef};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("UNKNOWN_TYPE: {0}")]
    UnknownType(String),
    #[error("UNKNOWN_NODE")]
    UnknownNode,
    #[error("UNKNOWN_FIELD: {0}")]
    UnknownField(String),
    #[error("UNKNOWN_VARIANT: {0}")]
    UnknownVariant(String),
    #[error("NOT_A_SCALAR")]
    NotAScalar,
    #[error("NOT_A_RECORD")]
    NotARecord,
    #[error("NOT_A_SEQ")]
    NotASeq,
    #[error("NOT_A_UNION")]
    NotAUnion,
}

// ── Definitions ───────────────────────────────────────────────────────────

/// Handle to a type within one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeId(pub(crate) usize);

/// One record field: name, type, and attachment flags.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeId,
    /// Optional fields may be unset; only optional fields can be erased.
    pub optional: bool,
    /// Attribute fields stay out of path contexts.
    pub attribute: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            attribute: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn attribute(mut self) -> Self {
        self.attribute = true;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Kind {
    Scalar,
    Record(Vec<FieldDef>),
    Seq(TypeId),
    Union(Vec<(String, TypeId)>),
}

#[derive(Debug)]
pub(crate) struct TypeDef {
    pub(crate) name: String,
    pub(crate) kind: Kind,
}

// ── Builder ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    defs: Vec<TypeDef>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, kind: Kind) -> TypeId {
        self.defs.push(TypeDef {
            name: name.to_string(),
            kind,
        });
        TypeId(self.defs.len() - 1)
    }

    /// Scalar leaf type.
    pub fn scalar(&mut self, name: &str) -> TypeId {
        self.push(name, Kind::Scalar)
    }

    /// Record type with fields in declared order.
    pub fn record(&mut self, name: &str, fields: Vec<FieldDef>) -> TypeId {
        self.push(name, Kind::Record(fields))
    }

    /// Forward declaration, completed later by
    /// [`SchemaBuilder::fill_record`]. Lets a record's fields reference
    /// the record's own type.
    pub fn declare(&mut self, name: &str) -> TypeId {
        self.push(name, Kind::Record(Vec::new()))
    }

    pub fn fill_record(&mut self, id: TypeId, fields: Vec<FieldDef>) {
        self.defs[id.0].kind = Kind::Record(fields);
    }

    /// Homogeneous sequence type.
    pub fn seq(&mut self, name: &str, elem: TypeId) -> TypeId {
        self.push(name, Kind::Seq(elem))
    }

    /// Union with a single active variant at a time.
    pub fn union(&mut self, name: &str, variants: Vec<(String, TypeId)>) -> TypeId {
        self.push(name, Kind::Union(variants))
    }

    pub fn build(self) -> Schema {
        Schema {
            defs: Arc::new(self.defs),
        }
    }
}

// ── Schema ────────────────────────────────────────────────────────────────

/// Immutable, shared table of type definitions.
#[derive(Debug, Clone)]
pub struct Schema {
    defs: Arc<Vec<TypeDef>>,
}

impl Schema {
    /// Engine-facing descriptor for a built type.
    pub fn ty(&self, id: TypeId) -> TypeRef {
        Arc::new(self.concrete(id))
    }

    /// Descriptor lookup by name.
    pub fn ty_by_name(&self, name: &str) -> Result<TypeRef, ModelError> {
        let index = self
            .defs
            .iter()
            .position(|def| def.name == name)
            .ok_or_else(|| ModelError::UnknownType(name.to_string()))?;
        Ok(Arc::new(Ty {
            defs: Arc::clone(&self.defs),
            index,
        }))
    }

    pub(crate) fn concrete(&self, id: TypeId) -> Ty {
        Ty {
            defs: Arc::clone(&self.defs),
            index: id.0,
        }
    }

    pub(crate) fn kind_of(&self, id: TypeId) -> &Kind {
        &self.defs[id.0].kind
    }
}

// ── Descriptor ────────────────────────────────────────────────────────────

/// Descriptor for one schema type; the model's [`TypeDesc`] implementation.
#[derive(Clone)]
pub struct Ty {
    defs: Arc<Vec<TypeDef>>,
    index: usize,
}

impl Ty {
    pub(crate) fn def(&self) -> &TypeDef {
        &self.defs[self.index]
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.def().kind
    }

    pub fn id(&self) -> TypeId {
        TypeId(self.index)
    }
}

impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty({})", self.def().name)
    }
}

impl TypeDesc for Ty {
    fn name(&self) -> &str {
        &self.def().name
    }

    /// Nominal: names are unique within a schema.
    fn is_a(&self, want: &dyn TypeDesc) -> bool {
        self.name() == want.name()
    }

    /// Breadth-first reachability over the definition table. The seen set
    /// keeps cyclic schemas from looping.
    fn may_contain(&self, want: &dyn TypeDesc) -> bool {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut queue: Vec<usize> = vec![self.index];
        seen.insert(self.index);
        while let Some(index) = queue.pop() {
            for child in contained(&self.defs[index].kind) {
                if self.defs[child.0].name == want.name() {
                    return true;
                }
                if seen.insert(child.0) {
                    queue.push(child.0);
                }
            }
        }
        false
    }
}

fn contained(kind: &Kind) -> Vec<TypeId> {
    match kind {
        Kind::Scalar => Vec::new(),
        Kind::Record(fields) => fields.iter().map(|field| field.ty).collect(),
        Kind::Seq(elem) => vec![*elem],
        Kind::Union(variants) => variants.iter().map(|(_, ty)| *ty).collect(),
    }
}
