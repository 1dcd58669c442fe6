//! Arena document: runtime-typed nodes addressed by [`NodeId`].
//!
//! Nodes reference each other by id, so cycles and shared sub-objects are
//! ordinary data. A walk never owns the document; it addresses it through
//! this arena for exactly the duration of each call.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use objwalk::{Document, LevelCursor, NodeId, OneCursor, ValueRef, WalkError};
use serde_json::Value;

use crate::cursor::{RecordCursor, SeqCursor, UnionCursor};
use crate::schema::{Kind, ModelError, Schema, Ty, TypeId};

// ── Nodes ─────────────────────────────────────────────────────────────────

/// One document value. References are ids into the arena.
#[derive(Debug, Clone)]
pub enum Node {
    /// Named fields; unset optional fields are simply absent.
    Record { fields: IndexMap<String, NodeId> },
    /// Untagged elements in storage order.
    Seq { items: Vec<NodeId> },
    /// At most one active variant.
    Union { variant: Option<(String, NodeId)> },
    /// Leaf payload.
    Scalar { value: Value },
}

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) ty: Ty,
    pub(crate) node: Node,
}

// ── Document ──────────────────────────────────────────────────────────────

/// Arena of runtime-typed nodes.
///
/// Erase operations detach a node from its parent; the node itself stays
/// in the arena (unreachable, no longer visited).
#[derive(Debug, Clone)]
pub struct Doc {
    schema: Schema,
    nodes: HashMap<NodeId, Entry>,
    next: u64,
}

impl Doc {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            nodes: HashMap::new(),
            next: 1,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Engine-facing handle for a node, suitable for seeding a
    /// [`Begin`](objwalk::Begin).
    pub fn value(&self, id: NodeId) -> Option<ValueRef> {
        let entry = self.nodes.get(&id)?;
        Some(ValueRef::new(id, Arc::new(entry.ty.clone())))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id).map(|entry| &entry.node)
    }

    pub(crate) fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.nodes.get(&id)
    }

    fn alloc(&mut self, ty: TypeId, node: Node) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(
            id,
            Entry {
                ty: self.schema.concrete(ty),
                node,
            },
        );
        id
    }

    // ── Builders ──────────────────────────────────────────────────────

    /// New scalar leaf.
    pub fn scalar(&mut self, ty: TypeId, value: Value) -> Result<NodeId, ModelError> {
        if !matches!(self.schema.kind_of(ty), Kind::Scalar) {
            return Err(ModelError::NotAScalar);
        }
        Ok(self.alloc(ty, Node::Scalar { value }))
    }

    /// New record with the given fields set. Unset optional fields stay
    /// absent; required fields are not enforced at build time.
    pub fn record(&mut self, ty: TypeId, fields: Vec<(&str, NodeId)>) -> Result<NodeId, ModelError> {
        let declared: Vec<String> = match self.schema.kind_of(ty) {
            Kind::Record(defs) => defs.iter().map(|field| field.name.clone()).collect(),
            _ => return Err(ModelError::NotARecord),
        };
        let mut map = IndexMap::new();
        for (name, id) in fields {
            if !declared.iter().any(|field| field == name) {
                return Err(ModelError::UnknownField(name.to_string()));
            }
            map.insert(name.to_string(), id);
        }
        Ok(self.alloc(ty, Node::Record { fields: map }))
    }

    /// New sequence over the given elements.
    pub fn seq(&mut self, ty: TypeId, items: Vec<NodeId>) -> Result<NodeId, ModelError> {
        if !matches!(self.schema.kind_of(ty), Kind::Seq(_)) {
            return Err(ModelError::NotASeq);
        }
        Ok(self.alloc(ty, Node::Seq { items }))
    }

    /// New union with `variant` active.
    pub fn union(&mut self, ty: TypeId, variant: &str, value: NodeId) -> Result<NodeId, ModelError> {
        match self.schema.kind_of(ty) {
            Kind::Union(variants) => {
                if !variants.iter().any(|(name, _)| name == variant) {
                    return Err(ModelError::UnknownVariant(variant.to_string()));
                }
            }
            _ => return Err(ModelError::NotAUnion),
        }
        Ok(self.alloc(
            ty,
            Node::Union {
                variant: Some((variant.to_string(), value)),
            },
        ))
    }

    // ── Mutators ──────────────────────────────────────────────────────

    /// Set or replace a record field.
    pub fn set_field(&mut self, record: NodeId, name: &str, value: NodeId) -> Result<(), ModelError> {
        let entry = self.nodes.get_mut(&record).ok_or(ModelError::UnknownNode)?;
        let declared = match entry.ty.kind() {
            Kind::Record(defs) => defs.iter().any(|field| field.name == name),
            _ => return Err(ModelError::NotARecord),
        };
        if !declared {
            return Err(ModelError::UnknownField(name.to_string()));
        }
        match &mut entry.node {
            Node::Record { fields } => {
                fields.insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(ModelError::NotARecord),
        }
    }

    /// Append a sequence element.
    pub fn push_elem(&mut self, seq: NodeId, value: NodeId) -> Result<(), ModelError> {
        let entry = self.nodes.get_mut(&seq).ok_or(ModelError::UnknownNode)?;
        match &mut entry.node {
            Node::Seq { items } => {
                items.push(value);
                Ok(())
            }
            _ => Err(ModelError::NotASeq),
        }
    }

    /// Replace a union's active variant.
    pub fn set_variant(&mut self, union: NodeId, name: &str, value: NodeId) -> Result<(), ModelError> {
        let entry = self.nodes.get_mut(&union).ok_or(ModelError::UnknownNode)?;
        let declared = match entry.ty.kind() {
            Kind::Union(variants) => variants.iter().any(|(variant, _)| variant == name),
            _ => return Err(ModelError::NotAUnion),
        };
        if !declared {
            return Err(ModelError::UnknownVariant(name.to_string()));
        }
        match &mut entry.node {
            Node::Union { variant } => {
                *variant = Some((name.to_string(), value));
                Ok(())
            }
            _ => Err(ModelError::NotAUnion),
        }
    }

    // ── Erase hooks (cursor-facing) ───────────────────────────────────

    /// Unset an optional record field. Required fields refuse.
    pub(crate) fn erase_field(&mut self, record: NodeId, name: &str) -> Result<(), WalkError> {
        let entry = match self.nodes.get_mut(&record) {
            Some(entry) => entry,
            None => return Err(WalkError::EraseUnsupported),
        };
        let removable = match entry.ty.kind() {
            Kind::Record(defs) => defs
                .iter()
                .any(|field| field.name == name && field.optional),
            _ => false,
        };
        if !removable {
            return Err(WalkError::EraseUnsupported);
        }
        match &mut entry.node {
            Node::Record { fields } => {
                fields.shift_remove(name);
                Ok(())
            }
            _ => Err(WalkError::EraseUnsupported),
        }
    }

    /// Remove the element at `index` from a sequence. By position, not by
    /// id: the same node may appear at several positions.
    pub(crate) fn erase_elem_at(&mut self, seq: NodeId, index: usize) -> Result<(), WalkError> {
        match self.nodes.get_mut(&seq).map(|entry| &mut entry.node) {
            Some(Node::Seq { items }) if index < items.len() => {
                items.remove(index);
                Ok(())
            }
            _ => Err(WalkError::EraseUnsupported),
        }
    }

    /// Clear a union's active variant.
    pub(crate) fn erase_variant(&mut self, union: NodeId) -> Result<(), WalkError> {
        match self.nodes.get_mut(&union).map(|entry| &mut entry.node) {
            Some(Node::Union { variant }) => {
                *variant = None;
                Ok(())
            }
            _ => Err(WalkError::EraseUnsupported),
        }
    }
}

// ── Engine boundary ───────────────────────────────────────────────────────

impl Document for Doc {
    fn has_children(&self, value: &ValueRef) -> bool {
        match self.nodes.get(&value.id) {
            Some(entry) => match &entry.node {
                Node::Record { .. } => {
                    matches!(entry.ty.kind(), Kind::Record(defs) if !defs.is_empty())
                }
                Node::Seq { items } => !items.is_empty(),
                Node::Union { variant } => variant.is_some(),
                Node::Scalar { .. } => false,
            },
            None => false,
        }
    }

    fn all_children(&self, value: &ValueRef) -> Box<dyn LevelCursor<Self>> {
        match self.nodes.get(&value.id).map(|entry| &entry.node) {
            Some(Node::Record { .. }) => Box::new(RecordCursor::new(self, value.id)),
            Some(Node::Seq { .. }) => Box::new(SeqCursor::new(self, value.id)),
            Some(Node::Union { .. }) => Box::new(UnionCursor::new(self, value.id)),
            // scalar leaves and unknown ids have no children
            _ => Box::new(OneCursor::spent()),
        }
    }

    fn value_any(&self, id: NodeId) -> Option<&dyn Any> {
        match self.nodes.get(&id).map(|entry| &entry.node) {
            Some(Node::Scalar { value }) => Some(value as &dyn Any),
            _ => None,
        }
    }

    fn value_any_mut(&mut self, id: NodeId) -> Option<&mut dyn Any> {
        match self.nodes.get_mut(&id).map(|entry| &mut entry.node) {
            Some(Node::Scalar { value }) => Some(value as &mut dyn Any),
            _ => None,
        }
    }
}
