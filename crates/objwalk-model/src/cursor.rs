//! Per-kind level cursors over arena nodes.
//!
//! Each cursor snapshots its child slots (ids, types, tags) when it is
//! created, so clones advance independently and the document is only
//! touched again for `erase`.

use objwalk::{ItemTag, LevelCursor, NodeId, ValueRef, WalkError};

use crate::doc::{Doc, Node};
use crate::schema::Kind;

// ── Records ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct FieldSlot {
    tag: ItemTag,
    /// `None` for an unset optional field: present in the slot list so the
    /// walk sees it (and skips it via `can_fetch`), absent in the arena.
    value: Option<ValueRef>,
}

/// Children of a record, in schema-declared field order.
#[derive(Debug, Clone)]
pub(crate) struct RecordCursor {
    parent: NodeId,
    slots: Vec<FieldSlot>,
    pos: usize,
}

impl RecordCursor {
    pub(crate) fn new(doc: &Doc, parent: NodeId) -> Self {
        let mut slots = Vec::new();
        if let Some(entry) = doc.entry(parent) {
            if let (Kind::Record(defs), Node::Record { fields }) = (entry.ty.kind(), &entry.node) {
                for def in defs {
                    let tag = if def.attribute {
                        ItemTag::attr(&def.name)
                    } else {
                        ItemTag::member(&def.name)
                    };
                    let value = fields.get(&def.name).and_then(|id| doc.value(*id));
                    slots.push(FieldSlot { tag, value });
                }
            }
        }
        Self {
            parent,
            slots,
            pos: 0,
        }
    }
}

impl LevelCursor<Doc> for RecordCursor {
    fn valid(&self) -> bool {
        self.pos < self.slots.len()
    }

    fn advance(&mut self) {
        if self.pos < self.slots.len() {
            self.pos += 1;
        }
    }

    fn can_fetch(&self) -> bool {
        self.slots
            .get(self.pos)
            .map_or(false, |slot| slot.value.is_some())
    }

    fn current(&self) -> ValueRef {
        self.slots[self.pos]
            .value
            .clone()
            .expect("current() on an absent field slot")
    }

    fn item_info(&self) -> Option<&ItemTag> {
        self.slots.get(self.pos).map(|slot| &slot.tag)
    }

    fn index(&self) -> Option<usize> {
        self.valid().then_some(self.pos)
    }

    fn clone_box(&self) -> Box<dyn LevelCursor<Doc>> {
        Box::new(self.clone())
    }

    fn erase(&mut self, doc: &mut Doc) -> Result<(), WalkError> {
        let slot = self
            .slots
            .get_mut(self.pos)
            .ok_or(WalkError::NotPositioned)?;
        doc.erase_field(self.parent, &slot.tag.name)?;
        // the slot stays, emptied: the walk steps past it via can_fetch
        slot.value = None;
        Ok(())
    }
}

// ── Sequences ─────────────────────────────────────────────────────────────

/// Elements of a sequence, in storage order. Elements carry no tag.
#[derive(Debug, Clone)]
pub(crate) struct SeqCursor {
    parent: NodeId,
    items: Vec<ValueRef>,
    pos: usize,
}

impl SeqCursor {
    pub(crate) fn new(doc: &Doc, parent: NodeId) -> Self {
        let items = match doc.entry(parent).map(|entry| &entry.node) {
            Some(Node::Seq { items }) => items.iter().filter_map(|id| doc.value(*id)).collect(),
            _ => Vec::new(),
        };
        Self {
            parent,
            items,
            pos: 0,
        }
    }
}

impl LevelCursor<Doc> for SeqCursor {
    fn valid(&self) -> bool {
        self.pos < self.items.len()
    }

    fn advance(&mut self) {
        if self.pos < self.items.len() {
            self.pos += 1;
        }
    }

    fn can_fetch(&self) -> bool {
        self.valid()
    }

    fn current(&self) -> ValueRef {
        self.items[self.pos].clone()
    }

    fn item_info(&self) -> Option<&ItemTag> {
        None
    }

    fn index(&self) -> Option<usize> {
        self.valid().then_some(self.pos)
    }

    fn clone_box(&self) -> Box<dyn LevelCursor<Doc>> {
        Box::new(self.clone())
    }

    fn erase(&mut self, doc: &mut Doc) -> Result<(), WalkError> {
        if !self.valid() {
            return Err(WalkError::NotPositioned);
        }
        // positional removal: a shared node may sit at several positions
        // and only the designated occurrence goes away
        doc.erase_elem_at(self.parent, self.pos)?;
        self.items.remove(self.pos);
        Ok(())
    }
}

// ── Unions ────────────────────────────────────────────────────────────────

/// The single active variant of a union, tagged with the variant name.
#[derive(Debug, Clone)]
pub(crate) struct UnionCursor {
    parent: NodeId,
    variant: Option<(ItemTag, ValueRef)>,
    variant_index: usize,
    done: bool,
}

impl UnionCursor {
    pub(crate) fn new(doc: &Doc, parent: NodeId) -> Self {
        let mut variant = None;
        let mut variant_index = 0;
        if let Some(entry) = doc.entry(parent) {
            if let Node::Union {
                variant: Some((name, id)),
            } = &entry.node
            {
                if let Kind::Union(declared) = entry.ty.kind() {
                    if let Some(pos) = declared.iter().position(|(n, _)| n == name) {
                        variant_index = pos;
                    }
                }
                if let Some(value) = doc.value(*id) {
                    variant = Some((ItemTag::member(name), value));
                }
            }
        }
        Self {
            parent,
            variant,
            variant_index,
            done: false,
        }
    }
}

impl LevelCursor<Doc> for UnionCursor {
    fn valid(&self) -> bool {
        !self.done && self.variant.is_some()
    }

    fn advance(&mut self) {
        self.done = true;
    }

    fn can_fetch(&self) -> bool {
        self.valid()
    }

    fn current(&self) -> ValueRef {
        self.variant
            .as_ref()
            .map(|(_, value)| value.clone())
            .expect("current() on an empty union cursor")
    }

    fn item_info(&self) -> Option<&ItemTag> {
        if self.valid() {
            self.variant.as_ref().map(|(tag, _)| tag)
        } else {
            None
        }
    }

    fn index(&self) -> Option<usize> {
        self.valid().then_some(self.variant_index)
    }

    fn clone_box(&self) -> Box<dyn LevelCursor<Doc>> {
        Box::new(self.clone())
    }

    fn erase(&mut self, doc: &mut Doc) -> Result<(), WalkError> {
        if !self.valid() {
            return Err(WalkError::NotPositioned);
        }
        doc.erase_variant(self.parent)?;
        self.variant = None;
        Ok(())
    }
}
