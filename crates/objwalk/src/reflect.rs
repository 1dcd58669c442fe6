//! Reflection boundary between the engine and a document model.
//!
//! The engine knows nothing about how a document stores its values. A model
//! supplies runtime type descriptors ([`TypeDesc`]), identity tokens
//! ([`NodeId`]), and cursor factories ([`Document`]); the engine walks
//! whatever those describe.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::cursor::LevelCursor;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalkError {
    /// The parent container disallows removing the designated child.
    #[error("ERASE_UNSUPPORTED")]
    EraseUnsupported,
    /// The operation requires a landed position.
    #[error("NOT_POSITIONED")]
    NotPositioned,
}

// ── Identity ──────────────────────────────────────────────────────────────

/// Opaque identity token for one live document value.
///
/// Models derive it from an arena index or storage slot. It is never an
/// owning handle: copying or retaining a `NodeId` has no effect on document
/// lifetime, which is what lets the loop-detection set hold them freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

// ── Type descriptors ──────────────────────────────────────────────────────

/// Runtime type descriptor.
pub trait TypeDesc: fmt::Debug {
    /// Type name, unique within one schema.
    fn name(&self) -> &str;

    /// Compatibility test: does a value of this type satisfy a request for
    /// `want`?
    fn is_a(&self, want: &dyn TypeDesc) -> bool;

    /// Reachability test: could a value of this shape transitively contain
    /// a value satisfying `want`?
    ///
    /// Used to prune subtrees. A false positive only costs descends; a
    /// false negative hides reachable matches and is a correctness bug.
    fn may_contain(&self, want: &dyn TypeDesc) -> bool;
}

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<dyn TypeDesc>;

// ── Value handles ─────────────────────────────────────────────────────────

/// Handle to one live document value: identity plus runtime type.
///
/// Equality is identity-based. A handle stays valid only until a structural
/// mutation invalidates its storage; do not retain one across an `erase`
/// that touches sibling storage.
#[derive(Debug, Clone)]
pub struct ValueRef {
    pub id: NodeId,
    pub ty: TypeRef,
}

impl ValueRef {
    pub fn new(id: NodeId, ty: TypeRef) -> Self {
        Self { id, ty }
    }
}

impl PartialEq for ValueRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueRef {}

// ── Attachment tags ───────────────────────────────────────────────────────

/// Describes how a child attaches to its parent container.
///
/// Sequence elements carry no tag at all (`item_info()` returns `None`);
/// attribute-style members carry a name but stay out of path contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTag {
    pub name: String,
    pub attribute: bool,
}

impl ItemTag {
    /// Ordinary named member; contributes to path contexts.
    pub fn member(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute: false,
        }
    }

    /// Attribute-style member; named, but excluded from path contexts.
    pub fn attr(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute: true,
        }
    }
}

// ── Document boundary ─────────────────────────────────────────────────────

/// Document-side factory boundary.
///
/// Implemented once per document representation. Dispatch on a value's
/// runtime kind (record, sequence, union, leaf) happens inside the
/// implementation; the engine only ever sees [`LevelCursor`]s.
pub trait Document: Sized {
    /// Whether `all_children(value)` would start valid.
    ///
    /// This is a pruning hint and must never under-report: answering
    /// `false` for a value that has children hides matches.
    fn has_children(&self, value: &ValueRef) -> bool;

    /// Cursor over every member/element of `value`, in the type's
    /// declared/stable order (record field order, sequence storage order,
    /// a union's single active variant).
    fn all_children(&self, value: &ValueRef) -> Box<dyn LevelCursor<Self>>;

    /// Borrow the Rust payload behind `id`, when the model stores one.
    ///
    /// Backs the typed façades; models without native payloads keep the
    /// default.
    fn value_any(&self, id: NodeId) -> Option<&dyn Any> {
        let _ = id;
        None
    }

    /// Mutable variant of [`Document::value_any`].
    fn value_any_mut(&mut self, id: NodeId) -> Option<&mut dyn Any> {
        let _ = id;
        None
    }
}
