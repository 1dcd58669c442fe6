//! Preorder traversal over runtime-typed, possibly cyclic object graphs.
//!
//! Given a root value and a type predicate (one type, an ordered list of
//! types, or any object), a walk yields every reachable sub-object
//! matching the predicate, in deterministic preorder, without knowing the
//! document's schema in advance. Traversal supports loop detection,
//! subtree pruning (`may_contain`) and skipping, dot-path context
//! filtering, and edit-time erase of the landed value.
//!
//! # Layers
//!
//! | Layer           | Types                                        |
//! |-----------------|----------------------------------------------|
//! | Reflection      | [`TypeDesc`], [`ValueRef`], [`Document`]     |
//! | Level cursors   | [`LevelCursor`], [`OneCursor`]               |
//! | Engine          | [`Begin`], [`TreeWalk`]                      |
//! | Façades         | [`AnyIter`], [`TypeIter`], [`TypesIter`], [`TypeWalk`] |
//!
//! The engine never owns the document: read-only traversal borrows `&D`,
//! and only `erase` demands `&mut D`. A walk instance is single-threaded;
//! independent walks over an unmutated document are safe to run anywhere.

pub mod cursor;
pub mod iter;
pub mod path;
pub mod reflect;
pub mod walk;

pub use cursor::{LevelCursor, OneCursor};
pub use iter::{AnyIter, TypeIter, TypeWalk, TypesIter};
pub use reflect::{Document, ItemTag, NodeId, TypeDesc, TypeRef, ValueRef, WalkError};
pub use walk::{Begin, TreeWalk};
