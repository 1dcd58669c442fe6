//! Reference document model for the `objwalk` engine.
//!
//! A small arena of runtime-typed nodes (records, sequences, unions with
//! one active variant, and scalar leaves) described by a schema of type
//! descriptors. Real systems bring their own reflection subsystem; this
//! crate is the template the engine is developed and tested against.
//!
//! ```
//! use objwalk::{AnyIter, Begin};
//! use objwalk_model::{Doc, FieldDef, SchemaBuilder};
//! use serde_json::json;
//!
//! let mut sb = SchemaBuilder::new();
//! let t_str = sb.scalar("str");
//! let t_note = sb.record("Note", vec![FieldDef::new("text", t_str)]);
//! let mut doc = Doc::new(sb.build());
//! let text = doc.scalar(t_str, json!("hello")).unwrap();
//! let note = doc.record(t_note, vec![("text", text)]).unwrap();
//!
//! let seen: Vec<_> = AnyIter::new(&doc, Begin::new(doc.value(note).unwrap()))
//!     .map(|v| v.id)
//!     .collect();
//! assert_eq!(seen, vec![note, text]);
//! ```

mod cursor;

pub mod doc;
pub mod schema;

pub use doc::{Doc, Node};
pub use schema::{FieldDef, ModelError, Schema, SchemaBuilder, TypeId};
