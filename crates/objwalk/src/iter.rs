//! Public façades over [`TreeWalk`].
//!
//! The read-only façades are ordinary `Iterator`s borrowing the document
//! for their whole lifetime. The mutable façade stays walker-style: the
//! caller passes the document into every motion, and only the mutating
//! entry points demand `&mut`.

use std::any::Any;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::reflect::{Document, TypeRef, ValueRef};
use crate::walk::{Begin, TreeWalk};

// ── AnyIter ───────────────────────────────────────────────────────────────

/// Read-only preorder iterator over every value reachable from a root.
pub struct AnyIter<'d, D: Document> {
    doc: &'d D,
    walk: TreeWalk<D>,
}

impl<'d, D: Document> AnyIter<'d, D> {
    pub fn new(doc: &'d D, begin: Begin) -> Self {
        let mut walk = TreeWalk::any();
        walk.init(doc, begin);
        Self { doc, walk }
    }

    pub fn with_filter(doc: &'d D, begin: Begin, filter: &str) -> Self {
        let mut walk = TreeWalk::any();
        walk.init_with_filter(doc, begin, filter);
        Self { doc, walk }
    }

    /// Restart from a new root.
    pub fn reinit(&mut self, begin: Begin) {
        self.walk.init(self.doc, begin);
    }

    /// The underlying engine. Note that after `next()` the engine is
    /// already positioned on the upcoming value, not the yielded one;
    /// drive a [`TreeWalk`] directly when contexts or indexes matter.
    pub fn walk(&self) -> &TreeWalk<D> {
        &self.walk
    }
}

impl<'d, D: Document> Iterator for AnyIter<'d, D> {
    type Item = ValueRef;

    fn next(&mut self) -> Option<ValueRef> {
        let out = self.walk.current()?.clone();
        self.walk.advance(self.doc);
        Some(out)
    }
}

// ── TypeIter ──────────────────────────────────────────────────────────────

/// Read-only iterator over values compatible with one wanted type,
/// dereferenced to the statically known payload type `C`.
///
/// The wanted descriptor is resolved once at construction. Dereference
/// goes through [`Document::value_any`] with a checked downcast.
pub struct TypeIter<'d, D: Document, C: Any> {
    doc: &'d D,
    walk: TreeWalk<D>,
    _payload: PhantomData<fn() -> C>,
}

impl<'d, D: Document, C: Any> TypeIter<'d, D, C> {
    pub fn new(doc: &'d D, wanted: TypeRef, begin: Begin) -> Self {
        let mut walk = TreeWalk::of(wanted);
        walk.init(doc, begin);
        Self {
            doc,
            walk,
            _payload: PhantomData,
        }
    }

    pub fn with_filter(doc: &'d D, wanted: TypeRef, begin: Begin, filter: &str) -> Self {
        let mut walk = TreeWalk::of(wanted);
        walk.init_with_filter(doc, begin, filter);
        Self {
            doc,
            walk,
            _payload: PhantomData,
        }
    }

    /// Restart from a new root, keeping the wanted type.
    pub fn reinit(&mut self, begin: Begin) {
        self.walk.init(self.doc, begin);
    }

    /// True while a further value is pending.
    pub fn is_valid(&self) -> bool {
        self.walk.is_valid()
    }
}

impl<'d, D: Document, C: Any> Iterator for TypeIter<'d, D, C> {
    type Item = &'d C;

    fn next(&mut self) -> Option<&'d C> {
        loop {
            let id = self.walk.current()?.id;
            self.walk.advance(self.doc);
            match self.doc.value_any(id).and_then(|any| any.downcast_ref::<C>()) {
                Some(payload) => return Some(payload),
                None => {
                    // the descriptor matched but the model stores no C
                    // payload behind this id: a wiring mistake
                    debug_assert!(false, "landed value carries no payload of the requested type");
                }
            }
        }
    }
}

/// Both exhausted, or landed on the identical value.
impl<'d, D: Document, C: Any> PartialEq for TypeIter<'d, D, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.walk.current(), other.walk.current()) {
            (Some(a), Some(b)) => a == b,
            (a, b) => a.is_none() == b.is_none(),
        }
    }
}

// ── TypesIter ─────────────────────────────────────────────────────────────

/// Read-only iterator over values matching an ordered list of wanted
/// types. Yields the value handle together with the wanted entry it
/// matched (first match in list order).
pub struct TypesIter<'d, D: Document> {
    doc: &'d D,
    walk: TreeWalk<D>,
}

impl<'d, D: Document> TypesIter<'d, D> {
    pub fn new(doc: &'d D, wanted: Vec<TypeRef>, begin: Begin) -> Self {
        let mut walk = TreeWalk::of_types(wanted);
        walk.init(doc, begin);
        Self { doc, walk }
    }

    pub fn with_filter(doc: &'d D, wanted: Vec<TypeRef>, begin: Begin, filter: &str) -> Self {
        let mut walk = TreeWalk::of_types(wanted);
        walk.init_with_filter(doc, begin, filter);
        Self { doc, walk }
    }

    /// Restart from a new root, keeping the wanted list.
    pub fn reinit(&mut self, begin: Begin) {
        self.walk.init(self.doc, begin);
    }
}

impl<'d, D: Document> Iterator for TypesIter<'d, D> {
    type Item = (ValueRef, TypeRef);

    fn next(&mut self) -> Option<(ValueRef, TypeRef)> {
        let value = self.walk.current()?.clone();
        // recorded at selection time; falls back to the value's own type
        let matched = self
            .walk
            .matched_type()
            .cloned()
            .unwrap_or_else(|| value.ty.clone());
        self.walk.advance(self.doc);
        Some((value, matched))
    }
}

// ── TypeWalk ──────────────────────────────────────────────────────────────

/// Mutable single-type walker.
///
/// Walker-style counterpart of [`TypeIter`]: motions go through the
/// [`TreeWalk`] engine (available via `Deref`), the landed payload is
/// borrowed per call, and `erase` demands `&mut` access to the document.
///
/// ```ignore
/// let mut walk: TypeWalk<Doc, Value> = TypeWalk::new(wanted);
/// walk.init(&doc, Begin::new(root));
/// while walk.is_valid() {
///     if should_drop(walk.get(&doc)) {
///         walk.erase(&mut doc)?;
///     } else {
///         walk.advance(&doc);
///     }
/// }
/// ```
pub struct TypeWalk<D: Document, C: Any> {
    walk: TreeWalk<D>,
    _payload: PhantomData<fn() -> C>,
}

impl<D: Document, C: Any> TypeWalk<D, C> {
    pub fn new(wanted: TypeRef) -> Self {
        Self {
            walk: TreeWalk::of(wanted),
            _payload: PhantomData,
        }
    }

    /// Borrow the landed payload.
    pub fn get<'a>(&self, doc: &'a D) -> Option<&'a C> {
        let id = self.walk.current()?.id;
        doc.value_any(id)?.downcast_ref::<C>()
    }

    /// Mutably borrow the landed payload.
    pub fn get_mut<'a>(&self, doc: &'a mut D) -> Option<&'a mut C> {
        let id = self.walk.current()?.id;
        doc.value_any_mut(id)?.downcast_mut::<C>()
    }
}

impl<D: Document, C: Any> Deref for TypeWalk<D, C> {
    type Target = TreeWalk<D>;

    fn deref(&self) -> &TreeWalk<D> {
        &self.walk
    }
}

impl<D: Document, C: Any> DerefMut for TypeWalk<D, C> {
    fn deref_mut(&mut self) -> &mut TreeWalk<D> {
        &mut self.walk
    }
}
