//! Level cursors: enumerators over one value's immediate children.

use crate::reflect::{ItemTag, ValueRef, WalkError};

/// Enumerates the children of one container value at one traversal depth.
///
/// Produced by [`Document::all_children`](crate::Document::all_children);
/// models implement one cursor per kind of container. A cursor captures
/// cursor-local state only, never document contents, so a clone advances
/// independently of the original and dropping either has no effect on the
/// document.
pub trait LevelCursor<D: ?Sized> {
    /// True while a child is designated.
    fn valid(&self) -> bool;

    /// Move to the next child; a no-op once invalid.
    fn advance(&mut self);

    /// True when the designated slot actually holds a value. Unset optional
    /// members report `false` and are skipped without ever being fetched.
    fn can_fetch(&self) -> bool;

    /// The designated child. Defined only while `valid()` and
    /// `can_fetch()`.
    fn current(&self) -> ValueRef;

    /// How the designated child attaches to its parent; `None` for untagged
    /// sequence elements and for the seeded root.
    fn item_info(&self) -> Option<&ItemTag>;

    /// Position of the designated child among its siblings.
    fn index(&self) -> Option<usize>;

    /// Independent copy at the same position.
    fn clone_box(&self) -> Box<dyn LevelCursor<D>>;

    /// Remove the designated child from its parent, leaving the cursor
    /// positioned so that the walk resumes at the next sibling slot.
    fn erase(&mut self, doc: &mut D) -> Result<(), WalkError> {
        let _ = doc;
        Err(WalkError::EraseUnsupported)
    }
}

/// Degenerate one-shot cursor yielding a single seeded value.
///
/// Seeds the root level of every traversal. The spent variant starts
/// already invalid; `skip_subtree` pushes it so the next advance pops the
/// level and resumes in the true ancestor stack.
#[derive(Debug, Clone)]
pub struct OneCursor {
    value: Option<ValueRef>,
}

impl OneCursor {
    pub fn new(value: ValueRef) -> Self {
        Self { value: Some(value) }
    }

    /// Already-invalid cursor.
    pub fn spent() -> Self {
        Self { value: None }
    }
}

impl<D> LevelCursor<D> for OneCursor {
    fn valid(&self) -> bool {
        self.value.is_some()
    }

    fn advance(&mut self) {
        self.value = None;
    }

    fn can_fetch(&self) -> bool {
        self.value.is_some()
    }

    fn current(&self) -> ValueRef {
        self.value.clone().expect("current() on an invalid cursor")
    }

    fn item_info(&self) -> Option<&ItemTag> {
        None
    }

    fn index(&self) -> Option<usize> {
        None
    }

    fn clone_box(&self) -> Box<dyn LevelCursor<D>> {
        Box::new(self.clone())
    }
}
