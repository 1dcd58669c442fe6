//! The traversal engine.
//!
//! [`TreeWalk`] keeps an explicit stack of level cursors and lands, in
//! deterministic preorder, on every value that passes both the selection
//! predicate and the context filter. It supports loop detection over
//! arbitrary cycles, subtree pruning and skipping, and edit-time erase.
//!
//! The engine never stores the document. Every operation borrows it for
//! the duration of the call, so read-only traversal takes `&D` and only
//! [`TreeWalk::erase`] demands `&mut D`; the borrow checker is what makes
//! the "read-only flavor" of a walk read-only.

use std::collections::HashSet;

use crate::cursor::{LevelCursor, OneCursor};
use crate::path::segments_match;
use crate::reflect::{Document, NodeId, TypeRef, ValueRef, WalkError};

// ── Root descriptor ───────────────────────────────────────────────────────

/// The value a traversal starts from plus the loop-detection flag.
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct Begin {
    root: Option<ValueRef>,
    detect_loops: bool,
}

impl Begin {
    pub fn new(root: ValueRef) -> Self {
        Self {
            root: Some(root),
            detect_loops: false,
        }
    }

    /// Enable loop detection: a full drain then terminates even over
    /// cyclic documents, visiting each identity at most once.
    pub fn detecting_loops(root: ValueRef) -> Self {
        Self {
            root: Some(root),
            detect_loops: true,
        }
    }

    /// Descriptor with no root. `init` absorbs it silently and the walk
    /// stays empty; this is not a fault.
    pub fn absent() -> Self {
        Self {
            root: None,
            detect_loops: false,
        }
    }
}

impl From<ValueRef> for Begin {
    fn from(root: ValueRef) -> Self {
        Begin::new(root)
    }
}

// ── Selection modes ───────────────────────────────────────────────────────

/// What the walk lands on.
#[derive(Debug, Clone)]
enum Wanted {
    /// Every value.
    Any,
    /// Values whose type `is_a` the wanted type; subtrees that cannot
    /// `may_contain` it are pruned.
    One(TypeRef),
    /// Values matching any entry. First `is_a` match in list order wins
    /// and is recorded as the matched type.
    Many(Vec<TypeRef>),
}

// ── Engine ────────────────────────────────────────────────────────────────

/// Preorder traversal engine over one document.
///
/// The stack, bottom to top, encodes the exact ancestor chain of the
/// landed value; path contexts are read straight off it. The engine owns
/// its stack and loop-detection set and never the document, which must
/// outlive every handle the walk hands out.
///
/// Lifecycle: empty → [`TreeWalk::init`] → zero or more
/// [`TreeWalk::advance`] → exhausted; `init` on a new [`Begin`] restarts,
/// [`TreeWalk::reset`] returns to empty. [`TreeWalk::current`] is `Some`
/// exactly while the walk is landed.
pub struct TreeWalk<D: Document> {
    stack: Vec<Box<dyn LevelCursor<D>>>,
    current: Option<ValueRef>,
    visited: Option<HashSet<NodeId>>,
    wanted: Wanted,
    matched: Option<TypeRef>,
    filter: String,
    matcher: fn(&str, &str) -> bool,
}

impl<D: Document> TreeWalk<D> {
    /// Walk that lands on every value.
    pub fn any() -> Self {
        Self::with_wanted(Wanted::Any)
    }

    /// Walk that lands on values compatible with `wanted`.
    pub fn of(wanted: TypeRef) -> Self {
        Self::with_wanted(Wanted::One(wanted))
    }

    /// Walk that lands on values compatible with any entry of `wanted`.
    ///
    /// List order is significant: the first `is_a` match is the one
    /// reported by [`TreeWalk::matched_type`]. Callers should not depend
    /// on the tie-break between overlapping entries.
    pub fn of_types(wanted: Vec<TypeRef>) -> Self {
        Self::with_wanted(Wanted::Many(wanted))
    }

    fn with_wanted(wanted: Wanted) -> Self {
        Self {
            stack: Vec::new(),
            current: None,
            visited: None,
            wanted,
            matched: None,
            filter: String::new(),
            matcher: segments_match,
        }
    }

    /// Replace the context-filter matcher. The default is
    /// [`segments_match`](crate::path::segments_match).
    pub fn set_path_matcher(&mut self, matcher: fn(&str, &str) -> bool) {
        self.matcher = matcher;
    }

    // ── Lifecycle ─────────────────────────────────────────────────────

    /// Seed the walk at `begin` and land on the first acceptable value.
    pub fn init(&mut self, doc: &D, begin: Begin) {
        self.reset();
        let Some(root) = begin.root else { return };
        if begin.detect_loops {
            self.visited = Some(HashSet::new());
        }
        self.stack.push(Box::new(OneCursor::new(root)));
        self.walk(doc);
    }

    /// [`TreeWalk::init`] with a context filter installed up front, so
    /// the first landing already honors it.
    pub fn init_with_filter(&mut self, doc: &D, begin: Begin, filter: &str) {
        self.filter = filter.to_string();
        self.init(doc, begin);
    }

    /// Return to the empty state. The context filter survives a reset.
    pub fn reset(&mut self) {
        self.current = None;
        self.visited = None;
        self.matched = None;
        self.stack.clear();
    }

    /// True while landed on a value.
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// The landed value, while there is one.
    pub fn current(&self) -> Option<&ValueRef> {
        self.current.as_ref()
    }

    /// For a multi-type walk, the wanted entry the landed value matched.
    pub fn matched_type(&self) -> Option<&TypeRef> {
        self.matched.as_ref()
    }

    /// Move to the next acceptable value in preorder.
    ///
    /// Calling this while not landed is a caller error: checked by a
    /// debug assertion, and a safe no-op in release builds.
    pub fn advance(&mut self, doc: &D) {
        debug_assert!(self.current.is_some(), "advance() while not landed");
        self.current = None;
        let moved = match self.stack.last() {
            Some(top) if top.valid() => {
                let candidate = top.current();
                self.step(doc, &candidate)
            }
            // skip_subtree left a spent level on top
            Some(_) => self.advance_level(),
            None => false,
        };
        if moved {
            self.walk(doc);
        }
    }

    /// Exclude the landed value's descendants from the rest of the drain,
    /// preserving the order of its siblings and ancestors' siblings.
    ///
    /// Pushes a spent one-shot level; the next `advance` pops it and
    /// resumes in the true ancestor stack. The loop-detection set is not
    /// touched.
    pub fn skip_subtree(&mut self) {
        debug_assert!(self.current.is_some(), "skip_subtree() while not landed");
        self.stack.push(Box::new(OneCursor::spent()));
    }

    // ── Path context ──────────────────────────────────────────────────

    /// Dot-joined member names from the root to the designated value.
    /// Untagged levels and attribute tags contribute nothing.
    pub fn context(&self) -> String {
        let mut path = String::new();
        for level in &self.stack {
            if let Some(tag) = level.item_info() {
                if tag.attribute {
                    continue;
                }
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(&tag.name);
            }
        }
        path
    }

    /// Test the current context against `pattern` with the installed
    /// matcher. The empty pattern matches everything.
    pub fn matches_context(&self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return true;
        }
        (self.matcher)(pattern, &self.context())
    }

    /// Install a context filter. A landed position the filter rejects is
    /// transparently advanced past.
    pub fn set_context_filter(&mut self, doc: &D, pattern: &str) {
        self.filter = pattern.to_string();
        if self.current.is_some() && !self.matches_context(pattern) {
            self.advance(doc);
        }
    }

    /// Sibling index recorded one level beneath the top: when the landed
    /// value is a member of a sequence element, this is that element's
    /// position in the sequence.
    pub fn container_element_index(&self) -> Option<usize> {
        if self.stack.len() > 1 {
            self.stack[self.stack.len() - 2].index()
        } else {
            None
        }
    }

    /// Index of the landed value at its own level: member index in a
    /// record, variant index in a union, element index in a sequence.
    pub fn item_index(&self) -> Option<usize> {
        self.stack.last().and_then(|top| top.index())
    }

    // ── Mutation ──────────────────────────────────────────────────────

    /// Remove the landed value from its parent and re-land.
    ///
    /// On success the walk already sits where a normal `advance` from the
    /// removed position would have landed, with the removed subtree
    /// excluded. Failure leaves the walk landed where it was.
    pub fn erase(&mut self, doc: &mut D) -> Result<(), WalkError> {
        if self.current.is_none() {
            return Err(WalkError::NotPositioned);
        }
        let top = self.stack.last_mut().ok_or(WalkError::NotPositioned)?;
        top.erase(doc)?;
        self.current = None;
        if self.stack.last().map_or(false, |top| top.valid()) || self.advance_level() {
            self.walk(doc);
        }
        Ok(())
    }

    // ── Landing ───────────────────────────────────────────────────────

    /// Land on the next value passing both selection and the context
    /// filter, descending wherever the subtree may still contain a match.
    fn walk(&mut self, doc: &D) {
        loop {
            let Some(top) = self.stack.last() else { return };
            debug_assert!(top.valid());
            if !top.can_fetch() {
                // absent slot: never fetched, never descended into
                if !self.advance_level() {
                    return;
                }
                continue;
            }
            let candidate = top.current();
            if !self.first_visit(&candidate) {
                // repeat identity: neither landed on nor entered, which is
                // what bounds the walk on cyclic documents
                if !self.advance_level() {
                    return;
                }
                continue;
            }
            if self.can_select(&candidate) && self.matches_context(&self.filter) {
                self.current = Some(candidate);
                return;
            }
            if !self.step(doc, &candidate) {
                return;
            }
        }
    }

    /// Record `candidate` in the loop-detection set. False on a repeat.
    /// Every candidate considered for selection is recorded, landed or
    /// not, so two branches sharing one object only let the first descend.
    fn first_visit(&mut self, candidate: &ValueRef) -> bool {
        match self.visited.as_mut() {
            Some(visited) => visited.insert(candidate.id),
            None => true,
        }
    }

    /// One motion past `candidate`: descend into it when the subtree may
    /// contain a match, otherwise advance on the current level.
    fn step(&mut self, doc: &D, candidate: &ValueRef) -> bool {
        if self.can_enter(doc, candidate) {
            let next = doc.all_children(candidate);
            if next.valid() {
                self.stack.push(next);
                return true;
            }
        }
        self.advance_level()
    }

    /// Advance the top level, popping spent levels until one designates a
    /// child again. False when the stack drains: the walk is exhausted.
    fn advance_level(&mut self) -> bool {
        while let Some(top) = self.stack.last_mut() {
            if top.valid() {
                top.advance();
                if top.valid() {
                    return true;
                }
            }
            self.stack.pop();
        }
        false
    }

    /// Selection test against the requested type set. For a multi-type
    /// walk this also records which entry matched, first in list order.
    fn can_select(&mut self, candidate: &ValueRef) -> bool {
        match &self.wanted {
            Wanted::Any => true,
            Wanted::One(want) => candidate.ty.is_a(want.as_ref()),
            Wanted::Many(list) => {
                let mut matched = None;
                for want in list {
                    if candidate.ty.is_a(want.as_ref()) {
                        matched = Some(want.clone());
                        break;
                    }
                }
                self.matched = matched;
                self.matched.is_some()
            }
        }
    }

    /// Entry test: prune subtrees that provably cannot contain a match.
    fn can_enter(&self, doc: &D, candidate: &ValueRef) -> bool {
        if !doc.has_children(candidate) {
            return false;
        }
        match &self.wanted {
            Wanted::Any => true,
            Wanted::One(want) => candidate.ty.may_contain(want.as_ref()),
            Wanted::Many(list) => list
                .iter()
                .any(|want| candidate.ty.may_contain(want.as_ref())),
        }
    }
}

impl<D: Document> Clone for TreeWalk<D> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.iter().map(|level| level.clone_box()).collect(),
            current: self.current.clone(),
            visited: self.visited.clone(),
            wanted: self.wanted.clone(),
            matched: self.matched.clone(),
            filter: self.filter.clone(),
            matcher: self.matcher,
        }
    }
}

impl<D: Document> Default for TreeWalk<D> {
    fn default() -> Self {
        Self::any()
    }
}
