//! Shared fixtures for the traversal suites.
//!
//! Three documents cover the shapes the engine cares about: a strictly
//! tree-shaped library, a DAG with one node stored at two sequence
//! positions, and a ring of records closed into a reference cycle.

#![allow(dead_code)]

use objwalk::{Begin, NodeId, ValueRef};
use objwalk_model::{Doc, FieldDef, SchemaBuilder, TypeId};
use serde_json::json;

// ── Library: a plain tree ─────────────────────────────────────────────────

/// `Library { name, books: [Book { title, lang@, author: Author { name,
/// born? }, id?: Ident(isbn | doi) }] }` with two books; the second book
/// leaves both optional slots unset. `lang` is an attribute member.
pub struct Library {
    pub doc: Doc,
    pub t_str: TypeId,
    pub t_author: TypeId,
    pub t_ident: TypeId,
    pub t_book: TypeId,
    pub t_books: TypeId,
    pub t_library: TypeId,
    pub lib: NodeId,
    pub name: NodeId,
    pub books: NodeId,
    pub book1: NodeId,
    pub b1_title: NodeId,
    pub b1_lang: NodeId,
    pub b1_author: NodeId,
    pub b1_author_name: NodeId,
    pub b1_born: NodeId,
    pub b1_ident: NodeId,
    pub b1_isbn: NodeId,
    pub book2: NodeId,
    pub b2_title: NodeId,
    pub b2_lang: NodeId,
    pub b2_author: NodeId,
    pub b2_author_name: NodeId,
}

pub fn library() -> Library {
    let mut sb = SchemaBuilder::new();
    let t_str = sb.scalar("str");
    let t_author = sb.record(
        "Author",
        vec![
            FieldDef::new("name", t_str),
            FieldDef::new("born", t_str).optional(),
        ],
    );
    let t_ident = sb.union(
        "Ident",
        vec![("isbn".to_string(), t_str), ("doi".to_string(), t_str)],
    );
    let t_book = sb.record(
        "Book",
        vec![
            FieldDef::new("title", t_str),
            FieldDef::new("lang", t_str).attribute(),
            FieldDef::new("author", t_author),
            FieldDef::new("id", t_ident).optional(),
        ],
    );
    let t_books = sb.seq("Books", t_book);
    let t_library = sb.record(
        "Library",
        vec![
            FieldDef::new("name", t_str),
            FieldDef::new("books", t_books),
        ],
    );
    let mut doc = Doc::new(sb.build());

    let name = doc.scalar(t_str, json!("City Library")).unwrap();

    let b1_title = doc.scalar(t_str, json!("Dune")).unwrap();
    let b1_lang = doc.scalar(t_str, json!("en")).unwrap();
    let b1_author_name = doc.scalar(t_str, json!("Herbert")).unwrap();
    let b1_born = doc.scalar(t_str, json!("1920")).unwrap();
    let b1_author = doc
        .record(
            t_author,
            vec![("name", b1_author_name), ("born", b1_born)],
        )
        .unwrap();
    let b1_isbn = doc.scalar(t_str, json!("978-0441013593")).unwrap();
    let b1_ident = doc.union(t_ident, "isbn", b1_isbn).unwrap();
    let book1 = doc
        .record(
            t_book,
            vec![
                ("title", b1_title),
                ("lang", b1_lang),
                ("author", b1_author),
                ("id", b1_ident),
            ],
        )
        .unwrap();

    let b2_title = doc.scalar(t_str, json!("Solaris")).unwrap();
    let b2_lang = doc.scalar(t_str, json!("pl")).unwrap();
    let b2_author_name = doc.scalar(t_str, json!("Lem")).unwrap();
    let b2_author = doc
        .record(t_author, vec![("name", b2_author_name)])
        .unwrap();
    let book2 = doc
        .record(
            t_book,
            vec![
                ("title", b2_title),
                ("lang", b2_lang),
                ("author", b2_author),
            ],
        )
        .unwrap();

    let books = doc.seq(t_books, vec![book1, book2]).unwrap();
    let lib = doc
        .record(t_library, vec![("name", name), ("books", books)])
        .unwrap();

    Library {
        doc,
        t_str,
        t_author,
        t_ident,
        t_book,
        t_books,
        t_library,
        lib,
        name,
        books,
        book1,
        b1_title,
        b1_lang,
        b1_author,
        b1_author_name,
        b1_born,
        b1_ident,
        b1_isbn,
        book2,
        b2_title,
        b2_lang,
        b2_author,
        b2_author_name,
    }
}

impl Library {
    /// Every node reachable from the library root, in landing order.
    pub fn preorder(&self) -> Vec<NodeId> {
        vec![
            self.lib,
            self.name,
            self.books,
            self.book1,
            self.b1_title,
            self.b1_lang,
            self.b1_author,
            self.b1_author_name,
            self.b1_born,
            self.b1_ident,
            self.b1_isbn,
            self.book2,
            self.b2_title,
            self.b2_lang,
            self.b2_author,
            self.b2_author_name,
        ]
    }
}

// ── Shared node: a DAG ────────────────────────────────────────────────────

/// `R { children: [A, B, B] }` where both sequence positions 1 and 2 hold
/// the same `B` node. `A.x` is optional and set; `B.x` is required.
pub struct SharedGraph {
    pub doc: Doc,
    pub t_t: TypeId,
    pub t_a: TypeId,
    pub t_b: TypeId,
    pub t_children: TypeId,
    pub t_r: TypeId,
    pub r: NodeId,
    pub children: NodeId,
    pub a: NodeId,
    pub b: NodeId,
    pub ax: NodeId,
    pub bx: NodeId,
}

pub fn shared_graph() -> SharedGraph {
    let mut sb = SchemaBuilder::new();
    let t_t = sb.scalar("T");
    let t_a = sb.record("A", vec![FieldDef::new("x", t_t).optional()]);
    let t_b = sb.record("B", vec![FieldDef::new("x", t_t)]);
    let t_children = sb.seq("Children", t_b);
    let t_r = sb.record("R", vec![FieldDef::new("children", t_children)]);
    let mut doc = Doc::new(sb.build());

    let ax = doc.scalar(t_t, json!("in-a")).unwrap();
    let a = doc.record(t_a, vec![("x", ax)]).unwrap();
    let bx = doc.scalar(t_t, json!("in-b")).unwrap();
    let b = doc.record(t_b, vec![("x", bx)]).unwrap();
    let children = doc.seq(t_children, vec![a, b, b]).unwrap();
    let r = doc.record(t_r, vec![("children", children)]).unwrap();

    SharedGraph {
        doc,
        t_t,
        t_a,
        t_b,
        t_children,
        t_r,
        r,
        children,
        a,
        b,
        ax,
        bx,
    }
}

// ── Ring: a true cycle ────────────────────────────────────────────────────

/// Three `Ring { tag, next?: Ring }` records closed into a cycle:
/// `n1 → n2 → n3 → n1`.
pub struct Ring {
    pub doc: Doc,
    pub t_t: TypeId,
    pub t_ring: TypeId,
    pub n1: NodeId,
    pub n2: NodeId,
    pub n3: NodeId,
    pub tag1: NodeId,
    pub tag2: NodeId,
    pub tag3: NodeId,
}

pub fn ring() -> Ring {
    let mut sb = SchemaBuilder::new();
    let t_t = sb.scalar("T");
    let t_ring = sb.declare("Ring");
    sb.fill_record(
        t_ring,
        vec![
            FieldDef::new("tag", t_t),
            FieldDef::new("next", t_ring).optional(),
        ],
    );
    let mut doc = Doc::new(sb.build());

    let tag1 = doc.scalar(t_t, json!(1)).unwrap();
    let tag2 = doc.scalar(t_t, json!(2)).unwrap();
    let tag3 = doc.scalar(t_t, json!(3)).unwrap();
    let n1 = doc.record(t_ring, vec![("tag", tag1)]).unwrap();
    let n2 = doc.record(t_ring, vec![("tag", tag2)]).unwrap();
    let n3 = doc.record(t_ring, vec![("tag", tag3)]).unwrap();
    doc.set_field(n1, "next", n2).unwrap();
    doc.set_field(n2, "next", n3).unwrap();
    doc.set_field(n3, "next", n1).unwrap();

    Ring {
        doc,
        t_t,
        t_ring,
        n1,
        n2,
        n3,
        tag1,
        tag2,
        tag3,
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Root descriptor without loop detection.
pub fn root(doc: &Doc, id: NodeId) -> Begin {
    Begin::new(doc.value(id).expect("node exists"))
}

/// Root descriptor with loop detection on.
pub fn looped(doc: &Doc, id: NodeId) -> Begin {
    Begin::detecting_loops(doc.value(id).expect("node exists"))
}

pub fn ids(values: impl IntoIterator<Item = ValueRef>) -> Vec<NodeId> {
    values.into_iter().map(|value| value.id).collect()
}
