mod common;

use objwalk::{AnyIter, NodeId, TreeWalk, TypeWalk, WalkError};
use objwalk_model::{Doc, Node};
use serde_json::{json, Value};

use common::{ids, library, root, shared_graph};

fn advance_until(walk: &mut TreeWalk<Doc>, doc: &Doc, id: NodeId) {
    while walk.current().map(|value| value.id) != Some(id) {
        assert!(walk.is_valid(), "walk exhausted before reaching the target");
        walk.advance(doc);
    }
}

#[test]
fn erase_seq_element_relands_on_its_successor() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    advance_until(&mut walk, &lib.doc, lib.book1);

    walk.erase(&mut lib.doc).unwrap();
    // the walk sits where an advance past the removed subtree would have
    // landed
    assert_eq!(walk.current().map(|v| v.id), Some(lib.book2));

    match lib.doc.node(lib.books).unwrap() {
        Node::Seq { items } => assert_eq!(items, &vec![lib.book2]),
        _ => panic!("expected seq"),
    }
    // a fresh drain no longer sees any of book1's subtree
    let seen = ids(AnyIter::new(&lib.doc, root(&lib.doc, lib.lib)));
    assert!(!seen.contains(&lib.book1));
    assert!(!seen.contains(&lib.b1_title));
    assert!(seen.contains(&lib.book2));
}

#[test]
fn erase_shared_occurrence_keeps_the_other_seat() {
    let mut g = shared_graph();
    let mut walk = TreeWalk::any();
    walk.init(&g.doc, root(&g.doc, g.r));
    // first occurrence of the shared node, at position 1
    advance_until(&mut walk, &g.doc, g.b);
    assert_eq!(walk.item_index(), Some(1));

    walk.erase(&mut g.doc).unwrap();
    // position 1 now holds the surviving occurrence of the same node
    assert_eq!(walk.current().map(|v| v.id), Some(g.b));
    assert_eq!(walk.item_index(), Some(1));
    match g.doc.node(g.children).unwrap() {
        Node::Seq { items } => assert_eq!(items, &vec![g.a, g.b]),
        _ => panic!("expected seq"),
    }

    let seen = ids(AnyIter::new(&g.doc, root(&g.doc, g.r)));
    assert_eq!(seen, vec![g.r, g.children, g.a, g.ax, g.b, g.bx]);
}

#[test]
fn erase_optional_field_unsets_it() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    advance_until(&mut walk, &lib.doc, lib.b1_born);

    walk.erase(&mut lib.doc).unwrap();
    assert_eq!(walk.current().map(|v| v.id), Some(lib.b1_ident));
    match lib.doc.node(lib.b1_author).unwrap() {
        Node::Record { fields } => assert!(!fields.contains_key("born")),
        _ => panic!("expected record"),
    }
}

#[test]
fn erase_required_field_refuses_and_stays_landed() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    advance_until(&mut walk, &lib.doc, lib.b1_title);

    assert_eq!(walk.erase(&mut lib.doc), Err(WalkError::EraseUnsupported));
    assert_eq!(walk.current().map(|v| v.id), Some(lib.b1_title));

    // the walk is still usable after the refusal
    walk.advance(&lib.doc);
    assert_eq!(walk.current().map(|v| v.id), Some(lib.b1_lang));
}

#[test]
fn erase_union_variant_clears_it() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    advance_until(&mut walk, &lib.doc, lib.b1_isbn);

    walk.erase(&mut lib.doc).unwrap();
    // the variant was book1's last slot, so the walk moves to book2
    assert_eq!(walk.current().map(|v| v.id), Some(lib.book2));
    match lib.doc.node(lib.b1_ident).unwrap() {
        Node::Union { variant } => assert!(variant.is_none()),
        _ => panic!("expected union"),
    }
}

#[test]
fn erase_at_the_root_refuses() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    assert_eq!(walk.erase(&mut lib.doc), Err(WalkError::EraseUnsupported));
    assert_eq!(walk.current().map(|v| v.id), Some(lib.lib));
}

#[test]
fn erase_without_a_landing_refuses() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    assert_eq!(walk.erase(&mut lib.doc), Err(WalkError::NotPositioned));

    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    while walk.is_valid() {
        walk.advance(&lib.doc);
    }
    assert_eq!(walk.erase(&mut lib.doc), Err(WalkError::NotPositioned));
}

#[test]
fn type_walk_reads_edits_and_erases() {
    let mut lib = library();
    let mut walk: TypeWalk<Doc, Value> = TypeWalk::new(lib.doc.schema().ty(lib.t_str));
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    assert_eq!(walk.get(&lib.doc), Some(&json!("City Library")));

    *walk.get_mut(&mut lib.doc).unwrap() = json!("Town Library");
    assert_eq!(walk.get(&lib.doc), Some(&json!("Town Library")));

    // walk on to the optional "born" field and remove it
    for _ in 0..4 {
        walk.advance(&lib.doc);
    }
    assert_eq!(walk.get(&lib.doc), Some(&json!("1920")));
    walk.erase(&mut lib.doc).unwrap();
    assert_eq!(walk.get(&lib.doc), Some(&json!("978-0441013593")));

    match lib.doc.node(lib.b1_author).unwrap() {
        Node::Record { fields } => assert!(!fields.contains_key("born")),
        _ => panic!("expected record"),
    }
}

#[test]
fn clone_before_erase_is_unaffected_structurally() {
    let mut lib = library();
    let mut walk = TreeWalk::any();
    walk.init(&lib.doc, root(&lib.doc, lib.lib));
    advance_until(&mut walk, &lib.doc, lib.b1_born);
    let copy = walk.clone();

    walk.erase(&mut lib.doc).unwrap();
    // the clone still designates the detached value
    assert_eq!(copy.current().map(|v| v.id), Some(lib.b1_born));
}
