use crate::tests::{check_invariants, session, state};
use crate::{EquivCheck, PosId, Session};

fn add(s: &mut Session, from: PosId, mov: i32, tag: &[u8], endpoint: i16) -> PosId {
    s.add_position(Some(from), mov, &state(tag), endpoint, EquivCheck::Skip)
        .unwrap()
}

#[test]
fn drop_root_is_refused() {
    let mut s = session();
    let root = s.root();
    s.clear_changed();
    assert_eq!(s.drop_position(root), root);
    assert_eq!(s.position_count(), 1);
    assert!(!s.has_changed());
}

#[test]
fn drop_non_leaf_is_refused() {
    let mut s = session();
    let root = s.root();
    let a = add(&mut s, root, 1, b"a", 0);
    add(&mut s, a, 1, b"aa", 0);
    s.clear_changed();
    assert_eq!(s.drop_position(a), a);
    assert_eq!(s.position_count(), 3);
    assert!(!s.has_changed());
    check_invariants(&s);
}

/// Dropping a position rewrites `better` references aimed at it, using
/// its own `better` as the replacement.
#[test]
fn drop_rewrites_better_references() {
    let mut s = session();
    let root = s.root();
    // e1 is deferred, so lookups skip it until resolution.
    let e1 = s
        .add_position(Some(root), 1, &state(b"shared"), 0, EquivCheck::Later)
        .unwrap();
    let b1 = add(&mut s, root, 2, b"b", 0);
    let d2 = add(&mut s, b1, 2, b"shared", 0);
    let c1 = add(&mut s, root, 3, b"c", 0);
    let z2 = s
        .add_position(Some(c1), 3, &state(b"shared"), 0, EquivCheck::Now)
        .unwrap();
    assert_eq!(s.position(z2).better(), Some(d2));

    // Resolution hands d2 a better of its own: the shallower e1.
    assert_eq!(s.resolve_deferred_betters(), 1);
    assert_eq!(s.position(d2).better(), Some(e1));

    assert_eq!(s.drop_position(d2), b1);
    assert_eq!(s.position(z2).better(), Some(e1));
    check_invariants(&s);
}

#[test]
fn drop_recalculates_solutions() {
    let mut s = session();
    let root = s.root();
    let a1 = add(&mut s, root, 1, b"a", 0);
    let a2 = add(&mut s, a1, 1, b"win", 1);
    assert_eq!(s.position(root).solution_size(), 2);
    assert_eq!(s.position(root).solution_end(), 1);

    assert_eq!(s.drop_position(a2), a1);
    assert_eq!(s.position(a1).solution_size(), 0);
    assert_eq!(s.position(a1).solution_end(), 0);
    assert_eq!(s.position(root).solution_size(), 0);
    assert_eq!(s.position(root).solution_end(), 0);
    check_invariants(&s);
}

/// Dropping one solution falls back to the next best surviving one.
#[test]
fn drop_keeps_sibling_solutions() {
    let mut s = session();
    let root = s.root();
    let a1 = add(&mut s, root, 1, b"a", 0);
    let lesser = add(&mut s, a1, 2, b"win-lesser", 1);
    let preferred = add(&mut s, a1, 3, b"win-preferred", 2);
    assert_eq!(s.position(root).solution_end(), 2);
    assert_eq!(s.position(root).solution_size(), 2);

    assert_eq!(s.drop_position(preferred), a1);
    assert_eq!(s.position(root).solution_end(), 1);
    assert_eq!(s.position(root).solution_size(), 2);

    assert_eq!(s.drop_position(lesser), a1);
    assert_eq!(s.position(root).solution_end(), 0);
    assert_eq!(s.position(root).solution_size(), 0);
    check_invariants(&s);
}

/// The freed id is reused by the next allocation.
#[test]
fn dropped_slot_is_recycled() {
    let mut s = session();
    let root = s.root();
    let a = add(&mut s, root, 1, b"a", 0);
    s.drop_position(a);
    let b = add(&mut s, root, 2, b"b", 0);
    assert_eq!(a, b, "free list hands back the last freed slot");
    assert_eq!(s.position_count(), 2);
    check_invariants(&s);
}
