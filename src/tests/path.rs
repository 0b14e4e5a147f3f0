use crate::tests::{check_invariants, session, state};
use crate::{EquivCheck, PosId, Session};

fn add(s: &mut Session, from: PosId, mov: i32, tag: &[u8], endpoint: i16) -> PosId {
    s.add_position(Some(from), mov, &state(tag), endpoint, EquivCheck::Skip)
        .unwrap()
}

/// No solution below the source: nothing happens.
#[test]
fn duplicate_path_without_solution_is_refused() {
    let mut s = session();
    let root = s.root();
    let a1 = add(&mut s, root, 1, b"a", 0);
    let b1 = add(&mut s, root, 2, b"b", 0);
    s.clear_changed();
    assert!(!s.duplicate_path(b1, a1));
    assert_eq!(s.position_count(), 3);
    assert!(!s.has_changed());
}

/// The best solution below the source is re-added move by move under the
/// destination, and the destination joins the equivalence chain.
#[test]
fn duplicate_path_copies_the_best_solution() {
    let mut s = session();
    let root = s.root();
    // A dead-end route whose tip shares c1's state.
    let a1 = add(&mut s, root, 1, b"a", 0);
    let a2 = add(&mut s, a1, 1, b"fork", 0);
    // The solution spine: c1 —c→ c2 —c→ c3 —c→ c4 (endpoint).
    let c1 = add(&mut s, root, 3, b"fork", 0);
    let c2 = add(&mut s, c1, 3, b"fc", 0);
    let c3 = add(&mut s, c2, 3, b"fcc", 0);
    let c4 = add(&mut s, c3, 3, b"solved", 1);
    assert_eq!(s.position(c1).solution_size(), 4);
    assert_eq!(s.position(a2).solution_size(), 0);

    assert!(s.duplicate_path(a2, c1));

    // Three copies: the endpoint lands two moves deeper than the original.
    assert_eq!(s.position_count(), 10);
    assert_eq!(s.position(a2).solution_size(), 5);
    assert_eq!(s.position(a2).branch_count(), 1);
    let copy1 = s.next_position(a2, 3).unwrap();
    let copy2 = s.next_position(copy1, 3).unwrap();
    let copy3 = s.next_position(copy2, 3).unwrap();
    assert_eq!(s.position(copy3).endpoint(), 1);
    assert_eq!(s.position(copy3).move_count(), 5);
    assert_eq!(s.state(copy3), s.state(c4));

    // Catch-up links: each copy joins the chain of its source twin.
    assert_eq!(s.position(a2).better(), Some(c1));
    assert_eq!(s.position(copy1).better(), Some(c2));
    assert_eq!(s.position(copy2).better(), Some(c3));
    assert_eq!(s.position(copy3).better(), None);

    // The longer copy does not displace the original solution above.
    assert_eq!(s.position(root).solution_size(), 4);
    assert_eq!(s.position(a1).solution_size(), 5);
    check_invariants(&s);
}

/// The copy follows the preferred solution when several exist.
#[test]
fn duplicate_path_follows_the_preferred_solution() {
    let mut s = session();
    let root = s.root();
    let src = add(&mut s, root, 1, b"fork", 0);
    add(&mut s, src, 2, b"win-lesser", 1);
    let keep = add(&mut s, src, 3, b"mid", 0);
    add(&mut s, keep, 3, b"win-preferred", 2);
    assert_eq!(s.position(src).solution_end(), 2);

    let dest = add(&mut s, root, 4, b"fork", 0);
    assert!(s.duplicate_path(dest, src));
    let (mov, first) = s.moves(dest).next().unwrap();
    assert_eq!(mov, 3, "the endpoint-2 route is copied, not the shorter endpoint-1");
    let (_, second) = s.moves(first).next().unwrap();
    assert_eq!(s.position(second).endpoint(), 2);
    check_invariants(&s);
}
