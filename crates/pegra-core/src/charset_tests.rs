use crate::CharSet;

#[test]
fn positive_set_contains() {
    let set = CharSet::of("abc".chars());
    assert!(set.contains('a'));
    assert!(set.contains('c'));
    assert!(!set.contains('d'));
}

#[test]
fn negated_set_inverts() {
    let set = CharSet::all_but("ab".chars());
    assert!(!set.contains('a'));
    assert!(set.contains('z'));
}

#[test]
fn order_and_duplicates_are_irrelevant() {
    let a = CharSet::of("cba".chars());
    let b = CharSet::of("aabbcc".chars());
    assert_eq!(a, b);
    assert_eq!(a.chars(), &['a', 'b', 'c']);
}

#[test]
fn empty_negated_set_matches_everything() {
    let set = CharSet::all_but(std::iter::empty());
    assert!(set.is_empty());
    assert!(set.contains('x'));
    assert!(set.contains('\0'));
}

#[test]
fn display_renders_negation_marker() {
    assert_eq!(CharSet::of("ab".chars()).to_string(), "[ab]");
    assert_eq!(CharSet::all_but("ab".chars()).to_string(), "^[ab]");
}
