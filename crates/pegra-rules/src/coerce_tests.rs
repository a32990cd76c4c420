use pegra_core::{MatcherKind, RuleId, Scope};

use crate::{BuildError, Builder, CoercionHooks, Lit};

fn mark(_scope: &mut dyn Scope<()>) -> bool {
    true
}

#[test]
fn char_coerces_to_char_node() {
    let mut b = Builder::<()>::new();
    let id = b.to_rule('a'.into()).unwrap();
    assert_eq!(b.graph().kind(id), &MatcherKind::Char('a'));
}

#[test]
fn string_coerces_to_labeled_sequence() {
    let mut b = Builder::<()>::new();
    let id = b.to_rule("ab".into()).unwrap();
    assert!(matches!(b.graph().kind(id), MatcherKind::Sequence(_)));
    assert_eq!(b.graph().label(id), Some("\"ab\""));
}

#[test]
fn char_array_coerces_like_a_string() {
    let mut b = Builder::<()>::new();
    let from_chars = b.to_rule(vec!['a', 'b'].into()).unwrap();
    let from_str = b.string("ab").unwrap();
    assert_eq!(from_chars, from_str);
}

#[test]
fn existing_rule_passes_through_unchanged() {
    let mut b = Builder::<()>::new();
    let id = b.ch('a').unwrap();
    assert_eq!(b.to_rule(id.into()).unwrap(), id);
}

#[test]
fn action_coerces_to_action_node() {
    let mut b = Builder::<()>::new();
    let id = b.to_rule(Lit::Action(mark)).unwrap();
    assert!(matches!(
        b.graph().kind(id),
        MatcherKind::Action { shift: 0, .. }
    ));
}

#[test]
fn to_rules_preserves_order() {
    let mut b = Builder::<()>::new();
    let ids = b.to_rules(vec!['a'.into(), 'b'.into()]).unwrap();
    assert_eq!(b.graph().kind(ids[0]), &MatcherKind::Char('a'));
    assert_eq!(b.graph().kind(ids[1]), &MatcherKind::Char('b'));
}

#[test]
fn foreign_handle_fails_coercion() {
    let mut donor = Builder::<()>::new();
    donor.ch('a').unwrap();
    donor.ch('b').unwrap();
    let foreign = donor.ch('c').unwrap();

    let mut b = Builder::<()>::new();
    b.ch('x').unwrap();
    assert!(matches!(
        b.to_rule(foreign.into()),
        Err(BuildError::Coercion { .. })
    ));
}

#[test]
fn char_hook_can_splice_trailing_whitespace() {
    fn spaced_char(b: &mut Builder<()>, c: char) -> Result<RuleId, BuildError> {
        let c = b.ch(c)?;
        let ws = b.zero_or_more(' ')?;
        b.sequence(vec![c.into(), ws.into()])
    }
    let hooks = CoercionHooks {
        from_char_literal: spaced_char,
        ..CoercionHooks::default()
    };
    let mut b = Builder::with_hooks(hooks);

    let coerced = b.to_rule('a'.into()).unwrap();
    assert!(matches!(b.graph().kind(coerced), MatcherKind::Sequence(_)));

    // the explicit wrapper bypasses the hook
    let explicit = b.ch('a').unwrap();
    assert_eq!(b.graph().kind(explicit), &MatcherKind::Char('a'));
}

#[test]
fn string_literals_route_through_the_char_array_hook() {
    fn upper_array(b: &mut Builder<()>, chars: &[char]) -> Result<RuleId, BuildError> {
        let upper: Vec<char> = chars.iter().map(|c| c.to_ascii_uppercase()).collect();
        b.string_chars(&upper)
    }
    let hooks = CoercionHooks {
        from_char_array: upper_array,
        ..CoercionHooks::default()
    };
    let mut b = Builder::with_hooks(hooks);
    let id = b.to_rule("ab".into()).unwrap();
    assert_eq!(b.graph().label(id), Some("\"AB\""));
}
