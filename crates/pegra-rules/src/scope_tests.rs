use pegra_core::{MatcherKind, RuleId, Scope};

use crate::{BuildError, Builder};

fn capture(_scope: &mut dyn Scope<()>) -> bool {
    true
}

fn shift_of(b: &Builder<()>, id: RuleId) -> u8 {
    match b.graph().kind(id) {
        MatcherKind::Action { shift, .. } => *shift,
        other => panic!("expected action node, got {other:?}"),
    }
}

#[test]
fn nested_single_level_markers_add_up() {
    let mut b = Builder::new();
    let nested = b.up(1, |b| b.up(1, |b| b.action(capture))).unwrap();
    let direct = b.up(2, |b| b.action(capture)).unwrap();
    assert_eq!(nested, direct);
    assert_eq!(shift_of(&b, nested), 2);
}

#[test]
fn down_reverses_up() {
    let mut b = Builder::new();
    let reversed = b.up(1, |b| b.down(1, |b| b.action(capture))).unwrap();
    let plain = b.action(capture).unwrap();
    assert_eq!(reversed, plain);
    assert_eq!(shift_of(&b, reversed), 0);
}

#[test]
fn down_without_up_fails() {
    let mut b = Builder::new();
    assert!(matches!(
        b.down(1, |b| b.action(capture)),
        Err(BuildError::ReversalUnderflow { shift: 0, count: 1, .. })
    ));
}

#[test]
fn reversal_beyond_the_forward_shift_fails() {
    let mut b = Builder::new();
    let result = b.up(1, |b| b.down(2, |b| b.action(capture)));
    assert!(matches!(
        result,
        Err(BuildError::ReversalUnderflow { shift: 1, count: 2, .. })
    ));
}

#[test]
fn marker_count_outside_one_to_four_fails() {
    let mut b = Builder::new();
    assert!(matches!(
        b.up(0, |b| b.action(capture)),
        Err(BuildError::MarkerOutOfRange { count: 0, .. })
    ));
    assert!(matches!(
        b.up(5, |b| b.action(capture)),
        Err(BuildError::MarkerOutOfRange { count: 5, .. })
    ));
}

#[test]
fn four_levels_up_is_the_supported_maximum() {
    let mut b = Builder::new();
    let id = b.up(4, |b| b.action(capture)).unwrap();
    assert_eq!(shift_of(&b, id), 4);

    let result = b.up(4, |b| b.up(1, |b| b.action(capture)));
    assert!(matches!(
        result,
        Err(BuildError::ShiftTooDeep { shift: 5, .. })
    ));
}

#[test]
fn actions_under_different_shifts_are_distinct_nodes() {
    let mut b = Builder::new();
    let plain = b.action(capture).unwrap();
    let raised = b.up(1, |b| b.action(capture)).unwrap();
    assert_ne!(plain, raised);
}

#[test]
fn markers_do_not_leak_into_named_rule_bodies() {
    let mut b = Builder::new();
    let inside = b
        .up(2, |b| b.rule("inner", vec![], |b, _| b.action(capture)))
        .unwrap();
    assert_eq!(shift_of(&b, inside), 0);
}

#[test]
fn shift_is_restored_after_the_marker_closure() {
    let mut b = Builder::new();
    b.up(2, |b| b.action(capture)).unwrap();
    let after = b.action(capture).unwrap();
    assert_eq!(shift_of(&b, after), 0);
}
