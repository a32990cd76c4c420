use crate::{MatcherKind, RuleGraph};

fn sample() -> RuleGraph<()> {
    let mut g = RuleGraph::new();
    let a = g.push(MatcherKind::Char('a'));
    let b = g.push(MatcherKind::Char('b'));
    let seq = g.push(MatcherKind::Sequence(vec![a, b]));
    g.set_label(seq, "\"ab\"");
    g
}

#[test]
fn push_assigns_sequential_ids() {
    let g = sample();
    assert_eq!(g.len(), 3);
    let ids: Vec<u32> = g.live_nodes().map(|(id, _)| id.as_u32()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn replace_refs_rewrites_children() {
    let mut g: RuleGraph<()> = RuleGraph::new();
    let placeholder = g.push_placeholder();
    let open = g.push(MatcherKind::Char('('));
    let seq = g.push(MatcherKind::Sequence(vec![open, placeholder]));
    let real = g.push(MatcherKind::FirstOf(vec![seq, open]));

    g.replace_refs(placeholder, real);
    g.retire(placeholder);

    assert_eq!(g.kind(seq), &MatcherKind::Sequence(vec![open, real]));
    assert!(g.node(placeholder).is_retired());
    assert!(g.live_nodes().all(|(id, _)| id != placeholder));
}

#[test]
fn label_if_unset_keeps_existing_label() {
    let mut g: RuleGraph<()> = RuleGraph::new();
    let id = g.push_labeled(MatcherKind::Any, "ANY");
    g.label_if_unset(id, "other");
    assert_eq!(g.label(id), Some("ANY"));
}

#[test]
fn definitions_iterate_in_registration_order() {
    let mut g: RuleGraph<()> = RuleGraph::new();
    let a = g.push(MatcherKind::Char('a'));
    let b = g.push(MatcherKind::Char('b'));
    g.define("second", b);
    g.define("first", a);
    g.define("second", a); // first definition wins

    let defs: Vec<_> = g.definitions().collect();
    assert_eq!(defs, vec![("second", b), ("first", a)]);
}

#[test]
fn dump_skips_retired_slots() {
    let mut g: RuleGraph<()> = RuleGraph::new();
    let placeholder = g.push_placeholder();
    let x = g.push(MatcherKind::Char('x'));
    let rep = g.push(MatcherKind::OneOrMore(x));
    g.replace_refs(placeholder, rep);
    g.retire(placeholder);

    insta::assert_snapshot!(g.dump(), @r"
    r1 Char 'x'
    r2 OneOrMore r1
    ");
}

#[test]
fn dump_renders_kinds_and_labels() {
    insta::assert_snapshot!(sample().dump(), @r#"
    r0 Char 'a'
    r1 Char 'b'
    r2 Sequence r0 r1 ; "ab"
    "#);
}
