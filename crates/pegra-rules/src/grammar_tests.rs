use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{BuildError, Builder, Grammar, GrammarCell};

fn tiny() -> Result<Grammar<()>, BuildError> {
    let mut b = Builder::new();
    let root = b.string("ab")?;
    b.finish(root)
}

#[test]
fn finish_rejects_a_foreign_root() {
    let mut donor = Builder::<()>::new();
    let foreign = donor.ch('a').unwrap();

    let empty = Builder::<()>::new();
    assert!(matches!(
        empty.finish(foreign),
        Err(BuildError::InvalidRoot { id: 0 })
    ));
}

#[test]
fn definitions_survive_finishing() {
    let mut b = Builder::<()>::new();
    let word = b
        .rule("word", vec![], |b, _| b.one_or_more('w'))
        .unwrap();
    let g = b.finish(word).unwrap();
    assert_eq!(g.definition("word"), Some(word));
    assert_eq!(g.definition("missing"), None);
    assert_eq!(g.label(word), Some("word"));
}

#[test]
fn cell_builds_exactly_once_under_contention() {
    static CELL: GrammarCell<()> = GrammarCell::new();
    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    fn build_counted() -> Result<Grammar<()>, BuildError> {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        tiny()
    }

    let grammars: Vec<Arc<Grammar<()>>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| CELL.get_or_build(build_counted).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    assert!(grammars.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn cell_publishes_the_same_error_to_every_caller() {
    let cell: GrammarCell<()> = GrammarCell::new();
    let first = cell
        .get_or_build(|| Err(BuildError::EmptyCharSet { rule: None }))
        .unwrap_err();
    let second = cell
        .get_or_build(|| -> Result<Grammar<()>, BuildError> {
            panic!("build must not run twice")
        })
        .unwrap_err();
    assert_eq!(first, second);
}

#[test]
fn grammar_is_shareable_across_threads() {
    let g = Arc::new(tiny().unwrap());
    std::thread::scope(|s| {
        for _ in 0..4 {
            let g = Arc::clone(&g);
            s.spawn(move || {
                assert_eq!(g.label(g.root()), Some("\"ab\""));
            });
        }
    });
}
