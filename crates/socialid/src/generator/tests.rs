use crate::{
    Error, IdentifierSpace, MemoryStore, PoolGenerator, ShuffleSource, SocialStore, WordLists,
};
use std::collections::HashSet;

struct NoShuffle;
impl ShuffleSource for NoShuffle {
    fn shuffle(&self, _ids: &mut [String]) {}
}

struct Reverse;
impl ShuffleSource for Reverse {
    fn shuffle(&self, ids: &mut [String]) {
        ids.reverse();
    }
}

fn scenario_words() -> WordLists {
    WordLists::new(["Brave"], ["Crimson"], ["Mango", "Kiwi"]).unwrap()
}

#[test]
fn loads_every_candidate_exactly_once() {
    let store = MemoryStore::new();
    let words = WordLists::default();
    let generator = PoolGenerator::new(&store, &words);

    let loaded = generator.regenerate_pool().unwrap();
    let pool = store.pool_snapshot();

    assert_eq!(loaded, generator.space().len());
    assert_eq!(pool.len(), loaded);
    let members: HashSet<String> = pool.into_iter().collect();
    let expected: HashSet<String> = IdentifierSpace::new(&words).iter().collect();
    assert_eq!(members, expected);
}

#[test]
fn pool_order_follows_the_shuffle_source() {
    let store = MemoryStore::new();
    PoolGenerator::with_shuffle(&store, &scenario_words(), NoShuffle)
        .regenerate_pool()
        .unwrap();
    assert_eq!(
        store.pool_snapshot(),
        ["BraveCrimsonMango", "BraveCrimsonKiwi"]
    );

    PoolGenerator::with_shuffle(&store, &scenario_words(), Reverse)
        .regenerate_pool()
        .unwrap();
    assert_eq!(store.pop_identifier().unwrap().as_deref(), Some("BraveCrimsonKiwi"));
}

#[test]
fn regenerating_twice_keeps_the_set_but_not_the_order() {
    let store = MemoryStore::new();
    let generator = PoolGenerator::new(&store, &WordLists::default());

    generator.regenerate_pool().unwrap();
    let first = store.pool_snapshot();
    generator.regenerate_pool().unwrap();
    let second = store.pool_snapshot();

    assert_eq!(first.len(), second.len());
    assert_eq!(
        first.iter().collect::<HashSet<_>>(),
        second.iter().collect::<HashSet<_>>()
    );
    assert_ne!(first, second);
}

#[test]
fn regeneration_replaces_pool_and_keeps_bindings() {
    let store = MemoryStore::new();
    store.replace_pool(&["Stale".to_string()]).unwrap();
    store.bind("alice", "BraveCrimsonMango").unwrap();

    PoolGenerator::with_shuffle(&store, &scenario_words(), NoShuffle)
        .regenerate_pool()
        .unwrap();

    assert_eq!(store.pool_len().unwrap(), 2);
    assert!(!store.pool_snapshot().contains(&"Stale".to_string()));
    assert_eq!(
        store.binding("alice").unwrap().as_deref(),
        Some("BraveCrimsonMango")
    );
}

#[test]
fn ambiguous_word_lists_leave_the_store_untouched() {
    let store = MemoryStore::new();
    store.replace_pool(&["Keep".to_string()]).unwrap();
    let words = WordLists::new(["Ab", "AbC"], ["CD", "D"], ["x"]).unwrap();

    let err = PoolGenerator::new(&store, &words)
        .regenerate_pool()
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateIdentifier { .. }));
    assert_eq!(store.pool_snapshot(), ["Keep"]);
}

#[test]
fn generate_does_not_write() {
    let store = MemoryStore::new();
    let ids = PoolGenerator::with_shuffle(&store, &scenario_words(), NoShuffle)
        .generate()
        .unwrap();
    assert_eq!(ids, ["BraveCrimsonMango", "BraveCrimsonKiwi"]);
    assert_eq!(store.pool_len().unwrap(), 0);
}
