//! Tests for first-run seeding of bundled decks

use carta_common::seed::seed_if_empty;
use carta_common::DeckStore;

const GOOD: &str = r#"{"name": "Sample", "options": [{"title": "A"}, {"title": "B"}]}"#;
const ALSO_GOOD: &str = r#"{"id": "fixed-id", "name": "Fixed", "options": [{"title": "Z"}]}"#;
const BAD: &str = r#"{"name": "Broken", "options": []}"#;

#[tokio::test]
async fn test_seed_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = DeckStore::new(dir.path().join("seed.db"));

    let report = seed_if_empty(&store, &[("good.json", GOOD), ("also.json", ALSO_GOOD)])
        .await
        .unwrap();
    assert_eq!(report.imported.len(), 2);
    assert_eq!(report.imported[1], "fixed-id");
    assert!(report.failed.is_empty());
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_seed_skips_populated_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = DeckStore::new(dir.path().join("seed.db"));
    store.import_json(ALSO_GOOD).await.unwrap();

    let report = seed_if_empty(&store, &[("good.json", GOOD)]).await.unwrap();
    assert!(report.is_empty());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_seed_continues_past_bad_deck() {
    let dir = tempfile::tempdir().unwrap();
    let store = DeckStore::new(dir.path().join("seed.db"));

    let report = seed_if_empty(
        &store,
        &[("bad.json", BAD), ("junk.json", "not json"), ("good.json", GOOD)],
    )
    .await
    .unwrap();
    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].0, "bad.json");
    assert!(report.failed[0].1.contains("at least one card"));
    assert_eq!(store.count().await.unwrap(), 1);
}
