// ═══════════════════════════════════════════════════════════════════
// Storage Tests — StateStore contract, FileStore
// ═══════════════════════════════════════════════════════════════════

use stock_portfolio_core::models::portfolio::Portfolio;
use stock_portfolio_core::storage::manager::{FileStore, StateStore, STORAGE_KEY};

// ═══════════════════════════════════════════════════════════════════
// Storage key
// ═══════════════════════════════════════════════════════════════════

mod key {
    use super::*;

    #[test]
    fn fixed_storage_key() {
        assert_eq!(STORAGE_KEY, "stock-portfolio");
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[tokio::test]
    async fn load_of_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let loaded = store.load(STORAGE_KEY).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save(STORAGE_KEY, r#"{"holdings":[]}"#).await.unwrap();
        let loaded = store.load(STORAGE_KEY).await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"holdings":[]}"#));
    }

    #[tokio::test]
    async fn save_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save(STORAGE_KEY, "first").await.unwrap();
        store.save(STORAGE_KEY, "second").await.unwrap();

        let loaded = store.load(STORAGE_KEY).await.unwrap();
        assert_eq!(loaded.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("app").join("state");
        let store = FileStore::new(&nested);

        store.save(STORAGE_KEY, "{}").await.unwrap();
        assert!(nested.join("stock-portfolio.json").exists());
    }

    #[tokio::test]
    async fn key_maps_to_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("other-key", "value").await.unwrap();
        assert!(dir.path().join("other-key.json").exists());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("a", "1").await.unwrap();
        store.save("b", "2").await.unwrap();

        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.load("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn serialized_portfolio_survives_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let mut portfolio = Portfolio::new();
        portfolio.add_stock("AAPL", 10, 150.0);
        let json = serde_json::to_string(&portfolio).unwrap();

        store.save(STORAGE_KEY, &json).await.unwrap();
        let loaded = store.load(STORAGE_KEY).await.unwrap().unwrap();
        let back: Portfolio = serde_json::from_str(&loaded).unwrap();
        assert_eq!(back, portfolio);
    }
}
