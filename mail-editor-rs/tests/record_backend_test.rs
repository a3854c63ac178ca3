//! Integration tests for database-record template backend

use mail_editor_rs::error::EditorError;
use mail_editor_rs::preview::{BackendKind, PreviewDescriptor, PreviewEnv, PreviewProvider};
use mail_editor_rs::store::{FileStore, RecordStore};
use serde_json::{json, Map, Value};
use sqlx::SqlitePool;
use std::sync::Arc;

async fn setup_store() -> RecordStore {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let store = RecordStore::new(pool);
    store.init_db().await.unwrap();
    store
}

struct OrderPreview {
    language: Option<&'static str>,
}

impl PreviewProvider for OrderPreview {
    fn template_name(&self) -> &str {
        "order_confirmation"
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Record
    }

    fn language(&self) -> Option<&str> {
        self.language
    }

    fn context(&self) -> Value {
        json!({ "order": { "number": "1234" }, "name": "Ada" })
    }
}

fn env_with(store: RecordStore) -> PreviewEnv {
    PreviewEnv {
        file_store: FileStore::new(vec![]),
        record_store: Some(store),
    }
}

#[tokio::test]
async fn test_default_lookup_never_returns_language_variant() {
    let store = setup_store().await;
    store
        .create("order_confirmation", Some("fr"), "Commande", "<p>fr</p>", "")
        .await
        .unwrap();
    store
        .create("order_confirmation", None, "Order", "<p>base</p>", "")
        .await
        .unwrap();

    let record = store.find("order_confirmation", None).await.unwrap();
    assert!(record.is_default);
    assert_eq!(record.html_content, "<p>base</p>");
}

#[tokio::test]
async fn test_language_lookup_never_returns_default() {
    let store = setup_store().await;
    store
        .create("order_confirmation", None, "Order", "<p>base</p>", "")
        .await
        .unwrap();
    store
        .create("order_confirmation", Some("fr"), "Commande", "<p>fr</p>", "")
        .await
        .unwrap();

    let record = store.find("order_confirmation", Some("fr")).await.unwrap();
    assert!(!record.is_default);
    assert_eq!(record.language, "fr");

    // A language with no variant must not fall back to the base record.
    let err = store.find("order_confirmation", Some("de")).await.unwrap_err();
    assert!(matches!(err, EditorError::NotFound(_)));
}

#[tokio::test]
async fn test_missing_record_carries_attempted_identifier() {
    let store = setup_store().await;
    let err = store.find("ghost", None).await.unwrap_err();
    match err {
        EditorError::NotFound(attempted) => assert_eq!(attempted, "ghost"),
        other => panic!("expected NotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_record_render_and_subject() {
    let store = setup_store().await;
    store
        .create(
            "order_confirmation",
            None,
            "Order {{ order.number }} confirmed",
            "<p>Thanks {{ name }}</p>",
            "",
        )
        .await
        .unwrap();

    let descriptor =
        PreviewDescriptor::new(Arc::new(OrderPreview { language: None }), &env_with(store))
            .unwrap();

    assert_eq!(
        descriptor.render(&Map::new()).await.unwrap(),
        "<p>Thanks Ada</p>"
    );
    assert_eq!(
        descriptor.subject().await.unwrap(),
        Some("Order 1234 confirmed".to_string())
    );
}

#[tokio::test]
async fn test_record_write_updates_html_content() {
    let store = setup_store().await;
    let created = store
        .create("order_confirmation", None, "Order", "<p>old</p>", "")
        .await
        .unwrap();

    let descriptor = PreviewDescriptor::new(
        Arc::new(OrderPreview { language: None }),
        &env_with(store.clone()),
    )
    .unwrap();

    descriptor
        .write("<p>new</p><script>bad()</script>")
        .await
        .unwrap();

    let record = store.find("order_confirmation", None).await.unwrap();
    assert_eq!(record.id, created.id);
    assert!(record.html_content.contains("<p>new</p>"));
    assert!(!record.html_content.contains("script"));
    assert!(record.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_raw_content_falls_back_to_plain_content() {
    let store = setup_store().await;
    store
        .create("order_confirmation", None, "Order", "", "plain text body")
        .await
        .unwrap();

    let descriptor = PreviewDescriptor::new(
        Arc::new(OrderPreview { language: None }),
        &env_with(store),
    )
    .unwrap();

    assert_eq!(descriptor.raw_content().await.unwrap(), "plain text body");
}

#[tokio::test]
async fn test_language_variant_selected_through_descriptor() {
    let store = setup_store().await;
    store
        .create("order_confirmation", None, "Order", "<p>base</p>", "")
        .await
        .unwrap();
    store
        .create(
            "order_confirmation",
            Some("fr"),
            "Commande",
            "<p>Merci {{ name }}</p>",
            "",
        )
        .await
        .unwrap();

    let descriptor = PreviewDescriptor::new(
        Arc::new(OrderPreview { language: Some("fr") }),
        &env_with(store),
    )
    .unwrap();

    assert_eq!(
        descriptor.render(&Map::new()).await.unwrap(),
        "<p>Merci Ada</p>"
    );
}
