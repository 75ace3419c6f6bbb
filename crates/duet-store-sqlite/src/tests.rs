//! Integration tests for `SqliteStore` against an in-memory database.

use duet_core::store::DocumentStore;
use serde_json::json;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

#[tokio::test]
async fn get_missing_key_returns_none() {
  let s = store().await;
  assert_eq!(s.get("nothing-here").await.unwrap(), None);
}

#[tokio::test]
async fn put_then_get_round_trips() {
  let s = store().await;
  let doc = json!({ "version": 1, "body": { "name": "Demo" } });

  s.put("profile:u1", doc.clone()).await.unwrap();
  assert_eq!(s.get("profile:u1").await.unwrap(), Some(doc));
}

#[tokio::test]
async fn put_replaces_the_whole_value() {
  let s = store().await;

  s.put("ratings:u1", json!({ "version": 1, "body": [1, 2, 3] }))
    .await
    .unwrap();
  s.put("ratings:u1", json!({ "version": 1, "body": [4] }))
    .await
    .unwrap();

  let stored = s.get("ratings:u1").await.unwrap().unwrap();
  // No merge: the earlier elements are gone.
  assert_eq!(stored["body"], json!([4]));
}

#[tokio::test]
async fn keys_are_independent() {
  let s = store().await;

  s.put("chat:a-b", json!(["hello"])).await.unwrap();
  s.put("chat:a-c", json!(["hi"])).await.unwrap();

  assert_eq!(s.get("chat:a-b").await.unwrap(), Some(json!(["hello"])));
  assert_eq!(s.get("chat:a-c").await.unwrap(), Some(json!(["hi"])));
}

#[tokio::test]
async fn delete_removes_the_key() {
  let s = store().await;

  s.put("user:current", json!("u1")).await.unwrap();
  s.delete("user:current").await.unwrap();
  assert_eq!(s.get("user:current").await.unwrap(), None);

  // Deleting an absent key is fine.
  s.delete("user:current").await.unwrap();
}
