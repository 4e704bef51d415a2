// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`ObjectStore`] backed by a mutex-guarded `BTreeMap`.
//!
//! Serves two roles: the test double for every crate in the workspace, and a
//! usable backend for fully in-process embedding. A `BTreeMap` rather than a
//! `HashMap` keeps `list_keys` output sorted without an extra pass.
//!
//! `move_object` removes and reinserts under a single lock acquisition, so
//! of any number of concurrent movers of the same source key exactly one
//! succeeds -- the atomicity contract claim() depends on.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use stowage_core::{ObjectStore, StowageError};

/// A mutex-guarded in-memory blob store.
#[derive(Debug, Default, Clone)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects. Test helper.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    /// Whether the store holds no objects. Test helper.
    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StowageError> {
        Ok(self.objects.lock().await.get(key).cloned())
    }

    async fn put_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), StowageError> {
        trace!(key = %key, len = bytes.len(), "put object");
        self.objects.lock().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StowageError> {
        trace!(key = %key, "delete object");
        self.objects.lock().await.remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StowageError> {
        let objects = self.objects.lock().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn move_object(&self, from: &str, to: &str) -> Result<(), StowageError> {
        let mut objects = self.objects.lock().await;
        match objects.remove(from) {
            Some(bytes) => {
                objects.insert(to.to_string(), bytes);
                trace!(from = %from, to = %to, "moved object");
                Ok(())
            }
            None => Err(StowageError::NotFound {
                what: "object",
                id: from.to_string(),
            }),
        }
    }

    async fn verify_access(&self) -> Result<(), StowageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_absent_key_returns_none() {
        let store = MemoryObjectStore::new();
        assert!(store.get_raw("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let store = MemoryObjectStore::new();
        store.put_raw("a/b.json", b"{}".to_vec()).await.unwrap();
        assert_eq!(store.get_raw("a/b.json").await.unwrap().unwrap(), b"{}");

        store.delete_object("a/b.json").await.unwrap();
        assert!(store.get_raw("a/b.json").await.unwrap().is_none());
        // Deleting again is a no-op.
        store.delete_object("a/b.json").await.unwrap();
    }

    #[tokio::test]
    async fn list_keys_is_prefix_scoped_and_sorted() {
        let store = MemoryObjectStore::new();
        for key in ["q/p/2.json", "q/a/1.json", "q/p/1.json", "v/t.enc"] {
            store.put_raw(key, vec![]).await.unwrap();
        }

        let keys = store.list_keys("q/p/").await.unwrap();
        assert_eq!(keys, vec!["q/p/1.json", "q/p/2.json"]);

        let all = store.list_keys("").await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn move_object_transfers_content() {
        let store = MemoryObjectStore::new();
        store.put_raw("src", b"payload".to_vec()).await.unwrap();

        store.move_object("src", "dst").await.unwrap();
        assert!(store.get_raw("src").await.unwrap().is_none());
        assert_eq!(store.get_raw("dst").await.unwrap().unwrap(), b"payload");
    }

    #[tokio::test]
    async fn move_absent_object_fails_not_found() {
        let store = MemoryObjectStore::new();
        let err = store.move_object("nope", "dst").await.unwrap_err();
        assert!(matches!(err, StowageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn concurrent_moves_have_exactly_one_winner() {
        let store = MemoryObjectStore::new();
        store.put_raw("contended", b"x".to_vec()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .move_object("contended", &format!("claimed/{i}"))
                    .await
                    .is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
