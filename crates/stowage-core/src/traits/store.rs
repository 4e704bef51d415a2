// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object store seam: the flat blob store everything persists through.
//!
//! The concrete client (S3-compatible bucket, local directory, ...) lives
//! outside this core. Implementations must honor two contracts the queue
//! relies on:
//!
//! - `list_keys` returns keys in lexicographic order, so status-prefixed
//!   listings are deterministic.
//! - `move_object` is atomic: of any number of concurrent movers of the same
//!   source key, exactly one succeeds and the rest observe `NotFound`. This
//!   is the primitive that makes claim() exclusive.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StowageError;

/// A flat string-keyed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the raw bytes at `key`, or `None` if absent.
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StowageError>;

    /// Write `bytes` at `key`, fully replacing any prior content.
    async fn put_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), StowageError>;

    /// Delete the object at `key`. Deleting an absent key is a no-op.
    async fn delete_object(&self, key: &str) -> Result<(), StowageError>;

    /// List all keys starting with `prefix`, in lexicographic order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StowageError>;

    /// Atomically move the object at `from` to `to`.
    ///
    /// Fails with [`StowageError::NotFound`] if `from` does not exist at the
    /// moment of the move. Concurrent movers of the same `from` key must see
    /// exactly one success.
    async fn move_object(&self, from: &str, to: &str) -> Result<(), StowageError>;

    /// Verify the store is reachable and writable.
    async fn verify_access(&self) -> Result<(), StowageError>;
}

/// Typed JSON helpers over any [`ObjectStore`].
#[async_trait]
pub trait ObjectStoreExt: ObjectStore {
    /// Fetch and deserialize the JSON object at `key`.
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StowageError> {
        match self.get_raw(key).await? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(StowageError::storage)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serialize `value` as JSON and write it at `key`.
    async fn put_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StowageError> {
        let bytes = serde_json::to_vec(value).map_err(StowageError::storage)?;
        self.put_raw(key, bytes).await
    }
}

impl<S: ObjectStore + ?Sized> ObjectStoreExt for S {}
