// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped, versioned, encrypted-at-rest secret storage.
//!
//! Each scope's secrets are one JSON document, encrypted into a
//! self-describing envelope and persisted with a monotonic version counter:
//!
//! ```text
//! vaults/
//! ├── team.json.enc            # singleton
//! ├── organization.json.enc    # singleton
//! ├── company.json.enc         # singleton
//! └── machines/
//!     └── {machine}.json.enc   # one per machine
//! ```
//!
//! Plain [`set_scoped`](VaultStore::set_scoped) is last-writer-wins; the
//! versioned [`update_scoped`](VaultStore::update_scoped) surface rejects a
//! write whose expected version has been overtaken (newer-writer-rejected).

use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use stowage_config::{CryptoConfig, VaultConfig};
use stowage_core::{ObjectStore, ObjectStoreExt, StowageError};
use stowage_crypto::EnvelopeCipher;

use crate::scope::VaultScope;

/// Persisted wrapper around one scope's encrypted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct VaultBlob {
    /// Monotonic counter, bumped on every write.
    version: u64,
    /// `base64(salt || nonce || ciphertext || tag)`.
    envelope: String,
}

/// Scoped encrypted secret storage over an [`ObjectStore`].
pub struct VaultStore {
    store: Arc<dyn ObjectStore>,
    cipher: EnvelopeCipher,
    prefix: String,
}

impl VaultStore {
    pub fn new(store: Arc<dyn ObjectStore>, crypto: CryptoConfig, config: VaultConfig) -> Self {
        Self {
            store,
            cipher: EnvelopeCipher::new(crypto),
            prefix: config.key_prefix,
        }
    }

    /// Encrypt `data` and fully overwrite the blob for `scope`.
    ///
    /// Last-writer-wins: no version check is performed, but the stored
    /// version is still bumped so readers can observe the overwrite.
    pub async fn set_scoped(
        &self,
        scope: &VaultScope,
        data: &Value,
        password: &SecretString,
    ) -> Result<(), StowageError> {
        let found = self.read_blob(scope).await?.map(|b| b.version).unwrap_or(0);
        self.write_blob(scope, data, password, found + 1).await
    }

    /// Decrypt and return the document for `scope`, or `None` if no blob
    /// exists there (a normal state, not an error).
    ///
    /// Fails with [`StowageError::Decryption`] on a wrong password and
    /// [`StowageError::Vault`] when decryption succeeds but the plaintext is
    /// not valid JSON.
    pub async fn get_scoped(
        &self,
        scope: &VaultScope,
        password: &SecretString,
    ) -> Result<Option<Value>, StowageError> {
        Ok(self
            .get_scoped_versioned(scope, password)
            .await?
            .map(|(value, _)| value))
    }

    /// Like [`get_scoped`](Self::get_scoped) but also returns the stored
    /// version, for callers driving the optimistic-concurrency surface.
    pub async fn get_scoped_versioned(
        &self,
        scope: &VaultScope,
        password: &SecretString,
    ) -> Result<Option<(Value, u64)>, StowageError> {
        let Some(blob) = self.read_blob(scope).await? else {
            return Ok(None);
        };

        let plaintext = self.cipher.decrypt(&blob.envelope, password)?;
        let value = serde_json::from_slice(&plaintext).map_err(|e| {
            StowageError::Vault(format!(
                "vault {} decrypted to invalid JSON: {e}",
                scope.label()
            ))
        })?;
        Ok(Some((value, blob.version)))
    }

    /// Versioned overwrite: succeeds only if the stored version still equals
    /// `expected_version`, writing `expected_version + 1`.
    ///
    /// An absent blob counts as version 0, so creating through this surface
    /// requires `expected_version == 0`. A mismatch fails with
    /// [`StowageError::Conflict`] reporting both versions; the caller should
    /// re-fetch and retry.
    pub async fn update_scoped(
        &self,
        scope: &VaultScope,
        data: &Value,
        password: &SecretString,
        expected_version: u64,
    ) -> Result<u64, StowageError> {
        let found = self.read_blob(scope).await?.map(|b| b.version).unwrap_or(0);
        if found != expected_version {
            return Err(StowageError::Conflict {
                supplied: expected_version,
                found,
            });
        }

        let next = expected_version + 1;
        self.write_blob(scope, data, password, next).await?;
        Ok(next)
    }

    /// Remove the blob for `scope`. Removing an absent blob is a no-op.
    pub async fn delete_scoped(&self, scope: &VaultScope) -> Result<(), StowageError> {
        self.store
            .delete_object(&scope.object_key(&self.prefix))
            .await?;
        debug!(scope = %scope, "vault blob deleted");
        Ok(())
    }

    async fn read_blob(&self, scope: &VaultScope) -> Result<Option<VaultBlob>, StowageError> {
        self.store
            .get_json::<VaultBlob>(&scope.object_key(&self.prefix))
            .await
    }

    async fn write_blob(
        &self,
        scope: &VaultScope,
        data: &Value,
        password: &SecretString,
        version: u64,
    ) -> Result<(), StowageError> {
        let plaintext = serde_json::to_vec(data).map_err(StowageError::storage)?;
        let envelope = self.cipher.encrypt(&plaintext, password)?;
        let blob = VaultBlob { version, envelope };

        self.store
            .put_json(&scope.object_key(&self.prefix), &blob)
            .await?;
        debug!(scope = %scope, version, "vault blob written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stowage_store::MemoryObjectStore;

    fn vault_store() -> VaultStore {
        VaultStore::new(
            Arc::new(MemoryObjectStore::new()),
            CryptoConfig::fast_insecure_for_tests(),
            VaultConfig::default(),
        )
    }

    fn password(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn unwritten_scope_returns_none() {
        let store = vault_store();
        let result = store
            .get_scoped(&VaultScope::Team, &password("pw"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn set_get_roundtrip_per_scope() {
        let store = vault_store();
        let pw = password("master");

        let scopes = [
            VaultScope::Team,
            VaultScope::machine("kvm1").unwrap(),
            VaultScope::Organization,
        ];
        for (i, scope) in scopes.iter().enumerate() {
            let data = json!({"index": i, "ssh_user": "deploy", "nested": {"port": 22}});
            store.set_scoped(scope, &data, &pw).await.unwrap();
            let back = store.get_scoped(scope, &pw).await.unwrap().unwrap();
            assert_eq!(back, data);
        }
    }

    #[tokio::test]
    async fn machine_vaults_are_keyed_independently() {
        let store = vault_store();
        let pw = password("pw");
        let kvm1 = VaultScope::machine("kvm1").unwrap();
        let kvm2 = VaultScope::machine("kvm2").unwrap();

        store
            .set_scoped(&kvm1, &json!({"ip": "10.0.0.1"}), &pw)
            .await
            .unwrap();
        store
            .set_scoped(&kvm2, &json!({"ip": "10.0.0.2"}), &pw)
            .await
            .unwrap();

        let v1 = store.get_scoped(&kvm1, &pw).await.unwrap().unwrap();
        let v2 = store.get_scoped(&kvm2, &pw).await.unwrap().unwrap();
        assert_eq!(v1["ip"], "10.0.0.1");
        assert_eq!(v2["ip"], "10.0.0.2");
    }

    #[tokio::test]
    async fn non_json_plaintext_is_a_vault_error() {
        let objects = MemoryObjectStore::new();
        let store = VaultStore::new(
            Arc::new(objects.clone()),
            CryptoConfig::fast_insecure_for_tests(),
            VaultConfig::default(),
        );
        let pw = password("pw");

        // A blob whose envelope decrypts fine but does not contain JSON.
        let cipher = EnvelopeCipher::new(CryptoConfig::fast_insecure_for_tests());
        let envelope = cipher.encrypt(b"plain text, not a document", &pw).unwrap();
        objects
            .put_json(
                &VaultScope::Team.object_key("vaults"),
                &VaultBlob {
                    version: 1,
                    envelope,
                },
            )
            .await
            .unwrap();

        let err = store.get_scoped(&VaultScope::Team, &pw).await.unwrap_err();
        assert!(matches!(err, StowageError::Vault(_)));
    }

    #[tokio::test]
    async fn wrong_password_fails_decryption() {
        let store = vault_store();
        store
            .set_scoped(&VaultScope::Team, &json!({"k": "v"}), &password("right"))
            .await
            .unwrap();

        let err = store
            .get_scoped(&VaultScope::Team, &password("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, StowageError::Decryption));
    }

    #[tokio::test]
    async fn set_is_last_writer_wins() {
        let store = vault_store();
        let pw = password("pw");
        store
            .set_scoped(&VaultScope::Team, &json!({"gen": 1}), &pw)
            .await
            .unwrap();
        store
            .set_scoped(&VaultScope::Team, &json!({"gen": 2}), &pw)
            .await
            .unwrap();

        let (value, version) = store
            .get_scoped_versioned(&VaultScope::Team, &pw)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["gen"], 2);
        assert_eq!(version, 2);
    }

    #[tokio::test]
    async fn versioned_update_rejects_stale_writer() {
        let store = vault_store();
        let pw = password("pw");

        // Create through the versioned surface: absent blob is version 0.
        let v1 = store
            .update_scoped(&VaultScope::Team, &json!({"gen": 1}), &pw, 0)
            .await
            .unwrap();
        assert_eq!(v1, 1);

        // A concurrent writer advances the version.
        store
            .update_scoped(&VaultScope::Team, &json!({"gen": 2}), &pw, 1)
            .await
            .unwrap();

        // The stale writer is rejected, reporting both versions.
        let err = store
            .update_scoped(&VaultScope::Team, &json!({"gen": 3}), &pw, 1)
            .await
            .unwrap_err();
        match err {
            StowageError::Conflict { supplied, found } => {
                assert_eq!(supplied, 1);
                assert_eq!(found, 2);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }

        // Stored content is untouched by the rejected write.
        let value = store
            .get_scoped(&VaultScope::Team, &pw)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["gen"], 2);
    }

    #[tokio::test]
    async fn versioned_create_requires_version_zero() {
        let store = vault_store();
        let err = store
            .update_scoped(&VaultScope::Organization, &json!({}), &password("pw"), 7)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StowageError::Conflict {
                supplied: 7,
                found: 0
            }
        ));
    }

    #[tokio::test]
    async fn delete_then_get_returns_none() {
        let store = vault_store();
        let pw = password("pw");
        store
            .set_scoped(&VaultScope::Company, &json!({"PLUGINS": {}}), &pw)
            .await
            .unwrap();
        store.delete_scoped(&VaultScope::Company).await.unwrap();
        assert!(
            store
                .get_scoped(&VaultScope::Company, &pw)
                .await
                .unwrap()
                .is_none()
        );
    }
}
