//! Per-bundle channel secrets used for API authentication.
//!
//! On startup a service loads every bundle's record from the store's channel
//! path (or, in development, from a local JSON file) into an in-memory map
//! keyed by bundle id.  Lookups afterwards never touch the network.
//!
//! Record shape, as returned by the store:
//!
//! ```text
//! {
//!   "com.example.wallet": { "jwt_secret": "...", "pcard": "..." },
//!   "com.example.portal": { "jwt_secret": "..." }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{CredVaultError, Result};

use super::client::VaultClient;

/// Default store path for channel bundle records.
const DEFAULT_CHANNEL_PATH: &str = "/channels";

/// Cache of per-bundle secrets, loaded once and queried many times.
pub struct ChannelSecrets {
    store: VaultClient,
    channel_path: String,
    bundles: Map<String, Value>,
}

impl ChannelSecrets {
    /// Build a cache backed by the store's default `/channels` path.
    pub fn new(vault_url: &str, vault_token: &str) -> Self {
        Self::with_channel_path(vault_url, vault_token, DEFAULT_CHANNEL_PATH)
    }

    /// Build a cache backed by a custom channel path.
    pub fn with_channel_path(vault_url: &str, vault_token: &str, channel_path: &str) -> Self {
        Self {
            store: VaultClient::new(vault_url, vault_token),
            channel_path: channel_path.to_string(),
            bundles: Map::new(),
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load every bundle record from the secret store, replacing the cache.
    pub fn load(&mut self) -> Result<()> {
        log::info!("channel bundle secrets: loading from store path {}", self.channel_path);
        self.bundles = self.store.read(&self.channel_path)?;
        self.log_loaded_bundles();
        Ok(())
    }

    /// Load bundle records from a local JSON file instead of the store.
    ///
    /// Development convenience; the file holds the same mapping the store
    /// would return.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        log::info!("channel bundle secrets: loading from local file {}", path.display());
        let contents = fs::read_to_string(path)?;
        let parsed: Value = serde_json::from_str(&contents)
            .map_err(|e| CredVaultError::SerializationError(format!("bundle secrets file: {e}")))?;

        self.bundles = parsed
            .as_object()
            .cloned()
            .ok_or_else(|| {
                CredVaultError::SerializationError(
                    "bundle secrets file must hold a JSON object keyed by bundle id".into(),
                )
            })?;
        self.log_loaded_bundles();
        Ok(())
    }

    fn log_loaded_bundles(&self) {
        let ids: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        log::info!("channel bundle secrets: found secrets for {ids:?}");
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// JWT signing secret for a bundle.
    pub fn jwt_secret(&self, bundle_id: &str) -> Result<&str> {
        self.bundle_field(bundle_id, "jwt_secret")
    }

    /// Payment-card encryption secret for a bundle.
    pub fn pcard_secret(&self, bundle_id: &str) -> Result<&str> {
        self.bundle_field(bundle_id, "pcard")
    }

    /// Returns the ids of every loaded bundle.
    pub fn bundle_ids(&self) -> Vec<&str> {
        self.bundles.keys().map(String::as_str).collect()
    }

    fn bundle_field(&self, bundle_id: &str, field: &str) -> Result<&str> {
        self.bundles
            .get(bundle_id)
            .and_then(|bundle| bundle.get(field))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                log::error!("no '{field}' defined for bundle {bundle_id}");
                CredVaultError::KeyNotFound {
                    path: format!("{}/{bundle_id}", self.channel_path),
                    field: field.to_string(),
                }
            })
    }
}
