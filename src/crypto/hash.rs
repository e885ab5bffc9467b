//! Keyed BLAKE2s digests for non-reversible credential lookup values.
//!
//! The digest is a deterministic function of (input, key, digest size), so
//! services can index sensitive values without storing them in reversible
//! form.  The key (a salt in the deployment's vocabulary) normally lives in
//! the remote secret store and is fetched once per instance, on first use.

use std::sync::OnceLock;

use blake2::digest::consts::{U16, U32, U8};
use blake2::digest::Mac;
use blake2::Blake2sMac;

use crate::errors::{CredVaultError, Result};
use crate::vault::VaultClient;

/// Store field holding the hash key.
const SALT_FIELD: &str = "salt";

/// Keyed hash component.
///
/// Construct with `new` for a store-backed salt, or with `default` when
/// every call supplies its own key.  The salt cache is written at most once
/// per instance, by the first successful fetch; later calls reuse it.
#[derive(Default)]
pub struct Blake2sHash {
    store: Option<VaultClient>,
    secret_path: Option<String>,
    salt: OnceLock<String>,
}

impl Blake2sHash {
    /// Build a store-backed hasher whose salt lives at `secret_path`.
    pub fn new(vault_url: &str, vault_token: &str, secret_path: &str) -> Self {
        Self {
            store: Some(VaultClient::new(vault_url, vault_token)),
            secret_path: Some(secret_path.to_string()),
            salt: OnceLock::new(),
        }
    }

    /// Hash `data` with the instance salt, fetching it on first use.
    ///
    /// `digest_bits` selects the output size; the hex result has
    /// `digest_bits / 4` characters.
    pub fn digest(&self, data: &str, digest_bits: u16) -> Result<String> {
        let salt = self.resolve_salt()?;
        keyed_digest(data.as_bytes(), salt.as_bytes(), digest_bits)
    }

    /// Hash `data` with an explicit key, bypassing the store.
    pub fn digest_with_key(&self, data: &str, digest_bits: u16, key: &str) -> Result<String> {
        keyed_digest(data.as_bytes(), key.as_bytes(), digest_bits)
    }

    /// Cached salt, fetching from the store on first use.
    fn resolve_salt(&self) -> Result<&str> {
        if let Some(salt) = self.salt.get() {
            return Ok(salt);
        }

        let store = self.store.as_ref().ok_or_else(|| {
            CredVaultError::Configuration("no secret store configured and no key supplied".into())
        })?;
        let path = self.salt_path()?;

        let data = store.read(&path)?;
        let salt = data
            .get("data")
            .and_then(|inner| inner.get(SALT_FIELD))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or(CredVaultError::KeyNotFound {
                path,
                field: SALT_FIELD.to_string(),
            })?;

        // First successful fetch wins; a racing fetch saw the same value.
        Ok(self.salt.get_or_init(|| salt))
    }

    /// Store path of the salt record.
    ///
    /// Salts live under the KV engine's `/data` prefix, unlike RSA keypair
    /// paths which are used verbatim.  Existing deployments depend on this
    /// layout.
    fn salt_path(&self) -> Result<String> {
        let path = self.secret_path.as_ref().ok_or_else(|| {
            CredVaultError::Configuration("no secret path configured for hash salt".into())
        })?;
        Ok(format!("/data/{}", path.trim_start_matches('/')))
    }
}

/// Keyed BLAKE2s (RFC 7693 keyed mode) with the given output size.
fn keyed_digest(data: &[u8], key: &[u8], digest_bits: u16) -> Result<String> {
    let invalid_key =
        |_| CredVaultError::InvalidKey("BLAKE2s keys must be 1 to 32 bytes".into());

    let digest = match digest_bits {
        64 => {
            let mut mac = Blake2sMac::<U8>::new_from_slice(key).map_err(invalid_key)?;
            mac.update(data);
            hex::encode(mac.finalize().into_bytes())
        }
        128 => {
            let mut mac = Blake2sMac::<U16>::new_from_slice(key).map_err(invalid_key)?;
            mac.update(data);
            hex::encode(mac.finalize().into_bytes())
        }
        256 => {
            let mut mac = Blake2sMac::<U32>::new_from_slice(key).map_err(invalid_key)?;
            mac.update(data);
            hex::encode(mac.finalize().into_bytes())
        }
        other => {
            return Err(CredVaultError::InvalidInput(format!(
                "unsupported digest size: {other} bits (expected 64, 128 or 256)"
            )))
        }
    };

    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_length_tracks_digest_bits() {
        for bits in [64u16, 128, 256] {
            let out = keyed_digest(b"data", b"key", bits).expect("digest");
            assert_eq!(out.len(), usize::from(bits) / 4);
        }
    }

    #[test]
    fn unsupported_digest_size_is_rejected() {
        let err = keyed_digest(b"data", b"key", 512).unwrap_err();
        assert!(matches!(err, CredVaultError::InvalidInput(_)));
    }

    #[test]
    fn oversize_key_is_rejected() {
        let key = [0u8; 33];
        let err = keyed_digest(b"data", &key, 256).unwrap_err();
        assert!(matches!(err, CredVaultError::InvalidKey(_)));
    }
}
