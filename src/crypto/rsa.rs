//! RSA-OAEP encryption for small secrets exchanged with clients.
//!
//! Keys normally live in the remote secret store under the instance's
//! `keys_path` (fields `public_key` / `private_key`) and are fetched lazily
//! on first use, then cached for the lifetime of the instance.  Callers can
//! also pass a PEM key explicitly per call, bypassing the store entirely.
//!
//! Key resolution order: explicit call parameter, then cached instance key,
//! then fetch-and-cache from the store.
//!
//! OAEP uses a SHA-1 digest: that is what the existing interop partners
//! produce and expect, so it is fixed here.  A 2048-bit key bounds the
//! plaintext to 190 bytes; longer input fails, it is never truncated.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde_json::Value;
use sha1::Sha1;

use crate::errors::{CredVaultError, Result};
use crate::vault::VaultClient;

/// Store field holding the PEM public key.
const PUBLIC_KEY_FIELD: &str = "public_key";

/// Store field holding the PEM private key.
const PRIVATE_KEY_FIELD: &str = "private_key";

/// Asymmetric cipher for point-to-point secret exchange.
///
/// Construct with `new` for a store-backed instance, or with `default` when
/// every call will supply its own key.  The key caches are append-only:
/// written at most once per instance, by the first successful fetch.
#[derive(Default)]
pub struct RsaCipher {
    store: Option<VaultClient>,
    keys_path: Option<String>,
    public_key: OnceLock<RsaPublicKey>,
    private_key: OnceLock<RsaPrivateKey>,
}

impl RsaCipher {
    /// Build a store-backed cipher for the keypair at `keys_path`.
    pub fn new(vault_url: &str, vault_token: &str, keys_path: &str) -> Self {
        Self {
            store: Some(VaultClient::new(vault_url, vault_token)),
            keys_path: Some(keys_path.to_string()),
            public_key: OnceLock::new(),
            private_key: OnceLock::new(),
        }
    }

    // ------------------------------------------------------------------
    // Encrypt / decrypt
    // ------------------------------------------------------------------

    /// Encrypt a value with the instance keypair's public key.
    ///
    /// The value is reduced to its string form first: strings pass through
    /// as-is, anything else (numbers, mappings, sequences) is rendered as
    /// compact JSON.  This is lossy by design; `decrypt` always returns a
    /// string and callers re-parse if they need the original shape.
    pub fn encrypt(&self, value: &Value) -> Result<String> {
        let key = self.resolve_public_key()?;
        encrypt_with(key, value)
    }

    /// Encrypt with an explicit PEM public key, bypassing the store.
    pub fn encrypt_with_key(&self, value: &Value, public_key_pem: &str) -> Result<String> {
        let key = parse_public_key(public_key_pem)?;
        encrypt_with(&key, value)
    }

    /// Decrypt a base64 ciphertext with the instance keypair's private key.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        // Reject malformed input before touching key material.
        let raw = decode_ciphertext(ciphertext)?;
        let key = self.resolve_private_key()?;
        decrypt_raw(key, &raw)
    }

    /// Decrypt with an explicit PEM private key, bypassing the store.
    pub fn decrypt_with_key(&self, ciphertext: &str, private_key_pem: &str) -> Result<String> {
        let raw = decode_ciphertext(ciphertext)?;
        let key = parse_private_key(private_key_pem)?;
        decrypt_raw(&key, &raw)
    }

    // ------------------------------------------------------------------
    // Key resolution
    // ------------------------------------------------------------------

    /// Fetch one field of the keypair record from the secret store.
    ///
    /// The store nests secret material under a `data` field, so the value
    /// returned is `read(keys_path).data[field]`.
    pub fn get_secret_key(&self, field: &str) -> Result<String> {
        let store = self.store.as_ref().ok_or_else(|| {
            CredVaultError::Configuration("no secret store configured and no key supplied".into())
        })?;
        let path = self.keys_path()?;

        let data = store.read(&path)?;
        data.get("data")
            .and_then(|inner| inner.get(field))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(CredVaultError::KeyNotFound {
                path,
                field: field.to_string(),
            })
    }

    /// The configured keys path, normalized to a leading slash.
    fn keys_path(&self) -> Result<String> {
        let path = self.keys_path.as_ref().ok_or_else(|| {
            CredVaultError::Configuration("no keys path configured for RSA keypair".into())
        })?;
        if path.starts_with('/') {
            Ok(path.clone())
        } else {
            Ok(format!("/{path}"))
        }
    }

    /// Cached public key, fetching from the store on first use.
    fn resolve_public_key(&self) -> Result<&RsaPublicKey> {
        if let Some(key) = self.public_key.get() {
            return Ok(key);
        }
        let pem = self.get_secret_key(PUBLIC_KEY_FIELD)?;
        let parsed = parse_public_key(&pem)?;
        // A concurrent fetch may have won the race; either value is the same.
        Ok(self.public_key.get_or_init(|| parsed))
    }

    /// Cached private key, fetching from the store on first use.
    fn resolve_private_key(&self) -> Result<&RsaPrivateKey> {
        if let Some(key) = self.private_key.get() {
            return Ok(key);
        }
        let pem = self.get_secret_key(PRIVATE_KEY_FIELD)?;
        let parsed = parse_private_key(&pem)?;
        Ok(self.private_key.get_or_init(|| parsed))
    }
}

// ---------------------------------------------------------------------------
// Free helpers
// ---------------------------------------------------------------------------

/// Reduce a JSON value to the string form that gets encrypted.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encrypt_with(key: &RsaPublicKey, value: &Value) -> Result<String> {
    let plaintext = stringify(value);
    let ciphertext = key
        .encrypt(&mut OsRng, Oaep::new::<Sha1>(), plaintext.as_bytes())
        .map_err(|e| CredVaultError::EncryptionFailed(format!("RSA-OAEP: {e}")))?;
    Ok(BASE64.encode(ciphertext))
}

fn decode_ciphertext(ciphertext: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(ciphertext)
        .map_err(|e| CredVaultError::InvalidInput(format!("ciphertext is not valid base64: {e}")))
}

fn decrypt_raw(key: &RsaPrivateKey, raw: &[u8]) -> Result<String> {
    let plaintext = key
        .decrypt(Oaep::new::<Sha1>(), raw)
        .map_err(|e| CredVaultError::DecryptionFailed(format!("RSA-OAEP: {e}")))?;
    String::from_utf8(plaintext)
        .map_err(|_| CredVaultError::DecryptionFailed("plaintext is not valid UTF-8".into()))
}

/// Parse a PEM public key, accepting PKCS#1 with a PKCS#8 fallback.
fn parse_public_key(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
        .map_err(|e| CredVaultError::InvalidKey(format!("unparseable RSA public key: {e}")))
}

/// Parse a PEM private key, accepting PKCS#1 with a PKCS#8 fallback.
fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| CredVaultError::InvalidKey(format!("unparseable RSA private key: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify_passes_strings_through() {
        assert_eq!(stringify(&json!("card-token")), "card-token");
    }

    #[test]
    fn stringify_renders_other_values_as_json() {
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!({"pan": "4242"})), r#"{"pan":"4242"}"#);
        assert_eq!(stringify(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn unconfigured_instance_is_a_configuration_error() {
        let rsa = RsaCipher::default();
        let err = rsa.encrypt(&json!("x")).unwrap_err();
        assert!(matches!(err, CredVaultError::Configuration(_)));
    }

    #[test]
    fn garbage_pem_is_an_invalid_key_error() {
        let err = parse_public_key("not a pem").unwrap_err();
        assert!(matches!(err, CredVaultError::InvalidKey(_)));
    }
}
