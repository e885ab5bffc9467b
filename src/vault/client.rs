//! Minimal read-through client for the remote secret store.
//!
//! One call, one outcome: no internal caching, no retries.  Callers that
//! treat a `StoreUnavailable` as transient retry the whole operation, which
//! re-triggers the read only if the secret was not already cached upstream.

use serde_json::{Map, Value};

use crate::errors::{CredVaultError, Result};

/// Handle on the remote secret store (base URL + access token).
#[derive(Debug, Clone)]
pub struct VaultClient {
    base_url: String,
    token: String,
}

impl VaultClient {
    /// Build a client for the store at `base_url`.
    ///
    /// A trailing slash on the URL is trimmed so the path template below
    /// never produces a double slash.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Read one secret record.
    ///
    /// Issues `GET {base_url}/v1/secret{path}` with the `X-Vault-Token`
    /// header and returns the `data` field of the JSON body (empty mapping
    /// if absent).  Any non-200 status and any transport failure surface as
    /// `StoreUnavailable`; a non-200 carries the status code.
    pub fn read(&self, path: &str) -> Result<Map<String, Value>> {
        let url = format!("{}/v1/secret{}", self.base_url, path);
        log::debug!("secret store read: {url}");

        let response = match ureq::get(&url).set("X-Vault-Token", &self.token).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                log::warn!("secret store read {url} returned status {code}");
                return Err(CredVaultError::StoreUnavailable {
                    status: Some(code),
                    reason: format!("error connecting, status code {code}"),
                });
            }
            Err(e) => {
                log::warn!("secret store read {url} failed: {e}");
                return Err(CredVaultError::StoreUnavailable {
                    status: None,
                    reason: format!("error connecting: {e}"),
                });
            }
        };

        let body: Value = response.into_json().map_err(|e| {
            CredVaultError::StoreUnavailable {
                status: None,
                reason: format!("unparseable store response: {e}"),
            }
        })?;

        Ok(body
            .get("data")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = VaultClient::new("http://vault.local:8200/", "token");
        assert_eq!(client.base_url, "http://vault.local:8200");
    }
}
