use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    // --- Configuration errors ---
    #[error("Missing configuration: {0}")]
    Configuration(String),

    // --- Secret store errors ---
    #[error("Secret '{field}' not found at '{path}'")]
    KeyNotFound { path: String, field: String },

    #[error("Secret store unavailable{}: {reason}", status_suffix(.status))]
    StoreUnavailable { status: Option<u16>, reason: String },

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Render the optional HTTP status for the `StoreUnavailable` message.
fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
