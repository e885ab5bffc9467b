//! Credential-protection primitives.
//!
//! This module provides:
//! - AES-256-CBC encryption for fields at rest (`aes`)
//! - RSA-OAEP encryption for small exchanged secrets (`rsa`)
//! - Keyed BLAKE2s digests for non-reversible lookups (`hash`)
//!
//! The RSA and BLAKE2s components pull their key material from the remote
//! secret store lazily, on first use, and cache it per instance.

pub mod aes;
pub mod hash;
pub mod rsa;

pub use self::aes::AesCipher;
pub use self::hash::Blake2sHash;
pub use self::rsa::RsaCipher;
