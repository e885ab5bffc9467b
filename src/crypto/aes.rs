//! AES-256-CBC encryption for credential fields stored at rest.
//!
//! The key is derived from an arbitrary-length passphrase with a single
//! SHA-256 pass, so the same passphrase always yields the same key.  Each
//! call to `encrypt` generates a fresh random 16-byte IV and prepends it
//! to the ciphertext before base64-encoding.
//!
//! Layout of the encoded blob:
//!   base64( [ 16-byte IV | CBC ciphertext ] )
//!
//! Plaintext is padded to a multiple of **32** bytes (pad byte value =
//! pad length).  The modulus is larger than the AES block size on purpose:
//! existing stored ciphertexts were produced with it, and changing it would
//! make them undecryptable.

use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{CredVaultError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of the CBC initialization vector (the AES block size).
const IV_LEN: usize = 16;

/// Padding modulus for plaintext. Not the AES block size; kept at 32 for
/// compatibility with previously stored ciphertexts.
const PAD_BLOCK: usize = 32;

/// Symmetric cipher for credential fields.
///
/// Stateless after construction: the derived key is immutable, so a single
/// instance can be shared across threads.  The key is zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesCipher {
    key: [u8; 32],
}

impl AesCipher {
    /// Build a cipher from a passphrase of any length.
    ///
    /// The AES key is SHA-256(passphrase): deterministic, no per-instance
    /// randomness in key derivation.
    pub fn new(passphrase: &[u8]) -> Self {
        let key: [u8; 32] = Sha256::digest(passphrase).into();
        Self { key }
    }

    /// Encrypt a UTF-8 string, returning the base64 blob (IV prepended).
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Err(CredVaultError::InvalidInput(
                "cannot encrypt an empty value".into(),
            ));
        }

        let padded = pad(plaintext.as_bytes());

        // Fresh random IV per call.
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        // Padding is already applied, so the cipher runs in NoPadding mode.
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<NoPadding>(&padded);

        let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    /// Decrypt a blob produced by `encrypt` back to the original string.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        if ciphertext.is_empty() {
            return Err(CredVaultError::InvalidInput(
                "cannot decrypt an empty value".into(),
            ));
        }

        let blob = BASE64
            .decode(ciphertext)
            .map_err(|e| CredVaultError::InvalidInput(format!("ciphertext is not valid base64: {e}")))?;

        // Need at least the IV plus one padded block.
        if blob.len() < IV_LEN + PAD_BLOCK {
            return Err(CredVaultError::InvalidInput(
                "ciphertext is too short".into(),
            ));
        }

        let (iv, body) = blob.split_at(IV_LEN);
        let iv: [u8; IV_LEN] = iv
            .try_into()
            .map_err(|_| CredVaultError::InvalidInput("bad IV length".into()))?;

        let mut plaintext = Aes256CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<NoPadding>(body)
            .map_err(|_| {
                CredVaultError::InvalidInput(
                    "ciphertext length is not a multiple of the cipher block size".into(),
                )
            })?;

        unpad(&mut plaintext)?;

        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            CredVaultError::DecryptionFailed("plaintext is not valid UTF-8".into())
        })
    }
}

/// Pad to a multiple of `PAD_BLOCK`, pad byte value = pad length.
///
/// Padding is always present: an exact multiple gains a full extra block,
/// so `unpad` can read the trailing byte unconditionally.
fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = PAD_BLOCK - data.len() % PAD_BLOCK;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip padding in place: the trailing byte is the pad length.
fn unpad(data: &mut Vec<u8>) -> Result<()> {
    let pad_len = *data
        .last()
        .ok_or_else(|| CredVaultError::DecryptionFailed("empty plaintext buffer".into()))?
        as usize;

    if pad_len == 0 || pad_len > PAD_BLOCK || pad_len > data.len() {
        return Err(CredVaultError::DecryptionFailed(
            "invalid padding, wrong key or corrupted ciphertext".into(),
        ));
    }

    data.truncate(data.len() - pad_len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_always_adds_padding() {
        // An exact multiple of the modulus still gains a full block.
        let padded = pad(&[0u8; 32]);
        assert_eq!(padded.len(), 64);
        assert_eq!(padded[63], 32);
    }

    #[test]
    fn pad_value_equals_pad_length() {
        let padded = pad(b"abc");
        assert_eq!(padded.len(), 32);
        assert_eq!(padded[31], 29);
    }

    #[test]
    fn unpad_reverses_pad() {
        let mut padded = pad(b"hello");
        unpad(&mut padded).expect("unpad");
        assert_eq!(padded, b"hello");
    }

    #[test]
    fn unpad_rejects_out_of_range_pad_byte() {
        let mut bogus = vec![0u8; 31];
        bogus.push(200);
        assert!(unpad(&mut bogus).is_err());
    }

    #[test]
    fn key_derivation_is_deterministic() {
        let a = AesCipher::new(b"passphrase");
        let b = AesCipher::new(b"passphrase");
        assert_eq!(a.key, b.key);
    }
}
