use crate::error::{CryptoError, CryptoResult};
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use zeroize::ZeroizeOnDrop;

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;
/// GCM nonce length in bytes (96 bits)
pub const NONCE_LEN: usize = 12;
/// GCM authentication tag length, appended to every ciphertext
pub const TAG_LEN: usize = 16;

/// AES-256-GCM cipher bound to the API's shared symmetric key
///
/// Envelopes carry the nonce and associated data in the clear next to the
/// ciphertext; the trailing 16 bytes of the ciphertext are the GCM tag.
/// Decryption either authenticates the whole ciphertext or returns an error,
/// it never yields partial plaintext.
#[derive(ZeroizeOnDrop)]
pub struct Aes256GcmDecryptor {
    #[zeroize(skip)]
    cipher: Aes256Gcm,
    /// Shared key - automatically zeroized on drop
    key: [u8; KEY_LEN],
}

impl Aes256GcmDecryptor {
    /// Create a decryptor with a 32-byte key
    pub fn new(key: [u8; KEY_LEN]) -> CryptoResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        Ok(Self { cipher, key })
    }

    /// Create from raw key bytes, e.g. the 32 ASCII characters of an API key
    pub fn from_slice(key: &[u8]) -> CryptoResult<Self> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_LEN,
            got: key.len(),
        })?;

        Self::new(key)
    }

    /// Decrypt and authenticate `ciphertext` (ciphertext || tag)
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let nonce = Self::nonce(nonce)?;

        self.cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: associated_data,
                },
            )
            .map_err(|_| {
                CryptoError::DecryptionFailed("authentication tag mismatch".to_string())
            })
    }

    /// Decrypt a base64-encoded ciphertext into UTF-8 text
    pub fn decrypt_base64(
        &self,
        ciphertext_b64: &str,
        nonce: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<String> {
        let ciphertext = BASE64
            .decode(ciphertext_b64.trim())
            .map_err(|e| CryptoError::InvalidFormat(format!("Base64 decode error: {}", e)))?;

        if ciphertext.len() < TAG_LEN {
            return Err(CryptoError::InvalidFormat(format!(
                "ciphertext shorter than the {} byte tag",
                TAG_LEN
            )));
        }

        let plaintext = self.decrypt(&ciphertext, nonce, associated_data)?;
        String::from_utf8(plaintext).map_err(|e| CryptoError::InvalidUtf8(e.to_string()))
    }

    /// Encrypt with an explicit nonce, producing ciphertext || tag
    ///
    /// The caller owns nonce uniqueness; this mirrors how the platform seals
    /// certificate envelopes.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let nonce = Self::nonce(nonce)?;

        self.cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// Encrypt and base64-encode
    pub fn encrypt_base64(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<String> {
        Ok(BASE64.encode(self.encrypt(plaintext, nonce, associated_data)?))
    }

    fn nonce(nonce: &[u8]) -> CryptoResult<&Nonce<aes_gcm::aead::consts::U12>> {
        if nonce.len() != NONCE_LEN {
            return Err(CryptoError::InvalidNonce {
                expected: NONCE_LEN,
                got: nonce.len(),
            });
        }
        Ok(Nonce::from_slice(nonce))
    }

    /// Algorithm identifier as used on the wire
    pub fn algorithm(&self) -> &'static str {
        "AEAD_AES_256_GCM"
    }
}

/// One-shot AES-256-GCM decryption
///
/// Pure function: fails with [`CryptoError::DecryptionFailed`] when the tag,
/// the key or the associated data do not match.
pub fn decrypt(
    ciphertext: &[u8],
    key: &[u8],
    nonce: &[u8],
    associated_data: &[u8],
) -> CryptoResult<Vec<u8>> {
    Aes256GcmDecryptor::from_slice(key)?.decrypt(ciphertext, nonce, associated_data)
}
