//! AES-256-CBC with a password-packed key.
//!
//! Save files use a fixed all-zero IV and carry no authentication tag; see
//! [`crate::envelope`] for the structural check that stands in for one.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use std::fmt;

use crate::envelope::FILLER;
use crate::error::{Error, Result};

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Key size in bytes.
pub const KEY_LEN: usize = 32;
/// Cipher block size in bytes.
pub const BLOCK_LEN: usize = 16;

const IV: [u8; BLOCK_LEN] = [0; BLOCK_LEN];

/// Key material for one save file.
#[derive(Clone, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

/// Pack `password` into a key.
///
/// The password bytes are used directly, right-padded with `*` up to
/// [`KEY_LEN`] and truncated beyond it. This is not a KDF; it is kept so
/// existing save files stay readable.
pub fn derive_key(password: &str) -> Key {
    let bytes = password.as_bytes();
    let used = bytes.len().min(KEY_LEN);

    let mut key = [FILLER; KEY_LEN];
    key[..used].copy_from_slice(&bytes[..used]);
    Key(key)
}

/// Encrypt `plaintext`, which must already be a whole number of blocks.
pub fn encrypt(plaintext: &[u8], key: &Key) -> Result<Vec<u8>> {
    let mut buf = plaintext.to_vec();
    let len = buf.len();
    Encryptor::new(&key.0.into(), &IV.into())
        .encrypt_padded_mut::<NoPadding>(&mut buf, len)
        .map_err(|_| {
            Error::CryptoProvider(format!(
                "plaintext of {len} bytes is not a multiple of {BLOCK_LEN}"
            ))
        })?;
    Ok(buf)
}

/// Decrypt `ciphertext`. A wrong key still "succeeds" and yields garbage.
pub fn decrypt(ciphertext: &[u8], key: &Key) -> Result<Vec<u8>> {
    let mut buf = ciphertext.to_vec();
    let len = Decryptor::new(&key.0.into(), &IV.into())
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| {
            Error::CorruptData(format!(
                "ciphertext of {} bytes is not a multiple of {BLOCK_LEN}",
                ciphertext.len()
            ))
        })?
        .len();
    buf.truncate(len);
    Ok(buf)
}
