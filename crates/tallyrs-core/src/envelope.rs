//! Padding and trailer wrapped around the plaintext before encryption.
//!
//! The plaintext is followed by a run of `*` and the literal `valid`, sized
//! so the whole thing fills a number of cipher blocks. After decryption the
//! trailer must be present; that check is the only password verification a
//! save file has.

use crate::cipher::{self, Key, BLOCK_LEN};
use crate::error::{Error, Result};

/// Padding byte, also used to pad short passwords into a key.
pub const FILLER: u8 = b'*';
/// Literal appended after the padding.
pub const TRAILER: &[u8] = b"valid";

/// Number of filler bytes placed after a plaintext of `len` bytes.
///
/// The count is chosen so `len + filler + TRAILER.len()` is a multiple of
/// the block size: one block's worth minus the trailer, wrapping to the next
/// block when the trailer would not fit.
pub fn filler_len(len: usize) -> usize {
    let filler = BLOCK_LEN - len % BLOCK_LEN;
    if filler < TRAILER.len() {
        filler + BLOCK_LEN - TRAILER.len()
    } else {
        filler - TRAILER.len()
    }
}

/// Append filler and trailer to `plaintext`.
pub fn pad(plaintext: &str) -> Vec<u8> {
    let filler = filler_len(plaintext.len());
    let mut out = Vec::with_capacity(plaintext.len() + filler + TRAILER.len());
    out.extend_from_slice(plaintext.as_bytes());
    out.resize(plaintext.len() + filler, FILLER);
    out.extend_from_slice(TRAILER);

    tracing::debug!("Padded {} bytes with {} filler bytes", plaintext.len(), filler);
    out
}

/// Check the trailer and strip it together with any trailing filler.
///
/// A missing trailer means the key was wrong or the data was damaged.
pub fn unpad(padded: &[u8]) -> Result<&[u8]> {
    let body = padded
        .strip_suffix(TRAILER)
        .ok_or(Error::AuthenticationFailed)?;
    let end = body
        .iter()
        .rposition(|&b| b != FILLER)
        .map_or(0, |pos| pos + 1);
    Ok(&body[..end])
}

/// Pad and encrypt `plaintext` under `key`.
pub fn seal(plaintext: &str, key: &Key) -> Result<Vec<u8>> {
    cipher::encrypt(&pad(plaintext), key)
}

/// Decrypt `ciphertext`, verify the trailer and return the original text.
///
/// Trailing `*` characters of the original text cannot be told apart from
/// padding and are removed as well.
pub fn open(ciphertext: &[u8], key: &Key) -> Result<String> {
    let padded = cipher::decrypt(ciphertext, key)?;
    let body = unpad(&padded).inspect_err(|_| {
        tracing::warn!("Save data trailer missing after decryption");
    })?;

    String::from_utf8(body.to_vec())
        .map_err(|_| Error::CorruptData("decrypted data is not valid UTF-8".into()))
}
