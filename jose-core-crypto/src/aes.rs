//! AES block/CBC/Key-Wrap primitives (§4.4).
//!
//! Block encrypt/decrypt and CBC mode are delegated entirely to the
//! RustCrypto `aes`/`cbc` crates (10/12/14 rounds for 128/192/256-bit keys
//! is their concern, not ours); AES-KW is delegated to the `aes-kw` crate,
//! which implements RFC 3394 with the default IV `A6A6A6A6A6A6A6A6`.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::{Pkcs7, UnpadError};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

/// AES-CBC decryption failed: either the ciphertext length was not a
/// multiple of the block size, or PKCS#7 unpadding failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbcDecryptError;

/// Encrypt `plaintext` with AES-CBC + PKCS#7 padding.
///
/// `key` selects the variant by length (16/24/32 bytes); `iv` must be 16
/// bytes. Output length is `(plaintext.len() + 16) & !15`, per §4.5's
/// shared sizing contract with the CBC-HMAC composite.
pub fn cbc_encrypt(key: &[u8], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    macro_rules! run {
        ($cipher:ty) => {{
            type Enc = cbc::Encryptor<$cipher>;
            Enc::new_from_slices(key, iv)
                .expect("key length already validated by caller")
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
        }};
    }
    match key.len() {
        16 => run!(Aes128),
        24 => run!(Aes192),
        32 => run!(Aes256),
        other => panic!("unsupported AES key length: {other}"),
    }
}

/// Decrypt `ciphertext` with AES-CBC, removing PKCS#7 padding.
pub fn cbc_decrypt(key: &[u8], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>, CbcDecryptError> {
    macro_rules! run {
        ($cipher:ty) => {{
            type Dec = cbc::Decryptor<$cipher>;
            Dec::new_from_slices(key, iv)
                .map_err(|_| CbcDecryptError)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|UnpadError| CbcDecryptError)
        }};
    }
    match key.len() {
        16 => run!(Aes128),
        24 => run!(Aes192),
        32 => run!(Aes256),
        _ => Err(CbcDecryptError),
    }
}

/// AES Key Wrap failed: wrong key-encryption-key length, wrapped input not
/// a multiple of 8 bytes, or (on unwrap) the recovered default IV did not
/// match — reported uniformly as authentication failure per §4.4, never
/// distinguished from a length error, so a caller can't learn which check
/// failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyWrapError;

/// Wrap `cek` under `kek` (RFC 3394). Output is `cek.len() + 8` bytes.
pub fn kw_wrap(kek: &[u8], cek: &[u8]) -> Result<Vec<u8>, KeyWrapError> {
    use aes_kw::Kek;
    let mut out = vec![0u8; cek.len() + 8];
    match kek.len() {
        16 => Kek::from(<[u8; 16]>::try_from(kek).map_err(|_| KeyWrapError)?)
            .wrap(cek, &mut out)
            .map_err(|_| KeyWrapError)?,
        24 => Kek::from(<[u8; 24]>::try_from(kek).map_err(|_| KeyWrapError)?)
            .wrap(cek, &mut out)
            .map_err(|_| KeyWrapError)?,
        32 => Kek::from(<[u8; 32]>::try_from(kek).map_err(|_| KeyWrapError)?)
            .wrap(cek, &mut out)
            .map_err(|_| KeyWrapError)?,
        _ => return Err(KeyWrapError),
    };
    Ok(out)
}

/// Unwrap a wrapped CEK under `kek`. Fails uniformly with [`KeyWrapError`]
/// if the recovered default IV does not match `A6A6A6A6A6A6A6A6`.
pub fn kw_unwrap(kek: &[u8], wrapped: &[u8]) -> Result<Vec<u8>, KeyWrapError> {
    use aes_kw::Kek;
    if wrapped.len() < 8 {
        return Err(KeyWrapError);
    }
    let mut out = vec![0u8; wrapped.len() - 8];
    match kek.len() {
        16 => Kek::from(<[u8; 16]>::try_from(kek).map_err(|_| KeyWrapError)?)
            .unwrap(wrapped, &mut out)
            .map_err(|_| KeyWrapError)?,
        24 => Kek::from(<[u8; 24]>::try_from(kek).map_err(|_| KeyWrapError)?)
            .unwrap(wrapped, &mut out)
            .map_err(|_| KeyWrapError)?,
        32 => Kek::from(<[u8; 32]>::try_from(kek).map_err(|_| KeyWrapError)?)
            .unwrap(wrapped, &mut out)
            .map_err(|_| KeyWrapError)?,
        _ => return Err(KeyWrapError),
    };
    Ok(out)
}
