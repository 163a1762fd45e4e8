//! Content encryption dispatch (§4.6): routes an [`EncryptionAlgorithm`] to
//! either the hand-assembled AES-CBC-HMAC composite or native AES-GCM, and
//! owns the IV sizing and key-splitting each needs.

use jose_core_crypto::{cbc_hmac, gcm};
use jose_core_jwa::EncryptionAlgorithm;
use rand::RngCore;

/// Content encryption or decryption failed. Collapsed to one variant for the
/// same reason the underlying primitives collapse theirs: a caller must not
/// learn whether a tag mismatched or padding was invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentCryptoError;

/// Generate a fresh random IV of the size `enc` requires.
pub fn generate_iv(enc: EncryptionAlgorithm) -> Vec<u8> {
    let mut iv = vec![0u8; enc.attributes().iv_len];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` under `cek`, authenticating `aad` (the ASCII bytes of
/// the base64url-encoded header, per RFC 7516 §5.1 step 14). Returns
/// `(ciphertext, tag)`.
pub fn encrypt(
    enc: EncryptionAlgorithm,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), ContentCryptoError> {
    let attrs = enc.attributes();
    match attrs.composite_hash {
        Some(hash) => {
            let (mac_key, enc_key) = cbc_hmac::split_composite_key(cek);
            let iv: &[u8; 16] = iv.try_into().map_err(|_| ContentCryptoError)?;
            let key = cbc_hmac::CbcHmacKey {
                mac_key,
                enc_key,
                hash,
                tag_len: attrs.tag_len,
            };
            cbc_hmac::encrypt(&key, iv, aad, plaintext).map_err(|_| ContentCryptoError)
        }
        None => {
            let iv: &[u8; 12] = iv.try_into().map_err(|_| ContentCryptoError)?;
            gcm::encrypt(cek, iv, aad, plaintext).map_err(|_| ContentCryptoError)
        }
    }
}

/// Verify `tag` and decrypt `ciphertext` under `cek`, authenticating `aad`.
pub fn decrypt(
    enc: EncryptionAlgorithm,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, ContentCryptoError> {
    let attrs = enc.attributes();
    match attrs.composite_hash {
        Some(hash) => {
            let (mac_key, enc_key) = cbc_hmac::split_composite_key(cek);
            let iv: &[u8; 16] = iv.try_into().map_err(|_| ContentCryptoError)?;
            let key = cbc_hmac::CbcHmacKey {
                mac_key,
                enc_key,
                hash,
                tag_len: attrs.tag_len,
            };
            cbc_hmac::decrypt(&key, iv, aad, ciphertext, tag).map_err(|_| ContentCryptoError)
        }
        None => {
            let iv: &[u8; 12] = iv.try_into().map_err(|_| ContentCryptoError)?;
            gcm::decrypt(cek, iv, aad, ciphertext, tag).map_err(|_| ContentCryptoError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a256gcm_round_trips() {
        let cek = [0x11u8; 32];
        let iv = generate_iv(EncryptionAlgorithm::Aes256Gcm);
        let (ct, tag) = encrypt(EncryptionAlgorithm::Aes256Gcm, &cek, &iv, b"header", b"hello jwe").unwrap();
        let pt = decrypt(EncryptionAlgorithm::Aes256Gcm, &cek, &iv, b"header", &ct, &tag).unwrap();
        assert_eq!(pt, b"hello jwe");
    }

    #[test]
    fn a128cbc_hs256_round_trips() {
        let cek = [0x22u8; 32];
        let iv = generate_iv(EncryptionAlgorithm::Aes128CbcHs256);
        let (ct, tag) = encrypt(EncryptionAlgorithm::Aes128CbcHs256, &cek, &iv, b"header", b"hello composite").unwrap();
        let pt = decrypt(EncryptionAlgorithm::Aes128CbcHs256, &cek, &iv, b"header", &ct, &tag).unwrap();
        assert_eq!(pt, b"hello composite");
    }

    #[test]
    fn wrong_aad_fails_decryption() {
        let cek = [0x33u8; 32];
        let iv = generate_iv(EncryptionAlgorithm::Aes256Gcm);
        let (ct, tag) = encrypt(EncryptionAlgorithm::Aes256Gcm, &cek, &iv, b"correct", b"payload").unwrap();
        assert_eq!(
            decrypt(EncryptionAlgorithm::Aes256Gcm, &cek, &iv, b"wrong", &ct, &tag),
            Err(ContentCryptoError)
        );
    }

    #[test]
    fn iv_length_matches_algorithm() {
        assert_eq!(generate_iv(EncryptionAlgorithm::Aes256Gcm).len(), 12);
        assert_eq!(generate_iv(EncryptionAlgorithm::Aes256CbcHs512).len(), 16);
    }
}
