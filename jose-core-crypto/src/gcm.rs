//! AES-GCM (§4.6, NIST SP 800-38D), delegated to the `aes-gcm` crate.
//!
//! JWE always uses a 96-bit IV and a 128-bit authentication tag, so this
//! wrapper fixes both rather than exposing the crate's general interface.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes192Gcm, Aes256Gcm, Nonce};

/// AES-GCM encryption or decryption failed. Encryption only fails on a
/// malformed key length; decryption also fails on tag mismatch — both are
/// reported identically, since `aes-gcm` does not distinguish them either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GcmError;

/// Encrypt `plaintext`, authenticating `aad`. Returns `(ciphertext, tag)`
/// with the 16-byte tag split off the end of the crate's combined output.
pub fn encrypt(key: &[u8], iv: &[u8; 12], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>), GcmError> {
    let nonce = Nonce::from_slice(iv);
    let payload = Payload { msg: plaintext, aad };

    let mut combined = match key.len() {
        16 => Aes128Gcm::new_from_slice(key).map_err(|_| GcmError)?.encrypt(nonce, payload),
        24 => Aes192Gcm::new_from_slice(key).map_err(|_| GcmError)?.encrypt(nonce, payload),
        32 => Aes256Gcm::new_from_slice(key).map_err(|_| GcmError)?.encrypt(nonce, payload),
        _ => return Err(GcmError),
    }
    .map_err(|_| GcmError)?;

    if combined.len() < 16 {
        return Err(GcmError);
    }
    let tag = combined.split_off(combined.len() - 16);
    Ok((combined, tag))
}

/// Verify `tag` and decrypt `ciphertext`, authenticating `aad`.
pub fn decrypt(
    key: &[u8],
    iv: &[u8; 12],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, GcmError> {
    if tag.len() != 16 {
        return Err(GcmError);
    }
    let mut combined = Vec::with_capacity(ciphertext.len() + 16);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    let nonce = Nonce::from_slice(iv);
    let payload = Payload { msg: &combined, aad };

    match key.len() {
        16 => Aes128Gcm::new_from_slice(key).map_err(|_| GcmError)?.decrypt(nonce, payload),
        24 => Aes192Gcm::new_from_slice(key).map_err(|_| GcmError)?.decrypt(nonce, payload),
        32 => Aes256Gcm::new_from_slice(key).map_err(|_| GcmError)?.decrypt(nonce, payload),
        _ => return Err(GcmError),
    }
    .map_err(|_| GcmError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // NIST SP 800-38D test case: 128-bit key, 96-bit IV, with AAD.
    #[test]
    fn nist_gcm_vector_with_aad() {
        let key = hex!("feffe9928665731c6d6a8f9467308308");
        let iv = hex!("cafebabefacedbaddecaf888");
        let aad = hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");
        let plaintext = hex!(
            "d9313225f88406e5a55909c5aff5269"
            "86a7a9531534f7da2e4c303d8a318a72"
            "1c3c0c95956809532fcf0e2449a6b525"
            "b16aedf5aa0de657ba637b391aafd255"
        );

        let (ct, tag) = encrypt(&key, &iv, &aad, &plaintext).unwrap();
        let expected_ct = hex!(
            "42831ec2217774244b7221b784d0d49c"
            "e3aa212f2c02a4e035c17e2329aca12e2"
            "1d514b25466931c7d8f6a5aac84aa051b"
            "a30b396a0aac973d58e091473f5985"
        );
        assert_eq!(ct, expected_ct.to_vec());
        let expected_tag = hex!("5bc94fbc3221a5db94fae95ae7121a47");
        assert_eq!(tag, expected_tag.to_vec());

        let recovered = decrypt(&key, &iv, &aad, &ct, &tag).unwrap();
        assert_eq!(recovered, plaintext.to_vec());
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let key = [0x5Au8; 32];
        let iv = [0x01u8; 12];
        let (mut ct, tag) = encrypt(&key, &iv, b"aad", b"hello world").unwrap();
        ct[0] ^= 0xFF;
        assert_eq!(decrypt(&key, &iv, b"aad", &ct, &tag), Err(GcmError));
    }

    #[test]
    fn wrong_aad_fails_authentication() {
        let key = [0x5Au8; 16];
        let iv = [0x02u8; 12];
        let (ct, tag) = encrypt(&key, &iv, b"correct-aad", b"payload").unwrap();
        assert_eq!(decrypt(&key, &iv, b"wrong-aad", &ct, &tag), Err(GcmError));
    }
}
