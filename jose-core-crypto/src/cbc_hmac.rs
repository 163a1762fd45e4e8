//! AES-CBC-HMAC composite AEAD (§4.5, RFC 7518 §5.2).
//!
//! No published crate implements this composite directly — it is
//! hand-assembled from [`crate::aes`]'s CBC primitive and [`crate::mac`]'s
//! HMAC primitive, following RFC 7518 §5.2.2-§5.2.3 exactly: the MAC input
//! is `AAD || IV || ciphertext || AL` where `AL` is the big-endian 64-bit
//! bit-length of `AAD`, and the authentication tag is the leftmost half of
//! the HMAC output.

use jose_core_jwa::HashAlgorithm;
use subtle::ConstantTimeEq;

use crate::aes::{cbc_decrypt, cbc_encrypt};
use crate::mac::SymmetricSigner;

/// A256CBC-HS512 and friends: half the composite key authenticates, half
/// encrypts. `mac_key` comes first per RFC 7518 §5.2.2.1.
pub struct CbcHmacKey<'a> {
    pub mac_key: &'a [u8],
    pub enc_key: &'a [u8],
    pub hash: HashAlgorithm,
    /// Authentication tag length — the leftmost `tag_len` bytes of the MAC.
    pub tag_len: usize,
}

/// Splits a composite CEK into its MAC and encryption halves per the
/// algorithm's `EncryptionAttributes::composite_hash`.
pub fn split_composite_key(cek: &[u8]) -> (&[u8], &[u8]) {
    let half = cek.len() / 2;
    cek.split_at(half)
}

/// Composite AEAD encryption failure — only ever an internal invariant
/// violation (e.g. mismatched key halves), since encryption itself cannot
/// fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeEncryptError;

/// Composite AEAD decryption/authentication failure. Deliberately
/// undifferentiated: a caller cannot distinguish "tag mismatch" from
/// "padding invalid" from "key wrong", which is the point — RFC 7518
/// §5.2.2.1 requires the MAC to be checked before any CBC decryption is
/// attempted, and both paths report the same error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeDecryptError;

/// Encrypt `plaintext` under the composite key, authenticating `aad`.
/// Returns `(ciphertext, tag)`.
pub fn encrypt(
    key: &CbcHmacKey<'_>,
    iv: &[u8; 16],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), CompositeEncryptError> {
    let ciphertext = cbc_encrypt(key.enc_key, iv, plaintext);
    let tag = compute_tag(key, iv, aad, &ciphertext);
    Ok((ciphertext, tag))
}

/// Verify `tag` then decrypt `ciphertext`. The MAC is checked in constant
/// time *before* any CBC/padding processing runs, so padding-oracle style
/// timing differences never reach an attacker who cannot forge the tag.
pub fn decrypt(
    key: &CbcHmacKey<'_>,
    iv: &[u8; 16],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, CompositeDecryptError> {
    let expected = compute_tag(key, iv, aad, ciphertext);
    if expected.len() != tag.len() || expected.ct_eq(tag).unwrap_u8() == 0 {
        return Err(CompositeDecryptError);
    }
    cbc_decrypt(key.enc_key, iv, ciphertext).map_err(|_| CompositeDecryptError)
}

fn compute_tag(key: &CbcHmacKey<'_>, iv: &[u8; 16], aad: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let al = (aad.len() as u64) * 8;
    let mut mac_input = Vec::with_capacity(aad.len() + 16 + ciphertext.len() + 8);
    mac_input.extend_from_slice(aad);
    mac_input.extend_from_slice(iv);
    mac_input.extend_from_slice(ciphertext);
    mac_input.extend_from_slice(&al.to_be_bytes());

    let signer = SymmetricSigner::new(key.hash, key.mac_key);
    let full_mac = signer.sign(&mac_input);
    full_mac[..key.tag_len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 7518 Appendix B: A128CBC-HS256 worked example.
    #[test]
    fn rfc7518_appendix_b_vector() {
        let mac_key: [u8; 16] = [
            4, 211, 31, 197, 84, 157, 252, 254, 11, 100, 157, 250, 63, 170, 106, 206,
        ];
        let enc_key: [u8; 16] = [
            8, 160, 65, 160, 212, 238, 130, 152, 112, 111, 46, 217, 178, 219, 108, 82,
        ];
        let iv: [u8; 16] = [
            3, 22, 60, 12, 43, 67, 104, 105, 108, 108, 105, 99, 111, 116, 104, 101,
        ];
        let aad: Vec<u8> = vec![
            101, 121, 74, 104, 98, 71, 99, 105, 79, 105, 74, 66, 77, 84, 73, 52, 83, 49, 99, 105,
            76, 67, 74, 108, 98, 109, 77, 105, 79, 105, 74, 66, 77, 84, 73, 52, 81, 48, 74, 68,
            76, 85, 104, 84, 77, 106, 85, 50, 73, 110, 48,
        ];
        let plaintext = b"Live long and prosper.";

        let key = CbcHmacKey {
            mac_key: &mac_key,
            enc_key: &enc_key,
            hash: HashAlgorithm::Sha256,
            tag_len: 16,
        };
        let (ciphertext, tag) = encrypt(&key, &iv, &aad, plaintext).unwrap();
        let expected_ct: Vec<u8> = vec![
            40, 57, 83, 181, 119, 33, 133, 148, 198, 185, 243, 24, 152, 230, 6, 75, 129, 223, 127,
            19, 210, 82, 183, 230, 168, 33, 215, 104, 143, 112, 56, 102,
        ];
        assert_eq!(ciphertext, expected_ct);
        let expected_tag: Vec<u8> = vec![
            83, 73, 191, 98, 104, 205, 211, 128, 201, 189, 199, 133, 32, 38, 194, 85,
        ];
        assert_eq!(tag, expected_tag);

        let recovered = decrypt(&key, &iv, &aad, &ciphertext, &tag).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn tampered_tag_is_rejected_before_any_padding_error() {
        let mac_key = [0x11u8; 32];
        let enc_key = [0x22u8; 32];
        let iv = [0x33u8; 16];
        let key = CbcHmacKey {
            mac_key: &mac_key,
            enc_key: &enc_key,
            hash: HashAlgorithm::Sha512,
            tag_len: 32,
        };
        let (ciphertext, mut tag) = encrypt(&key, &iv, b"aad", b"secret payload").unwrap();
        tag[0] ^= 0x01;
        assert_eq!(decrypt(&key, &iv, b"aad", &ciphertext, &tag), Err(CompositeDecryptError));
    }

    #[test]
    fn split_composite_key_halves_evenly() {
        let cek = [0u8; 64];
        let (mac, enc) = split_composite_key(&cek);
        assert_eq!(mac.len(), 32);
        assert_eq!(enc.len(), 32);
    }
}
