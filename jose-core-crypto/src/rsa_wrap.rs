//! RSA key encryption (§4.7): RSAES-PKCS1-v1_5 and RSAES-OAEP (SHA-1/256/
//! 384/512), delegated to the `rsa` crate.

use jose_core_jwa::HashAlgorithm;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

/// RSA key encryption/decryption failed. Decryption failures are
/// deliberately undifferentiated from "ciphertext too short" or "modulus
/// mismatch" — the `rsa` crate's OAEP/PKCS1v15 decrypt already collapses
/// padding errors into one variant to avoid a Bleichenbacher-style oracle,
/// and this wrapper preserves that by not inspecting the inner error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RsaWrapError;

/// Encrypt `cek` with RSAES-PKCS1-v1_5.
pub fn pkcs1v15_encrypt(key: &RsaPublicKey, cek: &[u8]) -> Result<Vec<u8>, RsaWrapError> {
    let mut rng = rand::thread_rng();
    key.encrypt(&mut rng, Pkcs1v15Encrypt, cek).map_err(|_| RsaWrapError)
}

/// Decrypt an RSAES-PKCS1-v1_5 ciphertext.
pub fn pkcs1v15_decrypt(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, RsaWrapError> {
    key.decrypt(Pkcs1v15Encrypt, ciphertext).map_err(|_| RsaWrapError)
}

fn oaep_for(hash: HashAlgorithm) -> Oaep {
    match hash {
        HashAlgorithm::Sha1 => Oaep::new::<sha1::Sha1>(),
        HashAlgorithm::Sha256 => Oaep::new::<sha2::Sha256>(),
        HashAlgorithm::Sha384 => Oaep::new::<sha2::Sha384>(),
        HashAlgorithm::Sha512 => Oaep::new::<sha2::Sha512>(),
    }
}

/// Encrypt `cek` with RSAES-OAEP under `hash` (SHA-1 for bare `RSA-OAEP`,
/// SHA-256/384/512 for the `RSA-OAEP-*` extensions).
pub fn oaep_encrypt(key: &RsaPublicKey, hash: HashAlgorithm, cek: &[u8]) -> Result<Vec<u8>, RsaWrapError> {
    let mut rng = rand::thread_rng();
    key.encrypt(&mut rng, oaep_for(hash), cek).map_err(|_| RsaWrapError)
}

/// Decrypt an RSAES-OAEP ciphertext under `hash`.
pub fn oaep_decrypt(key: &RsaPrivateKey, hash: HashAlgorithm, ciphertext: &[u8]) -> Result<Vec<u8>, RsaWrapError> {
    key.decrypt(oaep_for(hash), ciphertext).map_err(|_| RsaWrapError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap()
    }

    #[test]
    fn pkcs1v15_roundtrip() {
        let key = test_key();
        let pubkey = RsaPublicKey::from(&key);
        let cek = [0x11u8; 32];
        let wrapped = pkcs1v15_encrypt(&pubkey, &cek).unwrap();
        let unwrapped = pkcs1v15_decrypt(&key, &wrapped).unwrap();
        assert_eq!(unwrapped, cek);
    }

    #[test]
    fn oaep_sha256_roundtrip() {
        let key = test_key();
        let pubkey = RsaPublicKey::from(&key);
        let cek = [0x22u8; 16];
        let wrapped = oaep_encrypt(&pubkey, HashAlgorithm::Sha256, &cek).unwrap();
        let unwrapped = oaep_decrypt(&key, HashAlgorithm::Sha256, &wrapped).unwrap();
        assert_eq!(unwrapped, cek);
    }

    #[test]
    fn oaep_with_wrong_hash_fails() {
        let key = test_key();
        let pubkey = RsaPublicKey::from(&key);
        let cek = [0x33u8; 16];
        let wrapped = oaep_encrypt(&pubkey, HashAlgorithm::Sha1, &cek).unwrap();
        assert!(oaep_decrypt(&key, HashAlgorithm::Sha256, &wrapped).is_err());
    }
}
