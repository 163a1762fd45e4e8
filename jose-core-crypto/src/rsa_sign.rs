//! RSASSA-PKCS1-v1_5 and RSASSA-PSS signing (§4.6), delegated to the `rsa`
//! crate. Both families require at least a 2048-bit modulus per RFC 7518
//! §3.3.

use jose_core_jwa::HashAlgorithm;
use rsa::pkcs1v15::{SigningKey as Pkcs1SigningKey, VerifyingKey as Pkcs1VerifyingKey};
use rsa::pss::{SigningKey as PssSigningKey, VerifyingKey as PssVerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

const MIN_MODULUS_BITS: usize = 2048;

/// The RSA key's modulus is shorter than the 2048 bits RFC 7518 §3.3
/// requires for signing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModulusTooSmall;

/// RSA signature verification failed, or an unsupported hash algorithm was
/// requested for PSS/PKCS1v15 (only SHA-256/384/512 are defined by RFC
/// 7518).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RsaSignatureError;

fn check_modulus(key_bits: usize) -> Result<(), ModulusTooSmall> {
    if key_bits < MIN_MODULUS_BITS {
        Err(ModulusTooSmall)
    } else {
        Ok(())
    }
}

/// Sign `message` with RSASSA-PKCS1-v1_5 under `hash`.
pub fn pkcs1v15_sign(key: &RsaPrivateKey, hash: HashAlgorithm, message: &[u8]) -> Result<Vec<u8>, ModulusTooSmall> {
    check_modulus(key.size() * 8)?;
    let mut rng = rand::thread_rng();
    let sig = match hash {
        HashAlgorithm::Sha256 => Pkcs1SigningKey::<Sha256>::new(key.clone()).sign_with_rng(&mut rng, message).to_vec(),
        HashAlgorithm::Sha384 => Pkcs1SigningKey::<Sha384>::new(key.clone()).sign_with_rng(&mut rng, message).to_vec(),
        HashAlgorithm::Sha512 => Pkcs1SigningKey::<Sha512>::new(key.clone()).sign_with_rng(&mut rng, message).to_vec(),
        HashAlgorithm::Sha1 => unreachable!("SHA-1 is not a valid RS*/PS* hash"),
    };
    Ok(sig)
}

/// Verify an RSASSA-PKCS1-v1_5 signature.
pub fn pkcs1v15_verify(key: &RsaPublicKey, hash: HashAlgorithm, message: &[u8], signature: &[u8]) -> Result<(), RsaSignatureError> {
    macro_rules! verify {
        ($digest:ty) => {{
            let vk = Pkcs1VerifyingKey::<$digest>::new(key.clone());
            let sig = signature.try_into().map_err(|_| RsaSignatureError)?;
            vk.verify(message, &sig).map_err(|_| RsaSignatureError)
        }};
    }
    match hash {
        HashAlgorithm::Sha256 => verify!(Sha256),
        HashAlgorithm::Sha384 => verify!(Sha384),
        HashAlgorithm::Sha512 => verify!(Sha512),
        HashAlgorithm::Sha1 => Err(RsaSignatureError),
    }
}

/// Sign `message` with RSASSA-PSS under `hash`, salt length equal to the
/// hash's digest length (the RFC 7518 §3.5 default).
pub fn pss_sign(key: &RsaPrivateKey, hash: HashAlgorithm, message: &[u8]) -> Result<Vec<u8>, ModulusTooSmall> {
    check_modulus(key.size() * 8)?;
    let mut rng = rand::thread_rng();
    let sig = match hash {
        HashAlgorithm::Sha256 => PssSigningKey::<Sha256>::new(key.clone()).sign_with_rng(&mut rng, message).to_vec(),
        HashAlgorithm::Sha384 => PssSigningKey::<Sha384>::new(key.clone()).sign_with_rng(&mut rng, message).to_vec(),
        HashAlgorithm::Sha512 => PssSigningKey::<Sha512>::new(key.clone()).sign_with_rng(&mut rng, message).to_vec(),
        HashAlgorithm::Sha1 => unreachable!("SHA-1 is not a valid RS*/PS* hash"),
    };
    Ok(sig)
}

/// Verify an RSASSA-PSS signature.
pub fn pss_verify(key: &RsaPublicKey, hash: HashAlgorithm, message: &[u8], signature: &[u8]) -> Result<(), RsaSignatureError> {
    macro_rules! verify {
        ($digest:ty) => {{
            let vk = PssVerifyingKey::<$digest>::new(key.clone());
            let sig = signature.try_into().map_err(|_| RsaSignatureError)?;
            vk.verify(message, &sig).map_err(|_| RsaSignatureError)
        }};
    }
    match hash {
        HashAlgorithm::Sha256 => verify!(Sha256),
        HashAlgorithm::Sha384 => verify!(Sha384),
        HashAlgorithm::Sha512 => verify!(Sha512),
        HashAlgorithm::Sha1 => Err(RsaSignatureError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;

    fn test_key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap()
    }

    #[test]
    fn pkcs1v15_roundtrip() {
        let key = test_key();
        let pubkey = RsaPublicKey::from(&key);
        let sig = pkcs1v15_sign(&key, HashAlgorithm::Sha256, b"hello").unwrap();
        assert!(pkcs1v15_verify(&pubkey, HashAlgorithm::Sha256, b"hello", &sig).is_ok());
        assert!(pkcs1v15_verify(&pubkey, HashAlgorithm::Sha256, b"goodbye", &sig).is_err());
    }

    #[test]
    fn pss_roundtrip() {
        let key = test_key();
        let pubkey = RsaPublicKey::from(&key);
        let sig = pss_sign(&key, HashAlgorithm::Sha384, b"hello").unwrap();
        assert!(pss_verify(&pubkey, HashAlgorithm::Sha384, b"hello", &sig).is_ok());
    }

    #[test]
    fn pss_signatures_are_randomized() {
        let key = test_key();
        let a = pss_sign(&key, HashAlgorithm::Sha256, b"same message").unwrap();
        let b = pss_sign(&key, HashAlgorithm::Sha256, b"same message").unwrap();
        assert_ne!(a, b);
    }
}
