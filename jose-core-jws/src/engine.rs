//! Algorithm-dispatched signer/verifier engine (§4.12/§4.9 interaction):
//! given a [`JwsHeader`]'s `alg` and a resolved [`Jwk`], produce or check a
//! signature over the compact signing input `header_b64 '.' payload_b64`.
//!
//! HMAC signers are pooled per the resource-sizing model (§5): constructing
//! a [`SymmetricSigner`] precomputes the ipad/opad key blocks, so a signer
//! keyed on the same bytes is worth reusing across calls rather than
//! rebuilding per token.

use std::sync::Arc;

use jose_core_crypto::{ecdsa_sign, mac::SymmetricSigner, rsa_sign};
use jose_core_jwa::{HashAlgorithm, SignatureAlgorithm};
use jose_core_jwk::Jwk;
use jose_core_util::Pool;

use crate::keys::{self, KeyResolutionError};

/// Signing or verification could not proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JwsCryptoError {
    /// The key did not match the algorithm's requirements.
    KeyResolution,
    /// The RSA modulus was smaller than RFC 7518 §3.3's 2048-bit minimum.
    ModulusTooSmall,
    /// Signature verification failed (or, for `none`, a signature was
    /// present when RFC 7515 §3.6 requires it be empty).
    VerificationFailed,
}

impl From<KeyResolutionError> for JwsCryptoError {
    fn from(_: KeyResolutionError) -> Self {
        JwsCryptoError::KeyResolution
    }
}

/// Repeatedly signs/verifies with one fixed HMAC key, pooling the
/// precomputed ipad/opad key-block state per the concurrency model's
/// "stateful crypto contexts are owned by engine objects" rule (§4.3, §9) —
/// the cost this avoids is re-deriving those blocks (a hash of the key,
/// when it exceeds one block) on every call.
pub struct HmacEngine {
    hash: HashAlgorithm,
    key: Vec<u8>,
    pool: Arc<Pool<SymmetricSigner>>,
}

impl HmacEngine {
    /// Build an engine for repeated use with `key` under `hash`, retaining
    /// up to `capacity` idle signers (use [`jose_core_util::default_pool_capacity`]
    /// for the library-wide default).
    pub fn new(hash: HashAlgorithm, key: &[u8], capacity: usize) -> Self {
        Self {
            hash,
            key: key.to_vec(),
            pool: Arc::new(Pool::new(capacity)),
        }
    }

    /// Sign `signing_input`, reusing a pooled [`SymmetricSigner`] when one
    /// is idle.
    pub fn sign(&self, signing_input: &[u8]) -> Vec<u8> {
        let guard = self.pool.acquire_or(|| SymmetricSigner::new(self.hash, &self.key));
        guard.sign(signing_input)
    }

    /// Verify `signature` over `signing_input`.
    pub fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool {
        let guard = self.pool.acquire_or(|| SymmetricSigner::new(self.hash, &self.key));
        guard.verify(signing_input, signature)
    }
}

/// Sign `signing_input` (`header_b64 || '.' || payload_b64`) with `alg`
/// using key material resolved from `jwk`.
pub fn sign(alg: SignatureAlgorithm, jwk: &Jwk, signing_input: &[u8]) -> Result<Vec<u8>, JwsCryptoError> {
    use SignatureAlgorithm::*;
    match alg {
        None => Ok(Vec::new()),
        Hs256 | Hs384 | Hs512 => {
            let key = keys::symmetric_key(jwk, alg)?;
            let hash = alg.hash().expect("HS* always has a hash");
            Ok(SymmetricSigner::new(hash, key).sign(signing_input))
        }
        Rs256 | Rs384 | Rs512 => {
            let key = keys::rsa_private_key(jwk)?;
            let hash = alg.hash().expect("RS* always has a hash");
            rsa_sign::pkcs1v15_sign(&key, hash, signing_input).map_err(|_| JwsCryptoError::ModulusTooSmall)
        }
        Ps256 | Ps384 | Ps512 => {
            let key = keys::rsa_private_key(jwk)?;
            let hash = alg.hash().expect("PS* always has a hash");
            rsa_sign::pss_sign(&key, hash, signing_input).map_err(|_| JwsCryptoError::ModulusTooSmall)
        }
        Es256 | Es384 | Es512 => {
            let key = keys::ec_private_key(jwk, alg)?;
            Ok(ecdsa_sign::sign(&key, signing_input))
        }
    }
}

/// Verify `signature` over `signing_input` under `alg` with key material
/// resolved from `jwk`.
pub fn verify(alg: SignatureAlgorithm, jwk: &Jwk, signing_input: &[u8], signature: &[u8]) -> Result<(), JwsCryptoError> {
    use SignatureAlgorithm::*;
    match alg {
        None => {
            if signature.is_empty() {
                Ok(())
            } else {
                Err(JwsCryptoError::VerificationFailed)
            }
        }
        Hs256 | Hs384 | Hs512 => {
            let key = keys::symmetric_key(jwk, alg)?;
            let hash = alg.hash().expect("HS* always has a hash");
            if SymmetricSigner::new(hash, key).verify(signing_input, signature) {
                Ok(())
            } else {
                Err(JwsCryptoError::VerificationFailed)
            }
        }
        Rs256 | Rs384 | Rs512 => {
            let key = keys::rsa_public_key(jwk)?;
            let hash = alg.hash().expect("RS* always has a hash");
            rsa_sign::pkcs1v15_verify(&key, hash, signing_input, signature).map_err(|_| JwsCryptoError::VerificationFailed)
        }
        Ps256 | Ps384 | Ps512 => {
            let key = keys::rsa_public_key(jwk)?;
            let hash = alg.hash().expect("PS* always has a hash");
            rsa_sign::pss_verify(&key, hash, signing_input, signature).map_err(|_| JwsCryptoError::VerificationFailed)
        }
        Es256 | Es384 | Es512 => {
            let key = keys::ec_public_key(jwk, alg)?;
            ecdsa_sign::verify(&key, signing_input, signature).map_err(|_| JwsCryptoError::VerificationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwk::{Key, Oct};

    fn hs256_key() -> Jwk {
        Jwk::new(Key::Oct(Oct {
            k: B64Secret::new(vec![7u8; 32]),
        }))
    }

    #[test]
    fn hs256_sign_then_verify() {
        let jwk = hs256_key();
        let sig = sign(SignatureAlgorithm::Hs256, &jwk, b"header.payload").unwrap();
        assert!(verify(SignatureAlgorithm::Hs256, &jwk, b"header.payload", &sig).is_ok());
    }

    #[test]
    fn hs256_tamper_fails_verify() {
        let jwk = hs256_key();
        let sig = sign(SignatureAlgorithm::Hs256, &jwk, b"header.payload").unwrap();
        assert_eq!(
            verify(SignatureAlgorithm::Hs256, &jwk, b"header.PAYLOAD-tampered", &sig),
            Err(JwsCryptoError::VerificationFailed)
        );
    }

    #[test]
    fn none_algorithm_requires_empty_signature() {
        let jwk = hs256_key();
        assert!(verify(SignatureAlgorithm::None, &jwk, b"x", b"").is_ok());
        assert_eq!(
            verify(SignatureAlgorithm::None, &jwk, b"x", b"not-empty"),
            Err(JwsCryptoError::VerificationFailed)
        );
    }

    #[test]
    fn wrong_key_type_is_a_resolution_error() {
        let jwk = hs256_key();
        assert_eq!(sign(SignatureAlgorithm::Es256, &jwk, b"x"), Err(JwsCryptoError::KeyResolution));
    }

    #[test]
    fn hmac_engine_reuses_pooled_signer_across_calls() {
        let engine = HmacEngine::new(HashAlgorithm::Sha256, b"a shared secret key", 2);
        let sig = engine.sign(b"message one");
        assert!(engine.verify(b"message one", &sig));
        assert!(!engine.verify(b"message two", &sig));
        // two sequential calls each acquire-then-release, so the pool
        // should never grow past one idle signer for this single-threaded use
        assert_eq!(engine.pool.idle_len(), 1);
    }
}
