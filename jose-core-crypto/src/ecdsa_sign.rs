//! ECDSA over P-256/P-384/P-521 (§4.6), fixed-size `R || S` encoding per RFC
//! 7518 §3.4 — never the ASN.1 DER encoding the `ecdsa`/`signature` crates
//! produce by default, which is why each curve's `Signature::to_bytes()`
//! (already fixed-width per curve) is used rather than `to_der()`.

use jose_core_jwa::EcCurve;
use p256::ecdsa::{Signature as P256Signature, SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{Signature as P384Signature, SigningKey as P384SigningKey, VerifyingKey as P384VerifyingKey};
use p521::ecdsa::{Signature as P521Signature, SigningKey as P521SigningKey, VerifyingKey as P521VerifyingKey};
use signature::{RandomizedSigner, Verifier};

/// A signature's length did not match the curve's required `R || S` width,
/// or verification failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcdsaError;

/// An EC private key, carrying its curve so sign/verify can dispatch.
pub enum EcPrivateKey {
    P256(P256SigningKey),
    P384(P384SigningKey),
    P521(P521SigningKey),
}

/// An EC public key, carrying its curve so sign/verify can dispatch.
pub enum EcPublicKey {
    P256(P256VerifyingKey),
    P384(P384VerifyingKey),
    P521(P521VerifyingKey),
}

impl EcPrivateKey {
    pub fn curve(&self) -> EcCurve {
        match self {
            EcPrivateKey::P256(_) => EcCurve::P256,
            EcPrivateKey::P384(_) => EcCurve::P384,
            EcPrivateKey::P521(_) => EcCurve::P521,
        }
    }
}

impl EcPublicKey {
    pub fn curve(&self) -> EcCurve {
        match self {
            EcPublicKey::P256(_) => EcCurve::P256,
            EcPublicKey::P384(_) => EcCurve::P384,
            EcPublicKey::P521(_) => EcCurve::P521,
        }
    }
}

/// Sign `message`, producing the fixed-width `R || S` encoding (64/96/132
/// bytes for P-256/384/521).
pub fn sign(key: &EcPrivateKey, message: &[u8]) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    match key {
        EcPrivateKey::P256(k) => {
            let sig: P256Signature = k.sign_with_rng(&mut rng, message);
            sig.to_bytes().to_vec()
        }
        EcPrivateKey::P384(k) => {
            let sig: P384Signature = k.sign_with_rng(&mut rng, message);
            sig.to_bytes().to_vec()
        }
        EcPrivateKey::P521(k) => {
            let sig: P521Signature = k.sign_with_rng(&mut rng, message);
            sig.to_bytes().to_vec()
        }
    }
}

/// Verify a fixed-width `R || S` signature.
pub fn verify(key: &EcPublicKey, message: &[u8], signature: &[u8]) -> Result<(), EcdsaError> {
    match key {
        EcPublicKey::P256(k) => {
            let sig = P256Signature::from_slice(signature).map_err(|_| EcdsaError)?;
            k.verify(message, &sig).map_err(|_| EcdsaError)
        }
        EcPublicKey::P384(k) => {
            let sig = P384Signature::from_slice(signature).map_err(|_| EcdsaError)?;
            k.verify(message, &sig).map_err(|_| EcdsaError)
        }
        EcPublicKey::P521(k) => {
            let sig = P521Signature::from_slice(signature).map_err(|_| EcdsaError)?;
            k.verify(message, &sig).map_err(|_| EcdsaError)
        }
    }
}
