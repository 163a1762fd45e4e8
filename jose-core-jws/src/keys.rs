//! Converts a [`Jwk`] into the concrete key type each signing algorithm's
//! crypto primitive needs. This is where the data-model layer
//! (`jose-core-jwk`) meets the primitive layer (`jose-core-crypto`); neither
//! of those crates depends on the other; this crate is their seam.

use jose_core_crypto::ecdsa_sign::{EcPrivateKey, EcPublicKey};
use jose_core_jwa::{EcCurve, KeyCategory, SignatureAlgorithm};
use jose_core_jwk::{Key, Jwk};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

/// The JWK's key material was unsuitable for the requested algorithm: wrong
/// `kty`, missing private fields for a signing operation, or malformed
/// numeric material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyResolutionError;

/// Extract the symmetric key bytes for an `HS*` algorithm.
pub fn symmetric_key<'a>(jwk: &'a Jwk, alg: SignatureAlgorithm) -> Result<&'a [u8], KeyResolutionError> {
    if !matches!(alg.key_category(), KeyCategory::Symmetric) {
        return Err(KeyResolutionError);
    }
    match &jwk.key {
        Key::Oct(oct) => Ok(oct.k.as_bytes()),
        _ => Err(KeyResolutionError),
    }
}

/// Build an RSA public key from a JWK's `n`/`e` members, for verification.
pub fn rsa_public_key(jwk: &Jwk) -> Result<RsaPublicKey, KeyResolutionError> {
    match &jwk.key {
        Key::Rsa(rsa) => {
            let n = BigUint::from_bytes_be(rsa.n.as_ref());
            let e = BigUint::from_bytes_be(rsa.e.as_ref());
            RsaPublicKey::new(n, e).map_err(|_| KeyResolutionError)
        }
        _ => Err(KeyResolutionError),
    }
}

/// Build an RSA private key from a JWK's full private material, for
/// signing. Requires `n`, `e`, `d`, `p`, `q` at minimum (multi-prime `oth`
/// is not supported by the `rsa` crate's key construction and is rejected).
pub fn rsa_private_key(jwk: &Jwk) -> Result<RsaPrivateKey, KeyResolutionError> {
    match &jwk.key {
        Key::Rsa(rsa) => {
            if !rsa.oth.is_empty() {
                return Err(KeyResolutionError);
            }
            let n = BigUint::from_bytes_be(rsa.n.as_ref());
            let e = BigUint::from_bytes_be(rsa.e.as_ref());
            let d = rsa.d.as_ref().ok_or(KeyResolutionError)?;
            let d = BigUint::from_bytes_be(d.as_bytes());
            let p = rsa.p.as_ref().ok_or(KeyResolutionError)?;
            let p = BigUint::from_bytes_be(p.as_bytes());
            let q = rsa.q.as_ref().ok_or(KeyResolutionError)?;
            let q = BigUint::from_bytes_be(q.as_bytes());
            let mut key = RsaPrivateKey::from_components(n, e, d, vec![p, q]).map_err(|_| KeyResolutionError)?;
            key.validate().map_err(|_| KeyResolutionError)?;
            key.precompute().map_err(|_| KeyResolutionError)?;
            Ok(key)
        }
        _ => Err(KeyResolutionError),
    }
}

fn ec_curve_matches(jwk_curve: EcCurve, alg: SignatureAlgorithm) -> bool {
    matches!(
        (jwk_curve, alg),
        (EcCurve::P256, SignatureAlgorithm::Es256)
            | (EcCurve::P384, SignatureAlgorithm::Es384)
            | (EcCurve::P521, SignatureAlgorithm::Es512)
    )
}

/// Build an EC public key for verification, checking the JWK's curve
/// matches the algorithm (RFC 7518 §3.4: ES256 only with P-256, etc).
pub fn ec_public_key(jwk: &Jwk, alg: SignatureAlgorithm) -> Result<EcPublicKey, KeyResolutionError> {
    match &jwk.key {
        Key::Ec(ec) if ec_curve_matches(ec.crv, alg) => {
            let mut point = Vec::with_capacity(1 + ec.x.as_ref().len() + ec.y.as_ref().len());
            point.push(0x04);
            point.extend_from_slice(ec.x.as_ref());
            point.extend_from_slice(ec.y.as_ref());
            match ec.crv {
                EcCurve::P256 => p256::PublicKey::from_sec1_bytes(&point)
                    .map(|pk| EcPublicKey::P256(p256::ecdsa::VerifyingKey::from(pk)))
                    .map_err(|_| KeyResolutionError),
                EcCurve::P384 => p384::PublicKey::from_sec1_bytes(&point)
                    .map(|pk| EcPublicKey::P384(p384::ecdsa::VerifyingKey::from(pk)))
                    .map_err(|_| KeyResolutionError),
                EcCurve::P521 => p521::PublicKey::from_sec1_bytes(&point)
                    .map(|pk| EcPublicKey::P521(p521::ecdsa::VerifyingKey::from(pk)))
                    .map_err(|_| KeyResolutionError),
            }
        }
        _ => Err(KeyResolutionError),
    }
}

/// Build an EC private key for signing.
pub fn ec_private_key(jwk: &Jwk, alg: SignatureAlgorithm) -> Result<EcPrivateKey, KeyResolutionError> {
    match &jwk.key {
        Key::Ec(ec) if ec_curve_matches(ec.crv, alg) => {
            let d = ec.d.as_ref().ok_or(KeyResolutionError)?;
            match ec.crv {
                EcCurve::P256 => p256::ecdsa::SigningKey::from_slice(d.as_bytes())
                    .map(EcPrivateKey::P256)
                    .map_err(|_| KeyResolutionError),
                EcCurve::P384 => p384::ecdsa::SigningKey::from_slice(d.as_bytes())
                    .map(EcPrivateKey::P384)
                    .map_err(|_| KeyResolutionError),
                EcCurve::P521 => p521::ecdsa::SigningKey::from_slice(d.as_bytes())
                    .map(EcPrivateKey::P521)
                    .map_err(|_| KeyResolutionError),
            }
        }
        _ => Err(KeyResolutionError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::{B64Bytes, B64Secret};
    use jose_core_jwk::Oct;

    #[test]
    fn symmetric_key_rejects_non_oct() {
        let jwk = Jwk::new(Key::Ec(jose_core_jwk::Ec {
            crv: EcCurve::P256,
            x: B64Bytes::new(vec![1; 32]),
            y: B64Bytes::new(vec![2; 32]),
            d: None,
        }));
        assert_eq!(symmetric_key(&jwk, SignatureAlgorithm::Hs256), Err(KeyResolutionError));
    }

    #[test]
    fn symmetric_key_extracts_oct_bytes() {
        let jwk = Jwk::new(Key::Oct(Oct {
            k: B64Secret::new(vec![9, 9, 9]),
        }));
        assert_eq!(symmetric_key(&jwk, SignatureAlgorithm::Hs256).unwrap(), &[9, 9, 9]);
    }

    #[test]
    fn ec_curve_mismatch_is_rejected() {
        let jwk = Jwk::new(Key::Ec(jose_core_jwk::Ec {
            crv: EcCurve::P384,
            x: B64Bytes::new(vec![1; 48]),
            y: B64Bytes::new(vec![2; 48]),
            d: None,
        }));
        assert_eq!(ec_public_key(&jwk, SignatureAlgorithm::Es256), Err(KeyResolutionError));
    }
}
