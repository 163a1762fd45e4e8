//! Converts a [`Jwk`] into the concrete key type each key-management
//! algorithm's crypto primitive needs — the JWE-side counterpart of
//! `jose_core_jws::keys`.

use jose_core_crypto::ecdh::{EcdhPrivateKey, EcdhPublicKey};
use jose_core_jwa::EcCurve;
use jose_core_jwk::{Jwk, Key};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

/// The JWK's key material was unsuitable for the requested key-management
/// operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyResolutionError;

/// Extract symmetric key bytes for `dir`, `A*KW`, or `A*GCMKW`.
pub fn symmetric_key(jwk: &Jwk) -> Result<&[u8], KeyResolutionError> {
    match &jwk.key {
        Key::Oct(oct) => Ok(oct.k.as_bytes()),
        _ => Err(KeyResolutionError),
    }
}

/// Build an RSA public key from a JWK, for wrapping a CEK.
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

/// Build an RSA private key from a JWK, for unwrapping a CEK.
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

/// Build an ECDH-ES public key (the other party's static or ephemeral key)
/// from a JWK.
pub fn ecdh_public_key(jwk: &Jwk) -> Result<EcdhPublicKey, KeyResolutionError> {
    match &jwk.key {
        Key::Ec(ec) => {
            let mut point = Vec::with_capacity(1 + ec.x.as_ref().len() + ec.y.as_ref().len());
            point.push(0x04);
            point.extend_from_slice(ec.x.as_ref());
            point.extend_from_slice(ec.y.as_ref());
            match ec.crv {
                EcCurve::P256 => p256::PublicKey::from_sec1_bytes(&point)
                    .map(EcdhPublicKey::P256)
                    .map_err(|_| KeyResolutionError),
                EcCurve::P384 => p384::PublicKey::from_sec1_bytes(&point)
                    .map(EcdhPublicKey::P384)
                    .map_err(|_| KeyResolutionError),
                EcCurve::P521 => p521::PublicKey::from_sec1_bytes(&point)
                    .map(EcdhPublicKey::P521)
                    .map_err(|_| KeyResolutionError),
            }
        }
        _ => Err(KeyResolutionError),
    }
}

/// Build an ECDH-ES private (static) key from a JWK, for the consumer side
/// of key agreement.
pub fn ecdh_private_key(jwk: &Jwk) -> Result<EcdhPrivateKey, KeyResolutionError> {
    match &jwk.key {
        Key::Ec(ec) => {
            let d = ec.d.as_ref().ok_or(KeyResolutionError)?;
            match ec.crv {
                EcCurve::P256 => p256::SecretKey::from_slice(d.as_bytes())
                    .map(EcdhPrivateKey::P256)
                    .map_err(|_| KeyResolutionError),
                EcCurve::P384 => p384::SecretKey::from_slice(d.as_bytes())
                    .map(EcdhPrivateKey::P384)
                    .map_err(|_| KeyResolutionError),
                EcCurve::P521 => p521::SecretKey::from_slice(d.as_bytes())
                    .map(EcdhPrivateKey::P521)
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
        assert_eq!(symmetric_key(&jwk), Err(KeyResolutionError));
    }

    #[test]
    fn symmetric_key_extracts_oct_bytes() {
        let jwk = Jwk::new(Key::Oct(Oct { k: B64Secret::new(vec![4, 5, 6]) }));
        assert_eq!(symmetric_key(&jwk).unwrap(), &[4, 5, 6]);
    }
}
