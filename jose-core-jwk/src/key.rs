use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use jose_core_b64::{B64Bytes, B64Secret};
use jose_core_jwa::EcCurve;

/// A key type suitable for a JWK, tagged on `kty`.
///
/// Private material is modeled as optional fields on the same struct as the
/// public material (rather than as separate public/private types) because
/// that's the shape RFC 7517 actually puts on the wire: a private RSA JWK
/// is a public RSA JWK with `d`/`p`/`q`/... additionally present.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", tag = "kty")]
pub enum Key {
    /// An elliptic curve key.
    Ec(Ec),
    /// An RSA key.
    Rsa(Rsa),
    /// A symmetric key.
    #[serde(rename = "oct")]
    Oct(Oct),
}

impl Key {
    /// Whether this key carries private material.
    pub fn is_private(&self) -> bool {
        match self {
            Key::Ec(k) => k.d.is_some(),
            Key::Rsa(k) => k.d.is_some(),
            Key::Oct(_) => true,
        }
    }
}

/// An elliptic curve key. `d` is present for a private key, absent for a
/// public key.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ec {
    /// DSS curve identifier.
    pub crv: EcCurve,
    /// X coordinate for the elliptic curve point.
    pub x: B64Bytes,
    /// Y coordinate for the elliptic curve point.
    pub y: B64Bytes,
    /// Private key value (ECC private scalar), present only for a private
    /// key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<B64Secret>,
}

/// An RSA key. Private-key fields are present only for a private key.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsa {
    /// RSA modulus parameter.
    pub n: B64Bytes,
    /// RSA public exponent parameter.
    pub e: B64Bytes,
    /// Private key exponent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<B64Secret>,
    /// Private first prime factor.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub p: Option<B64Secret>,
    /// Private second prime factor.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub q: Option<B64Secret>,
    /// Private first factor CRT exponent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dp: Option<B64Secret>,
    /// Private second factor CRT exponent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dq: Option<B64Secret>,
    /// Private first CRT coefficient.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub qi: Option<B64Secret>,
    /// Additional RSA private primes, for keys with more than two primes.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub oth: Vec<RsaOtherPrime>,
}

/// One additional RSA private prime, for multi-prime RSA keys.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaOtherPrime {
    /// A private prime factor.
    pub r: B64Secret,
    /// A private factor CRT exponent.
    pub d: B64Secret,
    /// A private factor CRT coefficient.
    pub t: B64Secret,
}

/// A symmetric octet-sequence key. Always private material by definition.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oct {
    /// The symmetric key bytes.
    pub k: B64Secret,
}

impl From<Ec> for Key {
    fn from(key: Ec) -> Self {
        Self::Ec(key)
    }
}

impl From<Rsa> for Key {
    fn from(key: Rsa) -> Self {
        Self::Rsa(key)
    }
}

impl From<Oct> for Key {
    fn from(key: Oct) -> Self {
        Self::Oct(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_rsa_key_serializes_only_present_fields() {
        let key = Key::Rsa(Rsa {
            n: B64Bytes::new(alloc::vec![1, 2, 3]),
            e: B64Bytes::new(alloc::vec![1, 0, 1]),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
            oth: Vec::new(),
        });
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value.get("kty").unwrap(), "RSA");
        assert!(value.get("d").is_none());
        assert!(!key.is_private());
    }
}
