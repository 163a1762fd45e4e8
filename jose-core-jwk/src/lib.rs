//! JSON Web Key / JWK Set data model (RFC 7517) with RFC 7638 thumbprints.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

extern crate alloc;

mod key;
mod thumbprint;

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use jose_core_b64::{base64ct::Base64, B64Bytes};
use jose_core_jwa::SignatureAlgorithm;
use serde::{Deserialize, Serialize};

pub use jose_core_jwa::{EcCurve, KeyType};
pub use key::{Ec, Key, Oct, Rsa, RsaOtherPrime};
pub use thumbprint::{Thumbprint, ThumbprintError};

/// A JSON Web Key: key material plus the common parameters that apply to
/// any `kty`.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    /// The key material itself.
    #[serde(flatten)]
    pub key: Key,

    /// Common parameters (`kid`, `use`, `alg`, `key_ops`, X.509 metadata).
    #[serde(flatten)]
    pub params: Parameters,
}

impl Jwk {
    /// Create a new JWK from key material, with default (empty) parameters.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            params: Parameters::default(),
        }
    }

    /// Compute this key's RFC 7638 thumbprint.
    pub fn thumbprint(&self) -> Result<Thumbprint, ThumbprintError> {
        Thumbprint::compute(&self.key)
    }

    /// Validate the structural invariants from the data model: required
    /// members present and non-empty, and `alg` (if present) compatible
    /// with the key's `kty`.
    pub fn validate(&self) -> Result<(), JwkError> {
        match &self.key {
            Key::Oct(oct) => {
                if oct.k.as_bytes().is_empty() {
                    return Err(JwkError::EmptySymmetricKey);
                }
            }
            Key::Rsa(_) | Key::Ec(_) => {}
        }
        if let Some(alg) = self.params.alg {
            let compatible = match (&self.key, alg) {
                (Key::Oct(_), SignatureAlgorithm::Hs256 | SignatureAlgorithm::Hs384 | SignatureAlgorithm::Hs512) => true,
                (Key::Rsa(_), a) if matches!(a.key_category(), jose_core_jwa::KeyCategory::Rsa) => true,
                (Key::Ec(_), a) if matches!(a.key_category(), jose_core_jwa::KeyCategory::EllipticCurve) => true,
                _ => false,
            };
            if !compatible {
                return Err(JwkError::AlgorithmNotSupportedByKeyType);
            }
        }
        Ok(())
    }
}

/// Errors from [`Jwk::validate`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JwkError {
    /// A symmetric (`oct`) key's `k` member was empty.
    EmptySymmetricKey,
    /// `alg` is present but not supported by this key's `kty`.
    AlgorithmNotSupportedByKeyType,
}

impl core::fmt::Display for JwkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JwkError::EmptySymmetricKey => f.write_str("symmetric JWK has an empty `k` member"),
            JwkError::AlgorithmNotSupportedByKeyType => {
                f.write_str("`alg` is not supported by this key's `kty`")
            }
        }
    }
}

/// Common JWK parameters that apply regardless of `kty`.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// The algorithm this key is intended to be used with.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<SignatureAlgorithm>,

    /// Opaque identifier for this key, used to select it by `kid` header.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// Intended use of this key (named `use` in the RFC).
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub use_for: Option<UseFor>,

    /// Intended operations for this key.
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub key_ops: BTreeSet<Operations>,

    /// X.509 certificate metadata.
    #[serde(flatten)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x509: Option<Box<X509>>,
}

/// X.509 certificate metadata carried alongside a JWK.
///
/// This models only the structural shape (RFC 7517 §4.6-4.9); certificate
/// chain validation beyond thumbprint comparison is out of scope.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct X509 {
    /// The X.509 certificate chain associated with this key (standard,
    /// padded base64 — not base64url, per RFC 7517 §4.7).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5c: Option<Vec<B64Bytes<Box<[u8]>, Base64>>>,

    /// SHA-1 thumbprint of the leaf certificate.
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t", default)]
    pub x5t: Option<B64Bytes<[u8; 20]>>,

    /// SHA-256 thumbprint of the leaf certificate.
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t#S256", default)]
    pub x5t_s256: Option<B64Bytes<[u8; 32]>>,
}

/// A JWK Set (RFC 7517 §5): an ordered collection of keys.
///
/// This models only the JSON shape. Atomic refresh, indexing by `kid`, and
/// discovery protocols are a caller concern (`jose-core-jwt`'s key-provider
/// interface consumes a `&[Jwk]` synchronously; it does not own a `Jwks`).
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys in the set, in document order.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Find all keys with a matching `kid`. Per the tie-break rule in the
    /// validation policy (§4.10), when more than one key shares a `kid` the
    /// caller must additionally filter by algorithm compatibility.
    pub fn by_kid<'a>(&'a self, kid: &str) -> impl Iterator<Item = &'a Jwk> {
        self.keys
            .iter()
            .filter(move |k| k.params.kid.as_deref() == Some(kid))
    }
}

/// Intended use of a key (`use` JWK parameter).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseFor {
    /// Intended for encryption (JWE).
    #[serde(rename = "enc")]
    Encryption,
    /// Intended for signing (JWS).
    #[serde(rename = "sig")]
    Signing,
}

/// Possible values for `key_ops` (RFC 7517 §4.3).
// NOTE: kept in lexicographic order, BTreeSet relies on Ord for dedup/sort.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operations {
    /// Decrypt content and validate decryption, if applicable.
    Decrypt,
    /// Derive bits not to be used as a key.
    DeriveBits,
    /// Derive key.
    DeriveKey,
    /// Encrypt content.
    Encrypt,
    /// Compute digital signature or MAC.
    Sign,
    /// Decrypt key and validate decryption, if applicable.
    UnwrapKey,
    /// Verify digital signature or MAC.
    Verify,
    /// Encrypt key.
    WrapKey,
}
