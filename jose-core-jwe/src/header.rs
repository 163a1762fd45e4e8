//! JWE header (§4.9/§6, RFC 7516 §4): the decoded first segment of a
//! 5-segment compact token.
//!
//! Mirrors `jose_core_jws::JwsHeader`'s shape but adds the JWE-only
//! members: `enc` (required — this is what distinguishes a JWE header from
//! a JWS one per §3's `JwtHeader` invariant), `zip`, and the ECDH-ES
//! agreement parameters `epk`/`apu`/`apv`, plus the AES-GCM-KW and
//! PBES2 header parameters this registry also reserves (`iv`/`tag` ride
//! along as ordinary `extra` members since AES-GCM-KW is the only key-wrap
//! family that needs them and they are per-recipient, not per-header,
//! concerns here).

use std::collections::BTreeSet;

use jose_core_b64::B64Bytes;
use jose_core_jwa::{CompressionAlgorithm, EncryptionAlgorithm, KeyManagementAlgorithm};
use jose_core_jwk::Jwk;
use serde::{Deserialize, Serialize};

/// An ECDH-ES ephemeral public key, carried in the `epk` header member.
/// Always a public key (no `d`) regardless of which side produced it.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EphemeralPublicKey {
    /// The curve.
    pub crv: jose_core_jwa::EcCurve,
    /// X coordinate.
    pub x: B64Bytes,
    /// Y coordinate.
    pub y: B64Bytes,
}

/// The JWE header, decoded from the token's first compact segment.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JweHeader {
    /// Key management algorithm. Required by RFC 7516, represented as
    /// `Option` for the same reason `JwsHeader::alg` is: a malformed or
    /// absent value should reach the validation pipeline, not fail parsing.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<KeyManagementAlgorithm>,

    /// Content encryption algorithm. Its presence is what makes a
    /// 5-segment token a JWE rather than a malformed JWS (§3).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub enc: Option<EncryptionAlgorithm>,

    /// Compression algorithm applied to the plaintext before encryption.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub zip: Option<CompressionAlgorithm>,

    /// Declares the media type of the complete JWE.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub typ: Option<String>,

    /// Declares the media type of the plaintext, e.g. `"JWT"` for a nested
    /// token (§4.11's nested-JWT recursion keys off this field).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cty: Option<String>,

    /// Identifies the key used, for key lookup by a key provider.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// URI referring to a JWK Set containing the encryption key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jku: Option<String>,

    /// The encryption key itself, embedded as a JWK.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jwk: Option<Jwk>,

    /// URI referring to an X.509 public key certificate or chain.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5u: Option<String>,

    /// X.509 certificate chain, standard (padded) base64.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5c: Option<Vec<B64Bytes<Box<[u8]>, jose_core_b64::base64ct::Base64>>>,

    /// SHA-1 thumbprint of the X.509 certificate.
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t", default)]
    pub x5t: Option<B64Bytes<[u8; 20]>>,

    /// SHA-256 thumbprint of the X.509 certificate.
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t#S256", default)]
    pub x5t_s256: Option<B64Bytes<[u8; 32]>>,

    /// Extension header parameter names the recipient MUST understand.
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub crit: BTreeSet<String>,

    /// ECDH-ES ephemeral public key (producer side of agreement).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub epk: Option<EphemeralPublicKey>,

    /// Agreement PartyUInfo, base64url (ECDH-ES Concat KDF input).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub apu: Option<B64Bytes>,

    /// Agreement PartyVInfo, base64url (ECDH-ES Concat KDF input).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub apv: Option<B64Bytes>,

    /// Any header member this model does not name explicitly — this is
    /// also where the AES-GCM-KW `iv`/`tag` header parameters and PBES2's
    /// `p2s`/`p2c` land, since this registry does not implement PBES2
    /// key derivation (not in the closed `KeyManagementAlgorithm` set).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JweHeader {
    /// A header carrying `alg` and `enc`, the common case for emitting a
    /// token.
    pub fn new(alg: KeyManagementAlgorithm, enc: EncryptionAlgorithm) -> Self {
        Self {
            alg: Some(alg),
            enc: Some(enc),
            ..Self::default()
        }
    }

    /// Builder-style setter for `cty` (used to mark a nested JWS payload).
    pub fn with_cty(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }

    /// Builder-style setter for `kid`.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Builder-style setter for `zip`.
    pub fn with_zip(mut self, zip: CompressionAlgorithm) -> Self {
        self.zip = Some(zip);
        self
    }

    /// Read back the AES-GCM-KW `iv`/`tag` header parameters, if present.
    /// Both are base64url JSON strings per RFC 7518 §4.7.1.1-2.
    pub fn gcm_kw_iv_tag(&self) -> Option<(Vec<u8>, Vec<u8>)> {
        let iv = self.extra.get("iv")?.as_str()?;
        let tag = self.extra.get("tag")?.as_str()?;
        Some((jose_core_b64::decode(iv).ok()?, jose_core_b64::decode(tag).ok()?))
    }

    /// Set the AES-GCM-KW `iv`/`tag` header parameters.
    pub fn set_gcm_kw_iv_tag(&mut self, iv: &[u8], tag: &[u8]) {
        self.extra.insert("iv".into(), jose_core_b64::encode(iv).into());
        self.extra.insert("tag".into(), jose_core_b64::encode(tag).into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_header_serializes_alg_and_enc() {
        let header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm);
        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(value, serde_json::json!({"alg": "dir", "enc": "A256GCM"}));
    }

    #[test]
    fn gcm_kw_iv_tag_round_trips_through_extra() {
        let mut header = JweHeader::new(KeyManagementAlgorithm::Aes128GcmKw, EncryptionAlgorithm::Aes128Gcm);
        header.set_gcm_kw_iv_tag(&[1u8; 12], &[2u8; 16]);
        let (iv, tag) = header.gcm_kw_iv_tag().unwrap();
        assert_eq!(iv, vec![1u8; 12]);
        assert_eq!(tag, vec![2u8; 16]);
    }

    #[test]
    fn nested_jwt_sets_cty() {
        let header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes128CbcHs256)
            .with_cty("JWT");
        assert_eq!(header.cty.as_deref(), Some("JWT"));
    }
}
