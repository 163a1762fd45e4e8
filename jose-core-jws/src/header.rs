//! JWS header (§4.9, RFC 7515 §4): the decoded first segment of a compact
//! token.

use std::collections::BTreeSet;

use jose_core_b64::B64Bytes;
use jose_core_jwa::SignatureAlgorithm;
use jose_core_jwk::Jwk;
use serde::{Deserialize, Serialize};

/// The JWS header, decoded from the token's first compact segment.
///
/// `enc` is included here (rather than only on the JWE side) because it is
/// the discriminator the reader pipeline uses to decide whether a 5-segment
/// token is a JWE at all — see the invariant in §3's `JwtHeader` type.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signature or MAC algorithm. Required by RFC 7515, but represented as
    /// `Option` here so an unsigned/malformed header can still be parsed
    /// and reported through the validation pipeline rather than failing at
    /// the serde layer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<SignatureAlgorithm>,

    /// Declares the media type of the complete JWS (e.g. `"JWT"`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub typ: Option<String>,

    /// Declares the media type of the payload (used for nested tokens: a
    /// JWE wrapping a JWS sets the outer `cty` to `"JWT"`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cty: Option<String>,

    /// Identifies the key used, for key lookup by a key provider.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// URI referring to a JWK Set containing the signing key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jku: Option<String>,

    /// The signing key itself, embedded as a JWK.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jwk: Option<Jwk>,

    /// URI referring to an X.509 public key certificate or chain.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5u: Option<String>,

    /// X.509 certificate chain, standard (padded) base64.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5c: Option<Vec<B64Bytes<Box<[u8]>, jose_core_b64::base64ct::Base64>>>,

    /// SHA-1 thumbprint of the X.509 certificate used to sign.
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t", default)]
    pub x5t: Option<B64Bytes<[u8; 20]>>,

    /// SHA-256 thumbprint of the X.509 certificate used to sign.
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t#S256", default)]
    pub x5t_s256: Option<B64Bytes<[u8; 32]>>,

    /// Extension header parameter names the recipient MUST understand and
    /// process before accepting the token (RFC 7515 §4.1.11). This crate
    /// preserves the set but does not itself reject unrecognized members —
    /// see `jose-core-jwt`'s `RequireUnderstoodCritical` validator for that.
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub crit: BTreeSet<String>,

    /// Any header member this model does not name explicitly (forward
    /// compatibility with registry growth, and a home for application- or
    /// deployment-specific members a `crit` entry might reference).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JwsHeader {
    /// A header carrying only `alg`, the common case for emitting a token.
    pub fn new(alg: SignatureAlgorithm) -> Self {
        Self {
            alg: Some(alg),
            ..Self::default()
        }
    }

    /// Builder-style setter for `typ`.
    pub fn with_typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    /// Builder-style setter for `cty`.
    pub fn with_cty(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }

    /// Builder-style setter for `kid`.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_header_serializes_to_just_alg() {
        let header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(value, serde_json::json!({"alg": "HS256"}));
    }

    #[test]
    fn builder_methods_set_optional_fields() {
        let header = JwsHeader::new(SignatureAlgorithm::Es256).with_typ("JWT").with_kid("key-1");
        assert_eq!(header.typ.as_deref(), Some("JWT"));
        assert_eq!(header.kid.as_deref(), Some("key-1"));
    }

    #[test]
    fn unknown_members_round_trip_via_extra() {
        let json = r#"{"alg":"HS256","x-custom":42}"#;
        let header: JwsHeader = serde_json::from_str(json).unwrap();
        assert_eq!(header.extra.get("x-custom"), Some(&serde_json::json!(42)));
    }
}
