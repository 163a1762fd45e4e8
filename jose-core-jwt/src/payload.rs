//! JWT claims set (§3's `JwtPayload`, RFC 7519 §4): the decoded payload of a
//! JWS, or the innermost plaintext of a JWE.

use serde::{Deserialize, Serialize};

/// The `aud` claim: either a single string or an array of strings
/// (RFC 7519 §4.1.3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience identifier.
    Single(String),
    /// Multiple audience identifiers.
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether `value` appears in this audience claim.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Audience::Single(s) => s == value,
            Audience::Multiple(values) => values.iter().any(|v| v == value),
        }
    }
}

/// The registered claims (RFC 7519 §4.1) plus whatever else the issuer put
/// in the claims set.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub iss: Option<String>,

    /// Subject.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sub: Option<String>,

    /// Audience (string or array of strings).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aud: Option<Audience>,

    /// Expiration time, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exp: Option<i64>,

    /// Not-before time, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nbf: Option<i64>,

    /// Issued-at time, seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub iat: Option<i64>,

    /// JWT ID.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jti: Option<String>,

    /// Any claim this model does not name explicitly (private/public
    /// claims, per RFC 7519 §4.2/§4.3).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JwtPayload {
    /// An empty claims set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for `iss`.
    pub fn with_iss(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Builder-style setter for `sub`.
    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Builder-style setter for a single-valued `aud`.
    pub fn with_aud(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(Audience::Single(aud.into()));
        self
    }

    /// Builder-style setter for `exp`.
    pub fn with_exp(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Builder-style setter for `nbf`.
    pub fn with_nbf(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Builder-style setter for `iat`.
    pub fn with_iat(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Builder-style setter for `jti`.
    pub fn with_jti(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aud_accepts_string_or_array() {
        let single: JwtPayload = serde_json::from_str(r#"{"aud":"a"}"#).unwrap();
        assert_eq!(single.aud, Some(Audience::Single("a".into())));

        let multiple: JwtPayload = serde_json::from_str(r#"{"aud":["a","b"]}"#).unwrap();
        assert_eq!(multiple.aud, Some(Audience::Multiple(vec!["a".into(), "b".into()])));
    }

    #[test]
    fn audience_contains_checks_both_shapes() {
        assert!(Audience::Single("a".into()).contains("a"));
        assert!(!Audience::Single("a".into()).contains("b"));
        assert!(Audience::Multiple(vec!["a".into(), "b".into()]).contains("b"));
    }

    #[test]
    fn unknown_claims_round_trip_via_extra() {
        let json = r#"{"iss":"x","custom-claim":42}"#;
        let payload: JwtPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.extra.get("custom-claim"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn builder_methods_set_registered_claims() {
        let payload = JwtPayload::new().with_iss("x").with_aud("y").with_exp(1516239022);
        assert_eq!(payload.iss.as_deref(), Some("x"));
        assert_eq!(payload.aud, Some(Audience::Single("y".into())));
        assert_eq!(payload.exp, Some(1516239022));
    }
}
