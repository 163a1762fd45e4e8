//! Generic header peek (§3's `JwtHeader` invariant): decode the first
//! compact segment once, as plain JSON, to decide whether the token is a
//! JWS or a JWE header before committing to either crate's typed model.

use jose_core_b64::decode;
use jose_core_jwa::{KeyManagementAlgorithm, SignatureAlgorithm};
use jose_core_jwe::JweHeader;
use jose_core_jws::JwsHeader;
use jose_core_util::HeaderCache;

use crate::error::TokenValidationError;

/// Either shape a decoded header segment can take, discriminated by the
/// presence of `enc` (RFC 7516 is a superset of RFC 7515's header members).
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderKind {
    /// A JWS header (no `enc` member).
    Jws(JwsHeader),
    /// A JWE header (`enc` present).
    Jwe(JweHeader),
}

impl HeaderKind {
    /// The `alg` member, rendered as its registry name, for error reporting.
    pub fn alg_name(&self) -> Option<String> {
        match self {
            HeaderKind::Jws(h) => h.alg.map(|a| a.to_string()),
            HeaderKind::Jwe(h) => h.alg.map(|a| a.to_string()),
        }
    }

    /// The `crit` member.
    pub fn crit(&self) -> &std::collections::BTreeSet<String> {
        match self {
            HeaderKind::Jws(h) => &h.crit,
            HeaderKind::Jwe(h) => &h.crit,
        }
    }
}

/// Decode and parse the header segment, consulting `cache` first. A JSON
/// object with an `enc` member parses as a [`JweHeader`]; otherwise as a
/// [`JwsHeader`].
pub fn parse_header(header_b64: &str, cache: &HeaderCache<String, HeaderKind>) -> Result<HeaderKind, TokenValidationError> {
    if let Some(cached) = cache.get(&header_b64.to_string()) {
        return Ok(cached);
    }

    let raw = decode(header_b64).map_err(|_| TokenValidationError::MalformedToken)?;
    let value: serde_json::Value = serde_json::from_slice(&raw).map_err(|_| TokenValidationError::MalformedToken)?;

    let kind = if value.get("enc").is_some() {
        reject_unrecognized_alg::<KeyManagementAlgorithm>(&value)?;
        let header: JweHeader = serde_json::from_value(value).map_err(|_| TokenValidationError::MalformedToken)?;
        HeaderKind::Jwe(header)
    } else {
        reject_unrecognized_alg::<SignatureAlgorithm>(&value)?;
        let header: JwsHeader = serde_json::from_value(value).map_err(|_| TokenValidationError::MalformedToken)?;
        HeaderKind::Jws(header)
    };

    cache.put(header_b64.to_string(), kind.clone());
    Ok(kind)
}

/// A structurally valid `alg` (i.e. a JSON string) that does not name a
/// member of the closed registry `A` is `InvalidHeader("alg")` (§7), not
/// `MalformedToken` — §8 scenario 3 requires the two be distinguished. A
/// non-string `alg`, or no `alg` at all, is left for the typed struct
/// deserialize to classify as structurally malformed.
fn reject_unrecognized_alg<A: for<'de> serde::Deserialize<'de>>(
    value: &serde_json::Value,
) -> Result<(), TokenValidationError> {
    match value.get("alg") {
        Some(alg) if alg.is_string() && serde_json::from_value::<A>(alg.clone()).is_err() => {
            Err(TokenValidationError::InvalidHeader("alg".into()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::encode;

    fn cache() -> HeaderCache<String, HeaderKind> {
        HeaderCache::new(16)
    }

    #[test]
    fn enc_member_selects_jwe() {
        let header_b64 = encode(br#"{"alg":"dir","enc":"A256GCM"}"#);
        let kind = parse_header(&header_b64, &cache()).unwrap();
        assert!(matches!(kind, HeaderKind::Jwe(_)));
    }

    #[test]
    fn absent_enc_selects_jws() {
        let header_b64 = encode(br#"{"alg":"HS256"}"#);
        let kind = parse_header(&header_b64, &cache()).unwrap();
        assert!(matches!(kind, HeaderKind::Jws(_)));
    }

    #[test]
    fn repeated_header_hits_the_cache() {
        let header_b64 = encode(br#"{"alg":"HS256"}"#);
        let cache = cache();
        parse_header(&header_b64, &cache).unwrap();
        assert_eq!(cache.len(), 1);
        parse_header(&header_b64, &cache).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let header_b64 = encode(b"not json");
        assert_eq!(parse_header(&header_b64, &cache()), Err(TokenValidationError::MalformedToken));
    }

    // §8 scenario 3: an unrecognized but structurally valid `alg` name is
    // `InvalidHeader("alg")`, not `MalformedToken`.
    #[test]
    fn unknown_alg_is_invalid_header() {
        let header_b64 = encode(br#"{"alg":"HS999"}"#);
        assert_eq!(
            parse_header(&header_b64, &cache()),
            Err(TokenValidationError::InvalidHeader("alg".into()))
        );
    }

    #[test]
    fn unknown_jwe_alg_is_invalid_header() {
        let header_b64 = encode(br#"{"alg":"NOT-A-REAL-ALG","enc":"A256GCM"}"#);
        assert_eq!(
            parse_header(&header_b64, &cache()),
            Err(TokenValidationError::InvalidHeader("alg".into()))
        );
    }
}
