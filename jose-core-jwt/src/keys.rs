//! Key provider interface (§6) and the tie-break rule for selecting
//! candidate keys from it (§4.10).

use jose_core_jwe::JweHeader;
use jose_core_jwk::Jwk;
use jose_core_jws::JwsHeader;

/// External collaborator that supplies key material to the reader pipeline.
/// Both methods return synchronously (§5: "the core treats any delay as the
/// caller's responsibility") — a provider backed by an HTTP JWKS fetch is
/// expected to do its own caching/blocking outside this call.
pub trait KeyProvider: Send + Sync {
    /// Candidate keys for verifying a JWS with this header.
    fn signing_keys(&self, header: &JwsHeader) -> Vec<Jwk>;

    /// Candidate keys for decrypting a JWE with this header.
    fn encryption_keys(&self, header: &JweHeader) -> Vec<Jwk>;
}

/// A fixed set of keys, tried for both signing and encryption regardless of
/// header content. The common case: a single symmetric key, or a small set
/// of keys rotated by `kid`.
#[derive(Clone, Debug, Default)]
pub struct StaticKeys {
    keys: Vec<Jwk>,
}

impl StaticKeys {
    /// Wrap a single key.
    pub fn single(key: Jwk) -> Self {
        Self { keys: vec![key] }
    }

    /// Wrap a set of keys (e.g. a JWKS's `keys` member).
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }
}

impl KeyProvider for StaticKeys {
    fn signing_keys(&self, header: &JwsHeader) -> Vec<Jwk> {
        candidates(&self.keys, header.kid.as_deref())
    }

    fn encryption_keys(&self, header: &JweHeader) -> Vec<Jwk> {
        candidates(&self.keys, header.kid.as_deref())
    }
}

/// Apply the §4.10 tie-break rule: if the header names a `kid` and at least
/// one key matches it, only those keys are tried; otherwise every key is a
/// candidate, in the order the provider yielded them.
fn candidates(keys: &[Jwk], kid: Option<&str>) -> Vec<Jwk> {
    if let Some(kid) = kid {
        let by_kid: Vec<Jwk> = keys.iter().filter(|k| k.params.kid.as_deref() == Some(kid)).cloned().collect();
        if !by_kid.is_empty() {
            return by_kid;
        }
    }
    keys.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwa::SignatureAlgorithm;
    use jose_core_jwk::{Key, Oct};

    fn oct_jwk(kid: &str) -> Jwk {
        let mut jwk = Jwk::new(Key::Oct(Oct {
            k: B64Secret::new(vec![1u8; 32]),
        }));
        jwk.params.kid = Some(kid.into());
        jwk
    }

    #[test]
    fn kid_match_narrows_candidates() {
        let provider = StaticKeys::new(vec![oct_jwk("a"), oct_jwk("b")]);
        let header = JwsHeader::new(SignatureAlgorithm::Hs256).with_kid("b");
        let candidates = provider.signing_keys(&header);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].params.kid.as_deref(), Some("b"));
    }

    #[test]
    fn absent_kid_tries_every_key() {
        let provider = StaticKeys::new(vec![oct_jwk("a"), oct_jwk("b")]);
        let header = JwsHeader::new(SignatureAlgorithm::Hs256);
        assert_eq!(provider.signing_keys(&header).len(), 2);
    }

    #[test]
    fn unmatched_kid_falls_back_to_every_key() {
        let provider = StaticKeys::new(vec![oct_jwk("a")]);
        let header = JwsHeader::new(SignatureAlgorithm::Hs256).with_kid("missing");
        assert_eq!(provider.signing_keys(&header).len(), 1);
    }
}
