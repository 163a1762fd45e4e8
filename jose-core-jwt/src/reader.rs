//! Reader pipeline (§4.11):
//!
//! ```text
//! bytes -> Tokenizer -> base64-decode header -> parse header JSON
//!       -> policy.validateHeader
//!       -> (JWS: verify signature, decode payload, parse, validate claims)
//!        | (JWE: resolve/unwrap CEK, decrypt, decompress,
//!               recurse into reader for nested JWS)
//!       -> Result
//! ```
//!
//! Grounded on `alcoholic_jwt`'s single-pass `validate()` entry point,
//! generalized to the closed JWS/JWE dispatch and nested-token recursion
//! this spec's pipeline additionally requires.

use jose_core_b64::tokenizer::tokenize;
use jose_core_jwk::Jwk;

use crate::error::TokenValidationError;
use crate::header::{parse_header, HeaderKind};
use crate::payload::JwtPayload;
use crate::policy::TokenValidationPolicy;

/// How deep a JWE-of-JWS-of-JWE... chain may recurse before the reader
/// gives up rather than keep unwrapping (not named by the spec; a
/// defensive bound so a maliciously nested token cannot recurse the stack
/// arbitrarily deep, since each layer requires a successful decrypt no
/// attacker-controlled input alone can force past the candidate keys).
const MAX_NESTING_DEPTH: u32 = 8;

/// What a validated [`Jwt`] ultimately contains, once every JWE layer has
/// been unwrapped.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum JwtContents {
    /// A decoded claims set (the token was a JWS, or a JWE wrapping one).
    Claims(JwtPayload),
    /// A JWE's decrypted plaintext, itself a compact token that was
    /// recursively validated.
    Nested(Box<Jwt>),
    /// A JWE's decrypted plaintext that the policy chose not to interpret
    /// as a nested token (`ignore_nested_token`), or that did not parse as
    /// one while the policy carries no validation to be strict about.
    Opaque(Vec<u8>),
}

/// A validated token (§3): header, plus either decoded claims, a nested
/// token, or opaque plaintext, plus the key that verified or decrypted it.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct Jwt {
    /// This layer's header.
    pub header: HeaderKind,
    /// This layer's contents.
    pub contents: JwtContents,
    /// The key that verified (JWS) or decrypted (JWE) this layer, absent
    /// for the `none` algorithm.
    pub key: Option<Jwk>,
}

impl Jwt {
    /// The innermost claims set, unwrapping any nested JWE-of-JWS layers.
    /// `None` if the innermost content is opaque bytes.
    pub fn claims(&self) -> Option<&JwtPayload> {
        match &self.contents {
            JwtContents::Claims(payload) => Some(payload),
            JwtContents::Nested(inner) => inner.claims(),
            JwtContents::Opaque(_) => None,
        }
    }
}

/// Run the read pipeline over `token` under `policy`.
pub fn read_token(token: &str, policy: &TokenValidationPolicy) -> Result<Jwt, TokenValidationError> {
    read_token_at_depth(token, policy, 0)
}

fn read_token_at_depth(token: &str, policy: &TokenValidationPolicy, depth: u32) -> Result<Jwt, TokenValidationError> {
    let bytes = token.as_bytes();
    if bytes.is_empty() || bytes.len() > policy.max_size() {
        return Err(TokenValidationError::MalformedToken);
    }
    if depth >= MAX_NESTING_DEPTH {
        return Err(TokenValidationError::MalformedToken);
    }

    let segs = tokenize(bytes).map_err(|_| TokenValidationError::MalformedToken)?;
    let header_b64 = segs.as_slice()[0].str(token);
    let header = parse_header(header_b64, policy.header_cache())?;
    policy.validate_header(&header)?;

    match &header {
        HeaderKind::Jws(_) if segs.is_jws() => read_jws(token, header, policy),
        HeaderKind::Jwe(_) if segs.is_jwe() => read_jwe(token, header, policy, depth),
        // `enc` presence (the discriminator in `parse_header`) disagreeing
        // with the segment count the tokenizer saw is itself malformed.
        _ => Err(TokenValidationError::MalformedToken),
    }
}

fn read_jws(token: &str, header: HeaderKind, policy: &TokenValidationPolicy) -> Result<Jwt, TokenValidationError> {
    let jws_header = match &header {
        HeaderKind::Jws(h) => h,
        HeaderKind::Jwe(_) => unreachable!("caller already matched on HeaderKind::Jws"),
    };
    let unverified = jose_core_jws::parse(token).map_err(|_| TokenValidationError::MalformedToken)?;

    let candidates = policy.signing_keys(jws_header);
    if candidates.is_empty() {
        return Err(TokenValidationError::SigningKeyNotFound);
    }

    for key in &candidates {
        if let Ok(payload_bytes) = unverified.verify(key) {
            let payload: JwtPayload =
                serde_json::from_slice(&payload_bytes).map_err(|_| TokenValidationError::MalformedToken)?;
            policy.validate_claims(&payload)?;
            return Ok(Jwt {
                header,
                contents: JwtContents::Claims(payload),
                key: Some(key.clone()),
            });
        }
    }
    Err(TokenValidationError::SignatureValidationFailed)
}

fn read_jwe(token: &str, header: HeaderKind, policy: &TokenValidationPolicy, depth: u32) -> Result<Jwt, TokenValidationError> {
    let jwe_header = match &header {
        HeaderKind::Jwe(h) => h,
        HeaderKind::Jws(_) => unreachable!("caller already matched on HeaderKind::Jwe"),
    };
    if jwe_header.enc.is_none() {
        return Err(TokenValidationError::MissingEncryptionAlgorithm);
    }

    let unresolved = jose_core_jwe::parse(token).map_err(|_| TokenValidationError::MalformedToken)?;

    let candidates = policy.encryption_keys(jwe_header);
    if candidates.is_empty() {
        return Err(TokenValidationError::EncryptionKeyNotFound);
    }

    let mut plaintext = None;
    let mut used_key = None;
    let mut last_err = None;
    for key in &candidates {
        match unresolved.decrypt(key) {
            Ok(bytes) => {
                plaintext = Some(bytes);
                used_key = Some(key.clone());
                break;
            }
            Err(e) => last_err = Some(e),
        }
    }

    let plaintext = match plaintext {
        Some(p) => p,
        None => {
            return Err(match last_err {
                Some(jose_core_jwe::ReadError::Decompression) => TokenValidationError::DecompressionFailed,
                _ => TokenValidationError::DecryptionFailed,
            });
        }
    };

    if policy.ignore_nested_token() {
        return Ok(Jwt {
            header,
            contents: JwtContents::Opaque(plaintext),
            key: used_key,
        });
    }

    let nested = core::str::from_utf8(&plaintext)
        .ok()
        .and_then(|s| read_token_at_depth(s, policy, depth + 1).ok());

    match nested {
        Some(inner) => Ok(Jwt {
            header,
            contents: JwtContents::Nested(Box::new(inner)),
            key: used_key,
        }),
        None if !policy.has_validation() => Ok(Jwt {
            header,
            contents: JwtContents::Opaque(plaintext),
            key: used_key,
        }),
        None => Err(TokenValidationError::MalformedToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwa::{EncryptionAlgorithm, KeyManagementAlgorithm, SignatureAlgorithm};
    use jose_core_jwe::JweHeader;
    use jose_core_jwk::{Key, Oct};
    use jose_core_jws::JwsHeader;

    use crate::policy::TokenValidationPolicy;

    fn oct_jwk(bytes: Vec<u8>) -> Jwk {
        Jwk::new(Key::Oct(Oct { k: B64Secret::new(bytes) }))
    }

    // Scenario 1/2 (§8): HS256 round-trip and single-byte tamper rejection.
    #[test]
    fn hs256_round_trip_recovers_payload() {
        let key = oct_jwk(jose_core_b64::decode("GdaXeVyiJwKmz5LFhcbcng").unwrap());
        let header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let payload = JwtPayload::new().with_iss("x").with_iat(1516239022);
        let token = jose_core_jws::write(&header, &serde_json::to_vec(&payload).unwrap(), &key).unwrap();

        let policy = TokenValidationPolicy::builder().require_signature(key).build();
        let jwt = read_token(&token, &policy).unwrap();
        assert_eq!(jwt.claims(), Some(&payload));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let key = oct_jwk(vec![9u8; 32]);
        let header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let token = jose_core_jws::write(&header, br#"{"iss":"x"}"#, &key).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_payload = jose_core_b64::encode(br#"{"iss":"y"}"#);
        parts[1] = &tampered_payload;
        let tampered = parts.join(".");

        let policy = TokenValidationPolicy::builder().require_signature(key).build();
        assert_eq!(read_token(&tampered, &policy), Err(TokenValidationError::SignatureValidationFailed));
    }

    // Scenario 3: an unrecognized but structurally valid `alg` name is
    // reported as `InvalidHeader("alg")`, not `MalformedToken`.
    #[test]
    fn unknown_alg_is_invalid_header() {
        let header_b64 = jose_core_b64::encode(br#"{"alg":"HS999"}"#);
        let token = format!("{header_b64}.e30.");
        let policy = TokenValidationPolicy::builder().build();
        assert_eq!(
            read_token(&token, &policy),
            Err(TokenValidationError::InvalidHeader("alg".into()))
        );
    }

    #[test]
    fn no_key_provider_reports_signing_key_not_found() {
        let key = oct_jwk(vec![1u8; 32]);
        let header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let token = jose_core_jws::write(&header, b"{}", &key).unwrap();
        let policy = TokenValidationPolicy::builder().build();
        assert_eq!(read_token(&token, &policy), Err(TokenValidationError::SigningKeyNotFound));
    }

    // Scenario 4: JWE A128KW + A128CBC-HS256 round trip, and ciphertext tamper.
    #[test]
    fn a128kw_jwe_round_trips() {
        let key = oct_jwk(vec![0x11u8; 16]);
        let header = JweHeader::new(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256);
        let token = jose_core_jwe::write(header, br#"{"a":1}"#, &key).unwrap();

        let policy = TokenValidationPolicy::builder().with_key_provider(std::sync::Arc::new(crate::keys::StaticKeys::single(key))).build();
        let jwt = read_token(&token, &policy).unwrap();
        assert_eq!(jwt.contents, JwtContents::Opaque(br#"{"a":1}"#.to_vec()));
    }

    #[test]
    fn tampered_jwe_ciphertext_fails_decryption() {
        let key = oct_jwk(vec![0x22u8; 32]);
        let header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm);
        let token = jose_core_jwe::write(header, b"secret", &key).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_ct = jose_core_b64::encode(b"not-the-real-ciphertext!!!!");
        parts[3] = &tampered_ct;
        let tampered = parts.join(".");

        let policy = TokenValidationPolicy::builder().require_signature(key).build();
        assert_eq!(read_token(&tampered, &policy), Err(TokenValidationError::DecryptionFailed));
    }

    // Scenario 5: lifetime validation within and beyond clock skew.
    #[test]
    fn expired_token_is_rejected_beyond_skew() {
        let key = oct_jwk(vec![3u8; 32]);
        let header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let payload = JwtPayload::new().with_exp(now - 10);
        let token = jose_core_jws::write(&header, &serde_json::to_vec(&payload).unwrap(), &key).unwrap();

        let policy = TokenValidationPolicy::builder()
            .require_signature(key)
            .require_lifetime(0, true)
            .build();
        assert_eq!(read_token(&token, &policy), Err(TokenValidationError::PolicyViolation("exp".into())));
    }

    // Scenario 6: nested JWT (JWS-in-JWE), with and without `ignore_nested_token`.
    #[test]
    fn nested_jws_in_jwe_is_recursively_validated() {
        let signing_key = oct_jwk(vec![5u8; 32]);
        let jws_header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let payload = JwtPayload::new().with_sub("inner");
        let inner_jws = jose_core_jws::write(&jws_header, &serde_json::to_vec(&payload).unwrap(), &signing_key).unwrap();

        let enc_key = oct_jwk(vec![6u8; 32]);
        let jwe_header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm).with_cty("JWT");
        let token = jose_core_jwe::write(jwe_header, inner_jws.as_bytes(), &enc_key).unwrap();

        let policy = TokenValidationPolicy::builder()
            .with_key_provider(std::sync::Arc::new(crate::keys::StaticKeys::new(vec![signing_key, enc_key])))
            .build();
        let jwt = read_token(&token, &policy).unwrap();
        assert_eq!(jwt.claims(), Some(&payload));
        assert!(matches!(jwt.contents, JwtContents::Nested(_)));
    }

    #[test]
    fn ignore_nested_token_returns_raw_plaintext() {
        let signing_key = oct_jwk(vec![7u8; 32]);
        let jws_header = JwsHeader::new(SignatureAlgorithm::Hs256);
        let inner_jws = jose_core_jws::write(&jws_header, b"{}", &signing_key).unwrap();

        let enc_key = oct_jwk(vec![8u8; 32]);
        let jwe_header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm).with_cty("JWT");
        let token = jose_core_jwe::write(jwe_header, inner_jws.as_bytes(), &enc_key).unwrap();

        let policy = TokenValidationPolicy::builder()
            .with_key_provider(std::sync::Arc::new(crate::keys::StaticKeys::single(enc_key)))
            .ignore_nested_token(true)
            .build();
        let jwt = read_token(&token, &policy).unwrap();
        assert_eq!(jwt.contents, JwtContents::Opaque(inner_jws.into_bytes()));
    }

    #[test]
    fn oversized_token_is_rejected() {
        let policy = TokenValidationPolicy::builder().max_size(8).build();
        assert_eq!(
            read_token("aaaaaaaaaaaaaaaaaaaaaa.bbb.ccc", &policy),
            Err(TokenValidationError::MalformedToken)
        );
    }

    #[test]
    fn empty_token_is_rejected() {
        let policy = TokenValidationPolicy::builder().build();
        assert_eq!(read_token("", &policy), Err(TokenValidationError::MalformedToken));
    }
}
