//! Validation policy (§3's `TokenValidationPolicy`, §4.10): an immutable
//! composition of validators the reader pipeline applies to a header and,
//! once decoded, to a claims set.
//!
//! Validator shape is grounded on `alcoholic_jwt`'s `Validation` enum and
//! its registration-order `validate()` loop, generalized from that crate's
//! single RS256-only `Issuer`/`Audience`/`SubjectPresent` set to the full
//! set §4.10 names, plus the supplemented `RequireUnderstoodCritical`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jose_core_jwa::SignatureAlgorithm;
use jose_core_jwk::Jwk;
use jose_core_util::HeaderCache;

use crate::error::TokenValidationError;
use crate::header::HeaderKind;
use crate::keys::{KeyProvider, StaticKeys};
use crate::payload::JwtPayload;

/// Default maximum token size (§9 Open Question: 16 KiB, configurable).
pub const DEFAULT_MAX_SIZE: usize = 16 * 1024;

/// Default header-cache capacity (§4.11: "recommended 16").
pub const DEFAULT_HEADER_CACHE_CAPACITY: usize = 16;

/// A single claim or header validator. Validators run in registration
/// order; the signature/encryption key provider is logically part of
/// header validation, but is carried on [`TokenValidationPolicy`] directly
/// rather than as a variant, since unlike the others it produces key
/// candidates rather than a pass/fail verdict.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum ClaimValidator {
    /// `iss` must equal this exact value.
    RequireIssuer(String),
    /// `aud` must contain at least one of these values.
    RequireAudience(BTreeSet<String>),
    /// `exp`/`nbf` must hold within this clock-skew tolerance (seconds);
    /// `require_exp` additionally rejects a payload with no `exp` at all.
    RequireLifetime {
        /// Tolerance applied on both sides of `exp`/`nbf`.
        clock_skew_seconds: u64,
        /// Whether a missing `exp` claim is itself a violation.
        require_exp: bool,
    },
    /// This named claim must be present (registered or otherwise).
    RequireClaim(String),
    /// Every name in the header's `crit` set must appear in this
    /// understood-extensions set (supplemented; §9 Open Question leaves
    /// this opt-in rather than a default).
    RequireUnderstoodCritical(BTreeSet<String>),
}

/// An immutable, composed validation policy.
#[derive(Clone)]
pub struct TokenValidationPolicy {
    key_provider: Option<Arc<dyn KeyProvider>>,
    algorithm_set: Option<BTreeSet<SignatureAlgorithm>>,
    validators: Vec<ClaimValidator>,
    require_signature: bool,
    max_size: usize,
    ignore_nested_token: bool,
    header_cache: Arc<HeaderCache<String, HeaderKind>>,
}

impl TokenValidationPolicy {
    /// Start building a policy.
    pub fn builder() -> TokenValidationPolicyBuilder {
        TokenValidationPolicyBuilder::new()
    }

    /// The key candidates a reader should try for a JWS with this header.
    pub fn signing_keys(&self, header: &jose_core_jws::JwsHeader) -> Vec<Jwk> {
        self.key_provider.as_ref().map(|p| p.signing_keys(header)).unwrap_or_default()
    }

    /// The key candidates a reader should try for a JWE with this header.
    pub fn encryption_keys(&self, header: &jose_core_jwe::JweHeader) -> Vec<Jwk> {
        self.key_provider.as_ref().map(|p| p.encryption_keys(header)).unwrap_or_default()
    }

    /// Maximum accepted token size in bytes.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The header cache the reader pipeline consults before re-decoding a
    /// header segment it has already seen (§4.11).
    pub fn header_cache(&self) -> &HeaderCache<String, HeaderKind> {
        &self.header_cache
    }

    /// Whether a decrypted JWE payload should be returned as opaque bytes
    /// instead of being recursively read as a nested token.
    pub fn ignore_nested_token(&self) -> bool {
        self.ignore_nested_token
    }

    /// True once a claim validator or an explicit `RequireSignature` has
    /// been registered; used by the reader's nested-token fallback (§4.11:
    /// "if Malformed and `!policy.hasValidation`: return raw as opaque").
    ///
    /// Deliberately does *not* count a bare decryption key provider
    /// (`with_key_provider` alone): every JWE read needs an encryption-key
    /// provider regardless of whether the caller expects the plaintext to
    /// be a nested token, so counting it here would make the opaque
    /// fallback unreachable for JWE and reject a JWE that legitimately
    /// wraps non-token plaintext (§8 scenario 4).
    pub fn has_validation(&self) -> bool {
        self.require_signature || !self.validators.is_empty()
    }

    /// Apply every header-level check: `crit` understanding and, if an
    /// algorithm set was registered, that the JWS `alg` is a member.
    pub fn validate_header(&self, header: &HeaderKind) -> Result<(), TokenValidationError> {
        for validator in &self.validators {
            if let ClaimValidator::RequireUnderstoodCritical(understood) = validator {
                for name in header.crit() {
                    if !understood.contains(name) {
                        return Err(TokenValidationError::InvalidHeader("crit".into()));
                    }
                }
            }
        }

        if let (HeaderKind::Jws(jws_header), Some(allowed)) = (header, &self.algorithm_set) {
            if let Some(alg) = jws_header.alg {
                if !allowed.contains(&alg) {
                    return Err(TokenValidationError::Unsupported(alg.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Apply every claim validator to a decoded payload.
    pub fn validate_claims(&self, payload: &JwtPayload) -> Result<(), TokenValidationError> {
        let now = current_unix_time();
        for validator in &self.validators {
            match validator {
                ClaimValidator::RequireIssuer(iss) => {
                    if payload.iss.as_deref() != Some(iss.as_str()) {
                        return Err(TokenValidationError::PolicyViolation("iss".into()));
                    }
                }
                ClaimValidator::RequireAudience(allowed) => {
                    let matches = payload.aud.as_ref().is_some_and(|aud| allowed.iter().any(|a| aud.contains(a)));
                    if !matches {
                        return Err(TokenValidationError::PolicyViolation("aud".into()));
                    }
                }
                ClaimValidator::RequireLifetime { clock_skew_seconds, require_exp } => {
                    let skew = *clock_skew_seconds as i64;
                    match payload.exp {
                        Some(exp) if now > exp + skew => {
                            return Err(TokenValidationError::PolicyViolation("exp".into()));
                        }
                        None if *require_exp => {
                            return Err(TokenValidationError::PolicyViolation("exp".into()));
                        }
                        _ => {}
                    }
                    if let Some(nbf) = payload.nbf {
                        if now + skew < nbf {
                            return Err(TokenValidationError::PolicyViolation("nbf".into()));
                        }
                    }
                }
                ClaimValidator::RequireClaim(name) => {
                    if !claim_present(payload, name) {
                        return Err(TokenValidationError::PolicyViolation(name.clone()));
                    }
                }
                ClaimValidator::RequireUnderstoodCritical(_) => {}
            }
        }
        Ok(())
    }
}

fn claim_present(payload: &JwtPayload, name: &str) -> bool {
    match name {
        "iss" => payload.iss.is_some(),
        "sub" => payload.sub.is_some(),
        "aud" => payload.aud.is_some(),
        "exp" => payload.exp.is_some(),
        "nbf" => payload.nbf.is_some(),
        "iat" => payload.iat.is_some(),
        "jti" => payload.jti.is_some(),
        other => payload.extra.contains_key(other),
    }
}

fn current_unix_time() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Builder for [`TokenValidationPolicy`].
#[derive(Default)]
pub struct TokenValidationPolicyBuilder {
    key_provider: Option<Arc<dyn KeyProvider>>,
    algorithm_set: Option<BTreeSet<SignatureAlgorithm>>,
    validators: Vec<ClaimValidator>,
    require_signature: bool,
    max_size: Option<usize>,
    ignore_nested_token: bool,
    header_cache_capacity: Option<usize>,
}

impl TokenValidationPolicyBuilder {
    /// An empty builder: no key provider, no validators, default size cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// `RequireSignature(key)`: accept tokens signed or encrypted under
    /// exactly this key.
    pub fn require_signature(mut self, key: Jwk) -> Self {
        self.key_provider = Some(Arc::new(StaticKeys::single(key)));
        self.require_signature = true;
        self
    }

    /// `RequireSignature(keyProvider, algorithmSet)`: resolve candidate
    /// keys from `provider`, restricted to the JWS `alg` values in `algorithms`.
    pub fn require_signature_from(mut self, provider: Arc<dyn KeyProvider>, algorithms: BTreeSet<SignatureAlgorithm>) -> Self {
        self.key_provider = Some(provider);
        self.algorithm_set = Some(algorithms);
        self.require_signature = true;
        self
    }

    /// Use `provider` for both signing and encryption key candidates,
    /// without restricting the accepted algorithm set.
    pub fn with_key_provider(mut self, provider: Arc<dyn KeyProvider>) -> Self {
        self.key_provider = Some(provider);
        self
    }

    /// `RequireIssuer(string)`.
    pub fn require_issuer(mut self, iss: impl Into<String>) -> Self {
        self.validators.push(ClaimValidator::RequireIssuer(iss.into()));
        self
    }

    /// `RequireAudience(set)`.
    pub fn require_audience(mut self, aud: BTreeSet<String>) -> Self {
        self.validators.push(ClaimValidator::RequireAudience(aud));
        self
    }

    /// `RequireLifetime(clockSkewSeconds, requireExp)`.
    pub fn require_lifetime(mut self, clock_skew_seconds: u64, require_exp: bool) -> Self {
        self.validators.push(ClaimValidator::RequireLifetime { clock_skew_seconds, require_exp });
        self
    }

    /// `RequireClaim(name)`.
    pub fn require_claim(mut self, name: impl Into<String>) -> Self {
        self.validators.push(ClaimValidator::RequireClaim(name.into()));
        self
    }

    /// Opt in to rejecting headers whose `crit` set names an extension
    /// outside `understood`.
    pub fn require_understood_critical(mut self, understood: BTreeSet<String>) -> Self {
        self.validators.push(ClaimValidator::RequireUnderstoodCritical(understood));
        self
    }

    /// Override the default 16 KiB maximum token size.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Override the default header-cache capacity (16 entries).
    pub fn header_cache_capacity(mut self, capacity: usize) -> Self {
        self.header_cache_capacity = Some(capacity);
        self
    }

    /// Return a decrypted JWE's plaintext as opaque bytes instead of
    /// recursively reading it as a nested token.
    pub fn ignore_nested_token(mut self, ignore: bool) -> Self {
        self.ignore_nested_token = ignore;
        self
    }

    /// Finish composing the policy.
    pub fn build(self) -> TokenValidationPolicy {
        TokenValidationPolicy {
            key_provider: self.key_provider,
            algorithm_set: self.algorithm_set,
            validators: self.validators,
            require_signature: self.require_signature,
            max_size: self.max_size.unwrap_or(DEFAULT_MAX_SIZE),
            ignore_nested_token: self.ignore_nested_token,
            header_cache: Arc::new(HeaderCache::new(
                self.header_cache_capacity.unwrap_or(DEFAULT_HEADER_CACHE_CAPACITY),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwk::{Key, Oct};

    fn oct_jwk() -> Jwk {
        Jwk::new(Key::Oct(Oct { k: B64Secret::new(vec![9u8; 32]) }))
    }

    #[test]
    fn default_max_size_is_16_kib() {
        let policy = TokenValidationPolicy::builder().build();
        assert_eq!(policy.max_size(), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn require_issuer_rejects_mismatch() {
        let policy = TokenValidationPolicy::builder().require_issuer("trusted").build();
        let payload = JwtPayload::new().with_iss("untrusted");
        assert_eq!(
            policy.validate_claims(&payload),
            Err(TokenValidationError::PolicyViolation("iss".into()))
        );
    }

    #[test]
    fn require_lifetime_allows_skew() {
        let policy = TokenValidationPolicy::builder().require_lifetime(5, true).build();
        let now = current_unix_time();
        let payload = JwtPayload::new().with_exp(now - 3);
        assert_eq!(policy.validate_claims(&payload), Ok(()));
    }

    #[test]
    fn require_lifetime_rejects_expired_beyond_skew() {
        let policy = TokenValidationPolicy::builder().require_lifetime(0, true).build();
        let now = current_unix_time();
        let payload = JwtPayload::new().with_exp(now - 1);
        assert_eq!(
            policy.validate_claims(&payload),
            Err(TokenValidationError::PolicyViolation("exp".into()))
        );
    }

    #[test]
    fn require_signature_supplies_a_single_candidate() {
        let jwk = oct_jwk();
        let policy = TokenValidationPolicy::builder().require_signature(jwk.clone()).build();
        let header = jose_core_jws::JwsHeader::new(SignatureAlgorithm::Hs256);
        assert_eq!(policy.signing_keys(&header), vec![jwk]);
    }

    #[test]
    fn unknown_critical_extension_is_rejected_when_opted_in() {
        let policy = TokenValidationPolicy::builder()
            .require_understood_critical(BTreeSet::from(["b64".to_string()]))
            .build();
        let mut header = jose_core_jws::JwsHeader::new(SignatureAlgorithm::Hs256);
        header.crit = BTreeSet::from(["unknown-ext".to_string()]);
        assert_eq!(
            policy.validate_header(&HeaderKind::Jws(header)),
            Err(TokenValidationError::InvalidHeader("crit".into()))
        );
    }
}
