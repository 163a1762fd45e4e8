//! Error taxonomy for the reader and writer pipelines (§7).

use core::fmt;

/// Why a read pipeline run did not produce a validated token. Every variant
/// here is returned as a value; none of the crates this one composes unwind
/// on a classifiable parsing, cryptographic, or policy failure.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenValidationError {
    /// Structural or JSON error in the input.
    MalformedToken,
    /// A header value was unsupported or conflicted with another.
    InvalidHeader(String),
    /// The token was a JWE but its header had no `enc` member.
    MissingEncryptionAlgorithm,
    /// No key provided to the policy could decrypt the token.
    EncryptionKeyNotFound,
    /// No key provided to the policy could verify the token's signature.
    SigningKeyNotFound,
    /// Signature verification failed against every candidate key.
    SignatureValidationFailed,
    /// Key-wrap/unwrap or AEAD authentication failed.
    DecryptionFailed,
    /// The decrypted plaintext failed to decompress.
    DecompressionFailed,
    /// A claim failed a policy validator (`PolicyViolation(claim name)`).
    PolicyViolation(String),
    /// The header named an algorithm this build does not implement.
    Unsupported(String),
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValidationError::MalformedToken => f.write_str("malformed token"),
            TokenValidationError::InvalidHeader(name) => write!(f, "invalid header member `{name}`"),
            TokenValidationError::MissingEncryptionAlgorithm => f.write_str("JWE header has no `enc` member"),
            TokenValidationError::EncryptionKeyNotFound => f.write_str("no encryption key found"),
            TokenValidationError::SigningKeyNotFound => f.write_str("no signing key found"),
            TokenValidationError::SignatureValidationFailed => f.write_str("signature validation failed"),
            TokenValidationError::DecryptionFailed => f.write_str("decryption failed"),
            TokenValidationError::DecompressionFailed => f.write_str("decompression failed"),
            TokenValidationError::PolicyViolation(claim) => write!(f, "policy violation on claim `{claim}`"),
            TokenValidationError::Unsupported(alg) => write!(f, "unsupported algorithm `{alg}`"),
        }
    }
}

impl std::error::Error for TokenValidationError {}

/// Why a write pipeline run did not produce a compact token.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenGenerationError {
    /// The claims set or header failed to serialize as JSON.
    Serialization,
    /// The underlying JWS write failed.
    Jws(jose_core_jws::WriteError),
    /// The underlying JWE write failed.
    Jwe(jose_core_jwe::WriteError),
}

impl fmt::Display for TokenGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenGenerationError::Serialization => f.write_str("failed to serialize header or claims"),
            TokenGenerationError::Jws(e) => write!(f, "JWS generation failed: {e:?}"),
            TokenGenerationError::Jwe(e) => write!(f, "JWE generation failed: {e:?}"),
        }
    }
}

impl std::error::Error for TokenGenerationError {}
