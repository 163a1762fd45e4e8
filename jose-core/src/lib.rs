//! `jose-core`: reads, validates, writes, and cryptographically protects
//! JSON Web Tokens in Compact Serialization form — both signed (JWS) and
//! encrypted (JWE) — per RFC 7515/7516/7517/7518/7519, with JOSE key
//! formats (JWK/JWKS) per RFC 7517.
//!
//! This crate is a facade: it re-exports the public surface of the
//! workspace's per-concern crates so a caller can depend on `jose-core`
//! alone. Each subsystem lives in its own crate, kept independently
//! buildable and testable:
//!
//! - [`jose_core_b64`] — base64url codec and the compact-form tokenizer.
//! - [`jose_core_jwa`] — closed algorithm registries
//!   ([`SignatureAlgorithm`], [`KeyManagementAlgorithm`],
//!   [`EncryptionAlgorithm`], [`CompressionAlgorithm`]).
//! - [`jose_core_jwk`] — the [`Jwk`]/`JwkSet` data model and RFC 7638
//!   thumbprints.
//! - [`jose_core_crypto`] — the cryptographic primitive layer (SHA-2,
//!   HMAC, AES/AES-KW, AES-CBC-HMAC, AES-GCM, RSA, ECDSA, ECDH-ES).
//! - [`jose_core_jws`] — JWS compact read/write and the signer/verifier
//!   engine.
//! - [`jose_core_jwe`] — JWE compact read/write and the key-wrap/unwrap
//!   engine.
//! - [`jose_core_jwt`] — the claims model, [`TokenValidationPolicy`], and
//!   the reader/writer pipelines most callers use directly: [`read_token`]
//!   and [`write_token`].
//!
//! # Example
//!
//! ```
//! use jose_core::{read_token, write_token, JwsDescriptor, JwsHeader, JwtPayload};
//! use jose_core::jwa::SignatureAlgorithm;
//! use jose_core::jwk::{Jwk, Key, Oct};
//! use jose_core::b64::B64Secret;
//!
//! let key = Jwk::new(Key::Oct(Oct { k: B64Secret::new(vec![0x42; 32]) }));
//! let payload = JwtPayload::new().with_iss("example");
//! let descriptor = JwsDescriptor::new(JwsHeader::new(SignatureAlgorithm::Hs256), payload, key.clone());
//!
//! let token = write_token(descriptor).unwrap();
//! let policy = jose_core::TokenValidationPolicy::builder().require_signature(key).build();
//! let jwt = read_token(&token, &policy).unwrap();
//! assert_eq!(jwt.claims().unwrap().iss.as_deref(), Some("example"));
//! ```

#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![forbid(unsafe_code)]

/// Base64url codec and compact-form tokenizer (§4.1, §4.8).
pub use jose_core_b64 as b64;
/// Cryptographic primitive layer (§4.2-§4.7).
pub use jose_core_crypto as crypto;
/// Closed JOSE algorithm registries (§3).
pub use jose_core_jwa as jwa;
/// JWE compact serialization and key-wrap engine (§4.12, RFC 7516).
pub use jose_core_jwe as jwe;
/// JWK / JWKS data model (RFC 7517).
pub use jose_core_jwk as jwk;
/// JWS compact serialization and signer/verifier engine (§4.12, RFC 7515).
pub use jose_core_jws as jws;

pub use jose_core_jwe::JweHeader;
pub use jose_core_jwk::{Jwk, JwkSet};
pub use jose_core_jws::JwsHeader;
pub use jose_core_jwt::{
    read_token, write_token, BinaryJweDescriptor, ClaimValidator, Descriptor, HeaderKind, JweDescriptor,
    JweInnerPayload, Jwt, JwtContents, JwtPayload, JwsDescriptor, KeyProvider, PlaintextJweDescriptor, StaticKeys,
    TokenGenerationError, TokenValidationError, TokenValidationPolicy, TokenValidationPolicyBuilder,
};
