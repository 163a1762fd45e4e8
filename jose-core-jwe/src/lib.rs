//! JSON Web Encryption, compact serialization only (RFC 7516 §7.1).
//!
//! No JSON/General/Flat serialization is modeled — every JWE this crate
//! produces or consumes is the five-segment
//! `header.encrypted-key.iv.ciphertext.tag` form.

#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![forbid(unsafe_code)]

pub mod aead;
pub mod compact;
pub mod header;
pub mod keys;
pub mod keywrap;

pub use aead::ContentCryptoError;
pub use compact::{parse, write, ReadError, UnresolvedJwe, WriteError};
pub use header::{EphemeralPublicKey, JweHeader};
pub use keys::KeyResolutionError;
pub use keywrap::KeyWrapError;
