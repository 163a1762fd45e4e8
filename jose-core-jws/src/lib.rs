//! JSON Web Signature, compact serialization only (RFC 7515 §7.1).
//!
//! No JSON/General/Flat serialization is modeled — every JWS this crate
//! produces or consumes is the three-segment `header.payload.signature`
//! form.

#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![forbid(unsafe_code)]

pub mod compact;
pub mod engine;
pub mod header;
pub mod keys;

pub use compact::{parse, write, ReadError, UnverifiedJws, WriteError};
pub use engine::{HmacEngine, JwsCryptoError};
pub use header::JwsHeader;
