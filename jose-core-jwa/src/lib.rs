//! Closed JOSE algorithm registries (RFC 7518) with their static attributes.
//!
//! Every enum here is `#[non_exhaustive]`: new algorithm identifiers are
//! the kind of addition that should come from this crate, never from a
//! caller matching exhaustively against these variants. Extension is done
//! by adding a variant here, not by modeling algorithms as trait objects.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

mod compression;
mod ec_curve;
mod encryption;
mod hash;
mod key_management;
mod key_type;
mod signing;

pub use compression::CompressionAlgorithm;
pub use ec_curve::EcCurve;
pub use encryption::EncryptionAlgorithm;
pub use hash::HashAlgorithm;
pub use key_management::{KeyManagementAlgorithm, KeyWrapKind};
pub use key_type::KeyType;
pub use signing::{KeyCategory, SignatureAlgorithm};
