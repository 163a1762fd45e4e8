//! Writer-side descriptors (§4.12): closed variants describing what to
//! produce, so the writer pipeline dispatches on a concrete shape instead
//! of a polymorphic builder — mirrors the closed-enum discipline §9 asks
//! of the algorithm registries, applied to the write side too.

use jose_core_jwe::JweHeader;
use jose_core_jwk::Jwk;
use jose_core_jws::JwsHeader;

use crate::payload::JwtPayload;

/// Describes a JWS to emit: header, claims, and the key to sign with.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct JwsDescriptor {
    /// The header to serialize (its `alg` selects the signing algorithm).
    pub header: JwsHeader,
    /// The claims set to serialize as the payload.
    pub payload: JwtPayload,
    /// The key to sign with.
    pub signing_key: Jwk,
}

impl JwsDescriptor {
    /// Build a descriptor from its three parts.
    pub fn new(header: JwsHeader, payload: JwtPayload, signing_key: Jwk) -> Self {
        Self {
            header,
            payload,
            signing_key,
        }
    }
}

/// The inner content a [`JweDescriptor`] wraps, per §4.12's `innerPayload
/// (binary | text | JwsDescriptor)`.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum JweInnerPayload {
    /// Opaque bytes, encrypted as-is.
    Binary(Vec<u8>),
    /// UTF-8 text, encrypted as-is.
    Text(String),
    /// A nested JWS: signed first, and the resulting compact JWS string is
    /// encrypted as this JWE's plaintext. The writer sets `cty: "JWT"` on
    /// the outer header if the caller left it unset (RFC 7519 §5.2).
    Jws(JwsDescriptor),
}

/// Describes a JWE to emit, with any of the three inner-payload shapes.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct JweDescriptor {
    /// The header to serialize (its `alg`/`enc` select the key-management
    /// and content-encryption algorithms).
    pub header: JweHeader,
    /// What to encrypt.
    pub inner_payload: JweInnerPayload,
    /// The key used to establish the CEK (directly for `dir`, to wrap a
    /// freshly generated CEK for `A*KW`/RSA variants, or to agree on one
    /// for `ECDH-ES`).
    pub encryption_key: Jwk,
}

impl JweDescriptor {
    /// Build a descriptor from its three parts.
    pub fn new(header: JweHeader, inner_payload: JweInnerPayload, encryption_key: Jwk) -> Self {
        Self {
            header,
            inner_payload,
            encryption_key,
        }
    }
}

/// A JWE whose plaintext is UTF-8 text rather than a JSON claims set.
/// Equivalent to a [`JweDescriptor`] with [`JweInnerPayload::Text`], named
/// separately per §4.12's closed descriptor set for the common case of
/// encrypting a pre-serialized string (e.g. a nested compact token a
/// caller built some other way).
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct PlaintextJweDescriptor {
    /// The header to serialize.
    pub header: JweHeader,
    /// The text to encrypt.
    pub plaintext: String,
    /// The key used to establish the CEK.
    pub encryption_key: Jwk,
}

impl PlaintextJweDescriptor {
    /// Build a descriptor from its three parts.
    pub fn new(header: JweHeader, plaintext: impl Into<String>, encryption_key: Jwk) -> Self {
        Self {
            header,
            plaintext: plaintext.into(),
            encryption_key,
        }
    }
}

/// A JWE whose plaintext is opaque binary data. Equivalent to a
/// [`JweDescriptor`] with [`JweInnerPayload::Binary`], named separately for
/// the common case of encrypting caller-supplied bytes that carry no JOSE
/// structure at all.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct BinaryJweDescriptor {
    /// The header to serialize.
    pub header: JweHeader,
    /// The bytes to encrypt.
    pub plaintext: Vec<u8>,
    /// The key used to establish the CEK.
    pub encryption_key: Jwk,
}

impl BinaryJweDescriptor {
    /// Build a descriptor from its three parts.
    pub fn new(header: JweHeader, plaintext: Vec<u8>, encryption_key: Jwk) -> Self {
        Self {
            header,
            plaintext,
            encryption_key,
        }
    }
}

/// The closed set of things the writer pipeline can emit (§4.12).
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Descriptor {
    /// Emit a compact JWS.
    Jws(JwsDescriptor),
    /// Emit a compact JWE, any inner-payload shape.
    Jwe(JweDescriptor),
    /// Emit a compact JWE wrapping UTF-8 text.
    PlaintextJwe(PlaintextJweDescriptor),
    /// Emit a compact JWE wrapping opaque binary data.
    BinaryJwe(BinaryJweDescriptor),
}

impl From<JwsDescriptor> for Descriptor {
    fn from(d: JwsDescriptor) -> Self {
        Descriptor::Jws(d)
    }
}

impl From<JweDescriptor> for Descriptor {
    fn from(d: JweDescriptor) -> Self {
        Descriptor::Jwe(d)
    }
}

impl From<PlaintextJweDescriptor> for Descriptor {
    fn from(d: PlaintextJweDescriptor) -> Self {
        Descriptor::PlaintextJwe(d)
    }
}

impl From<BinaryJweDescriptor> for Descriptor {
    fn from(d: BinaryJweDescriptor) -> Self {
        Descriptor::BinaryJwe(d)
    }
}
