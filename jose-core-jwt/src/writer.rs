//! Writer pipeline (§4.12):
//!
//! ```text
//! Descriptor -> serialize header JSON -> base64-encode
//!            -> serialize/compress payload
//!            -> (JWS: sign concatenation) | (JWE: wrap CEK, encrypt
//!               payload with nonce, produce tag)
//!            -> concatenate with '.' separators -> caller's buffer
//! ```
//!
//! This crate's job is only the dispatch and the nested-JWS-in-JWE
//! assembly step; header/payload encoding, CEK wrap, compression, and AEAD
//! sizing all live in `jose-core-jws`/`jose-core-jwe`, which already
//! allocate their output buffer once from precomputed segment lengths.

use crate::descriptors::{Descriptor, JweDescriptor, JweInnerPayload, JwsDescriptor};
use crate::error::TokenGenerationError;

/// Run the write pipeline over `descriptor`, producing the compact-form
/// token.
pub fn write_token(descriptor: impl Into<Descriptor>) -> Result<String, TokenGenerationError> {
    match descriptor.into() {
        Descriptor::Jws(d) => write_jws(&d),
        Descriptor::Jwe(d) => write_jwe(d),
        Descriptor::PlaintextJwe(d) => jose_core_jwe::write(d.header, d.plaintext.as_bytes(), &d.encryption_key)
            .map_err(TokenGenerationError::Jwe),
        Descriptor::BinaryJwe(d) => {
            jose_core_jwe::write(d.header, &d.plaintext, &d.encryption_key).map_err(TokenGenerationError::Jwe)
        }
    }
}

fn write_jws(d: &JwsDescriptor) -> Result<String, TokenGenerationError> {
    let payload_json = serde_json::to_vec(&d.payload).map_err(|_| TokenGenerationError::Serialization)?;
    jose_core_jws::write(&d.header, &payload_json, &d.signing_key).map_err(TokenGenerationError::Jws)
}

fn write_jwe(d: JweDescriptor) -> Result<String, TokenGenerationError> {
    let JweDescriptor {
        mut header,
        inner_payload,
        encryption_key,
    } = d;

    let plaintext = match inner_payload {
        JweInnerPayload::Binary(bytes) => bytes,
        JweInnerPayload::Text(text) => text.into_bytes(),
        JweInnerPayload::Jws(nested) => {
            if header.cty.is_none() {
                header = header.with_cty("JWT");
            }
            write_jws(&nested)?.into_bytes()
        }
    };

    jose_core_jwe::write(header, &plaintext, &encryption_key).map_err(TokenGenerationError::Jwe)
}
