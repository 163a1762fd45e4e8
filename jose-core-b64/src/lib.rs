//! Base64url codec, base64url-encoded serde newtypes, and the compact-form
//! tokenizer (RFC 7515 §2, RFC 7518 Appendix C).
//!
//! This is the lowest layer of the workspace: it knows nothing about JOSE
//! headers or claims, only about the URL-safe unpadded alphabet and the
//! `'.'`-delimited wire shape every compact token shares.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

extern crate alloc;

pub mod tokenizer;

#[cfg(feature = "serde")]
mod bytes;
#[cfg(feature = "json")]
mod json;

use alloc::string::String;
use alloc::vec::Vec;
use base64ct::{Base64UrlUnpadded, Encoding};
use core::fmt;

#[cfg(feature = "serde")]
pub use bytes::B64Bytes;
#[cfg(feature = "json")]
pub use json::Json;

#[cfg(feature = "secret")]
mod secret;
#[cfg(feature = "secret")]
pub use secret::B64Secret;

pub use base64ct;

/// Errors produced by the base64url codec.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base64Error {
    /// Input contained a byte outside the base64url alphabet, non-zero
    /// trailing bits, or an otherwise malformed encoding.
    Malformed,
}

impl fmt::Display for Base64Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed base64url input")
    }
}

impl From<base64ct::Error> for Base64Error {
    fn from(_: base64ct::Error) -> Self {
        Base64Error::Malformed
    }
}

/// `encodedLen = ceil(4n/3)`, the exact size of the unpadded base64url
/// encoding of `n` input bytes.
pub const fn encoded_len(n: usize) -> usize {
    (n * 4 + 2) / 3
}

/// `decodedLen = floor(n*3/4) - padCount(n)`: the exact size of the decoded
/// output for a base64url string of length `n` with no padding characters.
/// Returns `None` if `n` encodes an invalid residue (a dangling 1-character
/// final group, which can never be valid base64).
pub const fn decoded_len(n: usize) -> Option<usize> {
    match n % 4 {
        0 => Some((n / 4) * 3),
        1 => None,
        r => Some((n / 4) * 3 + (r - 1)),
    }
}

/// Encode `input` into the URL-safe, unpadded base64 alphabet.
pub fn encode(input: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(input)
}

/// Decode a base64url string into a freshly allocated buffer.
///
/// Fails with [`Base64Error::Malformed`] if any byte lies outside the
/// alphabet or trailing bits are non-zero.
pub fn decode(input: &str) -> Result<Vec<u8>, Base64Error> {
    let expected = decoded_len(input.len()).ok_or(Base64Error::Malformed)?;
    let mut out = alloc::vec![0u8; expected];
    let n = decode_into(input, &mut out)?;
    out.truncate(n);
    Ok(out)
}

/// Decode a base64url string into a caller-provided buffer of at least
/// [`decoded_len`] bytes, returning the number of bytes written.
pub fn decode_into(input: &str, out: &mut [u8]) -> Result<usize, Base64Error> {
    let written = Base64UrlUnpadded::decode(input, out)
        .map_err(|_| Base64Error::Malformed)?
        .len();
    Ok(written)
}
