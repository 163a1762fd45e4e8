//! JWE compact serialization (§4.12, RFC 7516 §7.1):
//! `BASE64URL(header) '.' BASE64URL(encrypted-key) '.' BASE64URL(iv) '.'
//! BASE64URL(ciphertext) '.' BASE64URL(tag)`.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use jose_core_b64::tokenizer::{tokenize, MalformedToken};
use jose_core_b64::{decode, Json};
use jose_core_jwa::CompressionAlgorithm;
use jose_core_jwk::Jwk;

use crate::aead::{self, ContentCryptoError};
use crate::header::JweHeader;
use crate::keywrap::{self, KeyWrapError};

/// A parsed JWE: the header is decoded and the CEK has not yet been
/// resolved or used to decrypt the ciphertext.
pub struct UnresolvedJwe {
    header: JweHeader,
    header_b64: String,
    encrypted_key: Vec<u8>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
}

impl UnresolvedJwe {
    /// The decoded header.
    pub fn header(&self) -> &JweHeader {
        &self.header
    }

    /// Resolve the CEK from `jwk` per the header's `alg`, decrypt, and
    /// decompress if `zip` is present.
    pub fn decrypt(&self, jwk: &Jwk) -> Result<Vec<u8>, ReadError> {
        let alg = self.header.alg.ok_or(ReadError::MissingAlgorithm)?;
        let enc = self.header.enc.ok_or(ReadError::MissingEncryption)?;
        let cek = keywrap::unwrap(alg, enc, jwk, &self.header, &self.encrypted_key)?;
        let plaintext = aead::decrypt(enc, &cek, &self.iv, self.header_b64.as_bytes(), &self.ciphertext, &self.tag)?;
        match self.header.zip {
            Some(CompressionAlgorithm::Deflate) => inflate(&plaintext).map_err(|_| ReadError::Decompression),
            None => Ok(plaintext),
        }
    }
}

/// Failures reading a compact JWE.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// Not a well-formed 5-segment compact token, or a segment failed to
    /// base64url-decode.
    Malformed,
    /// The header's JSON did not parse as a [`JweHeader`].
    InvalidHeader,
    /// The header had no `alg` member.
    MissingAlgorithm,
    /// The header had no `enc` member.
    MissingEncryption,
    /// Key resolution or CEK unwrap failed.
    KeyWrap(KeyWrapError),
    /// Content decryption or authentication failed.
    Decryption(ContentCryptoError),
    /// The plaintext failed to DEFLATE-decompress.
    Decompression,
}

impl From<MalformedToken> for ReadError {
    fn from(_: MalformedToken) -> Self {
        ReadError::Malformed
    }
}

impl From<KeyWrapError> for ReadError {
    fn from(e: KeyWrapError) -> Self {
        ReadError::KeyWrap(e)
    }
}

impl From<ContentCryptoError> for ReadError {
    fn from(e: ContentCryptoError) -> Self {
        ReadError::Decryption(e)
    }
}

/// Tokenize and parse `token` (without resolving a key or decrypting yet).
pub fn parse(token: &str) -> Result<UnresolvedJwe, ReadError> {
    let bytes = token.as_bytes();
    let segs = tokenize(bytes)?;
    if !segs.is_jwe() {
        return Err(ReadError::Malformed);
    }
    let parts = segs.as_slice();
    let header_b64 = parts[0].str(token).to_string();
    let encrypted_key = decode(parts[1].str(token)).map_err(|_| ReadError::Malformed)?;
    let iv = decode(parts[2].str(token)).map_err(|_| ReadError::Malformed)?;
    let ciphertext = decode(parts[3].str(token)).map_err(|_| ReadError::Malformed)?;
    let tag = decode(parts[4].str(token)).map_err(|_| ReadError::Malformed)?;

    let header: JweHeader = Json::from_encoded(&header_b64).map_err(|_| ReadError::InvalidHeader)?.into_value();

    Ok(UnresolvedJwe {
        header,
        header_b64,
        encrypted_key,
        iv,
        ciphertext,
        tag,
    })
}

/// Errors writing a compact JWE.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteError {
    /// The header failed to serialize as JSON.
    HeaderSerialization,
    /// Key wrap failed.
    KeyWrap(KeyWrapError),
    /// Content encryption failed.
    Encryption(ContentCryptoError),
}

impl From<KeyWrapError> for WriteError {
    fn from(e: KeyWrapError) -> Self {
        WriteError::KeyWrap(e)
    }
}

impl From<ContentCryptoError> for WriteError {
    fn from(e: ContentCryptoError) -> Self {
        WriteError::Encryption(e)
    }
}

/// Resolve/establish a CEK for `header`'s `alg`/`enc`, compress `plaintext`
/// if `header.zip` requests it, encrypt, and produce the compact output.
///
/// `header` is taken by value and may be mutated (e.g. `epk`, AES-GCM-KW's
/// `iv`/`tag`) before it is serialized, since those parameters must be
/// integrity-protected by the AEAD's AAD.
pub fn write(mut header: JweHeader, plaintext: &[u8], jwk: &Jwk) -> Result<String, WriteError> {
    let alg = header.alg.ok_or(WriteError::HeaderSerialization)?;
    let enc = header.enc.ok_or(WriteError::HeaderSerialization)?;

    let (cek, encrypted_key) = keywrap::wrap(alg, enc, jwk, &mut header)?;

    let content = match header.zip {
        Some(CompressionAlgorithm::Deflate) => deflate(plaintext),
        None => plaintext.to_vec(),
    };

    let header_json = Json::new(&header).map_err(|_| WriteError::HeaderSerialization)?;
    let iv = aead::generate_iv(enc);
    let (ciphertext, tag) = aead::encrypt(enc, &cek, &iv, header_json.as_ref(), &content)?;

    Ok(format!(
        "{}.{}.{}.{}.{}",
        header_json.encoded(),
        jose_core_b64::encode(&encrypted_key),
        jose_core_b64::encode(&iv),
        jose_core_b64::encode(&ciphertext),
        jose_core_b64::encode(&tag),
    ))
}

fn deflate(input: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input).expect("writing to an in-memory buffer cannot fail");
    encoder.finish().expect("writing to an in-memory buffer cannot fail")
}

fn inflate(input: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(input);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwa::{EncryptionAlgorithm, KeyManagementAlgorithm};
    use jose_core_jwk::{Key, Oct};

    fn oct_jwk(bytes: Vec<u8>) -> Jwk {
        Jwk::new(Key::Oct(Oct { k: B64Secret::new(bytes) }))
    }

    #[test]
    fn dir_a256gcm_round_trips() {
        let jwk = oct_jwk(vec![0x42u8; 32]);
        let header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm);
        let token = write(header, b"the true sign and seal of office", &jwk).unwrap();
        assert_eq!(token.matches('.').count(), 4);

        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.header().alg, Some(KeyManagementAlgorithm::Dir));
        let recovered = parsed.decrypt(&jwk).unwrap();
        assert_eq!(recovered, b"the true sign and seal of office".to_vec());
    }

    #[test]
    fn a128kw_a128cbc_hs256_round_trips_with_compression() {
        let jwk = oct_jwk(vec![0x11u8; 16]);
        let header = JweHeader::new(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256)
            .with_zip(CompressionAlgorithm::Deflate);
        let plaintext = b"repeat repeat repeat repeat repeat repeat compress me";
        let token = write(header, plaintext, &jwk).unwrap();

        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.header().zip, Some(CompressionAlgorithm::Deflate));
        let recovered = parsed.decrypt(&jwk).unwrap();
        assert_eq!(recovered, plaintext.to_vec());
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let jwk = oct_jwk(vec![0x55u8; 32]);
        let header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm);
        let token = write(header, b"payload", &jwk).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_ct = jose_core_b64::encode(b"tampered-ciphertext-bytes!!");
        parts[3] = &tampered_ct;
        let tampered = parts.join(".");

        let parsed = parse(&tampered).unwrap();
        assert!(matches!(parsed.decrypt(&jwk), Err(ReadError::Decryption(_))));
    }

    #[test]
    fn rejects_non_five_segment_input() {
        assert_eq!(parse("a.b.c"), Err(ReadError::Malformed));
    }

    #[test]
    fn wrong_key_fails_a128kw_unwrap() {
        let jwk = oct_jwk(vec![0x11u8; 16]);
        let wrong_jwk = oct_jwk(vec![0x99u8; 16]);
        let header = JweHeader::new(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256);
        let token = write(header, b"secret", &jwk).unwrap();

        let parsed = parse(&token).unwrap();
        assert!(matches!(parsed.decrypt(&wrong_jwk), Err(ReadError::KeyWrap(_))));
    }
}
