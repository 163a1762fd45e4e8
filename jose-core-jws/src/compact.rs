//! JWS compact serialization (§4.12, RFC 7515 §7.1):
//! `BASE64URL(header) '.' BASE64URL(payload) '.' BASE64URL(signature)`.

use jose_core_b64::tokenizer::{tokenize, MalformedToken};
use jose_core_b64::{decode, encode, Json};
use jose_core_jwk::Jwk;

use crate::engine::{self, JwsCryptoError};
use crate::header::JwsHeader;

/// A parsed-but-unverified compact JWS: the header is decoded, but the
/// signature has not yet been checked against any key.
pub struct UnverifiedJws {
    header: JwsHeader,
    header_b64: String,
    payload_b64: String,
    signature: Vec<u8>,
}

impl UnverifiedJws {
    /// The decoded header.
    pub fn header(&self) -> &JwsHeader {
        &self.header
    }

    /// Verify the signature with `jwk` and return the decoded payload
    /// bytes on success.
    pub fn verify(&self, jwk: &Jwk) -> Result<Vec<u8>, ReadError> {
        let alg = self.header.alg.ok_or(ReadError::MissingAlgorithm)?;
        let signing_input = format!("{}.{}", self.header_b64, self.payload_b64);
        engine::verify(alg, jwk, signing_input.as_bytes(), &self.signature).map_err(ReadError::Crypto)?;
        decode(&self.payload_b64).map_err(|_| ReadError::Malformed)
    }
}

/// Failures reading a compact JWS.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// Not a well-formed 3-segment compact token, or a segment failed to
    /// base64url-decode.
    Malformed,
    /// The header's JSON did not parse as a [`JwsHeader`].
    InvalidHeader,
    /// The header had no `alg` member.
    MissingAlgorithm,
    /// Signature verification or key resolution failed.
    Crypto(JwsCryptoError),
}

impl From<MalformedToken> for ReadError {
    fn from(_: MalformedToken) -> Self {
        ReadError::Malformed
    }
}

/// Tokenize and parse `token` (without verifying the signature yet — that
/// requires a resolved key, which may depend on reading `kid` from the
/// header first).
pub fn parse(token: &str) -> Result<UnverifiedJws, ReadError> {
    let bytes = token.as_bytes();
    let segs = tokenize(bytes)?;
    if !segs.is_jws() {
        return Err(ReadError::Malformed);
    }
    let parts = segs.as_slice();
    let header_b64 = parts[0].str(token).to_string();
    let payload_b64 = parts[1].str(token).to_string();
    let signature_b64 = parts[2].str(token);

    let header: JwsHeader = Json::from_encoded(&header_b64).map_err(|_| ReadError::InvalidHeader)?.into_value();
    let signature = decode(signature_b64).map_err(|_| ReadError::Malformed)?;

    Ok(UnverifiedJws {
        header,
        header_b64,
        payload_b64,
        signature,
    })
}

/// Errors writing a compact JWS.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteError {
    /// The header failed to serialize as JSON.
    HeaderSerialization,
    /// Signing failed.
    Crypto(JwsCryptoError),
}

/// Serialize `header` and `payload`, sign with `jwk`, and produce the
/// compact JWS string.
pub fn write(header: &JwsHeader, payload: &[u8], jwk: &Jwk) -> Result<String, WriteError> {
    let alg = header.alg.unwrap_or(jose_core_jwa::SignatureAlgorithm::None);
    let header_json = Json::new(header).map_err(|_| WriteError::HeaderSerialization)?;
    let payload_b64 = encode(payload);
    let signing_input = format!("{}.{}", header_json.encoded(), payload_b64);
    let signature = engine::sign(alg, jwk, signing_input.as_bytes()).map_err(WriteError::Crypto)?;
    Ok(format!("{}.{}", signing_input, encode(&signature)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwk::{Key, Oct};
    use pretty_assertions::assert_eq;

    fn hs256_key() -> Jwk {
        Jwk::new(Key::Oct(Oct {
            k: B64Secret::new(decode("GdaXeVyiJwKmz5LFhcbcng").unwrap()),
        }))
    }

    // RFC 7515 Appendix A.1's claim set, to within its documented 2048-bit
    // modulus-free variant (HS256 over the same header/payload shape).
    #[test]
    fn hs256_round_trip() {
        let jwk = hs256_key();
        let header = JwsHeader::new(jose_core_jwa::SignatureAlgorithm::Hs256);
        let payload = br#"{"iss":"x","iat":1516239022}"#;
        let token = write(&header, payload, &jwk).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.header().alg, Some(jose_core_jwa::SignatureAlgorithm::Hs256));
        let recovered = parsed.verify(&jwk).unwrap();
        assert_eq!(recovered, payload.to_vec());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let jwk = hs256_key();
        let header = JwsHeader::new(jose_core_jwa::SignatureAlgorithm::Hs256);
        let token = write(&header, b"{}", &jwk).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_payload = encode(b"{\"x\":1}");
        parts[1] = &tampered_payload;
        let tampered = parts.join(".");

        let parsed = parse(&tampered).unwrap();
        assert_eq!(parsed.verify(&jwk), Err(ReadError::Crypto(JwsCryptoError::VerificationFailed)));
    }

    #[test]
    fn rejects_non_three_segment_input() {
        assert_eq!(parse("a.b.c.d"), Err(ReadError::Malformed));
    }

    #[test]
    fn unsigned_none_algorithm_has_empty_third_segment() {
        let jwk = hs256_key();
        let header = JwsHeader::new(jose_core_jwa::SignatureAlgorithm::None);
        let token = write(&header, b"{}", &jwk).unwrap();
        assert!(token.ends_with('.'));
    }
}
