use alloc::string::String;
use core::fmt;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};

use crate::{decode, encode, Base64Error};

/// A value that is carried on the wire as `BASE64URL(UTF8(JSON(value)))`.
///
/// The encoded form is computed once at construction and cached alongside
/// the value, so `as_ref()` (the bytes that actually get MACed/signed) never
/// re-serializes. This is the writer pipeline's per-header encoding cache
/// (§4.12) made structural instead of an external map.
#[derive(Clone)]
pub struct Json<T> {
    value: T,
    encoded: String,
}

impl<T: Serialize> Json<T> {
    /// Serialize `value` to JSON and base64url-encode it.
    pub fn new(value: T) -> Result<Self, JsonError> {
        let raw = serde_json::to_vec(&value).map_err(|_| JsonError::Serialization)?;
        let encoded = encode(&raw);
        Ok(Self { value, encoded })
    }
}

impl<T> Json<T> {
    /// The wrapped value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume and return the wrapped value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// The cached base64url-encoded JSON, the exact bytes that are signed.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl<T> AsRef<[u8]> for Json<T> {
    fn as_ref(&self) -> &[u8] {
        self.encoded.as_bytes()
    }
}

impl<T: DeserializeOwned> Json<T> {
    /// Parse a base64url-encoded JSON segment taken from compact wire form.
    pub fn from_encoded(encoded: &str) -> Result<Self, JsonError> {
        let raw = decode(encoded).map_err(|_| JsonError::Base64)?;
        let value: T = serde_json::from_slice(&raw).map_err(|_| JsonError::Serialization)?;
        Ok(Self {
            value,
            encoded: encoded.into(),
        })
    }
}

/// Errors constructing or parsing a [`Json`] segment.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonError {
    /// Invalid base64url input.
    Base64,
    /// `T` failed to (de)serialize as JSON.
    Serialization,
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::Base64 => f.write_str("malformed base64url segment"),
            JsonError::Serialization => f.write_str("malformed JSON segment"),
        }
    }
}

impl From<Base64Error> for JsonError {
    fn from(_: Base64Error) -> Self {
        JsonError::Base64
    }
}

impl<T: Serialize> Serialize for Json<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Json<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_encoded(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn caches_the_exact_signing_input() {
        let wrapped = Json::new(json!({"alg": "HS256"})).unwrap();
        assert_eq!(wrapped.encoded(), "eyJhbGciOiJIUzI1NiJ9");
        assert_eq!(wrapped.as_ref(), b"eyJhbGciOiJIUzI1NiJ9");
    }

    #[test]
    fn roundtrips_from_wire_segment() {
        let wrapped: Json<serde_json::Value> =
            Json::from_encoded("eyJhbGciOiJIUzI1NiJ9").unwrap();
        assert_eq!(wrapped.value(), &json!({"alg": "HS256"}));
    }
}
