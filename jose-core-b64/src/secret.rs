use alloc::string::String;
use alloc::vec::Vec;
use base64ct::{Base64UrlUnpadded, Encoding};
use core::fmt;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A base64url-encoded secret byte buffer (RSA/EC private key material,
/// symmetric key bytes). Zeroized on drop; compared in constant time.
#[derive(Clone)]
pub struct B64Secret(Vec<u8>);

impl B64Secret {
    /// Wrap secret bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the secret bytes, bypassing the zeroize-on-drop.
    /// Callers that take ownership this way are responsible for their own
    /// disposal of the returned buffer.
    pub fn into_bytes(mut self) -> Vec<u8> {
        core::mem::take(&mut self.0)
    }
}

impl fmt::Debug for B64Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B64Secret(..)")
    }
}

impl PartialEq for B64Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}
impl Eq for B64Secret {}

impl Zeroize for B64Secret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
impl ZeroizeOnDrop for B64Secret {}
impl Drop for B64Secret {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Serialize for B64Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64UrlUnpadded::encode_string(&self.0))
    }
}

impl<'de> Deserialize<'de> for B64Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        let bytes = Base64UrlUnpadded::decode_vec(&raw).map_err(de::Error::custom)?;
        Ok(Self::new(bytes))
    }
}
