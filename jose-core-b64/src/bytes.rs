use alloc::string::String;
use alloc::vec::Vec;
use base64ct::{Base64UrlUnpadded, Encoding};
use core::fmt;
use core::marker::PhantomData;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A byte buffer that (de)serializes as a base64-encoded JSON string.
///
/// `T` is the owned byte container (`Vec<u8>`, `Box<[u8]>`, or a fixed-size
/// `[u8; N]` for thumbprints); `Enc` selects the alphabet, defaulting to the
/// URL-safe unpadded alphabet every JOSE wire value except `x5c` uses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct B64Bytes<T = Vec<u8>, Enc = Base64UrlUnpadded>(pub T, PhantomData<Enc>);

impl<T, Enc> B64Bytes<T, Enc> {
    /// Wrap a byte container.
    pub fn new(value: T) -> Self {
        Self(value, PhantomData)
    }

    /// Unwrap the inner byte container.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<[u8]>, Enc> AsRef<[u8]> for B64Bytes<T, Enc> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T, Enc> From<T> for B64Bytes<T, Enc> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug, Enc> fmt::Debug for B64Bytes<T, Enc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("B64Bytes").field(&self.0).finish()
    }
}

impl<T: AsRef<[u8]>, Enc: Encoding> Serialize for B64Bytes<T, Enc> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Enc::encode_string(self.0.as_ref()))
    }
}

impl<'de, T, Enc> Deserialize<'de> for B64Bytes<T, Enc>
where
    T: TryFrom<Vec<u8>>,
    Enc: Encoding,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        let bytes = Enc::decode_vec(&raw).map_err(de::Error::custom)?;
        let len = bytes.len();
        let value = T::try_from(bytes)
            .map_err(|_| de::Error::custom(alloc::format!("unexpected length {len}")))?;
        Ok(Self::new(value))
    }
}
