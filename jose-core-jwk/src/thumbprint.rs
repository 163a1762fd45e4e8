use alloc::string::String;
use core::fmt;

use jose_core_b64::encode;
use sha2::{Digest, Sha256};

use crate::Key;

/// RFC 7638 thumbprint: SHA-256 over the canonical JSON object containing
/// only a key's required members, in lexicographic key order, with no
/// whitespace.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Thumbprint([u8; 32]);

impl Thumbprint {
    /// Compute the thumbprint of `key`.
    pub fn compute(key: &Key) -> Result<Self, ThumbprintError> {
        let canonical = canonical_json(key)?;
        let digest = Sha256::digest(canonical.as_bytes());
        Ok(Self(digest.into()))
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base64url encoding of the digest, the form used in `x5t#S256`-style
    /// header fields and thumbprint comparisons.
    pub fn to_base64url(&self) -> String {
        encode(&self.0)
    }
}

impl fmt::Debug for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Thumbprint").field(&self.to_base64url()).finish()
    }
}

/// The key was missing a member RFC 7638 requires in the canonical form
/// (e.g. an RSA key with an empty modulus).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbprintError;

impl fmt::Display for ThumbprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key is missing a member required for its thumbprint")
    }
}

fn canonical_json(key: &Key) -> Result<String, ThumbprintError> {
    use alloc::format;
    Ok(match key {
        Key::Ec(ec) => {
            let crv = match ec.crv {
                jose_core_jwa::EcCurve::P256 => "P-256",
                jose_core_jwa::EcCurve::P384 => "P-384",
                jose_core_jwa::EcCurve::P521 => "P-521",
            };
            format!(
                r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
                crv,
                encode(ec.x.as_ref()),
                encode(ec.y.as_ref()),
            )
        }
        Key::Rsa(rsa) => {
            if rsa.n.as_ref().is_empty() || rsa.e.as_ref().is_empty() {
                return Err(ThumbprintError);
            }
            format!(
                r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#,
                encode(rsa.e.as_ref()),
                encode(rsa.n.as_ref()),
            )
        }
        Key::Oct(oct) => {
            if oct.k.as_bytes().is_empty() {
                return Err(ThumbprintError);
            }
            format!(r#"{{"k":"{}","kty":"oct"}}"#, encode(oct.k.as_bytes()))
        }
    })
}
