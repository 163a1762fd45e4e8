use core::fmt;

use serde::{Deserialize, Serialize};

use crate::HashAlgorithm;

/// Algorithms used for digital signatures and MACs, as defined in [RFC7518]
/// section 3.1. Used for the JWS `alg` header parameter.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignatureAlgorithm {
    /// ECDSA using P-256 and SHA-256 (Recommended+)
    Es256,
    /// ECDSA using P-384 and SHA-384 (Optional)
    Es384,
    /// ECDSA using P-521 and SHA-512 (Optional)
    Es512,
    /// HMAC using SHA-256 (Required)
    Hs256,
    /// HMAC using SHA-384 (Optional)
    Hs384,
    /// HMAC using SHA-512 (Optional)
    Hs512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256 (Optional)
    Ps256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384 (Optional)
    Ps384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512 (Optional)
    Ps512,
    /// RSASSA-PKCS1-v1_5 using SHA-256 (Recommended)
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384 (Optional)
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512 (Optional)
    Rs512,
    /// No digital signature or MAC performed (Optional; unsecured JWS)
    #[serde(rename = "none")]
    None,
}

/// The key family a [`SignatureAlgorithm`] operates over.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyCategory {
    /// Symmetric HMAC key.
    Symmetric,
    /// RSA public/private key pair.
    Rsa,
    /// Elliptic curve (NIST P-256/384/521) key pair.
    EllipticCurve,
    /// No key is used (the `none` algorithm).
    None,
}

impl SignatureAlgorithm {
    /// The key family this algorithm requires.
    pub const fn key_category(self) -> KeyCategory {
        use SignatureAlgorithm::*;
        match self {
            Hs256 | Hs384 | Hs512 => KeyCategory::Symmetric,
            Rs256 | Rs384 | Rs512 | Ps256 | Ps384 | Ps512 => KeyCategory::Rsa,
            Es256 | Es384 | Es512 => KeyCategory::EllipticCurve,
            None => KeyCategory::None,
        }
    }

    /// The hash algorithm this signature algorithm is defined over, if any.
    pub const fn hash(self) -> Option<HashAlgorithm> {
        use SignatureAlgorithm::*;
        match self {
            Hs256 | Rs256 | Ps256 | Es256 => Some(HashAlgorithm::Sha256),
            Hs384 | Rs384 | Ps384 | Es384 => Some(HashAlgorithm::Sha384),
            Hs512 | Rs512 | Ps512 | Es512 => Some(HashAlgorithm::Sha512),
            None => Option::None,
        }
    }

    /// Minimum required key size in bits for HMAC algorithms (RFC 7518
    /// §3.2: the HMAC key MUST be at least as many bits as the hash output,
    /// i.e. as long as the MAC it produces). RSA/EC sizes are implied by
    /// the chosen key (modulus length / curve); this is `None` for them.
    pub const fn min_symmetric_key_bits(self) -> Option<u32> {
        match self.hash() {
            Some(h) if matches!(self.key_category(), KeyCategory::Symmetric) => {
                Some((h.digest_len() * 8) as u32)
            }
            _ => Option::None,
        }
    }

    /// The fixed-size `R || S` byte length an ECDSA signature under this
    /// algorithm must have (not DER, per RFC 7518 §3.4).
    pub const fn ecdsa_signature_len(self) -> Option<usize> {
        match self {
            SignatureAlgorithm::Es256 => Some(64),
            SignatureAlgorithm::Es384 => Some(96),
            SignatureAlgorithm::Es512 => Some(132),
            _ => Option::None,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureAlgorithm::Es256 => "ES256",
            SignatureAlgorithm::Es384 => "ES384",
            SignatureAlgorithm::Es512 => "ES512",
            SignatureAlgorithm::Hs256 => "HS256",
            SignatureAlgorithm::Hs384 => "HS384",
            SignatureAlgorithm::Hs512 => "HS512",
            SignatureAlgorithm::Ps256 => "PS256",
            SignatureAlgorithm::Ps384 => "PS384",
            SignatureAlgorithm::Ps512 => "PS512",
            SignatureAlgorithm::Rs256 => "RS256",
            SignatureAlgorithm::Rs384 => "RS384",
            SignatureAlgorithm::Rs512 => "RS512",
            SignatureAlgorithm::None => "none",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p521_signature_is_132_bytes() {
        assert_eq!(SignatureAlgorithm::Es512.ecdsa_signature_len(), Some(132));
    }

    #[test]
    fn hs256_requires_256_bit_key() {
        assert_eq!(SignatureAlgorithm::Hs256.min_symmetric_key_bits(), Some(256));
        assert_eq!(SignatureAlgorithm::Rs256.min_symmetric_key_bits(), None);
    }

    #[test]
    fn json_names_match_registry() {
        assert_eq!(serde_json::to_string(&SignatureAlgorithm::None).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&SignatureAlgorithm::Es512).unwrap(), "\"ES512\"");
    }
}
