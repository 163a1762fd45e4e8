use core::fmt;

use serde::{Deserialize, Serialize};

use crate::HashAlgorithm;

/// Algorithms used for key management, as defined in [RFC7518] section 4.1.
/// Used for the JWE `alg` header parameter.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyManagementAlgorithm {
    /// Direct use of a shared symmetric key as the CEK (Recommended).
    #[serde(rename = "dir")]
    Dir,
    /// AES Key Wrap with default IV using a 128-bit key (Recommended).
    #[serde(rename = "A128KW")]
    Aes128Kw,
    /// AES Key Wrap with default IV using a 192-bit key (Optional).
    #[serde(rename = "A192KW")]
    Aes192Kw,
    /// AES Key Wrap with default IV using a 256-bit key (Recommended).
    #[serde(rename = "A256KW")]
    Aes256Kw,
    /// Key wrapping with AES-GCM using a 128-bit key (Optional).
    #[serde(rename = "A128GCMKW")]
    Aes128GcmKw,
    /// Key wrapping with AES-GCM using a 192-bit key (Optional).
    #[serde(rename = "A192GCMKW")]
    Aes192GcmKw,
    /// Key wrapping with AES-GCM using a 256-bit key (Optional).
    #[serde(rename = "A256GCMKW")]
    Aes256GcmKw,
    /// RSAES-PKCS1-v1_5 (Recommended-).
    #[serde(rename = "RSA1_5")]
    Rsa1_5,
    /// RSAES OAEP using default parameters, SHA-1/MGF1-SHA-1 (Recommended+).
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,
    /// RSAES OAEP using SHA-256 and MGF1 with SHA-256 (Optional).
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,
    /// RSAES OAEP using SHA-384 and MGF1 with SHA-384 (not in RFC 7518;
    /// widely implemented extension used by several JOSE stacks).
    #[serde(rename = "RSA-OAEP-384")]
    RsaOaep384,
    /// RSAES OAEP using SHA-512 and MGF1 with SHA-512 (same status as
    /// `RSA-OAEP-384`).
    #[serde(rename = "RSA-OAEP-512")]
    RsaOaep512,
    /// Elliptic Curve Diffie-Hellman Ephemeral Static key agreement using
    /// Concat KDF, CEK used directly (Recommended+).
    #[serde(rename = "ECDH-ES")]
    EcdhEs,
    /// ECDH-ES using Concat KDF and CEK wrapped with `A128KW` (Recommended).
    #[serde(rename = "ECDH-ES+A128KW")]
    EcdhEsA128Kw,
    /// ECDH-ES using Concat KDF and CEK wrapped with `A192KW` (Optional).
    #[serde(rename = "ECDH-ES+A192KW")]
    EcdhEsA192Kw,
    /// ECDH-ES using Concat KDF and CEK wrapped with `A256KW` (Recommended).
    #[serde(rename = "ECDH-ES+A256KW")]
    EcdhEsA256Kw,
}

/// Whether an algorithm wraps a randomly generated CEK (producing an
/// Encrypted Key segment) or establishes/derives the CEK directly (leaving
/// the Encrypted Key segment empty).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyWrapKind {
    /// The CEK is the key itself, or is derived directly with no wrapped
    /// segment to emit (`dir`, `ECDH-ES`).
    Direct,
    /// The CEK is randomly generated and wrapped, producing a non-empty
    /// Encrypted Key segment.
    Wrapped,
}

impl KeyManagementAlgorithm {
    /// Whether this algorithm produces a wrapped CEK segment.
    ///
    /// `false` for `dir` and bare `ECDH-ES`; `true` for every key-wrapping
    /// and key-encryption algorithm, including `ECDH-ES+A*KW` (which
    /// derives a key-wrapping key via ECDH-ES and then wraps a freshly
    /// generated CEK with it).
    pub const fn wrap_kind(self) -> KeyWrapKind {
        use KeyManagementAlgorithm::*;
        match self {
            Dir | EcdhEs => KeyWrapKind::Direct,
            Aes128Kw | Aes192Kw | Aes256Kw | Aes128GcmKw | Aes192GcmKw | Aes256GcmKw | Rsa1_5
            | RsaOaep | RsaOaep256 | RsaOaep384 | RsaOaep512 | EcdhEsA128Kw | EcdhEsA192Kw
            | EcdhEsA256Kw => KeyWrapKind::Wrapped,
        }
    }

    /// Convenience boolean form of [`Self::wrap_kind`], matching the
    /// `producesWrappedKey` attribute name used in the interface contract.
    pub const fn produces_wrapped_key(self) -> bool {
        matches!(self.wrap_kind(), KeyWrapKind::Wrapped)
    }

    /// Whether this algorithm involves an ECDH-ES key agreement step.
    pub const fn is_ecdh_es(self) -> bool {
        use KeyManagementAlgorithm::*;
        matches!(self, EcdhEs | EcdhEsA128Kw | EcdhEsA192Kw | EcdhEsA256Kw)
    }

    /// The AES Key Wrap key size in bits, for algorithms that wrap with
    /// AES-KW (either directly or after ECDH-ES key agreement).
    pub const fn aes_kw_bits(self) -> Option<u32> {
        use KeyManagementAlgorithm::*;
        match self {
            Aes128Kw | Aes128GcmKw | EcdhEsA128Kw => Some(128),
            Aes192Kw | Aes192GcmKw | EcdhEsA192Kw => Some(192),
            Aes256Kw | Aes256GcmKw | EcdhEsA256Kw => Some(256),
            _ => None,
        }
    }

    /// Whether this is one of the AES-GCM key-wrap variants (which need an
    /// `iv`/`tag` pair of header parameters rather than AES-KW's fixed IV).
    pub const fn is_aes_gcm_kw(self) -> bool {
        use KeyManagementAlgorithm::*;
        matches!(self, Aes128GcmKw | Aes192GcmKw | Aes256GcmKw)
    }

    /// The OAEP hash algorithm for RSA-OAEP variants.
    pub const fn rsa_oaep_hash(self) -> Option<HashAlgorithm> {
        use KeyManagementAlgorithm::*;
        match self {
            RsaOaep => Some(HashAlgorithm::Sha1),
            RsaOaep256 => Some(HashAlgorithm::Sha256),
            RsaOaep384 => Some(HashAlgorithm::Sha384),
            RsaOaep512 => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for KeyManagementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyManagementAlgorithm::Dir => "dir",
            KeyManagementAlgorithm::Aes128Kw => "A128KW",
            KeyManagementAlgorithm::Aes192Kw => "A192KW",
            KeyManagementAlgorithm::Aes256Kw => "A256KW",
            KeyManagementAlgorithm::Aes128GcmKw => "A128GCMKW",
            KeyManagementAlgorithm::Aes192GcmKw => "A192GCMKW",
            KeyManagementAlgorithm::Aes256GcmKw => "A256GCMKW",
            KeyManagementAlgorithm::Rsa1_5 => "RSA1_5",
            KeyManagementAlgorithm::RsaOaep => "RSA-OAEP",
            KeyManagementAlgorithm::RsaOaep256 => "RSA-OAEP-256",
            KeyManagementAlgorithm::RsaOaep384 => "RSA-OAEP-384",
            KeyManagementAlgorithm::RsaOaep512 => "RSA-OAEP-512",
            KeyManagementAlgorithm::EcdhEs => "ECDH-ES",
            KeyManagementAlgorithm::EcdhEsA128Kw => "ECDH-ES+A128KW",
            KeyManagementAlgorithm::EcdhEsA192Kw => "ECDH-ES+A192KW",
            KeyManagementAlgorithm::EcdhEsA256Kw => "ECDH-ES+A256KW",
        };
        f.write_str(name)
    }
}
