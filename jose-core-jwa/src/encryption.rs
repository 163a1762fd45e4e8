use core::fmt;

use serde::{Deserialize, Serialize};

use crate::HashAlgorithm;

/// Algorithms used for content encryption, as defined in [RFC7518]
/// section 5.1. Used for the JWE `enc` header parameter.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptionAlgorithm {
    /// `AES_128_CBC_HMAC_SHA_256` (Required).
    #[serde(rename = "A128CBC-HS256")]
    Aes128CbcHs256,
    /// `AES_192_CBC_HMAC_SHA_384` (Optional).
    #[serde(rename = "A192CBC-HS384")]
    Aes192CbcHs384,
    /// `AES_256_CBC_HMAC_SHA_512` (Required).
    #[serde(rename = "A256CBC-HS512")]
    Aes256CbcHs512,
    /// AES-GCM using a 128-bit key (Recommended).
    #[serde(rename = "A128GCM")]
    Aes128Gcm,
    /// AES-GCM using a 192-bit key (Optional).
    #[serde(rename = "A192GCM")]
    Aes192Gcm,
    /// AES-GCM using a 256-bit key (Recommended).
    #[serde(rename = "A256GCM")]
    Aes256Gcm,
}

/// Static size/attribute contract for one [`EncryptionAlgorithm`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncryptionAttributes {
    /// Length in bits of the Content Encryption Key.
    pub cek_bits: u32,
    /// Length in bytes of the initialization vector / nonce.
    pub iv_len: usize,
    /// Length in bytes of the authentication tag.
    pub tag_len: usize,
    /// For AES-CBC-HMAC composites: the HMAC hash algorithm. `None` for
    /// native AES-GCM, which has no separate MAC key.
    pub composite_hash: Option<HashAlgorithm>,
}

impl EncryptionAlgorithm {
    /// The size/attribute contract for this algorithm.
    pub const fn attributes(self) -> EncryptionAttributes {
        use EncryptionAlgorithm::*;
        match self {
            Aes128CbcHs256 => EncryptionAttributes {
                cek_bits: 256,
                iv_len: 16,
                tag_len: 16,
                composite_hash: Some(HashAlgorithm::Sha256),
            },
            Aes192CbcHs384 => EncryptionAttributes {
                cek_bits: 384,
                iv_len: 16,
                tag_len: 24,
                composite_hash: Some(HashAlgorithm::Sha384),
            },
            Aes256CbcHs512 => EncryptionAttributes {
                cek_bits: 512,
                iv_len: 16,
                tag_len: 32,
                composite_hash: Some(HashAlgorithm::Sha512),
            },
            Aes128Gcm => EncryptionAttributes {
                cek_bits: 128,
                iv_len: 12,
                tag_len: 16,
                composite_hash: None,
            },
            Aes192Gcm => EncryptionAttributes {
                cek_bits: 192,
                iv_len: 12,
                tag_len: 16,
                composite_hash: None,
            },
            Aes256Gcm => EncryptionAttributes {
                cek_bits: 256,
                iv_len: 12,
                tag_len: 16,
                composite_hash: None,
            },
        }
    }

    /// Whether this is an AES-CBC-HMAC composite (as opposed to native
    /// AES-GCM).
    pub const fn is_cbc_hmac(self) -> bool {
        self.attributes().composite_hash.is_some()
    }

    /// The AES key size in bits actually fed to the block cipher: half of
    /// `cek_bits` for AES-CBC-HMAC (the other half is the HMAC key), all of
    /// it for AES-GCM.
    pub const fn aes_key_bits(self) -> u32 {
        if self.is_cbc_hmac() {
            self.attributes().cek_bits / 2
        } else {
            self.attributes().cek_bits
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncryptionAlgorithm::Aes128CbcHs256 => "A128CBC-HS256",
            EncryptionAlgorithm::Aes192CbcHs384 => "A192CBC-HS384",
            EncryptionAlgorithm::Aes256CbcHs512 => "A256CBC-HS512",
            EncryptionAlgorithm::Aes128Gcm => "A128GCM",
            EncryptionAlgorithm::Aes192Gcm => "A192GCM",
            EncryptionAlgorithm::Aes256Gcm => "A256GCM",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes_256_cbc_hs512_splits_key_in_half() {
        let attrs = EncryptionAlgorithm::Aes256CbcHs512.attributes();
        assert_eq!(attrs.cek_bits, 512);
        assert_eq!(EncryptionAlgorithm::Aes256CbcHs512.aes_key_bits(), 256);
    }

    #[test]
    fn gcm_uses_full_cek_as_aes_key() {
        assert_eq!(EncryptionAlgorithm::Aes128Gcm.aes_key_bits(), 128);
        assert!(!EncryptionAlgorithm::Aes128Gcm.is_cbc_hmac());
    }
}
