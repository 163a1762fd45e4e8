/// The SHA-2 hash used underneath an HMAC, RSA, ECDSA, or Concat KDF
/// operation. Not itself a JOSE wire value — a static attribute of the
/// algorithms in this crate.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-1, 20-byte digest. Only used as the default OAEP hash for bare
    /// `RSA-OAEP` (RFC 7518 §4.7); never used for HMAC, ECDSA, or
    /// AES-CBC-HMAC in this registry.
    Sha1,
    /// SHA-256, 32-byte digest.
    Sha256,
    /// SHA-384, 48-byte digest.
    Sha384,
    /// SHA-512, 64-byte digest.
    Sha512,
}

impl HashAlgorithm {
    /// Digest size in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Block size in bytes, the unit HMAC pads keys to.
    pub const fn block_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 | HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha512 => 128,
        }
    }
}
