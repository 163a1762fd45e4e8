//! SHA-2 family (§4.2): a thin, block-aware wrapper over the `sha2` crate's
//! streaming `Digest` implementation.
//!
//! The `prepend` hook exists so [`crate::mac::SymmetricSigner`] can feed in
//! a precomputed ipad/opad block without re-hashing it on every `sign`
//! call; `sha2`'s SIMD-selecting dispatch (AVX2/SSSE3/SHA-NI on x86,
//! NEON on aarch64) is used as-is, so scalar and accelerated paths are
//! bit-identical by construction — we never touch the inner compression
//! function ourselves.

use core::fmt;

use digest::Digest;
use jose_core_jwa::HashAlgorithm;
use sha2::{Sha256, Sha384, Sha512};

/// The prepended block did not equal exactly one hash block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrependSizeError;

impl fmt::Display for PrependSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("prepend buffer must be exactly one hash block")
    }
}

impl std::error::Error for PrependSizeError {}

/// Compute a SHA-2 digest of `prepend || source`, writing it to `out`.
///
/// `prepend`, when non-empty, must be exactly one hash block
/// ([`HashAlgorithm::block_len`]) — this is the hook HMAC uses to fold in
/// its precomputed ipad/opad-keyed block. `out` must be at least
/// [`HashAlgorithm::digest_len`] bytes; only that many bytes are written.
pub fn compute_hash(
    alg: HashAlgorithm,
    prepend: &[u8],
    source: &[u8],
    out: &mut [u8],
) -> Result<(), PrependSizeError> {
    if !prepend.is_empty() && prepend.len() != alg.block_len() {
        return Err(PrependSizeError);
    }
    debug_assert!(out.len() >= alg.digest_len());

    macro_rules! run {
        ($hasher:ty) => {{
            let mut hasher = <$hasher>::new();
            if !prepend.is_empty() {
                hasher.update(prepend);
            }
            hasher.update(source);
            let digest = hasher.finalize();
            out[..digest.len()].copy_from_slice(&digest);
        }};
    }

    match alg {
        HashAlgorithm::Sha1 => unreachable!("SHA-1 is only used for RSA-OAEP padding, not ComputeHash"),
        HashAlgorithm::Sha256 => run!(Sha256),
        HashAlgorithm::Sha384 => run!(Sha384),
        HashAlgorithm::Sha512 => run!(Sha512),
    }
    Ok(())
}

/// One-shot digest into a freshly allocated `Vec<u8>`.
pub fn digest(alg: HashAlgorithm, source: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; alg.digest_len()];
    compute_hash(alg, &[], source, &mut out).expect("empty prepend is always valid");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_of_empty_matches_known_vector() {
        let out = digest(HashAlgorithm::Sha256, b"");
        assert_eq!(
            out,
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
    }

    #[test]
    fn rejects_mis_sized_prepend() {
        let mut out = [0u8; 32];
        let err = compute_hash(HashAlgorithm::Sha256, b"short", b"data", &mut out);
        assert_eq!(err, Err(PrependSizeError));
    }

    #[test]
    fn prepend_is_equivalent_to_concatenation() {
        let block = [0x36u8; 64];
        let mut via_prepend = [0u8; 32];
        compute_hash(HashAlgorithm::Sha256, &block, b"payload", &mut via_prepend).unwrap();

        let mut concatenated = block.to_vec();
        concatenated.extend_from_slice(b"payload");
        let via_concat = digest(HashAlgorithm::Sha256, &concatenated);

        assert_eq!(&via_prepend[..], &via_concat[..]);
    }
}
