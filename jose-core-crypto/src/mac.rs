//! HMAC-SHA-N (§4.3), RFC 2104: `ipad = 0x36`, `opad = 0x5C`.
//!
//! [`SymmetricSigner`] precomputes the padded inner/outer key blocks once
//! at construction and reuses them for every `sign`/`verify` call, using
//! [`crate::hash::compute_hash`]'s `prepend` hook instead of the generic
//! `hmac` crate's per-call key scheduling. This is the optimization the
//! core spec calls out explicitly in §4.3 and §9 ("stateful crypto contexts
//! ... are owned by engine objects").

use jose_core_jwa::HashAlgorithm;
use subtle::ConstantTimeEq;

use crate::hash::compute_hash;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// A precomputed HMAC key, ready to sign or verify any number of messages.
pub struct SymmetricSigner {
    alg: HashAlgorithm,
    inner_block: Vec<u8>,
    outer_block: Vec<u8>,
}

impl SymmetricSigner {
    /// Precompute the padded inner/outer key blocks for `key` under `alg`.
    ///
    /// Per RFC 2104: if `key` is longer than the hash's block size it is
    /// first hashed down to digest length; if shorter, it is right-padded
    /// with zero bytes to the block size.
    pub fn new(alg: HashAlgorithm, key: &[u8]) -> Self {
        let block_len = alg.block_len();
        let mut key_block = vec![0u8; block_len];
        if key.len() > block_len {
            let mut hashed = vec![0u8; alg.digest_len()];
            compute_hash(alg, &[], key, &mut hashed).expect("empty prepend is always valid");
            key_block[..hashed.len()].copy_from_slice(&hashed);
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let inner_block: Vec<u8> = key_block.iter().map(|b| b ^ IPAD).collect();
        let outer_block: Vec<u8> = key_block.iter().map(|b| b ^ OPAD).collect();

        Self {
            alg,
            inner_block,
            outer_block,
        }
    }

    /// Hash algorithm this signer is keyed for.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.alg
    }

    /// Output length in bytes (equal to the underlying hash's digest
    /// length).
    pub fn output_len(&self) -> usize {
        self.alg.digest_len()
    }

    /// `HMAC(K, message) = H((K ^ opad) || H((K ^ ipad) || message))`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let mut inner_digest = vec![0u8; self.alg.digest_len()];
        compute_hash(self.alg, &self.inner_block, message, &mut inner_digest)
            .expect("inner block is exactly one hash block by construction");

        let mut mac = vec![0u8; self.alg.digest_len()];
        compute_hash(self.alg, &self.outer_block, &inner_digest, &mut mac)
            .expect("outer block is exactly one hash block by construction");
        mac
    }

    /// Constant-time verification of a full-length MAC.
    pub fn verify(&self, message: &[u8], mac: &[u8]) -> bool {
        if mac.len() != self.output_len() {
            return false;
        }
        let computed = self.sign(message);
        computed.ct_eq(mac).into()
    }
}
