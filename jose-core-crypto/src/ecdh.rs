//! ECDH-ES key agreement and the Concat KDF (§4.7, RFC 7518 §4.6, NIST SP
//! 800-56A §5.8.1). Agreement is delegated to the `elliptic-curve` crate's
//! `diffie_hellman`; the KDF is delegated to the `concat-kdf` crate, with
//! only the `OtherInfo` assembly hand-rolled since it is JOSE-specific.

use concat_kdf::derive_key_into;
use jose_core_jwa::EcCurve;
use p256::PublicKey as P256PublicKey;
use p384::PublicKey as P384PublicKey;
use p521::PublicKey as P521PublicKey;
use sha2::Sha256;

/// An ephemeral or static EC private key used only for ECDH-ES agreement
/// (never for signing).
pub enum EcdhPrivateKey {
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

/// An EC public key used as the other party in ECDH-ES agreement.
pub enum EcdhPublicKey {
    P256(P256PublicKey),
    P384(P384PublicKey),
    P521(P521PublicKey),
}

impl EcdhPrivateKey {
    pub fn curve(&self) -> EcCurve {
        match self {
            EcdhPrivateKey::P256(_) => EcCurve::P256,
            EcdhPrivateKey::P384(_) => EcCurve::P384,
            EcdhPrivateKey::P521(_) => EcCurve::P521,
        }
    }

    /// Generate a fresh ephemeral key pair for the producer side of
    /// ECDH-ES (§4.7's `epk` header).
    pub fn generate(curve: EcCurve) -> Self {
        let mut rng = rand::thread_rng();
        match curve {
            EcCurve::P256 => EcdhPrivateKey::P256(p256::SecretKey::random(&mut rng)),
            EcCurve::P384 => EcdhPrivateKey::P384(p384::SecretKey::random(&mut rng)),
            EcCurve::P521 => EcdhPrivateKey::P521(p521::SecretKey::random(&mut rng)),
        }
    }

    pub fn public_key(&self) -> EcdhPublicKey {
        match self {
            EcdhPrivateKey::P256(k) => EcdhPublicKey::P256(k.public_key()),
            EcdhPrivateKey::P384(k) => EcdhPublicKey::P384(k.public_key()),
            EcdhPrivateKey::P521(k) => EcdhPublicKey::P521(k.public_key()),
        }
    }
}

/// Curve mismatch between the two parties' keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveMismatch;

/// Run ECDH to produce the raw shared secret (the X-coordinate of the
/// agreed point). This is *not* the derived CEK — it is fed into
/// [`concat_kdf`] along with the `OtherInfo` to produce that.
pub fn agree(private: &EcdhPrivateKey, public: &EcdhPublicKey) -> Result<Vec<u8>, CurveMismatch> {
    use elliptic_curve::ecdh::diffie_hellman;
    let z = match (private, public) {
        (EcdhPrivateKey::P256(sk), EcdhPublicKey::P256(pk)) => {
            diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine()).raw_secret_bytes().to_vec()
        }
        (EcdhPrivateKey::P384(sk), EcdhPublicKey::P384(pk)) => {
            diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine()).raw_secret_bytes().to_vec()
        }
        (EcdhPrivateKey::P521(sk), EcdhPublicKey::P521(pk)) => {
            diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine()).raw_secret_bytes().to_vec()
        }
        _ => return Err(CurveMismatch),
    };
    Ok(z)
}

fn datalen_prefixed(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

/// Assemble the Concat KDF `OtherInfo` value per RFC 7518 §4.6.2:
/// `AlgorithmID || PartyUInfo || PartyVInfo || SuppPubInfo || SuppPrivInfo`,
/// where `AlgorithmID` is the JWE `enc` (direct agreement) or key
/// management `alg` (agreement + key wrap) identifier, `apu`/`apv` are the
/// optional party-info headers, and `SuppPubInfo` is the derived key
/// length in bits, big-endian 32-bit. `SuppPrivInfo` is always empty.
pub fn other_info(algorithm_id: &str, apu: &[u8], apv: &[u8], key_data_bits: u32) -> Vec<u8> {
    let mut out = Vec::new();
    datalen_prefixed(algorithm_id.as_bytes(), &mut out);
    datalen_prefixed(apu, &mut out);
    datalen_prefixed(apv, &mut out);
    out.extend_from_slice(&key_data_bits.to_be_bytes());
    out
}

/// Concat KDF derivation failed — only possible if `key_len` requests more
/// output than a single-round SHA-256-based KDF can produce for the chosen
/// digest, which for JOSE's key sizes never happens in practice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfError;

/// Derive `key_len` bytes of key material from the ECDH shared secret `z`
/// and the assembled `other_info`, using SHA-256 as the Concat KDF's
/// underlying hash (RFC 7518 requires exactly this, regardless of the
/// content encryption algorithm's own hash).
pub fn concat_kdf(z: &[u8], other_info: &[u8], key_len: usize) -> Result<Vec<u8>, KdfError> {
    let mut out = vec![0u8; key_len];
    derive_key_into::<Sha256>(z, other_info, &mut out).map_err(|_| KdfError)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p256_agreement_is_symmetric() {
        let alice = EcdhPrivateKey::generate(EcCurve::P256);
        let bob = EcdhPrivateKey::generate(EcCurve::P256);
        let z_alice = agree(&alice, &bob.public_key()).unwrap();
        let z_bob = agree(&bob, &alice.public_key()).unwrap();
        assert_eq!(z_alice, z_bob);
    }

    #[test]
    fn mismatched_curves_are_rejected() {
        let p256_key = EcdhPrivateKey::generate(EcCurve::P256);
        let p384_key = EcdhPrivateKey::generate(EcCurve::P384);
        assert_eq!(agree(&p256_key, &p384_key.public_key()), Err(CurveMismatch));
    }

    #[test]
    fn other_info_encodes_lengths_big_endian() {
        let info = other_info("A256GCM", b"Alice", b"Bob", 256);
        // 4-byte len("A256GCM")=7, then "A256GCM", then len(apu)=5+"Alice", len(apv)=3+"Bob", then 256 as u32
        assert_eq!(&info[0..4], &7u32.to_be_bytes());
        assert_eq!(&info[4..11], b"A256GCM");
        assert_eq!(&info[info.len() - 4..], &256u32.to_be_bytes());
    }

    #[test]
    fn concat_kdf_is_deterministic_and_derives_requested_length() {
        let z = [0x42u8; 32];
        let info = other_info("A128CBC-HS256", b"", b"", 256);
        let a = concat_kdf(&z, &info, 32).unwrap();
        let b = concat_kdf(&z, &info, 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }
}
