//! Key-wrap/unwrap engine (§4.7, §4.12 step 2): given a [`KeyManagementAlgorithm`]
//! and a resolved [`Jwk`], establish or recover the Content Encryption Key.
//!
//! This is the one place ECDH-ES's two-phase shape (agree, then either use
//! the derived bytes directly or AES-KW-wrap a second, freshly generated
//! CEK with them) lives, since the JWE header (`epk`/`apu`/`apv`) has to be
//! populated as part of producing the Encrypted Key segment, before the
//! rest of the writer pipeline base64url-encodes it.

use jose_core_crypto::{aes, ecdh, gcm, rsa_wrap};
use jose_core_jwa::{EcCurve, EncryptionAlgorithm, KeyManagementAlgorithm};
use jose_core_jwk::Jwk;
use rand::RngCore;

use crate::header::{EphemeralPublicKey, JweHeader};
use crate::keys::{self, KeyResolutionError};

/// Key wrap or unwrap failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyWrapError {
    /// The JWK's key material did not fit the algorithm.
    KeyResolution,
    /// The underlying wrap/unwrap/encrypt/decrypt primitive failed (wrong
    /// key size, authentication failure, mismatched curve).
    Crypto,
    /// ECDH-ES unwrap requires the sender's ephemeral public key in the
    /// header (`epk`), and none was present or it failed to parse.
    MissingEphemeralKey,
}

impl From<KeyResolutionError> for KeyWrapError {
    fn from(_: KeyResolutionError) -> Self {
        KeyWrapError::KeyResolution
    }
}

/// Generate a fresh random CEK of the size `enc` requires.
pub fn generate_cek(enc: EncryptionAlgorithm) -> Vec<u8> {
    let mut cek = vec![0u8; (enc.attributes().cek_bits / 8) as usize];
    rand::thread_rng().fill_bytes(&mut cek);
    cek
}

/// Establish the CEK for a freshly written JWE, writing any header
/// parameters the algorithm needs (`epk`, `iv`/`tag`) into `header`.
///
/// Returns `(cek, encrypted_key_segment)`; `encrypted_key_segment` is empty
/// for `dir` and bare `ECDH-ES`.
pub fn wrap(
    alg: KeyManagementAlgorithm,
    enc: EncryptionAlgorithm,
    jwk: &Jwk,
    header: &mut JweHeader,
) -> Result<(Vec<u8>, Vec<u8>), KeyWrapError> {
    use KeyManagementAlgorithm::*;
    match alg {
        Dir => {
            let cek = keys::symmetric_key(jwk)?.to_vec();
            Ok((cek, Vec::new()))
        }
        Aes128Kw | Aes192Kw | Aes256Kw => {
            let kek = keys::symmetric_key(jwk)?;
            let cek = generate_cek(enc);
            let wrapped = aes::kw_wrap(kek, &cek).map_err(|_| KeyWrapError::Crypto)?;
            Ok((cek, wrapped))
        }
        Aes128GcmKw | Aes192GcmKw | Aes256GcmKw => {
            let kek = keys::symmetric_key(jwk)?;
            let cek = generate_cek(enc);
            let mut iv = [0u8; 12];
            rand::thread_rng().fill_bytes(&mut iv);
            let (ciphertext, tag) = gcm::encrypt(kek, &iv, &[], &cek).map_err(|_| KeyWrapError::Crypto)?;
            header.set_gcm_kw_iv_tag(&iv, &tag);
            Ok((cek, ciphertext))
        }
        Rsa1_5 => {
            let pubkey = keys::rsa_public_key(jwk)?;
            let cek = generate_cek(enc);
            let wrapped = rsa_wrap::pkcs1v15_encrypt(&pubkey, &cek).map_err(|_| KeyWrapError::Crypto)?;
            Ok((cek, wrapped))
        }
        RsaOaep | RsaOaep256 | RsaOaep384 | RsaOaep512 => {
            let pubkey = keys::rsa_public_key(jwk)?;
            let hash = alg.rsa_oaep_hash().expect("RSA-OAEP* always carries a hash");
            let cek = generate_cek(enc);
            let wrapped = rsa_wrap::oaep_encrypt(&pubkey, hash, &cek).map_err(|_| KeyWrapError::Crypto)?;
            Ok((cek, wrapped))
        }
        EcdhEs => {
            let static_pub = keys::ecdh_public_key(jwk)?;
            let curve = jwk_ec_curve(jwk)?;
            let ephemeral = ecdh::EcdhPrivateKey::generate(curve);
            write_epk(header, &ephemeral);
            let z = ecdh::agree(&ephemeral, &static_pub).map_err(|_| KeyWrapError::Crypto)?;
            let info = other_info(header, &enc.to_string(), enc.attributes().cek_bits);
            let cek = ecdh::concat_kdf(&z, &info, (enc.attributes().cek_bits / 8) as usize)
                .map_err(|_| KeyWrapError::Crypto)?;
            Ok((cek, Vec::new()))
        }
        EcdhEsA128Kw | EcdhEsA192Kw | EcdhEsA256Kw => {
            let static_pub = keys::ecdh_public_key(jwk)?;
            let curve = jwk_ec_curve(jwk)?;
            let ephemeral = ecdh::EcdhPrivateKey::generate(curve);
            write_epk(header, &ephemeral);
            let z = ecdh::agree(&ephemeral, &static_pub).map_err(|_| KeyWrapError::Crypto)?;
            let kw_bits = alg.aes_kw_bits().expect("ECDH-ES+A*KW always carries a KW size");
            let info = other_info(header, &alg.to_string(), kw_bits);
            let kek = ecdh::concat_kdf(&z, &info, (kw_bits / 8) as usize).map_err(|_| KeyWrapError::Crypto)?;
            let cek = generate_cek(enc);
            let wrapped = aes::kw_wrap(&kek, &cek).map_err(|_| KeyWrapError::Crypto)?;
            Ok((cek, wrapped))
        }
    }
}

/// Recover the CEK for a parsed JWE.
pub fn unwrap(
    alg: KeyManagementAlgorithm,
    enc: EncryptionAlgorithm,
    jwk: &Jwk,
    header: &JweHeader,
    encrypted_key: &[u8],
) -> Result<Vec<u8>, KeyWrapError> {
    use KeyManagementAlgorithm::*;
    match alg {
        Dir => Ok(keys::symmetric_key(jwk)?.to_vec()),
        Aes128Kw | Aes192Kw | Aes256Kw => {
            let kek = keys::symmetric_key(jwk)?;
            aes::kw_unwrap(kek, encrypted_key).map_err(|_| KeyWrapError::Crypto)
        }
        Aes128GcmKw | Aes192GcmKw | Aes256GcmKw => {
            let kek = keys::symmetric_key(jwk)?;
            let (iv, tag) = header.gcm_kw_iv_tag().ok_or(KeyWrapError::Crypto)?;
            let iv: [u8; 12] = iv.try_into().map_err(|_| KeyWrapError::Crypto)?;
            gcm::decrypt(kek, &iv, &[], encrypted_key, &tag).map_err(|_| KeyWrapError::Crypto)
        }
        Rsa1_5 => {
            let privkey = keys::rsa_private_key(jwk)?;
            rsa_wrap::pkcs1v15_decrypt(&privkey, encrypted_key).map_err(|_| KeyWrapError::Crypto)
        }
        RsaOaep | RsaOaep256 | RsaOaep384 | RsaOaep512 => {
            let privkey = keys::rsa_private_key(jwk)?;
            let hash = alg.rsa_oaep_hash().expect("RSA-OAEP* always carries a hash");
            rsa_wrap::oaep_decrypt(&privkey, hash, encrypted_key).map_err(|_| KeyWrapError::Crypto)
        }
        EcdhEs => {
            let our_priv = keys::ecdh_private_key(jwk)?;
            let their_pub = read_epk(header)?;
            let z = ecdh::agree(&our_priv, &their_pub).map_err(|_| KeyWrapError::Crypto)?;
            let info = other_info(header, &enc.to_string(), enc.attributes().cek_bits);
            ecdh::concat_kdf(&z, &info, (enc.attributes().cek_bits / 8) as usize).map_err(|_| KeyWrapError::Crypto)
        }
        EcdhEsA128Kw | EcdhEsA192Kw | EcdhEsA256Kw => {
            let our_priv = keys::ecdh_private_key(jwk)?;
            let their_pub = read_epk(header)?;
            let z = ecdh::agree(&our_priv, &their_pub).map_err(|_| KeyWrapError::Crypto)?;
            let kw_bits = alg.aes_kw_bits().expect("ECDH-ES+A*KW always carries a KW size");
            let info = other_info(header, &alg.to_string(), kw_bits);
            let kek = ecdh::concat_kdf(&z, &info, (kw_bits / 8) as usize).map_err(|_| KeyWrapError::Crypto)?;
            aes::kw_unwrap(&kek, encrypted_key).map_err(|_| KeyWrapError::Crypto)
        }
    }
}

fn jwk_ec_curve(jwk: &Jwk) -> Result<EcCurve, KeyWrapError> {
    match &jwk.key {
        jose_core_jwk::Key::Ec(ec) => Ok(ec.crv),
        _ => Err(KeyWrapError::KeyResolution),
    }
}

fn write_epk(header: &mut JweHeader, ephemeral: &ecdh::EcdhPrivateKey) {
    use elliptic_curve::sec1::ToEncodedPoint;
    let (crv, encoded_len, point_bytes) = match ephemeral.public_key() {
        ecdh::EcdhPublicKey::P256(pk) => (EcCurve::P256, EcCurve::P256.coordinate_len(), pk.to_encoded_point(false).as_bytes().to_vec()),
        ecdh::EcdhPublicKey::P384(pk) => (EcCurve::P384, EcCurve::P384.coordinate_len(), pk.to_encoded_point(false).as_bytes().to_vec()),
        ecdh::EcdhPublicKey::P521(pk) => (EcCurve::P521, EcCurve::P521.coordinate_len(), pk.to_encoded_point(false).as_bytes().to_vec()),
    };
    // uncompressed SEC1 point: 0x04 || X || Y
    let x = point_bytes[1..1 + encoded_len].to_vec();
    let y = point_bytes[1 + encoded_len..1 + 2 * encoded_len].to_vec();
    header.epk = Some(EphemeralPublicKey {
        crv,
        x: jose_core_b64::B64Bytes::new(x),
        y: jose_core_b64::B64Bytes::new(y),
    });
}

fn read_epk(header: &JweHeader) -> Result<ecdh::EcdhPublicKey, KeyWrapError> {
    let epk = header.epk.as_ref().ok_or(KeyWrapError::MissingEphemeralKey)?;
    let mut point = Vec::with_capacity(1 + epk.x.as_ref().len() + epk.y.as_ref().len());
    point.push(0x04);
    point.extend_from_slice(epk.x.as_ref());
    point.extend_from_slice(epk.y.as_ref());
    match epk.crv {
        EcCurve::P256 => p256::PublicKey::from_sec1_bytes(&point)
            .map(ecdh::EcdhPublicKey::P256)
            .map_err(|_| KeyWrapError::Crypto),
        EcCurve::P384 => p384::PublicKey::from_sec1_bytes(&point)
            .map(ecdh::EcdhPublicKey::P384)
            .map_err(|_| KeyWrapError::Crypto),
        EcCurve::P521 => p521::PublicKey::from_sec1_bytes(&point)
            .map(ecdh::EcdhPublicKey::P521)
            .map_err(|_| KeyWrapError::Crypto),
    }
}

fn other_info(header: &JweHeader, algorithm_id: &str, key_data_bits: u32) -> Vec<u8> {
    let apu = header.apu.as_ref().map(|b| b.as_ref()).unwrap_or(&[]);
    let apv = header.apv.as_ref().map(|b| b.as_ref()).unwrap_or(&[]);
    ecdh::other_info(algorithm_id, apu, apv, key_data_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jose_core_b64::B64Secret;
    use jose_core_jwk::{Ec, Key, Oct};

    fn oct_jwk(bytes: Vec<u8>) -> Jwk {
        Jwk::new(Key::Oct(Oct { k: B64Secret::new(bytes) }))
    }

    #[test]
    fn dir_uses_the_key_as_is() {
        let jwk = oct_jwk(vec![7u8; 32]);
        let mut header = JweHeader::new(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm);
        let (cek, encrypted_key) = wrap(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm, &jwk, &mut header).unwrap();
        assert_eq!(cek, vec![7u8; 32]);
        assert!(encrypted_key.is_empty());
        let recovered = unwrap(KeyManagementAlgorithm::Dir, EncryptionAlgorithm::Aes256Gcm, &jwk, &header, &encrypted_key).unwrap();
        assert_eq!(recovered, cek);
    }

    #[test]
    fn a128kw_round_trips() {
        let jwk = oct_jwk(vec![0x11u8; 16]);
        let mut header = JweHeader::new(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256);
        let (cek, wrapped) = wrap(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256, &jwk, &mut header).unwrap();
        assert_eq!(wrapped.len(), cek.len() + 8);
        let recovered = unwrap(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256, &jwk, &header, &wrapped).unwrap();
        assert_eq!(recovered, cek);
    }

    #[test]
    fn a128gcmkw_round_trips_and_populates_header() {
        let jwk = oct_jwk(vec![0x22u8; 16]);
        let mut header = JweHeader::new(KeyManagementAlgorithm::Aes128GcmKw, EncryptionAlgorithm::Aes128Gcm);
        let (cek, wrapped) = wrap(KeyManagementAlgorithm::Aes128GcmKw, EncryptionAlgorithm::Aes128Gcm, &jwk, &mut header).unwrap();
        assert!(header.gcm_kw_iv_tag().is_some());
        let recovered = unwrap(KeyManagementAlgorithm::Aes128GcmKw, EncryptionAlgorithm::Aes128Gcm, &jwk, &header, &wrapped).unwrap();
        assert_eq!(recovered, cek);
    }

    #[test]
    fn rsa_oaep_256_round_trips() {
        let privkey = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        let pubkey = rsa::RsaPublicKey::from(&privkey);
        let priv_jwk = Jwk::new(Key::Rsa(jose_core_jwk::Rsa {
            n: jose_core_b64::B64Bytes::new(pubkey.n().to_bytes_be()),
            e: jose_core_b64::B64Bytes::new(pubkey.e().to_bytes_be()),
            d: Some(B64Secret::new(privkey.d().to_bytes_be())),
            p: Some(B64Secret::new(privkey.primes()[0].to_bytes_be())),
            q: Some(B64Secret::new(privkey.primes()[1].to_bytes_be())),
            dp: None,
            dq: None,
            qi: None,
            oth: Vec::new(),
        }));
        let pub_jwk = Jwk::new(Key::Rsa(jose_core_jwk::Rsa {
            n: jose_core_b64::B64Bytes::new(pubkey.n().to_bytes_be()),
            e: jose_core_b64::B64Bytes::new(pubkey.e().to_bytes_be()),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
            oth: Vec::new(),
        }));
        let mut header = JweHeader::new(KeyManagementAlgorithm::RsaOaep256, EncryptionAlgorithm::Aes256Gcm);
        let (cek, wrapped) = wrap(KeyManagementAlgorithm::RsaOaep256, EncryptionAlgorithm::Aes256Gcm, &pub_jwk, &mut header).unwrap();
        let recovered = unwrap(KeyManagementAlgorithm::RsaOaep256, EncryptionAlgorithm::Aes256Gcm, &priv_jwk, &header, &wrapped).unwrap();
        assert_eq!(recovered, cek);
    }

    #[test]
    fn ecdh_es_direct_agreement_round_trips() {
        let recipient_priv = p256::SecretKey::random(&mut rand::thread_rng());
        let recipient_pub = recipient_priv.public_key();
        use p256::elliptic_curve::sec1::ToEncodedPoint;
        let point = recipient_pub.to_encoded_point(false);
        let pub_jwk = Jwk::new(Key::Ec(Ec {
            crv: jose_core_jwa::EcCurve::P256,
            x: jose_core_b64::B64Bytes::new(point.x().unwrap().to_vec()),
            y: jose_core_b64::B64Bytes::new(point.y().unwrap().to_vec()),
            d: None,
        }));
        let priv_jwk = Jwk::new(Key::Ec(Ec {
            crv: jose_core_jwa::EcCurve::P256,
            x: jose_core_b64::B64Bytes::new(point.x().unwrap().to_vec()),
            y: jose_core_b64::B64Bytes::new(point.y().unwrap().to_vec()),
            d: Some(B64Secret::new(recipient_priv.to_bytes().to_vec())),
        }));

        let mut header = JweHeader::new(KeyManagementAlgorithm::EcdhEs, EncryptionAlgorithm::Aes256Gcm);
        let (cek, encrypted_key) = wrap(KeyManagementAlgorithm::EcdhEs, EncryptionAlgorithm::Aes256Gcm, &pub_jwk, &mut header).unwrap();
        assert!(encrypted_key.is_empty());
        assert!(header.epk.is_some());
        let recovered = unwrap(KeyManagementAlgorithm::EcdhEs, EncryptionAlgorithm::Aes256Gcm, &priv_jwk, &header, &encrypted_key).unwrap();
        assert_eq!(recovered, cek);
    }

    #[test]
    fn wrong_oct_key_fails_a128kw_unwrap() {
        let jwk = oct_jwk(vec![0x11u8; 16]);
        let wrong_jwk = oct_jwk(vec![0x99u8; 16]);
        let mut header = JweHeader::new(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256);
        let (_cek, wrapped) = wrap(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256, &jwk, &mut header).unwrap();
        assert_eq!(
            unwrap(KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHs256, &wrong_jwk, &header, &wrapped),
            Err(KeyWrapError::Crypto)
        );
    }
}
