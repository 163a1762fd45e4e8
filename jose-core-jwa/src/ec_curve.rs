use serde::{Deserialize, Serialize};

/// NIST elliptic curve identifier for the JWK `crv` parameter (RFC 7518
/// §6.2.1.1) and ECDH-ES ephemeral public keys (`epk.crv`).
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcCurve {
    /// P-256 (secp256r1).
    #[serde(rename = "P-256")]
    P256,
    /// P-384 (secp384r1).
    #[serde(rename = "P-384")]
    P384,
    /// P-521 (secp521r1).
    #[serde(rename = "P-521")]
    P521,
}

impl EcCurve {
    /// Coordinate field element size in bytes (`x`/`y`/`d` encoding
    /// length), per SEC1: `ceil(curve bits / 8)`.
    pub const fn coordinate_len(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// The signature algorithm conventionally paired with this curve.
    pub const fn signature_algorithm(self) -> crate::SignatureAlgorithm {
        match self {
            EcCurve::P256 => crate::SignatureAlgorithm::Es256,
            EcCurve::P384 => crate::SignatureAlgorithm::Es384,
            EcCurve::P521 => crate::SignatureAlgorithm::Es512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p521_coordinate_is_66_bytes() {
        assert_eq!(EcCurve::P521.coordinate_len(), 66);
    }
}
