use serde::{Deserialize, Serialize};

/// Possible key types, as defined in [RFC7518] section 6.1. Used for the
/// JWK `kty` parameter.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// Elliptic Curve (NIST DSS, Recommended+)
    Ec,
    /// RSA (RFC3447, Required)
    Rsa,
    /// Octet sequence, used to represent symmetric keys (Required)
    #[serde(rename = "oct")]
    Oct,
}
