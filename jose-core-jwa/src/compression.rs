use core::fmt;

use serde::{Deserialize, Serialize};

/// Compression algorithm for the JWE `zip` header parameter.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// DEFLATE, RFC 1951 (raw, no zlib/gzip wrapper).
    #[serde(rename = "DEF")]
    Deflate,
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DEF")
    }
}
