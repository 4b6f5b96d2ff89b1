//! MD5 digest value type
//!
//! Digests are stored as their raw 16-byte representation rather than as hex
//! strings. Equality is therefore byte-wise, which makes the hex case used in
//! a manifest insignificant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ManifestError, ManifestResult};

/// A 16-byte MD5 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Md5Digest([u8; 16]);

impl Md5Digest {
    /// Parse a digest from a 32-character hex string (case insensitive)
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidDigest` if the string is not a valid
    /// MD5 hex representation.
    pub fn from_hex(hex: &str) -> ManifestResult<Self> {
        if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ManifestError::InvalidDigest {
                value: hex.to_string(),
            });
        }

        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &hex[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| ManifestError::InvalidDigest {
                value: hex.to_string(),
            })?;
        }

        Ok(Md5Digest(bytes))
    }

    /// Lowercase 32-character hex representation
    pub fn to_hex(&self) -> String {
        use std::fmt::Write;
        self.0.iter().fold(String::with_capacity(32), |mut acc, b| {
            let _ = write!(&mut acc, "{:02x}", b);
            acc
        })
    }

    /// Construct from a raw 16-byte array
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Md5Digest(bytes)
    }

    /// Raw byte representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Md5Digest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Serialized as a hex string for manifest compatibility
impl Serialize for Md5Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Md5Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
