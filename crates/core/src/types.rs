use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of a contract script hash in bytes
pub const SCRIPT_HASH_SIZE: usize = 20;

/// Contract script hash
///
/// Bytes are kept in VM order. The textual form is the conventional
/// little-endian display string (`0x` followed by the bytes reversed), which is
/// what nodes, `neoxp` and the config file use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ScriptHash([u8; SCRIPT_HASH_SIZE]);

impl ScriptHash {
    /// The all-zero hash, used when generating an SDK for an undeployed contract
    pub const ZERO: ScriptHash = ScriptHash([0u8; SCRIPT_HASH_SIZE]);

    /// Create a script hash from bytes in VM order
    pub fn from_bytes(bytes: [u8; SCRIPT_HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse the display form, with or without the `0x` prefix
    pub fn from_str_le(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.len() != SCRIPT_HASH_SIZE * 2 {
            return Err(Error::parse(format!(
                "script hash '{}' must be {} hex characters",
                s,
                SCRIPT_HASH_SIZE * 2
            )));
        }

        let decoded = hex::decode(hex_part)
            .map_err(|e| Error::parse(format!("invalid script hash '{}': {}", s, e)))?;

        let mut bytes = [0u8; SCRIPT_HASH_SIZE];
        for (dst, src) in bytes.iter_mut().zip(decoded.iter().rev()) {
            *dst = *src;
        }
        Ok(Self(bytes))
    }

    /// Display form without the `0x` prefix
    pub fn to_string_le(&self) -> String {
        let reversed: Vec<u8> = self.0.iter().rev().copied().collect();
        hex::encode(reversed)
    }

    /// Bytes in VM order
    pub fn as_bytes(&self) -> &[u8; SCRIPT_HASH_SIZE] {
        &self.0
    }

    /// Whether this is the all-zero hash
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_string_le())
    }
}

impl FromStr for ScriptHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_le(s)
    }
}

impl Serialize for ScriptHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ScriptHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ScriptHash::from_str_le(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEO_TOKEN: &str = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";

    #[test]
    fn test_display_round_trip() {
        let hash: ScriptHash = NEO_TOKEN.parse().unwrap();
        assert_eq!(hash.to_string(), NEO_TOKEN);
        assert_eq!(hash.to_string_le(), &NEO_TOKEN[2..]);
    }

    #[test]
    fn test_prefix_is_optional() {
        let with: ScriptHash = NEO_TOKEN.parse().unwrap();
        let without: ScriptHash = NEO_TOKEN[2..].parse().unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_bytes_are_reversed_display() {
        let hash: ScriptHash = NEO_TOKEN.parse().unwrap();
        assert_eq!(hash.as_bytes()[0], 0xf5);
        assert_eq!(hash.as_bytes()[19], 0xef);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ScriptHash::from_str_le("0x1234").is_err());
        assert!(ScriptHash::from_str_le("zz4073a0f2b305a38ec4050e4d3d28bc40ea63f5").is_err());
    }

    #[test]
    fn test_zero_hash() {
        assert!(ScriptHash::ZERO.is_zero());
        assert_eq!(
            ScriptHash::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_serde_uses_display_form() {
        let hash: ScriptHash = NEO_TOKEN.parse().unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", NEO_TOKEN));
        let back: ScriptHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
