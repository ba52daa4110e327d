use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClaimError, Result};

/// EVM wallet address, stored lowercase so identity is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse a `0x`-prefixed, 20-byte hex address in any letter case.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ClaimError::AddressParsing(format!("missing 0x prefix: {raw}")))?;

        if hex_part.len() != 40 {
            return Err(ClaimError::AddressParsing(format!(
                "expected 40 hex chars, got {}: {raw}",
                hex_part.len()
            )));
        }
        hex::decode(hex_part)
            .map_err(|e| ClaimError::AddressParsing(format!("invalid hex in {raw}: {e}")))?;

        Ok(Self(format!("0x{}", hex_part.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw string from an API payload.
    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }

    /// `0x1234…abcd` form for log lines and prompts.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let upper = WalletAddress::parse("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266").unwrap();
        let lower = WalletAddress::parse("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        assert_eq!(upper, lower);
        assert!(upper.matches("0xF39fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(WalletAddress::parse("f39fd6e51aad88f6f4ce6ab8827279cfffb92266").is_err());
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse("0xzz9fd6e51aad88f6f4ce6ab8827279cfffb92266").is_err());
    }

    #[test]
    fn test_short_form() {
        let addr = WalletAddress::parse("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        assert_eq!(addr.short(), "0xf39f…2266");
    }

    #[test]
    fn test_serde_round_trip_lowercases() {
        let addr: WalletAddress =
            serde_json::from_str("\"0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266\"").unwrap();
        assert_eq!(
            serde_json::to_string(&addr).unwrap(),
            "\"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266\""
        );
    }
}
