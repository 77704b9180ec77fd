//! Account hashes: the canonical 32-byte account identifier in global state.

use crate::error::{Result, SdkError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of an account hash in bytes.
pub const ACCOUNT_HASH_LENGTH: usize = 32;

/// Text prefix of a formatted account hash.
pub const ACCOUNT_HASH_PREFIX: &str = "account-hash-";

/// 32-byte blake2b digest of a public key, used as the account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountHash([u8; ACCOUNT_HASH_LENGTH]);

impl AccountHash {
    pub const fn new(digest: [u8; ACCOUNT_HASH_LENGTH]) -> Self {
        AccountHash(digest)
    }

    /// Builds an account hash from a slice, requiring exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let digest: [u8; ACCOUNT_HASH_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| SdkError::InvalidLength {
                    expected: ACCOUNT_HASH_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(AccountHash(digest))
    }

    pub const fn value(self) -> [u8; ACCOUNT_HASH_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_HASH_LENGTH] {
        &self.0
    }

    /// Renders `account-hash-<64 lowercase hex>`.
    pub fn to_formatted_string(self) -> String {
        format!("{}{}", ACCOUNT_HASH_PREFIX, hex::encode(self.0))
    }

    /// Parses the `account-hash-` text form.
    pub fn from_formatted_str(input: &str) -> Result<Self> {
        let rest = input.strip_prefix(ACCOUNT_HASH_PREFIX).ok_or_else(|| {
            SdkError::InvalidFormat(format!("account hash must start with `{ACCOUNT_HASH_PREFIX}`"))
        })?;
        let bytes = hex::decode(rest)
            .map_err(|err| SdkError::InvalidFormat(format!("invalid account hash hex: {err}")))?;
        if bytes.len() != ACCOUNT_HASH_LENGTH {
            return Err(SdkError::InvalidFormat(format!(
                "account hash must be {ACCOUNT_HASH_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountHash({})", hex::encode(self.0))
    }
}

impl FromStr for AccountHash {
    type Err = SdkError;

    fn from_str(input: &str) -> Result<Self> {
        Self::from_formatted_str(input)
    }
}

impl Serialize for AccountHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for AccountHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        AccountHash::from_formatted_str(&text).map_err(serde::de::Error::custom)
    }
}
