//! Global state keys: tagged, fixed-format addresses into the state tree.

pub mod access_rights;
pub mod account_hash;
pub mod uref;

pub use access_rights::AccessRights;
pub use account_hash::{AccountHash, ACCOUNT_HASH_LENGTH, ACCOUNT_HASH_PREFIX};
pub use uref::{URef, UREF_ADDR_LENGTH, UREF_PREFIX, UREF_SERIALIZED_LENGTH};

use crate::error::{Result, SdkError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 32-byte address payload shared by the hash-shaped variants.
pub type HashAddr = [u8; 32];

const ACCOUNT_TAG: u8 = 0x00;
const HASH_TAG: u8 = 0x01;
const UREF_TAG: u8 = 0x02;
const TRANSFER_TAG: u8 = 0x03;
const DEPLOY_INFO_TAG: u8 = 0x04;
const ERA_INFO_TAG: u8 = 0x05;
const BALANCE_TAG: u8 = 0x06;
const BID_TAG: u8 = 0x07;
const WITHDRAW_TAG: u8 = 0x08;
const DICTIONARY_TAG: u8 = 0x09;

const HASH_PREFIX: &str = "hash-";
const TRANSFER_PREFIX: &str = "transfer-";
const DEPLOY_INFO_PREFIX: &str = "deploy-";
const ERA_INFO_PREFIX: &str = "era-";
const BALANCE_PREFIX: &str = "balance-";
const BID_PREFIX: &str = "bid-";
const WITHDRAW_PREFIX: &str = "withdraw-";
const DICTIONARY_PREFIX: &str = "dictionary-";

/// An address of an entity stored in the chain's global state.
///
/// Each variant owns a one-byte discriminant, a fixed binary length, and a
/// canonical text prefix. Binary and text round-trips reproduce the value
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An account, addressed by the blake2b hash of its public key.
    Account(AccountHash),
    /// A stored contract.
    Hash(HashAddr),
    /// An unforgeable reference to a stored value.
    URef(URef),
    /// A completed transfer record.
    Transfer(HashAddr),
    /// Execution results of a deploy.
    DeployInfo(HashAddr),
    /// Auction information for one era.
    EraInfo(u64),
    /// A purse balance.
    Balance(HashAddr),
    /// An auction bid.
    Bid(AccountHash),
    /// An unbonding withdraw record.
    Withdraw(AccountHash),
    /// A dictionary entry.
    Dictionary(HashAddr),
}

impl Key {
    /// The discriminant byte leading the binary form.
    pub fn tag(&self) -> u8 {
        match self {
            Key::Account(_) => ACCOUNT_TAG,
            Key::Hash(_) => HASH_TAG,
            Key::URef(_) => UREF_TAG,
            Key::Transfer(_) => TRANSFER_TAG,
            Key::DeployInfo(_) => DEPLOY_INFO_TAG,
            Key::EraInfo(_) => ERA_INFO_TAG,
            Key::Balance(_) => BALANCE_TAG,
            Key::Bid(_) => BID_TAG,
            Key::Withdraw(_) => WITHDRAW_TAG,
            Key::Dictionary(_) => DICTIONARY_TAG,
        }
    }

    /// Total binary length (discriminant included) of this key.
    pub fn serialized_length(&self) -> usize {
        match self {
            Key::URef(_) => 1 + UREF_SERIALIZED_LENGTH,
            Key::EraInfo(_) => 1 + 8,
            _ => 1 + 32,
        }
    }

    /// Total binary length for a discriminant byte, without consuming it.
    ///
    /// This is what lets a stream reader peek one byte and know exactly how
    /// many bytes the whole key occupies.
    pub fn serialized_length_for_tag(tag: u8) -> Result<usize> {
        match tag {
            UREF_TAG => Ok(1 + UREF_SERIALIZED_LENGTH),
            ERA_INFO_TAG => Ok(1 + 8),
            ACCOUNT_TAG | HASH_TAG | TRANSFER_TAG | DEPLOY_INFO_TAG | BALANCE_TAG | BID_TAG
            | WITHDRAW_TAG | DICTIONARY_TAG => Ok(1 + 32),
            other => Err(SdkError::UnknownKeyVariant(other)),
        }
    }

    /// Decodes a key from its full binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (tag, payload) = bytes
            .split_first()
            .ok_or(SdkError::UnexpectedEndOfInput {
                needed: 1,
                remaining: 0,
            })?;
        let expected = Self::serialized_length_for_tag(*tag)?;
        if bytes.len() != expected {
            return Err(SdkError::InvalidLength {
                expected,
                actual: bytes.len(),
            });
        }
        let key = match *tag {
            ACCOUNT_TAG => Key::Account(AccountHash::from_slice(payload)?),
            HASH_TAG => Key::Hash(hash_addr(payload)),
            UREF_TAG => {
                let mut address = [0u8; UREF_ADDR_LENGTH];
                address.copy_from_slice(&payload[..UREF_ADDR_LENGTH]);
                let access_rights = AccessRights::from_bits(payload[UREF_ADDR_LENGTH])?;
                Key::URef(URef::new(address, access_rights))
            }
            TRANSFER_TAG => Key::Transfer(hash_addr(payload)),
            DEPLOY_INFO_TAG => Key::DeployInfo(hash_addr(payload)),
            ERA_INFO_TAG => {
                let mut id = [0u8; 8];
                id.copy_from_slice(payload);
                Key::EraInfo(u64::from_le_bytes(id))
            }
            BALANCE_TAG => Key::Balance(hash_addr(payload)),
            BID_TAG => Key::Bid(AccountHash::from_slice(payload)?),
            WITHDRAW_TAG => Key::Withdraw(AccountHash::from_slice(payload)?),
            DICTIONARY_TAG => Key::Dictionary(hash_addr(payload)),
            other => return Err(SdkError::UnknownKeyVariant(other)),
        };
        Ok(key)
    }

    /// Encodes the key as discriminant byte followed by its payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_length());
        out.push(self.tag());
        match self {
            Key::Account(hash) | Key::Bid(hash) | Key::Withdraw(hash) => {
                out.extend_from_slice(hash.as_bytes());
            }
            Key::Hash(addr)
            | Key::Transfer(addr)
            | Key::DeployInfo(addr)
            | Key::Balance(addr)
            | Key::Dictionary(addr) => {
                out.extend_from_slice(addr);
            }
            Key::URef(uref) => {
                out.extend_from_slice(&uref.address());
                out.push(uref.access_rights().bits());
            }
            Key::EraInfo(id) => {
                out.extend_from_slice(&id.to_le_bytes());
            }
        }
        out
    }

    /// Parses a key from its prefixed text form.
    pub fn from_formatted_str(input: &str) -> Result<Self> {
        if let Some(rest) = input.strip_prefix(ACCOUNT_HASH_PREFIX) {
            Ok(Key::Account(AccountHash::from_slice(&formatted_payload(
                rest, "account hash",
            )?)?))
        } else if input.starts_with(UREF_PREFIX) {
            Ok(Key::URef(URef::from_formatted_str(input)?))
        } else if let Some(rest) = input.strip_prefix(TRANSFER_PREFIX) {
            Ok(Key::Transfer(formatted_payload(rest, "transfer address")?))
        } else if let Some(rest) = input.strip_prefix(DEPLOY_INFO_PREFIX) {
            Ok(Key::DeployInfo(formatted_payload(rest, "deploy hash")?))
        } else if let Some(rest) = input.strip_prefix(ERA_INFO_PREFIX) {
            let id: u64 = rest.parse().map_err(|err| {
                SdkError::InvalidFormat(format!("invalid era id `{rest}`: {err}"))
            })?;
            Ok(Key::EraInfo(id))
        } else if let Some(rest) = input.strip_prefix(BALANCE_PREFIX) {
            Ok(Key::Balance(formatted_payload(rest, "balance address")?))
        } else if let Some(rest) = input.strip_prefix(BID_PREFIX) {
            Ok(Key::Bid(AccountHash::from_slice(&formatted_payload(
                rest, "bid account hash",
            )?)?))
        } else if let Some(rest) = input.strip_prefix(WITHDRAW_PREFIX) {
            Ok(Key::Withdraw(AccountHash::from_slice(&formatted_payload(
                rest,
                "withdraw account hash",
            )?)?))
        } else if let Some(rest) = input.strip_prefix(DICTIONARY_PREFIX) {
            Ok(Key::Dictionary(formatted_payload(rest, "dictionary address")?))
        } else if let Some(rest) = input.strip_prefix(HASH_PREFIX) {
            Ok(Key::Hash(formatted_payload(rest, "contract hash")?))
        } else {
            Err(SdkError::InvalidFormat(format!(
                "`{input}` does not start with a known key prefix"
            )))
        }
    }

    /// Renders the prefixed text form, always lowercase hex; URef keys always
    /// carry their access-rights suffix.
    pub fn to_formatted_string(&self) -> String {
        match self {
            Key::Account(hash) => hash.to_formatted_string(),
            Key::Hash(addr) => format!("{}{}", HASH_PREFIX, hex::encode(addr)),
            Key::URef(uref) => uref.to_formatted_string(),
            Key::Transfer(addr) => format!("{}{}", TRANSFER_PREFIX, hex::encode(addr)),
            Key::DeployInfo(addr) => format!("{}{}", DEPLOY_INFO_PREFIX, hex::encode(addr)),
            Key::EraInfo(id) => format!("{ERA_INFO_PREFIX}{id}"),
            Key::Balance(addr) => format!("{}{}", BALANCE_PREFIX, hex::encode(addr)),
            Key::Bid(hash) => format!("{}{}", BID_PREFIX, hex::encode(hash.as_bytes())),
            Key::Withdraw(hash) => format!("{}{}", WITHDRAW_PREFIX, hex::encode(hash.as_bytes())),
            Key::Dictionary(addr) => format!("{}{}", DICTIONARY_PREFIX, hex::encode(addr)),
        }
    }
}

fn hash_addr(payload: &[u8]) -> HashAddr {
    let mut addr = [0u8; 32];
    addr.copy_from_slice(payload);
    addr
}

/// Decodes a formatted key's hex payload, requiring exactly 32 bytes.
fn formatted_payload(rest: &str, what: &str) -> Result<HashAddr> {
    let bytes = hex::decode(rest)
        .map_err(|err| SdkError::InvalidFormat(format!("invalid {what} hex: {err}")))?;
    bytes.as_slice().try_into().map_err(|_| {
        SdkError::InvalidFormat(format!("{what} must be 32 bytes, got {}", bytes.len()))
    })
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formatted_string())
    }
}

impl FromStr for Key {
    type Err = SdkError;

    fn from_str(input: &str) -> Result<Self> {
        Self::from_formatted_str(input)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Key::from_formatted_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_keys() -> Vec<Key> {
        vec![
            Key::Account(AccountHash::new([0x11; 32])),
            Key::Hash([0x22; 32]),
            Key::URef(URef::new([0x33; 32], AccessRights::ReadAddWrite)),
            Key::Transfer([0x44; 32]),
            Key::DeployInfo([0x55; 32]),
            Key::EraInfo(441),
            Key::Balance([0x66; 32]),
            Key::Bid(AccountHash::new([0x77; 32])),
            Key::Withdraw(AccountHash::new([0x88; 32])),
            Key::Dictionary([0x99; 32]),
        ]
    }

    #[test]
    fn binary_lengths_match_the_wire_table() {
        for key in sample_keys() {
            let expected = match key {
                Key::URef(_) => 34,
                Key::EraInfo(_) => 9,
                _ => 33,
            };
            assert_eq!(key.to_bytes().len(), expected, "{key}");
            assert_eq!(key.serialized_length(), expected);
        }
    }

    #[test]
    fn binary_round_trip_is_exact() {
        for key in sample_keys() {
            let bytes = key.to_bytes();
            let decoded = Key::from_bytes(&bytes).unwrap();
            assert_eq!(decoded, key);
            assert_eq!(decoded.to_bytes(), bytes);
        }
    }

    #[test]
    fn formatted_round_trip_is_exact() {
        for key in sample_keys() {
            let text = key.to_formatted_string();
            assert_eq!(Key::from_formatted_str(&text).unwrap(), key, "{text}");
        }
    }

    #[test]
    fn era_info_uses_little_endian_id() {
        let bytes = Key::EraInfo(0x0102030405060708).to_bytes();
        assert_eq!(bytes[0], 0x05);
        assert_eq!(
            &bytes[1..],
            &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn era_info_text_is_decimal() {
        assert_eq!(Key::EraInfo(441).to_formatted_string(), "era-441");
        assert_eq!(
            Key::from_formatted_str("era-441").unwrap(),
            Key::EraInfo(441)
        );
        assert!(Key::from_formatted_str("era-0x1b9").is_err());
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        let mut bytes = vec![0x0a];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            Key::from_bytes(&bytes),
            Err(SdkError::UnknownKeyVariant(0x0a))
        ));
    }

    #[test]
    fn wrong_payload_length_is_rejected() {
        let mut bytes = vec![HASH_TAG];
        bytes.extend_from_slice(&[0u8; 31]);
        assert!(matches!(
            Key::from_bytes(&bytes),
            Err(SdkError::InvalidLength {
                expected: 33,
                actual: 32
            })
        ));

        let mut bytes = vec![ERA_INFO_TAG];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            Key::from_bytes(&bytes),
            Err(SdkError::InvalidLength {
                expected: 9,
                actual: 33
            })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            Key::from_bytes(&[]),
            Err(SdkError::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn account_prefix_wins_over_hash_prefix() {
        let text = format!("account-hash-{}", hex::encode([0xab; 32]));
        assert!(matches!(
            Key::from_formatted_str(&text).unwrap(),
            Key::Account(_)
        ));
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        assert!(matches!(
            Key::from_formatted_str("purse-0000"),
            Err(SdkError::InvalidFormat(_))
        ));
    }

    #[test]
    fn serde_uses_the_formatted_string() {
        let key = Key::URef(URef::new([0x33; 32], AccessRights::Read));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.to_formatted_string()));
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
