//! Algorithm-tagged signature values.
//!
//! Mirrors [`PublicKey`](crate::crypto::PublicKey)'s construction discipline
//! with the algorithm's signature width in place of its key width. Purely a
//! value type: verification lives on the public key.

use crate::crypto::KeyAlgorithm;
use crate::encoding::checksummed_hex;
use crate::error::{Result, SdkError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An immutable signature tagged with its algorithm.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl Signature {
    /// Builds a signature from raw bytes of a known algorithm.
    pub fn from_raw_bytes(bytes: &[u8], algorithm: KeyAlgorithm) -> Result<Self> {
        if bytes.len() != algorithm.signature_length() {
            return Err(SdkError::InvalidLength {
                expected: algorithm.signature_length(),
                actual: bytes.len(),
            });
        }
        Ok(Signature {
            algorithm,
            bytes: bytes.to_vec(),
        })
    }

    /// Builds a signature from its tagged binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (tag, raw) = bytes
            .split_first()
            .ok_or(SdkError::UnexpectedEndOfInput {
                needed: 1,
                remaining: 0,
            })?;
        let algorithm = KeyAlgorithm::from_tag(*tag)?;
        Self::from_raw_bytes(raw, algorithm)
    }

    /// Parses the tagged hex form, validating a mixed-case checksum.
    pub fn from_hex(input: &str) -> Result<Self> {
        let plausible = KeyAlgorithm::ALL
            .iter()
            .any(|algorithm| input.len() == 2 + 2 * algorithm.signature_length());
        if !plausible {
            return Err(SdkError::InvalidFormat(format!(
                "signature hex must be an algorithm tag plus signature body, got {} characters",
                input.len()
            )));
        }
        let bytes = checksummed_hex::decode(input)?;
        let algorithm = KeyAlgorithm::from_tag(bytes[0])?;
        if input.len() != 2 + 2 * algorithm.signature_length() {
            return Err(SdkError::InvalidFormat(format!(
                "{algorithm} signature hex must be {} characters, got {}",
                2 + 2 * algorithm.signature_length(),
                input.len()
            )));
        }
        if !checksummed_hex::string_is_same_case(input) {
            let expected = format!(
                "{:02x}{}",
                algorithm.tag(),
                checksummed_hex::encode(&bytes[1..])
            );
            if input != expected {
                return Err(SdkError::ChecksumMismatch);
            }
        }
        Ok(Signature {
            algorithm,
            bytes: bytes[1..].to_vec(),
        })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// The raw signature bytes without the algorithm tag.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Tag byte followed by the raw signature.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.bytes.len());
        out.push(self.algorithm.tag());
        out.extend_from_slice(&self.bytes);
        out
    }

    /// Checksummed hex: two plain tag digits followed by the signature body,
    /// whose letter case carries the checksum.
    pub fn to_hex(&self) -> String {
        format!(
            "{:02x}{}",
            self.algorithm.tag(),
            checksummed_hex::encode(&self.bytes)
        )
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl FromStr for Signature {
    type Err = SdkError;

    fn from_str(input: &str) -> Result<Self> {
        Self::from_hex(input)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Signature::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_width_is_enforced() {
        assert!(Signature::from_raw_bytes(&[0u8; 64], KeyAlgorithm::Ed25519).is_ok());
        assert!(matches!(
            Signature::from_raw_bytes(&[0u8; 65], KeyAlgorithm::Secp256k1),
            Err(SdkError::InvalidLength {
                expected: 64,
                actual: 65
            })
        ));
    }

    #[test]
    fn tagged_bytes_round_trip() {
        let signature = Signature::from_raw_bytes(&[0xd1; 64], KeyAlgorithm::Secp256k1).unwrap();
        let bytes = signature.to_bytes();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0x02);
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), signature);
    }

    #[test]
    fn hex_round_trip() {
        let signature = Signature::from_raw_bytes(&[0xd1; 64], KeyAlgorithm::Ed25519).unwrap();
        let back = Signature::from_hex(&signature.to_hex()).unwrap();
        assert_eq!(back, signature);
    }

    #[test]
    fn wrong_length_hex_is_a_format_error() {
        assert!(matches!(
            Signature::from_hex("01ff"),
            Err(SdkError::InvalidFormat(_))
        ));
        assert!(matches!(
            Signature::from_hex(""),
            Err(SdkError::InvalidFormat(_))
        ));
    }

    #[test]
    fn case_flip_fails_the_checksum() {
        let signature = Signature::from_raw_bytes(&[0xab; 64], KeyAlgorithm::Ed25519).unwrap();
        let hex_form = signature.to_hex();
        let mut flips = 0;
        let flipped: String = hex_form
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() && flips < 2 {
                    flips += 1;
                    if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                } else {
                    c
                }
            })
            .collect();
        assert!(matches!(
            Signature::from_hex(&flipped),
            Err(SdkError::ChecksumMismatch)
        ));
    }
}
