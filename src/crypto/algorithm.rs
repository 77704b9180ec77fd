//! Signature algorithm registry.
//!
//! A fixed, process-wide table mapping the one-byte wire tag of each
//! supported algorithm to its curve name and raw key/signature widths.

use crate::error::{Result, SdkError};
use std::fmt;

/// Wire tag of an Ed25519 key or signature.
pub const ED25519_TAG: u8 = 0x01;
/// Wire tag of a Secp256k1 key or signature.
pub const SECP256K1_TAG: u8 = 0x02;

/// A supported signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyAlgorithm {
    Ed25519,
    Secp256k1,
}

impl KeyAlgorithm {
    /// Every registered algorithm, in tag order.
    pub const ALL: [KeyAlgorithm; 2] = [KeyAlgorithm::Ed25519, KeyAlgorithm::Secp256k1];

    /// Resolves a wire tag to its algorithm.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            ED25519_TAG => Ok(KeyAlgorithm::Ed25519),
            SECP256K1_TAG => Ok(KeyAlgorithm::Secp256k1),
            other => Err(SdkError::UnknownAlgorithm(other)),
        }
    }

    /// The one-byte wire tag.
    pub const fn tag(self) -> u8 {
        match self {
            KeyAlgorithm::Ed25519 => ED25519_TAG,
            KeyAlgorithm::Secp256k1 => SECP256K1_TAG,
        }
    }

    /// Raw public key width in bytes (Secp256k1 keys are compressed).
    pub const fn key_length(self) -> usize {
        match self {
            KeyAlgorithm::Ed25519 => 32,
            KeyAlgorithm::Secp256k1 => 33,
        }
    }

    /// Raw signature width in bytes.
    pub const fn signature_length(self) -> usize {
        match self {
            KeyAlgorithm::Ed25519 => 64,
            KeyAlgorithm::Secp256k1 => 64,
        }
    }

    /// Lowercase curve name; this exact string feeds the account-hash
    /// preimage.
    pub const fn name(self) -> &'static str {
        match self {
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::Secp256k1 => "secp256k1",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
