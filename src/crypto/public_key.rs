//! Multi-algorithm public keys and the account identities derived from them.

use crate::crypto::{pem, KeyAlgorithm, SECP256K1_CONTEXT};
use crate::encoding::{blake2b256, checksummed_hex};
use crate::error::{Result, SdkError};
use crate::key::AccountHash;
use ed25519_dalek::Verifier;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// An immutable public key tagged with its signature algorithm.
///
/// The raw byte width always matches the algorithm's registered key length;
/// every constructor validates it, so the invariant holds for the lifetime
/// of the value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Builds a key from raw curve bytes of a known algorithm.
    pub fn from_raw_bytes(bytes: &[u8], algorithm: KeyAlgorithm) -> Result<Self> {
        if bytes.len() != algorithm.key_length() {
            return Err(SdkError::InvalidLength {
                expected: algorithm.key_length(),
                actual: bytes.len(),
            });
        }
        Ok(PublicKey {
            algorithm,
            bytes: bytes.to_vec(),
        })
    }

    /// Builds a key from its tagged binary form: algorithm tag byte followed
    /// by the raw key. The binary form carries no checksum.
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

    /// Parses the account hex form: two tag characters followed by the raw
    /// key in hex.
    ///
    /// A mixed-case string is treated as checksummed and must validate; a
    /// same-case string is the accepted legacy form and is not checked.
    pub fn from_hex(input: &str) -> Result<Self> {
        let plausible = KeyAlgorithm::ALL
            .iter()
            .any(|algorithm| input.len() == 2 + 2 * algorithm.key_length());
        if !plausible {
            return Err(SdkError::InvalidFormat(format!(
                "account hex must be an algorithm tag plus key body, got {} characters",
                input.len()
            )));
        }
        let bytes = checksummed_hex::decode(input)?;
        let algorithm = KeyAlgorithm::from_tag(bytes[0])?;
        if input.len() != 2 + 2 * algorithm.key_length() {
            return Err(SdkError::InvalidFormat(format!(
                "{algorithm} account hex must be {} characters, got {}",
                2 + 2 * algorithm.key_length(),
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
        Ok(PublicKey {
            algorithm,
            bytes: bytes[1..].to_vec(),
        })
    }

    /// Loads a public key from a PEM file.
    pub fn from_pem<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)?;
        let der = pem::dearmor(pem::PUBLIC_KEY_LABEL, &text)?;
        let (algorithm, raw) = pem::spki_decode(&der)?;
        debug!(path = %path.as_ref().display(), %algorithm, "loaded public key from PEM");
        Self::from_raw_bytes(&raw, algorithm)
    }

    /// Writes the public key to a PEM file.
    pub fn write_pem<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let der = pem::spki_encode(self.algorithm, &self.bytes);
        fs::write(&path, pem::armor(pem::PUBLIC_KEY_LABEL, &der))?;
        debug!(path = %path.as_ref().display(), algorithm = %self.algorithm, "wrote public key PEM");
        Ok(())
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// The raw curve bytes without the algorithm tag.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Tag byte followed by the raw key: the canonical form used for
    /// hashing and binary serialization.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.bytes.len());
        out.push(self.algorithm.tag());
        out.extend_from_slice(&self.bytes);
        out
    }

    /// The canonical checksummed account hex: two plain tag digits followed
    /// by the key body, whose letter case carries the checksum.
    pub fn to_hex(&self) -> String {
        format!(
            "{:02x}{}",
            self.algorithm.tag(),
            checksummed_hex::encode(&self.bytes)
        )
    }

    /// Derives the 32-byte account hash identifying this key's account in
    /// global state: `blake2b256(lowercase(name) || 0x00 || raw_bytes)`.
    pub fn account_hash(&self) -> AccountHash {
        let name = self.algorithm.name().as_bytes();
        let mut preimage = Vec::with_capacity(name.len() + 1 + self.bytes.len());
        preimage.extend_from_slice(name);
        preimage.push(0);
        preimage.extend_from_slice(&self.bytes);
        AccountHash::new(blake2b256(&preimage))
    }

    /// Verifies `signature` over `message`.
    ///
    /// A signature of the wrong width for this algorithm is a structural
    /// error; a well-formed signature that simply does not verify yields
    /// `Ok(false)`.
    pub fn verify_signature(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        let expected = self.algorithm.signature_length();
        if signature.len() != expected {
            return Err(SdkError::InvalidLength {
                expected,
                actual: signature.len(),
            });
        }
        match self.algorithm {
            KeyAlgorithm::Ed25519 => {
                let raw: &[u8; 32] =
                    self.bytes
                        .as_slice()
                        .try_into()
                        .map_err(|_| SdkError::InvalidLength {
                            expected: 32,
                            actual: self.bytes.len(),
                        })?;
                let key = ed25519_dalek::VerifyingKey::from_bytes(raw).map_err(|err| {
                    SdkError::InvalidFormat(format!("invalid ed25519 public key: {err}"))
                })?;
                let sig_bytes: &[u8; 64] =
                    signature
                        .try_into()
                        .map_err(|_| SdkError::InvalidLength {
                            expected: 64,
                            actual: signature.len(),
                        })?;
                let sig = ed25519_dalek::Signature::from_bytes(sig_bytes);
                Ok(key.verify(message, &sig).is_ok())
            }
            KeyAlgorithm::Secp256k1 => {
                let key = secp256k1::PublicKey::from_slice(&self.bytes).map_err(|err| {
                    SdkError::InvalidFormat(format!("invalid secp256k1 public key: {err}"))
                })?;
                let digest = Sha256::digest(message);
                let msg = secp256k1::Message::from_digest_slice(&digest).map_err(|err| {
                    SdkError::InvalidFormat(format!("failed to build message digest: {err}"))
                })?;
                // A 64-byte blob that is not a valid compact signature is a
                // semantic negative, not a structural error.
                let sig = match secp256k1::ecdsa::Signature::from_compact(signature) {
                    Ok(sig) => sig,
                    Err(_) => return Ok(false),
                };
                Ok(SECP256K1_CONTEXT.verify_ecdsa(&msg, &sig, &key).is_ok())
            }
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = SdkError;

    fn from_str(input: &str) -> Result<Self> {
        Self::from_hex(input)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        PublicKey::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
