//! Hex codec whose letter case embeds a self-verifying checksum.
//!
//! Each alphabetic hex digit carries one bit of a checksum drawn from the
//! blake2b digest of the encoded bytes: bit set, the digit is uppercased.
//! Decoding is case-insensitive, so plain lowercase (or uppercase) strings
//! from older tooling remain accepted; a mixed-case string must reproduce the
//! exact case pattern or it is rejected by the consuming factory.

use crate::error::{Result, SdkError};

/// Inputs longer than this many bytes are not checksummed; `encode` falls
/// back to plain lowercase hex for them.
const SMALL_BYTES_COUNT: usize = 75;

/// Width of the blake2b digest the checksum bits are drawn from.
const CHECKSUM_DIGEST_LENGTH: usize = 64;

/// Splits bytes into nibbles, high nibble first.
fn bytes_to_nibbles(input: &[u8]) -> impl Iterator<Item = u8> + '_ {
    input.iter().flat_map(|byte| [byte >> 4, byte & 0x0f])
}

/// Cycles over the digest bits, least significant bit of each byte first.
fn hash_bits_cycle(hash: Vec<u8>) -> impl Iterator<Item = bool> {
    hash.into_iter()
        .cycle()
        .flat_map(|byte| (0..8usize).map(move |offset| (byte >> offset) & 0x01 == 0x01))
}

/// Encodes `input` as checksummed hex.
///
/// One checksum bit is consumed per alphabetic digit; numeric digits pass
/// through untouched so the output decodes as ordinary hex.
pub fn encode(input: &[u8]) -> String {
    if input.len() > SMALL_BYTES_COUNT {
        return hex::encode(input);
    }
    let digest = blake2_rfc::blake2b::blake2b(CHECKSUM_DIGEST_LENGTH, &[], input);
    let mut hash_bits = hash_bits_cycle(digest.as_bytes().to_vec());
    bytes_to_nibbles(input)
        .map(|nibble| {
            let c = char::from_digit(u32::from(nibble), 16).unwrap_or('0');
            if c.is_ascii_alphabetic() && hash_bits.next().unwrap_or(false) {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// Decodes a hex string, ignoring the checksum case pattern.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    hex::decode(input).map_err(|err| SdkError::InvalidFormat(format!("invalid hex: {err}")))
}

/// Returns `true` when `input` contains no mixed-case hex digits.
///
/// Such strings are defined as unchecksummed and always validate.
pub fn string_is_same_case(input: &str) -> bool {
    let has_upper = input.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = input.chars().any(|c| c.is_ascii_lowercase());
    !(has_upper && has_lower)
}

/// Validates the case-pattern checksum of a hex string.
///
/// All-lowercase and all-uppercase strings always validate; a mixed-case
/// string must be byte-for-byte identical to re-encoding its decoded bytes.
/// Undecodable input validates as `false`.
pub fn is_valid_checksum(input: &str) -> bool {
    if string_is_same_case(input) {
        return true;
    }
    match decode(input) {
        Ok(bytes) => encode(&bytes) == input,
        Err(_) => false,
    }
}
