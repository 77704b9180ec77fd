//! Canonical wire codec: an explicit-cursor reader and a mirrored writer.
//!
//! All multibyte integers are little-endian. Strings carry a 4-byte length
//! prefix, token amounts a 1-byte magnitude-length prefix. Tagged values
//! (public keys, signatures, global state keys) are decoded by peeking the
//! discriminant byte without advancing the cursor, resolving the total
//! length from it, then consuming exactly that many bytes.

use crate::crypto::{KeyAlgorithm, PublicKey, Signature};
use crate::error::{Result, SdkError};
use crate::key::{AccessRights, Key, URef, UREF_SERIALIZED_LENGTH};

/// Maximum magnitude width of a serialized token amount, in bytes.
const U512_MAX_MAGNITUDE: usize = 64;

/// Unsigned 512-bit token amount, held as a little-endian magnitude.
///
/// This is a codec carrier for on-wire amounts, not an arithmetic type:
/// values are constructed from native integers or decoded from the wire and
/// compared for equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct U512 {
    le_bytes: [u8; U512_MAX_MAGNITUDE],
}

impl Default for U512 {
    fn default() -> Self {
        U512 {
            le_bytes: [0u8; U512_MAX_MAGNITUDE],
        }
    }
}

impl U512 {
    /// The zero amount, serialized as a single `0x00` length byte.
    pub const ZERO: U512 = U512 {
        le_bytes: [0; U512_MAX_MAGNITUDE],
    };

    /// Builds an amount from a little-endian magnitude of at most 64 bytes.
    pub fn from_le_slice(magnitude: &[u8]) -> Result<Self> {
        if magnitude.len() > U512_MAX_MAGNITUDE {
            return Err(SdkError::InvalidFormat(format!(
                "token amount magnitude must be at most {U512_MAX_MAGNITUDE} bytes, got {}",
                magnitude.len()
            )));
        }
        let mut le_bytes = [0u8; U512_MAX_MAGNITUDE];
        le_bytes[..magnitude.len()].copy_from_slice(magnitude);
        Ok(U512 { le_bytes })
    }

    /// Returns the full 64-byte little-endian representation.
    pub fn to_le_bytes(self) -> [u8; U512_MAX_MAGNITUDE] {
        self.le_bytes
    }

    /// Returns the magnitude with trailing zero bytes stripped.
    pub fn significant_bytes(&self) -> &[u8] {
        let len = U512_MAX_MAGNITUDE
            - self
                .le_bytes
                .iter()
                .rev()
                .take_while(|byte| **byte == 0)
                .count();
        &self.le_bytes[..len]
    }

    /// Returns the value as a `u64` if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        if self.le_bytes[8..].iter().any(|byte| *byte != 0) {
            return None;
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&self.le_bytes[..8]);
        Some(u64::from_le_bytes(low))
    }
}

impl From<u64> for U512 {
    fn from(value: u64) -> Self {
        let mut le_bytes = [0u8; U512_MAX_MAGNITUDE];
        le_bytes[..8].copy_from_slice(&value.to_le_bytes());
        U512 { le_bytes }
    }
}

impl From<u128> for U512 {
    fn from(value: u128) -> Self {
        let mut le_bytes = [0u8; U512_MAX_MAGNITUDE];
        le_bytes[..16].copy_from_slice(&value.to_le_bytes());
        U512 { le_bytes }
    }
}

impl std::fmt::Debug for U512 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "U512(0x{})", hex::encode(self.significant_bytes()))
    }
}

/// Cursor over an ordered byte source.
///
/// Reads advance `pos`; `peek_u8` does not. Every read fails with
/// `UnexpectedEndOfInput` when fewer bytes remain than requested, leaving
/// the cursor where it was.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when the cursor has consumed the whole buffer.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without advancing the cursor.
    pub fn peek_u8(&self) -> Result<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(SdkError::UnexpectedEndOfInput {
                needed: 1,
                remaining: 0,
            })
    }

    /// Consumes exactly `count` bytes, or fails without advancing.
    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(SdkError::UnexpectedEndOfInput {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Reads `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes(fixed_bytes(bytes)))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(fixed_bytes(bytes)))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        Ok(i64::from_le_bytes(fixed_bytes(bytes)))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(fixed_bytes(bytes)))
    }

    /// Reads a 4-byte length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_u32()? as usize;
        let bytes = self.take(length)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|err| SdkError::InvalidFormat(format!("invalid utf-8 string: {err}")))
    }

    /// Reads a 1-byte length-prefixed little-endian token amount.
    pub fn read_u512(&mut self) -> Result<U512> {
        let length = self.read_u8()? as usize;
        if length > U512_MAX_MAGNITUDE {
            return Err(SdkError::InvalidFormat(format!(
                "token amount length prefix {length} exceeds {U512_MAX_MAGNITUDE}"
            )));
        }
        let magnitude = self.take(length)?;
        U512::from_le_slice(magnitude)
    }

    /// Reads a 33-byte unforgeable reference: 32-byte address plus one
    /// access-rights byte, consumed as a single unit.
    pub fn read_uref(&mut self) -> Result<URef> {
        let bytes = self.take(UREF_SERIALIZED_LENGTH)?;
        let mut address = [0u8; 32];
        address.copy_from_slice(&bytes[..32]);
        let access_rights = AccessRights::from_bits(bytes[32])?;
        Ok(URef::new(address, access_rights))
    }

    /// Reads a tagged public key: peeks the algorithm tag, then consumes
    /// exactly `1 + key_length` bytes.
    pub fn read_public_key(&mut self) -> Result<PublicKey> {
        let algorithm = KeyAlgorithm::from_tag(self.peek_u8()?)?;
        let bytes = self.take(1 + algorithm.key_length())?;
        PublicKey::from_bytes(bytes)
    }

    /// Reads a tagged signature: peeks the algorithm tag, then consumes
    /// exactly `1 + signature_length` bytes.
    pub fn read_signature(&mut self) -> Result<Signature> {
        let algorithm = KeyAlgorithm::from_tag(self.peek_u8()?)?;
        let bytes = self.take(1 + algorithm.signature_length())?;
        Signature::from_bytes(bytes)
    }

    /// Reads a tagged global state key: peeks the discriminant, resolves the
    /// variant's total length, then consumes exactly that many bytes.
    pub fn read_key(&mut self) -> Result<Key> {
        let total = Key::serialized_length_for_tag(self.peek_u8()?)?;
        let bytes = self.take(total)?;
        Key::from_bytes(bytes)
    }
}

fn fixed_bytes<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

/// Growable byte sink mirroring [`ByteReader`]'s layouts.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a 4-byte length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Writes a token amount as its minimal little-endian magnitude with a
    /// 1-byte length prefix.
    pub fn write_u512(&mut self, value: U512) {
        let magnitude = value.significant_bytes();
        self.write_u8(magnitude.len() as u8);
        self.buf.extend_from_slice(magnitude);
    }

    /// Writes a 33-byte unforgeable reference (address then access rights).
    pub fn write_uref(&mut self, uref: &URef) {
        self.buf.extend_from_slice(&uref.address());
        self.write_u8(uref.access_rights().bits());
    }

    pub fn write_public_key(&mut self, key: &PublicKey) {
        self.buf.extend_from_slice(&key.to_bytes());
    }

    pub fn write_signature(&mut self, signature: &Signature) {
        self.buf.extend_from_slice(&signature.to_bytes());
    }

    pub fn write_key(&mut self, key: &Key) {
        self.buf.extend_from_slice(&key.to_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0x1234_5678);
        assert_eq!(writer.as_slice(), &[0x78, 0x56, 0x34, 0x12]);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn signed_integers_round_trip() {
        let mut writer = ByteWriter::new();
        writer.write_i32(-42);
        writer.write_i64(i64::MIN);
        writer.write_u64(u64::MAX);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_i32().unwrap(), -42);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
        assert_eq!(reader.read_u64().unwrap(), u64::MAX);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut reader = ByteReader::new(&[0xaa, 0xbb]);
        assert_eq!(reader.peek_u8().unwrap(), 0xaa);
        assert_eq!(reader.peek_u8().unwrap(), 0xaa);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u8().unwrap(), 0xaa);
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn short_read_fails_without_advancing() {
        let mut reader = ByteReader::new(&[0x01, 0x02]);
        let err = reader.read_u32().unwrap_err();
        assert!(matches!(
            err,
            SdkError::UnexpectedEndOfInput {
                needed: 4,
                remaining: 2
            }
        ));
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
    }

    #[test]
    fn string_round_trip() {
        let mut writer = ByteWriter::new();
        writer.write_string("meridian");
        assert_eq!(&writer.as_slice()[..4], &8u32.to_le_bytes());

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_string().unwrap(), "meridian");
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let mut writer = ByteWriter::new();
        writer.write_u32(2);
        writer.write_bytes(&[0xff, 0xfe]);

        let mut reader = ByteReader::new(writer.as_slice());
        assert!(matches!(
            reader.read_string(),
            Err(SdkError::InvalidFormat(_))
        ));
    }

    #[test]
    fn string_truncated_body_fails() {
        let mut writer = ByteWriter::new();
        writer.write_u32(10);
        writer.write_bytes(b"abc");

        let mut reader = ByteReader::new(writer.as_slice());
        assert!(matches!(
            reader.read_string(),
            Err(SdkError::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn u512_serializes_minimal_magnitude() {
        let mut writer = ByteWriter::new();
        writer.write_u512(U512::from(0x0102u64));
        // length prefix 2, then LE magnitude
        assert_eq!(writer.as_slice(), &[2, 0x02, 0x01]);
    }

    #[test]
    fn u512_zero_is_a_single_length_byte() {
        let mut writer = ByteWriter::new();
        writer.write_u512(U512::ZERO);
        assert_eq!(writer.as_slice(), &[0]);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_u512().unwrap(), U512::ZERO);
    }

    #[test]
    fn u512_round_trips_large_values() {
        let value = U512::from(u128::MAX);
        let mut writer = ByteWriter::new();
        writer.write_u512(value);

        let mut reader = ByteReader::new(writer.as_slice());
        let decoded = reader.read_u512().unwrap();
        assert_eq!(decoded, value);
        assert_eq!(decoded.as_u64(), None);
        assert_eq!(U512::from(7u64).as_u64(), Some(7));
    }

    #[test]
    fn u512_rejects_oversized_length_prefix() {
        let mut bytes = vec![65u8];
        bytes.extend_from_slice(&[0u8; 65]);
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(
            reader.read_u512(),
            Err(SdkError::InvalidFormat(_))
        ));
    }

    #[test]
    fn uref_round_trip() {
        let uref = URef::new([0x17; 32], AccessRights::ReadAddWrite);
        let mut writer = ByteWriter::new();
        writer.write_uref(&uref);
        assert_eq!(writer.len(), UREF_SERIALIZED_LENGTH);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_uref().unwrap(), uref);
    }

    #[test]
    fn uref_rejects_invalid_access_rights() {
        let mut bytes = [0x17u8; UREF_SERIALIZED_LENGTH];
        bytes[32] = 0x1f;
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(reader.read_uref(), Err(SdkError::InvalidFormat(_))));
    }

    #[test]
    fn tagged_public_key_read_consumes_exact_length() {
        let key = PublicKey::from_raw_bytes(&[0x42; 32], KeyAlgorithm::Ed25519).unwrap();
        let mut writer = ByteWriter::new();
        writer.write_public_key(&key);
        writer.write_u8(0xEE);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_public_key().unwrap(), key);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_u8().unwrap(), 0xEE);
    }

    #[test]
    fn tagged_signature_read_dispatches_on_algorithm() {
        let signature =
            Signature::from_raw_bytes(&[0x99; 64], KeyAlgorithm::Secp256k1).unwrap();
        let mut writer = ByteWriter::new();
        writer.write_signature(&signature);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.read_signature().unwrap(), signature);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn tagged_key_read_uses_peeked_discriminant() {
        let key = Key::Hash([0xab; 32]);
        let mut writer = ByteWriter::new();
        writer.write_key(&key);
        writer.write_u64(11);

        let mut reader = ByteReader::new(writer.as_slice());
        assert_eq!(reader.peek_u8().unwrap(), 0x01);
        assert_eq!(reader.read_key().unwrap(), key);
        assert_eq!(reader.read_u64().unwrap(), 11);
    }

    #[test]
    fn unknown_key_tag_fails_before_consuming() {
        let mut reader = ByteReader::new(&[0xf0, 0x00]);
        assert!(matches!(
            reader.read_key(),
            Err(SdkError::UnknownKeyVariant(0xf0))
        ));
        assert_eq!(reader.position(), 0);
    }
}
