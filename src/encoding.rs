// Thin re-export module: implementations live in `encoding/` so the two
// codecs (text-level checksummed hex, wire-level binary cursor) stay separate.

pub mod binary;
pub mod checksummed_hex;

pub use binary::{ByteReader, ByteWriter, U512};

/// Computes a 32-byte blake2b digest of `data`.
///
/// Shared by account-hash derivation and the checksummed hex bit source.
pub(crate) fn blake2b256(data: &[u8]) -> [u8; 32] {
    let hash = blake2_rfc::blake2b::blake2b(32, &[], data);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}
