//! Error types for the Meridian SDK

use thiserror::Error;

/// Errors raised by key, address, and codec factories.
///
/// Every parsing or construction failure is reported synchronously by the
/// factory that detected it; no partially-built value is ever returned.
#[derive(Debug, Error)]
pub enum SdkError {
    /// An algorithm tag byte outside the registry.
    #[error("unknown key algorithm tag: 0x{0:02x}")]
    UnknownAlgorithm(u8),
    /// Input with a recognized shape but the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Malformed textual or structural input.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// A mixed-case hex string whose letter-case pattern does not match its
    /// embedded checksum.
    #[error("hex string failed checksum validation")]
    ChecksumMismatch,
    /// A global state key discriminant outside the variant table.
    #[error("unknown global state key tag: 0x{0:02x}")]
    UnknownKeyVariant(u8),
    /// A read ran past the end of the input buffer.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfInput { needed: usize, remaining: usize },
    /// Underlying I/O failure during PEM import or export.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, SdkError>;
