//! Meridian SDK - client-side identity and canonical serialization for the
//! Meridian network
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Cryptography
//! - [`crypto`] - Algorithm registry, public keys, signatures, key pairs, PEM
//!
//! ## Canonical Encoding
//! - [`encoding`] - Checksummed hex and the binary wire codec
//!
//! ## Global State Addressing
//! - [`key`] - Tagged global state keys (accounts, contracts, urefs, ...)
//!
//! ## Utilities
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Canonical Encoding
// ============================================================================
pub mod encoding;

// ============================================================================
// Global State Addressing
// ============================================================================
pub mod key;

// ============================================================================
// Errors
// ============================================================================
pub mod error;
