// Thin re-export module: implementation is split across `crypto/` so the
// algorithm registry, the two value types, and the signing key material each
// keep their own file.

pub mod algorithm;
pub mod keypair;
pub(crate) mod pem;
pub mod public_key;
pub mod signature;

pub use algorithm::KeyAlgorithm;
pub use keypair::KeyPair;
pub use public_key::PublicKey;
pub use signature::Signature;

use once_cell::sync::Lazy;
use secp256k1::{All, Secp256k1};

/// A thread-safe, lazily initialized Secp256k1 context.
/// This prevents repeated, unnecessary context creation.
pub(crate) static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);
