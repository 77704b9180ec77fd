//! Signing key pairs for both registered algorithms.

use crate::crypto::{pem, KeyAlgorithm, PublicKey, Signature, SECP256K1_CONTEXT};
use crate::error::{Result, SdkError};
use ed25519_dalek::Signer;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

enum SecretKeyMaterial {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(secp256k1::SecretKey),
}

/// A secret key together with its derived public key.
///
/// The secret scalar never leaves this type except through
/// [`KeyPair::write_pem`].
pub struct KeyPair {
    secret: SecretKeyMaterial,
    public: PublicKey,
}

impl KeyPair {
    /// Generates a new random key pair using the OS random number generator.
    pub fn generate(algorithm: KeyAlgorithm) -> Result<Self> {
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let signing = ed25519_dalek::SigningKey::generate(&mut OsRng);
                Self::from_ed25519(signing)
            }
            KeyAlgorithm::Secp256k1 => {
                let secret = secp256k1::SecretKey::new(&mut OsRng);
                Self::from_secp256k1(secret)
            }
        }
    }

    /// Builds a key pair from a 32-byte secret scalar.
    pub fn from_secret_bytes(bytes: &[u8], algorithm: KeyAlgorithm) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(SdkError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(bytes);
                Self::from_ed25519(ed25519_dalek::SigningKey::from_bytes(&seed))
            }
            KeyAlgorithm::Secp256k1 => {
                let secret = secp256k1::SecretKey::from_slice(bytes).map_err(|err| {
                    SdkError::InvalidFormat(format!("invalid secp256k1 secret key: {err}"))
                })?;
                Self::from_secp256k1(secret)
            }
        }
    }

    /// Loads a secret key from a PEM file; the block label selects the
    /// algorithm.
    pub fn from_pem<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)?;
        let pair = if pem::has_label(pem::PKCS8_LABEL, &text) {
            let der = pem::dearmor(pem::PKCS8_LABEL, &text)?;
            let seed = pem::secret_der_decode(KeyAlgorithm::Ed25519, &der)?;
            Self::from_ed25519(ed25519_dalek::SigningKey::from_bytes(&seed))?
        } else if pem::has_label(pem::EC_PRIVATE_KEY_LABEL, &text) {
            let der = pem::dearmor(pem::EC_PRIVATE_KEY_LABEL, &text)?;
            let scalar = pem::secret_der_decode(KeyAlgorithm::Secp256k1, &der)?;
            let secret = secp256k1::SecretKey::from_slice(&scalar).map_err(|err| {
                SdkError::InvalidFormat(format!("invalid secp256k1 secret key: {err}"))
            })?;
            Self::from_secp256k1(secret)?
        } else {
            return Err(SdkError::InvalidFormat(
                "file contains no recognized private key PEM block".into(),
            ));
        };
        debug!(
            path = %path.as_ref().display(),
            algorithm = %pair.algorithm(),
            "loaded secret key from PEM"
        );
        Ok(pair)
    }

    /// Writes the secret key to a PEM file.
    pub fn write_pem<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = match &self.secret {
            SecretKeyMaterial::Ed25519(signing) => {
                let der = pem::secret_der_encode(KeyAlgorithm::Ed25519, &signing.to_bytes());
                pem::armor(pem::PKCS8_LABEL, &der)
            }
            SecretKeyMaterial::Secp256k1(secret) => {
                let der = pem::secret_der_encode(KeyAlgorithm::Secp256k1, &secret.secret_bytes());
                pem::armor(pem::EC_PRIVATE_KEY_LABEL, &der)
            }
        };
        fs::write(&path, text)?;
        debug!(
            path = %path.as_ref().display(),
            algorithm = %self.algorithm(),
            "wrote secret key PEM"
        );
        Ok(())
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.public.algorithm()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Signs `message`: Ed25519 over the raw bytes, Secp256k1 over its
    /// SHA-256 digest in compact form, matching
    /// [`PublicKey::verify_signature`].
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        match &self.secret {
            SecretKeyMaterial::Ed25519(signing) => {
                let sig = signing.sign(message);
                Signature::from_raw_bytes(&sig.to_bytes(), KeyAlgorithm::Ed25519)
            }
            SecretKeyMaterial::Secp256k1(secret) => {
                let digest = Sha256::digest(message);
                let msg = secp256k1::Message::from_digest_slice(&digest).map_err(|err| {
                    SdkError::InvalidFormat(format!("failed to build message digest: {err}"))
                })?;
                let sig = SECP256K1_CONTEXT.sign_ecdsa(&msg, secret);
                Signature::from_raw_bytes(&sig.serialize_compact(), KeyAlgorithm::Secp256k1)
            }
        }
    }

    fn from_ed25519(signing: ed25519_dalek::SigningKey) -> Result<Self> {
        let public = PublicKey::from_raw_bytes(
            signing.verifying_key().as_bytes(),
            KeyAlgorithm::Ed25519,
        )?;
        Ok(KeyPair {
            secret: SecretKeyMaterial::Ed25519(signing),
            public,
        })
    }

    fn from_secp256k1(secret: secp256k1::SecretKey) -> Result<Self> {
        let point = secp256k1::PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret);
        let public = PublicKey::from_raw_bytes(&point.serialize(), KeyAlgorithm::Secp256k1)?;
        Ok(KeyPair {
            secret: SecretKeyMaterial::Secp256k1(secret),
            public,
        })
    }
}
