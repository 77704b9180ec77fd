//! PEM armor and the fixed DER templates for supported key material.
//!
//! Only two algorithms exist in the registry, so the DER layer is a set of
//! constant templates rather than a general encoder: SubjectPublicKeyInfo
//! for public keys, PKCS#8 for Ed25519 seeds, SEC1 for secp256k1 scalars.

use crate::crypto::KeyAlgorithm;
use crate::error::{Result, SdkError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
pub(crate) const PKCS8_LABEL: &str = "PRIVATE KEY";
pub(crate) const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";

/// SubjectPublicKeyInfo prefix for an Ed25519 public key (RFC 8410).
const ED25519_SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// SubjectPublicKeyInfo prefix for a compressed secp256k1 public key:
/// id-ecPublicKey with the secp256k1 curve OID.
const SECP256K1_SPKI_PREFIX: [u8; 23] = [
    0x30, 0x36, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x22, 0x00,
];

/// PKCS#8 PrivateKeyInfo prefix for an Ed25519 seed (RFC 8410).
const ED25519_PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];

/// SEC1 ECPrivateKey framing for a secp256k1 scalar: version and octet
/// string before the scalar, the named-curve parameter after it.
const SECP256K1_SEC1_PREFIX: [u8; 7] = [0x30, 0x2e, 0x02, 0x01, 0x01, 0x04, 0x20];
const SECP256K1_SEC1_SUFFIX: [u8; 9] = [0xa0, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a];

/// Wraps raw public key bytes in their algorithm's SubjectPublicKeyInfo.
pub(crate) fn spki_encode(algorithm: KeyAlgorithm, raw: &[u8]) -> Vec<u8> {
    let prefix: &[u8] = match algorithm {
        KeyAlgorithm::Ed25519 => &ED25519_SPKI_PREFIX,
        KeyAlgorithm::Secp256k1 => &SECP256K1_SPKI_PREFIX,
    };
    let mut der = Vec::with_capacity(prefix.len() + raw.len());
    der.extend_from_slice(prefix);
    der.extend_from_slice(raw);
    der
}

/// Recognizes a SubjectPublicKeyInfo and returns its algorithm and raw key.
pub(crate) fn spki_decode(der: &[u8]) -> Result<(KeyAlgorithm, Vec<u8>)> {
    for algorithm in KeyAlgorithm::ALL {
        let prefix: &[u8] = match algorithm {
            KeyAlgorithm::Ed25519 => &ED25519_SPKI_PREFIX,
            KeyAlgorithm::Secp256k1 => &SECP256K1_SPKI_PREFIX,
        };
        if der.len() == prefix.len() + algorithm.key_length() && der.starts_with(prefix) {
            return Ok((algorithm, der[prefix.len()..].to_vec()));
        }
    }
    Err(SdkError::InvalidFormat(
        "DER is not a recognized public key structure".into(),
    ))
}

/// Wraps a 32-byte secret scalar in its algorithm's private-key DER.
pub(crate) fn secret_der_encode(algorithm: KeyAlgorithm, scalar: &[u8; 32]) -> Vec<u8> {
    match algorithm {
        KeyAlgorithm::Ed25519 => {
            let mut der = Vec::with_capacity(ED25519_PKCS8_PREFIX.len() + 32);
            der.extend_from_slice(&ED25519_PKCS8_PREFIX);
            der.extend_from_slice(scalar);
            der
        }
        KeyAlgorithm::Secp256k1 => {
            let mut der =
                Vec::with_capacity(SECP256K1_SEC1_PREFIX.len() + 32 + SECP256K1_SEC1_SUFFIX.len());
            der.extend_from_slice(&SECP256K1_SEC1_PREFIX);
            der.extend_from_slice(scalar);
            der.extend_from_slice(&SECP256K1_SEC1_SUFFIX);
            der
        }
    }
}

/// Extracts the 32-byte secret scalar from private-key DER of `algorithm`.
pub(crate) fn secret_der_decode(algorithm: KeyAlgorithm, der: &[u8]) -> Result<[u8; 32]> {
    let scalar = match algorithm {
        KeyAlgorithm::Ed25519 => {
            if der.len() != ED25519_PKCS8_PREFIX.len() + 32
                || !der.starts_with(&ED25519_PKCS8_PREFIX)
            {
                return Err(SdkError::InvalidFormat(
                    "DER is not an ed25519 PKCS#8 private key".into(),
                ));
            }
            &der[ED25519_PKCS8_PREFIX.len()..]
        }
        KeyAlgorithm::Secp256k1 => {
            if der.len() != SECP256K1_SEC1_PREFIX.len() + 32 + SECP256K1_SEC1_SUFFIX.len()
                || !der.starts_with(&SECP256K1_SEC1_PREFIX)
                || !der.ends_with(&SECP256K1_SEC1_SUFFIX)
            {
                return Err(SdkError::InvalidFormat(
                    "DER is not a secp256k1 EC private key".into(),
                ));
            }
            &der[SECP256K1_SEC1_PREFIX.len()..SECP256K1_SEC1_PREFIX.len() + 32]
        }
    };
    let mut out = [0u8; 32];
    out.copy_from_slice(scalar);
    Ok(out)
}

/// Renders DER bytes as a PEM block with the given label.
pub(crate) fn armor(label: &str, der: &[u8]) -> String {
    let encoded = BASE64.encode(der);
    let mut out = String::with_capacity(encoded.len() + label.len() * 2 + 40);
    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n");
    for chunk in encoded.as_bytes().chunks(64) {
        // base64 output is always ASCII
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    out
}

/// Extracts and base64-decodes the body of the PEM block with `label`.
pub(crate) fn dearmor(label: &str, text: &str) -> Result<Vec<u8>> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");
    let start = text
        .find(&begin)
        .ok_or_else(|| SdkError::InvalidFormat(format!("missing `{begin}` header")))?
        + begin.len();
    let stop = text[start..]
        .find(&end)
        .ok_or_else(|| SdkError::InvalidFormat(format!("missing `{end}` footer")))?
        + start;
    let body: String = text[start..stop]
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(body)
        .map_err(|err| SdkError::InvalidFormat(format!("invalid PEM base64 body: {err}")))
}

/// True when the text contains a PEM block with the given label.
pub(crate) fn has_label(label: &str, text: &str) -> bool {
    text.contains(&format!("-----BEGIN {label}-----"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_round_trip() {
        let der = spki_encode(KeyAlgorithm::Ed25519, &[0x42; 32]);
        let pem = armor(PUBLIC_KEY_LABEL, &der);
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(pem.ends_with("-----END PUBLIC KEY-----\n"));
        assert_eq!(dearmor(PUBLIC_KEY_LABEL, &pem).unwrap(), der);
    }

    #[test]
    fn spki_round_trip_both_algorithms() {
        for algorithm in KeyAlgorithm::ALL {
            let raw = vec![0x3c; algorithm.key_length()];
            let der = spki_encode(algorithm, &raw);
            let (decoded_algorithm, decoded_raw) = spki_decode(&der).unwrap();
            assert_eq!(decoded_algorithm, algorithm);
            assert_eq!(decoded_raw, raw);
        }
    }

    #[test]
    fn spki_decode_rejects_garbage() {
        assert!(spki_decode(&[0u8; 44]).is_err());
        assert!(spki_decode(&[]).is_err());
    }

    #[test]
    fn secret_der_round_trip_both_algorithms() {
        let scalar = [0x5e; 32];
        for algorithm in KeyAlgorithm::ALL {
            let der = secret_der_encode(algorithm, &scalar);
            assert_eq!(secret_der_decode(algorithm, &der).unwrap(), scalar);
        }
    }

    #[test]
    fn secret_der_structures_are_not_interchangeable() {
        let scalar = [0x5e; 32];
        let pkcs8 = secret_der_encode(KeyAlgorithm::Ed25519, &scalar);
        assert!(secret_der_decode(KeyAlgorithm::Secp256k1, &pkcs8).is_err());
        let sec1 = secret_der_encode(KeyAlgorithm::Secp256k1, &scalar);
        assert!(secret_der_decode(KeyAlgorithm::Ed25519, &sec1).is_err());
    }

    #[test]
    fn dearmor_rejects_missing_block() {
        assert!(dearmor(PUBLIC_KEY_LABEL, "not a pem file").is_err());
    }

    #[test]
    fn dearmor_rejects_corrupt_base64() {
        let pem = "-----BEGIN PUBLIC KEY-----\n!!!!\n-----END PUBLIC KEY-----\n";
        assert!(matches!(
            dearmor(PUBLIC_KEY_LABEL, pem),
            Err(SdkError::InvalidFormat(_))
        ));
    }
}
