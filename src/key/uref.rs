//! Unforgeable references: addressed storage cells with access rights.

use crate::error::{Result, SdkError};
use crate::key::AccessRights;
use std::fmt;

/// Length of a URef address in bytes.
pub const UREF_ADDR_LENGTH: usize = 32;

/// Serialized length of a URef without a key discriminant: the address plus
/// one access-rights byte.
pub const UREF_SERIALIZED_LENGTH: usize = UREF_ADDR_LENGTH + 1;

/// Text prefix of a formatted URef.
pub const UREF_PREFIX: &str = "uref-";

/// A 32-byte address paired with the access rights granted on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct URef {
    address: [u8; UREF_ADDR_LENGTH],
    access_rights: AccessRights,
}

impl URef {
    pub const fn new(address: [u8; UREF_ADDR_LENGTH], access_rights: AccessRights) -> Self {
        URef {
            address,
            access_rights,
        }
    }

    pub const fn address(self) -> [u8; UREF_ADDR_LENGTH] {
        self.address
    }

    pub const fn access_rights(self) -> AccessRights {
        self.access_rights
    }

    /// Renders `uref-<64 lowercase hex>-<2 hex access rights>`.
    pub fn to_formatted_string(self) -> String {
        format!(
            "{}{}-{:02x}",
            UREF_PREFIX,
            hex::encode(self.address),
            self.access_rights.bits()
        )
    }

    /// Parses the `uref-` text form; the trailing access-rights suffix is
    /// required.
    pub fn from_formatted_str(input: &str) -> Result<Self> {
        let rest = input.strip_prefix(UREF_PREFIX).ok_or_else(|| {
            SdkError::InvalidFormat(format!("uref must start with `{UREF_PREFIX}`"))
        })?;
        let (addr_hex, rights_hex) = rest.rsplit_once('-').ok_or_else(|| {
            SdkError::InvalidFormat("uref must carry a `-<2-hex-digit>` access rights suffix".into())
        })?;
        if rights_hex.len() != 2 {
            return Err(SdkError::InvalidFormat(format!(
                "uref access rights suffix must be 2 hex digits, got `{rights_hex}`"
            )));
        }
        let bits = u8::from_str_radix(rights_hex, 16).map_err(|err| {
            SdkError::InvalidFormat(format!("invalid uref access rights suffix: {err}"))
        })?;
        let access_rights = AccessRights::from_bits(bits)?;

        let addr_bytes = hex::decode(addr_hex)
            .map_err(|err| SdkError::InvalidFormat(format!("invalid uref address hex: {err}")))?;
        let address: [u8; UREF_ADDR_LENGTH] = addr_bytes.as_slice().try_into().map_err(|_| {
            SdkError::InvalidFormat(format!(
                "uref address must be {UREF_ADDR_LENGTH} bytes, got {}",
                addr_bytes.len()
            ))
        })?;
        Ok(URef::new(address, access_rights))
    }
}

impl fmt::Display for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formatted_string())
    }
}

impl fmt::Debug for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "URef({})", self.to_formatted_string())
    }
}
