//! # Core Domain Entities
//!
//! Identities and scan records exchanged between the scanner and the
//! deduplication core.
//!
//! ## Clusters
//!
//! - **Identity**: [`DeviceAddress`], [`AddressKind`]
//! - **Observation**: [`ObservedRecord`], [`Timestamp`]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Seconds on the device's monotonic clock.
///
/// Only differences between timestamps are meaningful; the origin is the
/// moment the clock was created (power-on for the real device).
pub type Timestamp = f64;

/// Advertisement field identifier (the AD type byte of a BLE advertisement).
pub type FieldId = u8;

/// Length of a device address in bytes.
pub const ADDRESS_LEN: usize = 6;

/// A 6-byte wireless device address.
///
/// Treated as an opaque key. Ordering is lexical over the raw bytes and is
/// only used for deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct DeviceAddress(pub [u8; ADDRESS_LEN]);

impl DeviceAddress {
    /// Wrap raw address bytes (radio byte order).
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes in radio order.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for DeviceAddress {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

/// Formats as colon-separated hex, most significant byte first.
///
/// The radio delivers addresses little-endian, so the bytes are printed in
/// reverse.
impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`DeviceAddress`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid device address: {0}")]
pub struct ParseAddressError(pub String);

/// Parses the display form (`aa:bb:cc:dd:ee:ff`) back into radio order.
impl FromStr for DeviceAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != ADDRESS_LEN {
            return Err(ParseAddressError(s.to_string()));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        for (i, part) in parts.iter().enumerate() {
            let byte =
                u8::from_str_radix(part, 16).map_err(|_| ParseAddressError(s.to_string()))?;
            bytes[ADDRESS_LEN - 1 - i] = byte;
        }
        Ok(Self(bytes))
    }
}

/// How a device chose its address.
///
/// The discriminants match the radio stack's address-type byte, which is also
/// the first byte of a hopper fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AddressKind {
    /// Manufacturer-assigned address.
    Public = 0,
    /// Random address fixed for the device's power cycle.
    RandomStatic = 1,
    /// Rotating private address resolvable with an identity key.
    RandomPrivateResolvable = 2,
    /// Rotating private address with no resolvable identity.
    RandomPrivateNonResolvable = 3,
}

impl AddressKind {
    /// Address-type byte as reported by the radio.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Hoppers rotate their address periodically and cannot be keyed by it.
    pub fn is_hopper(self) -> bool {
        matches!(
            self,
            AddressKind::RandomPrivateResolvable | AddressKind::RandomPrivateNonResolvable
        )
    }
}

impl TryFrom<u8> for AddressKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddressKind::Public),
            1 => Ok(AddressKind::RandomStatic),
            2 => Ok(AddressKind::RandomPrivateResolvable),
            3 => Ok(AddressKind::RandomPrivateNonResolvable),
            other => Err(other),
        }
    }
}

/// One device as seen during a single scan cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRecord {
    /// Advertised address.
    pub address: DeviceAddress,
    /// Address type reported by the radio.
    pub address_kind: AddressKind,
    /// Received signal strength in dBm.
    pub signal_strength: i16,
    /// Raw advertisement fields keyed by field identifier.
    pub fields: BTreeMap<FieldId, Vec<u8>>,
}

impl ObservedRecord {
    /// Create a record with no advertisement fields.
    pub fn new(address: DeviceAddress, address_kind: AddressKind, signal_strength: i16) -> Self {
        Self {
            address,
            address_kind,
            signal_strength,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style method to attach an advertisement field.
    pub fn with_field(mut self, id: FieldId, bytes: impl Into<Vec<u8>>) -> Self {
        self.fields.insert(id, bytes.into());
        self
    }

    /// Whether this record comes from an address-rotating device.
    pub fn is_hopper(&self) -> bool {
        self.address_kind.is_hopper()
    }
}
