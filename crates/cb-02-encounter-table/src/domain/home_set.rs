//! Home device set
//!
//! Stable addresses seen during a home-grace window. Persisted as the raw
//! 6-byte addresses concatenated in ascending order.

use shared_types::{DeviceAddress, ADDRESS_LEN};
use std::collections::BTreeSet;

use crate::error::TableError;

/// Addresses of the wearer's own devices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeDeviceSet {
    addresses: BTreeSet<DeviceAddress>,
}

impl HomeDeviceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address, returning `true` if it was not already present.
    pub fn insert(&mut self, address: DeviceAddress) -> bool {
        self.addresses.insert(address)
    }

    pub fn contains(&self, address: &DeviceAddress) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceAddress> {
        self.addresses.iter()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.addresses
            .iter()
            .flat_map(|a| a.as_bytes().iter().copied())
            .collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        if bytes.len() % ADDRESS_LEN != 0 {
            return Err(TableError::CorruptHomeSet { len: bytes.len() });
        }
        let addresses = bytes
            .chunks_exact(ADDRESS_LEN)
            .map(|chunk| {
                let mut raw = [0u8; ADDRESS_LEN];
                raw.copy_from_slice(chunk);
                DeviceAddress::new(raw)
            })
            .collect();
        Ok(Self { addresses })
    }
}
