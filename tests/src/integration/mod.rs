//! Cross-crate integration tests.

pub mod badge_loop;
pub mod persistence;
pub mod scenarios;

use shared_types::{AddressKind, DeviceAddress, ObservedRecord};

/// A stable-address device.
pub fn static_device(n: u8) -> ObservedRecord {
    ObservedRecord::new(
        DeviceAddress::new([n, 0x01, 0xBE, 0xEF, 0x00, 0xC0]),
        AddressKind::Public,
        -58,
    )
}

/// A rotating-address device whose advertisement shape is set by `profile`.
pub fn hopper_device(n: u8, profile: usize) -> ObservedRecord {
    ObservedRecord::new(
        DeviceAddress::new([n, 0x02, 0xCA, 0xFE, 0x00, 0x4F]),
        AddressKind::RandomPrivateNonResolvable,
        -64,
    )
    .with_field(0x01, vec![0x1A])
    .with_field(0xFF, vec![0u8; profile])
}
