//! Outbound Ports (Driven Ports)

use shared_types::DeviceAddress;

/// Answers whether a stable address has never been seen before.
///
/// Asking records the address, so a second call for the same address
/// returns `false`. Production: the membership filter.
pub trait NoveltyOracle {
    fn first_sighting(&mut self, address: &DeviceAddress) -> bool;
}

impl<F> NoveltyOracle for F
where
    F: FnMut(&DeviceAddress) -> bool,
{
    fn first_sighting(&mut self, address: &DeviceAddress) -> bool {
        self(address)
    }
}
