//! Inbound Ports (Driving Ports)
//!
//! The API the dedup engine uses to ask "is this address new".

use shared_types::DeviceAddress;

use crate::error::FilterError;

/// Primary membership filter API (Driving Port)
pub trait MembershipApi {
    /// Record `address`, returning `true` when it was not previously known.
    ///
    /// Persistence failures are absorbed: the answer is always produced from
    /// the in-memory state and unsaved bytes are retried later.
    fn contains_or_add(&mut self, address: &DeviceAddress) -> bool;

    /// Test membership without recording.
    fn contains(&self, address: &DeviceAddress) -> bool;

    /// Zero the whole filter and persist it fully.
    fn reset(&mut self) -> Result<(), FilterError>;

    /// Retry any writes that previously failed.
    fn flush(&mut self) -> Result<(), FilterError>;
}
