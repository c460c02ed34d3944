//! Hopper fingerprint
//!
//! Layout: `[address-kind byte] ++ [field ids, ascending] ++ [field byte
//! lengths, same order]`. Only the shape of the advertisement is used, never
//! its content, so the value survives payload changes such as counters or
//! rotating tokens.

use serde::{Deserialize, Serialize};
use shared_types::ObservedRecord;

/// Order-independent advertisement profile of a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    /// Derive the fingerprint of one observed record.
    pub fn from_record(record: &ObservedRecord) -> Self {
        let mut bytes = Vec::with_capacity(1 + record.fields.len() * 2);
        bytes.push(record.address_kind.as_byte());
        // BTreeMap iteration is already sorted by field id.
        bytes.extend(record.fields.keys().copied());
        bytes.extend(
            record
                .fields
                .values()
                .map(|value| u8::try_from(value.len()).unwrap_or(u8::MAX)),
        );
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
