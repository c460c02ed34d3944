//! # Contact Badge Benchmarks
//!
//! Hot paths of one scan cycle, driven from `benches/subsystem_benchmarks.rs`.

pub mod cb_01_membership_filter;
pub mod cb_02_encounter_table;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{AddressKind, DeviceAddress, ObservedRecord};

/// Deterministic random static devices.
pub fn random_statics(count: usize, seed: u64) -> Vec<ObservedRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 6];
            rng.fill(&mut bytes);
            ObservedRecord::new(
                DeviceAddress::new(bytes),
                AddressKind::Public,
                rng.gen_range(-90..=-40),
            )
        })
        .collect()
}
