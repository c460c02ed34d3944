//! Seeded simulation of a crowd of nearby devices.
//!
//! Each simulated device has a fixed signal level and a chance of being heard
//! in any window. A share of the crowd are hoppers: they keep the same
//! advertisement shape but draw a fresh address every `rotate_every` scans.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{AddressKind, DeviceAddress, ObservedRecord, ADDRESS_LEN};

use crate::ports::Scanner;

/// Shape of the simulated crowd.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub seed: u64,
    pub crowd: usize,
    /// Fraction of the crowd that rotates addresses.
    pub hopper_share: f64,
    /// Scans between address rotations of a hopper.
    pub rotate_every: u64,
    /// Chance a device is heard in a given window.
    pub presence: f64,
    /// Simulated time on air per scan.
    pub latency: Duration,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 143,
            crowd: 12,
            hopper_share: 0.25,
            rotate_every: 40,
            presence: 0.8,
            latency: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
struct SimDevice {
    address: DeviceAddress,
    kind: AddressKind,
    rssi: i16,
    payload_len: usize,
}

pub struct SimulatedScanner {
    settings: SimulationSettings,
    rng: StdRng,
    crowd: Vec<SimDevice>,
    scans: u64,
}

impl SimulatedScanner {
    pub fn new(settings: SimulationSettings) -> Self {
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let crowd = (0..settings.crowd)
            .map(|_| {
                let kind = if rng.gen_bool(settings.hopper_share.clamp(0.0, 1.0)) {
                    AddressKind::RandomPrivateResolvable
                } else {
                    AddressKind::Public
                };
                SimDevice {
                    address: random_address(&mut rng),
                    kind,
                    rssi: rng.gen_range(-95..=-40),
                    payload_len: rng.gen_range(4..=27),
                }
            })
            .collect();

        Self {
            settings,
            rng,
            crowd,
            scans: 0,
        }
    }

    /// Number of scans performed so far.
    pub fn scans(&self) -> u64 {
        self.scans
    }

    fn rotate_hoppers(&mut self) {
        for device in self.crowd.iter_mut().filter(|d| d.kind.is_hopper()) {
            device.address = random_address(&mut self.rng);
        }
    }
}

fn random_address(rng: &mut StdRng) -> DeviceAddress {
    let mut bytes = [0u8; ADDRESS_LEN];
    rng.fill(&mut bytes);
    DeviceAddress::new(bytes)
}

#[async_trait]
impl Scanner for SimulatedScanner {
    async fn scan(&mut self, min_rssi: i16) -> Vec<ObservedRecord> {
        tokio::time::sleep(self.settings.latency).await;

        self.scans += 1;
        if self.settings.rotate_every > 0 && self.scans % self.settings.rotate_every == 0 {
            self.rotate_hoppers();
        }

        let presence = self.settings.presence.clamp(0.0, 1.0);
        let mut records = Vec::new();
        for device in &self.crowd {
            if !self.rng.gen_bool(presence) {
                continue;
            }
            let rssi = device.rssi + self.rng.gen_range(-3..=3);
            if rssi < min_rssi {
                continue;
            }
            records.push(
                ObservedRecord::new(device.address, device.kind, rssi)
                    .with_field(0x01, vec![0x06])
                    .with_field(0xFF, vec![0u8; device.payload_len]),
            );
        }
        records
    }
}
