//! # CB-02 Encounter Table Benchmarks
//!
//! One table update per iteration over a steady crowd, the common case once
//! everyone nearby has been admitted.

use std::collections::HashSet;
use std::sync::Arc;

use cb_02_encounter_table::{EncounterTable, NoveltyOracle, TableConfig};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_storage::InMemoryByteStore;
use shared_types::DeviceAddress;

use super::random_statics;

#[derive(Default)]
struct SetOracle(HashSet<DeviceAddress>);

impl NoveltyOracle for SetOracle {
    fn first_sighting(&mut self, address: &DeviceAddress) -> bool {
        self.0.insert(*address)
    }
}

pub fn bench_encounter_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-02-encounter-table");

    for crowd in [10usize, 50, 200] {
        let records = random_statics(crowd, 11);
        let mut table = EncounterTable::open(
            TableConfig::default(),
            Arc::new(InMemoryByteStore::new()),
            0.0,
        )
        .expect("table opens on an empty store");
        let mut oracle = SetOracle::default();
        table.update(&records, 0.0, false, &mut oracle);

        group.throughput(Throughput::Elements(crowd as u64));
        group.bench_with_input(BenchmarkId::new("steady_update", crowd), &records, |b, recs| {
            let mut now = 0.0;
            b.iter(|| {
                now += 0.25;
                black_box(table.update(recs, now, false, &mut oracle).report)
            })
        });
    }

    group.finish();
}
