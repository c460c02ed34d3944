//! # Contact Badge Subsystem Benchmarks
//!
//! | Subsystem | Path | Budget |
//! |-----------|------|--------|
//! | cb-01 Membership Filter | `contains_or_add` | well under one cycle per crowd |
//! | cb-02 Encounter Table | steady update | < 1ms for 200 devices |

use cb_tests::benchmarks::cb_01_membership_filter::bench_membership_filter;
use cb_tests::benchmarks::cb_02_encounter_table::bench_encounter_table;
use criterion::{criterion_group, criterion_main};

criterion_group!(benches, bench_membership_filter, bench_encounter_table);
criterion_main!(benches);
