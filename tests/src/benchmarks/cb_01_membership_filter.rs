//! # CB-01 Membership Filter Benchmarks
//!
//! - `contains_or_add` on fresh addresses (every call patches the store)
//! - `contains_or_add` on known addresses (no store traffic)
//! - full-image save

use std::sync::Arc;

use cb_01_membership_filter::{FilterConfig, MembershipApi, MembershipFilter};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_storage::InMemoryByteStore;

use super::random_statics;

fn open_filter() -> MembershipFilter {
    MembershipFilter::open(FilterConfig::default(), Arc::new(InMemoryByteStore::new()))
        .expect("filter opens on an empty store")
}

pub fn bench_membership_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("cb-01-membership-filter");

    for size in [10usize, 100, 1_000] {
        let addresses: Vec<_> = random_statics(size, 7).into_iter().map(|r| r.address).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("insert_fresh", size), &addresses, |b, addrs| {
            b.iter_batched(
                open_filter,
                |mut filter| {
                    for address in addrs {
                        black_box(filter.contains_or_add(address));
                    }
                },
                criterion::BatchSize::SmallInput,
            )
        });

        let mut warm = open_filter();
        for address in &addresses {
            warm.contains_or_add(address);
        }
        group.bench_with_input(BenchmarkId::new("lookup_known", size), &addresses, |b, addrs| {
            b.iter(|| {
                for address in addrs {
                    black_box(warm.contains_or_add(address));
                }
            })
        });
    }

    group.bench_function("save_full", |b| {
        let mut filter = open_filter();
        b.iter(|| filter.save_full().expect("in-memory save"))
    });

    group.finish();
}
