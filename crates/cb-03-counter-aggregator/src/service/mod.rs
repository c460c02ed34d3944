//! Service layer for the counter aggregator

mod counter_aggregator;

pub use counter_aggregator::CounterAggregator;
