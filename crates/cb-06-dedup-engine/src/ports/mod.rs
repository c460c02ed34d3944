//! Ports layer for the dedup engine

pub mod inbound;

pub use inbound::DedupApi;
