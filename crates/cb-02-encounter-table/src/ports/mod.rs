//! Ports layer for the encounter table

pub mod outbound;

pub use outbound::NoveltyOracle;
