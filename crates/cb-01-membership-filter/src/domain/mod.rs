//! Domain layer for the membership filter
//!
//! Pure logic with no I/O dependencies.

pub mod config;
pub mod region_bloom;

pub use config::FilterConfig;
pub use region_bloom::{
    Insertion, RegionBloom, FILTER_BYTES, REGION_BITS, REGION_BYTES, REGION_COUNT,
};
