//! # Contact Badge Test Suite
//!
//! Unified test crate containing:
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Hot-path benchmarks per subsystem
//! │   ├── cb_01_membership_filter.rs
//! │   └── cb_02_encounter_table.rs
//! │
//! └── integration/      # Cross-crate scenarios
//!     ├── scenarios.rs  # Engine behaviour over many cycles
//!     ├── persistence.rs# Power loss and restart on a real data directory
//!     └── badge_loop.rs # Runtime loop with simulated peripherals
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cb-tests
//! cargo test -p cb-tests integration::persistence::
//! cargo bench -p cb-tests
//! ```

pub mod benchmarks;
pub mod integration;
