//! # CB-01 Membership Filter
//!
//! Persistent "have we ever seen this address" filter for the contact badge.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure bit logic, no I/O
//!   - `RegionBloom`: 24 KiB bit array split into three 64 Kibit regions
//!   - `FilterConfig`: storage key and verification settings
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MembershipApi`: Driving port used by the dedup engine
//!
//! - **Service Layer** (`service/`): Persistence orchestration
//!   - `MembershipFilter`: Implements `MembershipApi` over a `ByteStore`
//!
//! ## Hashing
//!
//! The six address bytes are split into three disjoint 16-bit fields. Field
//! `f` selects one bit inside region `f`. An address is *new* when at least
//! one of its three bits was clear before the call.
//!
//! ## Invariants
//!
//! - No false negatives: once `contains_or_add(a)` has run, `contains(a)` is
//!   true until an explicit `reset`.
//! - Bits are only ever cleared by `reset`.
//! - Only bytes whose value changed are written back (partial write); load
//!   failures reinitialize to zero and persist the fresh array.
//!
//! ## Usage Example
//!
//! ```ignore
//! use cb_01_membership_filter::{FilterConfig, MembershipFilter, MembershipApi};
//!
//! let mut filter = MembershipFilter::open(FilterConfig::default(), store)?;
//! assert!(filter.contains_or_add(&addr));
//! assert!(!filter.contains_or_add(&addr));
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::{
    FilterConfig, Insertion, RegionBloom, FILTER_BYTES, REGION_BITS, REGION_BYTES, REGION_COUNT,
};
pub use error::FilterError;
pub use metrics::{FilterHealth, FilterMetrics, FilterMetricsSnapshot};
pub use ports::MembershipApi;
pub use service::MembershipFilter;
