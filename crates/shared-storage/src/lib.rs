//! Storage Adapters
//!
//! Implementations of the `ByteStore` port.
//!
//! - [`FileByteStore`]: one file per key under a data directory. Whole-value
//!   writes go through a temp file and rename; partial writes patch in place.
//! - [`InMemoryByteStore`]: map-backed store for tests, with write/read fault
//!   injection and a record of partial writes.

mod file;
mod memory;

pub use file::FileByteStore;
pub use memory::{InMemoryByteStore, PartialWrite};
