//! Durable mapping from platform users to leaderboard display names.
//!
//! # Architecture
//!
//! - [`LinkStore`]: single-row key-value operations (in-memory or JSON file)
//! - [`LinkRegistry`]: the only writer; logs every link and unlink
//!
//! Concurrent access is serialized by the store itself; there is no
//! registry-level lock.

mod fsync;
mod registry;
mod store;

pub use registry::LinkRegistry;
pub use store::{
    JsonFileLinkStore, LinkStore, LinkedUser, MemoryLinkStore, SCHEMA_VERSION, StoreError,
};
