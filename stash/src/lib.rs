//! Read-through caching for expensive, idempotent lookups, and the user
//! document store whose by-id lookup it fronts.
//!
//! The cache never owns entries: a [`ports::CacheStore`] does, and
//! [`cache::CacheAside`] only orchestrates read, compute and write.

pub mod cache;
pub mod ports;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::{CacheAside, CacheAsideError, Cacheable, KeyTemplate};
pub use ports::CacheStore;
pub use shared::{DecodeFallback, TtlSecs};
