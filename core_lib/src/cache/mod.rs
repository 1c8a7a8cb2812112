//! In-process caching

pub mod memory;

pub use memory::{CacheManager, CacheStats};
