//! # Dog Breeds
//!
//! Sub-breed lookups for named dog breeds, backed by the dog.ceo API, with a
//! memoizing cache layer that keeps repeated lookups off the network.

pub mod cache;
pub mod config;
pub mod provider;

// Re-export commonly used types
pub use cache::{BreedKey, CacheStats, CachingBreedProvider};
pub use config::{ClientConfig, ConfigError};
pub use provider::{BreedNotFound, BreedProvider, DogApiBreedProvider, SubBreedList};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
