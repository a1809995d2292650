//! Infrastructure adapters for the job store.

pub mod store;

pub use store::InMemoryStore;
#[cfg(feature = "redis-store")]
pub use store::RedisStore;
