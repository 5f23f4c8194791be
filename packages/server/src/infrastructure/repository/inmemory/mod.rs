//! In-memory repository implementations.

mod registry;

pub use registry::InMemorySessionRegistry;
