//! In-memory adapters for task planning tests.

mod store;

pub use store::{InMemoryTaskStore, StoreFaults};
