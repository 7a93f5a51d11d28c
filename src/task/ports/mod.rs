//! Port contracts for task planning.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod store;
pub mod text_generation;

pub use store::{TaskStore, TaskStoreError, TaskStoreResult, TaskTransaction};
pub use text_generation::{
    ProviderError, ProviderResponse, ProviderResult, TextGenerationProvider,
};
