//! Task planning core.
//!
//! Scores task risk, records field-level change events, drafts subtask
//! checklists with an offline fallback, and applies partial updates as
//! atomic units of work. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
