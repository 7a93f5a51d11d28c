//! Planwright: task lifecycle and risk engine for event planning.
//!
//! This crate scores tasks for delivery risk, keeps an append-only audit
//! trail of field changes, and drafts subtask checklists through an
//! external text-generation provider with a deterministic fallback.
//!
//! # Architecture
//!
//! Planwright follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`config`]: Layered configuration loading
//! - [`task`]: Task updates, risk scoring, and insights

pub mod config;
pub mod task;
