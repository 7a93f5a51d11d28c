//! Adapter implementations for task planning ports.

pub mod gemini;
pub mod memory;
pub mod postgres;
