//! Step definitions for task update scenarios.

pub mod given;
pub mod when;
pub mod world;
