//! Low-level primitives and utilities
//!
//! Language identifiers and visual column math shared by rendering and input.

pub mod language;
pub mod visual_layout;
