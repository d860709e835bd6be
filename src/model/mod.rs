//! Core data model for documents
//!
//! This module contains pure data structures with minimal external dependencies.

pub mod analysis;
pub mod document;
pub mod event;
pub mod selection;
