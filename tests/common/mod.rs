// Shared test utilities

pub mod harness;
pub mod mock_backend;
