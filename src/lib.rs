//! codeward: a terminal code editor whose selections carry remote
//! analysis actions (enhance, generate tests, fix issues).

pub mod app;
pub mod config;
pub mod model;
pub mod primitives;
pub mod services;
pub mod view;
