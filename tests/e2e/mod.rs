pub mod basic;
pub mod headless;
pub mod panels;
pub mod selection_actions;
