//! UI rendering modules
//!
//! - `selection_menu` - Action trigger and menu next to the selection
//! - `results_panel` - Analysis results side panel
//! - `execution_panel` - Program output side panel
//! - `status_bar` - Status bar and feedback line

pub mod execution_panel;
pub mod results_panel;
pub mod selection_menu;
pub mod status_bar;

pub use execution_panel::ExecutionPanelRenderer;
pub use results_panel::ResultsPanelRenderer;
pub use selection_menu::{MenuLayout, SelectionMenuRenderer};
pub use status_bar::StatusBarRenderer;
