// Shared utilities module
pub mod errors;
pub mod logging;
pub mod ui;
pub mod config_loader;

pub use errors::*;
pub use logging::*;
pub use ui::*;
pub use config_loader::*;
