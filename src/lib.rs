// uicompile - finds and runs the Qt UI compiler (pyuic6 / pyside6-uic)
//
// This is the library crate containing the resolution, classification and
// orchestration logic. The binary crate (main.rs) provides a thin CLI host.

pub mod config;
pub mod logging;
pub mod platform;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{CompilerSettings, ConfigManager};
pub use services::{CompileOutcome, CompilerService, UicResolver, is_ui_file};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
