//! Platform-specific constants and compiler toolkit descriptors.
//!
//! Centralizes everything that differs between Windows and Unix-like systems:
//! the virtual-environment scripts directory, the PATH variable spelling, the
//! executable suffix and the command used to probe PATH. Also describes the
//! two supported Qt-for-Python toolkits and where their UI compilers
//! conventionally live inside a virtual environment.

use camino::{Utf8Path, Utf8PathBuf};

/// Scripts directory inside a virtual environment ("Scripts" on Windows,
/// "bin" elsewhere).
pub const SCRIPTS_DIR: &str = if cfg!(windows) { "Scripts" } else { "bin" };

/// Name of the PATH environment variable ("Path" on Windows).
pub const PATH_VAR: &str = if cfg!(windows) { "Path" } else { "PATH" };

/// Executable file suffix (".exe" on Windows, empty elsewhere).
pub const EXE_SUFFIX: &str = if cfg!(windows) { ".exe" } else { "" };

/// Command used to check whether an executable resolves through PATH.
pub const WHICH_COMMAND: &str = if cfg!(windows) { "where" } else { "which" };

/// Separator between entries of a PATH-style variable.
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Extension of Qt Designer UI files.
pub const UI_EXTENSION: &str = "ui";

/// Extension of generated Python output files.
pub const OUTPUT_EXTENSION: &str = "py";

/// One supported Qt-for-Python toolkit and the UI compiler it ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolkitFamily {
    /// Display name (PyQt6, PySide6).
    pub name: &'static str,
    /// Canonical command name, resolvable through PATH.
    pub command: &'static str,
    /// Package directory under `Lib/site-packages`.
    package: &'static str,
}

/// Supported toolkits in probe order. PyQt6 candidates are tried before
/// PySide6 candidates.
pub const FAMILIES: [ToolkitFamily; 2] = [
    ToolkitFamily {
        name: "PyQt6",
        command: "pyuic6",
        package: "PyQt6",
    },
    ToolkitFamily {
        name: "PySide6",
        command: "pyside6-uic",
        package: "PySide6",
    },
];

impl ToolkitFamily {
    /// Candidate executable locations inside a virtual environment root, in
    /// probe order: platform scripts directory, Unix-style bin directory,
    /// then the packaged-library layout.
    pub fn venv_candidates(&self, venv: &Utf8Path) -> Vec<Utf8PathBuf> {
        vec![
            venv.join(SCRIPTS_DIR)
                .join(format!("{}{}", self.command, EXE_SUFFIX)),
            venv.join("bin").join(self.command),
            venv.join("Lib")
                .join("site-packages")
                .join(self.package)
                .join(format!("{}{}", self.command, EXE_SUFFIX)),
        ]
    }
}
