//! Services module - core logic for locating and running the UI compiler.
//!
//! Everything here is host-agnostic: no IDE glue, no notification rendering,
//! only the mechanics of turning a `.ui` file into a `.py` file. The host
//! layer supplies a [`CompilerSettings`](crate::config::CompilerSettings)
//! snapshot, a project root and an input path, and receives a terminal
//! [`CompileOutcome`] plus a summary string per outcome.
//!
//! # Components
//!
//! - [`classifier`]: decides whether a path is a compilable UI file, by
//!   default `.ui` extension or by user glob/regex pattern, degrading
//!   gracefully on malformed patterns.
//! - [`resolver`]: three-tier executable discovery (custom override, venv
//!   install layouts, system PATH) with a fingerprint-keyed single-entry
//!   cache.
//! - [`output_path`]: computes where the generated Python file goes,
//!   including `$1` placeholder substitution.
//! - [`compiler`]: assembles the command line and environment overlay,
//!   supervises the subprocess on tokio with a timeout, and classifies the
//!   exit status.
//!
//! # Design
//!
//! - Failures are values: every abnormal end folds into a [`CompileOutcome`]
//!   variant handed to the host exactly once.
//! - Async throughout: subprocess waits and PATH probes are the only
//!   suspension points, both bounded.
//! - The resolver cache is the only shared mutable state; requests are
//!   otherwise independent.

pub mod classifier;
pub mod compiler;
pub mod output_path;
pub mod resolver;

pub use classifier::{DEFAULT_PATTERN, PathPattern, PatternError, is_ui_file};
pub use compiler::{CompileOutcome, CompilerService, VENV_ENV_VAR};
pub use output_path::compute_output_path;
pub use resolver::{UicResolver, resolve_configured_path};
