//! Output path computation for compiled UI files.
//!
//! Turns the configured output pattern into a concrete `.py` path for a given
//! input file. Supports `$1` base-name substitution and directory-style
//! patterns.

use camino::{Utf8Path, Utf8PathBuf};

use crate::platform::OUTPUT_EXTENSION;

/// Placeholder substituted with the input file's base name.
const BASE_NAME_PLACEHOLDER: &str = "$1";

/// Compute the output file path for `input` under the configured `pattern`.
///
/// - Empty pattern: same directory as the input, same base name, `.py`.
/// - Pattern containing `$1`: the placeholder is replaced with the input's
///   base name and the result is used as a path.
/// - Pattern ending in a separator or naming an existing directory:
///   `<base>.py` is appended.
/// - Pattern naming a file without the `.py` extension: also treated as a
///   directory prefix. This mirrors long-standing behavior that existing
///   configurations rely on; see DESIGN.md before changing it.
/// - Anything else is taken verbatim as the output file path.
///
/// Relative results are made absolute against `project_root`.
pub fn compute_output_path(
    input: &Utf8Path,
    pattern: &str,
    project_root: &Utf8Path,
) -> Utf8PathBuf {
    let base_name = input.file_stem().unwrap_or_default();
    let pattern = pattern.trim();

    if pattern.is_empty() {
        let parent = input.parent().unwrap_or(Utf8Path::new(""));
        return parent.join(format!("{}.{}", base_name, OUTPUT_EXTENSION));
    }

    let candidate = if pattern.contains('$') {
        Utf8PathBuf::from(pattern.replace(BASE_NAME_PLACEHOLDER, base_name))
    } else if is_directory_like(pattern) || !has_output_extension(pattern) {
        Utf8Path::new(pattern).join(format!("{}.{}", base_name, OUTPUT_EXTENSION))
    } else {
        Utf8PathBuf::from(pattern)
    };

    if candidate.is_absolute() {
        candidate
    } else {
        project_root.join(candidate)
    }
}

fn is_directory_like(pattern: &str) -> bool {
    pattern.ends_with('/') || pattern.ends_with('\\') || Utf8Path::new(pattern).is_dir()
}

fn has_output_extension(pattern: &str) -> bool {
    pattern
        .to_lowercase()
        .ends_with(&format!(".{}", OUTPUT_EXTENSION))
}
