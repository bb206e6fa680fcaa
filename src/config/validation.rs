//! Settings validation with descriptive error messages.
//!
//! Used by settings surfaces before persisting an edit; the core never calls
//! these. Validation is advisory: empty values are always valid because they
//! select built-in defaults.

use camino::Utf8Path;

use crate::services::classifier::PathPattern;
use crate::services::resolver::resolve_configured_path;

/// Outcome of validating a single settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
        }
    }
}

/// Validate a virtual environment path. Empty is allowed and skips the venv
/// search tier.
pub fn validate_venv_path(
    path: &str,
    project_root: Option<&Utf8Path>,
    use_relative_paths: bool,
) -> ValidationResult {
    if path.trim().is_empty() {
        return ValidationResult::valid();
    }

    // Relative paths without a project context cannot be checked further.
    if use_relative_paths && project_root.is_none() {
        return ValidationResult::valid();
    }

    let resolved = resolve_configured_path(
        path,
        use_relative_paths,
        project_root.unwrap_or(Utf8Path::new("")),
    );
    if resolved.exists() && !resolved.is_dir() {
        return ValidationResult::invalid(format!("Path is not a directory: {}", resolved));
    }

    ValidationResult::valid()
}

/// Validate a custom compiler executable path. Empty is allowed and means
/// auto-detect.
pub fn validate_uic_path(
    path: &str,
    project_root: Option<&Utf8Path>,
    use_relative_paths: bool,
) -> ValidationResult {
    if path.trim().is_empty() {
        return ValidationResult::valid();
    }

    let resolved = resolve_configured_path(
        path,
        use_relative_paths,
        project_root.unwrap_or(Utf8Path::new("")),
    );

    if !resolved.exists() {
        return ValidationResult::invalid(format!("File does not exist: {}", resolved));
    }

    if !resolved.is_file() {
        return ValidationResult::invalid(format!("Path is not a file: {}", resolved));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(resolved.as_std_path()) {
            Ok(metadata) if metadata.permissions().mode() & 0o111 == 0 => {
                return ValidationResult::invalid(format!("File is not executable: {}", resolved));
            }
            _ => {}
        }
    }

    ValidationResult::valid()
}

/// Validate a UI file pattern (glob, or regex with the `regex:` tag). Empty
/// is allowed and selects the extension check.
pub fn validate_ui_file_pattern(pattern: &str) -> ValidationResult {
    if pattern.trim().is_empty() {
        return ValidationResult::valid();
    }

    match PathPattern::compile(pattern.trim()) {
        Ok(_) => ValidationResult::valid(),
        Err(e) => ValidationResult::invalid(format!("Invalid pattern: {}", e)),
    }
}

/// Validate an output path pattern. Empty is allowed and writes next to the
/// input file.
pub fn validate_output_path(pattern: &str) -> ValidationResult {
    if pattern.trim().is_empty() {
        return ValidationResult::valid();
    }

    // The placeholder stands in for a file name when checking the shape.
    let expanded = pattern.replace("$1", "filename");
    if expanded.contains('\0') {
        return ValidationResult::invalid("Invalid path format");
    }

    ValidationResult::valid()
}
