//! UI file classification.
//!
//! Decides whether a path is a compilable Qt Designer file, either through the
//! fast default `.ui` extension check or through a user-supplied glob/regex
//! pattern. Malformed patterns never break detection: they degrade to the
//! extension check.

use camino::Utf8Path;
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use thiserror::Error;

use crate::platform::UI_EXTENSION;

/// Canonical default pattern; equivalent to the plain extension check.
pub const DEFAULT_PATTERN: &str = "*.ui";

/// Prefix marking a pattern as regex syntax instead of glob syntax.
const REGEX_PREFIX: &str = "regex:";

/// Optional prefix making glob syntax explicit.
const GLOB_PREFIX: &str = "glob:";

/// A malformed user-supplied file pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Compiled form of a user-supplied file pattern.
#[derive(Debug, Clone)]
pub enum PathPattern {
    Glob(GlobMatcher),
    Regex(Regex),
}

impl PathPattern {
    /// Compile a raw pattern string. Glob syntax is assumed unless the
    /// pattern carries an explicit `regex:` tag.
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        if let Some(expr) = raw.strip_prefix(REGEX_PREFIX) {
            return Ok(Self::Regex(Regex::new(expr)?));
        }

        let glob = raw.strip_prefix(GLOB_PREFIX).unwrap_or(raw);
        let matcher = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()?
            .compile_matcher();
        Ok(Self::Glob(matcher))
    }

    fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.is_match(candidate),
            Self::Regex(regex) => regex.is_match(candidate),
        }
    }
}

/// Whether `path` is a compilable UI file.
///
/// A blank pattern (or the canonical `*.ui`) uses the fast extension check.
/// Anything else is matched against several path representations so patterns
/// authored with either separator style still work; first hit wins.
/// Directories are never compilable inputs.
pub fn is_ui_file(path: &Utf8Path, pattern: &str, project_root: Option<&Utf8Path>) -> bool {
    if path.as_str().is_empty() || path.is_dir() {
        return false;
    }

    let pattern = pattern.trim();
    if pattern.is_empty() || pattern == DEFAULT_PATTERN {
        return has_ui_extension(path);
    }

    match PathPattern::compile(pattern) {
        Ok(matcher) => matches_any_representation(path, &matcher, project_root),
        Err(e) => {
            // Pattern was invalid, fall back to the extension check.
            tracing::warn!("Invalid UI file pattern '{}': {}", pattern, e);
            has_ui_extension(path)
        }
    }
}

fn has_ui_extension(path: &Utf8Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(UI_EXTENSION))
        .unwrap_or(false)
}

/// Match order: bare file name, path relative to the project root, the same
/// relative path with `/` separators, absolute path, absolute path with `/`
/// separators.
fn matches_any_representation(
    path: &Utf8Path,
    matcher: &PathPattern,
    project_root: Option<&Utf8Path>,
) -> bool {
    if let Some(name) = path.file_name() {
        if matcher.matches(name) {
            return true;
        }
    }

    if let Some(root) = project_root {
        if let Ok(relative) = path.strip_prefix(root) {
            let relative = relative.as_str();
            if matcher.matches(relative) {
                return true;
            }

            let normalized = relative.replace('\\', "/");
            if normalized != relative && matcher.matches(&normalized) {
                return true;
            }
        }
    }

    let full = path.as_str();
    if matcher.matches(full) {
        return true;
    }

    let normalized = full.replace('\\', "/");
    normalized != full && matcher.matches(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_matches_ui_extension() {
        assert!(is_ui_file(Utf8Path::new("form.ui"), "", None));
        assert!(is_ui_file(Utf8Path::new("/proj/ui/dialog.ui"), "", None));
        assert!(is_ui_file(Utf8Path::new("FORM.UI"), "", None));
        assert!(is_ui_file(Utf8Path::new("form.ui"), "*.ui", None));
    }

    #[test]
    fn test_default_pattern_rejects_other_extensions() {
        assert!(!is_ui_file(Utf8Path::new("form.py"), "", None));
        assert!(!is_ui_file(Utf8Path::new("form.uix"), "", None));
        assert!(!is_ui_file(Utf8Path::new("form"), "", None));
        assert!(!is_ui_file(Utf8Path::new(""), "", None));
    }

    #[test]
    fn test_glob_pattern_on_file_name() {
        assert!(is_ui_file(Utf8Path::new("/proj/main_window.ui"), "main_*.ui", None));
        assert!(!is_ui_file(Utf8Path::new("/proj/dialog.ui"), "main_*.ui", None));
    }

    #[test]
    fn test_glob_prefix_is_accepted() {
        assert!(is_ui_file(Utf8Path::new("form.ui"), "glob:*.ui", None));
    }

    #[test]
    fn test_glob_pattern_on_relative_path() {
        let root = Utf8Path::new("/proj");
        assert!(is_ui_file(
            Utf8Path::new("/proj/ui/forms/login.ui"),
            "ui/**/*.ui",
            Some(root)
        ));
        assert!(!is_ui_file(
            Utf8Path::new("/proj/other/login.ui"),
            "ui/**/*.ui",
            Some(root)
        ));
    }

    #[test]
    fn test_regex_pattern() {
        assert!(is_ui_file(
            Utf8Path::new("widgets/login.ui"),
            r"regex:.*\.ui$",
            Some(Utf8Path::new("widgets"))
        ));
        assert!(!is_ui_file(
            Utf8Path::new("widgets/login.txt"),
            r"regex:.*\.ui$",
            Some(Utf8Path::new("widgets"))
        ));
    }

    #[test]
    fn test_regex_and_default_agree_on_plain_ui_file() {
        // Both classifications must independently accept the same file.
        let path = Utf8Path::new("widgets/login.ui");
        let root = Utf8Path::new("widgets");
        assert!(is_ui_file(path, "", Some(root)));
        assert!(is_ui_file(path, r"regex:.*\.ui$", Some(root)));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_extension_check() {
        assert!(is_ui_file(Utf8Path::new("form.ui"), "regex:[unclosed", None));
        assert!(!is_ui_file(Utf8Path::new("form.py"), "regex:[unclosed", None));
    }

    #[test]
    fn test_invalid_glob_falls_back_to_extension_check() {
        assert!(is_ui_file(Utf8Path::new("form.ui"), "{unclosed", None));
        assert!(!is_ui_file(Utf8Path::new("form.py"), "{unclosed", None));
    }

    #[test]
    fn test_pattern_compile_errors_are_typed() {
        assert!(matches!(
            PathPattern::compile("regex:[unclosed"),
            Err(PatternError::Regex(_))
        ));
        assert!(matches!(
            PathPattern::compile("{unclosed"),
            Err(PatternError::Glob(_))
        ));
    }

    #[test]
    fn test_directory_is_never_compilable() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap();
        assert!(!is_ui_file(path, "", None));
        assert!(!is_ui_file(path, "*", None));
    }

    #[test]
    fn test_star_does_not_cross_separators() {
        // Glob semantics: `*` stays within one path component.
        let root = Utf8Path::new("/proj");
        assert!(!is_ui_file(
            Utf8Path::new("/proj/ui/nested/deep.ui"),
            "ui/*.ui",
            Some(root)
        ));
        assert!(is_ui_file(
            Utf8Path::new("/proj/ui/flat.ui"),
            "ui/*.ui",
            Some(root)
        ));
    }
}
