//! UI compiler executable resolution.
//!
//! Three-tier search: explicit override, virtual-environment install layouts
//! for each toolkit family, then the system PATH. The winning path is cached
//! together with a fingerprint of the settings that influenced it, so repeat
//! compilations skip the filesystem probes entirely. A missing executable is
//! a normal `None` result, never an error.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::process::Stdio;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::CompilerSettings;
use crate::platform::{FAMILIES, WHICH_COMMAND};

/// Upper bound on one which/where probe.
const PATH_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// A previously resolved executable, valid while the settings fingerprint
/// still matches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedResolution {
    executable: Utf8PathBuf,
    fingerprint: u64,
}

/// Resolves the UI compiler executable and caches the answer.
///
/// The cache is a single atomically replaced entry guarded by a [`RwLock`];
/// concurrent compilations share one resolver instance. Staleness is detected
/// by recomputing the fingerprint, not by a timer. The host must call
/// [`invalidate`](Self::invalidate) after any settings edit.
#[derive(Debug, Default)]
pub struct UicResolver {
    cache: RwLock<Option<CachedResolution>>,
    probes: AtomicUsize,
}

impl UicResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the compiler executable for the given settings snapshot.
    ///
    /// Returns an absolute path, or a bare command name when the executable
    /// was found through PATH, or `None` when nothing was found anywhere.
    pub async fn resolve(
        &self,
        settings: &CompilerSettings,
        project_root: &Utf8Path,
    ) -> Option<Utf8PathBuf> {
        let fingerprint = fingerprint(settings, project_root);

        if let Some(hit) = self.cached(fingerprint) {
            tracing::debug!("Using cached uic executable: {}", hit);
            return Some(hit);
        }

        let found = self.search(settings, project_root).await;

        let mut cache = self.cache.write().unwrap();
        *cache = found.as_ref().map(|executable| CachedResolution {
            executable: executable.clone(),
            fingerprint,
        });

        found
    }

    /// Drop the cached resolution. Must be called after any settings edit.
    pub fn invalidate(&self) {
        *self.cache.write().unwrap() = None;
        tracing::debug!("Resolver cache invalidated");
    }

    /// Number of filesystem/PATH probes performed so far.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    fn cached(&self, fingerprint: u64) -> Option<Utf8PathBuf> {
        let guard = self.cache.read().unwrap();
        let entry = guard.as_ref()?;

        if entry.fingerprint != fingerprint {
            return None;
        }

        // Bare command names are resolved through PATH at spawn time; for
        // anything else the entry goes stale once the file disappears.
        let bare = !entry.executable.as_str().contains(['/', '\\']);
        if bare || entry.executable.is_file() {
            Some(entry.executable.clone())
        } else {
            tracing::debug!("Cached uic executable vanished: {}", entry.executable);
            None
        }
    }

    async fn search(
        &self,
        settings: &CompilerSettings,
        project_root: &Utf8Path,
    ) -> Option<Utf8PathBuf> {
        if !settings.uic_path.is_empty() {
            let custom = resolve_configured_path(
                &settings.uic_path,
                settings.use_relative_paths,
                project_root,
            );
            if self.probe(&custom) {
                tracing::info!("Using custom uic executable: {}", custom);
                return Some(custom);
            }
            tracing::debug!("Custom uic path does not exist: {}", custom);
        }

        if !settings.virtual_environment_path.is_empty() {
            let venv = resolve_configured_path(
                &settings.virtual_environment_path,
                settings.use_relative_paths,
                project_root,
            );
            for family in &FAMILIES {
                for candidate in family.venv_candidates(&venv) {
                    if self.probe(&candidate) {
                        tracing::info!("Found {} uic at {}", family.name, candidate);
                        return Some(candidate);
                    }
                }
            }
        }

        for family in &FAMILIES {
            self.probes.fetch_add(1, Ordering::Relaxed);
            if command_in_path(family.command).await {
                tracing::info!("Found {} on PATH", family.command);
                return Some(Utf8PathBuf::from(family.command));
            }
        }

        tracing::warn!("No uic executable found for any toolkit family");
        None
    }

    fn probe(&self, candidate: &Utf8Path) -> bool {
        self.probes.fetch_add(1, Ordering::Relaxed);
        candidate.is_file()
    }
}

/// Resolve a user-configured path against the project root when relative
/// paths are enabled.
pub fn resolve_configured_path(
    path: &str,
    use_relative_paths: bool,
    project_root: &Utf8Path,
) -> Utf8PathBuf {
    let path = Utf8Path::new(path);
    if use_relative_paths && !path.is_absolute() {
        project_root.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Whether `command` resolves through the system PATH, decided by running the
/// platform which/where command with a short timeout.
async fn command_in_path(command: &str) -> bool {
    let mut probe = Command::new(WHICH_COMMAND);
    probe
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match timeout(PATH_PROBE_TIMEOUT, probe.status()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            tracing::debug!("PATH probe for {} failed: {}", command, e);
            false
        }
        Err(_) => {
            tracing::debug!("PATH probe for {} timed out", command);
            false
        }
    }
}

fn fingerprint(settings: &CompilerSettings, project_root: &Utf8Path) -> u64 {
    let mut hasher = DefaultHasher::new();
    settings.virtual_environment_path.hash(&mut hasher);
    settings.uic_path.hash(&mut hasher);
    settings.use_relative_paths.hash(&mut hasher);
    project_root.as_str().hash(&mut hasher);
    hasher.finish()
}
