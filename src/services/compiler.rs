//! Compilation orchestration.
//!
//! Takes a UI file plus a settings snapshot, resolves the compiler
//! executable, computes the output path, and supervises the subprocess.
//! Every failure mode is folded into a terminal [`CompileOutcome`] value;
//! nothing escapes this module as a panic or an unhandled error. The
//! orchestration runs on tokio workers, so callers never block on the
//! compiler process.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::CompilerSettings;
use crate::platform::{PATH_LIST_SEPARATOR, PATH_VAR, SCRIPTS_DIR};
use crate::services::output_path::compute_output_path;
use crate::services::resolver::{UicResolver, resolve_configured_path};

/// Environment variable naming the virtual-environment root.
pub const VENV_ENV_VAR: &str = "VIRTUAL_ENV";

/// Terminal result of one compilation attempt. Reported exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The compiler exited with code 0; `output` is the generated file.
    Succeeded { output: Utf8PathBuf },

    /// The compiler rejected the input. The exit code is surfaced verbatim.
    Failed { exit_code: i32 },

    /// No executable was found in any search tier. Carries the configured
    /// paths so the message can point at what was searched.
    ExecutableNotFound {
        venv_path: String,
        custom_path: String,
    },

    /// The process was force-killed after running past the timeout.
    TimedOut { after: Duration },

    /// The process could not be launched at all.
    SpawnError { message: String },
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Human-readable summary for the host's notification sink.
    pub fn summary(&self, input: &Utf8Path) -> String {
        let input_name = input.file_name().unwrap_or(input.as_str());
        match self {
            Self::Succeeded { output } => {
                let output_name = output.file_name().unwrap_or(output.as_str());
                format!("Successfully compiled {} to {}", input_name, output_name)
            }
            Self::Failed { exit_code } => format!(
                "Failed to compile {}. Exit code: {}. Check logs for details.",
                input_name, exit_code
            ),
            Self::ExecutableNotFound {
                venv_path,
                custom_path,
            } => format!(
                "UIC executable not found. Please check your settings.\n\
                 Looking in: {}\nCustom path: {}",
                venv_path, custom_path
            ),
            Self::TimedOut { after } => format!(
                "Compilation of {} timed out after {}s",
                input_name,
                after.as_secs()
            ),
            Self::SpawnError { message } => {
                format!("Failed to launch UIC for {}: {}", input_name, message)
            }
        }
    }
}

/// One compilation invocation, owned by the orchestrator call that built it.
#[derive(Debug)]
struct CompileRequest {
    input: Utf8PathBuf,
    output: Utf8PathBuf,
    executable: Utf8PathBuf,
    /// Environment overlay applied on top of the inherited environment.
    env: Vec<(String, String)>,
}

/// Orchestrates UI file compilation.
///
/// Holds the shared [`UicResolver`] so concurrent compilations reuse one
/// resolution cache. The service itself is stateless beyond that; each call
/// builds its own [`CompileRequest`].
#[derive(Debug, Clone, Default)]
pub struct CompilerService {
    resolver: Arc<UicResolver>,
}

impl CompilerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing resolver, e.g. one owned by the host settings layer.
    pub fn with_resolver(resolver: Arc<UicResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver backing this service. The host's settings surface calls
    /// `invalidate()` on it after every edit.
    pub fn resolver(&self) -> &Arc<UicResolver> {
        &self.resolver
    }

    /// Compile `input` and return the terminal outcome.
    pub async fn compile(
        &self,
        settings: &CompilerSettings,
        input: &Utf8Path,
        project_root: &Utf8Path,
    ) -> CompileOutcome {
        let executable = match self.resolver.resolve(settings, project_root).await {
            Some(executable) => executable,
            None => {
                return CompileOutcome::ExecutableNotFound {
                    venv_path: settings.virtual_environment_path.clone(),
                    custom_path: settings.uic_path.clone(),
                };
            }
        };

        let output = compute_output_path(input, &settings.output_path, project_root);

        // Best effort only: if this fails the compiler itself will fail to
        // write and that surfaces through its exit status.
        if let Some(parent) = output.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Could not create output directory {}: {}", parent, e);
                }
            }
        }

        let request = CompileRequest {
            input: input.to_path_buf(),
            output,
            executable,
            env: venv_environment(settings, project_root),
        };

        self.run(request, settings.timeout(), project_root).await
    }

    /// Fire-and-forget variant: hands the whole orchestration to a tokio
    /// worker and returns immediately. The summary is logged when the task
    /// reaches a terminal state; the handle yields the outcome for hosts
    /// that want it.
    pub fn spawn_compile(
        &self,
        settings: CompilerSettings,
        input: Utf8PathBuf,
        project_root: Utf8PathBuf,
    ) -> JoinHandle<CompileOutcome> {
        let service = self.clone();
        tokio::spawn(async move {
            let outcome = service.compile(&settings, &input, &project_root).await;
            tracing::info!("{}", outcome.summary(&input));
            outcome
        })
    }

    async fn run(
        &self,
        request: CompileRequest,
        timeout_duration: Duration,
        project_root: &Utf8Path,
    ) -> CompileOutcome {
        tracing::info!(
            "Compiling {} -> {} with {}",
            request.input,
            request.output,
            request.executable
        );

        let start = Instant::now();

        let mut cmd = Command::new(request.executable.as_str());
        cmd.arg("-o")
            .arg(request.output.as_str())
            .arg(request.input.as_str())
            .current_dir(project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the child on timeout must take the process with it.
            .kill_on_drop(true);
        for (key, value) in &request.env {
            cmd.env(key, value);
        }

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!("Failed to spawn {}: {}", request.executable, e);
                return CompileOutcome::SpawnError {
                    message: e.to_string(),
                };
            }
        };

        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return CompileOutcome::SpawnError {
                    message: e.to_string(),
                };
            }
            Err(_) => {
                tracing::warn!(
                    "uic process for {} timed out after {:?}, killing it",
                    request.input,
                    timeout_duration
                );
                return CompileOutcome::TimedOut {
                    after: timeout_duration,
                };
            }
        };

        if !output.stdout.is_empty() {
            tracing::debug!("uic stdout: {}", String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
            tracing::debug!("uic stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::info!(
            "uic process completed in {:.2}s with exit code {}",
            start.elapsed().as_secs_f32(),
            exit_code
        );

        if exit_code == 0 {
            CompileOutcome::Succeeded {
                output: request.output,
            }
        } else {
            CompileOutcome::Failed { exit_code }
        }
    }
}

/// Environment overlay for virtual-environment runs: the venv root variable
/// plus a PATH with the venv scripts directory prepended. Empty when no venv
/// is configured.
fn venv_environment(settings: &CompilerSettings, project_root: &Utf8Path) -> Vec<(String, String)> {
    if settings.virtual_environment_path.is_empty() {
        return Vec::new();
    }

    let venv = resolve_configured_path(
        &settings.virtual_environment_path,
        settings.use_relative_paths,
        project_root,
    );
    let scripts_dir = venv.join(SCRIPTS_DIR);
    let inherited = std::env::var(PATH_VAR).unwrap_or_default();

    vec![
        (VENV_ENV_VAR.to_string(), venv.into_string()),
        (
            PATH_VAR.to_string(),
            format!("{}{}{}", scripts_dir, PATH_LIST_SEPARATOR, inherited),
        ),
    ]
}
