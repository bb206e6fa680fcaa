//! Integration tests for CompilerService
//!
//! These tests drive the full orchestration against fake compiler scripts:
//! exit-status classification, environment injection, output directory
//! creation, timeout enforcement, and spawn failures.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use uicompile::{CompileOutcome, CompilerService, CompilerSettings};

fn project_root(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
}

/// Write an executable shell script standing in for the UI compiler.
fn write_script(path: &Utf8Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn make_input(root: &Utf8Path, relative: &str) -> Utf8PathBuf {
    let input = root.join(relative);
    fs::create_dir_all(input.parent().unwrap()).unwrap();
    fs::write(&input, "<ui version=\"4.0\"/>\n").unwrap();
    input
}

/// Settings pointing straight at a fake compiler, with the venv tier off.
fn settings_for(script: &Utf8Path) -> CompilerSettings {
    CompilerSettings {
        uic_path: script.to_string(),
        virtual_environment_path: String::new(),
        use_relative_paths: false,
        ..CompilerSettings::default()
    }
}

#[tokio::test]
async fn test_successful_compile_reports_output_path() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);

    let script = root.join("tools/fake-uic");
    write_script(&script, "exit 0");
    let input = make_input(&root, "ui/form.ui");

    let service = CompilerService::new();
    let outcome = service.compile(&settings_for(&script), &input, &root).await;

    assert_eq!(
        outcome,
        CompileOutcome::Succeeded {
            output: root.join("ui/form.py")
        }
    );
}

#[tokio::test]
async fn test_nonzero_exit_reports_failure_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);

    let script = root.join("tools/fake-uic");
    write_script(&script, "echo 'bad input' >&2\nexit 1");
    let input = make_input(&root, "ui/form.ui");

    let service = CompilerService::new();
    let outcome = service.compile(&settings_for(&script), &input, &root).await;

    assert_eq!(outcome, CompileOutcome::Failed { exit_code: 1 });
}

#[tokio::test]
async fn test_hung_compiler_is_killed_and_reported() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);

    // Absolute sleep path: another test in this binary empties PATH.
    let script = root.join("tools/fake-uic");
    write_script(&script, "/bin/sleep 30");
    let input = make_input(&root, "ui/form.ui");

    let mut settings = settings_for(&script);
    settings.compile_timeout = 1;

    let start = Instant::now();
    let service = CompilerService::new();
    let outcome = service.compile(&settings, &input, &root).await;

    assert_eq!(
        outcome,
        CompileOutcome::TimedOut {
            after: Duration::from_secs(1)
        }
    );
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "caller must not stay blocked past the timeout margin"
    );
}

#[tokio::test]
async fn test_missing_executable_reports_searched_paths() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);
    let input = make_input(&root, "ui/form.ui");

    // Empty PATH directory keeps the system tier from finding anything.
    std::env::set_var("PATH", root.as_str());

    let settings = CompilerSettings {
        uic_path: "tools/not-there".to_string(),
        virtual_environment_path: "no-venv".to_string(),
        ..CompilerSettings::default()
    };

    let service = CompilerService::new();
    let outcome = service.compile(&settings, &input, &root).await;

    assert_eq!(
        outcome,
        CompileOutcome::ExecutableNotFound {
            venv_path: "no-venv".to_string(),
            custom_path: "tools/not-there".to_string(),
        }
    );

    let summary = outcome.summary(&input);
    assert!(summary.contains("no-venv"));
    assert!(summary.contains("tools/not-there"));
}

#[tokio::test]
async fn test_venv_environment_reaches_subprocess() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);

    let venv_dir = TempDir::new().unwrap();
    let venv = project_root(&venv_dir);

    // The fake compiler writes its VIRTUAL_ENV into the output file ($2
    // follows the -o flag).
    let script = root.join("tools/fake-uic");
    write_script(&script, "printf '%s' \"$VIRTUAL_ENV\" > \"$2\"");
    let input = make_input(&root, "ui/form.ui");

    let settings = CompilerSettings {
        uic_path: script.to_string(),
        virtual_environment_path: venv.to_string(),
        use_relative_paths: false,
        output_path: "gen/".to_string(),
        ..CompilerSettings::default()
    };

    let service = CompilerService::new();
    let outcome = service.compile(&settings, &input, &root).await;

    let expected_output = root.join("gen/form.py");
    assert_eq!(
        outcome,
        CompileOutcome::Succeeded {
            output: expected_output.clone()
        }
    );

    // The orchestrator created gen/ before spawning, and the subprocess saw
    // the injected environment.
    let written = fs::read_to_string(&expected_output).unwrap();
    assert_eq!(written, venv.as_str());
}

#[tokio::test]
async fn test_unlaunchable_executable_is_a_spawn_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);

    // Exists and is a file, so resolution succeeds, but it has no execute
    // bit, so the spawn fails.
    let script = root.join("tools/fake-uic");
    fs::create_dir_all(script.parent().unwrap()).unwrap();
    fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

    let input = make_input(&root, "ui/form.ui");

    let service = CompilerService::new();
    let outcome = service.compile(&settings_for(&script), &input, &root).await;

    assert!(matches!(outcome, CompileOutcome::SpawnError { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_compilations_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let root = project_root(&temp_dir);

    let script = root.join("tools/fake-uic");
    write_script(&script, "exit 0");

    let first_input = make_input(&root, "ui/first.ui");
    let second_input = make_input(&root, "ui/second.ui");

    let service = CompilerService::new();
    let first = service.spawn_compile(settings_for(&script), first_input, root.clone());
    let second = service.spawn_compile(settings_for(&script), second_input, root.clone());

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert_eq!(
        first,
        CompileOutcome::Succeeded {
            output: root.join("ui/first.py")
        }
    );
    assert_eq!(
        second,
        CompileOutcome::Succeeded {
            output: root.join("ui/second.py")
        }
    );
}
