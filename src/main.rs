//! uicompile - CLI host for the Qt UI compiler runner.
//!
//! A reference collaborator for the library: it loads the YAML settings,
//! classifies or compiles the given file, prints the outcome summary, and
//! exits non-zero on any failure outcome. IDE hosts wire the same library
//! calls to their own save hooks and notification sinks.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use uicompile::services::is_ui_file;
use uicompile::{APP_NAME, CompilerService, ConfigManager, VERSION};

#[derive(Parser)]
#[command(name = "uicompile", version, about = "Finds and runs the Qt UI compiler against .ui files")]
struct Cli {
    /// Directory holding uicompile.yaml
    #[arg(long, default_value = ".uicompile")]
    config_dir: Utf8PathBuf,

    /// Project root; defaults to the current directory
    #[arg(long)]
    project_root: Option<Utf8PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Compile a UI file to Python
    Compile {
        /// The .ui file to compile
        file: Utf8PathBuf,
    },
    /// Check whether a file would be classified as a compilable UI file
    Check {
        /// The file to classify
        file: Utf8PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = uicompile::logging::setup_logging("logs", APP_NAME, cli.debug, false)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let project_root = match &cli.project_root {
        Some(root) => root.clone(),
        None => Utf8PathBuf::try_from(std::env::current_dir()?)?,
    };

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_settings()?;

    // Worker threads handle the subprocess supervision; the CLI itself only
    // waits for the one outcome it asked for.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("uicompile-worker")
        .build()?;

    let exit_code = match cli.command {
        CliCommand::Compile { file } => {
            let input = absolutize(&file, &project_root);
            let service = CompilerService::new();
            let outcome = runtime.block_on(service.compile(&settings, &input, &project_root));

            println!("{}", outcome.summary(&input));
            if outcome.is_success() { 0 } else { 1 }
        }
        CliCommand::Check { file } => {
            let input = absolutize(&file, &project_root);
            if is_ui_file(&input, &settings.ui_file_pattern, Some(&project_root)) {
                println!("{} is a compilable UI file", input);
                0
            } else {
                println!("{} is not a compilable UI file", input);
                1
            }
        }
    };

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    std::process::exit(exit_code);
}

fn absolutize(path: &Utf8Path, project_root: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
