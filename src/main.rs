use clap::{Parser, Subcommand};
use logo_resizer::config::{self, ResizerConfig};
use logo_resizer::export::{self, DirectoryTarget, ExportSettings};
use logo_resizer::imaging::{OutputFormat, RustBackend};
use logo_resizer::output;
use logo_resizer::session::{LoadOutcome, Session};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "logo-resizer")]
#[command(about = "Export a logo at a fixed catalog of sizes")]
#[command(long_about = "\
Export a logo at a fixed catalog of sizes

The logo keeps its aspect ratio and is centered on a canvas of exactly the
target size. PNG canvases are transparent, JPEG canvases are white.

Stock catalog:

  500x378     png
  265x46      png
  398x161     png
  100x50      png
  200x90      png, jpg
  1920x1110   jpg

Files are named <prefix>-<size>.<ext>, e.g. logo-200x90.jpg.

Run 'logo-resizer gen-config' to generate a documented logo-resizer.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./logo-resizer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides export.output_dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog and the files each size produces
    Sizes,
    /// Load an image and print its dimensions
    Info {
        /// Logo to load
        image: Option<PathBuf>,
    },
    /// Export one size in one format
    Export {
        /// Logo to load
        image: Option<PathBuf>,
        /// Catalog entry name, e.g. 200x90
        #[arg(long)]
        size: String,
        /// png or jpg
        #[arg(long)]
        format: OutputFormat,
    },
    /// Export every size in every declared format
    Batch {
        /// Logo to load
        image: Option<PathBuf>,
        /// Pause between exports in milliseconds (overrides export.delay_ms)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Print the batch report as JSON when done
        #[arg(long)]
        json: bool,
    },
    /// Print a stock logo-resizer.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = resolve_cli_config(cli.config.as_deref())?;
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
    let target = DirectoryTarget::new(&output_dir);
    let backend = RustBackend::new();
    let mut settings = ExportSettings::from_config(&config.export);

    match cli.command {
        Command::Sizes => {
            output::print_catalog(&config.sizes, &settings.prefix);
        }
        Command::Info { image } => {
            let mut session = Session::new();
            if !load_image(&mut session, &backend, image.as_deref()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Export {
            image,
            size,
            format,
        } => {
            let mut session = Session::new();
            if !load_image(&mut session, &backend, image.as_deref()) {
                return Ok(ExitCode::FAILURE);
            }
            if session.image().is_none() {
                return Ok(ExitCode::SUCCESS);
            }
            let record = export::export_single(
                &session,
                &backend,
                &target,
                &config.sizes,
                &size,
                format,
                &settings,
            )?;
            output::print_single_export(&record);
        }
        Command::Batch {
            image,
            delay_ms,
            json,
        } => {
            if let Some(ms) = delay_ms {
                settings.delay = Duration::from_millis(ms);
            }
            let mut session = Session::new();
            if !load_image(&mut session, &backend, image.as_deref()) {
                return Ok(ExitCode::FAILURE);
            }
            if session.image().is_none() {
                return Ok(ExitCode::SUCCESS);
            }

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_export_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = export::export_batch(
                &mut session,
                &backend,
                &target,
                &config.sizes,
                &settings,
                Some(tx),
            )?;
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `--config FILE` if given, else `logo-resizer.toml` from the working directory.
fn resolve_cli_config(path: Option<&Path>) -> Result<ResizerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            Ok(config::load_config_file(path)?)
        }
        None => Ok(config::load_config(Path::new("."))?),
    }
}

/// Load the selected image into the session and report what happened.
///
/// Returns `false` when a file was given but could not be loaded.
fn load_image(session: &mut Session, backend: &RustBackend, image: Option<&Path>) -> bool {
    match session.load_file(backend, image) {
        Ok(LoadOutcome::NoFile) => {
            output::print_no_image();
            true
        }
        Ok(LoadOutcome::Loaded(dims)) => {
            if let Some(path) = image {
                output::print_load_output(path, dims);
            }
            true
        }
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    }
}
