//! fontreg CLI (made by FontLab https://www.fontlab.com/)

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fontreg_core::manager::{AuditReport, Batch, FontManager, Operation, Reporter};
use fontreg_core::notify::ChangeNotifier;
use fontreg_core::outcome::Outcome;
use fontreg_core::output::{write_audit_json, write_json_pretty, write_ndjson};
use fontreg_core::platform::system_manager;
use fontreg_core::resources::FontResources;
use fontreg_core::settings::Settings;
use fontreg_core::store::{InstalledFontRecord, RegistrationStore};

/// CLI entrypoint for fontreg.
#[derive(Debug, Parser)]
#[command(
    name = "fontreg",
    about = "Install, register and uninstall system fonts (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    apply: ApplyArgs,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registration records
    List(ListArgs),
    /// Compare the fonts directory with the registration records
    Audit(AuditArgs),
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Font files to install
    #[arg(short = 'i', long = "install", value_delimiter = ',', value_hint = ValueHint::FilePath)]
    install: Vec<String>,

    /// Installed font file names (or paths ending in them) to uninstall
    #[arg(short = 'u', long = "uninstall", value_delimiter = ',', value_hint = ValueHint::Other)]
    uninstall: Vec<String>,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Only log errors
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every step
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    /// Fonts directory to manage instead of the system one
    #[arg(long = "fonts-dir", global = true, value_hint = ValueHint::DirPath)]
    fonts_dir: Option<PathBuf>,

    /// Registration store file (platforms without a font registry)
    #[arg(long = "registry", global = true, value_hint = ValueHint::FilePath)]
    registry: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct AuditArgs {
    /// Emit the report as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

/// Logs each outcome as a status line.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, operation: Operation, target: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Installed { display_name } => {
                info!("Installed '{target}' as '{display_name}'")
            }
            Outcome::Uninstalled { .. } => info!("Uninstalled '{target}'"),
            Outcome::SkippedAlreadyExists => info!("'{target}' is already installed, skipping"),
            Outcome::SkippedNotFound => warn!("Cannot {operation} '{target}': file not found"),
            Outcome::SkippedMalformedPath => {
                warn!("Cannot {operation} '{target}': malformed path")
            }
            Outcome::Failed(err) => error!("Failed to {operation} '{target}': {err}"),
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.quiet, cli.global.verbose);

    let settings = Settings::from_env()
        .with_fonts_dir(cli.global.fonts_dir.clone())
        .with_registry_file(cli.global.registry.clone());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Some(command) => {
            if !build_batch(&cli.apply).is_empty() {
                return Err(anyhow!(
                    "--install/--uninstall cannot be combined with a subcommand"
                ));
            }
            let manager = system_manager(&settings)?;
            match command {
                Command::List(args) => run_list(&manager, &args, &mut handle),
                Command::Audit(args) => run_audit(&manager, &args, &mut handle),
            }
        }
        None => {
            let batch = build_batch(&cli.apply);
            if batch.is_empty() {
                return Err(anyhow!(
                    "nothing to do: pass --install and/or --uninstall (see --help)"
                ));
            }
            let mut manager = system_manager(&settings)?;
            run_batch(&mut manager, &batch, &mut LogReporter)
        }
    }
}

/// Install the compact stderr logger. `RUST_LOG` overrides the flags.
pub fn init_logging(quiet: bool, verbose: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

fn build_batch(args: &ApplyArgs) -> Batch {
    let clean = |raw: &[String]| -> Vec<String> {
        raw.iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    Batch::new()
        .with_install(clean(&args.install))
        .with_uninstall(clean(&args.uninstall))
}

fn run_batch<S, R, N>(
    manager: &mut FontManager<S, R, N>,
    batch: &Batch,
    reporter: &mut dyn Reporter,
) -> Result<()>
where
    S: RegistrationStore,
    R: FontResources,
    N: ChangeNotifier,
{
    let results = manager.run_batch(batch, reporter);
    let failed = results.iter().filter(|(_, o)| o.is_failure()).count();

    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} font operation(s) failed",
            results.len()
        ));
    }
    Ok(())
}

fn run_list<S, R, N>(
    manager: &FontManager<S, R, N>,
    args: &ListArgs,
    mut w: impl Write,
) -> Result<()>
where
    S: RegistrationStore,
    R: FontResources,
    N: ChangeNotifier,
{
    let records = manager.records()?;

    if args.ndjson {
        write_ndjson(&records, &mut w)
    } else if args.json {
        write_json_pretty(&records, &mut w)
    } else {
        write_records_plain(&records, &mut w)
    }
}

fn run_audit<S, R, N>(
    manager: &FontManager<S, R, N>,
    args: &AuditArgs,
    mut w: impl Write,
) -> Result<()>
where
    S: RegistrationStore,
    R: FontResources,
    N: ChangeNotifier,
{
    let report = manager.audit()?;

    if args.json {
        write_audit_json(&report, &mut w)
    } else {
        write_audit_plain(&report, &mut w)
    }
}

fn write_records_plain(records: &[InstalledFontRecord], mut w: impl Write) -> Result<()> {
    let name_width = records
        .iter()
        .map(|r| r.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(0, 80);

    for record in records {
        writeln!(
            w,
            "{:<name_width$}  {}",
            record.display_name, record.file_name
        )?;
    }
    Ok(())
}

fn write_audit_plain(report: &AuditReport, mut w: impl Write) -> Result<()> {
    if report.is_consistent() {
        writeln!(w, "fonts directory and registration records agree")?;
        return Ok(());
    }

    for file in &report.unregistered {
        writeln!(w, "unregistered  {file}")?;
    }
    for record in &report.stale {
        writeln!(w, "stale         {} -> {}", record.display_name, record.file_name)?;
    }
    Ok(())
}
