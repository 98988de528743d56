//! reminders - phase-by-phase "things to remember" for tabletop army units.
//!
//! Three subcommands:
//!
//! - **unit**: reminders for one unit, e.g. `reminders unit intercessor --catalog sm.json`
//! - **list**: every unit (or detachment) the loaded catalogs define
//! - **roster**: reminders for every unit of a roster selection file
//!
//! Catalogs come either from explicit files (`--catalog` plus `--import`) or
//! from a directory of converted catalogs (`--library` plus `--army`), in
//! which case imports are resolved through the primary catalog's links.

use anyhow::{bail, Context, Result};
use catalog_rules::{Document, Phase, ReminderConfig, RosterSelection};
use clap::{Args, Parser, Subcommand};
use reminder_core::{
    create_renderer, CatalogIndex, CatalogLibrary, NameMatch, ReminderAggregator, ReminderError, RosterReport,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reminders",
    version,
    about = "Phase-by-phase ability reminders from converted army catalogs"
)]
struct Cli {
    /// TOML file overriding the classifier table, filters or layout
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reminders for a single unit
    Unit {
        /// Unit name; partial names are accepted when they are unique
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Detachment whose abilities are added
        #[arg(short, long)]
        detachment: Option<String>,

        /// Only show these phases, e.g. `-p command -p shooting` (repeatable)
        #[arg(short, long = "phase")]
        phases: Vec<Phase>,

        /// Output format: text (default), paged, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the units the loaded catalogs define
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// List detachments instead of units
        #[arg(long)]
        detachments: bool,

        /// Output format: text (default), paged, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Reminders for every unit of a roster selection
    Roster {
        /// Roster selection JSON: an object with `units`, or a bare array of units
        roster: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Detachment to use instead of the roster's own
        #[arg(short, long)]
        detachment: Option<String>,

        /// Print the roster overview instead of reminders
        #[arg(long)]
        summary: bool,

        /// Output format: text (default), paged, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Primary catalog JSON
    #[arg(short, long, conflicts_with = "library")]
    catalog: Option<PathBuf>,

    /// Additional catalog JSON merged below the primary (repeatable)
    #[arg(short, long = "import", requires = "catalog")]
    imports: Vec<PathBuf>,

    /// Directory of converted catalogs; imports follow catalogue links
    #[arg(short = 'L', long)]
    library: Option<PathBuf>,

    /// Primary catalog name within --library
    #[arg(short, long, requires = "library")]
    army: Option<String>,

    /// Base rules document (rules and profiles only)
    #[arg(short, long)]
    base: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Ambiguous names exit with 2, everything else with 1.
fn report_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ReminderError>() {
        Some(ReminderError::Ambiguous { query, candidates }) => {
            eprintln!("Multiple units match '{}':", query);
            for (i, name) in candidates.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, name);
            }
            ExitCode::from(2)
        }
        Some(not_found) => {
            eprintln!("{}", not_found);
            ExitCode::from(1)
        }
        None => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            ReminderConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => ReminderConfig::default(),
    };

    match &cli.command {
        Command::Unit {
            name,
            source,
            detachment,
            phases,
            format,
        } => {
            let renderer = create_renderer(format, &config)?;
            let index = load_index(source, None)?;
            let aggregator = ReminderAggregator::with_config(&index, &config);
            let mut set = aggregator.reminders(&name.join(" "), detachment.as_deref())?;
            set.retain_phases(phases);
            print!("{}", renderer.render_unit(&set)?);
        }
        Command::List {
            source,
            detachments,
            format,
        } => {
            let renderer = create_renderer(format, &config)?;
            let index = load_index(source, None)?;
            let names = if *detachments {
                index.detachment_names()
            } else {
                index.unit_names()
            };
            print!("{}", renderer.render_unit_list(&names)?);
        }
        Command::Roster {
            roster,
            source,
            detachment,
            summary,
            format,
        } => {
            let mut selection = RosterSelection::load(roster)
                .with_context(|| format!("failed to read roster {}", roster.display()))?;
            if let Some(detachment) = detachment {
                selection.detachment = Some(detachment.clone());
            }
            if *summary {
                println!("{}", selection.summary());
                return Ok(());
            }

            let renderer = create_renderer(format, &config)?;
            let index = load_index(source, selection.army.as_deref())?;
            let aggregator = ReminderAggregator::with_config(&index, &config);
            let report = RosterReport::build(&aggregator, &selection);
            print!("{}", renderer.render_roster(&report)?);
        }
    }

    Ok(())
}

fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

/// Build the index from explicit files or from a library directory.
/// `army_hint` names the primary catalog when `--army` is not given.
fn load_index(source: &SourceArgs, army_hint: Option<&str>) -> Result<CatalogIndex> {
    let base = source.base.as_deref().map(load_document).transpose()?;

    if let Some(path) = &source.catalog {
        let primary = load_document(path)?;
        let imports = source
            .imports
            .iter()
            .map(|p| load_document(p))
            .collect::<Result<Vec<_>>>()?;
        return Ok(CatalogIndex::build(&primary, &imports, base.as_ref()));
    }

    let Some(dir) = &source.library else {
        bail!("either --catalog or --library is required");
    };
    let library = CatalogLibrary::load_dir(dir)
        .with_context(|| format!("failed to load catalogs from {}", dir.display()))?;
    let army = source
        .army
        .as_deref()
        .or(army_hint)
        .context("--army is required with --library")?;

    let primary = match library.find(army) {
        NameMatch::Found { item, .. } => item,
        NameMatch::Ambiguous(hits) => {
            let names: Vec<&str> = hits.iter().map(|d| d.name()).collect();
            bail!("army '{}' matches several catalogs: {}", army, names.join(", "));
        }
        NameMatch::NoMatch => bail!("no catalog named '{}' in {}", army, dir.display()),
    };
    info!(army = %primary.name(), documents = library.len(), "primary catalog selected");

    Ok(library.build_index(primary, base.as_ref()))
}
