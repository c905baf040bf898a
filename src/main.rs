use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use cadastre::config::AppConfig;
use cadastre::error::AppError;
use cadastre::export;
use cadastre::import::citizens::CitizenImporter;
use cadastre::import::districts::DistrictImporter;
use cadastre::repository::InMemoryCadastre;
use cadastre::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "cadastre",
    about = "Batch import/export runner for the cadastral property registry",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import the given batches, then emit the export documents (default)
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
struct BatchArgs {
    /// District batch document (XML); falls back to CADASTRE_DISTRICTS_FILE
    #[arg(long)]
    districts: Option<PathBuf>,
    /// Citizen batch document (JSON); falls back to CADASTRE_CITIZENS_FILE
    #[arg(long)]
    citizens: Option<PathBuf>,
    /// Write the properties-with-owners JSON export to this path
    #[arg(long)]
    owners_out: Option<PathBuf>,
    /// Write the filtered-properties XML export to this path
    #[arg(long)]
    district_out: Option<PathBuf>,
    /// Print both exports to stdout after the import reports
    #[arg(long)]
    print_exports: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let Command::Batch(args) = cli.command.unwrap_or_else(|| Command::Batch(BatchArgs::default()));
    run_batch(args)
}

fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut store = InMemoryCadastre::new();

    if let Some(path) = args.districts.or(config.batch.districts_file) {
        info!(path = %path.display(), "importing district batch");
        let report = DistrictImporter::from_path(&mut store, &path)?;
        println!("{report}");
    }

    if let Some(path) = args.citizens.or(config.batch.citizens_file) {
        info!(path = %path.display(), "importing citizen batch");
        let report = CitizenImporter::from_path(&mut store, &path)?;
        println!("{report}");
    }

    if args.owners_out.is_some() || args.print_exports {
        let owners = export::properties_with_owners(&store)?;
        match &args.owners_out {
            Some(path) => {
                fs::write(path, &owners)?;
                info!(path = %path.display(), "owners export written");
            }
            None => println!("{owners}"),
        }
    }

    if args.district_out.is_some() || args.print_exports {
        let filtered = export::filtered_properties_with_district(&store)?;
        match &args.district_out {
            Some(path) => {
                fs::write(path, &filtered)?;
                info!(path = %path.display(), "district export written");
            }
            None => println!("{filtered}"),
        }
    }

    info!("batch complete");
    Ok(())
}
