use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gese_data_manager::app::{App, LoadOptions};
use gese_data_manager::benchmark::BenchmarkFilter;
use gese_data_manager::error::GeseError;
use gese_data_manager::output::{JsonOutput, LogSink};
use gese_data_manager::registry::HttpRegistryClient;
use gese_data_manager::sources::Sources;
use gese_data_manager::store::Store;

#[derive(Parser)]
#[command(name = "gese-dm")]
#[command(about = "Genomic-selection benchmark dataset manager (EasyGeSe collection)")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List available species with metadata")]
    List,
    #[command(about = "Load a species' genotype/phenotype/CV-split triple")]
    Fetch(FetchArgs),
    #[command(about = "List traits for a species")]
    Traits(SpeciesArgs),
    #[command(about = "Show CV-fold membership for one trait")]
    Cv(CvArgs),
    #[command(about = "Load filtered benchmark results")]
    Bench(BenchArgs),
    #[command(about = "Download files into the local cache for offline use")]
    Prime(PrimeArgs),
}

#[derive(Args, Clone)]
struct FetchArgs {
    species: String,

    #[arg(long)]
    download: bool,

    #[arg(long)]
    dir: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct SpeciesArgs {
    species: String,

    #[arg(long)]
    dir: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct CvArgs {
    species: String,

    #[arg(value_name = "TRAIT")]
    trait_name: String,

    #[arg(long)]
    dir: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct BenchArgs {
    #[arg(long = "species")]
    species: Vec<String>,

    #[arg(long = "trait")]
    traits: Vec<String>,

    #[arg(long = "model")]
    models: Vec<String>,

    #[arg(long, help = "Use per-run raw results instead of the summary")]
    raw: bool,

    #[arg(long)]
    download: bool,

    #[arg(long)]
    dir: Option<Utf8PathBuf>,
}

#[derive(Args)]
struct PrimeArgs {
    #[command(subcommand)]
    command: PrimeCommand,
}

#[derive(Subcommand)]
enum PrimeCommand {
    #[command(about = "Download the species index and alias map")]
    Index {
        #[arg(long)]
        force: bool,
    },
    #[command(about = "Download one species' data files")]
    Species {
        species: String,

        #[arg(long)]
        dir: Option<Utf8PathBuf>,

        #[arg(long)]
        force: bool,
    },
    #[command(about = "Download the benchmark result files")]
    Benchmarks {
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<GeseError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GeseError) -> u8 {
    match error {
        GeseError::InvalidSpecies(_)
        | GeseError::UnknownSpecies { .. }
        | GeseError::UnknownTrait { .. } => 2,
        GeseError::RegistryHttp(_)
        | GeseError::RegistryStatus { .. }
        | GeseError::DataUnavailable { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = Store::new().into_diagnostic()?;
    store.ensure_cache_root().into_diagnostic()?;
    let registry = HttpRegistryClient::new().into_diagnostic()?;
    let app = App::new(store, registry, Sources::default());
    let sink = LogSink;

    match cli.command {
        Commands::List => {
            let result = app.list_species(&sink).into_diagnostic()?;
            JsonOutput::print_species_list(&result).into_diagnostic()?;
        }
        Commands::Fetch(args) => {
            let options = LoadOptions {
                download: args.download,
                data_dir: args.dir,
            };
            let data = app
                .load_species(&args.species, &options, &sink)
                .into_diagnostic()?;
            JsonOutput::print_species_summary(&data.summary()).into_diagnostic()?;
        }
        Commands::Traits(args) => {
            let options = LoadOptions {
                download: false,
                data_dir: args.dir,
            };
            let data = app
                .load_species(&args.species, &options, &sink)
                .into_diagnostic()?;
            JsonOutput::print_traits(&data.species, data.y.traits()).into_diagnostic()?;
        }
        Commands::Cv(args) => {
            let options = LoadOptions {
                download: false,
                data_dir: args.dir,
            };
            let data = app
                .load_species(&args.species, &options, &sink)
                .into_diagnostic()?;
            let table = data.z.cv_indices(&args.trait_name).into_diagnostic()?;
            JsonOutput::print_cv_table(table).into_diagnostic()?;
        }
        Commands::Bench(args) => {
            let filter = BenchmarkFilter {
                species: args.species,
                traits: args.traits,
                models: args.models,
            };
            let options = LoadOptions {
                download: args.download,
                data_dir: args.dir,
            };
            let table = app
                .load_benchmark_results(&filter, !args.raw, &options, &sink)
                .into_diagnostic()?;
            JsonOutput::print_benchmark(&table).into_diagnostic()?;
        }
        Commands::Prime(args) => {
            let result = match args.command {
                PrimeCommand::Index { force } => app.prime_index(force, &sink).into_diagnostic()?,
                PrimeCommand::Species {
                    species,
                    dir,
                    force,
                } => app
                    .prime_species(&species, dir.as_deref(), force, &sink)
                    .into_diagnostic()?,
                PrimeCommand::Benchmarks { force } => {
                    app.prime_benchmarks(force, &sink).into_diagnostic()?
                }
            };
            JsonOutput::print_prime(&result).into_diagnostic()?;
        }
    }

    Ok(())
}
