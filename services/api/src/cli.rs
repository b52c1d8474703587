use crate::offline::{run_catalog_check, run_lookup, run_score, CatalogCheckArgs, LookupArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ecoscan::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ecoscan",
    about = "Barcode lookups with sustainability scores and greener alternatives",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a packaging/location/disposal combination
    Score(ScoreArgs),
    /// Catalog seed utilities
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Look up one barcode against a CSV catalog without starting the server
    Lookup(LookupArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Validate a catalog CSV and print summary counts
    Check(CatalogCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Catalog {
            command: CatalogCommand::Check(args),
        } => run_catalog_check(args),
        Command::Lookup(args) => run_lookup(args).await,
    }
}
