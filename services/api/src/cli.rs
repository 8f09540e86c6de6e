use crate::demo::{run_analyze, run_compare, run_demo, AnalyzeArgs, CompareArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use data_paradox::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Data Paradox",
    about = "Challenge analytical marketing claims for logical fallacies and compare their risk",
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
    /// Analyze a single claim and print its challenge report
    Analyze(AnalyzeArgs),
    /// Compare two competing claims and recommend the lower-risk one
    Compare(CompareArgs),
    /// Run the canned marketing claims through the analyzer
    Demo,
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
        Command::Analyze(args) => run_analyze(args),
        Command::Compare(args) => run_compare(args),
        Command::Demo => run_demo(),
    }
}
