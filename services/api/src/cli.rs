use crate::commands::{run_assess, run_batch, AssessArgs, BatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Risk Service",
    about = "Assess loan applicants from the command line or serve the prediction API",
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
    /// Assess a single applicant and print the decision
    Assess(AssessArgs),
    /// Assess every applicant in a CSV file
    Batch(BatchArgs),
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
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
    }
}
