use crate::demo::{run_demo, run_reseed, run_score, DemoArgs, ReseedArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use safety_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Safety Score",
    about = "Compute and serve peer-rating safety scores from the command line",
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
    /// Score one subject from a rating export and print the result as JSON
    Score(ScoreArgs),
    /// Recompute every subject found in rating and block exports
    Reseed(ReseedArgs),
    /// Seed a few synthetic subjects and print their scores
    Demo(DemoArgs),
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
        Command::Reseed(args) => run_reseed(args),
        Command::Demo(args) => run_demo(args),
    }
}
