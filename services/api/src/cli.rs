use crate::demo::{run_demo, run_placeholders, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mrp_planner::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mission Risk Profile Planner",
    about = "Run and demonstrate the Mission Risk Profile planner from the command line",
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
    /// Walk a scripted assessment and print scores, sign-off, and export output
    Demo(DemoArgs),
    /// List the placeholder markers a document template may reference
    Placeholders,
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
        Command::Demo(args) => run_demo(args),
        Command::Placeholders => run_placeholders(),
    }
}
