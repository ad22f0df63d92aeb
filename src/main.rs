use clap::Parser;
use person_registry::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
    }
}
