use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rewatch-cli", version, about = "Rewatch CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Playback simulation
    Simulate {
        #[command(subcommand)]
        action: commands::simulate::SimulateAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Simulate { action } => commands::simulate::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
