//! Tether CLI — inspect typesystem files and rewrite binding documentation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tether", version, about = "Tether binding documentation tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a typesystem file
    Check {
        /// Typesystem file (.toml)
        typesystem: PathBuf,
    },
    /// Documentation rule inspection and rewriting
    Doc {
        #[command(subcommand)]
        action: DocAction,
    },
    /// Check external tool availability
    Doctor,
}

#[derive(Subcommand)]
enum DocAction {
    /// List the rules that apply to a class or one of its functions
    Rules {
        /// Typesystem file (.toml)
        typesystem: PathBuf,
        #[command(flatten)]
        target: commands::doc::Target,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply the XPath rules for a class or function to documentation XML
    Apply {
        /// Typesystem file (.toml)
        typesystem: PathBuf,
        #[command(flatten)]
        target: commands::doc::Target,
        /// Documentation XML to rewrite
        #[arg(long)]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { typesystem } => commands::check::run(&typesystem),

        Commands::Doc { action } => match action {
            DocAction::Rules {
                typesystem,
                target,
                json,
            } => commands::doc::rules(&typesystem, &target, json),
            DocAction::Apply {
                typesystem,
                target,
                input,
                output,
            } => commands::doc::apply(&typesystem, &target, &input, output.as_deref()),
        },

        Commands::Doctor => commands::doctor::run(),
    }
}
