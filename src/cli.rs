// CLI module - command-line argument parsing and handlers
//
// - (no subcommand): run the API server
// - config --show | --path | --reset: configuration management
// - swipe: terminal swiper against a running server

use clap::{Parser, Subcommand, ValueEnum};
use petmatch::config::{Config, VERSION};
use petmatch::store::{Id, Species};
use std::io::Write;

/// PetMatch - pet adoption matching service
#[derive(Parser)]
#[command(name = "petmatch")]
#[command(version = VERSION)]
#[command(about = "Pet adoption matching API and terminal swiper", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Swipe through the catalog in the terminal
    Swipe(SwipeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct SwipeArgs {
    /// Server base URL (defaults to [swipe].server_url)
    #[arg(long)]
    pub server: Option<String>,

    /// User id reported with each decision
    #[arg(long, default_value_t = 2)]
    pub user_id: Id,

    /// Only show one species
    #[arg(long, value_enum)]
    pub species: Option<SpeciesArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SpeciesArg {
    Dog,
    Cat,
}

impl From<SpeciesArg> for Species {
    fn from(arg: SpeciesArg) -> Self {
        match arg {
            SpeciesArg::Dog => Species::Dog,
            SpeciesArg::Cat => Species::Cat,
        }
    }
}

/// What main should do after argument parsing
pub enum Mode {
    Serve,
    Swipe(SwipeArgs),
    /// A command already ran to completion
    Done,
}

pub fn handle_cli() -> Mode {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else {
                println!("Usage: petmatch config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Mode::Done
        }
        Some(Commands::Swipe(args)) => Mode::Swipe(args),
        None => Mode::Serve,
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_args() {
        let cli = Cli::try_parse_from([
            "petmatch",
            "swipe",
            "--server",
            "http://localhost:4000",
            "--species",
            "cat",
        ])
        .unwrap();

        let Some(Commands::Swipe(args)) = cli.command else {
            panic!("expected swipe subcommand");
        };
        assert_eq!(args.server.as_deref(), Some("http://localhost:4000"));
        assert_eq!(args.user_id, 2);
        assert!(matches!(args.species, Some(SpeciesArg::Cat)));
    }

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["petmatch"]).unwrap();
        assert!(cli.command.is_none());
    }
}
