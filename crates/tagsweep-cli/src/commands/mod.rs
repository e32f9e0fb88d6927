//! CLI commands and argument parsing.

pub mod prune;

use clap::{Parser, Subcommand};

/// tagsweep - tag retention for Docker/OCI registries
#[derive(Parser)]
#[command(name = "tagsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Delete all but the newest tags of every repository
    Prune(prune::PruneArgs),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_subcommand() {
        let cli = Cli::try_parse_from(["tagsweep", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }
}
