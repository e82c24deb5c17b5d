// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Storyboard scripting and timeline authoring
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a timeline from a storyboard script
    Run(RunArgs),
    /// Print a saved project
    Show(ShowArgs),
}

/// Arguments for `run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Storyboard script to parse
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Session configuration (RON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save the resulting project to this file
    #[arg(short = 's', long = "save", value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Seconds between consecutive script commands
    #[arg(long = "step", value_name = "SECONDS", default_value_t = 1.0)]
    pub step: f64,
}

/// Arguments for `show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project file to load
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "ordoplay_animator",
            "run",
            "story.txt",
            "--save",
            "story.ordoanim",
            "--step",
            "2.5",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.script, PathBuf::from("story.txt"));
        assert_eq!(args.save, Some(PathBuf::from("story.ordoanim")));
        assert_eq!(args.step, 2.5);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::parse_from(["ordoplay_animator", "show", "story.ordoanim"]);
        assert!(matches!(cli.command, Commands::Show(_)));
        assert!(Cli::try_parse_from(["ordoplay_animator"]).is_err());
    }
}
