// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` Animator - storyboard scripting from the command line
//!
//! ## Usage
//!
//! ```bash
//! ordoplay_animator run story.txt                        # Print the timeline
//! ordoplay_animator run story.txt --save story.ordoanim  # ...and save it
//! ordoplay_animator show story.ordoanim                  # Print a saved project
//! ```
//!
//! Logging honours `RUST_LOG`.

mod cli;
mod config;
mod error;
mod project;
mod script;
mod storyboard;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    tracing::debug!("Starting OrdoPlay Animator v{}", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Run(args) => storyboard::run(args),
        Commands::Show(args) => storyboard::show(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ordoplay_animator=info,ordoplay_timeline=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
