#![deny(clippy::disallowed_methods)]

pub mod app_home;
pub mod channels;
pub mod cli;
pub mod error;
pub mod grid;
pub mod gui;
pub mod image_io;
pub mod split;
pub mod tracing;

use crate::cli::Cli;
use clap::CommandFactory;
use clap::FromArgMatches;
pub use channels::Channel;
pub use channels::ChannelAssignment;
pub use error::Error;
pub use error::Result;
pub use grid::GridSpec;
pub use grid::Tile;

pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::command();
    let cli = Cli::from_arg_matches(&cli.get_matches())?;

    // Initialize tracing based on global args (--debug and --json/--log-file)
    crate::tracing::init_tracing(
        cli.global_args.log_level(),
        cli.global_args.json_log_behaviour(),
    )?;

    cli.invoke()?;
    Ok(())
}
