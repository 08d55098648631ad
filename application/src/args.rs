//! Command line [`Args`] of the server.

use clap::Parser;

/// Web API server of the hotel booking system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TOML file to read the configuration from, if it exists.
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Reads [`Args`] of the current process.
    ///
    /// # Errors
    ///
    /// On unknown or malformed arguments, and on `--help` or `--version`,
    /// which [`clap::Error::exit()`] prints properly.
    pub fn parse() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
