//! Command-line interface for the carpool routing engine.
//!
//! Two subcommands are offered:
//! - `sequence` orders a driver's pickups and dropoffs without any network
//!   access.
//! - `detour` prices serving one more passenger on a ride by querying an
//!   OSRM instance and checks the result against the detour policy.
//!
//! Options layer from CLI flags, `CARPOOL_*` environment variables and
//! configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod detour;
mod error;
mod fs;
mod sequence;

pub use error::CliError;

use detour::{DefaultRouteProviderBuilder, DetourArgs, run_detour_with};
use sequence::{SequenceArgs, run_sequence_with};

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_PICKUP_BIAS: &str = "pickup-bias";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_OSRM_PROFILE: &str = "osrm-profile";
pub(crate) const ARG_OSRM_TIMEOUT_SECS: &str = "osrm-timeout-secs";
pub(crate) const ARG_MAX_EXTRA_MINUTES: &str = "max-extra-minutes";
pub(crate) const ARG_MAX_EXTRA_METERS: &str = "max-extra-meters";
pub(crate) const ENV_SEQUENCE_REQUEST: &str = "CARPOOL_CMDS_SEQUENCE_REQUEST_PATH";
pub(crate) const ENV_DETOUR_REQUEST: &str = "CARPOOL_CMDS_DETOUR_REQUEST_PATH";

/// Run the carpool CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, the
/// request cannot be read, routing fails or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Sequence(args) => run_sequence_with(args, &mut stdout),
        Command::Detour(args) => run_detour_with(args, &DefaultRouteProviderBuilder, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "carpool",
    about = "Sequence carpool stops and price passenger detours",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order pickups and dropoffs for a driver.
    Sequence(SequenceArgs),
    /// Measure the detour a new passenger adds to a ride.
    Detour(DetourArgs),
}

#[cfg(test)]
mod tests;
