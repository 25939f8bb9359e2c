//! Sequence command implementation for the carpool CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::{Coordinate, Sequence, Sequencer, Waypoint};
use carpool_sequencer::{NearestNeighbourSequencer, SequencerConfig};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{load_json, require_existing_file, write_json};
use crate::{ARG_PICKUP_BIAS, ARG_REQUEST, CliError, ENV_SEQUENCE_REQUEST};

/// CLI arguments for the `sequence` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "sequence",
    long_about = "Order a driver's pickups and dropoffs so that every \
                 passenger is picked up before being dropped off. The \
                 request is a JSON object with a `start` coordinate and a \
                 `waypoints` array; no routing service is contacted.",
    about = "Order pickups and dropoffs for a driver"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct SequenceArgs {
    /// Path to a JSON file containing the sequencing request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Multiplier applied to pickup distances (default 0.9).
    #[arg(long = ARG_PICKUP_BIAS, value_name = "factor")]
    #[serde(default)]
    pub(crate) pickup_bias: Option<f64>,
}

impl SequenceArgs {
    pub(crate) fn into_config(self) -> Result<SequenceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SequenceConfig::try_from(merged)
    }
}

/// Resolved `sequence` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SequenceConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) sequencer: SequencerConfig,
}

impl TryFrom<SequenceArgs> for SequenceConfig {
    type Error = CliError;

    fn try_from(args: SequenceArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_SEQUENCE_REQUEST,
        })?;
        let mut sequencer = SequencerConfig::default();
        if let Some(bias) = args.pickup_bias {
            if !(bias.is_finite() && bias > 0.0) {
                return Err(CliError::InvalidOption {
                    field: ARG_PICKUP_BIAS,
                    expected: "a positive number",
                    value: bias,
                });
            }
            sequencer = sequencer.with_pickup_bias(bias);
        }
        Ok(Self {
            request_path,
            sequencer,
        })
    }
}

/// JSON payload accepted by `carpool sequence`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct SequenceRequest {
    /// Driver's current position.
    pub(crate) start: Coordinate,
    /// Stops to order.
    #[serde(default)]
    pub(crate) waypoints: Vec<Waypoint>,
}

pub(crate) fn run_sequence_with(args: SequenceArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let sequence = execute_sequence(&config)?;
    write_json(writer, &sequence)
}

pub(crate) fn execute_sequence(config: &SequenceConfig) -> Result<Sequence, CliError> {
    let request = load_sequence_request(&config.request_path)?;
    log::debug!(
        "sequencing {} waypoints from {:?}",
        request.waypoints.len(),
        request.start
    );
    let sequencer = NearestNeighbourSequencer::with_config(config.sequencer);
    Ok(sequencer.sequence(request.start, &request.waypoints))
}

/// Loads a JSON-encoded [`SequenceRequest`] from disk.
pub(crate) fn load_sequence_request(path: &Utf8Path) -> Result<SequenceRequest, CliError> {
    require_existing_file(path, ARG_REQUEST)?;
    load_json(path)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SequenceConfig, CliError> {
    let merged = SequenceArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SequenceConfig::try_from(merged)
}
