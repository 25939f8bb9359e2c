//! Detour command implementation for the carpool CLI.

use std::io::Write;
use std::time::{Duration, SystemTime};

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::{
    Coordinate, DetourAssessment, DetourCost, DetourPolicy, Ride, RideId, RouteCostService,
    RouteProvider,
};
use carpool_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{load_json, require_existing_file, write_json};
use crate::{
    ARG_MAX_EXTRA_METERS, ARG_MAX_EXTRA_MINUTES, ARG_OSRM_BASE_URL, ARG_OSRM_PROFILE,
    ARG_OSRM_TIMEOUT_SECS, ARG_REQUEST, CliError, ENV_DETOUR_REQUEST,
};

/// CLI arguments for the `detour` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "detour",
    long_about = "Price the detour a new passenger adds to a ride. The \
                 request is a JSON object holding the `ride` (with its \
                 principal route) plus the passenger's `pickup` and \
                 `dropoff`. An OSRM instance is queried once for the route \
                 through both stops.",
    about = "Measure the detour a new passenger adds to a ride"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct DetourArgs {
    /// Path to a JSON file containing the detour request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile (default "driving").
    #[arg(long = ARG_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Request timeout in seconds (default 30).
    #[arg(long = ARG_OSRM_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) osrm_timeout_secs: Option<u64>,
    /// Largest acceptable extra travel time in minutes (default 15).
    #[arg(long = ARG_MAX_EXTRA_MINUTES, value_name = "minutes")]
    #[serde(default)]
    pub(crate) max_extra_minutes: Option<u64>,
    /// Largest acceptable extra distance in metres (default 2000).
    #[arg(long = ARG_MAX_EXTRA_METERS, value_name = "metres")]
    #[serde(default)]
    pub(crate) max_extra_meters: Option<f64>,
}

impl DetourArgs {
    pub(crate) fn into_config(self) -> Result<DetourConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DetourConfig::try_from(merged)
    }
}

/// Resolved `detour` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DetourConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) provider: HttpRouteProviderConfig,
    pub(crate) policy: DetourPolicy,
}

impl TryFrom<DetourArgs> for DetourConfig {
    type Error = CliError;

    fn try_from(args: DetourArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_DETOUR_REQUEST,
        })?;

        let mut provider = args
            .osrm_base_url
            .map_or_else(HttpRouteProviderConfig::default, HttpRouteProviderConfig::new);
        if let Some(profile) = args.osrm_profile {
            provider = provider.with_profile(profile);
        }
        if let Some(secs) = args.osrm_timeout_secs {
            provider = provider.with_timeout(Duration::from_secs(secs));
        }

        let mut policy = DetourPolicy::default();
        if let Some(minutes) = args.max_extra_minutes {
            policy = policy.with_max_extra_duration(Duration::from_secs(minutes.saturating_mul(60)));
        }
        if let Some(metres) = args.max_extra_meters {
            if !(metres.is_finite() && metres >= 0.0) {
                return Err(CliError::InvalidOption {
                    field: ARG_MAX_EXTRA_METERS,
                    expected: "a non-negative number",
                    value: metres,
                });
            }
            policy = policy.with_max_extra_distance_meters(metres);
        }

        Ok(Self {
            request_path,
            provider,
            policy,
        })
    }
}

/// JSON payload accepted by `carpool detour`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct DetourRequest {
    /// Ride to extend; must carry exactly one principal route.
    pub(crate) ride: Ride,
    /// Candidate passenger's pickup.
    pub(crate) pickup: Coordinate,
    /// Candidate passenger's dropoff.
    pub(crate) dropoff: Coordinate,
    /// Latest time the passenger wants to arrive; checked against the
    /// ride's departure when both are known.
    #[serde(default)]
    pub(crate) desired_arrival: Option<SystemTime>,
}

/// JSON document printed by `carpool detour`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct DetourReport {
    pub(crate) ride_id: RideId,
    pub(crate) available_seats: usize,
    #[serde(flatten)]
    pub(crate) cost: DetourCost,
    pub(crate) assessment: DetourAssessment,
}

/// Builds a route provider for the current detour invocation.
pub(crate) trait RouteProviderBuilder {
    fn build(&self, config: &DetourConfig) -> Result<Box<dyn RouteProvider>, CliError>;
}

pub(crate) struct DefaultRouteProviderBuilder;

impl RouteProviderBuilder for DefaultRouteProviderBuilder {
    fn build(&self, config: &DetourConfig) -> Result<Box<dyn RouteProvider>, CliError> {
        let provider = HttpRouteProvider::with_config(config.provider.clone()).map_err(|source| {
            CliError::BuildRouteProvider {
                base_url: config.provider.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(provider))
    }
}

pub(crate) fn run_detour_with(
    args: DetourArgs,
    builder: &dyn RouteProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_detour(&config, builder)?;
    write_json(writer, &report)
}

pub(crate) fn execute_detour(
    config: &DetourConfig,
    builder: &dyn RouteProviderBuilder,
) -> Result<DetourReport, CliError> {
    let request = load_detour_request(&config.request_path)?;
    let provider = builder.build(config)?;
    let costs = RouteCostService::new(provider);

    let cost = costs.detour_cost(&request.ride, request.pickup, request.dropoff)?;
    let assessment = match (request.ride.departure, request.desired_arrival) {
        (Some(departure), Some(deadline)) => config.policy.assess_arrival(&cost, departure, deadline),
        _ => config.policy.assess(&cost),
    };
    if !assessment.viable {
        log::warn!(
            "ride {}: detour adds {:.0} m / {:.0} s, beyond policy limits",
            request.ride.id,
            cost.extra.distance_meters,
            cost.extra.duration_seconds
        );
    }
    Ok(DetourReport {
        ride_id: request.ride.id,
        available_seats: request.ride.available_seats(),
        cost,
        assessment,
    })
}

/// Loads a JSON-encoded [`DetourRequest`] from disk.
pub(crate) fn load_detour_request(path: &Utf8Path) -> Result<DetourRequest, CliError> {
    require_existing_file(path, ARG_REQUEST)?;
    load_json(path)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<DetourConfig, CliError> {
    let merged = DetourArgs::merge_from_layers(layers).map_err(CliError::from)?;
    DetourConfig::try_from(merged)
}
