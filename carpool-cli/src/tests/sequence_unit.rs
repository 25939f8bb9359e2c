//! Focused unit tests covering sequence CLI configuration and request parsing.

use super::helpers::{PAMPULHA, SAVASSI, Workspace, write_json, write_utf8};
use super::*;
use crate::sequence::{
    SequenceConfig, SequenceRequest, config_from_layers_for_test, execute_sequence,
    load_sequence_request,
};
use carpool_core::{Coordinate, Waypoint, WaypointKind};
use carpool_sequencer::{DEFAULT_PICKUP_BIAS, SequencerConfig};
use rstest::rstest;

fn request() -> SequenceRequest {
    SequenceRequest {
        start: SAVASSI,
        waypoints: vec![
            Waypoint::dropoff(PAMPULHA, 1, 11),
            Waypoint::pickup(Coordinate::new(-19.92, -43.94), 1, 11),
            Waypoint::pickup(Coordinate::new(-19.90, -43.95), 2, 12),
            Waypoint::dropoff(Coordinate::new(-19.86, -43.96), 2, 12),
        ],
    }
}

#[rstest]
fn converting_without_request_errors() {
    let err = SequenceConfig::try_from(SequenceArgs::default()).expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_SEQUENCE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_defaults_the_pickup_bias() {
    let args = SequenceArgs {
        request_path: Some("request.json".into()),
        pickup_bias: None,
    };

    let config = SequenceConfig::try_from(args).expect("config should build");

    assert_eq!(config.sequencer.pickup_bias, DEFAULT_PICKUP_BIAS);
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-0.5)]
#[case::not_a_number(f64::NAN)]
#[case::infinite(f64::INFINITY)]
fn converting_rejects_unusable_bias(#[case] bias: f64) {
    let args = SequenceArgs {
        request_path: Some("request.json".into()),
        pickup_bias: Some(bias),
    };

    let err = SequenceConfig::try_from(args).expect_err("bias should be rejected");
    match err {
        CliError::InvalidOption { field, .. } => assert_eq!(field, ARG_PICKUP_BIAS),
        other => panic!("expected InvalidOption, found {other:?}"),
    }
}

#[rstest]
fn load_request_reports_missing_file() {
    let workspace = Workspace::new();
    let path = workspace.path("absent.json");

    let err = load_sequence_request(&path).expect_err("missing request should error");
    match err {
        CliError::MissingSourceFile { field, path: reported } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(reported, path);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn load_request_rejects_directories() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    std::fs::create_dir(path.as_std_path()).expect("request directory");

    let err = load_sequence_request(&path).expect_err("directory should be rejected");
    assert!(matches!(err, CliError::SourcePathNotFile { .. }), "found {err:?}");
}

#[rstest]
fn load_request_rejects_invalid_json() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_utf8(&path, b"{ \"start\": ");

    let err = load_sequence_request(&path).expect_err("invalid json should error");
    match err {
        CliError::ParseRequest { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[rstest]
fn execute_orders_pickups_before_dropoffs() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_json(&path, &request());
    let config = SequenceConfig {
        request_path: path,
        sequencer: SequencerConfig::default(),
    };

    let plan = execute_sequence(&config).expect("sequencing should succeed");

    let order: Vec<_> = plan
        .waypoints
        .iter()
        .map(|stop| (stop.passenger_id, stop.kind))
        .collect();
    assert_eq!(
        order,
        vec![
            (1, WaypointKind::Pickup),
            (2, WaypointKind::Pickup),
            (2, WaypointKind::Dropoff),
            (1, WaypointKind::Dropoff),
        ]
    );
    assert!(!plan.diagnostics.fallback_used);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "pickup_bias": "closer" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    assert!(matches!(err, CliError::Configuration(_)), "found {err:?}");
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "request_path": "from-file.json", "pickup_bias": 0.5 }),
        None,
    );
    composer.push_environment(json!({ "request_path": "from-env.json" }));
    composer.push_cli(json!({ "pickup_bias": 0.75 }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config should build");

    assert_eq!(config.request_path, "from-env.json");
    assert_eq!(config.sequencer.pickup_bias, 0.75);
}
