//! Behaviour-driven step definitions driving the sequence CLI scenarios.

use super::helpers::{SAVASSI, Workspace, write_json, write_utf8};
use super::*;
use crate::sequence::SequenceRequest;
use camino::Utf8PathBuf;
use carpool_core::{Coordinate, Sequence, Waypoint};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct SequenceWorld {
    _workspace: Workspace,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SequenceWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let request_path = workspace.path("sequence.json");
        Self {
            _workspace: workspace,
            request_path,
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["carpool".to_owned(), "sequence".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn printed_sequence(&self) -> Sequence {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON sequence")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> SequenceWorld {
    SequenceWorld::new()
}

#[given("a sequence request with {count} passengers exists on disk")]
fn sequence_request_exists(#[from(world)] world: &SequenceWorld, count: u64) {
    let waypoints = (1..=count)
        .flat_map(|passenger| {
            let offset = f64::from(u32::try_from(passenger).expect("small passenger count"));
            [
                Waypoint::dropoff(Coordinate::new(-19.85 - offset * 0.01, -43.97), passenger, passenger),
                Waypoint::pickup(Coordinate::new(-19.93 + offset * 0.005, -43.94), passenger, passenger),
            ]
        })
        .collect();
    let request = SequenceRequest {
        start: SAVASSI,
        waypoints,
    };
    write_json(&world.request_path, &request);
}

#[given("the sequence request contains invalid JSON")]
fn sequence_request_contains_invalid_json(#[from(world)] world: &SequenceWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("I omit the request path")]
fn omit_request_path(#[from(world)] world: &SequenceWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("I pass {flag} {value}")]
fn pass_flag(#[from(world)] world: &SequenceWorld, flag: String, value: String) {
    let mut args = world.cli_args.borrow_mut();
    args.push(flag.trim_matches('"').to_owned());
    args.push(value.trim_matches('"').to_owned());
}

#[when("I run the sequence command")]
fn run_sequence_command(#[from(world)] world: &SequenceWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Sequence(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_sequence_with(args, &mut *buffer)
        }
        Command::Detour(_) => panic!("expected sequence command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command prints {count} ordered stops")]
fn command_prints_stops(#[from(world)] world: &SequenceWorld, count: usize) {
    let borrowed = world.result.borrow();
    borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");

    let sequence = world.printed_sequence();
    assert_eq!(sequence.waypoints.len(), count);
    assert!(!sequence.diagnostics.fallback_used);
}

#[then("every passenger is picked up before being dropped off")]
fn pickups_precede_dropoffs(#[from(world)] world: &SequenceWorld) {
    let sequence = world.printed_sequence();
    for (index, stop) in sequence.waypoints.iter().enumerate() {
        if stop.is_dropoff() {
            let picked_up_earlier = sequence
                .waypoints
                .iter()
                .take(index)
                .any(|earlier| earlier.is_pickup() && earlier.passenger_id == stop.passenger_id);
            assert!(picked_up_earlier, "passenger {} dropped before pickup", stop.passenger_id);
        }
    }
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &SequenceWorld) {
    match &*world.error() {
        CliError::ParseRequest { path, .. } => assert_eq!(*path, world.request_path),
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &SequenceWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command rejects the {option} option")]
fn command_fails_invalid_option(#[from(world)] world: &SequenceWorld, option: String) {
    match &*world.error() {
        CliError::InvalidOption { field, .. } => assert_eq!(*field, option.trim_matches('"')),
        other => panic!("expected InvalidOption, found {other:?}"),
    }
}

macro_rules! register_sequence_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/sequence_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SequenceWorld) {
            let _ = world;
        }
    };
}

register_sequence_scenario!(sequence_happy_path, "sequencing a request from JSON");
register_sequence_scenario!(sequence_invalid_json, "rejecting invalid JSON input");
register_sequence_scenario!(sequence_missing_request, "rejecting missing request paths");
register_sequence_scenario!(sequence_invalid_bias, "rejecting an unusable pickup bias");
