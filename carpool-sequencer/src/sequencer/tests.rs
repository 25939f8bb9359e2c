//! Tests for the `NearestNeighbourSequencer`.

use super::*;
use carpool_core::WaypointKind;
use rstest::{fixture, rstest};

use crate::test_support::{flatten, stop_positions, trip};

const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

#[fixture]
fn sequencer() -> NearestNeighbourSequencer {
    NearestNeighbourSequencer::default()
}

#[expect(
    clippy::float_arithmetic,
    reason = "builds coordinates along the equator in thousandths of a degree"
)]
fn east(thousandths: u32) -> Coordinate {
    Coordinate::new(0.0, f64::from(thousandths) * 0.001)
}

#[rstest]
fn empty_input_yields_empty_sequence(sequencer: NearestNeighbourSequencer) {
    let plan = sequencer.sequence(ORIGIN, &[]);

    assert!(plan.waypoints.is_empty());
    assert!(!plan.diagnostics.fallback_used);
    assert!(plan.diagnostics.heuristic_distance_km.abs() < f64::EPSILON);
}

#[rstest]
fn single_pair_is_pickup_then_dropoff(sequencer: NearestNeighbourSequencer) {
    let [pickup, dropoff] = trip(1, east(50), east(10));

    let plan = sequencer.sequence(ORIGIN, &[dropoff.clone(), pickup.clone()]);

    assert_eq!(plan.waypoints, vec![pickup, dropoff]);
}

#[rstest]
fn closer_pickup_is_sequenced_first(sequencer: NearestNeighbourSequencer) {
    let stops = flatten([trip(1, east(30), east(90)), trip(2, east(10), east(80))]);

    let plan = sequencer.sequence(ORIGIN, &stops);

    let first = plan.waypoints.first().expect("non-empty plan");
    assert_eq!((first.passenger_id, first.kind), (2, WaypointKind::Pickup));
}

#[rstest]
fn pickup_bias_prefers_slightly_farther_pickup(sequencer: NearestNeighbourSequencer) {
    // After boarding passenger 1, their dropoff is 0.01 degrees away and
    // passenger 2's pickup 0.01005 degrees away.
    let stops = flatten([trip(1, east(10), east(20)), trip(2, Coordinate::new(0.0, -0.000_05), east(90))]);

    let plan = sequencer.sequence(east(5), &stops);

    let order: Vec<_> = plan.waypoints.iter().map(|w| (w.passenger_id, w.kind)).collect();
    assert_eq!(
        order.get(..2),
        Some(&[(1, WaypointKind::Pickup), (2, WaypointKind::Pickup)][..])
    );
}

#[rstest]
fn neutral_bias_takes_the_nearest_stop() {
    let sequencer = NearestNeighbourSequencer::with_config(SequencerConfig::new().with_pickup_bias(1.0));
    let stops = flatten([trip(1, east(10), east(20)), trip(2, Coordinate::new(0.0, -0.000_05), east(90))]);

    let plan = sequencer.sequence(east(5), &stops);

    let second = plan.waypoints.get(1).expect("four stops");
    assert_eq!((second.passenger_id, second.kind), (1, WaypointKind::Dropoff));
}

#[rstest]
fn coincident_stops_keep_input_order(sequencer: NearestNeighbourSequencer) {
    let stops = flatten([trip(7, east(10), east(20)), trip(3, east(10), east(20))]);

    let plan = sequencer.sequence(ORIGIN, &stops);

    let passengers: Vec<_> = plan.waypoints.iter().map(|w| w.passenger_id).collect();
    assert_eq!(passengers, vec![7, 3, 7, 3]);
}

#[rstest]
fn orphan_dropoff_is_sequenced_by_distance(sequencer: NearestNeighbourSequencer) {
    let orphan = Waypoint::dropoff(east(1), 2, 2);
    let mut stops = flatten([trip(1, east(50), east(60))]);
    stops.push(orphan.clone());

    let plan = sequencer.sequence(ORIGIN, &stops);

    assert_eq!(plan.waypoints.first(), Some(&orphan));
    assert_eq!(plan.diagnostics.orphan_dropoffs, 1);
    assert!(!plan.diagnostics.fallback_used);
}

#[rstest]
fn dropoff_waits_for_every_pickup_of_its_passenger(sequencer: NearestNeighbourSequencer) {
    let first_pickup = Waypoint::pickup(east(10), 7, 1);
    let dropoff = Waypoint::dropoff(east(20), 7, 1);
    let second_pickup = Waypoint::pickup(east(90), 7, 2);

    let plan = sequencer.sequence(
        ORIGIN,
        &[first_pickup.clone(), dropoff.clone(), second_pickup.clone()],
    );

    assert_eq!(plan.waypoints, vec![first_pickup, second_pickup, dropoff]);
    assert_eq!(plan.diagnostics.orphan_dropoffs, 0);
}

#[rstest]
fn unscorable_stops_trigger_fallback(sequencer: NearestNeighbourSequencer) {
    let lost = Waypoint::pickup(Coordinate::new(f64::NAN, 0.0), 4, 4);
    let mut stops = vec![lost.clone()];
    stops.extend(trip(1, east(10), east(20)));

    let plan = sequencer.sequence(ORIGIN, &stops);

    assert!(plan.diagnostics.fallback_used);
    assert_eq!(plan.waypoints.len(), 3);
    assert_eq!(plan.waypoints.first().map(|w| w.passenger_id), Some(1));
    assert_eq!(plan.waypoints.last().map(|w| w.passenger_id), Some(lost.passenger_id));
}

#[rstest]
fn every_pickup_precedes_its_dropoff(sequencer: NearestNeighbourSequencer) {
    let stops = flatten([
        trip(1, east(40), east(5)),
        trip(2, east(30), east(15)),
        trip(3, east(20), east(60)),
    ]);

    let plan = sequencer.sequence(ORIGIN, &stops);

    for passenger in 1..=3 {
        let (pickup, dropoff) = stop_positions(&plan.waypoints, passenger);
        assert!(pickup < dropoff, "passenger {passenger} dropped before pickup");
    }
    assert!(!plan.diagnostics.fallback_used);
}

#[rstest]
#[expect(clippy::float_arithmetic, reason = "test compares float distances")]
fn heuristic_distance_follows_the_path(sequencer: NearestNeighbourSequencer) {
    let stops = flatten([trip(1, east(10), east(20))]);

    let plan = sequencer.sequence(ORIGIN, &stops);

    let expected = distance_km(ORIGIN, east(20));
    assert!((plan.diagnostics.heuristic_distance_km - expected).abs() < 1e-9);
}

#[rstest]
fn optimize_waypoints_uses_default_sequencer() {
    let stops = flatten([trip(1, east(30), east(90)), trip(2, east(10), east(80))]);

    let ordered = optimize_waypoints(ORIGIN, &stops);

    assert_eq!(ordered, NearestNeighbourSequencer::new().sequence(ORIGIN, &stops).waypoints);
}
