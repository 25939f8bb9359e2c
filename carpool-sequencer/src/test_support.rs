//! Test-only builders for `carpool-sequencer`.
//!
//! Unit tests, behaviour tests and benchmarks share these helpers to build
//! passenger stops without repeating request bookkeeping.

use carpool_core::{Coordinate, PassengerId, Waypoint};

/// Pickup and dropoff for `passenger`, with the passenger id doubling as
/// the request id.
///
/// # Examples
/// ```rust
/// use carpool_core::Coordinate;
/// use carpool_sequencer::test_support::trip;
///
/// let [pickup, dropoff] = trip(3, Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.1));
/// assert!(pickup.is_pickup());
/// assert_eq!(dropoff.passenger_id, 3);
/// ```
#[must_use]
pub const fn trip(passenger: PassengerId, from: Coordinate, to: Coordinate) -> [Waypoint; 2] {
    [
        Waypoint::pickup(from, passenger, passenger),
        Waypoint::dropoff(to, passenger, passenger),
    ]
}

/// Flatten trips into one waypoint list, preserving order.
#[must_use]
pub fn flatten<I>(trips: I) -> Vec<Waypoint>
where
    I: IntoIterator<Item = [Waypoint; 2]>,
{
    trips.into_iter().flatten().collect()
}

/// Positions of `passenger`'s pickup and dropoff within `ordered`.
#[must_use]
pub fn stop_positions(ordered: &[Waypoint], passenger: PassengerId) -> (Option<usize>, Option<usize>) {
    let position = |pickup: bool| {
        ordered
            .iter()
            .position(|stop| stop.passenger_id == passenger && stop.is_pickup() == pickup)
    };
    (position(true), position(false))
}
