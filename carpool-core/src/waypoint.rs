//! Pickup and dropoff stops tied to passengers and their entry requests.

use crate::Coordinate;

/// Identifier of a passenger.
pub type PassengerId = u64;

/// Identifier of a passenger's entry request on a ride.
pub type RequestId = u64;

/// Whether a stop boards or alights a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaypointKind {
    /// The passenger boards here.
    Pickup,
    /// The passenger alights here.
    Dropoff,
}

/// A single stop to visit during a ride.
///
/// A set of waypoints is well formed when every [`WaypointKind::Dropoff`]
/// has a [`WaypointKind::Pickup`] for the same passenger.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, Waypoint, WaypointKind};
///
/// let stop = Waypoint::pickup(Coordinate::new(-19.92, -43.99), 7, 42)
///     .with_passenger_name("Ana")
///     .with_address("Rua das Flores, 123");
/// assert_eq!(stop.kind, WaypointKind::Pickup);
/// assert_eq!(stop.passenger_id, 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Location of the stop.
    pub coordinate: Coordinate,
    /// Boarding or alighting.
    pub kind: WaypointKind,
    /// Passenger served at this stop.
    pub passenger_id: PassengerId,
    /// Display name of the passenger.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passenger_name: String,
    /// Display address of the stop.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: String,
    /// Entry request that produced this stop.
    pub request_id: RequestId,
}

impl Waypoint {
    /// Construct a waypoint without display metadata.
    #[must_use]
    pub const fn new(
        coordinate: Coordinate,
        kind: WaypointKind,
        passenger_id: PassengerId,
        request_id: RequestId,
    ) -> Self {
        Self {
            coordinate,
            kind,
            passenger_id,
            passenger_name: String::new(),
            address: String::new(),
            request_id,
        }
    }

    /// Construct a pickup stop.
    #[must_use]
    pub const fn pickup(
        coordinate: Coordinate,
        passenger_id: PassengerId,
        request_id: RequestId,
    ) -> Self {
        Self::new(coordinate, WaypointKind::Pickup, passenger_id, request_id)
    }

    /// Construct a dropoff stop.
    #[must_use]
    pub const fn dropoff(
        coordinate: Coordinate,
        passenger_id: PassengerId,
        request_id: RequestId,
    ) -> Self {
        Self::new(coordinate, WaypointKind::Dropoff, passenger_id, request_id)
    }

    /// Attach the passenger's display name.
    #[must_use]
    pub fn with_passenger_name(mut self, name: impl Into<String>) -> Self {
        self.passenger_name = name.into();
        self
    }

    /// Attach the stop's display address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Whether this stop boards a passenger.
    #[must_use]
    pub const fn is_pickup(&self) -> bool {
        matches!(self.kind, WaypointKind::Pickup)
    }

    /// Whether this stop alights a passenger.
    #[must_use]
    pub const fn is_dropoff(&self) -> bool {
        matches!(self.kind, WaypointKind::Dropoff)
    }
}

/// A named location with a display address.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Position of the stop.
    pub coordinate: Coordinate,
    /// Human-readable address.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: String,
}

impl Stop {
    /// Construct a stop.
    #[must_use]
    pub fn new(coordinate: Coordinate, address: impl Into<String>) -> Self {
        Self {
            coordinate,
            address: address.into(),
        }
    }
}

/// A passenger's journey from an origin to a destination.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassengerTrip {
    /// Entry request backing the trip.
    pub request_id: RequestId,
    /// Travelling passenger.
    pub passenger_id: PassengerId,
    /// Display name of the passenger.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passenger_name: String,
    /// Where the passenger boards.
    pub origin: Stop,
    /// Where the passenger alights.
    pub destination: Stop,
}

impl PassengerTrip {
    /// The pickup and dropoff waypoints for this trip.
    #[must_use]
    pub fn waypoints(&self) -> [Waypoint; 2] {
        let stop = |kind, at: &Stop| {
            Waypoint::new(at.coordinate, kind, self.passenger_id, self.request_id)
                .with_passenger_name(self.passenger_name.clone())
                .with_address(at.address.clone())
        };
        [
            stop(WaypointKind::Pickup, &self.origin),
            stop(WaypointKind::Dropoff, &self.destination),
        ]
    }
}

/// Expand trips into pickup/dropoff waypoints, preserving trip order.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, PassengerTrip, Stop, WaypointKind, waypoints_for};
///
/// let trip = PassengerTrip {
///     request_id: 1,
///     passenger_id: 2,
///     passenger_name: "Ana".into(),
///     origin: Stop::new(Coordinate::new(0.0, 0.0), "Home"),
///     destination: Stop::new(Coordinate::new(0.1, 0.1), "Campus"),
/// };
/// let stops = waypoints_for([&trip]);
/// assert_eq!(stops.len(), 2);
/// assert_eq!(stops[0].kind, WaypointKind::Pickup);
/// ```
pub fn waypoints_for<'a, I>(trips: I) -> Vec<Waypoint>
where
    I: IntoIterator<Item = &'a PassengerTrip>,
{
    trips.into_iter().flat_map(PassengerTrip::waypoints).collect()
}

/// Coordinates of `waypoints` in order, ready for a route provider.
#[must_use]
pub fn coordinates_of(waypoints: &[Waypoint]) -> Vec<Coordinate> {
    waypoints.iter().map(|waypoint| waypoint.coordinate).collect()
}
