//! Rides, their passengers and the seat-capacity invariant.
//!
//! A [`Ride`] never holds more passengers than it has seats. Mutations that
//! would break the invariant fail without touching the ride.

use std::time::SystemTime;

use thiserror::Error;

use crate::{Coordinate, PassengerId, PassengerTrip, RequestId, RouteRecord};

/// Identifier of a ride.
pub type RideId = u64;

/// A passenger aboard a ride.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passenger {
    /// Passenger identifier.
    pub id: PassengerId,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
}

impl Passenger {
    /// Construct a passenger.
    #[must_use]
    pub fn new(id: PassengerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Lifecycle state of an entry request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntryStatus {
    /// Awaiting the driver's decision.
    #[default]
    Pending,
    /// Accepted; the trip's stops belong on the ride's route.
    Approved,
}

/// A passenger's request to join a ride.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryRequest {
    /// Request identifier.
    pub id: RequestId,
    /// Requested journey.
    pub trip: PassengerTrip,
    /// Current status.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: EntryStatus,
}

impl EntryRequest {
    /// Construct a pending request for `trip`, keyed by the trip's request id.
    #[must_use]
    pub const fn pending(trip: PassengerTrip) -> Self {
        Self {
            id: trip.request_id,
            trip,
            status: EntryStatus::Pending,
        }
    }

    /// Construct an approved request for `trip`.
    #[must_use]
    pub const fn approved(trip: PassengerTrip) -> Self {
        Self {
            id: trip.request_id,
            trip,
            status: EntryStatus::Approved,
        }
    }

    /// Passenger who made the request.
    #[must_use]
    pub const fn passenger_id(&self) -> PassengerId {
        self.trip.passenger_id
    }
}

/// Errors raised while resolving a ride's principal route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalRouteError {
    /// The ride has no principal route, or more than one.
    #[error("ride {ride_id} must have exactly one principal route, found {found}")]
    NoPrincipalRoute {
        /// Ride that was inspected.
        ride_id: RideId,
        /// Number of routes flagged as principal.
        found: usize,
    },
}

/// Errors raised by seat reservation and release.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatError {
    /// Every seat is already taken.
    #[error("ride {ride_id} has no seats available (capacity {seat_capacity})")]
    NoSeatsAvailable {
        /// Ride that was full.
        ride_id: RideId,
        /// Seat capacity of the ride.
        seat_capacity: usize,
    },
    /// The passenger is not aboard the ride.
    #[error("passenger {passenger_id} is not aboard ride {ride_id}")]
    PassengerNotAboard {
        /// Ride that was inspected.
        ride_id: RideId,
        /// Passenger that was looked up.
        passenger_id: PassengerId,
    },
    /// The passenger has no entry request on the ride.
    #[error("passenger {passenger_id} has no entry request on ride {ride_id}")]
    MissingEntryRequest {
        /// Ride that was inspected.
        ride_id: RideId,
        /// Passenger that was looked up.
        passenger_id: PassengerId,
    },
    /// The ride is not registered.
    #[error("ride {ride_id} is not registered")]
    UnknownRide {
        /// Ride that was looked up.
        ride_id: RideId,
    },
}

/// A driver's trip offering seats to passengers.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, Passenger, Ride, SeatError};
///
/// let mut ride = Ride::new(1, Coordinate::new(0.0, 0.0), Coordinate::new(0.1, 0.1), 1);
/// ride.add_passenger(Passenger::new(7, "Ana"))?;
/// let err = ride.add_passenger(Passenger::new(8, "Bruno")).unwrap_err();
/// assert!(matches!(err, SeatError::NoSeatsAvailable { .. }));
/// assert_eq!(ride.passengers().len(), 1);
/// # Ok::<(), SeatError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RideRecord"))]
pub struct Ride {
    /// Ride identifier.
    pub id: RideId,
    /// Driver's fixed departure point.
    pub start: Coordinate,
    /// Driver's fixed destination.
    pub end: Coordinate,
    seat_capacity: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    passengers: Vec<Passenger>,
    /// Entry requests made against this ride.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entry_requests: Vec<EntryRequest>,
    /// Persisted routes; exactly one should be principal.
    #[cfg_attr(feature = "serde", serde(default))]
    pub routes: Vec<RouteRecord>,
    /// Scheduled departure, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub departure: Option<SystemTime>,
}

impl Ride {
    /// Construct an empty ride with `seat_capacity` seats.
    #[must_use]
    pub const fn new(id: RideId, start: Coordinate, end: Coordinate, seat_capacity: usize) -> Self {
        Self {
            id,
            start,
            end,
            seat_capacity,
            passengers: Vec::new(),
            entry_requests: Vec::new(),
            routes: Vec::new(),
            departure: None,
        }
    }

    /// Set the scheduled departure.
    #[must_use]
    pub fn with_departure(mut self, departure: SystemTime) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Attach a persisted route.
    #[must_use]
    pub fn with_route(mut self, route: RouteRecord) -> Self {
        self.routes.push(route);
        self
    }

    /// Attach an entry request.
    #[must_use]
    pub fn with_entry_request(mut self, request: EntryRequest) -> Self {
        self.entry_requests.push(request);
        self
    }

    /// Number of seats offered.
    #[must_use]
    pub const fn seat_capacity(&self) -> usize {
        self.seat_capacity
    }

    /// Passengers currently aboard.
    #[must_use]
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    /// Seats still free.
    #[must_use]
    pub const fn available_seats(&self) -> usize {
        self.seat_capacity.saturating_sub(self.passengers.len())
    }

    /// Whether at least one seat is free.
    #[must_use]
    pub const fn has_available_seats(&self) -> bool {
        self.passengers.len() < self.seat_capacity
    }

    /// Whether `passenger_id` is aboard.
    #[must_use]
    pub fn is_aboard(&self, passenger_id: PassengerId) -> bool {
        self.passengers.iter().any(|p| p.id == passenger_id)
    }

    /// Board `passenger`, respecting seat capacity.
    ///
    /// Boarding a passenger who is already aboard succeeds without change.
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::NoSeatsAvailable`] when the ride is full; the
    /// passenger list is left untouched.
    pub fn add_passenger(&mut self, passenger: Passenger) -> Result<(), SeatError> {
        if self.is_aboard(passenger.id) {
            return Ok(());
        }
        if !self.has_available_seats() {
            return Err(SeatError::NoSeatsAvailable {
                ride_id: self.id,
                seat_capacity: self.seat_capacity,
            });
        }
        self.passengers.push(passenger);
        Ok(())
    }

    /// Remove a passenger together with their entry request.
    ///
    /// Both records are located before either is removed, so a failure
    /// leaves the ride unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::PassengerNotAboard`] or
    /// [`SeatError::MissingEntryRequest`] when either record is absent.
    pub fn remove_passenger(
        &mut self,
        passenger_id: PassengerId,
    ) -> Result<(Passenger, EntryRequest), SeatError> {
        let seat = self
            .passengers
            .iter()
            .position(|p| p.id == passenger_id)
            .ok_or(SeatError::PassengerNotAboard {
                ride_id: self.id,
                passenger_id,
            })?;
        let entry = self
            .entry_requests
            .iter()
            .position(|r| r.passenger_id() == passenger_id)
            .ok_or(SeatError::MissingEntryRequest {
                ride_id: self.id,
                passenger_id,
            })?;
        Ok((self.passengers.remove(seat), self.entry_requests.remove(entry)))
    }

    /// The single route flagged as principal.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalRouteError::NoPrincipalRoute`] when zero or
    /// several routes carry the flag.
    pub fn principal_route(&self) -> Result<&RouteRecord, PrincipalRouteError> {
        let mut principal = self.routes.iter().filter(|route| route.principal);
        match (principal.next(), principal.next()) {
            (Some(route), None) => Ok(route),
            (None, _) => Err(PrincipalRouteError::NoPrincipalRoute {
                ride_id: self.id,
                found: 0,
            }),
            (Some(_), Some(_)) => Err(PrincipalRouteError::NoPrincipalRoute {
                ride_id: self.id,
                found: self.routes.iter().filter(|route| route.principal).count(),
            }),
        }
    }

    /// Trips of every approved entry request, in request order.
    pub fn approved_trips(&self) -> impl Iterator<Item = &PassengerTrip> {
        self.entry_requests
            .iter()
            .filter(|request| request.status == EntryStatus::Approved)
            .map(|request| &request.trip)
    }
}

/// Unvalidated wire form of a [`Ride`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RideRecord {
    id: RideId,
    start: Coordinate,
    end: Coordinate,
    seat_capacity: usize,
    #[serde(default)]
    passengers: Vec<Passenger>,
    #[serde(default)]
    entry_requests: Vec<EntryRequest>,
    #[serde(default)]
    routes: Vec<RouteRecord>,
    #[serde(default)]
    departure: Option<SystemTime>,
}

#[cfg(feature = "serde")]
impl TryFrom<RideRecord> for Ride {
    type Error = SeatError;

    fn try_from(record: RideRecord) -> Result<Self, Self::Error> {
        let mut ride = Self::new(record.id, record.start, record.end, record.seat_capacity);
        ride.entry_requests = record.entry_requests;
        ride.routes = record.routes;
        ride.departure = record.departure;
        for passenger in record.passengers {
            ride.add_passenger(passenger)?;
        }
        Ok(ride)
    }
}
