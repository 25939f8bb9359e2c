//! Core domain types and services for the carpool engine.
//!
//! Responsibilities:
//! - Model rides, passengers, entry requests and their stops.
//! - Enforce seat capacity on every mutation path.
//! - Cost detours and complete routes through a [`RouteProvider`].
//! - Pick the best ride for a new passenger under a [`DetourPolicy`].
//!
//! Boundaries:
//! - Routing services live behind [`RouteProvider`]; HTTP adapters belong in
//!   `carpool-data`.
//! - Stop ordering lives behind [`Sequencer`]; the default heuristic belongs
//!   in `carpool-sequencer`.
//!
//! Invariants:
//! - A ride never holds more passengers than seats.
//! - Every provider-backed operation makes exactly one provider call.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod coordinate;
mod cost;
mod detour;
mod ledger;
mod matching;
mod ride;
mod route;
mod route_provider;
mod sequencer;
mod waypoint;

#[doc(hidden)]
pub mod test_support;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, distance_km};
pub use cost::{CompleteRoute, CostError, DetourCost, RouteCostService, RouteStop};
pub use detour::{
    DEFAULT_MAX_EXTRA_DISTANCE_METERS, DEFAULT_MAX_EXTRA_DURATION, DetourAssessment, DetourPolicy,
};
pub use ledger::RideLedger;
pub use matching::{RideMatch, RideMatcher};
pub use ride::{
    EntryRequest, EntryStatus, Passenger, PrincipalRouteError, Ride, RideId, SeatError,
};
pub use route::{RouteCandidate, RouteMetrics, RouteRecord};
pub use route_provider::{RouteProvider, RouteProviderError};
pub use sequencer::{Sequence, SequenceDiagnostics, Sequencer};
pub use waypoint::{
    PassengerId, PassengerTrip, RequestId, Stop, Waypoint, WaypointKind, coordinates_of,
    waypoints_for,
};
