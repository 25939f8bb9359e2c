//! Facade crate for the carpool routing engine.
//!
//! This crate re-exports the core domain types and exposes the default
//! sequencer and the OSRM-backed route provider behind feature flags.

#![forbid(unsafe_code)]

pub use carpool_core::{
    CompleteRoute, Coordinate, CostError, DetourAssessment, DetourCost, DetourPolicy,
    EntryRequest, EntryStatus, Passenger, PassengerId, PassengerTrip, PrincipalRouteError,
    RequestId, Ride, RideId, RideLedger, RideMatch, RideMatcher, RouteCandidate,
    RouteCostService, RouteMetrics, RouteProvider, RouteProviderError, RouteRecord, RouteStop,
    SeatError, Sequence, SequenceDiagnostics, Sequencer, Stop, Waypoint, WaypointKind,
    coordinates_of, distance_km, waypoints_for,
};

#[cfg(feature = "sequencer")]
pub use carpool_sequencer::{NearestNeighbourSequencer, SequencerConfig, optimize_waypoints};

#[cfg(feature = "http-provider")]
pub use carpool_data::routing::{HttpRouteProvider, HttpRouteProviderConfig, ProviderBuildError};
