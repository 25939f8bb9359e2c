//! Test doubles for route providers and ride fixtures.
//!
//! [`StubRouteProvider`] returns a canned answer and records every request;
//! [`StraightLineRouteProvider`] routes along great-circle legs so detour
//! maths can be exercised without a routing service.

use std::sync::{Mutex, PoisonError};

use geo::LineString;

use crate::{
    Coordinate, Ride, RideId, RouteCandidate, RouteMetrics, RouteProvider, RouteProviderError,
    RouteRecord, distance_km,
};

/// Speed assumed by [`StraightLineRouteProvider`], in km/h.
pub const STRAIGHT_LINE_SPEED_KMH: f64 = 40.0;

/// A request seen by [`StubRouteProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Route start.
    pub start: Coordinate,
    /// Route end.
    pub end: Coordinate,
    /// Intermediate stops in the order requested.
    pub waypoints: Vec<Coordinate>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Candidates(Vec<RouteCandidate>),
    Error(RouteProviderError),
}

/// `RouteProvider` returning a fixed answer for every request.
///
/// # Example
///
/// ```
/// use carpool_core::test_support::{StubRouteProvider, candidate};
/// use carpool_core::{Coordinate, RouteProvider};
///
/// let provider = StubRouteProvider::with_candidates(vec![candidate(1_000.0, 90.0)]);
/// let routes = provider
///     .route_between(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01), &[])
///     .expect("stub succeeds");
/// assert_eq!(routes.len(), 1);
/// assert_eq!(provider.calls(), 1);
/// ```
#[derive(Debug)]
pub struct StubRouteProvider {
    response: StubResponse,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubRouteProvider {
    /// A provider that never finds a route.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_candidates(Vec::new())
    }

    /// A provider answering every request with `candidates`.
    #[must_use]
    pub fn with_candidates(candidates: Vec<RouteCandidate>) -> Self {
        Self::from_response(StubResponse::Candidates(candidates))
    }

    /// A provider failing every request with `error`.
    #[must_use]
    pub fn with_error(error: RouteProviderError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    fn from_response(response: StubResponse) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl RouteProvider for StubRouteProvider {
    fn route_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                start,
                end,
                waypoints: waypoints.to_vec(),
            });
        match &self.response {
            StubResponse::Candidates(candidates) => Ok(candidates.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

/// `RouteProvider` that drives straight between consecutive stops at
/// [`STRAIGHT_LINE_SPEED_KMH`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StraightLineRouteProvider;

impl RouteProvider for StraightLineRouteProvider {
    fn route_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        let stops: Vec<Coordinate> = std::iter::once(start)
            .chain(waypoints.iter().copied())
            .chain(std::iter::once(end))
            .collect();
        Ok(vec![straight_line(&stops)])
    }
}

/// Straight-line candidate visiting `stops` in order.
#[must_use]
pub fn straight_line(stops: &[Coordinate]) -> RouteCandidate {
    let km: f64 = stops.windows(2).map(|leg| distance_km(leg[0], leg[1])).sum();
    let geometry = LineString::new(stops.iter().copied().map(geo::Coord::from).collect());
    RouteCandidate::new(geometry, metrics_for_km(km))
}

fn metrics_for_km(km: f64) -> RouteMetrics {
    RouteMetrics::new(km * 1_000.0, km / STRAIGHT_LINE_SPEED_KMH * 3_600.0)
}

/// Candidate with empty geometry and the given metrics.
#[must_use]
pub fn candidate(distance_meters: f64, duration_seconds: f64) -> RouteCandidate {
    RouteCandidate::new(
        LineString::new(Vec::new()),
        RouteMetrics::new(distance_meters, duration_seconds),
    )
}

/// A ride whose principal route is the straight line from `start` to `end`.
#[must_use]
pub fn principal_ride(id: RideId, start: Coordinate, end: Coordinate, seats: usize) -> Ride {
    Ride::new(id, start, end, seats).with_route(RouteRecord::principal(straight_line(&[start, end])))
}
