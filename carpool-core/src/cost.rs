//! Authoritative route and detour costs for rides.
//!
//! [`RouteCostService`] reads a ride's baseline from its principal route and
//! asks a [`RouteProvider`] for the cost of serving extra stops. Each
//! provider-backed operation makes exactly one call; nothing is retried.

use log::{debug, info};
use thiserror::Error;

use crate::{
    Coordinate, PrincipalRouteError, Ride, RideId, RouteCandidate, RouteMetrics, RouteProvider,
    RouteProviderError, SequenceDiagnostics, Sequencer, Waypoint, coordinates_of, waypoints_for,
};

/// Errors from [`RouteCostService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    /// The ride's baseline route could not be resolved.
    #[error(transparent)]
    PrincipalRoute(#[from] PrincipalRouteError),
    /// The provider found no route through the requested stops.
    #[error("no feasible route found for ride {ride_id}")]
    EmptyRouteResult {
        /// Ride being evaluated.
        ride_id: RideId,
    },
    /// The provider call failed.
    #[error("route provider failed: {0}")]
    Provider(#[from] RouteProviderError),
}

/// Baseline and detour metrics for one candidate passenger.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetourCost {
    /// Metrics of the ride's principal route.
    pub baseline: RouteMetrics,
    /// Metrics of the route through the candidate's pickup and dropoff.
    pub detour: RouteMetrics,
    /// `detour` minus `baseline`.
    pub extra: RouteMetrics,
}

impl DetourCost {
    /// Pair a baseline with a detour and derive the difference.
    #[must_use]
    pub fn new(baseline: RouteMetrics, detour: RouteMetrics) -> Self {
        Self {
            baseline,
            detour,
            extra: detour.extra_over(baseline),
        }
    }
}

/// A stop on a ride's complete route, numbered from one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStop {
    /// One-based position along the route.
    pub order: usize,
    /// The stop itself.
    pub waypoint: Waypoint,
}

/// A ride's route through every approved passenger's stops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteRoute {
    /// Ride the route belongs to.
    pub ride_id: RideId,
    /// Road route through all stops.
    pub route: RouteCandidate,
    /// Passenger stops in visiting order.
    pub stops: Vec<RouteStop>,
    /// How the stop order was produced.
    pub diagnostics: SequenceDiagnostics,
}

/// Computes ride costs through an injected [`RouteProvider`].
///
/// # Examples
/// ```
/// use carpool_core::test_support::{StraightLineRouteProvider, principal_ride};
/// use carpool_core::{Coordinate, RouteCostService};
///
/// let ride = principal_ride(1, Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.1), 3);
/// let service = RouteCostService::new(StraightLineRouteProvider::default());
///
/// let cost = service.detour_cost(&ride, Coordinate::new(0.01, 0.03), Coordinate::new(0.01, 0.07))?;
/// assert!(cost.extra.distance_meters > 0.0);
/// # Ok::<(), carpool_core::CostError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteCostService<P> {
    provider: P,
}

impl<P: RouteProvider> RouteCostService<P> {
    /// Wrap a route provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Metrics of the ride's principal route. No provider call is made.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::PrincipalRoute`] when the ride has zero or
    /// several principal routes.
    pub fn baseline_route(&self, ride: &Ride) -> Result<RouteMetrics, CostError> {
        Ok(ride.principal_route()?.metrics)
    }

    /// Metrics of the ride's route detoured through `pickup` then `dropoff`.
    ///
    /// Makes one provider call from the ride's start to its end with the two
    /// stops in between, and reports the provider's best candidate.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::EmptyRouteResult`] when the provider returns no
    /// candidates and [`CostError::Provider`] when the call fails.
    pub fn detour_route(
        &self,
        ride: &Ride,
        pickup: Coordinate,
        dropoff: Coordinate,
    ) -> Result<RouteMetrics, CostError> {
        let best = self.best_route(ride, &[pickup, dropoff])?;
        debug!(
            "ride {}: detour via {pickup:?} -> {dropoff:?} is {:.0} m / {:.0} s",
            ride.id, best.metrics.distance_meters, best.metrics.duration_seconds
        );
        Ok(best.metrics)
    }

    /// Baseline, detour and extra cost of serving `pickup` and `dropoff`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::baseline_route`] and
    /// [`Self::detour_route`]. The baseline is checked first, so a ride
    /// without a principal route costs no provider call.
    pub fn detour_cost(
        &self,
        ride: &Ride,
        pickup: Coordinate,
        dropoff: Coordinate,
    ) -> Result<DetourCost, CostError> {
        let baseline = self.baseline_route(ride)?;
        let detour = self.detour_route(ride, pickup, dropoff)?;
        Ok(DetourCost::new(baseline, detour))
    }

    /// The ride's route through every approved passenger's stops.
    ///
    /// Stops are ordered by `sequencer` and routed with one provider call.
    /// A ride without approved passengers reports its principal route and
    /// makes no call.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::PrincipalRoute`] for a ride without passengers
    /// and without a unique principal route, [`CostError::EmptyRouteResult`]
    /// when the provider finds no route, and [`CostError::Provider`] when
    /// the call fails.
    pub fn complete_route<S>(&self, ride: &Ride, sequencer: &S) -> Result<CompleteRoute, CostError>
    where
        S: Sequencer + ?Sized,
    {
        let waypoints = waypoints_for(ride.approved_trips());
        if waypoints.is_empty() {
            let principal = ride.principal_route()?;
            return Ok(CompleteRoute {
                ride_id: ride.id,
                route: RouteCandidate::new(principal.geometry.clone(), principal.metrics),
                stops: Vec::new(),
                diagnostics: SequenceDiagnostics::default(),
            });
        }

        let plan = sequencer.sequence(ride.start, &waypoints);
        let route = self.best_route(ride, &coordinates_of(&plan.waypoints))?;
        info!(
            "ride {}: complete route through {} stops is {:.1} km / {:.1} min",
            ride.id,
            plan.waypoints.len(),
            route.metrics.distance_meters / 1000.0,
            route.metrics.duration_seconds / 60.0
        );

        let stops = plan
            .waypoints
            .into_iter()
            .zip(1..)
            .map(|(waypoint, order)| RouteStop { order, waypoint })
            .collect();
        Ok(CompleteRoute {
            ride_id: ride.id,
            route,
            stops,
            diagnostics: plan.diagnostics,
        })
    }

    fn best_route(&self, ride: &Ride, waypoints: &[Coordinate]) -> Result<RouteCandidate, CostError> {
        self.provider
            .route_between(ride.start, ride.end, waypoints)?
            .into_iter()
            .next()
            .ok_or(CostError::EmptyRouteResult { ride_id: ride.id })
    }
}
