//! Choose the ride that serves a new passenger with the smallest detour.

use std::time::SystemTime;

use log::debug;

use crate::{
    Coordinate, CostError, DetourAssessment, DetourCost, DetourPolicy, Ride, RideId,
    RouteCostService, RouteProvider,
};

/// A ride able to take the passenger, with its detour cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RideMatch {
    /// Chosen ride.
    pub ride_id: RideId,
    /// Detour cost of serving the passenger on that ride.
    pub cost: DetourCost,
    /// Policy verdict for the detour.
    pub assessment: DetourAssessment,
}

/// Ranks candidate rides for a passenger's pickup and dropoff.
///
/// Full rides are skipped before any provider call. Every other ride costs
/// exactly one provider call; rides whose detour fails the
/// [`DetourPolicy`] are discarded and the smallest extra duration wins.
#[derive(Debug, Clone)]
pub struct RideMatcher<P> {
    costs: RouteCostService<P>,
    policy: DetourPolicy,
}

impl<P: RouteProvider> RideMatcher<P> {
    /// Build a matcher using the default [`DetourPolicy`].
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, DetourPolicy::default())
    }

    /// Build a matcher with an explicit policy.
    pub const fn with_policy(provider: P, policy: DetourPolicy) -> Self {
        Self {
            costs: RouteCostService::new(provider),
            policy,
        }
    }

    /// The underlying cost service.
    pub const fn costs(&self) -> &RouteCostService<P> {
        &self.costs
    }

    /// Evaluate a single ride, returning `None` when it is full or the
    /// detour is rejected.
    ///
    /// # Errors
    ///
    /// Propagates [`CostError`] from the cost service.
    pub fn evaluate(
        &self,
        ride: &Ride,
        pickup: Coordinate,
        dropoff: Coordinate,
    ) -> Result<Option<RideMatch>, CostError> {
        self.evaluate_arriving_by(ride, pickup, dropoff, None)
    }

    /// Like [`Self::evaluate`], additionally rejecting a ride that would
    /// arrive too late for `desired_arrival`.
    ///
    /// Rides without a scheduled departure skip the arrival check.
    ///
    /// # Errors
    ///
    /// Propagates [`CostError`] from the cost service.
    pub fn evaluate_arriving_by(
        &self,
        ride: &Ride,
        pickup: Coordinate,
        dropoff: Coordinate,
        desired_arrival: Option<SystemTime>,
    ) -> Result<Option<RideMatch>, CostError> {
        if !ride.has_available_seats() {
            debug!("ride {}: skipped, no seats available", ride.id);
            return Ok(None);
        }
        let cost = self.costs.detour_cost(ride, pickup, dropoff)?;
        let assessment = match (ride.departure, desired_arrival) {
            (Some(departure), Some(deadline)) => self.policy.assess_arrival(&cost, departure, deadline),
            _ => self.policy.assess(&cost),
        };
        debug!(
            "ride {}: extra {:.0} s / {:.0} m, viable: {}",
            ride.id, assessment.extra.duration_seconds, assessment.extra.distance_meters, assessment.viable
        );
        Ok(assessment.viable.then_some(RideMatch {
            ride_id: ride.id,
            cost,
            assessment,
        }))
    }

    /// The viable ride with the smallest extra duration.
    ///
    /// Ties go to the ride listed first. Returns `Ok(None)` when no ride
    /// qualifies.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`CostError`] raised while costing a
    /// ride.
    pub fn best_match<'a, I>(
        &self,
        rides: I,
        pickup: Coordinate,
        dropoff: Coordinate,
    ) -> Result<Option<RideMatch>, CostError>
    where
        I: IntoIterator<Item = &'a Ride>,
    {
        self.best_match_arriving_by(rides, pickup, dropoff, None)
    }

    /// Like [`Self::best_match`], rejecting rides that would arrive too late
    /// for `desired_arrival`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`CostError`] raised while costing a
    /// ride.
    pub fn best_match_arriving_by<'a, I>(
        &self,
        rides: I,
        pickup: Coordinate,
        dropoff: Coordinate,
        desired_arrival: Option<SystemTime>,
    ) -> Result<Option<RideMatch>, CostError>
    where
        I: IntoIterator<Item = &'a Ride>,
    {
        let mut best: Option<RideMatch> = None;
        for ride in rides {
            let Some(candidate) = self.evaluate_arriving_by(ride, pickup, dropoff, desired_arrival)? else {
                continue;
            };
            let improves = best.as_ref().is_none_or(|current| {
                candidate.assessment.extra.duration_seconds < current.assessment.extra.duration_seconds
            });
            if improves {
                best = Some(candidate);
            }
        }
        if best.is_none() {
            log::warn!("no compatible ride found for pickup {pickup:?}, dropoff {dropoff:?}");
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StraightLineRouteProvider, StubRouteProvider, principal_ride};
    use crate::{Passenger, RouteProviderError};
    use rstest::rstest;
    use std::time::Duration;

    const PICKUP: Coordinate = Coordinate::new(0.0, 0.02);
    const DROPOFF: Coordinate = Coordinate::new(0.0, 0.08);

    fn corridor(id: RideId, offset: f64, seats: usize) -> Ride {
        principal_ride(id, Coordinate::new(offset, 0.0), Coordinate::new(offset, 0.1), seats)
    }

    #[rstest]
    fn picks_ride_with_smallest_extra_duration() {
        let rides = [corridor(1, 0.01, 2), corridor(2, 0.0, 2), corridor(3, 0.005, 2)];
        let matcher = RideMatcher::new(StraightLineRouteProvider::default());

        let chosen = matcher
            .best_match(&rides, PICKUP, DROPOFF)
            .expect("costing succeeds")
            .expect("a ride qualifies");

        assert_eq!(chosen.ride_id, 2);
    }

    #[rstest]
    fn full_rides_are_skipped_without_provider_calls() {
        let mut full = corridor(1, 0.0, 1);
        full.add_passenger(Passenger::new(9, "nine")).expect("free seat");
        let matcher = RideMatcher::new(StubRouteProvider::empty());

        let chosen = matcher.best_match([&full], PICKUP, DROPOFF).expect("no calls made");

        assert!(chosen.is_none());
        assert_eq!(matcher.costs().provider().calls(), 0);
    }

    #[rstest]
    fn rejects_rides_beyond_policy_limits() {
        let far = corridor(1, 0.5, 2);
        let matcher = RideMatcher::new(StraightLineRouteProvider::default());

        let chosen = matcher.best_match([&far], PICKUP, DROPOFF).expect("costing succeeds");

        assert!(chosen.is_none());
    }

    #[rstest]
    fn ties_keep_the_first_ride() {
        let rides = [corridor(7, 0.0, 2), corridor(8, 0.0, 2)];
        let matcher = RideMatcher::new(StraightLineRouteProvider::default());

        let chosen = matcher
            .best_match(&rides, PICKUP, DROPOFF)
            .expect("costing succeeds")
            .expect("a ride qualifies");

        assert_eq!(chosen.ride_id, 7);
    }

    #[rstest]
    fn late_rides_are_rejected_for_an_arrival_deadline() {
        let departure = SystemTime::UNIX_EPOCH + Duration::from_secs(8 * 3_600);
        let late = corridor(1, 0.0, 2).with_departure(departure);
        let early = corridor(2, 0.01, 2).with_departure(departure - Duration::from_secs(3_600));
        let matcher = RideMatcher::new(StraightLineRouteProvider::default());

        let chosen = matcher
            .best_match_arriving_by([&late, &early], PICKUP, DROPOFF, Some(departure))
            .expect("costing succeeds")
            .expect("the early ride qualifies");

        assert_eq!(chosen.ride_id, 2);
        assert!(chosen.assessment.arrives_in_time);
    }

    #[rstest]
    fn rides_without_departure_skip_the_arrival_check() {
        let ride = corridor(3, 0.0, 2);
        let matcher = RideMatcher::new(StraightLineRouteProvider::default());

        let chosen = matcher
            .evaluate_arriving_by(&ride, PICKUP, DROPOFF, Some(SystemTime::UNIX_EPOCH))
            .expect("costing succeeds");

        assert!(chosen.is_some());
    }

    #[rstest]
    fn provider_failure_aborts_matching() {
        let rides = [corridor(1, 0.0, 2)];
        let failure = RouteProviderError::NetworkError {
            url: "http://localhost:5000".to_owned(),
            message: "connection refused".to_owned(),
        };
        let matcher = RideMatcher::new(StubRouteProvider::with_error(failure));

        let result = matcher.best_match(&rides, PICKUP, DROPOFF);

        assert!(matches!(result, Err(CostError::Provider(_))));
    }
}
