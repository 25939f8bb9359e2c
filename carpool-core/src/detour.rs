//! Acceptance limits for detours.

use std::time::{Duration, SystemTime};

use log::debug;

use crate::{DetourCost, RouteMetrics};

/// Default limit on the extra travel time a detour may add.
pub const DEFAULT_MAX_EXTRA_DURATION: Duration = Duration::from_secs(15 * 60);

/// Default limit on the extra distance a detour may add, in metres.
pub const DEFAULT_MAX_EXTRA_DISTANCE_METERS: f64 = 2_000.0;

/// Limits deciding whether a detour is acceptable to the driver.
///
/// A detour passes when its extra duration **or** its extra distance is
/// within the corresponding limit. When an arrival deadline is checked, the
/// detoured ride must also arrive no later than the desired arrival plus
/// the extra-duration limit.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use carpool_core::{DetourCost, DetourPolicy, RouteMetrics};
///
/// let policy = DetourPolicy::default().with_max_extra_duration(Duration::from_secs(300));
/// let cost = DetourCost::new(RouteMetrics::new(10_000.0, 600.0), RouteMetrics::new(15_000.0, 840.0));
/// assert!(policy.assess(&cost).viable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetourPolicy {
    /// Largest acceptable increase in travel time.
    pub max_extra_duration: Duration,
    /// Largest acceptable increase in distance, in metres.
    pub max_extra_distance_meters: f64,
}

impl Default for DetourPolicy {
    fn default() -> Self {
        Self {
            max_extra_duration: DEFAULT_MAX_EXTRA_DURATION,
            max_extra_distance_meters: DEFAULT_MAX_EXTRA_DISTANCE_METERS,
        }
    }
}

/// Outcome of checking a [`DetourCost`] against a [`DetourPolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetourAssessment {
    /// Extra distance and duration over the baseline.
    pub extra: RouteMetrics,
    /// Extra duration is within the limit.
    pub within_duration: bool,
    /// Extra distance is within the limit.
    pub within_distance: bool,
    /// The detoured ride arrives in time; `true` when no deadline applies.
    pub arrives_in_time: bool,
    /// The detour is acceptable.
    pub viable: bool,
}

impl DetourPolicy {
    /// Set the extra-duration limit.
    #[must_use]
    pub const fn with_max_extra_duration(mut self, limit: Duration) -> Self {
        self.max_extra_duration = limit;
        self
    }

    /// Set the extra-distance limit in metres.
    #[must_use]
    pub const fn with_max_extra_distance_meters(mut self, limit: f64) -> Self {
        self.max_extra_distance_meters = limit;
        self
    }

    /// Check `cost` against the limits.
    #[must_use]
    pub fn assess(&self, cost: &DetourCost) -> DetourAssessment {
        let within_duration = cost.extra.duration_seconds <= self.max_extra_duration.as_secs_f64();
        let within_distance = cost.extra.distance_meters <= self.max_extra_distance_meters;
        DetourAssessment {
            extra: cost.extra,
            within_duration,
            within_distance,
            arrives_in_time: true,
            viable: within_duration || within_distance,
        }
    }

    /// Check `cost` against the limits and an arrival deadline.
    ///
    /// A ride leaving at `departure` arrives after the detour's full
    /// duration. It is late when that instant falls after `desired_arrival`
    /// plus the extra-duration limit. An arrival that cannot be represented
    /// counts as late.
    #[must_use]
    pub fn assess_arrival(
        &self,
        cost: &DetourCost,
        departure: SystemTime,
        desired_arrival: SystemTime,
    ) -> DetourAssessment {
        let mut assessment = self.assess(cost);
        let estimated = Duration::try_from_secs_f64(cost.detour.duration_seconds)
            .ok()
            .and_then(|trip| departure.checked_add(trip));
        let latest = desired_arrival.checked_add(self.max_extra_duration);
        assessment.arrives_in_time = match (estimated, latest) {
            (Some(estimated), Some(latest)) => estimated <= latest,
            (Some(_), None) => true,
            (None, _) => false,
        };
        debug!(
            "arrival check: estimated {estimated:?}, latest {latest:?}, in time: {}",
            assessment.arrives_in_time
        );
        assessment.viable = assessment.viable && assessment.arrives_in_time;
        assessment
    }
}
