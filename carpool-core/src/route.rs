//! Route records and the metrics a route provider reports for them.

use geo::LineString;

/// Distance and duration of a route.
///
/// # Examples
/// ```
/// use carpool_core::RouteMetrics;
///
/// let baseline = RouteMetrics::new(10_000.0, 900.0);
/// let detour = RouteMetrics::new(11_500.0, 1_020.0);
/// let extra = detour.extra_over(baseline);
/// assert_eq!(extra.distance_meters, 1_500.0);
/// assert_eq!(extra.duration_seconds, 120.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteMetrics {
    /// Total distance in metres.
    pub distance_meters: f64,
    /// Total travel time in seconds.
    pub duration_seconds: f64,
}

impl RouteMetrics {
    /// Construct metrics from metres and seconds.
    #[must_use]
    pub const fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }

    /// Signed difference of `self` over `baseline`.
    ///
    /// Negative components mean `self` is shorter than the baseline.
    #[must_use]
    pub fn extra_over(self, baseline: Self) -> Self {
        Self {
            distance_meters: self.distance_meters - baseline.distance_meters,
            duration_seconds: self.duration_seconds - baseline.duration_seconds,
        }
    }
}

/// A route returned by a [`RouteProvider`](crate::RouteProvider).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteCandidate {
    /// Road geometry with `x = longitude`, `y = latitude`.
    pub geometry: LineString<f64>,
    /// Provider-reported distance and duration.
    pub metrics: RouteMetrics,
}

impl RouteCandidate {
    /// Construct a candidate.
    #[must_use]
    pub const fn new(geometry: LineString<f64>, metrics: RouteMetrics) -> Self {
        Self { geometry, metrics }
    }
}

/// A route persisted against a ride.
///
/// Exactly one record per ride carries `principal = true`; it describes
/// the driver's original start-to-end path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRecord {
    /// Road geometry of the route.
    pub geometry: LineString<f64>,
    /// Distance and duration of the route.
    pub metrics: RouteMetrics,
    /// Free-form label, e.g. `"Principal"` or `"Alternative 1"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Whether this is the ride's baseline route.
    #[cfg_attr(feature = "serde", serde(default))]
    pub principal: bool,
}

impl RouteRecord {
    /// Record a provider candidate as the ride's principal route.
    #[must_use]
    pub fn principal(candidate: RouteCandidate) -> Self {
        Self {
            geometry: candidate.geometry,
            metrics: candidate.metrics,
            description: "Principal".to_owned(),
            principal: true,
        }
    }

    /// Record a provider candidate as a non-principal alternative.
    #[must_use]
    pub fn alternative(candidate: RouteCandidate, description: impl Into<String>) -> Self {
        Self {
            geometry: candidate.geometry,
            metrics: candidate.metrics,
            description: description.into(),
            principal: false,
        }
    }
}
