//! Ordering of pickup and dropoff stops.

use std::time::Duration;

use crate::{Coordinate, Waypoint};

/// Metrics gathered while sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceDiagnostics {
    /// Whether no remaining stop could be scored, forcing the rest to be
    /// appended in input order. Callers should treat this as a
    /// data-integrity warning.
    pub fallback_used: bool,
    /// Dropoffs in the input whose passenger has no pickup at all.
    #[cfg_attr(feature = "serde", serde(default))]
    pub orphan_dropoffs: usize,
    /// Straight-line length of the ordered path from the start, in
    /// kilometres. Heuristic only; not an authoritative trip distance.
    pub heuristic_distance_km: f64,
    /// Wall-clock time spent sequencing.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub sequence_time: Duration,
}

/// An ordered visiting plan with diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    /// Waypoints in visiting order.
    pub waypoints: Vec<Waypoint>,
    /// Information about how the order was produced.
    pub diagnostics: SequenceDiagnostics,
}

/// Produce a visiting order over a waypoint set.
///
/// Implementations must return a permutation of the input and place each
/// passenger's pickups before their dropoff whenever the input is well
/// formed. They must not panic on malformed input.
/// Sequencers must be `Send + Sync` to serve concurrent callers.
///
/// # Examples
/// ```rust
/// use carpool_core::{Coordinate, Sequence, Sequencer, Waypoint};
///
/// struct InputOrder;
///
/// impl Sequencer for InputOrder {
///     fn sequence(&self, _start: Coordinate, waypoints: &[Waypoint]) -> Sequence {
///         Sequence { waypoints: waypoints.to_vec(), ..Sequence::default() }
///     }
/// }
///
/// let plan = InputOrder.sequence(Coordinate::new(0.0, 0.0), &[]);
/// assert!(plan.waypoints.is_empty());
/// ```
pub trait Sequencer: Send + Sync {
    /// Order `waypoints` for a driver departing from `start`.
    fn sequence(&self, start: Coordinate, waypoints: &[Waypoint]) -> Sequence;
}

impl<S: Sequencer + ?Sized> Sequencer for &S {
    fn sequence(&self, start: Coordinate, waypoints: &[Waypoint]) -> Sequence {
        (**self).sequence(start, waypoints)
    }
}

#[cfg(feature = "serde")]
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
