//! `NearestNeighbourSequencer` implementation.

use std::collections::HashSet;
use std::time::Instant;

use carpool_core::{
    Coordinate, PassengerId, Sequence, SequenceDiagnostics, Sequencer, Waypoint, distance_km,
};
use log::{debug, info, warn};

/// Factor applied to the distance of every pickup candidate.
pub const DEFAULT_PICKUP_BIAS: f64 = 0.9;

/// Configuration for [`NearestNeighbourSequencer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerConfig {
    /// Multiplier on pickup distances when choosing the next stop.
    ///
    /// Values below one make a pickup win against a dropoff that is up to
    /// `1 / pickup_bias` times closer to it.
    pub pickup_bias: f64,
}

impl SequencerConfig {
    /// Configuration using [`DEFAULT_PICKUP_BIAS`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pickup_bias: DEFAULT_PICKUP_BIAS,
        }
    }

    /// Replace the pickup bias.
    #[must_use]
    pub const fn with_pickup_bias(mut self, pickup_bias: f64) -> Self {
        self.pickup_bias = pickup_bias;
        self
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy sequencer visiting the nearest legal stop next.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, Sequencer, Waypoint};
/// use carpool_sequencer::NearestNeighbourSequencer;
///
/// let stops = [
///     Waypoint::dropoff(Coordinate::new(0.0, 0.02), 1, 10),
///     Waypoint::pickup(Coordinate::new(0.0, 0.01), 1, 10),
/// ];
/// let plan = NearestNeighbourSequencer::default().sequence(Coordinate::new(0.0, 0.0), &stops);
///
/// assert!(plan.waypoints[0].is_pickup());
/// assert!(!plan.diagnostics.fallback_used);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbourSequencer {
    config: SequencerConfig,
}

impl NearestNeighbourSequencer {
    /// Construct a sequencer using default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(SequencerConfig::new())
    }

    /// Construct a sequencer with explicit configuration.
    #[must_use]
    pub const fn with_config(config: SequencerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> SequencerConfig {
        self.config
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "the pickup bias scales a floating-point distance"
    )]
    fn score(&self, current: Coordinate, candidate: &Waypoint) -> f64 {
        let distance = distance_km(current, candidate.coordinate);
        if candidate.is_pickup() {
            distance * self.config.pickup_bias
        } else {
            distance
        }
    }

    /// Index into `remaining` of the best visitable stop, if any.
    ///
    /// Only a strictly lower score displaces the incumbent, so ties keep
    /// the stop listed first. Scores start from `f64::MAX`, which keeps
    /// stops with a NaN or infinite distance from ever being chosen.
    fn nearest_visitable(&self, current: Coordinate, remaining: &[&Waypoint]) -> Option<usize> {
        let mut best = None;
        let mut best_score = f64::MAX;
        for (index, candidate) in remaining.iter().enumerate() {
            if !is_visitable(candidate, remaining) {
                continue;
            }
            let score = self.score(current, candidate);
            if score < best_score {
                best = Some(index);
                best_score = score;
            }
        }
        best
    }
}

/// A pickup is always visitable; a dropoff once no pickup for the same
/// passenger is left in `remaining`.
fn is_visitable(candidate: &Waypoint, remaining: &[&Waypoint]) -> bool {
    candidate.is_pickup()
        || !remaining
            .iter()
            .any(|other| other.is_pickup() && other.passenger_id == candidate.passenger_id)
}

/// Number of dropoffs whose passenger has no pickup anywhere in `waypoints`.
fn count_orphan_dropoffs(waypoints: &[Waypoint]) -> usize {
    let boarding: HashSet<PassengerId> = waypoints
        .iter()
        .filter(|waypoint| waypoint.is_pickup())
        .map(|waypoint| waypoint.passenger_id)
        .collect();
    waypoints
        .iter()
        .filter(|waypoint| waypoint.is_dropoff() && !boarding.contains(&waypoint.passenger_id))
        .count()
}

impl Sequencer for NearestNeighbourSequencer {
    fn sequence(&self, start: Coordinate, waypoints: &[Waypoint]) -> Sequence {
        let started_at = Instant::now();
        let orphan_dropoffs = count_orphan_dropoffs(waypoints);
        if orphan_dropoffs > 0 {
            warn!(
                "{orphan_dropoffs} dropoffs have no matching pickup; sequencing them as free stops"
            );
        }

        let mut remaining: Vec<&Waypoint> = waypoints.iter().collect();
        let mut ordered: Vec<Waypoint> = Vec::with_capacity(waypoints.len());
        let mut current = start;
        let mut fallback_used = false;

        while !remaining.is_empty() {
            let Some(index) = self.nearest_visitable(current, &remaining) else {
                warn!(
                    "{} waypoints have no usable distance from the current stop; appending them in input order",
                    remaining.len()
                );
                fallback_used = true;
                ordered.extend(remaining.drain(..).cloned());
                break;
            };
            let next = remaining.remove(index);
            debug!(
                "stop {}: {:?} for passenger {}",
                ordered.len(),
                next.kind,
                next.passenger_id
            );
            current = next.coordinate;
            ordered.push(next.clone());
        }

        let diagnostics = SequenceDiagnostics {
            fallback_used,
            orphan_dropoffs,
            heuristic_distance_km: path_length_km(start, &ordered),
            sequence_time: started_at.elapsed(),
        };
        info!(
            "sequenced {} waypoints, {:.2} km straight-line",
            ordered.len(),
            diagnostics.heuristic_distance_km
        );
        Sequence {
            waypoints: ordered,
            diagnostics,
        }
    }
}

/// Great-circle length of the path from `start` through `waypoints`.
fn path_length_km(start: Coordinate, waypoints: &[Waypoint]) -> f64 {
    let stops = waypoints.iter().map(|waypoint| waypoint.coordinate);
    std::iter::once(start)
        .chain(stops.clone())
        .zip(stops)
        .map(|(from, to)| distance_km(from, to))
        .sum()
}

/// Order `waypoints` for a driver leaving `start` using the default
/// [`NearestNeighbourSequencer`].
///
/// Returns a permutation of the input in which each passenger's pickup
/// precedes their dropoff. A dropoff without any pickup is sequenced like
/// any other free stop.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, Waypoint};
/// use carpool_sequencer::optimize_waypoints;
///
/// assert!(optimize_waypoints(Coordinate::new(0.0, 0.0), &[]).is_empty());
///
/// let pair = [
///     Waypoint::pickup(Coordinate::new(0.0, 0.01), 1, 1),
///     Waypoint::dropoff(Coordinate::new(0.0, 0.02), 1, 1),
/// ];
/// let ordered = optimize_waypoints(Coordinate::new(0.0, 0.0), &pair);
/// assert_eq!(ordered, pair.to_vec());
/// ```
#[must_use]
pub fn optimize_waypoints(start: Coordinate, waypoints: &[Waypoint]) -> Vec<Waypoint> {
    NearestNeighbourSequencer::new()
        .sequence(start, waypoints)
        .waypoints
}

#[cfg(test)]
mod tests;
