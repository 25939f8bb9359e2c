//! Constrained nearest-neighbour stop sequencing for carpool rides.
//!
//! This crate provides [`NearestNeighbourSequencer`], the default
//! implementation of the [`Sequencer`](carpool_core::Sequencer) trait, and
//! the [`optimize_waypoints`] convenience function. From the driver's
//! position it repeatedly visits the closest stop that may legally come
//! next: any pickup, or a dropoff whose passenger is already aboard.
//! Pickups are favoured by a tunable bias so nearby passengers board before
//! others are dropped off elsewhere.
//!
//! The heuristic is greedy and makes no optimality claim. Distances are
//! great-circle estimates; authoritative road costs come from a
//! [`RouteProvider`](carpool_core::RouteProvider).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod sequencer;

#[doc(hidden)]
pub mod test_support;

pub use sequencer::{
    DEFAULT_PICKUP_BIAS, NearestNeighbourSequencer, SequencerConfig, optimize_waypoints,
};
