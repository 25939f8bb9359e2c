//! Turn ordered coordinates into real-world routes.
//!
//! The `RouteProvider` trait abstracts the external routing service that
//! supplies authoritative distances and durations. Callers pass a fixed
//! start and end with intermediate waypoints and receive zero or more
//! [`RouteCandidate`](crate::RouteCandidate) values, best first.
//!
//! The engine never retries a failed call; retry and timeout policy belong
//! to the provider implementation or the caller.

mod error;
mod provider;

pub use error::RouteProviderError;
pub use provider::RouteProvider;
