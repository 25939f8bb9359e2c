//! HTTP-based route providers for routing services.
//!
//! This module provides [`HttpRouteProvider`], an implementation of
//! [`carpool_core::RouteProvider`] that fetches routes from an OSRM routing
//! service.
//!
//! # Architecture
//!
//! The provider calls the OSRM Route API with the ride's start, the ordered
//! intermediate stops and the ride's end. The synchronous [`RouteProvider`]
//! trait is implemented by blocking on async HTTP calls internally, keeping
//! the core library embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use carpool_core::{Coordinate, RouteProvider};
//! use carpool_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
//! use std::time::Duration;
//!
//! let config = HttpRouteProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRouteProvider::with_config(config)?;
//!
//! let routes = provider.route_between(
//!     Coordinate::new(-19.9227318, -43.9908267),
//!     Coordinate::new(-19.9325933, -43.9360532),
//!     &[Coordinate::new(-19.925, -43.96)],
//! )?;
//! println!("{} m", routes[0].metrics.distance_meters);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`RouteProvider`]: carpool_core::RouteProvider

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRouteProvider,
    HttpRouteProviderConfig, ProviderBuildError,
};
