//! Data access adapters for the carpool engine.
//!
//! Responsibilities:
//! - Implement [`carpool_core::RouteProvider`] against external routing
//!   services over HTTP.
//! - Encapsulate wire formats and map transport failures onto
//!   [`carpool_core::RouteProviderError`].
//!
//! Boundaries:
//! - Do not encode domain rules (live in `carpool-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod routing;
