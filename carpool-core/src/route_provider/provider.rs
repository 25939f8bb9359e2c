//! Route provider trait.

use crate::{Coordinate, RouteCandidate};

use super::error::RouteProviderError;

/// Fetch routes from `start` to `end` through ordered `waypoints`.
///
/// Implementers return the candidates ranked by the service, best first.
/// An empty vector is a valid answer meaning no route was found; callers
/// decide whether that is an error.
///
/// # Examples
///
/// ```rust
/// use geo::LineString;
/// use carpool_core::{Coordinate, RouteCandidate, RouteMetrics, RouteProvider, RouteProviderError};
///
/// struct FixedProvider;
///
/// impl RouteProvider for FixedProvider {
///     fn route_between(
///         &self,
///         start: Coordinate,
///         end: Coordinate,
///         waypoints: &[Coordinate],
///     ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
///         let path = std::iter::once(start)
///             .chain(waypoints.iter().copied())
///             .chain(std::iter::once(end))
///             .map(geo::Coord::from)
///             .collect::<Vec<_>>();
///         Ok(vec![RouteCandidate::new(
///             LineString::new(path),
///             RouteMetrics::new(1_000.0, 60.0),
///         )])
///     }
/// }
///
/// let routes = FixedProvider.route_between(
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(0.1, 0.1),
///     &[],
/// )?;
/// assert_eq!(routes.len(), 1);
/// # Ok::<(), RouteProviderError>(())
/// ```
pub trait RouteProvider {
    /// Return candidate routes for the ordered stop sequence.
    fn route_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError>;
}

impl<P: RouteProvider + ?Sized> RouteProvider for &P {
    fn route_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        (**self).route_between(start, end, waypoints)
    }
}

impl<P: RouteProvider + ?Sized> RouteProvider for Box<P> {
    fn route_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        (**self).route_between(start, end, waypoints)
    }
}
