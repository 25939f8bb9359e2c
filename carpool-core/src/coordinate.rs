//! Geographic coordinates and the great-circle distance oracle.
//!
//! Distances computed here only guide the sequencing heuristic. The
//! authoritative trip distance always comes from a
//! [`RouteProvider`](crate::RouteProvider).

use geo::Coord;

/// Mean Earth radius used by [`distance_km`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position expressed in decimal degrees.
///
/// Converts losslessly to and from [`geo::Coord`], where `x` holds the
/// longitude and `y` the latitude.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use carpool_core::Coordinate;
///
/// let stop = Coordinate::new(-19.9227318, -43.9908267);
/// let coord: Coord<f64> = stop.into();
/// assert_eq!(coord.x, -43.9908267);
/// assert_eq!(coord.y, -19.9227318);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            x: coordinate.longitude,
            y: coordinate.latitude,
        }
    }
}

/// Great-circle distance between `a` and `b` in kilometres.
///
/// Uses the haversine formula with [`EARTH_RADIUS_KM`]. NaN inputs produce
/// NaN.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, distance_km};
///
/// let here = Coordinate::new(-19.9227318, -43.9908267);
/// assert_eq!(distance_km(here, here), 0.0);
/// ```
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_KM * angle
}
