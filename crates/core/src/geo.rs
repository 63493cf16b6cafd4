//! Great-circle geometry for the archive geo filter.
//!
//! The query engine uses a two-stage strategy: a latitude/longitude
//! bounding box computed here prefilters candidate rows in SQL, then exact
//! haversine containment runs over the candidates in process. The box is a
//! spherical approximation that over-selects its corners; the circle test
//! is what decides final membership.

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Latitude/longitude box around a center point and radius.
///
/// When the circle touches a pole the longitude span degenerates to the
/// full range; when it crosses the antimeridian `wraps` is set and the
/// longitude condition becomes `lon >= west OR lon <= east`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_west: f64,
    pub lon_east: f64,
    /// True when the box crosses the antimeridian.
    pub wraps: bool,
}

impl BoundingBox {
    /// Compute the box enclosing the circle of `radius_m` around the
    /// center, on the sphere.
    pub fn around(center_lat: f64, center_lon: f64, radius_m: f64) -> Self {
        let angular = radius_m / EARTH_RADIUS_M;
        let angular_deg = angular.to_degrees();

        let lat_min = center_lat - angular_deg;
        let lat_max = center_lat + angular_deg;

        // A circle touching either pole spans every meridian.
        if lat_max >= 90.0 || lat_min <= -90.0 {
            return Self {
                lat_min: lat_min.max(-90.0),
                lat_max: lat_max.min(90.0),
                lon_west: -180.0,
                lon_east: 180.0,
                wraps: false,
            };
        }

        // Widest longitude extent of the circle; cos(lat) shrinks meridian
        // spacing away from the equator.
        let d_lon = (angular.sin() / center_lat.to_radians().cos())
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees();

        let mut lon_west = center_lon - d_lon;
        let mut lon_east = center_lon + d_lon;
        let mut wraps = false;

        if lon_west < -180.0 {
            lon_west += 360.0;
            wraps = true;
        }
        if lon_east > 180.0 {
            lon_east -= 360.0;
            wraps = true;
        }

        Self {
            lat_min,
            lat_max,
            lon_west,
            lon_east,
            wraps,
        }
    }

    /// Whether a point lies inside the box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.lat_min || lat > self.lat_max {
            return false;
        }
        if self.wraps {
            lon >= self.lon_west || lon <= self.lon_east
        } else {
            lon >= self.lon_west && lon <= self.lon_east
        }
    }
}
