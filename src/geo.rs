//! Geographic coordinates and distance metrics.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Distance metric used when building matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    /// Great-circle distance in kilometres.
    #[default]
    Haversine,
    /// Euclidean distance in degree space.
    Planar,
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Euclidean distance treating degrees as planar units.
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = a.lat - b.lat;
    let dy = a.lng - b.lng;
    (dx * dx + dy * dy).sqrt()
}

pub fn distance(a: GeoPoint, b: GeoPoint, metric: Metric) -> f64 {
    match metric {
        Metric::Haversine => haversine_km(a, b),
        Metric::Planar => planar_distance(a, b),
    }
}

/// Builds a symmetric distance matrix with a zero diagonal.
pub fn distance_matrix(points: &[GeoPoint], metric: Metric) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance(points[i], points[j], metric);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAIROBI: GeoPoint = GeoPoint::new(-1.2921, 36.8219);
    const MOMBASA: GeoPoint = GeoPoint::new(-4.0435, 39.6682);

    #[test]
    fn test_haversine_zero() {
        assert!(haversine_km(NAIROBI, NAIROBI).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_nairobi_mombasa() {
        let d = haversine_km(NAIROBI, MOMBASA);
        // Straight-line distance is roughly 440 km.
        assert!((430.0..450.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_km(NAIROBI, MOMBASA);
        let ba = haversine_km(MOMBASA, NAIROBI);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_planar_distance() {
        let d = planar_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_matrix_shape() {
        let m = distance_matrix(&[NAIROBI, MOMBASA, GeoPoint::new(0.0, 37.0)], Metric::Haversine);
        assert_eq!(m.len(), 3);
        for (i, row) in m.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert_eq!(row[i], 0.0);
        }
        assert!((m[0][1] - m[1][0]).abs() < 1e-12);
    }

    #[test]
    fn test_point_validity() {
        assert!(NAIROBI.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
