/// Geographic bounding box in degrees, `[min_lon, min_lat, max_lon, max_lat]`
/// in GeoJSON order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl LonLatBounds {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(
            self.min_lon.min(other.min_lon),
            self.min_lat.min(other.min_lat),
            self.max_lon.max(other.max_lon),
            self.max_lat.max(other.max_lat),
        )
    }

    /// Corner pair in the `[[south, west], [north, east]]` order map widgets
    /// expect for fitting a view.
    pub fn south_west_north_east(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }
}

#[cfg(test)]
mod tests {
    use super::LonLatBounds;

    #[test]
    fn corners_are_lat_lon_ordered() {
        let b = LonLatBounds::new(-100.0, 30.0, -90.0, 40.0);
        assert_eq!(b.south_west_north_east(), [[30.0, -100.0], [40.0, -90.0]]);
    }

    #[test]
    fn union_covers_both() {
        let a = LonLatBounds::new(0.0, 0.0, 1.0, 1.0);
        let b = LonLatBounds::new(-1.0, 0.5, 0.5, 2.0);
        assert_eq!(a.union(b), LonLatBounds::new(-1.0, 0.0, 1.0, 2.0));
    }
}
