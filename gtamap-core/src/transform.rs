use serde::{Deserialize, Serialize};

/// A position in the game's native 2D coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldCoords {
    pub x: f64,
    pub y: f64,
}

/// A position in the map canvas coordinate system, before the tile
/// projection scales and translates it onto the pyramid.
///
/// Named after the two axes the tile projection expects: `lat` is the
/// vertical axis and `lng` the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportCoords {
    pub lat: f64,
    pub lng: f64,
}

impl ViewportCoords {
    pub const ORIGIN: Self = Self { lat: 0.0, lng: 0.0 };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rectangle of valid game-world coordinates.
///
/// Not used by the transform math. The HUD uses it to flag positions that
/// fall outside the playable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl GameBounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Extent of the Los Santos map in game units.
pub const GTA_BOUNDS: GameBounds = GameBounds {
    min_x: -4000.0,
    max_x: 4000.0,
    min_y: -4000.0,
    max_y: 8000.0,
};

/// Round to two decimal places, halves away from zero.
///
/// Values too large to scale by 100 have no fractional part and come back
/// unchanged, so a finite input always yields a finite result.
#[inline]
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Map game-world coordinates onto the canvas axes.
///
/// The projection's affine transform does the actual placement, so this is
/// a plain axis swap and is total over all inputs.
#[inline]
pub fn world_to_viewport(x: f64, y: f64) -> ViewportCoords {
    ViewportCoords { lat: y, lng: x }
}

/// Inverse of [`world_to_viewport`], rounded to 0.01 game units.
#[inline]
pub fn viewport_to_world(lat: f64, lng: f64) -> WorldCoords {
    WorldCoords {
        x: round2(lng),
        y: round2(lat),
    }
}

/// Display form used by the HUD and list views: `X: 1.00, Y: 2.00`.
pub fn format_coordinates(x: f64, y: f64) -> String {
    format!("X: {x:.2}, Y: {y:.2}")
}

/// Clipboard form used by the popup "Copy" action: `1.00, 2.00`.
pub fn format_clipboard(x: f64, y: f64) -> String {
    format!("{x:.2}, {y:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_viewport_swaps_axes() {
        let v = world_to_viewport(-218.78, -1703.47);
        assert_eq!(v.lat, -1703.47);
        assert_eq!(v.lng, -218.78);
    }

    #[test]
    fn viewport_to_world_rounds_to_hundredths() {
        let w = viewport_to_world(200.256, 100.504);
        assert_eq!(w.x, 100.5);
        assert_eq!(w.y, 200.26);
    }

    #[test]
    fn round_trip_within_tolerance() {
        let samples = [
            (0.0, 0.0),
            (-218.78, -1703.47),
            (1234.5678, -9876.54321),
            (3999.999, 7999.995),
            (-0.004, 0.006),
            (1e6 + 0.123, -1e6 - 0.987),
        ];
        for (x, y) in samples {
            let v = world_to_viewport(x, y);
            let w = viewport_to_world(v.lat, v.lng);
            assert!((w.x - x).abs() <= 0.005 + 1e-9, "x {x} -> {}", w.x);
            assert!((w.y - y).abs() <= 0.005 + 1e-9, "y {y} -> {}", w.y);
        }
    }

    #[test]
    fn round2_is_half_away_from_zero() {
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn round2_keeps_huge_values_finite() {
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(-f64::MAX), -f64::MAX);
        assert!(round2(1.7e306).is_finite());
    }

    #[test]
    fn format_coordinates_two_decimals() {
        assert_eq!(format_coordinates(1.0, -2.5), "X: 1.00, Y: -2.50");
        assert_eq!(format_coordinates(-218.78, 33.333), "X: -218.78, Y: 33.33");
    }

    #[test]
    fn format_clipboard_two_decimals() {
        assert_eq!(format_clipboard(10.0, 20.126), "10.00, 20.13");
    }

    #[test]
    fn gta_bounds_contains() {
        assert!(GTA_BOUNDS.contains(0.0, 0.0));
        assert!(GTA_BOUNDS.contains(-4000.0, 8000.0));
        assert!(!GTA_BOUNDS.contains(4000.5, 0.0));
        assert!(!GTA_BOUNDS.contains(0.0, -4001.0));
    }
}
