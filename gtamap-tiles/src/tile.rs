use gtamap_core::{MapView, TILE_SIZE};

/// Highest zoom level the tile atlas ships images for.
pub const MAX_NATIVE_ZOOM: u8 = 5;

/// Address of one tile in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileKey {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one edge of the pyramid at `z`.
    pub fn tiles_per_side(z: u8) -> u32 {
        1u32 << z.min(31)
    }

    /// `0 <= x, y < 2^z`. The map does not wrap.
    pub fn is_valid(&self) -> bool {
        let n = Self::tiles_per_side(self.z);
        self.z < 32 && self.x < n && self.y < n
    }
}

/// A tile and where to draw it, in screen pixels relative to the map's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub key: TileKey,
    pub x: f64,
    pub y: f64,
    /// Edge length on screen. Differs from the native tile size at
    /// fractional zoom or when zoomed past the last native level.
    pub size: f64,
}

/// The native tile level used to draw a view at `view_zoom`.
pub fn native_zoom(view_zoom: f64, max_native: u8) -> u8 {
    view_zoom.round().clamp(0.0, max_native as f64) as u8
}

/// Tiles that intersect the view, row-major from the top-left.
///
/// Tiles outside the pyramid are never returned, so panning past the edge
/// of the atlas yields fewer (or no) tiles.
pub fn visible_tiles(view: &MapView, max_native: u8) -> Vec<TilePlacement> {
    let z = native_zoom(view.zoom, max_native);
    let size = TILE_SIZE as f64 * (view.zoom - z as f64).exp2();
    let (ox, oy) = view.pixel_origin();
    let n = TileKey::tiles_per_side(z) as i64;

    let x0 = ((ox / size).floor() as i64).max(0);
    let x1 = (((ox + view.width as f64) / size).ceil() as i64).min(n);
    let y0 = ((oy / size).floor() as i64).max(0);
    let y1 = (((oy + view.height as f64) / size).ceil() as i64).min(n);

    let mut tiles = Vec::new();
    for ty in y0..y1 {
        for tx in x0..x1 {
            tiles.push(TilePlacement {
                key: TileKey::new(z, tx as u32, ty as u32),
                x: tx as f64 * size - ox,
                y: ty as f64 * size - oy,
                size,
            });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtamap_core::{world_to_viewport, ViewportCoords};

    fn covered(tiles: &[TilePlacement], sx: f64, sy: f64) -> bool {
        tiles
            .iter()
            .any(|t| sx >= t.x && sx < t.x + t.size && sy >= t.y && sy < t.y + t.size)
    }

    fn inside_pyramid(view: &MapView, sx: f64, sy: f64) -> bool {
        let (ox, oy) = view.pixel_origin();
        let extent = TILE_SIZE as f64 * view.zoom.exp2();
        let (px, py) = (ox + sx, oy + sy);
        (0.0..extent).contains(&px) && (0.0..extent).contains(&py)
    }

    fn assert_covers(view: &MapView, tiles: &[TilePlacement]) {
        for sy in (0..view.height).step_by(37) {
            for sx in (0..view.width).step_by(37) {
                let (sx, sy) = (sx as f64, sy as f64);
                if inside_pyramid(view, sx, sy) {
                    assert!(covered(tiles, sx, sy), "({sx}, {sy}) not covered");
                }
            }
        }
    }

    #[test]
    fn default_view_tiles() {
        let view = MapView::new(800, 600).unwrap();
        let tiles = visible_tiles(&view, MAX_NATIVE_ZOOM);
        // Origin (69.2, 391.2) at zoom 2: columns 0..4, rows 1..4.
        assert_eq!(tiles.len(), 12);
        assert_eq!(tiles[0].key, TileKey::new(2, 0, 1));
        assert!((tiles[0].size - 256.0).abs() < 1e-9);
        assert_covers(&view, &tiles);
    }

    #[test]
    fn tiles_stay_inside_pyramid() {
        let mut view = MapView::new(1920, 1080).unwrap();
        for zoom in [0.0, 1.0, 2.6, 4.0, 5.0] {
            view.set_view(world_to_viewport(-3500.0, 7500.0), zoom);
            let tiles = visible_tiles(&view, MAX_NATIVE_ZOOM);
            assert!(tiles.iter().all(|t| t.key.is_valid()), "zoom {zoom}");
            assert_covers(&view, &tiles);
        }
    }

    #[test]
    fn fractional_zoom_scales_tiles() {
        let mut view = MapView::new(640, 480).unwrap();
        view.set_zoom(2.4);
        let tiles = visible_tiles(&view, MAX_NATIVE_ZOOM);
        assert!(tiles.iter().all(|t| t.key.z == 2));
        assert!((tiles[0].size - 256.0 * 0.4f64.exp2()).abs() < 1e-9);
        assert_covers(&view, &tiles);
    }

    #[test]
    fn zoom_past_native_level_upscales() {
        let mut view = MapView::with_zoom_range(640, 480, 0.0, 7.0).unwrap();
        view.set_zoom(7.0);
        let tiles = visible_tiles(&view, MAX_NATIVE_ZOOM);
        assert!(tiles.iter().all(|t| t.key.z == MAX_NATIVE_ZOOM));
        assert!((tiles[0].size - 1024.0).abs() < 1e-9);
    }

    #[test]
    fn view_off_the_atlas_has_no_tiles() {
        let mut view = MapView::new(800, 600).unwrap();
        view.set_view(ViewportCoords::new(1.0e6, 1.0e6), 3.0);
        assert!(visible_tiles(&view, MAX_NATIVE_ZOOM).is_empty());
    }

    #[test]
    fn key_validity() {
        assert!(TileKey::new(0, 0, 0).is_valid());
        assert!(!TileKey::new(0, 1, 0).is_valid());
        assert!(TileKey::new(3, 7, 7).is_valid());
        assert!(!TileKey::new(3, 8, 0).is_valid());
    }

    #[test]
    fn native_zoom_rounds_and_clamps() {
        assert_eq!(native_zoom(2.4, 5), 2);
        assert_eq!(native_zoom(2.5, 5), 3);
        assert_eq!(native_zoom(-1.0, 5), 0);
        assert_eq!(native_zoom(9.0, 5), 5);
    }
}
