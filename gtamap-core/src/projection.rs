use crate::error::ProjectionError;
use crate::transform::ViewportCoords;

/// Edge length of one map tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// `x' = a·x + b`, `y' = c·y + d`, applied before the zoom scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl AffineTransform {
    /// Calibration of the `styleAtlas` tile set against game coordinates.
    pub const GTA_ATLAS: Self = Self {
        a: 0.02072,
        b: 117.3,
        c: -0.0205,
        d: 172.8,
    };

    #[inline]
    fn apply(&self, lng: f64, lat: f64, scale: f64) -> (f64, f64) {
        (scale * (self.a * lng + self.b), scale * (self.c * lat + self.d))
    }

    #[inline]
    fn invert(&self, px: f64, py: f64, scale: f64) -> (f64, f64) {
        ((px / scale - self.b) / self.a, (py / scale - self.d) / self.c)
    }
}

/// Places viewport coordinates on the tile pyramid.
///
/// At zoom `z` the whole pyramid is `2^z` tiles wide; one unit of the affine
/// output is one pixel at zoom 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub transform: AffineTransform,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            transform: AffineTransform::GTA_ATLAS,
        }
    }
}

impl MapProjection {
    #[inline]
    pub fn scale(zoom: f64) -> f64 {
        zoom.exp2()
    }

    /// Absolute pixel position of `point` at `zoom`.
    #[inline]
    pub fn project(&self, point: ViewportCoords, zoom: f64) -> (f64, f64) {
        self.transform.apply(point.lng, point.lat, Self::scale(zoom))
    }

    /// Inverse of [`project`](Self::project).
    #[inline]
    pub fn unproject(&self, px: f64, py: f64, zoom: f64) -> ViewportCoords {
        let (lng, lat) = self.transform.invert(px, py, Self::scale(zoom));
        ViewportCoords { lat, lng }
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// The map camera: what part of the pyramid is shown, and at what zoom.
///
/// Screen coordinates are pixels relative to the top-left of the map area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub projection: MapProjection,
    pub center: ViewportCoords,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for MapView {
    /// A 1280×720 view with the default camera.
    fn default() -> Self {
        Self {
            projection: MapProjection::default(),
            center: ViewportCoords::ORIGIN,
            zoom: Self::DEFAULT_ZOOM,
            width: 1280,
            height: 720,
            min_zoom: Self::MIN_ZOOM,
            max_zoom: Self::MAX_ZOOM,
        }
    }
}

impl MapView {
    pub const DEFAULT_ZOOM: f64 = 2.0;
    pub const MIN_ZOOM: f64 = 0.0;
    pub const MAX_ZOOM: f64 = 5.0;

    /// Default camera: centred on the origin at zoom 2, zoom range `0..=5`.
    pub fn new(width: u32, height: u32) -> Result<Self, ProjectionError> {
        Self::with_zoom_range(width, height, Self::MIN_ZOOM, Self::MAX_ZOOM)
    }

    pub fn with_zoom_range(
        width: u32,
        height: u32,
        min_zoom: f64,
        max_zoom: f64,
    ) -> Result<Self, ProjectionError> {
        check_size(width, height)?;
        check_zoom_range(min_zoom, max_zoom)?;
        Ok(Self {
            projection: MapProjection::default(),
            center: ViewportCoords::ORIGIN,
            zoom: Self::DEFAULT_ZOOM.clamp(min_zoom, max_zoom),
            width,
            height,
            min_zoom,
            max_zoom,
        })
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn set_zoom_range(&mut self, min_zoom: f64, max_zoom: f64) -> Result<(), ProjectionError> {
        check_zoom_range(min_zoom, max_zoom)?;
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.clamp_zoom(self.zoom);
        Ok(())
    }

    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), ProjectionError> {
        check_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Move the camera to `center` at `zoom` (clamped).
    pub fn set_view(&mut self, center: ViewportCoords, zoom: f64) {
        self.center = center;
        self.set_zoom(zoom);
    }

    fn half_size(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Absolute pixel position (at the current zoom) of the top-left corner.
    pub fn pixel_origin(&self) -> (f64, f64) {
        let (cx, cy) = self.projection.project(self.center, self.zoom);
        let (hw, hh) = self.half_size();
        (cx - hw, cy - hh)
    }

    pub fn screen_to_viewport(&self, sx: f64, sy: f64) -> ViewportCoords {
        let (ox, oy) = self.pixel_origin();
        self.projection.unproject(ox + sx, oy + sy, self.zoom)
    }

    pub fn viewport_to_screen(&self, point: ViewportCoords) -> (f64, f64) {
        let (ox, oy) = self.pixel_origin();
        let (px, py) = self.projection.project(point, self.zoom);
        (px - ox, py - oy)
    }

    /// Drag the map by a screen delta: content follows the pointer.
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.projection.project(self.center, self.zoom);
        self.center = self.projection.unproject(cx - dx, cy - dy, self.zoom);
    }

    /// Change zoom while keeping the map point under `(sx, sy)` in place.
    pub fn zoom_at(&mut self, sx: f64, sy: f64, zoom: f64) {
        let anchor = self.screen_to_viewport(sx, sy);
        let zoom = self.clamp_zoom(zoom);
        let (ax, ay) = self.projection.project(anchor, zoom);
        let (hw, hh) = self.half_size();
        self.center = self.projection.unproject(ax - sx + hw, ay - sy + hh, zoom);
        self.zoom = zoom;
    }

    /// Centre on `point`, zooming in to at least `min_zoom`. Never zooms out.
    pub fn focus_on(&mut self, point: ViewportCoords, min_zoom: f64) {
        self.center = point;
        self.zoom = self.clamp_zoom(self.zoom.max(min_zoom));
    }

    /// Back to the default centre and zoom.
    pub fn reset(&mut self) {
        self.set_view(ViewportCoords::ORIGIN, Self::DEFAULT_ZOOM);
    }

    /// Viewport coordinates of the top-left and bottom-right screen corners.
    pub fn visible_corners(&self) -> (ViewportCoords, ViewportCoords) {
        (
            self.screen_to_viewport(0.0, 0.0),
            self.screen_to_viewport(self.width as f64, self.height as f64),
        )
    }
}

fn check_size(width: u32, height: u32) -> Result<(), ProjectionError> {
    if width == 0 || height == 0 {
        return Err(ProjectionError::InvalidSize { width, height });
    }
    Ok(())
}

fn check_zoom_range(min: f64, max: f64) -> Result<(), ProjectionError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ProjectionError::InvalidZoomRange { min, max });
    }
    Ok(())
}
