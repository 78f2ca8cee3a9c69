use crate::geo::{clamp_lat, normalize_lon};

/// Half extents of the Natural Earth plane (longitude ±180°, latitude ±90°)
const HALF_WIDTH: f64 = 2.7354;
const HALF_HEIGHT: f64 = 1.4224;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 40.0;

/// Natural Earth I projection, unit sphere. Input in degrees.
#[inline(always)]
pub fn natural_earth(lon: f64, lat: f64) -> (f64, f64) {
    let lambda = normalize_lon(lon).to_radians();
    let phi = clamp_lat(lat).to_radians();
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;

    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226
            + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

/// Viewport over the projected plane, measured in braille pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Projected coordinates under the middle of the canvas
    pub center_x: f64,
    pub center_y: f64,
    /// Zoom level (1 = whole world fitted)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    /// Whole world fitted to the canvas
    pub fn world(width: usize, height: usize) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom: 1.0,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn reset(&mut self) {
        *self = Self::world(self.width, self.height);
    }

    /// Pixels per projected unit
    fn scale(&self) -> f64 {
        let fit_x = self.width as f64 / (2.0 * HALF_WIDTH);
        let fit_y = self.height as f64 / (2.0 * HALF_HEIGHT);
        fit_x.min(fit_y) * 0.98 * self.zoom
    }

    /// Project to fractional pixel coordinates (y grows downwards)
    pub fn project_f(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = natural_earth(lon, lat);
        let s = self.scale();
        (
            (x - self.center_x) * s + self.width as f64 / 2.0,
            (self.center_y - y) * s + self.height as f64 / 2.0,
        )
    }

    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (px, py) = self.project_f(lon, lat);
        (px.round() as i32, py.round() as i32)
    }

    /// Projected-plane coordinates under a pixel
    pub fn plane_at(&self, px: f64, py: f64) -> (f64, f64) {
        let s = self.scale();
        if s == 0.0 {
            return (self.center_x, self.center_y);
        }
        (
            (px - self.width as f64 / 2.0) / s + self.center_x,
            self.center_y - (py - self.height as f64 / 2.0) / s,
        )
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let s = self.scale();
        if s == 0.0 {
            return;
        }
        self.center_x = (self.center_x + dx as f64 / s).clamp(-HALF_WIDTH, HALF_WIDTH);
        self.center_y = (self.center_y - dy as f64 / s).clamp(-HALF_HEIGHT, HALF_HEIGHT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom by factor keeping the point under (px, py) fixed
    pub fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (x, y) = self.plane_at(px as f64, py as f64);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (nx, ny) = self.plane_at(px as f64, py as f64);
        self.center_x = (self.center_x + x - nx).clamp(-HALF_WIDTH, HALF_WIDTH);
        self.center_y = (self.center_y + y - ny).clamp(-HALF_HEIGHT, HALF_HEIGHT);
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_bounds() {
        let (x, _) = natural_earth(180.0 - 1e-9, 0.0);
        assert!((x - std::f64::consts::PI * 0.8707).abs() < 1e-6);
        let (_, y) = natural_earth(0.0, 90.0);
        assert!((y - HALF_HEIGHT).abs() < 1e-3);
        assert_eq!(natural_earth(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_project_center() {
        let vp = Viewport::world(100, 60);
        assert_eq!(vp.project(0.0, 0.0), (50, 30));
        let (_, north) = vp.project(0.0, 45.0);
        assert!(north < 30);
    }

    #[test]
    fn test_world_fits() {
        let vp = Viewport::world(200, 80);
        let (left, _) = vp.project(-179.9, 0.0);
        let (right, _) = vp.project(179.9, 0.0);
        let (_, top) = vp.project(0.0, 89.9);
        let (_, bottom) = vp.project(0.0, -89.9);
        assert!(left >= 0 && right <= 200);
        assert!(top >= 0 && bottom <= 80);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = Viewport::world(200, 100);
        let before = vp.plane_at(150.0, 40.0);
        vp.zoom_at(150, 40, 2.0);
        let after = vp.plane_at(150.0, 40.0);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
        assert_eq!(vp.zoom, 2.0);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::world(100, 100);
        vp.pan(10, 0);
        assert!(vp.center_x > 0.0);
        vp.pan(0, 10);
        assert!(vp.center_y < 0.0);
    }
}
