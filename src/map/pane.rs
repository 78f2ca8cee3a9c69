use crate::index::WorldMap;
use crate::map::projection::Viewport;
use crate::braille::BrailleCanvas;
use crate::map::renderer::{outline, rasterize, MapLayers};
use crate::scale::Rgb;
use crossterm::event::KeyCode;
use ratatui::layout::Rect;

/// Choropleth state shared by the map views: viewport, the last area it was
/// drawn into and the cached raster. The raster is rebuilt only when the
/// area, the viewport or the colouring changes.
pub struct MapPane {
    pub viewport: Viewport,
    area: Rect,
    layers: Option<MapLayers>,
    last_drag: Option<(u16, u16)>,
}

impl MapPane {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::world(0, 0),
            area: Rect::default(),
            layers: None,
            last_drag: None,
        }
    }

    /// Drop the raster; the next `layers` call rebuilds it
    pub fn invalidate(&mut self) {
        self.layers = None;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Cached raster for `area`, rebuilding it when stale
    pub fn layers<F>(&mut self, area: Rect, world: &WorldMap, value: F) -> &MapLayers
    where
        F: Fn(usize) -> Option<Rgb> + Sync,
    {
        if area != self.area {
            self.area = area;
            self.viewport.resize(area.width as usize * 2, area.height as usize * 4);
            self.layers = None;
        }
        let cols = area.width as usize;
        let rows = area.height as usize;
        let viewport = &self.viewport;
        self.layers
            .get_or_insert_with(|| rasterize(world, viewport, cols, rows, value))
    }

    /// Last raster built, if still valid
    pub fn raster(&self) -> Option<&MapLayers> {
        self.layers.as_ref()
    }

    /// Outline of some features in the current viewport
    pub fn outline(&self, world: &WorldMap, features: &[usize]) -> BrailleCanvas {
        outline(
            world,
            features,
            &self.viewport,
            self.area.width as usize,
            self.area.height as usize,
        )
    }

    /// Feature under a terminal position, from the last raster
    pub fn feature_at(&self, col: u16, row: u16) -> Option<usize> {
        let local = self.local(col, row)?;
        self.layers.as_ref()?.owner_at(local.0 as usize, local.1 as usize)
    }

    /// Terminal position relative to the pane, `None` outside it
    fn local(&self, col: u16, row: u16) -> Option<(u16, u16)> {
        let a = self.area;
        if col < a.x || row < a.y || col >= a.x + a.width || row >= a.y + a.height {
            return None;
        }
        Some((col - a.x, row - a.y))
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.local(col, row).is_some()
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.invalidate();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.invalidate();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.invalidate();
    }

    /// Zoom towards a terminal position (each cell is 2x4 braille pixels)
    pub fn zoom_at(&mut self, col: u16, row: u16, factor: f64) {
        if let Some((x, y)) = self.local(col, row) {
            self.viewport.zoom_at(x as i32 * 2, y as i32 * 4, factor);
            self.invalidate();
        }
    }

    /// Pan / zoom / reset keys shared by the map views
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('h') => self.pan(-10, 0),
            KeyCode::Char('l') => self.pan(10, 0),
            KeyCode::Char('k') => self.pan(0, -6),
            KeyCode::Char('j') => self.pan(0, 6),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_in(),
            KeyCode::Char('-') | KeyCode::Char('_') => self.zoom_out(),
            KeyCode::Char('r') | KeyCode::Char('0') => self.reset(),
            _ => return false,
        }
        true
    }

    pub fn start_drag(&mut self, col: u16, row: u16) {
        self.last_drag = self.contains(col, row).then_some((col, row));
    }

    /// Pan by the pointer movement since the last drag event
    pub fn drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_drag {
            // Less sensitive when zoomed out
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            let dx = (last_col as i32 - col as i32) * scale;
            let dy = (last_row as i32 - row as i32) * scale;
            if dx != 0 || dy != 0 {
                self.pan(dx, dy);
            }
            self.last_drag = Some((col, row));
        }
    }

    pub fn end_drag(&mut self) {
        self.last_drag = None;
    }

    pub fn reset(&mut self) {
        self.viewport.reset();
        self.invalidate();
    }
}

impl Default for MapPane {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoFeature;

    fn world() -> WorldMap {
        WorldMap::new(vec![GeoFeature {
            id: Some("076".into()),
            name: None,
            polygons: vec![vec![vec![(-70.0, -30.0), (-40.0, -30.0), (-40.0, 0.0), (-70.0, 0.0), (-70.0, -30.0)]]],
        }])
    }

    #[test]
    fn test_hit_test_uses_pane_offset() {
        let world = world();
        let mut pane = MapPane::new();
        let area = Rect::new(5, 3, 80, 20);
        pane.layers(area, &world, |_| None);

        let (px, py) = pane.viewport.project(-55.0, -15.0);
        let col = 5 + (px / 2) as u16;
        let row = 3 + (py / 4) as u16;
        assert_eq!(pane.feature_at(col, row), Some(0));
        assert_eq!(pane.feature_at(0, 0), None);
        assert_eq!(pane.feature_at(5, 3), None);
    }

    #[test]
    fn test_pan_invalidates_raster() {
        let world = world();
        let mut pane = MapPane::new();
        let area = Rect::new(0, 0, 40, 10);
        pane.layers(area, &world, |_| None);
        pane.pan(10, 0);
        assert_eq!(pane.feature_at(1, 1), None);
        assert!(pane.viewport.center_x > 0.0);
    }

    #[test]
    fn test_drag_pans_against_pointer() {
        let world = world();
        let mut pane = MapPane::new();
        pane.layers(Rect::new(0, 0, 40, 10), &world, |_| None);
        pane.start_drag(20, 5);
        pane.drag(15, 5);
        assert!(pane.viewport.center_x > 0.0);
        assert!(pane.raster().is_none());
        pane.end_drag();
        let before = pane.viewport.center_x;
        pane.drag(10, 5);
        assert_eq!(pane.viewport.center_x, before);
    }
}
