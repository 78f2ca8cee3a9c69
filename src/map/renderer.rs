use crate::braille::BrailleCanvas;
use crate::geo::{GeoFeature, Ring};
use crate::index::WorldMap;
use crate::map::geometry::{draw_line, fill_cells};
use crate::map::projection::Viewport;
use crate::scale::Rgb;
use rayon::prelude::*;

/// What a terminal cell shows under the fill layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellFill {
    /// Sea / outside every feature
    Empty,
    Value(Rgb),
    /// Country without a value (unresolved code, missing data, non-positive)
    NoData,
}

/// One rasterized frame of a choropleth
pub struct MapLayers {
    pub cols: usize,
    pub rows: usize,
    pub fills: Vec<CellFill>,
    /// Feature index covering each cell, for hover hit-testing
    pub owners: Vec<Option<usize>>,
    pub borders: BrailleCanvas,
}

impl MapLayers {
    pub fn owner_at(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.owners[row * self.cols + col]
    }

    pub fn fill_at(&self, col: usize, row: usize) -> CellFill {
        if col >= self.cols || row >= self.rows {
            return CellFill::Empty;
        }
        self.fills[row * self.cols + col]
    }
}

/// Project every ring of a feature to braille pixels
fn project_rings(feature: &GeoFeature, viewport: &Viewport) -> Vec<Vec<(f64, f64)>> {
    feature
        .rings()
        .map(|ring| {
            ring.iter()
                .map(|&(lon, lat)| viewport.project_f(lon, lat))
                .collect()
        })
        .collect()
}

fn off_screen(rings: &[Vec<(f64, f64)>], viewport: &Viewport) -> bool {
    let (mut x0, mut y0, mut x1, mut y1) = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(x, y) in rings.iter().flatten() {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    !(x1 >= 0.0 && y1 >= 0.0 && x0 < viewport.width as f64 && y0 < viewport.height as f64)
}

/// Rasterize all features into cell fills plus a border layer.
/// `value` gives a feature's colour, `None` marks it as no data.
pub fn rasterize<F>(world: &WorldMap, viewport: &Viewport, cols: usize, rows: usize, value: F) -> MapLayers
where
    F: Fn(usize) -> Option<Rgb> + Sync,
{
    // Scanline per feature in parallel, then merge in feature order
    let covered: Vec<(usize, CellFill, Vec<usize>)> = world
        .features
        .par_iter()
        .enumerate()
        .filter_map(|(i, feature)| {
            let rings = project_rings(feature, viewport);
            if rings.is_empty() || off_screen(&rings, viewport) {
                return None;
            }
            let mut cells = Vec::new();
            fill_cells(&rings, cols, rows, &mut cells);
            let fill = value(i).map_or(CellFill::NoData, CellFill::Value);
            Some((i, fill, cells))
        })
        .collect();

    let mut fills = vec![CellFill::Empty; cols * rows];
    let mut owners = vec![None; cols * rows];
    for (i, fill, cells) in covered {
        for cell in cells {
            fills[cell] = fill;
            owners[cell] = Some(i);
        }
    }

    let mut borders = BrailleCanvas::new(cols, rows);
    for feature in &world.features {
        for ring in feature.rings() {
            draw_ring(&mut borders, ring, viewport);
        }
    }

    MapLayers {
        cols,
        rows,
        fills,
        owners,
        borders,
    }
}

/// Outline a set of features on a fresh canvas
pub fn outline(world: &WorldMap, features: &[usize], viewport: &Viewport, cols: usize, rows: usize) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(cols, rows);
    for feature in features.iter().filter_map(|&i| world.features.get(i)) {
        for ring in feature.rings() {
            draw_ring(&mut canvas, ring, viewport);
        }
    }
    canvas
}

/// Draw a ring with viewport culling
fn draw_ring(canvas: &mut BrailleCanvas, ring: &Ring, viewport: &Viewport) {
    if ring.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in ring {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            // Long jumps are antimeridian wraps, not edges
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: &str, lon: f64, lat: f64, size: f64) -> GeoFeature {
        GeoFeature {
            id: Some(id.to_string()),
            name: None,
            polygons: vec![vec![vec![
                (lon, lat),
                (lon + size, lat),
                (lon + size, lat + size),
                (lon, lat + size),
                (lon, lat),
            ]]],
        }
    }

    #[test]
    fn test_rasterize_values_and_no_data() {
        // 840 resolves to US, 999 does not
        let world = WorldMap::new(vec![square("840", -100.0, 30.0, 20.0), square("999", 20.0, -10.0, 20.0)]);
        let viewport = Viewport::world(160, 80);
        let red = Rgb(200, 0, 0);
        let layers = rasterize(&world, &viewport, 80, 20, |i| world.code(i).map(|_| red));

        assert!(layers.fills.contains(&CellFill::Value(red)));
        assert!(layers.fills.contains(&CellFill::NoData));
        assert!(layers.fills.contains(&CellFill::Empty));

        let (px, py) = viewport.project(30.0, 0.0);
        let (col, row) = (px as usize / 2, py as usize / 4);
        assert_eq!(layers.owner_at(col, row), Some(1));
        assert_eq!(layers.fill_at(col, row), CellFill::NoData);
        assert!(!layers.borders.is_blank());
    }

    #[test]
    fn test_owner_out_of_range() {
        let world = WorldMap::new(Vec::new());
        let layers = rasterize(&world, &Viewport::world(20, 20), 10, 5, |_| None);
        assert_eq!(layers.owner_at(10, 0), None);
        assert_eq!(layers.owner_at(0, 0), None);
    }

    #[test]
    fn test_outline_only_selected() {
        let world = WorldMap::new(vec![square("840", -100.0, 30.0, 20.0)]);
        let viewport = Viewport::world(160, 80);
        assert!(outline(&world, &[], &viewport, 80, 20).is_blank());
        assert!(!outline(&world, &[0], &viewport, 80, 20).is_blank());
    }
}
