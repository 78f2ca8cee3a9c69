use crate::braille::{paint_layer, BrailleCanvas};
use crate::map::renderer::{CellFill, MapLayers};
use crate::scale::NO_DATA;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Hatch glyph drawn over countries without data
pub const HATCH: char = '╱';

/// Renders cell fills as background colours, then border and highlight
/// outlines as braille dots on top
pub struct ChoroplethWidget<'a> {
    pub layers: &'a MapLayers,
    /// Extra outlines drawn last, back to front
    pub highlights: Vec<(&'a BrailleCanvas, Color)>,
}

impl Widget for ChoroplethWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.layers.rows.min(area.height as usize);
        let cols = self.layers.cols.min(area.width as usize);

        for row in 0..rows {
            for col in 0..cols {
                let x = area.x + col as u16;
                let y = area.y + row as u16;
                match self.layers.fill_at(col, row) {
                    CellFill::Empty => {}
                    CellFill::Value(rgb) => {
                        buf[(x, y)].set_char(' ').set_bg(rgb.into());
                    }
                    CellFill::NoData => {
                        buf[(x, y)]
                            .set_char(HATCH)
                            .set_fg(Color::DarkGray)
                            .set_bg(NO_DATA.into());
                    }
                }
            }
        }

        paint_layer(&self.layers.borders, Color::DarkGray, area, buf);

        for (canvas, color) in self.highlights.into_iter().filter(|(c, _)| !c.is_blank()) {
            paint_layer(canvas, color, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoFeature;
    use crate::index::WorldMap;
    use crate::map::projection::Viewport;
    use crate::map::renderer::rasterize;
    use crate::scale::Rgb;

    #[test]
    fn test_unmapped_feature_draws_hatch() {
        // 999 has no alpha-2 code, so it never gets a value
        let world = WorldMap::new(vec![GeoFeature {
            id: Some("999".into()),
            name: None,
            polygons: vec![vec![vec![(20.0, -20.0), (60.0, -20.0), (60.0, 20.0), (20.0, 20.0), (20.0, -20.0)]]],
        }]);
        let viewport = Viewport::world(160, 80);
        let layers = rasterize(&world, &viewport, 80, 20, |i| world.code(i).map(|_| Rgb(1, 2, 3)));

        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        ChoroplethWidget { layers: &layers, highlights: Vec::new() }.render(area, &mut buf);

        let (px, py) = viewport.project(40.0, 0.0);
        let cell = &buf[(px as u16 / 2, py as u16 / 4)];
        assert_eq!(cell.symbol(), HATCH.to_string());
        assert_eq!(cell.bg, Color::from(NO_DATA));
    }
}
