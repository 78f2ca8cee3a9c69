mod canvas;

pub use canvas::BrailleCanvas;

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// Draw the set dots of `canvas` into `area` with the given colour.
/// Empty cells are left untouched so layers can be stacked back to front.
pub fn paint_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    let rows = canvas.height().min(area.height as usize);
    let cols = canvas.width().min(area.width as usize);
    for cy in 0..rows {
        for cx in 0..cols {
            if let Some(ch) = canvas.glyph(cx, cy) {
                let x = area.x + cx as u16;
                let y = area.y + cy as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}
