use crate::braille::BrailleCanvas;

/// Walk a line with Bresenham's algorithm, calling `plot` for every pixel
pub fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        plot(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    walk_line(x0, y0, x1, y1, |x, y| canvas.set_pixel_signed(x, y));
}

/// Dashed line: `on` pixels drawn, then `off` skipped
pub fn draw_dashed_line(
    canvas: &mut BrailleCanvas,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    on: usize,
    off: usize,
) {
    let period = (on + off).max(1);
    let mut step = 0usize;
    walk_line(x0, y0, x1, y1, |x, y| {
        if step % period < on {
            canvas.set_pixel_signed(x, y);
        }
        step += 1;
    });
}

/// Draw a filled circle (point markers)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Even-odd scanline fill at terminal-cell resolution.
///
/// `rings` are in braille pixel coordinates. A cell (cx, cy) is covered when
/// its sample point (cx*2+1, cy*4+2) lies inside; covered cells are pushed to
/// `out` as row-major indices into a `cols` x `rows` grid.
pub fn fill_cells(rings: &[Vec<(f64, f64)>], cols: usize, rows: usize, out: &mut Vec<usize>) {
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in rings.iter().flatten() {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if !(min_y <= max_y) || rows == 0 || cols == 0 {
        return;
    }

    let first_row = ((min_y - 2.0) / 4.0).ceil().max(0.0) as usize;
    let last_row = (((max_y - 2.0) / 4.0).floor()).min(rows as f64 - 1.0);
    if last_row < 0.0 {
        return;
    }
    let last_row = last_row as usize;

    let mut crossings: Vec<f64> = Vec::new();
    for cy in first_row..=last_row {
        let sample_y = (cy * 4 + 2) as f64;
        crossings.clear();

        for ring in rings {
            for edge in ring.windows(2) {
                let (x0, y0) = edge[0];
                let (x1, y1) = edge[1];
                if (y0 <= sample_y) != (y1 <= sample_y) {
                    crossings.push(x0 + (sample_y - y0) * (x1 - x0) / (y1 - y0));
                }
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Cells whose sample x falls inside [a, b)
            let first = ((span[0] - 1.0) / 2.0).ceil().max(0.0);
            let last = ((span[1] - 1.0) / 2.0).ceil() - 1.0;
            if last < first {
                continue;
            }
            let last = (last as usize).min(cols - 1);
            for cx in first as usize..=last {
                out.push(cy * cols + cx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_dashed_line_skips_pixels() {
        let mut canvas = BrailleCanvas::new(4, 1);
        draw_dashed_line(&mut canvas, (0, 0), (7, 0), 2, 2);
        assert_eq!(canvas.to_string(), "⠉⠀⠉⠀");
    }

    #[test]
    fn test_fill_square() {
        // 8x8 pixel square starting at the origin covers 4x2 cells
        let square = vec![vec![(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0), (0.0, 0.0)]];
        let mut cells = Vec::new();
        fill_cells(&square, 10, 10, &mut cells);
        assert_eq!(cells, vec![0, 1, 2, 3, 10, 11, 12, 13]);
    }

    #[test]
    fn test_fill_hole_is_even_odd() {
        let outer = vec![(0.0, 0.0), (12.0, 0.0), (12.0, 4.0), (0.0, 4.0), (0.0, 0.0)];
        let hole = vec![(4.0, 0.5), (8.0, 0.5), (8.0, 3.5), (4.0, 3.5), (4.0, 0.5)];
        let mut cells = Vec::new();
        fill_cells(&[outer, hole], 6, 1, &mut cells);
        assert_eq!(cells, vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_fill_clips_to_grid() {
        let big = vec![vec![(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0), (-50.0, -50.0)]];
        let mut cells = Vec::new();
        fill_cells(&big, 3, 2, &mut cells);
        assert_eq!(cells, vec![0, 1, 2, 3, 4, 5]);
    }
}
