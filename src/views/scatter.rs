//! Donated vs received on log-log axes, with a purpose breakdown for the
//! selected country.

use crate::braille::{paint_layer, BrailleCanvas};
use crate::format::{axis_money, money};
use crate::index::{CountryIndex, CountryRecord};
use crate::map::{draw_circle, draw_dashed_line};
use crate::scale::{LogScale, Rgb};
use crate::views::{bar_lines, cell_pixel, Tooltip};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::rc::Rc;

/// Purposes listed in the breakdown panel
pub const TOP_PURPOSES: usize = 15;

const Y_AXIS_WIDTH: u16 = 7;

const POINT: Rgb = Rgb(0x25, 0x63, 0xeb);
const ACCENT: Rgb = Rgb(0xf9, 0x73, 0x16);
const SHADE_RECIPIENT: Rgb = Rgb(0xdb, 0xea, 0xfe);
const SHADE_DONOR: Rgb = Rgb(0xfe, 0xe2, 0xe2);
const DIAGONAL: Rgb = Rgb(0x49, 0x50, 0x70);

/// Part of `y = x` inside both domains, as a data range
pub fn diagonal(x: &LogScale, y: &LogScale) -> Option<(f64, f64)> {
    let lo = x.domain.0.max(y.domain.0);
    let hi = x.domain.1.min(y.domain.1);
    (lo < hi).then_some((lo, hi))
}

pub struct ScatterView {
    index: Rc<CountryIndex>,
    has_donated: bool,
    /// Plottable records ordered by name; also the ↑/↓ order
    points: Vec<usize>,
    x: Option<LogScale>,
    y: Option<LogScale>,
    selected: Option<usize>,
    hovered: Option<usize>,
    show_donated: bool,
    plot: Rect,
}

impl ScatterView {
    pub fn new(index: Rc<CountryIndex>, has_donated: bool) -> Self {
        let records = index.records();
        let mut points: Vec<usize> = (0..records.len()).filter(|&i| records[i].plottable()).collect();
        points.sort_by(|&a, &b| records[a].name.cmp(&records[b].name));

        let x = LogScale::from_values(points.iter().map(|&i| records[i].donated)).map(LogScale::nice);
        let y = LogScale::from_values(points.iter().map(|&i| records[i].received)).map(LogScale::nice);
        tracing::debug!("scatter: {} of {} countries plottable", points.len(), index.len());

        Self {
            index,
            has_donated,
            points,
            x,
            y,
            selected: None,
            hovered: None,
            show_donated: false,
            plot: Rect::default(),
        }
    }

    pub fn selected(&self) -> Option<&CountryRecord> {
        self.selected.map(|i| &self.index.records()[i])
    }

    pub fn select(&mut self, record: usize) {
        self.selected = Some(record);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Move the selection through the name-ordered list (dropdown order)
    pub fn cycle(&mut self, forward: bool) {
        if self.points.is_empty() {
            return;
        }
        let n = self.points.len();
        let next = match self.selected.and_then(|s| self.points.iter().position(|&p| p == s)) {
            Some(pos) if forward => (pos + 1) % n,
            Some(pos) => (pos + n - 1) % n,
            None if forward => 0,
            None => n - 1,
        };
        self.selected = Some(self.points[next]);
    }

    /// Rows for the breakdown panel
    pub fn breakdown(&self) -> &[(String, f64)] {
        match self.selected() {
            Some(record) => {
                let list = if self.show_donated {
                    &record.donated_by_purpose
                } else {
                    &record.received_by_purpose
                };
                &list[..list.len().min(TOP_PURPOSES)]
            }
            None => &[],
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Down | KeyCode::Char('j') => self.cycle(true),
            KeyCode::Up | KeyCode::Char('k') => self.cycle(false),
            KeyCode::Esc => self.clear_selection(),
            KeyCode::Char('d') => self.show_donated = !self.show_donated,
            _ => return false,
        }
        true
    }

    fn scales(&self) -> Option<(LogScale, LogScale)> {
        let (x, y) = (self.x?, self.y?);
        let w = (self.plot.width as f64 * 2.0 - 1.0).max(1.0);
        let h = (self.plot.height as f64 * 4.0 - 1.0).max(1.0);
        Some((x.with_range(0.0, w), y.with_range(h, 0.0)))
    }

    /// Nearest plotted point within about a cell of the pointer
    fn point_at(&self, col: u16, row: u16) -> Option<usize> {
        let (px, py) = cell_pixel(self.plot, col, row)?;
        let (sx, sy) = self.scales()?;
        let records = self.index.records();
        self.points
            .iter()
            .filter_map(|&i| {
                let x = sx.map(records[i].donated)?;
                let y = sy.map(records[i].received)?;
                let d = ((x - px) / 2.0).powi(2) + ((y - py) / 4.0).powi(2);
                (d <= 2.25).then_some((i, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn hover(&mut self, col: u16, row: u16) -> Option<Tooltip> {
        self.hovered = self.point_at(col, row);
        let record = &self.index.records()[self.hovered?];
        Some(
            Tooltip::new(record.name.clone(), (col, row))
                .field("Donated", money(record.donated))
                .field("Received", money(record.received))
                .note("Click for purpose breakdown"),
        )
    }

    /// Select the clicked point; a click on empty plot space keeps the selection
    pub fn click(&mut self, col: u16, row: u16) -> bool {
        let Some(hit) = self.point_at(col, row) else {
            return false;
        };
        self.select(hit);
        true
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [plot_area, panel_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
        self.render_plot(frame, plot_area);
        self.render_breakdown(frame, panel_area);
    }

    fn render_plot(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Total Donated (x) vs Total Received (y), USD ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.plot = Rect {
            x: inner.x + Y_AXIS_WIDTH.min(inner.width),
            y: inner.y,
            width: inner.width.saturating_sub(Y_AXIS_WIDTH),
            height: inner.height.saturating_sub(1),
        };

        let Some((sx, sy)) = self.scales().filter(|_| !self.plot.is_empty()) else {
            frame.render_widget(
                Paragraph::new("No country both donated and received a positive amount.")
                    .style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        };

        let plot = self.plot;
        let (cols, rows) = (plot.width as usize, plot.height as usize);
        let buf = frame.buffer_mut();

        // Half-plane shading by which side of y = x each cell centre falls
        for row in 0..plot.height {
            for col in 0..plot.width {
                let donated = sx.invert(col as f64 * 2.0 + 1.0);
                let received = sy.invert(row as f64 * 4.0 + 2.0);
                let shade = if received > donated { SHADE_RECIPIENT } else { SHADE_DONOR };
                buf[(plot.x + col, plot.y + row)].set_char(' ').set_bg(shade.into());
            }
        }

        let mut diag = BrailleCanvas::new(cols, rows);
        if let Some((lo, hi)) = diagonal(&sx, &sy) {
            if let (Some(x0), Some(y0), Some(x1), Some(y1)) = (sx.map(lo), sy.map(lo), sx.map(hi), sy.map(hi)) {
                draw_dashed_line(
                    &mut diag,
                    (x0.round() as i32, y0.round() as i32),
                    (x1.round() as i32, y1.round() as i32),
                    4,
                    4,
                );
            }
        }

        let records = self.index.records();
        let mut dots = BrailleCanvas::new(cols, rows);
        let mut accent = BrailleCanvas::new(cols, rows);
        for &i in &self.points {
            let (Some(x), Some(y)) = (sx.map(records[i].donated), sy.map(records[i].received)) else {
                continue;
            };
            let (x, y) = (x.round() as i32, y.round() as i32);
            if Some(i) == self.selected {
                draw_circle(&mut accent, x, y, 2);
            } else if Some(i) == self.hovered {
                draw_circle(&mut accent, x, y, 1);
            } else {
                draw_circle(&mut dots, x, y, 1);
            }
        }

        paint_layer(&diag, DIAGONAL.into(), plot, buf);
        paint_layer(&dots, POINT.into(), plot, buf);
        paint_layer(&accent, ACCENT.into(), plot, buf);

        // Decade ticks
        let label_style = Style::default().fg(Color::Gray);
        for tick in sy.ticks() {
            if let Some(py) = sy.map(tick) {
                let row = plot.y + (py / 4.0) as u16;
                if row < plot.y + plot.height {
                    let text = format!("{:>w$}", axis_money(tick), w = Y_AXIS_WIDTH as usize - 1);
                    buf.set_string(inner.x, row, text, label_style);
                }
            }
        }
        let axis_row = plot.y + plot.height;
        let mut next_free = plot.x;
        for tick in sx.ticks() {
            if let Some(px) = sx.map(tick) {
                let text = axis_money(tick);
                let col = (plot.x + (px / 2.0) as u16).saturating_sub(text.len() as u16 / 2);
                if col >= next_free && col + text.len() as u16 <= inner.x + inner.width {
                    buf.set_string(col, axis_row, &text, label_style);
                    next_free = col + text.len() as u16 + 1;
                }
            }
        }
    }

    fn render_breakdown(&self, frame: &mut Frame, area: Rect) {
        let side = if self.show_donated { "donated" } else { "received" };
        let title = match self.selected() {
            Some(record) => format!(" {} - Purpose Breakdown ({}) ", record.name, side),
            None => " Purpose Breakdown ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines: Vec<Line> = Vec::new();

        match self.selected() {
            None => {
                lines.push(Line::styled("Click a point or use ↑/↓ to choose a country.", dim));
            }
            Some(_) if self.show_donated && !self.has_donated => {
                lines.push(Line::styled("Donated purpose breakdown unavailable.", dim));
            }
            Some(record) => {
                let (all, total) = if self.show_donated {
                    (&record.donated_by_purpose, record.donated)
                } else {
                    (&record.received_by_purpose, record.received)
                };
                if all.is_empty() {
                    lines.push(Line::styled("No purpose data available for this country.", dim));
                } else {
                    let shown = self.breakdown();
                    lines.push(Line::from(vec![
                        Span::raw(format!("Total {}: ", side)),
                        Span::styled(money(total), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(format!(
                            " across {} purposes (showing top {})",
                            all.len(),
                            shown.len()
                        )),
                    ]));
                    lines.push(Line::default());
                    lines.extend(bar_lines(shown, inner.width, POINT.into()));
                }
            }
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CountryTotal, CountryTotals, PurposeBreakdown};
    use std::collections::HashMap;

    fn view(entries: &[(&str, f64, f64)]) -> ScatterView {
        let totals = CountryTotals {
            countries: entries
                .iter()
                .map(|&(iso2, donated, received)| CountryTotal {
                    iso2: iso2.into(),
                    donated,
                    received,
                })
                .collect(),
        };
        let mut received = PurposeBreakdown::new();
        received.insert(
            "KE".into(),
            (0..20).map(|i| (format!("Purpose {i}"), i as f64)).collect::<HashMap<_, _>>(),
        );
        let index = CountryIndex::build(&totals, Some(&received), None);
        ScatterView::new(Rc::new(index), false)
    }

    #[test]
    fn test_non_positive_excluded_from_domains() {
        let v = view(&[("US", 50e9, 2e9), ("KE", 0.0, 3e9), ("IN", 2e8, 5e9), ("ZZ", -5.0, 1e12)]);
        assert_eq!(v.points.len(), 2);
        assert_eq!(v.x.unwrap().domain, (1e8, 1e11));
        assert_eq!(v.y.unwrap().domain, (1e9, 1e10));
    }

    #[test]
    fn test_no_plottable_points() {
        let v = view(&[("KE", 0.0, 3e9)]);
        assert!(v.x.is_none() && v.y.is_none());
    }

    #[test]
    fn test_diagonal_clipped_to_intersection() {
        let x = LogScale::from_values([1e6, 1e10]).unwrap();
        let y = LogScale::from_values([1e8, 1e12]).unwrap();
        assert_eq!(diagonal(&x, &y), Some((1e8, 1e10)));

        let disjoint = LogScale::from_values([1e11, 1e12]).unwrap();
        assert_eq!(diagonal(&x, &disjoint), None);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut v = view(&[("US", 50e9, 2e9), ("IN", 2e8, 5e9), ("FR", 1e9, 1e8)]);
        v.cycle(true);
        let first = v.selected().unwrap().iso2.clone();
        v.cycle(true);
        let second = v.selected().unwrap().iso2.clone();
        assert_ne!(first, second);
        // Name order: France, India, United States
        assert_eq!(first, "FR");
        assert_eq!(second, "IN");
        v.cycle(false);
        v.cycle(false);
        assert_eq!(v.selected().unwrap().iso2, "US");
        v.handle_key(KeyCode::Esc);
        assert!(v.selected().is_none());
    }

    #[test]
    fn test_breakdown_capped_at_top_purposes() {
        let mut v = view(&[("KE", 1e6, 3e9)]);
        v.cycle(true);
        let rows = v.breakdown();
        assert_eq!(rows.len(), TOP_PURPOSES);
        assert_eq!(rows[0].0, "Purpose 19");
        v.handle_key(KeyCode::Char('d'));
        assert!(v.breakdown().is_empty());
    }

    #[test]
    fn test_hover_and_click_hit_points() {
        let mut v = view(&[("US", 50e9, 2e9), ("IN", 2e8, 5e9)]);
        v.plot = Rect::new(0, 0, 40, 10);
        let (sx, sy) = v.scales().unwrap();
        let us = v.index.get("US").unwrap();
        let col = (sx.map(us.donated).unwrap() / 2.0) as u16;
        let row = (sy.map(us.received).unwrap() / 4.0) as u16;

        let tip = v.hover(col, row).unwrap();
        assert_eq!(tip.title, "United States");
        assert_eq!(tip.fields[0], ("Donated".to_string(), "50.00 Billion USD".to_string()));

        assert!(v.click(col, row));
        assert_eq!(v.selected().unwrap().iso2, "US");
        assert!(v.hover(0, 0).is_none());
    }
}
