//! Stacked area of purpose amounts per year, absolute or normalized.

use crate::data::TemporalSeries;
use crate::format::{axis_money, money, truncate};
use crate::scale::{LinearScale, Rgb};
use crate::views::{cell_pixel, Tooltip};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::{BTreeSet, HashMap};

/// Frames a mode switch takes to settle (~0.5s at 60fps)
pub const TRANSITION_FRAMES: u32 = 30;

const Y_AXIS_WIDTH: u16 = 7;

const PALETTE: [Rgb; 10] = [
    Rgb(0x4e, 0x79, 0xa7),
    Rgb(0xf2, 0x8e, 0x2c),
    Rgb(0xe1, 0x57, 0x59),
    Rgb(0x76, 0xb7, 0xb2),
    Rgb(0x59, 0xa1, 0x4f),
    Rgb(0xed, 0xc9, 0x49),
    Rgb(0xaf, 0x7a, 0xa1),
    Rgb(0xff, 0x9d, 0xa7),
    Rgb(0x9c, 0x75, 0x5f),
    Rgb(0xba, 0xb0, 0xab),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackMode {
    #[default]
    Absolute,
    Normalized,
}

impl StackMode {
    pub fn toggle(self) -> Self {
        match self {
            StackMode::Absolute => StackMode::Normalized,
            StackMode::Normalized => StackMode::Absolute,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StackMode::Absolute => "absolute",
            StackMode::Normalized => "normalized",
        }
    }
}

/// Year x purpose table. Layers are ordered bottom to top.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    pub years: Vec<i32>,
    pub purposes: Vec<String>,
    /// values[layer][year]
    pub values: Vec<Vec<f64>>,
}

impl Stack {
    /// Pivot long rows into the wide table, largest purpose first
    pub fn pivot(series: &TemporalSeries) -> Self {
        let years: Vec<i32> = if series.years.is_empty() {
            series.data.iter().map(|p| p.year).collect::<BTreeSet<_>>().into_iter().collect()
        } else {
            let mut years = series.years.clone();
            years.sort_unstable();
            years.dedup();
            years
        };

        let mut purposes = series.purposes.clone();
        for point in &series.data {
            if !purposes.contains(&point.purpose) {
                purposes.push(point.purpose.clone());
            }
        }

        let year_pos: HashMap<i32, usize> = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
        let purpose_pos: HashMap<&str, usize> =
            purposes.iter().enumerate().map(|(i, p)| (p.as_str(), i)).collect();

        let mut values = vec![vec![0.0; years.len()]; purposes.len()];
        for point in &series.data {
            let (Some(&y), Some(&p)) = (year_pos.get(&point.year), purpose_pos.get(point.purpose.as_str())) else {
                tracing::debug!("temporal row outside the year list: {}", point.year);
                continue;
            };
            if point.amount.is_finite() {
                values[p][y] += point.amount.max(0.0);
            }
        }

        let mut order: Vec<usize> = (0..purposes.len()).collect();
        let totals: Vec<f64> = values.iter().map(|row| row.iter().sum()).collect();
        order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]).then_with(|| purposes[a].cmp(&purposes[b])));

        Self {
            years,
            purposes: order.iter().map(|&i| purposes[i].clone()).collect(),
            values: order.iter().map(|&i| values[i].clone()).collect(),
        }
    }

    pub fn year_total(&self, year: usize) -> f64 {
        self.values.iter().map(|row| row[year]).sum()
    }

    /// (lower, upper) per layer and year. Normalized years with a zero
    /// total stay at zero.
    pub fn bounds(&self, mode: StackMode) -> Vec<Vec<(f64, f64)>> {
        let totals: Vec<f64> = (0..self.years.len()).map(|y| self.year_total(y)).collect();
        let mut base = vec![0.0; self.years.len()];
        self.values
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(y, &v)| {
                        let v = match mode {
                            StackMode::Absolute => v,
                            StackMode::Normalized if totals[y] > 0.0 => v / totals[y],
                            StackMode::Normalized => 0.0,
                        };
                        let lower = base[y];
                        base[y] += v;
                        (lower, base[y])
                    })
                    .collect()
            })
            .collect()
    }
}

fn y_max(bounds: &[Vec<(f64, f64)>]) -> f64 {
    bounds.last().map_or(0.0, |top| top.iter().map(|b| b.1).fold(0.0, f64::max))
}

struct Transition {
    from: Vec<Vec<(f64, f64)>>,
    from_max: f64,
    frame: u32,
}

pub struct TemporalView {
    stack: Stack,
    mode: StackMode,
    target: Vec<Vec<(f64, f64)>>,
    target_max: f64,
    transition: Option<Transition>,
    plot: Rect,
}

impl TemporalView {
    pub fn new(series: &TemporalSeries) -> Self {
        let stack = Stack::pivot(series);
        let target = stack.bounds(StackMode::Absolute);
        let target_max = y_max(&target);
        tracing::debug!("temporal: {} years, {} purposes", stack.years.len(), stack.purposes.len());
        Self {
            stack,
            mode: StackMode::Absolute,
            target,
            target_max,
            transition: None,
            plot: Rect::default(),
        }
    }

    pub fn mode(&self) -> StackMode {
        self.mode
    }

    /// Switch stacking, animating from whatever is on screen now
    pub fn toggle_mode(&mut self) {
        let (from, from_max) = self.current();
        self.mode = self.mode.toggle();
        self.target = self.stack.bounds(self.mode);
        self.target_max = y_max(&self.target);
        self.transition = Some(Transition {
            from,
            from_max,
            frame: 0,
        });
    }

    /// Advance the animation; true while it is still running
    pub fn tick(&mut self) -> bool {
        let Some(t) = self.transition.as_mut() else {
            return false;
        };
        t.frame += 1;
        if t.frame >= TRANSITION_FRAMES {
            self.transition = None;
            return false;
        }
        true
    }

    /// Bounds and y maximum as drawn this frame
    pub fn current(&self) -> (Vec<Vec<(f64, f64)>>, f64) {
        let Some(t) = &self.transition else {
            return (self.target.clone(), self.target_max);
        };
        let x = t.frame as f64 / TRANSITION_FRAMES as f64;
        // Ease in-out
        let k = x * x * (3.0 - 2.0 * x);
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        let bounds = t
            .from
            .iter()
            .zip(&self.target)
            .map(|(from, to)| {
                from.iter()
                    .zip(to)
                    .map(|(a, b)| (lerp(a.0, b.0), lerp(a.1, b.1)))
                    .collect()
            })
            .collect();
        (bounds, lerp(t.from_max, self.target_max))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('m') => self.toggle_mode(),
            _ => return false,
        }
        true
    }

    fn y_scale(&self, y_max: f64) -> LinearScale {
        let h = (self.plot.height as f64 * 4.0 - 1.0).max(1.0);
        LinearScale::new((0.0, y_max), (h, 0.0))
    }

    /// Fractional year index under a braille x pixel
    fn year_at(&self, px: f64) -> f64 {
        let n = self.stack.years.len();
        let w = (self.plot.width as f64 * 2.0 - 1.0).max(1.0);
        (px / w * (n.saturating_sub(1)) as f64).clamp(0.0, n.saturating_sub(1) as f64)
    }

    /// Layer whose band holds `value` in one year
    fn layer_at(bounds: &[Vec<(f64, f64)>], year: usize, value: f64) -> Option<usize> {
        bounds.iter().position(|layer| {
            layer
                .get(year)
                .is_some_and(|&(lower, upper)| upper > lower && value >= lower && value < upper)
        })
    }

    pub fn hover(&mut self, col: u16, row: u16) -> Option<Tooltip> {
        let (px, py) = cell_pixel(self.plot, col, row)?;
        let (bounds, max) = self.current();
        if max <= 0.0 {
            return None;
        }
        // Snap to the nearest year so the band and the reported year agree
        let y = self.year_at(px).round() as usize;
        let layer = Self::layer_at(&bounds, y, self.y_scale(max).invert(py))?;
        let amount = self.stack.values[layer][y];
        let total = self.stack.year_total(y);
        let share = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
        Some(
            Tooltip::new(self.stack.purposes[layer].clone(), (col, row))
                .field("Year", self.stack.years[y].to_string())
                .field("Amount", money(amount))
                .field("Share", format!("{:.1}%", share)),
        )
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" Aid by Purpose over Time ({}) ", self.mode.label());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let legend_width = self
            .stack
            .purposes
            .iter()
            .map(|p| p.chars().count() as u16 + 3)
            .max()
            .unwrap_or(0)
            .min(32);
        let [chart, legend] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(legend_width)]).areas(inner);

        self.plot = Rect {
            x: chart.x + Y_AXIS_WIDTH.min(chart.width),
            y: chart.y,
            width: chart.width.saturating_sub(Y_AXIS_WIDTH),
            height: chart.height.saturating_sub(1),
        };

        let (bounds, max) = self.current();
        if self.stack.years.is_empty() || max <= 0.0 || self.plot.is_empty() {
            frame.render_widget(
                Paragraph::new("No temporal data to stack.").style(Style::default().fg(Color::DarkGray)),
                chart,
            );
            return;
        }

        let plot = self.plot;
        let scale = self.y_scale(max);
        let buf = frame.buffer_mut();
        for row in 0..plot.height {
            let value = scale.invert(row as f64 * 4.0 + 2.0);
            for col in 0..plot.width {
                let year = self.year_at(col as f64 * 2.0 + 1.0).round() as usize;
                if let Some(layer) = Self::layer_at(&bounds, year, value) {
                    let color = PALETTE[layer % PALETTE.len()];
                    buf[(plot.x + col, plot.y + row)].set_char(' ').set_bg(color.into());
                }
            }
        }

        let label_style = Style::default().fg(Color::Gray);
        let axis = LinearScale::new((0.0, max), (0.0, 1.0));
        for tick in axis.ticks(4) {
            let row = plot.y + (scale.map(tick) / 4.0) as u16;
            if row >= plot.y + plot.height {
                continue;
            }
            let text = match self.mode {
                StackMode::Normalized => format!("{:.0}%", tick * 100.0),
                StackMode::Absolute => axis_money(tick),
            };
            let text = format!("{:>w$}", text, w = Y_AXIS_WIDTH as usize - 1);
            buf.set_string(chart.x, row, text, label_style);
        }

        // Year labels, skipping any that would overlap
        let axis_row = plot.y + plot.height;
        let n = self.stack.years.len();
        let mut next_free = plot.x;
        for (i, year) in self.stack.years.iter().enumerate() {
            let px = if n > 1 {
                i as f64 / (n - 1) as f64 * (plot.width as f64 * 2.0 - 1.0)
            } else {
                0.0
            };
            let text = year.to_string();
            let col = (plot.x + (px / 2.0) as u16).saturating_sub(text.len() as u16 / 2);
            if col >= next_free && col + text.len() as u16 <= chart.x + chart.width {
                buf.set_string(col, axis_row, &text, label_style);
                next_free = col + text.len() as u16 + 1;
            }
        }

        // Legend lists the top layer first, matching the stack
        let width = legend.width.saturating_sub(3) as usize;
        let lines: Vec<Line> = self
            .stack
            .purposes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, p)| {
                Line::from(vec![
                    Span::styled("██", Style::default().fg(PALETTE[i % PALETTE.len()].into())),
                    Span::styled(format!(" {}", truncate(p, width)), label_style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), legend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TemporalPoint;

    fn series() -> TemporalSeries {
        let rows = [
            (2000, "Health", 10.0),
            (2000, "Energy", 30.0),
            (2001, "Health", 5.0),
            (2001, "Energy", 5.0),
            (2001, "Water", 90.0),
        ];
        TemporalSeries {
            years: vec![2000, 2001, 2002],
            purposes: vec!["Health".into(), "Energy".into(), "Water".into()],
            data: rows
                .iter()
                .map(|&(year, purpose, amount)| TemporalPoint {
                    year,
                    purpose: purpose.into(),
                    amount,
                })
                .collect(),
        }
    }

    #[test]
    fn test_largest_purpose_at_bottom() {
        let stack = Stack::pivot(&series());
        assert_eq!(stack.purposes, vec!["Water", "Energy", "Health"]);
        assert_eq!(stack.values[1], vec![30.0, 5.0, 0.0]);
    }

    #[test]
    fn test_normalized_years_sum_to_one() {
        let stack = Stack::pivot(&series());
        let bounds = stack.bounds(StackMode::Normalized);
        let top = bounds.last().unwrap();
        assert!((top[0].1 - 1.0).abs() < 1e-9);
        assert!((top[1].1 - 1.0).abs() < 1e-9);
        // 2002 has no data and stays at zero
        assert_eq!(top[2], (0.0, 0.0));
        assert!((y_max(&bounds) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_bounds_stack() {
        let stack = Stack::pivot(&series());
        let bounds = stack.bounds(StackMode::Absolute);
        assert_eq!(bounds[0][1], (0.0, 90.0));
        assert_eq!(bounds[1][1], (90.0, 95.0));
        assert_eq!(bounds[2][1], (95.0, 100.0));
        assert_eq!(y_max(&bounds), 100.0);
    }

    #[test]
    fn test_mode_switch_animates_then_settles() {
        let mut view = TemporalView::new(&series());
        assert_eq!(view.current().1, 100.0);

        view.handle_key(KeyCode::Char('m'));
        assert_eq!(view.mode(), StackMode::Normalized);
        assert_eq!(view.current().1, 100.0);

        for _ in 0..TRANSITION_FRAMES / 2 {
            assert!(view.tick());
        }
        let mid = view.current().1;
        assert!(mid < 100.0 && mid > 1.0);

        while view.tick() {}
        assert!((view.current().1 - 1.0).abs() < 1e-9);
        assert!(!view.tick());
    }

    #[test]
    fn test_hover_uses_nearest_year_band() {
        let mut view = TemporalView::new(&series());
        view.plot = Rect::new(0, 0, 21, 10);

        // Just past midway to 2001, high enough to clear 2000's whole stack
        let tip = view.hover(5, 1).unwrap();
        assert_eq!(tip.title, "Water");
        assert_eq!(tip.fields[0], ("Year".to_string(), "2001".to_string()));
        assert_eq!(tip.fields[2], ("Share".to_string(), "90.0%".to_string()));

        // Near the 2000 column the same height is above every band
        assert!(view.hover(0, 1).is_none());
    }
}
