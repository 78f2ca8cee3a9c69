//! Chord diagram of donor -> recipient flows between the largest countries.

use crate::braille::{paint_layer, BrailleCanvas};
use crate::data::ChordFlows;
use crate::format::money;
use crate::index::{display_name, Role};
use crate::map::draw_line;
use crate::scale::{Rgb, DONOR_RED, RECIPIENT_BLUE};
use crate::views::{cell_pixel, Tooltip};
use crossterm::event::KeyCode;
use glam::DVec2;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::f64::consts::TAU;

/// Gap between neighbouring arcs, radians
const PAD_ANGLE: f64 = 0.02;
const ARC_WIDTH: f64 = 3.0;
const MIXED: Rgb = Rgb(0x9c, 0xa3, 0xaf);

const THRESHOLD_MIN: u32 = 1;
const THRESHOLD_MAX: u32 = 50;
const THRESHOLD_DEFAULT: u32 = 5;

/// One country's arc. Angles run clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub start: f64,
    pub end: f64,
    /// Outflow plus inflow, self-flows excluded
    pub value: f64,
    /// Boundary between the outgoing and the incoming sub-arc
    pub split: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    /// Slice of the source's outgoing sub-arc
    pub source_span: (f64, f64),
    /// Slice of the target's incoming sub-arc
    pub target_span: (f64, f64),
}

#[derive(Debug, Clone, Default)]
pub struct ChordLayout {
    pub groups: Vec<Group>,
    pub ribbons: Vec<Ribbon>,
    pub max_flow: f64,
}

impl ChordLayout {
    pub fn new(matrix: &[Vec<f64>]) -> Self {
        let n = matrix.len();
        let flow = |i: usize, j: usize| -> f64 {
            if i == j {
                return 0.0;
            }
            matrix[i].get(j).copied().filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
        };

        let values: Vec<f64> = (0..n)
            .map(|i| (0..n).map(|j| flow(i, j) + flow(j, i)).sum())
            .collect();
        let total: f64 = values.iter().sum();
        if n == 0 || total <= 0.0 {
            return Self::default();
        }
        let pad = PAD_ANGLE.min(TAU / n as f64 / 4.0);
        let k = (TAU - pad * n as f64) / total;

        let mut groups = Vec::with_capacity(n);
        let mut out_span = vec![vec![(0.0, 0.0); n]; n];
        let mut in_span = vec![vec![(0.0, 0.0); n]; n];
        let mut angle = 0.0;
        for i in 0..n {
            let start = angle;
            for j in 0..n {
                let a = angle;
                angle += flow(i, j) * k;
                out_span[i][j] = (a, angle);
            }
            let split = angle;
            for s in 0..n {
                let a = angle;
                angle += flow(s, i) * k;
                in_span[i][s] = (a, angle);
            }
            groups.push(Group {
                start,
                end: angle,
                value: values[i],
                split,
            });
            angle += pad;
        }

        let mut ribbons = Vec::new();
        let mut max_flow: f64 = 0.0;
        for i in 0..n {
            for j in 0..n {
                let value = flow(i, j);
                if value > 0.0 {
                    max_flow = max_flow.max(value);
                    ribbons.push(Ribbon {
                        source: i,
                        target: j,
                        value,
                        source_span: out_span[i][j],
                        target_span: in_span[j][i],
                    });
                }
            }
        }

        Self {
            groups,
            ribbons,
            max_flow,
        }
    }

    /// Group whose arc covers `angle`
    pub fn group_at(&self, angle: f64) -> Option<usize> {
        let angle = angle.rem_euclid(TAU);
        self.groups
            .iter()
            .position(|g| g.end > g.start && angle >= g.start && angle < g.end)
    }
}

/// Unit vector for an angle measured clockwise from the top
fn direction(angle: f64) -> DVec2 {
    DVec2::new(angle.sin(), -angle.cos())
}

pub struct ChordView {
    codes: Vec<String>,
    names: Vec<String>,
    roles: Vec<Role>,
    /// (donated, received) per country
    totals: Vec<(f64, f64)>,
    layout: ChordLayout,
    highlighted: Option<usize>,
    filter: bool,
    threshold_pct: u32,
    plot: Rect,
}

impl ChordView {
    pub fn new(flows: ChordFlows) -> Self {
        let layout = ChordLayout::new(&flows.matrix);
        let n = flows.countries.len();

        let mut names = Vec::with_capacity(n);
        let mut roles = Vec::with_capacity(n);
        let mut totals = Vec::with_capacity(n);
        for (i, code) in flows.countries.iter().enumerate() {
            names.push(display_name(Some(code.as_str()), flows.names.get(code).map(String::as_str)));

            let (donated, received) = match flows.totals.get(code) {
                Some(t) => (t.donated, t.received),
                None => (
                    (0..n).filter(|&j| j != i).map(|j| flows.matrix[i][j]).sum(),
                    (0..n).filter(|&s| s != i).map(|s| flows.matrix[s][i]).sum(),
                ),
            };
            totals.push((donated, received));
            roles.push(
                flows
                    .roles
                    .get(code)
                    .copied()
                    .unwrap_or_else(|| Role::from_ratio(donated, received)),
            );
        }
        tracing::debug!(
            "chord: {} countries, {} ribbons",
            n,
            layout.ribbons.len()
        );

        Self {
            codes: flows.countries,
            names,
            roles,
            totals,
            layout,
            highlighted: None,
            filter: false,
            threshold_pct: THRESHOLD_DEFAULT,
            plot: Rect::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold_pct as f64 / 100.0
    }

    /// Ribbons left after the small-flow filter
    pub fn visible(&self) -> impl Iterator<Item = &Ribbon> {
        let cutoff = if self.filter {
            self.threshold() * self.layout.max_flow
        } else {
            0.0
        };
        self.layout.ribbons.iter().filter(move |r| r.value >= cutoff)
    }

    fn cycle(&mut self, forward: bool) {
        let n = self.codes.len();
        if n == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(g) if forward => (g + 1) % n,
            Some(g) => (g + n - 1) % n,
            None if forward => 0,
            None => n - 1,
        });
    }

    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Right | KeyCode::Char('l') => self.cycle(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle(false),
            KeyCode::Esc => self.highlighted = None,
            KeyCode::Char('f') => self.filter = !self.filter,
            KeyCode::Char(']') => {
                self.threshold_pct = (self.threshold_pct + 1).min(THRESHOLD_MAX);
            }
            KeyCode::Char('[') => {
                self.threshold_pct = self.threshold_pct.saturating_sub(1).max(THRESHOLD_MIN);
            }
            _ => return false,
        }
        true
    }

    fn geometry(&self) -> (DVec2, f64) {
        let w = self.plot.width as f64 * 2.0;
        let h = self.plot.height as f64 * 4.0;
        let center = DVec2::new(w / 2.0, h / 2.0);
        // Leave room for the code labels outside the ring
        let radius = (w.min(h) / 2.0 - 8.0).max(4.0);
        (center, radius)
    }

    fn group_at(&self, col: u16, row: u16) -> Option<usize> {
        let (px, py) = cell_pixel(self.plot, col, row)?;
        let (center, radius) = self.geometry();
        let d = DVec2::new(px, py) - center;
        let dist = d.length();
        if dist < radius - ARC_WIDTH - 2.0 || dist > radius + 8.0 {
            return None;
        }
        self.layout.group_at(d.x.atan2(-d.y))
    }

    pub fn tooltip(&self, group: usize, anchor: (u16, u16)) -> Tooltip {
        let (donated, received) = self.totals[group];
        let flows_out = self.layout.ribbons.iter().filter(|r| r.source == group).count();
        let flows_in = self.layout.ribbons.iter().filter(|r| r.target == group).count();
        Tooltip::new(self.names[group].clone(), anchor)
            .field("Role", self.roles[group].label())
            .field("Donated", money(donated))
            .field("Received", money(received))
            .field("Flows", format!("{} out, {} in", flows_out, flows_in))
    }

    /// Pointer highlight; leaving the ring drops it
    pub fn hover(&mut self, col: u16, row: u16) -> Option<Tooltip> {
        self.highlighted = self.group_at(col, row);
        self.highlighted.map(|group| self.tooltip(group, (col, row)))
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Aid Flows Between Top Donors and Recipients ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [plot, legend] = Layout::vertical([Constraint::Min(4), Constraint::Length(1)]).areas(inner);
        self.plot = plot;
        self.render_legend(frame, legend);

        if self.layout.groups.is_empty() {
            frame.render_widget(
                Paragraph::new("No flows between the listed countries.").style(Style::default().fg(Color::DarkGray)),
                plot,
            );
            return;
        }

        let (cols, rows) = (plot.width as usize, plot.height as usize);
        let (center, radius) = self.geometry();

        let mut dim = BrailleCanvas::new(cols, rows);
        let mut normal = BrailleCanvas::new(cols, rows);
        let mut lit = BrailleCanvas::new(cols, rows);
        for ribbon in self.visible() {
            let canvas = match self.highlighted {
                Some(g) if ribbon.source == g || ribbon.target == g => &mut lit,
                Some(_) => &mut dim,
                None => &mut normal,
            };
            draw_ribbon(canvas, ribbon, center, radius - ARC_WIDTH - 1.0);
        }

        let mut arcs = [
            BrailleCanvas::new(cols, rows),
            BrailleCanvas::new(cols, rows),
            BrailleCanvas::new(cols, rows),
        ];
        for (i, group) in self.layout.groups.iter().enumerate() {
            let slot = match self.roles[i] {
                Role::Donor => 0,
                Role::Recipient => 1,
                Role::Mixed => 2,
            };
            draw_arc(&mut arcs[slot], center, radius, group.start, group.end);
        }

        let buf = frame.buffer_mut();
        paint_layer(&dim, Color::DarkGray, plot, buf);
        paint_layer(&normal, Color::Gray, plot, buf);
        paint_layer(&lit, Color::Yellow, plot, buf);
        paint_layer(&arcs[0], DONOR_RED.into(), plot, buf);
        paint_layer(&arcs[1], RECIPIENT_BLUE.into(), plot, buf);
        paint_layer(&arcs[2], MIXED.into(), plot, buf);

        // Country codes just outside the ring
        for (i, group) in self.layout.groups.iter().enumerate() {
            let p = center + direction((group.start + group.end) / 2.0) * (radius + 4.0);
            let col = (p.x / 2.0).round() as i32 - 1;
            let row = (p.y / 4.0).round() as i32;
            if col < 0 || row < 0 || col as u16 + 2 > plot.width || row as u16 >= plot.height {
                continue;
            }
            let style = if Some(i) == self.highlighted {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            buf.set_string(plot.x + col as u16, plot.y + row as u16, &self.codes[i], style);
        }
    }

    fn render_legend(&self, frame: &mut Frame, area: Rect) {
        let filter = if self.filter {
            format!("filter: flows ≥ {}% of largest", self.threshold_pct)
        } else {
            "filter: off".to_string()
        };
        let line = Line::from(vec![
            Span::styled("■", Style::default().fg(DONOR_RED.into())),
            Span::raw(" donor  "),
            Span::styled("■", Style::default().fg(RECIPIENT_BLUE.into())),
            Span::raw(" recipient  "),
            Span::styled("■", Style::default().fg(MIXED.into())),
            Span::raw(" mixed  "),
            Span::styled(filter, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn draw_arc(canvas: &mut BrailleCanvas, center: DVec2, radius: f64, start: f64, end: f64) {
    let steps = ((end - start) * radius * 1.5).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let a = start + (end - start) * s as f64 / steps as f64;
        let dir = direction(a);
        let mut r = radius - ARC_WIDTH;
        while r <= radius {
            let p = center + dir * r;
            canvas.set_pixel_signed(p.x.round() as i32, p.y.round() as i32);
            r += 1.0;
        }
    }
}

/// Quadratic curve through the centre from the middle of the source slice
/// to the middle of the target slice
fn draw_ribbon(canvas: &mut BrailleCanvas, ribbon: &Ribbon, center: DVec2, radius: f64) {
    let mid = |(a, b): (f64, f64)| center + direction((a + b) / 2.0) * radius;
    let (p0, p2) = (mid(ribbon.source_span), mid(ribbon.target_span));
    let steps = ((p0 - center).length() + (p2 - center).length()).ceil().max(2.0) as usize / 2;

    let mut prev = p0;
    for s in 1..=steps {
        let t = s as f64 / steps as f64;
        let u = 1.0 - t;
        let p = p0 * (u * u) + center * (2.0 * u * t) + p2 * (t * t);
        draw_line(
            canvas,
            prev.x.round() as i32,
            prev.y.round() as i32,
            p.x.round() as i32,
            p.y.round() as i32,
        );
        prev = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FlowTotals;
    use std::collections::HashMap;

    fn flows(countries: &[&str], matrix: Vec<Vec<f64>>) -> ChordFlows {
        ChordFlows {
            countries: countries.iter().map(|c| c.to_string()).collect(),
            names: HashMap::new(),
            roles: HashMap::new(),
            matrix,
            totals: HashMap::new(),
        }
    }

    #[test]
    fn test_group_value_ignores_diagonal() {
        let layout = ChordLayout::new(&[vec![99.0, 10.0, 0.0], vec![0.0, 5.0, 0.0], vec![4.0, 6.0, 0.0]]);
        let values: Vec<f64> = layout.groups.iter().map(|g| g.value).collect();
        assert_eq!(values, vec![14.0, 16.0, 10.0]);
        assert_eq!(layout.ribbons.len(), 3);
        assert_eq!(layout.max_flow, 10.0);
    }

    #[test]
    fn test_arcs_split_outgoing_then_incoming() {
        let layout = ChordLayout::new(&[vec![0.0, 30.0], vec![10.0, 0.0]]);
        let a = &layout.groups[0];
        let out = a.split - a.start;
        let inn = a.end - a.split;
        assert!((out / inn - 3.0).abs() < 1e-9);

        let ribbon = layout.ribbons.iter().find(|r| r.source == 0).unwrap();
        assert_eq!(ribbon.source_span.0, a.start);
        let b = &layout.groups[1];
        assert_eq!(ribbon.target_span.1, b.end);

        // Arcs and pads fill the circle
        assert!((b.end + PAD_ANGLE - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_empty_matrix_has_no_groups() {
        assert!(ChordLayout::new(&[]).groups.is_empty());
        assert!(ChordLayout::new(&[vec![0.0, 0.0], vec![0.0, 0.0]]).groups.is_empty());
    }

    #[test]
    fn test_group_at_angle() {
        let layout = ChordLayout::new(&[vec![0.0, 10.0], vec![10.0, 0.0]]);
        assert_eq!(layout.group_at(0.1), Some(0));
        assert_eq!(layout.group_at(TAU - 0.1), Some(1));
        assert_eq!(layout.group_at(-0.1), Some(1));
    }

    #[test]
    fn test_roles_from_document_or_ratio() {
        let mut doc = flows(&["US", "KE", "FR"], vec![
            vec![0.0, 8.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0],
        ]);
        doc.roles.insert("FR".into(), Role::Mixed);
        doc.totals.insert("US".into(), FlowTotals { donated: 20.0, received: 10.0 });
        let view = ChordView::new(doc);
        // Exactly 2x is a donor
        assert_eq!(view.roles[0], Role::Donor);
        assert_eq!(view.roles[1], Role::Recipient);
        assert_eq!(view.roles[2], Role::Mixed);
        assert_eq!(view.names[1], "Kenya");
    }

    #[test]
    fn test_threshold_filter() {
        let mut view = ChordView::new(flows(&["US", "KE", "IN"], vec![
            vec![0.0, 100.0, 4.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 6.0, 0.0],
        ]));
        assert_eq!(view.visible().count(), 3);
        view.handle_key(KeyCode::Char('f'));
        assert_eq!(view.visible().count(), 2);
        view.handle_key(KeyCode::Char('['));
        assert_eq!(view.threshold_pct, 4);
        assert_eq!(view.visible().count(), 3);

        for _ in 0..100 {
            view.handle_key(KeyCode::Char(']'));
        }
        assert_eq!(view.threshold_pct, THRESHOLD_MAX);
        for _ in 0..100 {
            view.handle_key(KeyCode::Char('['));
        }
        assert_eq!(view.threshold_pct, THRESHOLD_MIN);
    }

    #[test]
    fn test_arrow_keys_cycle_highlight() {
        let mut view = ChordView::new(flows(&["US", "KE"], vec![vec![0.0, 1.0], vec![0.0, 0.0]]));
        view.handle_key(KeyCode::Left);
        assert_eq!(view.highlighted, Some(1));
        view.handle_key(KeyCode::Right);
        assert_eq!(view.highlighted, Some(0));
        view.handle_key(KeyCode::Esc);
        assert_eq!(view.highlighted, None);
    }

    #[test]
    fn test_hover_highlight_clears_off_ring() {
        let mut view = ChordView::new(flows(&["US", "KE"], vec![vec![0.0, 10.0], vec![10.0, 0.0]]));
        view.plot = Rect::new(0, 0, 40, 20);

        let tooltip = view.hover(20, 1).unwrap();
        assert_eq!(tooltip.title, "United States");
        assert_eq!(view.highlighted, Some(0));
        assert!(view.hover(3, 10).is_some());
        assert_eq!(view.highlighted, Some(1));

        // Centre of the ring
        assert!(view.hover(20, 10).is_none());
        assert_eq!(view.highlighted, None);
    }
}
