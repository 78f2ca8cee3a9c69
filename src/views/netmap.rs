//! Net-balance choropleth: received minus donated on a diverging scale.

use crate::codes;
use crate::format::{axis_money, money};
use crate::index::{display_name, CountryIndex, CountryRecord, WorldMap};
use crate::map::{ChoroplethWidget, MapPane, HATCH};
use crate::scale::{DivergingScale, Rgb, NO_DATA};
use crate::views::Tooltip;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::rc::Rc;

const HOVER: Color = Color::Yellow;
const NEIGHBOUR: Color = Color::Cyan;
const CONTRAST: Color = Color::Magenta;

pub struct NetMapView {
    index: Rc<CountryIndex>,
    world: Rc<WorldMap>,
    scale: DivergingScale,
    pane: MapPane,
    hovered: Option<usize>,
}

impl NetMapView {
    pub fn new(index: Rc<CountryIndex>, world: Rc<WorldMap>) -> Self {
        Self {
            index,
            world,
            scale: DivergingScale::net_balance(),
            pane: MapPane::new(),
            hovered: None,
        }
    }

    /// Fill for a feature; `None` draws the no-data hatch
    pub fn fill(&self, feature: usize) -> Option<Rgb> {
        net_fill(&self.world, &self.index, &self.scale, feature)
    }

    /// Neighbours of a country split into same-side and opposite-side
    fn neighbours(&self, code: &str) -> (Vec<&'static str>, Vec<&'static str>) {
        let role = self.index.get(code).map(CountryRecord::role);
        codes::neighbors(code).iter().partition(|&&other| {
            let other_role = self.index.get(other).map(CountryRecord::role);
            !matches!((role, other_role), (Some(a), Some(b)) if a.opposes(b))
        })
    }

    pub fn tooltip(&self, feature: usize, anchor: (u16, u16)) -> Tooltip {
        let mut tip = Tooltip::new(self.world.name(feature), anchor);
        let Some(code) = self.world.code(feature) else {
            return tip;
        };
        let Some(record) = self.index.get(code) else {
            return tip.note("No data");
        };

        tip = tip
            .field("Net", money(record.net))
            .field("Received", money(record.received))
            .field("Donated", money(record.donated))
            .field("Role", record.role().label());

        let (_, contrast) = self.neighbours(code);
        if !contrast.is_empty() {
            let names: Vec<String> = contrast
                .iter()
                .map(|&c| display_name(Some(c), None))
                .collect();
            tip = tip.field("Contrast", names.join(", "));
        }
        tip
    }

    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Left => self.pane.pan(-10, 0),
            KeyCode::Right => self.pane.pan(10, 0),
            KeyCode::Up => self.pane.pan(0, -6),
            KeyCode::Down => self.pane.pan(0, 6),
            other => return self.pane.handle_key(other),
        }
        true
    }

    pub fn hover(&mut self, col: u16, row: u16) -> Option<Tooltip> {
        self.hovered = self.pane.feature_at(col, row);
        self.hovered.map(|f| self.tooltip(f, (col, row)))
    }

    pub fn pane_mut(&mut self) -> &mut MapPane {
        &mut self.pane
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Net Aid Balance (received - donated) ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [map_area, legend_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        let world = &*self.world;
        let index = &*self.index;
        let scale = self.scale;
        self.pane
            .layers(map_area, world, |f| net_fill(world, index, &scale, f));

        // Hover highlights: the country, its neighbours, then the opposite-side neighbours
        let mut outlines = Vec::new();
        if let Some(feature) = self.hovered {
            let hovered: Vec<usize> = match world.code(feature) {
                Some(code) => world.features_for(code).to_vec(),
                None => vec![feature],
            };
            if let Some(code) = world.code(feature) {
                let (same, contrast) = self.neighbours(code);
                let same: Vec<usize> = same.iter().flat_map(|c| world.features_for(c)).copied().collect();
                let contrast: Vec<usize> =
                    contrast.iter().flat_map(|c| world.features_for(c)).copied().collect();
                outlines.push((self.pane.outline(world, &same), NEIGHBOUR));
                outlines.push((self.pane.outline(world, &contrast), CONTRAST));
            }
            outlines.push((self.pane.outline(world, &hovered), HOVER));
        }

        if let Some(layers) = self.pane.raster() {
            let widget = ChoroplethWidget {
                layers,
                highlights: outlines.iter().map(|(c, color)| (c, *color)).collect(),
            };
            frame.render_widget(widget, map_area);
        }

        render_legend(frame, legend_area, &self.scale);
    }
}

fn net_fill(world: &WorldMap, index: &CountryIndex, scale: &DivergingScale, feature: usize) -> Option<Rgb> {
    let record = index.get(world.code(feature)?)?;
    Some(scale.color(record.net))
}

/// Gradient bar with the endpoint and zero labels underneath
fn render_legend(frame: &mut Frame, area: Rect, scale: &DivergingScale) {
    if area.height < 2 || area.width < 20 {
        return;
    }
    let bar_width = (area.width / 2).max(20).min(area.width.saturating_sub(12));
    let buf = frame.buffer_mut();

    for i in 0..bar_width {
        let t = i as f64 / (bar_width - 1).max(1) as f64;
        buf[(area.x + i, area.y)].set_char(' ').set_bg(scale.color_at(t).into());
    }
    let no_data_x = area.x + bar_width + 2;
    if no_data_x + 9 < area.x + area.width {
        buf[(no_data_x, area.y)]
            .set_char(HATCH)
            .set_fg(Color::DarkGray)
            .set_bg(NO_DATA.into());
        buf.set_string(no_data_x + 2, area.y, "No data", Style::default().fg(Color::Gray));
    }

    let [lo, zero, hi] = scale.ticks();
    let label_style = Style::default().fg(Color::Gray);
    let hi_label = axis_money(hi);
    let zero_x = area.x + (scale.unit(zero) * (bar_width - 1) as f64).round() as u16;
    buf.set_string(area.x, area.y + 1, axis_money(lo), label_style);
    buf.set_string(zero_x, area.y + 1, axis_money(zero), label_style);
    buf.set_string(
        (area.x + bar_width).saturating_sub(hi_label.len() as u16),
        area.y + 1,
        &hi_label,
        label_style,
    );

    let hint = Line::styled("red: net donor  blue: net recipient", Style::default().fg(Color::DarkGray));
    let hint_area = Rect {
        x: no_data_x,
        y: area.y + 1,
        width: area.width.saturating_sub(bar_width + 2),
        height: 1,
    };
    frame.render_widget(Paragraph::new(hint), hint_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CountryTotal, CountryTotals};
    use crate::geo::GeoFeature;
    use crate::scale::DONOR_RED;

    fn square(id: &str, lon: f64) -> GeoFeature {
        GeoFeature {
            id: Some(id.into()),
            name: None,
            polygons: vec![vec![vec![
                (lon, 10.0),
                (lon + 10.0, 10.0),
                (lon + 10.0, 20.0),
                (lon, 20.0),
                (lon, 10.0),
            ]]],
        }
    }

    fn view() -> NetMapView {
        let totals = CountryTotals {
            countries: vec![
                CountryTotal { iso2: "US".into(), donated: 50e9, received: 2e9 },
                CountryTotal { iso2: "MX".into(), donated: 1e8, received: 9e9 },
                CountryTotal { iso2: "CA".into(), donated: 6e9, received: 1e8 },
            ],
        };
        let index = CountryIndex::build(&totals, None, None);
        let world = WorldMap::new(vec![square("840", -100.0), square("999", 0.0), square("124", -120.0)]);
        NetMapView::new(Rc::new(index), Rc::new(world))
    }

    #[test]
    fn test_unknown_feature_tooltip_has_only_name() {
        let v = view();
        let tip = v.tooltip(1, (0, 0));
        assert_eq!(tip.title, "Unknown");
        assert!(tip.fields.is_empty());
        assert!(tip.note.is_none());
        assert_eq!(v.fill(1), None);
    }

    #[test]
    fn test_us_is_donor_in_red_half() {
        let v = view();
        let tip = v.tooltip(0, (0, 0));
        assert_eq!(tip.title, "United States");
        assert_eq!(tip.fields[0], ("Net".to_string(), "-48.00 Billion USD".to_string()));
        assert!(tip.fields.contains(&("Role".to_string(), "donor".to_string())));

        let fill = v.fill(0).unwrap();
        assert!(fill.0 > fill.2);
        assert_eq!(v.scale.color(-500e9), DONOR_RED);
    }

    #[test]
    fn test_contrast_neighbours_are_opposite_roles() {
        let v = view();
        let (same, contrast) = v.neighbours("US");
        assert_eq!(contrast, vec!["MX"]);
        assert_eq!(same, vec!["CA"]);

        let tip = v.tooltip(0, (0, 0));
        assert_eq!(tip.fields.last().unwrap(), &("Contrast".to_string(), "Mexico".to_string()));
    }

    #[test]
    fn test_country_missing_from_totals_is_no_data() {
        let totals = CountryTotals { countries: vec![] };
        let world = WorldMap::new(vec![square("840", -100.0)]);
        let v = NetMapView::new(Rc::new(CountryIndex::build(&totals, None, None)), Rc::new(world));
        assert_eq!(v.fill(0), None);
        assert_eq!(v.tooltip(0, (0, 0)).note.as_deref(), Some("No data"));
    }

    #[test]
    fn test_zero_donor_is_off_scatter_but_filled() {
        let totals = CountryTotals {
            countries: vec![CountryTotal { iso2: "KE".into(), donated: 0.0, received: 5e9 }],
        };
        let index = CountryIndex::build(&totals, None, None);
        assert!(!index.get("KE").unwrap().plottable());

        let world = WorldMap::new(vec![square("404", 30.0)]);
        let v = NetMapView::new(Rc::new(index), Rc::new(world));
        let fill = v.fill(0).unwrap();
        assert_eq!(fill, v.scale.color(5e9));
        assert!(fill.2 > fill.0);
    }
}
