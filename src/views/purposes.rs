//! One choropleth per aid purpose, with its own colour domain, a top-10
//! recipients panel and a regional roll-up.

use crate::codes::{self, Region};
use crate::data::{TopDonors, TopPurposes};
use crate::format::{axis_money, money, truncate};
use crate::index::{display_name, WorldMap};
use crate::map::{ChoroplethWidget, MapPane, HATCH};
use crate::scale::{Rgb, SequentialScale, NO_DATA};
use crate::views::{bar_lines, contains, Tooltip};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::collections::HashMap;
use std::rc::Rc;

const TOP_RECIPIENTS: usize = 10;
const TOP_DONORS_SHOWN: usize = 3;
const BAR: Color = Color::Rgb(0x21, 0x71, 0xb5);

/// Everything derived from the selected purpose alone
#[derive(Debug, Default)]
struct Facet {
    /// iso2 -> received amount for this purpose
    values: HashMap<String, f64>,
    scale: Option<SequentialScale>,
    top: Vec<(String, f64)>,
    regions: Vec<(String, f64)>,
}

impl Facet {
    fn build(per_country: Option<&HashMap<String, f64>>) -> Self {
        let values: HashMap<String, f64> = per_country
            .map(|m| {
                m.iter()
                    .map(|(iso2, v)| (iso2.trim().to_ascii_uppercase(), *v))
                    .collect()
            })
            .unwrap_or_default();

        let scale = SequentialScale::from_values(values.values().copied());

        let mut ranked: Vec<(&String, f64)> =
            values.iter().filter(|(_, v)| **v > 0.0).map(|(k, v)| (k, *v)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let top = ranked
            .iter()
            .take(TOP_RECIPIENTS)
            .map(|(iso2, v)| (display_name(Some(iso2.as_str()), None), *v))
            .collect();

        let mut by_region: HashMap<Region, f64> = HashMap::new();
        for (iso2, v) in &ranked {
            if let Some(region) = codes::region_of(iso2) {
                *by_region.entry(region).or_default() += v;
            }
        }
        let mut regions: Vec<(String, f64)> = Region::ALL
            .iter()
            .filter_map(|r| by_region.get(r).map(|v| (r.label().to_string(), *v)))
            .collect();
        regions.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self {
            values,
            scale,
            top,
            regions,
        }
    }

    fn fill(&self, code: &str) -> Option<Rgb> {
        let scale = self.scale.as_ref()?;
        scale.color(*self.values.get(code)?)
    }
}

pub struct PurposesView {
    purposes: Vec<String>,
    per_purpose: HashMap<String, HashMap<String, f64>>,
    top_donors: Option<TopDonors>,
    world: Rc<WorldMap>,
    selected: usize,
    facet: Facet,
    pane: MapPane,
    hovered: Option<usize>,
    menu: Rect,
    /// First menu entry shown after the list scrolled
    menu_offset: usize,
}

impl PurposesView {
    pub fn new(top: TopPurposes, top_donors: Option<TopDonors>, world: Rc<WorldMap>) -> Self {
        let mut view = Self {
            purposes: top.purposes,
            per_purpose: top.per_purpose,
            top_donors,
            world,
            selected: 0,
            facet: Facet::default(),
            pane: MapPane::new(),
            hovered: None,
            menu: Rect::default(),
            menu_offset: 0,
        };
        view.select(0);
        view
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purposes.get(self.selected).map(String::as_str)
    }

    /// Switch purpose and recompute the facet from that purpose alone
    pub fn select(&mut self, i: usize) {
        if i >= self.purposes.len() {
            return;
        }
        self.selected = i;
        self.facet = Facet::build(self.per_purpose.get(&self.purposes[i]));
        self.pane.invalidate();
        tracing::debug!(
            "purpose {:?}: {} countries, domain {:?}",
            self.purposes[i],
            self.facet.values.len(),
            self.facet.scale.map(|s| s.domain())
        );
    }

    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let n = self.purposes.len();
        match key {
            KeyCode::Down if n > 0 => self.select((self.selected + 1) % n),
            KeyCode::Up if n > 0 => self.select((self.selected + n - 1) % n),
            other => return self.pane.handle_key(other),
        }
        true
    }

    pub fn tooltip(&self, feature: usize, anchor: (u16, u16)) -> Tooltip {
        let tip = Tooltip::new(self.world.name(feature), anchor);
        let Some(code) = self.world.code(feature) else {
            return tip;
        };
        let Some(&value) = self.facet.values.get(code).filter(|v| **v > 0.0) else {
            return tip.note("No data");
        };

        let mut tip = tip.field("Received", money(value));
        let donors = self
            .top_donors
            .as_ref()
            .and_then(|d| d.get(code))
            .and_then(|by_purpose| by_purpose.get(self.purpose()?));
        if let Some(donors) = donors {
            for (rank, (donor, amount)) in donors.iter().take(TOP_DONORS_SHOWN).enumerate() {
                let label = format!("{}. {}", rank + 1, display_name(Some(donor.as_str()), None));
                tip = tip.field(&label, money(*amount));
            }
        }
        tip
    }

    pub fn hover(&mut self, col: u16, row: u16) -> Option<Tooltip> {
        self.hovered = self.pane.feature_at(col, row);
        self.hovered.map(|f| self.tooltip(f, (col, row)))
    }

    /// Clicking a menu entry selects that purpose
    pub fn click(&mut self, col: u16, row: u16) -> Option<Tooltip> {
        if contains(self.menu, col, row) {
            self.select(self.menu_offset + (row - self.menu.y) as usize);
            return None;
        }
        self.hover(col, row)
    }

    pub fn pane_mut(&mut self) -> &mut MapPane {
        &mut self.pane
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let menu_width = self
            .purposes
            .iter()
            .map(|p| p.chars().count() as u16 + 4)
            .max()
            .unwrap_or(12)
            .clamp(12, 32);
        let [menu_area, right] =
            Layout::horizontal([Constraint::Length(menu_width), Constraint::Min(20)]).areas(area);
        let [map_block, panels] =
            Layout::vertical([Constraint::Min(8), Constraint::Length(TOP_RECIPIENTS as u16 + 2)]).areas(right);
        let [top_area, region_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(panels);

        self.render_menu(frame, menu_area);
        self.render_map(frame, map_block);

        let empty = "No countries received aid for this purpose.";
        render_bars(frame, top_area, " Top 10 Recipients ", &self.facet.top, empty);
        render_bars(frame, region_area, " By Region ", &self.facet.regions, empty);
    }

    fn render_menu(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(" Purpose ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
        self.menu = block.inner(area);

        let width = self.menu.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .purposes
            .iter()
            .map(|p| ListItem::new(truncate(p, width)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
        self.menu_offset = state.offset();
    }

    fn render_map(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" {} ", self.purpose().unwrap_or("No purposes"));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [map_area, legend_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let world = &*self.world;
        let facet = &self.facet;
        self.pane
            .layers(map_area, world, |f| world.code(f).and_then(|code| facet.fill(code)));

        let hovered = self.hovered.map(|f| match world.code(f) {
            Some(code) => world.features_for(code).to_vec(),
            None => vec![f],
        });
        let outline = hovered.map(|features| self.pane.outline(world, &features));

        if let Some(layers) = self.pane.raster() {
            let widget = ChoroplethWidget {
                layers,
                highlights: outline.iter().map(|c| (c, Color::Yellow)).collect(),
            };
            frame.render_widget(widget, map_area);
        }

        self.render_legend(frame, legend_area);
    }

    fn render_legend(&self, frame: &mut Frame, area: Rect) {
        let label_style = Style::default().fg(Color::Gray);
        let Some(scale) = self.facet.scale else {
            let line = Line::styled("No positive values for this purpose", Style::default().fg(Color::DarkGray));
            frame.render_widget(Paragraph::new(line), area);
            return;
        };

        let mut spans = Vec::new();
        for (value, color) in scale.legend(5) {
            spans.push(Span::styled("  ", Style::default().bg(color.into())));
            spans.push(Span::styled(format!(" {} ", axis_money(value)), label_style));
        }
        spans.push(Span::styled(
            HATCH.to_string(),
            Style::default().fg(Color::DarkGray).bg(NO_DATA.into()),
        ));
        spans.push(Span::styled(" No data", label_style));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_bars(frame: &mut Frame, area: Rect, title: &str, rows: &[(String, f64)], empty: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = if rows.is_empty() {
        vec![Line::styled(empty.to_string(), Style::default().fg(Color::DarkGray))]
    } else {
        bar_lines(rows, inner.width, BAR)
    };
    frame.render_widget(Paragraph::new(lines), inner);
}
