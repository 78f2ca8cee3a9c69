use crate::data::Datasets;
use crate::error::AtlasError;
use crate::index::{CountryIndex, WorldMap};
use crate::map::MapPane;
use crate::views::chord::ChordView;
use crate::views::netmap::NetMapView;
use crate::views::purposes::PurposesView;
use crate::views::scatter::ScatterView;
use crate::views::temporal::TemporalView;
use crate::views::{Pane, Tooltip, ViewKind, GEOMETRY_UNAVAILABLE};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use std::rc::Rc;

/// Message for a pane whose dataset failed to load
fn failure(dataset: &str, err: &AtlasError) -> String {
    tracing::warn!("{} unavailable: {}", dataset, err);
    format!("Failed to load processed JSON ({}): {}", dataset, err)
}

/// Application state
pub struct App {
    pub active: ViewKind,
    pub scatter: Pane<ScatterView>,
    pub netmap: Pane<NetMapView>,
    pub purposes: Pane<PurposesView>,
    pub chord: Pane<ChordView>,
    pub temporal: Pane<TemporalView>,
    /// Shared popup; replaced by whichever view handles the pointer
    pub tooltip: Option<Tooltip>,
    pub should_quit: bool,
    pub frame: u64,
}

impl App {
    /// Build every view whose requirements loaded; the others keep the reason
    pub fn new(data: Datasets) -> Self {
        let world = match data.geometry.map(WorldMap::new) {
            Ok(world) if world.is_empty() => {
                tracing::error!("geometry source had no features");
                Err(GEOMETRY_UNAVAILABLE.to_string())
            }
            Ok(world) => {
                tracing::info!("geometry: {} features", world.len());
                Ok(Rc::new(world))
            }
            Err(err) => {
                tracing::error!("geometry unavailable: {}", err);
                Err(GEOMETRY_UNAVAILABLE.to_string())
            }
        };

        let donated = match data.donated {
            Ok(donated) => Some(donated),
            Err(err) => {
                tracing::warn!("donated purpose breakdown unavailable: {}", err);
                None
            }
        };

        let (index, received_ok) = match (&data.totals, &data.received) {
            (Ok(totals), received) => {
                let index = CountryIndex::build(totals, received.as_ref().ok(), donated.as_ref());
                if index.is_empty() {
                    tracing::warn!("country totals list no countries");
                }
                (Ok(Rc::new(index)), received.as_ref().map(|_| ()).map_err(|e| failure("purpose breakdown", e)))
            }
            (Err(err), _) => (Err(failure("country totals", err)), Ok(())),
        };

        let scatter = match (&index, &received_ok) {
            (Ok(index), Ok(())) => Pane::Ready(ScatterView::new(Rc::clone(index), donated.is_some())),
            (Err(message), _) | (_, Err(message)) => Pane::Failed(message.clone()),
        };

        let netmap = match (&index, &world) {
            (Ok(index), Ok(world)) => Pane::Ready(NetMapView::new(Rc::clone(index), Rc::clone(world))),
            (_, Err(message)) | (Err(message), _) => Pane::Failed(message.clone()),
        };

        let top_donors = match data.top_donors {
            Ok(top) => Some(top),
            Err(err) => {
                tracing::warn!("top donors unavailable, tooltips show amounts only: {}", err);
                None
            }
        };
        let purposes = match (data.top_purposes, &world) {
            (Ok(top), Ok(world)) => Pane::Ready(PurposesView::new(top, top_donors, Rc::clone(world))),
            (_, Err(message)) => Pane::Failed(message.clone()),
            (Err(err), _) => Pane::Failed(failure("top purposes", &err)),
        };

        let chord = match data.chord {
            Ok(flows) => Pane::Ready(ChordView::new(flows)),
            Err(err) => Pane::Failed(failure("chord flows", &err)),
        };

        let temporal = match data.temporal {
            Ok(series) => Pane::Ready(TemporalView::new(&series)),
            Err(err) => Pane::Failed(failure("temporal series", &err)),
        };

        Self {
            active: ViewKind::default(),
            scatter,
            netmap,
            purposes,
            chord,
            temporal,
            tooltip: None,
            should_quit: false,
            frame: 0,
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn switch_to(&mut self, view: ViewKind) {
        if view != self.active {
            self.active = view;
            self.tooltip = None;
        }
    }

    /// Failure message of the active pane, if it could not be built
    pub fn active_error(&self) -> Option<&str> {
        match self.active {
            ViewKind::Scatter => self.scatter.error(),
            ViewKind::NetMap => self.netmap.error(),
            ViewKind::Purposes => self.purposes.error(),
            ViewKind::Chord => self.chord.error(),
            ViewKind::Temporal => self.temporal.error(),
        }
    }

    fn map_pane(&mut self) -> Option<&mut MapPane> {
        match self.active {
            ViewKind::NetMap => self.netmap.as_mut().map(NetMapView::pane_mut),
            ViewKind::Purposes => self.purposes.as_mut().map(PurposesView::pane_mut),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char(c @ '1'..='5') => {
                let i = c as usize - '1' as usize;
                self.switch_to(ViewKind::ALL[i]);
            }
            KeyCode::Tab => self.switch_to(self.active.next()),
            KeyCode::BackTab => self.switch_to(self.active.prev()),
            key => {
                let handled = match self.active {
                    ViewKind::Scatter => self.scatter.as_mut().is_some_and(|v| v.handle_key(key)),
                    ViewKind::NetMap => self.netmap.as_mut().is_some_and(|v| v.handle_key(key)),
                    ViewKind::Purposes => self.purposes.as_mut().is_some_and(|v| v.handle_key(key)),
                    ViewKind::Chord => self.chord.as_mut().is_some_and(|v| v.handle_key(key)),
                    ViewKind::Temporal => self.temporal.as_mut().is_some_and(|v| v.handle_key(key)),
                };
                if handled || key == KeyCode::Esc {
                    self.tooltip = None;
                }
            }
        }
    }

    /// Pointer move or click on the active view; a miss clears the tooltip
    fn point(&mut self, col: u16, row: u16, click: bool) {
        self.tooltip = match self.active {
            ViewKind::Scatter => self.scatter.as_mut().and_then(|v| {
                if click {
                    v.click(col, row);
                }
                v.hover(col, row)
            }),
            ViewKind::NetMap => self.netmap.as_mut().and_then(|v| v.hover(col, row)),
            ViewKind::Purposes => self.purposes.as_mut().and_then(|v| {
                if click {
                    v.click(col, row)
                } else {
                    v.hover(col, row)
                }
            }),
            ViewKind::Chord => self.chord.as_mut().and_then(|v| v.hover(col, row)),
            ViewKind::Temporal => self.temporal.as_mut().and_then(|v| v.hover(col, row)),
        };
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => self.point(col, row, false),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(pane) = self.map_pane() {
                    pane.start_drag(col, row);
                }
                self.point(col, row, true);
            }
            // Click and drag to pan
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(pane) = self.map_pane() {
                    pane.drag(col, row);
                    self.tooltip = None;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(pane) = self.map_pane() {
                    pane.end_drag();
                }
            }
            // Scroll wheel zooms towards the pointer
            MouseEventKind::ScrollUp => {
                if let Some(pane) = self.map_pane() {
                    pane.zoom_at(col, row, 1.5);
                    self.tooltip = None;
                }
            }
            MouseEventKind::ScrollDown => {
                if let Some(pane) = self.map_pane() {
                    pane.zoom_at(col, row, 1.0 / 1.5);
                    self.tooltip = None;
                }
            }
            // Horizontal scroll for panning (trackpad two-finger swipe)
            MouseEventKind::ScrollLeft => {
                if let Some(pane) = self.map_pane() {
                    pane.pan(-15, 0);
                }
            }
            MouseEventKind::ScrollRight => {
                if let Some(pane) = self.map_pane() {
                    pane.pan(15, 0);
                }
            }
            _ => {}
        }
    }

    /// Advance animations, returns true if any are active
    pub fn tick(&mut self) -> bool {
        self.frame = self.frame.wrapping_add(1);
        self.temporal.as_mut().is_some_and(TemporalView::tick)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::{
        ChordFlows, CountryTotal, CountryTotals, PurposeBreakdown, TemporalPoint, TemporalSeries, TopPurposes,
    };
    use crate::geo::GeoFeature;
    use std::collections::HashMap;

    pub(crate) fn datasets() -> Datasets {
        let totals = CountryTotals {
            countries: vec![
                CountryTotal { iso2: "US".into(), donated: 50e9, received: 2e9 },
                CountryTotal { iso2: "KE".into(), donated: 1e6, received: 3e9 },
            ],
        };
        let mut received = PurposeBreakdown::new();
        received.insert("KE".into(), HashMap::from([("Health".to_string(), 2e9)]));
        let top = TopPurposes {
            purposes: vec!["Health".into()],
            per_purpose: HashMap::from([("Health".to_string(), HashMap::from([("KE".to_string(), 2e9)]))]),
        };
        let chord = ChordFlows {
            countries: vec!["US".into(), "KE".into()],
            names: HashMap::new(),
            roles: HashMap::new(),
            matrix: vec![vec![0.0, 1e9], vec![0.0, 0.0]],
            totals: HashMap::new(),
        };
        let temporal = TemporalSeries {
            years: vec![2000, 2001],
            purposes: vec!["Health".into()],
            data: vec![TemporalPoint { year: 2000, purpose: "Health".into(), amount: 1e9 }],
        };
        let kenya = GeoFeature {
            id: Some("404".into()),
            name: None,
            polygons: vec![vec![vec![(34.0, -4.0), (41.0, -4.0), (41.0, 4.0), (34.0, 4.0), (34.0, -4.0)]]],
        };
        Datasets {
            totals: Ok(totals),
            received: Ok(received),
            donated: Err(AtlasError::NoSources),
            top_purposes: Ok(top),
            top_donors: Err(AtlasError::NoSources),
            chord: Ok(chord),
            temporal: Ok(temporal),
            geometry: Ok(vec![kenya]),
        }
    }

    #[test]
    fn test_all_views_ready() {
        let app = App::new(datasets());
        for view in ViewKind::ALL {
            let mut app = App::new(datasets());
            app.switch_to(view);
            assert!(app.active_error().is_none(), "{:?} failed", view);
        }
        assert!(!app.should_quit);
    }

    #[test]
    fn test_geometry_failure_disables_only_maps() {
        let mut data = datasets();
        data.geometry = Err(AtlasError::GeometryUnavailable {
            attempts: 3,
            last: Box::new(AtlasError::NoSources),
        });
        let app = App::new(data);
        assert_eq!(app.netmap.error(), Some(GEOMETRY_UNAVAILABLE));
        assert_eq!(app.purposes.error(), Some(GEOMETRY_UNAVAILABLE));
        assert!(app.scatter.error().is_none());
        assert!(app.chord.error().is_none());
    }

    #[test]
    fn test_dataset_failure_is_scoped() {
        let mut data = datasets();
        data.received = Err(AtlasError::NoSources);
        data.chord = Err(AtlasError::InvalidDataset {
            dataset: "chord_flows.json",
            message: "row 0 has 1 columns, expected 2".into(),
        });
        let app = App::new(data);
        assert!(app.scatter.error().unwrap().contains("purpose breakdown"));
        assert!(app.chord.error().unwrap().contains("row 0 has 1 columns"));
        assert!(app.netmap.error().is_none());
        assert!(app.temporal.error().is_none());
    }

    #[test]
    fn test_keys_switch_views_and_clear_tooltip() {
        let mut app = App::new(datasets());
        app.tooltip = Some(Tooltip::new("Kenya", (0, 0)));
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.active, ViewKind::Chord);
        assert!(app.tooltip.is_none());
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.active, ViewKind::Purposes);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tick_drives_temporal_transition() {
        let mut app = App::new(datasets());
        assert!(!app.tick());
        app.switch_to(ViewKind::Temporal);
        app.handle_key(KeyCode::Char('m'));
        assert!(app.tick());
    }
}
