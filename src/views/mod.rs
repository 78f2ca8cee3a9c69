//! The five interactive views.
//!
//! Each view owns its selection state and remembers where it was last drawn
//! so pointer events can be hit-tested against the previous frame.

pub mod chord;
pub mod netmap;
pub mod purposes;
pub mod scatter;
pub mod temporal;

use crate::format::{axis_money, truncate};
use crate::scale::LinearScale;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
};

/// Message shown in both map panes when no geometry source worked
pub const GEOMETRY_UNAVAILABLE: &str =
    "World map data unavailable. Check the network or add world/countries-110m.json under the data directory.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    #[default]
    Scatter,
    NetMap,
    Purposes,
    Chord,
    Temporal,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Scatter,
        ViewKind::NetMap,
        ViewKind::Purposes,
        ViewKind::Chord,
        ViewKind::Temporal,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Scatter => "Donated vs Received",
            ViewKind::NetMap => "Net Balance",
            ViewKind::Purposes => "Purposes",
            ViewKind::Chord => "Flows",
            ViewKind::Temporal => "Over Time",
        }
    }

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|&k| k == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Key hints for the status bar
    pub fn help(self) -> &'static str {
        match self {
            ViewKind::Scatter => "click/↑↓:select Esc:clear d:donated/received",
            ViewKind::NetMap => "hover:inspect hjkl:pan +/-:zoom r:reset",
            ViewKind::Purposes => "↑↓/click:purpose hjkl:pan +/-:zoom r:reset",
            ViewKind::Chord => "hover/←→:country f:filter [ ]:threshold Esc:clear",
            ViewKind::Temporal => "m:absolute/normalized hover:inspect",
        }
    }
}

/// A view, or the reason it could not be built
pub enum Pane<T> {
    Ready(T),
    Failed(String),
}

impl<T> Pane<T> {
    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Pane::Ready(view) => Some(view),
            Pane::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Pane::Ready(_) => None,
            Pane::Failed(message) => Some(message),
        }
    }
}

/// The shared hover / click popup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub note: Option<String>,
    /// Terminal cell the pointer was on
    pub anchor: (u16, u16),
}

impl Tooltip {
    pub fn new(title: impl Into<String>, anchor: (u16, u16)) -> Self {
        Self {
            title: title.into(),
            anchor,
            ..Self::default()
        }
    }

    pub fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.fields.push((label.to_string(), value.into()));
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && row >= area.y && col < area.x + area.width && row < area.y + area.height
}

/// Braille pixel at the centre of a terminal cell, relative to `area`
pub fn cell_pixel(area: Rect, col: u16, row: u16) -> Option<(f64, f64)> {
    contains(area, col, row).then(|| {
        (
            (col - area.x) as f64 * 2.0 + 1.0,
            (row - area.y) as f64 * 4.0 + 2.0,
        )
    })
}

/// Horizontal bar rows: label, bar scaled to the largest value, compact amount
pub fn bar_lines(rows: &[(String, f64)], width: u16, color: Color) -> Vec<Line<'static>> {
    let label_width = (width as usize / 2).clamp(8, 30);
    let bar_width = (width as usize).saturating_sub(label_width + 8).max(1);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let scale = LinearScale::new((0.0, max), (0.0, bar_width as f64));

    rows.iter()
        .map(|(label, value)| {
            let filled = if max > 0.0 {
                (scale.map(value.max(0.0)).round() as usize).max(1)
            } else {
                0
            };
            Line::from(vec![
                Span::styled(
                    format!("{:>w$} ", truncate(label, label_width), w = label_width),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled(
                    format!(" {}", axis_money(*value)),
                    Style::default().fg(Color::White),
                ),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_cycle() {
        assert_eq!(ViewKind::Scatter.next(), ViewKind::NetMap);
        assert_eq!(ViewKind::Temporal.next(), ViewKind::Scatter);
        assert_eq!(ViewKind::Scatter.prev(), ViewKind::Temporal);
    }

    #[test]
    fn test_cell_pixel() {
        let area = Rect::new(10, 5, 4, 2);
        assert_eq!(cell_pixel(area, 10, 5), Some((1.0, 2.0)));
        assert_eq!(cell_pixel(area, 13, 6), Some((7.0, 6.0)));
        assert_eq!(cell_pixel(area, 14, 6), None);
    }

    #[test]
    fn test_bar_lines_scale_to_largest() {
        let rows = vec![("Health".to_string(), 10.0), ("Water".to_string(), 5.0)];
        let lines = bar_lines(&rows, 40, Color::Blue);
        assert_eq!(lines.len(), 2);
        let first = lines[0].spans[1].content.chars().count();
        let second = lines[1].spans[1].content.chars().count();
        assert_eq!(first, 12);
        assert_eq!(second, 6);
        assert_eq!(lines[1].spans[2].content, " 5");
    }
}
