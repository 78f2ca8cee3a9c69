use crate::app::App;
use crate::views::{Tooltip, ViewKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Split into tabs, active view and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // View
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_view(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if let Some(tooltip) = &app.tooltip {
        render_tooltip(frame, tooltip, area);
    }
}

/// Loading screen shown while the datasets are fetched
pub fn render_loading(frame: &mut Frame, data: &str) {
    let area = frame.area();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " aid-atlas ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let text = vec![
        Line::default(),
        Line::styled(format!("  Loading datasets from {} ...", data), Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = ViewKind::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active.position())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));
    frame.render_widget(tabs, area);
}

fn render_view(frame: &mut Frame, app: &mut App, area: Rect) {
    if let Some(message) = app.active_error() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", app.active.title()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        let paragraph = Paragraph::new(Line::styled(message.to_string(), Style::default().fg(Color::Red)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    match app.active {
        ViewKind::Scatter => {
            if let Some(view) = app.scatter.as_mut() {
                view.render(frame, area);
            }
        }
        ViewKind::NetMap => {
            if let Some(view) = app.netmap.as_mut() {
                view.render(frame, area);
            }
        }
        ViewKind::Purposes => {
            if let Some(view) = app.purposes.as_mut() {
                view.render(frame, area);
            }
        }
        ViewKind::Chord => {
            if let Some(view) = app.chord.as_mut() {
                view.render(frame, area);
            }
        }
        ViewKind::Temporal => {
            if let Some(view) = app.temporal.as_mut() {
                view.render(frame, area);
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" View: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.active.title(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.active.help(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | 1-5/Tab:view q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}

/// Where a popup of `size` goes: below-right of the pointer, flipped to
/// stay on screen
fn tooltip_area(anchor: (u16, u16), width: u16, height: u16, screen: Rect) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    let right = screen.x + screen.width;
    let bottom = screen.y + screen.height;

    let x = if anchor.0 + 2 + width <= right {
        anchor.0 + 2
    } else {
        anchor.0.saturating_sub(width + 1).max(screen.x)
    };
    let y = if anchor.1 + 1 + height <= bottom {
        anchor.1 + 1
    } else {
        anchor.1.saturating_sub(height).max(screen.y)
    };
    Rect::new(x, y, width, height)
}

fn render_tooltip(frame: &mut Frame, tooltip: &Tooltip, screen: Rect) {
    let mut lines: Vec<Line> = tooltip
        .fields
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
                Span::styled(value.clone(), Style::default().fg(Color::White)),
            ])
        })
        .collect();
    if let Some(note) = &tooltip.note {
        lines.push(Line::styled(
            note.clone(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ));
    }

    let content_width = lines
        .iter()
        .map(Line::width)
        .chain(std::iter::once(tooltip.title.chars().count() + 2))
        .max()
        .unwrap_or(0) as u16;
    let area = tooltip_area(tooltip.anchor, content_width + 2, lines.len() as u16 + 2, screen);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            format!(" {} ", tooltip.title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::datasets;
    use crate::error::AtlasError;
    use crate::views::GEOMETRY_UNAVAILABLE;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_every_view_renders() {
        for view in ViewKind::ALL {
            let mut app = App::new(datasets());
            app.switch_to(view);
            let text = screen(&mut app);
            assert!(text.contains(view.help()), "{:?} status bar missing", view);
        }
    }

    #[test]
    fn test_failed_pane_shows_message() {
        let mut data = datasets();
        data.geometry = Err(AtlasError::NoSources);
        let mut app = App::new(data);
        app.switch_to(ViewKind::NetMap);
        let text = screen(&mut app);
        assert!(text.contains("World map data unavailable."));
        assert!(GEOMETRY_UNAVAILABLE.starts_with("World map data unavailable."));
    }

    #[test]
    fn test_tooltip_drawn_on_top() {
        let mut app = App::new(datasets());
        app.tooltip = Some(Tooltip::new("Kenya", (10, 5)).field("Received", "3.00 Billion USD"));
        let text = screen(&mut app);
        assert!(text.contains("Received: 3.00 Billion USD"));
        assert!(text.contains(" Kenya "));
    }

    #[test]
    fn test_tooltip_flips_at_screen_edge() {
        let screen = Rect::new(0, 0, 80, 24);
        assert_eq!(tooltip_area((10, 5), 20, 4, screen), Rect::new(12, 6, 20, 4));
        assert_eq!(tooltip_area((75, 22), 20, 4, screen), Rect::new(54, 18, 20, 4));
    }
}
