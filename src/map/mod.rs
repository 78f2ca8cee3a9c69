mod geometry;
mod pane;
mod projection;
mod renderer;
mod widget;

pub use geometry::{draw_circle, draw_dashed_line, draw_line};
pub use pane::MapPane;
pub use widget::{ChoroplethWidget, HATCH};
