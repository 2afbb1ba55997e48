//! Render-command emitters. Each view turns laid-out data into a flat
//! `Vec<RenderCommand>` in board coordinates: the name column starts at
//! x = 0, the hour header occupies the top [`HEADER_HEIGHT_PX`].

pub mod board;
pub mod hour_axis;

pub use board::render_board;
pub use hour_axis::render_hour_axis;

pub const HEADER_HEIGHT_PX: f64 = 24.0;
