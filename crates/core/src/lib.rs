//! Condition timelines for an hourly board.
//!
//! Raw per-column condition codes are classified ([`classify`]), merged into
//! intervals ([`merge`]), projected onto a pixel grid ([`position`]) and given
//! a font size and wrap mode that fits their arrow ([`fit`]). [`layout`] ties
//! these together for a whole [`model::Board`] and [`views`] turns the result
//! into render commands.

pub mod classify;
pub mod config;
pub mod fit;
pub mod layout;
pub mod merge;
pub mod model;
pub mod position;
pub mod store;
pub mod views;

pub use config::{BoardConfig, ConfigError};
pub use layout::{BoardLayout, BoardView, GeometryChange, layout_board};
pub use store::{BoardState, StoreError};
