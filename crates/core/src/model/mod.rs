pub mod board;
pub mod grid;
pub mod interval;
pub mod label;
pub mod manual;

pub use board::{Board, Subject};
pub use grid::{GridConfig, SharedGrid};
pub use interval::{Interval, Timeline};
pub use label::ClassifiedLabel;
pub use manual::ManualCondition;
