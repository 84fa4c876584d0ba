mod cell;
mod color;
mod grid;

pub mod terminal;

pub use cell::Cell;
pub use color::Color;
pub use grid::{Grid, Row};
pub use terminal::{CursorStyle, Terminal};
