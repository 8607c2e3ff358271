pub mod cell;
pub mod config;
pub mod driver;
pub mod engine;
pub mod grid;
pub mod io;
pub mod parse_rle;
pub mod render;
pub mod rules;
pub mod screen;
pub mod seed;

mod parse_util;

pub use cell::Cell;
pub use engine::advance_generation;
pub use engine::count_live_neighbours;
pub use grid::Grid;
