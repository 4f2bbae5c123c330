//! Domain values shared by the grid engine and the reference backend.

pub mod grid;
pub mod product;
pub mod types;
