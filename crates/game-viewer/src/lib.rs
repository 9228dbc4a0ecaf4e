//! Rendering side of the archive toolkit: board diagrams, the navigable
//! game grid, engine evaluation overlay and evaluation curves.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod grid;
pub mod plot;
pub mod render;
pub mod stockfish;
pub mod table;
