//! Terrain edits over the chunk grid: molding, earthquakes, volcanoes and flooding.
#![forbid(unsafe_code)]

mod hook;
mod mold;
mod report;
mod terrain;
pub mod upheaval;

pub use hook::StructureHook;
pub use report::{Direction, EditKind, EditReport};
pub use terrain::Terrain;
