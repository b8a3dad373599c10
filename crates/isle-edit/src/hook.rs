use isle_chunk::Occupant;
use isle_geom::{GridPoint, GridRect, GridTile};

use crate::terrain::Terrain;

/// Reactions of placed structures (trees, buildings, fields) to terrain edits.
///
/// Hooks run after every edit with the affected rectangle and read the
/// terrain; they never write heights.
pub trait StructureHook: Send {
    fn on_terrain_modified(&mut self, area: GridRect, terrain: &Terrain);

    /// Whether a tile occupied by `occupant` forbids molding its corners.
    fn blocks_modification(&self, _tile: GridTile, _occupant: &Occupant) -> bool {
        false
    }
}

impl Terrain {
    /// First occupant on a tile around `p` that `hook` refuses to have molded.
    pub fn blocking_occupant(&self, p: GridPoint, hook: &dyn StructureHook) -> Option<(GridTile, Occupant)> {
        p.tiles(self.dims()).find_map(|(tile, _)| {
            self.occupancy(tile)
                .filter(|occ| hook.blocks_modification(tile, occ))
                .map(|occ| (tile, occ))
        })
    }
}
