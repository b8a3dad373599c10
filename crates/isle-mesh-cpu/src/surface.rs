use std::time::Instant;

use isle_chunk::{ChunkMesh, TILE_TRIANGLES};
use isle_geom::{GridDims, Vec3};

use crate::mesh_build::MeshBuild;
use crate::palette::{WATER_PLANE_RGBA, height_color, with_alpha};

/// Builds the renderable surface of one chunk: four flat-shaded triangles per
/// tile, each colored by the mean level of its vertices.
pub fn build_chunk_surface(chunk: &ChunkMesh, water_level: i32) -> MeshBuild {
    let start = Instant::now();
    let t = chunk.tiles_per_chunk();
    let dims = *chunk.dims();
    let positions = chunk.positions();
    let mut out = MeshBuild::default();
    out.reserve_tris(t * t * TILE_TRIANGLES.len());
    for tz in 0..t {
        for tx in 0..t {
            for i in 0..TILE_TRIANGLES.len() {
                let [a, b, c] = chunk.tile_triangle(tx, tz, i).map(|s| {
                    let p = positions[s];
                    Vec3::new(p[0], p[1], p[2])
                });
                let level = dims.y_to_level((a.y + b.y + c.y) / 3.0);
                let rgba = with_alpha(height_color(level, water_level, dims.max_level), 255);
                // Corners run counter-clockwise in x/z; (a, center, b) faces up.
                out.add_triangle(a, c, b, rgba);
            }
        }
    }
    log::trace!(
        target: "mesh",
        "chunk ({}, {}) surface: {} tris in {}us",
        chunk.coord.cx,
        chunk.coord.cz,
        out.triangle_count(),
        start.elapsed().as_micros()
    );
    out
}

/// One translucent quad covering the whole terrain at the water height.
pub fn build_water_plane(dims: &GridDims, water_level: i32) -> MeshBuild {
    let (w, d) = dims.world_extent();
    let y = dims.level_to_y(water_level);
    let mut out = MeshBuild::default();
    out.add_quad(
        Vec3::new(0.0, y, 0.0),
        Vec3::new(w, y, 0.0),
        Vec3::new(w, y, d),
        Vec3::new(0.0, y, d),
        Vec3::UP,
        WATER_PLANE_RGBA,
    );
    out
}
