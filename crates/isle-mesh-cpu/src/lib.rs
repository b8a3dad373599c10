//! CPU render data for the terrain: chunk surfaces, water plane, border walls and minimap.
#![forbid(unsafe_code)]

mod mesh_build;
pub mod minimap;
pub mod palette;
mod surface;
pub mod walls;

pub use mesh_build::MeshBuild;
pub use minimap::Minimap;
pub use surface::{build_chunk_surface, build_water_plane};
pub use walls::{BorderWalls, WallSide};

#[cfg(test)]
mod tests {
    use super::*;
    use isle_edit::{Direction, Terrain};
    use isle_geom::{ChunkCoord, GridDims, GridPoint, GridRect};
    use isle_world::{Heightfield, World, WorldGenParams};

    fn flat(level: i32) -> Terrain {
        let d = GridDims {
            tiles_per_chunk: 4,
            chunks_x: 2,
            chunks_z: 2,
            max_level: 8,
            ..GridDims::default()
        };
        let world = World::new(5, WorldGenParams::default().with_dims(d));
        Terrain::from_heightfield(&world, &Heightfield::flat(d, level))
    }

    #[test]
    fn surface_has_four_upward_triangles_per_tile() {
        let t = flat(2);
        let chunk = t.chunk(ChunkCoord::new(1, 0)).unwrap();
        let mesh = build_chunk_surface(chunk, t.water_level());
        assert_eq!(mesh.triangle_count(), 4 * 4 * 4);
        assert!(mesh.normals().chunks(3).all(|n| n[1] > 0.99));
    }

    #[test]
    fn water_plane_sits_at_water_level() {
        let mut t = flat(0);
        t.raise_water_level();
        let mesh = build_water_plane(t.dims(), t.water_level());
        let y = t.dims().level_to_y(1);
        assert!(mesh.positions().chunks(3).all(|p| p[1] == y));
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn walls_follow_rim_and_water() {
        let mut t = flat(1);
        let mut walls = BorderWalls::new(&t);
        let y1 = t.dims().level_to_y(1);
        assert!(walls.rims(WallSide::South).iter().all(|&r| r == y1));
        assert_eq!(walls.mesh(WallSide::West).triangle_count(), 2 * 8);

        let p = GridPoint::new(3, 0);
        let report = t.modify_point(p, Direction::Raise);
        assert_eq!(report.perimeter, vec![p]);
        let before = walls.rebuild_count(WallSide::North);
        assert_eq!(walls.modify_at_point(p, &t), vec![WallSide::South]);
        assert_eq!(walls.rim(WallSide::South, 3), t.dims().level_to_y(2));
        assert_eq!(walls.rebuild_count(WallSide::North), before);

        t.raise_water_level();
        t.raise_water_level();
        t.raise_water_level();
        walls.rebuild_all(&t);
        let y3 = t.dims().level_to_y(3);
        assert!(walls.rims(WallSide::East).iter().all(|&r| r == y3));
    }

    #[test]
    fn corner_points_touch_two_walls() {
        let t = flat(0);
        let d = *t.dims();
        let sides: Vec<_> = WallSide::of_point(GridPoint::new(8, 8), &d)
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        assert_eq!(sides, vec![WallSide::East, WallSide::North]);
        assert!(WallSide::of_point(GridPoint::new(4, 4), &d).is_empty());
        assert!(WallSide::of_point(GridPoint::new(-1, 0), &d).is_empty());
    }

    #[test]
    fn minimap_tracks_water_and_regions() {
        let mut t = flat(1);
        let mut map = Minimap::new(&t);
        let land = map.texel(GridPoint::new(2, 2));
        t.raise_water_level();
        let p = GridPoint::new(2, 2);
        map.update_region(GridRect::point(p), &t);
        let water = map.texel(p);
        assert_ne!(land, water);
        assert_eq!(map.texel(GridPoint::new(6, 6)), land);
        map.rebuild_all(&t);
        assert_eq!(map.texel(GridPoint::new(6, 6)), water);
        let ppm = map.to_ppm();
        assert!(ppm.starts_with(b"P6\n9 9\n255\n"));
        assert_eq!(ppm.len(), "P6\n9 9\n255\n".len() + 9 * 9 * 3);
    }
}
