use isle_geom::{ChunkCoord, GridDims, GridPoint, GridRect};
use proptest::prelude::*;

fn dims() -> impl Strategy<Value = GridDims> {
    (1i32..=6, 1i32..=4, 1i32..=4).prop_map(|(t, cx, cz)| GridDims {
        tiles_per_chunk: t,
        chunks_x: cx,
        chunks_z: cz,
        ..GridDims::default()
    })
}

fn dims_and_point() -> impl Strategy<Value = (GridDims, GridPoint)> {
    dims().prop_flat_map(|d| {
        (0..=d.tiles_x(), 0..=d.tiles_z()).prop_map(move |(x, z)| (d, GridPoint::new(x, z)))
    })
}

proptest! {
    // Every chunk reported for a point actually contains it, and every chunk containing it is reported
    #[test]
    fn chunks_sharing_point_are_exact((d, p) in dims_and_point()) {
        let reported: Vec<_> = p.chunks(&d).collect();
        prop_assert!(!reported.is_empty() && reported.len() <= 4);
        for cz in 0..d.chunks_z { for cx in 0..d.chunks_x {
            let c = ChunkCoord::new(cx, cz);
            let contains = c.point_rect(&d).contains(p);
            prop_assert_eq!(contains, reported.contains(&c));
            prop_assert_eq!(contains, p.local_in(c, &d).is_some());
        }}
    }

    // Neighbors stay in bounds, are distinct and at Chebyshev distance 1
    #[test]
    fn neighbors_in_bounds((d, p) in dims_and_point()) {
        let ns: Vec<_> = p.neighbors(&d).collect();
        prop_assert!(ns.len() >= 3);
        for n in &ns {
            prop_assert!(n.in_bounds(&d));
            prop_assert_eq!(n.chebyshev(p), 1);
        }
        let mut dedup = ns.clone();
        dedup.sort();
        dedup.dedup();
        prop_assert_eq!(dedup.len(), ns.len());
    }

    // World round-trip: a point's own world position maps back to the point
    #[test]
    fn world_roundtrip((d, p) in dims_and_point(), level in 0i32..16) {
        let w = p.to_world(&d, level);
        prop_assert_eq!(GridPoint::from_world(w, &d).unwrap(), p);
        prop_assert_eq!(d.y_to_level(w.y), level);
    }

    // Tiles around a point agree with the tile's own corners
    #[test]
    fn point_tiles_match_corners((d, p) in dims_and_point()) {
        for (tile, corner) in p.tiles(&d) {
            prop_assert!(tile.in_bounds(&d));
            prop_assert_eq!(tile.corner(corner), p);
            prop_assert!(tile.corners().contains(&p));
            let (lx, lz) = tile.local(&d);
            let chunk = tile.chunk(&d);
            prop_assert_eq!(chunk.origin(&d).offset(lx as i32, lz as i32), GridPoint::new(tile.x, tile.z));
        }
    }

    // Expanding then clamping never leaves the terrain
    #[test]
    fn expanded_rect_is_clamped((d, p) in dims_and_point(), n in 0i32..4) {
        let r = GridRect::point(p).expanded(n, &d);
        prop_assert!(r.contains(p));
        prop_assert!(r.min.in_bounds(&d) && r.max.in_bounds(&d));
        prop_assert!(r.points().all(|q| q.in_bounds(&d)));
    }
}
