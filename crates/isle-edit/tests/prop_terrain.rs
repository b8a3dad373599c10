use isle_edit::{Direction, Terrain};
use isle_geom::{GridDims, GridPoint, GridRect};
use isle_world::{Heightfield, World, WorldGenParams};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Mold(i32, i32, bool),
    Quake(i32, i32, i32, u64),
    Volcano(i32, i32, i32),
    Flood,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (-1i32..14, -1i32..14, any::<bool>()).prop_map(|(x, z, l)| Op::Mold(x, z, l)),
        2 => (0i32..13, 0i32..13, 0i32..5, any::<u64>()).prop_map(|(x, z, r, s)| Op::Quake(x, z, r, s)),
        2 => (0i32..13, 0i32..13, 0i32..4).prop_map(|(x, z, r)| Op::Volcano(x, z, r)),
        1 => Just(Op::Flood),
    ]
}

fn terrain(seed: u64) -> Terrain {
    let dims = GridDims {
        tiles_per_chunk: 4,
        chunks_x: 3,
        chunks_z: 3,
        max_level: 10,
        ..GridDims::default()
    };
    let mut params = WorldGenParams::default().with_dims(dims);
    params.noise_scale = 5.0;
    Terrain::generate(&World::new(seed, params))
}

fn apply(t: &mut Terrain, op: &Op) -> Option<Option<GridRect>> {
    match *op {
        Op::Mold(x, z, lower) => Some(t.modify_point(GridPoint::new(x, z), Direction::from_lower(lower)).area),
        Op::Quake(x, z, r, s) => Some(t.earthquake(GridPoint::new(x, z), r, s).area),
        Op::Volcano(x, z, r) => Some(t.volcano(GridPoint::new(x, z), r).area),
        Op::Flood => {
            t.raise_water_level();
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Any edit sequence keeps the one-step rule, level bounds and chunk agreement
    #[test]
    fn edits_preserve_terrain_invariants(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..24)) {
        let mut t = terrain(seed);
        let max = t.dims().max_level;
        let mut water = t.water_level();
        for op in &ops {
            apply(&mut t, op);
            prop_assert!(t.water_level() >= water, "water sank after {:?}", op);
            water = t.water_level();
            let field = t.heightfield();
            prop_assert!(field.max_neighbor_delta() <= 1, "after {:?}", op);
            prop_assert!(field.levels.iter().all(|&h| (0..=max).contains(&h)));
        }
        for p in GridRect::full(t.dims()).points() {
            let levels = t.point_levels_by_chunk(p);
            prop_assert!(levels.iter().all(|(_, l)| *l == levels[0].1));
        }
        prop_assert!(t.chunks().iter().all(|c| c.duplicates_consistent()));
    }

    // Points outside the reported area never change
    #[test]
    fn affected_area_covers_every_change(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..12)) {
        let mut t = terrain(seed);
        for op in &ops {
            let before = t.heightfield();
            let Some(area) = apply(&mut t, op) else { continue };
            let after = t.heightfield();
            for p in GridRect::full(t.dims()).points() {
                if before.get(p) != after.get(p) {
                    prop_assert!(area.is_some_and(|a| a.contains(p)), "{:?} missed ({}, {})", op, p.x, p.z);
                }
            }
        }
    }

    // Radii reaching past the map, including from the corners, still finish with a valid terrain
    #[test]
    fn oversized_radii_stay_within_the_map(
        seed in any::<u64>(),
        center in prop_oneof![
            prop::sample::select(vec![(0, 0), (12, 0), (0, 12), (12, 12)]),
            (0i32..13, 0i32..13),
        ],
        radius in prop_oneof![12i32..64, Just(i32::MAX)],
        quake_seed in any::<u64>(),
        volcano in any::<bool>(),
    ) {
        let mut t = terrain(seed);
        let center = GridPoint::new(center.0, center.1);
        let reach = t.reach_from(center);
        let mut clipped = terrain(seed);
        if volcano {
            t.volcano(center, radius);
            prop_assert!(t.heightfield().levels.iter().all(|&h| h >= 1));
        } else {
            let a = t.earthquake(center, radius, quake_seed);
            let b = clipped.earthquake(center, reach, quake_seed);
            prop_assert_eq!(a, b);
            prop_assert_eq!(t.heightfield(), clipped.heightfield());
        }
        prop_assert!(t.heightfield().max_neighbor_delta() <= 1);
        prop_assert!(t.chunks().iter().all(|c| c.duplicates_consistent()));
    }

    // Same edits on the same seed give the same terrain
    #[test]
    fn edit_sequences_are_deterministic(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..12)) {
        let mut a = terrain(seed);
        let mut b = terrain(seed);
        for op in &ops {
            prop_assert_eq!(apply(&mut a, op), apply(&mut b, op));
        }
        prop_assert_eq!(a.heightfield(), b.heightfield());
        prop_assert_eq!(a.water_level(), b.water_level());
    }
}

#[test]
fn single_mold_changes_at_most_the_needed_points() {
    let dims = GridDims {
        tiles_per_chunk: 8,
        chunks_x: 2,
        chunks_z: 2,
        max_level: 12,
        ..GridDims::default()
    };
    let world = World::new(3, WorldGenParams::default().with_dims(dims));
    let mut t = Terrain::from_heightfield(&world, &Heightfield::flat(dims, 0));
    let c = GridPoint::new(8, 8);
    for k in 1..=5 {
        let r = t.modify_point(c, Direction::Raise);
        let side = 2 * (k - 1) + 1;
        assert_eq!(r.changed as i32, side * side);
    }
}
