use isle_geom::{GridDims, GridPoint};
use isle_runtime::{EditRequest, build_mesh_pool, replay};
use isle_world::{World, WorldGenParams};
use proptest::prelude::*;

fn world(seed: u64) -> World {
    let dims = GridDims {
        tiles_per_chunk: 4,
        chunks_x: 2,
        chunks_z: 2,
        max_level: 8,
        ..GridDims::default()
    };
    let mut params = WorldGenParams::default().with_dims(dims);
    params.noise_scale = 4.0;
    params.max_water_level = 3;
    World::new(seed, params)
}

fn request() -> impl Strategy<Value = EditRequest> {
    let point = (-1i32..10, -1i32..10).prop_map(|(x, z)| GridPoint::new(x, z));
    prop_oneof![
        5 => (point.clone(), any::<bool>()).prop_map(|(point, lower)| EditRequest::Mold { point, lower }),
        2 => (point.clone(), -1i32..4).prop_map(|(center, radius)| EditRequest::Earthquake { center, radius }),
        2 => (point, -1i32..3).prop_map(|(center, radius)| EditRequest::Volcano { center, radius }),
        1 => Just(EditRequest::Flood),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Peers replaying the host's broadcast end with the host's terrain
    #[test]
    fn peers_converge_with_host(seed in any::<u64>(), edits in prop::collection::vec(request(), 0..20)) {
        let pool = build_mesh_pool(2).unwrap();
        let out = replay(&world(seed), &edits, 2, pool).unwrap();
        prop_assert!(out.in_sync(), "host {:016x} peers {:?}", out.host_hash, out.peer_hashes);
        prop_assert_eq!(out.applied + out.rejected.len(), edits.len());
    }
}
