//! Property tests for border connectivity.
use hb_core::{BorderConnectivity, CubeCoord};
use proptest::prelude::*;

const NB: i32 = 5;

prop_compose! {
    fn arb_cube()(x in 0..NB, y in 0..NB, z in 0..NB) -> CubeCoord {
        CubeCoord::new(x, y, z)
    }
}

prop_compose! {
    fn arb_edit()(cube in arb_cube(), solid in any::<bool>()) -> (CubeCoord, bool) {
        (cube, solid)
    }
}

fn all_cubes() -> impl Iterator<Item = CubeCoord> {
    (0..NB).flat_map(|x| (0..NB).flat_map(move |y| (0..NB).map(move |z| CubeCoord::new(x, y, z))))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn incremental_updates_match_full_recompute(
        initial in prop::collection::vec(any::<bool>(), (NB * NB * NB) as usize),
        edits in prop::collection::vec(arb_edit(), 1..40)
    ) {
        let flat = |c: CubeCoord| ((c.x * NB + c.y) * NB + c.z) as usize;
        let mut solids = initial;
        let mut incremental = BorderConnectivity::from_solids(NB, NB, NB, |c| solids[flat(c)]);

        for (cube, solid) in edits {
            if solid {
                incremental.change_passable_to_solid(cube);
            } else {
                let detached = incremental.change_solid_to_passable(cube);
                for d in &detached {
                    prop_assert!(incremental.is_solid(*d));
                    prop_assert!(!incremental.is_solid_connected_to_border(*d));
                }
            }
            solids[flat(cube)] = solid;

            let fresh = BorderConnectivity::from_solids(NB, NB, NB, |c| solids[flat(c)]);
            for c in all_cubes() {
                prop_assert_eq!(
                    incremental.is_solid_connected_to_border(c),
                    fresh.is_solid_connected_to_border(c),
                    "mismatch at {:?}", c
                );
            }
        }
    }

    #[test]
    fn connected_cubes_are_solid(initial in prop::collection::vec(any::<bool>(), (NB * NB * NB) as usize)) {
        let flat = |c: CubeCoord| ((c.x * NB + c.y) * NB + c.z) as usize;
        let conn = BorderConnectivity::from_solids(NB, NB, NB, |c| initial[flat(c)]);
        for c in all_cubes() {
            if conn.is_solid_connected_to_border(c) {
                prop_assert!(conn.is_solid(c));
            }
            if conn.is_border(c) && conn.is_solid(c) {
                prop_assert!(conn.is_solid_connected_to_border(c));
            }
        }
    }
}
