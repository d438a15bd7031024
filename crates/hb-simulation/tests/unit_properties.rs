//! Property tests for simulation units.
use hb_core::{CubeCoord, CubeType, Terrain, Vector3};
use hb_simulation::unit::{MAX_ATTRIBUTE, MIN_ATTRIBUTE, max_hitpoints, min_weight};
use hb_simulation::{Attributes, SimConfig, Unit, UnitId, World};
use proptest::prelude::*;

fn flat() -> Terrain {
    Terrain::from_fn(8, 8, 4, |c| if c.z == 0 { CubeType::Rock } else { CubeType::Air }).unwrap()
}

prop_compose! {
    fn arb_attributes()(
        weight in 1u32..=200,
        strength in 1u32..=200,
        agility in 1u32..=200,
        toughness in 1u32..=200
    ) -> Attributes {
        Attributes::new(weight, strength, agility, toughness)
    }
}

prop_compose! {
    fn arb_cube()(x in 0..8i32, y in 0..8i32) -> CubeCoord {
        CubeCoord::new(x, y, 1)
    }
}

fn unit_at(cube: CubeCoord, attrs: Attributes) -> Unit {
    Unit::new(UnitId(0), "Prop", cube, attrs, false, &flat()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn attributes_stay_legal(attrs in arb_attributes(), cube in arb_cube()) {
        let u = unit_at(cube, attrs);
        for value in [u.strength(), u.agility(), u.toughness(), u.weight()] {
            prop_assert!((MIN_ATTRIBUTE..=MAX_ATTRIBUTE).contains(&value));
        }
        prop_assert!(u.weight() >= min_weight(u.strength(), u.agility()));
    }

    #[test]
    fn pools_start_full_and_stay_bounded(
        attrs in arb_attributes(),
        hp in 0u32..1000,
        stamina in 0u32..1000
    ) {
        let mut u = unit_at(CubeCoord::new(1, 1, 1), attrs);
        prop_assert_eq!(u.max_hitpoints(), max_hitpoints(u.weight(), u.toughness()));
        prop_assert_eq!(u.hitpoints(), u.max_hitpoints());
        prop_assert_eq!(u.stamina(), u.max_stamina());
        u.set_hitpoints(hp);
        u.set_stamina(stamina);
        prop_assert!(u.hitpoints() <= u.max_hitpoints());
        prop_assert!(u.stamina() <= u.max_stamina());
    }

    #[test]
    fn adjacency_is_symmetric(a in arb_cube(), b in arb_cube()) {
        let attrs = Attributes::new(50, 50, 50, 50);
        let ua = unit_at(a, attrs);
        let ub = unit_at(b, attrs);
        prop_assert_eq!(ua.is_adjacent_to(&ub), ub.is_adjacent_to(&ua));
        let close = (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1;
        prop_assert_eq!(ua.is_adjacent_to(&ub), close);
    }

    #[test]
    fn set_position_accepts_exactly_valid_positions(
        x in -1.0f64..9.0,
        y in -1.0f64..9.0,
        z in -1.0f64..5.0
    ) {
        let terrain = flat();
        let mut u = unit_at(CubeCoord::new(1, 1, 1), Attributes::new(50, 50, 50, 50));
        let target = Vector3::new(x, y, z);
        let result = u.set_position(target, &terrain);
        prop_assert_eq!(result.is_ok(), terrain.is_valid_position(target));
        if result.is_ok() {
            prop_assert_eq!(u.position(), target);
        } else {
            prop_assert_eq!(u.position(), CubeCoord::new(1, 1, 1).center());
        }
    }

    #[test]
    fn ticking_keeps_units_in_open_space(seed in any::<u64>(), ticks in 1usize..200) {
        let mut world = World::new(flat(), SimConfig::default().with_seed(seed));
        let id = world.spawn_unit(true).unwrap();
        for _ in 0..ticks {
            world.advance_time(0.1).unwrap();
            let u = world.unit(id).unwrap();
            prop_assert!(world.is_passable(u.cube()));
            prop_assert!(u.hitpoints() <= u.max_hitpoints());
            prop_assert!(u.stamina() <= u.max_stamina());
        }
    }
}
