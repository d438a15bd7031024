//! Shared falling physics for units and carryable objects.

use hb_core::{CubeCoord, Terrain, Vector3};

/// Falling speed in cubes per time unit.
pub const FALL_SPEED: f64 = 3.0;

/// Returns true if a body standing in `cube` has nothing to stand on.
pub fn must_fall(terrain: &Terrain, cube: CubeCoord) -> bool {
    !terrain.is_supported(cube)
}

/// Move a falling body down for `dt` time units.
///
/// The body passes through cubes it cannot stand in and lands at the center
/// of the first valid cube it reaches. Returns that cube on landing.
pub fn fall_step(position: &mut Vector3, dt: f64, terrain: &Terrain) -> Option<CubeCoord> {
    let cube = position.cube();
    let next_z = (position.z - FALL_SPEED * dt).max(0.5);
    if terrain.is_valid_cube(cube) && next_z <= cube.center().z {
        *position = cube.center();
        return Some(cube);
    }
    position.z = next_z;
    let reached = position.cube();
    if reached != cube && terrain.is_valid_cube(reached) && next_z <= reached.center().z {
        *position = reached.center();
        return Some(reached);
    }
    None
}

#[cfg(test)]
mod tests {
    use hb_core::CubeType;

    use super::*;

    fn column() -> Terrain {
        // Rock floor, a floating rock at z=3 over (1,1) and air elsewhere.
        Terrain::from_fn(3, 3, 5, |c| match (c.x, c.y, c.z) {
            (_, _, 0) => CubeType::Rock,
            (1, 1, 3) => CubeType::Rock,
            _ => CubeType::Air,
        })
        .unwrap()
    }

    #[test]
    fn unsupported_cubes_fall() {
        let terrain = column();
        assert!(!must_fall(&terrain, CubeCoord::new(1, 1, 1)));
        assert!(must_fall(&terrain, CubeCoord::new(1, 1, 2)));
        // The cube above the interior rock is held up by nothing.
        assert!(must_fall(&terrain, CubeCoord::new(1, 1, 4)));
    }

    #[test]
    fn body_lands_on_first_valid_cube() {
        let terrain = column();
        let mut position = CubeCoord::new(1, 1, 4).center();
        let mut landed = None;
        for _ in 0..100 {
            landed = fall_step(&mut position, 0.1, &terrain);
            if landed.is_some() {
                break;
            }
        }
        assert_eq!(landed, Some(CubeCoord::new(1, 1, 1)));
        assert_eq!(position, CubeCoord::new(1, 1, 1).center());
    }

    #[test]
    fn small_steps_do_not_skip_landing() {
        let terrain = column();
        let mut position = Vector3::new(1.5, 1.5, 2.2);
        assert_eq!(fall_step(&mut position, 0.19, &terrain), None);
        assert!(position.z < 2.0);
        assert_eq!(
            fall_step(&mut position, 0.19, &terrain),
            Some(CubeCoord::new(1, 1, 1))
        );
    }
}
