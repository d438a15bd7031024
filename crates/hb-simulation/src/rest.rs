use hb_core::Terrain;

use crate::activity::{Activity, Interruptor};
use crate::unit::Unit;

/// One rest step takes this many time units divided by toughness.
pub const REST_STEP_FACTOR: f64 = 0.2 * 200.0;
/// Stamina restored per rest step.
pub const STAMINA_PER_STEP: u32 = 2;
/// Hitpoints restored per rest step once stamina is full.
pub const HITPOINTS_PER_STEP: u32 = 1;

impl Unit {
    /// Start resting.
    ///
    /// A moving unit finishes its current leg first; if it has not reached
    /// its destination by then, it walks on once fully rested.
    pub fn rest(&mut self) {
        if !self.alive || self.is_falling() || !self.can_be_interrupted(Interruptor::Resting) {
            return;
        }
        if self.is_moving() {
            self.rest_requested = true;
            return;
        }
        self.begin_rest();
    }

    /// Time one rest step takes.
    pub fn rest_step_duration(&self) -> f64 {
        REST_STEP_FACTOR / f64::from(self.toughness())
    }

    pub(crate) fn begin_rest(&mut self) {
        self.work_target = None;
        self.rest_timer = 0.0;
        self.progress = 0.0;
        self.time_needed = self.rest_step_duration();
        self.set_activity(Activity::InitResting);
    }

    pub(crate) fn advance_rest(&mut self, dt: f64, terrain: &Terrain) {
        self.progress += dt;
        if self.progress < self.time_needed {
            return;
        }
        self.progress -= self.time_needed;
        self.time_needed = self.rest_step_duration();
        if self.activity == Activity::InitResting {
            self.set_activity(Activity::Resting);
        }
        self.restore(terrain);
    }

    fn restore(&mut self, terrain: &Terrain) {
        let max = self.max_hitpoints();
        if self.stamina < max {
            self.stamina = (self.stamina + STAMINA_PER_STEP).min(max);
        } else if self.hitpoints < max {
            self.hitpoints = (self.hitpoints + HITPOINTS_PER_STEP).min(max);
        } else {
            self.finish_rest(terrain);
        }
    }

    fn finish_rest(&mut self, terrain: &Terrain) {
        self.progress = 0.0;
        let resume = self.resume.take();
        let destination = self.destination.take();
        self.set_activity(Activity::Idle);
        if resume == Some(Activity::Moving)
            && let Some(destination) = destination
            && let Err(e) = self.move_to(destination, terrain)
        {
            tracing::debug!(unit = %self.id, error = %e, "could not resume moving");
        }
    }
}

#[cfg(test)]
mod tests {
    use hb_core::{CubeCoord, CubeType};

    use super::*;
    use crate::config::SimConfig;
    use crate::unit::{Attributes, UnitId};
    use crate::world::World;

    fn world() -> World {
        let terrain = Terrain::from_fn(8, 8, 3, |c| {
            if c.z == 0 {
                CubeType::Rock
            } else {
                CubeType::Air
            }
        })
        .unwrap();
        World::new(terrain, SimConfig::default())
    }

    fn spawn(world: &mut World) -> UnitId {
        world
            .create_unit(
                "Sleepy",
                CubeCoord::new(1, 1, 1),
                Attributes::new(50, 50, 50, 100),
                false,
            )
            .unwrap()
    }

    #[test]
    fn rest_restores_both_pools() {
        let mut w = world();
        let id = spawn(&mut w);
        let u = w.unit_mut(id).unwrap();
        let max = u.max_hitpoints();
        u.set_hitpoints(max / 2);
        u.set_stamina(max / 2);
        u.rest();
        assert_eq!(u.activity(), Activity::InitResting);

        let mut saw_resting = false;
        for _ in 0..2000 {
            w.advance_time(0.1).unwrap();
            let u = w.unit(id).unwrap();
            assert!(u.hitpoints() <= max && u.stamina() <= max);
            saw_resting |= u.activity() == Activity::Resting;
            if u.activity() == Activity::Idle {
                break;
            }
        }
        let u = w.unit(id).unwrap();
        assert!(saw_resting);
        assert_eq!(u.activity(), Activity::Idle);
        assert_eq!(u.hitpoints(), max);
        assert_eq!(u.stamina(), max);
    }

    #[test]
    fn stamina_comes_back_before_hitpoints() {
        let mut w = world();
        let id = spawn(&mut w);
        let u = w.unit_mut(id).unwrap();
        let max = u.max_hitpoints();
        u.set_hitpoints(max - 5);
        u.set_stamina(max - 10);
        u.rest();
        // One rest step is 0.4 time units at toughness 100.
        for _ in 0..9 {
            w.advance_time(0.1).unwrap();
        }
        let u = w.unit(id).unwrap();
        assert_eq!(u.stamina(), max - 6);
        assert_eq!(u.hitpoints(), max - 5);
    }

    #[test]
    fn initial_rest_ignores_moving_and_working() {
        let mut w = world();
        let id = spawn(&mut w);
        w.rest(id).unwrap();
        let before = w.unit(id).unwrap().clone();
        w.move_to(id, CubeCoord::new(5, 5, 1)).unwrap();
        w.work(id).unwrap();
        w.rest(id).unwrap();
        let after = w.unit(id).unwrap();
        assert_eq!(after.activity(), Activity::InitResting);
        assert_eq!(after.progress(), before.progress());
        assert_eq!(after.destination(), None);
    }

    #[test]
    fn resting_twice_is_a_no_op() {
        let mut w = world();
        let id = spawn(&mut w);
        let u = w.unit_mut(id).unwrap();
        u.set_stamina(0);
        u.rest();
        for _ in 0..6 {
            w.advance_time(0.1).unwrap();
        }
        let u = w.unit_mut(id).unwrap();
        assert_eq!(u.activity(), Activity::Resting);
        let progress = u.progress();
        let stamina = u.stamina();
        u.rest();
        assert_eq!(u.activity(), Activity::Resting);
        assert_eq!(u.progress(), progress);
        assert_eq!(u.stamina(), stamina);
    }

    #[test]
    fn rest_while_moving_waits_for_the_cube_center() {
        let mut w = world();
        let id = spawn(&mut w);
        w.move_to(id, CubeCoord::new(5, 1, 1)).unwrap();
        w.advance_time(0.1).unwrap();
        w.rest(id).unwrap();
        assert!(w.unit(id).unwrap().is_moving());

        // The first leg takes 2/3 of a time unit.
        for _ in 0..6 {
            w.advance_time(0.1).unwrap();
        }
        let u = w.unit(id).unwrap();
        assert_eq!(u.activity(), Activity::InitResting);
        assert_eq!(u.position(), CubeCoord::new(2, 1, 1).center());

        // Already full, so the unit walks on after the first rest step.
        for _ in 0..200 {
            w.advance_time(0.1).unwrap();
        }
        let u = w.unit(id).unwrap();
        assert_eq!(u.cube(), CubeCoord::new(5, 1, 1));
        assert_eq!(u.activity(), Activity::Idle);
    }
}
