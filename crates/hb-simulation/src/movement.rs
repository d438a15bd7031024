//! Kinematics: legs between neighboring cubes, multi-cube moves, sprinting.

use hb_core::{CubeCoord, Terrain, Vector3};

use crate::activity::{Activity, Interruptor};
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::unit::Unit;

/// Base speed is this factor times `(strength + agility) / weight`.
pub const BASE_SPEED_FACTOR: f64 = 0.75;
/// Speed multiplier when a leg goes down a level.
pub const DESCEND_FACTOR: f64 = 1.2;
/// Speed multiplier when a leg goes up a level.
pub const ASCEND_FACTOR: f64 = 0.5;
/// Speed multiplier while sprinting.
pub const SPRINT_FACTOR: f64 = 2.0;
/// Sprinting costs one stamina point per this much time.
pub const SPRINT_DRAIN_INTERVAL: f64 = 0.1;
/// Experience for every completed leg.
pub const MOVE_EXPERIENCE: u32 = 1;

/// How fast a moving unit goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gait {
    /// Normal speed.
    #[default]
    Walking,
    /// Double speed, draining stamina.
    Sprinting,
}

impl Unit {
    /// Walking speed on level ground.
    pub fn base_speed(&self) -> f64 {
        BASE_SPEED_FACTOR * f64::from(self.strength() + self.agility())
            / f64::from(self.total_weight())
    }

    /// Speed for a leg going `dz` levels up (positive) or down (negative).
    pub fn leg_speed(&self, dz: f64) -> f64 {
        let slope = if dz < -1e-9 {
            DESCEND_FACTOR
        } else if dz > 1e-9 {
            ASCEND_FACTOR
        } else {
            1.0
        };
        let gait = match self.gait {
            Gait::Walking => 1.0,
            Gait::Sprinting => SPRINT_FACTOR,
        };
        self.base_speed() * slope * gait
    }

    /// Returns true while sprinting.
    pub fn is_sprinting(&self) -> bool {
        self.gait == Gait::Sprinting
    }

    /// The cube this unit is ultimately heading for.
    pub fn destination(&self) -> Option<CubeCoord> {
        self.destination
    }

    /// Start sprinting. Only a moving unit with stamina left can sprint.
    pub fn start_sprinting(&mut self) {
        if self.is_moving() && self.stamina > 0 && self.gait == Gait::Walking {
            self.gait = Gait::Sprinting;
            self.sprint_time = 0.0;
            self.retime_leg();
        }
    }

    /// Go back to walking.
    pub fn stop_sprinting(&mut self) {
        if self.gait == Gait::Sprinting {
            self.gait = Gait::Walking;
            self.sprint_time = 0.0;
            self.retime_leg();
        }
    }

    /// Move to the neighboring cube at offset `(dx, dy, dz)`, each in `-1..=1`.
    ///
    /// Ignored while the unit cannot be interrupted for moving.
    pub fn move_to_adjacent(&mut self, dx: i32, dy: i32, dz: i32, terrain: &Terrain) -> SimResult<()> {
        self.ensure_alive()?;
        if [dx, dy, dz].iter().any(|d| d.abs() > 1) {
            return Err(SimError::OutOfBounds(self.cube().offset(dx, dy, dz).center()));
        }
        if self.is_falling() || !self.can_be_interrupted(Interruptor::Moving) {
            return Ok(());
        }
        self.destination = None;
        self.begin_leg((dx, dy, dz), terrain)
    }

    /// Walk toward `target`, one neighboring cube at a time.
    ///
    /// Does nothing if the unit is already moving or cannot be interrupted.
    /// Fails if the target is outside the world or the first step is blocked.
    pub fn move_to(&mut self, target: CubeCoord, terrain: &Terrain) -> SimResult<()> {
        self.ensure_alive()?;
        if !terrain.contains(target) {
            return Err(SimError::OutOfBounds(target.center()));
        }
        if self.is_moving() || self.is_falling() || !self.can_be_interrupted(Interruptor::Moving) {
            return Ok(());
        }
        let here = self.cube();
        if target == here {
            self.destination = None;
            return Ok(());
        }
        self.destination = Some(target);
        if let Err(e) = self.begin_leg(here.step_toward(target), terrain) {
            self.destination = None;
            return Err(e);
        }
        Ok(())
    }

    /// Start a leg toward the neighboring cube at the given offset.
    pub(crate) fn begin_leg(&mut self, (dx, dy, dz): (i32, i32, i32), terrain: &Terrain) -> SimResult<()> {
        let target = self.cube().offset(dx, dy, dz);
        if !terrain.is_valid_cube(target) {
            return Err(SimError::OutOfBounds(target.center()));
        }
        if !self.is_moving() {
            self.work_target = None;
            self.resume = None;
            self.progress = 0.0;
        }
        self.leg_target = Some(target);
        self.moving_time = 0.0;
        self.retime_leg();
        if self.velocity.x != 0.0 || self.velocity.y != 0.0 {
            self.orientation = self.velocity.y.atan2(self.velocity.x);
        }
        self.set_activity(Activity::Moving);
        Ok(())
    }

    /// Recompute velocity and leg duration from the remaining distance.
    fn retime_leg(&mut self) {
        let Some(target) = self.leg_target else {
            return;
        };
        let remaining = target.center() - self.position;
        let speed = self.leg_speed(remaining.z);
        self.velocity = remaining.normalize() * speed;
        self.time_needed = self.moving_time + remaining.norm() / speed;
    }

    /// Stop in place without touching the destination.
    pub(crate) fn halt(&mut self) {
        self.leg_target = None;
        self.velocity = Vector3::ZERO;
        self.moving_time = 0.0;
        self.gait = Gait::Walking;
        self.sprint_time = 0.0;
    }

    /// Stop moving altogether and become idle if moving.
    pub(crate) fn finish_movement(&mut self) {
        self.halt();
        self.destination = None;
        self.rest_requested = false;
        if self.is_moving() {
            self.set_activity(Activity::Idle);
        }
    }

    pub(crate) fn advance_movement(&mut self, dt: f64, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let Some(target) = self.leg_target else {
            self.finish_movement();
            return Ok(());
        };

        if self.gait == Gait::Sprinting {
            self.sprint_time += dt;
            while self.sprint_time >= SPRINT_DRAIN_INTERVAL && self.stamina > 0 {
                self.sprint_time -= SPRINT_DRAIN_INTERVAL;
                self.stamina -= 1;
            }
            if self.stamina == 0 {
                self.stop_sprinting();
            }
        }

        self.moving_time += dt;
        if self.moving_time >= self.time_needed {
            self.arrive(target, ctx);
            return Ok(());
        }

        let next = self.position + self.velocity * dt;
        if !ctx.terrain.is_valid_position(next) {
            self.finish_movement();
            return Err(SimError::OutOfBounds(next));
        }
        self.position = next;
        Ok(())
    }

    fn arrive(&mut self, target: CubeCoord, ctx: &mut SimContext<'_>) {
        self.position = target.center();
        self.leg_target = None;
        self.velocity = Vector3::ZERO;
        self.gain_experience(MOVE_EXPERIENCE, ctx.rng);

        let unfinished = self.destination.filter(|d| *d != target);
        if self.rest_requested {
            self.rest_requested = false;
            self.destination = unfinished;
            self.halt();
            self.begin_rest();
            if unfinished.is_some() {
                self.resume = Some(Activity::Moving);
            }
            return;
        }

        match unfinished {
            Some(destination) => {
                if let Err(e) = self.begin_leg(target.step_toward(destination), ctx.terrain) {
                    tracing::debug!(unit = %self.id, error = %e, "path blocked");
                    self.finish_movement();
                }
            }
            None => self.finish_movement(),
        }
    }
}
