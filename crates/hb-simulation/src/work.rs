use std::fmt;

use hb_core::{CubeCoord, CubeType, Terrain};

use crate::activity::{Activity, Interruptor};
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::object::ObjectKind;
use crate::unit::Unit;

/// A work task takes this many time units divided by strength.
pub const WORK_FACTOR: f64 = 500.0;
/// Experience for every completed work task.
pub const WORK_EXPERIENCE: u32 = 10;

/// What a completed work task did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    /// The carried object was put down.
    Dropped(ObjectKind),
    /// A boulder and a log were turned into better equipment.
    Upgraded,
    /// An object was picked up.
    PickedUp(ObjectKind),
    /// A rock or tree was removed.
    Dug(CubeType),
    /// There was nothing to do.
    Nothing,
}

impl fmt::Display for WorkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dropped(kind) => write!(f, "dropped a {kind}"),
            Self::Upgraded => f.write_str("upgraded equipment"),
            Self::PickedUp(kind) => write!(f, "picked up a {kind}"),
            Self::Dug(kind) => write!(f, "removed a {kind}"),
            Self::Nothing => f.write_str("found nothing to do"),
        }
    }
}

impl Unit {
    /// Work on the cube the unit stands in.
    pub fn work(&mut self, terrain: &Terrain) -> SimResult<()> {
        self.work_at(self.cube(), terrain)
    }

    /// Work on `cube`, which must be the unit's own cube or a neighbor.
    pub fn work_at(&mut self, cube: CubeCoord, terrain: &Terrain) -> SimResult<()> {
        self.ensure_alive()?;
        if !terrain.contains(cube) {
            return Err(SimError::OutOfBounds(cube.center()));
        }
        if !self.is_adjacent_to_cube(cube) {
            return Err(SimError::CubeNotAdjacent { cube });
        }
        if self.is_falling() || !self.can_be_interrupted(Interruptor::Working) {
            return Ok(());
        }
        self.finish_movement();
        self.resume = None;
        self.work_target = Some(cube);
        self.progress = 0.0;
        self.time_needed = self.work_duration();
        self.face(cube.center());
        self.set_activity(Activity::Working);
        Ok(())
    }

    /// Time a work task takes.
    pub fn work_duration(&self) -> f64 {
        WORK_FACTOR / f64::from(self.strength())
    }

    /// The cube being worked on.
    pub fn work_target(&self) -> Option<CubeCoord> {
        self.work_target
    }

    pub(crate) fn advance_work(&mut self, dt: f64, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.progress += dt;
        if self.progress < self.time_needed {
            return Ok(());
        }
        let target = self.work_target.take().unwrap_or(self.cube());
        self.progress = 0.0;
        self.set_activity(Activity::Idle);

        let outcome = self.complete_work(target, ctx)?;
        self.gain_experience(WORK_EXPERIENCE, ctx.rng);
        tracing::debug!(unit = %self.id, cube = %target, %outcome, "work done");
        ctx.emit(
            SimEventKind::WorkCompleted {
                unit: self.id,
                cube: target,
            },
            format!("{} {outcome} at {target}", self.name),
        );
        Ok(())
    }

    fn complete_work(&mut self, target: CubeCoord, ctx: &mut SimContext<'_>) -> SimResult<WorkOutcome> {
        if let Some(mut object) = self.take_carried() {
            let spot = if ctx.terrain.is_passable(target) {
                target
            } else {
                self.cube()
            };
            let kind = object.kind();
            object.put_down(spot.center());
            ctx.objects.insert(object);
            return Ok(WorkOutcome::Dropped(kind));
        }

        let cube_type = ctx.terrain.cube_type(target)?;
        let boulder = ctx.objects.find_at(target, ObjectKind::Boulder);
        let log = ctx.objects.find_at(target, ObjectKind::Log);

        if cube_type == CubeType::Workshop
            && let (Some(boulder), Some(log)) = (boulder, log)
        {
            ctx.objects.remove(boulder);
            ctx.objects.remove(log);
            self.set_toughness(self.toughness() + 1);
            self.set_weight(self.weight() + 1);
            return Ok(WorkOutcome::Upgraded);
        }

        if let Some(id) = boulder.or(log)
            && let Some(mut object) = ctx.objects.remove(id)
        {
            let kind = object.kind();
            object.pick_up(self.id);
            self.carried = Some(object);
            return Ok(WorkOutcome::PickedUp(kind));
        }

        if matches!(cube_type, CubeType::Rock | CubeType::Tree) {
            ctx.destroy_cube(target)?;
            return Ok(WorkOutcome::Dug(cube_type));
        }
        Ok(WorkOutcome::Nothing)
    }
}
