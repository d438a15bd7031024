use std::collections::{BTreeMap, VecDeque};

use hb_core::{CubeCoord, CubeType, Terrain};
use rand::Rng;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::faction::FactionRegistry;
use crate::object::{ObjectKind, ObjectStore};
use crate::unit::{Unit, UnitId};

/// Chance that a destroyed rock or tree leaves a boulder or log behind.
pub const DROP_CHANCE: f64 = 0.25;

/// Mutable view of the world handed to a unit during its update.
///
/// `units` holds every unit except the one being updated.
pub struct SimContext<'a> {
    /// The terrain.
    pub terrain: &'a mut Terrain,
    /// All other units, dead or alive.
    pub units: &'a mut BTreeMap<UnitId, Unit>,
    /// Objects lying in the world.
    pub objects: &'a mut ObjectStore,
    /// Faction registry.
    pub factions: &'a mut FactionRegistry,
    /// Simulation clock.
    pub clock: &'a SimClock,
    /// Event log.
    pub events: &'a mut EventLog,
    /// The world's random number generator.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Turn a rock or tree into air, maybe leaving a boulder or log behind,
    /// and collapse whatever lost its support as a result.
    pub fn destroy_cube(&mut self, cube: CubeCoord) -> SimResult<()> {
        let kind = self.terrain.cube_type(cube)?;
        if !kind.is_solid() {
            return Ok(());
        }
        let detached = self.terrain.set_cube_type(cube, CubeType::Air)?;
        self.emit(
            SimEventKind::CubeDestroyed { cube, kind },
            format!("{kind} at {cube} destroyed"),
        );
        self.maybe_drop(cube, kind);
        self.collapse(detached)
    }

    /// Turn every detached cube into air. Each one may leave an object behind.
    pub fn collapse(&mut self, detached: Vec<CubeCoord>) -> SimResult<()> {
        if detached.is_empty() {
            return Ok(());
        }
        let mut pending: VecDeque<CubeCoord> = detached.into();
        let mut collapsed = Vec::new();
        while let Some(cube) = pending.pop_front() {
            let kind = self.terrain.cube_type(cube)?;
            if !kind.is_solid() {
                continue;
            }
            pending.extend(self.terrain.set_cube_type(cube, CubeType::Air)?);
            self.maybe_drop(cube, kind);
            collapsed.push(cube);
        }
        tracing::info!(count = collapsed.len(), "cave-in");
        let description = format!("{} cube(s) caved in", collapsed.len());
        self.emit(SimEventKind::CaveIn { cubes: collapsed }, description);
        Ok(())
    }

    fn maybe_drop(&mut self, cube: CubeCoord, kind: CubeType) {
        if let Some(object) = ObjectKind::from_cube(kind)
            && self.rng.random_bool(DROP_CHANCE)
        {
            let id = self.objects.spawn(object, cube, self.rng);
            self.emit(
                SimEventKind::ObjectSpawned { object: id, kind: object },
                format!("a {object} fell out of {cube}"),
            );
        }
    }
}
