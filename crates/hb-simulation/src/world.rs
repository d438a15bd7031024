use std::collections::BTreeMap;

use hb_core::{CubeCoord, CubeType, Terrain, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::{SimClock, validate_duration};
use crate::combat::begin_attack;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::faction::{Faction, FactionRegistry};
use crate::object::{CarryableObject, ObjectId, ObjectKind, ObjectStore};
use crate::unit::{Unit, UnitId};

/// The simulated world.
///
/// Owns the terrain, every unit, object and faction, the clock, the RNG
/// and the event log. Drives the per-tick loop.
pub struct World {
    pub(crate) terrain: Terrain,
    pub(crate) units: BTreeMap<UnitId, Unit>,
    pub(crate) objects: ObjectStore,
    pub(crate) factions: FactionRegistry,
    pub(crate) clock: SimClock,
    pub(crate) events: EventLog,
    pub(crate) rng: StdRng,
    pub(crate) config: SimConfig,
    pub(crate) next_unit_id: u64,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.clock.tick())
            .field("units", &self.units.len())
            .field("objects", &self.objects.len())
            .field("factions", &self.factions.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl World {
    /// Create an empty world on the given terrain.
    pub fn new(terrain: Terrain, config: SimConfig) -> Self {
        Self {
            terrain,
            units: BTreeMap::new(),
            objects: ObjectStore::new(),
            factions: FactionRegistry::new(config.max_faction_size),
            clock: SimClock::new(),
            events: EventLog::new(config.max_events),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            next_unit_id: 0,
        }
    }

    fn context(&mut self) -> SimContext<'_> {
        SimContext {
            terrain: &mut self.terrain,
            units: &mut self.units,
            objects: &mut self.objects,
            factions: &mut self.factions,
            clock: &self.clock,
            events: &mut self.events,
            rng: &mut self.rng,
        }
    }

    pub(crate) fn push_event(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    // --- terrain ---

    /// The terrain.
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Type of the given cube.
    pub fn cube_type(&self, cube: CubeCoord) -> SimResult<CubeType> {
        Ok(self.terrain.cube_type(cube)?)
    }

    /// Change a cube's type. Solid cubes that lose their connection to the
    /// border as a result cave in immediately.
    pub fn set_cube_type(&mut self, cube: CubeCoord, kind: CubeType) -> SimResult<()> {
        let detached = self.terrain.set_cube_type(cube, kind)?;
        self.context().collapse(detached)
    }

    /// Returns true if the cube is inside the world and passable.
    pub fn is_passable(&self, cube: CubeCoord) -> bool {
        self.terrain.is_passable(cube)
    }

    /// Returns true if the cube is solid and connected to the border.
    pub fn is_solid_connected_to_border(&self, cube: CubeCoord) -> bool {
        self.terrain.is_solid_connected_to_border(cube)
    }

    /// Returns true if a unit may occupy the given position.
    pub fn is_valid_position(&self, position: Vector3) -> bool {
        self.terrain.is_valid_position(position)
    }

    // --- units, objects, factions ---

    /// Look up a unit, dead or alive.
    pub fn unit(&self, id: UnitId) -> SimResult<&Unit> {
        self.units.get(&id).ok_or(SimError::UnitNotFound(id))
    }

    /// Look up a unit mutably.
    pub fn unit_mut(&mut self, id: UnitId) -> SimResult<&mut Unit> {
        self.units.get_mut(&id).ok_or(SimError::UnitNotFound(id))
    }

    /// All live units in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(|u| u.is_alive())
    }

    /// Objects lying in the world. Carried objects are not included.
    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    /// All boulders lying in the world.
    pub fn boulders(&self) -> Vec<&CarryableObject> {
        self.objects.boulders().collect()
    }

    /// All logs lying in the world.
    pub fn logs(&self) -> Vec<&CarryableObject> {
        self.objects.logs().collect()
    }

    /// Put a new boulder or log of random weight at the center of `cube`.
    pub fn place_object(&mut self, kind: ObjectKind, cube: CubeCoord) -> SimResult<ObjectId> {
        if !self.terrain.is_passable(cube) {
            return Err(SimError::OutOfBounds(cube.center()));
        }
        Ok(self.objects.spawn(kind, cube, &mut self.rng))
    }

    /// Faction registry.
    pub fn factions(&self) -> &FactionRegistry {
        &self.factions
    }

    /// Factions with at least one member.
    pub fn active_factions(&self) -> Vec<&Faction> {
        self.factions.active().collect()
    }

    /// Simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Everything that happened so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // --- ticking ---

    /// Advance every live unit, then every object, by `dt`.
    ///
    /// A unit whose update fails is logged and skipped; the rest of the tick
    /// goes on.
    pub fn advance_time(&mut self, dt: f64) -> SimResult<()> {
        validate_duration(dt)?;
        self.clock.advance(dt);

        let ids: Vec<UnitId> = self.units().map(Unit::id).collect();
        for id in ids {
            if let Err(e) = self.step_unit(id, dt) {
                tracing::warn!(unit = %id, error = %e, "unit update failed");
                self.push_event(
                    SimEventKind::TickFailed {
                        unit: id,
                        error: e.to_string(),
                    },
                    format!("{id} skipped: {e}"),
                );
            }
        }
        self.objects.advance_all(dt, &self.terrain);
        Ok(())
    }

    /// Advance a single unit by `dt`, reporting any failure.
    pub fn advance_unit(&mut self, id: UnitId, dt: f64) -> SimResult<()> {
        validate_duration(dt)?;
        self.step_unit(id, dt)
    }

    /// Take the unit out of the map so the context can lend out the others.
    fn step_unit(&mut self, id: UnitId, dt: f64) -> SimResult<()> {
        let mut unit = self.units.remove(&id).ok_or(SimError::UnitNotFound(id))?;
        let result = unit.advance_time(dt, &mut self.context());
        self.units.insert(id, unit);
        result
    }

    // --- commands ---

    fn unit_on_terrain(&mut self, id: UnitId) -> SimResult<(&mut Unit, &Terrain)> {
        let unit = self.units.get_mut(&id).ok_or(SimError::UnitNotFound(id))?;
        Ok((unit, &self.terrain))
    }

    /// Walk a unit toward `target`.
    pub fn move_to(&mut self, id: UnitId, target: CubeCoord) -> SimResult<()> {
        let (unit, terrain) = self.unit_on_terrain(id)?;
        unit.move_to(target, terrain)
    }

    /// Move a unit to the neighboring cube at the given offset.
    pub fn move_to_adjacent(&mut self, id: UnitId, dx: i32, dy: i32, dz: i32) -> SimResult<()> {
        let (unit, terrain) = self.unit_on_terrain(id)?;
        unit.move_to_adjacent(dx, dy, dz, terrain)
    }

    /// Let a unit work on its own cube.
    pub fn work(&mut self, id: UnitId) -> SimResult<()> {
        let (unit, terrain) = self.unit_on_terrain(id)?;
        unit.work(terrain)
    }

    /// Let a unit work on a neighboring cube.
    pub fn work_at(&mut self, id: UnitId, cube: CubeCoord) -> SimResult<()> {
        let (unit, terrain) = self.unit_on_terrain(id)?;
        unit.work_at(cube, terrain)
    }

    /// Let a unit rest.
    pub fn rest(&mut self, id: UnitId) -> SimResult<()> {
        let unit = self.unit_mut(id)?;
        unit.ensure_alive()?;
        unit.rest();
        Ok(())
    }

    /// Start sprinting.
    pub fn start_sprinting(&mut self, id: UnitId) -> SimResult<()> {
        self.unit_mut(id)?.start_sprinting();
        Ok(())
    }

    /// Stop sprinting.
    pub fn stop_sprinting(&mut self, id: UnitId) -> SimResult<()> {
        self.unit_mut(id)?.stop_sprinting();
        Ok(())
    }

    /// Turn a unit's autonomous behavior on or off.
    pub fn set_default_behavior(&mut self, id: UnitId, enabled: bool) -> SimResult<()> {
        self.unit_mut(id)?.set_default_behavior(enabled);
        Ok(())
    }

    /// Place a unit at `position` if the terrain allows it.
    pub fn set_unit_position(&mut self, id: UnitId, position: Vector3) -> SimResult<()> {
        let (unit, terrain) = self.unit_on_terrain(id)?;
        unit.set_position(position, terrain)
    }

    /// Let `attacker` attack `defender`.
    pub fn attack(&mut self, attacker: UnitId, defender: UnitId) -> SimResult<()> {
        if attacker == defender {
            return Err(SimError::SelfAttack(attacker));
        }
        let mut a = self
            .units
            .remove(&attacker)
            .ok_or(SimError::UnitNotFound(attacker))?;
        let result = match self.units.get_mut(&defender) {
            Some(d) => begin_attack(&mut a, d),
            None => Err(SimError::UnitNotFound(defender)),
        };
        self.units.insert(attacker, a);
        result
    }
}
