use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};
use std::fmt;

use hb_core::{CubeCoord, Terrain, Vector3};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::activity::{Activity, Interruptor};
use crate::clock::validate_duration;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::faction::{FactionId, FactionRegistry};
use crate::fall::{FALL_SPEED, fall_step, must_fall};
use crate::movement::Gait;
use crate::object::{CarryableObject, ObjectStore};

/// Smallest value of any attribute.
pub const MIN_ATTRIBUTE: u32 = 1;
/// Largest value of any attribute.
pub const MAX_ATTRIBUTE: u32 = 200;
/// Smallest attribute value a new unit may start with.
pub const MIN_INITIAL_ATTRIBUTE: u32 = 25;
/// Largest attribute value a new unit may start with.
pub const MAX_INITIAL_ATTRIBUTE: u32 = 100;
/// Game time between two forced rests.
pub const REST_INTERVAL: f64 = 180.0;
/// Experience needed for one attribute point.
pub const EXPERIENCE_PER_LEVEL: u32 = 10;
/// Hitpoints lost per cube level fallen.
pub const FALL_DAMAGE_PER_LEVEL: u32 = 10;

/// Identifier of a unit, unique within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// The four primary attributes of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attributes {
    /// Body weight, not counting a carried object.
    pub weight: u32,
    /// Strength.
    pub strength: u32,
    /// Agility.
    pub agility: u32,
    /// Toughness.
    pub toughness: u32,
}

impl Attributes {
    /// Bundle four attribute values.
    pub const fn new(weight: u32, strength: u32, agility: u32, toughness: u32) -> Self {
        Self {
            weight,
            strength,
            agility,
            toughness,
        }
    }

    /// The attributes a new unit actually starts with.
    ///
    /// Values outside the initial range fall back to its minimum, and weight
    /// is raised to the minimum its strength and agility require.
    pub fn initial(self) -> Self {
        let fix = |v: u32| {
            if (MIN_INITIAL_ATTRIBUTE..=MAX_INITIAL_ATTRIBUTE).contains(&v) {
                v
            } else {
                MIN_INITIAL_ATTRIBUTE
            }
        };
        let strength = fix(self.strength);
        let agility = fix(self.agility);
        let weight = fix(self.weight).max(min_weight(strength, agility));
        Self::new(weight, strength, agility, fix(self.toughness))
    }
}

/// The lowest weight allowed for the given strength and agility.
pub fn min_weight(strength: u32, agility: u32) -> u32 {
    (strength + agility) / 2
}

/// Maximum hitpoints and stamina: `ceil(weight * toughness / 50)`.
pub fn max_hitpoints(weight: u32, toughness: u32) -> u32 {
    weight.saturating_mul(toughness).div_ceil(50)
}

/// Check a unit name: at least two characters, starting with an uppercase
/// letter, followed by letters, spaces and quotes only.
pub fn validate_name(name: &str) -> SimResult<()> {
    let mut chars = name.chars();
    let valid = name.chars().count() >= 2
        && chars.next().is_some_and(char::is_uppercase)
        && chars.all(|c| c.is_alphabetic() || matches!(c, ' ' | '\'' | '"'));
    if valid {
        Ok(())
    } else {
        Err(SimError::InvalidName(name.to_string()))
    }
}

fn clamp_attribute(value: u32) -> u32 {
    value.clamp(MIN_ATTRIBUTE, MAX_ATTRIBUTE)
}

/// An autonomous agent living in the world.
///
/// A unit never holds a reference to the world. Everything it needs during
/// a tick comes in through a [`SimContext`], and other units, objects and
/// factions are referred to by id.
#[derive(Debug, Clone)]
pub struct Unit {
    pub(crate) id: UnitId,
    pub(crate) name: String,
    pub(crate) attributes: Attributes,
    pub(crate) hitpoints: u32,
    pub(crate) stamina: u32,
    pub(crate) position: Vector3,
    pub(crate) velocity: Vector3,
    pub(crate) orientation: f64,
    pub(crate) activity: Activity,
    pub(crate) progress: f64,
    pub(crate) time_needed: f64,
    pub(crate) destination: Option<CubeCoord>,
    pub(crate) leg_target: Option<CubeCoord>,
    pub(crate) moving_time: f64,
    pub(crate) gait: Gait,
    pub(crate) sprint_time: f64,
    pub(crate) rest_requested: bool,
    pub(crate) resume: Option<Activity>,
    pub(crate) opponent: Option<UnitId>,
    pub(crate) carried: Option<CarryableObject>,
    pub(crate) experience: u32,
    pub(crate) faction: Option<FactionId>,
    pub(crate) alive: bool,
    pub(crate) default_behavior: bool,
    pub(crate) work_target: Option<CubeCoord>,
    pub(crate) rest_timer: f64,
    pub(crate) falling_from: Option<i32>,
}

impl Unit {
    /// Create a unit standing at the center of `cube`.
    ///
    /// Fails if the name is invalid or the cube is not a valid place to stand.
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        cube: CubeCoord,
        attributes: Attributes,
        default_behavior: bool,
        terrain: &Terrain,
    ) -> SimResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        if !terrain.is_valid_cube(cube) {
            return Err(SimError::OutOfBounds(cube.center()));
        }
        let attributes = attributes.initial();
        let max = max_hitpoints(attributes.weight, attributes.toughness);
        Ok(Self {
            id,
            name,
            attributes,
            hitpoints: max,
            stamina: max,
            position: cube.center(),
            velocity: Vector3::ZERO,
            orientation: FRAC_PI_2,
            activity: Activity::Idle,
            progress: 0.0,
            time_needed: 0.0,
            destination: None,
            leg_target: None,
            moving_time: 0.0,
            gait: Gait::Walking,
            sprint_time: 0.0,
            rest_requested: false,
            resume: None,
            opponent: None,
            carried: None,
            experience: 0,
            faction: None,
            alive: true,
            default_behavior,
            work_target: None,
            rest_timer: 0.0,
            falling_from: None,
        })
    }

    // --- identity and attributes ---

    /// This unit's id.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// This unit's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All four attributes.
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    /// Body weight, not counting a carried object.
    pub fn weight(&self) -> u32 {
        self.attributes.weight
    }

    /// Body weight plus the weight of the carried object.
    pub fn total_weight(&self) -> u32 {
        let carried = self.carried.as_ref().map_or(0, CarryableObject::weight);
        self.attributes.weight.saturating_add(carried)
    }

    /// Strength.
    pub fn strength(&self) -> u32 {
        self.attributes.strength
    }

    /// Agility.
    pub fn agility(&self) -> u32 {
        self.attributes.agility
    }

    /// Toughness.
    pub fn toughness(&self) -> u32 {
        self.attributes.toughness
    }

    /// Set the weight, clamped to the attribute range.
    ///
    /// While not carrying anything, a weight below the minimum for the
    /// current strength and agility is ignored. While carrying, only the
    /// lower bound applies.
    pub fn set_weight(&mut self, weight: u32) {
        if self.is_carrying() {
            self.attributes.weight = weight.max(MIN_ATTRIBUTE);
        } else {
            let weight = clamp_attribute(weight);
            if weight < min_weight(self.strength(), self.agility()) {
                return;
            }
            self.attributes.weight = weight;
        }
        self.clamp_pools();
    }

    /// Set the strength, clamped to the attribute range.
    pub fn set_strength(&mut self, strength: u32) {
        self.attributes.strength = clamp_attribute(strength);
        self.enforce_min_weight();
    }

    /// Set the agility, clamped to the attribute range.
    pub fn set_agility(&mut self, agility: u32) {
        self.attributes.agility = clamp_attribute(agility);
        self.enforce_min_weight();
    }

    /// Set the toughness, clamped to the attribute range.
    pub fn set_toughness(&mut self, toughness: u32) {
        self.attributes.toughness = clamp_attribute(toughness);
        self.clamp_pools();
    }

    fn enforce_min_weight(&mut self) {
        if !self.is_carrying() {
            let min = clamp_attribute(min_weight(self.strength(), self.agility()));
            self.attributes.weight = self.attributes.weight.min(MAX_ATTRIBUTE).max(min);
        }
        self.clamp_pools();
    }

    // --- hitpoints and stamina ---

    /// Maximum hitpoints.
    pub fn max_hitpoints(&self) -> u32 {
        max_hitpoints(self.weight(), self.toughness())
    }

    /// Maximum stamina. Always equal to maximum hitpoints.
    pub fn max_stamina(&self) -> u32 {
        self.max_hitpoints()
    }

    /// Current hitpoints.
    pub fn hitpoints(&self) -> u32 {
        self.hitpoints
    }

    /// Current stamina.
    pub fn stamina(&self) -> u32 {
        self.stamina
    }

    /// Set hitpoints, clamped to `[0, max]`.
    pub fn set_hitpoints(&mut self, hitpoints: u32) {
        self.hitpoints = hitpoints.min(self.max_hitpoints());
    }

    /// Set stamina, clamped to `[0, max]`.
    pub fn set_stamina(&mut self, stamina: u32) {
        self.stamina = stamina.min(self.max_stamina());
    }

    fn clamp_pools(&mut self) {
        self.hitpoints = self.hitpoints.min(self.max_hitpoints());
        self.stamina = self.stamina.min(self.max_stamina());
    }

    // --- position and orientation ---

    /// Current position.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// The cube the unit occupies.
    pub fn cube(&self) -> CubeCoord {
        self.position.cube()
    }

    /// Move the unit to `position` if the terrain allows standing there.
    pub fn set_position(&mut self, position: Vector3, terrain: &Terrain) -> SimResult<()> {
        if !terrain.is_valid_position(position) {
            return Err(SimError::OutOfBounds(position));
        }
        self.position = position;
        Ok(())
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Current speed.
    pub fn current_speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Facing angle in `[-pi, pi]`.
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Set the facing angle. Any finite angle is wrapped into `[-pi, pi]`.
    pub fn set_orientation(&mut self, angle: f64) {
        if angle.is_finite() {
            self.orientation = (angle + PI).rem_euclid(2.0 * PI) - PI;
        }
    }

    pub(crate) fn face(&mut self, point: Vector3) {
        let d = point - self.position;
        if d.x != 0.0 || d.y != 0.0 {
            self.orientation = d.y.atan2(d.x);
        }
    }

    /// Returns true if the two units stand in the same or neighboring cubes
    /// on one level, or one level apart straight up or down.
    pub fn is_adjacent_to(&self, other: &Unit) -> bool {
        self.cube().distance(other.cube()) <= SQRT_2 + 1e-9
    }

    /// Returns true if `cube` is this unit's cube or one of its 26 neighbors.
    pub fn is_adjacent_to_cube(&self, cube: CubeCoord) -> bool {
        self.cube().distance(cube) <= 3f64.sqrt() + 1e-9
    }

    // --- activity ---

    /// Current activity.
    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Returns true if the current activity yields to `interruptor`.
    pub fn can_be_interrupted(&self, interruptor: Interruptor) -> bool {
        self.activity.accepts(interruptor)
    }

    /// Returns true while moving.
    pub fn is_moving(&self) -> bool {
        self.activity == Activity::Moving
    }

    /// Returns true while working.
    pub fn is_working(&self) -> bool {
        self.activity == Activity::Working
    }

    /// Returns true during either rest phase.
    pub fn is_resting(&self) -> bool {
        self.activity.is_resting()
    }

    /// Returns true while attacking.
    pub fn is_attacking(&self) -> bool {
        self.activity == Activity::Attacking
    }

    /// Returns true while defending.
    pub fn is_defending(&self) -> bool {
        self.activity == Activity::Defending
    }

    /// Returns true while falling.
    pub fn is_falling(&self) -> bool {
        self.falling_from.is_some()
    }

    /// Progress of the current timed activity.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Time the current timed activity needs to complete.
    pub fn time_needed(&self) -> f64 {
        self.time_needed
    }

    /// The opponent of the current fight.
    pub fn opponent(&self) -> Option<UnitId> {
        self.opponent
    }

    /// Returns true if the unit acts on its own when idle.
    pub fn default_behavior_enabled(&self) -> bool {
        self.default_behavior
    }

    /// Turn autonomous behavior on or off.
    pub fn set_default_behavior(&mut self, enabled: bool) {
        self.default_behavior = enabled;
    }

    pub(crate) fn set_activity(&mut self, next: Activity) {
        if self.activity != next {
            tracing::debug!(unit = %self.id, from = %self.activity, to = %next, "activity changed");
            self.activity = next;
        }
    }

    pub(crate) fn ensure_alive(&self) -> SimResult<()> {
        if self.alive {
            Ok(())
        } else {
            Err(SimError::UnitDead(self.id))
        }
    }

    // --- experience, faction, carrying, death ---

    /// Experience collected toward the next attribute point.
    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Add experience. Every full level raises a random one of strength,
    /// agility or toughness by one point.
    pub(crate) fn gain_experience(&mut self, amount: u32, rng: &mut StdRng) {
        self.experience += amount;
        while self.experience >= EXPERIENCE_PER_LEVEL {
            self.experience -= EXPERIENCE_PER_LEVEL;
            let raised = match rng.random_range(0..3) {
                0 => {
                    self.set_strength(self.strength() + 1);
                    "strength"
                }
                1 => {
                    self.set_agility(self.agility() + 1);
                    "agility"
                }
                _ => {
                    self.set_toughness(self.toughness() + 1);
                    "toughness"
                }
            };
            tracing::debug!(unit = %self.id, raised, "level up");
        }
    }

    /// The faction this unit belongs to.
    pub fn faction(&self) -> Option<FactionId> {
        self.faction
    }

    /// The object this unit carries.
    pub fn carried_object(&self) -> Option<&CarryableObject> {
        self.carried.as_ref()
    }

    /// Returns true while carrying an object.
    pub fn is_carrying(&self) -> bool {
        self.carried.is_some()
    }

    /// Let go of the carried object, restoring the weight constraint.
    pub(crate) fn take_carried(&mut self) -> Option<CarryableObject> {
        let object = self.carried.take()?;
        self.enforce_min_weight();
        Some(object)
    }

    /// Returns false once the unit has died.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Kill the unit: drop what it carries, leave its faction and stop.
    pub(crate) fn die(&mut self, objects: &mut ObjectStore, factions: &mut FactionRegistry) {
        if let Some(mut object) = self.take_carried() {
            object.put_down(self.cube().center());
            objects.insert(object);
        }
        if let Some(faction) = self.faction.take() {
            factions.remove_member(faction, self.id);
        }
        self.finish_movement();
        self.opponent = None;
        self.work_target = None;
        self.resume = None;
        self.falling_from = None;
        self.hitpoints = 0;
        self.alive = false;
        self.set_activity(Activity::Idle);
        tracing::info!(unit = %self.id, name = %self.name, "unit died");
    }

    // --- per-tick update ---

    /// Advance this unit by `dt` time units.
    pub fn advance_time(&mut self, dt: f64, ctx: &mut SimContext<'_>) -> SimResult<()> {
        validate_duration(dt)?;
        if !self.alive {
            return Ok(());
        }
        if self.advance_fall(dt, ctx) {
            return Ok(());
        }

        self.rest_timer += dt;
        if self.rest_timer >= REST_INTERVAL && !self.activity.is_fighting() {
            self.force_rest();
        }

        if self.activity == Activity::Idle && self.default_behavior {
            self.choose_default_behavior(ctx);
        }

        match self.activity {
            Activity::Idle => Ok(()),
            Activity::Moving => self.advance_movement(dt, ctx),
            Activity::InitResting | Activity::Resting => {
                self.advance_rest(dt, ctx.terrain);
                Ok(())
            }
            Activity::Working => self.advance_work(dt, ctx),
            Activity::Attacking => {
                self.advance_attack(dt, ctx);
                Ok(())
            }
            Activity::Defending => {
                self.check_defense(ctx);
                Ok(())
            }
        }
    }

    /// Start or continue a fall. Returns true if the unit is falling or
    /// landed during this step.
    fn advance_fall(&mut self, dt: f64, ctx: &mut SimContext<'_>) -> bool {
        if self.falling_from.is_none() {
            if !must_fall(ctx.terrain, self.cube()) {
                return false;
            }
            self.start_falling();
        }
        let Some(landed) = fall_step(&mut self.position, dt, ctx.terrain) else {
            return true;
        };
        let from = self.falling_from.take().unwrap_or(landed.z);
        self.velocity = Vector3::ZERO;
        let levels = u32::try_from(from - landed.z).unwrap_or(0);
        self.set_hitpoints(
            self.hitpoints
                .saturating_sub(FALL_DAMAGE_PER_LEVEL * levels),
        );
        ctx.emit(
            SimEventKind::Fell {
                unit: self.id,
                levels,
            },
            format!("{} fell {levels} level(s) to {landed}", self.name),
        );
        if self.hitpoints == 0 {
            self.die(ctx.objects, ctx.factions);
            ctx.emit(
                SimEventKind::UnitDied {
                    unit: self.id,
                    cause: "fall".into(),
                },
                format!("{} died from a fall", self.name),
            );
        }
        true
    }

    fn start_falling(&mut self) {
        let cube = self.cube();
        tracing::debug!(unit = %self.id, %cube, "unit lost its footing");
        self.finish_movement();
        self.opponent = None;
        self.work_target = None;
        self.resume = None;
        self.progress = 0.0;
        self.set_activity(Activity::Idle);
        let center = cube.center();
        self.position = Vector3::new(center.x, center.y, self.position.z);
        self.velocity = Vector3::new(0.0, 0.0, -FALL_SPEED);
        self.falling_from = Some(cube.z);
    }

    /// Rest regardless of priority. Combat defers it until the fight ends.
    fn force_rest(&mut self) {
        self.rest_timer = 0.0;
        match self.activity {
            Activity::Moving => self.rest_requested = true,
            Activity::InitResting | Activity::Resting => {}
            _ => self.begin_rest(),
        }
    }

    fn choose_default_behavior(&mut self, ctx: &mut SimContext<'_>) {
        let result = match ctx.rng.random_range(0..3) {
            0 => {
                let here = self.cube();
                let mut options: Vec<CubeCoord> = here
                    .neighbors()
                    .into_iter()
                    .filter(|c| ctx.terrain.contains(*c))
                    .collect();
                options.push(here);
                let target = options[ctx.rng.random_range(0..options.len())];
                self.work_at(target, ctx.terrain)
            }
            1 => {
                self.rest();
                Ok(())
            }
            _ => match crate::population::random_valid_cube(ctx.terrain, ctx.rng) {
                Some(target) => self.move_to(target, ctx.terrain),
                None => Ok(()),
            },
        };
        if let Err(e) = result {
            tracing::debug!(unit = %self.id, error = %e, "default behavior skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use hb_core::CubeType;
    use rand::SeedableRng;

    use super::*;

    fn flat() -> Terrain {
        Terrain::from_fn(5, 5, 3, |c| {
            if c.z == 0 {
                CubeType::Rock
            } else {
                CubeType::Air
            }
        })
        .unwrap()
    }

    fn unit(attrs: Attributes) -> Unit {
        Unit::new(UnitId(0), "Tester", CubeCoord::new(2, 2, 1), attrs, false, &flat()).unwrap()
    }

    #[test]
    fn name_grammar() {
        assert!(validate_name("Hillbilly").is_ok());
        assert!(validate_name("James O'Hara").is_ok());
        assert!(validate_name("Al \"Big\" Bundy").is_ok());
        assert!(validate_name("hillbilly").is_err());
        assert!(validate_name("H").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("R2D2").is_err());
        assert_eq!(
            validate_name("x"),
            Err(SimError::InvalidName("x".to_string()))
        );
    }

    #[test]
    fn construction_validates_name_and_position() {
        let terrain = flat();
        let attrs = Attributes::new(50, 50, 50, 50);
        assert!(matches!(
            Unit::new(UnitId(0), "bad", CubeCoord::new(1, 1, 1), attrs, false, &terrain),
            Err(SimError::InvalidName(_))
        ));
        // Inside the rock floor.
        assert!(matches!(
            Unit::new(UnitId(0), "Good", CubeCoord::new(1, 1, 0), attrs, false, &terrain),
            Err(SimError::OutOfBounds(_))
        ));
        // Floating in the air.
        assert!(Unit::new(UnitId(0), "Good", CubeCoord::new(1, 1, 2), attrs, false, &terrain).is_err());
        assert!(Unit::new(UnitId(0), "Good", CubeCoord::new(9, 1, 1), attrs, false, &terrain).is_err());
    }

    #[test]
    fn new_unit_starts_fresh() {
        let u = unit(Attributes::new(50, 50, 50, 50));
        assert_eq!(u.position(), CubeCoord::new(2, 2, 1).center());
        assert_eq!(u.max_hitpoints(), 50);
        assert_eq!(u.hitpoints(), 50);
        assert_eq!(u.stamina(), 50);
        assert_eq!(u.activity(), Activity::Idle);
        assert!((u.orientation() - FRAC_PI_2).abs() < 1e-12);
        assert!(u.is_alive());
        assert_eq!(u.experience(), 0);
    }

    #[test]
    fn initial_attributes_are_normalized() {
        let attrs = Attributes::new(10, 150, 60, 0).initial();
        assert_eq!(attrs.strength, 25);
        assert_eq!(attrs.agility, 60);
        assert_eq!(attrs.toughness, 25);
        // 10 is out of range (25) and below (25 + 60) / 2.
        assert_eq!(attrs.weight, 42);
    }

    #[test]
    fn max_hitpoints_rounds_up() {
        assert_eq!(max_hitpoints(50, 50), 50);
        assert_eq!(max_hitpoints(25, 25), 13);
        assert_eq!(max_hitpoints(1, 1), 1);
        assert_eq!(max_hitpoints(200, 200), 800);
    }

    #[test]
    fn attribute_setters_clamp() {
        let mut u = unit(Attributes::new(60, 50, 50, 50));
        u.set_toughness(500);
        assert_eq!(u.toughness(), MAX_ATTRIBUTE);
        u.set_toughness(0);
        assert_eq!(u.toughness(), MIN_ATTRIBUTE);
        u.set_weight(1000);
        assert_eq!(u.weight(), MAX_ATTRIBUTE);
    }

    #[test]
    fn weight_below_minimum_is_ignored() {
        let mut u = unit(Attributes::new(60, 50, 50, 50));
        u.set_weight(40);
        assert_eq!(u.weight(), 60);
        u.set_weight(50);
        assert_eq!(u.weight(), 50);
    }

    #[test]
    fn weight_below_minimum_allowed_while_carrying() {
        let mut u = unit(Attributes::new(60, 50, 50, 50));
        u.carried = Some(CarryableObject::new(
            crate::object::ObjectId(0),
            crate::object::ObjectKind::Boulder,
            u.position(),
            30,
        ));
        u.set_weight(40);
        assert_eq!(u.weight(), 40);
        assert_eq!(u.total_weight(), 70);
        // Dropping restores the constraint.
        assert!(u.take_carried().is_some());
        assert_eq!(u.weight(), 50);
    }

    #[test]
    fn weight_may_exceed_maximum_while_carrying() {
        let mut u = unit(Attributes::new(60, 50, 50, 50));
        u.carried = Some(CarryableObject::new(
            crate::object::ObjectId(0),
            crate::object::ObjectKind::Boulder,
            u.position(),
            30,
        ));
        u.set_weight(250);
        assert_eq!(u.weight(), 250);
        assert_eq!(u.total_weight(), 280);
        u.set_weight(0);
        assert_eq!(u.weight(), MIN_ATTRIBUTE);
        // Putting the load down brings the weight back into range.
        u.set_weight(250);
        assert!(u.take_carried().is_some());
        assert_eq!(u.weight(), MAX_ATTRIBUTE);
    }

    #[test]
    fn raising_strength_raises_weight() {
        let mut u = unit(Attributes::new(50, 50, 50, 50));
        u.set_strength(90);
        assert_eq!(u.weight(), 70);
    }

    #[test]
    fn pools_follow_max() {
        let mut u = unit(Attributes::new(50, 50, 50, 50));
        u.set_hitpoints(1000);
        assert_eq!(u.hitpoints(), 50);
        u.set_toughness(25);
        assert_eq!(u.max_hitpoints(), 25);
        assert_eq!(u.hitpoints(), 25);
        assert_eq!(u.stamina(), 25);
    }

    #[test]
    fn orientation_wraps() {
        let mut u = unit(Attributes::new(50, 50, 50, 50));
        u.set_orientation(3.0 * PI / 2.0);
        assert!((u.orientation() + FRAC_PI_2).abs() < 1e-9);
        u.set_orientation(f64::NAN);
        assert!((u.orientation() + FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn set_position_validates() {
        let terrain = flat();
        let mut u = unit(Attributes::new(50, 50, 50, 50));
        let p = Vector3::new(0.25, 4.75, 1.1);
        u.set_position(p, &terrain).unwrap();
        assert_eq!(u.position(), p);
        let bad = Vector3::new(0.25, 4.75, 2.1);
        assert_eq!(u.set_position(bad, &terrain), Err(SimError::OutOfBounds(bad)));
        assert_eq!(u.position(), p);
    }

    #[test]
    fn adjacency_between_cubes() {
        let terrain = Terrain::from_fn(20, 20, 20, |_| CubeType::Air).unwrap();
        let attrs = Attributes::new(50, 50, 50, 50);
        let mut a = Unit::new(UnitId(0), "Alpha", CubeCoord::new(15, 15, 0), attrs, false, &terrain).unwrap();
        let mut b = Unit::new(UnitId(1), "Bravo", CubeCoord::new(15, 15, 0), attrs, false, &terrain).unwrap();
        // Positions are placed directly to reach levels the floor cannot.
        a.position = CubeCoord::new(15, 15, 15).center();
        b.position = CubeCoord::new(15, 15, 16).center();
        assert!(a.is_adjacent_to(&b));
        assert!(b.is_adjacent_to(&a));
        b.position = CubeCoord::new(15, 15, 17).center();
        assert!(!a.is_adjacent_to(&b));
        b.position = CubeCoord::new(16, 16, 15).center();
        assert!(a.is_adjacent_to(&b));
        assert!(a.is_adjacent_to_cube(CubeCoord::new(16, 16, 16)));
    }

    #[test]
    fn experience_carries_over() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut u = unit(Attributes::new(50, 50, 50, 50));
        let before = u.strength() + u.agility() + u.toughness();
        u.gain_experience(25, &mut rng);
        assert_eq!(u.experience(), 5);
        assert_eq!(u.strength() + u.agility() + u.toughness(), before + 2);
    }
}
