use std::collections::BTreeMap;
use std::fmt;

use hb_core::{CubeCoord, CubeType, Terrain, Vector3};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::fall::{FALL_SPEED, fall_step, must_fall};
use crate::unit::UnitId;

/// Lightest possible object.
pub const MIN_OBJECT_WEIGHT: u32 = 10;
/// Heaviest possible object.
pub const MAX_OBJECT_WEIGHT: u32 = 50;

/// Identifier of a carryable object, unique within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// The two kinds of carryable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Left behind by digging out rock.
    Boulder,
    /// Left behind by chopping down a tree.
    Log,
}

impl ObjectKind {
    /// The object a destroyed cube of this type may leave behind.
    pub fn from_cube(kind: CubeType) -> Option<Self> {
        match kind {
            CubeType::Rock => Some(Self::Boulder),
            CubeType::Tree => Some(Self::Log),
            CubeType::Air | CubeType::Workshop => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boulder => f.write_str("boulder"),
            Self::Log => f.write_str("log"),
        }
    }
}

/// A boulder or log lying in the world or carried by a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CarryableObject {
    id: ObjectId,
    kind: ObjectKind,
    position: Vector3,
    velocity: Vector3,
    falling: bool,
    weight: u32,
    carrier: Option<UnitId>,
}

impl CarryableObject {
    /// Create an object at rest at the given position.
    pub fn new(id: ObjectId, kind: ObjectKind, position: Vector3, weight: u32) -> Self {
        Self {
            id,
            kind,
            position,
            velocity: Vector3::ZERO,
            falling: false,
            weight,
            carrier: None,
        }
    }

    /// This object's id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Boulder or log.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Current position. Stale while the object is carried.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// The cube containing the object.
    pub fn cube(&self) -> CubeCoord {
        self.position.cube()
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Returns true while the object is falling.
    pub fn is_falling(&self) -> bool {
        self.falling
    }

    /// Weight added to a unit carrying this object.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// The unit carrying this object, if any.
    pub fn carrier(&self) -> Option<UnitId> {
        self.carrier
    }

    pub(crate) fn pick_up(&mut self, carrier: UnitId) {
        self.carrier = Some(carrier);
        self.falling = false;
        self.velocity = Vector3::ZERO;
    }

    pub(crate) fn put_down(&mut self, position: Vector3) {
        self.carrier = None;
        self.position = position;
    }

    /// Fall if nothing holds the object up. Returns true if it landed this step.
    pub fn advance_time(&mut self, dt: f64, terrain: &Terrain) -> bool {
        if !self.falling {
            if !must_fall(terrain, self.cube()) {
                return false;
            }
            self.falling = true;
            let center = self.cube().center();
            self.position = Vector3::new(center.x, center.y, self.position.z);
            self.velocity = Vector3::new(0.0, 0.0, -FALL_SPEED);
        }
        if fall_step(&mut self.position, dt, terrain).is_some() {
            self.falling = false;
            self.velocity = Vector3::ZERO;
            return true;
        }
        false
    }
}

/// All objects lying in the world. Carried objects live inside their unit.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: BTreeMap<ObjectId, CarryableObject>,
    next_id: u64,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object of random weight at the center of `cube`.
    pub fn spawn(&mut self, kind: ObjectKind, cube: CubeCoord, rng: &mut StdRng) -> ObjectId {
        let weight = rng.random_range(MIN_OBJECT_WEIGHT..=MAX_OBJECT_WEIGHT);
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects
            .insert(id, CarryableObject::new(id, kind, cube.center(), weight));
        tracing::debug!(%id, %kind, %cube, weight, "object spawned");
        id
    }

    /// Put an existing object (back) into the world.
    pub fn insert(&mut self, object: CarryableObject) {
        self.next_id = self.next_id.max(object.id.0 + 1);
        self.objects.insert(object.id, object);
    }

    /// Take an object out of the world.
    pub fn remove(&mut self, id: ObjectId) -> Option<CarryableObject> {
        self.objects.remove(&id)
    }

    /// Look up an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&CarryableObject> {
        self.objects.get(&id)
    }

    /// The first resting object of the given kind in `cube`.
    pub fn find_at(&self, cube: CubeCoord, kind: ObjectKind) -> Option<ObjectId> {
        self.objects
            .values()
            .find(|o| o.kind == kind && !o.falling && o.cube() == cube)
            .map(|o| o.id)
    }

    /// All objects of one kind.
    pub fn of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &CarryableObject> {
        self.objects.values().filter(move |o| o.kind == kind)
    }

    /// All boulders in the world.
    pub fn boulders(&self) -> impl Iterator<Item = &CarryableObject> {
        self.of_kind(ObjectKind::Boulder)
    }

    /// All logs in the world.
    pub fn logs(&self) -> impl Iterator<Item = &CarryableObject> {
        self.of_kind(ObjectKind::Log)
    }

    /// All objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CarryableObject> {
        self.objects.values()
    }

    /// Number of objects in the world.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the world holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Advance every object by one tick.
    pub fn advance_all(&mut self, dt: f64, terrain: &Terrain) {
        for object in self.objects.values_mut() {
            if object.advance_time(dt, terrain) {
                tracing::debug!(id = %object.id, cube = %object.cube(), "object landed");
            }
        }
    }
}
