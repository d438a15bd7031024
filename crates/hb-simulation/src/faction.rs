use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::unit::UnitId;

/// Identifier of a faction, unique within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FactionId(pub u64);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction#{}", self.0)
    }
}

/// A bounded group of units.
#[derive(Debug, Clone)]
pub struct Faction {
    id: FactionId,
    members: BTreeSet<UnitId>,
    capacity: usize,
}

impl Faction {
    /// Create an empty faction holding at most `capacity` units.
    pub fn new(id: FactionId, capacity: usize) -> Self {
        Self {
            id,
            members: BTreeSet::new(),
            capacity,
        }
    }

    /// This faction's id.
    pub fn id(&self) -> FactionId {
        self.id
    }

    /// Add a member. Adding a unit that already belongs is a no-op.
    pub fn add(&mut self, unit: UnitId) -> SimResult<()> {
        if self.members.contains(&unit) {
            return Ok(());
        }
        if self.is_full() {
            return Err(SimError::FactionFull(self.id));
        }
        self.members.insert(unit);
        Ok(())
    }

    /// Remove a member. Returns true if it was present.
    pub fn remove(&mut self, unit: UnitId) -> bool {
        self.members.remove(&unit)
    }

    /// Returns true if the unit belongs to this faction.
    pub fn contains(&self, unit: UnitId) -> bool {
        self.members.contains(&unit)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the faction has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if no more members fit.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Members in id order.
    pub fn members(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.members.iter().copied()
    }
}

/// The active factions of a world. A faction disappears with its last member.
#[derive(Debug, Default)]
pub struct FactionRegistry {
    factions: BTreeMap<FactionId, Faction>,
    next_id: u64,
    capacity: usize,
}

impl FactionRegistry {
    /// Create an empty registry whose factions hold at most `capacity` units.
    pub fn new(capacity: usize) -> Self {
        Self {
            factions: BTreeMap::new(),
            next_id: 0,
            capacity,
        }
    }

    /// Found a new, empty faction.
    pub fn create(&mut self) -> FactionId {
        let id = FactionId(self.next_id);
        self.next_id += 1;
        self.factions.insert(id, Faction::new(id, self.capacity));
        id
    }

    /// Look up a faction.
    pub fn get(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    /// Add a unit to a faction. A dissolved faction has no room left.
    pub fn add_member(&mut self, id: FactionId, unit: UnitId) -> SimResult<()> {
        match self.factions.get_mut(&id) {
            Some(faction) => faction.add(unit),
            None => Err(SimError::FactionFull(id)),
        }
    }

    /// Remove a unit from a faction, dissolving the faction if it empties.
    pub fn remove_member(&mut self, id: FactionId, unit: UnitId) {
        if let Some(faction) = self.factions.get_mut(&id) {
            faction.remove(unit);
            if faction.is_empty() {
                self.factions.remove(&id);
                tracing::debug!(%id, "faction dissolved");
            }
        }
    }

    /// The faction with the fewest members, lowest id first on ties.
    pub fn smallest(&self) -> Option<FactionId> {
        self.factions
            .values()
            .min_by_key(|f| (f.len(), f.id))
            .map(Faction::id)
    }

    /// All active factions in id order.
    pub fn active(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    /// Number of active factions.
    pub fn len(&self) -> usize {
        self.factions.len()
    }

    /// Returns true if there are no active factions.
    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }
}
