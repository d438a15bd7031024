use hb_core::{CubeCoord, CubeType};

use crate::combat::CombatOutcome;
use crate::faction::FactionId;
use crate::object::{ObjectId, ObjectKind};
use crate::unit::UnitId;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Population
    /// A unit joined the world.
    UnitSpawned {
        /// The new unit.
        unit: UnitId,
        /// The faction it was assigned to.
        faction: FactionId,
    },
    /// A new faction was founded.
    FactionCreated {
        /// The new faction.
        faction: FactionId,
    },

    // Combat
    /// An attack was resolved.
    Attack {
        /// The attacking unit.
        attacker: UnitId,
        /// The defending unit.
        defender: UnitId,
        /// How the defender fared.
        outcome: CombatOutcome,
    },
    /// A unit died.
    UnitDied {
        /// The unit that died.
        unit: UnitId,
        /// The cause of death.
        cause: String,
    },
    /// A unit landed after falling.
    Fell {
        /// The unit that fell.
        unit: UnitId,
        /// Number of cube levels fallen.
        levels: u32,
    },

    // Work and terrain
    /// A unit finished a work task.
    WorkCompleted {
        /// The working unit.
        unit: UnitId,
        /// The cube worked on.
        cube: CubeCoord,
    },
    /// A solid cube was dug out or chopped down.
    CubeDestroyed {
        /// The destroyed cube.
        cube: CubeCoord,
        /// What the cube was before it turned to air.
        kind: CubeType,
    },
    /// Solid cubes that lost their border connection collapsed.
    CaveIn {
        /// The collapsed cubes.
        cubes: Vec<CubeCoord>,
    },
    /// A boulder or log appeared in the world.
    ObjectSpawned {
        /// The new object.
        object: ObjectId,
        /// Boulder or log.
        kind: ObjectKind,
    },

    // Failures
    /// A unit's tick failed and was skipped.
    TickFailed {
        /// The unit whose tick failed.
        unit: UnitId,
        /// The error message.
        error: String,
    },
}

impl SimEventKind {
    /// Check whether a given unit is involved in this event.
    pub fn involves(&self, id: UnitId) -> bool {
        match self {
            Self::UnitSpawned { unit, .. }
            | Self::UnitDied { unit, .. }
            | Self::Fell { unit, .. }
            | Self::WorkCompleted { unit, .. }
            | Self::TickFailed { unit, .. } => *unit == id,
            Self::Attack {
                attacker, defender, ..
            } => *attacker == id || *defender == id,
            Self::FactionCreated { .. }
            | Self::CubeDestroyed { .. }
            | Self::CaveIn { .. }
            | Self::ObjectSpawned { .. } => false,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given unit.
    pub fn events_for_unit(&self, id: UnitId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn died(unit: u64) -> SimEventKind {
        SimEventKind::UnitDied {
            unit: UnitId(unit),
            cause: "test".into(),
        }
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, died(7), "test"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_unit(UnitId(7)).len(), 1);
        assert!(log.events_for_unit(UnitId(8)).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(SimEvent::new(i, died(1), "test"));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_kind_involves_unit() {
        let kind = SimEventKind::Attack {
            attacker: UnitId(1),
            defender: UnitId(2),
            outcome: CombatOutcome::Blocked,
        };
        assert!(kind.involves(UnitId(1)));
        assert!(kind.involves(UnitId(2)));
        assert!(!kind.involves(UnitId(3)));

        let kind = SimEventKind::CaveIn {
            cubes: vec![CubeCoord::new(0, 0, 1)],
        };
        assert!(!kind.involves(UnitId(1)));
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, died(1), "test"));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
