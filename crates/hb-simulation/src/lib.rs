//! Tick-based unit simulation for Hillbillies.
//!
//! Units live in a [`World`] built on a [`hb_core::Terrain`]. Each call to
//! [`World::advance_time`] steps every live unit through its activity state
//! machine (moving, working, resting, fighting, falling), then lets loose
//! objects fall. Everything noteworthy lands in the [`EventLog`].

/// Unit activities and interruption rules.
pub mod activity;
/// Simulation clock and duration validation.
pub mod clock;
/// Attacks, dodging and blocking.
pub mod combat;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to a unit while it is updated.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Factions and their membership.
pub mod faction;
/// Falling physics shared by units and objects.
pub mod fall;
/// Walking, sprinting and pathing.
pub mod movement;
/// Boulders and logs.
pub mod object;
/// Spawning units and assigning factions.
pub mod population;
/// Resting to restore stamina and hitpoints.
pub mod rest;
/// Units, their attributes and per-tick update.
pub mod unit;
/// Digging, carrying and workshop upgrades.
pub mod work;
/// Top-level world state and tick loop.
pub mod world;

/// Re-exports of [`activity::Activity`] and [`activity::Interruptor`].
pub use activity::{Activity, Interruptor};
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`combat::CombatOutcome`].
pub use combat::CombatOutcome;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of [`faction::Faction`], [`faction::FactionId`], and [`faction::FactionRegistry`].
pub use faction::{Faction, FactionId, FactionRegistry};
/// Re-exports of [`object::CarryableObject`], [`object::ObjectId`], [`object::ObjectKind`], and [`object::ObjectStore`].
pub use object::{CarryableObject, ObjectId, ObjectKind, ObjectStore};
/// Re-exports of [`unit::Attributes`], [`unit::Unit`], and [`unit::UnitId`].
pub use unit::{Attributes, Unit, UnitId};
/// Re-export of [`work::WorkOutcome`].
pub use work::WorkOutcome;
/// Re-export of [`world::World`].
pub use world::World;
