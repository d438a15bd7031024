//! Attack initiation and the dodge / block / hit resolution.

use std::fmt;

use hb_core::{CubeCoord, Terrain};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::activity::{Activity, Interruptor};
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::unit::Unit;

/// Time an attack takes to land.
pub const ATTACK_DURATION: f64 = 1.0;
/// Experience for winning an exchange.
pub const COMBAT_EXPERIENCE: u32 = 20;
/// Dodge chance is this factor times defender agility over attacker agility.
pub const DODGE_FACTOR: f64 = 0.2;
/// Block chance scales the ratio of strength-minus-agility differences.
pub const BLOCK_FACTOR: f64 = 0.25;

/// How an attack ended for the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    /// The defender jumped to a neighboring cube.
    Dodged,
    /// The defender parried the blow.
    Blocked,
    /// The blow landed.
    Hit,
}

impl fmt::Display for CombatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dodged => f.write_str("dodged"),
            Self::Blocked => f.write_str("blocked"),
            Self::Hit => f.write_str("hit"),
        }
    }
}

/// Probability that `defender` dodges an attack from `attacker`.
pub fn dodge_chance(attacker: &Unit, defender: &Unit) -> f64 {
    (DODGE_FACTOR * f64::from(defender.agility()) / f64::from(attacker.agility())).clamp(0.0, 1.0)
}

/// Probability that `defender` blocks an attack from `attacker`.
///
/// Zero when the attacker's strength equals its agility.
pub fn block_chance(attacker: &Unit, defender: &Unit) -> f64 {
    let spread = |u: &Unit| f64::from(u.strength()) - f64::from(u.agility());
    let denominator = spread(attacker);
    if denominator == 0.0 {
        return 0.0;
    }
    (BLOCK_FACTOR * spread(defender) / denominator).clamp(0.0, 1.0)
}

/// Hitpoints a successful blow from `attacker` takes away.
pub fn damage(attacker: &Unit) -> u32 {
    attacker.strength() / 10
}

/// Engage two units in combat.
///
/// Both must be alive, distinct, adjacent and in different factions. If
/// either one is busy with something combat cannot interrupt, nothing happens.
pub fn begin_attack(attacker: &mut Unit, defender: &mut Unit) -> SimResult<()> {
    if attacker.id == defender.id {
        return Err(SimError::SelfAttack(attacker.id));
    }
    attacker.ensure_alive()?;
    defender.ensure_alive()?;
    if !attacker.is_adjacent_to(defender) {
        return Err(SimError::NotAdjacent {
            a: attacker.id,
            b: defender.id,
        });
    }
    if let (Some(a), Some(b)) = (attacker.faction, defender.faction)
        && a == b
    {
        return Err(SimError::SameFaction {
            a: attacker.id,
            b: defender.id,
        });
    }
    let ready = |u: &Unit| !u.is_falling() && u.can_be_interrupted(Interruptor::Fighting);
    if !ready(attacker) || !ready(defender) {
        return Ok(());
    }

    attacker.face(defender.position);
    defender.face(attacker.position);
    for unit in [&mut *attacker, &mut *defender] {
        unit.finish_movement();
        unit.work_target = None;
        unit.resume = None;
        unit.progress = 0.0;
    }
    attacker.time_needed = ATTACK_DURATION;
    attacker.opponent = Some(defender.id);
    attacker.set_activity(Activity::Attacking);
    defender.opponent = Some(attacker.id);
    defender.set_activity(Activity::Defending);
    Ok(())
}

/// Resolve a landed attack: the defender tries to dodge, then to block,
/// and otherwise takes the hit.
pub fn resolve_defense(
    attacker: &mut Unit,
    defender: &mut Unit,
    terrain: &Terrain,
    rng: &mut StdRng,
) -> CombatOutcome {
    if rng.random_bool(dodge_chance(attacker, defender)) {
        if let Some(cube) = dodge_target(defender.cube(), attacker.cube(), terrain, rng) {
            defender.position = cube.center();
        }
        defender.gain_experience(COMBAT_EXPERIENCE, rng);
        return CombatOutcome::Dodged;
    }
    if rng.random_bool(block_chance(attacker, defender)) {
        defender.gain_experience(COMBAT_EXPERIENCE, rng);
        return CombatOutcome::Blocked;
    }
    defender.set_hitpoints(defender.hitpoints.saturating_sub(damage(attacker)));
    attacker.gain_experience(COMBAT_EXPERIENCE, rng);
    CombatOutcome::Hit
}

/// A random valid cube on the defender's level next to it, other than the
/// attacker's cube.
fn dodge_target(
    from: CubeCoord,
    attacker: CubeCoord,
    terrain: &Terrain,
    rng: &mut StdRng,
) -> Option<CubeCoord> {
    let options: Vec<CubeCoord> = from
        .neighbors()
        .into_iter()
        .filter(|c| c.z == from.z && *c != attacker && terrain.is_valid_cube(*c))
        .collect();
    if options.is_empty() {
        return None;
    }
    Some(options[rng.random_range(0..options.len())])
}

impl Unit {
    /// Attack an adjacent unit.
    pub fn attack(&mut self, defender: &mut Unit) -> SimResult<()> {
        begin_attack(self, defender)
    }

    pub(crate) fn advance_attack(&mut self, dt: f64, ctx: &mut SimContext<'_>) {
        self.progress += dt;
        if self.progress < self.time_needed {
            return;
        }
        self.progress = 0.0;
        let opponent = self.opponent.take();
        self.set_activity(Activity::Idle);

        let Some(defender_id) = opponent else {
            return;
        };
        let Some(defender) = ctx.units.get_mut(&defender_id) else {
            return;
        };
        if !defender.alive
            || defender.activity != Activity::Defending
            || defender.opponent != Some(self.id)
        {
            return;
        }
        let outcome = resolve_defense(self, defender, ctx.terrain, ctx.rng);
        defender.opponent = None;
        defender.progress = 0.0;
        defender.set_activity(Activity::Idle);
        let defender_name = defender.name.clone();
        let died = defender.hitpoints == 0;
        if died {
            defender.die(ctx.objects, ctx.factions);
        }

        tracing::debug!(attacker = %self.id, defender = %defender_id, %outcome, "attack resolved");
        ctx.emit(
            SimEventKind::Attack {
                attacker: self.id,
                defender: defender_id,
                outcome,
            },
            format!("{} attacked {defender_name}: {outcome}", self.name),
        );
        if died {
            ctx.emit(
                SimEventKind::UnitDied {
                    unit: defender_id,
                    cause: format!("slain by {}", self.name),
                },
                format!("{defender_name} was slain by {}", self.name),
            );
        }
    }

    /// Give up defending once the attacker is gone or busy with something else.
    pub(crate) fn check_defense(&mut self, ctx: &SimContext<'_>) {
        let engaged = self
            .opponent
            .and_then(|id| ctx.units.get(&id))
            .is_some_and(|a| a.alive && a.activity == Activity::Attacking && a.opponent == Some(self.id));
        if !engaged {
            self.opponent = None;
            self.set_activity(Activity::Idle);
        }
    }
}
