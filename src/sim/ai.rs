//! Bot AI: a four-state behavior machine
//!
//! Decisions (which state, which target) are re-taken on a fixed cadence;
//! the current state's behavior runs every tick in between. Personality
//! scalars are drawn once per bot and never change.
//!
//! Decision priority:
//! 1. Outside the safe zone: flee toward the zone center.
//! 2. Hurt below `caution` with an enemy in range: flee from the nearest.
//! 3. Nearest enemy close and bot aggressive: attack it.
//! 4. Any enemy within awareness: chase it.
//! 5. Otherwise wander between island waypoints.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::control::Command;
use super::entity::{Entity, EntityId};
use super::map::Map;
use super::rng::GameRng;
use super::zone::SafeZone;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotState {
    Wander,
    Chase,
    Attack,
    Flee,
}

/// What a bot is focused on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Entity(EntityId),
    /// Head back into the safe zone
    ZoneCenter,
}

/// Another entity as perceived by a bot
#[derive(Debug, Clone, Copy)]
pub struct Sensed {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: f32,
    pub alive: bool,
}

impl Sensed {
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            pos: entity.pos,
            size: entity.size,
            alive: entity.is_alive,
        }
    }
}

/// The bot's own body, copied out before its controller is borrowed
#[derive(Debug, Clone, Copy)]
pub struct SelfView {
    pub pos: Vec2,
    pub size: f32,
    pub weapon_range: f32,
    pub health_fraction: f32,
    pub can_dash: bool,
}

impl SelfView {
    pub fn of(entity: &Entity) -> Self {
        Self {
            pos: entity.pos,
            size: entity.size,
            weapon_range: entity.weapon_range,
            health_fraction: entity.health_fraction(),
            can_dash: entity.can_dash,
        }
    }
}

/// Everything a bot may look at during one tick
pub struct Senses<'a> {
    pub me: SelfView,
    /// Every other entity on the roster, dead ones included
    pub others: &'a [Sensed],
    pub zone: &'a SafeZone,
    pub map: &'a Map,
}

impl Senses<'_> {
    fn find(&self, id: EntityId) -> Option<&Sensed> {
        self.others.iter().find(|s| s.id == id)
    }

    fn find_alive(&self, id: EntityId) -> Option<&Sensed> {
        self.find(id).filter(|s| s.alive)
    }
}

#[derive(Debug, Clone)]
pub struct BotAi {
    pub state: BotState,
    pub target: Option<Target>,
    pub wander_target: Vec2,
    decision_timer: f32,
    pub decision_interval: f32,
    pub aggression: f32,
    pub caution: f32,
    pub awareness: f32,
}

impl BotAi {
    /// New brain with a freshly rolled personality
    pub fn new(start: Vec2, rng: &mut GameRng) -> Self {
        let aggression = rng.range(AI_AGGRESSION_RANGE.0, AI_AGGRESSION_RANGE.1);
        let caution = rng.range(AI_CAUTION_RANGE.0, AI_CAUTION_RANGE.1);
        let awareness = rng.range(AI_AWARENESS_RANGE.0, AI_AWARENESS_RANGE.1);
        Self::with_personality(start, aggression, caution, awareness)
    }

    pub fn with_personality(start: Vec2, aggression: f32, caution: f32, awareness: f32) -> Self {
        Self {
            state: BotState::Wander,
            target: None,
            wander_target: start,
            decision_timer: 0.0,
            decision_interval: AI_DECISION_INTERVAL,
            aggression,
            caution,
            awareness,
        }
    }

    /// Advance the decision clock, re-deciding when it elapses, then run the
    /// current behavior
    pub fn update(&mut self, senses: &Senses, dt: f32, rng: &mut GameRng) -> Vec<Command> {
        self.decision_timer += dt;
        if self.decision_timer >= self.decision_interval {
            self.decide(senses);
            self.decision_timer = 0.0;
        }
        self.execute(senses, rng)
    }

    /// Living enemies within awareness, nearest first
    pub fn nearby_enemies(&self, senses: &Senses) -> Vec<(EntityId, f32)> {
        let mut enemies: Vec<(EntityId, f32)> = senses
            .others
            .iter()
            .filter(|s| s.alive)
            .map(|s| (s.id, senses.me.pos.distance(s.pos)))
            .filter(|&(_, dist)| dist < self.awareness)
            .collect();
        enemies.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        enemies
    }

    pub fn decide(&mut self, senses: &Senses) {
        let previous = self.state;

        if !senses.zone.contains(senses.me.pos) {
            self.state = BotState::Flee;
            self.target = Some(Target::ZoneCenter);
        } else {
            let enemies = self.nearby_enemies(senses);
            match enemies.first() {
                Some(&(id, _)) if senses.me.health_fraction < self.caution => {
                    self.state = BotState::Flee;
                    self.target = Some(Target::Entity(id));
                }
                Some(&(id, dist)) if dist < AI_ATTACK_DISTANCE && self.aggression > AI_ATTACK_AGGRESSION => {
                    self.state = BotState::Attack;
                    self.target = Some(Target::Entity(id));
                }
                Some(&(id, dist)) if dist < self.awareness => {
                    self.state = BotState::Chase;
                    self.target = Some(Target::Entity(id));
                }
                _ => {
                    self.state = BotState::Wander;
                    self.target = None;
                }
            }
        }

        if self.state != previous {
            log::debug!("Bot {:?} -> {:?} ({:?})", previous, self.state, self.target);
        }
    }

    fn execute(&mut self, senses: &Senses, rng: &mut GameRng) -> Vec<Command> {
        match self.state {
            BotState::Wander => self.wander(senses, rng),
            BotState::Chase => match self.live_target(senses) {
                Some(target) => steer_toward(senses.me.pos, target.pos),
                None => self.give_up(),
            },
            BotState::Attack => match self.live_target(senses) {
                Some(target) => attack_or_approach(&senses.me, &target),
                None => self.give_up(),
            },
            BotState::Flee => self.flee(senses, rng),
        }
    }

    fn live_target(&self, senses: &Senses) -> Option<Sensed> {
        match self.target {
            Some(Target::Entity(id)) => senses.find_alive(id).copied(),
            _ => None,
        }
    }

    fn give_up(&mut self) -> Vec<Command> {
        self.state = BotState::Wander;
        self.target = None;
        Vec::new()
    }

    fn wander(&mut self, senses: &Senses, rng: &mut GameRng) -> Vec<Command> {
        if senses.me.pos.distance(self.wander_target) < AI_WANDER_ARRIVAL {
            self.wander_target = senses.map.random_island_point(rng, ISLAND_INTERIOR);
        }
        steer_toward(senses.me.pos, self.wander_target)
    }

    fn flee(&mut self, senses: &Senses, rng: &mut GameRng) -> Vec<Command> {
        match self.target {
            Some(Target::Entity(id)) => match senses.find(id) {
                Some(threat) => flee_from(&senses.me, threat.pos, rng),
                None => steer_toward(senses.me.pos, senses.zone.center),
            },
            Some(Target::ZoneCenter) | None => steer_toward(senses.me.pos, senses.zone.center),
        }
    }
}

/// Move toward `goal`, facing it; stands still inside the dead zone
fn steer_toward(from: Vec2, goal: Vec2) -> Vec<Command> {
    let delta = goal - from;
    if delta.length() <= AI_STEER_DEADZONE {
        return Vec::new();
    }
    let dir = delta.normalize();
    vec![Command::Move(dir), Command::Face(dir.y.atan2(dir.x))]
}

/// Run directly away from `threat`, sometimes dashing
fn flee_from(me: &SelfView, threat: Vec2, rng: &mut GameRng) -> Vec<Command> {
    let Some(dir) = (me.pos - threat).try_normalize() else {
        return Vec::new();
    };
    let mut commands = vec![Command::Move(dir), Command::Face(dir.y.atan2(dir.x))];
    if me.can_dash && rng.chance(AI_FLEE_DASH_CHANCE) {
        commands.push(Command::Dash(dir));
    }
    commands
}

/// Swing when within melee reach (plus a buffer), otherwise close in
fn attack_or_approach(me: &SelfView, target: &Sensed) -> Vec<Command> {
    let reach = me.size + me.weapon_range + target.size;
    if me.pos.distance(target.pos) < reach + AI_MELEE_BUFFER {
        vec![Command::Attack(target.pos)]
    } else {
        steer_toward(me.pos, target.pos)
    }
}
