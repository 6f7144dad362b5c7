//! Per-entity control
//!
//! Every entity carries a [`Controller`]. Each tick the controller turns what
//! it sees (input snapshot or AI senses) into a short list of [`Command`]s,
//! which are then applied to the entity through the same code path for
//! players and bots.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::BotAi;
use super::combat::{self, AttackOutcome};
use super::entity::Entity;

/// Who drives an entity
#[derive(Debug, Clone)]
pub enum Controller {
    /// Driven by the per-frame [`PlayerInput`] snapshot
    Player,
    Bot(BotAi),
}

/// One intent for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Steer along a direction (normalized by the entity)
    Move(Vec2),
    /// Turn to an absolute facing (radians)
    Face(f32),
    Dash(Vec2),
    /// Swing toward a world-space point
    Attack(Vec2),
}

/// Instantaneous input state for one frame. `Default` means "no input".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dash: bool,
    /// Pointer position in screen space
    pub pointer: Vec2,
    pub pointer_down: bool,
}

impl PlayerInput {
    /// Unit movement vector from the four directional keys (y grows downward)
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Screen to world mapping owned by the presentation layer
pub trait Projection {
    fn screen_to_world(&self, screen: Vec2) -> Vec2;
}

/// Screen space equals world space (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen
    }
}

/// Translate a player input snapshot into commands for `entity`
pub fn player_commands(
    entity: &Entity,
    input: &PlayerInput,
    projection: &dyn Projection,
) -> Vec<Command> {
    let mut commands = Vec::new();
    let dir = input.movement();
    let moving = dir != Vec2::ZERO;

    if input.dash && entity.can_dash && moving {
        commands.push(Command::Dash(dir));
    }
    if moving {
        commands.push(Command::Move(dir));
        commands.push(Command::Face(dir.y.atan2(dir.x)));
    }
    if input.pointer_down && entity.attack_cooldown <= 0.0 {
        commands.push(Command::Attack(projection.screen_to_world(input.pointer)));
    }

    commands
}

/// Apply `commands` to `entities[index]`, returning the outcome of any swing
pub fn apply_commands(
    entities: &mut [Entity],
    index: usize,
    commands: &[Command],
) -> Vec<AttackOutcome> {
    let mut outcomes = Vec::new();
    for command in commands {
        let Some(entity) = entities.get_mut(index) else {
            break;
        };
        if !entity.is_alive {
            break;
        }
        match *command {
            Command::Move(dir) => entity.move_dir(dir),
            Command::Face(angle) => entity.angle = angle,
            Command::Dash(dir) => {
                entity.dash(dir);
            }
            Command::Attack(target) => {
                if let Some(outcome) = combat::attack(entities, index, target) {
                    outcomes.push(outcome);
                }
            }
        }
    }
    outcomes
}
