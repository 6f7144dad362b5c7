//! Melee hit resolution
//!
//! A swing is instantaneous: every other living entity whose center is within
//! reach and whose bearing lies inside the attacker's facing cone takes the
//! attacker's damage. There is no single-target limit.

use glam::Vec2;

use super::entity::{Death, Entity, EntityId};
use crate::consts::ATTACK_CONE;
use crate::{angle_between, normalize_angle};

/// What a single swing did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackOutcome {
    pub hits: Vec<EntityId>,
    pub deaths: Vec<Death>,
}

/// Whether `target` lies within the melee cone around `facing`
pub fn in_attack_cone(origin: Vec2, facing: f32, target: Vec2) -> bool {
    let bearing = angle_between(origin, target);
    normalize_angle(bearing - facing).abs() < ATTACK_CONE
}

/// Swing entity `attacker` toward `target`. Returns `None` if the swing could
/// not start (cooldown, dashing, dead or unknown index).
pub fn attack(entities: &mut [Entity], attacker: usize, target: Vec2) -> Option<AttackOutcome> {
    let swinger = entities.get_mut(attacker)?;
    if !swinger.is_alive || !swinger.begin_attack(target) {
        return None;
    }
    Some(resolve_hits(entities, attacker))
}

/// Apply the attacker's current swing to everything in reach and in cone
pub fn resolve_hits(entities: &mut [Entity], attacker: usize) -> AttackOutcome {
    let mut outcome = AttackOutcome::default();
    let Some(swinger) = entities.get(attacker) else {
        return outcome;
    };
    let (id, origin, facing, damage) = (swinger.id, swinger.pos, swinger.angle, swinger.attack_damage);
    let reach_base = swinger.size + swinger.weapon_range;

    for (i, target) in entities.iter_mut().enumerate() {
        if i == attacker || !target.is_alive {
            continue;
        }
        let dist = origin.distance(target.pos);
        if dist >= reach_base + target.size {
            continue;
        }
        if !in_attack_cone(origin, facing, target.pos) {
            continue;
        }
        outcome.hits.push(target.id);
        if let Some(death) = target.take_damage(damage, Some(id)) {
            outcome.deaths.push(death);
        }
    }

    outcome
}
