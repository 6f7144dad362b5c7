//! Fixed timestep simulation tick
//!
//! Advances one match by one step in a fixed order: timers, zone, player,
//! bots, death bookkeeping, corpse retirement, coin pickup, game over.

use super::ai::{SelfView, Senses, Sensed};
use super::control::{Command, Controller, PlayerInput, Projection, apply_commands, player_commands};
use super::entity::Death;
use super::state::{GameEvent, GameState, Outcome};
use super::timers::TimedEvent;
use super::zone::ZoneEvent;
use crate::consts::*;

/// Advance the match by `dt` seconds. A finished match is left untouched.
pub fn tick(state: &mut GameState, input: &PlayerInput, projection: &dyn Projection, dt: f32) {
    if state.is_over() {
        return;
    }
    state.time += dt;
    state.time_ticks += 1;

    for event in state.timers.advance(dt) {
        apply_timed(state, event);
    }

    for event in state.zone.update(dt) {
        match event {
            ZoneEvent::Warning => {
                state.zone_warning_visible = true;
                state
                    .timers
                    .schedule(ZONE_WARNING_DISPLAY, TimedEvent::DismissZoneWarning);
                state.events.push(GameEvent::ZoneWarning);
            }
            ZoneEvent::Shrunk { radius } => state.events.push(GameEvent::ZoneShrunk { radius }),
        }
    }

    let mut deaths = Vec::new();

    // Player
    if let Some(pi) = state.player_index() {
        if state.entities[pi].is_alive {
            let commands = player_commands(&state.entities[pi], input, projection);
            step_entity(state, pi, &commands, dt, &mut deaths);
            state.stats.survival_time += dt;
        }
    }

    // Bots, in roster order
    for i in 0..state.entities.len() {
        if state.entities[i].is_player() {
            continue;
        }
        if !state.entities[i].is_alive {
            state.entities[i].death_timer += dt;
            continue;
        }
        let commands = think(state, i, dt);
        step_entity(state, i, &commands, dt, &mut deaths);
    }

    resolve_deaths(state, deaths);

    state
        .entities
        .retain(|e| e.is_alive || e.is_player() || e.death_timer < BOT_CORPSE_TIME);

    collect_coins(state);
    check_game_over(state);
}

/// Run bot `index`'s AI against a snapshot of everyone else
fn think(state: &mut GameState, index: usize, dt: f32) -> Vec<Command> {
    let others: Vec<Sensed> = state
        .entities
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(_, e)| Sensed::of(e))
        .collect();
    let me = SelfView::of(&state.entities[index]);

    let GameState {
        entities,
        zone,
        map,
        rng,
        ..
    } = state;
    let senses = Senses {
        me,
        others: &others,
        zone: &*zone,
        map: &*map,
    };
    match &mut entities[index].controller {
        Controller::Bot(ai) => ai.update(&senses, dt, rng),
        Controller::Player => Vec::new(),
    }
}

/// Apply commands, integrate physics and take zone damage for one entity
fn step_entity(
    state: &mut GameState,
    index: usize,
    commands: &[Command],
    dt: f32,
    deaths: &mut Vec<Death>,
) {
    let outcomes = apply_commands(&mut state.entities, index, commands);
    if !outcomes.is_empty() {
        let id = state.entities[index].id;
        state
            .timers
            .schedule(ATTACK_FLASH_DURATION, TimedEvent::EndAttackFlash(id));
    }
    for outcome in outcomes {
        deaths.extend(outcome.deaths);
    }

    state.entities[index].update(dt, &state.map);
    if let Some(death) = state.zone.check_entity(&mut state.entities[index], dt) {
        deaths.push(death);
    }
}

fn apply_timed(state: &mut GameState, event: TimedEvent) {
    match event {
        TimedEvent::EndAttackFlash(id) => {
            if let Some(e) = state.entities.iter_mut().find(|e| e.id == id) {
                e.is_attacking = false;
            }
        }
        TimedEvent::DismissZoneWarning => state.zone_warning_visible = false,
        TimedEvent::ExpireKillFeed(seq) => state.kill_feed.retain(|k| k.seq != seq),
    }
}

/// Drop loot for every death; credit kills that have an attacker
fn resolve_deaths(state: &mut GameState, deaths: Vec<Death>) {
    for death in deaths {
        state.spawn_coins(death.pos);

        let victim = state
            .entity(death.victim)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        let Some(killer_index) = death.killer.and_then(|id| state.index_of(id)) else {
            log::info!("{} was lost to the storm", victim);
            continue;
        };

        let killer_entity = &mut state.entities[killer_index];
        killer_entity.kills += 1;
        let killer = killer_entity.name.clone();
        let by_player = killer_entity.id == state.player_id;
        if by_player {
            state.stats.kills += 1;
        }

        log::info!("{} eliminated {}", killer, victim);
        state.push_kill_feed(&killer, &victim, by_player);
        state.events.push(GameEvent::Kill {
            killer,
            victim,
            by_player,
        });
    }
}

/// Player-only pickup; each coin is removed as it is collected
fn collect_coins(state: &mut GameState) {
    let Some(player) = state.player().filter(|p| p.is_alive) else {
        return;
    };
    let (pos, size) = (player.pos, player.size);

    let mut collected = Vec::new();
    state.coins.retain(|coin| {
        if pos.distance(coin.pos) < size + coin.size {
            collected.push(coin.value);
            false
        } else {
            true
        }
    });
    for value in collected {
        state.stats.coins += value;
        state.events.push(GameEvent::CoinCollected { value });
    }
}

fn check_game_over(state: &mut GameState) {
    let player_alive = state.player().is_some_and(|p| p.is_alive);
    let outcome = if !player_alive {
        Outcome::Defeat
    } else if state.living_bots() == 0 {
        Outcome::Victory
    } else {
        return;
    };

    let rank = match outcome {
        Outcome::Victory => 1,
        Outcome::Defeat => state.alive_count() + 1,
    };
    state.outcome = Some(outcome);
    state.final_rank = Some(rank);
    state.events.push(match outcome {
        Outcome::Victory => GameEvent::Victory,
        Outcome::Defeat => GameEvent::Defeat,
    });
    log::info!(
        "Game over: {:?}, rank #{} of {}, {} kills, {} coins, survived {}",
        outcome,
        rank,
        state.roster_size,
        state.stats.kills,
        state.stats.coins,
        crate::format_time(state.stats.survival_time)
    );
}
