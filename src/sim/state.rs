//! Match state and core simulation types
//!
//! Everything one match needs to advance deterministically lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::BotAi;
use super::control::Controller;
use super::entity::{Entity, EntityId};
use super::map::Map;
use super::rng::GameRng;
use super::timers::{TimedEvent, TimerQueue};
use super::zone::SafeZone;
use crate::config::GameConfig;
use crate::consts::*;
use crate::polar_to_cartesian;

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every bot is dead
    Victory,
    /// The player is dead
    Defeat,
}

/// Loot dropped on death; lives until the player picks it up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub value: u32,
}

/// The player's running totals for this match
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub kills: u32,
    pub coins: u32,
    /// Simulation seconds survived
    pub survival_time: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillFeedEntry {
    pub seq: u64,
    pub killer: String,
    pub victim: String,
    /// Highlighted in the feed
    pub by_player: bool,
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Kill {
        killer: String,
        victim: String,
        by_player: bool,
    },
    ZoneWarning,
    ZoneShrunk {
        radius: f32,
    },
    CoinCollected {
        value: u32,
    },
    Victory,
    Defeat,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub rng: GameRng,
    pub map: Map,
    pub zone: SafeZone,
    /// Roster in spawn order (player first); dead bots leave after a delay
    pub entities: Vec<Entity>,
    pub coins: Vec<Coin>,
    pub player_id: EntityId,
    /// Number of entities the match started with
    pub roster_size: usize,
    pub stats: MatchStats,
    /// Simulation seconds elapsed
    pub time: f32,
    pub time_ticks: u64,
    pub outcome: Option<Outcome>,
    /// Player placement, fixed when the match ends
    pub final_rank: Option<usize>,
    pub zone_warning_visible: bool,
    /// Newest first
    pub kill_feed: Vec<KillFeedEntry>,
    /// Drained by the driver after each frame
    pub events: Vec<GameEvent>,
    pub timers: TimerQueue<TimedEvent>,
    next_id: u32,
    next_coin_id: u32,
    next_feed_seq: u64,
}

impl GameState {
    /// Generate a world and spawn the player plus `config.num_bots` bots
    pub fn new(config: &GameConfig, seed: u64, player_name: &str) -> Self {
        let mut rng = GameRng::new(seed);
        let map = Map::generate(config, &mut rng);
        let zone = SafeZone::from_config(config);

        let mut state = Self {
            seed,
            config: config.clone(),
            rng,
            map,
            zone,
            entities: Vec::with_capacity(config.num_bots as usize + 1),
            coins: Vec::new(),
            player_id: EntityId(0),
            roster_size: 0,
            stats: MatchStats::default(),
            time: 0.0,
            time_ticks: 0,
            outcome: None,
            final_rank: None,
            zone_warning_visible: false,
            kill_feed: Vec::new(),
            events: Vec::new(),
            timers: TimerQueue::new(),
            next_id: 1,
            next_coin_id: 1,
            next_feed_seq: 0,
        };

        let name = if player_name.trim().is_empty() {
            "Player"
        } else {
            player_name
        };
        let tuning = config.entity.clone();
        let pos = state.spawn_point();
        let id = state.next_entity_id();
        state
            .entities
            .push(Entity::new(id, name, pos, tuning.player_size, &tuning));
        state.player_id = id;

        for i in 1..=config.num_bots {
            let pos = state.spawn_point();
            let id = state.next_entity_id();
            let ai = BotAi::new(pos, &mut state.rng);
            let bot = Entity::new(id, &format!("Bot{i}"), pos, tuning.size, &tuning)
                .with_controller(Controller::Bot(ai));
            state.entities.push(bot);
        }
        state.roster_size = state.entities.len();

        log::info!(
            "Match {} started: {} islands, {} bots",
            seed,
            state.map.islands.len(),
            config.num_bots
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_point(&mut self) -> Vec2 {
        self.map.random_island_point(&mut self.rng, ISLAND_INTERIOR)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entity(self.player_id)
    }

    pub fn player_index(&self) -> Option<usize> {
        self.index_of(self.player_id)
    }

    pub fn alive_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_alive).count()
    }

    pub fn living_bots(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.is_alive && !e.is_player())
            .count()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Scatter 3-5 coins evenly around `center`
    pub fn spawn_coins(&mut self, center: Vec2) {
        let count = self.rng.range_u32(COIN_DROP_MIN, COIN_DROP_MAX);
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let dist = self.rng.range(COIN_SCATTER_MIN, COIN_SCATTER_MAX);
            let id = self.next_coin_id;
            self.next_coin_id += 1;
            self.coins.push(Coin {
                id,
                pos: center + polar_to_cartesian(dist, angle),
                size: COIN_SIZE,
                value: COIN_VALUE,
            });
        }
    }

    /// Push a kill onto the feed, dropping the oldest past the cap, and
    /// schedule its expiry
    pub fn push_kill_feed(&mut self, killer: &str, victim: &str, by_player: bool) {
        let seq = self.next_feed_seq;
        self.next_feed_seq += 1;
        self.kill_feed.insert(
            0,
            KillFeedEntry {
                seq,
                killer: killer.to_string(),
                victim: victim.to_string(),
                by_player,
            },
        );
        self.kill_feed.truncate(KILL_FEED_MAX);
        self.timers
            .schedule(KILL_FEED_TTL, TimedEvent::ExpireKillFeed(seq));
    }

    /// Top living entities by kills, then health, then name
    pub fn leaderboard(&self) -> Vec<&Entity> {
        let mut alive: Vec<&Entity> = self.entities.iter().filter(|e| e.is_alive).collect();
        alive.sort_by(|a, b| {
            b.kills
                .cmp(&a.kills)
                .then(b.health.partial_cmp(&a.health).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| a.name.cmp(&b.name))
        });
        alive.truncate(LEADERBOARD_SIZE);
        alive
    }

    /// Player placement given the current roster (1 is the winner)
    pub fn player_rank(&self) -> usize {
        match self.player() {
            Some(p) if p.is_alive => self.living_bots() + 1,
            _ => self.alive_count() + 1,
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GameConfig {
        GameConfig {
            num_bots: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_spawns_roster() {
        let state = GameState::new(&small_config(), 42, "Anne");
        assert_eq!(state.entities.len(), 5);
        assert_eq!(state.roster_size, 5);
        let player = state.player().expect("player");
        assert_eq!(player.name, "Anne");
        assert_eq!(player.size, 28.0);
        assert!(player.is_player());
        let names: Vec<&str> = state.entities[1..].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bot1", "Bot2", "Bot3", "Bot4"]);
        assert!(state.entities[1..].iter().all(|e| !e.is_player() && e.size == 25.0));
    }

    #[test]
    fn test_blank_name_falls_back() {
        let state = GameState::new(&small_config(), 1, "  ");
        assert_eq!(state.player().map(|p| p.name.as_str()), Some("Player"));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(&small_config(), 7, "P");
        let b = GameState::new(&small_config(), 7, "P");
        assert_eq!(a.map.islands.len(), b.map.islands.len());
        for (ea, eb) in a.entities.iter().zip(&b.entities) {
            assert_eq!(ea.pos, eb.pos);
        }
    }

    #[test]
    fn test_spawns_on_islands() {
        let state = GameState::new(&small_config(), 3, "P");
        for e in &state.entities {
            assert!(
                state.map.is_on_island(e.pos),
                "{} spawned off-island at {:?}",
                e.name,
                e.pos
            );
        }
    }

    #[test]
    fn test_coin_scatter() {
        let mut state = GameState::new(&small_config(), 9, "P");
        let center = Vec2::new(1000.0, 1000.0);
        state.spawn_coins(center);
        let n = state.coins.len();
        assert!((3..=5).contains(&n));
        for coin in &state.coins {
            let d = coin.pos.distance(center);
            assert!((30.0 - 1e-3..50.0 + 1e-3).contains(&d));
            assert_eq!(coin.value, 10);
        }
    }

    #[test]
    fn test_coin_ids_leave_entity_ids_alone() {
        let mut state = GameState::new(&small_config(), 9, "P");
        state.spawn_coins(Vec2::new(500.0, 500.0));
        state.spawn_coins(Vec2::new(900.0, 900.0));
        let ids: Vec<u32> = state.coins.iter().map(|c| c.id).collect();
        let expected: Vec<u32> = (1..=ids.len() as u32).collect();
        assert_eq!(ids, expected);
        // Five entities were spawned, so the next entity is 6
        assert_eq!(state.next_entity_id(), EntityId(6));
    }

    #[test]
    fn test_kill_feed_is_capped_newest_first() {
        let mut state = GameState::new(&small_config(), 1, "P");
        for i in 0..7 {
            state.push_kill_feed("A", &format!("V{i}"), false);
        }
        assert_eq!(state.kill_feed.len(), 5);
        assert_eq!(state.kill_feed[0].victim, "V6");
        assert_eq!(state.kill_feed[4].victim, "V2");
    }

    #[test]
    fn test_leaderboard_order() {
        let mut state = GameState::new(&small_config(), 1, "P");
        state.entities[2].kills = 3;
        state.entities[3].kills = 1;
        state.entities[4].kills = 1;
        state.entities[4].health = 50.0;
        state.entities[1].take_damage(1000.0, None);
        let board: Vec<&str> = state.leaderboard().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(board, ["Bot2", "Bot3", "Bot4", "P"]);
    }

    #[test]
    fn test_rank() {
        let mut state = GameState::new(&small_config(), 1, "P");
        assert_eq!(state.player_rank(), 5);
        let pi = state.player_index().expect("player");
        state.entities[pi].take_damage(1000.0, None);
        // Four bots outlived the player
        assert_eq!(state.player_rank(), 5);
        state.entities[1].take_damage(1000.0, None);
        assert_eq!(state.player_rank(), 4);
    }
}
