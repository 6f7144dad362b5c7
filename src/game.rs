//! Match orchestration
//!
//! Owns the menu → playing → game over flow, drives the simulation on a
//! fixed step from variable frame times, and records the result in the
//! player's profile when a match ends.

use serde::Serialize;

use crate::config::GameConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::identity::{GameStats, Identity, IdentityError};
use crate::sim::{FrameSnapshot, GameEvent, GameState, PlayerInput, Projection, tick};

/// Key for this game's stats in the shared profile
pub const GAME_ID: &str = "pirate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

pub struct Game {
    config: GameConfig,
    identity: Identity,
    phase: Phase,
    state: Option<GameState>,
    accumulator: f32,
    /// Whether the last match's stats reached storage
    last_save_ok: Option<bool>,
}

impl Game {
    pub fn new(config: GameConfig, identity: Identity) -> Self {
        Self {
            config,
            identity,
            phase: Phase::Menu,
            state: None,
            accumulator: 0.0,
            last_save_ok: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current or just-finished match
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Lifetime best and games played for this game
    pub fn best(&self) -> GameStats {
        self.identity.game_stats(GAME_ID)
    }

    pub fn last_save_ok(&self) -> Option<bool> {
        self.last_save_ok
    }

    /// Generate a fresh world and start playing
    pub fn start_game(&mut self, seed: u64) {
        let best = self.best();
        log::info!(
            "Starting match (seed {}), best {} over {} games",
            seed,
            best.high_score,
            best.games_played
        );
        self.state = Some(GameState::new(&self.config, seed, self.identity.username()));
        self.accumulator = 0.0;
        self.last_save_ok = None;
        self.phase = Phase::Playing;
    }

    /// Feed one rendered frame of `dt` seconds. Missing input means the player
    /// is idle this frame. Returns what happened during the frame.
    pub fn frame(
        &mut self,
        dt: f32,
        input: Option<&PlayerInput>,
        projection: &dyn Projection,
    ) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let Some(state) = self.state.as_mut() else {
            return Vec::new();
        };

        let idle = PlayerInput::default();
        let input = input.unwrap_or(&idle);

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, projection, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            if state.is_over() {
                break;
            }
        }

        let events = state.take_events();
        if state.is_over() {
            self.finish();
        }
        events
    }

    fn finish(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let coins = state.stats.coins;
        self.phase = Phase::GameOver;
        self.accumulator = 0.0;

        let saved = self.identity.record_game(GAME_ID, coins);
        if !saved {
            log::warn!("Match result kept in memory only");
        }
        self.last_save_ok = Some(saved);
    }

    /// Leave the game over screen; the finished match is dropped
    pub fn return_to_menu(&mut self) {
        self.phase = Phase::Menu;
        self.state = None;
        self.accumulator = 0.0;
    }

    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        self.state.as_ref().map(FrameSnapshot::capture)
    }

    /// Change the profile name; applies to the next match
    pub fn rename_player(&mut self, name: &str) -> Result<(), IdentityError> {
        self.identity.update_username(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryStore;
    use crate::sim::{GameRng, IdentityProjection, Outcome};

    fn game_with(store: MemoryStore) -> Game {
        let identity = Identity::init(Box::new(store), &mut GameRng::new(1), 0.0);
        let config = GameConfig {
            num_bots: 3,
            ..Default::default()
        };
        Game::new(config, identity)
    }

    fn kill_player(game: &mut Game) {
        let state = game.state.as_mut().expect("playing");
        let pi = state.player_index().expect("player");
        state.entities[pi].pos = glam::Vec2::new(30.0, 30.0);
        state.entities[pi].health = 0.01;
    }

    #[test]
    fn test_menu_ignores_frames() {
        let mut game = game_with(MemoryStore::new());
        assert_eq!(game.phase(), Phase::Menu);
        assert!(game.frame(0.1, None, &IdentityProjection).is_empty());
        assert!(game.snapshot().is_none());
    }

    #[test]
    fn test_start_uses_profile_name() {
        let mut game = game_with(MemoryStore::new());
        game.rename_player("Grace").expect("valid");
        game.start_game(8);
        assert_eq!(game.phase(), Phase::Playing);
        let state = game.state().expect("state");
        assert_eq!(state.player().map(|p| p.name.as_str()), Some("Grace"));
        assert_eq!(state.entities.len(), 4);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut game = game_with(MemoryStore::new());
        game.start_game(8);
        // Half a step does nothing yet
        game.frame(SIM_DT * 0.5, None, &IdentityProjection);
        assert_eq!(game.state().map(|s| s.time_ticks), Some(0));
        game.frame(SIM_DT * 0.75, None, &IdentityProjection);
        assert_eq!(game.state().map(|s| s.time_ticks), Some(1));
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = game_with(MemoryStore::new());
        game.start_game(8);
        game.frame(5.0, None, &IdentityProjection);
        let ticks = game.state().map(|s| s.time_ticks).unwrap_or(0);
        assert!((5..=6).contains(&ticks), "ran {ticks} ticks");
    }

    #[test]
    fn test_defeat_records_stats() {
        let mut game = game_with(MemoryStore::new());
        game.start_game(3);
        kill_player(&mut game);
        let events = game.frame(SIM_DT, None, &IdentityProjection);

        assert!(events.contains(&GameEvent::Defeat));
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.state().and_then(|s| s.outcome), Some(Outcome::Defeat));
        assert_eq!(game.last_save_ok(), Some(true));
        assert_eq!(game.best().games_played, 1);

        // Terminal until the player leaves
        assert!(game.frame(1.0, None, &IdentityProjection).is_empty());
        assert_eq!(game.best().games_played, 1);
        game.return_to_menu();
        assert_eq!(game.phase(), Phase::Menu);
    }

    #[test]
    fn test_failed_save_still_ends_game() {
        let mut game = game_with(MemoryStore::failing());
        game.start_game(3);
        kill_player(&mut game);
        game.frame(SIM_DT, None, &IdentityProjection);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.last_save_ok(), Some(false));
    }

    #[test]
    fn test_high_score_is_coins() {
        let mut game = game_with(MemoryStore::new());
        game.start_game(3);
        game.state.as_mut().expect("playing").stats.coins = 40;
        kill_player(&mut game);
        game.frame(SIM_DT, None, &IdentityProjection);
        assert_eq!(game.best().high_score, 40);

        game.return_to_menu();
        game.start_game(4);
        game.state.as_mut().expect("playing").stats.coins = 20;
        kill_player(&mut game);
        game.frame(SIM_DT, None, &IdentityProjection);
        assert_eq!(
            game.best(),
            GameStats {
                high_score: 40,
                games_played: 2
            }
        );
    }
}
