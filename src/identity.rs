//! Local user identity and per-game stats
//!
//! One profile is shared by every game on the portal and lives in a single
//! JSON record (LocalStorage key `jeuio_user` in the browser). Each game
//! keeps its own `GameStats` under its game id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::rng::GameRng;

/// Storage key shared with the rest of the portal
pub const PROFILE_KEY: &str = "jeuio_user";

pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 20;

const ADJECTIVES: [&str; 8] = ["Brave", "Fierce", "Wild", "Swift", "Bold", "Dark", "Red", "Blue"];
const NOUNS: [&str; 7] = ["Pirate", "Corsair", "Buccaneer", "Sailor", "Captain", "Raider", "Viking"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile storage unavailable")]
    Unavailable,
    #[error("profile json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile write failed: {0}")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("username must be at least 2 characters")]
    TooShort,
    #[error("username must be at most 20 characters")]
    TooLong,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub high_score: u32,
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    /// Unix time (ms)
    pub created_at: f64,
    #[serde(default)]
    pub games: BTreeMap<String, GameStats>,
}

impl UserProfile {
    /// Fresh profile with a random id and name
    pub fn generate(rng: &mut GameRng, now_ms: f64) -> Self {
        Self {
            user_id: generate_uuid(rng),
            username: generate_username(rng),
            created_at: now_ms,
            games: BTreeMap::new(),
        }
    }
}

/// Where the profile record lives
pub trait ProfileStore {
    /// `Ok(None)` on first run
    fn load(&self) -> Result<Option<UserProfile>, StoreError>;
    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError>;
}

/// In-memory store for native runs and tests. Keeps the serialized record so
/// the JSON path is exercised the same way as in the browser.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<String>,
    /// Simulate a full or locked storage
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(json: &str) -> Self {
        Self {
            record: Some(json.to_string()),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail
    pub fn failing() -> Self {
        Self {
            record: None,
            fail_writes: true,
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        match &self.record {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("quota exceeded".into()));
        }
        self.record = Some(serde_json::to_string(profile)?);
        Ok(())
    }
}

pub struct Identity {
    store: Box<dyn ProfileStore>,
    profile: UserProfile,
}

impl Identity {
    /// Load the stored profile, or create and persist a new one. A store that
    /// cannot be read is treated as a first run.
    pub fn init(mut store: Box<dyn ProfileStore>, rng: &mut GameRng, now_ms: f64) -> Self {
        let existing = store.load().unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable profile: {e}");
            None
        });

        let profile = match existing {
            Some(profile) => {
                log::info!("Welcome back, {}", profile.username);
                profile
            }
            None => {
                let profile = UserProfile::generate(rng, now_ms);
                log::info!("New profile {} ({})", profile.username, profile.user_id);
                if let Err(e) = store.save(&profile) {
                    log::warn!("Could not persist new profile: {e}");
                }
                profile
            }
        };

        Self { store, profile }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    /// Stats for `game_id`, zeroed if the game was never played
    pub fn game_stats(&self, game_id: &str) -> GameStats {
        self.profile.games.get(game_id).copied().unwrap_or_default()
    }

    /// Fold one finished game into the stats and persist. Returns whether the
    /// write succeeded; the in-memory stats are updated either way.
    pub fn record_game(&mut self, game_id: &str, coins: u32) -> bool {
        let stats = self.profile.games.entry(game_id.to_string()).or_default();
        stats.high_score = stats.high_score.max(coins);
        stats.games_played += 1;
        log::info!(
            "{}: game #{} recorded, best {}",
            game_id,
            stats.games_played,
            stats.high_score
        );

        match self.store.save(&self.profile) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Stats save failed: {e}");
                false
            }
        }
    }

    pub fn update_username(&mut self, name: &str) -> Result<(), IdentityError> {
        let name = validate_username(name)?;
        self.profile.username = name.to_string();
        self.store.save(&self.profile)?;
        Ok(())
    }
}

/// Trimmed name if it has an acceptable length
pub fn validate_username(name: &str) -> Result<&str, IdentityError> {
    let name = name.trim();
    let len = name.chars().count();
    if len < USERNAME_MIN {
        Err(IdentityError::TooShort)
    } else if len > USERNAME_MAX {
        Err(IdentityError::TooLong)
    } else {
        Ok(name)
    }
}

/// Random RFC 4122 version 4 id
pub fn generate_uuid(rng: &mut GameRng) -> String {
    "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx"
        .chars()
        .map(|c| match c {
            'x' => hex_digit(rng.range_u32(0, 15)),
            // Variant bits 10xx
            'y' => hex_digit(8 | rng.range_u32(0, 3)),
            other => other,
        })
        .collect()
}

fn hex_digit(n: u32) -> char {
    char::from_digit(n, 16).unwrap_or('0')
}

/// "AdjectiveNounNNN", e.g. `SwiftCorsair42`
pub fn generate_username(rng: &mut GameRng) -> String {
    let adjective = rng.choose(&ADJECTIVES).copied().unwrap_or("Brave");
    let noun = rng.choose(&NOUNS).copied().unwrap_or("Pirate");
    let number = rng.range_u32(0, 998);
    format!("{adjective}{noun}{number}")
}
