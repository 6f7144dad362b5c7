//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (roster order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod control;
pub mod entity;
pub mod island;
pub mod map;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;
pub mod zone;

pub use ai::{BotAi, BotState, Target};
pub use collision::{CollisionResult, circle_island_collision, clamp_to_bounds, resolve_island_collisions};
pub use control::{Command, Controller, IdentityProjection, PlayerInput, Projection};
pub use entity::{Death, Entity, EntityId};
pub use island::Island;
pub use map::Map;
pub use rng::GameRng;
pub use snapshot::FrameSnapshot;
pub use state::{Coin, GameEvent, GameState, KillFeedEntry, MatchStats, Outcome};
pub use tick::tick;
pub use timers::{TimedEvent, TimerQueue};
pub use zone::{SafeZone, ZoneStatus};
