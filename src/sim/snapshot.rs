//! Read-only view of a match for renderers and the HUD
//!
//! Built after a tick completes; nothing here points back into the
//! simulation, so it can be serialized and handed across the JS boundary.

use glam::Vec2;
use serde::Serialize;

use super::ai::BotState;
use super::control::Controller;
use super::entity::{Entity, EntityId};
use super::island::Island;
use super::state::{Coin, GameState, KillFeedEntry, MatchStats, Outcome};
use super::zone::ZoneStatus;

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub name: String,
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub is_alive: bool,
    pub is_attacking: bool,
    pub is_dashing: bool,
    pub is_player: bool,
    /// Debug overlay only
    pub ai_state: Option<BotState>,
}

impl From<&Entity> for EntityView {
    fn from(e: &Entity) -> Self {
        let ai_state = match &e.controller {
            Controller::Bot(ai) => Some(ai.state),
            Controller::Player => None,
        };
        Self {
            id: e.id,
            name: e.name.clone(),
            pos: e.pos,
            angle: e.angle,
            size: e.size,
            health: e.health,
            max_health: e.max_health,
            is_alive: e.is_alive,
            is_attacking: e.is_attacking,
            is_dashing: e.is_dashing,
            is_player: e.is_player(),
            ai_state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub center: Vec2,
    pub radius: f32,
    pub status: ZoneStatus,
    pub seconds_to_shrink: f32,
    pub warning_visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub kills: u32,
    pub is_player: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub time: f32,
    /// `M:SS`
    pub clock: String,
    pub player_id: EntityId,
    pub entities: Vec<EntityView>,
    pub islands: Vec<Island>,
    pub zone: ZoneView,
    pub coins: Vec<Coin>,
    pub kill_feed: Vec<KillFeedEntry>,
    pub stats: MatchStats,
    pub alive: usize,
    pub leaderboard: Vec<LeaderboardRow>,
    pub outcome: Option<Outcome>,
    pub final_rank: Option<usize>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let leaderboard = state
            .leaderboard()
            .into_iter()
            .enumerate()
            .map(|(i, e)| LeaderboardRow {
                rank: i + 1,
                name: e.name.clone(),
                kills: e.kills,
                is_player: e.id == state.player_id,
            })
            .collect();

        Self {
            time: state.time,
            clock: crate::format_time(state.time),
            player_id: state.player_id,
            entities: state.entities.iter().map(EntityView::from).collect(),
            islands: state.map.islands.clone(),
            zone: ZoneView {
                center: state.zone.center,
                radius: state.zone.radius,
                status: state.zone.status(),
                seconds_to_shrink: state.zone.time_until_shrink(),
                warning_visible: state.zone_warning_visible,
            },
            coins: state.coins.clone(),
            kill_feed: state.kill_feed.clone(),
            stats: state.stats,
            alive: state.alive_count(),
            leaderboard,
            outcome: state.outcome,
            final_rank: state.final_rank,
        }
    }

    pub fn player(&self) -> Option<&EntityView> {
        self.entities.iter().find(|e| e.id == self.player_id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
