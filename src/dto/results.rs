use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::RoomStatus;

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerResult {
    pub player_id: i64,
    pub display_name: String,
    pub team_id: Option<i64>,
    pub score: u32,
    pub total_answers: u32,
    pub correct_answers: u32,
    /// Rounded percentage of correct answers; 0 without answers.
    pub accuracy: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameResultsResponse {
    /// Sorted by descending score; ties keep join order.
    pub players: Vec<PlayerResult>,
    pub total_questions: usize,
    pub game_status: RoomStatus,
}
