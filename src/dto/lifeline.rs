use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::LifelineType;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UseLifelineRequest {
    pub player_id: i64,
    pub lifeline_type: LifelineType,
}

/// Reveal returned by a lifeline, tagged by `lifeline_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "lifeline_type", rename_all = "snake_case")]
pub enum LifelineResponse {
    /// Leading tokens of up to two wrong options.
    FiftyFifty { removed_options: Vec<String> },
    /// A hint naming the correct option.
    AskNative { hint: String },
    /// Localized question text and options, verbatim.
    Translate {
        localized_text: Option<String>,
        localized_options: Option<Vec<String>>,
    },
}
