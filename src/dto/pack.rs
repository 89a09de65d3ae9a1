//! Cultural pack and question payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{CulturalPackEntity, Difficulty, QuestionEntity, QuestionKind},
    dto::validation::{validate_not_blank, validate_option_list},
    state::game::{localized_options, question_options},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PackSummary {
    pub id: i64,
    pub name: String,
    pub localized_name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub is_premium: bool,
}

impl From<CulturalPackEntity> for PackSummary {
    fn from(value: CulturalPackEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            localized_name: value.localized_name,
            description: value.description,
            icon_url: value.icon_url,
            is_premium: value.is_premium,
        }
    }
}

/// Request to publish a new cultural pack.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePackRequest {
    #[validate(length(min = 1, max = 80), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 80))]
    pub localized_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

/// Request to add a question to a pack.
///
/// Multiple-choice questions need at least two options and a correct answer taken from
/// them; other kinds take free-form answers.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuestionRequest {
    pub text: String,
    #[serde(default)]
    pub localized_text: Option<String>,
    pub kind: QuestionKind,
    pub correct_answer: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub localized_options: Option<Vec<String>>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Validate for CreateQuestionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_not_blank(&self.text) {
            errors.add("text", e);
        }
        if let Err(e) = validate_not_blank(&self.correct_answer) {
            errors.add("correct_answer", e);
        }

        let options = self.options.as_deref().unwrap_or_default();
        if let Err(e) = validate_option_list(options) {
            errors.add("options", e);
        }
        if let Some(localized) = self.localized_options.as_deref() {
            if let Err(e) = validate_option_list(localized) {
                errors.add("localized_options", e);
            }
            if localized.len() != options.len() {
                let mut err = validator::ValidationError::new("localized_options_length");
                err.message = Some("Localized options must match the options one to one".into());
                errors.add("localized_options", err);
            }
        }

        if self.kind == QuestionKind::MultipleChoice {
            if options.len() < 2 {
                let mut err = validator::ValidationError::new("too_few_options");
                err.message = Some("Multiple choice questions need at least two options".into());
                errors.add("options", err);
            } else if !options.contains(&self.correct_answer) {
                let mut err = validator::ValidationError::new("answer_not_in_options");
                err.message = Some("The correct answer must be one of the options".into());
                errors.add("correct_answer", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Full question record, answer included. Served to pack authors and practice mode.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionDetail {
    pub id: i64,
    pub pack_id: i64,
    pub text: String,
    pub localized_text: Option<String>,
    pub kind: QuestionKind,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub localized_options: Option<Vec<String>>,
    pub difficulty: Difficulty,
}

impl From<QuestionEntity> for QuestionDetail {
    fn from(value: QuestionEntity) -> Self {
        let options = question_options(&value);
        let localized_options = localized_options(&value);
        Self {
            id: value.id,
            pack_id: value.pack_id,
            text: value.text,
            localized_text: value.localized_text,
            kind: value.kind,
            correct_answer: value.correct_answer,
            options,
            localized_options,
            difficulty: value.difficulty,
        }
    }
}
