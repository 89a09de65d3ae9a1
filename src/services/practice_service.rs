//! Solo practice: a shuffled draw of full questions, answers included.

use rand::seq::SliceRandom;
use tracing::debug;

use crate::{
    dto::{pack::QuestionDetail, practice::PracticeQuery},
    error::ServiceError,
    state::SharedState,
};

/// Draw up to `count` random questions from a pack. Unknown packs yield an empty list.
pub async fn random_questions(
    state: &SharedState,
    query: PracticeQuery,
) -> Result<Vec<QuestionDetail>, ServiceError> {
    let store = state.require_game_store().await?;
    let mut questions = store.list_questions(query.pack_id).await?;
    {
        let mut rng = state.rng().lock().await;
        questions.shuffle(&mut *rng);
    }
    questions.truncate(
        query
            .count
            .unwrap_or(state.config().default_question_count),
    );

    debug!(pack_id = query.pack_id, count = questions.len(), "practice questions drawn");
    Ok(questions.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            game_store::{GameStore, memory::MemoryGameStore},
            models::{Difficulty, NewQuestion, QuestionKind},
        },
        state::AppState,
    };

    #[tokio::test]
    async fn draws_distinct_questions_with_answers() {
        let store = Arc::new(MemoryGameStore::new());
        let state = AppState::new(AppConfig {
            rng_seed: Some(9),
            ..AppConfig::default()
        });
        state.set_game_store(store.clone()).await;
        for index in 0..6 {
            store
                .insert_question(NewQuestion {
                    pack_id: 1,
                    text: format!("Q{index}"),
                    localized_text: None,
                    kind: QuestionKind::Numerical,
                    correct_answer: index.to_string(),
                    options: None,
                    localized_options: None,
                    difficulty: Difficulty::Easy,
                })
                .await
                .unwrap();
        }

        let drawn = random_questions(
            &state,
            PracticeQuery {
                pack_id: 1,
                count: Some(4),
            },
        )
        .await
        .unwrap();
        assert_eq!(drawn.len(), 4);
        let ids: HashSet<_> = drawn.iter().map(|question| question.id).collect();
        assert_eq!(ids.len(), 4);
        assert!(drawn.iter().all(|question| !question.correct_answer.is_empty()));

        let none = random_questions(
            &state,
            PracticeQuery {
                pack_id: 2,
                count: None,
            },
        )
        .await
        .unwrap();
        assert!(none.is_empty());
    }
}
