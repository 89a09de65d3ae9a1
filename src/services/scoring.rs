use crate::dao::models::{Difficulty, RoundType};

/// Points awarded for an answer.
///
/// Base points come from the difficulty; speed rounds multiply by 1.5 (floored) and the
/// final round doubles. Wrong answers earn nothing.
pub fn points(difficulty: Difficulty, round_type: RoundType, is_correct: bool) -> u32 {
    if !is_correct {
        return 0;
    }
    let base = match difficulty {
        Difficulty::Easy => 100,
        Difficulty::Medium => 150,
        Difficulty::Hard => 200,
    };
    match round_type {
        RoundType::Standard => base,
        RoundType::Speed => base * 3 / 2,
        RoundType::Final => base * 2,
    }
}
