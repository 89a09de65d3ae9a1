use thiserror::Error;

use crate::dao::models::{RoomStatus, RoundType};

/// Events that move a room through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    /// The host started a session from the lobby.
    Start,
    /// The host advanced past the last question.
    Finish,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while the room is {}", from.as_str())]
pub struct InvalidTransition {
    /// The status the room was in when the event was received.
    pub from: RoomStatus,
    /// The event that cannot be applied from this status.
    pub event: RoomEvent,
}

/// Compute the status reached by applying `event` to a room in `from`.
///
/// `Finished` is terminal: nothing leaves it.
pub fn transition(from: RoomStatus, event: RoomEvent) -> Result<RoomStatus, InvalidTransition> {
    let next = match (from, event) {
        (RoomStatus::Lobby, RoomEvent::Start) => RoomStatus::Playing,
        (RoomStatus::Playing, RoomEvent::Finish) => RoomStatus::Finished,
        (from, event) => return Err(InvalidTransition { from, event }),
    };
    Ok(next)
}

/// Round tier and displayed round number for a question position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundProgress {
    pub round_type: RoundType,
    pub round: u32,
}

impl RoundProgress {
    /// Tier of the first question of a session.
    pub const OPENING: Self = Self {
        round_type: RoundType::Standard,
        round: 1,
    };

    /// Derive the round for the question at zero-based `index` out of `total`.
    ///
    /// The last fifth of the session is the final round (5), the fifth before it the speed
    /// round (4); earlier questions split into standard rounds 1 to 3.
    pub fn for_position(index: usize, total: usize) -> Self {
        if total == 0 {
            return Self::OPENING;
        }
        // Integer comparisons of index/total against 4/5 and 3/5.
        let scaled = index.saturating_mul(5);
        if scaled >= total.saturating_mul(4) {
            Self {
                round_type: RoundType::Final,
                round: 5,
            }
        } else if scaled >= total.saturating_mul(3) {
            Self {
                round_type: RoundType::Speed,
                round: 4,
            }
        } else {
            let round = (scaled / total) as u32 + 1;
            Self {
                round_type: RoundType::Standard,
                round: round.min(3),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lobby_starts_and_playing_finishes() {
        assert_eq!(
            transition(RoomStatus::Lobby, RoomEvent::Start),
            Ok(RoomStatus::Playing)
        );
        assert_eq!(
            transition(RoomStatus::Playing, RoomEvent::Finish),
            Ok(RoomStatus::Finished)
        );
    }

    #[test]
    fn invalid_transition_returns_error() {
        for (from, event) in [
            (RoomStatus::Lobby, RoomEvent::Finish),
            (RoomStatus::Playing, RoomEvent::Start),
            (RoomStatus::Finished, RoomEvent::Start),
            (RoomStatus::Finished, RoomEvent::Finish),
        ] {
            assert_eq!(
                transition(from, event),
                Err(InvalidTransition { from, event })
            );
        }
    }

    #[test]
    fn ten_question_session_rounds() {
        let rounds: Vec<_> = (1..10)
            .map(|index| RoundProgress::for_position(index, 10))
            .map(|progress| (progress.round_type, progress.round))
            .collect();

        assert_eq!(
            rounds,
            vec![
                (RoundType::Standard, 1),
                (RoundType::Standard, 2),
                (RoundType::Standard, 2),
                (RoundType::Standard, 3),
                (RoundType::Standard, 3),
                (RoundType::Speed, 4),
                (RoundType::Speed, 4),
                (RoundType::Final, 5),
                (RoundType::Final, 5),
            ]
        );
    }

    #[test]
    fn short_sessions_still_reach_the_final() {
        assert_eq!(RoundProgress::for_position(1, 2).round_type, RoundType::Standard);
        assert_eq!(RoundProgress::for_position(4, 5).round_type, RoundType::Final);
        assert_eq!(RoundProgress::for_position(3, 5).round_type, RoundType::Speed);
    }
}
