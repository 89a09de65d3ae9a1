use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Trivia Party Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::rooms::create_room,
        crate::routes::rooms::join_room,
        crate::routes::rooms::get_room_state,
        crate::routes::rooms::create_team,
        crate::routes::rooms::set_player_ready,
        crate::routes::rooms::assign_team,
        crate::routes::game::start_game,
        crate::routes::game::current_question,
        crate::routes::game::submit_answer,
        crate::routes::game::advance,
        crate::routes::game::use_lifeline,
        crate::routes::game::results,
        crate::routes::packs::list_packs,
        crate::routes::packs::create_pack,
        crate::routes::packs::add_question,
        crate::routes::packs::practice_questions,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dao::models::RoomStatus,
            crate::dao::models::RoundType,
            crate::dao::models::QuestionKind,
            crate::dao::models::Difficulty,
            crate::dao::models::LifelineType,
            crate::dto::lifeline::LifelineResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rooms", description = "Rooms, players and teams"),
        (name = "game", description = "Session lifecycle and scoring"),
        (name = "packs", description = "Cultural packs, questions and practice"),
    )
)]
pub struct ApiDoc;
