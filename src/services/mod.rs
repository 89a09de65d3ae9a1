/// OpenAPI documentation generation.
pub mod documentation;
/// Session lifecycle: start, questions, answers, progression.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Lifeline usage and reveal payloads.
pub mod lifeline;
/// Cultural packs and question authoring.
pub mod pack_service;
/// Solo practice draws.
pub mod practice_service;
/// Leaderboard aggregation.
pub mod results_service;
/// Join code generation.
pub mod room_code;
/// Lobby operations.
pub mod room_service;
/// Points table.
pub mod scoring;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
