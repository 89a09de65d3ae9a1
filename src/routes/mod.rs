use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod game;
pub mod health;
pub mod packs;
pub mod rooms;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(rooms::router())
        .merge(game::router())
        .merge(packs::router())
        .merge(docs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState};

    async fn app() -> Router<()> {
        let state = AppState::new(AppConfig {
            rng_seed: Some(21),
            ..AppConfig::default()
        });
        state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        router(state)
    }

    async fn call(app: &Router<()>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok_with_a_store() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/healthcheck", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn degraded_backend_answers_503() {
        let app = router(AppState::new(AppConfig::default()));
        let (status, body) = call(&app, "POST", "/rooms", Some(json!({}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["message"].is_string());

        let (status, body) = call(&app, "GET", "/healthcheck", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn unknown_room_is_404_with_message() {
        let app = app().await;
        let (status, body) = call(
            &app,
            "POST",
            "/rooms/ZZZZZZ/players",
            Some(json!({ "display_name": "Ada" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Room not found");
    }

    #[tokio::test]
    async fn blank_display_name_is_rejected() {
        let app = app().await;
        let (_, room) = call(&app, "POST", "/rooms", Some(json!({}))).await;
        let code = room["code"].as_str().unwrap().to_owned();

        let (status, _) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/players"),
            Some(json!({ "display_name": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn full_game_over_http() {
        let app = app().await;

        let (status, pack) = call(&app, "POST", "/packs", Some(json!({ "name": "Japan" }))).await;
        assert_eq!(status, StatusCode::OK);
        let pack_id = pack["id"].as_i64().unwrap();
        let (status, _) = call(
            &app,
            "POST",
            &format!("/packs/{pack_id}/questions"),
            Some(json!({
                "text": "Capital of Japan?",
                "kind": "multiple_choice",
                "correct_answer": "A: Tokyo",
                "options": ["A: Tokyo", "B: Kyoto", "C: Osaka"],
                "difficulty": "medium"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, room) = call(&app, "POST", "/rooms", Some(json!({ "host_id": 5 }))).await;
        let code = room["code"].as_str().unwrap().to_owned();
        let (_, joined) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/players"),
            Some(json!({ "display_name": "Ada" })),
        )
        .await;
        let player_id = joined["player_id"].as_i64().unwrap();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/game/start"),
            Some(json!({ "pack_id": 999 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "No questions available");

        let (status, started) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/game/start"),
            Some(json!({ "pack_id": pack_id, "count": 150 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["total_questions"], 1);

        let (status, _) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/game/start"),
            Some(json!({ "pack_id": pack_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, view) = call(
            &app,
            "GET",
            &format!("/rooms/{code}/game/question?player_id={player_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["question"]["options"][0], "A: Tokyo");
        assert!(view["question"].get("correct_answer").is_none());

        let (status, lifeline) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/game/lifeline"),
            Some(json!({ "player_id": player_id, "lifeline_type": "ask_native" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(lifeline["lifeline_type"], "ask_native");
        assert_eq!(lifeline["hint"], "The native suggests option A might be correct.");

        let answer = json!({ "player_id": player_id, "answer": "A: Tokyo" });
        let (status, scored) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/game/answer"),
            Some(answer.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scored["points_earned"], 150);

        let (status, body) = call(
            &app,
            "POST",
            &format!("/rooms/{code}/game/answer"),
            Some(answer),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Already answered this question");

        let (status, next) = call(&app, "POST", &format!("/rooms/{code}/game/next"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(next["finished"], true);

        let (status, results) = call(&app, "GET", &format!("/rooms/{code}/results"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["game_status"], "finished");
        assert_eq!(results["players"][0]["score"], 150);
        assert_eq!(results["players"][0]["accuracy"], 100);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app().await;
        let (status, doc) = call(&app, "GET", docs::OPENAPI_JSON_PATH, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/rooms/{code}/game/start"].is_object());
    }
}
