//! Route paths of the game API, relative to the API base URL

use urlencoding::encode;

/// `GET /games/{id}`
pub fn game(game_id: &str) -> String {
    format!("/games/{}", encode(game_id))
}

/// `POST /games/{id}/join`
pub fn join(game_id: &str) -> String {
    format!("{}/join", game(game_id))
}

/// `POST /games/{id}/move`
pub fn submit_move(game_id: &str) -> String {
    format!("{}/move", game(game_id))
}

/// `GET /games/{id}/events?pseudo=...`
pub fn events(game_id: &str, pseudo: &str) -> String {
    format!("{}/events?pseudo={}", game(game_id), encode(pseudo))
}
