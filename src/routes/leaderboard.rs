//! `/api/leaderboard*` routes — render the season leaderboard.
//!
//! The page fetches `/leaderboard/{season}` from the backend itself and
//! posts the JSON here; the module keeps the last copy for the per-user view.

use crate::predictions::leaderboard;
use crate::routes::util::{error_fragment, get_param, parse_query};

// ── POST /api/leaderboard ──────────────────────────────────────────

/// Handle POST /api/leaderboard
/// Body: the raw leaderboard JSON.
pub fn handle_load_post(body: &str) -> String {
    match leaderboard::load_leaderboard_json(body) {
        Ok(()) => render_stored(),
        Err(e) => {
            log::warn!("rejected leaderboard payload: {e}");
            error_fragment(&format!("Could not read leaderboard: {e}"))
        }
    }
}

// ── GET /api/leaderboard ───────────────────────────────────────────

/// Handle GET /api/leaderboard
pub fn handle_get(_query: &str) -> String {
    render_stored()
}

// ── GET /api/leaderboard/user ──────────────────────────────────────

/// Handle GET /api/leaderboard/user?id={n}
pub fn handle_user_get(query: &str) -> String {
    let params = parse_query(query);
    let id: i64 = match get_param(&params, "id").and_then(|s| s.parse().ok()) {
        Some(id) => id,
        None => return error_fragment("Missing or invalid id parameter"),
    };

    leaderboard::with_leaderboard(|board| match board.and_then(|b| b.user(id)) {
        Some(user) => leaderboard::render_user_breakdown(user),
        None => error_fragment("Player not found"),
    })
}

fn render_stored() -> String {
    leaderboard::with_leaderboard(|board| match board {
        Some(board) => leaderboard::render_table(board),
        None => r#"<p class="text-center text-sm text-slate-500">Leaderboard not loaded.</p>"#
            .to_string(),
    })
}
