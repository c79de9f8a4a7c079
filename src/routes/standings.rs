//! `/api/standings*` routes — drag-ordered conference predictions.

use crate::predictions::leaderboard::Conference;
use crate::predictions::standings;
use crate::routes::util::{error_fragment, get_param, parse_form_body, parse_query};

// ── GET /api/standings ─────────────────────────────────────────────

/// Handle GET /api/standings?conference={East|West}&dragging={n}
pub fn handle_list_get(query: &str) -> String {
    let params = parse_query(query);
    let conference = match Conference::parse(get_param(&params, "conference").unwrap_or("")) {
        Ok(c) => c,
        Err(e) => return error_fragment(&e.to_string()),
    };
    let dragging = get_param(&params, "dragging").and_then(|s| s.parse().ok());
    standings::render_list(conference, dragging)
}

// ── POST /api/standings/move ───────────────────────────────────────

/// Handle POST /api/standings/move
/// Body: conference={East|West}&from={n}&to={n}
/// Returns the re-rendered list for that conference.
pub fn handle_move_post(body: &str) -> String {
    let params = parse_form_body(body);
    let conference = match Conference::parse(get_param(&params, "conference").unwrap_or("")) {
        Ok(c) => c,
        Err(e) => return error_fragment(&e.to_string()),
    };
    let index = |key: &str| get_param(&params, key).and_then(|s| s.parse::<usize>().ok());
    let (Some(from), Some(to)) = (index("from"), index("to")) else {
        return error_fragment("Missing or invalid from/to parameter");
    };

    match standings::with_standings_mut(|s| s.move_team(conference, from, to)) {
        Ok(()) => standings::render_list(conference, None),
        Err(e) => {
            let mut html = error_fragment(&e.to_string());
            html.push_str(&standings::render_list(conference, None));
            html
        }
    }
}

// ── GET /api/standings/state ───────────────────────────────────────

/// Handle GET /api/standings/state
/// Returns both conferences as JSON.
pub fn handle_state_get(_query: &str) -> String {
    standings::export_standings_json()
}

// ── POST /api/standings/import ─────────────────────────────────────

/// Handle POST /api/standings/import
/// Body: JSON produced by `/api/standings/state`.
pub fn handle_import_post(body: &str) -> String {
    match standings::import_standings_json(body) {
        Ok(()) => {
            r#"<span class="text-emerald-600">Standings imported successfully.</span>"#.to_string()
        }
        Err(e) => error_fragment(&format!("Import failed: {e}")),
    }
}
