//! Season leaderboard as served by `/leaderboard/{season}`.
//!
//! The backend owns this schema; the module only deserializes it, keeps the
//! most recent copy around, and renders it. Optional and nullable fields are
//! both `Option`, so a missing key and an explicit `null` read the same.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::routes::util::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::East, Conference::West];

    pub fn as_str(self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }

    /// Accepts `East`/`West` in any letter case.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "east" => Ok(Conference::East),
            "west" => Ok(Conference::West),
            _ => Err(Error::UnknownConference(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub rank: i64,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub total_points: i64,
    /// Percentage, 0..=100.
    pub accuracy: u8,
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub points: i64,
    pub max_points: i64,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// One scored prediction. The two shapes share no discriminator field, so
/// the variant is picked by which keys are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    TeamStanding(TeamStandingPrediction),
    Question(QuestionPrediction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStandingPrediction {
    pub team: String,
    pub conference: Conference,
    /// 1..=15
    pub predicted_position: u8,
    #[serde(default)]
    pub actual_position: Option<u8>,
    /// `None` until the outcome is known.
    #[serde(default)]
    pub correct: Option<bool>,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPrediction {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub correct: Option<bool>,
    pub points: i64,
}

impl Leaderboard {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Users ordered by rank, ties broken by username.
    pub fn ranked(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.iter().collect();
        users.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.username.cmp(&b.username)));
        users
    }
}

impl User {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Avatar URL, treating an empty string like a missing one.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_deref().filter(|url| !url.is_empty())
    }

    /// Up to two uppercase initials of the display name, for the avatar placeholder.
    pub fn initials(&self) -> String {
        let name = if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        };
        name.split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Category {
    pub fn correct_count(&self) -> usize {
        self.predictions
            .iter()
            .filter(|p| p.correct() == Some(true))
            .count()
    }

    /// Predictions whose outcome is not known yet.
    pub fn pending_count(&self) -> usize {
        self.predictions
            .iter()
            .filter(|p| p.correct().is_none())
            .count()
    }
}

impl Prediction {
    pub fn points(&self) -> i64 {
        match self {
            Prediction::TeamStanding(p) => p.points,
            Prediction::Question(p) => p.points,
        }
    }

    pub fn correct(&self) -> Option<bool> {
        match self {
            Prediction::TeamStanding(p) => p.correct,
            Prediction::Question(p) => p.correct,
        }
    }
}

// ── Last loaded leaderboard ────────────────────────────────────────

thread_local! {
    static LEADERBOARD: RefCell<Option<Leaderboard>> = const { RefCell::new(None) };
}

/// Execute a closure with the most recently loaded leaderboard, if any.
pub fn with_leaderboard<F, R>(f: F) -> R
where
    F: FnOnce(Option<&Leaderboard>) -> R,
{
    LEADERBOARD.with(|lb| f(lb.borrow().as_ref()))
}

/// Replace the stored leaderboard.
pub fn replace_leaderboard(board: Option<Leaderboard>) {
    LEADERBOARD.with(|lb| *lb.borrow_mut() = board);
}

/// Parse and store a leaderboard payload. The stored copy is untouched on error.
pub fn load_leaderboard_json(json: &str) -> Result<()> {
    let board = Leaderboard::from_json(json)?;
    log::debug!("loaded leaderboard with {} users", board.users.len());
    replace_leaderboard(Some(board));
    Ok(())
}

// ── Rendering ──────────────────────────────────────────────────────

/// Render the ranked leaderboard table.
pub fn render_table(board: &Leaderboard) -> String {
    if board.users.is_empty() {
        return r#"<p class="text-center text-sm text-slate-500">No players yet.</p>"#.to_string();
    }

    let mut html = String::with_capacity(256 + board.users.len() * 256);
    html.push_str(r#"<table class="w-full text-sm"><thead><tr>"#);
    html.push_str(r#"<th>Rank</th><th>Player</th><th>Points</th><th>Accuracy</th>"#);
    html.push_str("</tr></thead><tbody>");

    for user in board.ranked() {
        html.push_str(&format!(
            r##"<tr hx-get="/api/leaderboard/user?id={}" hx-target="#user-breakdown" class="cursor-pointer">"##,
            user.id
        ));
        html.push_str(&format!("<td>{}</td>", user.rank));
        html.push_str("<td>");
        match user.avatar_url() {
            Some(url) => html.push_str(&format!(
                r#"<img src="{}" alt="" class="inline w-6 h-6 rounded-full mr-2">"#,
                escape_html(url)
            )),
            None => html.push_str(&format!(
                r#"<span class="inline-block w-6 h-6 rounded-full bg-slate-300 text-center mr-2">{}</span>"#,
                escape_html(&user.initials())
            )),
        }
        html.push_str(&format!(
            r#"{} <span class="text-slate-500">@{}</span></td>"#,
            escape_html(&user.display_name),
            escape_html(&user.username)
        ));
        html.push_str(&format!("<td>{}</td>", user.total_points));
        html.push_str(&format!("<td>{}%</td>", user.accuracy.min(100)));
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// Render one user's per-category breakdown.
pub fn render_user_breakdown(user: &User) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(&format!(
        r#"<div class="p-3"><p class="font-bold">{} — {} pts</p>"#,
        escape_html(&user.display_name),
        user.total_points
    ));

    for (name, category) in &user.categories {
        html.push_str(&format!(
            r#"<details class="mt-2"><summary>{} <span class="text-slate-500">{}/{} · {} correct</span></summary><ul>"#,
            escape_html(name),
            category.points,
            category.max_points,
            category.correct_count()
        ));
        for prediction in &category.predictions {
            html.push_str(&format!(
                r#"<li class="{}">{}</li>"#,
                outcome_class(prediction.correct()),
                prediction_label(prediction)
            ));
        }
        html.push_str("</ul></details>");
    }

    html.push_str("</div>");
    html
}

fn outcome_class(correct: Option<bool>) -> &'static str {
    match correct {
        Some(true) => "text-emerald-700",
        Some(false) => "text-red-600",
        None => "text-slate-500",
    }
}

fn prediction_label(prediction: &Prediction) -> String {
    match prediction {
        Prediction::TeamStanding(p) => {
            let actual = p
                .actual_position
                .map(|pos| format!("#{pos}"))
                .unwrap_or_else(|| "TBD".to_string());
            format!(
                "{} ({}) — predicted #{}, actual {} · {} pts",
                escape_html(&p.team),
                p.conference.as_str(),
                p.predicted_position,
                actual,
                p.points
            )
        }
        Prediction::Question(p) => format!(
            "{} — {} · {} pts",
            escape_html(&p.question),
            escape_html(&p.answer),
            p.points
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "users": [
            {
                "id": 2, "rank": 2, "username": "bob", "display_name": "Bob Jones",
                "total_points": 40, "accuracy": 55,
                "categories": {}
            },
            {
                "id": 1, "rank": 1, "username": "ann", "display_name": "Ann <Lee>",
                "avatar": null, "total_points": 72, "accuracy": 80,
                "categories": {
                    "Regular Season Standings": {
                        "points": 30, "max_points": 60,
                        "predictions": [
                            {"team": "Celtics", "conference": "East",
                             "predicted_position": 1, "actual_position": 1,
                             "correct": true, "points": 3},
                            {"team": "Nuggets", "conference": "West",
                             "predicted_position": 2, "actual_position": null,
                             "correct": null, "points": 0}
                        ]
                    },
                    "Awards": {
                        "points": 5, "max_points": 10,
                        "predictions": [
                            {"question": "MVP?", "answer": "Jokic",
                             "correct": false, "points": 0}
                        ]
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn parses_both_prediction_shapes() {
        let board = Leaderboard::from_json(SAMPLE).unwrap();
        let ann = board.user(1).unwrap();

        let standings = ann.category("Regular Season Standings").unwrap();
        match &standings.predictions[0] {
            Prediction::TeamStanding(p) => {
                assert_eq!(p.team, "Celtics");
                assert_eq!(p.conference, Conference::East);
                assert_eq!(p.actual_position, Some(1));
            }
            other => panic!("expected team standing, got {other:?}"),
        }

        let awards = ann.category("Awards").unwrap();
        assert!(matches!(
            &awards.predictions[0],
            Prediction::Question(q) if q.answer == "Jokic" && q.correct == Some(false)
        ));
    }

    #[test]
    fn missing_and_null_optionals_are_equivalent() {
        let board = Leaderboard::from_json(SAMPLE).unwrap();
        assert_eq!(board.user(1).unwrap().avatar, None);
        assert_eq!(board.user(2).unwrap().avatar, None);

        let missing: TeamStandingPrediction = serde_json::from_str(
            r#"{"team":"Heat","conference":"East","predicted_position":6,"points":0}"#,
        )
        .unwrap();
        assert_eq!(missing.actual_position, None);
        assert_eq!(missing.correct, None);
    }

    #[test]
    fn category_counts() {
        let board = Leaderboard::from_json(SAMPLE).unwrap();
        let standings = board
            .user(1)
            .unwrap()
            .category("Regular Season Standings")
            .unwrap();
        assert_eq!(standings.correct_count(), 1);
        assert_eq!(standings.pending_count(), 1);
        assert_eq!(standings.predictions[0].points(), 3);
    }

    #[test]
    fn ranked_orders_by_rank() {
        let board = Leaderboard::from_json(SAMPLE).unwrap();
        let names: Vec<_> = board.ranked().into_iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["ann", "bob"]);
    }

    #[test]
    fn invalid_conference_is_rejected() {
        let json = r#"{"users":[{"id":1,"rank":1,"username":"a","display_name":"A",
            "total_points":0,"accuracy":0,"categories":{"x":{"points":0,"max_points":0,
            "predictions":[{"team":"Heat","conference":"North","predicted_position":1,"points":0}]}}}]}"#;
        assert!(Leaderboard::from_json(json).is_err());
    }

    #[test]
    fn conference_parse_is_case_insensitive() {
        assert_eq!(Conference::parse("west").unwrap(), Conference::West);
        assert_eq!(Conference::parse("EAST").unwrap(), Conference::East);
        assert!(matches!(
            Conference::parse("central"),
            Err(Error::UnknownConference(_))
        ));
    }

    #[test]
    fn initials_and_avatar_fallback() {
        let mut board = Leaderboard::from_json(SAMPLE).unwrap();
        let bob = &mut board.users[0];
        assert_eq!(bob.initials(), "BJ");
        bob.avatar = Some(String::new());
        assert_eq!(bob.avatar_url(), None);
        bob.avatar = Some("https://cdn.example/bob.png".to_string());
        assert_eq!(bob.avatar_url(), Some("https://cdn.example/bob.png"));
    }

    #[test]
    fn table_escapes_user_text() {
        let board = Leaderboard::from_json(SAMPLE).unwrap();
        let html = render_table(&board);
        assert!(html.contains("Ann &lt;Lee&gt;"));
        assert!(!html.contains("<Lee>"));
        assert!(html.find("@ann").unwrap() < html.find("@bob").unwrap());
    }

    #[test]
    fn empty_table_has_placeholder() {
        assert!(render_table(&Leaderboard::default()).contains("No players yet"));
    }

    #[test]
    fn breakdown_lists_predictions() {
        let board = Leaderboard::from_json(SAMPLE).unwrap();
        let html = render_user_breakdown(board.user(1).unwrap());
        assert!(html.contains("Celtics (East)"));
        assert!(html.contains("actual TBD"));
        assert!(html.contains("MVP?"));
    }

    #[test]
    fn failed_load_keeps_previous_board() {
        load_leaderboard_json(SAMPLE).unwrap();
        assert!(load_leaderboard_json("{oops").is_err());
        with_leaderboard(|lb| assert_eq!(lb.unwrap().users.len(), 2));
        replace_leaderboard(None);
    }
}
