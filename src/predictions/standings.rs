//! Drag-ordered conference standings, the player's predicted finishing
//! order for each conference.
//!
//! Each team row is a drag source of type `TEAM` carrying its list index.
//! The page's drag-and-drop glue reads `data-item-type`/`data-index` off
//! the row, dims it while it is dragged, and posts `from`/`to` back to
//! `/api/standings/move` on drop.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::predictions::leaderboard::Conference;
use crate::routes::util::escape_html;

pub const TEAMS_PER_CONFERENCE: usize = 15;

pub const EAST_TEAMS: [&str; TEAMS_PER_CONFERENCE] = [
    "Atlanta Hawks",
    "Boston Celtics",
    "Brooklyn Nets",
    "Charlotte Hornets",
    "Chicago Bulls",
    "Cleveland Cavaliers",
    "Detroit Pistons",
    "Indiana Pacers",
    "Miami Heat",
    "Milwaukee Bucks",
    "New York Knicks",
    "Orlando Magic",
    "Philadelphia 76ers",
    "Toronto Raptors",
    "Washington Wizards",
];

pub const WEST_TEAMS: [&str; TEAMS_PER_CONFERENCE] = [
    "Dallas Mavericks",
    "Denver Nuggets",
    "Golden State Warriors",
    "Houston Rockets",
    "LA Clippers",
    "Los Angeles Lakers",
    "Memphis Grizzlies",
    "Minnesota Timberwolves",
    "New Orleans Pelicans",
    "Oklahoma City Thunder",
    "Phoenix Suns",
    "Portland Trail Blazers",
    "Sacramento Kings",
    "San Antonio Spurs",
    "Utah Jazz",
];

// ── Drag source ────────────────────────────────────────────────────

/// Kind of thing being dragged. Only teams are draggable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "TEAM")]
    Team,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Team => "TEAM",
        }
    }
}

/// Payload advertised by a drag source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem {
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub index: usize,
}

impl DragItem {
    pub fn team(index: usize) -> Self {
        Self {
            kind: ItemType::Team,
            index,
        }
    }
}

/// Row opacity: halved while the row is being dragged.
pub fn drag_opacity(is_dragging: bool) -> f32 {
    if is_dragging { 0.5 } else { 1.0 }
}

/// Move the element at `from` to position `to`, shifting the ones between.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = list.len();
    for index in [from, to] {
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
    }
    let item = list.remove(from);
    list.insert(to, item);
    Ok(())
}

// ── State ──────────────────────────────────────────────────────────

/// Predicted order per conference, best record first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub east: Vec<String>,
    pub west: Vec<String>,
}

impl Default for Standings {
    fn default() -> Self {
        Self {
            east: EAST_TEAMS.iter().map(|t| t.to_string()).collect(),
            west: WEST_TEAMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Standings {
    pub fn teams(&self, conference: Conference) -> &[String] {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    fn teams_mut(&mut self, conference: Conference) -> &mut Vec<String> {
        match conference {
            Conference::East => &mut self.east,
            Conference::West => &mut self.west,
        }
    }

    pub fn move_team(&mut self, conference: Conference, from: usize, to: usize) -> Result<()> {
        move_item(self.teams_mut(conference), from, to)
    }

    /// Each conference must be a reordering of its fifteen teams.
    pub fn validate(&self) -> Result<()> {
        for (conference, expected) in [
            (Conference::East, &EAST_TEAMS),
            (Conference::West, &WEST_TEAMS),
        ] {
            let mut got: Vec<&str> = self.teams(conference).iter().map(String::as_str).collect();
            let mut want: Vec<&str> = expected.to_vec();
            got.sort_unstable();
            want.sort_unstable();
            if got != want {
                return Err(Error::InvalidStandings(format!(
                    "{} conference must list each of its {} teams exactly once",
                    conference.as_str(),
                    TEAMS_PER_CONFERENCE
                )));
            }
        }
        Ok(())
    }
}

thread_local! {
    static STANDINGS: RefCell<Standings> = RefCell::new(Standings::default());
}

/// Execute a closure with read access to the standings.
pub fn with_standings<F, R>(f: F) -> R
where
    F: FnOnce(&Standings) -> R,
{
    STANDINGS.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the standings.
pub fn with_standings_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Standings) -> R,
{
    STANDINGS.with(|s| f(&mut s.borrow_mut()))
}

/// Replace the standings wholesale (used by import and tests).
pub fn replace_standings(new_standings: Standings) {
    STANDINGS.with(|s| {
        *s.borrow_mut() = new_standings;
    });
}

pub fn export_standings_json() -> String {
    with_standings(|s| serde_json::to_string(s).unwrap_or_else(|_| "{}".to_string()))
}

/// Import standings from JSON. Rejected payloads leave the current order alone.
pub fn import_standings_json(json: &str) -> Result<()> {
    let standings: Standings = serde_json::from_str(json)?;
    standings.validate()?;
    replace_standings(standings);
    Ok(())
}

// ── Rendering ──────────────────────────────────────────────────────

/// Render the draggable list for one conference.
/// `dragging` is the index currently being dragged, if any.
pub fn render_list(conference: Conference, dragging: Option<usize>) -> String {
    with_standings(|standings| {
        let teams = standings.teams(conference);
        let mut html = String::with_capacity(128 + teams.len() * 192);
        html.push_str(&format!(
            r#"<ol class="space-y-1" data-conference="{}">"#,
            conference.as_str()
        ));
        for (index, team) in teams.iter().enumerate() {
            let item = DragItem::team(index);
            html.push_str(&format!(
                r#"<li draggable="true" data-item-type="{}" data-index="{}" style="opacity: {}" class="cursor-move rounded border px-2 py-1">"#,
                item.kind.as_str(),
                item.index,
                drag_opacity(dragging == Some(index))
            ));
            html.push_str(&format!(
                r#"<span class="font-bold mr-2">{}</span>{}</li>"#,
                index + 1,
                escape_html(team)
            ));
        }
        html.push_str("</ol>");
        html
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_halves_while_dragging() {
        assert_eq!(drag_opacity(true), 0.5);
        assert_eq!(drag_opacity(false), 1.0);
    }

    #[test]
    fn drag_item_serializes_as_team() {
        let json = serde_json::to_string(&DragItem::team(3)).unwrap();
        assert_eq!(json, r#"{"type":"TEAM","index":3}"#);
    }

    #[test]
    fn move_item_down_and_up() {
        let mut list = vec!['a', 'b', 'c', 'd'];
        move_item(&mut list, 0, 2).unwrap();
        assert_eq!(list, ['b', 'c', 'a', 'd']);
        move_item(&mut list, 3, 0).unwrap();
        assert_eq!(list, ['d', 'b', 'c', 'a']);
        move_item(&mut list, 1, 1).unwrap();
        assert_eq!(list, ['d', 'b', 'c', 'a']);
    }

    #[test]
    fn move_item_rejects_out_of_range() {
        let mut list = vec![1, 2, 3];
        assert!(matches!(
            move_item(&mut list, 3, 0),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            move_item(&mut list, 0, 7),
            Err(Error::IndexOutOfRange { index: 7, len: 3 })
        ));
        assert_eq!(list, [1, 2, 3]);
    }

    #[test]
    fn default_standings_are_valid() {
        let standings = Standings::default();
        assert_eq!(standings.east.len(), TEAMS_PER_CONFERENCE);
        assert_eq!(standings.west.len(), TEAMS_PER_CONFERENCE);
        standings.validate().unwrap();
    }

    #[test]
    fn move_team_only_touches_one_conference() {
        let mut standings = Standings::default();
        standings.move_team(Conference::West, 14, 0).unwrap();
        assert_eq!(standings.west[0], "Utah Jazz");
        assert_eq!(standings.east, Standings::default().east);
    }

    #[test]
    fn import_rejects_missing_team() {
        let mut standings = Standings::default();
        standings.east.pop();
        let json = serde_json::to_string(&standings).unwrap();
        assert!(matches!(
            import_standings_json(&json),
            Err(Error::InvalidStandings(_))
        ));
    }

    #[test]
    fn export_import_roundtrip() {
        with_standings_mut(|s| s.move_team(Conference::East, 1, 0).unwrap());
        let json = export_standings_json();

        replace_standings(Standings::default());
        with_standings(|s| assert_eq!(s.east[0], "Atlanta Hawks"));

        import_standings_json(&json).unwrap();
        with_standings(|s| assert_eq!(s.east[0], "Boston Celtics"));

        replace_standings(Standings::default());
    }

    #[test]
    fn list_marks_rows_as_team_drag_sources() {
        replace_standings(Standings::default());
        let html = render_list(Conference::East, Some(2));
        assert_eq!(html.matches(r#"draggable="true""#).count(), 15);
        assert!(html.contains(r#"data-item-type="TEAM" data-index="2" style="opacity: 0.5""#));
        assert!(html.contains(r#"data-index="0" style="opacity: 1""#));
        assert!(html.contains("Philadelphia 76ers"));
    }
}
