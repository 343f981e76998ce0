// Player pool model and loading.
//
// The pool arrives already parsed: one record per player with a map of
// numeric stat fields. Loading here only deserializes JSON and normalizes
// team codes; reading raw projection exports is left to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::draft::pick::Position;

/// Sentinel team code for unrecognized or missing teams.
pub const UNKNOWN_TEAM: &str = "UNKNOWN";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What a projection record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Hitter,
    Pitcher,
    /// A single record carrying both batting and pitching stats. The engine
    /// splits it into a hitter view and a pitcher view.
    TwoWay,
}

impl PlayerKind {
    /// Short tag used inside player keys.
    pub fn key_tag(&self) -> &'static str {
        match self {
            PlayerKind::Hitter => "H",
            PlayerKind::Pitcher => "P",
            PlayerKind::TwoWay => "TW",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerKind::Hitter => "hitter",
            PlayerKind::Pitcher => "pitcher",
            PlayerKind::TwoWay => "two-way",
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Projected season stats for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub name: String,
    #[serde(default = "unknown_team")]
    pub team: String,
    pub kind: PlayerKind,
    /// Counting and rate stats keyed by category name (e.g. "HR", "ERA").
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub injury: Option<String>,
    /// Set when the source team code was not recognized and `team` holds
    /// the `UNKNOWN` sentinel. Name-only matching is used for such players.
    #[serde(default)]
    pub unknown_team: bool,
    /// Set on the hitter and pitcher views produced from a two-way record.
    #[serde(default)]
    pub two_way: bool,
}

fn unknown_team() -> String {
    UNKNOWN_TEAM.to_string()
}

impl PlayerProjection {
    /// Build a projection, normalizing the team code.
    pub fn new(name: &str, team: &str, kind: PlayerKind) -> Self {
        let (team, known) = normalize_team_code(team);
        PlayerProjection {
            name: name.trim().to_string(),
            team,
            kind,
            stats: BTreeMap::new(),
            positions: Vec::new(),
            injury: None,
            unknown_team: !known,
            two_way: false,
        }
    }

    pub fn with_stat(mut self, category: &str, value: f64) -> Self {
        self.stats.insert(category.to_string(), value);
        self
    }

    pub fn with_positions(mut self, positions: &[Position]) -> Self {
        self.positions = positions.to_vec();
        self
    }

    /// Unique identity used by the draft tracker: name + team + kind.
    pub fn key(&self) -> String {
        player_key(&self.name, &self.team, self.kind)
    }

    pub fn is_pitcher(&self) -> bool {
        self.kind == PlayerKind::Pitcher
    }

    /// Split a two-way record into its hitter and pitcher views. Other
    /// records are returned unchanged as a single view.
    pub fn split_views(&self) -> Vec<PlayerProjection> {
        if self.kind != PlayerKind::TwoWay {
            return vec![self.clone()];
        }

        let mut hitter = self.clone();
        hitter.kind = PlayerKind::Hitter;
        hitter.two_way = true;
        hitter.positions.retain(|p| !p.is_pitcher());
        if hitter.positions.is_empty() {
            hitter.positions.push(Position::DesignatedHitter);
        }

        let mut pitcher = self.clone();
        pitcher.kind = PlayerKind::Pitcher;
        pitcher.two_way = true;
        pitcher.positions.retain(|p| p.is_pitcher());
        if pitcher.positions.is_empty() {
            pitcher.positions.push(Position::StartingPitcher);
        }

        vec![hitter, pitcher]
    }
}

/// Replace every two-way record with its hitter and pitcher views.
pub fn expand_two_way(pool: &[PlayerProjection]) -> Vec<PlayerProjection> {
    pool.iter().flat_map(|p| p.split_views()).collect()
}

/// Build the tracker key for a player identity.
pub fn player_key(name: &str, team: &str, kind: PlayerKind) -> String {
    format!("{}|{}|{}", name, team, kind.key_tag())
}

// ---------------------------------------------------------------------------
// Team codes
// ---------------------------------------------------------------------------

/// Recognized MLB team codes mapped to their canonical form.
const TEAM_CODES: &[(&str, &str)] = &[
    ("ARI", "ARI"), ("AZ", "ARI"),
    ("ATL", "ATL"),
    ("BAL", "BAL"),
    ("BOS", "BOS"),
    ("CHC", "CHC"),
    ("CWS", "CWS"), ("CHW", "CWS"),
    ("CIN", "CIN"),
    ("CLE", "CLE"),
    ("COL", "COL"),
    ("DET", "DET"),
    ("HOU", "HOU"),
    ("KC", "KC"), ("KCR", "KC"),
    ("LAA", "LAA"),
    ("LAD", "LAD"),
    ("MIA", "MIA"),
    ("MIL", "MIL"),
    ("MIN", "MIN"),
    ("NYM", "NYM"),
    ("NYY", "NYY"),
    ("OAK", "ATH"), ("ATH", "ATH"),
    ("PHI", "PHI"),
    ("PIT", "PIT"),
    ("SD", "SD"), ("SDP", "SD"),
    ("SEA", "SEA"),
    ("SF", "SF"), ("SFG", "SF"),
    ("STL", "STL"),
    ("TB", "TB"), ("TBR", "TB"),
    ("TEX", "TEX"),
    ("TOR", "TOR"),
    ("WSH", "WSH"), ("WSN", "WSH"), ("WAS", "WSH"),
    ("FA", "FA"),
];

/// Normalize a team code to its canonical form.
///
/// Returns the canonical code and `true` when recognized, or the `UNKNOWN`
/// sentinel and `false` otherwise.
pub fn normalize_team_code(code: &str) -> (String, bool) {
    let upper = code.trim().to_uppercase();
    match TEAM_CODES.iter().find(|(alias, _)| *alias == upper) {
        Some((_, canonical)) => (canonical.to_string(), true),
        None => (UNKNOWN_TEAM.to_string(), false),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid player pool JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Parse a JSON array of player records and normalize team codes.
///
/// Records with non-finite stat values have those stats dropped.
pub fn pool_from_json(text: &str) -> Result<Vec<PlayerProjection>, serde_json::Error> {
    let raw: Vec<PlayerProjection> = serde_json::from_str(text)?;
    Ok(raw.into_iter().map(normalize_record).collect())
}

fn normalize_record(mut player: PlayerProjection) -> PlayerProjection {
    player.name = player.name.trim().to_string();
    let (team, known) = normalize_team_code(&player.team);
    if !known && !player.unknown_team {
        warn!("unknown team code '{}' for {}", player.team, player.name);
    }
    player.team = team;
    player.unknown_team = !known;
    let name = player.name.clone();
    player.stats.retain(|category, value| {
        if value.is_finite() {
            true
        } else {
            warn!("dropping non-finite {} for {}", category, name);
            false
        }
    });
    player
}

/// Load a player pool from a JSON file.
pub fn load_pool(path: &Path) -> Result<Vec<PlayerProjection>, PoolError> {
    let text = std::fs::read_to_string(path).map_err(|e| PoolError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let pool = pool_from_json(&text).map_err(|e| PoolError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("Loaded {} player records from {}", pool.len(), path.display());
    Ok(pool)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_code_aliases_normalize() {
        assert_eq!(normalize_team_code("laa"), ("LAA".to_string(), true));
        assert_eq!(normalize_team_code("CHW"), ("CWS".to_string(), true));
        assert_eq!(normalize_team_code("WSN"), ("WSH".to_string(), true));
        assert_eq!(normalize_team_code(" SFG "), ("SF".to_string(), true));
    }

    #[test]
    fn unknown_team_code_maps_to_sentinel() {
        assert_eq!(normalize_team_code("XYZ"), (UNKNOWN_TEAM.to_string(), false));
        assert_eq!(normalize_team_code(""), (UNKNOWN_TEAM.to_string(), false));
        let p = PlayerProjection::new("Some Prospect", "ZZZ", PlayerKind::Hitter);
        assert_eq!(p.team, UNKNOWN_TEAM);
        assert!(p.unknown_team);
    }

    #[test]
    fn key_includes_kind() {
        let h = PlayerProjection::new("Shohei Ohtani", "LAD", PlayerKind::Hitter);
        let p = PlayerProjection::new("Shohei Ohtani", "LAD", PlayerKind::Pitcher);
        assert_eq!(h.key(), "Shohei Ohtani|LAD|H");
        assert_ne!(h.key(), p.key());
    }

    #[test]
    fn two_way_record_splits_into_views() {
        let tw = PlayerProjection::new("Shohei Ohtani", "LAD", PlayerKind::TwoWay)
            .with_stat("HR", 40.0)
            .with_stat("K", 180.0)
            .with_positions(&[Position::DesignatedHitter, Position::StartingPitcher]);
        let views = tw.split_views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].kind, PlayerKind::Hitter);
        assert_eq!(views[0].positions, vec![Position::DesignatedHitter]);
        assert!(views[0].two_way);
        assert_eq!(views[1].kind, PlayerKind::Pitcher);
        assert_eq!(views[1].positions, vec![Position::StartingPitcher]);
        assert!(views[1].two_way);
    }

    #[test]
    fn expand_two_way_keeps_order() {
        let pool = vec![
            PlayerProjection::new("Mike Trout", "LAA", PlayerKind::Hitter),
            PlayerProjection::new("Shohei Ohtani", "LAD", PlayerKind::TwoWay),
        ];
        let views = expand_two_way(&pool);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].name, "Mike Trout");
        assert_eq!(views[1].key(), "Shohei Ohtani|LAD|H");
        assert_eq!(views[2].key(), "Shohei Ohtani|LAD|P");
    }

    #[test]
    fn single_kind_record_is_its_own_view() {
        let h = PlayerProjection::new("Mike Trout", "LAA", PlayerKind::Hitter);
        assert_eq!(h.split_views(), vec![h.clone()]);
    }

    #[test]
    fn pool_json_parses_and_normalizes() {
        let json = r#"[
            {"name": " Mike Trout ", "team": "laa", "kind": "hitter",
             "stats": {"HR": 35, "PA": 600}, "positions": ["CF", "OF"]},
            {"name": "Gerrit Cole", "team": "??", "kind": "pitcher",
             "stats": {"IP": 190.5, "SO": 220}}
        ]"#;
        let pool = pool_from_json(json).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].name, "Mike Trout");
        assert_eq!(pool[0].team, "LAA");
        assert!(!pool[0].unknown_team);
        assert_eq!(pool[0].positions, vec![Position::CenterField, Position::Outfield]);
        assert_eq!(pool[1].team, UNKNOWN_TEAM);
        assert!(pool[1].unknown_team);
        assert_eq!(pool[1].stats.get("SO"), Some(&220.0));
    }

    #[test]
    fn pool_json_missing_team_is_unknown() {
        let json = r#"[{"name": "No Team", "kind": "hitter"}]"#;
        let pool = pool_from_json(json).unwrap();
        assert_eq!(pool[0].team, UNKNOWN_TEAM);
        assert!(pool[0].unknown_team);
    }

    #[test]
    fn load_pool_missing_file_is_io_error() {
        let err = load_pool(Path::new("/nonexistent/rotoboard/pool.json")).unwrap_err();
        assert!(matches!(err, PoolError::Io { .. }));
    }
}
