// Positions, roster slot rules, and individual pick records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::valuation::projections::PlayerKind;

/// Baseball positions and roster slot designations.
///
/// Playing positions (C, 1B, ... RP) describe player eligibility. Aggregate
/// designations (OF, CI, MI, UTIL, P) and meta slots (BE, IL) describe
/// roster slots that accept several playing positions. Variants are declared
/// in display order, so the derived `Ord` sorts rosters naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    ShortStop,
    #[serde(rename = "CI")]
    CornerInfield,
    #[serde(rename = "MI")]
    MiddleInfield,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "OF")]
    Outfield,
    #[serde(rename = "DH")]
    DesignatedHitter,
    #[serde(rename = "UTIL", alias = "U")]
    Utility,
    #[serde(rename = "SP")]
    StartingPitcher,
    #[serde(rename = "RP")]
    ReliefPitcher,
    #[serde(rename = "P")]
    Pitcher,
    #[serde(rename = "BE", alias = "BN")]
    Bench,
    #[serde(rename = "IL", alias = "DL")]
    InjuredList,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Accepts the usual abbreviations, case-insensitively:
    /// "OF" is the generic outfield, "CI"/"MI" the corner and middle infield
    /// slots, "UTIL"/"U", "BE"/"BN", "IL"/"DL".
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "3B" => Some(Position::ThirdBase),
            "SS" => Some(Position::ShortStop),
            "CI" => Some(Position::CornerInfield),
            "MI" => Some(Position::MiddleInfield),
            "LF" => Some(Position::LeftField),
            "CF" => Some(Position::CenterField),
            "RF" => Some(Position::RightField),
            "OF" => Some(Position::Outfield),
            "DH" => Some(Position::DesignatedHitter),
            "UTIL" | "U" => Some(Position::Utility),
            "SP" => Some(Position::StartingPitcher),
            "RP" => Some(Position::ReliefPitcher),
            "P" => Some(Position::Pitcher),
            "BE" | "BN" => Some(Position::Bench),
            "IL" | "DL" => Some(Position::InjuredList),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::CornerInfield => "CI",
            Position::MiddleInfield => "MI",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::Outfield => "OF",
            Position::DesignatedHitter => "DH",
            Position::Utility => "UTIL",
            Position::StartingPitcher => "SP",
            Position::ReliefPitcher => "RP",
            Position::Pitcher => "P",
            Position::Bench => "BE",
            Position::InjuredList => "IL",
        }
    }

    /// Whether this position is a hitting position (not a pitcher).
    pub fn is_hitter(&self) -> bool {
        matches!(
            self,
            Position::Catcher
                | Position::FirstBase
                | Position::SecondBase
                | Position::ThirdBase
                | Position::ShortStop
                | Position::CornerInfield
                | Position::MiddleInfield
                | Position::LeftField
                | Position::CenterField
                | Position::RightField
                | Position::Outfield
                | Position::DesignatedHitter
                | Position::Utility
        )
    }

    pub fn is_pitcher(&self) -> bool {
        matches!(
            self,
            Position::StartingPitcher | Position::ReliefPitcher | Position::Pitcher
        )
    }

    /// Whether this is a meta-slot (not tied to any playing position).
    pub fn is_meta_slot(&self) -> bool {
        matches!(self, Position::Utility | Position::Bench | Position::InjuredList)
    }

    /// Whether a roster slot of this type can hold a player eligible at `pos`.
    ///
    /// Aggregate slots accept their member positions; LF/CF/RF slots also
    /// accept generic OF eligibility; UTIL and DH take any hitter; P takes
    /// any pitcher; bench takes anyone; IL is never drafted into.
    pub fn accepts(&self, pos: Position) -> bool {
        match self {
            Position::Outfield => matches!(
                pos,
                Position::LeftField | Position::CenterField | Position::RightField | Position::Outfield
            ),
            Position::LeftField | Position::CenterField | Position::RightField => {
                pos == *self || pos == Position::Outfield
            }
            Position::CornerInfield => matches!(
                pos,
                Position::FirstBase | Position::ThirdBase | Position::CornerInfield
            ),
            Position::MiddleInfield => matches!(
                pos,
                Position::SecondBase | Position::ShortStop | Position::MiddleInfield
            ),
            Position::Utility | Position::DesignatedHitter => pos.is_hitter(),
            Position::Pitcher => pos.is_pitcher(),
            Position::Bench => pos != Position::InjuredList,
            Position::InjuredList => false,
            slot => *slot == pos,
        }
    }

    /// Whether a roster slot of this type can hold the given player.
    pub fn accepts_any(&self, positions: &[Position], kind: PlayerKind) -> bool {
        if positions.is_empty() {
            // No eligibility data: fall back to the player kind.
            return match self {
                Position::Bench => true,
                Position::Utility | Position::DesignatedHitter => kind == PlayerKind::Hitter,
                Position::Pitcher => kind == PlayerKind::Pitcher,
                _ => false,
            };
        }
        positions.iter().any(|&p| self.accepts(p))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Parse a position list such as "2B, SS" or "OF/DH". Unknown tokens are
/// dropped.
pub fn parse_position_list(s: &str) -> Vec<Position> {
    let mut out = Vec::new();
    for token in s.split(|c: char| c == ',' || c == '/' || c.is_whitespace()) {
        if let Some(pos) = Position::from_str_pos(token) {
            if !out.contains(&pos) {
                out.push(pos);
            }
        }
    }
    out
}

/// A single recorded draft pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    /// Sequential pick number as reported by the draft source.
    pub pick_number: u32,
    /// Tracker key of the resolved player (name|team|kind).
    pub player_key: String,
    pub player_name: String,
    pub team: String,
    pub kind: PlayerKind,
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Manager (fantasy team) that made the pick, if the source reported it.
    #[serde(default)]
    pub manager: Option<String>,
    /// Whether the user's team acquired the player.
    pub mine: bool,
    /// Auction price, if known.
    #[serde(default)]
    pub cost: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("C"), Some(Position::Catcher));
        assert_eq!(Position::from_str_pos("SS"), Some(Position::ShortStop));
        assert_eq!(Position::from_str_pos("SP"), Some(Position::StartingPitcher));
        assert_eq!(Position::from_str_pos("RP"), Some(Position::ReliefPitcher));
        assert_eq!(Position::from_str_pos("1B"), Some(Position::FirstBase));
        assert_eq!(Position::from_str_pos("3B"), Some(Position::ThirdBase));
    }

    #[test]
    fn from_str_pos_aggregate_slots() {
        assert_eq!(Position::from_str_pos("OF"), Some(Position::Outfield));
        assert_eq!(Position::from_str_pos("CI"), Some(Position::CornerInfield));
        assert_eq!(Position::from_str_pos("MI"), Some(Position::MiddleInfield));
        assert_eq!(Position::from_str_pos("P"), Some(Position::Pitcher));
        assert_eq!(Position::from_str_pos("U"), Some(Position::Utility));
        assert_eq!(Position::from_str_pos("BN"), Some(Position::Bench));
        assert_eq!(Position::from_str_pos("DL"), Some(Position::InjuredList));
    }

    #[test]
    fn from_str_pos_case_insensitive_and_invalid() {
        assert_eq!(Position::from_str_pos("sp"), Some(Position::StartingPitcher));
        assert_eq!(Position::from_str_pos("util"), Some(Position::Utility));
        assert_eq!(Position::from_str_pos("XX"), None);
        assert_eq!(Position::from_str_pos(""), None);
    }

    #[test]
    fn display_str_roundtrip() {
        let positions = [
            Position::Catcher,
            Position::FirstBase,
            Position::SecondBase,
            Position::ThirdBase,
            Position::ShortStop,
            Position::CornerInfield,
            Position::MiddleInfield,
            Position::LeftField,
            Position::CenterField,
            Position::RightField,
            Position::Outfield,
            Position::DesignatedHitter,
            Position::Utility,
            Position::StartingPitcher,
            Position::ReliefPitcher,
            Position::Pitcher,
            Position::Bench,
            Position::InjuredList,
        ];
        for pos in positions {
            let s = pos.display_str();
            assert_eq!(Position::from_str_pos(s), Some(pos), "Roundtrip failed for {}", s);
        }
    }

    #[test]
    fn aggregate_slots_accept_members() {
        assert!(Position::CornerInfield.accepts(Position::FirstBase));
        assert!(Position::CornerInfield.accepts(Position::ThirdBase));
        assert!(!Position::CornerInfield.accepts(Position::ShortStop));
        assert!(Position::MiddleInfield.accepts(Position::ShortStop));
        assert!(!Position::MiddleInfield.accepts(Position::FirstBase));
        assert!(Position::Outfield.accepts(Position::LeftField));
        assert!(Position::LeftField.accepts(Position::Outfield));
        assert!(!Position::LeftField.accepts(Position::RightField));
        assert!(Position::Pitcher.accepts(Position::ReliefPitcher));
        assert!(!Position::Pitcher.accepts(Position::Catcher));
    }

    #[test]
    fn utility_takes_hitters_only() {
        assert!(Position::Utility.accepts(Position::Catcher));
        assert!(Position::Utility.accepts(Position::DesignatedHitter));
        assert!(!Position::Utility.accepts(Position::StartingPitcher));
        assert!(Position::Bench.accepts(Position::StartingPitcher));
        assert!(!Position::InjuredList.accepts(Position::Catcher));
    }

    #[test]
    fn accepts_any_without_positions_uses_kind() {
        assert!(Position::Utility.accepts_any(&[], PlayerKind::Hitter));
        assert!(!Position::Utility.accepts_any(&[], PlayerKind::Pitcher));
        assert!(Position::Pitcher.accepts_any(&[], PlayerKind::Pitcher));
        assert!(!Position::Catcher.accepts_any(&[], PlayerKind::Hitter));
    }

    #[test]
    fn parse_position_list_mixed_separators() {
        assert_eq!(
            parse_position_list("2B, SS"),
            vec![Position::SecondBase, Position::ShortStop]
        );
        assert_eq!(
            parse_position_list("OF/DH"),
            vec![Position::Outfield, Position::DesignatedHitter]
        );
        assert_eq!(parse_position_list("SP, SP, ??"), vec![Position::StartingPitcher]);
    }

    #[test]
    fn position_serializes_as_abbreviation() {
        let json = serde_json::to_string(&vec![Position::FirstBase, Position::Outfield]).unwrap();
        assert_eq!(json, r#"["1B","OF"]"#);
        let back: Vec<Position> = serde_json::from_str(r#"["BN","U"]"#).unwrap();
        assert_eq!(back, vec![Position::Bench, Position::Utility]);
    }
}
