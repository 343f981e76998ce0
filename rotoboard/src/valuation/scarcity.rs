// Positional scarcity tables.
//
// For each tracked position, counts how many undrafted players clear each
// value tier. Counts are recomputed from scratch on every call.

use std::collections::{BTreeMap, HashMap};

use crate::config::{DraftMode, ScarcityConfig};
use crate::draft::pick::Position;
use crate::draft::state::DraftState;
use crate::valuation::zscore::PlayerValuation;

/// Position -> cumulative undrafted counts, one per tier (highest tier first).
pub type ScarcityTable = BTreeMap<Position, Vec<usize>>;

// ---------------------------------------------------------------------------
// Metric selection
// ---------------------------------------------------------------------------

/// Which valuation number the tiers are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScarcityMode {
    Dollars,
    ZScore,
}

impl ScarcityMode {
    /// Dollars for auction drafts, z-score for snake drafts.
    pub fn for_draft_mode(mode: DraftMode) -> Self {
        match mode {
            DraftMode::Auction => ScarcityMode::Dollars,
            DraftMode::Snake => ScarcityMode::ZScore,
        }
    }

    pub fn metric(&self, player: &PlayerValuation) -> f64 {
        match self {
            ScarcityMode::Dollars => player.dollar_value as f64,
            ScarcityMode::ZScore => player.total_zscore,
        }
    }

    /// The configured tier thresholds for this metric.
    pub fn tiers<'a>(&self, config: &'a ScarcityConfig) -> &'a [f64] {
        match self {
            ScarcityMode::Dollars => &config.dollar_tiers,
            ScarcityMode::ZScore => &config.zscore_tiers,
        }
    }
}

// ---------------------------------------------------------------------------
// Scarcity urgency levels
// ---------------------------------------------------------------------------

/// How urgently a position needs to be addressed, judged by how many
/// players remain in its top tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScarcityUrgency {
    /// 0-3 top-tier players left.
    Critical,
    /// 4-5 left.
    High,
    /// 6-9 left.
    Medium,
    /// 10+ left.
    Low,
}

impl ScarcityUrgency {
    pub fn from_count(top_tier_count: usize) -> Self {
        match top_tier_count {
            0..=3 => ScarcityUrgency::Critical,
            4..=5 => ScarcityUrgency::High,
            6..=9 => ScarcityUrgency::Medium,
            _ => ScarcityUrgency::Low,
        }
    }

    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScarcityUrgency::Critical => "CRITICAL",
            ScarcityUrgency::High => "HIGH",
            ScarcityUrgency::Medium => "MEDIUM",
            ScarcityUrgency::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Tracked positions
// ---------------------------------------------------------------------------

/// Positions always tracked, whatever the roster looks like.
const BASE_POSITIONS: &[Position] = &[
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::Outfield,
    Position::StartingPitcher,
    Position::ReliefPitcher,
];

/// Aggregate slots tracked only when the league rosters them.
const AGGREGATE_POSITIONS: &[Position] = &[
    Position::CornerInfield,
    Position::MiddleInfield,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::DesignatedHitter,
    Position::Utility,
    Position::Pitcher,
];

/// Base positions plus the aggregate slots present in the roster config.
pub fn tracked_positions(roster_config: &HashMap<String, usize>) -> Vec<Position> {
    let configured: Vec<Position> = roster_config
        .iter()
        .filter(|(_, &count)| count > 0)
        .filter_map(|(key, _)| Position::from_str_pos(key))
        .collect();

    let mut tracked: Vec<Position> = BASE_POSITIONS.to_vec();
    tracked.extend(
        AGGREGATE_POSITIONS
            .iter()
            .copied()
            .filter(|p| configured.contains(p)),
    );
    tracked.sort();
    tracked
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Build the scarcity table for the undrafted pool.
///
/// A player counts toward every tracked position whose slot accepts one of
/// their eligible positions (so a 2B counts at 2B, MI and UTIL). For each
/// tier threshold the count is the number of undrafted players whose metric
/// is at or above it.
pub fn compute_scarcity(
    pool: &[PlayerValuation],
    state: &DraftState,
    roster_config: &HashMap<String, usize>,
    mode: ScarcityMode,
    tiers: &[f64],
) -> ScarcityTable {
    let tracked = tracked_positions(roster_config);
    let mut table: ScarcityTable = tracked
        .iter()
        .map(|&pos| (pos, vec![0; tiers.len()]))
        .collect();

    let Some(&lowest) = tiers.last() else {
        return table;
    };

    for player in pool {
        let metric = mode.metric(player);
        if metric < lowest || state.is_taken(&player.key()) {
            continue;
        }
        for &pos in &tracked {
            if !pos.accepts_any(&player.player.positions, player.player.kind) {
                continue;
            }
            if let Some(counts) = table.get_mut(&pos) {
                for (count, &threshold) in counts.iter_mut().zip(tiers) {
                    if metric >= threshold {
                        *count += 1;
                    }
                }
            }
        }
    }

    table
}

/// Count of undrafted players in a position's top tier.
pub fn top_tier_count(table: &ScarcityTable, position: Position) -> Option<usize> {
    table.get(&position).and_then(|counts| counts.first().copied())
}

/// Scarcity summary for a single position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScarcityEntry {
    pub position: Position,
    pub tier_counts: Vec<usize>,
    pub urgency: ScarcityUrgency,
}

/// Flatten a table into entries, most urgent first.
pub fn summarize(table: &ScarcityTable) -> Vec<ScarcityEntry> {
    let mut entries: Vec<ScarcityEntry> = table
        .iter()
        .map(|(&position, counts)| ScarcityEntry {
            position,
            tier_counts: counts.clone(),
            urgency: ScarcityUrgency::from_count(counts.first().copied().unwrap_or(0)),
        })
        .collect();
    entries.sort_by(|a, b| {
        a.urgency
            .cmp(&b.urgency)
            .then_with(|| a.position.cmp(&b.position))
    });
    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
