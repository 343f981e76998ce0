// Draft recommendations.
//
// Scores every undrafted player by weighted z-total, scaled by how well the
// player fits the user's open roster slots and weakest categories.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::config::{CategoryWeights, Config};
use crate::draft::pick::Position;
use crate::draft::roster::Roster;
use crate::draft::state::DraftState;
use crate::valuation::projections::PlayerKind;
use crate::valuation::scarcity::{top_tier_count, ScarcityTable};
use crate::valuation::stats::stat_or_zero;
use crate::valuation::zscore::PlayerValuation;

/// Top-tier count at or below which an empty slot's position is scarce.
const SCARCE_TOP_TIER: usize = 5;
/// Nonzero top-tier count at or below which any eligible position is scarce,
/// whatever the state of its slots.
const SECONDARY_SCARCE_TOP_TIER: usize = 3;
/// Team category spread below which the roster counts as balanced.
const BALANCED_RANGE: f64 = 0.5;
/// Fraction of the innings cap past which pitchers are discounted.
const INNINGS_CAP_THRESHOLD: f64 = 0.95;
const INNINGS_CAPPED_FACTOR: f64 = 0.5;
/// Number of categories reported in `category_fit`.
const CATEGORY_FIT_LEN: usize = 3;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A scored draft candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub key: String,
    pub name: String,
    pub team: String,
    pub kind: PlayerKind,
    pub positions: Vec<Position>,
    pub total_zscore: f64,
    pub dollar_value: u32,
    pub score: f64,
    pub positional_multiplier: f64,
    pub category_multiplier: f64,
    /// The player would go into an empty or under-filled slot.
    pub fills_need: bool,
    /// One of the player's open slots is at a scarce position.
    pub scarce: bool,
    /// The player's strongest contributions to the team's weakest
    /// categories, best first.
    pub category_fit: Vec<String>,
    /// The pitcher discount for a near-full innings cap was applied.
    pub innings_capped: bool,
}

// ---------------------------------------------------------------------------
// Positional need
// ---------------------------------------------------------------------------

/// Positional multiplier and the flags behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionalFit {
    pub multiplier: f64,
    pub fills_need: bool,
    pub scarce: bool,
}

/// Rate how much the user's roster needs a player with these slot types.
///
/// `eligible` is the list from [`Roster::eligible_slot_types`]. A player with
/// no eligible starting slot is neutral.
pub fn positional_fit(roster: &Roster, eligible: &[Position], scarcity: &ScarcityTable) -> PositionalFit {
    let is_scarce = |pos: Position, limit: usize| {
        top_tier_count(scarcity, pos).is_some_and(|count| count <= limit)
    };
    let is_thin = |pos: Position| {
        top_tier_count(scarcity, pos)
            .is_some_and(|count| (1..=SECONDARY_SCARCE_TOP_TIER).contains(&count))
    };

    let mut fit = PositionalFit {
        multiplier: 1.0,
        fills_need: false,
        scarce: false,
    };
    if eligible.is_empty() {
        return fit;
    }

    let usages: Vec<(Position, _)> = eligible.iter().map(|&pos| (pos, roster.usage(pos))).collect();
    let empty: Vec<Position> = usages
        .iter()
        .filter(|(_, u)| u.is_empty())
        .map(|(pos, _)| *pos)
        .collect();

    if !empty.is_empty() {
        fit.fills_need = true;
        if empty.iter().any(|&pos| is_scarce(pos, SCARCE_TOP_TIER)) {
            fit.multiplier = 1.6;
            fit.scarce = true;
        } else {
            fit.multiplier = 1.4;
        }
    } else if usages.iter().any(|(_, u)| !u.is_full()) {
        fit.fills_need = true;
        fit.multiplier = 1.2;
    } else {
        fit.multiplier = 0.8;
    }

    if !fit.scarce && eligible.iter().any(|&pos| is_thin(pos)) {
        fit.multiplier = fit.multiplier.max(1.15);
        fit.scarce = true;
    }

    fit
}

// ---------------------------------------------------------------------------
// Category need
// ---------------------------------------------------------------------------

/// Per-category need weights derived from the user's current roster.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNeeds {
    /// Category -> need weight (category weight already applied). Only
    /// categories with a nonzero weight appear.
    pub weights: BTreeMap<String, f64>,
    /// The roster is empty or its category totals are within a narrow band,
    /// so every player gets a multiplier of 1.0.
    pub balanced: bool,
}

impl CategoryNeeds {
    /// Derive needs from the summed z-scores of the user's rostered players.
    pub fn from_roster(
        state: &DraftState,
        by_key: &HashMap<String, &PlayerValuation>,
        categories: &[String],
        weights: &CategoryWeights,
    ) -> Self {
        let active: Vec<&String> = categories.iter().filter(|c| weights.get(c) != 0.0).collect();

        let mut totals: BTreeMap<String, f64> =
            active.iter().map(|c| ((*c).clone(), 0.0)).collect();
        let mut counted = 0;
        for rostered in &state.roster {
            let Some(valuation) = by_key.get(&rostered.key) else {
                continue;
            };
            counted += 1;
            for (category, total) in totals.iter_mut() {
                *total += valuation.zscore(category);
            }
        }

        let max = totals.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = totals.values().copied().fold(f64::INFINITY, f64::min);
        let range = max - min;

        if counted == 0 || totals.is_empty() || range < BALANCED_RANGE {
            return CategoryNeeds {
                weights: active.iter().map(|c| ((*c).clone(), weights.get(c))).collect(),
                balanced: true,
            };
        }

        let need_weights = totals
            .iter()
            .map(|(category, &z)| {
                let need = (1.0 + 0.5 * (max - z) / range) * weights.get(category);
                (category.clone(), need)
            })
            .collect();
        CategoryNeeds {
            weights: need_weights,
            balanced: false,
        }
    }

    /// Ratio of the player's need-weighted z-sum to its plain z-sum over the
    /// active categories, clamped to [0.8, 1.5].
    pub fn multiplier(&self, player: &PlayerValuation) -> f64 {
        if self.balanced {
            return 1.0;
        }
        let (weighted, plain) = self
            .weights
            .iter()
            .fold((0.0, 0.0), |(w, p), (category, need)| {
                let z = player.zscore(category);
                (w + need * z, p + z)
            });
        if plain.abs() < 1e-9 {
            return 1.0;
        }
        (weighted / plain).clamp(0.8, 1.5)
    }

    /// Categories the player helps most, weighted by need.
    pub fn best_fits(&self, player: &PlayerValuation) -> Vec<String> {
        let mut fits: Vec<(&String, f64)> = self
            .weights
            .iter()
            .map(|(category, need)| (category, need * player.zscore(category)))
            .filter(|(_, impact)| *impact > 0.0)
            .collect();
        fits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        fits.into_iter()
            .take(CATEGORY_FIT_LEN)
            .map(|(category, _)| category.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Innings
// ---------------------------------------------------------------------------

/// Projected innings of the pitchers on the user's roster.
pub fn roster_innings(state: &DraftState, by_key: &HashMap<String, &PlayerValuation>) -> f64 {
    state
        .roster
        .iter()
        .filter_map(|p| by_key.get(&p.key))
        .filter(|v| v.is_pitcher())
        .map(|v| stat_or_zero(&v.player, "IP"))
        .sum()
}

/// Whether the roster is close enough to the innings cap to discount pitchers.
pub fn near_innings_cap(innings: f64, cap: Option<f64>) -> bool {
    match cap {
        Some(cap) if cap > 0.0 => innings > INNINGS_CAP_THRESHOLD * cap,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Rank undrafted players for the user's next pick.
///
/// `score = total_zscore * positional multiplier * category multiplier`,
/// halved for pitchers once the roster is near the innings cap. Returns at
/// most `limit` players, highest score first.
pub fn recommend(
    valuations: &[PlayerValuation],
    state: &DraftState,
    config: &Config,
    scarcity: &ScarcityTable,
    limit: usize,
) -> Vec<Recommendation> {
    let league = &config.league;
    let by_key: HashMap<String, &PlayerValuation> =
        valuations.iter().map(|v| (v.key(), v)).collect();

    let roster = state.my_roster(&league.roster);
    let needs = CategoryNeeds::from_roster(
        state,
        &by_key,
        &league.all_categories(),
        &config.strategy.weights,
    );
    let innings = roster_innings(state, &by_key);
    let capped = near_innings_cap(innings, league.roster_limits.innings_cap);
    debug!(
        "Scoring {} players: roster innings {:.1}, capped {}, balanced {}",
        valuations.len(),
        innings,
        capped,
        needs.balanced
    );

    let mut scored: Vec<Recommendation> = valuations
        .iter()
        .filter(|v| !state.is_taken(&v.key()))
        .map(|v| {
            let eligible = roster.eligible_slot_types(&v.player.positions, v.player.kind);
            let fit = positional_fit(&roster, &eligible, scarcity);
            let category_multiplier = needs.multiplier(v);
            let innings_capped = capped && v.is_pitcher();

            let mut score = v.total_zscore * fit.multiplier * category_multiplier;
            if innings_capped {
                score *= INNINGS_CAPPED_FACTOR;
            }

            Recommendation {
                key: v.key(),
                name: v.player.name.clone(),
                team: v.player.team.clone(),
                kind: v.player.kind,
                positions: v.player.positions.clone(),
                total_zscore: v.total_zscore,
                dollar_value: v.dollar_value,
                score,
                positional_multiplier: fit.multiplier,
                category_multiplier,
                fills_need: fit.fills_need,
                scarce: fit.scarce,
                category_fit: needs.best_fits(v),
                innings_capped,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.total_zscore
                    .partial_cmp(&a.total_zscore)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.name.cmp(&b.name))
    });
    scored.truncate(limit);
    scored
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
