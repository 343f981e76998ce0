// Z-score calculation with baseline calibration, volume-weighted rate stats,
// and the strikeout efficiency bonus.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::{CategoryWeights, ValuationTuning};
use crate::valuation::projections::{PlayerKind, PlayerProjection};
use crate::valuation::stats::{canonical_category, stat_or_zero, stat_value};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single statistical category across a player pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// represents the full relevant player universe rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero).
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Volume and efficiency
// ---------------------------------------------------------------------------

/// Playing-time stat used to dampen rate categories.
pub fn volume_stat(kind: PlayerKind) -> &'static str {
    match kind {
        PlayerKind::Pitcher => "IP",
        _ => "PA",
    }
}

/// Whether a category is a rate stat for the given player kind.
pub fn is_rate_category(kind: PlayerKind, category: &str) -> bool {
    let cat = canonical_category(category);
    match kind {
        PlayerKind::Pitcher => matches!(cat.as_str(), "ERA" | "WHIP"),
        _ => matches!(cat.as_str(), "AVG" | "OBP" | "SLG" | "OPS"),
    }
}

/// Category that receives the efficiency bonus, with the rate stat feeding it.
fn efficiency_target(kind: PlayerKind) -> Option<(&'static str, &'static str)> {
    match kind {
        PlayerKind::Pitcher => Some(("K", "K/9")),
        _ => None,
    }
}

/// `min(1, sqrt(player_volume / mean_volume))`, or 1.0 when either volume is
/// zero. Full-time players are never boosted above 1.
pub fn volume_factor(player_volume: f64, mean_volume: f64) -> f64 {
    if player_volume <= 0.0 || mean_volume <= 0.0 {
        return 1.0;
    }
    (player_volume / mean_volume).sqrt().min(1.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Player valuation (main output struct)
// ---------------------------------------------------------------------------

/// A player carried through the valuation pipeline.
///
/// `dollar_value` and `rank` are left at 0 here and filled by the auction
/// and ranking stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerValuation {
    pub player: PlayerProjection,
    /// Finalized per-category z-scores, rounded to 2 decimals. Weights are
    /// not applied here.
    pub category_zscores: BTreeMap<String, f64>,
    /// Weighted sum of `category_zscores`.
    pub total_zscore: f64,
    pub dollar_value: u32,
    pub rank: usize,
}

impl PlayerValuation {
    pub fn key(&self) -> String {
        self.player.key()
    }

    pub fn name(&self) -> &str {
        &self.player.name
    }

    pub fn is_pitcher(&self) -> bool {
        self.player.is_pitcher()
    }

    pub fn zscore(&self, category: &str) -> f64 {
        self.category_zscores
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(category))
            .map(|(_, &z)| z)
            .unwrap_or(0.0)
    }
}

/// Scoring rules for one player kind.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRules<'a> {
    pub kind: PlayerKind,
    pub categories: &'a [String],
    pub inverted: &'a [String],
    pub weights: &'a CategoryWeights,
}

impl ScoringRules<'_> {
    fn is_inverted(&self, category: &str) -> bool {
        let cat = canonical_category(category);
        self.inverted.iter().any(|c| canonical_category(c) == cat)
    }

    fn signed(&self, category: &str, z: f64) -> f64 {
        if self.is_inverted(category) {
            -z
        } else {
            z
        }
    }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

fn category_pool_stats(players: &[&PlayerProjection], categories: &[String]) -> Vec<PoolStats> {
    categories
        .iter()
        .map(|cat| {
            let values: Vec<f64> = players.iter().map(|p| stat_or_zero(p, cat)).collect();
            compute_pool_stats(&values)
        })
        .collect()
}

/// Unadjusted weighted z total, used only to pick the baseline pool.
fn preliminary_total(player: &PlayerProjection, rules: &ScoringRules, stats: &[PoolStats]) -> f64 {
    rules
        .categories
        .iter()
        .zip(stats)
        .map(|(cat, s)| {
            let z = rules.signed(cat, compute_zscore(stat_or_zero(player, cat), s));
            rules.weights.get(cat) * z
        })
        .sum()
}

/// Baselines derived from the calibration pool.
struct Baselines {
    categories: Vec<PoolStats>,
    mean_volume: f64,
    efficiency: Option<PoolStats>,
}

fn compute_baselines(pool: &[&PlayerProjection], rules: &ScoringRules) -> Baselines {
    let categories = category_pool_stats(pool, rules.categories);

    let volumes: Vec<f64> = pool
        .iter()
        .map(|p| stat_or_zero(p, volume_stat(rules.kind)))
        .collect();
    let mean_volume = compute_pool_stats(&volumes).mean;

    let efficiency = efficiency_target(rules.kind).map(|(_, rate)| {
        let rates: Vec<f64> = pool.iter().filter_map(|p| stat_value(p, rate)).collect();
        compute_pool_stats(&rates)
    });

    Baselines {
        categories,
        mean_volume,
        efficiency,
    }
}

fn final_zscores(
    player: &PlayerProjection,
    rules: &ScoringRules,
    baselines: &Baselines,
    tuning: &ValuationTuning,
) -> (BTreeMap<String, f64>, f64) {
    let volume = stat_or_zero(player, volume_stat(rules.kind));
    let factor = volume_factor(volume, baselines.mean_volume);
    let target = efficiency_target(rules.kind);

    let mut zscores = BTreeMap::new();
    let mut total = 0.0;

    for (cat, stats) in rules.categories.iter().zip(&baselines.categories) {
        let mut z = rules.signed(cat, compute_zscore(stat_or_zero(player, cat), stats));

        if is_rate_category(rules.kind, cat) {
            z *= factor;
        }

        if let (Some((target_cat, rate)), Some(eff)) = (target, baselines.efficiency.as_ref()) {
            if canonical_category(cat) == target_cat {
                if let Some(rate_value) = stat_value(player, rate) {
                    z += tuning.efficiency_bonus * compute_zscore(rate_value, eff);
                }
            }
        }

        let z = round2(z);
        total += rules.weights.get(cat) * z;
        zscores.insert(cat.clone(), z);
    }

    (zscores, total)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compute z-scores for every player of one kind.
///
/// 1. Preliminary pass over the whole pool.
/// 2. If `0 < draftable_count < pool size`, recompute category baselines
///    from the top `draftable_count` players by preliminary total.
/// 3. Volume mean (and for pitchers the K/9 baseline) from that pool.
/// 4. Final pass scoring every player against the baselines.
///
/// Output order equals input order.
pub fn compute_zscores(
    players: &[PlayerProjection],
    rules: &ScoringRules,
    draftable_count: usize,
    tuning: &ValuationTuning,
) -> Vec<PlayerValuation> {
    if players.is_empty() {
        return Vec::new();
    }

    let all: Vec<&PlayerProjection> = players.iter().collect();
    let preliminary_stats = category_pool_stats(&all, rules.categories);

    let baseline_pool: Vec<&PlayerProjection> =
        if draftable_count > 0 && draftable_count < players.len() {
            let mut ranked: Vec<(usize, f64)> = all
                .iter()
                .enumerate()
                .map(|(i, p)| (i, preliminary_total(p, rules, &preliminary_stats)))
                .collect();
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });
            ranked
                .into_iter()
                .take(draftable_count)
                .map(|(i, _)| all[i])
                .collect()
        } else {
            all.clone()
        };

    debug!(
        "{} baseline pool: {} of {} players",
        rules.kind,
        baseline_pool.len(),
        players.len()
    );

    let baselines = compute_baselines(&baseline_pool, rules);

    players
        .iter()
        .map(|p| {
            let (category_zscores, total_zscore) = final_zscores(p, rules, &baselines, tuning);
            PlayerValuation {
                player: p.clone(),
                category_zscores,
                total_zscore,
                dollar_value: 0,
                rank: 0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
