// Auction dollar value conversion.
//
// Converts total z-scores into auction dollar amounts. Each player's surplus
// over the replacement-level player is raised to a configurable exponent so
// that elite players earn a disproportionate share of the budget, then the
// distributable budget is spread across those adjusted points.

use tracing::debug;

use crate::config::LeagueConfig;
use crate::draft::state::DraftState;
use crate::valuation::zscore::PlayerValuation;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Inputs for pricing one player pool (hitters or pitchers).
#[derive(Debug, Clone, Copy)]
pub struct AuctionParams {
    /// League-wide dollars assigned to this pool.
    pub budget_pool: f64,
    pub num_teams: usize,
    /// Roster slots per team this pool fills.
    pub roster_slots: usize,
    /// Curve exponent applied to z above replacement.
    pub exponent: f64,
}

impl AuctionParams {
    pub fn total_draftable(&self) -> usize {
        self.num_teams * self.roster_slots
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Dollars per adjusted point, or 0 when there are no adjusted points.
pub fn price_per_point(distributable: f64, total_adjusted: f64) -> f64 {
    if total_adjusted > 0.0 {
        distributable / total_adjusted
    } else {
        0.0
    }
}

/// Dollar value for one player.
///
/// - Adjusted points > 0: `round(1 + adjusted * price_per_point)`
/// - Otherwise $1 within the draftable ranks, $0 beyond them
pub fn dollar_value_for(adjusted_points: f64, price_per_point: f64, within_draftable: bool) -> u32 {
    if adjusted_points > 0.0 {
        (1.0 + adjusted_points * price_per_point).round() as u32
    } else if within_draftable {
        1
    } else {
        0
    }
}

/// Assign dollar values to one player pool.
///
/// Algorithm:
/// 1. Sort descending by total z-score.
/// 2. `total_draftable` = `num_teams * roster_slots`; the replacement player
///    sits at index `min(total_draftable, len) - 1`.
/// 3. `adjusted` = `max(0, z - replacement_z) ^ exponent`
/// 4. `distributable` = `budget_pool - total_draftable` (every draftable
///    slot costs at least $1), floored at 0.
/// 5. Spread `distributable` over the adjusted points.
///
/// When `total_draftable` is 0 every player is priced at $0.
pub fn apply_dollar_values(players: &mut [PlayerValuation], params: &AuctionParams) {
    players.sort_by(|a, b| {
        b.total_zscore
            .partial_cmp(&a.total_zscore)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_draftable = params.total_draftable();
    if players.is_empty() || total_draftable == 0 {
        for p in players.iter_mut() {
            p.dollar_value = 0;
        }
        return;
    }

    let replacement_idx = (total_draftable - 1).min(players.len() - 1);
    let replacement_z = players[replacement_idx].total_zscore;

    let adjusted: Vec<f64> = players
        .iter()
        .map(|p| (p.total_zscore - replacement_z).max(0.0).powf(params.exponent))
        .collect();
    let total_adjusted: f64 = adjusted.iter().sum();

    let distributable = (params.budget_pool - total_draftable as f64).max(0.0);
    let ppp = price_per_point(distributable, total_adjusted);

    debug!(
        "pricing {} players: replacement z {:.2}, {:.1} adjusted points, ${:.2}/point",
        players.len(),
        replacement_z,
        total_adjusted,
        ppp
    );

    for (i, (player, adj)) in players.iter_mut().zip(adjusted).enumerate() {
        player.dollar_value = dollar_value_for(adj, ppp, i < total_draftable);
    }
}

// ---------------------------------------------------------------------------
// Inflation tracker
// ---------------------------------------------------------------------------

/// Tracks inflation/deflation during a live draft.
///
/// Compares the dollars left in the league against the pre-draft value
/// still on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationTracker {
    /// Total dollars spent across the entire league so far.
    pub total_dollars_spent: f64,
    /// Total dollars remaining across all teams.
    pub remaining_dollars: f64,
    /// Sum of dollar values for all undrafted players with value > $1.
    pub remaining_predraft_value: f64,
    /// Inflation rate: remaining_dollars / remaining_predraft_value.
    /// > 1.0 = more money than value left, < 1.0 = less.
    pub inflation_rate: f64,
}

impl InflationTracker {
    /// Create a new tracker with all zeros and a neutral inflation rate.
    pub fn new() -> Self {
        InflationTracker {
            total_dollars_spent: 0.0,
            remaining_dollars: 0.0,
            remaining_predraft_value: 0.0,
            inflation_rate: 1.0,
        }
    }

    /// Recompute the inflation rate from the draft state and the valued pool.
    /// Players already taken are excluded from the remaining value.
    pub fn update(&mut self, valuations: &[PlayerValuation], state: &DraftState, league: &LeagueConfig) {
        let total_budget = league.total_budget();
        self.total_dollars_spent = state.total_spent() as f64;
        self.remaining_dollars = (total_budget - self.total_dollars_spent).max(0.0);

        self.remaining_predraft_value = valuations
            .iter()
            .filter(|v| v.dollar_value > 1 && !state.is_taken(&v.key()))
            .map(|v| v.dollar_value as f64)
            .sum();

        self.inflation_rate = if self.remaining_predraft_value > 0.0 {
            self.remaining_dollars / self.remaining_predraft_value
        } else {
            1.0
        };
    }

    /// Adjust a base dollar value by the current inflation rate.
    ///
    /// The $1 floor is preserved: only the surplus above $1 is scaled.
    pub fn adjust(&self, base_value: f64) -> f64 {
        ((base_value - 1.0) * self.inflation_rate + 1.0).max(1.0)
    }
}

impl Default for InflationTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
