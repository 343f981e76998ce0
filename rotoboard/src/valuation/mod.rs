// Valuation engine: z-scores, auction dollar conversion, scarcity, and
// recommendations.

pub mod auction;
pub mod projections;
pub mod recommend;
pub mod scarcity;
pub mod stats;
pub mod zscore;

use tracing::info;

use crate::config::{Config, DraftMode};
use crate::draft::roster::slots_for_kind;
use auction::{apply_dollar_values, AuctionParams};
use projections::{expand_two_way, PlayerKind, PlayerProjection};
use zscore::{compute_zscores, PlayerValuation, ScoringRules};

/// Value the whole player pool.
///
/// Two-way records are split into hitter and pitcher views. Each kind is
/// z-scored against its own baseline pool; in auction mode each kind is then
/// priced from its share of the league budget. The result is ranked.
pub fn compute_values(pool: &[PlayerProjection], config: &Config) -> Vec<PlayerValuation> {
    let league = &config.league;
    let strategy = &config.strategy;

    let mut hitters = Vec::new();
    let mut pitchers = Vec::new();
    for view in expand_two_way(pool) {
        match view.kind {
            PlayerKind::Pitcher => pitchers.push(view),
            _ => hitters.push(view),
        }
    }

    let mut valued = Vec::with_capacity(hitters.len() + pitchers.len());
    for (kind, players) in [(PlayerKind::Hitter, hitters), (PlayerKind::Pitcher, pitchers)] {
        let rules = ScoringRules {
            kind,
            categories: league.categories(kind),
            inverted: &league.inverted_categories,
            weights: &strategy.weights,
        };
        let mut values = compute_zscores(
            &players,
            &rules,
            strategy.pool.size_for(kind),
            &strategy.valuation,
        );

        if league.draft_mode == DraftMode::Auction {
            let fraction = match kind {
                PlayerKind::Pitcher => 1.0 - strategy.hitting_budget_fraction,
                _ => strategy.hitting_budget_fraction,
            };
            let params = AuctionParams {
                budget_pool: league.total_budget() * fraction,
                num_teams: league.num_teams,
                roster_slots: slots_for_kind(&league.roster, kind),
                exponent: strategy.valuation.auction_exponent,
            };
            apply_dollar_values(&mut values, &params);
        }

        info!("Valued {} {}s", values.len(), kind);
        valued.extend(values);
    }

    rank_players(&mut valued, league.draft_mode);
    valued
}

/// Order players best-first and assign 1-based ranks.
///
/// Auction drafts rank by dollar value, snake drafts by total z-score. Ties
/// fall back to total z-score, then name.
pub fn rank_players(players: &mut [PlayerValuation], mode: DraftMode) {
    players.sort_by(|a, b| {
        let primary = match mode {
            DraftMode::Auction => b.dollar_value.cmp(&a.dollar_value),
            DraftMode::Snake => std::cmp::Ordering::Equal,
        };
        primary
            .then_with(|| {
                b.total_zscore
                    .partial_cmp(&a.total_zscore)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.name().cmp(b.name()))
    });
    for (i, p) in players.iter_mut().enumerate() {
        p.rank = i + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::draft::pick::Position;

    fn hitter(name: &str, hr: f64, sb: f64) -> PlayerProjection {
        PlayerProjection::new(name, "NYY", PlayerKind::Hitter)
            .with_stat("PA", 600.0)
            .with_stat("R", 80.0)
            .with_stat("HR", hr)
            .with_stat("RBI", 80.0)
            .with_stat("SB", sb)
            .with_stat("AVG", 0.260)
            .with_positions(&[Position::Outfield])
    }

    fn pitcher(name: &str, k: f64, era: f64) -> PlayerProjection {
        PlayerProjection::new(name, "ATL", PlayerKind::Pitcher)
            .with_stat("IP", 180.0)
            .with_stat("W", 12.0)
            .with_stat("SV", 0.0)
            .with_stat("K", k)
            .with_stat("ERA", era)
            .with_stat("WHIP", 1.20)
            .with_positions(&[Position::StartingPitcher])
    }

    fn pool() -> Vec<PlayerProjection> {
        let mut pool = Vec::new();
        for i in 0..30 {
            pool.push(hitter(&format!("Hitter {i:02}"), 40.0 - i as f64, (i % 7) as f64 * 3.0));
        }
        for i in 0..20 {
            pool.push(pitcher(&format!("Pitcher {i:02}"), 240.0 - 5.0 * i as f64, 2.8 + 0.08 * i as f64));
        }
        pool
    }

    #[test]
    fn auction_values_every_player_and_ranks_by_dollars() {
        let config = test_config();
        let values = compute_values(&pool(), &config);
        assert_eq!(values.len(), 50);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(v.rank, i + 1);
        }
        for w in values.windows(2) {
            assert!(w[0].dollar_value >= w[1].dollar_value);
        }
        assert!(values[0].dollar_value > 1);
    }

    #[test]
    fn snake_mode_has_no_dollars_and_ranks_by_zscore() {
        let mut config = test_config();
        config.league.draft_mode = DraftMode::Snake;
        let values = compute_values(&pool(), &config);
        assert!(values.iter().all(|v| v.dollar_value == 0));
        for w in values.windows(2) {
            assert!(w[0].total_zscore >= w[1].total_zscore);
        }
    }

    #[test]
    fn two_way_player_valued_as_both_kinds() {
        let config = test_config();
        let mut players = pool();
        players.push(
            PlayerProjection::new("Shohei Ohtani", "LAD", PlayerKind::TwoWay)
                .with_stat("PA", 650.0)
                .with_stat("HR", 45.0)
                .with_stat("SB", 20.0)
                .with_stat("IP", 140.0)
                .with_stat("K", 180.0)
                .with_stat("ERA", 3.0)
                .with_positions(&[Position::DesignatedHitter, Position::StartingPitcher]),
        );
        let values = compute_values(&players, &config);
        let keys: Vec<String> = values
            .iter()
            .filter(|v| v.name() == "Shohei Ohtani")
            .map(|v| v.key())
            .collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"Shohei Ohtani|LAD|H".to_string()));
        assert!(keys.contains(&"Shohei Ohtani|LAD|P".to_string()));
    }

    #[test]
    fn rank_ties_break_by_zscore_then_name() {
        let config = test_config();
        let mut values = compute_values(&pool(), &config);
        for v in values.iter_mut() {
            v.dollar_value = 5;
            v.total_zscore = 1.0;
        }
        rank_players(&mut values, DraftMode::Auction);
        assert_eq!(values[0].name(), "Hitter 00");
        assert_eq!(values[0].rank, 1);
    }

    #[test]
    fn empty_pool_values_nothing() {
        let config = test_config();
        assert!(compute_values(&[], &config).is_empty());
    }
}
