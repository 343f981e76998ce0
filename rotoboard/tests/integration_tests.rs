// Integration tests for rotoboard.
//
// These tests exercise the library end-to-end through its public API:
// config parsing, pool loading, valuation, draft-log replay, scarcity, and
// recommendations working together.

use std::path::Path;

use rotoboard::config::{config_from_strs, Config, DraftMode};
use rotoboard::draft::log_parser::{parse_draft_log, parse_line, LineFormat};
use rotoboard::draft::resolver::normalize_name;
use rotoboard::draft::state::{DraftStateTracker, IncomingPick, PickOutcome};
use rotoboard::valuation::auction::{dollar_value_for, price_per_point, InflationTracker};
use rotoboard::valuation::compute_values;
use rotoboard::valuation::projections::{load_pool, PlayerProjection};
use rotoboard::valuation::recommend::recommend;
use rotoboard::valuation::scarcity::{compute_scarcity, summarize, ScarcityMode, ScarcityTable};
use rotoboard::valuation::zscore::{compute_zscore, PlayerValuation, PoolStats};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the package root, which is the cwd
/// for `cargo test`).
const FIXTURES: &str = "tests/fixtures";

const LEAGUE_TOML: &str = r#"
[league]
name = "Integration League"
num_teams = 4
salary_cap = 260
draft_mode = "auction"

[league.batting_categories]
categories = ["R", "HR", "RBI", "SB", "AVG"]

[league.pitching_categories]
categories = ["W", "SV", "K", "ERA", "WHIP"]

[league.roster]
C = 1
1B = 1
2B = 1
3B = 1
SS = 1
OF = 3
UTIL = 1
SP = 2
RP = 2
BE = 2
IL = 1

[league.roster_limits]
innings_cap = 1200.0

[league.my_team]
aliases = ["Me"]
"#;

const STRATEGY_TOML: &str = r#"
[budget]
hitting_budget_fraction = 0.65

[category_weights]
SV = 0.8

[data_paths]
players = "tests/fixtures/players.json"
draft_log = "tests/fixtures/draft_log.txt"
"#;

fn inline_config() -> Config {
    config_from_strs(LEAGUE_TOML, STRATEGY_TOML).expect("inline config is valid")
}

fn fixture_pool() -> Vec<PlayerProjection> {
    load_pool(&Path::new(FIXTURES).join("players.json")).expect("fixture pool loads")
}

fn fixture_log() -> String {
    std::fs::read_to_string(Path::new(FIXTURES).join("draft_log.txt")).expect("fixture log exists")
}

fn scarcity_for(values: &[PlayerValuation], tracker: &DraftStateTracker, config: &Config) -> ScarcityTable {
    let mode = ScarcityMode::for_draft_mode(config.league.draft_mode);
    compute_scarcity(
        values,
        tracker.state(),
        &config.league.roster,
        mode,
        mode.tiers(&config.strategy.scarcity),
    )
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn hr_zscore_against_known_pool() {
    let stats = PoolStats {
        mean: 20.0,
        stdev: 5.0,
    };
    assert!((compute_zscore(30.0, &stats) - 2.0).abs() < 1e-9);
}

#[test]
fn auction_log_line_parses() {
    let line = parse_line("5 Mike TroutLAA- OF Manager1 1 $45").expect("line parses");
    assert_eq!(line.format, LineFormat::AuctionWithCost);
    assert_eq!(line.pick_number, 5);
    assert_eq!(line.name, "Mike Trout");
    assert_eq!(line.team, "LAA");
    assert_eq!(line.manager.as_deref(), Some("Manager1"));
    assert_eq!(line.cost, Some(45));
}

#[test]
fn price_per_point_and_dollar_value() {
    // $2600 pool, 100 draftable: $2500 left after the $1 floors.
    let ppp = price_per_point(2500.0, 1250.0);
    assert!((ppp - 2.0).abs() < 1e-9);
    assert_eq!(dollar_value_for(50.0, ppp, true), 101);
}

#[test]
fn empty_roster_has_neutral_category_need() {
    let config = inline_config();
    let pool = fixture_pool();
    let values = compute_values(&pool, &config);
    let tracker = DraftStateTracker::from_config(&config.league);
    let scarcity = scarcity_for(&values, &tracker, &config);

    let recs = recommend(&values, tracker.state(), &config, &scarcity, values.len());
    assert_eq!(recs.len(), values.len());
    assert!(recs.iter().all(|r| r.category_multiplier == 1.0));
}

#[test]
fn trailing_suffix_does_not_change_normalized_name() {
    assert_eq!(normalize_name("Mike Trout Jr."), normalize_name("Mike Trout"));
    assert_eq!(normalize_name("José Ramírez"), normalize_name("Jose Ramirez"));
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn bundled_defaults_parse() {
    let config = config_from_strs(
        include_str!("../defaults/league.toml"),
        include_str!("../defaults/strategy.toml"),
    )
    .expect("bundled defaults are valid");
    assert_eq!(config.league.draft_mode, DraftMode::Auction);
    assert_eq!(config.data_paths.players, "data/players.json");
    assert_eq!(config.league.roster_limits.innings_cap, Some(1400.0));
}

// ===========================================================================
// Full pipeline
// ===========================================================================

#[test]
fn fixture_pool_values_every_view() {
    let config = inline_config();
    let pool = fixture_pool();
    // 18 hitters + 10 pitchers + a two-way record split in two.
    assert_eq!(pool.len(), 29);

    let values = compute_values(&pool, &config);
    assert_eq!(values.len(), 30);
    for (i, v) in values.iter().enumerate() {
        assert_eq!(v.rank, i + 1);
    }
    for w in values.windows(2) {
        assert!(w[0].dollar_value >= w[1].dollar_value);
    }
    let judge = values.iter().find(|v| v.name() == "Aaron Judge").unwrap();
    assert!(judge.dollar_value > 1);
    assert!(values.iter().filter(|v| v.name() == "Shohei Ohtani").count() == 2);
}

#[test]
fn draft_log_replay_drives_recommendations() {
    let config = inline_config();
    let pool = fixture_pool();
    let values = compute_values(&pool, &config);

    let mut tracker = DraftStateTracker::from_config(&config.league);
    let outcome = parse_draft_log(&fixture_log(), &pool, &mut tracker);
    assert!(outcome.success);
    assert_eq!(outcome.count, 6);
    assert_eq!(outcome.resolved, 5);
    assert_eq!(outcome.unmatched, vec!["Unknown Guy".to_string()]);
    assert_eq!(outcome.detected_team.as_deref(), Some("Me"));

    let state = tracker.state();
    assert_eq!(state.team_name, "Me");
    assert_eq!(state.taken.len(), 5);
    let mine: Vec<&str> = state.roster.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(mine, vec!["Aaron Judge", "Cal Raleigh"]);
    assert_eq!(state.my_spent(), 77);
    assert_eq!(state.budget_remaining(config.league.salary_cap), 183);
    assert_eq!(state.total_spent(), 183);

    let scarcity = scarcity_for(&values, &tracker, &config);
    let recs = recommend(&values, state, &config, &scarcity, 10);
    assert_eq!(recs.len(), 10);
    assert!(recs.iter().all(|r| !state.is_taken(&r.key)));
    for w in recs.windows(2) {
        assert!(w[0].score >= w[1].score);
    }

    // The catcher slot is filled, but UTIL is still empty.
    let contreras = recommend(&values, state, &config, &scarcity, values.len())
        .into_iter()
        .find(|r| r.name == "William Contreras")
        .unwrap();
    assert!(contreras.fills_need);
    assert!(contreras.positional_multiplier >= 1.4);

    let mut inflation = InflationTracker::new();
    inflation.update(&values, state, &config.league);
    assert!((inflation.remaining_dollars - (1040.0 - 183.0)).abs() < 1e-9);

    let summary = summarize(&scarcity);
    assert!(!summary.is_empty());
    for w in summary.windows(2) {
        assert!(w[0].urgency <= w[1].urgency);
    }
}

#[test]
fn reparsing_the_same_log_is_idempotent() {
    let config = inline_config();
    let pool = fixture_pool();
    let log = fixture_log();

    let mut tracker = DraftStateTracker::from_config(&config.league);
    parse_draft_log(&log, &pool, &mut tracker);
    let first = tracker.snapshot().unwrap();

    let second_outcome = parse_draft_log(&log, &pool, &mut tracker);
    // The team name was settled by the first parse.
    assert_eq!(second_outcome.detected_team, None);
    assert_eq!(tracker.snapshot().unwrap(), first);
}

#[test]
fn unrecognized_log_leaves_state_alone() {
    let config = inline_config();
    let pool = fixture_pool();
    let mut tracker = DraftStateTracker::from_config(&config.league);
    parse_draft_log(&fixture_log(), &pool, &mut tracker);
    let before = tracker.state().clone();

    let outcome = parse_draft_log("nothing to see here\n\n", &pool, &mut tracker);
    assert!(!outcome.success);
    assert_eq!(outcome.count, 0);
    assert_eq!(tracker.state(), &before);
}

#[test]
fn live_picks_then_snapshot_restore() {
    let config = inline_config();
    let pool = fixture_pool();
    let mut tracker = DraftStateTracker::from_config(&config.league);

    let outcome = tracker.apply_named_pick(
        &pool,
        "Freddie Freeman",
        Some("LAD"),
        IncomingPick {
            manager: Some("Me".into()),
            cost: Some(30),
            ..Default::default()
        },
    );
    assert!(matches!(outcome, PickOutcome::Recorded { mine: true, .. }));

    let again = tracker.apply_named_pick(&pool, "Freddie Freeman", None, IncomingPick::default());
    assert!(matches!(again, PickOutcome::AlreadyTaken { .. }));

    let missing = tracker.apply_named_pick(&pool, "Nobody Atall", None, IncomingPick::default());
    assert!(matches!(missing, PickOutcome::Unmatched { .. }));

    let snapshot = tracker.snapshot().unwrap();
    let mut restored = DraftStateTracker::from_config(&config.league);
    restored.restore(&snapshot).unwrap();
    assert_eq!(restored.state(), tracker.state());
    assert_eq!(restored.state().my_spent(), 30);
}

#[test]
fn snake_mode_pipeline_uses_zscore_tiers() {
    let mut config = inline_config();
    config.league.draft_mode = DraftMode::Snake;
    let pool = fixture_pool();
    let values = compute_values(&pool, &config);
    assert!(values.iter().all(|v| v.dollar_value == 0));

    let tracker = DraftStateTracker::from_config(&config.league);
    let scarcity = scarcity_for(&values, &tracker, &config);
    for counts in scarcity.values() {
        assert_eq!(counts.len(), config.strategy.scarcity.zscore_tiers.len());
    }
    let recs = recommend(&values, tracker.state(), &config, &scarcity, 5);
    assert_eq!(recs.len(), 5);
}
