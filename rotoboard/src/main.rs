// Rotoboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the player pool, compute valuations
// 4. Replay the draft log, if one is configured
// 5. Print the scarcity board and the top recommendations

use std::path::Path;

use rotoboard::config::{self, DraftMode};
use rotoboard::draft::log_parser::parse_draft_log;
use rotoboard::draft::state::DraftStateTracker;
use rotoboard::valuation;
use rotoboard::valuation::auction::InflationTracker;
use rotoboard::valuation::projections::load_pool;
use rotoboard::valuation::recommend::{recommend, Recommendation};
use rotoboard::valuation::scarcity::{compute_scarcity, summarize, ScarcityEntry, ScarcityMode};

use anyhow::Context;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Rotoboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, ${} salary cap, {:?} draft",
        config.league.name, config.league.num_teams, config.league.salary_cap, config.league.draft_mode
    );

    // 3. Load the player pool and compute valuations
    let pool_path = Path::new(&config.data_paths.players);
    let pool = load_pool(pool_path)
        .with_context(|| format!("failed to load player pool from {}", pool_path.display()))?;
    info!("Loaded {} players from {}", pool.len(), pool_path.display());

    let values = valuation::compute_values(&pool, &config);
    info!("Computed valuations for {} players", values.len());

    // 4. Replay the draft log
    let mut tracker = DraftStateTracker::from_config(&config.league);
    if let Some(log_path) = &config.data_paths.draft_log {
        let text = std::fs::read_to_string(log_path)
            .with_context(|| format!("failed to read draft log {log_path}"))?;
        let outcome = parse_draft_log(&text, &pool, &mut tracker);
        if outcome.success {
            info!(
                "Draft log replayed: {} of {} pick lines resolved",
                outcome.resolved, outcome.count
            );
        } else {
            warn!(
                "Draft log {} had no resolvable picks ({} pick lines recognized)",
                log_path, outcome.count
            );
        }
        for name in &outcome.unmatched {
            warn!("Unmatched player in draft log: {}", name);
        }
        if let Some(team) = &outcome.detected_team {
            println!("Detected your team as \"{team}\"");
        }
    }

    // 5. Report
    let state = tracker.state();
    let mode = ScarcityMode::for_draft_mode(config.league.draft_mode);
    let scarcity = compute_scarcity(
        &values,
        state,
        &config.league.roster,
        mode,
        mode.tiers(&config.strategy.scarcity),
    );
    let recs = recommend(
        &values,
        state,
        &config,
        &scarcity,
        config.strategy.recommendations.limit,
    );

    if config.league.draft_mode == DraftMode::Auction {
        let mut inflation = InflationTracker::new();
        inflation.update(&values, state, &config.league);
        let budget_left = state.budget_remaining(config.league.salary_cap);
        let max_bid = state.my_roster(&config.league.roster).max_bid(budget_left);
        println!(
            "Budget left: ${} of ${} (max bid ${}), league inflation {:.2}x",
            budget_left, config.league.salary_cap, max_bid, inflation.inflation_rate
        );
        print_recommendations(&recs, values.len(), Some(&inflation));
    } else {
        print_recommendations(&recs, values.len(), None);
    }
    print_scarcity(&summarize(&scarcity));

    info!("Rotoboard finished");
    Ok(())
}

fn print_recommendations(recs: &[Recommendation], total: usize, inflation: Option<&InflationTracker>) {
    println!();
    println!("Top {} available of {} valued players:", recs.len(), total);
    for (i, r) in recs.iter().enumerate() {
        let positions: Vec<&str> = r.positions.iter().map(|p| p.display_str()).collect();
        let price = match inflation {
            Some(t) => format!(" ${:>3.0}", t.adjust(r.dollar_value as f64)),
            None => String::new(),
        };
        let mut flags = Vec::new();
        if r.scarce {
            flags.push("scarce".to_string());
        }
        if r.innings_capped {
            flags.push("innings".to_string());
        }
        if !r.category_fit.is_empty() {
            flags.push(r.category_fit.join("/"));
        }
        println!(
            "{:>3}. {:<24} {:<4} {:<10}{} z={:>6.2} score={:>6.2} {}",
            i + 1,
            r.name,
            r.team,
            positions.join(","),
            price,
            r.total_zscore,
            r.score,
            flags.join(" ")
        );
    }
}

fn print_scarcity(entries: &[ScarcityEntry]) {
    println!();
    println!("Positional scarcity:");
    for entry in entries {
        let counts: Vec<String> = entry.tier_counts.iter().map(|c| c.to_string()).collect();
        println!(
            "  {:<4} {:<8} {}",
            entry.position.display_str(),
            entry.urgency.label(),
            counts.join(" / ")
        );
    }
}

/// Initialize tracing to write to a log file (not stdout, which carries
/// the report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("rotoboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rotoboard=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
