// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::valuation::projections::PlayerKind;

/// Team name used until the user sets one or auto-detection finds one.
pub const DEFAULT_TEAM_NAME: &str = "My Team";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftMode {
    Snake,
    #[default]
    Auction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    #[serde(default)]
    pub platform: String,
    pub num_teams: usize,
    #[serde(default)]
    pub scoring_type: String,
    /// Per-team auction budget.
    pub salary_cap: u32,
    #[serde(default)]
    pub draft_mode: DraftMode,
    pub batting_categories: CategoriesSection,
    pub pitching_categories: CategoriesSection,
    /// Categories where a lower value is better.
    #[serde(default = "default_inverted")]
    pub inverted_categories: Vec<String>,
    /// Slot key -> count, e.g. `C = 1`, `OF = 3`, `BE = 4`.
    pub roster: HashMap<String, usize>,
    #[serde(default)]
    pub roster_limits: RosterLimits,
    #[serde(default)]
    pub my_team: MyTeam,
}

fn default_inverted() -> Vec<String> {
    vec!["ERA".into(), "WHIP".into()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesSection {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterLimits {
    /// Season innings limit, if the league has one.
    #[serde(default)]
    pub innings_cap: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyTeam {
    #[serde(default = "default_team_name")]
    pub name: String,
    /// Manager names that always mean the user (e.g. "Me").
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Default for MyTeam {
    fn default() -> Self {
        MyTeam {
            name: default_team_name(),
            aliases: Vec::new(),
        }
    }
}

fn default_team_name() -> String {
    DEFAULT_TEAM_NAME.to_string()
}

impl LeagueConfig {
    /// Scoring categories for a player kind.
    pub fn categories(&self, kind: PlayerKind) -> &[String] {
        match kind {
            PlayerKind::Pitcher => &self.pitching_categories.categories,
            _ => &self.batting_categories.categories,
        }
    }

    /// All scoring categories, batting first.
    pub fn all_categories(&self) -> Vec<String> {
        self.batting_categories
            .categories
            .iter()
            .chain(self.pitching_categories.categories.iter())
            .cloned()
            .collect()
    }

    pub fn is_inverted(&self, category: &str) -> bool {
        self.inverted_categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }

    /// Total auction dollars across the league.
    pub fn total_budget(&self) -> f64 {
        self.num_teams as f64 * self.salary_cap as f64
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    budget: BudgetSection,
    #[serde(default)]
    category_weights: CategoryWeights,
    #[serde(default)]
    pool: PoolConfig,
    #[serde(default)]
    valuation: ValuationTuning,
    #[serde(default)]
    scarcity: ScarcityConfig,
    #[serde(default)]
    recommendations: RecommendationConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct BudgetSection {
    hitting_budget_fraction: f64,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub hitting_budget_fraction: f64,
    pub weights: CategoryWeights,
    pub pool: PoolConfig,
    pub valuation: ValuationTuning,
    pub scarcity: ScarcityConfig,
    pub recommendations: RecommendationConfig,
}

/// Category weight multipliers keyed by category name. Missing categories
/// weigh 1.0; a weight of 0 removes the category from scoring.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CategoryWeights(pub HashMap<String, f64>);

impl CategoryWeights {
    pub fn get(&self, category: &str) -> f64 {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(category))
            .map(|(_, &w)| w)
            .unwrap_or(1.0)
    }

    pub fn set(&mut self, category: &str, weight: f64) {
        self.0.insert(category.to_string(), weight);
    }
}

/// Size of the baseline calibration pool per player kind. 0 = whole pool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub hitter_pool_size: usize,
    #[serde(default)]
    pub pitcher_pool_size: usize,
}

impl PoolConfig {
    pub fn size_for(&self, kind: PlayerKind) -> usize {
        match kind {
            PlayerKind::Pitcher => self.pitcher_pool_size,
            _ => self.hitter_pool_size,
        }
    }
}

/// Fixed tuning constants of the valuation model.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ValuationTuning {
    /// Exponent applied to z above replacement before pricing.
    #[serde(default = "default_auction_exponent")]
    pub auction_exponent: f64,
    /// Share of the K/9 z-score added to the strikeout z-score.
    #[serde(default = "default_efficiency_bonus")]
    pub efficiency_bonus: f64,
}

fn default_auction_exponent() -> f64 {
    1.25
}

fn default_efficiency_bonus() -> f64 {
    0.2
}

impl Default for ValuationTuning {
    fn default() -> Self {
        ValuationTuning {
            auction_exponent: default_auction_exponent(),
            efficiency_bonus: default_efficiency_bonus(),
        }
    }
}

/// Tier thresholds for scarcity tables, highest first.
#[derive(Debug, Clone, Deserialize)]
pub struct ScarcityConfig {
    #[serde(default = "default_dollar_tiers")]
    pub dollar_tiers: Vec<f64>,
    #[serde(default = "default_zscore_tiers")]
    pub zscore_tiers: Vec<f64>,
}

fn default_dollar_tiers() -> Vec<f64> {
    vec![30.0, 20.0, 10.0, 5.0, 1.0]
}

fn default_zscore_tiers() -> Vec<f64> {
    vec![6.0, 4.0, 2.0, 0.0]
}

impl Default for ScarcityConfig {
    fn default() -> Self {
        ScarcityConfig {
            dollar_tiers: default_dollar_tiers(),
            zscore_tiers: default_zscore_tiers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_recommendation_limit")]
    pub limit: usize,
}

fn default_recommendation_limit() -> usize {
    25
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        RecommendationConfig {
            limit: default_recommendation_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// JSON player pool.
    pub players: String,
    /// Optional pasted draft log to replay at startup.
    #[serde(default)]
    pub draft_log: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate configuration from league.toml and strategy.toml text.
pub fn config_from_strs(league_text: &str, strategy_text: &str) -> Result<Config, ConfigError> {
    parse_config(
        league_text,
        Path::new("league.toml"),
        strategy_text,
        Path::new("strategy.toml"),
    )
}

fn parse_config(
    league_text: &str,
    league_path: &Path,
    strategy_text: &str,
    strategy_path: &Path,
) -> Result<Config, ConfigError> {
    let league_file: LeagueFile =
        toml::from_str(league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.to_path_buf(),
            source: e,
        })?;

    let strategy_file: StrategyFile =
        toml::from_str(strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.to_path_buf(),
            source: e,
        })?;

    let strategy = StrategyConfig {
        hitting_budget_fraction: strategy_file.budget.hitting_budget_fraction,
        weights: strategy_file.category_weights,
        pool: strategy_file.pool,
        valuation: strategy_file.valuation,
        scarcity: strategy_file.scarcity,
        recommendations: strategy_file.recommendations,
    };

    let config = Config {
        league: league_file.league,
        strategy,
        data_paths: strategy_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml` relative to the given `base_dir`.
///
/// This does not auto-copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;

    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;

    parse_config(&league_text, &league_path, &strategy_text, &strategy_path)
}

/// Bundled defaults, written to `config/` when missing.
const DEFAULT_FILES: &[(&str, &str)] = &[
    ("league.toml", include_str!("../defaults/league.toml")),
    ("strategy.toml", include_str!("../defaults/strategy.toml")),
];

/// Write `config/league.toml` and `config/strategy.toml` from the bundled
/// defaults when they do not exist yet. Existing files are never touched.
/// Returns the files that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;

    let mut written = Vec::new();
    for (file_name, contents) in DEFAULT_FILES {
        let target = config_dir.join(file_name);
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                })
            }
        };
        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to write {}: {e}", target.display()),
            })?;
        info!("Wrote default {}", target.display());
        written.push(target);
    }

    Ok(written)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Writes any missing config file from the bundled defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    if league.num_teams == 0 {
        return Err(invalid("league.num_teams", "must be greater than 0"));
    }

    if league.salary_cap == 0 {
        return Err(invalid("league.salary_cap", "must be greater than 0"));
    }

    if league.batting_categories.categories.is_empty()
        && league.pitching_categories.categories.is_empty()
    {
        return Err(invalid("league.categories", "at least one category is required"));
    }

    if let Some(cap) = league.roster_limits.innings_cap {
        if !(cap.is_finite() && cap > 0.0) {
            return Err(invalid(
                "league.roster_limits.innings_cap",
                format!("must be > 0, got {cap}"),
            ));
        }
    }

    let strategy = &config.strategy;
    let frac = strategy.hitting_budget_fraction;
    if !(0.0..=1.0).contains(&frac) {
        return Err(invalid(
            "strategy.hitting_budget_fraction",
            format!("must be between 0.0 and 1.0 inclusive, got {frac}"),
        ));
    }

    // Weights may be zero (category ignored) but never negative.
    let mut weights: Vec<(&String, &f64)> = strategy.weights.0.iter().collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    for (name, &val) in weights {
        if !val.is_finite() || val < 0.0 {
            return Err(invalid(
                &format!("category_weights.{name}"),
                format!("must be >= 0, got {val}"),
            ));
        }
    }

    let tuning = &strategy.valuation;
    if !(tuning.auction_exponent.is_finite() && tuning.auction_exponent > 0.0) {
        return Err(invalid(
            "valuation.auction_exponent",
            format!("must be > 0, got {}", tuning.auction_exponent),
        ));
    }
    if !tuning.efficiency_bonus.is_finite() || tuning.efficiency_bonus < 0.0 {
        return Err(invalid(
            "valuation.efficiency_bonus",
            format!("must be >= 0, got {}", tuning.efficiency_bonus),
        ));
    }

    validate_tiers("scarcity.dollar_tiers", &strategy.scarcity.dollar_tiers)?;
    validate_tiers("scarcity.zscore_tiers", &strategy.scarcity.zscore_tiers)?;

    Ok(())
}

fn validate_tiers(field: &str, tiers: &[f64]) -> Result<(), ConfigError> {
    if tiers.is_empty() {
        return Err(invalid(field, "must contain at least one threshold"));
    }
    if tiers.windows(2).any(|w| w[0] <= w[1]) {
        return Err(invalid(field, "thresholds must be strictly descending"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) const TEST_LEAGUE_TOML: &str = r#"
[league]
name = "Test League"
platform = "espn"
num_teams = 10
scoring_type = "roto"
salary_cap = 260
draft_mode = "auction"
inverted_categories = ["ERA", "WHIP"]

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
CI = 1
MI = 1
OF = 3
UTIL = 1
SP = 2
RP = 2
P = 1
BE = 2
IL = 1

[league.roster_limits]
innings_cap = 1400.0

[league.my_team]
name = "My Team"
aliases = ["Me"]
"#;

#[cfg(test)]
pub(crate) const TEST_STRATEGY_TOML: &str = r#"
[budget]
hitting_budget_fraction = 0.65

[category_weights]
R = 1.0
HR = 1.0
RBI = 1.0
SB = 1.0
AVG = 1.0
W = 1.0
SV = 0.7
K = 1.0
ERA = 1.0
WHIP = 1.0

[pool]
hitter_pool_size = 0
pitcher_pool_size = 0

[data_paths]
players = "data/players.json"
"#;

/// Inline config shared by unit tests.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    config_from_strs(TEST_LEAGUE_TOML, TEST_STRATEGY_TOML).expect("test config is valid")
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
