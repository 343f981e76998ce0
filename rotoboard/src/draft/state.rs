// Draft state: taken players, pick log, and the user's roster.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::pick::PickRecord;
use super::resolver::resolve;
use super::roster::{Roster, RosteredPlayer};
use crate::config::{LeagueConfig, DEFAULT_TEAM_NAME};
use crate::valuation::projections::{expand_two_way, PlayerProjection};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to (de)serialize draft state: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// The complete state of the draft as seen by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    /// Keys of every player drafted by any team.
    pub taken: BTreeSet<String>,
    /// All recorded picks in log order.
    pub picks: Vec<PickRecord>,
    /// The user's players, in acquisition order.
    pub roster: Vec<RosteredPlayer>,
    /// The user's fantasy team (manager) name.
    pub team_name: String,
}

impl DraftState {
    pub fn new(team_name: &str) -> Self {
        DraftState {
            taken: BTreeSet::new(),
            picks: Vec::new(),
            roster: Vec::new(),
            team_name: team_name.to_string(),
        }
    }

    pub fn is_taken(&self, key: &str) -> bool {
        self.taken.contains(key)
    }

    /// Total auction dollars spent across the league.
    pub fn total_spent(&self) -> u32 {
        self.picks.iter().filter_map(|p| p.cost).sum()
    }

    /// Dollars the user has spent.
    pub fn my_spent(&self) -> u32 {
        self.roster.iter().map(|p| p.cost).sum()
    }

    /// The user's remaining auction budget.
    pub fn budget_remaining(&self, salary_cap: u32) -> u32 {
        salary_cap.saturating_sub(self.my_spent())
    }

    /// Slot assignment of the user's roster for a league roster config.
    pub fn my_roster(&self, roster_config: &HashMap<String, usize>) -> Roster {
        Roster::from_players(roster_config, &self.roster)
    }

    /// Whether the team name has been set away from the placeholder.
    pub fn has_default_team_name(&self) -> bool {
        self.team_name.trim().is_empty() || self.team_name == DEFAULT_TEAM_NAME
    }
}

/// Anchored, case-insensitive prefix match with a word boundary after the
/// prefix, so `Team 1` matches `Team 1 (Me)` but not `Team 10`.
pub fn manager_matches(manager: &str, name: &str) -> bool {
    let manager = manager.trim().to_lowercase();
    let name = name.trim().to_lowercase();
    if name.is_empty() || !manager.starts_with(&name) {
        return false;
    }
    match manager[name.len()..].chars().next() {
        None => true,
        Some(c) => !c.is_alphanumeric(),
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Details of a pick beyond the player identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingPick {
    /// Reported pick number; the next sequential number when absent.
    pub pick_number: Option<u32>,
    pub manager: Option<String>,
    pub cost: Option<u32>,
    /// Force the pick onto the user's roster regardless of manager.
    pub mine: bool,
}

/// Result of an incremental pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Recorded { key: String, mine: bool },
    AlreadyTaken { key: String },
    Unmatched { name: String },
}

/// Owns the `DraftState` and is the only place it is mutated.
#[derive(Debug, Clone)]
pub struct DraftStateTracker {
    state: DraftState,
    /// Manager names that always mean the user.
    aliases: Vec<String>,
}

impl DraftStateTracker {
    pub fn new(team_name: &str, aliases: Vec<String>) -> Self {
        DraftStateTracker {
            state: DraftState::new(team_name),
            aliases,
        }
    }

    pub fn from_config(league: &LeagueConfig) -> Self {
        Self::new(&league.my_team.name, league.my_team.aliases.clone())
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn team_name(&self) -> &str {
        &self.state.team_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn set_team_name(&mut self, name: &str) {
        info!("Team name set to '{}'", name.trim());
        self.state.team_name = name.trim().to_string();
    }

    /// Whether a manager name refers to the user (team name or alias).
    pub fn is_my_manager(&self, manager: &str) -> bool {
        (!self.state.has_default_team_name() && manager_matches(manager, &self.state.team_name))
            || self.aliases.iter().any(|a| manager_matches(manager, a))
    }

    /// Reset to an empty draft, keeping the team name.
    pub fn clear(&mut self) {
        let team_name = std::mem::take(&mut self.state.team_name);
        self.state = DraftState::new(&team_name);
    }

    /// Replace the whole state with a freshly parsed pick log.
    ///
    /// Duplicate keys after the first are dropped. Picks flagged `mine` go to
    /// the roster. Each player in `unlogged_roster` that never appeared in the
    /// log gets a pick record numbered after the last logged pick, so the
    /// log, the taken set and the roster stay in step.
    pub fn replace(&mut self, picks: Vec<PickRecord>, unlogged_roster: Vec<RosteredPlayer>) {
        self.clear();
        for pick in picks {
            if !self.state.taken.insert(pick.player_key.clone()) {
                debug!("skipping duplicate pick of {}", pick.player_name);
                continue;
            }
            if pick.mine {
                self.state.roster.push(roster_entry(&pick));
            }
            self.state.picks.push(pick);
        }
        let mut next_number = self.state.picks.iter().map(|p| p.pick_number).max().unwrap_or(0);
        for player in unlogged_roster {
            if !self.state.taken.insert(player.key.clone()) {
                continue;
            }
            next_number += 1;
            self.state.picks.push(PickRecord {
                pick_number: next_number,
                player_key: player.key.clone(),
                player_name: player.name.clone(),
                team: player.team.clone(),
                kind: player.kind,
                positions: player.positions.clone(),
                manager: None,
                mine: true,
                cost: (player.cost > 0).then_some(player.cost),
            });
            self.state.roster.push(player);
        }
        info!(
            "Draft state rebuilt: {} picks, {} on my roster",
            self.state.picks.len(),
            self.state.roster.len()
        );
    }

    /// Record a single pick. Already-taken players are left untouched.
    pub fn apply_pick(&mut self, player: &PlayerProjection, incoming: IncomingPick) -> PickOutcome {
        let key = player.key();
        if self.state.is_taken(&key) {
            return PickOutcome::AlreadyTaken { key };
        }

        let mine = incoming.mine
            || incoming
                .manager
                .as_deref()
                .is_some_and(|m| self.is_my_manager(m));
        let pick_number = incoming
            .pick_number
            .unwrap_or(self.state.picks.len() as u32 + 1);

        let pick = PickRecord {
            pick_number,
            player_key: key.clone(),
            player_name: player.name.clone(),
            team: player.team.clone(),
            kind: player.kind,
            positions: player.positions.clone(),
            manager: incoming.manager,
            mine,
            cost: incoming.cost,
        };

        self.state.taken.insert(key.clone());
        if mine {
            self.state.roster.push(roster_entry(&pick));
        }
        info!(
            "Pick #{}: {} ({}){}",
            pick.pick_number,
            pick.player_name,
            pick.team,
            if mine { " [mine]" } else { "" }
        );
        self.state.picks.push(pick);

        PickOutcome::Recorded { key, mine }
    }

    /// Resolve a free-text name against the pool, then record the pick.
    ///
    /// Two-way records are split first, so `Shohei Ohtani (Pitcher)` takes
    /// only the pitcher view.
    pub fn apply_named_pick(
        &mut self,
        pool: &[PlayerProjection],
        name: &str,
        team: Option<&str>,
        incoming: IncomingPick,
    ) -> PickOutcome {
        let views = expand_two_way(pool);
        match resolve(&views, name, team) {
            Some(player) => self.apply_pick(player, incoming),
            None => {
                debug!("no pool match for '{}'", name);
                PickOutcome::Unmatched {
                    name: name.to_string(),
                }
            }
        }
    }

    /// Serialize the state to JSON.
    pub fn snapshot(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Replace the state with a previously taken snapshot.
    pub fn restore(&mut self, json: &str) -> Result<(), StateError> {
        let state: DraftState = serde_json::from_str(json)?;
        info!("Restored draft state with {} picks", state.picks.len());
        self.state = state;
        Ok(())
    }
}

fn roster_entry(pick: &PickRecord) -> RosteredPlayer {
    RosteredPlayer {
        key: pick.player_key.clone(),
        name: pick.player_name.clone(),
        team: pick.team.clone(),
        kind: pick.kind,
        positions: pick.positions.clone(),
        cost: pick.cost.unwrap_or(0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
