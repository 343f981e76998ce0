// Roster construction and slot assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pick::Position;
use crate::valuation::projections::{PlayerKind, PlayerProjection};

/// A player on the user's team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosteredPlayer {
    pub key: String,
    pub name: String,
    pub team: String,
    pub kind: PlayerKind,
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Price paid; 0 for snake drafts or unknown cost.
    #[serde(default)]
    pub cost: u32,
}

impl RosteredPlayer {
    pub fn from_projection(player: &PlayerProjection, cost: u32) -> Self {
        RosteredPlayer {
            key: player.key(),
            name: player.name.clone(),
            team: player.team.clone(),
            kind: player.kind,
            positions: player.positions.clone(),
            cost,
        }
    }
}

/// A single slot on a team's roster.
#[derive(Debug, Clone)]
pub struct RosterSlot {
    /// The position designation of this slot.
    pub position: Position,
    /// Key of the player occupying this slot, if any.
    pub player: Option<String>,
}

/// Slot occupancy for one slot type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUsage {
    pub filled: usize,
    pub cap: usize,
}

impl SlotUsage {
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled >= self.cap
    }
}

/// A team's roster of slots, derived from the league roster config.
#[derive(Debug, Clone)]
pub struct Roster {
    pub slots: Vec<RosterSlot>,
}

impl Roster {
    /// Create an empty roster from a config mapping slot keys to counts,
    /// e.g. `{"C": 1, "OF": 3, "SP": 5, "BE": 4, "IL": 2}`. Unknown keys are
    /// ignored. Slots are kept in `Position` order.
    pub fn new(roster_config: &HashMap<String, usize>) -> Self {
        let mut slots: Vec<RosterSlot> = Vec::new();

        for (pos_str, &count) in roster_config {
            if let Some(pos) = Position::from_str_pos(pos_str) {
                for _ in 0..count {
                    slots.push(RosterSlot {
                        position: pos,
                        player: None,
                    });
                }
            }
        }

        slots.sort_by_key(|s| s.position);

        Roster { slots }
    }

    /// Build a roster and place the given players in order.
    pub fn from_players(roster_config: &HashMap<String, usize>, players: &[RosteredPlayer]) -> Self {
        let mut roster = Roster::new(roster_config);
        for p in players {
            roster.add_player(p);
        }
        roster
    }

    /// Add a player to the roster.
    ///
    /// Slot assignment priority:
    /// 1. Dedicated position slot (exact match)
    /// 2. Aggregate positional slot (OF, CI, MI, or a sibling outfield slot)
    /// 3. UTIL / DH for hitters, P for pitchers
    /// 4. Bench
    ///
    /// Returns `true` if the player was placed, `false` if no slot was open.
    pub fn add_player(&mut self, player: &RosteredPlayer) -> bool {
        let best = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.player.is_none())
            .filter_map(|(i, s)| {
                slot_priority(s.position, &player.positions, player.kind).map(|prio| (prio, i))
            })
            .min();

        match best {
            Some((_, idx)) => {
                self.slots[idx].player = Some(player.key.clone());
                true
            }
            None => false,
        }
    }

    /// Whether there is an empty slot of the given type.
    pub fn has_empty_slot(&self, pos: Position) -> bool {
        self.slots
            .iter()
            .any(|s| s.position == pos && s.player.is_none())
    }

    /// Filled count and capacity for one slot type.
    pub fn usage(&self, pos: Position) -> SlotUsage {
        let (filled, cap) = self
            .slots
            .iter()
            .filter(|s| s.position == pos)
            .fold((0, 0), |(f, c), s| (f + s.player.is_some() as usize, c + 1));
        SlotUsage { filled, cap }
    }

    /// Distinct slot types (bench and IL excluded) that could hold a player
    /// with the given eligibility.
    pub fn eligible_slot_types(&self, positions: &[Position], kind: PlayerKind) -> Vec<Position> {
        let mut types: Vec<Position> = self
            .slots
            .iter()
            .map(|s| s.position)
            .filter(|p| !matches!(p, Position::Bench | Position::InjuredList))
            .filter(|p| p.accepts_any(positions, kind))
            .collect();
        types.dedup();
        types
    }

    /// Count of empty slots, excluding IL slots.
    pub fn empty_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position != Position::InjuredList && s.player.is_none())
            .count()
    }

    /// Maximum bid a team can make given their remaining budget.
    ///
    /// Must reserve $1 per empty slot (excluding the slot about to be filled).
    pub fn max_bid(&self, budget_remaining: u32) -> u32 {
        let remaining_empty = self.empty_slots();
        if remaining_empty == 0 {
            return 0;
        }
        let reserved = (remaining_empty - 1) as u32;
        budget_remaining.saturating_sub(reserved)
    }

    /// Number of filled (non-empty) slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }
}

/// Placement priority of a slot for a player (lower is better), or `None`
/// when the slot cannot hold the player.
fn slot_priority(slot: Position, positions: &[Position], kind: PlayerKind) -> Option<u8> {
    if !slot.accepts_any(positions, kind) {
        return None;
    }
    let prio = match slot {
        s if positions.contains(&s) && !s.is_meta_slot() => 0,
        Position::Bench => 3,
        Position::Utility | Position::DesignatedHitter | Position::Pitcher => 2,
        _ => 1,
    };
    Some(prio)
}

/// Roster slots per team that a player kind can fill, bench and IL excluded.
pub fn slots_for_kind(roster_config: &HashMap<String, usize>, kind: PlayerKind) -> usize {
    roster_config
        .iter()
        .filter_map(|(key, &count)| Position::from_str_pos(key).map(|p| (p, count)))
        .filter(|(p, _)| !matches!(p, Position::Bench | Position::InjuredList))
        .filter(|(p, _)| match kind {
            PlayerKind::Pitcher => p.is_pitcher(),
            _ => p.is_hitter(),
        })
        .map(|(_, count)| count)
        .sum()
}
