// Free-text draft log ingestion.
//
// Draft rooms export their pick history in a handful of line shapes. Each
// line is tried against an ordered list of matchers; the first one that
// recognizes the line wins and anything unrecognized is skipped. A parsed
// log fully replaces the tracked draft state.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{info, warn};

use super::pick::{parse_position_list, PickRecord, Position};
use super::resolver::{last_name, resolve};
use super::roster::RosteredPlayer;
use super::state::{manager_matches, DraftStateTracker};
use crate::valuation::projections::{expand_two_way, PlayerProjection};

// ---------------------------------------------------------------------------
// Line grammars
// ---------------------------------------------------------------------------

/// `5 Mike TroutLAA- OF Manager1 1 $45`: pick, name glued to team code,
/// positions, manager, round, cost.
static AUCTION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<pick>\d+)\.?\s+(?P<name>.+?)\s*(?P<team>[A-Z]{2,3})\s*-\s*(?P<pos>[A-Z0-9]+(?:\s*[,/]\s*[A-Z0-9]+)*)\s+(?P<manager>.+)\s+(?P<round>\d+)\s+\$(?P<cost>\d+)\s*$",
    )
    .ok()
});

/// `12. Aaron Judge NYY - OF Team 10`: pick, name, team, positions, manager.
static SNAKE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<pick>\d+)\.?\s+(?P<name>.+?)\s*(?P<team>[A-Z]{2,3})\s*-\s*(?P<pos>[A-Z0-9]+(?:\s*[,/]\s*[A-Z0-9]+)*)\s+(?P<manager>[^$\s].*?)\s*$",
    )
    .ok()
});

/// `7 Juan SotoNYM- OF` with an optional trailing `$cost`.
static SIDEBAR_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<pick>\d+)\.?\s+(?P<name>.+?)\s*(?P<team>[A-Z]{2,3})\s*-\s*(?P<pos>[A-Z0-9]+(?:\s*[,/]\s*[A-Z0-9]+)*)(?:\s+\$(?P<cost>\d+))?\s*$",
    )
    .ok()
});

/// `OF Mike TroutLAA- OF $45` in the My Team section; slot and cost optional.
static ROSTER_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?P<slot>[A-Z0-9]{1,4})\s+)?(?P<name>.+?)\s*(?P<team>[A-Z]{2,3})\s*-\s*(?P<pos>[A-Z0-9]+(?:\s*[,/]\s*[A-Z0-9]+)*)(?:\s+\$(?P<cost>\d+))?\s*$",
    )
    .ok()
});

/// Which grammar recognized a pick line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    AuctionWithCost,
    SnakeWithManager,
    SidebarUpdate,
}

/// One recognized pick line, before player resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub format: LineFormat,
    pub pick_number: u32,
    pub name: String,
    /// Team code as written in the log.
    pub team: String,
    pub positions: Vec<Position>,
    pub manager: Option<String>,
    pub round: Option<u32>,
    pub cost: Option<u32>,
}

/// One player line from the My Team section.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterLine {
    pub slot: Option<Position>,
    pub name: String,
    pub team: String,
    pub positions: Vec<Position>,
    pub cost: Option<u32>,
}

type LineMatcher = fn(&str) -> Option<ParsedLine>;

/// Matchers in priority order.
const STRATEGIES: &[LineMatcher] = &[match_auction, match_snake, match_sidebar];

fn captures<'t>(re: &LazyLock<Option<Regex>>, line: &'t str) -> Option<Captures<'t>> {
    re.as_ref()?.captures(line)
}

fn number(caps: &Captures, group: &str) -> Option<u32> {
    caps.name(group)?.as_str().parse().ok()
}

fn text(caps: &Captures, group: &str) -> Option<String> {
    caps.name(group)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn build_line(format: LineFormat, caps: &Captures) -> Option<ParsedLine> {
    Some(ParsedLine {
        format,
        pick_number: number(caps, "pick")?,
        name: text(caps, "name")?,
        team: text(caps, "team")?,
        positions: parse_position_list(caps.name("pos")?.as_str()),
        manager: text(caps, "manager"),
        round: number(caps, "round"),
        cost: number(caps, "cost"),
    })
}

fn match_auction(line: &str) -> Option<ParsedLine> {
    build_line(LineFormat::AuctionWithCost, &captures(&AUCTION_RE, line)?)
}

fn match_snake(line: &str) -> Option<ParsedLine> {
    build_line(LineFormat::SnakeWithManager, &captures(&SNAKE_RE, line)?)
}

fn match_sidebar(line: &str) -> Option<ParsedLine> {
    build_line(LineFormat::SidebarUpdate, &captures(&SIDEBAR_RE, line)?)
}

/// Parse one pick line with the first grammar that accepts it.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    STRATEGIES.iter().find_map(|matcher| matcher(line))
}

/// Parse one My Team roster line.
pub fn parse_roster_line(line: &str) -> Option<RosterLine> {
    let caps = captures(&ROSTER_RE, line)?;
    let mut name = text(&caps, "name")?;
    // A leading token that is not a slot belongs to the name (e.g. "AJ").
    let slot = match caps.name("slot") {
        Some(m) => match Position::from_str_pos(m.as_str()) {
            Some(pos) => Some(pos),
            None => {
                name = format!("{} {}", m.as_str(), name);
                None
            }
        },
        None => None,
    };
    Some(RosterLine {
        slot,
        name,
        team: text(&caps, "team")?,
        positions: parse_position_list(caps.name("pos")?.as_str()),
        cost: number(&caps, "cost"),
    })
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Picks,
    MyTeam,
    Done,
}

fn header(line: &str) -> Option<Section> {
    let lower = line.trim().to_lowercase();
    if lower.starts_with("my team") {
        Some(Section::MyTeam)
    } else if lower.starts_with("my queue") {
        Some(Section::Done)
    } else {
        None
    }
}

/// Recognized lines of a pasted log, split by section.
#[derive(Debug, Clone, Default)]
pub struct LogLines {
    pub picks: Vec<ParsedLine>,
    pub roster: Vec<RosterLine>,
    pub has_my_team_section: bool,
}

pub fn split_log(text: &str) -> LogLines {
    let mut out = LogLines::default();
    let mut section = Section::Picks;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(next) = header(line) {
            if next == Section::MyTeam {
                out.has_my_team_section = true;
            }
            section = next;
            continue;
        }
        match section {
            Section::Picks => out.picks.extend(parse_line(line)),
            Section::MyTeam => out.roster.extend(parse_roster_line(line)),
            Section::Done => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Full parse
// ---------------------------------------------------------------------------

/// Result of ingesting a pasted draft log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// False when no pick could be resolved; the state was left untouched.
    pub success: bool,
    /// Number of lines that matched a pick format, resolved or not.
    pub count: usize,
    /// Number of pick lines that resolved to a pool player.
    pub resolved: usize,
    /// Names that did not resolve to a pool player.
    pub unmatched: Vec<String>,
    /// Team name picked up by auto-detection, if it ran and found one.
    pub detected_team: Option<String>,
}

/// Parse a pasted draft log and rebuild the tracker's state from it.
///
/// With zero resolved picks the state is left untouched. Otherwise the taken
/// set, picks and roster are replaced. When the team name is still the
/// default it is auto-detected from the log first.
pub fn parse_draft_log(text: &str, pool: &[PlayerProjection], tracker: &mut DraftStateTracker) -> ParseOutcome {
    let views = expand_two_way(pool);
    let lines = split_log(text);

    let mut unmatched = Vec::new();
    let mut resolved: Vec<(&PlayerProjection, &ParsedLine)> = Vec::new();
    for line in &lines.picks {
        match resolve(&views, &line.name, Some(&line.team)) {
            Some(player) => resolved.push((player, line)),
            None => unmatched.push(line.name.clone()),
        }
    }

    let mut roster: Vec<(&PlayerProjection, &RosterLine)> = Vec::new();
    for line in &lines.roster {
        match resolve(&views, &line.name, Some(&line.team)) {
            Some(player) => roster.push((player, line)),
            None => unmatched.push(line.name.clone()),
        }
    }

    for name in &unmatched {
        warn!("draft log: no player match for '{}'", name);
    }

    let count = lines.picks.len();
    if resolved.is_empty() {
        info!("draft log: no picks resolved out of {} lines, state unchanged", count);
        return ParseOutcome {
            success: false,
            count,
            resolved: 0,
            unmatched,
            detected_team: None,
        };
    }

    let detected_team = if tracker.state().has_default_team_name() {
        detect_team_name(&resolved, &lines.roster, tracker.aliases())
    } else {
        None
    };
    if let Some(name) = &detected_team {
        tracker.set_team_name(name);
    }

    let mut picks: Vec<PickRecord> = resolved
        .iter()
        .map(|(player, line)| PickRecord {
            pick_number: line.pick_number,
            player_key: player.key(),
            player_name: player.name.clone(),
            team: player.team.clone(),
            kind: player.kind,
            positions: player.positions.clone(),
            manager: line.manager.clone(),
            mine: line
                .manager
                .as_deref()
                .is_some_and(|m| tracker.is_my_manager(m)),
            cost: line.cost,
        })
        .collect();

    // Nobody in the log is attributed to us: trust the My Team section.
    let mut unlogged = Vec::new();
    if !picks.iter().any(|p| p.mine) && lines.has_my_team_section {
        for (player, line) in &roster {
            let key = player.key();
            match picks.iter_mut().find(|p| p.player_key == key) {
                Some(pick) => {
                    pick.mine = true;
                    if pick.cost.is_none() {
                        pick.cost = line.cost;
                    }
                }
                None => unlogged.push(RosteredPlayer::from_projection(player, line.cost.unwrap_or(0))),
            }
        }
    }

    tracker.replace(picks, unlogged);
    info!(
        "draft log: {} of {} picks applied, {} unmatched",
        resolved.len(),
        count,
        unmatched.len()
    );

    ParseOutcome {
        success: true,
        count,
        resolved: resolved.len(),
        unmatched,
        detected_team,
    }
}

/// Manager with the most picks whose last name appears on the My Team
/// roster; failing that, the first manager matching a configured alias.
fn detect_team_name(
    resolved: &[(&PlayerProjection, &ParsedLine)],
    roster: &[RosterLine],
    aliases: &[String],
) -> Option<String> {
    let roster_last_names: HashSet<String> = roster.iter().filter_map(|r| last_name(&r.name)).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut hits: HashMap<&str, usize> = HashMap::new();
    for (player, line) in resolved {
        let Some(manager) = line.manager.as_deref() else {
            continue;
        };
        let matches = last_name(&player.name).is_some_and(|l| roster_last_names.contains(&l));
        if matches {
            if !hits.contains_key(manager) {
                order.push(manager);
            }
            *hits.entry(manager).or_insert(0) += 1;
        }
    }

    // First-seen manager wins ties.
    let mut best: Option<(&str, usize)> = None;
    for manager in order {
        let n = hits.get(manager).copied().unwrap_or(0);
        match best {
            Some((_, b)) if n <= b => {}
            _ => best = Some((manager, n)),
        }
    }
    if let Some((manager, _)) = best {
        return Some(manager.to_string());
    }

    resolved
        .iter()
        .filter_map(|(_, line)| line.manager.as_deref())
        .find(|m| aliases.iter().any(|a| manager_matches(m, a)))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
