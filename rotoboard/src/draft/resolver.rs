// Fuzzy player-name resolution against the player pool.
//
// Each matching rule is an independent predicate; rules are tried in order
// and the first one that yields a candidate wins. Within a rule, a candidate
// on the requested team is preferred.

use std::sync::LazyLock;

use regex::Regex;

use crate::valuation::projections::{normalize_team_code, PlayerKind, PlayerProjection};

/// Suffix tokens dropped during normalization.
const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

/// Shortest normalized query allowed for substring matching.
const MIN_SUBSTRING_LEN: usize = 4;

static KIND_HINT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*(?:\((batter|hitter|pitcher|b|h|p)\)|-\s*(batter|hitter|pitcher)|\s(b|p))\s*$",
    )
    .ok()
});

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' | 'č' | 'ć' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'š' | 'ś' => 's',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        other => other,
    }
}

/// Canonical comparison form of a player name.
///
/// Accents are folded, punctuation removed (hyphens become spaces), name
/// suffixes (Jr, Sr, II, III, IV) dropped, and whitespace collapsed, all in
/// lower case.
pub fn normalize_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_alphanumeric() || c.is_whitespace() {
            cleaned.push(c);
        } else if c == '-' {
            cleaned.push(' ');
        }
    }

    cleaned
        .split_whitespace()
        .filter(|token| !NAME_SUFFIXES.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip a batter/pitcher hint from a name, returning the bare name and the
/// hinted kind.
///
/// Recognized hints: `(Batter)`, `(Pitcher)`, `(B)`, `(P)`, `- Batter`,
/// `- Pitcher`, or a trailing `B` / `P` token.
pub fn split_kind_hint(name: &str) -> (String, Option<PlayerKind>) {
    let trimmed = name.trim();
    let Some(re) = KIND_HINT_RE.as_ref() else {
        return (trimmed.to_string(), None);
    };
    let Some(caps) = re.captures(trimmed) else {
        return (trimmed.to_string(), None);
    };
    let token = caps
        .iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default();
    let kind = match token.as_str() {
        "batter" | "hitter" | "b" | "h" => PlayerKind::Hitter,
        _ => PlayerKind::Pitcher,
    };
    let bare = trimmed[..caps.get(0).map_or(trimmed.len(), |m| m.start())].trim();
    if bare.is_empty() {
        return (trimmed.to_string(), None);
    }
    (bare.to_string(), Some(kind))
}

// ---------------------------------------------------------------------------
// Matching rules
// ---------------------------------------------------------------------------

/// A normalized lookup request.
struct Query {
    normalized: String,
    hint: Option<PlayerKind>,
    /// Canonical team code, `None` when absent or unrecognized.
    team: Option<String>,
}

impl Query {
    fn new(name: &str, team: Option<&str>) -> Self {
        let (bare, hint) = split_kind_hint(name);
        let team = team.and_then(|t| {
            let (code, known) = normalize_team_code(t);
            known.then_some(code)
        });
        Query {
            normalized: normalize_name(&bare),
            hint,
            team,
        }
    }
}

type Rule = fn(&PlayerProjection, &Query, &[PlayerProjection]) -> bool;

/// Rules in priority order.
const RULES: &[Rule] = &[two_way_rule, exact_rule, initial_rule, substring_rule];

/// A hinted name that belongs to a two-way player resolves only within the
/// hinted kind.
fn two_way_rule(candidate: &PlayerProjection, query: &Query, pool: &[PlayerProjection]) -> bool {
    let Some(hint) = query.hint else {
        return false;
    };
    if normalize_name(&candidate.name) != query.normalized {
        return false;
    }
    if candidate.kind != hint && candidate.kind != PlayerKind::TwoWay {
        return false;
    }
    candidate.two_way || candidate.kind == PlayerKind::TwoWay || has_both_kinds(pool, &query.normalized)
}

fn has_both_kinds(pool: &[PlayerProjection], normalized: &str) -> bool {
    let mut hitter = false;
    let mut pitcher = false;
    for p in pool.iter().filter(|p| normalize_name(&p.name) == normalized) {
        match p.kind {
            PlayerKind::Hitter => hitter = true,
            PlayerKind::Pitcher => pitcher = true,
            PlayerKind::TwoWay => return true,
        }
    }
    hitter && pitcher
}

fn exact_rule(candidate: &PlayerProjection, query: &Query, _pool: &[PlayerProjection]) -> bool {
    normalize_name(&candidate.name) == query.normalized
}

/// `M. Trout` or `M Trout` matches `Mike Trout`.
fn initial_rule(candidate: &PlayerProjection, query: &Query, _pool: &[PlayerProjection]) -> bool {
    let q: Vec<&str> = query.normalized.split_whitespace().collect();
    if q.len() < 2 || q[0].chars().count() != 1 {
        return false;
    }
    let normalized = normalize_name(&candidate.name);
    let c: Vec<&str> = normalized.split_whitespace().collect();
    if c.len() < 2 {
        return false;
    }
    c[0].starts_with(q[0]) && c[1..].join(" ") == q[1..].join(" ")
}

fn substring_rule(candidate: &PlayerProjection, query: &Query, _pool: &[PlayerProjection]) -> bool {
    if query.normalized.chars().count() < MIN_SUBSTRING_LEN {
        return false;
    }
    let normalized = normalize_name(&candidate.name);
    if normalized.chars().count() < MIN_SUBSTRING_LEN {
        return false;
    }
    normalized.contains(&query.normalized) || query.normalized.contains(&normalized)
}

/// Prefer a candidate on the requested team; otherwise take the first.
fn narrow_by_team<'a>(candidates: &[&'a PlayerProjection], team: Option<&str>) -> Option<&'a PlayerProjection> {
    if let Some(team) = team {
        if let Some(p) = candidates.iter().find(|p| p.team == team) {
            return Some(*p);
        }
    }
    candidates.first().copied()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Resolve a free-text player name (and optional team code) to a pool entry.
///
/// The pool should already have two-way records split into views so the
/// returned player carries a hitter or pitcher key.
pub fn resolve<'a>(pool: &'a [PlayerProjection], name: &str, team: Option<&str>) -> Option<&'a PlayerProjection> {
    let query = Query::new(name, team);
    if query.normalized.is_empty() {
        return None;
    }

    for rule in RULES {
        let candidates: Vec<&PlayerProjection> =
            pool.iter().filter(|p| rule(p, &query, pool)).collect();
        if let Some(found) = narrow_by_team(&candidates, query.team.as_deref()) {
            return Some(found);
        }
    }
    None
}

/// Last name in normalized form, used for roster cross-checks.
pub fn last_name(name: &str) -> Option<String> {
    let (bare, _) = split_kind_hint(name);
    normalize_name(&bare)
        .split_whitespace()
        .last()
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
