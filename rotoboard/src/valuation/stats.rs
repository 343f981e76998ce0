// Category-name resolution against a player's stat map.

use crate::valuation::projections::PlayerProjection;

/// Groups of interchangeable stat names. The first entry is canonical.
const STAT_ALIASES: &[&[&str]] = &[
    &["K", "SO"],
    &["HD", "HLD", "HOLDS"],
    &["AVG", "BA"],
    &["SV", "SAVES"],
    &["BB", "WALKS"],
    &["IP", "INNINGS"],
    &["K/9", "K9", "SO/9"],
];

/// Canonical name for a category (upper-cased, aliases collapsed).
pub fn canonical_category(category: &str) -> String {
    let upper = category.trim().to_uppercase();
    STAT_ALIASES
        .iter()
        .find(|group| group.contains(&upper.as_str()))
        .map(|group| group[0].to_string())
        .unwrap_or(upper)
}

/// Every name a category may be stored under, canonical first.
fn candidate_names(category: &str) -> Vec<String> {
    let upper = category.trim().to_uppercase();
    match STAT_ALIASES
        .iter()
        .find(|group| group.contains(&upper.as_str()))
    {
        Some(group) => group.iter().map(|s| s.to_string()).collect(),
        None => vec![upper],
    }
}

/// Look up a stat by name or alias, case-insensitively.
pub fn stat_value(player: &PlayerProjection, category: &str) -> Option<f64> {
    let names = candidate_names(category);
    for name in &names {
        if let Some(v) = player.stats.get(name) {
            return Some(*v);
        }
    }
    // Fall back to a case-insensitive scan of the raw keys.
    for name in &names {
        if let Some((_, v)) = player
            .stats
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            return Some(*v);
        }
    }

    if names[0] == "K/9" {
        return derived_k_per_9(player);
    }
    None
}

/// Stat value with missing stats read as zero.
pub fn stat_or_zero(player: &PlayerProjection, category: &str) -> f64 {
    stat_value(player, category).unwrap_or(0.0)
}

fn derived_k_per_9(player: &PlayerProjection) -> Option<f64> {
    let ip = stat_value(player, "IP")?;
    let k = stat_value(player, "K")?;
    if ip <= 0.0 {
        return None;
    }
    Some(k * 9.0 / ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::projections::PlayerKind;

    fn pitcher() -> PlayerProjection {
        PlayerProjection::new("Gerrit Cole", "NYY", PlayerKind::Pitcher)
            .with_stat("SO", 220.0)
            .with_stat("IP", 180.0)
            .with_stat("Holds", 0.0)
            .with_stat("era", 3.10)
    }

    #[test]
    fn alias_resolves_both_ways() {
        let p = pitcher();
        assert_eq!(stat_value(&p, "K"), Some(220.0));
        assert_eq!(stat_value(&p, "so"), Some(220.0));
        assert_eq!(stat_value(&p, "HD"), Some(0.0));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let p = pitcher();
        assert_eq!(stat_value(&p, "ERA"), Some(3.10));
    }

    #[test]
    fn missing_stat_is_none() {
        let p = pitcher();
        assert_eq!(stat_value(&p, "WHIP"), None);
        assert_eq!(stat_or_zero(&p, "WHIP"), 0.0);
    }

    #[test]
    fn k_per_9_is_derived() {
        let p = pitcher();
        assert!((stat_value(&p, "K/9").unwrap() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn supplied_k_per_9_wins() {
        let p = pitcher().with_stat("K/9", 10.5);
        assert_eq!(stat_value(&p, "K/9"), Some(10.5));
    }

    #[test]
    fn k_per_9_absent_without_innings() {
        let p = PlayerProjection::new("Closer", "SEA", PlayerKind::Pitcher)
            .with_stat("K", 80.0)
            .with_stat("IP", 0.0);
        assert_eq!(stat_value(&p, "K/9"), None);
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_category("so"), "K");
        assert_eq!(canonical_category("Holds"), "HD");
        assert_eq!(canonical_category("hr"), "HR");
    }
}
