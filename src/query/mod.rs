//! Query composition for the stats API.
//!
//! Turns sparse filter state into the ordered `(key, value)` pairs the
//! summary, detail, and comment endpoints expect. Absent fields never reach
//! the wire: the server treats a missing key as "unconstrained" and a zero
//! season or battle floor means unset, not zero.

use crate::models::{CommentTarget, FilterSet, Server, SortMode};

/// Query pairs for the paginated summary listing.
///
/// `server` is echoed as given; the browse page passes `all`, other call
/// sites pass a concrete server. Pair order matches the wire order the
/// backend logs expect: pagination and sort first, then filters.
pub fn summary_query(
    filters: &FilterSet,
    page: u32,
    limit: u32,
    sort: SortMode,
    server: Server,
) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("page".to_string(), page.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("sort".to_string(), sort.as_str().to_string()),
        ("server".to_string(), server.as_str().to_string()),
    ];

    if let Some(season) = filters.season {
        if season > 0 {
            pairs.push(("season".to_string(), season.to_string()));
        }
    }

    if let Some(rate) = filters.min_win_rate {
        pairs.push(("min_win_rate".to_string(), format_rate(rate)));
    }
    if let Some(rate) = filters.max_win_rate {
        pairs.push(("max_win_rate".to_string(), format_rate(rate)));
    }

    if let Some(battles) = filters.min_battles {
        if battles > 0 {
            pairs.push(("min_battles".to_string(), battles.to_string()));
        }
    }

    if !filters.atk_contains.is_empty() {
        pairs.push(("atk_contains".to_string(), join_ids(&filters.atk_contains)));
    }
    if !filters.def_contains.is_empty() {
        pairs.push(("def_contains".to_string(), join_ids(&filters.def_contains)));
    }

    if !filters.atk_slots.is_empty() {
        pairs.push(("atk_slots".to_string(), filters.atk_slots.tokens()));
    }
    if !filters.def_slots.is_empty() {
        pairs.push(("def_slots".to_string(), filters.def_slots.tokens()));
    }

    pairs
}

/// Query pairs for the per-loadout detail listing of one pairing.
pub fn detail_query(
    atk_sig: &str,
    def_sig: &str,
    server: Server,
    page: u32,
    limit: u32,
    sort: SortMode,
    season: Option<u32>,
    tag: Option<&str>,
) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("atk_sig".to_string(), atk_sig.to_string()),
        ("def_sig".to_string(), def_sig.to_string()),
        ("server".to_string(), server.as_str().to_string()),
        ("page".to_string(), page.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("sort".to_string(), sort.as_str().to_string()),
    ];

    if let Some(season) = season {
        if season > 0 {
            pairs.push(("season".to_string(), season.to_string()));
        }
    }
    if let Some(tag) = tag {
        if !tag.is_empty() {
            pairs.push(("tag".to_string(), tag.to_string()));
        }
    }

    pairs
}

/// Query pairs for the comment listing of one pairing.
pub fn comment_query(target: &CommentTarget) -> Vec<(String, String)> {
    vec![
        ("atk_sig".to_string(), target.atk_sig.clone()),
        ("def_sig".to_string(), target.def_sig.clone()),
        ("server".to_string(), target.server.clone()),
    ]
}

/// Win-rate bounds travel as bare fractions, never percentages.
fn format_rate(rate: f64) -> String {
    format!("{}", rate)
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
