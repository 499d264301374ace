//! Filter state for the arena summary browser.

use serde::{Deserialize, Serialize};

/// Number of roster slots in a team.
pub const SLOT_COUNT: usize = 6;

/// Slots 0..4 hold strikers; 4..6 hold specials.
pub const STRIKER_SLOTS: usize = 4;

/// Game server a record belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    #[default]
    All,
    Global,
    Jp,
    Cn,
}

impl Server {
    /// Wire form used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Server::All => "all",
            Server::Global => "global",
            Server::Jp => "jp",
            Server::Cn => "cn",
        }
    }

    /// Parse the wire form. Unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(Server::All),
            "global" => Some(Server::Global),
            "jp" => Some(Server::Jp),
            "cn" => Some(Server::Cn),
            _ => None,
        }
    }
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort order for summary listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Default,
    Composite,
    WinRateDesc,
    WinRateAsc,
    Newest,
}

impl SortMode {
    /// Wire form used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Composite => "composite",
            SortMode::WinRateDesc => "win_rate_desc",
            SortMode::WinRateAsc => "win_rate_asc",
            SortMode::Newest => "newest",
        }
    }

    /// Parse the wire form. Unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(SortMode::Default),
            "composite" => Some(SortMode::Composite),
            "win_rate_desc" => Some(SortMode::WinRateDesc),
            "win_rate_asc" => Some(SortMode::WinRateAsc),
            "newest" => Some(SortMode::Newest),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kind of student a roster slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Striker,
    Special,
}

impl SlotRole {
    /// Role of a slot by index. Returns None for out-of-range indices.
    pub fn from_index(slot: usize) -> Option<Self> {
        if slot < STRIKER_SLOTS {
            Some(SlotRole::Striker)
        } else if slot < SLOT_COUNT {
            Some(SlotRole::Special)
        } else {
            None
        }
    }
}

/// Sparse slot-index → student-id constraint map.
///
/// Entries keep insertion order: the serialized token string iterates in the
/// order constraints were added, not by slot index. Re-assigning a slot
/// updates the entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMap(Vec<(usize, u32)>);

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `slot` to `student`. Rejects out-of-range slots and the
    /// zero student id (zero means "unset" on the wire).
    pub fn set(&mut self, slot: usize, student: u32) -> bool {
        if slot >= SLOT_COUNT || student == 0 {
            return false;
        }
        if let Some(entry) = self.0.iter_mut().find(|(s, _)| *s == slot) {
            entry.1 = student;
        } else {
            self.0.push((slot, student));
        }
        true
    }

    pub fn get(&self, slot: usize) -> Option<u32> {
        self.0.iter().find(|(s, _)| *s == slot).map(|(_, id)| *id)
    }

    pub fn remove(&mut self, slot: usize) -> Option<u32> {
        let pos = self.0.iter().position(|(s, _)| *s == slot)?;
        Some(self.0.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0.iter().copied()
    }

    /// Serialize to the wire token string, e.g. `"0:10010,4:20008"`.
    pub fn tokens(&self) -> String {
        self.0
            .iter()
            .map(|(slot, id)| format!("{}:{}", slot, id))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse a wire token string. Malformed tokens are skipped.
    pub fn parse(s: &str) -> Self {
        let mut map = Self::new();
        for token in s.split(',') {
            let mut parts = token.splitn(2, ':');
            let slot = parts.next().and_then(|p| p.trim().parse::<usize>().ok());
            let id = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
            if let (Some(slot), Some(id)) = (slot, id) {
                map.set(slot, id);
            }
        }
        map
    }
}

/// Parse a comma-separated id list. Malformed entries are skipped.
pub fn parse_id_list(s: &str) -> Vec<u32> {
    s.split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

/// Sparse filter state for the summary browser.
///
/// Unset fields never reach the wire; the server distinguishes "unset" from
/// "zero", so a zero season or battle floor is treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    /// Season number; zero or absent means "all seasons".
    pub season: Option<u32>,

    /// Lower win-rate bound, a fraction in [0, 1].
    pub min_win_rate: Option<f64>,

    /// Upper win-rate bound, a fraction in [0, 1].
    pub max_win_rate: Option<f64>,

    /// Minimum number of recorded battles.
    pub min_battles: Option<u32>,

    /// Students that must appear anywhere in the attacking team.
    pub atk_contains: Vec<u32>,

    /// Students that must appear anywhere in the defending team.
    pub def_contains: Vec<u32>,

    /// Per-slot constraints on the attacking team.
    pub atk_slots: SlotMap,

    /// Per-slot constraints on the defending team.
    pub def_slots: SlotMap,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        !self.season.is_some_and(|s| s > 0)
            && self.min_win_rate.is_none()
            && self.max_win_rate.is_none()
            && !self.min_battles.is_some_and(|b| b > 0)
            && self.atk_contains.is_empty()
            && self.def_contains.is_empty()
            && self.atk_slots.is_empty()
            && self.def_slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_server_round_trip() {
        for server in [Server::All, Server::Global, Server::Jp, Server::Cn] {
            assert_eq!(Server::parse(server.as_str()), Some(server));
        }
        assert_eq!(Server::parse("kr"), None);
        assert_eq!(Server::parse("GLOBAL"), Some(Server::Global));
    }

    #[test]
    fn test_sort_mode_round_trip() {
        for sort in [
            SortMode::Default,
            SortMode::Composite,
            SortMode::WinRateDesc,
            SortMode::WinRateAsc,
            SortMode::Newest,
        ] {
            assert_eq!(SortMode::parse(sort.as_str()), Some(sort));
        }
        assert_eq!(SortMode::parse("oldest"), None);
    }

    #[test]
    fn test_slot_role_from_index() {
        assert_eq!(SlotRole::from_index(0), Some(SlotRole::Striker));
        assert_eq!(SlotRole::from_index(3), Some(SlotRole::Striker));
        assert_eq!(SlotRole::from_index(4), Some(SlotRole::Special));
        assert_eq!(SlotRole::from_index(5), Some(SlotRole::Special));
        assert_eq!(SlotRole::from_index(6), None);
    }

    #[test]
    fn test_slot_map_insertion_order() {
        let mut slots = SlotMap::new();
        assert!(slots.set(3, 10005));
        assert!(slots.set(0, 10010));
        assert_eq!(slots.tokens(), "3:10005,0:10010");
    }

    #[test]
    fn test_slot_map_reassign_keeps_position() {
        let mut slots = SlotMap::new();
        slots.set(3, 10005);
        slots.set(0, 10010);
        slots.set(3, 10099);
        assert_eq!(slots.tokens(), "3:10099,0:10010");
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_slot_map_rejects_invalid() {
        let mut slots = SlotMap::new();
        assert!(!slots.set(6, 10005));
        assert!(!slots.set(0, 0));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_slot_map_parse() {
        let slots = SlotMap::parse("0:10010, 4:20008,bogus,7:1");
        assert_eq!(slots.get(0), Some(10010));
        assert_eq!(slots.get(4), Some(20008));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_slot_map_remove() {
        let mut slots = SlotMap::new();
        slots.set(1, 10001);
        assert_eq!(slots.remove(1), Some(10001));
        assert_eq!(slots.remove(1), None);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("10010, 20008,bogus"), vec![10010, 20008]);
        assert_eq!(parse_id_list(""), Vec::<u32>::new());
    }

    #[test]
    fn test_filter_set_is_empty() {
        let mut filters = FilterSet::new();
        assert!(filters.is_empty());

        filters.season = Some(0);
        filters.min_battles = Some(0);
        assert!(filters.is_empty());

        filters.min_battles = Some(30);
        assert!(!filters.is_empty());
    }
}
