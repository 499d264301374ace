//! Aggregated battle summary records as served by the stats API.

use serde::{Deserialize, Serialize};

/// One aggregated attacker-vs-defender summary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSummary {
    pub server: String,

    pub season: u32,

    #[serde(default)]
    pub tag: String,

    /// Attacking team, strikers first, specials last.
    #[serde(rename = "attackingTeam")]
    pub attacking_team: Vec<u32>,

    /// Defending team in the same slot order.
    #[serde(rename = "defendingTeam")]
    pub defending_team: Vec<u32>,

    /// Total recorded battles for this pairing.
    pub total: u32,

    pub wins: u32,

    pub losses: u32,

    /// Raw wins / total.
    #[serde(rename = "winRate")]
    pub win_rate: f64,

    /// Wilson lower bound, the "composite" sort key.
    #[serde(rename = "wilsonScore")]
    pub wilson_score: f64,

    /// Posterior mean win rate (Laplace-smoothed).
    #[serde(rename = "avgWinRate")]
    pub avg_win_rate: f64,

    /// Unix seconds of the most recent battle folded in.
    #[serde(rename = "lastSeen")]
    pub last_seen: i64,

    /// Opaque attacking-team signature used as a grouping key.
    pub atk_sig: String,

    /// Opaque defending-team signature.
    pub def_sig: String,
}

impl ArenaSummary {
    /// Whether the sample is too small for the win rate to mean much.
    pub fn is_low_sample(&self) -> bool {
        self.total < 30
    }

    pub fn key(&self) -> SummaryKey {
        SummaryKey {
            server: self.server.clone(),
            season: self.season,
            atk_sig: self.atk_sig.clone(),
            def_sig: self.def_sig.clone(),
            tag: self.tag.clone(),
        }
    }
}

/// Per-loadout breakdown row for a single pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSummaryDetail {
    pub server: String,

    pub season: u32,

    #[serde(default)]
    pub tag: String,

    #[serde(rename = "attackingTeam")]
    pub attacking_team: Vec<u32>,

    #[serde(rename = "defendingTeam")]
    pub defending_team: Vec<u32>,

    /// Opaque hash of both loadouts, the detail row identity.
    pub loadout_hash: String,

    #[serde(default)]
    pub atk_loadout: Vec<serde_json::Value>,

    #[serde(default)]
    pub def_loadout: Vec<serde_json::Value>,

    pub total: u32,

    pub wins: u32,

    pub losses: u32,

    #[serde(rename = "wilsonScore")]
    pub wilson_score: f64,

    #[serde(rename = "avgWinRate")]
    pub avg_win_rate: f64,

    #[serde(rename = "lastSeen")]
    pub last_seen: i64,

    pub atk_sig: String,

    pub def_sig: String,
}

/// One page of summary rows plus the grand total for pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryPage<T> {
    pub data: Vec<T>,

    /// Total matching rows across all pages.
    pub total: u32,

    #[serde(default)]
    pub page: u32,

    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

/// Identity of a summary row, used for selection and moderation requests.
///
/// The display form is `server|season|atk_sig|def_sig|tag`; a tag may itself
/// contain `|`, so parsing treats everything past the fourth separator as tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    pub server: String,
    pub season: u32,
    pub atk_sig: String,
    pub def_sig: String,
    #[serde(default)]
    pub tag: String,
}

impl std::fmt::Display for SummaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.server, self.season, self.atk_sig, self.def_sig, self.tag
        )
    }
}

/// Identity of a single detail row, one loadout under a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailKey {
    pub server: String,
    pub season: u32,
    #[serde(default)]
    pub tag: String,
    pub atk_sig: String,
    pub def_sig: String,
    pub loadout_hash: String,
}

impl ArenaSummaryDetail {
    pub fn key(&self) -> DetailKey {
        DetailKey {
            server: self.server.clone(),
            season: self.season,
            tag: self.tag.clone(),
            atk_sig: self.atk_sig.clone(),
            def_sig: self.def_sig.clone(),
            loadout_hash: self.loadout_hash.clone(),
        }
    }
}

impl std::str::FromStr for SummaryKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(5, '|');
        let server = parts.next().unwrap_or_default().to_string();
        let season = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| format!("invalid summary key: {}", s))?;
        let atk_sig = parts
            .next()
            .ok_or_else(|| format!("invalid summary key: {}", s))?
            .to_string();
        let def_sig = parts
            .next()
            .ok_or_else(|| format!("invalid summary key: {}", s))?
            .to_string();
        let tag = parts.next().unwrap_or_default().to_string();
        Ok(Self {
            server,
            season,
            atk_sig,
            def_sig,
            tag,
        })
    }
}
