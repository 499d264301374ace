//! Read-only student reference data from the third-party catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{SlotRole, STRIKER_SLOTS};

/// Catalog language variant. The catalog publishes one document per language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogLanguage {
    #[default]
    En,
    Zh,
}

impl CatalogLanguage {
    /// Map a BCP-47-ish UI language tag onto a catalog document.
    /// Any `zh*` tag selects the Chinese document; everything else English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("zh") {
            CatalogLanguage::Zh
        } else {
            CatalogLanguage::En
        }
    }

    /// Path segment in the catalog URL.
    pub fn segment(&self) -> &'static str {
        match self {
            CatalogLanguage::En => "en",
            CatalogLanguage::Zh => "zh",
        }
    }
}

/// Whether a student deploys as a striker or a special.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadType {
    /// Striker, fills slots 0..4.
    Main,
    /// Special, fills slots 4..6.
    Support,
}

/// One catalog entry. Only the fields this client displays are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "Id")]
    pub id: u32,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "School", default)]
    pub school: String,

    #[serde(rename = "SquadType")]
    pub squad_type: SquadType,
}

impl Student {
    pub fn is_striker(&self) -> bool {
        self.squad_type == SquadType::Main
    }

    /// Whether this student can occupy the given roster slot.
    pub fn fits_slot(&self, slot: usize) -> bool {
        match SlotRole::from_index(slot) {
            Some(SlotRole::Striker) => self.is_striker(),
            Some(SlotRole::Special) => !self.is_striker(),
            None => false,
        }
    }
}

/// Lookup table over the full catalog document.
#[derive(Debug, Clone, Default)]
pub struct StudentCatalog {
    by_id: HashMap<u32, Student>,
}

impl StudentCatalog {
    /// Parse the catalog document: a JSON object keyed by student id.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let keyed: HashMap<String, Student> = serde_json::from_str(raw)?;
        Ok(Self {
            by_id: keyed.into_values().map(|s| (s.id, s)).collect(),
        })
    }

    pub fn get(&self, id: u32) -> Option<&Student> {
        self.by_id.get(&id)
    }

    /// Display name for an id, degrading to a `#id` placeholder for
    /// students missing from the catalog.
    pub fn display_name(&self, id: u32) -> String {
        match self.by_id.get(&id) {
            Some(student) => student.name.clone(),
            None => format!("#{}", id),
        }
    }

    /// Students eligible for a slot, sorted by name for stable listings.
    pub fn eligible_for_slot(&self, slot: usize) -> Vec<&Student> {
        if slot >= STRIKER_SLOTS + 2 {
            return Vec::new();
        }
        let mut eligible: Vec<&Student> = self
            .by_id
            .values()
            .filter(|s| s.fits_slot(slot))
            .collect();
        eligible.sort_by(|a, b| a.name.cmp(&b.name));
        eligible
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
