//! Persisted shelf documents.
//!
//! A shelf is stored as its grid geometry plus the compact merge list;
//! everything else about the layout is derived on load. Field names follow
//! the settings document the shelves are embedded in.

use serde::{Deserialize, Serialize};

use crate::codec::{self, MergedSlot};
use crate::error::{ShelfError, ShelfResult};
use crate::grid::GridModel;
use crate::registry::SlotRegistry;

pub const MAX_ROWS: u16 = 20;
pub const MAX_COLUMNS: u16 = 20;
pub const MAX_PREFIX_CHARS: usize = 5;

pub const DEFAULT_ROWS: u16 = 5;
pub const DEFAULT_COLUMNS: u16 = 10;
pub const DEFAULT_START_NUMBER: i64 = 1;
pub const DEFAULT_COLOR: &str = "from-blue-500 to-blue-600";

const LEGACY_SHELF_ID: &str = "legacy-shelf";
const LEGACY_SHELF_NAME: &str = "Scaffale Principale";
const LEGACY_COLUMNS: u16 = 10;

/// Devices of each kind that fit in one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCapacity {
    pub smartphone: u32,
    pub tablet: u32,
    pub notebook: u32,
    pub pc: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    pub rows: u16,
    pub columns: u16,
    pub start_number: i64,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "mergedSlots", default, skip_serializing_if = "Vec::is_empty")]
    pub merged_slots: Vec<MergedSlot>,
    #[serde(rename = "slotCapacity", default, skip_serializing_if = "Option::is_none")]
    pub slot_capacity: Option<SlotCapacity>,
}

impl ShelfConfig {
    /// New unmerged shelf with the default 5x10 geometry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prefix: String::new(),
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            start_number: DEFAULT_START_NUMBER,
            color: DEFAULT_COLOR.to_string(),
            merged_slots: Vec::new(),
            slot_capacity: None,
        }
    }

    pub fn from_json(json: &str) -> ShelfResult<Self> {
        let shelf: Self = serde_json::from_str(json)?;
        shelf.validate()?;
        Ok(shelf)
    }

    pub fn to_json(&self) -> ShelfResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check geometry limits; the merge list is checked by [`decode`](Self::decode).
    pub fn validate(&self) -> ShelfResult<()> {
        if !(1..=MAX_ROWS).contains(&self.rows) {
            return Err(ShelfError::InvalidShelf(format!(
                "{}: rows must be between 1 and {MAX_ROWS}, got {}",
                self.id, self.rows
            )));
        }
        if !(1..=MAX_COLUMNS).contains(&self.columns) {
            return Err(ShelfError::InvalidShelf(format!(
                "{}: columns must be between 1 and {MAX_COLUMNS}, got {}",
                self.id, self.columns
            )));
        }
        if self.prefix.chars().count() > MAX_PREFIX_CHARS {
            return Err(ShelfError::InvalidShelf(format!(
                "{}: prefix longer than {MAX_PREFIX_CHARS} characters",
                self.id
            )));
        }
        self.grid()?;
        Ok(())
    }

    pub fn grid(&self) -> ShelfResult<GridModel> {
        Ok(GridModel::new(
            self.rows,
            self.columns,
            self.start_number,
            self.prefix.clone(),
        )?)
    }

    /// Expand the stored merge list into a working registry.
    pub fn decode(&self) -> ShelfResult<SlotRegistry> {
        self.validate()?;
        Ok(codec::decompress(&self.grid()?, &self.merged_slots)?)
    }

    /// Copy of this shelf carrying the compact form of `registry`.
    pub fn encode(&self, registry: &SlotRegistry) -> Self {
        Self {
            merged_slots: codec::compress(registry),
            ..self.clone()
        }
    }

    pub fn slot_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn last_number(&self) -> i64 {
        self.start_number.saturating_add(self.slot_count() as i64 - 1)
    }
}

/// Legacy single-shelf settings: a flat run of `max_slots` numbered slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySlotsConfig {
    pub enabled: bool,
    pub max_slots: u32,
    #[serde(default)]
    pub prefix: String,
}

impl Default for LegacySlotsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_slots: 50,
            prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiShelfConfig {
    pub enabled: bool,
    #[serde(default)]
    pub shelves: Vec<ShelfConfig>,
}

impl MultiShelfConfig {
    /// Lay a legacy slot run out as a single ten-column shelf.
    ///
    /// Runs longer than the largest shelf are cut to `MAX_ROWS` rows and the
    /// prefix to `MAX_PREFIX_CHARS`, so the result always validates.
    pub fn from_legacy(legacy: &LegacySlotsConfig) -> Self {
        if !legacy.enabled {
            return Self::default();
        }
        let rows = legacy
            .max_slots
            .div_ceil(LEGACY_COLUMNS as u32)
            .clamp(1, MAX_ROWS as u32);
        let mut shelf = ShelfConfig::new(LEGACY_SHELF_ID, LEGACY_SHELF_NAME);
        shelf.prefix = legacy.prefix.chars().take(MAX_PREFIX_CHARS).collect();
        shelf.rows = rows as u16;
        shelf.columns = LEGACY_COLUMNS;
        Self {
            enabled: true,
            shelves: vec![shelf],
        }
    }

    pub fn from_json(json: &str) -> ShelfResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        for shelf in &config.shelves {
            shelf.validate()?;
        }
        Ok(config)
    }

    pub fn shelf(&self, id: &str) -> Option<&ShelfConfig> {
        self.shelves.iter().find(|shelf| shelf.id == id)
    }

    pub fn shelf_mut(&mut self, id: &str) -> Option<&mut ShelfConfig> {
        self.shelves.iter_mut().find(|shelf| shelf.id == id)
    }

    pub fn total_slots(&self) -> usize {
        self.shelves.iter().map(ShelfConfig::slot_count).sum()
    }

    /// Slot number with the owning shelf's prefix; bare number for unknown shelves.
    pub fn format_slot(&self, shelf_id: &str, number: i64) -> String {
        match self.shelf(shelf_id) {
            Some(shelf) => format!("{}{}", shelf.prefix, number),
            None => number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SlotError;

    const SHELF_JSON: &str = r#"{
        "id": "s1",
        "name": "Front",
        "prefix": "A",
        "rows": 2,
        "columns": 5,
        "start_number": 1,
        "color": "from-green-500 to-green-600",
        "mergedSlots": [{ "startSlot": 2, "span": 2 }],
        "slotCapacity": { "smartphone": 4, "tablet": 2, "notebook": 1, "pc": 0 }
    }"#;

    #[test]
    fn parses_persisted_shape() {
        let shelf = ShelfConfig::from_json(SHELF_JSON).unwrap();
        assert_eq!(shelf.merged_slots, vec![MergedSlot::new(2, 2)]);
        assert_eq!(shelf.slot_capacity.unwrap().smartphone, 4);
        assert_eq!(shelf.last_number(), 10);
    }

    #[test]
    fn missing_merge_list_means_unmerged() {
        let shelf = ShelfConfig::from_json(
            r#"{"id":"s2","name":"Back","rows":1,"columns":3,"start_number":7}"#,
        )
        .unwrap();
        let registry = shelf.decode().unwrap();
        assert_eq!(registry.len(), 3);
        assert!(shelf.to_json().unwrap().find("mergedSlots").is_none());
    }

    #[test]
    fn encode_replaces_merge_list_only() {
        let shelf = ShelfConfig::from_json(SHELF_JSON).unwrap();
        let mut registry = shelf.decode().unwrap();
        let id = registry.slot_at(1, 0).unwrap().id();
        registry.expand_slot(id).unwrap();

        let saved = shelf.encode(&registry);
        assert_eq!(saved.merged_slots, vec![MergedSlot::new(2, 2), MergedSlot::new(6, 2)]);
        assert_eq!(saved.name, shelf.name);
        assert_eq!(saved.slot_capacity, shelf.slot_capacity);
    }

    #[test]
    fn validate_enforces_limits() {
        let mut shelf = ShelfConfig::new("s", "S");
        shelf.rows = 21;
        assert!(matches!(shelf.validate(), Err(ShelfError::InvalidShelf(_))));
        shelf.rows = 3;
        shelf.prefix = "TOOLONG".to_string();
        assert!(shelf.validate().is_err());
        shelf.prefix = "AB".to_string();
        shelf.columns = 0;
        assert!(shelf.validate().is_err());
    }

    #[test]
    fn start_number_overflow_is_rejected_before_decode() {
        let json = r#"{"id":"s","name":"S","rows":1,"columns":3,"start_number":9223372036854775807}"#;
        assert!(matches!(
            ShelfConfig::from_json(json),
            Err(ShelfError::Slot(SlotError::SlotNumberOutOfRange(i64::MAX)))
        ));

        let mut shelf = ShelfConfig::new("s", "S");
        shelf.start_number = i64::MAX;
        assert!(shelf.validate().is_err());
        assert!(shelf.decode().is_err());
        assert_eq!(shelf.last_number(), i64::MAX);
    }

    #[test]
    fn decode_surfaces_bad_merges() {
        let mut shelf = ShelfConfig::new("s", "S");
        shelf.merged_slots = vec![MergedSlot::new(10, 2)];
        assert!(matches!(
            shelf.decode(),
            Err(ShelfError::Slot(SlotError::RowBoundaryExceeded { .. }))
        ));
    }

    #[test]
    fn legacy_config_becomes_single_shelf() {
        let legacy = LegacySlotsConfig {
            enabled: true,
            max_slots: 45,
            prefix: "R".to_string(),
        };
        let config = MultiShelfConfig::from_legacy(&legacy);
        let shelf = config.shelf("legacy-shelf").unwrap();
        assert_eq!((shelf.rows, shelf.columns, shelf.start_number), (5, 10, 1));
        assert_eq!(config.total_slots(), 50);
        assert!(MultiShelfConfig::from_legacy(&LegacySlotsConfig::default()).shelves.is_empty());
    }

    #[test]
    fn oversized_legacy_run_still_opens() {
        let legacy = LegacySlotsConfig {
            enabled: true,
            max_slots: 1000,
            prefix: "SHELF-A".to_string(),
        };
        let config = MultiShelfConfig::from_legacy(&legacy);
        let shelf = config.shelf("legacy-shelf").unwrap();
        assert_eq!((shelf.rows, shelf.columns), (MAX_ROWS, 10));
        assert_eq!(shelf.prefix, "SHELF");
        assert!(shelf.validate().is_ok());
        assert_eq!(shelf.decode().unwrap().len(), 200);
    }

    #[test]
    fn format_slot_uses_shelf_prefix() {
        let config = MultiShelfConfig {
            enabled: true,
            shelves: vec![ShelfConfig::from_json(SHELF_JSON).unwrap()],
        };
        assert_eq!(config.format_slot("s1", 7), "A7");
        assert_eq!(config.format_slot("missing", 7), "7");
    }
}
