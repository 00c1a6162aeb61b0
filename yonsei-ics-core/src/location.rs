//! Building lookup for raw location strings such as `ENG412`.

use crate::{LocationEntry, Result};

/// Building lookup table.
///
/// Entries keep the order they were added in; that order only matters when two
/// abbreviations of the same length both match.
#[derive(Debug, Clone)]
pub struct LocationManager {
    entries: Vec<LocationEntry>,
}

/// A location split into its building entry and room number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocation<'a> {
    /// Matched building
    pub entry: &'a LocationEntry,
    /// Trimmed text after the building code, possibly empty
    pub room: &'a str,
}

impl LocationManager {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a table from a JSON array of `{code, name, number}` objects
    pub fn from_json(json_data: &str) -> Result<Self> {
        let mut manager = Self::new();
        manager.load_from_json(json_data)?;
        Ok(manager)
    }

    /// Append entries from a JSON array. Existing codes are replaced in place.
    pub fn load_from_json(&mut self, json_data: &str) -> Result<()> {
        let entries: Vec<LocationEntry> = serde_json::from_str(json_data)?;

        for entry in entries {
            self.add_mapping(entry);
        }

        Ok(())
    }

    /// Add a building, replacing any entry with the same code (ignoring case).
    pub fn add_mapping(&mut self, entry: LocationEntry) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.code.eq_ignore_ascii_case(&entry.code))
        {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Find the building whose abbreviation is the longest case-insensitive
    /// prefix of `raw`. The trimmed remainder is the room.
    pub fn lookup<'a>(&'a self, raw: &'a str) -> Option<ResolvedLocation<'a>> {
        let mut best: Option<&LocationEntry> = None;

        for entry in &self.entries {
            if entry.code.is_empty() {
                continue;
            }
            let matches = raw
                .get(..entry.code.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&entry.code));
            if matches && best.is_none_or(|b| entry.code.len() > b.code.len()) {
                best = Some(entry);
            }
        }

        best.map(|entry| ResolvedLocation {
            entry,
            room: raw[entry.code.len()..].trim(),
        })
    }

    /// Render `raw` as `(number) raw - name, Room room`, or `None` for an unknown building.
    pub fn try_resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        let resolved = self.lookup(raw)?;

        let mut text = format!(
            "({}) {} - {}",
            resolved.entry.number, raw, resolved.entry.name
        );
        if !resolved.room.is_empty() {
            text.push_str(&format!(", Room {}", resolved.room));
        }
        Some(text)
    }

    /// Like [`try_resolve`](Self::try_resolve) but falls back to the raw string.
    pub fn resolve(&self, raw: &str) -> String {
        self.try_resolve(raw).unwrap_or_else(|| raw.to_string())
    }

    /// Entries in insertion order
    pub fn get_all_mappings(&self) -> &[LocationEntry] {
        &self.entries
    }

    /// Pretty-printed JSON in the same shape [`from_json`](Self::from_json) reads
    pub fn export_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// No buildings are built in; every location stays as exported until a
/// table is loaded.
impl Default for LocationManager {
    fn default() -> Self {
        Self::new()
    }
}
