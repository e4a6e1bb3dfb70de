//! Read-only emote catalogue.
//!
//! An emote's position in the catalogue is its user-facing number
//! (1-based). Numbers are stable for the lifetime of the process.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::CatalogueError;

/// Catalogue bundled into the binary.
const EMBEDDED_EMOTES: &str = include_str!("../../assets/emotes.json");

/// Emotes per row in the formatted listing.
pub const CATALOGUE_ROW_SIZE: usize = 4;

/// A named animation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Emote {
    pub id: String,
    pub name: String,
    pub category: String,
}

/// Ordered emote catalogue with number, name and id lookups.
#[derive(Debug, Clone)]
pub struct EmoteIndex {
    emotes: Vec<Emote>,
    /// Lowercased name -> position.
    by_name: HashMap<String, usize>,
    /// Exact id -> position.
    by_id: HashMap<String, usize>,
}

impl EmoteIndex {
    /// Build an index, rejecting empty catalogues and duplicate ids or names.
    pub fn new(emotes: Vec<Emote>) -> Result<Self, CatalogueError> {
        if emotes.is_empty() {
            return Err(CatalogueError::Empty);
        }

        let mut by_name = HashMap::with_capacity(emotes.len());
        let mut by_id = HashMap::with_capacity(emotes.len());

        for (i, emote) in emotes.iter().enumerate() {
            if by_name.insert(emote.name.to_lowercase(), i).is_some() {
                return Err(CatalogueError::Duplicate {
                    field: "name",
                    value: emote.name.clone(),
                });
            }
            if by_id.insert(emote.id.clone(), i).is_some() {
                return Err(CatalogueError::Duplicate {
                    field: "id",
                    value: emote.id.clone(),
                });
            }
        }

        Ok(Self {
            emotes,
            by_name,
            by_id,
        })
    }

    /// Parse a JSON array of `{id, name, category}` objects.
    pub fn from_json(content: &str) -> Result<Self, CatalogueError> {
        let emotes: Vec<Emote> = serde_json::from_str(content)?;
        Self::new(emotes)
    }

    /// The catalogue shipped with the binary.
    pub fn embedded() -> Result<Self, CatalogueError> {
        Self::from_json(EMBEDDED_EMOTES)
    }

    /// Load a catalogue from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.emotes.len()
    }

    /// Emotes in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &Emote> {
        self.emotes.iter()
    }

    /// Look up by 1-based number. Out of range is a miss, never an error.
    pub fn by_number(&self, number: usize) -> Option<&Emote> {
        number.checked_sub(1).and_then(|i| self.emotes.get(i))
    }

    /// Look up by the digit string a user typed.
    ///
    /// Values too large for `usize` are simply out of range.
    pub fn by_number_str(&self, digits: &str) -> Option<&Emote> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().and_then(|n| self.by_number(n))
    }

    /// The 1-based number of an emote, matched by name.
    pub fn number_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.to_lowercase()).map(|i| i + 1)
    }

    pub fn by_id(&self, id: &str) -> Option<&Emote> {
        self.by_id.get(id).map(|&i| &self.emotes[i])
    }

    /// Case-insensitive exact name match, then substring match.
    ///
    /// When several names contain the query, the earliest in catalogue
    /// order wins. That order is the defined tie-break.
    pub fn by_name(&self, name: &str) -> Option<&Emote> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(&i) = self.by_name.get(&needle) {
            return Some(&self.emotes[i]);
        }
        self.iter().find(|e| e.name.to_lowercase().contains(&needle))
    }

    /// Resolve a free-form identifier: exact name, exact id, then substring of a name.
    pub fn find(&self, identifier: &str) -> Option<&Emote> {
        let needle = identifier.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(&i) = self.by_name.get(&needle) {
            return Some(&self.emotes[i]);
        }
        if let Some(emote) = self.by_id(&needle) {
            return Some(emote);
        }
        self.by_name(&needle)
    }

    /// Numbered listing, `CATALOGUE_ROW_SIZE` emotes per line.
    ///
    /// Lines are separated by `\n` so the chunker can page the listing on
    /// row boundaries.
    pub fn format_catalogue(&self) -> String {
        self.emotes
            .chunks(CATALOGUE_ROW_SIZE)
            .enumerate()
            .map(|(row, emotes)| {
                emotes
                    .iter()
                    .enumerate()
                    .map(|(col, e)| format!("{}.{}", row * CATALOGUE_ROW_SIZE + col + 1, e.name))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emote(id: &str, name: &str) -> Emote {
        Emote {
            id: id.to_string(),
            name: name.to_string(),
            category: "test".to_string(),
        }
    }

    fn small_index() -> EmoteIndex {
        EmoteIndex::new(vec![
            emote("emote-wave", "wave"),
            emote("dance-macarena", "macarena"),
            emote("emote-shy", "shy"),
            emote("emote-shy2", "advancedshy"),
            emote("emote-hello", "hello"),
        ])
        .unwrap()
    }

    #[test]
    fn test_embedded_catalogue_loads() {
        let index = EmoteIndex::embedded().unwrap();
        assert_eq!(index.len(), 90);
        assert_eq!(index.by_number(1).unwrap().id, "idle-loop-sitfloor");
        assert_eq!(index.by_number(4).unwrap().name, "wave");
    }

    #[test]
    fn test_by_number_bounds() {
        let index = small_index();
        assert!(index.by_number(0).is_none());
        assert_eq!(index.by_number(1).unwrap().name, "wave");
        assert_eq!(index.by_number(5).unwrap().name, "hello");
        assert!(index.by_number(6).is_none());
    }

    #[test]
    fn test_by_number_str_rejects_garbage() {
        let index = small_index();
        assert_eq!(index.by_number_str("2").unwrap().name, "macarena");
        assert_eq!(index.by_number_str("002").unwrap().name, "macarena");
        assert!(index.by_number_str("").is_none());
        assert!(index.by_number_str("-1").is_none());
        assert!(index.by_number_str("99999999999999999999999999").is_none());
    }

    #[test]
    fn test_by_name_exact_beats_substring() {
        let index = small_index();
        // "shy" is both an exact name and a substring of "advancedshy".
        assert_eq!(index.by_name("SHY").unwrap().id, "emote-shy");
    }

    #[test]
    fn test_by_name_substring_takes_catalogue_order() {
        let index = small_index();
        // "wave", "macarena" and "advancedshy" all contain "a".
        assert_eq!(index.by_name("a").unwrap().name, "wave");
        assert_eq!(index.by_name("vanced").unwrap().name, "advancedshy");
        assert!(index.by_name("zzz").is_none());
        assert!(index.by_name("  ").is_none());
    }

    #[test]
    fn test_find_checks_id_before_substring() {
        let index = small_index();
        assert_eq!(index.find("emote-shy2").unwrap().name, "advancedshy");
        assert_eq!(index.find("Hello").unwrap().id, "emote-hello");
        assert_eq!(index.find("hell").unwrap().id, "emote-hello");
    }

    #[test]
    fn test_number_of() {
        let index = small_index();
        assert_eq!(index.number_of("Macarena"), Some(2));
        assert_eq!(index.number_of("nope"), None);
    }

    #[test]
    fn test_duplicates_rejected() {
        let result = EmoteIndex::new(vec![emote("a", "Wave"), emote("b", "wave")]);
        assert!(matches!(
            result,
            Err(CatalogueError::Duplicate { field: "name", .. })
        ));

        let result = EmoteIndex::new(vec![emote("a", "one"), emote("a", "two")]);
        assert!(matches!(
            result,
            Err(CatalogueError::Duplicate { field: "id", .. })
        ));

        assert!(matches!(EmoteIndex::new(Vec::new()), Err(CatalogueError::Empty)));
    }

    #[test]
    fn test_format_catalogue_rows() {
        let index = small_index();
        assert_eq!(
            index.format_catalogue(),
            "1.wave | 2.macarena | 3.shy | 4.advancedshy\n5.hello"
        );
    }
}
