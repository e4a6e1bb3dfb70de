//! Canned text for the fun commands.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::common::error::CatalogueError;

const EMBEDDED_LINES: &str = include_str!("../../assets/lines.json");

/// Pick-up lines, roasts and jokes.
#[derive(Debug, Clone, Deserialize)]
pub struct Lines {
    pub rizz: Vec<String>,
    pub roast: Vec<String>,
    pub jokes: Vec<String>,
}

impl Lines {
    pub fn from_json(content: &str) -> Result<Self, CatalogueError> {
        let lines: Lines = serde_json::from_str(content)?;
        if lines.rizz.is_empty() || lines.roast.is_empty() || lines.jokes.is_empty() {
            return Err(CatalogueError::Empty);
        }
        Ok(lines)
    }

    pub fn embedded() -> Result<Self, CatalogueError> {
        Self::from_json(EMBEDDED_LINES)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn random_rizz<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        pick(&self.rizz, rng)
    }

    pub fn random_roast<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        pick(&self.roast, rng)
    }

    pub fn random_joke<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        pick(&self.jokes, rng)
    }
}

fn pick<'a, R: Rng + ?Sized>(lines: &'a [String], rng: &mut R) -> &'a str {
    // Constructors reject empty lists.
    lines.choose(rng).map(String::as_str).unwrap_or_default()
}
