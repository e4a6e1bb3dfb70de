//! Static lookup data: the emote catalogue and canned fun-command text.

pub mod emotes;
pub mod lines;

pub use emotes::{Emote, EmoteIndex};
pub use lines::Lines;

use crate::common::error::CatalogueError;
use crate::config::CatalogueConfig;

/// Load the catalogue and lines, preferring configured files over the embedded assets.
pub fn load(config: &CatalogueConfig) -> Result<(EmoteIndex, Lines), CatalogueError> {
    let emotes = match &config.emotes_path {
        Some(path) => EmoteIndex::load(path)?,
        None => EmoteIndex::embedded()?,
    };
    let lines = match &config.lines_path {
        Some(path) => Lines::load(path)?,
        None => Lines::embedded()?,
    };
    Ok((emotes, lines))
}
