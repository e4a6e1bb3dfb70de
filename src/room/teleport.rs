//! Named teleport destinations.

use std::collections::HashMap;
use std::fmt;

use crate::common::Position;

/// One of the eleven fixed teleport keys: `f1`..`f10` and `vip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeleportSlot {
    Floor(u8),
    Vip,
}

impl TeleportSlot {
    pub const FLOORS: u8 = 10;

    /// Parse a slot keyword, case-insensitively.
    pub fn parse(keyword: &str) -> Option<Self> {
        let keyword = keyword.to_ascii_lowercase();
        if keyword == "vip" {
            return Some(Self::Vip);
        }
        let digits = keyword.strip_prefix('f')?;
        if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.parse::<u8>() {
            Ok(n) if (1..=Self::FLOORS).contains(&n) => Some(Self::Floor(n)),
            _ => None,
        }
    }

    /// Whether using this slot requires moderator privileges.
    pub fn is_restricted(self) -> bool {
        matches!(self, Self::Vip)
    }

    pub fn all() -> impl Iterator<Item = TeleportSlot> {
        (1..=Self::FLOORS)
            .map(Self::Floor)
            .chain(std::iter::once(Self::Vip))
    }
}

impl fmt::Display for TeleportSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor(n) => write!(f, "f{}", n),
            Self::Vip => write!(f, "vip"),
        }
    }
}

/// Stored positions per slot. Unset slots are "not configured".
#[derive(Debug, Clone, Default)]
pub struct TeleportRegistry {
    positions: HashMap<TeleportSlot, Position>,
}

impl TeleportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: TeleportSlot) -> Option<Position> {
        self.positions.get(&slot).copied()
    }

    /// Store a position, returning the one it replaced.
    pub fn set(&mut self, slot: TeleportSlot, position: Position) -> Option<Position> {
        self.positions.insert(slot, position)
    }

    pub fn configured(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slots() {
        assert_eq!(TeleportSlot::parse("f1"), Some(TeleportSlot::Floor(1)));
        assert_eq!(TeleportSlot::parse("F10"), Some(TeleportSlot::Floor(10)));
        assert_eq!(TeleportSlot::parse("VIP"), Some(TeleportSlot::Vip));
        assert_eq!(TeleportSlot::parse("f0"), None);
        assert_eq!(TeleportSlot::parse("f01"), None);
        assert_eq!(TeleportSlot::parse("f11"), None);
        assert_eq!(TeleportSlot::parse("f"), None);
        assert_eq!(TeleportSlot::parse("g1"), None);
        assert_eq!(TeleportSlot::parse("f1x"), None);
    }

    #[test]
    fn test_eleven_slots() {
        let all: Vec<_> = TeleportSlot::all().collect();
        assert_eq!(all.len(), 11);
        assert_eq!(all[0].to_string(), "f1");
        assert_eq!(all[10].to_string(), "vip");
        assert!(all.iter().filter(|s| s.is_restricted()).count() == 1);
    }

    #[test]
    fn test_unset_slot_is_none() {
        let mut registry = TeleportRegistry::new();
        assert!(registry.get(TeleportSlot::Floor(3)).is_none());

        let pos = Position::new(1.0, 0.0, 2.5);
        assert!(registry.set(TeleportSlot::Floor(3), pos).is_none());
        assert_eq!(registry.get(TeleportSlot::Floor(3)), Some(pos));
        assert_eq!(registry.set(TeleportSlot::Floor(3), Position::default()), Some(pos));
        assert_eq!(registry.configured(), 1);
    }
}
