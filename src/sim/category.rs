//! Physics categories and contact classification
//!
//! Each physics body carries exactly one category. Contacts arrive as an
//! unordered pair of categories and are classified into the outcomes the
//! session cares about.

use serde::{Deserialize, Serialize};

/// Category tag assigned to a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicsCategory {
    /// Solid wall at the heart of an obstacle group
    Wall,
    /// Outer frame of an obstacle group
    OuterWall,
    /// Scoring gap around the wall
    Score,
    /// Outline of the player's box
    Border,
}

impl PhysicsCategory {
    pub const ALL: [PhysicsCategory; 4] = [
        PhysicsCategory::Wall,
        PhysicsCategory::OuterWall,
        PhysicsCategory::Score,
        PhysicsCategory::Border,
    ];

    /// Bit value for hosts whose physics engine works with masks
    pub fn bits(self) -> u32 {
        match self {
            PhysicsCategory::Wall => 1 << 1,
            PhysicsCategory::OuterWall => 1 << 2,
            PhysicsCategory::Score => 1 << 3,
            PhysicsCategory::Border => 1 << 4,
        }
    }

    /// Inverse of [`bits`](Self::bits); anything but a single known bit is `None`
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bits() == bits)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicsCategory::Wall => "Wall",
            PhysicsCategory::OuterWall => "OuterWall",
            PhysicsCategory::Score => "Score",
            PhysicsCategory::Border => "Border",
        }
    }
}

/// A set of categories a body wants contact reports for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategorySet(u32);

impl CategorySet {
    pub const EMPTY: CategorySet = CategorySet(0);

    pub fn of(categories: &[PhysicsCategory]) -> Self {
        categories.iter().fold(Self::EMPTY, |set, c| set.with(*c))
    }

    pub fn with(self, category: PhysicsCategory) -> Self {
        Self(self.0 | category.bits())
    }

    pub fn contains(&self, category: PhysicsCategory) -> bool {
        self.0 & category.bits() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

/// Outcome of a contact between two categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Border passed through a scoring gap
    ScoreGap,
    /// Border touched a wall
    Wall,
}

/// Classify an unordered category pair. Pairs with no gameplay meaning map to `None`.
pub fn classify(a: PhysicsCategory, b: PhysicsCategory) -> Option<Contact> {
    use PhysicsCategory::*;
    match (a, b) {
        (Score, Border) | (Border, Score) => Some(Contact::ScoreGap),
        (Wall, Border) | (Border, Wall) => Some(Contact::Wall),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_order_independent() {
        for a in PhysicsCategory::ALL {
            for b in PhysicsCategory::ALL {
                assert_eq!(classify(a, b), classify(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_classify_live_pairs() {
        use PhysicsCategory::*;
        assert_eq!(classify(Border, Score), Some(Contact::ScoreGap));
        assert_eq!(classify(Wall, Border), Some(Contact::Wall));
        assert_eq!(classify(Border, OuterWall), None);
        assert_eq!(classify(Wall, Score), None);
        assert_eq!(classify(Border, Border), None);
    }

    #[test]
    fn test_bits_round_trip_and_sets() {
        for c in PhysicsCategory::ALL {
            assert_eq!(PhysicsCategory::from_bits(c.bits()), Some(c));
        }
        assert_eq!(PhysicsCategory::from_bits(0), None);
        assert_eq!(PhysicsCategory::from_bits(0b11000), None);

        let set = CategorySet::of(&[PhysicsCategory::Wall, PhysicsCategory::Score]);
        assert!(set.contains(PhysicsCategory::Wall));
        assert!(set.contains(PhysicsCategory::Score));
        assert!(!set.contains(PhysicsCategory::Border));
        assert!(CategorySet::EMPTY.is_empty());
    }
}
