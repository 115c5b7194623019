use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::ergonomics::{Finger, Hand};

/// Placement quality tiers, best first. Declaration order is the
/// order the optimizer walks them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SlotTier {
    Prime,
    Good,
    Acceptable,
    Edge,
    Thumb,
}

/// One physical key slot on the split board. Columns 0-5 sit under the
/// left hand, 6+ under the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSlot {
    pub row: u8,
    pub col: u8,
    pub finger: Finger,
    pub score: u8,
}

impl PositionSlot {
    pub fn hand(&self) -> Hand {
        self.finger.hand()
    }

    /// Flat index into the 52-key wire layout. Thumb row 4 maps into
    /// 24..30 and 46..52; main rows interleave left block then right.
    pub fn position_index(&self) -> usize {
        let row = self.row as usize;
        let col = self.col as usize;
        if row == 4 {
            if col < 6 {
                24 + col
            } else {
                46 + (col - 6)
            }
        } else if col < 6 {
            row * 6 + col
        } else {
            26 + row * 6 + (col - 6)
        }
    }
}

/// The fixed candidate slots the optimizer may assign, grouped by tier.
#[derive(Debug, Clone)]
pub struct SlotCatalogue {
    tiers: BTreeMap<SlotTier, Vec<PositionSlot>>,
}

impl SlotCatalogue {
    pub fn from_tiers(tiers: BTreeMap<SlotTier, Vec<PositionSlot>>) -> Self {
        Self { tiers }
    }

    /// Candidate slots for the 52-key split board.
    pub fn voyager() -> Self {
        fn slot(row: u8, col: u8, finger: Finger, score: u8) -> PositionSlot {
            PositionSlot {
                row,
                col,
                finger,
                score,
            }
        }
        use Finger::*;

        let mut tiers = BTreeMap::new();
        // Home row, strong fingers
        tiers.insert(
            SlotTier::Prime,
            vec![
                slot(2, 1, LeftRing, 90),
                slot(2, 2, LeftMiddle, 95),
                slot(2, 3, LeftIndex, 100),
                slot(2, 6, RightIndex, 100),
                slot(2, 7, RightMiddle, 95),
                slot(2, 8, RightRing, 90),
            ],
        );
        // Top row, strong fingers
        tiers.insert(
            SlotTier::Good,
            vec![
                slot(1, 1, LeftRing, 80),
                slot(1, 2, LeftMiddle, 85),
                slot(1, 3, LeftIndex, 90),
                slot(1, 6, RightIndex, 90),
                slot(1, 7, RightMiddle, 85),
                slot(1, 8, RightRing, 80),
            ],
        );
        // Bottom row
        tiers.insert(
            SlotTier::Acceptable,
            vec![
                slot(3, 1, LeftRing, 70),
                slot(3, 2, LeftMiddle, 75),
                slot(3, 3, LeftIndex, 80),
                slot(3, 6, RightIndex, 80),
                slot(3, 7, RightMiddle, 75),
                slot(3, 8, RightRing, 70),
            ],
        );
        // Pinky columns and the inner stretch
        tiers.insert(
            SlotTier::Edge,
            vec![
                slot(2, 0, LeftPinky, 60),
                slot(2, 5, LeftIndex, 65),
                slot(2, 9, RightPinky, 60),
            ],
        );
        tiers.insert(
            SlotTier::Thumb,
            vec![
                slot(4, 2, LeftThumb, 95),
                slot(4, 3, LeftThumb, 90),
                slot(4, 9, RightThumb, 95),
                slot(4, 10, RightThumb, 90),
            ],
        );

        Self { tiers }
    }

    pub fn tier(&self, tier: SlotTier) -> &[PositionSlot] {
        self.tiers.get(&tier).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All slots, tier order then catalogue order within the tier.
    pub fn iter(&self) -> impl Iterator<Item = (SlotTier, &PositionSlot)> {
        self.tiers
            .iter()
            .flat_map(|(tier, slots)| slots.iter().map(move |s| (*tier, s)))
    }

    pub fn len(&self) -> usize {
        self.tiers.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reverse lookup from a wire index. The flat formula is not
    /// injective over the whole grid, but every catalogue slot lands on
    /// a distinct index, so a scan is exact here.
    pub fn slot_at_index(&self, index: usize) -> Option<(SlotTier, PositionSlot)> {
        self.iter()
            .find(|(_, slot)| slot.position_index() == index)
            .map(|(tier, slot)| (tier, *slot))
    }
}

impl Default for SlotCatalogue {
    fn default() -> Self {
        Self::voyager()
    }
}
