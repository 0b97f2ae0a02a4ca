//! Wait classification of a winning tile within a winning structure.
use super::agari::{MentsuKind, Origin, Structure};
use crate::tile::Tile;

use serde::Serialize;
use tinyvec::ArrayVec;

/// Declaration order is the order [`classify_wait`] prefers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Wait {
    /// Pair wait, also every chitoi and kokushi win.
    #[default]
    Tanki,
    /// 12 waiting on 3, or 89 waiting on 7.
    Penchan,
    /// Middle of a run.
    Kanchan,
    /// Completes one of two pairs into a triplet.
    Shanpon,
    Ryanmen,
}

impl Wait {
    /// Tanki, penchan and kanchan are worth 2 fu.
    #[inline]
    #[must_use]
    pub const fn fu(self) -> u8 {
        match self {
            Self::Tanki | Self::Penchan | Self::Kanchan => 2,
            Self::Shanpon | Self::Ryanmen => 0,
        }
    }
}

/// Every wait `tile` can be read as in `structure`, deduplicated and sorted.
///
/// Only the pair and mentsu formed from concealed tiles can hold the winning
/// tile. Empty if the tile is not in any of them.
#[must_use]
pub fn candidate_waits(structure: &Structure, tile: Tile) -> ArrayVec<[Wait; 5]> {
    let mut ret = ArrayVec::new();
    let mut add = |wait| {
        if !ret.contains(&wait) {
            ret.push(wait);
        }
    };

    match structure {
        Structure::Chitoi { .. } | Structure::Kokushi { .. } => {
            if structure.contains(tile) {
                add(Wait::Tanki);
            }
        }
        Structure::Normal { pair, mentsu } => {
            if *pair == tile {
                add(Wait::Tanki);
            }
            for m in mentsu
                .iter()
                .filter(|m| m.origin == Origin::Concealed && m.contains(tile))
            {
                let wait = match m.kind {
                    MentsuKind::Kotsu | MentsuKind::Kantsu => Wait::Shanpon,
                    MentsuKind::Shuntsu => {
                        let low = m.tile.num().unwrap_or_default();
                        match tile.as_u8() - m.tile.as_u8() {
                            1 => Wait::Kanchan,
                            0 if low == 7 => Wait::Penchan,
                            2 if low == 1 => Wait::Penchan,
                            _ => Wait::Ryanmen,
                        }
                    }
                };
                add(wait);
            }
        }
    }

    ret.sort_unstable();
    ret
}

/// The first of [`candidate_waits`], or `None` if the tile is not part of
/// the concealed portion of the structure.
#[must_use]
pub fn classify_wait(structure: &Structure, tile: Tile) -> Option<Wait> {
    candidate_waits(structure, tile).first().copied()
}
