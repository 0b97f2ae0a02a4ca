//! Enumerates every way a complete 14-tile hand reads as a winning shape.
use crate::error::HandError;
use crate::hand::{Fuuro, FuuroKind, Hand, tiles_to_string};
use crate::must_tile;
use crate::tile::{Tile, YAOKYUU};
use std::fmt;

use log::{debug, trace};
use serde::Serialize;
use tinyvec::ArrayVec;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MentsuKind {
    #[default]
    Shuntsu,
    Kotsu,
    /// Only ever comes from a declared kan.
    Kantsu,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Concealed,
    Called,
    Ankan,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Mentsu {
    pub kind: MentsuKind,
    /// Lowest tile for shuntsu.
    pub tile: Tile,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Structure {
    /// Concealed mentsu come first in ascending order, followed by exposed
    /// sets in call order.
    Normal {
        pair: Tile,
        mentsu: ArrayVec<[Mentsu; 4]>,
    },
    Chitoi {
        pairs: [Tile; 7],
    },
    Kokushi {
        pair: Tile,
    },
}

impl Mentsu {
    #[must_use]
    pub const fn concealed(kind: MentsuKind, tile: Tile) -> Self {
        Self {
            kind,
            tile,
            origin: Origin::Concealed,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self.origin, Origin::Called)
    }

    #[must_use]
    pub fn tiles(self) -> ArrayVec<[Tile; 4]> {
        let mut ret = ArrayVec::new();
        match self.kind {
            MentsuKind::Shuntsu => {
                let id = self.tile.as_u8();
                ret.extend((id..id + 3).map(|t| must_tile!(t)));
            }
            MentsuKind::Kotsu => ret.extend([self.tile; 3]),
            MentsuKind::Kantsu => ret.extend([self.tile; 4]),
        }
        ret
    }

    #[must_use]
    pub fn contains(self, tile: Tile) -> bool {
        self.tiles().contains(&tile)
    }
}

impl From<Fuuro> for Mentsu {
    fn from(f: Fuuro) -> Self {
        let (kind, origin) = match f.kind() {
            FuuroKind::Chi => (MentsuKind::Shuntsu, Origin::Called),
            FuuroKind::Pon => (MentsuKind::Kotsu, Origin::Called),
            FuuroKind::Minkan => (MentsuKind::Kantsu, Origin::Called),
            FuuroKind::Ankan => (MentsuKind::Kantsu, Origin::Ankan),
        };
        Self {
            kind,
            tile: f.tile(),
            origin,
        }
    }
}

impl Structure {
    /// Ankans keep a hand concealed; any other call opens it.
    #[must_use]
    pub fn is_menzen(&self) -> bool {
        match self {
            Self::Normal { mentsu, .. } => mentsu.iter().all(|m| !m.is_open()),
            Self::Chitoi { .. } | Self::Kokushi { .. } => true,
        }
    }

    /// Whether `tile` appears anywhere in the structure.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        match self {
            Self::Normal { pair, mentsu } => {
                *pair == tile || mentsu.iter().any(|m| m.contains(tile))
            }
            Self::Chitoi { pairs } => pairs.contains(&tile),
            Self::Kokushi { .. } => tile.is_yaokyuu(),
        }
    }
}

fn search(
    tehai: &mut [u8; 34],
    start: usize,
    remaining: usize,
    stack: &mut ArrayVec<[Mentsu; 4]>,
    found: &mut Vec<ArrayVec<[Mentsu; 4]>>,
) {
    let Some(i) = (start..34).find(|&i| tehai[i] > 0) else {
        if remaining == 0 {
            found.push(stack.clone());
        }
        return;
    };
    if remaining == 0 {
        return;
    }

    // The lowest remaining tile must start either a kotsu or a shuntsu.
    if tehai[i] >= 3 {
        tehai[i] -= 3;
        stack.push(Mentsu::concealed(MentsuKind::Kotsu, must_tile!(i)));
        search(tehai, i, remaining - 1, stack, found);
        stack.pop();
        tehai[i] += 3;
    }
    if i < 27 && i % 9 <= 6 && tehai[i + 1] > 0 && tehai[i + 2] > 0 {
        tehai[i] -= 1;
        tehai[i + 1] -= 1;
        tehai[i + 2] -= 1;
        stack.push(Mentsu::concealed(MentsuKind::Shuntsu, must_tile!(i)));
        search(tehai, i, remaining - 1, stack, found);
        stack.pop();
        tehai[i] += 1;
        tehai[i + 1] += 1;
        tehai[i + 2] += 1;
    }
}

fn normal_structures(hand: &Hand) -> Vec<Structure> {
    let remaining = 4 - hand.fuuro.len();
    let mut tehai = hand.tehai;
    let mut ret = vec![];

    for pair in 0..34 {
        if tehai[pair] < 2 {
            continue;
        }
        tehai[pair] -= 2;
        let mut found = vec![];
        search(&mut tehai, 0, remaining, &mut ArrayVec::new(), &mut found);
        tehai[pair] += 2;

        for mut mentsu in found {
            mentsu.sort_unstable();
            mentsu.extend(hand.fuuro.iter().copied().map(Mentsu::from));
            let structure = Structure::Normal {
                pair: must_tile!(pair),
                mentsu,
            };
            if !ret.contains(&structure) {
                ret.push(structure);
            }
        }
    }
    ret
}

fn chitoi_structure(hand: &Hand) -> Option<Structure> {
    if !hand.fuuro.is_empty() || hand.tehai.iter().filter(|&&c| c == 2).count() != 7 {
        return None;
    }
    let mut pairs = [Tile::default(); 7];
    let kinds = hand
        .tehai
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c == 2)
        .map(|(tid, _)| must_tile!(tid));
    for (slot, tile) in pairs.iter_mut().zip(kinds) {
        *slot = tile;
    }
    Some(Structure::Chitoi { pairs })
}

fn kokushi_structure(hand: &Hand) -> Option<Structure> {
    if !hand.fuuro.is_empty() || YAOKYUU.iter().any(|&t| hand.tehai[t as usize] == 0) {
        return None;
    }
    let yaokyuu_count: u8 = YAOKYUU.iter().map(|&t| hand.tehai[t as usize]).sum();
    if yaokyuu_count != 14 {
        return None;
    }
    let mut pairs = YAOKYUU.iter().filter(|&&t| hand.tehai[t as usize] == 2);
    match (pairs.next(), pairs.next()) {
        (Some(&pair), None) => Some(Structure::Kokushi {
            pair: must_tile!(pair),
        }),
        _ => None,
    }
}

/// Every distinct winning reading of a 14-tile hand. Empty if the hand is
/// not complete.
pub fn agari_structures(hand: &Hand) -> Result<Vec<Structure>, HandError> {
    hand.ensure_len(14)?;

    let mut ret = normal_structures(hand);
    trace!("{} normal readings for {hand}", ret.len());
    ret.extend(chitoi_structure(hand));
    ret.extend(kokushi_structure(hand));

    debug!("{hand}: {} winning structures", ret.len());
    Ok(ret)
}

impl fmt::Display for Mentsu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts = [0; 34];
        for t in self.tiles() {
            counts[t.as_usize()] += 1;
        }
        let inner = tiles_to_string(&counts);
        match self.origin {
            Origin::Concealed => f.write_str(&inner),
            Origin::Called => write!(f, "[{inner}]"),
            Origin::Ankan => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pair_str = |t: Tile| {
            let mut counts = [0; 34];
            counts[t.as_usize()] = 2;
            tiles_to_string(&counts)
        };
        match self {
            Self::Normal { pair, mentsu } => {
                f.write_str(&pair_str(*pair))?;
                for m in mentsu {
                    write!(f, " {m}")?;
                }
                Ok(())
            }
            Self::Chitoi { pairs } => {
                let s = pairs.iter().map(|&t| pair_str(t)).collect::<Vec<_>>();
                write!(f, "chitoi {}", s.join(" "))
            }
            Self::Kokushi { pair } => write!(f, "kokushi {}", pair_str(*pair)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::t;

    fn structures(s: &str) -> Vec<Structure> {
        let h: Hand = s.parse().unwrap();
        agari_structures(&h).unwrap()
    }

    fn normal_heads(v: &[Structure]) -> Vec<Tile> {
        v.iter()
            .filter_map(|s| match s {
                Structure::Normal { pair, .. } => Some(*pair),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn chitoi_and_normal() {
        let v = structures("223344m 223344p 55s");
        assert_eq!(v.len(), 2);
        assert!(v.iter().any(|s| matches!(s, Structure::Chitoi { .. })));
        assert_eq!(normal_heads(&v), [t!(5s)]);
        let Some(Structure::Chitoi { pairs }) = v.last() else {
            unreachable!();
        };
        assert_eq!(
            pairs,
            &[t!(2m), t!(3m), t!(4m), t!(2p), t!(3p), t!(4p), t!(5s)],
        );
    }

    #[test]
    fn different_heads() {
        let v = structures("22334455m 123p 123s");
        let mut heads = normal_heads(&v);
        heads.sort_unstable();
        assert_eq!(heads, [t!(2m), t!(5m)]);
    }

    #[test]
    fn triplets_or_runs() {
        let v = structures("111222333m 456p 99s");
        assert_eq!(v.len(), 2);
        let kinds: Vec<Vec<MentsuKind>> = v
            .iter()
            .map(|s| match s {
                Structure::Normal { mentsu, .. } => {
                    mentsu.iter().map(|m| m.kind).collect()
                }
                _ => unreachable!(),
            })
            .collect();
        // concealed mentsu are sorted, shuntsu first
        assert!(kinds.contains(&vec![
            MentsuKind::Shuntsu,
            MentsuKind::Kotsu,
            MentsuKind::Kotsu,
            MentsuKind::Kotsu,
        ]));
        assert!(kinds.contains(&vec![MentsuKind::Shuntsu; 4]));
    }

    #[test]
    fn no_duplicates() {
        // kotsu then shuntsu and shuntsu then kotsu are the same reading
        let v = structures("111123m 456p 789s 55z");
        assert_eq!(v.len(), 1);
        let Structure::Normal { pair, mentsu } = &v[0] else {
            unreachable!();
        };
        assert_eq!(*pair, t!(P));
        assert_eq!(
            mentsu.as_slice(),
            &[
                Mentsu::concealed(MentsuKind::Shuntsu, t!(1m)),
                Mentsu::concealed(MentsuKind::Shuntsu, t!(4p)),
                Mentsu::concealed(MentsuKind::Shuntsu, t!(7s)),
                Mentsu::concealed(MentsuKind::Kotsu, t!(1m)),
            ],
        );
    }

    #[test]
    fn kokushi() {
        let v = structures("19m 19p 19s 1234567z 9p");
        assert_eq!(v, [Structure::Kokushi { pair: t!(9p) }]);
        assert!(structures("19m 19p 19s 123456z 99p").is_empty());
    }

    #[test]
    fn with_fuuro() {
        let v = structures("123m 456p 55p [789s] (1111z)");
        assert_eq!(v.len(), 1);
        let Structure::Normal { pair, mentsu } = &v[0] else {
            unreachable!();
        };
        assert_eq!(*pair, t!(5p));
        assert_eq!(mentsu[2].origin, Origin::Called);
        assert_eq!(mentsu[3], Mentsu {
            kind: MentsuKind::Kantsu,
            tile: t!(E),
            origin: Origin::Ankan,
        });
        assert!(!v[0].is_menzen());
        assert_eq!(v[0].to_string(), "55p 123m 456p [789s] (1111z)");

        // ankan alone keeps the hand concealed but rules out chitoi
        let v = structures("112233m 456p 99s (7777s)");
        assert_eq!(v.len(), 1);
        assert!(v[0].is_menzen());
    }

    #[test]
    fn not_agari() {
        assert!(structures("123m 456m 789p 11s 235s").is_empty());
        assert!(structures("1357m 2468p 1357s 11z").is_empty());
    }

    #[test]
    fn count_errors() {
        let h: Hand = "123m 456m 789p 11s 23s".parse().unwrap();
        assert_eq!(
            agari_structures(&h),
            Err(HandError::Undercount {
                expected: 14,
                actual: 13,
            }),
        );
        let h: Hand = "123m 456m 789p 11s 2345s".parse().unwrap();
        assert!(matches!(
            agari_structures(&h),
            Err(HandError::Overcount { .. }),
        ));
    }
}
