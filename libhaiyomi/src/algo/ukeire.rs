//! Tiles that advance a 13-tile hand towards the standard shape.
use super::shanten::calc_normal;
use crate::error::HandError;
use crate::hand::Hand;
use crate::must_tile;
use crate::tile::Tile;

use log::debug;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredTile {
    pub tile: Tile,
    /// Copies not already in the hand, including exposed sets.
    pub count: u8,
}

/// Every tile kind that lowers the standard-shape shanten when drawn, in
/// index order. Chitoi and kokushi are not considered.
///
/// Kinds the hand already holds all 4 of are still listed; use
/// [`required_tiles`] to see how many copies are left.
pub fn ukeire(hand: &Hand) -> Result<Vec<Tile>, HandError> {
    hand.ensure_len(13)?;

    let fuuro_count = hand.fuuro.len() as u8;
    let current = calc_normal(&hand.tehai, fuuro_count);
    let mut tehai = hand.tehai;
    let ret: Vec<_> = (0..34)
        .filter(|&tid| {
            tehai[tid] += 1;
            let after = calc_normal(&tehai, fuuro_count);
            tehai[tid] -= 1;
            after < current
        })
        .map(|tid| must_tile!(tid))
        .collect();

    debug!("ukeire of {hand} at shanten {current}: {} kinds", ret.len());
    Ok(ret)
}

/// [`ukeire`] with the number of unseen copies of each kind.
pub fn required_tiles(hand: &Hand) -> Result<Vec<RequiredTile>, HandError> {
    let mut seen = hand.tehai;
    for tile in hand.fuuro.iter().flat_map(|f| f.tiles()) {
        seen[tile.as_usize()] += 1;
    }
    let ret = ukeire(hand)?
        .into_iter()
        .map(|tile| RequiredTile {
            tile,
            count: 4_u8.saturating_sub(seen[tile.as_usize()]),
        })
        .collect();
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::t;

    #[test]
    fn tenpai_waits() {
        let h: Hand = "123m 456m 789p 11s 23s".parse().unwrap();
        assert_eq!(ukeire(&h).unwrap(), [t!(1s), t!(4s)]);

        let h: Hand = "1112345678999m".parse().unwrap();
        let all: Vec<_> = (0..9_u8).map(|id| must_tile!(id)).collect();
        assert_eq!(ukeire(&h).unwrap(), all);

        let h: Hand = "2m [123p] [456p] [789p] [111z]".parse().unwrap();
        assert_eq!(ukeire(&h).unwrap(), [t!(2m)]);
    }

    #[test]
    fn only_standard_shape() {
        // chitoi tenpai on 9s, but 9s does nothing for the standard shape
        let h: Hand = "114477m 225588p 9s".parse().unwrap();
        assert_eq!(
            ukeire(&h).unwrap(),
            [t!(1m), t!(4m), t!(7m), t!(2p), t!(5p), t!(8p)],
        );
    }

    #[test]
    fn monotonic() {
        for s in [
            "123m 456m 789p 11s 23s",
            "1357m 2468p 1357s 1z",
            "123567m 55s 12p 88p 9s",
            "19m 19p 19s 1234567z",
            "123456m 11s 2446p 1z",
            "2233m 445p 6789s 55z",
        ] {
            let h: Hand = s.parse().unwrap();
            let fuuro_count = h.fuuro.len() as u8;
            let before = calc_normal(&h.tehai, fuuro_count);
            let tiles = ukeire(&h).unwrap();
            assert!(!tiles.is_empty(), "{s} has no ukeire");

            for tid in 0..34_usize {
                let tile = must_tile!(tid);
                let after = h.with_tile(tile);
                let shanten_after = calc_normal(&after.tehai, fuuro_count);
                assert_eq!(tiles.contains(&tile), shanten_after < before, "{s} + {tile}");

                // short of a win, some discard keeps the improvement
                if tiles.contains(&tile) && shanten_after >= 0 {
                    let best = (0..34)
                        .filter(|&tid| after.tehai[tid] > 0)
                        .map(|tid| {
                            let mut t = after.tehai;
                            t[tid] -= 1;
                            calc_normal(&t, fuuro_count)
                        })
                        .min()
                        .unwrap();
                    assert!(best < before, "{s} + {tile}");
                }
            }
        }
    }

    #[test]
    fn remaining_copies() {
        let h: Hand = "123m 456m 789p 11s 23s".parse().unwrap();
        let required = required_tiles(&h).unwrap();
        assert_eq!(
            required,
            [
                RequiredTile { tile: t!(1s), count: 2 },
                RequiredTile { tile: t!(4s), count: 4 },
            ],
        );

        // the pon holds the other three
        let h: Hand = "2m [123p] [456p] [789p] [222m]".parse().unwrap();
        let required = required_tiles(&h).unwrap();
        assert_eq!(required, [RequiredTile { tile: t!(2m), count: 0 }]);
    }

    #[test]
    fn count_errors() {
        let h: Hand = "123m 456m 789p 11s 234s".parse().unwrap();
        assert!(matches!(ukeire(&h), Err(HandError::Overcount { .. })));
        let h: Hand = "123m".parse().unwrap();
        assert!(matches!(required_tiles(&h), Err(HandError::Undercount { .. })));
    }
}
