//! Shanten for the standard shape (4 mentsu + 1 head), chitoi and kokushi.
//!
//! The standard solver decomposes each suit and the honors separately into
//! mentsu, taatsu, a possible head and leftover singles, memoising every
//! suit pattern it visits, and then combines the per-group results.
use crate::error::HandError;
use crate::hand::Hand;
use crate::tile::YAOKYUU;
use std::ops::Range;

use ahash::AHashMap;
use derivative::Derivative;
use derive_more::Add;
use log::debug;
use serde::{Deserialize, Serialize};

/// Which special shapes the aggregate [`shanten`] considers. The standard
/// shape is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct ShantenOptions {
    #[derivative(Default(value = "true"))]
    pub chitoi: bool,
    #[derivative(Default(value = "true"))]
    pub kokushi: bool,
}

/// Block counts of one decomposition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add)]
struct Blocks {
    mentsu: u8,
    taatsu: u8,
    head: u8,
}

const GROUPS: [(Range<usize>, bool); 4] = [
    (0..9, false),
    (9..18, false),
    (18..27, false),
    (27..34, true),
];

const MENTSU: Blocks = Blocks {
    mentsu: 1,
    taatsu: 0,
    head: 0,
};
const TAATSU: Blocks = Blocks {
    mentsu: 0,
    taatsu: 1,
    head: 0,
};
const HEAD: Blocks = Blocks {
    mentsu: 0,
    taatsu: 0,
    head: 1,
};

/// Keyed by the raw counts of a group, padded to 9, and whether it is the
/// honors. Any count fits, so oversized inputs never share an entry.
type Memo = AHashMap<(bool, [u8; 9]), Vec<Blocks>>;

fn memo_key(counts: &[u8], is_jihai: bool) -> (bool, [u8; 9]) {
    let mut key = [0; 9];
    key[..counts.len()].copy_from_slice(counts);
    (is_jihai, key)
}

/// Every distinct `Blocks` reachable by decomposing `counts`, which is one
/// suit or the honors.
fn group_blocks(counts: &mut [u8], is_jihai: bool, memo: &mut Memo) -> Vec<Blocks> {
    let key = memo_key(counts, is_jihai);
    if let Some(cached) = memo.get(&key) {
        return cached.clone();
    }
    let Some(i) = counts.iter().position(|&c| c > 0) else {
        return vec![Blocks::default()];
    };

    let len = counts.len();
    let has =
        |counts: &[u8], offset: usize| !is_jihai && i + offset < len && counts[i + offset] > 0;

    let mut ret = vec![];
    if counts[i] >= 3 {
        branch(counts, is_jihai, &[i, i, i], MENTSU, memo, &mut ret);
    }
    if has(counts, 1) && has(counts, 2) {
        branch(counts, is_jihai, &[i, i + 1, i + 2], MENTSU, memo, &mut ret);
    }
    if counts[i] >= 2 {
        branch(counts, is_jihai, &[i, i], HEAD, memo, &mut ret);
        branch(counts, is_jihai, &[i, i], TAATSU, memo, &mut ret);
    }
    if has(counts, 1) {
        branch(counts, is_jihai, &[i, i + 1], TAATSU, memo, &mut ret);
    }
    if has(counts, 2) {
        branch(counts, is_jihai, &[i, i + 2], TAATSU, memo, &mut ret);
    }
    // leave it as a single
    branch(counts, is_jihai, &[i], Blocks::default(), memo, &mut ret);

    ret.sort_unstable();
    ret.dedup();
    memo.insert(key, ret.clone());
    ret
}

fn branch(
    counts: &mut [u8],
    is_jihai: bool,
    taken: &[usize],
    block: Blocks,
    memo: &mut Memo,
    out: &mut Vec<Blocks>,
) {
    for &idx in taken {
        counts[idx] -= 1;
    }
    let rest = group_blocks(counts, is_jihai, memo);
    // at most one head per group
    out.extend(
        rest.into_iter()
            .filter(|b| b.head + block.head <= 1)
            .map(|b| b + block),
    );
    for &idx in taken {
        counts[idx] += 1;
    }
}

fn score(blocks: Blocks, fuuro_count: u8, tile_count: u8) -> i8 {
    let mentsu = (blocks.mentsu + fuuro_count).min(4);
    let capacity = 4 - mentsu;
    let mut usable = blocks.taatsu.min(capacity);
    let has_head = blocks.head > 0;

    // With no single left to wait on as the head, a full set of 4 blocks
    // still needs one taatsu broken up.
    let singles = i16::from(tile_count)
        - 3 * i16::from(blocks.mentsu)
        - 2 * i16::from(blocks.taatsu)
        - 2 * i16::from(blocks.head);
    if !has_head
        && mentsu + usable == 4
        && usable > 0
        && blocks.taatsu == usable
        && singles == 0
    {
        usable -= 1;
    }

    8 - 2 * mentsu as i8 - usable as i8 - i8::from(has_head)
}

/// Standard-shape shanten of the concealed `tehai` plus `fuuro_count`
/// exposed sets.
///
/// Accepts any tile count. A complete hand with the winning tile included
/// yields -1, which is what ukeire relies on.
#[must_use]
pub fn calc_normal(tehai: &[u8; 34], fuuro_count: u8) -> i8 {
    let mut memo = Memo::default();
    let mut combined = vec![Blocks::default()];

    for (range, is_jihai) in GROUPS {
        let mut group = [0; 9];
        let group = &mut group[..range.len()];
        group.copy_from_slice(&tehai[range]);
        let options = group_blocks(group, is_jihai, &mut memo);

        let mut next: Vec<_> = combined
            .iter()
            .flat_map(|&a| {
                options
                    .iter()
                    .filter(move |b| a.head + b.head <= 1)
                    .map(move |&b| a + b)
            })
            .collect();
        next.sort_unstable();
        next.dedup();
        combined = next;
    }

    let tile_count: u8 = tehai.iter().sum();
    combined
        .into_iter()
        .map(|b| score(b, fuuro_count, tile_count))
        .min()
        .unwrap_or(8)
}

/// `None` if there is any exposed set, ankan included.
#[must_use]
pub fn calc_chitoi(tehai: &[u8; 34], fuuro_count: u8) -> Option<u8> {
    if fuuro_count > 0 {
        return None;
    }
    let pairs = tehai.iter().filter(|&&c| c >= 2).count() as u8;
    let kinds = tehai.iter().filter(|&&c| c > 0).count() as u8;
    Some(6_u8.saturating_sub(pairs) + 7_u8.saturating_sub(kinds))
}

/// `None` if there is any exposed set, ankan included.
#[must_use]
pub fn calc_kokushi(tehai: &[u8; 34], fuuro_count: u8) -> Option<u8> {
    if fuuro_count > 0 {
        return None;
    }
    let unique = YAOKYUU
        .iter()
        .filter(|&&t| tehai[t as usize] > 0)
        .count() as u8;
    let has_pair = YAOKYUU.iter().any(|&t| tehai[t as usize] >= 2);
    Some((13 - unique).saturating_sub(u8::from(has_pair)))
}

/// Minimum shanten of a 13-tile hand over the standard shape and the special
/// shapes enabled in `options`.
pub fn shanten(hand: &Hand, options: ShantenOptions) -> Result<u8, HandError> {
    hand.ensure_len(13)?;

    let fuuro_count = hand.fuuro.len() as u8;
    let normal = calc_normal(&hand.tehai, fuuro_count).max(0) as u8;
    let chitoi = options
        .chitoi
        .then(|| calc_chitoi(&hand.tehai, fuuro_count))
        .flatten();
    let kokushi = options
        .kokushi
        .then(|| calc_kokushi(&hand.tehai, fuuro_count))
        .flatten();

    let ret = [Some(normal), chitoi, kokushi]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(normal);
    debug!("shanten of {hand}: {ret} (normal {normal}, chitoi {chitoi:?}, kokushi {kokushi:?})");
    Ok(ret)
}
