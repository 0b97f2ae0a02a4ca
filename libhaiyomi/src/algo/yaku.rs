//! Yaku of a winning reading, and the reading of a hand that scores best.
//!
//! Only yaku visible from the hand and the winds are detected here. Riichi,
//! ippatsu, haitei and the like are passed in as `additional_hans`, and dora
//! as `doras`. Neither can make a hand without yaku valid on its own, except
//! that a non-zero `additional_hans` is itself a yaku.
use super::agari::{Mentsu, MentsuKind, Origin, Structure, agari_structures};
use super::fu::{FuContext, FuResult, calc_fu_for_wait, completes_minkou, is_pinfu};
use super::machi::{Wait, candidate_waits};
use super::point::Point;
use crate::error::HandError;
use crate::hand::Hand;
use crate::matches_tu8;
use crate::tile::Tile;
use crate::tu8;
use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};
use serde::Serialize;
use tinyvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Yaku {
    MenzenTsumo,
    Pinfu,
    Tanyao,
    Iipeikou,
    Haku,
    Hatsu,
    Chun,
    /// Triplet of the round wind.
    Bakaze,
    /// Triplet of the seat wind.
    Jikaze,
    SanshokuDoujun,
    Ikkitsuukan,
    Honchan,
    Chiitoitsu,
    Toitoi,
    Sanankou,
    Sankantsu,
    SanshokuDoukou,
    Honroutou,
    Shousangen,
    Honitsu,
    Junchan,
    Ryanpeikou,
    Chinitsu,
    KokushiMusou,
    Suuankou,
    Daisangen,
    Shousuushii,
    Daisuushii,
    Tsuuiisou,
    Chinroutou,
    Ryuuiisou,
    ChuurenPoutou,
    Suukantsu,
}

/// Yaku han plus additional han and dora for a normal win, or the number of
/// yakuman.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Agari {
    Normal { fu: u8, han: u8 },
    Yakuman(u8),
}

/// A scored reading of a winning hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub structure: Structure,
    /// Each yaku with the han it is worth, 13 for a yakuman.
    pub yaku: Vec<(Yaku, u8)>,
    pub fu: FuResult,
    pub agari: Agari,
    pub point: Point,
}

impl Yaku {
    /// `(closed, open)` han. An open value of 0 means the yaku needs a
    /// concealed hand. Yakuman are 13.
    #[must_use]
    pub const fn han(self) -> (u8, u8) {
        match self {
            Self::MenzenTsumo | Self::Pinfu | Self::Iipeikou => (1, 0),
            Self::Tanyao | Self::Haku | Self::Hatsu | Self::Chun | Self::Bakaze | Self::Jikaze => {
                (1, 1)
            }
            Self::SanshokuDoujun | Self::Ikkitsuukan | Self::Honchan => (2, 1),
            Self::Chiitoitsu => (2, 0),
            Self::Toitoi
            | Self::Sanankou
            | Self::Sankantsu
            | Self::SanshokuDoukou
            | Self::Honroutou
            | Self::Shousangen => (2, 2),
            Self::Honitsu | Self::Junchan => (3, 2),
            Self::Ryanpeikou => (3, 0),
            Self::Chinitsu => (6, 5),
            Self::KokushiMusou | Self::Suuankou | Self::ChuurenPoutou => (13, 0),
            Self::Daisangen
            | Self::Shousuushii
            | Self::Daisuushii
            | Self::Tsuuiisou
            | Self::Chinroutou
            | Self::Ryuuiisou
            | Self::Suukantsu => (13, 13),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_yakuman(self) -> bool {
        self.han().0 == 13
    }
}

impl fmt::Display for Yaku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl PartialOrd for Agari {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Agari {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Yakuman(l), Self::Yakuman(r)) => l.cmp(r),
            (Self::Yakuman(_), Self::Normal { .. }) => Ordering::Greater,
            (Self::Normal { .. }, Self::Yakuman(_)) => Ordering::Less,
            (Self::Normal { fu: lf, han: lh }, Self::Normal { fu: rf, han: rh }) => {
                lh.cmp(rh).then(lf.cmp(rf))
            }
        }
    }
}

impl Agari {
    #[must_use]
    pub const fn point(self, is_oya: bool) -> Point {
        match self {
            Self::Normal { fu, han } => Point::calc(is_oya, fu, han),
            Self::Yakuman(n) => Point::yakuman(is_oya, n as i32),
        }
    }
}

/// Yaku that only depend on which tiles make up the hand.
fn composition_yaku(tiles: &[Tile], found: &mut Vec<Yaku>) {
    let has_jihai = tiles.iter().any(|t| t.is_jihai());
    let mut suits = tiles.iter().filter(|t| !t.is_jihai()).map(|t| t.suit());
    let Some(first) = suits.next() else {
        found.push(Yaku::Tsuuiisou);
        return;
    };
    let one_suit = suits.all(|s| s == first);

    if tiles.iter().all(|t| !t.is_yaokyuu()) {
        found.push(Yaku::Tanyao);
    }
    if one_suit {
        found.push(if has_jihai { Yaku::Honitsu } else { Yaku::Chinitsu });
    }
    if tiles.iter().all(|t| t.is_yaokyuu()) {
        found.push(if has_jihai { Yaku::Honroutou } else { Yaku::Chinroutou });
    }
    if tiles
        .iter()
        .all(|t| matches_tu8!(t.as_u8(), 2s | 3s | 4s | 6s | 8s | F))
    {
        found.push(Yaku::Ryuuiisou);
    }
}

fn peikou_count(shuntsu: &[Tile]) -> usize {
    let mut sorted: ArrayVec<[Tile; 4]> = shuntsu.iter().copied().collect();
    sorted.sort_unstable();
    let mut count = 0;
    let mut i = 0;
    while i + 1 < sorted.len() {
        if sorted[i] == sorted[i + 1] {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

fn is_chuuren(tiles: &[Tile], mentsu: &[Mentsu]) -> bool {
    // any kan, even an ankan, rules it out
    if mentsu.iter().any(|m| m.origin != Origin::Concealed) {
        return false;
    }
    let Some(&first) = tiles.first() else {
        return false;
    };
    if first.is_jihai() || tiles.iter().any(|t| t.suit() != first.suit()) {
        return false;
    }
    let base = first.as_usize() / 9 * 9;
    let mut counts = [0_u8; 9];
    for t in tiles {
        counts[t.as_usize() - base] += 1;
    }
    counts[0] >= 3 && counts[8] >= 3 && counts[1..8].iter().all(|&c| c >= 1)
}

fn mentsu_yaku(
    pair: Tile,
    mentsu: &[Mentsu],
    ctx: &FuContext,
    wait: Option<Wait>,
    is_menzen: bool,
    found: &mut Vec<Yaku>,
) {
    let shuntsu: ArrayVec<[Tile; 4]> = mentsu
        .iter()
        .filter(|m| m.kind == MentsuKind::Shuntsu)
        .map(|m| m.tile)
        .collect();
    let kotsu: ArrayVec<[Tile; 4]> = mentsu
        .iter()
        .filter(|m| m.kind != MentsuKind::Shuntsu)
        .map(|m| m.tile)
        .collect();
    let has_shuntsu = |id: u8| shuntsu.iter().any(|t| t.as_u8() == id);
    let has_kotsu = |id: u8| kotsu.iter().any(|t| t.as_u8() == id);

    let mut tiles = vec![pair, pair];
    tiles.extend(mentsu.iter().flat_map(|m| m.tiles()));
    composition_yaku(&tiles, found);
    if is_chuuren(&tiles, mentsu) {
        found.push(Yaku::ChuurenPoutou);
    }

    if is_menzen {
        match peikou_count(&shuntsu) {
            2 => found.push(Yaku::Ryanpeikou),
            1 => found.push(Yaku::Iipeikou),
            _ => (),
        }
    }

    for &k in &kotsu {
        match k.as_u8() {
            tu8!(P) => found.push(Yaku::Haku),
            tu8!(F) => found.push(Yaku::Hatsu),
            tu8!(C) => found.push(Yaku::Chun),
            _ => (),
        }
        if k == ctx.bakaze {
            found.push(Yaku::Bakaze);
        }
        if k == ctx.jikaze {
            found.push(Yaku::Jikaze);
        }
    }

    if (0..7).any(|num| (0..3).all(|suit| has_shuntsu(suit * 9 + num))) {
        found.push(Yaku::SanshokuDoujun);
    }
    if (0..3).any(|suit| [0, 3, 6].iter().all(|&num| has_shuntsu(suit * 9 + num))) {
        found.push(Yaku::Ikkitsuukan);
    }
    if (0..9).any(|num| (0..3).all(|suit| has_kotsu(suit * 9 + num))) {
        found.push(Yaku::SanshokuDoukou);
    }
    if shuntsu.is_empty() {
        found.push(Yaku::Toitoi);
    }

    let ankou = mentsu
        .iter()
        .filter(|m| m.kind != MentsuKind::Shuntsu && m.origin != Origin::Called)
        .filter(|&&m| !completes_minkou(m, ctx, wait))
        .count();
    match ankou {
        4 => found.push(Yaku::Suuankou),
        3 => found.push(Yaku::Sanankou),
        _ => (),
    }
    match mentsu.iter().filter(|m| m.kind == MentsuKind::Kantsu).count() {
        4 => found.push(Yaku::Suukantsu),
        3 => found.push(Yaku::Sankantsu),
        _ => (),
    }

    let dragons = kotsu.iter().filter(|t| t.is_sangenpai()).count();
    if dragons == 3 {
        found.push(Yaku::Daisangen);
    } else if dragons == 2 && pair.is_sangenpai() {
        found.push(Yaku::Shousangen);
    }
    let winds = kotsu.iter().filter(|t| t.is_kazehai()).count();
    if winds == 4 {
        found.push(Yaku::Daisuushii);
    } else if winds == 3 && pair.is_kazehai() {
        found.push(Yaku::Shousuushii);
    }

    // every block holds a terminal or honor, and at least one run keeps it
    // apart from honroutou
    let is_chanta = !shuntsu.is_empty()
        && pair.is_yaokyuu()
        && kotsu.iter().all(|t| t.is_yaokyuu())
        && shuntsu.iter().all(|t| matches!(t.num(), Some(1 | 7)));
    if is_chanta {
        let has_jihai = tiles.iter().any(|t| t.is_jihai());
        found.push(if has_jihai { Yaku::Honchan } else { Yaku::Junchan });
    }
}

/// Yaku of one reading of the winning tile, each with the han it is worth in
/// this hand, in declaration order. When there is a yakuman only yakuman are
/// listed.
#[must_use]
pub fn detect_yaku(
    structure: &Structure,
    ctx: &FuContext,
    wait: Option<Wait>,
) -> Vec<(Yaku, u8)> {
    let is_menzen = structure.is_menzen();
    let mut found = vec![];
    match structure {
        Structure::Kokushi { .. } => found.push(Yaku::KokushiMusou),
        Structure::Chitoi { pairs } => {
            found.push(Yaku::Chiitoitsu);
            let tiles: Vec<_> = pairs.iter().flat_map(|&t| [t, t]).collect();
            composition_yaku(&tiles, &mut found);
        }
        Structure::Normal { pair, mentsu } => {
            if is_pinfu(structure, wait, ctx.bakaze, ctx.jikaze) {
                found.push(Yaku::Pinfu);
            }
            mentsu_yaku(*pair, mentsu, ctx, wait, is_menzen, &mut found);
        }
    }
    if is_menzen && ctx.is_tsumo {
        found.push(Yaku::MenzenTsumo);
    }

    if found.iter().any(|y| y.is_yakuman()) {
        found.retain(|y| y.is_yakuman());
    }
    found.sort_unstable();
    found
        .into_iter()
        .filter_map(|y| {
            let (closed, open) = y.han();
            let han = if is_menzen { closed } else { open };
            (han > 0).then_some((y, han))
        })
        .collect()
}

/// The best scoring reading of the winning tile within `structure`, or
/// `None` if no reading has a yaku.
#[must_use]
pub fn evaluate(
    structure: &Structure,
    ctx: &FuContext,
    additional_hans: u8,
    doras: u8,
) -> Option<Evaluation> {
    let is_oya = ctx.is_oya();
    candidate_waits(structure, ctx.winning_tile)
        .iter()
        .filter_map(|&wait| {
            let yaku = detect_yaku(structure, ctx, Some(wait));
            let fu = calc_fu_for_wait(structure, ctx, Some(wait));
            let yakuman = yaku.iter().filter(|(y, _)| y.is_yakuman()).count() as u8;
            let agari = if yakuman > 0 {
                Agari::Yakuman(yakuman)
            } else {
                let han = yaku.iter().map(|&(_, h)| h).sum::<u8>() + additional_hans;
                if han == 0 {
                    return None;
                }
                Agari::Normal {
                    fu: fu.total,
                    han: han + doras,
                }
            };
            trace!("{structure} as {wait:?}: {agari:?}");
            Some(Evaluation {
                structure: structure.clone(),
                yaku,
                fu,
                agari,
                point: agari.point(is_oya),
            })
        })
        .max_by_key(|e| (e.point.total(ctx.is_tsumo, is_oya), e.agari))
}

/// The reading of a complete hand worth the most points, or `None` if the
/// hand is not complete or has no yaku.
pub fn best_agari(
    hand: &Hand,
    ctx: &FuContext,
    additional_hans: u8,
    doras: u8,
) -> Result<Option<Evaluation>, HandError> {
    let is_oya = ctx.is_oya();
    let ret = agari_structures(hand)?
        .iter()
        .filter_map(|s| evaluate(s, ctx, additional_hans, doras))
        .max_by_key(|e| (e.point.total(ctx.is_tsumo, is_oya), e.agari));
    debug!(
        "best agari of {hand} on {}: {:?}",
        ctx.winning_tile,
        ret.as_ref().map(|e| e.agari),
    );
    Ok(ret)
}
