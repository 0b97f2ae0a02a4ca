//! Fu of a winning structure.
use super::agari::{Mentsu, MentsuKind, Origin, Structure};
use super::machi::{Wait, candidate_waits};
use crate::tile::Tile;
use crate::tu8;

use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuContext {
    pub winning_tile: Tile,
    pub is_tsumo: bool,
    pub bakaze: Tile,
    pub jikaze: Tile,
}

/// Fu before rounding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FuBreakdown {
    /// 20, or 25 for chitoi.
    pub base: u8,
    pub mentsu: u8,
    pub pair: u8,
    pub wait: u8,
    /// Tsumo or menzen ron.
    pub agari: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FuResult {
    /// Rounded.
    pub total: u8,
    /// The reading of the winning tile the total was computed with.
    pub wait: Option<Wait>,
    pub breakdown: FuBreakdown,
}

impl FuContext {
    #[inline]
    #[must_use]
    pub fn is_oya(&self) -> bool {
        self.jikaze.as_u8() == tu8!(E)
    }
}

impl FuBreakdown {
    #[inline]
    #[must_use]
    pub fn sum(self) -> u8 {
        self.base + self.mentsu + self.pair + self.wait + self.agari
    }
}

fn pair_fu(pair: Tile, bakaze: Tile, jikaze: Tile) -> u8 {
    let fu = [pair.is_sangenpai(), pair == bakaze, pair == jikaze]
        .into_iter()
        .map(|hit| if hit { 2 } else { 0 })
        .sum::<u8>();
    // double wind pairs count once
    fu.min(2)
}

fn pinfu_shape(
    pair: Tile,
    mentsu: &[Mentsu],
    wait: Option<Wait>,
    bakaze: Tile,
    jikaze: Tile,
) -> bool {
    // four concealed shuntsu, which also rules out any call
    mentsu
        .iter()
        .all(|m| m.kind == MentsuKind::Shuntsu && m.origin == Origin::Concealed)
        && pair_fu(pair, bakaze, jikaze) == 0
        && wait == Some(Wait::Ryanmen)
}

/// Pinfu: concealed, four shuntsu, a pair worth no fu and a ryanmen wait.
#[must_use]
pub fn is_pinfu(structure: &Structure, wait: Option<Wait>, bakaze: Tile, jikaze: Tile) -> bool {
    match structure {
        Structure::Normal { pair, mentsu } => {
            pinfu_shape(*pair, mentsu, wait, bakaze, jikaze)
        }
        Structure::Chitoi { .. } | Structure::Kokushi { .. } => false,
    }
}

/// A ron on a shanpon reading completes the triplet with a discard, so it
/// counts as a minkou.
pub(super) fn completes_minkou(m: Mentsu, ctx: &FuContext, wait: Option<Wait>) -> bool {
    !ctx.is_tsumo
        && wait == Some(Wait::Shanpon)
        && m.kind == MentsuKind::Kotsu
        && m.origin == Origin::Concealed
        && m.tile == ctx.winning_tile
}

fn calc_reading(
    pair: Tile,
    mentsu: &[Mentsu],
    ctx: &FuContext,
    wait: Option<Wait>,
) -> FuResult {
    let is_menzen = mentsu.iter().all(|m| !m.is_open());
    let has_pinfu = pinfu_shape(pair, mentsu, wait, ctx.bakaze, ctx.jikaze);

    let mut breakdown = FuBreakdown {
        base: 20,
        ..Default::default()
    };
    breakdown.mentsu = mentsu
        .iter()
        .map(|m| {
            let unit = match m.kind {
                MentsuKind::Shuntsu => return 0,
                MentsuKind::Kotsu => 2,
                MentsuKind::Kantsu => 8,
            };
            let is_concealed = m.origin != Origin::Called && !completes_minkou(*m, ctx, wait);
            unit << (u8::from(is_concealed) + u8::from(m.tile.is_yaokyuu()))
        })
        .sum();
    breakdown.pair = pair_fu(pair, ctx.bakaze, ctx.jikaze);
    breakdown.wait = wait.map_or(0, Wait::fu);
    breakdown.agari = match (ctx.is_tsumo, is_menzen) {
        (true, _) if has_pinfu => 0,
        (true, _) => 2,
        (false, true) => 10,
        (false, false) => 0,
    };

    let sum = breakdown.sum();
    let total = if has_pinfu && ctx.is_tsumo {
        20
    } else if !is_menzen && sum == 20 {
        30
    } else {
        sum.div_ceil(10) * 10
    };
    FuResult {
        total,
        wait,
        breakdown,
    }
}

/// Fu of `structure` with the winning tile read as `wait`.
#[must_use]
pub fn calc_fu_for_wait(structure: &Structure, ctx: &FuContext, wait: Option<Wait>) -> FuResult {
    let fixed = |base| FuResult {
        total: base,
        wait: Some(Wait::Tanki),
        breakdown: FuBreakdown {
            base,
            ..Default::default()
        },
    };
    match structure {
        Structure::Chitoi { .. } => fixed(25),
        // yakuman, so this is only informational
        Structure::Kokushi { .. } => fixed(20),
        Structure::Normal { pair, mentsu } => calc_reading(*pair, mentsu, ctx, wait),
    }
}

/// Fu of a winning structure. When the winning tile can be read as several
/// waits, the reading with the highest fu wins.
#[must_use]
pub fn calc_fu(structure: &Structure, ctx: &FuContext) -> FuResult {
    let ret = candidate_waits(structure, ctx.winning_tile)
        .iter()
        .map(|&w| calc_fu_for_wait(structure, ctx, Some(w)))
        .reduce(|best, r| if r.total > best.total { r } else { best })
        .unwrap_or_else(|| calc_fu_for_wait(structure, ctx, None));
    trace!("{structure} on {}: {} fu", ctx.winning_tile, ret.total);
    ret
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algo::agari::agari_structures;
    use crate::hand::Hand;
    use crate::t;

    fn fu(s: &str, winning_tile: Tile, is_tsumo: bool) -> Vec<FuResult> {
        let h: Hand = s.parse().unwrap();
        let ctx = FuContext {
            winning_tile,
            is_tsumo,
            bakaze: t!(E),
            jikaze: t!(S),
        };
        agari_structures(&h)
            .unwrap()
            .iter()
            .map(|st| calc_fu(st, &ctx))
            .collect()
    }

    #[test]
    fn special_shapes() {
        let r = fu("1122m 3344p 5566s 77z", t!(C), false);
        assert_eq!(r[0].total, 25);
        assert_eq!(r[0].breakdown.base, 25);
        let r = fu("19m 19p 19s 1234567z 1z", t!(E), true);
        assert_eq!(r[0].total, 20);
    }

    #[test]
    fn pinfu() {
        let r = fu("23456m 234p 567s 99s 7m", t!(7m), true);
        assert_eq!(r[0].total, 20);
        assert_eq!(r[0].breakdown.agari, 0);
        assert_eq!(r[0].wait, Some(Wait::Ryanmen));

        let r = fu("23456m 234p 567s 99s 7m", t!(7m), false);
        assert_eq!(r[0].total, 30);
        assert_eq!(r[0].breakdown.agari, 10);
        assert_eq!(r[0].breakdown.mentsu, 0);

        let r = fu("23456m 234p 567s 99s 7m", t!(5m), true);
        assert_eq!(r[0].wait, Some(Wait::Ryanmen));
        assert_eq!(r[0].total, 20);

        // kanchan tsumo is not pinfu: 20 + 2 + 2
        let r = fu("12346m 234p 567s 99s 5m", t!(5m), true);
        assert_eq!(r[0].wait, Some(Wait::Kanchan));
        assert_eq!(r[0].breakdown.agari, 2);
        assert_eq!(r[0].total, 30);
    }

    #[test]
    fn pair_fu_capped() {
        let ctx = |jikaze| FuContext {
            winning_tile: t!(2m),
            is_tsumo: false,
            bakaze: t!(E),
            jikaze,
        };
        let h: Hand = "123m 456p 789p 123s 11z".parse().unwrap();
        let s = agari_structures(&h).unwrap().remove(0);
        assert_eq!(calc_fu(&s, &ctx(t!(E))).breakdown.pair, 2);
        assert_eq!(calc_fu(&s, &ctx(t!(S))).breakdown.pair, 2);
        assert_eq!(calc_fu(&s, &ctx(t!(W))).breakdown.pair, 2);
        let h: Hand = "123m 456p 789p 123s 44z".parse().unwrap();
        let s = agari_structures(&h).unwrap().remove(0);
        assert_eq!(calc_fu(&s, &ctx(t!(S))).breakdown.pair, 0);
        let h: Hand = "123m 456p 789p 123s 55z".parse().unwrap();
        let s = agari_structures(&h).unwrap().remove(0);
        assert_eq!(calc_fu(&s, &ctx(t!(S))).breakdown.pair, 2);
    }

    #[test]
    fn mentsu_fu() {
        // ankou 555m (4) + ron on shanpon 99p as minkou (4) + menzen ron 10
        let r = fu("555m 99p 123s 456s 11z 9p", t!(9p), false);
        assert_eq!(r[0].wait, Some(Wait::Shanpon));
        assert_eq!(r[0].breakdown.mentsu, 8);
        assert_eq!(r[0].breakdown.pair, 2);
        assert_eq!(r[0].total, 40);

        // the same hand by tsumo keeps 999p concealed: 20 + 4 + 8 + 2 + 2
        let r = fu("555m 99p 123s 456s 11z 9p", t!(9p), true);
        assert_eq!(r[0].breakdown.mentsu, 12);
        assert_eq!(r[0].total, 40);

        // open pon 2 + minkan of terminals 16 + ankan of simples 16
        let r = fu("234m 55s [666p] [9999s] (2222p)", t!(2m), false);
        assert_eq!(r[0].breakdown.mentsu, 34);
        assert_eq!(r[0].breakdown.agari, 0);
        assert_eq!(r[0].total, 60);

        // an ankan of honors is 32
        let r = fu("234m 55s 678p 345s (1111z)", t!(2m), true);
        assert_eq!(r[0].breakdown.mentsu, 32);
        assert_eq!(r[0].total, 60);
    }

    #[test]
    fn open_hands() {
        // cheap open ron rounds up to 30
        let r = fu("234m 55s 678p [345s] [456m]", t!(2m), false);
        assert_eq!(r[0].breakdown.sum(), 20);
        assert_eq!(r[0].total, 30);
        let r = fu("234m 55s 678p [345s] [456m]", t!(2m), true);
        assert_eq!(r[0].total, 30);
    }

    #[test]
    fn highest_reading() {
        // 4m is kanchan in 345 or ryanmen in 456; kanchan is worth more
        let r = fu("345m 456m 789p 123s 99s", t!(4m), false);
        assert_eq!(r[0].wait, Some(Wait::Kanchan));
        assert_eq!(r[0].breakdown.wait, 2);
        assert_eq!(r[0].total, 40);
        assert!(!is_pinfu(
            &agari_structures(&"345m 456m 789p 123s 99s".parse().unwrap())
                .unwrap()[0],
            r[0].wait,
            t!(E),
            t!(S),
        ));
    }
}
