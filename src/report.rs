use std::fmt;

use anyhow::{Context, Result, ensure};
use serde::Serialize;
use yomi::algo::agari::{Structure, agari_structures};
use yomi::algo::fu::{FuContext, FuResult, calc_fu};
use yomi::algo::yaku::{Agari, Evaluation, best_agari};
use yomi::algo::shanten::{ShantenOptions, calc_chitoi, calc_kokushi, calc_normal, shanten};
use yomi::algo::ukeire::{RequiredTile, required_tiles};
use yomi::hand::Hand;
use yomi::tile::Tile;

/// Everything the report needs besides the hand itself.
#[derive(Debug, Clone)]
pub struct Query {
    /// Defaults to the last concealed tile written.
    pub winning_tile: Option<Tile>,
    pub is_tsumo: bool,
    pub bakaze: Tile,
    pub jikaze: Tile,
    pub dora_indicators: Vec<Tile>,
    pub ura_indicators: Vec<Tile>,
    /// Han from situational yaku such as riichi or haitei, which the hand
    /// alone does not show.
    pub additional_hans: u8,
    pub shanten: ShantenOptions,
}

#[derive(Debug, Serialize)]
pub struct ShantenReport {
    pub shanten: u8,
    pub normal: i8,
    pub chitoi: Option<u8>,
    pub kokushi: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct AgariReport {
    pub structure: Structure,
    pub fu: FuResult,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Analysis {
    Waiting {
        shanten: ShantenReport,
        ukeire: Vec<RequiredTile>,
    },
    Complete {
        winning_tile: Tile,
        is_tsumo: bool,
        is_oya: bool,
        agari: Vec<AgariReport>,
        /// The reading worth the most points, `None` without yaku.
        best: Option<Evaluation>,
    },
}

/// A hand and what can be said about it.
#[derive(Debug, Serialize)]
pub struct Report {
    pub hand: String,
    pub doras: Option<u8>,
    pub ura_doras: Option<u8>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

impl Report {
    pub fn new(hand: &Hand, last_tile: Option<Tile>, query: &Query) -> Result<Self> {
        let len = hand.effective_len();
        let expected = if len <= 13 { 13 } else { 14 };
        hand.ensure_len(expected)?;

        let doras = (!query.dora_indicators.is_empty())
            .then(|| hand.count_doras(&query.dora_indicators));
        let ura_doras = (!query.ura_indicators.is_empty())
            .then(|| hand.count_doras(&query.ura_indicators));

        let analysis = if expected == 13 {
            Self::waiting(hand, query)?
        } else {
            let winning_tile = query
                .winning_tile
                .or(last_tile)
                .context("a complete hand needs a winning tile")?;
            ensure!(
                hand.tehai[winning_tile.as_usize()] > 0,
                "winning tile {winning_tile} is not among the concealed tiles of {hand}",
            );
            let dora_han = doras.unwrap_or(0) + ura_doras.unwrap_or(0);
            Self::complete(hand, winning_tile, query, dora_han)?
        };

        Ok(Self {
            hand: hand.to_string(),
            doras,
            ura_doras,
            analysis,
        })
    }

    fn waiting(hand: &Hand, query: &Query) -> Result<Analysis> {
        let fuuro_count = hand.fuuro.len() as u8;
        let shanten = ShantenReport {
            shanten: shanten(hand, query.shanten)?,
            normal: calc_normal(&hand.tehai, fuuro_count),
            chitoi: calc_chitoi(&hand.tehai, fuuro_count),
            kokushi: calc_kokushi(&hand.tehai, fuuro_count),
        };
        Ok(Analysis::Waiting {
            shanten,
            ukeire: required_tiles(hand)?,
        })
    }

    fn complete(
        hand: &Hand,
        winning_tile: Tile,
        query: &Query,
        dora_han: u8,
    ) -> Result<Analysis> {
        let ctx = FuContext {
            winning_tile,
            is_tsumo: query.is_tsumo,
            bakaze: query.bakaze,
            jikaze: query.jikaze,
        };
        let agari = agari_structures(hand)?
            .into_iter()
            .map(|structure| {
                let fu = calc_fu(&structure, &ctx);
                AgariReport { structure, fu }
            })
            .collect();
        let best = best_agari(hand, &ctx, query.additional_hans, dora_han)?;

        Ok(Analysis::Complete {
            winning_tile,
            is_tsumo: query.is_tsumo,
            is_oya: ctx.is_oya(),
            agari,
            best,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hand)?;
        match &self.analysis {
            Analysis::Waiting { shanten, ukeire } => {
                writeln!(f)?;
                write!(
                    f,
                    "shanten {} (normal {}, chitoi {}, kokushi {})",
                    shanten.shanten,
                    shanten.normal,
                    opt_to_string(shanten.chitoi),
                    opt_to_string(shanten.kokushi),
                )?;
                let total: u32 = ukeire.iter().map(|r| u32::from(r.count)).sum();
                let tiles = ukeire
                    .iter()
                    .map(|r| format!("{}[{}]", r.tile, r.count))
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "\nukeire {total}: {tiles}")?;
            }
            Analysis::Complete {
                winning_tile,
                is_tsumo,
                is_oya,
                agari,
                best,
            } => {
                write!(
                    f,
                    " +{winning_tile} {}",
                    if *is_tsumo { "tsumo" } else { "ron" },
                )?;
                if agari.is_empty() {
                    write!(f, "\nno agari")?;
                }
                for a in agari {
                    let b = &a.fu.breakdown;
                    write!(
                        f,
                        "\n{} | {} {}fu (base {}, mentsu {}, pair {}, wait {}, agari {})",
                        a.structure,
                        a.fu
                            .wait
                            .map_or_else(|| "-".to_owned(), |w| format!("{w:?}").to_lowercase()),
                        a.fu.total,
                        b.base,
                        b.mentsu,
                        b.pair,
                        b.wait,
                        b.agari,
                    )?;
                }
                match best {
                    Some(best) => write_best(f, best, *is_tsumo, *is_oya)?,
                    None if !agari.is_empty() => write!(f, "\nno yaku")?,
                    None => (),
                }
            }
        }
        if let Some(doras) = self.doras {
            write!(f, "\ndora {doras}")?;
        }
        if let Some(ura_doras) = self.ura_doras {
            write!(f, "\nura {ura_doras}")?;
        }
        Ok(())
    }
}

fn write_best(
    f: &mut fmt::Formatter<'_>,
    best: &Evaluation,
    is_tsumo: bool,
    is_oya: bool,
) -> fmt::Result {
    let yaku = best
        .yaku
        .iter()
        .map(|(y, han)| format!("{y} {han}"))
        .collect::<Vec<_>>()
        .join(", ");
    write!(f, "\nbest {} | {yaku} | ", best.structure)?;
    match best.agari {
        Agari::Normal { fu, han } => write!(f, "{han} han {fu}fu")?,
        Agari::Yakuman(1) => f.write_str("yakuman")?,
        Agari::Yakuman(n) => write!(f, "{n}x yakuman")?,
    }
    let point = best.point;
    if !is_tsumo {
        write!(f, " = {}", point.ron)
    } else if is_oya {
        write!(f, " = {} all ({})", point.tsumo_ko, point.tsumo_total(true))
    } else {
        write!(
            f,
            " = {}/{} ({})",
            point.tsumo_ko,
            point.tsumo_oya,
            point.tsumo_total(false),
        )
    }
}

fn opt_to_string(v: Option<u8>) -> String {
    v.map_or_else(|| "-".to_owned(), |v| v.to_string())
}
