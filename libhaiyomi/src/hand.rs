//! Hand model and tenhou.net/2 style notation (like `123m 456p 77z`).
//!
//! Extended notation adds exposed sets: `[...]` is a called set (chi, pon or
//! minkan depending on its tiles) and `(...)` is an ankan, for example
//! `123m 55p [789s] (1111z)`.
use crate::error::HandError;
use crate::must_tile;
use crate::tile::Tile;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Error, Result, bail, ensure};
use serde::Serialize;
use tinyvec::ArrayVec;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FuuroKind {
    #[default]
    Chi,
    Pon,
    /// Daiminkan or kakan; both are open quads.
    Minkan,
    Ankan,
}

/// An exposed set. Counts as 3 tiles of the hand no matter its kind.
///
/// Built with [`Fuuro::new`], so a chi always stays within its suit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Fuuro {
    kind: FuuroKind,
    /// Lowest tile for chi, the repeated tile otherwise.
    tile: Tile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    /// Concealed tiles only.
    pub tehai: [u8; 34],
    pub fuuro: ArrayVec<[Fuuro; 4]>,
}

impl Fuuro {
    /// `tile` is the lowest tile for a chi, which must then be a suited tile
    /// no higher than 7.
    pub fn new(kind: FuuroKind, tile: Tile) -> Result<Self> {
        if kind == FuuroKind::Chi {
            ensure!(
                tile.shift(2).is_some(),
                "a chi cannot start from {tile}",
            );
        }
        Ok(Self { kind, tile })
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> FuuroKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn tile(self) -> Tile {
        self.tile
    }

    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self.kind, FuuroKind::Ankan)
    }

    #[inline]
    #[must_use]
    pub const fn is_kan(self) -> bool {
        matches!(self.kind, FuuroKind::Minkan | FuuroKind::Ankan)
    }

    /// The physical tiles of the set, 4 for kans.
    #[must_use]
    pub fn tiles(self) -> ArrayVec<[Tile; 4]> {
        let mut ret = ArrayVec::new();
        match self.kind {
            FuuroKind::Chi => {
                let id = self.tile.as_u8();
                ret.extend((id..id + 3).map(|t| must_tile!(t)));
            }
            FuuroKind::Pon => ret.extend([self.tile; 3]),
            FuuroKind::Minkan | FuuroKind::Ankan => ret.extend([self.tile; 4]),
        }
        ret
    }

    fn parse(s: &str, is_ankan: bool) -> Result<Self> {
        let tiles = parse_tiles(s)?;
        let first = *tiles.first().context("empty set")?;
        let all_same = tiles.iter().all(|&t| t == first);
        let kind = match (is_ankan, tiles.len(), all_same) {
            (true, 4, true) => FuuroKind::Ankan,
            (true, ..) => bail!("an ankan needs 4 identical tiles, got {s:?}"),
            (false, 4, true) => FuuroKind::Minkan,
            (false, 3, true) => FuuroKind::Pon,
            (false, 3, false) => {
                let mut sorted = tiles;
                sorted.sort_unstable();
                let low = sorted[0];
                ensure!(
                    low.shift(1) == Some(sorted[1]) && low.shift(2) == Some(sorted[2]),
                    "{s:?} is neither a pon nor a chi",
                );
                return Self::new(FuuroKind::Chi, low);
            }
            _ => bail!("a called set needs 3 or 4 tiles, got {s:?}"),
        };
        Self::new(kind, first)
    }
}

impl Hand {
    #[must_use]
    pub fn new(tehai: [u8; 34], fuuro: &[Fuuro]) -> Self {
        Self {
            tehai,
            fuuro: fuuro.iter().copied().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn concealed_len(&self) -> usize {
        self.tehai.iter().map(|&c| c as usize).sum()
    }

    /// Concealed tiles plus 3 per exposed set.
    #[inline]
    #[must_use]
    pub fn effective_len(&self) -> usize {
        self.concealed_len() + 3 * self.fuuro.len()
    }

    pub fn ensure_len(&self, expected: usize) -> Result<(), HandError> {
        HandError::check(expected, self.effective_len())
    }

    /// Ankans do not break menzen.
    #[inline]
    #[must_use]
    pub fn is_menzen(&self) -> bool {
        self.fuuro.iter().all(|f| !f.is_open())
    }

    /// A copy with `tile` added to the concealed part.
    #[must_use]
    pub fn with_tile(&self, tile: Tile) -> Self {
        let mut ret = self.clone();
        ret.tehai[tile.as_usize()] += 1;
        ret
    }

    /// Every copy of a dora counts once per indicator pointing at it, so a
    /// doubled indicator doubles the count.
    #[must_use]
    pub fn count_doras(&self, indicators: &[Tile]) -> u8 {
        indicators
            .iter()
            .map(|ind| {
                let dora = ind.next();
                let in_fuuro = self
                    .fuuro
                    .iter()
                    .flat_map(|f| f.tiles())
                    .filter(|&t| t == dora)
                    .count() as u8;
                self.tehai[dora.as_usize()] + in_fuuro
            })
            .sum()
    }
}

/// Parses extended notation and also returns the last concealed tile as
/// written, which is usually the one just drawn or won.
pub fn parse_hand(s: &str) -> Result<(Hand, Option<Tile>)> {
    ensure!(s.is_ascii(), "hand {s} contains non-ascii content");

    let mut closed_tiles = vec![];
    let mut closed = String::new();
    let mut block: Option<(char, String)> = None;
    let mut fuuro = ArrayVec::<[Fuuro; 4]>::new();

    for c in s.chars() {
        match c {
            '[' | '(' => {
                ensure!(block.is_none(), "nested brackets in {s:?}");
                closed_tiles.extend(parse_tiles(&closed)?);
                closed.clear();
                block = Some((c, String::new()));
            }
            ']' | ')' => {
                let Some((open, inner)) = block.take() else {
                    bail!("unexpected {c:?} in {s:?}");
                };
                let is_ankan = match (open, c) {
                    ('[', ']') => false,
                    ('(', ')') => true,
                    _ => bail!("mismatched {open:?} and {c:?} in {s:?}"),
                };
                let set = Fuuro::parse(&inner, is_ankan)
                    .with_context(|| format!("invalid set {open}{inner}{c}"))?;
                ensure!(
                    fuuro.try_push(set).is_none(),
                    "more than 4 exposed sets in {s:?}",
                );
            }
            _ => match &mut block {
                Some((_, inner)) => inner.push(c),
                None => closed.push(c),
            },
        }
    }
    ensure!(block.is_none(), "unclosed bracket in {s:?}");
    closed_tiles.extend(parse_tiles(&closed)?);

    let mut tehai = [0; 34];
    for tile in &closed_tiles {
        tehai[tile.as_usize()] += 1;
    }
    let mut all = tehai;
    for tile in fuuro.iter().flat_map(|f| f.tiles()) {
        all[tile.as_usize()] += 1;
    }
    if let Some((tid, _)) = all.iter().enumerate().find(|&(_, &c)| c > 4) {
        bail!("more than 4 copies of {} in {s:?}", must_tile!(tid));
    }

    Ok((Hand { tehai, fuuro }, closed_tiles.last().copied()))
}

/// Parse a tenhou representation of concealed tiles into a list of ordered
/// tiles. Brackets are not accepted here.
pub fn parse_tiles(s: &str) -> Result<Vec<Tile>> {
    ensure!(s.is_ascii(), "hand {s} contains non-ascii content");

    let mut tiles = vec![];
    let mut stack = vec![];

    for b in s.as_bytes() {
        match b {
            b'1'..=b'9' => stack.push(b - b'1'),
            b'm' | b'p' | b's' | b'z' => {
                let kind = match b {
                    b'm' => 0,
                    b'p' => 1,
                    b's' => 2,
                    _ => 3,
                };
                for n in stack.drain(..) {
                    ensure!(kind < 3 || n < 7, "there is no {}z", n + 1);
                    tiles.push(must_tile!(kind * 9 + n));
                }
            }
            _ if b.is_ascii_whitespace() => (),
            _ => bail!("unexpected byte {b}"),
        };
    }
    ensure!(stack.is_empty(), "digits without a suit at the end of {s:?}");

    Ok(tiles)
}

/// Spaces are allowed.
pub fn hand(s: &str) -> Result<[u8; 34]> {
    let mut ret = [0; 34];
    for tile in parse_tiles(s)? {
        ret[tile.as_usize()] += 1;
    }
    Ok(ret)
}

#[must_use]
pub fn tiles_to_string(tiles: &[u8; 34]) -> String {
    let suhai = tiles[..3 * 9]
        .chunks_exact(9)
        .zip(['m', 'p', 's'])
        .filter(|(chunk, _)| chunk.iter().any(|&c| c > 0))
        .map(|(chunk, suffix)| {
            let mut partial: String = chunk
                .iter()
                .enumerate()
                .map(|(num, &count)| (num + 1).to_string().repeat(count as usize))
                .collect();
            partial.push(suffix);
            partial
        })
        .collect::<Vec<_>>()
        .join(" ");

    let jihai: String = tiles[3 * 9..]
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(num, &count)| (num + 1).to_string().repeat(count as usize))
        .collect();

    match (suhai.is_empty(), jihai.is_empty()) {
        (_, true) => suhai,
        (true, false) => format!("{jihai}z"),
        (false, false) => format!("{suhai} {jihai}z"),
    }
}

impl FromStr for Hand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_hand(s).map(|(hand, _)| hand)
    }
}

impl fmt::Display for Fuuro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts = [0; 34];
        for t in self.tiles() {
            counts[t.as_usize()] += 1;
        }
        let inner = tiles_to_string(&counts);
        if self.is_open() {
            write!(f, "[{inner}]")
        } else {
            write!(f, "({inner})")
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tiles_to_string(&self.tehai))?;
        for fuuro in &self.fuuro {
            write!(f, " {fuuro}")?;
        }
        Ok(())
    }
}
