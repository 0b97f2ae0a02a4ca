//! The 34 tile kinds.
//!
//! Tiles are stored as a single `u8` index: `0..9` man, `9..18` pin, `18..27`
//! sou, followed by the winds E S W N and the dragons P F C. Red fives are not
//! modelled; callers that care about them should deaka before building a
//! [`Hand`](crate::hand::Hand).
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, Result, bail};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const MJAI_PAI_STRINGS: [&str; 34] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", // m
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", // p
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", // s
    "E", "S", "W", "N", "P", "F", "C", // z
];

/// 1m 9m 1p 9p 1s 9s and all honors, in index order.
pub const YAOKYUU: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Man,
    Pin,
    Sou,
    Jihai,
}

#[macro_export]
macro_rules! tu8 {
    (1m) => { 0_u8 };
    (2m) => { 1_u8 };
    (3m) => { 2_u8 };
    (4m) => { 3_u8 };
    (5m) => { 4_u8 };
    (6m) => { 5_u8 };
    (7m) => { 6_u8 };
    (8m) => { 7_u8 };
    (9m) => { 8_u8 };
    (1p) => { 9_u8 };
    (2p) => { 10_u8 };
    (3p) => { 11_u8 };
    (4p) => { 12_u8 };
    (5p) => { 13_u8 };
    (6p) => { 14_u8 };
    (7p) => { 15_u8 };
    (8p) => { 16_u8 };
    (9p) => { 17_u8 };
    (1s) => { 18_u8 };
    (2s) => { 19_u8 };
    (3s) => { 20_u8 };
    (4s) => { 21_u8 };
    (5s) => { 22_u8 };
    (6s) => { 23_u8 };
    (7s) => { 24_u8 };
    (8s) => { 25_u8 };
    (9s) => { 26_u8 };
    (E) => { 27_u8 };
    (S) => { 28_u8 };
    (W) => { 29_u8 };
    (N) => { 30_u8 };
    (P) => { 31_u8 };
    (F) => { 32_u8 };
    (C) => { 33_u8 };
}

#[macro_export]
macro_rules! tuz {
    ($s:tt) => {
        $crate::tu8!($s) as usize
    };
}

/// Panics if the id is not in `0..34`. Only use it on ids that are in range
/// by construction.
#[macro_export]
macro_rules! must_tile {
    ($id:expr) => {
        $crate::tile::Tile::try_from($id).expect("tile id out of range")
    };
}

#[macro_export]
macro_rules! t {
    ($s:tt) => {
        $crate::must_tile!($crate::tu8!($s))
    };
}

#[macro_export]
macro_rules! matches_tu8 {
    ($o:expr, $($s:tt)|+) => {
        matches!($o, $($crate::tu8!($s))|+)
    };
}

impl Tile {
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn suit(self) -> Suit {
        match self.0 / 9 {
            0 => Suit::Man,
            1 => Suit::Pin,
            2 => Suit::Sou,
            _ => Suit::Jihai,
        }
    }

    /// Rank in `1..=9` for suited tiles, `None` for honors.
    #[inline]
    #[must_use]
    pub const fn num(self) -> Option<u8> {
        if self.is_jihai() {
            None
        } else {
            Some(self.0 % 9 + 1)
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_jihai(self) -> bool {
        self.0 >= 3 * 9
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_jihai() && matches!(self.0 % 9, 0 | 8)
    }

    /// Terminal or honor.
    #[inline]
    #[must_use]
    pub const fn is_yaokyuu(self) -> bool {
        self.is_jihai() || self.is_terminal()
    }

    #[inline]
    #[must_use]
    pub const fn is_kazehai(self) -> bool {
        matches_tu8!(self.0, E | S | W | N)
    }

    #[inline]
    #[must_use]
    pub const fn is_sangenpai(self) -> bool {
        matches_tu8!(self.0, P | F | C)
    }

    /// The tile a dora indicator points at. Suits wrap 9 to 1, winds cycle
    /// E S W N, dragons cycle P F C.
    #[must_use]
    pub const fn next(self) -> Self {
        let id = match self.0 {
            8 | 17 | 26 => self.0 - 8,
            tu8!(N) => tu8!(E),
            tu8!(C) => tu8!(P),
            _ => self.0 + 1,
        };
        Self(id)
    }

    /// Inverse of [`Tile::next`].
    #[must_use]
    pub const fn prev(self) -> Self {
        let id = match self.0 {
            0 | 9 | 18 => self.0 + 8,
            tu8!(E) => tu8!(N),
            tu8!(P) => tu8!(C),
            _ => self.0 - 1,
        };
        Self(id)
    }

    /// The tile `offset` ranks above in the same suit, if any. Never wraps.
    #[must_use]
    pub const fn shift(self, offset: u8) -> Option<Self> {
        if self.is_jihai() || self.0 % 9 + offset > 8 {
            None
        } else {
            Some(Self(self.0 + offset))
        }
    }
}

impl TryFrom<u8> for Tile {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        if v >= 34 {
            bail!("tile id {v} is out of range [0, 34)");
        }
        Ok(Self(v))
    }
}

impl TryFrom<usize> for Tile {
    type Error = Error;

    fn try_from(v: usize) -> Result<Self> {
        u8::try_from(v)
            .map_err(Error::from)
            .and_then(Self::try_from)
    }
}

impl FromStr for Tile {
    type Err = Error;

    /// Accepts both mjai (`5m`, `E`) and tenhou (`1z`) spellings.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(idx) = MJAI_PAI_STRINGS.iter().position(|&p| p == s) {
            return Self::try_from(idx);
        }
        match s.as_bytes() {
            &[n @ b'1'..=b'7', b'z'] => Self::try_from(3 * 9 + n - b'1'),
            _ => bail!("invalid tile {s:?}"),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MJAI_PAI_STRINGS[self.as_usize()])
    }
}

impl Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(MJAI_PAI_STRINGS[self.as_usize()])
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dora_cycles() {
        assert_eq!(t!(1m).next(), t!(2m));
        assert_eq!(t!(9m).next(), t!(1m));
        assert_eq!(t!(9p).next(), t!(1p));
        assert_eq!(t!(9s).next(), t!(1s));
        assert_eq!(t!(N).next(), t!(E));
        assert_eq!(t!(E).next(), t!(S));
        assert_eq!(t!(C).next(), t!(P));
        assert_eq!(t!(F).next(), t!(C));
        for id in 0..34_u8 {
            let tile = must_tile!(id);
            assert_eq!(tile.next().prev(), tile);
        }
    }

    #[test]
    fn classification() {
        assert!(t!(1m).is_terminal());
        assert!(t!(9s).is_yaokyuu());
        assert!(!t!(5p).is_yaokyuu());
        assert!(t!(W).is_kazehai());
        assert!(t!(F).is_sangenpai());
        assert!(!t!(F).is_terminal());
        assert_eq!(t!(7p).num(), Some(7));
        assert_eq!(t!(C).num(), None);
        assert_eq!(t!(4s).suit(), Suit::Sou);
        assert_eq!(YAOKYUU.iter().filter(|&&id| must_tile!(id).is_yaokyuu()).count(), 13);
        assert_eq!((0..34_u8).filter(|&id| must_tile!(id).is_yaokyuu()).count(), 13);
    }

    #[test]
    fn shift_never_wraps() {
        assert_eq!(t!(7m).shift(2), Some(t!(9m)));
        assert_eq!(t!(8m).shift(2), None);
        assert_eq!(t!(9p).shift(1), None);
        assert_eq!(t!(E).shift(1), None);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("5m".parse::<Tile>().unwrap(), t!(5m));
        assert_eq!("1z".parse::<Tile>().unwrap(), t!(E));
        assert_eq!("7z".parse::<Tile>().unwrap(), t!(C));
        assert!("8z".parse::<Tile>().is_err());
        assert!("0m".parse::<Tile>().is_err());
        assert!(Tile::try_from(34_u8).is_err());
        assert_eq!(t!(P).to_string(), "P");

        let json = serde_json::to_string(&t!(3s)).unwrap();
        assert_eq!(json, r#""3s""#);
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t!(3s));
    }
}
