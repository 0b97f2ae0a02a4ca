//! Payments from fu and han.
use serde::Serialize;

/// Payments for a win. For an oya tsumo every ko pays `tsumo_ko` and
/// `tsumo_oya` is 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub ron: i32,
    pub tsumo_oya: i32,
    pub tsumo_ko: i32,
}

#[inline]
const fn ceil_100(v: i32) -> i32 {
    (v + 99) / 100 * 100
}

impl Point {
    /// Without kiriage mangan. 13 han and above is kazoe yakuman, 26 and
    /// above a double one.
    #[must_use]
    pub const fn calc(is_oya: bool, fu: u8, han: u8) -> Self {
        let base = match han {
            0..=4 => {
                let base = fu as i32 * (1 << (han + 2));
                if base > 2000 { 2000 } else { base }
            }
            5 => 2000,
            6 | 7 => 3000,
            8..=10 => 4000,
            11 | 12 => 6000,
            13..=25 => 8000,
            _ => 16000,
        };
        Self::from_base(is_oya, base)
    }

    /// `n` is the number of yakuman, counting double yakuman as 2.
    #[must_use]
    pub const fn yakuman(is_oya: bool, n: i32) -> Self {
        Self::from_base(is_oya, 8000 * n)
    }

    const fn from_base(is_oya: bool, base: i32) -> Self {
        if is_oya {
            Self {
                ron: ceil_100(base * 6),
                tsumo_oya: 0,
                tsumo_ko: ceil_100(base * 2),
            }
        } else {
            Self {
                ron: ceil_100(base * 4),
                tsumo_oya: ceil_100(base * 2),
                tsumo_ko: ceil_100(base),
            }
        }
    }

    /// What the winner collects.
    #[inline]
    #[must_use]
    pub const fn total(self, is_tsumo: bool, is_oya: bool) -> i32 {
        if is_tsumo {
            self.tsumo_total(is_oya)
        } else {
            self.ron
        }
    }

    #[inline]
    #[must_use]
    pub const fn tsumo_total(self, is_oya: bool) -> i32 {
        if is_oya {
            self.tsumo_ko * 3
        } else {
            self.tsumo_oya + self.tsumo_ko * 2
        }
    }
}
