use std::error::Error;
use std::fmt;

/// Tile-count violations detected at the public entry points.
///
/// Both variants carry the effective count the operation needs and the one it
/// got, where every exposed set counts as 3 (quads included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandError {
    /// Not enough tiles yet.
    Undercount { expected: usize, actual: usize },
    /// Too many tiles, e.g. a duplicate draw.
    Overcount { expected: usize, actual: usize },
}

impl HandError {
    /// `Ok(())` iff `actual == expected`.
    pub const fn check(expected: usize, actual: usize) -> Result<(), Self> {
        if actual < expected {
            Err(Self::Undercount { expected, actual })
        } else if actual > expected {
            Err(Self::Overcount { expected, actual })
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undercount { expected, actual } => {
                write!(f, "too few tiles: expected {expected}, got {actual}")
            }
            Self::Overcount { expected, actual } => {
                write!(f, "too many tiles: expected {expected}, got {actual}")
            }
        }
    }
}

impl Error for HandError {}
