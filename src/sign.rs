//! Sign parameterization shared by the up-tree and down-tree.
//!
//! The original datastructure is a non-type template parameter `int sign`
//! (`+1` or `-1`). Rust doesn't have a clean analogue for that, so instead we
//! use a small capability trait implemented by two zero-sized marker types.
//! The tree, node and construction code are generic over `S: Sign` and pay no
//! runtime cost for it.

use std::cmp::Ordering;

/// Orientation capability for a banana tree. `Up` tracks sublevel-set
/// persistence (maxima are internal nodes, minima are leaves); `Down` tracks
/// superlevel-set persistence with the comparisons flipped.
pub trait Sign: Copy + Eq + std::fmt::Debug + 'static {
    /// `+1` for the up-tree, `-1` for the down-tree.
    const SIGN: i8;

    /// `sign * +infinity`: the value assigned to the special root.
    #[inline]
    fn infinity() -> f64 {
        Self::SIGN as f64 * f64::INFINITY
    }

    /// Strict "is `a` more extreme than `b`" comparison, oriented by sign.
    /// For the up-tree this is `a > b`; for the down-tree, `a < b`.
    #[inline]
    fn more_extreme(a: f64, b: f64) -> bool {
        match Self::SIGN {
            1 => a > b,
            -1 => a < b,
            _ => unreachable!("Sign::SIGN must be +1 or -1"),
        }
    }

    #[inline]
    fn cmp(a: f64, b: f64) -> Ordering {
        if Self::more_extreme(a, b) {
            Ordering::Greater
        } else if Self::more_extreme(b, a) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// The representable value closest to `t` in the direction *away from*
    /// the sign (used for hook values): `next_smaller` for the up-tree,
    /// `next_larger` for the down-tree.
    #[inline]
    fn tiniest_offset_away(t: f64) -> f64 {
        match Self::SIGN {
            1 => next_smaller(t),
            -1 => next_larger(t),
            _ => unreachable!("Sign::SIGN must be +1 or -1"),
        }
    }
}

#[inline]
pub fn next_larger(t: f64) -> f64 {
    f64::next_up(t)
}

#[inline]
pub fn next_smaller(t: f64) -> f64 {
    f64::next_down(t)
}

/// Sublevel-set persistence (sign `+1`).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Up;

/// Superlevel-set persistence (sign `-1`).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Down;

impl Sign for Up {
    const SIGN: i8 = 1;
}

impl Sign for Down {
    const SIGN: i8 = -1;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn up_orients_toward_larger_values() {
        assert!(Up::more_extreme(2.0, 1.0));
        assert!(!Up::more_extreme(1.0, 2.0));
        assert_eq!(Up::infinity(), f64::INFINITY);
    }

    #[test]
    fn down_orients_toward_smaller_values() {
        assert!(Down::more_extreme(1.0, 2.0));
        assert!(!Down::more_extreme(2.0, 1.0));
        assert_eq!(Down::infinity(), f64::NEG_INFINITY);
    }

    #[test]
    fn tiniest_offset_moves_away_from_sign() {
        assert!(Up::tiniest_offset_away(1.0) < 1.0);
        assert!(Down::tiniest_offset_away(1.0) > 1.0);
    }
}
