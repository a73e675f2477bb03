use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor};

use rand::{Rng, RngExt};

use crate::alphabet::{char_of_index, index_of_char};

/// A candidate set: a subset of `0..grid_size` colors packed into a 64-bit
/// word.
///
/// `1` at bit `c` means color `c` is still possible; `0` means it has been
/// eliminated. A solved cell is a singleton. An unconstrained cell carries
/// `full(grid_size)`. Every operation here is pure and O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pset(u64);

impl Pset {
    /// No candidates left. Also the cardinality-0 sentinel for an
    /// inconsistent cell.
    pub const EMPTY: Self = Self(0);

    /// All colors `0..n` as candidates. `n` must be one of the allowed grid
    /// sizes (`<= 64`); larger values would overflow the 64-bit word.
    #[must_use]
    pub const fn full(n: usize) -> Self {
        debug_assert!(n <= 64);
        if n == 64 {
            Self(u64::MAX)
        } else {
            Self((1u64 << n) - 1)
        }
    }

    /// The singleton set containing exactly `color`.
    #[must_use]
    pub const fn of_color(color: u32) -> Self {
        Self(1u64 << color)
    }

    /// The candidate set named by `c`: a singleton for an alphabet
    /// character, `full(n)` for `_`, `EMPTY` for anything else.
    #[must_use]
    pub fn of_char(c: char, n: usize) -> Self {
        if c == crate::alphabet::BLANK {
            return Self::full(n);
        }
        match index_of_char(c) {
            Some(i) if i < n => Self::of_color(i as u32),
            _ => Self::EMPTY,
        }
    }

    /// Prints the colors of this set in ascending index order, or `_` if
    /// this is exactly `full(n)`.
    #[must_use]
    pub fn to_string(self, n: usize) -> String {
        if self == Self::full(n) {
            return crate::alphabet::BLANK.to_string();
        }
        self.colors()
            .filter_map(|c| char_of_index(c as usize))
            .collect()
    }

    /// Is `color` one of the remaining candidates?
    #[must_use]
    pub const fn contains(self, color: u32) -> bool {
        self.0 & (1 << color) != 0
    }

    /// Adds `color` to the set.
    #[must_use]
    pub const fn set(self, color: u32) -> Self {
        Self(self.0 | (1 << color))
    }

    /// Removes `color` from the set, if present.
    #[must_use]
    pub const fn discard(self, color: u32) -> Self {
        Self(self.0 & !(1 << color))
    }

    /// The complement of `self` within `full(n)`.
    #[must_use]
    pub const fn complement(self, n: usize) -> Self {
        Self(!self.0 & Self::full(n).0)
    }

    /// `self` with every bit of `other` cleared — `self & !other`, without
    /// needing to know `n`: clearing bits can never reintroduce a bit
    /// above `n` that wasn't already zero in `self`.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// `self ⊆ other`, i.e. `self | other == other`.
    #[must_use]
    pub const fn subset_of(self, other: Self) -> bool {
        (self.0 | other.0) == other.0
    }

    /// Exactly one candidate remains. `EMPTY.singleton()` is `false`.
    #[must_use]
    pub const fn singleton(self) -> bool {
        self.0 != 0 && (self.0 & self.0.wrapping_neg()) == self.0
    }

    /// Number of remaining candidates.
    #[must_use]
    pub const fn cardinality(self) -> u32 {
        self.0.count_ones()
    }

    /// The singleton set containing only the lowest-index candidate of
    /// `self`. `EMPTY.leftmost()` is `EMPTY`.
    #[must_use]
    pub const fn leftmost(self) -> Self {
        Self(self.0 & self.0.wrapping_neg())
    }

    /// The color of this set, if it is a singleton.
    #[must_use]
    pub const fn color(self) -> Option<u32> {
        if self.singleton() {
            Some(self.0.trailing_zeros())
        } else {
            None
        }
    }

    /// Iterates the candidate colors in ascending order.
    pub fn colors(self) -> impl Iterator<Item = u32> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let color = bits.trailing_zeros();
            bits &= bits - 1;
            Some(color)
        })
    }

    /// Picks one candidate uniformly at random, or `None` if `self` is
    /// empty.
    #[must_use]
    pub fn choose(self, rng: &mut impl Rng) -> Option<u32> {
        let n = self.cardinality();
        if n == 0 {
            return None;
        }
        let skip = rng.random_range(0..n);
        self.colors().nth(skip as usize)
    }
}

impl BitOr for Pset {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Pset {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Pset {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitXor for Pset {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn full_and_empty_cardinality() {
        for &n in &crate::alphabet::ALLOWED_SIZES {
            assert_eq!(Pset::full(n).cardinality(), n as u32);
            assert_eq!(Pset::EMPTY.cardinality(), 0);
        }
    }

    #[test]
    fn empty_is_never_a_singleton() {
        assert!(!Pset::EMPTY.singleton());
        assert_eq!(Pset::EMPTY.leftmost(), Pset::EMPTY);
    }

    #[test]
    fn round_trip_through_the_alphabet() {
        for &n in &crate::alphabet::ALLOWED_SIZES {
            for c in crate::alphabet::ALPHABET.iter().take(n).copied() {
                assert_eq!(Pset::of_char(c, n).to_string(n), c.to_string());
            }
        }
    }

    proptest! {
        #[test]
        fn singleton_iff_cardinality_one(n in prop::sample::select(crate::alphabet::ALLOWED_SIZES.to_vec()), bits in any::<u64>()) {
            let s = Pset(bits & Pset::full(n).0);
            prop_assert_eq!(s.singleton(), s.cardinality() == 1);
        }

        #[test]
        fn subset_law(n in prop::sample::select(crate::alphabet::ALLOWED_SIZES.to_vec()), a in any::<u64>(), b in any::<u64>()) {
            let mask = Pset::full(n).0;
            let a = Pset(a & mask);
            let b = Pset(b & mask);
            prop_assert_eq!(a.subset_of(b), (a | b) == b);
        }

        #[test]
        fn leftmost_is_a_subset_singleton(n in prop::sample::select(crate::alphabet::ALLOWED_SIZES.to_vec()), bits in any::<u64>()) {
            let s = Pset(bits & Pset::full(n).0);
            let left = s.leftmost();
            if s != Pset::EMPTY {
                prop_assert!(left.singleton());
                prop_assert!(left.subset_of(s));
                prop_assert_eq!(s.without(left).cardinality() + 1, s.cardinality());
            } else {
                prop_assert_eq!(left, Pset::EMPTY);
            }
        }
    }
}
