//! Row state words: one bit per column, 1 = pressed.

use core::fmt::Debug;
use core::ops::{BitAnd, BitOr, Not};

/// Fixed-width bitset holding the state of one matrix row.
pub trait RowWord:
    Copy + Eq + Default + Debug + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
    /// Width of the word in bits.
    const BITS: usize;
    /// All keys released.
    const ZERO: Self;

    /// Word with the lowest `cols` bits set.
    fn mask(cols: usize) -> Self;

    /// Word with only bit `col` set.
    fn bit(col: usize) -> Self;

    /// Widen an 8-bit register value.
    fn from_u8(value: u8) -> Self;

    /// Number of pressed keys in the row.
    fn count_ones(self) -> u8;

    /// No ghost is possible in a row with fewer than two keys down.
    fn at_most_one(self) -> bool;

    fn is_set(self, col: usize) -> bool {
        self & Self::bit(col) != Self::ZERO
    }
}

macro_rules! impl_row_word {
    ($($t:ty),*) => {
        $(
            impl RowWord for $t {
                const BITS: usize = <$t>::BITS as usize;
                const ZERO: Self = 0;

                fn mask(cols: usize) -> Self {
                    if cols >= <Self as RowWord>::BITS {
                        <$t>::MAX
                    } else {
                        (1 << cols) - 1
                    }
                }

                fn bit(col: usize) -> Self {
                    1 << col
                }

                fn from_u8(value: u8) -> Self {
                    value.into()
                }

                fn count_ones(self) -> u8 {
                    <$t>::count_ones(self) as u8
                }

                fn at_most_one(self) -> bool {
                    self.wrapping_sub(1) & self == 0
                }
            }
        )*
    };
}

impl_row_word!(u8, u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(<u8 as RowWord>::mask(0), 0);
        assert_eq!(<u8 as RowWord>::mask(5), 0b1_1111);
        assert_eq!(<u8 as RowWord>::mask(8), 0xFF);
        assert_eq!(<u16 as RowWord>::mask(12), 0x0FFF);
        assert_eq!(<u16 as RowWord>::mask(16), 0xFFFF);
        // Widths past the word saturate instead of overflowing the shift
        assert_eq!(<u8 as RowWord>::mask(9), 0xFF);
        assert_eq!(<u16 as RowWord>::mask(17), 0xFFFF);
        assert_eq!(<u8 as RowWord>::BITS, 8usize);
        assert_eq!(<u16 as RowWord>::BITS, 16usize);
    }

    #[test]
    fn test_at_most_one() {
        assert!(RowWord::at_most_one(0u8));
        assert!(RowWord::at_most_one(0b0100_0000u8));
        assert!(RowWord::at_most_one(0x8000u16));
        assert!(!RowWord::at_most_one(0b0000_0011u8));
        assert!(!RowWord::at_most_one(0x8001u16));
    }

    #[test]
    fn test_is_set_and_count() {
        let word: u16 = 0b1000_0000_0000_1001;
        assert!(word.is_set(0));
        assert!(!word.is_set(1));
        assert!(word.is_set(15));
        assert_eq!(RowWord::count_ones(word), 3);
        assert_eq!(<u16 as RowWord>::from_u8(0xA5), 0x00A5);
    }
}
