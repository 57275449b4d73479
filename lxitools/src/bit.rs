//! Bit and bit-field helpers for the words of a telemetry frame

use std::ops::{BitAndAssign, BitOrAssign};
use num_traits::{PrimInt, Unsigned};

/// Bit 31 of the second frame word marks a housekeeping frame
pub const HK_TYPE_BIT: usize = 31;
/// Bit 30 of the second frame word marks a commanded event
pub const COMMANDED_BIT: usize = 30;
/// Low 30 bits of the second frame word hold the timestamp in ms
pub const TIMESTAMP_MASK: u32 = 0x3fff_ffff;

/// Bitwise set/clear/change/check operations plus bit-field access
pub trait BitOps:
    PrimInt
    + BitAndAssign
    + BitOrAssign
    + Unsigned
{
    fn set(&mut self, b: usize);
    fn clear(&mut self, b: usize);
    fn change(&mut self, b: usize, x: bool);
    fn check(self, b: usize) -> bool;

    /// Extract `len` bits starting at bit `lo`
    #[inline]
    fn field(self, lo: usize, len: usize) -> Self {
        let mask = (Self::one() << len) - Self::one();
        (self >> lo) & mask
    }
}

impl BitOps for u16 {
    #[inline]
    fn set(&mut self, b: usize) {
        *self |= 1 << b;
    }

    #[inline]
    fn clear(&mut self, b: usize) {
        *self &= !(1 << b);
    }

    #[inline]
    fn change(&mut self, b: usize, x: bool) {
        *self = (*self & !(1 << b)) | ((x as u16) << b);
    }

    #[inline]
    fn check(self, b: usize) -> bool {
        return self >> b & 1 == 1;
    }
}

impl BitOps for u32 {
    #[inline]
    fn set(&mut self, b: usize) {
        *self |= 1 << b;
    }

    #[inline]
    fn clear(&mut self, b: usize) {
        *self &= !(1 << b);
    }

    #[inline]
    fn change(&mut self, b: usize, x: bool) {
        *self = (*self & !(1 << b)) | ((x as u32) << b);
    }

    #[inline]
    fn check(self, b: usize) -> bool {
        return self >> b & 1 == 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_ops() {
        // Exhaustively check all u16's
        for i in u16::MIN..=u16::MAX {
            for b in 0..16 {
                let mut x = i;
                let i_set = i | 1 << b;
                let i_clr = i & !(1 << b);

                assert_eq!(i.check(b), i >> b & 1 == 1);
                x.set(b);
                assert_eq!(x, i_set);
                x.clear(b);
                assert_eq!(x, i_clr);
                x.change(b, true);
                assert_eq!(x, i_set);
                x.change(b, false);
                assert_eq!(x, i_clr);
            }
        }
        // Check some interesting u32's
        for &i in [
            u32::MIN,
            1u32,
            1337u32,
            0x8000_0005,
            u32::MAX
        ].iter() {
            for b in 0..32 {
                let mut x = i;
                let i_set = i | 1 << b;
                let i_clr = i & !(1 << b);

                assert_eq!(i.check(b), i >> b & 1 == 1);
                x.set(b);
                assert_eq!(x, i_set);
                x.clear(b);
                assert_eq!(x, i_clr);
                x.change(b, true);
                assert_eq!(x, i_set);
                x.change(b, false);
                assert_eq!(x, i_clr);
            }
        }
    }

    #[test]
    fn fields() {
        let w: u16 = 0xa123;
        assert_eq!(w.field(12, 4), 0xa);
        assert_eq!(w.field(0, 12), 0x123);
        let w: u32 = 0xc000_0005;
        assert_eq!(w.field(0, 30), 5);
        assert_eq!(w.field(0, 30), w & TIMESTAMP_MASK);
        assert!(w.check(HK_TYPE_BIT));
        assert!(w.check(COMMANDED_BIT));
    }
}
