//! # Reductions
//!
//! Horizontal folds over vector lanes and the boolean reductions over
//! masks. Folds are left-associated over the scalar reference kernels,
//! which pins the result for the non-associative float cases.

use crate::backend;
use crate::element::{SimdElement, SimdInt};
use crate::lanes::{LaneCount, SupportedLaneCount};
use crate::mask::Mask;
use crate::vector::Simd;

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Left fold of all lanes with `op`.
    #[inline]
    pub fn reduce(self, op: impl Fn(T, T) -> T) -> T {
        let mut acc = self.0[0];
        for i in 1..N {
            acc = op(acc, self.0[i]);
        }
        acc
    }

    #[inline]
    pub fn reduce_sum(self) -> T {
        self.reduce(T::add)
    }

    #[inline]
    pub fn reduce_product(self) -> T {
        self.reduce(T::mul)
    }

    #[inline]
    pub fn reduce_min(self) -> T {
        self.reduce(T::min)
    }

    #[inline]
    pub fn reduce_max(self) -> T {
        self.reduce(T::max)
    }
}

impl<T: SimdInt, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    #[inline]
    pub fn reduce_and(self) -> T {
        self.reduce(T::bitand)
    }

    #[inline]
    pub fn reduce_or(self) -> T {
        self.reduce(T::bitor)
    }

    #[inline]
    pub fn reduce_xor(self) -> T {
        self.reduce(T::bitxor)
    }
}

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    // Boolean reductions go through the packed form; compaction is the
    // accelerated kernel where one exists.

    #[inline]
    pub fn any(self) -> bool {
        backend::mask_bits(&self.0) != 0
    }

    #[inline]
    pub fn all(self) -> bool {
        backend::mask_bits(&self.0) == u64::MAX >> (64 - N)
    }

    #[inline]
    pub fn none(self) -> bool {
        !self.any()
    }

    /// Number of set lanes.
    #[inline]
    pub fn count(self) -> usize {
        backend::mask_bits(&self.0).count_ones() as usize
    }

    /// Lowest set lane index, `None` when no lane is set.
    #[inline]
    pub fn first_set(self) -> Option<usize> {
        let bits = backend::mask_bits(&self.0);
        if bits == 0 {
            None
        } else {
            Some(bits.trailing_zeros() as usize)
        }
    }

    /// Highest set lane index, `None` when no lane is set.
    #[inline]
    pub fn last_set(self) -> Option<usize> {
        let bits = backend::mask_bits(&self.0);
        if bits == 0 {
            None
        } else {
            Some(63 - bits.leading_zeros() as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iota_folds() {
        let v = Simd::<i32, 7>::iota();
        assert_eq!(v.reduce_sum(), 21);
        assert_eq!(v.reduce_min(), 0);
        assert_eq!(v.reduce_max(), 6);
        assert_eq!(v.reduce(|a, b| a + b), 21);
    }

    #[test]
    fn float_sum_is_left_associated() {
        let v = Simd::<f32, 3>::from_array([1.0e8, 1.0, -1.0e8]);
        // (1e8 + 1) loses the 1 in f32 before -1e8 cancels.
        assert_eq!(v.reduce_sum(), 0.0);
    }

    #[test]
    fn bitwise_folds() {
        let v = Simd::<u8, 4>::from_array([0b1100, 0b1010, 0b1001, 0b1111]);
        assert_eq!(v.reduce_and(), 0b1000);
        assert_eq!(v.reduce_or(), 0b1111);
        // Every bit appears an even number of times across the lanes.
        assert_eq!(v.reduce_xor(), 0b0000);
        assert_eq!(
            Simd::<u8, 3>::from_array([0b1100, 0b1010, 0b1001]).reduce_xor(),
            0b1111
        );
    }

    #[test]
    fn mask_index_reductions() {
        let m = Mask::<i32, 7>::from_array([false, true, false, true, true, false, false]);
        assert!(m.any());
        assert!(!m.all());
        assert!(!m.none());
        assert_eq!(m.count(), 3);
        assert_eq!(m.first_set(), Some(1));
        assert_eq!(m.last_set(), Some(4));

        let empty = Mask::<i32, 7>::splat(false);
        assert_eq!(empty.first_set(), None);
        assert_eq!(empty.last_set(), None);
        assert!(empty.none());

        assert!(Mask::<u8, 64>::splat(true).all());
    }
}
