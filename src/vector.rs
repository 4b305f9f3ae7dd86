//! # Vector Type
//!
//! `Simd<T, N>` is a fixed-width pack of `N` lanes of element type `T`.
//! The logical value is always the `N`-lane array; the deduced storage
//! recipe (`Simd::<T, N>::abi()`) describes how the target composes that
//! value out of registers, including any padded tail lanes that exist
//! only in storage and are never read.
//!
//! Lane-wise operations route through the backend dispatch seam, so the
//! accelerated kernels and the portable reference loops are
//! interchangeable by construction.

use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Index, IndexMut, Mul, Neg, Not, Shl, Shr, Sub};

use crate::abi::{self, AbiTag};
use crate::backend::{self, portable};
use crate::capability::Capabilities;
use crate::catalog::ElemClass;
use crate::element::{LaneCast, SimdElement, SimdInt, SimdSigned};
use crate::lanes::{LaneCount, SupportedLaneCount};
use crate::mask::Mask;

/// A pack of `N` lanes of `T`.
///
/// `N` must be in `1..=64`; other widths have no [`SupportedLaneCount`]
/// impl and are rejected at compile time:
///
/// ```compile_fail
/// let v = lanewise::Simd::<f32, 0>::splat(1.0);
/// ```
///
/// ```compile_fail
/// let v = lanewise::Simd::<f32, 65>::splat(1.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct Simd<T: SimdElement, const N: usize>(pub(crate) [T; N])
where
    LaneCount<N>: SupportedLaneCount;

// ============================================================================
// Construction
// ============================================================================

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Number of lanes.
    pub const LANES: usize = N;

    /// All lanes set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self([value; N])
    }

    /// Lane `i` set to `f(i)`.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self(core::array::from_fn(f))
    }

    /// Lane `i` set to the element value of `i`: `[0, 1, 2, ...]`.
    #[inline]
    pub fn iota() -> Self {
        Self::from_fn(T::from_lane_index)
    }

    #[inline(always)]
    pub fn from_array(lanes: [T; N]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.0
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    #[inline(always)]
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.0
    }
}

// ============================================================================
// Loads and stores
// ============================================================================

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Loads the first `N` elements of `slice`.
    ///
    /// Panics when `slice` has fewer than `N` elements.
    #[inline]
    pub fn from_slice(slice: &[T]) -> Self {
        assert!(slice.len() >= N, "load of {N} lanes from {} elements", slice.len());
        Self::from_fn(|i| slice[i])
    }

    /// Loads the first `N` elements of `slice`, asserting that the
    /// pointer satisfies the deduced storage alignment.
    #[inline]
    pub fn from_slice_aligned(slice: &[T]) -> Self {
        let align = Self::abi().align();
        assert!(
            slice.as_ptr() as usize % align == 0,
            "load requires {align}-byte alignment"
        );
        Self::from_slice(slice)
    }

    /// Converting load: reads `N` elements of `U` and casts each lane.
    #[inline]
    pub fn from_slice_cast<U>(slice: &[U]) -> Self
    where
        U: SimdElement + LaneCast<T>,
    {
        assert!(slice.len() >= N, "load of {N} lanes from {} elements", slice.len());
        Self::from_fn(|i| slice[i].cast())
    }

    /// Masked load: set lanes read `slice`, clear lanes take `or`.
    #[inline]
    pub fn load_select(slice: &[T], mask: Mask<T, N>, or: Self) -> Self {
        assert!(slice.len() >= N, "load of {N} lanes from {} elements", slice.len());
        Self::from_fn(|i| if mask.test(i) { slice[i] } else { or.0[i] })
    }

    /// Stores all lanes to the front of `out`.
    ///
    /// Panics when `out` has fewer than `N` elements.
    #[inline]
    pub fn write_to_slice(self, out: &mut [T]) {
        assert!(out.len() >= N, "store of {N} lanes into {} elements", out.len());
        out[..N].copy_from_slice(&self.0);
    }

    /// Stores all lanes, asserting that the pointer satisfies the
    /// deduced storage alignment.
    #[inline]
    pub fn write_to_slice_aligned(self, out: &mut [T]) {
        let align = Self::abi().align();
        assert!(
            out.as_ptr() as usize % align == 0,
            "store requires {align}-byte alignment"
        );
        self.write_to_slice(out);
    }

    /// Converting store: casts each lane to `U` on the way out.
    #[inline]
    pub fn write_to_slice_cast<U>(self, out: &mut [U])
    where
        U: SimdElement,
        T: LaneCast<U>,
    {
        assert!(out.len() >= N, "store of {N} lanes into {} elements", out.len());
        for i in 0..N {
            out[i] = self.0[i].cast();
        }
    }

    /// Masked store: only set lanes are written.
    #[inline]
    pub fn store_select(self, out: &mut [T], mask: Mask<T, N>) {
        assert!(out.len() >= N, "store of {N} lanes into {} elements", out.len());
        for i in 0..N {
            if mask.test(i) {
                out[i] = self.0[i];
            }
        }
    }
}

// ============================================================================
// Lane access
// ============================================================================

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Lane `I`, checked at compile time.
    #[inline(always)]
    pub fn extract_lane<const I: usize>(self) -> T {
        const { assert!(I < N, "lane index out of range") }
        self.0[I]
    }

    /// Lane `i`. Panics when `i >= N`.
    #[inline(always)]
    pub fn lane(self, i: usize) -> T {
        self.0[i]
    }

    /// Copy with lane `I` replaced, checked at compile time.
    #[inline(always)]
    pub fn replace_lane<const I: usize>(mut self, value: T) -> Self {
        const { assert!(I < N, "lane index out of range") }
        self.0[I] = value;
        self
    }
}

impl<T: SimdElement, const N: usize> Index<usize> for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    type Output = T;

    #[inline(always)]
    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T: SimdElement, const N: usize> IndexMut<usize> for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

// ============================================================================
// Storage recipe
// ============================================================================

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// The storage recipe deduced for this vector on the build target.
    #[inline]
    pub fn abi() -> AbiTag {
        Self::abi_for(Capabilities::get())
    }

    /// The storage recipe under an explicit capability set.
    #[inline]
    pub fn abi_for(caps: Capabilities) -> AbiTag {
        abi::deduce(ElemClass::of::<T>(), N, caps)
    }
}

// ============================================================================
// Conversion
// ============================================================================

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Lane-wise conversion to another element type, `as`-cast
    /// semantics per lane.
    #[inline]
    pub fn cast<U>(self) -> Simd<U, N>
    where
        U: SimdElement,
        T: LaneCast<U>,
    {
        Simd::from_fn(|i| self.0[i].cast())
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

macro_rules! impl_dispatched_binop {
    ($($trait:ident, $method:ident => $kernel:ident;)+) => {
        $(
            impl<T: SimdElement, const N: usize> $trait for Simd<T, N>
            where
                LaneCount<N>: SupportedLaneCount,
            {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    let mut out = [T::ZERO; N];
                    backend::$kernel(&self.0, &rhs.0, &mut out);
                    Self(out)
                }
            }
        )+
    };
}

impl_dispatched_binop! {
    Add, add => add;
    Sub, sub => sub;
    Mul, mul => mul;
    Div, div => div;
}

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Lane-wise minimum.
    #[inline(always)]
    pub fn simd_min(self, rhs: Self) -> Self {
        let mut out = [T::ZERO; N];
        backend::min(&self.0, &rhs.0, &mut out);
        Self(out)
    }

    /// Lane-wise maximum.
    #[inline(always)]
    pub fn simd_max(self, rhs: Self) -> Self {
        let mut out = [T::ZERO; N];
        backend::max(&self.0, &rhs.0, &mut out);
        Self(out)
    }
}

impl<T: SimdSigned, const N: usize> Neg for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        let mut out = [T::ZERO; N];
        portable::map(&self.0, &mut out, T::neg);
        Self(out)
    }
}

// ============================================================================
// Bitwise and shifts (integer elements)
// ============================================================================

macro_rules! impl_bitwise_binop {
    ($($trait:ident, $method:ident => $kernel:ident;)+) => {
        $(
            impl<T: SimdInt, const N: usize> $trait for Simd<T, N>
            where
                LaneCount<N>: SupportedLaneCount,
            {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    let mut out = [T::ZERO; N];
                    portable::zip(&self.0, &rhs.0, &mut out, T::$kernel);
                    Self(out)
                }
            }
        )+
    };
}

impl_bitwise_binop! {
    BitAnd, bitand => bitand;
    BitOr, bitor => bitor;
    BitXor, bitxor => bitxor;
}

impl<T: SimdInt, const N: usize> Not for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        let mut out = [T::ZERO; N];
        portable::map(&self.0, &mut out, <T as SimdInt>::not);
        Self(out)
    }
}

impl<T: SimdInt, const N: usize> Shl<u32> for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    type Output = Self;

    #[inline(always)]
    fn shl(self, k: u32) -> Self {
        let mut out = [T::ZERO; N];
        portable::map(&self.0, &mut out, |a| T::shl(a, k));
        Self(out)
    }
}

impl<T: SimdInt, const N: usize> Shr<u32> for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    type Output = Self;

    #[inline(always)]
    fn shr(self, k: u32) -> Self {
        let mut out = [T::ZERO; N];
        portable::map(&self.0, &mut out, |a| T::shr(a, k));
        Self(out)
    }
}

// ============================================================================
// Comparisons
// ============================================================================

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    #[inline]
    pub fn simd_eq(self, rhs: Self) -> Mask<T, N> {
        Mask::from_fn(|i| self.0[i] == rhs.0[i])
    }

    #[inline]
    pub fn simd_ne(self, rhs: Self) -> Mask<T, N> {
        Mask::from_fn(|i| self.0[i] != rhs.0[i])
    }

    #[inline]
    pub fn simd_lt(self, rhs: Self) -> Mask<T, N> {
        Mask::from_fn(|i| self.0[i] < rhs.0[i])
    }

    #[inline]
    pub fn simd_le(self, rhs: Self) -> Mask<T, N> {
        Mask::from_fn(|i| self.0[i] <= rhs.0[i])
    }

    #[inline]
    pub fn simd_gt(self, rhs: Self) -> Mask<T, N> {
        Mask::from_fn(|i| self.0[i] > rhs.0[i])
    }

    #[inline]
    pub fn simd_ge(self, rhs: Self) -> Mask<T, N> {
        Mask::from_fn(|i| self.0[i] >= rhs.0[i])
    }
}

impl<T: SimdElement, const N: usize> Default for Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    #[inline]
    fn default() -> Self {
        Self::splat(T::ZERO)
    }
}
