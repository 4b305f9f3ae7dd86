//! # Mask Type
//!
//! `Mask<T, N>` is the lane-wise boolean companion of `Simd<T, N>`. The
//! stored form is always the lane vector (one same-width unsigned
//! integer per lane, canonically all-ones or all-zero) and the packed
//! bitmask form is reachable through the bijective `to_bits`/`from_bits`
//! pair, so every mask law holds independently of which form a target
//! prefers.
//!
//! [`MaskKind`] names the preferred operating representation per target:
//! `Bits` where the architecture has a dedicated mask register class,
//! `Vector` everywhere else.

use core::ops::{BitAnd, BitOr, BitXor, Not};

use crate::abi::{self, AbiTag};
use crate::backend::{self, portable};
use crate::capability::Capabilities;
use crate::catalog::ElemClass;
use crate::element::{MaskLane, SimdElement, SimdInt};
use crate::lanes::{LaneCount, MaskBits, SupportedLaneCount};
use crate::vector::Simd;

/// Preferred mask representation for a target.
#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize)]
pub enum MaskKind {
    /// One all-ones/all-zero lane per element, in vector registers.
    Vector,
    /// One bit per lane, in a dedicated mask register class.
    Bits,
}

impl MaskKind {
    /// The representation a target operates masks in, given the deduced
    /// storage recipe. `Bits` needs the dedicated mask register class,
    /// which only covers 1- and 2-byte lanes with its wide extension,
    /// and an actual vector part to compact; an all-scalar or
    /// degenerate recipe has nothing to put in a mask register.
    pub fn for_recipe(elem: ElemClass, tag: &AbiTag, caps: Capabilities) -> Self {
        let has_vector_part = tag.parts().iter().any(|p| p.capacity > 1);
        let mut required = Capabilities::AVX512F;
        if elem.bytes < 4 {
            required |= Capabilities::AVX512BW;
        }
        if has_vector_part && caps.contains(required) {
            MaskKind::Bits
        } else {
            MaskKind::Vector
        }
    }
}

/// Lane-wise boolean companion of [`Simd<T, N>`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct Mask<T: SimdElement, const N: usize>(pub(crate) [T::Bits; N])
where
    LaneCount<N>: SupportedLaneCount;

// ============================================================================
// Construction and lane access
// ============================================================================

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Number of lanes.
    pub const LANES: usize = N;

    /// All lanes set to `value`.
    #[inline(always)]
    pub fn splat(value: bool) -> Self {
        Self([T::Bits::from_bool(value); N])
    }

    /// Lane `i` set to `f(i)`.
    #[inline(always)]
    pub fn from_fn(mut f: impl FnMut(usize) -> bool) -> Self {
        Self(core::array::from_fn(|i| T::Bits::from_bool(f(i))))
    }

    #[inline]
    pub fn from_array(lanes: [bool; N]) -> Self {
        Self::from_fn(|i| lanes[i])
    }

    #[inline]
    pub fn to_array(self) -> [bool; N] {
        core::array::from_fn(|i| self.0[i].is_set())
    }

    /// Lane `i`. Panics when `i >= N`.
    #[inline(always)]
    pub fn test(self, i: usize) -> bool {
        self.0[i].is_set()
    }

    /// Lane `I`, checked at compile time.
    #[inline(always)]
    pub fn extract_lane<const I: usize>(self) -> bool {
        const { assert!(I < N, "lane index out of range") }
        self.0[I].is_set()
    }

    /// Sets lane `i`. Panics when `i >= N`.
    #[inline(always)]
    pub fn set(&mut self, i: usize, value: bool) {
        self.0[i] = T::Bits::from_bool(value);
    }
}

// ============================================================================
// Bool-slice loads and stores
// ============================================================================

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Loads the first `N` booleans of `slice`.
    ///
    /// Panics when `slice` has fewer than `N` elements.
    #[inline]
    pub fn from_bool_slice(slice: &[bool]) -> Self {
        assert!(slice.len() >= N, "load of {N} lanes from {} elements", slice.len());
        Self::from_fn(|i| slice[i])
    }

    /// Masked bool load: set lanes of `mask` read `slice`, clear lanes
    /// take `or`.
    #[inline]
    pub fn load_select(slice: &[bool], mask: Self, or: Self) -> Self {
        assert!(slice.len() >= N, "load of {N} lanes from {} elements", slice.len());
        Self::from_fn(|i| if mask.test(i) { slice[i] } else { or.test(i) })
    }

    /// Stores all lanes to the front of `out`.
    ///
    /// Panics when `out` has fewer than `N` elements.
    #[inline]
    pub fn write_to_bool_slice(self, out: &mut [bool]) {
        assert!(out.len() >= N, "store of {N} lanes into {} elements", out.len());
        for i in 0..N {
            out[i] = self.test(i);
        }
    }

    /// Masked bool store: only set lanes of `mask` are written.
    #[inline]
    pub fn store_select(self, out: &mut [bool], mask: Self) {
        assert!(out.len() >= N, "store of {N} lanes into {} elements", out.len());
        for i in 0..N {
            if mask.test(i) {
                out[i] = self.test(i);
            }
        }
    }
}

// ============================================================================
// Packed form
// ============================================================================

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Packs the mask to bits, lane 0 in the least significant bit.
    /// Bits at and above `N` are always zero.
    #[inline]
    pub fn to_bits(self) -> <LaneCount<N> as SupportedLaneCount>::BitMask {
        <LaneCount<N> as SupportedLaneCount>::BitMask::from_u64(backend::mask_bits(&self.0))
    }

    /// Expands packed bits to a mask. Bits at and above `N` are ignored.
    #[inline]
    pub fn from_bits(bits: <LaneCount<N> as SupportedLaneCount>::BitMask) -> Self {
        let mut lanes = [T::Bits::ZERO; N];
        backend::mask_from_bits(bits.to_u64(), &mut lanes);
        Self(lanes)
    }

    /// The storage recipe deduced for this mask on the build target.
    /// May differ from the data vector's recipe.
    #[inline]
    pub fn abi() -> AbiTag {
        Self::abi_for(Capabilities::get())
    }

    /// The mask storage recipe under an explicit capability set.
    #[inline]
    pub fn abi_for(caps: Capabilities) -> AbiTag {
        abi::deduce_for_mask(ElemClass::of::<T>(), N, caps)
    }

    /// The representation the build target operates this mask in.
    #[inline]
    pub fn kind() -> MaskKind {
        let caps = Capabilities::get();
        MaskKind::for_recipe(ElemClass::of::<T>(), &Self::abi_for(caps), caps)
    }
}

// ============================================================================
// Algebra
// ============================================================================

macro_rules! impl_mask_binop {
    ($($trait:ident, $method:ident => $kernel:ident;)+) => {
        $(
            impl<T: SimdElement, const N: usize> $trait for Mask<T, N>
            where
                LaneCount<N>: SupportedLaneCount,
            {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    let mut out = [T::Bits::ZERO; N];
                    portable::zip(&self.0, &rhs.0, &mut out, <T::Bits as MaskLane>::$kernel);
                    Self(out)
                }
            }
        )+
    };
}

impl_mask_binop! {
    BitAnd, bitand => and;
    BitOr, bitor => or;
    BitXor, bitxor => xor;
}

impl<T: SimdElement, const N: usize> Not for Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        let mut out = [T::Bits::ZERO; N];
        portable::map(&self.0, &mut out, <T::Bits as MaskLane>::not);
        Self(out)
    }
}

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    // Lane-wise relations on booleans, in their algebraic form
    // (false < true).

    #[inline]
    pub fn simd_eq(self, rhs: Self) -> Self {
        !(self ^ rhs)
    }

    #[inline]
    pub fn simd_ne(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline]
    pub fn simd_lt(self, rhs: Self) -> Self {
        !self & rhs
    }

    #[inline]
    pub fn simd_le(self, rhs: Self) -> Self {
        !self | rhs
    }

    #[inline]
    pub fn simd_gt(self, rhs: Self) -> Self {
        self & !rhs
    }

    #[inline]
    pub fn simd_ge(self, rhs: Self) -> Self {
        self | !rhs
    }
}

// ============================================================================
// Select and promotion
// ============================================================================

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// `if mask { t } else { f }`, per lane.
    #[inline]
    pub fn select(self, t: Simd<T, N>, f: Simd<T, N>) -> Simd<T, N> {
        let mut out = [T::ZERO; N];
        backend::select::<T>(&self.0, &t.0, &f.0, &mut out);
        Simd::from_array(out)
    }

    /// `if mask { t } else { f }` over masks.
    #[inline]
    pub fn select_mask(self, t: Self, f: Self) -> Self {
        (self & t) | (!self & f)
    }

    /// `if mask { t } else { f }` with scalar booleans. Degenerates to
    /// a broadcast, the mask itself, or its complement.
    #[inline]
    pub fn select_bool(self, t: bool, f: bool) -> Self {
        match (t, f) {
            (true, false) => self,
            (false, true) => !self,
            _ => Self::splat(t),
        }
    }
}

impl<T: SimdElement, const N: usize> Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
    T::Bits: SimdInt,
{
    /// Promotion to the companion integer vector, true ⇒ 1.
    #[inline]
    pub fn to_int(self) -> Simd<T::Bits, N> {
        Simd::from_fn(|i| {
            if self.test(i) {
                <T::Bits as SimdElement>::ONE
            } else {
                <T::Bits as SimdElement>::ZERO
            }
        })
    }

    /// Promotion with true ⇒ all-ones (`-1` read signed).
    #[inline]
    pub fn to_neg_int(self) -> Simd<T::Bits, N> {
        Simd::from_fn(|i| {
            if self.test(i) {
                <T::Bits as SimdInt>::ALL
            } else {
                <T::Bits as SimdElement>::ZERO
            }
        })
    }

    /// Promotion with every lane complemented: true ⇒ `!1`, false ⇒ `!0`.
    #[inline]
    pub fn to_not_int(self) -> Simd<T::Bits, N> {
        Simd::from_fn(|i| {
            <T::Bits as SimdInt>::not(if self.test(i) {
                <T::Bits as SimdElement>::ONE
            } else {
                <T::Bits as SimdElement>::ZERO
            })
        })
    }
}

impl<T: SimdElement, const N: usize> Default for Mask<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    #[inline]
    fn default() -> Self {
        Self::splat(false)
    }
}
