//! # Element Types
//!
//! The sealed classification of types that may appear in a vector lane:
//! fixed-width integers of 1/2/4/8 bytes and IEEE binary32/64 floats.
//! Each element type carries its scalar reference kernels (the portable
//! definitions every vector operation is held to) plus the same-width
//! unsigned `Bits` type used for mask lanes.
//!
//! The trait split mirrors the operation surface: `SimdElement` covers
//! what every lane type supports, `SimdInt` adds bitwise and shift
//! operations, `SimdSigned` adds negation.

use core::fmt::Debug;

/// A type usable as a vector lane.
///
/// Sealed: exactly the ten fixed-width arithmetic primitives implement
/// this. The scalar methods are the portable reference semantics
/// (wrapping arithmetic for integers, IEEE for floats).
pub trait SimdElement:
    Copy + PartialEq + PartialOrd + Debug + Default + Send + Sync + 'static + sealed::Sealed
{
    /// Unsigned integer of the same width, used for mask lanes.
    type Bits: MaskLane;

    /// Element width in bytes.
    const BYTES: usize;

    /// Whether this is a floating-point element class. ABI deduction
    /// treats float and integer elements differently on some targets.
    const IS_FLOAT: bool;

    const ZERO: Self;
    const ONE: Self;

    /// Lane index as an element value (for iota construction).
    fn from_lane_index(i: usize) -> Self;

    fn add(a: Self, b: Self) -> Self;
    fn sub(a: Self, b: Self) -> Self;
    fn mul(a: Self, b: Self) -> Self;

    /// Lane division. Integer division by zero panics (the portable
    /// path checks what the hardware path leaves undefined).
    fn div(a: Self, b: Self) -> Self;

    fn min(a: Self, b: Self) -> Self;
    fn max(a: Self, b: Self) -> Self;
}

/// Integer element: bitwise algebra and shifts.
pub trait SimdInt: SimdElement {
    /// All bits set (`-1` for signed types).
    const ALL: Self;

    fn bitand(a: Self, b: Self) -> Self;
    fn bitor(a: Self, b: Self) -> Self;
    fn bitxor(a: Self, b: Self) -> Self;
    fn not(a: Self) -> Self;

    /// Wrapping shift left (shift amount taken modulo the bit width).
    fn shl(a: Self, k: u32) -> Self;

    /// Wrapping shift right (arithmetic for signed types).
    fn shr(a: Self, k: u32) -> Self;
}

/// Element with a negation (signed integers and floats).
pub trait SimdSigned: SimdElement {
    fn neg(a: Self) -> Self;
}

/// One mask lane: an unsigned integer that is either all-ones or zero.
///
/// `bits_from_lanes` is the lane-to-bit compaction seam; the generic
/// default is the portable definition, and four-byte lanes route through
/// the hardware kernel in `backend`.
pub trait MaskLane: Copy + PartialEq + Eq + Debug + Default + Send + Sync + 'static {
    const ZERO: Self;
    const ALL: Self;
    const BYTES: usize;

    fn from_bool(b: bool) -> Self;
    fn is_set(self) -> bool;

    fn and(a: Self, b: Self) -> Self;
    fn or(a: Self, b: Self) -> Self;
    fn xor(a: Self, b: Self) -> Self;
    fn not(a: Self) -> Self;
}

macro_rules! impl_mask_lane {
    ($($ty:ty),+) => {
        $(
            impl MaskLane for $ty {
                const ZERO: Self = 0;
                const ALL: Self = !0;
                const BYTES: usize = core::mem::size_of::<$ty>();

                #[inline(always)]
                fn from_bool(b: bool) -> Self {
                    // Qualified: these types carry a second ALL through
                    // `SimdInt`.
                    if b { <Self as MaskLane>::ALL } else { 0 }
                }

                #[inline(always)]
                fn is_set(self) -> bool {
                    self != 0
                }

                #[inline(always)]
                fn and(a: Self, b: Self) -> Self {
                    a & b
                }

                #[inline(always)]
                fn or(a: Self, b: Self) -> Self {
                    a | b
                }

                #[inline(always)]
                fn xor(a: Self, b: Self) -> Self {
                    a ^ b
                }

                #[inline(always)]
                fn not(a: Self) -> Self {
                    !a
                }
            }
        )+
    };
}

impl_mask_lane! { u8, u16, u32, u64 }

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_int_element {
    ($($ty:ty => $bits:ty),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl SimdElement for $ty {
                type Bits = $bits;
                const BYTES: usize = core::mem::size_of::<$ty>();
                const IS_FLOAT: bool = false;
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline(always)]
                fn from_lane_index(i: usize) -> Self {
                    i as $ty
                }

                #[inline(always)]
                fn add(a: Self, b: Self) -> Self {
                    a.wrapping_add(b)
                }

                #[inline(always)]
                fn sub(a: Self, b: Self) -> Self {
                    a.wrapping_sub(b)
                }

                #[inline(always)]
                fn mul(a: Self, b: Self) -> Self {
                    a.wrapping_mul(b)
                }

                #[inline(always)]
                fn div(a: Self, b: Self) -> Self {
                    a.wrapping_div(b)
                }

                #[inline(always)]
                fn min(a: Self, b: Self) -> Self {
                    if b < a { b } else { a }
                }

                #[inline(always)]
                fn max(a: Self, b: Self) -> Self {
                    if a < b { b } else { a }
                }
            }

            impl SimdInt for $ty {
                const ALL: Self = !0;

                #[inline(always)]
                fn bitand(a: Self, b: Self) -> Self {
                    a & b
                }

                #[inline(always)]
                fn bitor(a: Self, b: Self) -> Self {
                    a | b
                }

                #[inline(always)]
                fn bitxor(a: Self, b: Self) -> Self {
                    a ^ b
                }

                #[inline(always)]
                fn not(a: Self) -> Self {
                    !a
                }

                #[inline(always)]
                fn shl(a: Self, k: u32) -> Self {
                    a.wrapping_shl(k)
                }

                #[inline(always)]
                fn shr(a: Self, k: u32) -> Self {
                    a.wrapping_shr(k)
                }
            }
        )+
    };
}

impl_int_element! {
    i8 => u8, i16 => u16, i32 => u32, i64 => u64,
    u8 => u8, u16 => u16, u32 => u32, u64 => u64,
}

macro_rules! impl_signed_int {
    ($($ty:ty),+) => {
        $(
            impl SimdSigned for $ty {
                #[inline(always)]
                fn neg(a: Self) -> Self {
                    a.wrapping_neg()
                }
            }
        )+
    };
}

impl_signed_int! { i8, i16, i32, i64 }

macro_rules! impl_float_element {
    ($($ty:ty => $bits:ty),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl SimdElement for $ty {
                type Bits = $bits;
                const BYTES: usize = core::mem::size_of::<$ty>();
                const IS_FLOAT: bool = true;
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                #[inline(always)]
                fn from_lane_index(i: usize) -> Self {
                    i as $ty
                }

                #[inline(always)]
                fn add(a: Self, b: Self) -> Self {
                    a + b
                }

                #[inline(always)]
                fn sub(a: Self, b: Self) -> Self {
                    a - b
                }

                #[inline(always)]
                fn mul(a: Self, b: Self) -> Self {
                    a * b
                }

                #[inline(always)]
                fn div(a: Self, b: Self) -> Self {
                    a / b
                }

                // First-operand-loses on NaN, matching the packed
                // min/max instructions the accelerated path uses.
                #[inline(always)]
                fn min(a: Self, b: Self) -> Self {
                    if a < b { a } else { b }
                }

                #[inline(always)]
                fn max(a: Self, b: Self) -> Self {
                    if a > b { a } else { b }
                }
            }

            impl SimdSigned for $ty {
                #[inline(always)]
                fn neg(a: Self) -> Self {
                    -a
                }
            }
        )+
    };
}

impl_float_element! { f32 => u32, f64 => u64 }

/// Lane conversion between element types, `as`-cast semantics
/// (truncation between integers, saturation float-to-int).
pub trait LaneCast<Dst: SimdElement>: SimdElement {
    fn cast(self) -> Dst;
}

macro_rules! impl_lane_cast {
    ($src:ty => $($dst:ty),+) => {
        $(
            impl LaneCast<$dst> for $src {
                #[inline(always)]
                fn cast(self) -> $dst {
                    self as $dst
                }
            }
        )+
    };
}

macro_rules! impl_lane_cast_grid {
    ($($src:ty),+) => {
        $(
            impl_lane_cast! { $src => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64 }
        )+
    };
}

impl_lane_cast_grid! { i8, i16, i32, i64, u8, u16, u32, u64, f32, f64 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_lanes_are_canonical() {
        // The unsigned types carry an ALL through both MaskLane and
        // SimdInt; from_bool must build the mask-lane one.
        assert_eq!(<u8 as MaskLane>::from_bool(true), 0xFF);
        assert_eq!(<u32 as MaskLane>::from_bool(true), u32::MAX);
        assert_eq!(<u64 as MaskLane>::from_bool(false), 0);
        assert!(<u16 as MaskLane>::from_bool(true).is_set());
        assert_eq!(<u8 as MaskLane>::ALL, <u8 as SimdInt>::ALL);
    }

    #[test]
    fn float_minmax_second_operand_wins_on_nan() {
        // Pinned to the packed-instruction semantics the accelerated
        // path produces.
        assert_eq!(<f32 as SimdElement>::min(f32::NAN, 1.0), 1.0);
        assert!(<f32 as SimdElement>::min(1.0, f32::NAN).is_nan());
        assert_eq!(<f32 as SimdElement>::max(f32::NAN, 1.0), 1.0);
        assert!(<f32 as SimdElement>::max(1.0, f32::NAN).is_nan());
    }
}
