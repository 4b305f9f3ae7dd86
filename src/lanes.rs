//! # Lane-Count Bounds
//!
//! `LaneCount<N>` is the type-level token for a logical vector width, and
//! `SupportedLaneCount` is the sealed capability that admits it. Widths
//! 1..=64 are supported; everything else, including the degenerate width
//! 0, simply has no impl and is therefore rejected at compile time.
//!
//! The associated `BitMask` type is the smallest unsigned integer with at
//! least one bit per lane, used as the packed form of a mask.

/// Type-level token for a vector of `N` lanes.
pub struct LaneCount<const N: usize>;

/// Admits a lane count into the engine.
///
/// Implemented for 1..=64. A width outside that range cannot name a
/// usable vector or mask type at all.
pub trait SupportedLaneCount: sealed::Sealed {
    /// Smallest unsigned integer with one bit per lane.
    type BitMask: MaskBits;
}

mod sealed {
    pub trait Sealed {}
}

/// Packed mask integer: one bit per lane, lane 0 in the least significant
/// bit. Algebra is done in `u64` space and truncated on the way back in.
pub trait MaskBits: Copy + PartialEq + Eq + core::fmt::Debug + 'static {
    const ZERO: Self;

    /// Truncating conversion from a 64-bit working value.
    fn from_u64(bits: u64) -> Self;

    /// Widening conversion to the 64-bit working value.
    fn to_u64(self) -> u64;
}

macro_rules! impl_mask_bits {
    ($($ty:ty),+) => {
        $(
            impl MaskBits for $ty {
                const ZERO: Self = 0;

                #[inline(always)]
                fn from_u64(bits: u64) -> Self {
                    bits as $ty
                }

                #[inline(always)]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )+
    };
}

impl_mask_bits! { u8, u16, u32, u64 }

macro_rules! impl_lane_count {
    ($bits:ty: $($n:literal)+) => {
        $(
            impl sealed::Sealed for LaneCount<$n> {}

            impl SupportedLaneCount for LaneCount<$n> {
                type BitMask = $bits;
            }
        )+
    };
}

impl_lane_count! { u8: 1 2 3 4 5 6 7 8 }
impl_lane_count! { u16: 9 10 11 12 13 14 15 16 }
impl_lane_count! { u32: 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32 }
impl_lane_count! { u64: 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48
                        49 50 51 52 53 54 55 56 57 58 59 60 61 62 63 64 }
