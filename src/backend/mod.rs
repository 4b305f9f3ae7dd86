//! # Operation Backends
//!
//! Every lane-wise operation has one reference implementation, the
//! portable loops in [`portable`], and, where the architecture offers a
//! profitable instruction, an accelerated kernel that must produce
//! bit-identical results. The functions in this module are the dispatch
//! seam: callers never pick a path themselves.
//!
//! The accelerated surface is deliberately narrow (packed f32
//! arithmetic, mask compaction, blend select on 4-byte lanes); the
//! portable path carries everything else on every target. Equivalence
//! between the two paths is tested in this module on hosts that compile
//! the accelerated kernels.

pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
pub(crate) mod x86;

use crate::element::{MaskLane, SimdElement};

// ============================================================================
// Slice reinterpretation
// ============================================================================

// Sound for the sealed element primitives: same size, same (4-byte)
// alignment, no invalid bit patterns on either side.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn cast_slice<T, U>(s: &[T]) -> &[U] {
    debug_assert_eq!(core::mem::size_of::<T>(), core::mem::size_of::<U>());
    unsafe { core::slice::from_raw_parts(s.as_ptr() as *const U, s.len()) }
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn cast_slice_mut<T, U>(s: &mut [T]) -> &mut [U] {
    debug_assert_eq!(core::mem::size_of::<T>(), core::mem::size_of::<U>());
    unsafe { core::slice::from_raw_parts_mut(s.as_mut_ptr() as *mut U, s.len()) }
}

// ============================================================================
// Dispatchers
// ============================================================================

macro_rules! dispatch_binary {
    ($($name:ident => $x86_kernel:ident;)+) => {
        $(
            #[inline]
            pub(crate) fn $name<T: SimdElement>(a: &[T], b: &[T], out: &mut [T]) {
                #[cfg(target_arch = "x86_64")]
                if T::IS_FLOAT && T::BYTES == 4 {
                    x86::$x86_kernel(cast_slice(a), cast_slice(b), cast_slice_mut(out));
                    return;
                }
                portable::zip(a, b, out, T::$name);
            }
        )+
    };
}

dispatch_binary! {
    add => add_f32;
    sub => sub_f32;
    mul => mul_f32;
    div => div_f32;
    min => min_f32;
    max => max_f32;
}

/// Compacts mask lanes to bits, lane 0 in the least significant bit.
#[inline]
pub(crate) fn mask_bits<M: MaskLane>(lanes: &[M]) -> u64 {
    #[cfg(target_arch = "x86_64")]
    if M::BYTES == 4 {
        return x86::mask_bits_x4(cast_slice(lanes));
    }
    portable::mask_bits(lanes)
}

/// Expands bits to canonical all-ones/zero mask lanes.
#[inline]
pub(crate) fn mask_from_bits<M: MaskLane>(bits: u64, lanes: &mut [M]) {
    portable::mask_from_bits(bits, lanes)
}

/// Lane-wise select: `out[i] = if mask[i] { t[i] } else { f[i] }`.
#[inline]
pub(crate) fn select<T: SimdElement>(mask: &[T::Bits], t: &[T], f: &[T], out: &mut [T]) {
    #[cfg(target_arch = "x86_64")]
    if T::BYTES == 4 {
        x86::select_x4(
            cast_slice(mask),
            cast_slice(t),
            cast_slice(f),
            cast_slice_mut(out),
        );
        return;
    }
    portable::select::<T>(mask, t, f, out);
}
