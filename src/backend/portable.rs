//! Portable reference kernels.
//!
//! Always compiled, on every target. These loops define the semantics of
//! every lane-wise operation; the accelerated kernels in the sibling
//! modules must agree with them exactly, and the equivalence tests in the
//! parent module hold them to it.

use crate::element::{MaskLane, SimdElement};

/// Lane-wise binary map.
#[inline(always)]
pub(crate) fn zip<T: Copy>(a: &[T], b: &[T], out: &mut [T], f: impl Fn(T, T) -> T) {
    debug_assert!(a.len() == out.len() && b.len() == out.len());
    for i in 0..out.len() {
        out[i] = f(a[i], b[i]);
    }
}

/// Lane-wise unary map.
#[inline(always)]
pub(crate) fn map<T: Copy>(a: &[T], out: &mut [T], f: impl Fn(T) -> T) {
    debug_assert!(a.len() == out.len());
    for i in 0..out.len() {
        out[i] = f(a[i]);
    }
}

/// Compacts mask lanes to bits, lane 0 in the least significant bit.
pub(crate) fn mask_bits<M: MaskLane>(lanes: &[M]) -> u64 {
    let mut bits = 0u64;
    for (i, lane) in lanes.iter().enumerate() {
        if lane.is_set() {
            bits |= 1 << i;
        }
    }
    bits
}

/// Expands bits back to canonical all-ones/zero mask lanes.
pub(crate) fn mask_from_bits<M: MaskLane>(bits: u64, lanes: &mut [M]) {
    for (i, lane) in lanes.iter_mut().enumerate() {
        *lane = M::from_bool(bits >> i & 1 != 0);
    }
}

/// Lane-wise select: `out[i] = if mask[i] { t[i] } else { f[i] }`.
pub(crate) fn select<T: SimdElement>(mask: &[T::Bits], t: &[T], f: &[T], out: &mut [T]) {
    debug_assert!(mask.len() == out.len() && t.len() == out.len() && f.len() == out.len());
    for i in 0..out.len() {
        out[i] = if mask[i].is_set() { t[i] } else { f[i] };
    }
}
