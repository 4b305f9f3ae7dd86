//! x86_64 accelerated kernels.
//!
//! SSE2 only, the baseline feature set of the x86_64 target, so every
//! kernel here is unconditionally callable on this architecture. The
//! surface is deliberately narrow: packed f32 arithmetic, sign-bit mask
//! compaction, and bitwise blend select. Everything else runs the
//! portable loops.
//!
//! Kernels process full 16-byte chunks with packed instructions and
//! finish the tail with the scalar reference kernel, so slices of any
//! length (composite remainders included) are handled.

use core::arch::x86_64::*;

macro_rules! packed_f32_binary {
    ($($name:ident => $intr:ident, $scalar:expr;)+) => {
        $(
            pub(crate) fn $name(a: &[f32], b: &[f32], out: &mut [f32]) {
                debug_assert!(a.len() == out.len() && b.len() == out.len());
                let n = out.len();
                let mut i = 0;
                unsafe {
                    while i + 4 <= n {
                        let va = _mm_loadu_ps(a.as_ptr().add(i));
                        let vb = _mm_loadu_ps(b.as_ptr().add(i));
                        _mm_storeu_ps(out.as_mut_ptr().add(i), $intr(va, vb));
                        i += 4;
                    }
                }
                let f = $scalar;
                while i < n {
                    out[i] = f(a[i], b[i]);
                    i += 1;
                }
            }
        )+
    };
}

packed_f32_binary! {
    add_f32 => _mm_add_ps, |x: f32, y: f32| x + y;
    sub_f32 => _mm_sub_ps, |x: f32, y: f32| x - y;
    mul_f32 => _mm_mul_ps, |x: f32, y: f32| x * y;
    div_f32 => _mm_div_ps, |x: f32, y: f32| x / y;
    min_f32 => _mm_min_ps, |x: f32, y: f32| if x < y { x } else { y };
    max_f32 => _mm_max_ps, |x: f32, y: f32| if x > y { x } else { y };
}

/// Compacts 4-byte mask lanes to bits via the packed sign-bit move.
/// Lanes are canonical all-ones/zero, so the sign bit is the lane.
pub(crate) fn mask_bits_x4(lanes: &[u32]) -> u64 {
    let n = lanes.len();
    let mut bits = 0u64;
    let mut i = 0;
    unsafe {
        while i + 4 <= n {
            let v = _mm_loadu_ps(lanes.as_ptr().add(i) as *const f32);
            bits |= (_mm_movemask_ps(v) as u64) << i;
            i += 4;
        }
    }
    while i < n {
        if lanes[i] != 0 {
            bits |= 1 << i;
        }
        i += 1;
    }
    bits
}

/// Bitwise blend select over 4-byte lanes:
/// `out = (mask & t) | (!mask & f)`, valid because mask lanes are
/// canonical all-ones/zero.
pub(crate) fn select_x4(mask: &[u32], t: &[u32], f: &[u32], out: &mut [u32]) {
    debug_assert!(mask.len() == out.len() && t.len() == out.len() && f.len() == out.len());
    let n = out.len();
    let mut i = 0;
    unsafe {
        while i + 4 <= n {
            let vm = _mm_loadu_si128(mask.as_ptr().add(i) as *const __m128i);
            let vt = _mm_loadu_si128(t.as_ptr().add(i) as *const __m128i);
            let vf = _mm_loadu_si128(f.as_ptr().add(i) as *const __m128i);
            let blended = _mm_or_si128(_mm_and_si128(vm, vt), _mm_andnot_si128(vm, vf));
            _mm_storeu_si128(out.as_mut_ptr().add(i) as *mut __m128i, blended);
            i += 4;
        }
    }
    while i < n {
        out[i] = (mask[i] & t[i]) | (!mask[i] & f[i]);
        i += 1;
    }
}
