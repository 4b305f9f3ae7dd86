//! # ABI Deduction
//!
//! Maps a logical vector description (element class, lane count) plus a
//! capability set to a storage recipe: either one native register
//! (possibly with a padded tail) or an ordered composition of register
//! parts. Deduction is a pure function of its inputs: same element,
//! width, and capabilities always produce the same tag, so layout
//! decisions are reproducible and testable off-target.
//!
//! The composition strategy is greedy widest-first: take the widest
//! usable full register that does not overshoot the remaining lanes,
//! repeat, and pack whatever is left into the smallest covering shape
//! (a padded sub-register, or a plain scalar for a single lane). A whole
//! vector gets a single padded register instead of a composition when
//! its rounded-up width fits the widest usable register.

use crate::capability::Capabilities;
use crate::catalog::{self, ElemClass, RegisterShape};
use core::fmt;
use serde::{Serialize, Serializer};

/// Widest logical vector the engine can name, matching the sealed
/// lane-count bound on the vector and mask types.
pub const MAX_LANES: usize = 64;

/// Upper bound on composite parts. Every part covers at least one
/// lane, so [`MAX_LANES`] parts suffice for any in-domain width,
/// including the all-scalar composition on a target with no vector
/// registers at all.
pub const MAX_PARTS: usize = MAX_LANES;

/// One register of a storage recipe.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct NativePart {
    /// Width of the backing register in bytes (equals the element width
    /// for a scalar part).
    pub reg_bytes: usize,
    /// Logical lanes stored in this part.
    pub lanes: usize,
    /// Lane capacity of the register. `capacity > lanes` means a padded
    /// tail whose contents are unspecified and never read.
    pub capacity: usize,
}

impl NativePart {
    fn new(shape: RegisterShape, elem: ElemClass, lanes: usize) -> Self {
        Self {
            reg_bytes: shape.bytes,
            lanes,
            capacity: shape.capacity(elem.bytes),
        }
    }

    /// Whether this part carries unused tail lanes.
    #[inline]
    pub fn is_padded(&self) -> bool {
        self.capacity > self.lanes
    }
}

/// Fixed-capacity list of composite parts, ordered widest-first.
#[derive(Clone, Copy)]
pub struct PartList {
    parts: [NativePart; MAX_PARTS],
    len: usize,
}

impl PartList {
    const EMPTY_PART: NativePart = NativePart {
        reg_bytes: 0,
        lanes: 0,
        capacity: 0,
    };

    fn new() -> Self {
        Self {
            parts: [Self::EMPTY_PART; MAX_PARTS],
            len: 0,
        }
    }

    // Callers hold len < MAX_PARTS: deduction emits at most one part
    // per lane and its domain is bounded by MAX_LANES.
    fn push(&mut self, part: NativePart) {
        self.parts[self.len] = part;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[NativePart] {
        &self.parts[..self.len]
    }
}

impl PartialEq for PartList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for PartList {}

impl fmt::Debug for PartList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl Serialize for PartList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

/// The deduced storage recipe for a vector or mask.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum AbiTag {
    /// One register holds all lanes (padded tail allowed).
    Native(NativePart),
    /// Ordered multi-register composition, widest parts first.
    Composite(PartList),
    /// No usable storage recipe: zero lanes, or a width beyond
    /// [`MAX_LANES`]. A sentinel, not an error.
    Degenerate,
}

impl AbiTag {
    /// The parts of the recipe, in lane order. Empty for `Degenerate`.
    pub fn parts(&self) -> &[NativePart] {
        match self {
            AbiTag::Native(part) => core::slice::from_ref(part),
            AbiTag::Composite(parts) => parts.as_slice(),
            AbiTag::Degenerate => &[],
        }
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts().len()
    }

    /// Total logical lanes across all parts.
    pub fn lane_count(&self) -> usize {
        self.parts().iter().map(|p| p.lanes).sum()
    }

    /// Total storage footprint in bytes, padding included.
    pub fn byte_size(&self) -> usize {
        self.parts().iter().map(|p| p.reg_bytes).sum()
    }

    /// Storage alignment: the widest part's natural register alignment.
    pub fn align(&self) -> usize {
        self.parts().iter().map(|p| p.reg_bytes).max().unwrap_or(1)
    }

    /// Whether any part carries padded tail lanes.
    pub fn is_padded(&self) -> bool {
        self.parts().iter().any(NativePart::is_padded)
    }

    /// Parts paired with the half-open lane range each one covers.
    /// Ranges are contiguous and ascending; the first starts at 0.
    pub fn lane_ranges(&self) -> impl Iterator<Item = (core::ops::Range<usize>, NativePart)> + '_ {
        let mut offset = 0;
        self.parts().iter().map(move |&part| {
            let range = offset..offset + part.lanes;
            offset += part.lanes;
            (range, part)
        })
    }
}

/// Deduces the storage recipe for `n` lanes of `elem` under `caps`.
///
/// Total over the nameable widths: every `n` in `1..=MAX_LANES` gets a
/// usable recipe under any capability set. Out-of-domain widths (zero,
/// or beyond the lane-count bound) are the [`AbiTag::Degenerate`]
/// sentinel.
pub fn deduce(elem: ElemClass, n: usize, caps: Capabilities) -> AbiTag {
    if n == 0 || n > MAX_LANES {
        return AbiTag::Degenerate;
    }

    // A single padded register beats a composition whenever the width,
    // rounded up to a power of two, fits the widest usable register.
    if let Some(widest) = catalog::widest_register_fitting(elem, caps, usize::MAX) {
        if n.next_power_of_two() <= widest.capacity(elem.bytes) {
            if let Some(shape) = catalog::smallest_covering(elem, caps, n) {
                let tag = AbiTag::Native(NativePart::new(shape, elem, n));
                log::trace!("deduce {elem:?} x{n}: {tag:?}");
                return tag;
            }
        }
    }

    let mut parts = PartList::new();
    let mut rem = n;
    while rem > 0 {
        let (part, taken) = if let Some(shape) = catalog::widest_register_fitting(elem, caps, rem)
        {
            let lanes = shape.capacity(elem.bytes);
            (NativePart::new(shape, elem, lanes), lanes)
        } else if let Some(shape) = catalog::smallest_covering(elem, caps, rem) {
            (NativePart::new(shape, elem, rem), rem)
        } else {
            // No vector registers: one scalar part per lane.
            let scalar = RegisterShape {
                bytes: elem.bytes,
                required: Capabilities::empty(),
            };
            (NativePart::new(scalar, elem, 1), 1)
        };
        parts.push(part);
        rem -= taken;
    }

    let tag = if parts.len() == 1 {
        AbiTag::Native(parts.as_slice()[0])
    } else {
        AbiTag::Composite(parts)
    };
    log::trace!("deduce {elem:?} x{n}: {tag:?}");
    tag
}

/// Deduces the storage recipe for the mask companion of `elem`, the
/// same-width integer class. This can differ from the data recipe: a
/// float vector backed by one wide register may get a narrower mask
/// composition when the wide integer shape is not usable.
pub fn deduce_for_mask(elem: ElemClass, n: usize, caps: Capabilities) -> AbiTag {
    deduce(elem.mask_companion(), n, caps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const F32: ElemClass = ElemClass {
        bytes: 4,
        is_float: true,
    };
    const F64: ElemClass = ElemClass {
        bytes: 8,
        is_float: true,
    };
    const I32: ElemClass = ElemClass {
        bytes: 4,
        is_float: false,
    };
    const U8: ElemClass = ElemClass {
        bytes: 1,
        is_float: false,
    };

    const SSE: Capabilities = Capabilities::SSE2;

    fn avx_no_avx2() -> Capabilities {
        Capabilities::SSE2 | Capabilities::AVX
    }

    fn avx2() -> Capabilities {
        avx_no_avx2() | Capabilities::AVX2
    }

    fn part(reg_bytes: usize, lanes: usize, capacity: usize) -> NativePart {
        NativePart {
            reg_bytes,
            lanes,
            capacity,
        }
    }

    fn composite(tag: AbiTag) -> Vec<NativePart> {
        match tag {
            AbiTag::Composite(parts) => parts.as_slice().to_vec(),
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test_log::test]
    fn seven_floats_on_sse_is_xmm_plus_padded_xmm() {
        let tag = deduce(F32, 7, SSE);
        assert_eq!(composite(tag), vec![part(16, 4, 4), part(16, 3, 4)]);
        assert_eq!(tag.lane_count(), 7);
        assert_eq!(tag.byte_size(), 32);
        assert_eq!(tag.align(), 16);
        assert!(tag.is_padded());
    }

    #[test_log::test]
    fn sixteen_floats_on_avx_is_two_ymm() {
        let tag = deduce(F32, 16, avx_no_avx2());
        assert_eq!(composite(tag), vec![part(32, 8, 8), part(32, 8, 8)]);
    }

    #[test_log::test]
    fn wide_int_without_avx2_falls_back_to_xmm() {
        // Data and mask agree here: the 32-byte integer shape needs AVX2.
        let tag = deduce(I32, 8, avx_no_avx2());
        assert_eq!(composite(tag), vec![part(16, 4, 4), part(16, 4, 4)]);
        assert_eq!(deduce(I32, 8, avx2()), AbiTag::Native(part(32, 8, 8)));
    }

    #[test_log::test]
    fn five_ints_without_avx2_is_xmm_plus_scalar() {
        let tag = deduce(I32, 5, avx_no_avx2());
        assert_eq!(composite(tag), vec![part(16, 4, 4), part(4, 1, 1)]);
    }

    #[test_log::test]
    fn float_mask_companion_diverges_without_avx2() {
        assert_eq!(deduce(F32, 8, avx_no_avx2()), AbiTag::Native(part(32, 8, 8)));
        let mask = deduce_for_mask(F32, 8, avx_no_avx2());
        assert_eq!(composite(mask), vec![part(16, 4, 4), part(16, 4, 4)]);
    }

    #[test_log::test]
    fn three_floats_is_one_padded_xmm() {
        assert_eq!(deduce(F32, 3, SSE), AbiTag::Native(part(16, 3, 4)));
    }

    #[test_log::test]
    fn five_floats_on_avx_is_one_padded_ymm() {
        assert_eq!(deduce(F32, 5, avx_no_avx2()), AbiTag::Native(part(32, 5, 8)));
    }

    #[test_log::test]
    fn thirteen_floats_on_avx_is_ymm_xmm_scalar() {
        let tag = deduce(F32, 13, avx_no_avx2());
        assert_eq!(
            composite(tag),
            vec![part(32, 8, 8), part(16, 4, 4), part(4, 1, 1)]
        );
    }

    #[test_log::test]
    fn three_doubles_is_xmm_plus_scalar() {
        let tag = deduce(F64, 3, SSE);
        assert_eq!(composite(tag), vec![part(16, 2, 2), part(8, 1, 1)]);
    }

    #[test_log::test]
    fn seven_bytes_pack_a_padded_half_register() {
        assert_eq!(deduce(U8, 7, SSE), AbiTag::Native(part(8, 7, 8)));
    }

    #[test_log::test]
    fn one_lane_is_scalar() {
        assert_eq!(deduce(F32, 1, SSE), AbiTag::Native(part(4, 1, 1)));
        assert_eq!(deduce(F32, 1, Capabilities::empty()), AbiTag::Native(part(4, 1, 1)));
    }

    #[test_log::test]
    fn no_vector_registers_means_all_scalar_parts() {
        let tag = deduce(F32, 3, Capabilities::empty());
        assert_eq!(
            composite(tag),
            vec![part(4, 1, 1), part(4, 1, 1), part(4, 1, 1)]
        );
    }

    #[test_log::test]
    fn zero_lanes_is_degenerate() {
        assert_eq!(deduce(F32, 0, SSE), AbiTag::Degenerate);
        assert_eq!(AbiTag::Degenerate.parts(), &[]);
        assert_eq!(AbiTag::Degenerate.align(), 1);
    }

    #[test_log::test]
    fn deduce_is_total_over_the_nameable_widths() {
        // Every in-domain width composes, even with no vector
        // registers at all; wider queries are the sentinel.
        for n in 1..=MAX_LANES {
            assert_ne!(deduce(F32, n, Capabilities::empty()), AbiTag::Degenerate);
            assert_ne!(deduce(F32, n, SSE), AbiTag::Degenerate);
        }
        assert_eq!(deduce(F32, MAX_LANES, Capabilities::empty()).part_count(), 64);
        assert_eq!(deduce(F32, MAX_LANES + 1, SSE), AbiTag::Degenerate);
        assert_eq!(deduce(F32, 257, SSE), AbiTag::Degenerate);
    }

    #[test_log::test]
    fn lane_ranges_are_contiguous() {
        let tag = deduce(F32, 13, avx_no_avx2());
        let mut expected_start = 0;
        for (range, part) in tag.lane_ranges() {
            assert_eq!(range.start, expected_start);
            assert_eq!(range.len(), part.lanes);
            expected_start = range.end;
        }
        assert_eq!(expected_start, 13);
    }
}
