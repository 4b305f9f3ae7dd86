//! # Native Width Catalog
//!
//! Enumerates, per element class, the register shapes the target can
//! actually use, ordered widest to narrowest. A shape is a byte width
//! plus the set of capability flags it requires; a shape is usable when
//! the build capabilities contain every required flag.
//!
//! The catalog encodes one known incompatibility class: 32-byte
//! registers exist for float elements with AVX alone, but integer
//! elements additionally need AVX2 (the 32-byte integer shape is only
//! producible through a float-typed intermediate that cannot back a
//! usable integer vector). Similarly, 64-byte shapes require AVX512F,
//! plus AVX512BW for 1- and 2-byte elements. Deduction falls back to a
//! narrower composition when a width is ruled out this way.

use crate::capability::Capabilities;
use crate::element::SimdElement;
use serde::Serialize;

/// One hardware register shape (or packed sub-register shape).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct RegisterShape {
    /// Register width in bytes.
    pub bytes: usize,
    /// Capability flags this shape requires, all of them.
    pub required: Capabilities,
}

impl RegisterShape {
    /// Lane capacity for the given element width.
    #[inline]
    pub fn capacity(&self, elem_bytes: usize) -> usize {
        self.bytes / elem_bytes
    }
}

/// Element classification consulted by the catalog: width plus
/// float/integer class (the two differ in which shapes are valid).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct ElemClass {
    pub bytes: usize,
    pub is_float: bool,
}

impl ElemClass {
    #[inline]
    pub fn of<T: SimdElement>() -> Self {
        Self {
            bytes: T::BYTES,
            is_float: T::IS_FLOAT,
        }
    }

    /// The integer class of the same width (mask lanes are integers).
    #[inline]
    pub fn mask_companion(self) -> Self {
        Self {
            bytes: self.bytes,
            is_float: false,
        }
    }
}

/// Full hardware register widths, widest first. Sub-register shapes
/// (packed halves of the 16-byte file) are remainder-packing targets
/// only and never emitted as full composite parts.
const FULL_REGISTER_BYTES: [usize; 3] = [64, 32, 16];

/// Candidate requirement sets for a shape of `bytes` holding `elem`.
/// Widths 2..=16 ride the 16-byte register file on either x86 or NEON.
fn variants_for(bytes: usize, elem: ElemClass) -> [Option<Capabilities>; 2] {
    match bytes {
        64 => {
            let mut required = Capabilities::AVX512F;
            if elem.bytes < 4 {
                required |= Capabilities::AVX512BW;
            }
            [Some(required), None]
        }
        32 => {
            let required = if elem.is_float {
                Capabilities::AVX
            } else {
                Capabilities::AVX.union(Capabilities::AVX2)
            };
            [Some(required), None]
        }
        2 | 4 | 8 | 16 => [Some(Capabilities::SSE2), Some(Capabilities::NEON)],
        _ => [None, None],
    }
}

/// The usable variant of a given width, preferring the one with the
/// fewest required capability flags.
fn usable_variant(bytes: usize, elem: ElemClass, caps: Capabilities) -> Option<RegisterShape> {
    let mut best: Option<RegisterShape> = None;
    for required in variants_for(bytes, elem).into_iter().flatten() {
        if !caps.contains(required) {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => required.flag_count() < b.required.flag_count(),
        };
        if better {
            best = Some(RegisterShape { bytes, required });
        }
    }
    best
}

/// Widest usable full register whose capacity does not exceed
/// `max_lanes`. Greedy composite packing walks this repeatedly.
pub(crate) fn widest_register_fitting(
    elem: ElemClass,
    caps: Capabilities,
    max_lanes: usize,
) -> Option<RegisterShape> {
    for &bytes in &FULL_REGISTER_BYTES {
        let capacity = bytes / elem.bytes;
        if capacity == 0 || capacity > max_lanes {
            continue;
        }
        if let Some(shape) = usable_variant(bytes, elem, caps) {
            return Some(shape);
        }
    }
    None
}

/// Smallest usable shape (scalar, packed sub-register, or register)
/// whose capacity covers `need` lanes. This packs remainders and decides
/// whether a single padded register can hold a whole vector.
pub(crate) fn smallest_covering(
    elem: ElemClass,
    caps: Capabilities,
    need: usize,
) -> Option<RegisterShape> {
    if need <= 1 {
        // One lane is a plain scalar, available everywhere.
        return Some(RegisterShape {
            bytes: elem.bytes,
            required: Capabilities::empty(),
        });
    }
    let mut bytes = elem.bytes * 2;
    while bytes <= 64 {
        if bytes / elem.bytes >= need {
            if let Some(shape) = usable_variant(bytes, elem, caps) {
                return Some(shape);
            }
        }
        bytes *= 2;
    }
    None
}
