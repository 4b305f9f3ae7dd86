//! # Lanewise
//!
//! A portable fixed-width SIMD engine: vectors are `Simd<T, N>` for any
//! lane count in `1..=64`, and the target decides how to store and run
//! them.
//!
//! ## Design
//!
//! **The width is logical; the storage is deduced.**
//!
//! - ABI deduction ([`abi::deduce`]) maps (element, width, capabilities)
//!   to a storage recipe: one native register, a padded register, or a
//!   widest-first composition of register parts.
//! - Masks carry their own deduction and a dual representation: lane
//!   vectors everywhere, packed bits where the target has a mask
//!   register class. `to_bits`/`from_bits` are bijective either way.
//! - Every operation has a portable reference kernel; accelerated
//!   kernels are bit-identical drop-ins behind one dispatch seam.
//!
//! ```
//! use lanewise::Simd;
//!
//! let a = Simd::<f32, 7>::iota();
//! let b = Simd::splat(3.0);
//! let m = a.simd_lt(b);
//! assert_eq!(m.count(), 3);
//! assert_eq!(m.select(b, a).to_array(), [3.0, 3.0, 3.0, 3.0, 4.0, 5.0, 6.0]);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

/// Storage recipe deduction.
pub mod abi;
mod backend;
/// Hardware feature flags.
pub mod capability;
/// Register shapes usable per element class.
pub mod catalog;
/// Width-changing combinators.
pub mod combine;
/// Lane element types and their scalar reference kernels.
pub mod element;
/// Supported lane counts.
pub mod lanes;
/// The lane-wise boolean companion type.
pub mod mask;
mod permute;
mod reduce;
/// The vector type.
pub mod vector;

pub use abi::{AbiTag, NativePart, PartList, MAX_LANES, MAX_PARTS};
pub use capability::Capabilities;
pub use catalog::{ElemClass, RegisterShape};
pub use combine::{deinterleave, interleave};
pub use element::{LaneCast, MaskLane, SimdElement, SimdInt, SimdSigned};
pub use lanes::{LaneCount, MaskBits, SupportedLaneCount};
pub use mask::{Mask, MaskKind};
pub use vector::Simd;
