//! # Capability Descriptor
//!
//! An immutable bit-set of hardware features, fixed at build time. The
//! engine never inspects hardware at runtime: `detect` reads the compiled
//! target-feature set once, and the process-wide instance is a lazily
//! initialized static. ABI deduction and lowering take a `Capabilities`
//! value by parameter, so tests can deduce for any target model.

use bitflags::bitflags;
use once_cell::sync::Lazy;

bitflags! {
    /// Hardware feature flags consulted by ABI deduction and lowering.
    ///
    /// Read-only after construction; there is no runtime mutation path.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u64 {
        const SSE2 = 1 << 0;
        const SSE3 = 1 << 1;
        const SSSE3 = 1 << 2;
        const SSE4_1 = 1 << 3;
        const SSE4_2 = 1 << 4;
        const AVX = 1 << 5;
        const AVX2 = 1 << 6;
        const BMI1 = 1 << 7;
        const BMI2 = 1 << 8;
        const POPCNT = 1 << 9;
        const FMA = 1 << 10;
        const AVX512F = 1 << 11;
        const AVX512BW = 1 << 12;
        const AVX512DQ = 1 << 13;
        const AVX512VL = 1 << 14;
        const NEON = 1 << 15;
    }
}

// bitflags' serde feature ships helpers, not a blanket impl, so the
// flags type wires them up itself.
impl serde::Serialize for Capabilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

static DETECTED: Lazy<Capabilities> = Lazy::new(|| {
    let caps = Capabilities::detect();
    log::debug!("build-target capabilities: {caps:?}");
    caps
});

impl Capabilities {
    /// Features of the build target, from the compiled target-feature set.
    pub fn detect() -> Self {
        let mut caps = Capabilities::empty();
        if cfg!(target_feature = "sse2") {
            caps |= Capabilities::SSE2;
        }
        if cfg!(target_feature = "sse3") {
            caps |= Capabilities::SSE3;
        }
        if cfg!(target_feature = "ssse3") {
            caps |= Capabilities::SSSE3;
        }
        if cfg!(target_feature = "sse4.1") {
            caps |= Capabilities::SSE4_1;
        }
        if cfg!(target_feature = "sse4.2") {
            caps |= Capabilities::SSE4_2;
        }
        if cfg!(target_feature = "avx") {
            caps |= Capabilities::AVX;
        }
        if cfg!(target_feature = "avx2") {
            caps |= Capabilities::AVX2;
        }
        if cfg!(target_feature = "bmi1") {
            caps |= Capabilities::BMI1;
        }
        if cfg!(target_feature = "bmi2") {
            caps |= Capabilities::BMI2;
        }
        if cfg!(target_feature = "popcnt") {
            caps |= Capabilities::POPCNT;
        }
        if cfg!(target_feature = "fma") {
            caps |= Capabilities::FMA;
        }
        if cfg!(target_feature = "avx512f") {
            caps |= Capabilities::AVX512F;
        }
        if cfg!(target_feature = "avx512bw") {
            caps |= Capabilities::AVX512BW;
        }
        if cfg!(target_feature = "avx512dq") {
            caps |= Capabilities::AVX512DQ;
        }
        if cfg!(target_feature = "avx512vl") {
            caps |= Capabilities::AVX512VL;
        }
        if cfg!(target_feature = "neon") {
            caps |= Capabilities::NEON;
        }
        caps
    }

    /// The one process-wide instance.
    #[inline]
    pub fn get() -> Self {
        *DETECTED
    }

    /// Number of distinct feature flags set. Used as the tie-break key
    /// when two register shapes of equal width are both usable.
    #[inline]
    pub(crate) fn flag_count(self) -> u32 {
        self.bits().count_ones()
    }
}
