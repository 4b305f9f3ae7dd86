//! Storage recipe deduction: the determinism sweep and the structural
//! laws every deduced layout must satisfy, across a grid of capability
//! models no single build host could cover.

use lanewise::abi::{self, AbiTag};
use lanewise::{Capabilities, ElemClass, Mask, MaskKind, Simd};

fn element_classes() -> Vec<ElemClass> {
    let mut classes = Vec::new();
    for bytes in [1, 2, 4, 8] {
        classes.push(ElemClass { bytes, is_float: false });
    }
    classes.push(ElemClass { bytes: 4, is_float: true });
    classes.push(ElemClass { bytes: 8, is_float: true });
    classes
}

fn capability_models() -> Vec<Capabilities> {
    vec![
        Capabilities::empty(),
        Capabilities::SSE2,
        Capabilities::SSE2 | Capabilities::AVX,
        Capabilities::SSE2 | Capabilities::AVX | Capabilities::AVX2,
        Capabilities::SSE2
            | Capabilities::AVX
            | Capabilities::AVX2
            | Capabilities::AVX512F
            | Capabilities::AVX512BW
            | Capabilities::AVX512DQ
            | Capabilities::AVX512VL,
        Capabilities::NEON,
    ]
}

#[test_log::test]
fn deduction_sweep_obeys_the_layout_laws() {
    for caps in capability_models() {
        for elem in element_classes() {
            for n in 1..=64 {
                let tag = abi::deduce(elem, n, caps);

                // Same inputs, same recipe.
                assert_eq!(tag, abi::deduce(elem, n, caps));

                assert_eq!(tag.lane_count(), n, "{elem:?} x{n} under {caps:?}");
                assert_eq!(tag.part_count(), tag.parts().len());
                assert!(tag.part_count() >= 1);

                let mut prev_bytes = usize::MAX;
                let mut offset = 0;
                for (range, part) in tag.lane_ranges() {
                    // Widest parts first, every part carries lanes.
                    assert!(part.reg_bytes <= prev_bytes);
                    assert!(part.lanes >= 1);
                    assert!(part.lanes <= part.capacity);
                    assert_eq!(part.capacity, part.reg_bytes / elem.bytes);
                    assert_eq!(part.is_padded(), part.capacity > part.lanes);

                    // Contiguous ascending lane coverage.
                    assert_eq!(range.start, offset);
                    assert_eq!(range.len(), part.lanes);
                    offset = range.end;

                    prev_bytes = part.reg_bytes;
                }
                assert_eq!(offset, n);

                assert_eq!(
                    tag.byte_size(),
                    tag.parts().iter().map(|p| p.reg_bytes).sum::<usize>()
                );
                assert!(tag.align().is_power_of_two());
                assert_eq!(
                    tag.align(),
                    tag.parts().iter().map(|p| p.reg_bytes).max().unwrap()
                );

                // A single part is always the Native tag.
                match tag {
                    AbiTag::Native(_) => assert_eq!(tag.part_count(), 1),
                    AbiTag::Composite(_) => assert!(tag.part_count() >= 2),
                    AbiTag::Degenerate => panic!("degenerate for {elem:?} x{n}"),
                }
            }
        }
    }
}

#[test_log::test]
fn zero_width_is_degenerate_for_every_model() {
    for caps in capability_models() {
        for elem in element_classes() {
            assert_eq!(abi::deduce(elem, 0, caps), AbiTag::Degenerate);
        }
    }
}

#[test_log::test]
fn composition_is_greedy_widest_first() {
    let avx = Capabilities::SSE2 | Capabilities::AVX;
    let f32c = ElemClass { bytes: 4, is_float: true };

    let tag = abi::deduce(f32c, 13, avx);
    let widths: Vec<usize> = tag.parts().iter().map(|p| p.reg_bytes).collect();
    assert_eq!(widths, [32, 16, 4]);

    // Padding appears only in a trailing part, never a full one.
    let tag = abi::deduce(f32c, 7, Capabilities::SSE2);
    assert!(!tag.parts()[0].is_padded());
    assert!(tag.parts()[1].is_padded());
}

#[test_log::test]
fn mask_recipe_tracks_the_integer_class() {
    let avx = Capabilities::SSE2 | Capabilities::AVX;
    let avx2 = avx | Capabilities::AVX2;

    // Wide float data, no wide integer registers: the mask companion
    // composes narrower parts than the data vector.
    let data = Simd::<f32, 8>::abi_for(avx);
    let mask = Mask::<f32, 8>::abi_for(avx);
    assert_eq!(data.part_count(), 1);
    assert_eq!(mask.part_count(), 2);
    assert_eq!(mask.lane_count(), data.lane_count());

    // With the wide integer shape available the two agree again.
    assert_eq!(
        Mask::<f32, 8>::abi_for(avx2).part_count(),
        Simd::<f32, 8>::abi_for(avx2).part_count()
    );
}

#[test_log::test]
fn mask_kind_needs_the_mask_register_class() {
    let avx512 = Capabilities::SSE2
        | Capabilities::AVX
        | Capabilities::AVX2
        | Capabilities::AVX512F;
    let f32c = ElemClass { bytes: 4, is_float: true };
    let u8c = ElemClass { bytes: 1, is_float: false };

    let f32x8 = |caps| abi::deduce_for_mask(f32c, 8, caps);
    let u8x16 = |caps| abi::deduce_for_mask(u8c, 16, caps);

    assert_eq!(
        MaskKind::for_recipe(f32c, &f32x8(Capabilities::SSE2), Capabilities::SSE2),
        MaskKind::Vector
    );
    assert_eq!(MaskKind::for_recipe(f32c, &f32x8(avx512), avx512), MaskKind::Bits);

    // Narrow lanes additionally need the byte/word extension.
    assert_eq!(MaskKind::for_recipe(u8c, &u8x16(avx512), avx512), MaskKind::Vector);
    let bw = avx512 | Capabilities::AVX512BW;
    assert_eq!(MaskKind::for_recipe(u8c, &u8x16(bw), bw), MaskKind::Bits);

    // An all-scalar recipe never operates in the packed form.
    let scalar = abi::deduce_for_mask(f32c, 1, avx512);
    assert_eq!(MaskKind::for_recipe(f32c, &scalar, avx512), MaskKind::Vector);
}

#[test_log::test]
fn build_target_recipes_are_consistent() {
    // Whatever the host is, the public accessors must agree with the
    // explicit-capability form.
    assert_eq!(Simd::<f32, 7>::abi(), Simd::<f32, 7>::abi_for(Capabilities::get()));
    assert_eq!(Mask::<i32, 5>::abi(), Mask::<i32, 5>::abi_for(Capabilities::get()));
    assert_eq!(Simd::<u8, 16>::abi().lane_count(), 16);
}
