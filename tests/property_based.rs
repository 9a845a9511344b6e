use planefit::engine::{
    check_alignment, largest_inner_fit, resize_padded, resize_proportional,
    resize_subsampled_image, smallest_outer_fit, FirResampler, Plane, PlaneRef, Point, Rect, Size,
    SubsampledImage, SubsamplingRatio, PAD_VALUE,
};
use planefit::{Interpolation, ResizeError};
use proptest::prelude::*;

fn size_strategy(max: u32) -> impl Strategy<Value = Size> {
    (1u32..=max, 1u32..=max).prop_map(|(w, h)| Size::new(w, h))
}

fn ratio_strategy() -> impl Strategy<Value = SubsamplingRatio> {
    prop::sample::select(SubsamplingRatio::ALL.to_vec())
}

fn interpolation_strategy() -> impl Strategy<Value = Interpolation> {
    prop::sample::select(Interpolation::ALL.to_vec())
}

fn create_plane(size: Size, channels: usize) -> Vec<u8> {
    (0..size.pixels() as usize * channels)
        .map(|i| (i * 7 % 256) as u8)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_inner_fit_fits_and_touches_box(
        src in size_strategy(4096),
        bbox in size_strategy(1024),
    ) {
        let fit = largest_inner_fit(src, bbox);
        prop_assert!(fit.width >= 1 && fit.height >= 1);
        prop_assert!(fit.width <= bbox.width);
        prop_assert!(fit.height <= bbox.height);
        prop_assert!(fit.width == bbox.width || fit.height == bbox.height);
    }

    #[test]
    fn prop_outer_fit_covers_box(
        src in size_strategy(4096),
        bbox in size_strategy(1024),
    ) {
        let fit = smallest_outer_fit(src, bbox);
        prop_assert!(fit.width >= bbox.width);
        prop_assert!(fit.height >= bbox.height);
        prop_assert!(fit.width == bbox.width || fit.height == bbox.height);
    }

    #[test]
    fn prop_inner_fit_keeps_fitting_size(
        bbox in size_strategy(1024),
        slack in 0.0f64..=1.0,
        bind_width in any::<bool>(),
    ) {
        // a size that already fits with one dimension equal to the box
        let src = if bind_width {
            Size::new(bbox.width, ((bbox.height as f64 * slack) as u32).max(1))
        } else {
            Size::new(((bbox.width as f64 * slack) as u32).max(1), bbox.height)
        };
        prop_assert_eq!(largest_inner_fit(src, bbox), src);
    }

    #[test]
    fn prop_outer_fit_keeps_covering_size(
        bbox in size_strategy(1024),
        extra in 0u32..=1024,
        bind_width in any::<bool>(),
    ) {
        let src = if bind_width {
            Size::new(bbox.width, bbox.height + extra)
        } else {
            Size::new(bbox.width + extra, bbox.height)
        };
        prop_assert_eq!(smallest_outer_fit(src, bbox), src);
    }

    #[test]
    fn prop_same_aspect_fills_box(
        unit in size_strategy(16),
        src_scale in 1u32..=32,
        box_scale in 1u32..=32,
    ) {
        let src = Size::new(unit.width * src_scale, unit.height * src_scale);
        let bbox = Size::new(unit.width * box_scale, unit.height * box_scale);
        prop_assert_eq!(largest_inner_fit(src, bbox), bbox);
        prop_assert_eq!(smallest_outer_fit(src, bbox), bbox);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_proportional_size_matches_inner_fit(
        src_size in size_strategy(48),
        bbox in size_strategy(48),
        channels in prop::sample::select(vec![1usize, 3, 4]),
        mode in interpolation_strategy(),
    ) {
        let src = create_plane(src_size, channels);
        let out = resize_proportional(
            &FirResampler,
            PlaneRef::packed(&src, src_size, channels),
            bbox,
            mode,
        ).unwrap();
        prop_assert_eq!(out.size, largest_inner_fit(src_size, bbox));
        prop_assert_eq!(out.data.len(), out.size.pixels() as usize * channels);
    }

    #[test]
    fn prop_padded_frame_is_gray(
        src_size in size_strategy(48),
        bbox in size_strategy(48),
        channels in prop::sample::select(vec![1usize, 3, 4]),
    ) {
        let src = vec![0u8; src_size.pixels() as usize * channels];
        let out = resize_padded(
            &FirResampler,
            PlaneRef::packed(&src, src_size, channels),
            bbox,
            Interpolation::Linear,
        ).unwrap();
        prop_assert_eq!(out.size, bbox);
        prop_assert_eq!(out.data.len(), bbox.pixels() as usize * channels);

        let inner = largest_inner_fit(src_size, bbox);
        let x0 = (bbox.width - inner.width) / 2;
        let y0 = (bbox.height - inner.height) / 2;
        for y in 0..bbox.height {
            for x in 0..bbox.width {
                let inside = (x0..x0 + inner.width).contains(&x)
                    && (y0..y0 + inner.height).contains(&y);
                let expected = if inside { 0 } else { PAD_VALUE };
                prop_assert!(out.pixel(x, y).iter().all(|&b| b == expected));
            }
        }
    }

    #[test]
    fn prop_alignment_error_iff_indivisible(
        ratio in ratio_strategy(),
        min_x in 0u32..=8,
        min_y in 0u32..=8,
        src_w in 1u32..=40,
        src_h in 1u32..=40,
        dst_w in 1u32..=40,
        dst_h in 1u32..=40,
    ) {
        let (dw, dh) = ratio.factors();
        let src_size = Size::new(src_w, src_h);
        let target = Size::new(dst_w, dst_h);
        let rect = Rect::new(
            Point::new(min_x, min_y),
            Point::new(min_x + src_w, min_y + src_h),
        ).unwrap();
        let aligned = min_x % dw == 0
            && min_y % dh == 0
            && (min_x + src_w) % dw == 0
            && (min_y + src_h) % dh == 0
            && dst_w % dw == 0
            && dst_h % dh == 0;

        prop_assert_eq!(check_alignment(ratio, rect, target).is_ok(), aligned);

        // plane buffers start at rect.min and cover only the rectangle
        let chroma = ratio.chroma_size(src_size);
        let image = SubsampledImage {
            y: Plane::filled(src_size, 1, 16),
            cb: Plane::filled(chroma, 1, 128),
            cr: Plane::filled(chroma, 1, 128),
            ratio,
            rect,
        };
        let result = resize_subsampled_image(&FirResampler, &image, target, Interpolation::Linear);
        match result {
            Ok(out) => {
                prop_assert!(aligned);
                prop_assert_eq!(out.y.size, target);
                prop_assert_eq!(out.cb.size, Size::new(dst_w / dw, dst_h / dh));
            }
            Err(failure) => {
                prop_assert!(!aligned);
                let is_unaligned = matches!(failure.error, ResizeError::UnalignedGeometry { .. });
                prop_assert!(is_unaligned);
            }
        }
    }
}
