#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use planefit::engine::{
    replicate_border_in_place, resize_padded, resize_proportional, resize_subsampled_image,
    FirResampler, Plane, PlaneMut, PlaneRef, Point, Rect, Size, SubsampledImage,
    SubsamplingRatio,
};
use planefit::Interpolation;

#[derive(Arbitrary, Debug)]
struct GeometrySeed {
    src_w: u8,
    src_h: u8,
    stride_pad: u8,
    channels: u8,
    box_w: u8,
    box_h: u8,
    mode: u8,
    ratio: u8,
    rect: (u8, u8, u8, u8),
    short_by: u8,
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut unstructured = Unstructured::new(data);
    let seed = match GeometrySeed::arbitrary(&mut unstructured) {
        Ok(seed) => seed,
        Err(_) => return,
    };

    // Sizes and channel counts may be invalid on purpose; the validator must
    // reject them without the backend ever reading out of bounds.
    let src_size = Size::new(seed.src_w as u32 % 96, seed.src_h as u32 % 96);
    let channels = seed.channels as usize % 6;
    let stride = channels * src_size.width as usize + seed.stride_pad as usize % 8;
    let len = (stride * src_size.height as usize).saturating_sub(seed.short_by as usize % 4);
    let src: Vec<u8> = (0..len).map(|i| data.get(i % data.len()).copied().unwrap_or(0)).collect();
    let bbox = Size::new(seed.box_w as u32 % 96, seed.box_h as u32 % 96);
    let mode = Interpolation::ALL[seed.mode as usize % Interpolation::ALL.len()];

    let view = PlaneRef::new(&src, stride, src_size, channels);
    let _ = resize_proportional(&FirResampler, view, bbox, mode);
    if let Ok(mut canvas) = resize_padded(&FirResampler, view, bbox, mode) {
        let (x0, y0, x1, y1) = seed.rect;
        if let Ok(rect) = Rect::new(
            Point::new(x0 as u32 % 96, y0 as u32 % 96),
            Point::new(x1 as u32 % 96, y1 as u32 % 96),
        ) {
            let size = canvas.size;
            let channels = canvas.channels;
            let stride = canvas.stride;
            let mut plane = PlaneMut::new(&mut canvas.data, stride, size, channels);
            let _ = replicate_border_in_place(&FirResampler, &mut plane, rect);
        }
    }

    let ratio = SubsamplingRatio::ALL[seed.ratio as usize % SubsamplingRatio::ALL.len()];
    if !src_size.is_empty() {
        let chroma = ratio.chroma_size(src_size);
        let image = SubsampledImage {
            y: Plane::filled(src_size, 1, 16),
            cb: Plane::filled(chroma, 1, 128),
            cr: Plane::filled(chroma, 1, 128),
            ratio,
            rect: Rect::of_size(src_size),
        };
        let _ = resize_subsampled_image(&FirResampler, &image, bbox, mode);
    }
});
