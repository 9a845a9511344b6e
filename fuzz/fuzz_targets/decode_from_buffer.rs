#![no_main]

use libfuzzer_sys::fuzz_target;
use planefit::{Padding, Size, Thumbnailer};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let thumbnailer = Thumbnailer::new();
    let _ = thumbnailer.jpeg_to_rgb(data, Size::new(64, 64), Padding::Gray);
    let _ = thumbnailer.jpeg_to_subsampled(data, Size::new(32, 32));
});
