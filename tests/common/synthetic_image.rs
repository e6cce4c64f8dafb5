use channel_fx::{ChannelMap, Image, Quantum};

/// Generates an RGB image whose channels carry disjoint value ranges, so a
/// sample's origin channel can be read off its magnitude.
pub fn rgb_gradient(columns: usize, rows: usize) -> Image {
    assert!(columns > 0 && rows > 0, "image dimensions must be positive");

    let mut img = Image::new(columns, rows, ChannelMap::rgb());
    for y in 0..rows {
        for x in 0..columns {
            let idx = (y * columns + x) as Quantum;
            img.set_sample(x, y, 0, 1.0 + idx);
            img.set_sample(x, y, 1, 100.0 + idx);
            img.set_sample(x, y, 2, 200.0 + idx);
        }
    }
    img
}

/// A single-channel grayscale image filled with one constant.
pub fn gray_constant(columns: usize, rows: usize, value: Quantum) -> Image {
    let mut img = Image::new(columns, rows, ChannelMap::gray());
    img.fill(&[value]);
    img
}
