//! Owned interleaved raster image in row-major layout.
//!
//! Purpose
//! - Hold `columns × rows` pixels, each a fixed-size ordered run of
//!   [`Quantum`] samples described by the image's [`ChannelMap`].
//! - Provide the lifecycle operations the channel engine relies on: clone,
//!   solid background fill, grayscale collapse.
//!
//! Notes
//! - Storage uses a compact row-major buffer with no inter-row padding; the
//!   linear index of sample `c` of pixel `(x, y)` is
//!   `(y * columns + x) * channels + c`.
//! - Sample values are nominally in `[0, 1]` but nothing here clamps; the
//!   channel operations only move samples between slots.

pub mod map;
pub mod scanline;
pub mod sequence;

use serde::{Deserialize, Serialize};

use self::map::{ChannelMap, PixelChannel};
use self::scanline::ReadView;

/// One channel sample.
pub type Quantum = f32;

/// Rec. 709 luma weights, used when a multi-channel pixel is collapsed to
/// one grayscale sample.
const LUMA_RED: Quantum = 0.212_656;
const LUMA_GREEN: Quantum = 0.715_158;
const LUMA_BLUE: Quantum = 0.072_186;

/// Broad interpretation of the channel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colorspace {
    Rgb,
    Gray,
    Cmyk,
}

/// An owned raster image with interleaved channel samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    columns: usize,
    rows: usize,
    map: ChannelMap,
    colorspace: Colorspace,
    matte: bool,
    background: Vec<Quantum>,
    data: Vec<Quantum>,
}

impl Image {
    /// Construct a zero-filled image with the given geometry and channel
    /// layout. The colorspace is inferred from the map; the background
    /// pixel starts out all-zero.
    pub fn new(columns: usize, rows: usize, map: ChannelMap) -> Self {
        let colorspace = if map.is_defined(PixelChannel::Black) {
            Colorspace::Cmyk
        } else if map.channel_count() == 1 && map.is_defined(PixelChannel::GRAY) {
            Colorspace::Gray
        } else {
            Colorspace::Rgb
        };
        let matte = map.is_defined(PixelChannel::Alpha);
        let channels = map.channel_count();
        Image {
            columns,
            rows,
            map,
            colorspace,
            matte,
            background: vec![0.0; channels],
            data: vec![0.0; columns * rows * channels],
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.map.channel_count()
    }

    #[inline]
    pub fn map(&self) -> &ChannelMap {
        &self.map
    }

    #[inline]
    pub fn colorspace(&self) -> Colorspace {
        self.colorspace
    }

    /// Whether the image carries an active alpha channel.
    #[inline]
    pub fn matte(&self) -> bool {
        self.matte
    }

    pub fn set_matte(&mut self, matte: bool) {
        self.matte = matte && self.map.is_defined(PixelChannel::Alpha);
    }

    /// Linear index of the first sample of pixel `(x, y)`.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        (y * self.columns + x) * self.channels()
    }

    /// Sample `offset` of pixel `(x, y)`.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, offset: usize) -> Quantum {
        self.data[self.idx(x, y) + offset]
    }

    #[inline]
    pub fn set_sample(&mut self, x: usize, y: usize, offset: usize, value: Quantum) {
        let i = self.idx(x, y) + offset;
        self.data[i] = value;
    }

    /// All samples of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[Quantum] {
        let i = self.idx(x, y);
        &self.data[i..i + self.channels()]
    }

    /// The samples of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[Quantum] {
        let start = y * self.columns * self.channels();
        &self.data[start..start + self.columns * self.channels()]
    }

    /// Mutable access to the first `height` rows as one contiguous slice,
    /// for row-sweep decomposition.
    #[inline]
    pub(crate) fn rows_data_mut(&mut self, height: usize) -> &mut [Quantum] {
        let len = height * self.columns * self.channels();
        &mut self.data[..len]
    }

    /// Acquire a read-only view with edge-replicated out-of-range access.
    pub fn read_view(&self) -> ReadView<'_> {
        ReadView::new(self)
    }

    /// Set the solid background pixel used by [`fill_background`].
    ///
    /// Missing trailing samples default to zero; extras are ignored.
    ///
    /// [`fill_background`]: Image::fill_background
    pub fn set_background(&mut self, pixel: &[Quantum]) {
        for (i, slot) in self.background.iter_mut().enumerate() {
            *slot = pixel.get(i).copied().unwrap_or(0.0);
        }
    }

    /// Fill every pixel with the given sample run (missing samples zero).
    pub fn fill(&mut self, pixel: &[Quantum]) {
        let channels = self.channels();
        for chunk in self.data.chunks_mut(channels) {
            for (i, slot) in chunk.iter_mut().enumerate() {
                *slot = pixel.get(i).copied().unwrap_or(0.0);
            }
        }
    }

    /// Fill every pixel with the background pixel.
    pub fn fill_background(&mut self) {
        let background = self.background.clone();
        self.fill(&background);
    }

    /// Grayscale sample of a pixel taken from this image: the gray channel
    /// of a grayscale layout, otherwise Rec. 709 luma over RGB.
    pub fn luminance(&self, pixel: &[Quantum]) -> Quantum {
        if self.colorspace == Colorspace::Gray || self.channels() == 1 {
            return pixel[self.map.offset(PixelChannel::GRAY).unwrap_or(0)];
        }
        match (
            self.map.offset(PixelChannel::Red),
            self.map.offset(PixelChannel::Green),
            self.map.offset(PixelChannel::Blue),
        ) {
            (Some(r), Some(g), Some(b)) => {
                LUMA_RED * pixel[r] + LUMA_GREEN * pixel[g] + LUMA_BLUE * pixel[b]
            }
            _ => pixel[0],
        }
    }

    /// Whether a pixel is excluded from writes by the image's mask channel.
    pub fn is_masked(&self, pixel: &[Quantum]) -> bool {
        match self.map.offset(PixelChannel::Mask) {
            Some(offset) => pixel[offset] != 0.0,
            None => false,
        }
    }

    /// Collapse the image to the canonical single-Gray layout, keeping the
    /// gray (red) slot of every pixel and compacting the storage.
    ///
    /// Applied by the expression engine when a group wrote exactly one
    /// channel.
    pub fn reinitialize_gray(&mut self) {
        let channels = self.channels();
        if channels == 1 && self.colorspace == Colorspace::Gray {
            return;
        }
        let keep = self.map.offset(PixelChannel::GRAY).unwrap_or(0);
        let mut compact = Vec::with_capacity(self.columns * self.rows);
        compact.extend(self.data.chunks(channels).map(|pixel| pixel[keep]));
        self.data = compact;
        self.background = vec![self.background.get(keep).copied().unwrap_or(0.0)];
        self.map = ChannelMap::gray();
        self.colorspace = Colorspace::Gray;
        self.matte = false;
    }
}

#[cfg(test)]
mod tests {
    use super::map::ChannelMap;
    use super::*;

    #[test]
    fn indexing_is_interleaved() {
        let mut img = Image::new(3, 2, ChannelMap::rgb());
        img.set_sample(2, 1, 1, 0.5);
        assert_eq!(img.sample(2, 1, 1), 0.5);
        assert_eq!(img.idx(2, 1), (3 + 2) * 3);
        assert_eq!(img.pixel(2, 1), &[0.0, 0.5, 0.0]);
    }

    #[test]
    fn background_fill() {
        let mut img = Image::new(2, 2, ChannelMap::rgba());
        img.set_background(&[0.25, 0.5]);
        img.fill_background();
        assert_eq!(img.pixel(1, 1), &[0.25, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn gray_collapse_keeps_gray_slot() {
        let mut img = Image::new(2, 1, ChannelMap::rgb());
        img.fill(&[0.7, 0.2, 0.1]);
        img.reinitialize_gray();
        assert_eq!(img.channels(), 1);
        assert_eq!(img.colorspace(), Colorspace::Gray);
        assert_eq!(img.pixel(0, 0), &[0.7]);
        assert_eq!(img.pixel(1, 0), &[0.7]);
    }

    #[test]
    fn luminance_of_gray_is_the_sample() {
        let mut img = Image::new(1, 1, ChannelMap::gray());
        img.fill(&[0.3]);
        assert_eq!(img.luminance(img.pixel(0, 0)), 0.3);
    }

    #[test]
    fn masked_pixels_detected() {
        let mut img = Image::new(1, 1, ChannelMap::rgb().with_mask());
        assert!(!img.is_masked(img.pixel(0, 0)));
        img.set_sample(0, 0, 3, 1.0);
        assert!(img.is_masked(img.pixel(0, 0)));
    }
}
