//! Separate channels into single-channel grayscale images.

use log::debug;

use super::rows::{sweep_rows, RowSweep};
use crate::error::ChannelFxError;
use crate::image::map::{ChannelMap, ChannelSet, ChannelTrait};
use crate::image::sequence::ImageSequence;
use crate::image::Image;
use crate::progress::ProgressMonitor;

const SEPARATE_TAG: &str = "Separate/Image";

/// Extract the channels named by `channels` into a single-channel
/// grayscale image of the same geometry.
///
/// Per pixel, the selected channels are visited in storage order and each
/// writes over the previous one, so the last selected channel wins; pixels
/// flagged by the image's mask channel are skipped and stay zero.
pub fn separate(
    image: &Image,
    channels: ChannelSet,
    monitor: Option<&dyn ProgressMonitor>,
) -> Result<Image, ChannelFxError> {
    let src_channels = image.channels();
    let columns = image.columns();
    let rows = image.rows();

    // Offsets to sample, in storage (enumeration) order.
    let picks: Vec<usize> = (0..src_channels)
        .filter(|&offset| match image.map().channel_at(offset) {
            Some(channel) => channels.contains(channel),
            None => false,
        })
        .collect();
    debug!(
        "separate {} of {} channels into grayscale",
        picks.len(),
        src_channels
    );

    let mut gray = Image::new(columns, rows, ChannelMap::gray());
    let sweep = RowSweep::new(SEPARATE_TAG).with_monitor(monitor);
    sweep_rows(&mut gray, rows, &sweep, |y, writer| {
        let view = image.read_view();
        let src_row = view.row(0, y as isize, columns);
        let out = writer.pixels_mut();
        for x in 0..columns {
            let pixel = &src_row[x * src_channels..][..src_channels];
            if image.is_masked(pixel) {
                continue; // stays at the initialized zero
            }
            let mut sample = 0.0;
            for &offset in &picks {
                sample = pixel[offset]; // sequential overwrite, last wins
            }
            out[x] = sample;
        }
        Ok(())
    })?;
    Ok(gray)
}

/// One grayscale image per channel whose traits carry the update bit, in
/// storage order. An image with no qualifying channel yields an empty
/// sequence, not an error.
pub fn separate_all(
    image: &Image,
    monitor: Option<&dyn ProgressMonitor>,
) -> Result<ImageSequence, ChannelFxError> {
    let mut planes = ImageSequence::new();
    for offset in 0..image.channels() {
        let Some(channel) = image.map().channel_at(offset) else {
            continue;
        };
        if !image.map().traits(channel).contains(ChannelTrait::Update) {
            continue;
        }
        planes.push(separate(image, ChannelSet::single(channel), monitor)?);
    }
    Ok(planes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::map::{ChannelTraits, PixelChannel};
    use crate::image::Colorspace;

    fn rgb_fill(r: f32, g: f32, b: f32) -> Image {
        let mut img = Image::new(3, 2, ChannelMap::rgb());
        img.fill(&[r, g, b]);
        img
    }

    #[test]
    fn separate_single_channel() {
        let img = rgb_fill(0.1, 0.5, 0.9);
        let green = separate(&img, ChannelSet::single(PixelChannel::Green), None).unwrap();
        assert_eq!(green.channels(), 1);
        assert_eq!(green.colorspace(), Colorspace::Gray);
        assert_eq!(green.sample(2, 1, 0), 0.5);
    }

    #[test]
    fn later_channel_in_storage_order_wins() {
        let img = rgb_fill(0.1, 0.5, 0.9);
        let set = ChannelSet::of(&[PixelChannel::Red, PixelChannel::Blue]);
        let out = separate(&img, set, None).unwrap();
        assert_eq!(out.sample(0, 0, 0), 0.9);
    }

    #[test]
    fn masked_pixels_stay_zero() {
        let mut img = Image::new(2, 1, ChannelMap::rgb().with_mask());
        img.fill(&[0.4, 0.4, 0.4, 0.0]);
        img.set_sample(1, 0, 3, 1.0); // mask the second pixel
        let out = separate(&img, ChannelSet::single(PixelChannel::Red), None).unwrap();
        assert_eq!(out.sample(0, 0, 0), 0.4);
        assert_eq!(out.sample(1, 0, 0), 0.0);
    }

    #[test]
    fn separate_all_emits_update_channels_only() {
        let img = Image::new(2, 2, ChannelMap::rgba());
        let planes = separate_all(&img, None).unwrap();
        // Alpha carries no update trait.
        assert_eq!(planes.len(), 3);
    }

    #[test]
    fn separate_all_without_update_channels_is_empty() {
        let copy_only = ChannelTraits::of(&[ChannelTrait::Copy]);
        let map = ChannelMap::rgb()
            .with_channel_traits(PixelChannel::Red, copy_only)
            .with_channel_traits(PixelChannel::Green, copy_only)
            .with_channel_traits(PixelChannel::Blue, copy_only);
        let img = Image::new(2, 2, map);
        let planes = separate_all(&img, None).unwrap();
        assert!(planes.is_empty());
    }
}
