//! Combine a sequence of images into one multi-channel image.

use log::debug;

use super::rows::{sweep_rows, RowSweep};
use crate::error::ChannelFxError;
use crate::image::map::{ChannelMap, PixelChannel};
use crate::image::sequence::ImageSequence;
use crate::image::{Colorspace, Image};
use crate::progress::ProgressMonitor;

const COMBINE_TAG: &str = "Combine/Image";

/// Combine one or more images into a single image of the requested
/// colorspace: channel `i` of the result receives the grayscale luminance
/// of the `i`-th listed image, sampled at matching coordinates.
///
/// The first image is the template for geometry and alpha: the result
/// carries an alpha channel when the template does. Channels beyond the
/// list length, and coordinates beyond a shorter operand's width, are left
/// at the result's initial (zero) content rather than edge-extended; rows
/// beyond a shorter operand's height read its edge-replicated last row.
pub fn combine(
    images: &ImageSequence,
    colorspace: Colorspace,
    monitor: Option<&dyn ProgressMonitor>,
) -> Result<Image, ChannelFxError> {
    let template = images.first().ok_or(ChannelFxError::EmptySequence)?;
    let with_alpha = template.map().is_defined(PixelChannel::Alpha);
    let map = match (colorspace, with_alpha) {
        (Colorspace::Gray, _) => ChannelMap::gray(),
        (Colorspace::Rgb, false) => ChannelMap::rgb(),
        (Colorspace::Rgb, true) => ChannelMap::rgba(),
        (Colorspace::Cmyk, false) => ChannelMap::cmyk(),
        (Colorspace::Cmyk, true) => ChannelMap::cmyka(),
    };
    debug!(
        "combine {} images into {:?} ({} channels)",
        images.len(),
        colorspace,
        map.channel_count()
    );

    // One source image per destination offset, skipping undefined slots.
    let plan: Vec<(usize, &Image)> = (0..map.channel_count())
        .filter(|&offset| map.channel_at(offset).is_some())
        .filter_map(|offset| images.get(offset).map(|img| (offset, img)))
        .collect();

    let mut combined = Image::new(template.columns(), template.rows(), map);
    combined.set_matte(with_alpha);
    let channels = combined.channels();
    let columns = combined.columns();
    let rows = combined.rows();

    let sweep = RowSweep::new(COMBINE_TAG).with_monitor(monitor);
    sweep_rows(&mut combined, rows, &sweep, |y, writer| {
        let out = writer.pixels_mut();
        for &(offset, next) in &plan {
            let next_channels = next.channels();
            let view = next.read_view();
            let src_row = view.row(0, y as isize, next.columns());
            for x in 0..columns.min(next.columns()) {
                let pixel = &src_row[x * next_channels..][..next_channels];
                out[x * channels + offset] = next.luminance(pixel);
            }
        }
        Ok(())
    })?;
    Ok(combined)
}
