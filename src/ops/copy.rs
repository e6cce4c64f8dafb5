//! Per-channel pixel copy between two images.

use log::debug;

use super::rows::{sweep_rows_with, CommitFault, RowSweep};
use crate::error::ChannelFxError;
use crate::image::map::PixelChannel;
use crate::image::Image;

/// Copy one channel of `source` into one channel of `destination`, row by
/// row over the overlapping `min(rows) × min(columns)` region.
///
/// Columns whose source or destination channel is undefined are left
/// untouched, as is everything outside the overlap. Rows are independent
/// and processed in parallel when the `parallel` feature is enabled; a
/// commit failure marks the operation failed without aborting rows already
/// in flight.
pub fn copy_channel(
    destination: &mut Image,
    source: &Image,
    source_channel: PixelChannel,
    destination_channel: PixelChannel,
) -> Result<(), ChannelFxError> {
    copy_channel_with(destination, source, source_channel, destination_channel, None)
}

pub(crate) fn copy_channel_with(
    destination: &mut Image,
    source: &Image,
    source_channel: PixelChannel,
    destination_channel: PixelChannel,
    fault: CommitFault<'_>,
) -> Result<(), ChannelFxError> {
    let (Some(src_offset), Some(dst_offset)) = (
        source.map().offset(source_channel),
        destination.map().offset(destination_channel),
    ) else {
        // Absent channels are never read or written; specified skip.
        return Ok(());
    };

    let height = source.rows().min(destination.rows());
    let width = source.columns().min(destination.columns());
    let src_channels = source.channels();
    let dst_channels = destination.channels();
    let src_columns = source.columns();
    debug!(
        "copy channel {} -> {} over {}x{}",
        source_channel.mnemonic(),
        destination_channel.mnemonic(),
        width,
        height
    );

    let sweep = RowSweep::new("ChannelCopy/Image");
    sweep_rows_with(destination, height, &sweep, fault, |y, writer| {
        let view = source.read_view();
        let src_row = view.row(0, y as isize, src_columns);
        let out = writer.pixels_mut();
        for x in 0..width {
            out[x * dst_channels + dst_offset] = src_row[x * src_channels + src_offset];
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::map::ChannelMap;
    use crate::image::Quantum;

    fn rgb_ramp(columns: usize, rows: usize) -> Image {
        let mut img = Image::new(columns, rows, ChannelMap::rgb());
        for y in 0..rows {
            for x in 0..columns {
                img.set_sample(x, y, 0, 1.0 + (y * columns + x) as Quantum);
                img.set_sample(x, y, 1, 100.0 + (y * columns + x) as Quantum);
                img.set_sample(x, y, 2, 200.0 + (y * columns + x) as Quantum);
            }
        }
        img
    }

    #[test]
    fn exchange_via_snapshot_is_involution() {
        let original = rgb_ramp(5, 4);
        let mut img = original.clone();

        for _ in 0..2 {
            let snapshot = img.clone();
            copy_channel(&mut img, &snapshot, PixelChannel::Red, PixelChannel::Blue).unwrap();
            copy_channel(&mut img, &snapshot, PixelChannel::Blue, PixelChannel::Red).unwrap();
        }
        assert_eq!(img, original);

        // A single application really swaps.
        let snapshot = img.clone();
        copy_channel(&mut img, &snapshot, PixelChannel::Red, PixelChannel::Blue).unwrap();
        copy_channel(&mut img, &snapshot, PixelChannel::Blue, PixelChannel::Red).unwrap();
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(img.sample(x, y, 0), original.sample(x, y, 2));
                assert_eq!(img.sample(x, y, 2), original.sample(x, y, 0));
                assert_eq!(img.sample(x, y, 1), original.sample(x, y, 1));
            }
        }
    }

    #[test]
    fn unequal_geometry_touches_only_the_overlap() {
        let source = rgb_ramp(3, 2);
        let mut destination = Image::new(5, 4, ChannelMap::rgb());
        destination.set_background(&[9.0, 9.0, 9.0]);
        destination.fill_background();
        let pristine = destination.clone();

        copy_channel(&mut destination, &source, PixelChannel::Red, PixelChannel::Red).unwrap();

        for y in 0..4 {
            for x in 0..5 {
                let expected = if x < 3 && y < 2 {
                    source.sample(x, y, 0)
                } else {
                    pristine.sample(x, y, 0)
                };
                assert_eq!(destination.sample(x, y, 0), expected, "at ({x}, {y})");
                // Other channels never touched.
                assert_eq!(destination.sample(x, y, 1), 9.0);
                assert_eq!(destination.sample(x, y, 2), 9.0);
            }
        }
    }

    #[test]
    fn undefined_channel_is_a_no_op() {
        let source = rgb_ramp(2, 2);
        let mut destination = Image::new(2, 2, ChannelMap::rgb());
        let pristine = destination.clone();
        copy_channel(&mut destination, &source, PixelChannel::Alpha, PixelChannel::Red).unwrap();
        copy_channel(&mut destination, &source, PixelChannel::Red, PixelChannel::Mask).unwrap();
        assert_eq!(destination, pristine);
    }

    #[test]
    fn commit_failure_reports_once_without_losing_other_rows() {
        let source = rgb_ramp(4, 6);
        let mut destination = Image::new(4, 6, ChannelMap::rgb());
        let pristine = destination.clone();

        let failing_row = 5usize;
        let fault = move |y: usize| y == failing_row;
        let err = copy_channel_with(
            &mut destination,
            &source,
            PixelChannel::Red,
            PixelChannel::Red,
            Some(&fault),
        )
        .unwrap_err();
        assert_eq!(err, ChannelFxError::SyncFailed { row: failing_row });

        // The failed row was never committed.
        for x in 0..4 {
            assert_eq!(
                destination.sample(x, failing_row, 0),
                pristine.sample(x, failing_row, 0)
            );
        }
        // Every other row either committed fully or was skipped after the
        // failure was observed; no torn rows.
        for y in 0..5 {
            let committed = destination.sample(0, y, 0) == source.sample(0, y, 0);
            for x in 0..4 {
                let expected = if committed {
                    source.sample(x, y, 0)
                } else {
                    pristine.sample(x, y, 0)
                };
                assert_eq!(destination.sample(x, y, 0), expected, "at ({x}, {y})");
            }
        }
        if cfg!(not(feature = "parallel")) {
            // Serial order: all rows before the failing one completed.
            for y in 0..5 {
                assert_eq!(destination.sample(1, y, 0), source.sample(1, y, 0));
            }
        }
    }
}
