//! Row-buffered pixel access.
//!
//! Two access disciplines, shared by every channel operation:
//!
//! - *Virtual* reads through [`ReadView`]: any coordinate is valid, pixels
//!   outside the image resolve by edge replication. Fully in-range requests
//!   borrow the underlying storage without copying.
//! - *Authentic* writes through [`RowWriter`]: a per-row guard holding a
//!   scratch buffer preloaded with the row's current content. Writes land
//!   in the scratch buffer and reach pixel storage only on [`commit`];
//!   dropping the guard uncommitted discards them. One guard per row, one
//!   commit per guard.
//!
//! Decoupling "fill a row" from "commit a row" keeps the channel logic
//! unaware of how rows reach storage and lets independent rows be processed
//! out of order by parallel workers (see `ops::rows`).
//!
//! [`commit`]: RowWriter::commit

use std::borrow::Cow;

use super::{Image, Quantum};
use crate::error::ChannelFxError;

/// Read-only scanline view over an image with edge-replicated access for
/// out-of-range coordinates.
#[derive(Clone, Copy)]
pub struct ReadView<'a> {
    image: &'a Image,
}

impl<'a> ReadView<'a> {
    pub(crate) fn new(image: &'a Image) -> Self {
        ReadView { image }
    }

    /// `width` pixels starting at `(x0, y)` as one interleaved sample run.
    ///
    /// Coordinates outside the image replicate the nearest edge pixel.
    /// When the request lies fully inside the image the returned row
    /// borrows storage directly.
    pub fn row(&self, x0: isize, y: isize, width: usize) -> Cow<'a, [Quantum]> {
        let img = self.image;
        let channels = img.channels();
        let yc = clamp_coord(y, img.rows());
        if x0 >= 0 && (x0 as usize) + width <= img.columns() {
            return Cow::Borrowed(&img.row(yc)[(x0 as usize) * channels..][..width * channels]);
        }
        let mut extended = Vec::with_capacity(width * channels);
        for i in 0..width {
            let xc = clamp_coord(x0 + i as isize, img.columns());
            extended.extend_from_slice(img.pixel(xc, yc));
        }
        Cow::Owned(extended)
    }
}

#[inline]
fn clamp_coord(v: isize, extent: usize) -> usize {
    if v < 0 {
        0
    } else {
        (v as usize).min(extent.saturating_sub(1))
    }
}

/// Read-write guard over one destination row.
///
/// Acquired by the row sweep (`ops::rows`) for each row of an operation.
/// The scratch buffer starts as a copy of the row, so partial writes leave
/// the untouched samples intact on commit.
pub struct RowWriter<'a> {
    target: &'a mut [Quantum],
    scratch: Vec<Quantum>,
    row: usize,
}

impl<'a> RowWriter<'a> {
    /// Queue a write buffer for `row`, preloaded with its current content.
    ///
    /// Fails with [`ChannelFxError::AllocationFailed`] when the scratch
    /// buffer cannot be allocated.
    pub fn acquire(target: &'a mut [Quantum], row: usize) -> Result<Self, ChannelFxError> {
        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(target.len())
            .map_err(|_| ChannelFxError::AllocationFailed)?;
        scratch.extend_from_slice(target);
        Ok(RowWriter {
            target,
            scratch,
            row,
        })
    }

    /// Index of the row this guard writes.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// The queued samples.
    #[inline]
    pub fn pixels(&self) -> &[Quantum] {
        &self.scratch
    }

    /// The queued samples, mutable.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Quantum] {
        &mut self.scratch
    }

    /// Flush the queued buffer to pixel storage, consuming the guard.
    pub fn commit(self) -> Result<(), ChannelFxError> {
        if self.scratch.len() != self.target.len() {
            return Err(ChannelFxError::SyncFailed { row: self.row });
        }
        self.target.copy_from_slice(&self.scratch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::map::ChannelMap;
    use super::*;

    fn gradient() -> Image {
        let mut img = Image::new(4, 3, ChannelMap::rgb());
        for y in 0..3 {
            for x in 0..4 {
                img.set_sample(x, y, 0, x as Quantum);
                img.set_sample(x, y, 1, y as Quantum);
            }
        }
        img
    }

    #[test]
    fn in_range_rows_borrow() {
        let img = gradient();
        let view = img.read_view();
        let row = view.row(0, 1, 4);
        assert!(matches!(row, Cow::Borrowed(_)));
        assert_eq!(&row[..3], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn out_of_range_replicates_edges() {
        let img = gradient();
        let view = img.read_view();

        // One pixel left of the row: replicates column 0.
        let row = view.row(-1, 0, 3);
        assert!(matches!(row, Cow::Owned(_)));
        assert_eq!(row[0], 0.0);
        assert_eq!(row[3], 0.0);
        assert_eq!(row[6], 1.0);

        // Below the last row: replicates row 2.
        let row = view.row(0, 10, 2);
        assert_eq!(row[1], 2.0);

        // Beyond the right edge: replicates column 3.
        let row = view.row(2, 0, 4);
        assert_eq!(row[0], 2.0);
        assert_eq!(row[3], 3.0);
        assert_eq!(row[9], 3.0);
    }

    #[test]
    fn commit_flushes_scratch() {
        let mut img = gradient();
        let row_len = 4 * 3;
        let data = img.rows_data_mut(1);
        let mut writer = RowWriter::acquire(&mut data[..row_len], 0).unwrap();
        writer.pixels_mut()[2] = 9.0;
        writer.commit().unwrap();
        assert_eq!(img.sample(0, 0, 2), 9.0);
    }

    #[test]
    fn dropped_guard_discards_writes() {
        let mut img = gradient();
        let row_len = 4 * 3;
        {
            let data = img.rows_data_mut(1);
            let mut writer = RowWriter::acquire(&mut data[..row_len], 0).unwrap();
            writer.pixels_mut()[0] = 9.0;
            // no commit
        }
        assert_eq!(img.sample(0, 0, 0), 0.0);
    }
}
