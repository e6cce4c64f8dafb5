//! Fork-join sweep over destination rows.
//!
//! Rows are the unit of parallelism: each row's read/write pair is
//! self-contained, so workers may process rows in any order. The only
//! shared mutable state is a monotonic failure flag plus a slot holding
//! the first error; both are checked and updated with atomic/lock
//! semantics so a failure is never lost. Workers consult the flag before
//! starting a row (advisory early skip); a worker already mid-row drains
//! normally, there is no mid-row cancellation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::ChannelFxError;
use crate::image::scanline::RowWriter;
use crate::image::{Image, Quantum};
use crate::progress::ProgressMonitor;

/// Per-sweep context: progress tag and optional monitor.
pub(crate) struct RowSweep<'a> {
    tag: &'static str,
    monitor: Option<&'a dyn ProgressMonitor>,
}

impl<'a> RowSweep<'a> {
    pub(crate) fn new(tag: &'static str) -> Self {
        RowSweep { tag, monitor: None }
    }

    pub(crate) fn with_monitor(mut self, monitor: Option<&'a dyn ProgressMonitor>) -> Self {
        self.monitor = monitor;
        self
    }
}

/// Test seam: rows for which the commit is forced to fail.
pub(crate) type CommitFault<'a> = Option<&'a (dyn Fn(usize) -> bool + Sync)>;

/// Run `fill` over the first `height` rows of `image`, committing each row
/// after its closure returns. Errors accumulate into a single first-error
/// result; remaining rows are skipped on a best-effort basis only.
pub(crate) fn sweep_rows<F>(
    image: &mut Image,
    height: usize,
    sweep: &RowSweep<'_>,
    fill: F,
) -> Result<(), ChannelFxError>
where
    F: Fn(usize, &mut RowWriter<'_>) -> Result<(), ChannelFxError> + Sync,
{
    sweep_rows_with(image, height, sweep, None, fill)
}

pub(crate) fn sweep_rows_with<F>(
    image: &mut Image,
    height: usize,
    sweep: &RowSweep<'_>,
    fault: CommitFault<'_>,
    fill: F,
) -> Result<(), ChannelFxError>
where
    F: Fn(usize, &mut RowWriter<'_>) -> Result<(), ChannelFxError> + Sync,
{
    let row_len = image.columns() * image.channels();
    if row_len == 0 || height == 0 {
        return Ok(());
    }
    debug_assert!(height <= image.rows());

    let failed = AtomicBool::new(false);
    let first_error: Mutex<Option<ChannelFxError>> = Mutex::new(None);
    let completed = AtomicU64::new(0);
    let total = height as u64;
    let data = image.rows_data_mut(height);

    let record = |err: ChannelFxError| {
        failed.store(true, Ordering::Relaxed);
        first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(err);
    };

    let process = |y: usize, row: &mut [Quantum]| {
        if failed.load(Ordering::Relaxed) {
            return;
        }
        let outcome = RowWriter::acquire(row, y).and_then(|mut writer| {
            fill(y, &mut writer)?;
            if fault.is_some_and(|fails| fails(y)) {
                return Err(ChannelFxError::SyncFailed { row: y });
            }
            writer.commit()
        });
        match outcome {
            Err(err) => record(err),
            Ok(()) => {
                if let Some(monitor) = sweep.monitor {
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if !monitor.progress(sweep.tag, done, total) {
                        record(ChannelFxError::Cancelled);
                    }
                }
            }
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| process(y, row));
    }
    #[cfg(not(feature = "parallel"))]
    for (y, row) in data.chunks_mut(row_len).enumerate() {
        process(y, row);
    }

    match first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::map::ChannelMap;

    #[test]
    fn sweep_commits_every_row() {
        let mut img = Image::new(3, 4, ChannelMap::gray());
        let sweep = RowSweep::new("test");
        sweep_rows(&mut img, 4, &sweep, |y, writer| {
            for s in writer.pixels_mut() {
                *s = y as Quantum;
            }
            Ok(())
        })
        .unwrap();
        for y in 0..4 {
            assert_eq!(img.sample(1, y, 0), y as Quantum);
        }
    }

    #[test]
    fn monitor_stop_cancels() {
        let mut img = Image::new(2, 8, ChannelMap::gray());
        let stop = |_: &str, _: u64, _: u64| false;
        let sweep = RowSweep::new("test").with_monitor(Some(&stop));
        let err = sweep_rows(&mut img, 8, &sweep, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, ChannelFxError::Cancelled);
    }

    #[test]
    fn fill_error_is_reported_once() {
        let mut img = Image::new(2, 5, ChannelMap::gray());
        let sweep = RowSweep::new("test");
        let err = sweep_rows(&mut img, 5, &sweep, |y, _| {
            if y == 2 {
                Err(ChannelFxError::AllocationFailed)
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert_eq!(err, ChannelFxError::AllocationFailed);
    }
}
