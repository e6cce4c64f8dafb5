//! Progress reporting and cooperative cancellation.

/// Receives progress updates from long-running operations.
///
/// `completed` and `total` are operation-defined units: the expression
/// engine reports expression bytes consumed, row sweeps report rows.
/// Returning `false` requests a stop; the operation finishes rows already
/// in flight and returns [`ChannelFxError::Cancelled`]. This is the sole
/// cancellation mechanism — there are no timeouts and no mid-row aborts.
///
/// [`ChannelFxError::Cancelled`]: crate::ChannelFxError::Cancelled
pub trait ProgressMonitor: Sync {
    /// Report progress under `tag`. Return `false` to request a stop.
    fn progress(&self, tag: &str, completed: u64, total: u64) -> bool;
}

/// Monitor that never stops an operation and discards all updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressMonitor for NoProgress {
    fn progress(&self, _tag: &str, _completed: u64, _total: u64) -> bool {
        true
    }
}

impl<F> ProgressMonitor for F
where
    F: Fn(&str, u64, u64) -> bool + Sync,
{
    fn progress(&self, tag: &str, completed: u64, total: u64) -> bool {
        self(tag, completed, total)
    }
}
