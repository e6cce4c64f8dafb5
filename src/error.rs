//! Error taxonomy for channel operations.
//!
//! Every failure is terminal for the current call: partially built
//! destination images are dropped with the `Err`, never returned. The only
//! silently handled condition is the per-column skip of channels whose
//! traits are undefined, which is specified behavior rather than an error.

/// Reasons a channel operation may fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelFxError {
    /// A token resolved to neither a channel mnemonic nor an in-range index.
    UnknownChannel { token: String },
    /// The expression is structurally invalid at the given byte position.
    UnableToParseExpression { position: usize },
    /// Backing storage for a row buffer could not be allocated.
    AllocationFailed,
    /// Committing a queued row buffer to pixel storage failed.
    SyncFailed { row: usize },
    /// An operation over an image sequence was given no images.
    EmptySequence,
    /// The progress monitor requested a stop.
    Cancelled,
}

impl std::fmt::Display for ChannelFxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelFxError::UnknownChannel { token } => {
                write!(f, "unknown channel `{token}`")
            }
            ChannelFxError::UnableToParseExpression { position } => {
                write!(f, "unable to parse channel expression at byte {position}")
            }
            ChannelFxError::AllocationFailed => {
                write!(f, "row buffer allocation failed")
            }
            ChannelFxError::SyncFailed { row } => {
                write!(f, "row {row} could not be committed to pixel storage")
            }
            ChannelFxError::EmptySequence => {
                write!(f, "image sequence is empty")
            }
            ChannelFxError::Cancelled => {
                write!(f, "cancelled by progress monitor")
            }
        }
    }
}

impl std::error::Error for ChannelFxError {}
