#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod error;
pub mod fx;
pub mod image;
pub mod ops;
pub mod progress;

// Expression parsing is public for tooling; the engine itself is internal.
pub mod expr;

// --- High-level re-exports -------------------------------------------------

// Main entry points: the facade and its options.
pub use crate::fx::{ChannelFx, ChannelFxOptions};

pub use crate::error::ChannelFxError;
pub use crate::image::map::{
    ChannelMap, ChannelSet, ChannelTrait, ChannelTraits, PixelChannel,
};
pub use crate::image::sequence::ImageSequence;
pub use crate::image::{Colorspace, Image, Quantum};
pub use crate::ops::{combine, copy_channel, separate, separate_all};
pub use crate::progress::{NoProgress, ProgressMonitor};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use channel_fx::prelude::*;
///
/// let mut image = Image::new(8, 8, ChannelMap::rgb());
/// image.fill(&[0.9, 0.4, 0.1]);
/// let sources = ImageSequence::from(image);
///
/// let fx = ChannelFx::new();
/// let out = fx
///     .apply_expression(&sources, Some("red<=>blue"))
///     .expect("valid expression");
/// assert_eq!(out.len(), 1);
/// ```
pub mod prelude {
    pub use crate::image::map::{ChannelMap, ChannelSet, PixelChannel};
    pub use crate::image::sequence::ImageSequence;
    pub use crate::image::{Colorspace, Image};
    pub use crate::{ChannelFx, ChannelFxError, ChannelFxOptions};
}
