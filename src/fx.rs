//! High-level entry points for channel manipulation.

use serde::{Deserialize, Serialize};

use crate::error::ChannelFxError;
use crate::image::map::ChannelSet;
use crate::image::sequence::ImageSequence;
use crate::image::{Colorspace, Image, Quantum};
use crate::progress::ProgressMonitor;

/// Options shared by the channel operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelFxOptions {
    /// Background pixel for freshly started destination images. `None`
    /// keeps the background carried by the source image.
    pub background: Option<Vec<Quantum>>,
    /// Colorspace of the image produced by [`ChannelFx::combine`].
    pub combine_colorspace: Colorspace,
}

impl Default for ChannelFxOptions {
    fn default() -> Self {
        ChannelFxOptions {
            background: None,
            combine_colorspace: Colorspace::Rgb,
        }
    }
}

impl ChannelFxOptions {
    pub fn with_background(mut self, background: Vec<Quantum>) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_combine_colorspace(mut self, colorspace: Colorspace) -> Self {
        self.combine_colorspace = colorspace;
        self
    }
}

/// Channel-manipulation facade tying options and an optional progress
/// monitor to the individual operations.
#[derive(Default)]
pub struct ChannelFx<'m> {
    options: ChannelFxOptions,
    monitor: Option<&'m dyn ProgressMonitor>,
}

impl<'m> ChannelFx<'m> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ChannelFxOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_monitor(mut self, monitor: &'m dyn ProgressMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn options(&self) -> &ChannelFxOptions {
        &self.options
    }

    /// Evaluate a channel expression against `sources`, producing one
    /// image per expression group. `None` yields a single background-filled
    /// clone of the first source.
    pub fn apply_expression(
        &self,
        sources: &ImageSequence,
        expression: Option<&str>,
    ) -> Result<ImageSequence, ChannelFxError> {
        crate::expr::engine::apply_expression(
            sources,
            expression,
            self.options.background.as_deref(),
            self.monitor,
        )
    }

    /// Combine grayscale operand images into one multi-channel image in
    /// the configured colorspace.
    pub fn combine(&self, images: &ImageSequence) -> Result<Image, ChannelFxError> {
        crate::ops::combine(images, self.options.combine_colorspace, self.monitor)
    }

    /// Extract the named channels into a single grayscale image.
    pub fn separate(
        &self,
        image: &Image,
        channels: ChannelSet,
    ) -> Result<Image, ChannelFxError> {
        crate::ops::separate(image, channels, self.monitor)
    }

    /// One grayscale image per updatable channel of `image`.
    pub fn separate_all(&self, image: &Image) -> Result<ImageSequence, ChannelFxError> {
        crate::ops::separate_all(image, self.monitor)
    }
}
