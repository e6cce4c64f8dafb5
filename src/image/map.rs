//! Per-image channel map: which logical channels exist, where each one is
//! stored inside the interleaved pixel, and how it participates in
//! operations.
//!
//! Design
//! - `PixelChannel` is a closed enumeration; colorspace synonyms (cyan for
//!   red, key for black, gray for red) are associated constants rather than
//!   extra variants, so the storage numbering stays dense.
//! - A channel's participation is a small set of [`ChannelTrait`] flags.
//!   The empty set means the channel does not physically exist in the
//!   image's pixel layout and must never be read or written.
//! - Offsets are dense: defined channels occupy `0..channel_count` with no
//!   holes.

use serde::{Deserialize, Serialize};

use crate::error::ChannelFxError;

/// Logical channel identifiers, in storage numbering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PixelChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Black = 3,
    Alpha = 4,
    Index = 5,
    Mask = 6,
}

impl PixelChannel {
    /// Number of enumerants.
    pub const COUNT: usize = 7;

    /// All channels in storage numbering order.
    pub const ALL: [PixelChannel; Self::COUNT] = [
        PixelChannel::Red,
        PixelChannel::Green,
        PixelChannel::Blue,
        PixelChannel::Black,
        PixelChannel::Alpha,
        PixelChannel::Index,
        PixelChannel::Mask,
    ];

    /// Gray shares the red slot.
    pub const GRAY: PixelChannel = PixelChannel::Red;
    pub const CYAN: PixelChannel = PixelChannel::Red;
    pub const MAGENTA: PixelChannel = PixelChannel::Green;
    pub const YELLOW: PixelChannel = PixelChannel::Blue;
    pub const KEY: PixelChannel = PixelChannel::Black;

    /// Enumeration index of this channel.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Channel for a numeric index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next enumerant, used when a `,` group separator advances the
    /// destination channel.
    pub fn succ(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Canonical mnemonic, as accepted by the expression language.
    pub fn mnemonic(self) -> &'static str {
        match self {
            PixelChannel::Red => "red",
            PixelChannel::Green => "green",
            PixelChannel::Blue => "blue",
            PixelChannel::Black => "black",
            PixelChannel::Alpha => "alpha",
            PixelChannel::Index => "index",
            PixelChannel::Mask => "mask",
        }
    }
}

/// How a channel participates in pixel operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ChannelTrait {
    /// Values pass through untouched by value-transforming operations.
    Copy = 0b001,
    /// Values are actively updated by whole-image transforms; `separate_all`
    /// emits one plane per update channel.
    Update = 0b010,
    /// Values participate in blending (alpha and the color channels of a
    /// matte image).
    Blend = 0b100,
}

/// A set of [`ChannelTrait`] flags. The empty set means *undefined*: the
/// channel is absent from the pixel layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelTraits {
    bits: u8,
}

impl ChannelTraits {
    /// The undefined (absent) channel.
    pub const UNDEFINED: ChannelTraits = ChannelTraits { bits: 0 };

    /// Construct a set from individual flags.
    pub const fn of(traits: &[ChannelTrait]) -> ChannelTraits {
        let mut bits = 0u8;
        let mut i = 0;
        while i < traits.len() {
            bits |= traits[i] as u8;
            i += 1;
        }
        ChannelTraits { bits }
    }

    pub const fn contains(self, t: ChannelTrait) -> bool {
        self.bits & t as u8 != 0
    }

    pub const fn with(self, t: ChannelTrait) -> ChannelTraits {
        ChannelTraits {
            bits: self.bits | t as u8,
        }
    }

    /// True when the channel does not exist in the pixel layout.
    pub const fn is_undefined(self) -> bool {
        self.bits == 0
    }
}

/// A set of [`PixelChannel`] identifiers, used to select the channels
/// `separate` collapses into its gray output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelSet {
    bits: u8,
}

impl ChannelSet {
    pub const EMPTY: ChannelSet = ChannelSet { bits: 0 };

    pub const fn single(channel: PixelChannel) -> ChannelSet {
        ChannelSet {
            bits: 1 << channel as u8,
        }
    }

    pub const fn of(channels: &[PixelChannel]) -> ChannelSet {
        let mut bits = 0u8;
        let mut i = 0;
        while i < channels.len() {
            bits |= 1 << channels[i] as u8;
            i += 1;
        }
        ChannelSet { bits }
    }

    pub const fn contains(self, channel: PixelChannel) -> bool {
        self.bits & (1 << channel as u8) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

const COLOR: ChannelTraits = ChannelTraits::of(&[ChannelTrait::Update, ChannelTrait::Blend]);
const ALPHA: ChannelTraits = ChannelTraits::of(&[ChannelTrait::Copy, ChannelTrait::Blend]);
const META: ChannelTraits = ChannelTraits::of(&[ChannelTrait::Copy]);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Slot {
    offset: usize,
    traits: ChannelTraits,
}

/// Per-image table mapping each [`PixelChannel`] to its storage offset and
/// traits. Lookup is O(1); defined offsets are dense `0..channel_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelMap {
    slots: [Slot; PixelChannel::COUNT],
    channels: usize,
}

impl ChannelMap {
    fn empty() -> Self {
        ChannelMap {
            slots: [Slot::default(); PixelChannel::COUNT],
            channels: 0,
        }
    }

    fn define(mut self, channel: PixelChannel, traits: ChannelTraits) -> Self {
        debug_assert!(self.slots[channel.index()].traits.is_undefined());
        self.slots[channel.index()] = Slot {
            offset: self.channels,
            traits,
        };
        self.channels += 1;
        self
    }

    /// Single gray channel, the canonical layout of a collapsed image.
    pub fn gray() -> Self {
        Self::empty().define(PixelChannel::GRAY, COLOR)
    }

    pub fn rgb() -> Self {
        Self::empty()
            .define(PixelChannel::Red, COLOR)
            .define(PixelChannel::Green, COLOR)
            .define(PixelChannel::Blue, COLOR)
    }

    pub fn rgba() -> Self {
        Self::rgb().define(PixelChannel::Alpha, ALPHA)
    }

    pub fn cmyk() -> Self {
        Self::rgb().define(PixelChannel::Black, COLOR)
    }

    pub fn cmyka() -> Self {
        Self::cmyk().define(PixelChannel::Alpha, ALPHA)
    }

    /// Append a write-mask channel to the pixel layout.
    pub fn with_mask(self) -> Self {
        self.define(PixelChannel::Mask, META)
    }

    /// Append a colormap-index channel to the pixel layout.
    pub fn with_index(self) -> Self {
        self.define(PixelChannel::Index, META)
    }

    /// Replace the traits of a defined channel, e.g. to exclude it from
    /// update-driven operations. Undefined channels stay undefined.
    pub fn with_channel_traits(mut self, channel: PixelChannel, traits: ChannelTraits) -> Self {
        let slot = &mut self.slots[channel.index()];
        if !slot.traits.is_undefined() && !traits.is_undefined() {
            slot.traits = traits;
        }
        self
    }

    /// Number of channels physically present per pixel.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels
    }

    /// Traits of a channel; [`ChannelTraits::UNDEFINED`] when absent.
    #[inline]
    pub fn traits(&self, channel: PixelChannel) -> ChannelTraits {
        self.slots[channel.index()].traits
    }

    /// Storage offset of a defined channel.
    #[inline]
    pub fn offset(&self, channel: PixelChannel) -> Option<usize> {
        let slot = self.slots[channel.index()];
        (!slot.traits.is_undefined()).then_some(slot.offset)
    }

    #[inline]
    pub fn is_defined(&self, channel: PixelChannel) -> bool {
        !self.traits(channel).is_undefined()
    }

    /// The channel stored at a given offset, in enumeration order.
    pub fn channel_at(&self, offset: usize) -> Option<PixelChannel> {
        PixelChannel::ALL
            .into_iter()
            .find(|&ch| self.offset(ch) == Some(offset))
    }
}

/// Resolve an expression token to a channel: a known mnemonic, a colorspace
/// synonym, or a decimal channel index.
pub fn parse_channel_token(token: &str) -> Result<PixelChannel, ChannelFxError> {
    let channel = match token.to_ascii_lowercase().as_str() {
        "red" | "cyan" | "gray" | "grey" => Some(PixelChannel::Red),
        "green" | "magenta" => Some(PixelChannel::Green),
        "blue" | "yellow" => Some(PixelChannel::Blue),
        "black" | "key" => Some(PixelChannel::Black),
        "alpha" => Some(PixelChannel::Alpha),
        "index" => Some(PixelChannel::Index),
        "mask" => Some(PixelChannel::Mask),
        numeric => numeric
            .parse::<usize>()
            .ok()
            .and_then(PixelChannel::from_index),
    };
    channel.ok_or_else(|| ChannelFxError::UnknownChannel {
        token: token.to_string(),
    })
}
