//! Pixel-level channel operations.

pub(crate) mod rows;

pub mod combine;
pub mod copy;
pub mod separate;

pub use combine::combine;
pub use copy::copy_channel;
pub use separate::{separate, separate_all};
