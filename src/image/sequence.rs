//! Ordered image sequence.
//!
//! The expression engine navigates its inputs with "read next, wrapping to
//! the first" semantics and appends finished outputs in order. An
//! index-addressed arena expresses both directly; callers control the
//! order and the sequence is only ever appended to or truncated.

use super::Image;

/// An ordered, append-only sequence of images.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSequence {
    images: Vec<Image>,
}

impl ImageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, image: Image) {
        self.images.push(image);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    #[inline]
    pub fn first(&self) -> Option<&Image> {
        self.images.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&Image> {
        self.images.last()
    }

    /// Index of the image after `index`, wrapping to the first.
    #[inline]
    pub fn next_wrapping(&self, index: usize) -> usize {
        (index + 1) % self.images.len().max(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Drop every image from `len` on.
    pub fn truncate(&mut self, len: usize) {
        self.images.truncate(len);
    }
}

impl From<Image> for ImageSequence {
    fn from(image: Image) -> Self {
        ImageSequence {
            images: vec![image],
        }
    }
}

impl From<Vec<Image>> for ImageSequence {
    fn from(images: Vec<Image>) -> Self {
        ImageSequence { images }
    }
}

impl IntoIterator for ImageSequence {
    type Item = Image;
    type IntoIter = std::vec::IntoIter<Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl<'a> IntoIterator for &'a ImageSequence {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
