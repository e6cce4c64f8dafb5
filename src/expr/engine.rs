//! Channel-expression state machine.
//!
//! Consumes the token stream left to right, carrying the current source
//! image index, destination image, destination channel and the number of
//! channels written in the current group. Each completed clause dispatches
//! one or two channel copies; separators advance the destination channel,
//! the source image, or start a new destination image.

use log::debug;

use super::token::{Cursor, Token};
use crate::error::ChannelFxError;
use crate::image::map::{parse_channel_token, PixelChannel};
use crate::image::sequence::ImageSequence;
use crate::image::{Image, Quantum};
use crate::ops::copy::copy_channel;
use crate::progress::ProgressMonitor;

const EXPRESSION_TAG: &str = "ChannelOperation/Image";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpKind {
    Extract,
    Exchange,
    Transfer,
}

/// Apply a channel expression to a sequence of source images, producing
/// one destination image per `;`-separated group.
///
/// `None` is a no-op expression: the result is a single solid-filled clone
/// of the first source image. Any failure discards every destination image
/// built so far.
pub(crate) fn apply_expression(
    sources: &ImageSequence,
    expression: Option<&str>,
    background: Option<&[Quantum]>,
    monitor: Option<&dyn ProgressMonitor>,
) -> Result<ImageSequence, ChannelFxError> {
    let first = sources.first().ok_or(ChannelFxError::EmptySequence)?;
    let mut destination = new_canvas(first, background);
    let Some(expression) = expression else {
        return Ok(ImageSequence::from(destination));
    };
    debug!("apply channel expression {expression:?}");

    let mut out = ImageSequence::new();
    let mut cursor = Cursor::new(expression);
    let mut source_index = 0usize;
    let mut destination_channel = PixelChannel::Red;
    let mut group_channels = 0usize;
    let total = expression.len() as u64;

    let mut token = cursor.next_token();
    loop {
        match token {
            Token::End => break,
            // Group separator: advance the destination channel.
            Token::Symbol(',') => {
                destination_channel = destination_channel.succ().ok_or(
                    ChannelFxError::UnableToParseExpression {
                        position: cursor.position(),
                    },
                )?;
                token = cursor.next_token();
            }
            // Read-next: advance the source image, wrapping to the first.
            Token::Symbol('|') => {
                source_index = sources.next_wrapping(source_index);
                token = cursor.next_token();
            }
            // Write-next: finish this destination image, start a new one.
            Token::Symbol(';') => {
                if group_channels == 1 {
                    destination.reinitialize_gray();
                }
                token = cursor.next_token();
                if token == Token::End {
                    // Trailing separator: no blank trailing image.
                    out.push(destination);
                    return Ok(out);
                }
                let source = sources
                    .get(source_index)
                    .ok_or(ChannelFxError::EmptySequence)?;
                let canvas = new_canvas(source, background);
                out.push(std::mem::replace(&mut destination, canvas));
                group_channels = 0;
                destination_channel = PixelChannel::Red;
            }
            Token::Symbol(_) => {
                return Err(ChannelFxError::UnableToParseExpression {
                    position: cursor.position(),
                });
            }
            Token::Word(word) => {
                let source_channel = parse_channel_token(word)?;
                let mut kind = OpKind::Extract;
                token = cursor.next_token();
                if token == Token::Symbol('<') {
                    kind = OpKind::Exchange;
                    token = cursor.next_token();
                }
                if token == Token::Symbol('=') {
                    token = cursor.next_token();
                }
                if token == Token::Symbol('>') {
                    if kind != OpKind::Exchange {
                        kind = OpKind::Transfer;
                    }
                    token = cursor.next_token();
                }
                if kind != OpKind::Extract {
                    let Token::Word(dst) = token else {
                        return Err(ChannelFxError::UnableToParseExpression {
                            position: cursor.position(),
                        });
                    };
                    destination_channel = parse_channel_token(dst)?;
                    token = cursor.next_token();
                }

                let source = sources
                    .get(source_index)
                    .ok_or(ChannelFxError::EmptySequence)?;
                debug!(
                    "clause {:?} {} -> {} (source image {})",
                    kind,
                    source_channel.mnemonic(),
                    destination_channel.mnemonic(),
                    source_index
                );
                copy_channel(&mut destination, source, source_channel, destination_channel)?;
                group_channels += 1;
                if kind == OpKind::Exchange {
                    copy_channel(&mut destination, source, destination_channel, source_channel)?;
                    group_channels += 1;
                }

                if let Some(monitor) = monitor {
                    if !monitor.progress(EXPRESSION_TAG, cursor.position() as u64, total) {
                        return Err(ChannelFxError::Cancelled);
                    }
                }
            }
        }
    }

    if group_channels == 1 {
        destination.reinitialize_gray();
    }
    out.push(destination);
    Ok(out)
}

/// Clone `source` and give it a solid background fill, the starting state
/// of every destination image.
fn new_canvas(source: &Image, background: Option<&[Quantum]>) -> Image {
    let mut canvas = source.clone();
    if let Some(bg) = background {
        canvas.set_background(bg);
    }
    canvas.fill_background();
    canvas
}
