//! Lexical scan of channel expressions.
//!
//! Flat, single-pass tokenization: whitespace separates tokens, each of the
//! operator characters `, | ; < = >` is its own token, and any maximal run
//! of other non-whitespace characters forms a word (channel mnemonic or
//! numeric index). No nesting, quoting or escaping.

/// One lexical token of a channel expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// A channel mnemonic or numeric index.
    Word(&'a str),
    /// One of `, | ; < = >`.
    Symbol(char),
    /// End of input.
    End,
}

const SYMBOLS: &[char] = &[',', '|', ';', '<', '=', '>'];

#[inline]
fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

/// Scan the next token of `input` starting at byte position `pos`.
///
/// Returns the token and the byte position after it. Deterministic and
/// side-effect free; restartable from any position previously returned.
pub fn next_token(input: &str, pos: usize) -> (Token<'_>, usize) {
    let rest = &input[pos..];
    let trimmed = rest.trim_start();
    let start = pos + (rest.len() - trimmed.len());
    match trimmed.chars().next() {
        None => (Token::End, input.len()),
        Some(c) if is_symbol(c) => (Token::Symbol(c), start + c.len_utf8()),
        Some(_) => {
            let end = trimmed
                .find(|c: char| c.is_whitespace() || is_symbol(c))
                .map_or(input.len(), |i| start + i);
            (Token::Word(&input[start..end]), end)
        }
    }
}

/// Stateful wrapper over [`next_token`] tracking the scan position.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'a> {
        let (token, pos) = next_token(self.input, self.pos);
        self.pos = pos;
        token
    }

    /// Byte position after the most recently consumed token; doubles as
    /// "expression bytes consumed" for progress reporting.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}
