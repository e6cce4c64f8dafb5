//! Channel expression parsing and evaluation.
//!
//! An expression is a flat list of clauses over single-letter operators:
//! `red` extracts, `red=>green` transfers, `red<=>blue` exchanges, `,`
//! steps the implicit destination channel, `|` reads from the next source
//! image (wrapping) and `;` finishes the current destination image.

pub mod token;

pub(crate) mod engine;
