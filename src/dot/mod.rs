//! Text codec for the DOT-subset graph format.
//!
//! The format is a small, line-oriented subset of Graphviz DOT:
//!
//! ```text
//! digraph "<name>" {
//!   <id> [<key>="<value>", ...];
//!   <id>;
//!   <src> -> <dst>;
//! }
//! ```
//!
//! Ids and keys are one or more of `[A-Za-z0-9_]`; names and values are any
//! text without a double quote. [`DotEmitter`] writes it and [`DotReader`]
//! reads it back, so `to_dot(from_dot(to_dot(g))) == to_dot(g)`.

mod emitter;
mod reader;

pub use emitter::DotEmitter;
pub use reader::{DotReader, ParseError, ParseResult};
