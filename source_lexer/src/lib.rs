//! # Source Lexer
//!
//! Tokenizer adapter for the stack language.
//!
//! ## Philosophy
//!
//! - **Wholesale, not incremental**: Every content revision is re-lexed from
//!   scratch; consumers never patch token lists.
//! - **Never fails**: Unlexable text becomes an `Invalid` token so that later
//!   passes can keep going.
//! - **Lazy and restartable**: [`TokenIter`] is a cheap `Clone` iterator; a
//!   consumer that needs a second pass restarts it instead of re-reading the
//!   source.
//!
//! ## Design
//!
//! The [`Tokenizer`] trait is the seam other services depend on. The
//! evaluator collaborator ships its own lexer; [`StackLexer`] is a reference
//! implementation built with `logos` that follows the same token contract.

mod lexer;

pub use lexer::{StackLexer, TokenIter, KEYWORDS};

use source_types::Token;

/// Produces the full token sequence for a source string
pub trait Tokenizer {
    fn tokenize(&self, source: &str) -> Vec<Token>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, source: &str) -> Vec<Token> {
        (**self).tokenize(source)
    }
}
