//! Regex tokenizing and capturing-group location.
//!
//! Regex engines report the overall match's start offset and each group's
//! captured text, but never where a group's capture sits within the match.
//! This crate recovers that, plus the group's span in the pattern text
//! itself, from a nesting-aware token stream.
//!
//! # Example
//!
//! ```rust
//! use regex_groups::{execute, find_group_in_match, find_group_in_regex};
//!
//! let pattern = "a(b(c)d(e)f(g))";
//!
//! // Where does capturing group 3 live in the pattern?
//! let pos = find_group_in_regex(pattern, 3).unwrap();
//! assert_eq!(&pattern[pos.start..pos.end], "(e)");
//!
//! // And where did it match inside the sample?
//! let m = execute(pattern, "", "abcdefg").unwrap().unwrap();
//! let range = find_group_in_match(pattern, "", "abcdefg", &m, 3, &pos)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!((range.start, range.end), (4, 5));
//! ```

pub mod engine;
pub mod locator;
mod rewrite;
pub mod tokenizer;

pub use engine::{EngineError, SampleMatch, compile, execute};
pub use locator::{
    GroupPosition, MAX_PATTERN_LEN, MatchRange, find_group_in_match, find_group_in_regex,
};
pub use tokenizer::{Token, TokenClass, tokenize};
