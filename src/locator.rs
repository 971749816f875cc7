//! Locate a capturing group's span in the pattern and in a matched sample.
//!
//! Regex engines report the overall match offset and each group's captured
//! text, but never where a group's capture *starts*. [`find_group_in_regex`]
//! answers the pattern-space question directly from the token stream;
//! [`find_group_in_match`] answers the sample-space question by rewriting
//! the pattern (see [`crate::rewrite`]) and re-running it on the engine.
//!
//! Every query is a pure function of its inputs: nothing is cached across
//! calls, so results can never go stale as the pattern is edited.

use crate::engine::{self, EngineError, SampleMatch};
use crate::rewrite;
use crate::tokenizer::{Token, TokenClass, tokenize};

/// Hard ceiling on pattern length for location queries. Interactive patterns
/// are tiny; anything past this is treated as "nothing to highlight" rather
/// than ground for unbounded work on untrusted input.
pub const MAX_PATTERN_LEN: usize = 64 * 1024;

/// The span of one capturing group within the pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPosition {
    /// Byte offset of the group's `(`.
    pub start: usize,
    /// Byte offset just past the group's matching `)`.
    pub end: usize,
    /// The full token sequence, with `group_ordinal` stamped on every
    /// capturing `(` up to and including the requested group. Owned by this
    /// result; kept for reuse by [`find_group_in_match`].
    pub tokens: Vec<Token>,
    /// Index of the opening token in `tokens`.
    pub start_token: usize,
    /// Index of the closing token in `tokens` (inclusive).
    pub end_token: usize,
}

/// A located range, end exclusive. Pattern-space or sample-space depending
/// on the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

/// True when the token after a `(` marks it non-capturing or lookaround
/// (`?:`, `?=`, `?!`).
fn is_group_modifier(token: Option<&Token>) -> bool {
    token.is_some_and(|t| t.class == TokenClass::Keyword && t.text.starts_with('?'))
}

/// Find the pattern-space span of capturing group `group_index` (1-based;
/// non-capturing and lookaround groups do not count).
///
/// Returns `None` when the pattern has fewer capturing groups, or when it is
/// malformed such that the group's closer cannot be found.
pub fn find_group_in_regex(pattern: &str, group_index: usize) -> Option<GroupPosition> {
    if group_index == 0 || pattern.len() > MAX_PATTERN_LEN {
        return None;
    }
    let mut tokens = tokenize(pattern);

    // Find the group's opening token, stamping ordinals along the way.
    let mut at_group = 0;
    let mut start_token = None;
    for i in 0..tokens.len() {
        let token = &tokens[i];
        if token.class == TokenClass::Bracket
            && token.text == "("
            && !is_group_modifier(tokens.get(i + 1))
        {
            at_group += 1;
            tokens[i].group_ordinal = Some(at_group);
            if at_group == group_index {
                start_token = Some(i);
                break;
            }
        }
    }
    let start_token = start_token?;
    let start = tokens[start_token].start;
    // Nesting reflects post-token state, so the opener sits one above its
    // parent scope; the matching closer is the first token back at that
    // parent depth.
    let parent_nesting = tokens[start_token].nesting - 1;

    for i in start_token + 1..tokens.len() {
        let token = &tokens[i];
        if token.nesting == parent_nesting {
            if token.class == TokenClass::Bracket && token.text == ")" {
                return Some(GroupPosition {
                    start,
                    end: token.end(),
                    tokens,
                    start_token,
                    end_token: i,
                });
            }
            // Depth returned to the parent on something that is not this
            // group's `)`: unbalanced pattern.
            return None;
        }
    }
    None
}

/// Find the sample-space range matched by capturing group `group_index`.
///
/// `sample_match` is the native result of running `pattern` (with `flags`)
/// against `sample`; `group_position` comes from [`find_group_in_regex`] on
/// the same pattern text.
///
/// Returns `Ok(None)` when the group did not participate in this match, and
/// for a group that is itself quantified: only the last repetition's
/// capture is observable, so its offset is unrecoverable (declared
/// limitation). Engine compile/run errors on the rewritten pattern
/// propagate as `Err`.
///
/// Assumes the engine is deterministic leftmost-first, so the rewritten
/// pattern takes the same branch choices against `sample` as the original
/// did. Holds for backtracking engines like the one this crate uses; a
/// POSIX longest-match engine would need re-validation.
pub fn find_group_in_match(
    pattern: &str,
    flags: &str,
    sample: &str,
    sample_match: &SampleMatch,
    group_index: usize,
    group_position: &GroupPosition,
) -> Result<Option<MatchRange>, EngineError> {
    let Some(captured) = sample_match.group(group_index) else {
        return Ok(None);
    };

    let tokens = &group_position.tokens;
    if let Some(after) = tokens.get(group_position.end_token + 1)
        && after.class == TokenClass::RangeInfo
    {
        // Quantified group.
        return Ok(None);
    }

    let Some(rw) = rewrite::build(
        tokens,
        group_position.start_token,
        &pattern[group_position.start..],
    ) else {
        return Ok(None);
    };

    let Some(new_match) = engine::execute(&rw.pattern, flags, sample)? else {
        return Ok(None);
    };

    // Prefix groups in untaken alternation branches capture nothing; the
    // ones that participated measure the text before the target exactly.
    let offset: usize = rw
        .prefix_groups
        .iter()
        .filter_map(|&ordinal| new_match.group(ordinal))
        .map(str::len)
        .sum();

    let start = new_match.start + offset;
    Ok(Some(MatchRange {
        start,
        end: start + captured.len(),
    }))
}
