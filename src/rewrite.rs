//! Auxiliary-pattern builder for offset reconstruction.
//!
//! A native match result exposes each group's captured *text* but not its
//! offset within the overall match. The trick: rebuild the pattern so that
//! everything to the left of the target group is wrapped in capturing
//! "prefix groups", one per nesting scope on the path from the target up to
//! the top level. Run the rebuilt pattern and the summed lengths of the
//! prefix groups' captures give the target's offset from the match start.
//!
//! The walk goes right to left from the token just before the target group.
//! A prefix group is closed (and a new one opened on the far side) only at a
//! `(` whose depth sits on that path; every other token is carried verbatim.

use itertools::Itertools;

use crate::tokenizer::{Token, TokenClass};

/// A rebuilt pattern plus the (already renumbered) ordinals of its inserted
/// prefix groups.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PrefixRewrite {
    pub pattern: String,
    /// Ordinals of the prefix groups in `pattern`, left-to-right.
    pub prefix_groups: Vec<usize>,
}

enum Fragment<'a> {
    /// Token text carried over unchanged.
    Text(&'a str),
    /// Close the current prefix group, re-open the walked-over `(`, and
    /// start the next prefix group to its left: renders as `)((`.
    Boundary,
}

/// Build the auxiliary pattern for the capturing group opened at
/// `tokens[start_token]`. `tail` is the unmodified rest of the original
/// pattern from the target group's start offset onward.
///
/// Requires the opener (and every capturing opener left of it) to carry a
/// stamped `group_ordinal`; returns `None` otherwise.
pub(crate) fn build(tokens: &[Token], start_token: usize, tail: &str) -> Option<PrefixRewrite> {
    let target = tokens.get(start_token)?;
    let mut next_nest = target.nesting.checked_sub(1)?;
    let mut last_group = target.group_ordinal?;

    // Collected right-to-left; the seed `)` closes the innermost prefix
    // group, opened just left of the target.
    let mut rev_fragments = vec![Fragment::Text(")")];
    let mut prefix_groups = Vec::new();

    for token in tokens[..start_token].iter().rev() {
        let opens_group = token.class == TokenClass::Bracket && token.text == "(";
        if opens_group && token.nesting == next_nest {
            // This `(` is on the path from the target's scope to the top
            // level, so the prefix run built so far belongs inside it.
            next_nest -= 1;
            rev_fragments.push(Fragment::Boundary);
            // Ordinal of this prefix group before any insertions to its
            // left; corrected below once all insertions are known.
            prefix_groups.push(last_group);
        } else {
            rev_fragments.push(Fragment::Text(&token.text));
        }
        // Updated *after* the boundary test: the group inserted there sits
        // inside the `(` the walk is at, so it takes the ordinal after it.
        // A non-capturing `(` carries no ordinal and changes nothing.
        if opens_group && let Some(ordinal) = token.group_ordinal {
            last_group = ordinal;
        }
    }

    // Close the outermost/leftmost prefix group.
    prefix_groups.push(last_group);
    prefix_groups.reverse();
    debug_assert_eq!(prefix_groups[0], 1);

    // Each inserted prefix group shifts every group to its right by one.
    for (inserted_before, ordinal) in prefix_groups.iter_mut().enumerate() {
        *ordinal += inserted_before;
    }

    let body: String = rev_fragments
        .iter()
        .rev()
        .map(|fragment| match fragment {
            Fragment::Text(text) => *text,
            Fragment::Boundary => ")((",
        })
        .join("");

    Some(PrefixRewrite {
        pattern: format!("({body}{tail}"),
        prefix_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::find_group_in_regex;

    fn rewrite(pattern: &str, group_index: usize) -> PrefixRewrite {
        let pos = find_group_in_regex(pattern, group_index).expect("group should exist");
        build(&pos.tokens, pos.start_token, &pattern[pos.start..]).expect("rewrite should build")
    }

    #[test]
    fn test_flat_pattern_single_prefix_group() {
        let rw = rewrite("(a|x)(b|y)(c|z)", 3);
        assert_eq!(rw.pattern, "((a|x)(b|y))(c|z)");
        assert_eq!(rw.prefix_groups, vec![1]);
    }

    #[test]
    fn test_group_at_pattern_start_gets_empty_prefix() {
        let rw = rewrite("(a)b", 1);
        assert_eq!(rw.pattern, "()(a)b");
        assert_eq!(rw.prefix_groups, vec![1]);
    }

    #[test]
    fn test_nested_target_breaks_prefix_at_scope_boundary() {
        // Only the `(` on the path up from the target splits the prefix.
        let rw = rewrite("a(b(c)d(e)f(g))", 3);
        assert_eq!(rw.pattern, "(a)((b(c)d)(e)f(g))");
        assert_eq!(rw.prefix_groups, vec![1, 3]);
    }

    #[test]
    fn test_deeply_nested_target() {
        let rw = rewrite("a(b(c(d)))", 3);
        assert_eq!(rw.pattern, "(a)((b)((c)(d)))");
        assert_eq!(rw.prefix_groups, vec![1, 3, 5]);
    }

    #[test]
    fn test_non_capturing_prefix_carried_verbatim() {
        let rw = rewrite("(?:x)(a)", 1);
        assert_eq!(rw.pattern, "((?:x))(a)");
        assert_eq!(rw.prefix_groups, vec![1]);
    }

    #[test]
    fn test_alternation_prefix_carried_verbatim() {
        let rw = rewrite("(a)|(b)", 2);
        assert_eq!(rw.pattern, "((a)|)(b)");
        assert_eq!(rw.prefix_groups, vec![1]);
    }

    #[test]
    fn test_tail_left_unchanged() {
        let rw = rewrite("x(a(b)c)", 1);
        assert!(rw.pattern.ends_with("(a(b)c)"));
    }
}
