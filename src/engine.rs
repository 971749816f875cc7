//! Adapter over the native regex engine.
//!
//! Group location delegates actual matching to [`fancy_regex`], a
//! backtracking, leftmost-first engine with lookahead support: the same
//! semantics the patterns this crate handles were written against. Flags are
//! accepted as a flag *string* (`"im"` etc.) and rendered as an inline
//! `(?ims)` prefix at compile time.

use std::fmt;

use fancy_regex::Regex;

/// Errors from the engine boundary. Compile errors are never swallowed:
/// callers are expected to have validated compilability before running
/// group-location queries, so a failure here surfaces as-is.
#[derive(Debug)]
pub enum EngineError {
    /// A character in the flag string that is not a recognised flag.
    UnknownFlag(char),
    /// The pattern was rejected by the engine.
    BadPattern(fancy_regex::Error),
    /// The engine failed during execution (e.g. backtracking limit).
    Runtime(fancy_regex::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFlag(c) => write!(f, "Unknown regex flag: {c:?}"),
            Self::BadPattern(e) => write!(f, "Invalid pattern: {e}"),
            Self::Runtime(e) => write!(f, "Regex execution failed: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownFlag(_) => None,
            Self::BadPattern(e) | Self::Runtime(e) => Some(e),
        }
    }
}

/// A caller's view of one native match result: the overall match start plus
/// each capturing group's text, in left-to-right group order. `None` means
/// the group did not participate in the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMatch {
    /// Byte offset of the overall match in the sample text.
    pub start: usize,
    /// Capturing groups only; 1-based group N sits at `groups[N - 1]`.
    pub groups: Vec<Option<String>>,
}

impl SampleMatch {
    pub fn from_captures(caps: &fancy_regex::Captures<'_>) -> Self {
        Self {
            start: caps.get(0).map_or(0, |m| m.start()),
            groups: (1..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    /// Text captured by 1-based group `group_index`, if it participated.
    pub fn group(&self, group_index: usize) -> Option<&str> {
        self.groups.get(group_index.checked_sub(1)?)?.as_deref()
    }
}

/// Compile `pattern` with a JS-style flag string.
///
/// `i`, `m` and `s` become inline flags; `g`, `y` and `u` are accepted and
/// ignored (they do not change a single leftmost execution). Anything else
/// is an [`EngineError::UnknownFlag`].
pub fn compile(pattern: &str, flags: &str) -> Result<Regex, EngineError> {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'g' | 'y' | 'u' => {}
            other => return Err(EngineError::UnknownFlag(other)),
        }
    }
    let full = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };
    Regex::new(&full).map_err(EngineError::BadPattern)
}

/// Run `pattern` against `sample`, returning the leftmost match.
pub fn execute(pattern: &str, flags: &str, sample: &str) -> Result<Option<SampleMatch>, EngineError> {
    let regex = compile(pattern, flags)?;
    match regex.captures(sample) {
        Ok(Some(caps)) => Ok(Some(SampleMatch::from_captures(&caps))),
        Ok(None) => Ok(None),
        Err(e) => Err(EngineError::Runtime(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_reports_match_start_and_groups() {
        let m = execute("(b)(c)?", "", "abc").unwrap().unwrap();
        assert_eq!(m.start, 1);
        assert_eq!(m.group(1), Some("b"));
        assert_eq!(m.group(2), Some("c"));
        assert_eq!(m.group(3), None);
    }

    #[test]
    fn test_non_participating_group_is_none() {
        let m = execute("(a)|(b)", "", "b").unwrap().unwrap();
        assert_eq!(m.group(1), None);
        assert_eq!(m.group(2), Some("b"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(execute("x", "", "abc").unwrap(), None);
    }

    #[test]
    fn test_case_insensitive_flag() {
        let m = execute("(hello)", "i", "say HELLO").unwrap().unwrap();
        assert_eq!(m.start, 4);
        assert_eq!(m.group(1), Some("HELLO"));
    }

    #[test]
    fn test_ignored_flags_accepted() {
        assert!(execute("a", "gi", "a").unwrap().is_some());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(matches!(
            execute("a", "iz", "a"),
            Err(EngineError::UnknownFlag('z'))
        ));
    }

    #[test]
    fn test_bad_pattern_propagates() {
        assert!(matches!(
            execute("(a", "", "a"),
            Err(EngineError::BadPattern(_))
        ));
    }
}
