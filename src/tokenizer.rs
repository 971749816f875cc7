//! Single-pass regex tokenizer.
//!
//! Splits a regular-expression pattern into classified [`Token`]s, tracking a
//! nesting stack of open groups/classes and whether a quantifier may legally
//! follow the current position. The classification is what a host editor
//! would use for syntax colouring; the [`locator`](crate::locator) builds on
//! the nesting depths to find group spans.
//!
//! All offsets are **byte** indices into the pattern string. Patterns are a
//! single line; tokens partition the input with no gaps or overlaps.

use phf::{Set, phf_set};

/// Syntax class of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Unescaped `(` or `)` of a group.
    Bracket,
    /// Structural syntax: `?:`/`?=`/`?!`, `^`, `$`, `|`, class negation, `-` range.
    Keyword,
    /// A single matchable unit: `.`, class escapes, `\uXXXX`, `\xXX`.
    Atom,
    /// Character-class content, including the `[` and `]` delimiters.
    Number,
    /// A quantifier: `+`, `*`, `?` (with optional non-greedy `?`), `{n,m}`.
    RangeInfo,
    /// Lexical error: dangling `\`, unmatched `)`, quantifier with nothing to quantify.
    Error,
    /// Literal text with no special meaning (the unstyled class).
    Plain,
}

/// One lexical unit of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte offset where the token begins in the pattern.
    pub start: usize,
    /// The exact substring consumed.
    pub text: String,
    pub class: TokenClass,
    /// Depth of the nesting stack *after* this token (0 = top level).
    pub nesting: usize,
    /// 1-based ordinal among capturing groups, stamped on capturing `(`
    /// tokens by [`find_group_in_regex`](crate::locator::find_group_in_regex).
    pub group_ordinal: Option<usize>,
}

impl Token {
    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Escape letters that form a single-atom class escape (`\d`, `\b`, ...).
static CLASS_ESCAPES: Set<char> = phf_set! {
    'd', 'D', 'w', 'W', 's', 'S', 't', 'r', 'n', 'v', 'f', 'b', 'B', '0',
};

/// Tokenize a whole pattern.
///
/// Pure: all lexer state is local to the call. Lexical problems surface as
/// [`TokenClass::Error`] tokens and the scan continues; an unclosed group or
/// class at end of input is *not* flagged (callers needing balance must
/// check for themselves).
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        pattern,
        pos: 0,
        nesting: Vec::new(),
        quantifiable: false,
        just_opened: None,
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}

struct Lexer<'a> {
    pattern: &'a str,
    pos: usize,
    /// Stack of open scopes: `(` or `[`.
    nesting: Vec<char>,
    /// Whether the construct just consumed may be followed by a quantifier.
    quantifiable: bool,
    /// Opener consumed by the previous step, for the token right after it.
    just_opened: Option<char>,
}

impl Lexer<'_> {
    fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.pattern.len() {
            return None;
        }
        let start = self.pos;
        let class = self.step();
        Some(Token {
            start,
            text: self.pattern[start..self.pos].to_string(),
            class,
            nesting: self.nesting.len(),
            group_ordinal: None,
        })
    }

    /// Consume one lexical unit and classify it.
    fn step(&mut self) -> TokenClass {
        let new_scope = self.just_opened.take();

        // The token immediately after an opener gets special treatment:
        // `?:`/`?=`/`?!` after `(`, class negation `^` after `[`.
        match new_scope {
            Some('(') => {
                let rest = &self.pattern[self.pos..];
                if rest.starts_with("?:") || rest.starts_with("?=") || rest.starts_with("?!") {
                    self.pos += 2;
                    self.quantifiable = false;
                    return TokenClass::Keyword;
                }
            }
            Some('[') => {
                if self.eat('^') {
                    self.quantifiable = false;
                    return TokenClass::Keyword;
                }
            }
            _ => {}
        }

        let ch = match self.bump() {
            Some(ch) => ch,
            None => return TokenClass::Plain, // unreachable: caller checked pos < len
        };

        // Escapes apply everywhere, inside character classes included.
        if ch == '\\' {
            self.quantifiable = true;
            return match self.bump() {
                Some(next) if CLASS_ESCAPES.contains(&next) => TokenClass::Atom,
                Some('u') => {
                    for _ in 0..4 {
                        self.bump();
                    }
                    TokenClass::Atom
                }
                Some('x') => {
                    for _ in 0..2 {
                        self.bump();
                    }
                    TokenClass::Atom
                }
                // Pattern cannot end in a bare backslash.
                None => TokenClass::Error,
                // Any other escaped character is just a literal.
                Some(_) => TokenClass::Plain,
            };
        }
        if ch == '.' {
            self.quantifiable = true;
            return TokenClass::Atom;
        }

        let scope = self.nesting.last().copied();

        if scope == Some('[') {
            if ch == ']' {
                self.nesting.pop();
                // The overall class can be quantified. Nothing resets the
                // flag for other class content: quantifiers are not accepted
                // inside a class anyway.
                self.quantifiable = true;
            } else if ch == '-' && new_scope.is_none() {
                // Char range, unless it is the first character of the class.
                return TokenClass::Keyword;
            }
            return TokenClass::Number;
        }

        match ch {
            '(' => {
                self.nesting.push(ch);
                self.just_opened = Some(ch);
                self.quantifiable = false;
                TokenClass::Bracket
            }
            '[' => {
                self.nesting.push(ch);
                self.just_opened = Some(ch);
                self.quantifiable = false;
                TokenClass::Number
            }
            ')' => {
                // The overall group can be quantified, even when unmatched.
                self.quantifiable = true;
                if scope == Some('(') {
                    self.nesting.pop();
                    TokenClass::Bracket
                } else {
                    TokenClass::Error
                }
            }
            // Anchors. Interpreted this way even mid-pattern, which regex
            // engines accept too (useful with `|`).
            '^' | '$' => {
                self.quantifiable = false;
                TokenClass::Keyword
            }
            '+' | '*' | '?' => {
                self.eat('?'); // non-greedy marker
                self.quantifier()
            }
            '{' => {
                if self.eat_brace_quantifier() {
                    self.quantifier()
                } else {
                    // Anything other than {n}, {n,} or {n,m} makes the `{`
                    // plain text to match.
                    self.quantifiable = true;
                    TokenClass::Plain
                }
            }
            '|' => {
                self.quantifiable = false;
                TokenClass::Keyword
            }
            _ => {
                self.quantifiable = true;
                TokenClass::Plain
            }
        }
    }

    /// Classify a just-consumed quantifier against the `quantifiable` flag.
    fn quantifier(&mut self) -> TokenClass {
        if self.quantifiable {
            self.quantifiable = false;
            TokenClass::RangeInfo
        } else {
            TokenClass::Error
        }
    }

    /// Try to consume `\d+(,\d*)?}` after an already-consumed `{`.
    ///
    /// Leaves the position untouched unless the whole form is present.
    fn eat_brace_quantifier(&mut self) -> bool {
        let saved = self.pos;
        let mut digits = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            digits += 1;
        }
        if digits == 0 {
            self.pos = saved;
            return false;
        }
        if self.eat(',') {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if self.eat('}') {
            true
        } else {
            self.pos = saved;
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenClass::*;

    fn classes(pattern: &str) -> Vec<TokenClass> {
        tokenize(pattern).iter().map(|t| t.class).collect()
    }

    fn texts(pattern: &str) -> Vec<String> {
        tokenize(pattern).iter().map(|t| t.text.clone()).collect()
    }

    // --- Partition property ---

    #[test]
    fn test_tokens_partition_pattern() {
        for pattern in [
            r"a(b(c)d(e)f(g))",
            r"(a|x)(b|y)(c|z)",
            r"\d+\w*[a-z^\]]{2,5}(?:x)?",
            r"\u1234\x4fq",
            r"(ab)+|[^x-]*?",
            r"bad)stuff\",
        ] {
            let tokens = tokenize(pattern);
            let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
            assert_eq!(joined, pattern);
            let mut pos = 0;
            for t in &tokens {
                assert_eq!(t.start, pos, "gap or overlap before {:?}", t.text);
                pos = t.end();
            }
        }
    }

    // --- Escapes ---

    #[test]
    fn test_class_escape_is_atom() {
        assert_eq!(classes(r"\d"), vec![Atom]);
        assert_eq!(classes(r"\B"), vec![Atom]);
    }

    #[test]
    fn test_unicode_escape_consumes_four_hex() {
        assert_eq!(texts(r"\u0041x"), vec![r"\u0041", "x"]);
        assert_eq!(classes(r"\u0041x"), vec![Atom, Plain]);
    }

    #[test]
    fn test_hex_escape_consumes_two() {
        assert_eq!(texts(r"\x41b"), vec![r"\x41", "b"]);
    }

    #[test]
    fn test_dangling_escape_is_error() {
        assert_eq!(classes("a\\"), vec![Plain, Error]);
    }

    #[test]
    fn test_escaped_literal_is_plain_and_quantifiable() {
        assert_eq!(classes(r"\(+"), vec![Plain, RangeInfo]);
    }

    // --- Groups and classes ---

    #[test]
    fn test_group_brackets_and_nesting() {
        let tokens = tokenize("(a(b))");
        assert_eq!(tokens[0].class, Bracket);
        assert_eq!(tokens[0].nesting, 1);
        assert_eq!(tokens[2].nesting, 2); // inner (
        assert_eq!(tokens[4].nesting, 1); // inner )
        assert_eq!(tokens[5].nesting, 0); // outer )
    }

    #[test]
    fn test_non_capturing_marker_is_one_keyword_token() {
        assert_eq!(texts("(?:a)"), vec!["(", "?:", "a", ")"]);
        assert_eq!(classes("(?:a)"), vec![Bracket, Keyword, Plain, Bracket]);
        assert_eq!(classes("(?=a)")[1], Keyword);
        assert_eq!(classes("(?!a)")[1], Keyword);
    }

    #[test]
    fn test_unmatched_close_paren_is_error() {
        assert_eq!(classes("a)"), vec![Plain, Error]);
    }

    #[test]
    fn test_char_class_content() {
        // [ and ] are class-content style; interior chars too.
        assert_eq!(classes("[ab]"), vec![Number, Number, Number, Number]);
    }

    #[test]
    fn test_char_class_negation_keyword() {
        let tokens = tokenize("[^a]");
        assert_eq!(tokens[1].text, "^");
        assert_eq!(tokens[1].class, Keyword);
    }

    #[test]
    fn test_char_class_range_keyword() {
        assert_eq!(classes("[a-z]"), vec![Number, Number, Keyword, Number, Number]);
    }

    #[test]
    fn test_leading_dash_in_class_is_content() {
        // `-` directly after `[` is not a range operator. (After `[^` it is
        // classified as one: only the token immediately following the opener
        // gets the first-position exemption.)
        assert_eq!(classes("[-a]")[1], Number);
        assert_eq!(classes("[^-a]")[2], Keyword);
    }

    #[test]
    fn test_escape_inside_class_is_atom() {
        assert_eq!(classes(r"[\d]"), vec![Number, Atom, Number]);
    }

    #[test]
    fn test_stray_close_bracket_is_plain() {
        // A `]` outside any class is ordinary text.
        assert_eq!(classes("a]"), vec![Plain, Plain]);
    }

    #[test]
    fn test_class_is_quantifiable() {
        assert_eq!(classes("[ab]+"), vec![Number, Number, Number, Number, RangeInfo]);
    }

    // --- Quantifiers ---

    #[test]
    fn test_quantifier_after_atom() {
        assert_eq!(classes("a+"), vec![Plain, RangeInfo]);
        assert_eq!(classes(".*"), vec![Atom, RangeInfo]);
    }

    #[test]
    fn test_non_greedy_marker_same_token() {
        assert_eq!(texts("a+?b"), vec!["a", "+?", "b"]);
        assert_eq!(classes("a*?"), vec![Plain, RangeInfo]);
    }

    #[test]
    fn test_quantifier_with_nothing_to_quantify() {
        assert_eq!(classes("+a"), vec![Error, Plain]);
        assert_eq!(classes("(+)"), vec![Bracket, Error, Bracket]);
        assert_eq!(classes("a++"), vec![Plain, RangeInfo, Error]);
    }

    #[test]
    fn test_brace_quantifier_forms() {
        assert_eq!(texts("a{2}"), vec!["a", "{2}"]);
        assert_eq!(texts("a{2,}"), vec!["a", "{2,}"]);
        assert_eq!(texts("a{2,5}"), vec!["a", "{2,5}"]);
        assert_eq!(classes("a{2,5}"), vec![Plain, RangeInfo]);
    }

    #[test]
    fn test_brace_not_a_quantifier_is_plain() {
        assert_eq!(classes("a{x}"), vec![Plain, Plain, Plain, Plain]);
        assert_eq!(texts("a{2"), vec!["a", "{", "2"]);
    }

    #[test]
    fn test_group_is_quantifiable() {
        assert_eq!(classes("(a)?"), vec![Bracket, Plain, Bracket, RangeInfo]);
    }

    // --- Anchors and alternation ---

    #[test]
    fn test_anchors_are_keywords() {
        assert_eq!(classes("^a$"), vec![Keyword, Plain, Keyword]);
    }

    #[test]
    fn test_anchor_not_quantifiable() {
        assert_eq!(classes("^*"), vec![Keyword, Error]);
    }

    #[test]
    fn test_alternation_keyword() {
        assert_eq!(classes("a|b"), vec![Plain, Keyword, Plain]);
        assert_eq!(classes("a|+"), vec![Plain, Keyword, Error]);
    }

    // --- Termination ---

    #[test]
    fn test_empty_pattern_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_unclosed_group_not_flagged() {
        // Balance checking is the caller's business.
        assert_eq!(classes("(ab"), vec![Bracket, Plain, Plain]);
    }

    #[test]
    fn test_idempotent() {
        let pattern = r"(a|x)[b-d]+\w{1,3}$";
        assert_eq!(tokenize(pattern), tokenize(pattern));
    }
}
