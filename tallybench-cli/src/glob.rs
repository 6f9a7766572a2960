//! Glob Patterns
//!
//! Benchmark names are `/`-separated paths, so globs follow path semantics:
//!
//! | syntax    | matches                                   |
//! |-----------|-------------------------------------------|
//! | `*`       | any run of characters except `/`          |
//! | `**`      | any run of characters, `/` included       |
//! | `?`       | exactly one character except `/`          |
//! | `[abc]`   | one character from the set                |
//! | `[a-z]`   | one character from the range              |
//! | `[!a-z]`  | one character not in the set (`^` also negates) |
//! | `\c`      | the character `c` literally               |
//!
//! A pattern is compiled once into an anchored [`Regex`].

use regex::Regex;
use thiserror::Error;

/// Why a glob failed to compile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
    /// `[` without a closing `]`
    #[error("unclosed character class in glob '{pattern}'")]
    UnclosedClass {
        /// Offending pattern
        pattern: String,
    },
    /// `\` as the final character
    #[error("dangling escape at end of glob '{pattern}'")]
    DanglingEscape {
        /// Offending pattern
        pattern: String,
    },
    /// The translated expression was rejected (e.g. a reversed range `[z-a]`)
    #[error("invalid glob '{pattern}': {message}")]
    Invalid {
        /// Offending pattern
        pattern: String,
        /// Regex engine message
        message: String,
    },
}

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compile `pattern`
    pub fn new(pattern: &str) -> Result<Self, GlobError> {
        let source = translate(pattern)?;
        let regex = Regex::new(&source).map_err(|e| GlobError::Invalid {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Whether the whole of `name` matches
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Source pattern
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

/// Translate a glob into an anchored regular expression
fn translate(pattern: &str) -> Result<String, GlobError> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut out, escaped),
                None => {
                    return Err(GlobError::DanglingEscape {
                        pattern: pattern.to_string(),
                    });
                }
            },
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    out.push('^');
                }

                let mut members = 0usize;
                let mut closed = false;
                while let Some(m) = chars.next() {
                    match m {
                        // A leading `]` is a member, not the terminator
                        ']' if members > 0 => {
                            closed = true;
                            break;
                        }
                        '-' if members > 0 && chars.peek().is_some_and(|&n| n != ']') => {
                            out.push('-');
                        }
                        '\\' => match chars.next() {
                            Some(escaped) => {
                                push_class_literal(&mut out, escaped);
                                members += 1;
                            }
                            None => {
                                return Err(GlobError::DanglingEscape {
                                    pattern: pattern.to_string(),
                                });
                            }
                        },
                        other => {
                            push_class_literal(&mut out, other);
                            members += 1;
                        }
                    }
                }

                if !closed {
                    return Err(GlobError::UnclosedClass {
                        pattern: pattern.to_string(),
                    });
                }
                out.push(']');
            }
            other => push_literal(&mut out, other),
        }
    }

    out.push('$');
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, '\\' | ']' | '[' | '^' | '-' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, name: &str) -> bool {
        Glob::new(pattern).unwrap().is_match(name)
    }

    #[test]
    fn test_literal() {
        assert!(matches("sort/small", "sort/small"));
        assert!(!matches("sort/small", "sort/smaller"));
        assert!(!matches("sort", "sort/small"));
        assert!(matches("a.b+c", "a.b+c"));
        assert!(!matches("a.b", "axb"));
    }

    #[test]
    fn test_star_stops_at_separator() {
        assert!(matches("sort/*", "sort/small"));
        assert!(!matches("sort/*", "sort/small/sorted"));
        assert!(matches("*/small", "sort/small"));
        assert!(matches("sort*", "sort"));
    }

    #[test]
    fn test_double_star_crosses_separators() {
        assert!(matches("sort/**", "sort/small/sorted"));
        assert!(matches("**/sorted", "sort/small/sorted"));
        assert!(matches("**", ""));
    }

    #[test]
    fn test_question_mark() {
        assert!(matches("fib/?", "fib/5"));
        assert!(!matches("fib/?", "fib/10"));
        assert!(!matches("a?b", "a/b"));
    }

    #[test]
    fn test_classes() {
        assert!(matches("fib/[0-9]", "fib/7"));
        assert!(!matches("fib/[0-9]", "fib/x"));
        assert!(matches("fib/[!0-9]", "fib/x"));
        assert!(matches("fib/[^0-9]", "fib/x"));
        assert!(!matches("fib/[!0-9]", "fib/3"));
        assert!(matches("[]a]", "]"));
        assert!(matches("[a-]", "-"));
        assert!(matches("[a^]", "^"));
    }

    #[test]
    fn test_escapes() {
        assert!(matches(r"what\?", "what?"));
        assert!(!matches(r"what\?", "whatx"));
        assert!(matches(r"\*", "*"));
        assert!(matches(r"[\]]", "]"));
    }

    #[test]
    fn test_malformed_patterns() {
        assert!(matches!(
            Glob::new("sort/[a-z"),
            Err(GlobError::UnclosedClass { .. })
        ));
        assert!(matches!(Glob::new("["), Err(GlobError::UnclosedClass { .. })));
        assert!(matches!(Glob::new("abc\\"), Err(GlobError::DanglingEscape { .. })));
        assert!(matches!(Glob::new("[z-a]"), Err(GlobError::Invalid { .. })));
    }

    #[test]
    fn test_error_names_pattern() {
        let err = Glob::new("bad[").unwrap_err();
        assert_eq!(err.to_string(), "unclosed character class in glob 'bad['");
    }
}
