//! Read-only statement guard
//!
//! Generated query text is untrusted input. Before it reaches the store it
//! must be one read statement: a single `SELECT`/`WITH` with no mutating or
//! administrative keyword outside string literals, quoted identifiers and
//! comments.
//! This is a static check on the text, not a parser; a privilege-restricted
//! query role on the store is the second line.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "TRUNCATE", "RENAME", "GRANT",
    "REVOKE", "ATTACH", "DETACH", "OPTIMIZE", "SYSTEM", "KILL", "SET", "USE", "EXCHANGE", "MOVE",
];

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("query is empty")]
    Empty,

    #[error("only a single statement is allowed")]
    MultipleStatements,

    #[error("statement must start with SELECT or WITH, found `{keyword}`")]
    NotARead { keyword: String },

    #[error("keyword `{keyword}` is not allowed in a read-only query")]
    ForbiddenKeyword { keyword: String },
}

/// Check that `sql` is a single read statement.
pub fn check_read_only(sql: &str) -> Result<(), GuardViolation> {
    let masked = mask_literals_and_comments(sql);
    let body = masked.trim();
    let body = body.strip_suffix(';').unwrap_or(body);

    if body.contains(';') {
        return Err(GuardViolation::MultipleStatements);
    }

    let first = match WORD.find(body) {
        Some(m) => m,
        None => return Err(GuardViolation::Empty),
    };

    // Only parentheses may precede the leading keyword
    let prefix = &body[..first.start()];
    if prefix.chars().any(|c| c != '(' && !c.is_whitespace()) {
        return Err(GuardViolation::NotARead {
            keyword: prefix.trim().to_string(),
        });
    }

    let first_upper = first.as_str().to_ascii_uppercase();
    if first_upper != "SELECT" && first_upper != "WITH" {
        return Err(GuardViolation::NotARead {
            keyword: first_upper,
        });
    }

    for word in WORD.find_iter(&body[first.end()..]) {
        let upper = word.as_str().to_ascii_uppercase();
        if FORBIDDEN_KEYWORDS.contains(&upper.as_str()) {
            return Err(GuardViolation::ForbiddenKeyword { keyword: upper });
        }
    }

    Ok(())
}

/// Replace string literals, quoted identifiers and comments with a single
/// space each, leaving the statement skeleton intact.
fn mask_literals_and_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                skip_quoted(&mut chars, c);
                out.push(' ');
            }
            // `--`, `#` and `#!` all run to the end of the line
            '-' if chars.peek() == Some(&'-') => {
                skip_line(&mut chars);
                out.push('\n');
            }
            '#' => {
                skip_line(&mut chars);
                out.push('\n');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    for next in chars.by_ref() {
        if next == '\n' {
            break;
        }
    }
}

/// Consume up to and including the closing `quote`. Backslash escapes and a
/// doubled quote both count as an escaped quote. Unterminated runs to the end.
fn skip_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            if chars.peek() == Some(&quote) {
                chars.next();
            } else {
                return;
            }
        }
    }
}
