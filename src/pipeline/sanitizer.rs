//! Deterministic cleanup of model-generated query text
//!
//! Removes code-fence markers and blank-line runs. Does not look at what the
//! query means; that is the guard's job.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Opening fence. Any tag ending its line is dropped; a known query-language
    // tag is also dropped when the query follows on the same line.
    static ref LEADING_FENCE: Regex = Regex::new(
        r"(?i)^```(?:[a-z0-9_+-]*[ \t]*\r?\n|(?:sql|clickhouse|json|mysql|postgres|postgresql|text)[ \t]+)?"
    )
    .unwrap();
    static ref TRAILING_FENCE: Regex = Regex::new(r"\r?\n?```\s*$").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// Strip fences, trim, collapse blank-line runs, trim again; repeated until
/// nothing changes so the result is a fixpoint.
pub fn sanitize_query(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_once(text: &str) -> String {
    let text = LEADING_FENCE.replace(text, "");
    let text = TRAILING_FENCE.replace(&text, "");
    let text = BLANK_LINES.replace_all(text.trim(), "\n");
    text.trim().to_string()
}
