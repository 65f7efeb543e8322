//! Properties over generated inputs: sanitizer fixpoint and fence handling,
//! comment masking in the read-only guard, chart intent vocabulary.

use askdb::graph::detect_graph_intent;
use askdb::pipeline::{check_read_only, sanitize_query, GuardViolation};
use proptest::prelude::*;

/// Words that never signal a chart request, including near misses of the
/// vocabulary that must not match on a word boundary.
const PLAIN_WORDS: &[&str] = &[
    "show", "me", "my", "total", "spending", "by", "company", "how", "much", "did", "i", "spend",
    "on", "groceries", "last", "month", "holdings", "transactions", "over", "time", "trend",
    "list", "average", "price", "photograph", "paragraph", "charter", "plotted", "graphs",
];

const CHART_WORDS: &[&str] = &["graph", "chart", "plot", "visualize", "visualise"];

const FENCE_TAGS: &[&str] = &["sql", "SQL", "Sql", "clickhouse", "json", ""];
const TAG_SEPARATORS: &[&str] = &[" ", "\t", "\n", "  ", "\r\n"];
const COMMENT_MARKERS: &[&str] = &["#", "# ", "#!", "--"];

fn question() -> impl Strategy<Value = String> {
    prop::collection::vec((prop::sample::select(PLAIN_WORDS), any::<bool>()), 1..12).prop_map(
        |words| {
            words
                .into_iter()
                .map(|(word, shout)| {
                    if shout {
                        word.to_uppercase()
                    } else {
                        word.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        },
    )
}

/// Arbitrary text made of fence markers, line breaks and query-ish fragments
fn fenced_text() -> impl Strategy<Value = String> {
    let part = prop_oneof![
        Just("```".to_string()),
        Just("```sql".to_string()),
        Just("```SQL ".to_string()),
        Just("```clickhouse\n".to_string()),
        Just("\n".to_string()),
        Just("\r\n".to_string()),
        Just("\n \n".to_string()),
        Just(" ".to_string()),
        "[a-zA-Z0-9_ ;'*(),=]{0,12}",
    ];
    prop::collection::vec(part, 0..16).prop_map(|parts| parts.concat())
}

fn fence_tag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(FENCE_TAGS)
}

fn tag_separator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(TAG_SEPARATORS)
}

fn read_query() -> impl Strategy<Value = String> {
    ("col_[a-z]{1,8}", "tbl_[a-z]{1,8}")
        .prop_map(|(column, table)| format!("SELECT {column} FROM {table}"))
}

fn comment_marker() -> impl Strategy<Value = &'static str> {
    prop::sample::select(COMMENT_MARKERS)
}

proptest! {
    #[test]
    fn sanitize_is_a_fixpoint(raw in fenced_text()) {
        let once = sanitize_query(&raw);
        prop_assert_eq!(sanitize_query(&once), once);
    }

    #[test]
    fn sanitized_text_has_no_outer_fence_or_blank_line(raw in fenced_text()) {
        let clean = sanitize_query(&raw);
        prop_assert!(!clean.starts_with("```"), "leading fence in {:?}", clean);
        prop_assert!(!clean.ends_with("```"), "trailing fence in {:?}", clean);
        prop_assert!(!clean.contains("\n\n"), "blank line in {:?}", clean);
        prop_assert_eq!(clean.trim(), clean.as_str());
    }

    #[test]
    fn tagged_fence_yields_a_runnable_read(
        tag in fence_tag(),
        separator in tag_separator(),
        query in read_query()
    ) {
        let clean = sanitize_query(&format!("```{tag}{separator}{query}```"));
        prop_assert_eq!(&clean, &query);
        prop_assert_eq!(check_read_only(&clean), Ok(()));
    }

    #[test]
    fn line_comment_never_hides_a_second_statement(
        marker in comment_marker(),
        comment in "[^\n]{0,30}"
    ) {
        let sql = format!("SELECT 1 {marker}{comment}\n; DROP TABLE transactions");
        prop_assert_eq!(check_read_only(&sql), Err(GuardViolation::MultipleStatements));
    }

    #[test]
    fn line_comment_never_hides_a_mutation(
        marker in comment_marker(),
        comment in "[^\n]{0,30}"
    ) {
        let sql = format!("SELECT 1 {marker}{comment}\nINSERT INTO t VALUES (1)");
        prop_assert_eq!(
            check_read_only(&sql),
            Err(GuardViolation::ForbiddenKeyword { keyword: "INSERT".to_string() })
        );
    }

    #[test]
    fn no_chart_vocabulary_means_no_graph_intent(question in question()) {
        prop_assert!(!detect_graph_intent(&question), "matched {:?}", question);
    }

    #[test]
    fn chart_word_anywhere_means_graph_intent(
        question in question(),
        word in prop::sample::select(CHART_WORDS),
        at in any::<prop::sample::Index>()
    ) {
        let mut words: Vec<&str> = question.split(' ').collect();
        let position = at.index(words.len() + 1);
        words.insert(position, word);
        let asked = words.join(" ");
        prop_assert!(detect_graph_intent(&asked), "missed {:?}", asked);
    }
}
