//! Generated query text: sanitizing and the read-only guard working together

use askdb::pipeline::{check_read_only, sanitize_query, GuardViolation};
use askdb::utils::json_extract::{extract_json_object, parse_json_content};

#[test]
fn test_sanitize_is_idempotent_over_assorted_model_output() {
    let samples = [
        "```sql\nSELECT *\nFROM transactions\n\n\nWHERE user_id = '1'\n```",
        "```SQL\n\n```\n",
        "   SELECT 1   ",
        "```\r\nSELECT 1\r\n```",
        "Here is your query:\n```sql\nSELECT 1\n```",
        "\n\n\n",
        "```",
        "``````",
    ];
    for sample in samples {
        let once = sanitize_query(sample);
        assert_eq!(sanitize_query(&once), once, "not idempotent for {:?}", sample);
    }
}

#[test]
fn test_fenced_select_passes_guard_after_sanitizing() {
    let raw = "```sql\nSELECT symbol, sum(quantity) AS qty\nFROM holdings\n\nWHERE user_id = '42'\nGROUP BY symbol;\n```";
    let sql = sanitize_query(raw);
    assert_eq!(
        sql,
        "SELECT symbol, sum(quantity) AS qty\nFROM holdings\nWHERE user_id = '42'\nGROUP BY symbol;"
    );
    assert_eq!(check_read_only(&sql), Ok(()));
}

#[test]
fn test_guard_rejections() {
    assert!(check_read_only(&sanitize_query("```sql\nDELETE FROM t\n```")).is_err());
    assert_eq!(
        check_read_only("SELECT 1; DROP TABLE t"),
        Err(GuardViolation::MultipleStatements)
    );
    assert_eq!(
        check_read_only("SELECT * FROM t WHERE user_id = 'x; DROP'"),
        Ok(())
    );
    assert_eq!(
        check_read_only("select * from t where x = 1 /* ; */ -- ;"),
        Ok(())
    );
    assert!(matches!(
        check_read_only("WITH a AS (SELECT 1) ALTER TABLE t DELETE WHERE 1"),
        Err(GuardViolation::ForbiddenKeyword { .. })
    ));
}

#[test]
fn test_json_extraction_contract() {
    assert_eq!(
        extract_json_object(r#"noise {"a": {"b": 1}} trailing"#),
        Some(r#"{"a": {"b": 1}}"#)
    );
    assert_eq!(extract_json_object(r#"noise {"a": {"b": 1} trailing"#), None);
    assert_eq!(
        parse_json_content("```json\n{\"type\": \"line\"}\n```").unwrap()["type"],
        "line"
    );
    assert!(parse_json_content("no json here").is_none());
}
