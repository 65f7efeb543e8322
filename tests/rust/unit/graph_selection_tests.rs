use askdb::graph::{
    detect_graph_intent, select_graph_configuration, ChartType, GraphHint, GraphPayload,
};
use askdb::store::RowSet;
use serde_json::{json, Value};

fn rows(value: Value) -> RowSet {
    value
        .as_array()
        .expect("array of rows")
        .iter()
        .map(|row| row.as_object().cloned().expect("row object"))
        .collect()
}

#[test]
fn test_questions_without_vocabulary_never_want_a_graph() {
    let questions = [
        "show me my transactions",
        "what did I buy yesterday",
        "how many shares of AAPL do I own",
        "list my biggest holdings over time",
        "paragraphs about my account",
    ];
    for question in questions {
        assert!(!detect_graph_intent(question), "{}", question);
    }
}

#[test]
fn test_holdings_by_company() {
    let question = "bar chart of holdings by company";
    let data = rows(json!([{"company": "A", "shares": 10}, {"company": "B", "shares": 5}]));

    assert!(detect_graph_intent(question));
    let decision = select_graph_configuration(question, &data, &GraphHint::default()).unwrap();
    assert_eq!(decision.chart_type, ChartType::Bar);
    assert_eq!(decision.mapping.x_key.as_deref(), Some("company"));
    assert_eq!(decision.mapping.y_key.as_deref(), Some("shares"));
}

#[test]
fn test_portfolio_value_over_time() {
    let question = "graph my portfolio value over time";
    let data = rows(json!([
        {"date": "2024-01-01", "value": 100},
        {"date": "2024-02-01", "value": 120}
    ]));

    assert!(detect_graph_intent(question));
    let decision = select_graph_configuration(question, &data, &GraphHint::default()).unwrap();
    assert_eq!(decision.chart_type, ChartType::Line);
    assert_eq!(decision.mapping.x_key.as_deref(), Some("date"));
    assert_eq!(decision.mapping.y_key.as_deref(), Some("value"));
}

#[test]
fn test_created_at_forces_line_whatever_the_wording() {
    let data = rows(json!([
        {"category": "food", "created_at": "2024-05-01 12:00:00", "amount": 12.5},
        {"category": "rent", "created_at": "2024-05-02 09:30:00", "amount": 900}
    ]));
    for question in ["chart spending by category", "plot it", "bar chart please"] {
        let decision =
            select_graph_configuration(question, &data, &GraphHint::default()).unwrap();
        assert_eq!(decision.chart_type, ChartType::Line, "{}", question);
        assert_eq!(decision.mapping.x_key.as_deref(), Some("created_at"));
    }
}

#[test]
fn test_empty_rows_give_required_payload_with_null_axes() {
    let empty: RowSet = Vec::new();
    let decision =
        select_graph_configuration("plot my trades", &empty, &GraphHint::default()).unwrap();
    let payload = serde_json::to_value(GraphPayload::from_decision(decision, empty)).unwrap();

    assert_eq!(payload["required"], json!(true));
    assert_eq!(payload["mapping"]["xKey"], Value::Null);
    assert_eq!(payload["mapping"]["yKey"], Value::Null);
    assert_eq!(payload["template"]["type"], json!(payload["type"]));
}
