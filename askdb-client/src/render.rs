//! Text rendering of the server's `graph` payload

use serde_json::Value;

const BAR_WIDTH: usize = 40;
const MAX_LABEL_WIDTH: usize = 20;

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(null)".to_string(),
        other => other.to_string(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_WIDTH {
        label.to_string()
    } else {
        let mut cut: String = label.chars().take(MAX_LABEL_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

/// Horizontal bar chart of `mapping.yKey` by `mapping.xKey`.
///
/// `None` when no chart was requested. A requested chart with nothing to
/// plot renders as a one-line notice. Line charts are drawn the same way, in
/// row order.
pub fn render_chart(graph: &Value) -> Option<String> {
    if graph.get("required").and_then(Value::as_bool) != Some(true) {
        return None;
    }

    let nothing_to_plot = || Some("(chart requested, but the results have nothing to plot)".to_string());

    let mapping = graph.get("mapping")?;
    let x_key = mapping.get("xKey").and_then(Value::as_str);
    let y_key = mapping.get("yKey").and_then(Value::as_str).or_else(|| {
        mapping
            .get("yKeys")
            .and_then(Value::as_array)
            .and_then(|keys| keys.first())
            .and_then(Value::as_str)
    });
    let (Some(x_key), Some(y_key)) = (x_key, y_key) else {
        return nothing_to_plot();
    };

    let points: Vec<(String, f64)> = graph
        .get("data")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let y = numeric(row.get(y_key)?)?;
                    let x = row.get(x_key).map(label_text).unwrap_or_default();
                    Some((truncate_label(&x), y))
                })
                .collect()
        })
        .unwrap_or_default();

    if points.is_empty() {
        return nothing_to_plot();
    }

    let max = points.iter().map(|(_, y)| y.abs()).fold(0.0_f64, f64::max);
    let label_width = points
        .iter()
        .map(|(x, _)| x.chars().count())
        .max()
        .unwrap_or(0);

    let chart_type = graph.get("type").and_then(Value::as_str).unwrap_or("bar");
    let mut out = format!("{} chart: {} by {}\n", chart_type, y_key, x_key);
    for (x, y) in &points {
        let len = if max > 0.0 {
            ((y.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let padding = label_width - x.chars().count();
        out.push_str(&format!(
            "{}{} | {} {}\n",
            x,
            " ".repeat(padding),
            "█".repeat(len),
            y
        ));
    }
    Some(out)
}
