//! Tabular export of analysis results.

use serde::Serialize;

use crate::stats::Operation;

/// One analysis result row, ready for display or CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub admin_code: String,
    pub name: String,
    pub local_name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
}

/// Quote a CSV cell, doubling any embedded quotes.
pub fn quote_and_escape_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Serialize rows to CSV text. The statistic column is headed by the
/// operation name; the baseline column appears only when at least one
/// row carries a baseline value.
pub fn to_csv(rows: &[TableRow], operation: Operation) -> String {
    let with_baseline = rows.iter().any(|r| r.baseline.is_some());

    let mut header = vec!["admin_code", "name", "local_name", operation.name()];
    if with_baseline {
        header.push("baseline_value");
    }
    let mut lines = vec![header
        .iter()
        .map(|h| quote_and_escape_cell(h))
        .collect::<Vec<_>>()
        .join(",")];

    for row in rows {
        let mut cells = vec![
            quote_and_escape_cell(&row.admin_code),
            quote_and_escape_cell(&row.name),
            quote_and_escape_cell(&row.local_name),
            quote_and_escape_cell(&row.value.to_string()),
        ];
        if with_baseline {
            let baseline = row.baseline.map(|v| v.to_string()).unwrap_or_default();
            cells.push(quote_and_escape_cell(&baseline));
        }
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, name: &str, value: f64) -> TableRow {
        TableRow {
            admin_code: code.to_string(),
            name: name.to_string(),
            local_name: name.to_string(),
            value,
            baseline: None,
        }
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(quote_and_escape_cell("plain"), "\"plain\"");
        assert_eq!(quote_and_escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_without_baseline() {
        let csv = to_csv(&[row("KH01", "Banteay Meanchey", 3.5)], Operation::Mean);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"admin_code\",\"name\",\"local_name\",\"mean\""
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"KH01\",\"Banteay Meanchey\",\"Banteay Meanchey\",\"3.5\""
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_with_baseline_column() {
        let mut first = row("KH01", "A", 1.0);
        first.baseline = Some(120.0);
        let second = row("KH02", "B", 2.0);
        let csv = to_csv(&[first, second], Operation::Sum);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with("\"sum\",\"baseline_value\""));
        assert!(lines[1].ends_with("\"1\",\"120\""));
        // Rows without a baseline keep the column, empty.
        assert!(lines[2].ends_with("\"2\",\"\""));
    }
}
