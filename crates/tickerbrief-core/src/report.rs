//! Report rendering: console table and per-ticker notification text.
//!
//! Column names and order are a display contract shared with
//! [`MetricsRecord`](crate::MetricsRecord)'s serialized field names. Absent
//! metrics render as `N/A`; numbers render with two decimals.

use crate::MetricsRecord;

/// Display columns, in rendering order.
pub const COLUMNS: [&str; 10] = [
    "Ticker", "Price", "RSI14", "Δ10d%", "Δ30d%", "Min30d", "Max30d", "Rating", "Target",
    "Target Δ%",
];

/// Render all records as a fixed-width console table.
pub fn format_table(records: &[MetricsRecord]) -> String {
    let rows: Vec<[String; 10]> = records.iter().map(cell_values).collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|name| name.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = COLUMNS
        .iter()
        .enumerate()
        .map(|(index, name)| pad(name, widths[index]))
        .collect::<Vec<_>>()
        .join(" | ");
    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![header];
    if !rows.is_empty() {
        lines.push(rule);
    }
    for row in &rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(index, cell)| pad(cell, widths[index]))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(line);
    }

    lines.join("\n")
}

/// Render one detailed notification message per ticker.
pub fn notification_messages(records: &[MetricsRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let lines = [
                format!("📈 {}", record.ticker),
                format!("• Price: {}", format_value(record.price)),
                format!("• RSI14: {}", format_rsi(record.rsi14)),
                format!("• Δ10d%: {}", format_percent(record.change_10d_pct)),
                format!("• Δ30d%: {}", format_percent(record.change_30d_pct)),
                format!("• Min30d: {}", format_value(record.min_30d)),
                format!("• Max30d: {}", format_value(record.max_30d)),
                format!("• Rating: {}", format_text(record.rating.as_deref())),
                format!("• Target: {}", format_value(record.target)),
                format!("• Target Δ%: {}", format_percent(record.target_change_pct)),
            ];
            lines.join("\n")
        })
        .collect()
}

fn cell_values(record: &MetricsRecord) -> [String; 10] {
    [
        record.ticker.to_string(),
        format_value(record.price),
        format_value(record.rsi14),
        format_value(record.change_10d_pct),
        format_value(record.change_30d_pct),
        format_value(record.min_30d),
        format_value(record.max_30d),
        format_text(record.rating.as_deref()),
        format_value(record.target),
        format_value(record.target_change_pct),
    ]
}

fn pad(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(value.chars().count());
    format!("{value}{}", " ".repeat(padding))
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => String::from("N/A"),
    }
}

fn format_text(value: Option<&str>) -> String {
    value.map_or_else(|| String::from("N/A"), str::to_owned)
}

/// Signed percent with a momentum accent for large moves.
fn format_percent(value: Option<f64>) -> String {
    let Some(change) = value else {
        return String::from("N/A");
    };

    let accent = if change >= 10.0 {
        "🚀"
    } else if change >= 5.0 {
        "🔼"
    } else if change <= -10.0 {
        "💥"
    } else if change <= -5.0 {
        "🔽"
    } else {
        ""
    };

    format!("{change:+.2}% {accent}").trim_end().to_owned()
}

/// RSI with an overbought/oversold band marker.
fn format_rsi(value: Option<f64>) -> String {
    let Some(rsi) = value else {
        return String::from("N/A");
    };

    if rsi >= 70.0 {
        format!("{rsi:.2} 🔴 (High)")
    } else if rsi <= 30.0 {
        format!("{rsi:.2} 🔵 (Low)")
    } else {
        format!("{rsi:.2} 🟢")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn record(ticker: &str) -> MetricsRecord {
        MetricsRecord {
            ticker: Symbol::parse(ticker).expect("valid symbol"),
            price: Some(187.5),
            rsi14: Some(55.123),
            change_10d_pct: Some(2.5),
            change_30d_pct: Some(-1.25),
            min_30d: Some(180.0),
            max_30d: Some(195.0),
            rating: Some(String::from("Buy")),
            target: Some(210.0),
            target_change_pct: Some(12.0),
        }
    }

    fn sparse_record(ticker: &str) -> MetricsRecord {
        MetricsRecord {
            ticker: Symbol::parse(ticker).expect("valid symbol"),
            price: Some(42.0),
            rsi14: None,
            change_10d_pct: None,
            change_30d_pct: None,
            min_30d: Some(42.0),
            max_30d: Some(42.0),
            rating: None,
            target: None,
            target_change_pct: None,
        }
    }

    #[test]
    fn table_lists_every_column_in_order() {
        let table = format_table(&[record("AAPL")]);
        let header = table.lines().next().expect("header line");

        let mut last_index = 0;
        for column in COLUMNS {
            let index = header.find(column).expect("column present in header");
            assert!(index >= last_index, "column {column} out of order");
            last_index = index;
        }
    }

    #[test]
    fn table_renders_absent_as_na() {
        let table = format_table(&[sparse_record("NEWCO")]);
        let body = table.lines().last().expect("body line");
        assert!(body.contains("NEWCO"));
        assert!(body.contains("N/A"));
        assert!(body.contains("42.00"));
    }

    #[test]
    fn empty_report_is_just_the_header() {
        let table = format_table(&[]);
        assert_eq!(table.lines().count(), 1);
    }

    #[test]
    fn table_cells_align_under_headers() {
        let table = format_table(&[record("AAPL"), sparse_record("V")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);

        let separator_positions: Vec<usize> = lines[0]
            .char_indices()
            .filter(|(_, ch)| *ch == '|')
            .map(|(index, _)| index)
            .collect();
        for line in &lines[2..] {
            let positions: Vec<usize> = line
                .char_indices()
                .filter(|(_, ch)| *ch == '|')
                .map(|(index, _)| index)
                .collect();
            assert_eq!(positions.len(), separator_positions.len());
        }
    }

    #[test]
    fn percent_accents_follow_the_thresholds() {
        assert_eq!(format_percent(Some(12.0)), "+12.00% 🚀");
        assert_eq!(format_percent(Some(10.0)), "+10.00% 🚀");
        assert_eq!(format_percent(Some(5.0)), "+5.00% 🔼");
        assert_eq!(format_percent(Some(4.99)), "+4.99%");
        assert_eq!(format_percent(Some(-4.99)), "-4.99%");
        assert_eq!(format_percent(Some(-5.0)), "-5.00% 🔽");
        assert_eq!(format_percent(Some(-10.0)), "-10.00% 💥");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn rsi_bands_follow_the_thresholds() {
        assert_eq!(format_rsi(Some(71.5)), "71.50 🔴 (High)");
        assert_eq!(format_rsi(Some(70.0)), "70.00 🔴 (High)");
        assert_eq!(format_rsi(Some(50.0)), "50.00 🟢");
        assert_eq!(format_rsi(Some(30.0)), "30.00 🔵 (Low)");
        assert_eq!(format_rsi(Some(12.3)), "12.30 🔵 (Low)");
        assert_eq!(format_rsi(None), "N/A");
    }

    #[test]
    fn messages_cover_every_field_per_ticker() {
        let messages = notification_messages(&[record("AAPL"), sparse_record("NEWCO")]);
        assert_eq!(messages.len(), 2);

        let first = &messages[0];
        assert!(first.starts_with("📈 AAPL"));
        assert_eq!(first.lines().count(), 10);
        assert!(first.contains("• Rating: Buy"));
        assert!(first.contains("• Target Δ%: +12.00% 🚀"));

        let second = &messages[1];
        assert!(second.starts_with("📈 NEWCO"));
        assert!(second.contains("• RSI14: N/A"));
    }
}
