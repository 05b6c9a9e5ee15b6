use crate::types::{DashboardError, PayoutLine, Result};
use std::path::Path;
use tracing::info;

pub const CSV_HEADER: [&str; 4] = ["Author", "Articles", "Rate", "Payout"];

/// A payout row as read back from CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutRecord {
    pub author: String,
    pub article_count: usize,
    pub rate: f64,
    pub payout: f64,
}

/// One row per line, money with two decimals.
pub fn to_csv(lines: &[PayoutLine]) -> String {
    let mut csv = CSV_HEADER.join(",");
    csv.push('\n');

    for line in lines {
        csv.push_str(&escape_field(&line.author));
        csv.push(',');
        csv.push_str(&line.article_count.to_string());
        csv.push(',');
        csv.push_str(&format!("{:.2}", line.rate));
        csv.push(',');
        csv.push_str(&format!("{:.2}", line.amount));
        csv.push('\n');
    }

    csv
}

pub fn write_csv(path: impl AsRef<Path>, lines: &[PayoutLine]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_csv(lines))?;
    info!("Exported {} payout rows to {}", lines.len(), path.display());
    Ok(())
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn parse_csv(text: &str) -> Result<Vec<PayoutRecord>> {
    let mut rows = split_records(text)?.into_iter();

    match rows.next() {
        Some((_, header)) if header == CSV_HEADER => {}
        Some((line, header)) => {
            return Err(DashboardError::Csv {
                line,
                reason: format!("unexpected header {:?}", header),
            })
        }
        None => {
            return Err(DashboardError::Csv {
                line: 1,
                reason: "empty input".to_string(),
            })
        }
    }

    rows.map(|(line, fields)| parse_record(line, fields)).collect()
}

fn parse_record(line: usize, fields: Vec<String>) -> Result<PayoutRecord> {
    let [author, articles, rate, payout]: [String; 4] =
        fields.try_into().map_err(|fields: Vec<String>| DashboardError::Csv {
            line,
            reason: format!("expected 4 fields, found {}", fields.len()),
        })?;

    let bad = |column: &str, value: &str| DashboardError::Csv {
        line,
        reason: format!("invalid {column} value {value:?}"),
    };

    Ok(PayoutRecord {
        article_count: articles.parse().map_err(|_| bad("Articles", &articles))?,
        rate: rate.parse().map_err(|_| bad("Rate", &rate))?,
        payout: payout.parse().map_err(|_| bad("Payout", &payout))?,
        author,
    })
}

// Quoted fields may span lines; each record carries the line it started on.
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            '\n' => {
                field.push(c);
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DashboardError::Csv {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}
