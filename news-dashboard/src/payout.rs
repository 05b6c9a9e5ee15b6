use crate::rates::RateTable;
use crate::types::{AuthorAggregate, PayoutLine};
use serde::Serialize;

pub fn rate_for(author: &str, table: &RateTable) -> f64 {
    table.rate_for(author)
}

/// `article_count * rate`, unrounded. Rounding is left to whoever displays it.
pub fn payout(author: &str, article_count: usize, table: &RateTable) -> f64 {
    article_count as f64 * rate_for(author, table)
}

pub fn payout_lines(stats: &[AuthorAggregate], table: &RateTable) -> Vec<PayoutLine> {
    stats
        .iter()
        .map(|aggregate| {
            let rate = rate_for(&aggregate.name, table);
            PayoutLine {
                author: aggregate.name.clone(),
                article_count: aggregate.article_count,
                rate,
                amount: aggregate.article_count as f64 * rate,
            }
        })
        .collect()
}

/// Sum over every aggregate exactly once.
pub fn total_payout(stats: &[AuthorAggregate], table: &RateTable) -> f64 {
    stats
        .iter()
        .map(|aggregate| payout(&aggregate.name, aggregate.article_count, table))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutReport {
    pub lines: Vec<PayoutLine>,
    pub total: f64,
}

pub fn payout_report(stats: &[AuthorAggregate], table: &RateTable) -> PayoutReport {
    let lines = payout_lines(stats, table);
    let total = lines.iter().map(|line| line.amount).sum();
    PayoutReport { lines, total }
}
