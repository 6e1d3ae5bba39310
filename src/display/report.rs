//! Spending report formatting for terminal output

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;
use crate::services::{BucketReport, SpendingReport};

/// Width of the rule printed around bucket titles
pub const RULE_WIDTH: usize = 79;

/// A title between two dashed rules
pub fn format_header(title: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!("{}\n{}\n{}\n", rule, title, rule)
}

/// `date,amount,merchant` (or the description when there is no merchant)
pub fn format_expense_line(txn: &Transaction) -> String {
    format!(
        "{},{},{}",
        txn.transaction_date.format("%Y-%m-%d"),
        txn.amount,
        txn.payee()
    )
}

pub fn format_bucket(report: &BucketReport<'_>) -> String {
    let mut output = format_header(&report.bucket.title);
    for txn in &report.transactions {
        output.push_str(&format_expense_line(txn));
        output.push('\n');
    }
    output
}

/// The full report: net worth, date range, then every bucket
pub fn format_spending_report(report: &SpendingReport<'_>) -> String {
    let mut output = String::new();
    output.push_str(&format!("Networth: {}\n", report.networth));
    output.push_str(&format!(
        "The transaction details between {} and {}\n",
        report.page.start_date.format("%Y-%m-%d"),
        report.page.end_date.format("%Y-%m-%d")
    ));
    for bucket in &report.buckets {
        output.push_str(&format_bucket(bucket));
    }
    output
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Account")]
    title: String,
    #[tabled(rename = "Transactions")]
    count: usize,
    #[tabled(rename = "Spent")]
    total: String,
}

/// Per-bucket totals as a table
pub fn format_summary_table(report: &SpendingReport<'_>) -> String {
    let rows: Vec<SummaryRow> = report
        .buckets
        .iter()
        .map(|b| SummaryRow {
            title: b.bucket.title.clone(),
            count: b.transactions.len(),
            total: b.total().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
