//! Data fetch
//!
//! Two calls: the account summary, and the transactions between the first
//! of the month and today.

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, warn};

use crate::api::{AggregatorApi, ACCOUNTS_ENDPOINT, TRANSACTIONS_ENDPOINT};
use crate::error::PewResult;
use crate::models::{AccountsSummary, TransactionsPage};

/// Date format the API expects
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// From the first of `today`'s month through `today`
    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self { start, end: today }
    }

    /// Month to date, using the local clock
    pub fn current() -> Self {
        Self::month_to_date(Local::now().date_naive())
    }

    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Parameters for the transactions request
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub range: DateRange,
    pub rows_per_page: u32,
}

impl TransactionQuery {
    pub fn new(range: DateRange, rows_per_page: u32) -> Self {
        Self {
            range,
            rows_per_page,
        }
    }

    /// Form parameters, newest first, first page only
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sort_cols", "transactionTime".to_string()),
            ("sort_rev", "true".to_string()),
            ("page", "0".to_string()),
            ("rows_per_page", self.rows_per_page.to_string()),
            ("startDate", self.range.start_param()),
            ("endDate", self.range.end_param()),
            ("component", "DATAGRID".to_string()),
        ]
    }
}

/// Fetch the account summary
pub fn fetch_accounts<A: AggregatorApi + ?Sized>(api: &mut A) -> PewResult<AccountsSummary> {
    let summary: AccountsSummary = api
        .fetch(ACCOUNTS_ENDPOINT, &[])?
        .into_data(ACCOUNTS_ENDPOINT)?;
    debug!(accounts = summary.accounts.len(), "Fetched accounts");
    Ok(summary)
}

/// Fetch one page of transactions
pub fn fetch_transactions<A: AggregatorApi + ?Sized>(
    api: &mut A,
    query: &TransactionQuery,
) -> PewResult<TransactionsPage> {
    let params = query.params();
    let borrowed: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let page: TransactionsPage = api
        .fetch(TRANSACTIONS_ENDPOINT, &borrowed)?
        .into_data(TRANSACTIONS_ENDPOINT)?;

    debug!(
        transactions = page.transactions.len(),
        start = %page.start_date,
        end = %page.end_date,
        "Fetched transactions"
    );
    if page.transactions.len() as u64 >= u64::from(query.rows_per_page) {
        warn!(
            rows_per_page = query.rows_per_page,
            "Transaction page is full; older transactions this month were not fetched"
        );
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::error::PewError;
    use crate::models::Money;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_to_date() {
        let range = DateRange::month_to_date(date(2018, 8, 31));
        assert_eq!(range.start, date(2018, 8, 1));
        assert_eq!(range.end, date(2018, 8, 31));
        assert_eq!(range.start_param(), "2018-08-01");
        assert_eq!(range.end_param(), "2018-08-31");
    }

    #[test]
    fn test_month_to_date_on_the_first() {
        let range = DateRange::month_to_date(date(2024, 3, 1));
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn test_month_to_date_leap_day() {
        let range = DateRange::month_to_date(date(2024, 2, 29));
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
    }

    #[test]
    fn test_current_range() {
        let today = Local::now().date_naive();
        let range = DateRange::current();
        assert_eq!(range.start.day(), 1);
        assert_eq!(range.start.month(), today.month());
        assert_eq!(range.start.year(), today.year());
        assert_eq!(range.end, today);
    }

    #[test]
    fn test_transaction_params() {
        let query = TransactionQuery::new(DateRange::month_to_date(date(2018, 8, 15)), 100);
        let params = query.params();

        assert!(params.contains(&("rows_per_page", "100".to_string())));
        assert!(params.contains(&("startDate", "2018-08-01".to_string())));
        assert!(params.contains(&("endDate", "2018-08-15".to_string())));
        assert!(params.contains(&("component", "DATAGRID".to_string())));
        assert!(params.contains(&("sort_rev", "true".to_string())));
    }

    #[test]
    fn test_fetch_accounts() {
        let mut api = FakeApi::new("pw").respond(
            ACCOUNTS_ENDPOINT,
            json!({"spHeader": {"success": true}, "spData": {"networth": 1500.25, "accounts": []}}),
        );

        let summary = fetch_accounts(&mut api).unwrap();
        assert_eq!(summary.networth, Money::from_cents(150025));
    }

    #[test]
    fn test_fetch_accounts_reports_api_errors() {
        let mut api = FakeApi::new("pw").respond(
            ACCOUNTS_ENDPOINT,
            json!({"spHeader": {"success": false, "errors": [{"code": 201, "message": "Session not authenticated"}]}}),
        );

        let err = fetch_accounts(&mut api).unwrap_err();
        assert!(matches!(err, PewError::Api { .. }));
        assert!(err.to_string().contains("Session not authenticated"));
    }

    #[test]
    fn test_fetch_transactions() {
        let mut api = FakeApi::new("pw").respond(
            TRANSACTIONS_ENDPOINT,
            json!({
                "spHeader": {"success": true},
                "spData": {
                    "startDate": "2018-08-01",
                    "endDate": "2018-08-15",
                    "transactions": [{
                        "transactionDate": "2018-08-03",
                        "amount": 9.99,
                        "description": "NETFLIX.COM",
                        "accountName": "Discover Card",
                        "isSpending": true
                    }]
                }
            }),
        );
        let query = TransactionQuery::new(DateRange::month_to_date(date(2018, 8, 15)), 100);

        let page = fetch_transactions(&mut api, &query).unwrap();

        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.end_date, date(2018, 8, 15));
        let (endpoint, params) = &api.fetched[0];
        assert_eq!(endpoint, TRANSACTIONS_ENDPOINT);
        assert!(params.contains(&("startDate".to_string(), "2018-08-01".to_string())));
    }
}
