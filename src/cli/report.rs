//! The `report` command
//!
//! Load the session, log in, fetch the month so far, save the session, and
//! print the spending of every bucket.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::info;

use crate::api::{AggregatorApi, PersonalCapitalClient, TwoFactorMode};
use crate::config::{Settings, DEFAULT_SESSION_FILE};
use crate::display::{format_spending_report, format_summary_table};
use crate::error::PewResult;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::services::{
    authenticate, fetch_accounts, fetch_transactions, Credentials, DateRange, SpendingReport,
    TransactionQuery,
};
use crate::storage::SessionStore;

/// Options for the spending report
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Login email (prompted for if not set)
    #[arg(long, env = "PEW_EMAIL")]
    pub email: Option<String>,

    /// Login password (prompted for if not set)
    #[arg(long, env = "PEW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Where the session cookies are kept between runs
    #[arg(long, env = "PEW_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,

    /// How to receive the verification code, overriding the config file
    #[arg(long = "two-factor", value_enum)]
    pub two_factor: Option<TwoFactorMode>,

    /// Print a table of per-account totals after the report
    #[arg(long)]
    pub summary: bool,
}

/// What a report run needs beyond the API and the prompter
#[derive(Debug)]
pub struct ReportRun<'a> {
    pub settings: &'a Settings,
    pub store: &'a SessionStore,
    pub credentials: &'a Credentials,
    pub mode: TwoFactorMode,
    pub today: NaiveDate,
    pub summary: bool,
}

/// Handle `pew report`
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> PewResult<()> {
    let mut prompter = TerminalPrompter;
    let credentials = Credentials::resolve(args.email, args.password, &mut prompter)?;
    let store = SessionStore::new(args.session_file);
    let mut client = PersonalCapitalClient::new(
        &settings.base_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;

    let run = ReportRun {
        settings,
        store: &store,
        credentials: &credentials,
        mode: args.two_factor.unwrap_or(settings.two_factor_mode),
        today: Local::now().date_naive(),
        summary: args.summary,
    };

    let output = run_report(&mut client, &mut prompter, &run)?;
    print!("{}", output);
    Ok(())
}

/// Run the whole report against any API implementation and return the text to print
pub fn run_report<A: AggregatorApi + ?Sized>(
    api: &mut A,
    prompter: &mut dyn Prompter,
    run: &ReportRun<'_>,
) -> PewResult<String> {
    let session = run.store.load();
    api.set_session(&session)?;

    let outcome = authenticate(api, run.credentials, run.mode, prompter)?;
    info!(?outcome, "Authenticated");

    let accounts = fetch_accounts(api)?;
    let query = TransactionQuery::new(
        DateRange::month_to_date(run.today),
        run.settings.rows_per_page,
    );
    let page = fetch_transactions(api, &query)?;

    run.store.save(&api.session())?;

    let report = SpendingReport::build(&accounts, &page, &run.settings.buckets);
    let mut output = format_spending_report(&report);
    if run.summary {
        output.push_str(&format_summary_table(&report));
    }
    Ok(output)
}
