//! Personal Capital API access
//!
//! The login and data calls used by pew sit behind [`AggregatorApi`] so that
//! the authentication flow and the fetchers can run against anything that
//! speaks the same conversation, including an in-memory fake in tests.

pub mod client;
#[cfg(test)]
pub mod fake;
pub mod response;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PewResult;
use crate::models::Session;

pub use client::PersonalCapitalClient;
pub use response::{ApiResponse, SpHeader};

/// Endpoint for the account summary
pub const ACCOUNTS_ENDPOINT: &str = "/newaccount/getAccounts";

/// Endpoint for the transaction list
pub const TRANSACTIONS_ENDPOINT: &str = "/transaction/getUserTransactions";

/// How the service delivers the second-factor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TwoFactorMode {
    /// Text message to the phone on file
    #[default]
    Sms,
    /// Email to the login address
    Email,
}

impl fmt::Display for TwoFactorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sms => write!(f, "sms"),
            Self::Email => write!(f, "email"),
        }
    }
}

/// The conversation pew needs with the aggregation service
pub trait AggregatorApi {
    /// Identify the user and, if the device is remembered, check the password
    ///
    /// Returns [`crate::PewError::TwoFactorRequired`] when the service wants a
    /// second factor first.
    fn login(&mut self, email: &str, password: &str) -> PewResult<()>;

    /// Ask the service to send a verification code
    fn two_factor_challenge(&mut self, mode: TwoFactorMode) -> PewResult<()>;

    /// Submit the verification code the user received
    fn two_factor_authenticate(&mut self, mode: TwoFactorMode, code: &str) -> PewResult<()>;

    /// Check the password once the device has been verified
    fn authenticate_password(&mut self, password: &str) -> PewResult<()>;

    /// Post to a data endpoint with extra form parameters
    fn fetch(&mut self, endpoint: &str, params: &[(&str, &str)]) -> PewResult<ApiResponse>;

    /// Snapshot of the current cookies
    fn session(&self) -> Session;

    /// Replace the current cookies
    fn set_session(&mut self, session: &Session) -> PewResult<()>;
}
