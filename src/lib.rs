//! pew - month-to-date card spending from Personal Capital
//!
//! Logs in to the Personal Capital aggregation API, pulls the account summary
//! and this month's transactions, and prints the spending of each known card
//! account. Session cookies are saved between runs so the service keeps
//! treating this machine as a remembered device.
//!
//! # Architecture
//!
//! - `api`: the service conversation, behind the `AggregatorApi` trait
//! - `cli`: command handlers
//! - `config`: paths and settings
//! - `display`: terminal formatting
//! - `error`: custom error types
//! - `logging`: tracing subscriber setup
//! - `models`: accounts, transactions, money, session cookies, buckets
//! - `prompt`: interactive input
//! - `services`: credentials, login flow, data fetch, bucketing
//! - `storage`: session file persistence
//!
//! # Example
//!
//! ```rust,ignore
//! use pew::config::{PewPaths, Settings};
//!
//! let paths = PewPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod services;
pub mod storage;

pub use error::{PewError, PewResult};
