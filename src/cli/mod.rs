//! CLI command handlers
//!
//! Bridges the clap argument structs with the service layer.

pub mod report;
pub mod session;

pub use report::{handle_report_command, run_report, ReportArgs, ReportRun};
pub use session::{handle_logout_command, LogoutArgs};
