//! Authentication flow
//!
//! Try the password straight away. If the service does not recognize the
//! device it asks for a second factor: request a code, read it from the
//! user, submit it, then send the password again.

use tracing::info;

use super::credentials::Credentials;
use crate::api::{AggregatorApi, TwoFactorMode};
use crate::error::{PewError, PewResult};
use crate::prompt::Prompter;

/// How the login went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The saved session was still trusted
    Remembered,
    /// A second factor was needed and accepted
    Verified,
}

/// Log in, falling back to interactive two-factor verification
///
/// Only [`PewError::TwoFactorRequired`] is handled. Every other failure is
/// returned as is.
pub fn authenticate<A: AggregatorApi + ?Sized>(
    api: &mut A,
    credentials: &Credentials,
    mode: TwoFactorMode,
    prompter: &mut dyn Prompter,
) -> PewResult<AuthOutcome> {
    match api.login(credentials.email(), credentials.password()) {
        Ok(()) => {
            info!("Logged in with remembered device");
            Ok(AuthOutcome::Remembered)
        }
        Err(PewError::TwoFactorRequired) => {
            info!(%mode, "Two-factor verification required");
            api.two_factor_challenge(mode)?;
            let code = prompter.read_line("code: ")?;
            api.two_factor_authenticate(mode, code.trim())?;
            api.authenticate_password(credentials.password())?;
            Ok(AuthOutcome::Verified)
        }
        Err(e) => Err(e),
    }
}
