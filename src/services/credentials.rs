//! Login credentials
//!
//! Credentials come from the command line or the `PEW_EMAIL` / `PEW_PASSWORD`
//! environment variables. Anything missing is asked for interactively.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::PewResult;
use crate::prompt::Prompter;

const ENV_HINT: &str = "You can set the environment variables for PEW_EMAIL and PEW_PASSWORD \
                        so the prompts don't come up every time";

/// Email and password for one login. The password is wiped on drop.
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Fill in whatever was not supplied by prompting for it
    ///
    /// Empty values count as missing.
    pub fn resolve(
        email: Option<String>,
        password: Option<String>,
        prompter: &mut dyn Prompter,
    ) -> PewResult<Self> {
        let email = match email.filter(|e| !e.trim().is_empty()) {
            Some(email) => email,
            None => {
                prompter.notice(ENV_HINT);
                prompter.read_line("Enter email:")?.trim().to_string()
            }
        };

        let password = match password.filter(|p| !p.is_empty()) {
            Some(password) => Zeroizing::new(password),
            None => Zeroizing::new(prompter.read_secret("Enter password:")?),
        };

        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
