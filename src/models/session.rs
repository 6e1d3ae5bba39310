//! Session cookies
//!
//! A session is nothing more than the cookie jar of the last successful run,
//! flattened to name/value pairs so it can be written to disk.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Cookie name to cookie value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

/// Accepts any JSON object; numbers and booleans become their text form,
/// nulls and nested values are skipped.
impl<'de> Deserialize<'de> for Session {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut session = Session::new();
        for (name, value) in raw {
            match value {
                Value::String(s) => session.insert(name, s),
                Value::Number(n) => session.insert(name, n.to_string()),
                Value::Bool(b) => session.insert(name, b.to_string()),
                _ => warn!(cookie = %name, "Skipping session cookie without a scalar value"),
            }
        }
        Ok(session)
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cookie, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterate over cookies in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a `Cookie` request header value (`a=1; b=2`)
    ///
    /// Pairs without an `=` are skipped.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut session = Self::new();
        for pair in header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if !name.is_empty() {
                    session.insert(name, value);
                }
            }
        }
        session
    }
}
