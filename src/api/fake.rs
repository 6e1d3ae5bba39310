//! In-memory stand-in for the aggregation service. Test helper.

use std::collections::HashMap;

use serde_json::Value;

use super::response::ApiResponse;
use super::{AggregatorApi, TwoFactorMode};
use crate::error::{PewError, PewResult};
use crate::models::Session;

#[derive(Debug, Default)]
pub struct FakeApi {
    /// Whether `login` should ask for a second factor
    pub remembered: bool,
    /// The code `two_factor_authenticate` accepts
    pub expected_code: String,
    pub password: String,
    /// Canned bodies per endpoint
    pub responses: HashMap<String, Value>,
    /// Every call, in order
    pub calls: Vec<String>,
    /// Params of every `fetch`, in order
    pub fetched: Vec<(String, Vec<(String, String)>)>,
    pub cookies: Session,
}

impl FakeApi {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            expected_code: "123456".to_string(),
            ..Self::default()
        }
    }

    pub fn respond(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(endpoint.to_string(), body);
        self
    }

    fn check_password(&self, password: &str) -> PewResult<()> {
        if password == self.password {
            Ok(())
        } else {
            Err(PewError::LoginFailed("Incorrect password".into()))
        }
    }
}

impl AggregatorApi for FakeApi {
    fn login(&mut self, email: &str, password: &str) -> PewResult<()> {
        self.calls.push(format!("login:{}", email));
        if !self.remembered {
            return Err(PewError::TwoFactorRequired);
        }
        self.authenticate_password(password)
    }

    fn two_factor_challenge(&mut self, mode: TwoFactorMode) -> PewResult<()> {
        self.calls.push(format!("challenge:{}", mode));
        Ok(())
    }

    fn two_factor_authenticate(&mut self, mode: TwoFactorMode, code: &str) -> PewResult<()> {
        self.calls.push(format!("verify:{}:{}", mode, code));
        if code != self.expected_code {
            return Err(PewError::LoginFailed("Invalid code".into()));
        }
        self.remembered = true;
        Ok(())
    }

    fn authenticate_password(&mut self, password: &str) -> PewResult<()> {
        self.calls.push("password".to_string());
        self.check_password(password)?;
        self.cookies.insert("JSESSIONID", "fake-session");
        Ok(())
    }

    fn fetch(&mut self, endpoint: &str, params: &[(&str, &str)]) -> PewResult<ApiResponse> {
        self.calls.push(format!("fetch:{}", endpoint));
        self.fetched.push((
            endpoint.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        let body = self
            .responses
            .get(endpoint)
            .cloned()
            .ok_or_else(|| PewError::Http(format!("404 for {}", endpoint)))?;
        ApiResponse::from_value(endpoint, body)
    }

    fn session(&self) -> Session {
        self.cookies.clone()
    }

    fn set_session(&mut self, session: &Session) -> PewResult<()> {
        self.cookies = session.clone();
        Ok(())
    }
}
