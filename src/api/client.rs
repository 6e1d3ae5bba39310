//! Blocking HTTP client for Personal Capital
//!
//! Every call is a form-encoded POST under `<base>/api`. The service hands
//! out a CSRF token on the home page, swaps it for a session token during
//! user identification, and expects that token on every later request.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::response::ApiResponse;
use super::{AggregatorApi, TwoFactorMode};
use crate::error::{PewError, PewResult};
use crate::models::Session;

const API_CLIENT: &str = "WEB";
const CHALLENGE_REASON: &str = "DEVICE_AUTH";
const CHALLENGE_METHOD: &str = "OP";

fn csrf_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"globals\.csrf='([a-f0-9-]+)'").expect("valid csrf regex"))
}

/// Pull the initial CSRF token out of the home page markup
pub fn extract_csrf(html: &str) -> Option<String> {
    csrf_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Talks to the real service over HTTPS
pub struct PersonalCapitalClient {
    base_url: Url,
    timeout: Duration,
    jar: Arc<Jar>,
    http: Client,
    csrf: String,
}

impl PersonalCapitalClient {
    /// Create a client rooted at `base_url` with an empty cookie jar
    pub fn new(base_url: &str, timeout: Duration) -> PewResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PewError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let http = build_http(&jar, timeout)?;

        Ok(Self {
            base_url,
            timeout,
            jar,
            http,
            csrf: String::new(),
        })
    }

    fn api_url(&self, endpoint: &str) -> PewResult<Url> {
        let raw = format!(
            "{}/api{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint
        );
        Url::parse(&raw).map_err(|e| PewError::Config(format!("Invalid endpoint '{}': {}", raw, e)))
    }

    fn post(&self, endpoint: &str, form: &[(&str, &str)]) -> PewResult<ApiResponse> {
        let url = self.api_url(endpoint)?;
        debug!(endpoint, "POST");

        let response = self.http.post(url).form(form).send()?.error_for_status()?;
        let body: Value = response.json()?;
        ApiResponse::from_value(endpoint, body)
    }

    /// Post and turn a reported error into a login failure
    fn post_auth_step(&self, endpoint: &str, form: &[(&str, &str)]) -> PewResult<ApiResponse> {
        let response = self.post(endpoint, form)?;
        if let Some(message) = response.sp_header.error_message() {
            return Err(PewError::LoginFailed(message));
        }
        Ok(response)
    }

    fn csrf_from_home_page(&self) -> PewResult<Option<String>> {
        let html = self
            .http
            .get(self.base_url.clone())
            .send()?
            .error_for_status()?
            .text()?;
        Ok(extract_csrf(&html))
    }

    fn identify_user(&self, email: &str, csrf: &str) -> PewResult<ApiResponse> {
        self.post(
            "/login/identifyUser",
            &[
                ("username", email),
                ("csrf", csrf),
                ("apiClient", API_CLIENT),
                ("bindDevice", "false"),
                ("skipLinkAccount", "false"),
                ("redirectTo", ""),
                ("skipFirstUse", ""),
                ("referrerId", ""),
            ],
        )
    }
}

fn build_http(jar: &Arc<Jar>, timeout: Duration) -> PewResult<Client> {
    Client::builder()
        .cookie_provider(Arc::clone(jar))
        .timeout(timeout)
        .build()
        .map_err(|e| PewError::Http(format!("Failed to create HTTP client: {}", e)))
}

fn challenge_endpoints(mode: TwoFactorMode) -> (&'static str, &'static str, &'static str) {
    match mode {
        TwoFactorMode::Sms => (
            "/credential/challengeSms",
            "challengeSMS",
            "/credential/authenticateSms",
        ),
        TwoFactorMode::Email => (
            "/credential/challengeEmail",
            "challengeEmail",
            "/credential/authenticateEmailByCode",
        ),
    }
}

impl AggregatorApi for PersonalCapitalClient {
    fn login(&mut self, email: &str, password: &str) -> PewResult<()> {
        let initial_csrf = self.csrf_from_home_page()?.unwrap_or_else(|| {
            warn!("No CSRF token found on the home page");
            String::new()
        });

        let identified = self.identify_user(email, &initial_csrf)?;
        let header = identified.sp_header;

        self.csrf = header.csrf.clone().ok_or_else(|| {
            PewError::LoginFailed(
                "Unable to extract CSRF token from user identification response".into(),
            )
        })?;

        let Some(auth_level) = header.auth_level.as_deref() else {
            return Err(PewError::LoginFailed(
                "Unable to extract auth level from user identification response".into(),
            ));
        };
        if !header.is_user_remembered() {
            info!(auth_level, "Device not remembered");
            return Err(PewError::TwoFactorRequired);
        }

        self.authenticate_password(password)
    }

    fn two_factor_challenge(&mut self, mode: TwoFactorMode) -> PewResult<()> {
        let (endpoint, challenge_type, _) = challenge_endpoints(mode);
        self.post_auth_step(
            endpoint,
            &[
                ("challengeReason", CHALLENGE_REASON),
                ("challengeMethod", CHALLENGE_METHOD),
                ("challengeType", challenge_type),
                ("apiClient", API_CLIENT),
                ("bindDevice", "false"),
                ("csrf", self.csrf.as_str()),
            ],
        )?;
        info!(%mode, "Verification code requested");
        Ok(())
    }

    fn two_factor_authenticate(&mut self, mode: TwoFactorMode, code: &str) -> PewResult<()> {
        let (_, _, endpoint) = challenge_endpoints(mode);
        self.post_auth_step(
            endpoint,
            &[
                ("challengeReason", CHALLENGE_REASON),
                ("challengeMethod", CHALLENGE_METHOD),
                ("apiClient", API_CLIENT),
                ("bindDevice", "false"),
                ("code", code),
                ("csrf", self.csrf.as_str()),
            ],
        )?;
        Ok(())
    }

    fn authenticate_password(&mut self, password: &str) -> PewResult<()> {
        self.post_auth_step(
            "/credential/authenticatePassword",
            &[
                ("bindDevice", "true"),
                ("deviceName", ""),
                ("redirectTo", ""),
                ("skipFirstUse", ""),
                ("skipLinkAccount", "false"),
                ("referrerId", ""),
                ("passwd", password),
                ("apiClient", API_CLIENT),
                ("csrf", self.csrf.as_str()),
            ],
        )?;
        info!("Password accepted");
        Ok(())
    }

    fn fetch(&mut self, endpoint: &str, params: &[(&str, &str)]) -> PewResult<ApiResponse> {
        let mut form: Vec<(&str, &str)> = vec![
            ("lastServerChangeId", "-1"),
            ("csrf", self.csrf.as_str()),
            ("apiClient", API_CLIENT),
        ];
        form.extend_from_slice(params);
        self.post(endpoint, &form)
    }

    fn session(&self) -> Session {
        // Cookies may be scoped to the site root or to /api
        let mut session = Session::new();
        let urls = [Some(self.base_url.clone()), self.api_url("/").ok()];
        for url in urls.iter().flatten() {
            if let Some(header) = self.jar.cookies(url) {
                if let Ok(header) = header.to_str() {
                    for (name, value) in Session::from_cookie_header(header).iter() {
                        session.insert(name, value);
                    }
                }
            }
        }
        session
    }

    fn set_session(&mut self, session: &Session) -> PewResult<()> {
        let jar = Arc::new(Jar::default());
        for (name, value) in session.iter() {
            jar.add_cookie_str(&format!("{}={}; Path=/", name, value), &self.base_url);
        }
        self.http = build_http(&jar, self.timeout)?;
        self.jar = jar;
        debug!(cookies = session.len(), "Restored session cookies");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ACCOUNTS_ENDPOINT;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread;

    /// A request as the loopback server received it
    #[derive(Debug)]
    struct Seen {
        path: String,
        body: String,
        cookie: Option<String>,
    }

    impl Seen {
        fn param(&self, name: &str) -> Option<String> {
            url::form_urlencoded::parse(self.body.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        }
    }

    struct Reply {
        body: String,
        set_cookie: Option<&'static str>,
    }

    fn reply(body: Value, set_cookie: Option<&'static str>) -> Reply {
        Reply {
            body: body.to_string(),
            set_cookie,
        }
    }

    /// Canned service: `auth_level` goes into the identifyUser header,
    /// `password_error` makes authenticatePassword report an error
    fn service(
        auth_level: Option<&'static str>,
        password_error: Option<&'static str>,
    ) -> impl Fn(&str) -> Reply + Send + 'static {
        move |path: &str| match path {
            "/" => Reply {
                body: "<script>globals.csrf='abc-1';</script>".to_string(),
                set_cookie: None,
            },
            "/api/login/identifyUser" => {
                let mut header = json!({"success": true, "csrf": "def-2"});
                if let Some(level) = auth_level {
                    header["authLevel"] = json!(level);
                }
                reply(json!({ "spHeader": header }), Some("PMData=p; Path=/api"))
            }
            "/api/credential/authenticatePassword" => match password_error {
                Some(message) => reply(
                    json!({"spHeader": {"success": false, "errors": [{"code": 202, "message": message}]}}),
                    None,
                ),
                None => reply(
                    json!({"spHeader": {"success": true}}),
                    Some("JSESSIONID=s1; Path=/"),
                ),
            },
            "/api/credential/challengeSms" => reply(json!({"spHeader": {"success": true}}), None),
            "/api/newaccount/getAccounts" => reply(
                json!({"spHeader": {"success": true}, "spData": {"networth": 1}}),
                None,
            ),
            _ => reply(
                json!({"spHeader": {"success": false, "errors": [{"message": "unknown endpoint"}]}}),
                None,
            ),
        }
    }

    /// Answer requests on a loopback port for the rest of the test run
    fn serve<F>(route: F) -> (String, Receiver<Seen>)
    where
        F: Fn(&str) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                answer(stream, &route, &tx);
            }
        });
        (base, rx)
    }

    fn answer(mut stream: TcpStream, route: &dyn Fn(&str) -> Reply, tx: &Sender<Seen>) {
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let path = request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();

        let mut content_length = 0;
        let mut cookie = None;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                } else if name.eq_ignore_ascii_case("cookie") {
                    cookie = Some(value.trim().to_string());
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();

        let reply = route(&path);
        let _ = tx.send(Seen {
            path,
            body: String::from_utf8(body).unwrap(),
            cookie,
        });

        let mut head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            reply.body.len()
        );
        if let Some(set_cookie) = reply.set_cookie {
            head.push_str(&format!("Set-Cookie: {}\r\n", set_cookie));
        }
        head.push_str("\r\n");
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(reply.body.as_bytes()).unwrap();
    }

    fn local_client(base: &str) -> PersonalCapitalClient {
        PersonalCapitalClient::new(base, Duration::from_secs(5)).unwrap()
    }

    fn client() -> PersonalCapitalClient {
        PersonalCapitalClient::new("https://home.personalcapital.com", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_extract_csrf() {
        let html = "<script>window.globals = {}; globals.csrf='9f1c2e4a-77b0-4d8e-a1f3-0c5d6e7f8a9b';</script>";
        assert_eq!(
            extract_csrf(html).as_deref(),
            Some("9f1c2e4a-77b0-4d8e-a1f3-0c5d6e7f8a9b")
        );
        assert!(extract_csrf("<html>no token here</html>").is_none());
    }

    #[test]
    fn test_api_url() {
        let client = client();
        assert_eq!(
            client.api_url("/newaccount/getAccounts").unwrap().as_str(),
            "https://home.personalcapital.com/api/newaccount/getAccounts"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            PersonalCapitalClient::new("not a url", Duration::from_secs(5)),
            Err(PewError::Config(_))
        ));
    }

    #[test]
    fn test_set_session_then_session_round_trips() {
        let mut client = client();
        let mut session = Session::new();
        session.insert("JSESSIONID", "abc");
        session.insert("PMData", "xyz");

        client.set_session(&session).unwrap();
        assert_eq!(client.session(), session);

        client.set_session(&Session::new()).unwrap();
        assert!(client.session().is_empty());
    }

    #[test]
    fn test_login_swaps_csrf_and_collects_cookies() {
        let (base, seen) = serve(service(Some("USER_REMEMBERED"), None));
        let mut client = local_client(&base);

        client.login("me@example.com", "pw").unwrap();
        client.fetch(ACCOUNTS_ENDPOINT, &[("a", "b")]).unwrap();

        let seen: Vec<Seen> = seen.try_iter().collect();
        let paths: Vec<&str> = seen.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "/",
                "/api/login/identifyUser",
                "/api/credential/authenticatePassword",
                "/api/newaccount/getAccounts",
            ]
        );
        assert_eq!(seen[1].param("csrf").as_deref(), Some("abc-1"));
        assert_eq!(seen[1].param("username").as_deref(), Some("me@example.com"));
        assert_eq!(seen[2].param("csrf").as_deref(), Some("def-2"));
        assert_eq!(seen[2].param("passwd").as_deref(), Some("pw"));
        assert_eq!(
            seen[3].body,
            "lastServerChangeId=-1&csrf=def-2&apiClient=WEB&a=b"
        );

        let session = client.session();
        assert_eq!(session.len(), 2);
        assert_eq!(session.get("PMData"), Some("p"));
        assert_eq!(session.get("JSESSIONID"), Some("s1"));
    }

    #[test]
    fn test_restored_session_is_sent() {
        let (base, seen) = serve(service(Some("USER_REMEMBERED"), None));
        let mut saved = Session::new();
        saved.insert("JSESSIONID", "s1");
        saved.insert("PMData", "p");

        let mut client = local_client(&base);
        client.set_session(&saved).unwrap();
        client.fetch(ACCOUNTS_ENDPOINT, &[]).unwrap();

        let request = seen.try_iter().next().unwrap();
        let sent = Session::from_cookie_header(request.cookie.as_deref().unwrap_or_default());
        assert_eq!(sent, saved);
    }

    #[test]
    fn test_unremembered_device_needs_second_factor() {
        let (base, seen) = serve(service(Some("USER_IDENTIFIED"), None));
        let mut client = local_client(&base);

        let err = client.login("me@example.com", "pw").unwrap_err();
        assert!(matches!(err, PewError::TwoFactorRequired));

        client.two_factor_challenge(TwoFactorMode::Sms).unwrap();

        let seen: Vec<Seen> = seen.try_iter().collect();
        assert!(!seen
            .iter()
            .any(|s| s.path == "/api/credential/authenticatePassword"));
        let challenge = seen.last().unwrap();
        assert_eq!(challenge.path, "/api/credential/challengeSms");
        assert_eq!(
            challenge.param("challengeType").as_deref(),
            Some("challengeSMS")
        );
        assert_eq!(challenge.param("csrf").as_deref(), Some("def-2"));
    }

    #[test]
    fn test_missing_auth_level_fails_login() {
        let (base, _seen) = serve(service(None, None));
        let mut client = local_client(&base);

        let err = client.login("me@example.com", "pw").unwrap_err();
        assert!(matches!(err, PewError::LoginFailed(ref m) if m.contains("auth level")));
    }

    #[test]
    fn test_auth_step_error_is_login_failure() {
        let (base, _seen) = serve(service(Some("USER_REMEMBERED"), Some("Incorrect password")));
        let mut client = local_client(&base);

        let err = client.login("me@example.com", "wrong").unwrap_err();
        assert!(matches!(err, PewError::LoginFailed(ref m) if m == "Incorrect password"));
    }
}
