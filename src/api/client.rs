use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{
    Method, StatusCode,
    blocking::{Client, RequestBuilder, Response},
};
use serde::de::DeserializeOwned;

use super::{Api, ApiError};
use crate::{
    config::Config,
    info,
    output::Printer,
    secret::SecretString,
    stats,
    types::{
        ActivityEntry, AuthResponse, Credentials, ErrorResponse, FriendCodeResponse,
        FriendStatistics, PasswordChange, Profile, Statistics, TokenResponse,
    },
    utils,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the Testaustime API.
///
/// Every request runs behind a spinner on the terminal and, with
/// `--measure-requests`, is followed by an info line with its duration.
/// Authorized endpoints send the configured token as a bearer token; with no
/// token configured they fail with [`ApiError::NotLoggedIn`] before anything
/// is sent.
///
/// # Statistics
///
/// The API only hands out raw activity entries. [`Api::get_statistics`]
/// fetches them and summarises them locally with [`stats::summarize`],
/// merging names that differ by case when `case_insensitive_fields` is set
/// in the configuration.
///
/// # Example
///
/// ```
/// let store = FileConfig::load(None)?;
/// let mut client = ApiClient::new(&store.config(), true, Printer::new(true))?;
///
/// let profile = client.get_profile()?;
/// println!("Signed in as {}", profile.username);
/// ```
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
    case_insensitive: bool,
    measure: bool,
    out: Printer,
}

impl ApiClient {
    /// Builds a client for `config.api_url`, authenticating with
    /// `config.token`.
    ///
    /// # Arguments
    ///
    /// * `config` - Effective configuration of this run
    /// * `measure` - Print the duration of every request
    /// * `out` - Printer for the timing lines
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] when the TLS backend cannot be initialised.
    pub fn new(config: &Config, measure: bool, out: Printer) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("testaustime-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            case_insensitive: config.case_insensitive_fields,
            measure,
            out,
        })
    }

    /// Sends one request and hands back the response once [`check`] let it
    /// through. `build` adds the body.
    fn execute(
        &self,
        method: Method,
        path: &str,
        authorized: bool,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, path));
        if authorized {
            if self.token.is_empty() {
                return Err(ApiError::NotLoggedIn);
            }
            request = request.bearer_auth(&self.token);
        }
        let request = build(request);

        let pb = spinner(&format!("{} {}", method, path));
        let started = Instant::now();
        let response = request.send();
        pb.finish_and_clear();

        if self.measure {
            info!(
                self.out,
                "{} {} took {} ms",
                method,
                path,
                started.elapsed().as_millis()
            );
        }

        check(response?)
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        authorized: bool,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, ApiError> {
        Ok(self.execute(method, path, authorized, build)?.json::<T>()?)
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Passes successful responses through and classifies the rest.
fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    if let Ok(rejection) = serde_json::from_str::<ErrorResponse>(&body) {
        return Err(ApiError::Rejected(rejection.error));
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::NotLoggedIn);
    }
    Err(ApiError::Status {
        status: status.as_u16(),
    })
}

impl Api for ApiClient {
    fn get_profile(&mut self) -> Result<Profile, ApiError> {
        self.fetch(Method::GET, "/users/@me", true, |r| r)
    }

    fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let credentials = Credentials {
            username,
            password: password.expose(),
        };
        self.fetch(Method::POST, "/auth/login", false, |r| r.json(&credentials))
    }

    fn register(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let credentials = Credentials {
            username,
            password: password.expose(),
        };
        self.fetch(Method::POST, "/auth/register", false, |r| {
            r.json(&credentials)
        })
    }

    fn auth_token(&mut self) -> Result<String, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::NotLoggedIn);
        }
        Ok(self.token.clone())
    }

    fn rotate_auth_token(&mut self) -> Result<String, ApiError> {
        let response: TokenResponse = self.fetch(Method::POST, "/auth/regenerate", true, |r| r)?;
        self.token = response.token.clone();
        Ok(response.token)
    }

    fn rotate_friend_code(&mut self) -> Result<String, ApiError> {
        let response: FriendCodeResponse =
            self.fetch(Method::POST, "/friends/regenerate", true, |r| r)?;
        Ok(utils::strip_friend_code_prefix(&response.friend_code).to_string())
    }

    fn change_password(
        &mut self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<(), ApiError> {
        let change = PasswordChange {
            old: old.expose(),
            new: new.expose(),
        };
        self.execute(Method::POST, "/auth/changepassword", true, |r| {
            r.json(&change)
        })?;
        Ok(())
    }

    fn get_statistics(
        &mut self,
        user: Option<&str>,
        include_top: bool,
        since: Option<DateTime<Local>>,
    ) -> Result<Statistics, ApiError> {
        let username = match user {
            Some(user) => user.to_string(),
            None => self.get_profile()?.username,
        };
        let path = format!("/users/{}/activity/data", user.unwrap_or("@me"));
        let entries: Vec<ActivityEntry> = self.fetch(Method::GET, &path, true, |r| r)?;

        Ok(stats::summarize(
            &username,
            &entries,
            &Local::now(),
            since.as_ref(),
            include_top,
            self.case_insensitive,
        ))
    }

    fn get_friends(&mut self) -> Result<Vec<FriendStatistics>, ApiError> {
        self.fetch(Method::GET, "/friends/list", true, |r| r)
    }

    fn add_friend(&mut self, code: &str) -> Result<FriendStatistics, ApiError> {
        let code = utils::strip_friend_code_prefix(code).to_string();
        self.fetch(Method::POST, "/friends/add", true, |r| r.body(code))
    }

    fn remove_friend(&mut self, username: &str) -> Result<(), ApiError> {
        let username = username.trim().to_string();
        self.execute(Method::DELETE, "/friends/remove", true, |r| {
            r.body(username)
        })?;
        Ok(())
    }
}
