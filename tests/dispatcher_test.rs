use std::collections::VecDeque;

use chrono::{DateTime, Local, TimeZone, Utc};
use testaustime_cli::{
    api::{Api, ApiError},
    args::ParsedInvocation,
    config::{ConfigError, ConfigStore},
    dispatcher::Dispatcher,
    error::CliError,
    grammar::Grammar,
    output::Printer,
    prompt::Prompt,
    resolver::Resolver,
    secret::SecretString,
    types::{AuthResponse, CodingTime, FriendStatistics, Profile, Statistics},
};

#[derive(Default)]
struct FakeApi {
    signed_in_as: Option<String>,
    reject_with: Option<String>,
    fail_with_status: Option<u16>,
    calls: Vec<String>,
    logins: Vec<(String, String)>,
    statistics_requests: Vec<(Option<String>, bool, Option<DateTime<Local>>)>,
}

impl FakeApi {
    fn signed_in(username: &str) -> Self {
        Self {
            signed_in_as: Some(username.to_string()),
            ..Default::default()
        }
    }

    fn outcome<T>(&self, value: T) -> Result<T, ApiError> {
        if let Some(status) = self.fail_with_status {
            return Err(ApiError::Status { status });
        }
        match &self.reject_with {
            Some(message) => Err(ApiError::Rejected(message.clone())),
            None => Ok(value),
        }
    }

    fn auth(&self, username: &str) -> AuthResponse {
        AuthResponse {
            id: 1,
            auth_token: format!("token-of-{}", username),
            friend_code: "code".to_string(),
            username: username.to_string(),
            registration_time: Utc::now(),
        }
    }
}

impl Api for FakeApi {
    fn get_profile(&mut self) -> Result<Profile, ApiError> {
        self.calls.push("get_profile".to_string());
        if let Some(status) = self.fail_with_status {
            return Err(ApiError::Status { status });
        }
        match &self.signed_in_as {
            Some(username) => Ok(Profile {
                id: 1,
                friend_code: "abc".to_string(),
                username: username.clone(),
                registration_time: Utc::now(),
            }),
            None => Err(ApiError::NotLoggedIn),
        }
    }

    fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        self.calls.push("login".to_string());
        self.logins
            .push((username.to_string(), password.expose().to_string()));
        let auth = self.auth(username);
        self.outcome(auth)
    }

    fn register(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        self.calls.push("register".to_string());
        self.logins
            .push((username.to_string(), password.expose().to_string()));
        let auth = self.auth(username);
        self.outcome(auth)
    }

    fn auth_token(&mut self) -> Result<String, ApiError> {
        self.calls.push("auth_token".to_string());
        self.outcome("current-token".to_string())
    }

    fn rotate_auth_token(&mut self) -> Result<String, ApiError> {
        self.calls.push("rotate_auth_token".to_string());
        self.outcome("rotated-token".to_string())
    }

    fn rotate_friend_code(&mut self) -> Result<String, ApiError> {
        self.calls.push("rotate_friend_code".to_string());
        self.outcome("newcode".to_string())
    }

    fn change_password(
        &mut self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<(), ApiError> {
        self.calls.push(format!(
            "change_password {} {}",
            old.expose(),
            new.expose()
        ));
        self.outcome(())
    }

    fn get_statistics(
        &mut self,
        user: Option<&str>,
        include_top: bool,
        since: Option<DateTime<Local>>,
    ) -> Result<Statistics, ApiError> {
        self.calls.push("get_statistics".to_string());
        self.statistics_requests
            .push((user.map(str::to_string), include_top, since));
        self.outcome(Statistics {
            username: user.unwrap_or("me").to_string(),
            all_time: 7200,
            since_total: 600,
            ..Default::default()
        })
    }

    fn get_friends(&mut self) -> Result<Vec<FriendStatistics>, ApiError> {
        self.calls.push("get_friends".to_string());
        self.outcome(vec![FriendStatistics {
            username: "alice".to_string(),
            coding_time: CodingTime {
                all_time: 3600,
                past_month: 1800,
                past_week: 900,
            },
        }])
    }

    fn add_friend(&mut self, code: &str) -> Result<FriendStatistics, ApiError> {
        self.calls.push(format!("add_friend {}", code));
        self.outcome(FriendStatistics {
            username: "carol".to_string(),
            coding_time: CodingTime::default(),
        })
    }

    fn remove_friend(&mut self, username: &str) -> Result<(), ApiError> {
        self.calls.push(format!("remove_friend {}", username));
        self.outcome(())
    }
}

#[derive(Default)]
struct FakePrompt {
    texts: VecDeque<String>,
    secrets: VecDeque<String>,
    asked: Vec<String>,
}

impl FakePrompt {
    fn answering(texts: &[&str], secrets: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            secrets: secrets.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for FakePrompt {
    fn ask_text(&mut self, label: &str) -> std::io::Result<String> {
        self.asked.push(label.to_string());
        self.texts
            .pop_front()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no input"))
    }

    fn ask_secret(&mut self, label: &str) -> std::io::Result<SecretString> {
        self.asked.push(label.to_string());
        self.secrets
            .pop_front()
            .map(SecretString::new)
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no input"))
    }
}

#[derive(Default)]
struct FakeStore {
    tokens: Vec<String>,
}

impl ConfigStore for FakeStore {
    fn update_token(&mut self, token: &str) -> Result<(), ConfigError> {
        self.tokens.push(token.to_string());
        Ok(())
    }
}

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 15, 12, 30, 0).unwrap()
}

fn dispatch(
    args: &[&str],
    api: &mut FakeApi,
    prompt: &mut FakePrompt,
    store: &mut FakeStore,
) -> Result<(), CliError> {
    let grammar = Grammar::build().unwrap();
    let invocation =
        ParsedInvocation::new(args.iter().map(|a| a.to_string()).collect(), Default::default());
    let resolution = Resolver::new(&grammar).resolve_at(&invocation, now());

    Dispatcher::new(api, prompt, store, Printer::new(false)).dispatch(resolution)
}

#[test]
fn test_login_takes_username_from_arguments() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::answering(&[], &["hunter2"]);
    let mut store = FakeStore::default();

    dispatch(&["account", "login", "bob"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(prompt.asked, vec!["Password"]);
    assert_eq!(api.logins, vec![("bob".to_string(), "hunter2".to_string())]);
    assert_eq!(store.tokens, vec!["token-of-bob"]);
}

#[test]
fn test_login_prompts_for_missing_username() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::answering(&["bob"], &["hunter2"]);
    let mut store = FakeStore::default();

    dispatch(&["account", "login"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(prompt.asked, vec!["Username", "Password"]);
    assert_eq!(api.logins[0].0, "bob");
}

#[test]
fn test_login_to_current_account_stops_early() {
    let mut api = FakeApi::signed_in("bob");
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(&["account", "login", "bob"], &mut api, &mut prompt, &mut store).unwrap();

    assert!(prompt.asked.is_empty());
    assert!(api.logins.is_empty());
    assert!(store.tokens.is_empty());
}

#[test]
fn test_rejected_login_keeps_old_token() {
    let mut api = FakeApi {
        reject_with: Some("invalid credentials".to_string()),
        ..Default::default()
    };
    let mut prompt = FakePrompt::answering(&[], &["wrong"]);
    let mut store = FakeStore::default();

    let result = dispatch(&["account", "login", "bob"], &mut api, &mut prompt, &mut store);

    assert!(result.is_ok());
    assert!(store.tokens.is_empty());
}

#[test]
fn test_register_saves_token() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::answering(&["newbie"], &["secret"]);
    let mut store = FakeStore::default();

    dispatch(&["account", "register"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(prompt.asked, vec!["New username", "Password"]);
    assert_eq!(store.tokens, vec!["token-of-newbie"]);
}

#[test]
fn test_change_password_prompts_twice() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::answering(&[], &["old", "new"]);
    let mut store = FakeStore::default();

    dispatch(&["account", "newPassword"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(prompt.asked, vec!["Old password", "New password"]);
    assert_eq!(api.calls, vec!["change_password old new"]);
}

#[test]
fn test_new_token_is_persisted() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(&["account", "newToken"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(store.tokens, vec!["rotated-token"]);
}

#[test]
fn test_new_friend_code_is_not_persisted() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(&["account", "newCode"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(api.calls, vec!["rotate_friend_code"]);
    assert!(store.tokens.is_empty());
}

#[test]
fn test_user_top_statistics_request() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(
        &["getuser", "alice", "top", "pastWeek"],
        &mut api,
        &mut prompt,
        &mut store,
    )
    .unwrap();

    assert_eq!(
        api.statistics_requests,
        vec![(
            Some("alice".to_string()),
            true,
            Some(Local.with_ymd_and_hms(2024, 5, 13, 0, 0, 0).unwrap())
        )]
    );
}

#[test]
fn test_own_statistics_request() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(&["statistics"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(api.statistics_requests, vec![(None, false, None)]);
}

#[test]
fn test_friends_fetches_own_statistics_with_rolling_bound() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(&["friends", "pastWeek"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(api.calls, vec!["get_statistics", "get_friends"]);
    assert_eq!(
        api.statistics_requests,
        vec![(
            None,
            false,
            Some(Local.with_ymd_and_hms(2024, 5, 8, 12, 30, 0).unwrap())
        )]
    );
}

#[test]
fn test_add_friend_uses_argument() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(
        &["friends", "add", "ttfc_abc"],
        &mut api,
        &mut prompt,
        &mut store,
    )
    .unwrap();

    assert!(prompt.asked.is_empty());
    assert_eq!(api.calls, vec!["add_friend ttfc_abc"]);
}

#[test]
fn test_remove_friend_prompts_for_name() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::answering(&["alice"], &[]);
    let mut store = FakeStore::default();

    dispatch(&["friends", "remove"], &mut api, &mut prompt, &mut store).unwrap();

    assert_eq!(prompt.asked, vec!["Friend name"]);
    assert_eq!(api.calls, vec!["remove_friend alice"]);
}

#[test]
fn test_rejected_friend_add_is_not_fatal() {
    let mut api = FakeApi {
        reject_with: Some("already friends".to_string()),
        ..Default::default()
    };
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    let result = dispatch(&["friends", "add", "abc"], &mut api, &mut prompt, &mut store);

    assert!(result.is_ok());
}

#[test]
fn test_usage_fallback_makes_no_calls() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    dispatch(&["friends", "bogus"], &mut api, &mut prompt, &mut store).unwrap();
    dispatch(&[], &mut api, &mut prompt, &mut store).unwrap();

    assert!(api.calls.is_empty());
    assert!(prompt.asked.is_empty());
}

#[test]
fn test_server_failure_propagates() {
    let mut api = FakeApi {
        fail_with_status: Some(500),
        ..Default::default()
    };
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    let result = dispatch(&["statistics"], &mut api, &mut prompt, &mut store);

    assert!(matches!(
        result,
        Err(CliError::Api(ApiError::Status { status: 500 }))
    ));
}

#[test]
fn test_missing_prompt_input_propagates() {
    let mut api = FakeApi::default();
    let mut prompt = FakePrompt::default();
    let mut store = FakeStore::default();

    let result = dispatch(&["account", "login"], &mut api, &mut prompt, &mut store);

    assert!(matches!(result, Err(CliError::Prompt(_))));
    assert!(api.logins.is_empty());
}
