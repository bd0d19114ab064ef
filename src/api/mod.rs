//! # Testaustime API
//!
//! [`Api`] is everything the dispatcher needs from the remote service;
//! [`ApiClient`] implements it over HTTP. Keeping the trait at this seam lets
//! the command layer run against an in-memory fake.
//!
//! ## Endpoints
//!
//! - `GET /users/@me` - profile of the signed-in user
//! - `POST /auth/login`, `POST /auth/register` - credentials for a token
//! - `POST /auth/regenerate` - new authentication token
//! - `POST /auth/changepassword` - password change
//! - `GET /users/{user}/activity/data` - raw coding activity
//! - `GET /friends/list`, `POST /friends/add`, `DELETE /friends/remove`
//! - `POST /friends/regenerate` - new friend code
//!
//! ## Errors
//!
//! A non-success response carrying `{"error": "..."}` is a
//! [`ApiError::Rejected`]: the server understood the request and said no.
//! Callers usually report those and carry on. Everything else (transport
//! failures, unexpected statuses, undecodable bodies) is unrecoverable for
//! the run.

mod client;

pub use client::ApiClient;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::{
    secret::SecretString,
    types::{AuthResponse, FriendStatistics, Profile, Statistics},
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Rejected(String),

    #[error("not logged in, run `testaustime account login` first")]
    NotLoggedIn,
}

pub trait Api {
    fn get_profile(&mut self) -> Result<Profile, ApiError>;

    fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError>;

    fn register(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError>;

    /// The token requests are currently made with.
    fn auth_token(&mut self) -> Result<String, ApiError>;

    fn rotate_auth_token(&mut self) -> Result<String, ApiError>;

    /// Returns the new friend code without the `ttfc_` prefix.
    fn rotate_friend_code(&mut self) -> Result<String, ApiError>;

    fn change_password(
        &mut self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<(), ApiError>;

    /// Statistics of `user`, or of the signed-in user when `None`. Top
    /// languages and projects are only computed when `include_top` is set;
    /// they and `since_total` cover the time after `since`.
    fn get_statistics(
        &mut self,
        user: Option<&str>,
        include_top: bool,
        since: Option<DateTime<Local>>,
    ) -> Result<Statistics, ApiError>;

    fn get_friends(&mut self) -> Result<Vec<FriendStatistics>, ApiError>;

    fn add_friend(&mut self, code: &str) -> Result<FriendStatistics, ApiError>;

    fn remove_friend(&mut self, username: &str) -> Result<(), ApiError>;
}
