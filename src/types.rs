use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Accepts RFC 3339 timestamps as well as the offset-less form the API
/// uses for some fields, which is taken to be UTC.
fn flexible_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(time) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub friend_code: String,
    pub username: String,
    #[serde(deserialize_with = "flexible_time")]
    pub registration_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub id: i64,
    pub auth_token: String,
    pub friend_code: String,
    pub username: String,
    #[serde(deserialize_with = "flexible_time")]
    pub registration_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PasswordChange<'a> {
    pub old: &'a str,
    pub new: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct FriendCodeResponse {
    pub friend_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One heartbeat-aggregated stretch of coding as stored by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    #[serde(deserialize_with = "flexible_time")]
    pub start_time: DateTime<Utc>,
    /// Seconds.
    pub duration: u64,
    pub project_name: Option<String>,
    pub language: Option<String>,
    pub editor_name: Option<String>,
    pub hostname: Option<String>,
}

/// Coding time totals in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodingTime {
    pub all_time: u64,
    pub past_month: u64,
    pub past_week: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendStatistics {
    pub username: String,
    pub coding_time: CodingTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub name: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopStats {
    pub languages: Vec<Ranked>,
    pub projects: Vec<Ranked>,
}

/// Summarised coding time of one user. All durations are seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub username: String,
    pub all_time: u64,
    pub today: u64,
    /// Since the start of the current calendar week.
    pub past_week: u64,
    /// Since the start of the current calendar month.
    pub past_month: u64,
    /// Since the lower bound the statistics were requested with.
    pub since_total: u64,
    pub top: Option<TopStats>,
}

#[derive(Tabled)]
pub struct StatisticsTableRow {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Coding time")]
    pub time: String,
}

#[derive(Tabled)]
pub struct RankedTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Coding time")]
    pub time: String,
}

#[derive(Tabled)]
pub struct FriendTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Friend")]
    pub username: String,
    #[tabled(rename = "All time")]
    pub all_time: String,
    #[tabled(rename = "Past month")]
    pub past_month: String,
    #[tabled(rename = "Past week")]
    pub past_week: String,
}
