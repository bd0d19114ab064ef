use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone};

/// Prefix the API puts in front of friend codes when they are shown to users.
pub const FRIEND_CODE_PREFIX: &str = "ttfc_";

/// Returns the `index`th element or an empty string when out of range.
pub fn nth_element(items: &[String], index: usize) -> &str {
    items.get(index).map(String::as_str).unwrap_or("")
}

fn at_midnight<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> DateTime<Tz> {
    now.timezone()
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or_else(|| now.clone())
}

pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    at_midnight(now, now.date_naive())
}

/// Monday 00:00 of the week `now` falls in.
pub fn start_of_week<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let date = now.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    at_midnight(now, monday)
}

/// The first of the month `now` falls in, 00:00.
pub fn start_of_month<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let date = now.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    at_midnight(now, first)
}

pub fn week_ago<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    now.clone() - Duration::days(7)
}

/// One calendar month before `now`, clamped to the end of shorter months.
pub fn month_ago<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    now.clone()
        .checked_sub_months(Months::new(1))
        .unwrap_or_else(|| now.clone() - Duration::days(30))
}

/// Formats a number of seconds as e.g. `12h 5m`, `5m 30s` or `42s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

pub fn strip_friend_code_prefix(code: &str) -> &str {
    let code = code.trim();
    code.strip_prefix(FRIEND_CODE_PREFIX).unwrap_or(code)
}
