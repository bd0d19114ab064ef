//! Turns raw activity entries into the totals the client displays, and
//! merges the caller's own totals into the friends list.

use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};

use crate::{
    resolver::FriendsWindow,
    types::{ActivityEntry, CodingTime, FriendStatistics, Ranked, Statistics, TopStats},
    utils,
};

/// How many languages and projects the top lists keep.
pub const TOP_LIMIT: usize = 10;

pub fn summarize(
    username: &str,
    entries: &[ActivityEntry],
    now: &DateTime<Local>,
    since: Option<&DateTime<Local>>,
    include_top: bool,
    case_insensitive: bool,
) -> Statistics {
    let today = utils::start_of_day(now).with_timezone(&Utc);
    let week = utils::start_of_week(now).with_timezone(&Utc);
    let month = utils::start_of_month(now).with_timezone(&Utc);
    let since = since.map(|s| s.with_timezone(&Utc));

    let total_from = |from: &DateTime<Utc>| -> u64 {
        entries
            .iter()
            .filter(|e| e.start_time >= *from)
            .map(|e| e.duration)
            .sum()
    };

    let in_window: Vec<&ActivityEntry> = entries
        .iter()
        .filter(|e| since.is_none_or(|s| e.start_time >= s))
        .collect();

    let top = include_top.then(|| TopStats {
        languages: rank_by(&in_window, |e| e.language.as_deref(), case_insensitive),
        projects: rank_by(&in_window, |e| e.project_name.as_deref(), case_insensitive),
    });

    Statistics {
        username: username.to_string(),
        all_time: entries.iter().map(|e| e.duration).sum(),
        today: total_from(&today),
        past_week: total_from(&week),
        past_month: total_from(&month),
        since_total: in_window.iter().map(|e| e.duration).sum(),
        top,
    }
}

fn rank_by<F>(entries: &[&ActivityEntry], key: F, case_insensitive: bool) -> Vec<Ranked>
where
    F: Fn(&ActivityEntry) -> Option<&str>,
{
    // grouping key -> (first spelling seen, seconds)
    let mut totals: HashMap<String, (String, u64)> = HashMap::new();

    for &entry in entries {
        let Some(name) = key(entry).map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        let group = if case_insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        };
        totals
            .entry(group)
            .or_insert_with(|| (name.to_string(), 0))
            .1 += entry.duration;
    }

    let mut ranked: Vec<Ranked> = totals
        .into_values()
        .map(|(name, seconds)| Ranked { name, seconds })
        .collect();
    ranked.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

/// Adds the caller to the friends list. `me` was fetched with the friends
/// window's rolling bound, so its `since_total` stands in for that window.
pub fn with_self(
    mut friends: Vec<FriendStatistics>,
    me: &Statistics,
    window: FriendsWindow,
) -> Vec<FriendStatistics> {
    let mut coding_time = CodingTime {
        all_time: me.all_time,
        past_month: me.past_month,
        past_week: me.past_week,
    };
    match window {
        FriendsWindow::AllTime => coding_time.all_time = me.since_total,
        FriendsWindow::PastMonth => coding_time.past_month = me.since_total,
        FriendsWindow::PastWeek => coding_time.past_week = me.since_total,
    }

    friends.retain(|f| f.username != me.username);
    friends.push(FriendStatistics {
        username: me.username.clone(),
        coding_time,
    });
    friends
}

pub fn window_total(time: &CodingTime, window: FriendsWindow) -> u64 {
    match window {
        FriendsWindow::AllTime => time.all_time,
        FriendsWindow::PastMonth => time.past_month,
        FriendsWindow::PastWeek => time.past_week,
    }
}

/// Most coding time in `window` first; ties by name.
pub fn rank_friends(
    mut friends: Vec<FriendStatistics>,
    window: FriendsWindow,
) -> Vec<FriendStatistics> {
    friends.sort_by(|a, b| {
        window_total(&b.coding_time, window)
            .cmp(&window_total(&a.coding_time, window))
            .then_with(|| a.username.cmp(&b.username))
    });
    friends
}
