//! Formats API results and usage text for the terminal.
//!
//! Every function returns the finished block as a `String`; printing is left
//! to the caller.

use colored::Color;
use tabled::Table;

use crate::{
    grammar::{Node, NodeKind, PROGRAM},
    output::Printer,
    resolver::{
        ALL_TIME_COLUMN, FriendsWindow, PAST_MONTH_COLUMN, PAST_WEEK_COLUMN, UsageFallback,
    },
    stats::TOP_LIMIT,
    types::{
        FriendStatistics, FriendTableRow, Profile, Ranked, RankedTableRow, Statistics,
        StatisticsTableRow,
    },
    utils::{self, FRIEND_CODE_PREFIX},
};

const TODAY_COLUMN: usize = 2;

pub fn account(profile: &Profile, out: &Printer) -> String {
    let rows = [
        ("Username", profile.username.clone()),
        (
            "Friend code",
            format!("{}{}", FRIEND_CODE_PREFIX, profile.friend_code),
        ),
        (
            "Registered",
            profile.registration_time.format("%Y-%m-%d %H:%M").to_string(),
        ),
        ("User id", profile.id.to_string()),
    ];

    rows.iter()
        .map(|(label, value)| {
            format!(
                "{:<13}{}",
                format!("{}:", label),
                out.paint(value, Color::Magenta)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Totals per period, the period at `active_column` marked. With `show_top`
/// the top languages and projects follow.
pub fn statistics(
    stats: &Statistics,
    show_top: bool,
    active_column: usize,
    out: &Printer,
) -> String {
    let periods = [
        (ALL_TIME_COLUMN, "All time", stats.all_time),
        (TODAY_COLUMN, "Today", stats.today),
        (PAST_WEEK_COLUMN, "Past week", stats.past_week),
        (PAST_MONTH_COLUMN, "Past month", stats.past_month),
    ];

    let rows: Vec<StatisticsTableRow> = periods
        .iter()
        .map(|(column, label, seconds)| StatisticsTableRow {
            period: if *column == active_column {
                format!("> {}", label)
            } else {
                label.to_string()
            },
            time: utils::format_duration(*seconds),
        })
        .collect();

    let mut block = format!(
        "{}\n{}",
        out.bold(&format!("Coding statistics of {}", stats.username), Color::Cyan),
        Table::new(rows)
    );

    if show_top {
        let top = stats.top.clone().unwrap_or_default();
        block.push_str(&format!(
            "\n\n{}\n{}\n\n{}\n{}",
            out.bold(&format!("Top {} languages", TOP_LIMIT), Color::Cyan),
            ranked_table(&top.languages),
            out.bold(&format!("Top {} projects", TOP_LIMIT), Color::Cyan),
            ranked_table(&top.projects),
        ));
    }

    block
}

fn ranked_table(ranked: &[Ranked]) -> String {
    if ranked.is_empty() {
        return "No coding activity in this period.".to_string();
    }

    let rows: Vec<RankedTableRow> = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| RankedTableRow {
            rank: i + 1,
            name: r.name.clone(),
            time: utils::format_duration(r.seconds),
        })
        .collect();
    Table::new(rows).to_string()
}

fn window_label(window: FriendsWindow) -> &'static str {
    match window {
        FriendsWindow::AllTime => "all time",
        FriendsWindow::PastWeek => "past week",
        FriendsWindow::PastMonth => "past month",
    }
}

fn friend_row(rank: usize, friend: &FriendStatistics, me: &str) -> FriendTableRow {
    let username = if friend.username == me {
        format!("{} (you)", friend.username)
    } else {
        friend.username.clone()
    };

    FriendTableRow {
        rank,
        username,
        all_time: utils::format_duration(friend.coding_time.all_time),
        past_month: utils::format_duration(friend.coding_time.past_month),
        past_week: utils::format_duration(friend.coding_time.past_week),
    }
}

/// `friends` is expected to be ranked already.
pub fn friends(
    friends: &[FriendStatistics],
    window: FriendsWindow,
    me: &str,
    out: &Printer,
) -> String {
    let rows: Vec<FriendTableRow> = friends
        .iter()
        .enumerate()
        .map(|(i, f)| friend_row(i + 1, f, me))
        .collect();

    format!(
        "{}\n{}",
        out.bold(
            &format!("Friends ranked by {}", window_label(window)),
            Color::Cyan
        ),
        Table::new(rows)
    )
}

pub fn friend(friend: &FriendStatistics) -> String {
    Table::new([friend_row(1, friend, "")]).to_string()
}

fn child_label(node: &Node) -> String {
    match node.argument() {
        Some(argument) => format!("{} [{}]", node.name(), argument),
        None => node.name().to_string(),
    }
}

/// Usage of the deepest node the resolver matched: the invocation so far,
/// the node's description and one line per child.
pub fn usage(fallback: &UsageFallback, out: &Printer) -> String {
    let node = fallback.node();
    let path = fallback.names().join(" ");
    let (noun, heading) = if fallback.is_root() {
        ("command", "Commands")
    } else {
        ("subcommand", "Subcommands")
    };

    let mut lines = Vec::new();
    let invocation = match (node.children().is_empty(), node.action().is_some()) {
        (true, _) => path,
        (false, true) => format!("{} [<{}>]", path, noun),
        (false, false) => format!("{} <{}>", path, noun),
    };
    lines.push(format!("{} {}", out.bold("Usage:", Color::White), invocation));
    lines.push(String::new());
    lines.push(node.info().to_string());

    if !node.children().is_empty() {
        let labels: Vec<(String, &Node)> = node
            .children()
            .iter()
            .map(|child| (child_label(child), child.as_ref()))
            .collect();
        let width = labels.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

        lines.push(String::new());
        lines.push(out.bold(&format!("{}:", heading), Color::White));
        for (label, child) in labels {
            let color = match child.kind() {
                NodeKind::Literal => Color::BrightBlue,
                NodeKind::Placeholder { .. } => Color::BrightGreen,
            };
            let padding = " ".repeat(width - label.len() + 2);
            lines.push(format!(
                "  {}{}{}",
                out.paint(&label, color),
                padding,
                child.info()
            ));
        }
    }

    if fallback.is_root() {
        lines.push(String::new());
        lines.push(format!(
            "Run `{} <command>` to see the subcommands of a command.",
            PROGRAM
        ));
    }

    lines.join("\n")
}
