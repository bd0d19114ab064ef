use chrono::{Local, TimeZone};
use testaustime_cli::{
    args::ParsedInvocation,
    grammar::Grammar,
    output::Printer,
    render,
    resolver::{
        ALL_TIME_COLUMN, FriendsWindow, NO_COLUMN, PAST_WEEK_COLUMN, Resolution, Resolver,
        UsageFallback,
    },
    types::{CodingTime, FriendStatistics, Statistics},
};

fn plain() -> Printer {
    Printer::new(false)
}

fn fallback(args: &[&str]) -> UsageFallback {
    let grammar = Grammar::build().unwrap();
    let invocation =
        ParsedInvocation::new(args.iter().map(|a| a.to_string()).collect(), Default::default());
    let now = Local.with_ymd_and_hms(2024, 5, 15, 12, 30, 0).unwrap();

    match Resolver::new(&grammar).resolve_at(&invocation, now) {
        Resolution::Usage(fallback) => fallback,
        Resolution::Route(route) => panic!("unexpected route {:?}", route),
    }
}

fn stats() -> Statistics {
    Statistics {
        username: "bob".to_string(),
        all_time: 7200,
        today: 60,
        past_week: 600,
        past_month: 3600,
        since_total: 600,
        top: None,
    }
}

#[test]
fn test_root_usage_lists_commands() {
    let text = render::usage(&fallback(&[]), &plain());

    assert!(text.starts_with("Usage: testaustime <command>"));
    for command in ["account", "friends", "getuser", "statistics"] {
        assert!(
            text.lines().any(|l| l.trim_start().starts_with(command)),
            "{} missing from\n{}",
            command,
            text
        );
    }
    assert!(text.contains("Commands:"));
}

#[test]
fn test_friends_usage_lists_subcommands_in_order() {
    let text = render::usage(&fallback(&["friends", "bogus"]), &plain());

    assert!(text.starts_with("Usage: testaustime friends [<subcommand>]"));
    assert!(text.contains("Subcommands:"));

    let positions: Vec<usize> = ["add [friend code]", "pastMonth", "pastWeek", "remove"]
        .iter()
        .map(|name| text.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_getuser_usage_shows_placeholder() {
    let text = render::usage(&fallback(&["getuser"]), &plain());

    assert!(text.starts_with("Usage: testaustime getuser <subcommand>"));
    assert!(text.contains("<user>"));
}

#[test]
fn test_plain_output_has_no_escape_codes() {
    let text = render::usage(&fallback(&[]), &plain());

    assert!(!text.contains('\u{1b}'));
}

#[test]
fn test_statistics_marks_active_period() {
    let text = render::statistics(&stats(), false, PAST_WEEK_COLUMN, &plain());

    assert!(text.contains("Coding statistics of bob"));
    assert!(text.contains("> Past week"));
    assert!(!text.contains("> All time"));
    assert!(text.contains("2h 0m"));
    assert!(!text.contains("Top 10"));

    let unmarked = render::statistics(&stats(), false, NO_COLUMN, &plain());
    assert!(!unmarked.contains('>'));
}

#[test]
fn test_statistics_with_empty_top() {
    let text = render::statistics(&stats(), true, ALL_TIME_COLUMN, &plain());

    assert!(text.contains("> All time"));
    assert!(text.contains("Top 10 languages"));
    assert!(text.contains("No coding activity in this period."));
}

#[test]
fn test_friends_marks_caller() {
    let friends = vec![
        FriendStatistics {
            username: "alice".to_string(),
            coding_time: CodingTime {
                all_time: 3600,
                past_month: 0,
                past_week: 0,
            },
        },
        FriendStatistics {
            username: "bob".to_string(),
            coding_time: CodingTime::default(),
        },
    ];

    let text = render::friends(&friends, FriendsWindow::AllTime, "bob", &plain());

    assert!(text.contains("Friends ranked by all time"));
    assert!(text.contains("bob (you)"));
    assert!(!text.contains("alice (you)"));
    assert!(text.find("alice").unwrap() < text.find("bob").unwrap());
}
