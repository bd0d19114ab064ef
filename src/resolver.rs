//! Matches a [`ParsedInvocation`] against the [`Grammar`].
//!
//! The walk starts at the root and consumes one positional token per level:
//! a literal child wins, otherwise the placeholder child (if any) binds the
//! token. When the walk reaches a leaf that takes an argument, the next token
//! becomes that argument. Input ending on a node with an action resolves to a
//! [`ResolvedRoute`]; anything else is a [`UsageFallback`] carrying the path
//! to the deepest node that did match.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::{
    args::ParsedInvocation,
    grammar::{Action, Grammar, Match, Node, Window},
    utils,
};

/// No column is highlighted.
pub const NO_COLUMN: usize = 0;
pub const ALL_TIME_COLUMN: usize = 1;
pub const PAST_WEEK_COLUMN: usize = 3;
pub const PAST_MONTH_COLUMN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub variable: &'static str,
    pub value: String,
}

/// Which of a friend's totals the friends list is ranked by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FriendsWindow {
    #[default]
    AllTime,
    PastWeek,
    PastMonth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub command: String,
    pub sub_command: String,
    pub action: Action,
    pub bound: Option<Binding>,
    /// Lower bound for the statistics fetch; `None` means all time.
    pub time_filter: Option<DateTime<Local>>,
    pub show_top: bool,
    pub active_column: usize,
    pub friends_window: FriendsWindow,
    /// Positional value for leaves that take one, e.g. the login username.
    pub argument: Option<String>,
    pub residual: Vec<String>,
}

impl ResolvedRoute {
    pub fn bound_value(&self, variable: &str) -> Option<&str> {
        self.bound
            .as_ref()
            .filter(|b| b.variable == variable)
            .map(|b| b.value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UsageFallback {
    path: Vec<Arc<Node>>,
}

impl UsageFallback {
    /// Deepest node that matched; the grammar root when nothing did.
    pub fn node(&self) -> &Arc<Node> {
        // the path always starts at the root
        &self.path[self.path.len() - 1]
    }

    pub fn names(&self) -> Vec<&str> {
        self.path.iter().map(|n| n.name()).collect()
    }

    pub fn is_root(&self) -> bool {
        self.path.len() == 1
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    Route(ResolvedRoute),
    Usage(UsageFallback),
}

pub struct Resolver<'g> {
    grammar: &'g Grammar,
}

impl<'g> Resolver<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    pub fn resolve(&self, invocation: &ParsedInvocation) -> Resolution {
        self.resolve_at(invocation, Local::now())
    }

    /// Resolves with an explicit clock so the derived time filters are
    /// reproducible.
    pub fn resolve_at(&self, invocation: &ParsedInvocation, now: DateTime<Local>) -> Resolution {
        let mut current = Arc::clone(self.grammar.root());
        let mut path = vec![Arc::clone(&current)];
        let mut bound = None;
        let mut argument = None;

        for token in invocation.positionals() {
            if current.argument().is_some() {
                argument = Some(token.clone());
                break;
            }
            if current.is_leaf() {
                break;
            }

            let next = match current.children().matching(token) {
                Some(Match::Literal(node)) => Arc::clone(node),
                Some(Match::Placeholder { node, variable }) => {
                    bound = Some(Binding {
                        variable,
                        value: token.clone(),
                    });
                    Arc::clone(node)
                }
                None => return Resolution::Usage(UsageFallback { path }),
            };

            path.push(Arc::clone(&next));
            current = next;
        }

        let Some(action) = current.action() else {
            return Resolution::Usage(UsageFallback { path });
        };

        let derived = derive(action, current.window(), &now);
        let name_at = |depth: usize| {
            path.get(depth)
                .map(|n| n.name().to_string())
                .unwrap_or_default()
        };

        Resolution::Route(ResolvedRoute {
            command: name_at(1),
            sub_command: name_at(2),
            action,
            bound,
            time_filter: derived.time_filter,
            show_top: derived.show_top,
            active_column: derived.active_column,
            friends_window: derived.friends_window,
            argument,
            residual: invocation.residual.clone(),
        })
    }
}

struct Derived {
    time_filter: Option<DateTime<Local>>,
    show_top: bool,
    active_column: usize,
    friends_window: FriendsWindow,
}

fn derive(action: Action, window: Option<Window>, now: &DateTime<Local>) -> Derived {
    match action {
        Action::TopStatistics => {
            let (time_filter, active_column) = top_filter(window, now);
            Derived {
                time_filter,
                show_top: true,
                active_column,
                friends_window: FriendsWindow::AllTime,
            }
        }
        Action::ListFriends => {
            let (friends_window, time_filter) = friends_filter(window, now);
            Derived {
                time_filter,
                show_top: false,
                active_column: ALL_TIME_COLUMN,
                friends_window,
            }
        }
        Action::UserStatistics => Derived {
            time_filter: None,
            show_top: false,
            active_column: NO_COLUMN,
            friends_window: FriendsWindow::AllTime,
        },
        _ => Derived {
            time_filter: None,
            show_top: false,
            active_column: ALL_TIME_COLUMN,
            friends_window: FriendsWindow::AllTime,
        },
    }
}

/// Calendar-period bound and highlighted column for the top statistics,
/// shared by every branch that reaches the `top` subtree.
pub fn top_filter<Tz: chrono::TimeZone>(
    window: Option<Window>,
    now: &DateTime<Tz>,
) -> (Option<DateTime<Tz>>, usize) {
    match window {
        Some(Window::PastWeek) => (Some(utils::start_of_week(now)), PAST_WEEK_COLUMN),
        Some(Window::PastMonth) => (Some(utils::start_of_month(now)), PAST_MONTH_COLUMN),
        None => (None, ALL_TIME_COLUMN),
    }
}

/// Rolling bound for the friends list: the last 7 days or the last month,
/// counted back from `now`.
pub fn friends_filter<Tz: chrono::TimeZone>(
    window: Option<Window>,
    now: &DateTime<Tz>,
) -> (FriendsWindow, Option<DateTime<Tz>>) {
    match window {
        Some(Window::PastWeek) => (FriendsWindow::PastWeek, Some(utils::week_ago(now))),
        Some(Window::PastMonth) => (FriendsWindow::PastMonth, Some(utils::month_ago(now))),
        None => (FriendsWindow::AllTime, None),
    }
}
