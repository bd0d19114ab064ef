//! Static command tree of the client.
//!
//! The grammar is a tree of [`Node`]s. Each node is either a literal, matched
//! by its exact name, or a placeholder that accepts any non-empty token and
//! binds it to a named variable. A [`Children`] set holds any number of
//! literals but at most one placeholder, and lookups always try the literals
//! first, so a placeholder can never shadow a literal sibling.
//!
//! Subtrees are reference counted. The `top` subtree is built once and hung
//! under both `statistics` and `getuser <user>`, which keeps the two branches
//! identical.

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;

/// Name the root of the tree is rendered with in usage text.
pub const PROGRAM: &str = "testaustime";

/// What a node does when the input ends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShowAccount,
    Register,
    Login,
    ShowToken,
    NewToken,
    NewFriendCode,
    ChangePassword,
    ShowStatistics,
    TopStatistics,
    UserStatistics,
    ListFriends,
    AddFriend,
    RemoveFriend,
}

/// Time window selected by a `pastWeek` / `pastMonth` leaf. How the window
/// turns into a timestamp depends on the action it ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    PastWeek,
    PastMonth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Literal,
    Placeholder { variable: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("`{parent}` already has a child named `{name}`")]
    DuplicateName { parent: String, name: String },

    #[error("`{parent}` already has a placeholder child, cannot add `{name}`")]
    DuplicatePlaceholder { parent: String, name: String },

    #[error("`{name}` takes an argument and cannot have children")]
    ArgumentWithChildren { name: String },
}

#[derive(Debug)]
pub struct Node {
    name: String,
    info: &'static str,
    kind: NodeKind,
    action: Option<Action>,
    argument: Option<&'static str>,
    window: Option<Window>,
    children: Children,
}

/// Result of matching a token against a [`Children`] set.
#[derive(Debug, Clone, Copy)]
pub enum Match<'a> {
    Literal(&'a Arc<Node>),
    Placeholder {
        node: &'a Arc<Node>,
        variable: &'static str,
    },
}

#[derive(Debug, Default)]
pub struct Children {
    literals: BTreeMap<String, Arc<Node>>,
    placeholder: Option<Arc<Node>>,
}

impl Children {
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.placeholder.is_none()
    }

    pub fn len(&self) -> usize {
        self.literals.len() + usize::from(self.placeholder.is_some())
    }

    pub fn literal(&self, name: &str) -> Option<&Arc<Node>> {
        self.literals.get(name)
    }

    pub fn placeholder(&self) -> Option<&Arc<Node>> {
        self.placeholder.as_ref()
    }

    /// Looks a child up by its rendered name, `<user>` included.
    pub fn named(&self, name: &str) -> Option<&Arc<Node>> {
        self.literal(name)
            .or_else(|| self.placeholder.as_ref().filter(|p| p.name == name))
    }

    /// Literal children first; the placeholder only takes tokens no literal
    /// claims. Empty tokens never match.
    pub fn matching(&self, token: &str) -> Option<Match<'_>> {
        if token.is_empty() {
            return None;
        }

        if let Some(node) = self.literals.get(token) {
            return Some(Match::Literal(node));
        }

        self.placeholder.as_ref().and_then(|node| match node.kind {
            NodeKind::Placeholder { variable } => Some(Match::Placeholder { node, variable }),
            NodeKind::Literal => None,
        })
    }

    /// Literals in name order, then the placeholder.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.literals.values().chain(self.placeholder.iter())
    }

    fn insert(&mut self, parent: &str, child: Arc<Node>) -> Result<(), GrammarError> {
        match child.kind {
            NodeKind::Placeholder { .. } => {
                if self.placeholder.is_some() {
                    return Err(GrammarError::DuplicatePlaceholder {
                        parent: parent.to_string(),
                        name: child.name.clone(),
                    });
                }
                self.placeholder = Some(child);
            }
            NodeKind::Literal => {
                if self.literals.contains_key(&child.name) {
                    return Err(GrammarError::DuplicateName {
                        parent: parent.to_string(),
                        name: child.name.clone(),
                    });
                }
                self.literals.insert(child.name.clone(), child);
            }
        }
        Ok(())
    }
}

impl Node {
    pub fn literal(name: &str, info: &'static str) -> NodeBuilder {
        NodeBuilder::new(name.to_string(), info, NodeKind::Literal)
    }

    /// A placeholder binding its token to `variable`; rendered as `<variable>`.
    pub fn placeholder(variable: &'static str, info: &'static str) -> NodeBuilder {
        NodeBuilder::new(
            format!("<{variable}>"),
            info,
            NodeKind::Placeholder { variable },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &'static str {
        self.info
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Label of the positional value this leaf consumes, if any.
    pub fn argument(&self) -> Option<&'static str> {
        self.argument
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

pub struct NodeBuilder {
    node: Node,
    pending: Vec<Arc<Node>>,
}

impl NodeBuilder {
    fn new(name: String, info: &'static str, kind: NodeKind) -> Self {
        Self {
            node: Node {
                name,
                info,
                kind,
                action: None,
                argument: None,
                window: None,
                children: Children::default(),
            },
            pending: Vec::new(),
        }
    }

    pub fn runs(mut self, action: Action) -> Self {
        self.node.action = Some(action);
        self
    }

    pub fn takes(mut self, argument: &'static str) -> Self {
        self.node.argument = Some(argument);
        self
    }

    pub fn window(mut self, window: Window) -> Self {
        self.node.window = Some(window);
        self
    }

    pub fn child(mut self, child: Arc<Node>) -> Self {
        self.pending.push(child);
        self
    }

    pub fn build(self) -> Result<Arc<Node>, GrammarError> {
        let NodeBuilder { mut node, pending } = self;

        if node.argument.is_some() && !pending.is_empty() {
            return Err(GrammarError::ArgumentWithChildren { name: node.name });
        }

        for child in pending {
            node.children.insert(&node.name, child)?;
        }

        Ok(Arc::new(node))
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    root: Arc<Node>,
}

impl Grammar {
    /// The client's command tree.
    pub fn build() -> Result<Self, GrammarError> {
        let top = top_subtree()?;

        let account = Node::literal("account", "manage accounts")
            .runs(Action::ShowAccount)
            .child(
                Node::literal("register", "create a new account to testaustime")
                    .runs(Action::Register)
                    .takes("username")
                    .build()?,
            )
            .child(
                Node::literal("login", "login to your account with username and password")
                    .runs(Action::Login)
                    .takes("username")
                    .build()?,
            )
            .child(
                Node::literal("token", "shows your authtoken")
                    .runs(Action::ShowToken)
                    .build()?,
            )
            .child(
                Node::literal("newToken", "regenerates your authentication token")
                    .runs(Action::NewToken)
                    .build()?,
            )
            .child(
                Node::literal("newCode", "regenerates your friend code")
                    .runs(Action::NewFriendCode)
                    .build()?,
            )
            .child(
                Node::literal("newPassword", "change your password")
                    .runs(Action::ChangePassword)
                    .build()?,
            )
            .build()?;

        let statistics = Node::literal("statistics", "get coding statistics")
            .runs(Action::ShowStatistics)
            .child(Arc::clone(&top))
            .build()?;

        let friends = Node::literal("friends", "get friends' coding statistics")
            .runs(Action::ListFriends)
            .child(
                Node::literal("pastWeek", "show friends' coding time during past week")
                    .runs(Action::ListFriends)
                    .window(Window::PastWeek)
                    .build()?,
            )
            .child(
                Node::literal("pastMonth", "show friends' coding time during past month")
                    .runs(Action::ListFriends)
                    .window(Window::PastMonth)
                    .build()?,
            )
            .child(
                Node::literal("add", "add a new friend")
                    .runs(Action::AddFriend)
                    .takes("friend code")
                    .build()?,
            )
            .child(
                Node::literal("remove", "remove a friend")
                    .runs(Action::RemoveFriend)
                    .takes("friend name")
                    .build()?,
            )
            .build()?;

        let getuser = Node::literal("getuser", "get specific friend's statistics")
            .child(
                Node::placeholder("user", "show data for specific user")
                    .runs(Action::UserStatistics)
                    .child(top)
                    .build()?,
            )
            .build()?;

        let root = Node::literal(PROGRAM, "a command-line client for testaustime")
            .child(account)
            .child(statistics)
            .child(friends)
            .child(getuser)
            .build()?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn command(&self, name: &str) -> Option<&Arc<Node>> {
        self.root.children().literal(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.root.children().iter()
    }

    /// Walks rendered names from the root, e.g. `["getuser", "<user>", "top"]`.
    pub fn at(&self, path: &[&str]) -> Option<&Arc<Node>> {
        path.iter()
            .try_fold(&self.root, |node, name| node.children().named(name))
    }
}

fn top_subtree() -> Result<Arc<Node>, GrammarError> {
    Node::literal("top", "show top languages and projects")
        .runs(Action::TopStatistics)
        .child(
            Node::literal("pastWeek", "show past week's top statistics")
                .runs(Action::TopStatistics)
                .window(Window::PastWeek)
                .build()?,
        )
        .child(
            Node::literal("pastMonth", "show past month's top statistics")
                .runs(Action::TopStatistics)
                .window(Window::PastMonth)
                .build()?,
        )
        .build()
}
